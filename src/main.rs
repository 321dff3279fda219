//! Khod CLI
//!
//! Usage:
//!   khod [OPTIONS] [WORDS]...
//!
//! Options:
//!   -o, --output <FILE>      Write output to a file instead of stdout
//!   -f, --format <FORMAT>    svg (default) or html
//!   --embed                  Embed HTML words as base64 images
//!   -c, --config <FILE>      Layout configuration (TOML format)
//!   -s, --stylesheet <FILE>  Stylesheet file for color palette (TOML format)
//!   -d, --debug              Draw the routing grid under each glyph
//!   --strict                 Fail when a word cannot be fully routed
//!   --dump-grid              Print the routed grids as text
//!   -v, --verbose            More log output (repeatable)
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use khod::renderer::render_grid_ascii;
use khod::{
    layout_phrase, parse_phrase, render_layouts, LayoutConfig, OutputFormat, RenderConfig, Stylesheet,
};

#[derive(Parser)]
#[command(name = "khod")]
#[command(about = "Draw words as circuit-board glyphs")]
struct Cli {
    /// Words to draw (reads from stdin if not provided)
    words: Vec<String>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: svg or html
    #[arg(short, long, default_value = "svg")]
    format: OutputFormat,

    /// Embed each word of HTML output as a base64 image
    #[arg(long)]
    embed: bool,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet file for color palette (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Debug mode: draw the routing grid under each glyph
    #[arg(short, long)]
    debug: bool,

    /// Exit with an error when a word cannot be fully routed
    #[arg(long)]
    strict: bool,

    /// Print each routed grid as text instead of rendering
    #[arg(long)]
    dump_grid: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // If no words and stdin is a terminal (interactive), show intro help
    if cli.words.is_empty() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load layout configuration
    let layout = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    // Load stylesheet
    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    // Read input
    let (source, source_name) = if cli.words.is_empty() {
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            eprintln!("Error reading from stdin: {}", e);
            std::process::exit(1);
        }
        (buffer, "<stdin>")
    } else {
        (cli.words.join(" "), "<args>")
    };

    let words = match parse_phrase(&source) {
        Ok(words) => words,
        Err(errors) => {
            for e in errors {
                eprint!("{}", e.format(&source, source_name));
            }
            std::process::exit(1);
        }
    };

    let layouts = match layout_phrase(&words, &layout) {
        Ok(layouts) => layouts,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let output = if cli.dump_grid {
        layouts
            .iter()
            .map(|l| format!("{}\n{}", l.word, render_grid_ascii(l)))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        let config = RenderConfig::new()
            .with_layout(layout)
            .with_stylesheet(stylesheet)
            .with_debug(cli.debug)
            .with_strict(cli.strict)
            .with_format(cli.format)
            .with_embed(cli.embed);
        match render_layouts(&layouts, &config) {
            Ok(out) => out,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{}", output),
    }
}

fn print_intro() {
    println!(
        r#"Khod - words drawn as circuit-board glyphs

USAGE:
    khod [OPTIONS] [WORDS]...
    echo 'hello world' | khod

OPTIONS:
    -o, --output       Write to a file instead of stdout
    -f, --format       svg (default) or html
    --embed            HTML only: embed words as base64 images
    -c, --config       Layout configuration (TOML file)
    -s, --stylesheet   Custom color palette (TOML file)
    -d, --debug        Draw the routing grid under each glyph
    --strict           Fail when a word cannot be fully routed
    --dump-grid        Print routed grids as text
    -v, --verbose      More log output (repeatable, RUST_LOG overrides)
    -h, --help         Print help

QUICK START:
    khod hello > hello.svg
    khod -f html hello world > phrase.html"#
    );
}
