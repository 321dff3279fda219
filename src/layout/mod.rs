//! Layout engine: keypad placement, obstacle grid and trace routing
//!
//! A word becomes a chain of nodes on a 3x3 keypad. Node bodies are blocked
//! on a private grid, the charge and ground leads are placed, and the
//! links between consecutive nodes are routed one at a time with A*.

pub mod config;
pub mod error;
pub mod grid;
pub mod leads;
pub mod node;
pub mod pathfinder;
pub mod router;
pub mod transform;
pub mod types;
pub mod word;

pub use config::LayoutConfig;
pub use error::{ConfigError, LayoutError};
pub use grid::GridMap;
pub use node::{EdgeRing, Node};
pub use pathfinder::{NoPath, PathFinder, RoutedPath, SearchRequest};
pub use router::{
    chain_links, processing_order, Attempt, Link, LinkFailure, LinkRouter, LinkState, RoutingError,
    RoutingOutcome, RoutingStatus,
};
pub use transform::GridTransform;
pub use types::*;
pub use word::{layout_word, WordLayout};
