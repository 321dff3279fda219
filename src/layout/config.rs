//! Configuration for the glyph layout

use std::path::Path;

use serde::Deserialize;

use super::error::{ConfigError, LayoutError};
use super::transform::GridTransform;
use super::types::WorldPoint;

/// Largest accepted grid side, in cells
pub const MAX_MAP_SIZE: i32 = 1024;

/// Configuration options for laying out and routing a word
///
/// Every field can be overridden from TOML; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas pixels per grid cell
    pub grid_size: i32,

    /// Canvas distance between neighbouring keypad positions
    pub node_spacing: i32,

    /// Canvas position of the top-left keypad position on both axes
    pub margin: i32,

    /// Width and height of the routing grid, in cells
    pub map_size: i32,

    /// Outline radius of a node on a key visited for the first time
    pub default_radius: i32,

    /// Radius added for each later visit to the same key
    pub radius_increase: i32,

    /// Radius of the marker dots drawn along a trace
    pub subnode_radius: i32,

    /// Draw the charge symbol into the first node
    pub charge_lead: bool,

    /// Draw the ground run out of the last node
    pub ground_lead: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            node_spacing: 150,
            margin: 127,
            map_size: 35,
            default_radius: 20,
            radius_increase: 7,
            subnode_radius: 5,
            charge_lead: true,
            ground_lead: true,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load and validate a configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: LayoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the grid cell size
    pub fn with_grid_size(mut self, grid_size: i32) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the routing grid dimension
    pub fn with_map_size(mut self, map_size: i32) -> Self {
        self.map_size = map_size;
        self
    }

    /// Set the keypad spacing and margin
    pub fn with_keypad(mut self, node_spacing: i32, margin: i32) -> Self {
        self.node_spacing = node_spacing;
        self.margin = margin;
        self
    }

    /// Set the first-visit radius and the per-revisit increase
    pub fn with_radii(mut self, default_radius: i32, radius_increase: i32) -> Self {
        self.default_radius = default_radius;
        self.radius_increase = radius_increase;
        self
    }

    /// Set the marker dot radius
    pub fn with_subnode_radius(mut self, radius: i32) -> Self {
        self.subnode_radius = radius;
        self
    }

    /// Enable or disable both leads
    pub fn with_leads(mut self, charge: bool, ground: bool) -> Self {
        self.charge_lead = charge;
        self.ground_lead = ground;
        self
    }

    /// Canvas centre of a keypad position (1-9)
    pub fn key_position(&self, key: u8) -> WorldPoint {
        let index = i32::from(key.max(1)) - 1;
        WorldPoint::new(
            (index % 3) * self.node_spacing + self.margin,
            (index / 3) * self.node_spacing + self.margin,
        )
    }

    /// Chessboard radius, in cells, of the blocked body around an anchor
    pub fn body_radius(&self, outline_radius: i32) -> i32 {
        ((2 * outline_radius + self.grid_size - 1) / self.grid_size - 1) / 2
    }

    /// Check that the configuration can host every keypad position
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("grid_size", self.grid_size),
            ("node_spacing", self.node_spacing),
            ("map_size", self.map_size),
            ("default_radius", self.default_radius),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(LayoutError::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.map_size > MAX_MAP_SIZE {
            return Err(LayoutError::invalid_config(format!(
                "map_size must be at most {MAX_MAP_SIZE}, got {}",
                self.map_size
            )));
        }
        if self.radius_increase < 0 || self.subnode_radius < 0 || self.margin < 0 {
            return Err(LayoutError::invalid_config(
                "margin, radius_increase and subnode_radius must not be negative",
            ));
        }

        let ring = self.body_radius(self.default_radius) + 1;
        let transform = GridTransform::new(self.grid_size);
        for key in [1, 9] {
            let anchor = transform.world_to_grid(self.key_position(key));
            let lowest = anchor.x.min(anchor.y) - ring;
            let highest = anchor.x.max(anchor.y) + ring;
            if lowest < 0 || highest >= self.map_size {
                return Err(LayoutError::invalid_config(format!(
                    "key {key} at cell {anchor} does not fit a {0}x{0} grid",
                    self.map_size
                )));
            }
        }
        Ok(())
    }
}
