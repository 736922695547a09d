//! # Engine Configuration
//!
//! Loaded once at startup from a TOML file (or defaulted); nothing here is
//! re-read during play.

use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for the simulation core and the frame driver.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of entities; fixes all registry storage sizes.
    pub entity_capacity: usize,
    /// Spatial grid rows (N in the N x M grid).
    pub grid_rows: u32,
    /// Spatial grid columns (M in the N x M grid).
    pub grid_cols: u32,
    /// Magnitude of the horizontal force applied while a move key is held.
    pub move_force: f32,
    /// Impulse applied once per jump key press. Negative y is up in
    /// screen coordinates.
    pub jump_impulse: [f32; 3],
    /// Render-pass clear color (RGBA).
    pub clear_color: [f64; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 64,
            grid_rows: 2,
            grid_cols: 2,
            move_force: 1.0,
            jump_impulse: [0.0, -10.0, 0.0],
            clear_color: [0.05, 0.05, 0.08, 1.0],
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text. Missing fields fall back to
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|error| ConfigError::Parse(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.grid_rows, 2);
        assert_eq!(config.grid_cols, 2);
        assert_eq!(config.jump_impulse, [0.0, -10.0, 0.0]);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = EngineConfig::from_toml("grid_rows = 4\nmove_force = 2.5\n").unwrap();
        assert_eq!(config.grid_rows, 4);
        assert_eq!(config.move_force, 2.5);
        // Unspecified fields keep their defaults.
        assert_eq!(config.grid_cols, 2);
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = EngineConfig::from_toml("grid_rows = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
