use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::state::Position;

/// Configuration for the game
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid size used outside fullscreen, and the lower bound inside it
    pub min_grid_size: usize,
    /// Pixel size of one grid cell
    pub cell_size: u32,
    /// Pixels reserved on each axis around the board in fullscreen
    pub fullscreen_margin: u32,
    /// Period of the game tick in milliseconds
    pub tick_period_ms: u64,
    /// Head position of the single-cell snake at mount and after reset
    pub initial_head: Position,
    /// Food position at mount (reset always picks a random cell)
    pub initial_food: Position,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_grid_size: 30,
            cell_size: 20,
            fullscreen_margin: 200,
            tick_period_ms: 150,
            initial_head: Position::new(15, 15),
            initial_food: Position::new(15, 10),
        }
    }
}

impl GameConfig {
    /// Read a JSON config file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .map_err(|msg| anyhow!("Invalid config {}: {}", path.display(), msg))?;
        Ok(config)
    }

    /// Tick period as a `Duration`
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Check that every value is usable
    ///
    /// Returns `Err(String)` describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_grid_size == 0 {
            return Err("min_grid_size must be at least 1".to_string());
        }

        if self.cell_size == 0 {
            return Err("cell_size must be at least 1".to_string());
        }

        if self.tick_period_ms == 0 {
            return Err("tick_period_ms must be at least 1".to_string());
        }

        let bound = self.min_grid_size as i32;
        for (name, pos) in [
            ("initial_head", self.initial_head),
            ("initial_food", self.initial_food),
        ] {
            if pos.x < 0 || pos.x >= bound || pos.y < 0 || pos.y >= bound {
                return Err(format!(
                    "{} ({}, {}) lies outside the {}x{} grid",
                    name, pos.x, pos.y, self.min_grid_size, self.min_grid_size
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.min_grid_size, 30);
        assert_eq!(config.cell_size, 20);
        assert_eq!(config.tick_period(), Duration::from_millis(150));
        assert_eq!(config.initial_head, Position::new(15, 15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GameConfig {
            tick_period_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            initial_head: Position::new(30, 0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("initial_head"));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_period_ms": 90 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.tick_period_ms, 90);
        assert_eq!(config.min_grid_size, 30);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "cell_size": 0 }}"#).unwrap();
        assert!(GameConfig::load(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(GameConfig::load(file.path()).is_err());
    }
}
