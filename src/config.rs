use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::Grid;
use crate::speed::Speed;

pub const SCREEN_WIDTH: i32 = 640;
pub const SCREEN_HEIGHT: i32 = 480;
pub const GRID_SIZE: i32 = 20;
pub const SPEED: u32 = 20;
pub const SPEED_STEP: u32 = 5;
pub const MIN_SPEED: u32 = 5;
pub const MAX_SPEED: u32 = 60;
pub const COLLISION_OFFSET: usize = 4;
pub const TITLE: &str = "Snake";
pub const LOG_FILE: &str = "rustsnake.log";
// a board narrower than this lets the head meet segments 1..3 through wraparound
const MIN_BOARD_CELLS: i32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub grid_size: i32,
    pub speed: u32,
    pub speed_step: u32,
    pub min_speed: u32,
    pub max_speed: u32,
    /// Body segments closer to the head than this are not checked for self-collision.
    pub collision_offset: usize,
    pub seed: Option<u64>,
    pub title: String,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            grid_size: GRID_SIZE,
            speed: SPEED,
            speed_step: SPEED_STEP,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            collision_offset: COLLISION_OFFSET,
            seed: None,
            title: TITLE.to_string(),
            log_file: PathBuf::from(LOG_FILE),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidConfig(format!("{} has an unusable value {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

impl GameConfig {
    /// Defaults overridden by `RUSTSNAKE_SEED`, `RUSTSNAKE_SPEED` and `RUSTSNAKE_LOG`.
    pub fn from_env() -> Result<Self> {
        let mut config = GameConfig::default();
        config.seed = parse_var("RUSTSNAKE_SEED")?;
        if let Some(speed) = parse_var("RUSTSNAKE_SPEED")? {
            config.speed = speed;
        }
        if let Some(path) = env::var_os("RUSTSNAKE_LOG") {
            config.log_file = PathBuf::from(path);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result {
        let invalid = |reason: String| Err(Error::InvalidConfig(reason));
        if self.grid_size <= 0 {
            return invalid(format!("cell size must be positive, got {}", self.grid_size));
        }
        for (name, value) in [("width", self.screen_width), ("height", self.screen_height)] {
            if value <= 0 || value % self.grid_size != 0 {
                return invalid(format!(
                    "screen {} {} is not a positive multiple of the cell size {}",
                    name, value, self.grid_size
                ));
            }
            if value / self.grid_size < MIN_BOARD_CELLS {
                return invalid(format!(
                    "board must be at least {} cells on each side",
                    MIN_BOARD_CELLS
                ));
            }
        }
        if self.min_speed == 0 || self.min_speed > self.max_speed {
            return invalid(format!(
                "speed range {}..={} is empty or starts at zero",
                self.min_speed, self.max_speed
            ));
        }
        if self.collision_offset == 0 {
            return invalid("collision offset must skip at least the head".to_string());
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::from_screen(self.screen_width, self.screen_height, self.grid_size)
    }

    pub fn initial_speed(&self) -> Speed {
        Speed::new(self.speed, self.speed_step, self.min_speed, self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid(), Grid::new(20, 32, 24));
        assert_eq!(config.initial_speed().get(), 20);
    }

    #[test]
    fn rejects_misaligned_screen() {
        let config = GameConfig {
            screen_width: 650,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_tiny_board() {
        let config = GameConfig {
            screen_width: 60,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_speed_range_and_offset() {
        let config = GameConfig {
            min_speed: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
        let config = GameConfig {
            min_speed: 50,
            max_speed: 10,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
        let config = GameConfig {
            collision_offset: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
