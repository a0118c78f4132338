pub mod apple;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod render;
pub mod snake;
pub mod speed;
pub mod terminal;

pub use config::GameConfig;
pub use error::{Error, Result};
pub use game::{GameContext, SnakeGame, TickOutcome};
