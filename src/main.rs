use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rustsnake::clock::FrameClock;
use rustsnake::terminal::{RawTerminal, TerminalInput, TerminalSurface};
use rustsnake::{GameConfig, GameContext, SnakeGame};

// stdout is the game screen, so logs go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = GameConfig::from_env().context("failed to load configuration")?;
    init_logging(&config.log_file)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut game = SnakeGame::new(&config, rng)?;

    let raw = RawTerminal::enable().context("failed to switch the terminal to raw mode")?;
    let mut ctx = GameContext {
        surface: TerminalSurface::new(
            io::stdout(),
            config.screen_width,
            config.screen_height,
            config.grid_size,
        ),
        input: TerminalInput::spawn(),
        clock: FrameClock::new(),
    };
    let result = game.play(&mut ctx);
    drop(ctx);
    drop(raw);
    result.context("game loop failed")?;

    info!(length = game.snake().length(), "bye");
    println!("Final length: {}", game.snake().length());
    Ok(())
}
