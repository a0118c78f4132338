use rand::Rng;
use tracing::{debug, info, warn};

use crate::apple::Apple;
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::error::Result;
use crate::geometry::Grid;
use crate::input::{self, InputEvent, InputSource, SpeedChange};
use crate::render::{Drawable, Surface, BOARD_BACKGROUND_COLOR};
use crate::snake::Snake;
use crate::speed::Speed;

/// What a single tick did to the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Quit,
    Moved,
    Ate,
    Collided,
    /// The snake filled the board; it starts over like after a collision.
    BoardCleared,
}

impl TickOutcome {
    fn needs_full_redraw(self) -> bool {
        matches!(self, TickOutcome::Collided | TickOutcome::BoardCleared)
    }
}

/// The collaborators the loop talks to, owned by whoever runs the game.
pub struct GameContext<S, I, C> {
    pub surface: S,
    pub input: I,
    pub clock: C,
}

pub struct SnakeGame<R: Rng> {
    grid: Grid,
    snake: Snake,
    apple: Apple,
    speed: Speed,
    collision_offset: usize,
    title: String,
    rng: R,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(config: &GameConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let grid = config.grid();
        let snake = Snake::new(grid.center(), &mut rng);
        let apple = Apple::new(&grid, snake.positions(), &mut rng);
        Ok(SnakeGame {
            grid,
            snake,
            apple,
            speed: config.initial_speed(),
            collision_offset: config.collision_offset,
            title: config.title.clone(),
            rng,
        })
    }

    /// Replaces both entities, e.g. to set up a scenario. The snake still resets to the
    /// board center.
    pub fn with_entities(mut self, snake: Snake, apple: Apple) -> Self {
        let off_board = snake
            .positions()
            .iter()
            .chain(std::iter::once(&apple.position()))
            .any(|p| !self.grid.contains(*p));
        if off_board {
            warn!("scenario places entities off the board");
        }
        self.snake = snake.with_start(self.grid.center());
        self.apple = apple;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apple(&self) -> &Apple {
        &self.apple
    }

    pub fn speed(&self) -> u32 {
        self.speed.get()
    }

    /// Applies one tick of input and advances the snake by one cell.
    pub fn tick(&mut self, events: &[InputEvent]) -> TickOutcome {
        // get direction and speed input
        let controls = input::interpret(self.snake.direction(), events);
        if controls.quit {
            info!(length = self.snake.length(), "quit requested");
            return TickOutcome::Quit;
        }
        match controls.speed {
            Some(SpeedChange::Faster) => self.speed.faster(),
            Some(SpeedChange::Slower) => self.speed.slower(),
            None => {}
        }
        if controls.speed.is_some() {
            debug!(speed = self.speed.get(), "speed changed");
        }

        // the mapper already dropped reversals
        self.snake.update_direction(controls.turn);
        self.snake.move_forward(&self.grid);

        // apple first, then self-collision
        let head = self.snake.get_head_position();
        if head == self.apple.position() {
            // grow on the next move, tail stays in place
            self.snake.grow();
            debug!(length = self.snake.length(), x = head.x, y = head.y, "apple eaten");
            if self
                .apple
                .randomize_position(&self.grid, self.snake.positions(), &mut self.rng)
                .is_none()
            {
                warn!(length = self.snake.length(), "no free cell left, board cleared");
                self.restart();
                return TickOutcome::BoardCleared;
            }
            TickOutcome::Ate
        } else if self.snake.bites_itself(self.collision_offset) {
            info!(length = self.snake.length(), "snake ran into itself, resetting");
            self.restart();
            TickOutcome::Collided
        } else {
            TickOutcome::Moved
        }
    }

    fn restart(&mut self) {
        self.snake.reset(&mut self.rng);
        // new apple away from the fresh snake
        let _ = self
            .apple
            .randomize_position(&self.grid, self.snake.positions(), &mut self.rng);
    }

    pub fn render(&self, surface: &mut dyn Surface) -> Result {
        surface.set_title(&format!(
            "{} | length: {} | speed: {}",
            self.title,
            self.snake.length(),
            self.speed.get()
        ));
        self.snake.draw(surface, self.grid.cell_size);
        self.apple.draw(surface, self.grid.cell_size);
        surface.present()
    }

    /// Runs until a quit signal arrives.
    pub fn play<S, I, C>(&mut self, ctx: &mut GameContext<S, I, C>) -> Result
    where
        S: Surface,
        I: InputSource,
        C: Clock,
    {
        info!(
            width = self.grid.width,
            height = self.grid.height,
            speed = self.speed.get(),
            "game started"
        );
        let (width, height) = ctx.surface.size();
        if width < self.grid.width_px() || height < self.grid.height_px() {
            warn!(width, height, "surface is smaller than the board, drawing is clipped");
        }
        ctx.surface.fill(BOARD_BACKGROUND_COLOR);
        loop {
            // wait for next frame
            ctx.clock.tick(self.speed.get());
            // drain everything typed since the last frame
            let events = ctx.input.poll_events();
            let outcome = self.tick(&events);
            if outcome == TickOutcome::Quit {
                return Ok(());
            }
            // a fresh snake needs a blank board
            if outcome.needs_full_redraw() {
                ctx.surface.fill(BOARD_BACKGROUND_COLOR);
            }
            // display the board
            self.render(&mut ctx.surface)?;
        }
    }
}
