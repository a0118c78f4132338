use rand::Rng;

use crate::geometry::{Grid, Position};

#[derive(Debug, Clone)]
pub struct Apple {
    position: Position,
}

impl Apple {
    /// Places the apple on a cell that is not in `occupied`. Falls back to the board origin
    /// when the board has no free cell left.
    pub fn new<'a, R, I>(grid: &Grid, occupied: I, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a Position> + Clone,
    {
        let mut apple = Apple {
            position: Position::new(0, 0),
        };
        apple.randomize_position(grid, occupied, rng);
        apple
    }

    pub fn at(position: Position) -> Self {
        Apple { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the apple to a uniformly random free cell. Returns the new position, or `None`
    /// (apple unchanged) when every cell is occupied.
    pub fn randomize_position<'a, R, I>(
        &mut self,
        grid: &Grid,
        occupied: I,
        rng: &mut R,
    ) -> Option<Position>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a Position> + Clone,
    {
        let taken = occupied.clone().into_iter().count();
        let board_size = grid.cell_count();
        let is_free = |cell: &Position| !occupied.clone().into_iter().any(|p| p == cell);

        // if the snake covers more than 80% of the board
        // choose among the free cells, else sample until a free cell comes up
        let position = if taken * 5 > board_size * 4 {
            // collect all empty cells of the board
            let free: Vec<Position> = grid.cells().filter(|c| is_free(c)).collect();
            if free.is_empty() {
                return None;
            }
            free[rng.random_range(0..free.len())]
        } else {
            loop {
                // generate a random cell until an empty one comes up
                let candidate = grid.random_cell(rng);
                if is_free(&candidate) {
                    break candidate;
                }
            }
        };
        // move the apple there
        self.position = position;
        Some(position)
    }
}
