use num::Integer;
use rand::Rng;

/// Pixel coordinates on the board. Entity positions are always multiples of the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector in screen space (y grows downwards).
    pub fn unit_vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Board dimensions, counted in cells of `cell_size` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub cell_size: i32,
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(cell_size: i32, width: i32, height: i32) -> Grid {
        Grid {
            cell_size,
            width,
            height,
        }
    }

    pub fn from_screen(screen_width: i32, screen_height: i32, cell_size: i32) -> Grid {
        Grid::new(cell_size, screen_width / cell_size, screen_height / cell_size)
    }

    pub fn width_px(&self) -> i32 {
        self.width * self.cell_size
    }

    pub fn height_px(&self) -> i32 {
        self.height * self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.width / 2) * self.cell_size,
            (self.height / 2) * self.cell_size,
        )
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..self.width_px()).contains(&position.x)
            && (0..self.height_px()).contains(&position.y)
            && position.x % self.cell_size == 0
            && position.y % self.cell_size == 0
    }

    /// Neighbouring cell in `direction`; leaving one edge re-enters at the opposite one.
    pub fn step(&self, position: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.unit_vector();
        Position::new(
            (position.x + dx * self.cell_size).mod_floor(&self.width_px()),
            (position.y + dy * self.cell_size).mod_floor(&self.height_px()),
        )
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(
            rng.random_range(0..self.width) * self.cell_size,
            rng.random_range(0..self.height) * self.cell_size,
        )
    }

    /// Every cell of the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width)
                .map(move |col| Position::new(col * self.cell_size, row * self.cell_size))
        })
    }
}
