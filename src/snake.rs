// the snake moves head first: a new head is pushed on the front every tick and the
// oldest segment is dropped from the back unless the snake still has to grow
use std::collections::VecDeque;

use rand::Rng;

use crate::geometry::{Direction, Grid, Position};

#[derive(Debug, Clone)]
pub struct Snake {
    positions: VecDeque<Position>, // The head is the first element
    length: usize,
    direction: Direction,
    start: Position,
    last: Option<Position>,
}

impl Snake {
    pub fn new<R: Rng + ?Sized>(start: Position, rng: &mut R) -> Self {
        let mut snake = Snake {
            positions: VecDeque::new(),
            length: 1,
            direction: Direction::Right,
            start,
            last: None,
        };
        snake.reset(rng);
        snake
    }

    /// Builds a snake from explicit segments, head first. Meant for scenarios and tests.
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        let start = segments.first().copied().unwrap_or(Position::new(0, 0));
        Snake {
            length: segments.len().max(1),
            positions: segments.into(),
            direction,
            start,
            last: None,
        }
    }

    /// Cell the snake comes back to on `reset`.
    pub fn with_start(mut self, start: Position) -> Self {
        self.start = start;
        self
    }

    pub fn positions(&self) -> &VecDeque<Position> {
        &self.positions
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Cell vacated by the last move, `None` when the snake grew instead.
    pub fn last(&self) -> Option<Position> {
        self.last
    }

    pub fn get_head_position(&self) -> Position {
        self.positions.front().copied().unwrap_or(self.start)
    }

    pub fn grow(&mut self) {
        self.length += 1;
    }

    /// `None` means no key asked for a change this tick.
    pub fn update_direction(&mut self, new_direction: Option<Direction>) {
        if let Some(direction) = new_direction {
            self.direction = direction;
        }
    }

    pub fn move_forward(&mut self, grid: &Grid) {
        let new_head = grid.step(self.get_head_position(), self.direction);
        self.positions.push_front(new_head);
        self.last = if self.positions.len() > self.length {
            self.positions.pop_back()
        } else {
            None
        };
    }

    /// True when the head sits on a segment at index `offset` or further back.
    pub fn bites_itself(&self, offset: usize) -> bool {
        let head = self.get_head_position();
        self.positions.iter().skip(offset).any(|p| *p == head)
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.length = 1;
        self.positions.clear();
        self.positions.push_back(self.start);
        self.direction = Direction::random(rng);
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid() -> Grid {
        Grid::from_screen(640, 480, 20)
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn starts_with_one_segment_at_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let snake = Snake::new(grid().center(), &mut rng);
        assert_eq!(snake.length(), 1);
        assert_eq!(snake.positions().len(), 1);
        assert_eq!(snake.get_head_position(), p(320, 240));
        assert_eq!(snake.last(), None);
    }

    #[test]
    fn moving_right_from_center_keeps_row() {
        let mut snake = Snake::from_segments(vec![p(320, 240)], Direction::Right);
        snake.move_forward(&grid());
        assert_eq!(snake.get_head_position(), p(340, 240));
        assert_eq!(snake.positions().len(), 1);
        assert_eq!(snake.last(), Some(p(320, 240)));
    }

    #[test]
    fn growing_keeps_the_tail() {
        let mut snake = Snake::from_segments(vec![p(40, 40), p(20, 40)], Direction::Right);
        snake.grow();
        snake.move_forward(&grid());
        assert_eq!(snake.length(), 3);
        assert_eq!(
            snake.positions().iter().copied().collect::<Vec<_>>(),
            vec![p(60, 40), p(40, 40), p(20, 40)]
        );
        assert_eq!(snake.last(), None);

        snake.move_forward(&grid());
        assert_eq!(snake.positions().len(), 3);
        assert_eq!(snake.last(), Some(p(20, 40)));
    }

    #[test]
    fn wraps_through_each_edge() {
        let grid = grid();
        let cases = [
            (p(620, 100), Direction::Right, p(0, 100)),
            (p(0, 100), Direction::Left, p(620, 100)),
            (p(100, 0), Direction::Up, p(100, 460)),
            (p(100, 460), Direction::Down, p(100, 0)),
        ];
        for (start, dir, expected) in cases {
            let mut snake = Snake::from_segments(vec![start], dir);
            snake.move_forward(&grid);
            assert_eq!(snake.get_head_position(), expected, "{:?} from {:?}", dir, start);
        }
    }

    #[test]
    fn no_direction_is_a_no_op() {
        let mut snake = Snake::from_segments(vec![p(0, 0)], Direction::Up);
        snake.update_direction(None);
        assert_eq!(snake.direction(), Direction::Up);
        snake.update_direction(Some(Direction::Left));
        assert_eq!(snake.direction(), Direction::Left);
    }

    #[test]
    fn update_direction_accepts_any_direction() {
        // reversals are filtered by the key mapping, not here
        let mut snake = Snake::from_segments(vec![p(0, 0)], Direction::Right);
        snake.update_direction(Some(Direction::Left));
        assert_eq!(snake.direction(), Direction::Left);
    }

    #[test]
    fn reset_goes_back_to_start_cell() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut snake = Snake::from_segments(vec![p(40, 20), p(40, 40)], Direction::Up)
            .with_start(p(320, 240));
        snake.reset(&mut rng);
        assert_eq!(snake.get_head_position(), p(320, 240));
        assert_eq!(snake.positions().len(), 1);
    }

    #[test]
    fn detects_bite_only_past_offset() {
        // head at (20,20) loops back onto segment 4
        let snake = Snake::from_segments(
            vec![p(20, 20), p(40, 20), p(40, 40), p(20, 40), p(20, 20), p(0, 20)],
            Direction::Up,
        );
        assert!(snake.bites_itself(4));
        assert!(!snake.bites_itself(5));
    }

    #[test]
    fn reset_restores_single_segment() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut snake = Snake::new(p(320, 240), &mut rng);
        for _ in 0..5 {
            snake.grow();
            snake.move_forward(&grid());
        }
        assert_eq!(snake.length(), 6);
        snake.reset(&mut rng);
        assert_eq!(snake.length(), 1);
        assert_eq!(snake.positions().iter().copied().collect::<Vec<_>>(), vec![p(320, 240)]);
        assert_eq!(snake.last(), None);
    }

    #[test]
    fn reset_direction_is_random() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut snake = Snake::new(p(0, 0), &mut rng);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            snake.reset(&mut rng);
            seen.insert(snake.direction());
        }
        assert_eq!(seen.len(), 4);
    }
}
