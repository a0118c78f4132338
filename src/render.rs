use crate::apple::Apple;
use crate::error::Result;
use crate::geometry::{Direction, Position};
use crate::snake::Snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}

pub const BOARD_BACKGROUND_COLOR: Color = Color::rgb(0, 0, 0);
pub const BORDER_COLOR: Color = Color::rgb(93, 216, 228);
pub const APPLE_COLOR: Color = Color::rgb(255, 0, 0);
pub const SNAKE_COLOR: Color = Color::rgb(0, 255, 0);
pub const EYE_COLOR: Color = BOARD_BACKGROUND_COLOR;

/// A pixel canvas the game draws a frame on before presenting it.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (i32, i32);
    fn fill(&mut self, color: Color);
    fn draw_filled_rect(&mut self, color: Color, position: Position, size: (i32, i32));
    fn draw_rect_outline(&mut self, color: Color, position: Position, size: (i32, i32));
    fn draw_circle(&mut self, color: Color, center: Position, radius: i32);
    fn set_title(&mut self, title: &str);
    fn present(&mut self) -> Result;
}

pub trait Drawable {
    fn draw(&self, surface: &mut dyn Surface, cell_size: i32);
}

/// One board cell in `color` with a `BORDER_COLOR` edge.
pub fn draw_cell(surface: &mut dyn Surface, color: Color, position: Position, cell_size: i32) {
    surface.draw_filled_rect(color, position, (cell_size, cell_size));
    surface.draw_rect_outline(BORDER_COLOR, position, (cell_size, cell_size));
}

fn erase_cell(surface: &mut dyn Surface, position: Position, cell_size: i32) {
    surface.draw_filled_rect(BOARD_BACKGROUND_COLOR, position, (cell_size, cell_size));
}

impl Drawable for Apple {
    fn draw(&self, surface: &mut dyn Surface, cell_size: i32) {
        draw_cell(surface, APPLE_COLOR, self.position(), cell_size);
    }
}

impl Drawable for Snake {
    fn draw(&self, surface: &mut dyn Surface, cell_size: i32) {
        // erase first, the head may have moved onto the vacated cell
        if let Some(last) = self.last() {
            erase_cell(surface, last, cell_size);
        }
        for position in self.positions().iter().skip(1) {
            draw_cell(surface, SNAKE_COLOR, *position, cell_size);
        }
        let head = self.get_head_position();
        draw_cell(surface, SNAKE_COLOR, head, cell_size);
        for eye in eye_centers(head, self.direction(), cell_size) {
            surface.draw_circle(EYE_COLOR, eye, (cell_size / 8).max(1));
        }
    }
}

/// Eyes sit side by side across the heading, in the front half of the head cell.
fn eye_centers(head: Position, direction: Direction, cell_size: i32) -> [Position; 2] {
    let quarter = cell_size / 4;
    let half = cell_size / 2;
    let (dx, dy) = direction.unit_vector();
    let front = Position::new(head.x + half + dx * quarter, head.y + half + dy * quarter);
    if direction.is_horizontal() {
        [
            Position::new(front.x, front.y - quarter),
            Position::new(front.x, front.y + quarter),
        ]
    } else {
        [
            Position::new(front.x - quarter, front.y),
            Position::new(front.x + quarter, front.y),
        ]
    }
}
