// terminal backend: raw stdin, a reader thread feeding a byte ring buffer,
// and a cell canvas printed with ANSI colors
use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use colored::Colorize;
use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW, VMIN, VTIME};

use crate::error::Result;
use crate::geometry::Position;
use crate::input::{self, InputBuffer, InputEvent, InputSource};
use crate::render::{Color, Surface, BOARD_BACKGROUND_COLOR, BORDER_COLOR};

const STDIN_FD: i32 = 0;
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

/// Puts stdin in non-canonical, no-echo mode for as long as it lives.
pub struct RawTerminal {
    original: Termios,
}

impl RawTerminal {
    pub fn enable() -> io::Result<Self> {
        let original = Termios::from_fd(STDIN_FD)?;
        let mut raw = original;
        // no echo, no line buffering, Ctrl-C arrives as a byte
        raw.c_lflag &= !(ICANON | ECHO | ISIG);
        raw.c_cc[VMIN] = 1;
        raw.c_cc[VTIME] = 0;
        tcsetattr(STDIN_FD, TCSANOW, &raw)?;
        print!("{}", HIDE_CURSOR);
        io::stdout().flush()?;
        Ok(RawTerminal { original })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(err) = tcsetattr(STDIN_FD, TCSANOW, &self.original) {
            tracing::error!(?err, "failed to restore terminal settings");
        }
        print!("{}", SHOW_CURSOR);
        if let Err(err) = io::stdout().flush() {
            tracing::error!(?err, "failed to flush stdout");
        }
    }
}

pub struct TerminalInput {
    rx: Receiver<u8>,
    buffer: InputBuffer,
}

impl TerminalInput {
    /// Spawns a thread that forwards stdin byte by byte.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<u8>();
        thread::spawn(move || {
            let mut reader = io::stdin();
            let mut byte = [0u8; 1];
            loop {
                match reader.read(&mut byte) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(byte[0]).is_err() {
                            break;
                        }
                    }
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => {
                        tracing::warn!(?err, "stdin reader stopped");
                        break;
                    }
                }
            }
        });
        TerminalInput::from_receiver(rx)
    }

    pub fn from_receiver(rx: Receiver<u8>) -> Self {
        TerminalInput {
            rx,
            buffer: InputBuffer::new(),
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut received = false;
        let mut disconnected = false;
        loop {
            match self.rx.try_recv() {
                Ok(byte) => {
                    received = true;
                    // if the buffer is full, ignore the input
                    if !self.buffer.is_full() {
                        self.buffer.push_back(byte);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        let mut events = input::decode(&mut self.buffer, !received);
        if disconnected {
            events.push(InputEvent::Quit);
        }
        events
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    background: Color,
    // one mark per terminal column, a cell is two columns wide
    marks: [Option<Color>; 2],
    outline: Option<Color>,
}

impl Cell {
    fn blank(background: Color) -> Cell {
        Cell {
            background,
            marks: [None, None],
            outline: None,
        }
    }
}

/// Pixel surface backed by a grid of terminal cells of `cell_size` pixels each.
pub struct TerminalSurface<W: Write> {
    out: W,
    cell_size: i32,
    columns: i32,
    rows: i32,
    cells: Vec<Cell>,
    title: String,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, width: i32, height: i32, cell_size: i32) -> Self {
        let columns = width / cell_size;
        let rows = height / cell_size;
        TerminalSurface {
            out,
            cell_size,
            columns,
            rows,
            cells: vec![Cell::blank(BOARD_BACKGROUND_COLOR); (columns * rows) as usize],
            title: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        if (0..self.columns).contains(&column) && (0..self.rows).contains(&row) {
            Some((row * self.columns + column) as usize)
        } else {
            None
        }
    }

    /// Indices of the cells a pixel rectangle touches, clipped to the board.
    fn covered(&self, position: Position, size: (i32, i32)) -> Vec<usize> {
        let cs = self.cell_size;
        let first_column = position.x.div_euclid(cs);
        let first_row = position.y.div_euclid(cs);
        let last_column = (position.x + size.0 - 1).div_euclid(cs);
        let last_row = (position.y + size.1 - 1).div_euclid(cs);
        (first_row..=last_row)
            .flat_map(|row| (first_column..=last_column).map(move |column| (column, row)))
            .filter_map(|(column, row)| self.index(column, row))
            .collect()
    }

    fn frame(&self) -> String {
        let border = |s: &str| {
            s.truecolor(BORDER_COLOR.r, BORDER_COLOR.g, BORDER_COLOR.b)
                .to_string()
        };
        let mut frame = String::new();
        // clear screen and move to the top left corner, then set the window title
        frame.push_str("\x1b[2J\x1b[1;1H");
        frame.push_str(&format!("\x1b]0;{}\x07", self.title));

        frame.push_str(&border(&format!("▗{}▖", "▄▄".repeat(self.columns as usize))));
        frame.push('\n');
        for row in self.cells.chunks(self.columns as usize) {
            frame.push_str(&border("▐"));
            for cell in row {
                let bg = cell.background;
                // an outlined cell shows as [] unless eyes cover it
                for (mark, edge) in cell.marks.into_iter().zip(["[", "]"]) {
                    let glyph = match (mark, cell.outline) {
                        (Some(color), _) => "•".truecolor(color.r, color.g, color.b),
                        (None, Some(color)) => edge.truecolor(color.r, color.g, color.b),
                        (None, None) => " ".normal(),
                    };
                    frame.push_str(&glyph.on_truecolor(bg.r, bg.g, bg.b).to_string());
                }
            }
            frame.push_str(&border("▌"));
            frame.push('\n');
        }
        frame.push_str(&border(&format!("▝{}▘", "▀▀".repeat(self.columns as usize))));
        frame.push('\n');
        frame.push_str(&self.title);
        frame.push('\n');
        frame
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (i32, i32) {
        (self.columns * self.cell_size, self.rows * self.cell_size)
    }

    fn fill(&mut self, color: Color) {
        self.cells.fill(Cell::blank(color));
    }

    fn draw_filled_rect(&mut self, color: Color, position: Position, size: (i32, i32)) {
        for i in self.covered(position, size) {
            self.cells[i] = Cell::blank(color);
        }
    }

    fn draw_rect_outline(&mut self, color: Color, position: Position, size: (i32, i32)) {
        for i in self.covered(position, size) {
            self.cells[i].outline = Some(color);
        }
    }

    fn draw_circle(&mut self, color: Color, center: Position, _radius: i32) {
        let cs = self.cell_size;
        let Some(i) = self.index(center.x.div_euclid(cs), center.y.div_euclid(cs)) else {
            return;
        };
        let half = if center.x.rem_euclid(cs) < cs / 2 { 0 } else { 1 };
        self.cells[i].marks[half] = Some(color);
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn present(&mut self) -> Result {
        let frame = self.frame();
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::render::{APPLE_COLOR, SNAKE_COLOR};

    fn surface() -> TerminalSurface<Vec<u8>> {
        TerminalSurface::new(Vec::new(), 80, 60, 20)
    }

    #[test]
    fn rect_paints_covered_cells() {
        let mut surface = surface();
        surface.draw_filled_rect(SNAKE_COLOR, Position::new(20, 0), (40, 20));
        assert_eq!(surface.cells[1].background, SNAKE_COLOR);
        assert_eq!(surface.cells[2].background, SNAKE_COLOR);
        assert_eq!(surface.cells[0].background, BOARD_BACKGROUND_COLOR);
        assert_eq!(surface.cells[5].background, BOARD_BACKGROUND_COLOR);
    }

    #[test]
    fn out_of_bounds_drawing_is_clipped() {
        let mut surface = surface();
        surface.draw_filled_rect(APPLE_COLOR, Position::new(60, 40), (40, 40));
        surface.draw_circle(APPLE_COLOR, Position::new(500, 500), 2);
        assert_eq!(surface.cells[11].background, APPLE_COLOR);
        assert_eq!(
            surface.cells.iter().filter(|c| c.background == APPLE_COLOR).count(),
            1
        );
    }

    #[test]
    fn circle_marks_the_matching_half() {
        let mut surface = surface();
        surface.draw_circle(BOARD_BACKGROUND_COLOR, Position::new(25, 10), 2);
        surface.draw_circle(BOARD_BACKGROUND_COLOR, Position::new(75, 50), 2);
        assert_eq!(surface.cells[1].marks, [Some(BOARD_BACKGROUND_COLOR), None]);
        assert_eq!(surface.cells[11].marks, [None, Some(BOARD_BACKGROUND_COLOR)]);
    }

    #[test]
    fn fill_clears_marks() {
        let mut surface = surface();
        surface.draw_circle(SNAKE_COLOR, Position::new(5, 5), 2);
        surface.fill(BOARD_BACKGROUND_COLOR);
        assert!(surface.cells.iter().all(|c| *c == Cell::blank(BOARD_BACKGROUND_COLOR)));
    }

    #[test]
    fn outline_survives_until_next_fill() {
        let mut surface = surface();
        surface.draw_filled_rect(SNAKE_COLOR, Position::new(0, 0), (20, 20));
        surface.draw_rect_outline(BORDER_COLOR, Position::new(0, 0), (20, 20));
        assert_eq!(surface.cells[0].outline, Some(BORDER_COLOR));
        surface.draw_filled_rect(BOARD_BACKGROUND_COLOR, Position::new(0, 0), (20, 20));
        assert_eq!(surface.cells[0].outline, None);
    }

    #[test]
    fn present_prints_border_and_title() {
        colored::control::set_override(false);
        let mut surface = surface();
        surface.set_title("Snake | length: 1");
        surface.draw_circle(SNAKE_COLOR, Position::new(5, 5), 2);
        surface.draw_rect_outline(BORDER_COLOR, Position::new(0, 20), (20, 20));
        surface.draw_rect_outline(BORDER_COLOR, Position::new(20, 0), (20, 20));
        surface.present().unwrap();
        let text = String::from_utf8(surface.into_inner()).unwrap();
        assert!(text.contains("▗▄▄▄▄▄▄▄▄▖"));
        assert!(text.contains("▐• []    ▌"));
        assert!(text.contains("▐[]      ▌"));
        assert!(text.contains("▝▀▀▀▀▀▀▀▀▘"));
        assert!(text.ends_with("Snake | length: 1\n"));
    }

    #[test]
    fn input_decodes_bytes_from_channel() {
        let (tx, rx) = mpsc::channel();
        let mut input = TerminalInput::from_receiver(rx);
        for b in [27u8, 91, 67, b'-'] {
            tx.send(b).unwrap();
        }
        assert_eq!(
            input.poll_events(),
            vec![
                InputEvent::KeyDown(Key::Right),
                InputEvent::KeyDown(Key::Char('-')),
            ]
        );

        tx.send(27).unwrap();
        assert!(input.poll_events().is_empty());
        assert_eq!(input.poll_events(), vec![InputEvent::KeyDown(Key::Escape)]);
    }

    #[test]
    fn closed_stdin_quits() {
        let (tx, rx) = mpsc::channel::<u8>();
        let mut input = TerminalInput::from_receiver(rx);
        drop(tx);
        assert_eq!(input.poll_events(), vec![InputEvent::Quit]);
    }
}
