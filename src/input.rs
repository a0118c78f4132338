use circular_buffer::CircularBuffer;

use crate::geometry::Direction;

pub type InputBuffer = CircularBuffer<1024, u8>; // 1024 bytes in input buffer

const ESC: u8 = 27;
const BRACKET: u8 = 91;
const CTRL_C: u8 = 3;
const CTRL_D: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

/// Anything that can hand the loop the events that arrived since the last call.
/// Must not block.
pub trait InputSource {
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedChange {
    Faster,
    Slower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Speed(SpeedChange),
    Quit,
}

pub const FASTER_KEY: char = '+';
pub const SLOWER_KEY: char = '-';

// only the two perpendicular turns of each heading are listed,
// going straight on or reversing is not a turn
const TURNS: [(Direction, Key, Direction); 8] = [
    (Direction::Up, Key::Left, Direction::Left),
    (Direction::Up, Key::Right, Direction::Right),
    (Direction::Down, Key::Left, Direction::Left),
    (Direction::Down, Key::Right, Direction::Right),
    (Direction::Left, Key::Up, Direction::Up),
    (Direction::Left, Key::Down, Direction::Down),
    (Direction::Right, Key::Up, Direction::Up),
    (Direction::Right, Key::Down, Direction::Down),
];

pub fn map_key(current: Direction, key: Key) -> Option<Command> {
    match key {
        Key::Escape => Some(Command::Quit),
        Key::Char(FASTER_KEY) => Some(Command::Speed(SpeedChange::Faster)),
        Key::Char(SLOWER_KEY) => Some(Command::Speed(SpeedChange::Slower)),
        _ => TURNS
            .iter()
            .find(|(from, pressed, _)| *from == current && *pressed == key)
            .map(|(_, _, to)| Command::Turn(*to)),
    }
}

/// What one tick's worth of events asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub quit: bool,
    pub turn: Option<Direction>,
    pub speed: Option<SpeedChange>,
}

/// Folds the events polled in one tick. The last valid turn and the first speed change
/// win, every turn is judged against `current`.
pub fn interpret(current: Direction, events: &[InputEvent]) -> Controls {
    let mut controls = Controls::default();
    for event in events {
        let command = match event {
            InputEvent::Quit => Some(Command::Quit),
            InputEvent::KeyDown(key) => map_key(current, *key),
        };
        match command {
            Some(Command::Quit) => {
                controls.quit = true;
                break;
            }
            // later keys overwrite earlier ones
            Some(Command::Turn(dir)) => controls.turn = Some(dir),
            Some(Command::Speed(change)) if controls.speed.is_none() => {
                controls.speed = Some(change)
            }
            _ => {}
        }
    }
    controls
}

/// Decodes raw terminal bytes into events. Arrow keys arrive as `ESC [ A..D`; an
/// unfinished sequence stays in the buffer for the next call. A lone `ESC` is reported as
/// the escape key only when `flush_escape` is set, i.e. nothing else arrived behind it.
pub fn decode(buffer: &mut InputBuffer, flush_escape: bool) -> Vec<InputEvent> {
    let mut events = vec![];
    while let Some(&byte) = buffer.front() {
        match byte {
            ESC => match (buffer.nth_front(1).copied(), buffer.nth_front(2).copied()) {
                (Some(BRACKET), Some(code)) => {
                    let key = match code {
                        65 => Some(Key::Up),
                        66 => Some(Key::Down),
                        67 => Some(Key::Right),
                        68 => Some(Key::Left),
                        _ => None, // not an arrow
                    };
                    events.extend(key.map(InputEvent::KeyDown));
                    buffer.pop_front();
                    buffer.pop_front();
                    buffer.pop_front();
                }
                (Some(BRACKET), None) => break,
                (Some(_), _) => {
                    events.push(InputEvent::KeyDown(Key::Escape));
                    buffer.pop_front();
                }
                (None, _) => {
                    if flush_escape {
                        events.push(InputEvent::KeyDown(Key::Escape));
                        buffer.pop_front();
                    }
                    break;
                }
            },
            CTRL_C | CTRL_D | b'q' => {
                events.push(InputEvent::Quit);
                buffer.pop_front();
            }
            32..=126 => {
                events.push(InputEvent::KeyDown(Key::Char(byte as char)));
                buffer.pop_front();
            }
            _ => {
                buffer.pop_front();
            }
        }
    }
    events
}
