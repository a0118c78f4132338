use std::time::{Duration, Instant};

pub trait Clock {
    /// Blocks until the next frame at `target_rate` frames per second is due and returns
    /// the time elapsed since the previous call.
    fn tick(&mut self, target_rate: u32) -> Duration;
}

#[derive(Debug)]
pub struct FrameClock {
    last_frame: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock { last_frame: None }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

pub fn frame_duration(target_rate: u32) -> Duration {
    Duration::from_secs(1) / target_rate.max(1)
}

impl Clock for FrameClock {
    fn tick(&mut self, target_rate: u32) -> Duration {
        let Some(last_frame) = self.last_frame else {
            self.last_frame = Some(Instant::now());
            return Duration::ZERO;
        };
        let due = last_frame + frame_duration(target_rate);
        let now = Instant::now();
        if due > now {
            // wait for next frame
            std::thread::sleep(due - now);
        }
        let now = Instant::now();
        self.last_frame = Some(now);
        now - last_frame
    }
}
