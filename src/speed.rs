/// Tick rate of the game loop, adjusted in fixed steps inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed {
    ticks_per_second: u32,
    step: u32,
    min: u32,
    max: u32,
}

impl Speed {
    pub fn new(initial: u32, step: u32, min: u32, max: u32) -> Self {
        Speed {
            ticks_per_second: initial.clamp(min, max),
            step,
            min,
            max,
        }
    }

    pub fn get(&self) -> u32 {
        self.ticks_per_second
    }

    pub fn faster(&mut self) {
        self.ticks_per_second = self.ticks_per_second.saturating_add(self.step).min(self.max);
    }

    pub fn slower(&mut self) {
        self.ticks_per_second = self.ticks_per_second.saturating_sub(self.step).max(self.min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_and_clamps() {
        let mut speed = Speed::new(20, 5, 5, 30);
        speed.faster();
        assert_eq!(speed.get(), 25);
        speed.faster();
        speed.faster();
        assert_eq!(speed.get(), 30);
        for _ in 0..10 {
            speed.slower();
        }
        assert_eq!(speed.get(), 5);
    }

    #[test]
    fn initial_value_is_clamped() {
        assert_eq!(Speed::new(100, 5, 5, 60).get(), 60);
        assert_eq!(Speed::new(1, 5, 5, 60).get(), 5);
    }
}
