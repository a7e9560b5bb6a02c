use web_time::Instant;

/// Wall clock that reports the seconds elapsed between successive
/// [`delta`](Self::delta) calls.
///
/// The first call measures from construction.
pub struct Clock {
    last: Instant,
}

impl Clock {
    /// Start a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Measure the next [`delta`](Self::delta) from now.
    pub fn restart(&mut self) {
        self.last = Instant::now();
    }

    /// Seconds since the previous call (or since construction).
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_non_negative() {
        let mut clock = Clock::new();
        assert!(clock.delta() >= 0.0);
        assert!(clock.delta() >= 0.0);
    }

    #[test]
    fn restart_discards_time_already_passed() {
        let mut clock = Clock::new();
        std::thread::sleep(std::time::Duration::from_millis(30));
        clock.restart();
        assert!(clock.delta() < 0.03);
    }
}
