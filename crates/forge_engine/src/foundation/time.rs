//! Time management utilities

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-step accumulator for deterministic simulation ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// Create an accumulator ticking every `step` seconds, at most
    /// `max_steps` times per frame
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_steps,
        }
    }

    /// Seconds per fixed tick
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed `dt` seconds and return how many fixed ticks are due.
    ///
    /// Time beyond `max_steps` ticks is dropped so a long stall cannot
    /// trigger a burst of catch-up work.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.step <= 0.0 || dt <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            log::debug!("Dropping {:.4}s of fixed-step backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timestep_accumulates() {
        let mut fixed = FixedTimestep::new(0.5, 5);

        assert_eq!(fixed.advance(0.25), 0);
        assert_eq!(fixed.advance(0.25), 1);
        assert_eq!(fixed.advance(1.0), 2);
    }

    #[test]
    fn test_fixed_timestep_caps_catch_up() {
        let mut fixed = FixedTimestep::new(0.1, 3);

        assert_eq!(fixed.advance(10.0), 3);
        assert_eq!(fixed.advance(0.05), 0);
    }

    #[test]
    fn test_fixed_timestep_ignores_non_positive_input() {
        let mut fixed = FixedTimestep::new(0.1, 3);

        assert_eq!(fixed.advance(-1.0), 0);
        assert_eq!(fixed.advance(0.0), 0);
        assert_eq!(fixed.step(), 0.1);
    }

    #[test]
    fn test_timer_counts_frames() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();

        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= timer.delta_time());
    }
}
