//! Time management utilities
//!
//! Everything here is driven by the simulation's delta time; nothing reads the wall clock.

/// Countdown that becomes ready once it reaches zero
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    /// Create a cooldown that is ready immediately
    pub fn ready() -> Self {
        Self { remaining: 0.0 }
    }

    /// Start (or restart) the countdown
    pub fn trigger(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Advance the countdown by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Whether the countdown has elapsed
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Seconds left before the cooldown is ready
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Accumulating timer compared against a fixed interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    elapsed: f32,
    interval: f32,
}

impl IntervalTimer {
    /// Create a timer for the given interval, starting at zero elapsed time
    pub fn new(interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            interval,
        }
    }

    /// Create a timer that reports ready on the first check
    pub fn new_ready(interval: f32) -> Self {
        Self {
            elapsed: interval,
            interval,
        }
    }

    /// Accumulate `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Whether at least one interval has accumulated
    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.interval
    }

    /// Reset the accumulated time to zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Seconds accumulated since the last reset
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Configured interval in seconds
    pub fn interval(&self) -> f32 {
        self.interval
    }
}

/// Clamp a frame delta into `[0, max_delta]`
///
/// Non-finite or negative deltas are treated as a zero-length frame.
pub fn clamp_delta(delta_time: f32, max_delta: f32) -> f32 {
    if !delta_time.is_finite() || delta_time <= 0.0 {
        return 0.0;
    }
    if max_delta > 0.0 {
        delta_time.min(max_delta)
    } else {
        delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_counts_down() {
        let mut cooldown = Cooldown::ready();
        assert!(cooldown.is_ready());

        cooldown.trigger(1.0);
        cooldown.tick(0.4);
        assert!(!cooldown.is_ready());
        cooldown.tick(0.7);
        assert!(cooldown.is_ready());
        assert_eq!(cooldown.remaining(), 0.0);
    }

    #[test]
    fn test_interval_timer() {
        let mut timer = IntervalTimer::new(0.5);
        timer.tick(0.25);
        assert!(!timer.is_ready());
        timer.tick(0.25);
        assert!(timer.is_ready());
        timer.reset();
        assert!(!timer.is_ready());
        assert!(IntervalTimer::new_ready(0.5).is_ready());
    }

    #[test]
    fn test_clamp_delta() {
        assert_eq!(clamp_delta(0.5, 0.1), 0.1);
        assert_eq!(clamp_delta(0.05, 0.1), 0.05);
        assert_eq!(clamp_delta(-1.0, 0.1), 0.0);
        assert_eq!(clamp_delta(f32::NAN, 0.1), 0.0);
        // Non-positive max disables clamping
        assert_eq!(clamp_delta(2.0, 0.0), 2.0);
    }
}
