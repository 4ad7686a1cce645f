//! Monotonic clock abstraction.
//!
//! Decouples protocol timing from the host: production uses the OS monotonic
//! clock, tests use a virtual clock that advances only when slept on. Every
//! timeout in the codec is resolved against this trait rather than a
//! hardware tick call buried in protocol logic.

use std::time::Duration;

/// Abstract monotonic time source.
///
/// # Invariants
///
/// - `now()` never goes backwards within one execution context
/// - `ticks()` is derived from the same time base as `now()`
pub trait Clock {
    /// The instant type of this clock.
    ///
    /// Production clocks use [`std::time::Instant`]; simulated clocks use
    /// their own virtual instants.
    type Instant: Copy + Ord + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Milliseconds elapsed since the clock started, wrapping at `u32::MAX`.
    ///
    /// This is the coarse counter captured as the frame timestamp and used
    /// to seed per-message key generation. It is a salt, not a wall clock.
    fn ticks(&self) -> u32;

    /// Block for the given duration.
    ///
    /// The codec's polling loops call this between attempts; a simulated
    /// clock advances virtual time here instead of sleeping.
    fn sleep(&self, duration: Duration);
}

/// Clock backed by the OS monotonic clock.
///
/// Ticks count from construction, mirroring a device tick counter that
/// starts at power-on.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: std::time::Instant,
}

impl SystemClock {
    /// Create a clock whose tick counter starts now.
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn ticks(&self) -> u32 {
        (self.origin.elapsed().as_millis() & u128::from(u32::MAX)) as u32
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn ticks_advance_with_sleep() {
        let clock = SystemClock::new();
        let before = clock.ticks();
        clock.sleep(Duration::from_millis(5));
        assert!(clock.ticks() > before);
    }
}
