//! Monotonic time sources.
//!
//! Durations are reported in milliseconds as `f64`. The engine only ever
//! subtracts two readings from the same clock, so the origin is arbitrary.

use std::time::Instant;

/// A monotonic time source returning milliseconds.
///
/// Implemented by [`MonotonicClock`] for real measurements and by any
/// `Fn() -> f64` closure, which lets tests script exact readings:
///
/// ```
/// use std::cell::Cell;
/// use timing_matchers::Clock;
///
/// let ticks = Cell::new(0.0);
/// let clock = || {
///     let now = ticks.get();
///     ticks.set(now + 10.0);
///     now
/// };
/// assert_eq!(clock.now_ms(), 0.0);
/// assert_eq!(clock.now_ms(), 10.0);
/// ```
pub trait Clock {
    /// Current reading in milliseconds. Readings must never decrease.
    fn now_ms(&self) -> f64;
}

impl<F> Clock for F
where
    F: Fn() -> f64,
{
    #[inline]
    fn now_ms(&self) -> f64 {
        self()
    }
}

/// Wall-clock monotonic time backed by [`std::time::Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose zero is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }
}
