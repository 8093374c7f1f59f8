//! Measurement infrastructure for timing assertions.
//!
//! This module provides:
//! - A substitutable monotonic [`Clock`] reporting milliseconds
//! - Sequential duration collection for closures and futures
//!
//! Measured intervals are wall-clock time. For async work this includes any
//! unrelated tasks the executor interleaves while the work is suspended.

mod clock;
mod collector;

pub use clock::{Clock, MonotonicClock};
pub use collector::{collect, collect_async, measure, measure_async};
