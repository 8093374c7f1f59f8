//! # timing-matchers
//!
//! Timing assertions for tests.
//!
//! This crate measures how long a closure or future takes and turns the
//! measurement into a [`Verdict`]:
//! - Single run: did this call finish within the threshold?
//! - Repeated runs: did the given percentile of N sequential calls finish
//!   within the threshold?
//!
//! ## Failure channels
//!
//! A slow call produces a failing verdict. A call that *fails* (panics, or
//! returns `Err`) is not a timing problem: the panic unwinds and the error is
//! handed back unchanged, so it can be asserted on separately.
//!
//! ## Quick Start
//!
//! ```
//! use timing_matchers::{completes_within, completes_within_quantile, QuantileOptions};
//!
//! completes_within(|| (0..1_000).sum::<u64>(), 500.0).assert();
//!
//! completes_within_quantile(
//!     || (0..1_000).sum::<u64>(),
//!     500.0,
//!     QuantileOptions::new(50, 95),
//! )
//! .unwrap()
//! .assert();
//! ```
//!
//! Async work is timed from the call until the future resolves:
//!
//! ```
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let verdict = timing_matchers::resolves_within(
//!     || async { Ok::<_, std::io::Error>("response") },
//!     250.0,
//! )
//! .await?;
//! verdict.assert();
//! # Ok::<(), std::io::Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Configuration
//!
//! The crate-root functions read [`Config::from_env`]:
//! - `TM_THRESHOLD_SCALE`: multiply every threshold (slow CI machines); messages
//!   and reports then show the scaled threshold
//! - `TM_REPORT`: append a JSON line per verdict to this file
//! - `NO_COLOR`: disable ANSI colour in messages
//!
//! Use [`TimingMatchers`] directly for an explicit configuration or a custom
//! [`Clock`].

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod matchers;
mod verdict;

// Functional modules
pub mod measurement;
pub mod output;
pub mod statistics;

use std::future::Future;

// Re-exports for public API
pub use config::{Config, ENV_REPORT, ENV_THRESHOLD_SCALE};
pub use matchers::{QuantileOptions, TimingMatchers};
pub use measurement::{Clock, MonotonicClock};
pub use output::ReportError;
pub use statistics::{calc_quantile, QuantileError};
pub use verdict::{Measurement, Operation, Verdict};

/// Assert that `work` completes within `threshold_ms` milliseconds.
///
/// Uses the monotonic clock and [`Config::from_env`].
pub fn completes_within<F, T>(work: F, threshold_ms: f64) -> Verdict
where
    F: FnOnce() -> T,
{
    TimingMatchers::from_env().completes_within(work, threshold_ms)
}

/// Assert that `options.quantile`% of `options.iterations` runs of `work`
/// complete within `threshold_ms` milliseconds.
///
/// # Errors
///
/// Returns a [`QuantileError`] for invalid options, before `work` is called.
pub fn completes_within_quantile<F, T>(
    work: F,
    threshold_ms: f64,
    options: QuantileOptions,
) -> Result<Verdict, QuantileError>
where
    F: FnMut() -> T,
{
    TimingMatchers::from_env().completes_within_quantile(work, threshold_ms, options)
}

/// Assert that the future returned by `work` resolves within `threshold_ms` milliseconds.
///
/// # Errors
///
/// If the future resolves to `Err`, that error is returned unchanged.
pub async fn resolves_within<F, Fut, T, E>(work: F, threshold_ms: f64) -> Result<Verdict, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let matchers = TimingMatchers::from_env();
    matchers.resolves_within(work, threshold_ms).await
}

/// Assert that `options.quantile`% of `options.iterations` sequential awaits
/// of `work` resolve within `threshold_ms` milliseconds.
///
/// # Errors
///
/// Invalid options are converted into `E`; otherwise the first `Err` a future
/// resolves to is returned unchanged.
pub async fn resolves_within_quantile<F, Fut, T, E>(
    work: F,
    threshold_ms: f64,
    options: QuantileOptions,
) -> Result<Verdict, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<QuantileError>,
{
    let matchers = TimingMatchers::from_env();
    matchers
        .resolves_within_quantile(work, threshold_ms, options)
        .await
}
