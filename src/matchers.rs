//! Timing assertion engine.
//!
//! [`TimingMatchers`] times a unit of work against a threshold and returns a
//! [`Verdict`]. Two failure channels are kept apart:
//!
//! - the work itself failing (a panic, or an `Err` from fallible work) is
//!   propagated unchanged and never becomes a verdict;
//! - the work being too slow is a `Verdict` with `pass() == false`.

use std::convert::Infallible;
use std::future::Future;

use crate::config::Config;
use crate::measurement::{collect, collect_async, measure, measure_async, Clock, MonotonicClock};
use crate::output::append_report;
use crate::statistics::{calc_quantile, QuantileError};
use crate::verdict::{Measurement, Operation, Verdict};

/// Parameters for the repeated-run matchers.
///
/// Both fields are required; there are no defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantileOptions {
    /// Number of times to invoke the work (must be > 0).
    pub iterations: usize,
    /// Target percentile in (0, 100].
    pub quantile: u32,
}

impl QuantileOptions {
    /// Bundle an iteration count and a percentile.
    pub fn new(iterations: usize, quantile: u32) -> Self {
        Self {
            iterations,
            quantile,
        }
    }

    /// Check both fields before anything is measured.
    ///
    /// Zero iterations would leave no durations to aggregate, so it is
    /// reported the same way the calculator reports an empty sample set.
    ///
    /// # Errors
    ///
    /// [`QuantileError::InvalidPercentile`] or [`QuantileError::InvalidSamples`].
    pub fn validate(&self) -> Result<(), QuantileError> {
        if self.quantile == 0 || self.quantile > 100 {
            return Err(QuantileError::InvalidPercentile);
        }
        if self.iterations == 0 {
            return Err(QuantileError::InvalidSamples);
        }
        Ok(())
    }
}

/// Timing assertions over a substitutable clock.
///
/// # Example
///
/// ```
/// use timing_matchers::{QuantileOptions, TimingMatchers};
///
/// let matchers = TimingMatchers::new();
///
/// matchers.completes_within(|| (0..100).sum::<u64>(), 1_000.0).assert();
///
/// let verdict = matchers
///     .completes_within_quantile(|| (0..100).sum::<u64>(), 1_000.0, QuantileOptions::new(20, 95))
///     .unwrap();
/// verdict.assert();
/// ```
#[derive(Debug, Clone)]
pub struct TimingMatchers<C = MonotonicClock> {
    clock: C,
    config: Config,
}

impl TimingMatchers<MonotonicClock> {
    /// Matchers on the real monotonic clock with default configuration.
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }

    /// Matchers on the real monotonic clock configured from the environment.
    pub fn from_env() -> Self {
        Self::new().with_config(Config::from_env())
    }
}

impl Default for TimingMatchers<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimingMatchers<C> {
    /// Matchers reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            config: Config::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Clock used for measurements.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Assert that `work` completes within `threshold_ms`.
    ///
    /// A panic inside `work` unwinds through this call.
    pub fn completes_within<F, T>(&self, work: F, threshold_ms: f64) -> Verdict
    where
        F: FnOnce() -> T,
    {
        let (_, elapsed) = measure(&self.clock, work);
        self.single_verdict(Operation::CompletesWithin, elapsed, threshold_ms)
    }

    /// Fallible form of [`completes_within`](Self::completes_within).
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work` unchanged.
    pub fn try_completes_within<F, T, E>(&self, work: F, threshold_ms: f64) -> Result<Verdict, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let (out, elapsed) = measure(&self.clock, work);
        out?;
        Ok(self.single_verdict(Operation::CompletesWithin, elapsed, threshold_ms))
    }

    /// Assert that the future returned by `work` resolves within `threshold_ms`.
    ///
    /// The interval spans from calling `work` until the future is ready.
    ///
    /// # Errors
    ///
    /// If the future resolves to `Err`, that error is returned unchanged.
    pub async fn resolves_within<F, Fut, T, E>(
        &self,
        work: F,
        threshold_ms: f64,
    ) -> Result<Verdict, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let (out, elapsed) = measure_async(&self.clock, work).await;
        out?;
        Ok(self.single_verdict(Operation::ResolvesWithin, elapsed, threshold_ms))
    }

    /// Assert that `options.quantile`% of `options.iterations` runs complete
    /// within `threshold_ms`.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantileError`] for invalid options, before `work` is called.
    pub fn completes_within_quantile<F, T>(
        &self,
        mut work: F,
        threshold_ms: f64,
        options: QuantileOptions,
    ) -> Result<Verdict, QuantileError>
    where
        F: FnMut() -> T,
    {
        options.validate()?;
        let durations = match collect(&self.clock, options.iterations, || {
            Ok::<_, Infallible>(work())
        }) {
            Ok(durations) => durations,
            Err(never) => match never {},
        };
        self.quantile_verdict(
            Operation::CompletesWithinQuantile,
            durations,
            threshold_ms,
            options,
        )
    }

    /// Fallible form of [`completes_within_quantile`](Self::completes_within_quantile).
    ///
    /// # Errors
    ///
    /// Invalid options are converted into `E`; otherwise the first error
    /// produced by `work` is returned unchanged and no verdict is formed.
    pub fn try_completes_within_quantile<F, T, E>(
        &self,
        work: F,
        threshold_ms: f64,
        options: QuantileOptions,
    ) -> Result<Verdict, E>
    where
        F: FnMut() -> Result<T, E>,
        E: From<QuantileError>,
    {
        options.validate()?;
        let durations = collect(&self.clock, options.iterations, work)?;
        Ok(self.quantile_verdict(
            Operation::CompletesWithinQuantile,
            durations,
            threshold_ms,
            options,
        )?)
    }

    /// Assert that `options.quantile`% of `options.iterations` sequential
    /// awaits resolve within `threshold_ms`.
    ///
    /// # Errors
    ///
    /// Invalid options are converted into `E`; otherwise the first `Err` a
    /// future resolves to is returned unchanged and no verdict is formed.
    pub async fn resolves_within_quantile<F, Fut, T, E>(
        &self,
        work: F,
        threshold_ms: f64,
        options: QuantileOptions,
    ) -> Result<Verdict, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<QuantileError>,
    {
        options.validate()?;
        let durations = collect_async(&self.clock, options.iterations, work).await?;
        Ok(self.quantile_verdict(
            Operation::ResolvesWithinQuantile,
            durations,
            threshold_ms,
            options,
        )?)
    }

    fn single_verdict(&self, operation: Operation, elapsed: f64, threshold_ms: f64) -> Verdict {
        let threshold_ms = self.config.scaled(threshold_ms);
        self.finish(Measurement {
            operation,
            threshold_ms,
            value_ms: elapsed,
            durations_ms: vec![elapsed],
            iterations: 1,
            quantile: None,
            passed: elapsed <= threshold_ms,
        })
    }

    fn quantile_verdict(
        &self,
        operation: Operation,
        durations: Vec<f64>,
        threshold_ms: f64,
        options: QuantileOptions,
    ) -> Result<Verdict, QuantileError> {
        let threshold_ms = self.config.scaled(threshold_ms);
        let value = calc_quantile(f64::from(options.quantile), &durations)?;
        Ok(self.finish(Measurement {
            operation,
            threshold_ms,
            value_ms: value,
            durations_ms: durations,
            iterations: options.iterations,
            quantile: Some(options.quantile),
            passed: value <= threshold_ms,
        }))
    }

    fn finish(&self, measurement: Measurement) -> Verdict {
        tracing::debug!(
            operation = %measurement.operation,
            value_ms = measurement.value_ms,
            threshold_ms = measurement.threshold_ms,
            iterations = measurement.iterations,
            passed = measurement.passed,
            "timing verdict"
        );

        if let Some(path) = &self.config.report_path {
            if let Err(err) = append_report(path, &measurement) {
                tracing::warn!(error = %err, "could not write timing report");
            }
        }

        Verdict::from_measurement(measurement, self.config.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Clock that alternates a start reading of 1000 ms with 1000 + the next
    /// scripted duration.
    fn scripted(durations: Vec<f64>) -> impl Fn() -> f64 {
        let reads = Cell::new(0usize);
        move || {
            let n = reads.get();
            reads.set(n + 1);
            if n % 2 == 0 {
                1_000.0
            } else {
                1_000.0 + durations[n / 2]
            }
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let matchers = TimingMatchers::with_clock(scripted(vec![10.0]));
        assert!(matchers.completes_within(|| (), 10.0).pass());
    }

    #[test]
    fn test_over_threshold_fails() {
        let matchers = TimingMatchers::with_clock(scripted(vec![11.0]));
        let verdict = matchers.completes_within(|| (), 10.0);
        assert!(!verdict.pass());
        assert_eq!(
            verdict.message(),
            "expected function duration 11 (ms) to be less or equal to 10 (ms)"
        );
    }

    #[test]
    fn test_threshold_scale_applies() {
        let matchers = TimingMatchers::with_clock(scripted(vec![15.0]))
            .with_config(Config::default().threshold_scale(2.0));
        let verdict = matchers.completes_within(|| (), 10.0);
        assert!(verdict.pass());
        assert_eq!(verdict.measurement().threshold_ms, 20.0);
    }

    #[test]
    fn test_threshold_scale_reported_in_message() {
        let matchers = TimingMatchers::with_clock(scripted(vec![25.0]))
            .with_config(Config::default().threshold_scale(2.0));
        let verdict = matchers.completes_within(|| (), 10.0);
        assert!(!verdict.pass());
        assert_eq!(
            verdict.message(),
            "expected function duration 25 (ms) to be less or equal to 20 (ms)"
        );
    }

    #[test]
    fn test_zero_iterations_reports_empty_data() {
        let matchers = TimingMatchers::with_clock(scripted(vec![]));
        let err = matchers
            .completes_within_quantile(|| (), 10.0, QuantileOptions::new(0, 50))
            .unwrap_err();
        assert_eq!(err, QuantileError::InvalidSamples);
        assert_eq!(
            err.to_string(),
            "Data must be an array of numbers and must contain at least one element"
        );
    }

    #[test]
    fn test_options_validation() {
        assert_eq!(QuantileOptions::new(5, 0).validate(), Err(QuantileError::InvalidPercentile));
        assert_eq!(QuantileOptions::new(5, 101).validate(), Err(QuantileError::InvalidPercentile));
        assert_eq!(
            QuantileOptions::new(0, 50).validate(),
            Err(QuantileError::InvalidSamples)
        );
        assert_eq!(QuantileOptions::new(1, 100).validate(), Ok(()));
    }

    #[test]
    fn test_invalid_options_skip_work() {
        let matchers = TimingMatchers::with_clock(scripted(vec![]));
        let calls = Cell::new(0);
        let result = matchers.completes_within_quantile(
            || calls.set(calls.get() + 1),
            10.0,
            QuantileOptions::new(3, 0),
        );
        assert_eq!(result.unwrap_err(), QuantileError::InvalidPercentile);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_quantile_interpolates_durations() {
        let matchers = TimingMatchers::with_clock(scripted(vec![4.0, 1.0, 3.0, 2.0, 5.0]));
        let verdict = matchers
            .completes_within_quantile(|| (), 3.5, QuantileOptions::new(5, 50))
            .unwrap();
        assert!(verdict.pass());
        assert_eq!(verdict.measurement().value_ms, 3.0);
        assert_eq!(verdict.measurement().durations_ms, vec![4.0, 1.0, 3.0, 2.0, 5.0]);
    }

    #[test]
    fn test_nan_clock_reading_is_invalid_samples() {
        let matchers = TimingMatchers::with_clock(|| f64::NAN);
        let result = matchers.completes_within_quantile(|| (), 1.0, QuantileOptions::new(2, 50));
        assert_eq!(result.unwrap_err(), QuantileError::InvalidSamples);
    }
}
