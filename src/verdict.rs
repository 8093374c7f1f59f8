//! Verdict and measurement types returned by the timing matchers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::output::format_measurement;

/// Which matcher produced a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Single synchronous run.
    CompletesWithin,
    /// Single asynchronous run.
    ResolvesWithin,
    /// Repeated synchronous runs aggregated by quantile.
    CompletesWithinQuantile,
    /// Repeated asynchronous runs aggregated by quantile.
    ResolvesWithinQuantile,
}

impl Operation {
    /// Whether this operation aggregates repeated runs.
    pub fn is_quantile(self) -> bool {
        matches!(
            self,
            Operation::CompletesWithinQuantile | Operation::ResolvesWithinQuantile
        )
    }

    /// Matcher name, as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Operation::CompletesWithin => "completes_within",
            Operation::ResolvesWithin => "resolves_within",
            Operation::CompletesWithinQuantile => "completes_within_quantile",
            Operation::ResolvesWithinQuantile => "resolves_within_quantile",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw data behind a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Matcher that produced this measurement.
    pub operation: Operation,

    /// Threshold compared against, in milliseconds (after any configured scaling).
    pub threshold_ms: f64,

    /// Compared value: the single duration, or the computed quantile.
    pub value_ms: f64,

    /// Every measured duration in invocation order.
    pub durations_ms: Vec<f64>,

    /// Number of invocations.
    pub iterations: usize,

    /// Target percentile for quantile operations.
    pub quantile: Option<u32>,

    /// Whether `value_ms <= threshold_ms`.
    pub passed: bool,
}

/// Pass/fail result of a timing assertion.
///
/// The explanation is built lazily: [`Verdict::message`] formats it on each
/// call, so passing assertions over long duration sequences never pay for it.
pub struct Verdict {
    pass: bool,
    measurement: Arc<Measurement>,
    message: Box<dyn Fn() -> String + Send + Sync>,
}

impl Verdict {
    pub(crate) fn from_measurement(measurement: Measurement, color: bool) -> Self {
        let measurement = Arc::new(measurement);
        let captured = Arc::clone(&measurement);
        Self {
            pass: measurement.passed,
            measurement,
            message: Box::new(move || format_measurement(&captured, color)),
        }
    }

    /// Whether the measured value was within the threshold.
    pub fn pass(&self) -> bool {
        self.pass
    }

    /// Human-readable explanation.
    ///
    /// For a failing verdict it states the expectation that was violated; for a
    /// passing verdict it states the opposite expectation, which is what a
    /// negated assertion reports.
    pub fn message(&self) -> String {
        (self.message)()
    }

    /// Measured data behind this verdict.
    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Panic with [`message`](Self::message) unless the verdict passed.
    #[track_caller]
    pub fn assert(&self) {
        if !self.pass {
            panic!("{}", self.message());
        }
    }

    /// Negated assertion: panic with [`message`](Self::message) if the verdict passed.
    #[track_caller]
    pub fn assert_not(&self) {
        if self.pass {
            panic!("{}", self.message());
        }
    }
}

impl fmt::Debug for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verdict")
            .field("pass", &self.pass)
            .field("measurement", &self.measurement)
            .finish_non_exhaustive()
    }
}
