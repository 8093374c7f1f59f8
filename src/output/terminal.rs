//! Human-readable verdict messages.
//!
//! Measured values are highlighted red and thresholds green, the usual
//! received/expected convention of test-framework matcher output. With colour
//! disabled the numbers are rendered plainly.

use colored::Colorize;

use crate::verdict::Measurement;

/// Render a measured value.
pub fn format_received(value: f64, color: bool) -> String {
    if color {
        value.to_string().red().to_string()
    } else {
        value.to_string()
    }
}

/// Render an expected value (threshold).
pub fn format_expected(value: f64, color: bool) -> String {
    if color {
        value.to_string().green().to_string()
    } else {
        value.to_string()
    }
}

/// Comma-join a duration sequence, e.g. `10,10,10`.
pub fn format_durations(durations: &[f64]) -> String {
    durations
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Relation phrase for a verdict. A passing verdict only needs a message when
/// the assertion was negated, so it states the opposite expectation.
fn relation(passed: bool) -> &'static str {
    if passed {
        "greater than"
    } else {
        "less or equal to"
    }
}

/// Message for a single-run measurement.
pub fn format_single_run(measurement: &Measurement, color: bool) -> String {
    format!(
        "expected function duration {} (ms) to be {} {} (ms)",
        format_received(measurement.value_ms, color),
        relation(measurement.passed),
        format_expected(measurement.threshold_ms, color),
    )
}

/// Message for a repeated-run measurement at `quantile`, including every duration.
pub fn format_quantile_run(measurement: &Measurement, quantile: u32, color: bool) -> String {
    format!(
        "expected that {}% of the time when running {} iterations,\n\
         the function duration to be {} {} (ms),\n\
         instead it was {} (ms)\n\
         Durations:{}",
        quantile,
        measurement.iterations,
        relation(measurement.passed),
        format_expected(measurement.threshold_ms, color),
        format_received(measurement.value_ms, color),
        format_durations(&measurement.durations_ms),
    )
}

/// Message for any measurement, picking the layout from its operation.
///
/// A quantile operation without a recorded quantile has no percentile to
/// report, so it falls back to the single-run layout.
pub fn format_measurement(measurement: &Measurement, color: bool) -> String {
    match measurement.quantile {
        Some(q) if measurement.operation.is_quantile() => {
            format_quantile_run(measurement, q, color)
        }
        _ => format_single_run(measurement, color),
    }
}
