//! Configuration for timing assertions.

use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Environment variable scaling every threshold (e.g. `2.0` on slow CI runners).
///
/// When set, a run passes iff its duration is `<=` the caller's threshold
/// times this factor, and verdict messages and reports show that scaled
/// threshold rather than the value passed to the matcher.
pub const ENV_THRESHOLD_SCALE: &str = "TM_THRESHOLD_SCALE";

/// Environment variable naming a JSON-lines report file.
pub const ENV_REPORT: &str = "TM_REPORT";

/// Configuration options for `TimingMatchers`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Multiplier applied to every threshold before comparison (default: 1.0).
    ///
    /// Messages and reports show the scaled threshold, not the caller's value.
    /// At the default of 1.0 the comparison is exactly `duration <= threshold`.
    pub threshold_scale: f64,

    /// Append one JSON line per verdict to this file (default: none).
    pub report_path: Option<PathBuf>,

    /// Highlight values in messages with ANSI colour (default: false).
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_scale: 1.0,
            report_path: None,
            color: false,
        }
    }
}

impl Config {
    /// Defaults merged with `TM_THRESHOLD_SCALE`, `TM_REPORT` and `NO_COLOR`.
    ///
    /// Colour is enabled when stderr is a terminal and `NO_COLOR` is unset.
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var(ENV_THRESHOLD_SCALE) {
            match raw.trim().parse::<f64>() {
                Ok(scale) if is_valid_scale(scale) => config.threshold_scale = scale,
                _ => tracing::warn!(
                    value = %raw,
                    "ignoring {ENV_THRESHOLD_SCALE}: expected a positive finite number"
                ),
            }
        }
        if let Some(path) = env::var_os(ENV_REPORT).filter(|p| !p.is_empty()) {
            config.report_path = Some(PathBuf::from(path));
        }
        config.color = env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();

        config
    }

    /// Override the threshold multiplier. Non-positive or non-finite values are ignored.
    pub fn threshold_scale(mut self, scale: f64) -> Self {
        if is_valid_scale(scale) {
            self.threshold_scale = scale;
        } else {
            tracing::warn!(scale, "ignoring invalid threshold scale");
        }
        self
    }

    /// Set the report path.
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Enable or disable coloured messages.
    pub fn color(mut self, yes: bool) -> Self {
        self.color = yes;
        self
    }

    /// Apply the configured scale to a threshold.
    pub(crate) fn scaled(&self, threshold_ms: f64) -> f64 {
        threshold_ms * self.threshold_scale
    }
}

fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}
