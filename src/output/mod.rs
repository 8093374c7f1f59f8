//! Output formatting for verdicts.
//!
//! - `terminal`: verdict messages with optional ANSI colour
//! - `json`: serialization and JSON-lines reports

mod json;
mod terminal;

pub use json::{append_report, to_json, to_json_pretty, ReportError};
pub use terminal::{
    format_durations, format_expected, format_measurement, format_quantile_run,
    format_received, format_single_run,
};
