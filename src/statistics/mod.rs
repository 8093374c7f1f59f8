//! Statistical helpers for timing assertions.
//!
//! Only a single percentile function is provided; it is what the quantile
//! matchers aggregate repeated measurements with.

mod quantile;

pub use quantile::{calc_quantile, quantile_sorted, QuantileError};
