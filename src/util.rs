/// Numeric conversion helpers.
///
/// This module provides checked conversions between `i64`, `usize` and
/// `f64`, and the index normalization shared by arrays and strings. All
/// functions return a `Result` that is `Ok` only if the conversion is exact
/// and in range.
pub mod num;
