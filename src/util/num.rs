use crate::{ast::Location, error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Converts a length or position to a script integer.
///
/// ## Errors
/// `Overflow` if the value does not fit in an `i64`.
///
/// ## Example
/// ```
/// use wio::{ast::Location, util::num::usize_to_i64_checked};
///
/// assert_eq!(usize_to_i64_checked(42, Location::default()).unwrap(), 42);
/// ```
pub fn usize_to_i64_checked(value: usize, location: Location) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::Overflow { location })
}

/// Resolves a possibly negative index against a collection of `size`
/// elements. Negative indices count from the end.
///
/// ## Errors
/// `IndexOutOfBounds` unless `-size <= index < size`.
///
/// ## Example
/// ```
/// use wio::{ast::Location, error::RuntimeError, util::num::normalize_index};
///
/// assert_eq!(normalize_index(-1, 3, Location::default()).unwrap(), 2);
/// assert_eq!(normalize_index(0, 3, Location::default()).unwrap(), 0);
///
/// let error = normalize_index(3, 3, Location::new(4, 2)).unwrap_err();
/// assert!(matches!(error, RuntimeError::IndexOutOfBounds { index: 3, size: 3, .. }));
/// assert!(normalize_index(-4, 3, Location::default()).is_err());
/// ```
pub fn normalize_index(index: i64, size: usize, location: Location) -> EvalResult<usize> {
    let out_of_bounds = || RuntimeError::IndexOutOfBounds { index,
                                                            size,
                                                            location };

    let size_signed = usize_to_i64_checked(size, location)?;
    let resolved = if index < 0 { size_signed + index } else { index };

    if resolved < 0 || resolved >= size_signed {
        return Err(out_of_bounds());
    }
    usize::try_from(resolved).map_err(|_| out_of_bounds())
}

/// Safely converts an `f64` to `i64`, truncating toward zero.
///
/// ## Errors
/// - `InvalidArgument` for NaN and infinities.
/// - `Overflow` if the truncated value is outside the `i64` range.
///
/// ## Example
/// ```
/// use wio::{ast::Location, error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(-2.7, Location::default()).unwrap(), -2);
///
/// let error = f64_to_i64_checked(1e20, Location::default()).unwrap_err();
/// assert!(matches!(error, RuntimeError::Overflow { .. }));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, location: Location) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::InvalidArgument { details: format!("cannot convert {value} to int"),
                                                   location });
    }

    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which itself is out of range.
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(RuntimeError::Overflow { location });
    }

    Ok(truncated as i64)
}
