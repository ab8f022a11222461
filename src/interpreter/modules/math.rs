use std::f64::consts;

use crate::{
    ast::Location,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        modules::{VAR, constant, register},
        scope::ScopeRef,
        value::core::{Handle, Value},
    },
};

native_functions! {
    "abs"   => { params: &[VAR],      func: abs },
    "sqrt"  => { params: &[VAR],      func: sqrt },
    "floor" => { params: &[VAR],      func: floor },
    "ceil"  => { params: &[VAR],      func: ceil },
    "round" => { params: &[VAR],      func: round },
    "sin"   => { params: &[VAR],      func: sin },
    "cos"   => { params: &[VAR],      func: cos },
    "tan"   => { params: &[VAR],      func: tan },
    "ln"    => { params: &[VAR],      func: ln },
    "pow"   => { params: &[VAR, VAR], func: pow },
    "min"   => { params: &[VAR, VAR], func: min },
    "max"   => { params: &[VAR, VAR], func: max },
}

/// Registers the math functions and the constants `PI` and `E`.
pub fn load(scope: &ScopeRef) -> EvalResult<()> {
    register(scope, NATIVES)?;
    constant(scope, "PI", Value::Float(consts::PI))?;
    constant(scope, "E", Value::Float(consts::E))
}

/// Applies a float function to one numeric argument.
///
/// Integers are converted to floats first; the result is always a float.
macro_rules! float_native {
    ($fname:ident, $float_fn:ident) => {
        fn $fname(args: &[Handle], location: Location) -> EvalResult<Value> {
            Ok(Value::Float(args[0].borrow().as_float(location)?.$float_fn()))
        }
    };
}

float_native!(sin, sin);
float_native!(cos, cos);
float_native!(tan, tan);

/// Rounds a float with `$float_fn`; integers are returned unchanged.
macro_rules! rounding_native {
    ($fname:ident, $float_fn:ident) => {
        fn $fname(args: &[Handle], location: Location) -> EvalResult<Value> {
            match &*args[0].borrow() {
                Value::Integer(n) => Ok(Value::Integer(*n)),
                other => Ok(Value::Float(other.as_float(location)?.$float_fn())),
            }
        }
    };
}

rounding_native!(floor, floor);
rounding_native!(ceil, ceil);
rounding_native!(round, round);

fn abs(args: &[Handle], location: Location) -> EvalResult<Value> {
    match &*args[0].borrow() {
        Value::Integer(n) => n.checked_abs()
                              .map(Value::Integer)
                              .ok_or(RuntimeError::Overflow { location }),
        other => Ok(Value::Float(other.as_float(location)?.abs())),
    }
}

fn sqrt(args: &[Handle], location: Location) -> EvalResult<Value> {
    let value = args[0].borrow().as_float(location)?;
    if value < 0.0 {
        return Err(RuntimeError::InvalidArgument { details: format!("cannot take the square root of {value}"),
                                                   location });
    }
    Ok(Value::Float(value.sqrt()))
}

fn ln(args: &[Handle], location: Location) -> EvalResult<Value> {
    let value = args[0].borrow().as_float(location)?;
    if value <= 0.0 {
        return Err(RuntimeError::InvalidArgument { details: format!("logarithm of non-positive value {value}"),
                                                   location });
    }
    Ok(Value::Float(value.ln()))
}

/// Raises the first argument to the power of the second.
///
/// An integer base with a non-negative integer exponent stays an integer and
/// is overflow-checked; every other combination is computed in floats.
fn pow(args: &[Handle], location: Location) -> EvalResult<Value> {
    let base = args[0].borrow();
    let exponent = args[1].borrow();

    if let (Value::Integer(base), Value::Integer(exponent)) = (&*base, &*exponent)
       && *exponent >= 0
    {
        return u32::try_from(*exponent).ok()
                                       .and_then(|exponent| base.checked_pow(exponent))
                                       .map(Value::Integer)
                                       .ok_or(RuntimeError::Overflow { location });
    }

    Ok(Value::Float(base.as_float(location)?.powf(exponent.as_float(location)?)))
}

fn min(args: &[Handle], location: Location) -> EvalResult<Value> {
    min_max(args, location, std::cmp::Ordering::Less)
}

fn max(args: &[Handle], location: Location) -> EvalResult<Value> {
    min_max(args, location, std::cmp::Ordering::Greater)
}

/// Returns whichever argument compares as `wanted` against the other,
/// preferring the first on ties. Two integers give an integer, any float
/// makes the result a float.
fn min_max(args: &[Handle], location: Location, wanted: std::cmp::Ordering) -> EvalResult<Value> {
    let left = args[0].borrow();
    let right = args[1].borrow();

    if let (Value::Integer(a), Value::Integer(b)) = (&*left, &*right) {
        let pick = if b.cmp(a) == wanted { b } else { a };
        return Ok(Value::Integer(*pick));
    }

    let a = left.as_float(location)?;
    let b = right.as_float(location)?;
    let pick = if b.partial_cmp(&a) == Some(wanted) { b } else { a };
    Ok(Value::Float(pick))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(values: Vec<Value>) -> Vec<Handle> {
        values.into_iter().map(Value::into_handle).collect()
    }

    #[test]
    fn integer_power_stays_integer() {
        let result = pow(&handles(vec![Value::Integer(3), Value::Integer(4)]), Location::default()).unwrap();
        assert!(matches!(result, Value::Integer(81)));
    }

    #[test]
    fn negative_exponent_computes_in_floats() {
        let result = pow(&handles(vec![Value::Integer(2), Value::Integer(-1)]), Location::default()).unwrap();
        assert!(matches!(result, Value::Float(f) if (f - 0.5).abs() < f64::EPSILON));
    }

    #[test]
    fn integer_power_overflow_is_reported() {
        let result = pow(&handles(vec![Value::Integer(10), Value::Integer(40)]), Location::default());
        assert!(matches!(result, Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn min_max_keep_integers() {
        let args = handles(vec![Value::Integer(3), Value::Integer(7)]);
        assert!(matches!(min(&args, Location::default()).unwrap(), Value::Integer(3)));
        assert!(matches!(max(&args, Location::default()).unwrap(), Value::Integer(7)));

        let mixed = handles(vec![Value::Integer(3), Value::Float(2.5)]);
        assert!(matches!(min(&mixed, Location::default()).unwrap(), Value::Float(f) if (f - 2.5).abs() < f64::EPSILON));
    }

    #[test]
    fn sqrt_rejects_negative_numbers() {
        let result = sqrt(&handles(vec![Value::Integer(-4)]), Location::default());
        assert!(matches!(result, Err(RuntimeError::InvalidArgument { .. })));
    }
}
