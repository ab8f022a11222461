use crate::{
    ast::{BinaryOperator, Location},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::operand_mismatch,
            core::{Context, EvalResult},
        },
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a scalar arithmetic, shift or bitwise operation.
    ///
    /// Integer arithmetic is checked: results that do not fit in an `i64`
    /// raise `Overflow`. A float on either side promotes the other operand.
    /// Division and modulo by an exact zero are errors for both integers and
    /// floats. Shifts and bitwise operators only accept integers, and a left
    /// shift that drops set bits is an `Overflow` as well.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `location`: Source location for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the computed scalar.
    ///
    /// # Example
    /// ```
    /// use wio::{
    ///     ast::{BinaryOperator, Location},
    ///     error::RuntimeError,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let location = Location::new(1, 1);
    ///
    /// let result = Context::eval_scalar_op(BinaryOperator::Mul,
    ///                                      &Value::Float(1.5),
    ///                                      &Value::Integer(2),
    ///                                      location).unwrap();
    /// assert!(matches!(result, Value::Float(r) if r == 3.0));
    ///
    /// let error = Context::eval_scalar_op(BinaryOperator::Mod,
    ///                                     &Value::Integer(5),
    ///                                     &Value::Integer(0),
    ///                                     location).unwrap_err();
    /// assert!(matches!(error, RuntimeError::DivisionByZero { .. }));
    /// ```
    pub fn eval_scalar_op(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          location: Location)
                          -> EvalResult<Value> {
        use Value::{Float, Integer};

        match (left, right) {
            (Integer(a), Integer(b)) => Self::eval_integer_op(op, *a, *b, location).map(Integer),
            (Float(_), Integer(_) | Float(_)) | (Integer(_), Float(_)) => {
                let a = left.as_float(location)?;
                let b = right.as_float(location)?;
                Self::eval_float_op(op, a, b, location).ok_or_else(|| operand_mismatch(op, left, right, location))?
                                                       .map(Float)
            },
            _ => Err(operand_mismatch(op, left, right, location)),
        }
    }

    fn eval_integer_op(op: BinaryOperator, a: i64, b: i64, location: Location) -> EvalResult<i64> {
        use BinaryOperator::{Add, BitAnd, BitOr, BitXor, Div, Mod, Mul, ShiftLeft, ShiftRight, Sub};

        let overflow = || RuntimeError::Overflow { location };

        if matches!(op, Div | Mod) && b == 0 {
            return Err(RuntimeError::DivisionByZero { location });
        }

        match op {
            Add => a.checked_add(b).ok_or_else(overflow),
            Sub => a.checked_sub(b).ok_or_else(overflow),
            Mul => a.checked_mul(b).ok_or_else(overflow),
            Div => a.checked_div(b).ok_or_else(overflow),
            Mod => a.checked_rem(b).ok_or_else(overflow),
            ShiftLeft | ShiftRight => {
                let amount = u32::try_from(b).map_err(|_| {
                                                 RuntimeError::InvalidArgument { details: format!("shift amount {b} is negative"),
                                                                                 location }
                                             })?;
                let shifted = if op == ShiftLeft {
                    a.checked_shl(amount).filter(|shifted| shifted >> amount == a)
                } else {
                    a.checked_shr(amount)
                };
                shifted.ok_or_else(overflow)
            },
            BitAnd => Ok(a & b),
            BitOr => Ok(a | b),
            BitXor => Ok(a ^ b),
            _ => Err(operand_mismatch(op, &Value::Integer(a), &Value::Integer(b), location)),
        }
    }

    /// Returns `None` for operators that are not defined on floats.
    fn eval_float_op(op: BinaryOperator, a: f64, b: f64, location: Location) -> Option<EvalResult<f64>> {
        use BinaryOperator::{Add, Div, Mod, Mul, Sub};

        if matches!(op, Div | Mod) && b == 0.0 {
            return Some(Err(RuntimeError::DivisionByZero { location }));
        }

        Some(Ok(match op {
                    Add => a + b,
                    Sub => a - b,
                    Mul => a * b,
                    Div => a / b,
                    Mod => a % b,
                    _ => return None,
                }))
    }
}
