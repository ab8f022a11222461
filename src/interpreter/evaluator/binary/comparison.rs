use std::{cmp::Ordering, rc::Rc};

use crate::{
    ast::{BinaryOperator, Location},
    interpreter::{
        evaluator::{
            binary::core::operand_mismatch,
            core::{Context, EvalResult},
        },
        value::core::Value,
    },
};

/// Maps an equality-style operator and a boolean equality result
/// to the final boolean value.
#[must_use]
pub const fn equality_op_result(op: BinaryOperator, is_equal: bool) -> bool {
    match op {
        BinaryOperator::NotEqual => !is_equal,
        _ => is_equal,
    }
}

impl Context {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// Integers and floats compare numerically with promotion. Strings and
    /// characters compare lexicographically. Other kinds only support `==`
    /// and `!=` against the same kind: collections compare element-wise,
    /// declarations and instances by identity. `null` may be compared for
    /// equality with anything.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    /// - `location`: Source location used for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean result.
    ///
    /// # Example
    /// ```
    /// use wio::{
    ///     ast::{BinaryOperator, Location},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less,
    ///                                       &Value::Integer(3),
    ///                                       &Value::Float(3.5),
    ///                                       Location::new(1, 1));
    ///
    /// assert!(matches!(result.unwrap(), Value::Bool(true)));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           location: Location)
                           -> EvalResult<Value> {
        Ok(Value::Bool(match op {
                           BinaryOperator::Equal | BinaryOperator::NotEqual => {
                               let equality = values_equal(left, right).ok_or_else(|| {
                                                                          operand_mismatch(op, left, right, location)
                                                                      })?;
                               equality_op_result(op, equality)
                           },

                           _ => {
                               let ordering = compare_ordered(left, right).ok_or_else(|| {
                                                                              operand_mismatch(op, left, right, location)
                                                                          })?;
                               match op {
                                   BinaryOperator::Less => ordering == Ordering::Less,
                                   BinaryOperator::Greater => ordering == Ordering::Greater,
                                   BinaryOperator::LessEqual => ordering != Ordering::Greater,
                                   _ => ordering != Ordering::Less,
                               }
                           },
                       }))
    }
}

/// Orders two scalars. Returns `None` if the kinds cannot be ordered against
/// each other or a float comparison involves NaN.
#[allow(clippy::cast_precision_loss)]
fn compare_ordered(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Structural equality. Returns `None` if the two kinds cannot be compared.
pub fn values_equal(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Null, other) | (other, Value::Null) => Some(other.is_null()),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            compare_ordered(left, right).map(|ordering| ordering == Ordering::Equal)
                                        .or(Some(false))
        },
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        (Value::Char(a), Value::Char(b)) => Some(a == b),
        (Value::String(a), Value::String(b)) => Some(a == b),
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(false);
            }
            a.iter().zip(b).try_fold(true, |equal, (x, y)| {
                                   Some(equal && values_equal(&x.borrow(), &y.borrow())?)
                               })
        },
        (Value::Dict(a), Value::Dict(b)) => {
            if a.len() != b.len() {
                return Some(false);
            }
            a.iter().try_fold(true, |equal, (key, x)| match b.get(key) {
                                  Some(y) => Some(equal && values_equal(&x.borrow(), &y.borrow())?),
                                  None => Some(false),
                              })
        },
        (Value::Function(a), Value::Function(b)) => {
            Some(a.overloads.len() == b.overloads.len()
                 && a.overloads
                     .iter()
                     .zip(&b.overloads)
                     .all(|(x, y)| Rc::ptr_eq(x, y)))
        },
        (Value::Enum(a), Value::Enum(b)) => Some(Rc::ptr_eq(a, b)),
        (Value::Unit(a), Value::Unit(b)) => Some(Rc::ptr_eq(a, b)),
        (Value::Instance(a), Value::Instance(b)) => Some(Rc::ptr_eq(&a.scope, &b.scope)),
        (Value::Realm(a), Value::Realm(b)) => Some(Rc::ptr_eq(a, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_numbers_compare_numerically() {
        assert_eq!(values_equal(&Value::Integer(2), &Value::Float(2.0)), Some(true));
        assert_eq!(values_equal(&Value::Float(f64::NAN), &Value::Float(f64::NAN)), Some(false));
    }

    #[test]
    fn arrays_compare_element_wise() {
        let a = Value::from(vec![Value::Integer(1), Value::from("x")]);
        let b = Value::from(vec![Value::Integer(1), Value::from("x")]);
        let c = Value::from(vec![Value::Integer(1)]);

        assert_eq!(values_equal(&a, &b), Some(true));
        assert_eq!(values_equal(&a, &c), Some(false));
    }

    #[test]
    fn unrelated_kinds_are_not_comparable() {
        assert_eq!(values_equal(&Value::Integer(1), &Value::from("1")), None);
        assert_eq!(values_equal(&Value::Bool(true), &Value::Null), Some(false));
    }
}
