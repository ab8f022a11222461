use crate::{
    ast::{BinaryOperator, Location},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a logical operation between two boolean values.
    ///
    /// The operands are converted to booleans using `as_bool`.
    /// Supported operators are logical AND, XOR and OR.
    ///
    /// # Parameters
    /// - `op`: The logical operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `location`: Source location for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean.
    ///
    /// # Example
    /// ```
    /// use wio::{
    ///     ast::{BinaryOperator, Location},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Value::Bool(true);
    /// let b = Value::Bool(false);
    ///
    /// let result = Context::eval_logic(BinaryOperator::Xor, &a, &b, Location::new(1, 1));
    /// assert!(matches!(result.unwrap(), Value::Bool(true)));
    ///
    /// let result = Context::eval_logic(BinaryOperator::And, &a, &Value::Integer(1), Location::new(1, 1));
    /// assert!(result.is_err());
    /// ```
    pub fn eval_logic(op: BinaryOperator,
                      left: &Value,
                      right: &Value,
                      location: Location)
                      -> EvalResult<Value> {
        let left = left.as_bool(location)?;
        let right = right.as_bool(location)?;

        Ok(Value::Bool(match op {
                           BinaryOperator::And => left && right,
                           BinaryOperator::Or => left || right,
                           _ => left ^ right,
                       }))
    }
}
