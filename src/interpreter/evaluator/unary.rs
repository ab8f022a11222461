use crate::{
    ast::{Expr, Location, PostfixOperator, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a prefix expression.
    ///
    /// `++x` and `--x` update the storage of `x` and yield the new value; all
    /// other operators work on the operand's value.
    pub fn eval_unary_expr(&mut self, op: UnaryOperator, expr: &Expr, location: Location) -> EvalResult<Value> {
        match op {
            UnaryOperator::Increment => self.step_in_place(expr, 1, location).map(|(_, new)| new),
            UnaryOperator::Decrement => self.step_in_place(expr, -1, location).map(|(_, new)| new),
            _ => {
                let value = self.eval(expr)?;
                Self::eval_unary(op, &value, location)
            },
        }
    }

    /// Evaluates `x++` or `x--`, yielding the value before the update.
    pub fn eval_postfix(&mut self, op: PostfixOperator, expr: &Expr, location: Location) -> EvalResult<Value> {
        let delta = match op {
            PostfixOperator::Increment => 1,
            PostfixOperator::Decrement => -1,
        };
        self.step_in_place(expr, delta, location).map(|(old, _)| old)
    }

    /// Adds `delta` to the integer or float stored at `expr`.
    ///
    /// # Returns
    /// The previous and the updated value.
    #[allow(clippy::cast_precision_loss)]
    fn step_in_place(&mut self, expr: &Expr, delta: i64, location: Location) -> EvalResult<(Value, Value)> {
        let place = self.eval_place(expr)?;
        if place.is_const {
            return Err(RuntimeError::ConstModification { name: expr.to_string(),
                                                         location });
        }

        let old = place.read();
        let new = match &old {
            Value::Integer(n) => Value::Integer(n.checked_add(delta)
                                                 .ok_or(RuntimeError::Overflow { location })?),
            Value::Float(r) => Value::Float(r + delta as f64),
            other => {
                return Err(RuntimeError::TypeMismatch { details: format!("cannot increment or decrement {}",
                                                                         other.type_name()),
                                                        location });
            },
        };

        *place.handle.borrow_mut() = new.clone();
        Ok((old, new))
    }

    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: checked numeric negation for integers, negation for floats.
    /// - `Plus`: identity on numbers.
    /// - `Not`: boolean negation.
    /// - `BitNot`: bitwise complement of an integer.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    /// - `location`: Source location for error reporting.
    ///
    /// # Returns
    /// The computed `Value` wrapped in `EvalResult`.
    ///
    /// # Example
    /// ```
    /// use wio::{
    ///     ast::{Location, UnaryOperator},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let location = Location::new(1, 1);
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Integer(5), location).unwrap();
    /// assert!(matches!(v, Value::Integer(-5)));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &Value::Bool(false), location).unwrap();
    /// assert!(matches!(v, Value::Bool(true)));
    ///
    /// assert!(Context::eval_unary(UnaryOperator::Negate, &Value::Integer(i64::MIN), location).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, location: Location) -> EvalResult<Value> {
        match (op, value) {
            (UnaryOperator::Negate, Value::Integer(n)) => {
                n.checked_neg()
                 .map(Value::Integer)
                 .ok_or(RuntimeError::Overflow { location })
            },
            (UnaryOperator::Negate, Value::Float(r)) => Ok(Value::Float(-r)),
            (UnaryOperator::Plus, Value::Integer(_) | Value::Float(_)) => Ok(value.clone()),
            (UnaryOperator::Not, _) => Ok(Value::Bool(!value.as_bool(location)?)),
            (UnaryOperator::BitNot, Value::Integer(n)) => Ok(Value::Integer(!n)),
            _ => {
                Err(RuntimeError::TypeMismatch { details: format!("cannot apply '{op}' to {}", value.type_name()),
                                                 location })
            },
        }
    }
}
