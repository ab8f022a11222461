use crate::{
    ast::{BinaryOperator, Expr, Location},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary expression.
    ///
    /// `&&` and `||` short-circuit: the right operand is only evaluated when
    /// the left one does not decide the result. Every other operator
    /// evaluates both operands, left first.
    pub fn eval_binary_expr(&mut self,
                            left: &Expr,
                            op: BinaryOperator,
                            right: &Expr,
                            location: Location)
                            -> EvalResult<Value> {
        let left = self.eval(left)?;

        match op {
            BinaryOperator::And if !left.as_bool(location)? => Ok(Value::Bool(false)),
            BinaryOperator::Or if left.as_bool(location)? => Ok(Value::Bool(true)),
            _ => {
                let right = self.eval(right)?;
                Self::eval_binary(op, &left, &right, location)
            },
        }
    }

    /// Evaluates a binary operation between two values.
    ///
    /// This function routes the operation to specialized handlers depending on
    /// the operator and operand types. `+` with a string on either side
    /// concatenates, stringifying the other operand if it is a number or a
    /// character. Arithmetic, shift and bitwise operators go to
    /// `eval_scalar_op`, comparisons to `eval_comparison` and logical
    /// operators to `eval_logic`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `location`: Source location for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use wio::{
    ///     ast::{BinaryOperator, Location},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let location = Location::new(1, 1);
    ///
    /// let sum = Context::eval_binary(BinaryOperator::Add,
    ///                                &Value::Integer(1),
    ///                                &Value::Float(1.0),
    ///                                location).unwrap();
    /// assert!(matches!(sum, Value::Float(r) if r == 2.0));
    ///
    /// let text = Context::eval_binary(BinaryOperator::Add,
    ///                                 &Value::from("a"),
    ///                                 &Value::Integer(1),
    ///                                 location).unwrap();
    /// assert_eq!(text.to_string(), "a1");
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       location: Location)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, BitAnd, BitOr, BitXor, Div, Equal, Greater, GreaterEqual, Less, LessEqual,
            Mod, Mul, NotEqual, Or, ShiftLeft, ShiftRight, Sub, Xor,
        };

        match op {
            Add => match (left, right) {
                (Value::String(_), Value::String(_) | Value::Integer(_) | Value::Float(_) | Value::Char(_))
                | (Value::Integer(_) | Value::Float(_) | Value::Char(_), Value::String(_)) => {
                    Ok(Value::String(format!("{left}{right}")))
                },
                _ => Self::eval_scalar_op(op, left, right, location),
            },

            Sub | Mul | Div | Mod | ShiftLeft | ShiftRight | BitAnd | BitOr | BitXor => {
                Self::eval_scalar_op(op, left, right, location)
            },

            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, left, right, location)
            },

            And | Xor | Or => Self::eval_logic(op, left, right, location),
        }
    }
}

/// Builds the error for an operator that does not accept its operands.
#[must_use]
pub fn operand_mismatch(op: BinaryOperator, left: &Value, right: &Value, location: Location) -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("cannot apply '{op}' to {} and {}",
                                                  left.type_name(),
                                                  right.type_name()),
                                 location }
}
