use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    ast::{Expr, Param, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::Value,
            function::{FunctionValue, Overload, OverloadBody},
        },
    },
};

/// Name given to functions created by a lambda expression.
pub const LAMBDA_NAME: &str = "lambda";

impl Context {
    /// Evaluates an array literal.
    ///
    /// Every element is evaluated eagerly, left to right, and stored as a
    /// private copy.
    ///
    /// # Example
    /// ```
    /// use wio::{
    ///     ast::{Expr, LiteralValue, Location},
    ///     interpreter::{
    ///         evaluator::core::Context,
    ///         session::{RunOptions, Session},
    ///     },
    /// };
    ///
    /// let mut context = Context::new(Session::new(RunOptions::default())).unwrap();
    /// let elements = vec![Expr::Literal { value:    LiteralValue::Integer(1),
    ///                                     location: Location::new(1, 2), },
    ///                     Expr::Literal { value:    LiteralValue::from("b"),
    ///                                     location: Location::new(1, 5), }];
    ///
    /// let array = context.eval_array_literal(&elements).unwrap();
    /// assert_eq!(array.to_string(), r#"[1, "b"]"#);
    /// ```
    pub fn eval_array_literal(&mut self, elements: &[Expr]) -> EvalResult<Value> {
        let elements = elements.iter()
                               .map(|element| Ok(self.eval(element)?.deep_clone().into_handle()))
                               .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::Array(elements))
    }

    /// Evaluates a dictionary literal.
    ///
    /// Keys are canonicalized; a key that appears twice is an error.
    pub fn eval_dictionary_literal(&mut self, entries: &[(Expr, Expr)]) -> EvalResult<Value> {
        let mut dict = IndexMap::with_capacity(entries.len());

        for (key_expr, value_expr) in entries {
            let key = self.eval(key_expr)?.dict_key(key_expr.location())?;
            if dict.contains_key(&key) {
                return Err(RuntimeError::DuplicateKey { key,
                                                        location: key_expr.location() });
            }
            let value = self.eval(value_expr)?.deep_clone();
            dict.insert(key, value.into_handle());
        }

        Ok(Value::Dict(dict))
    }

    /// Creates the function value of a lambda expression.
    ///
    /// The lambda closes over the current scope and over the unit whose code
    /// is executing.
    #[must_use]
    pub fn make_lambda(&self, params: &Rc<[Param]>, body: &Rc<[Statement]>) -> Value {
        Value::Function(FunctionValue::new(LAMBDA_NAME,
                                           Overload { params:  Rc::clone(params),
                                                      body:    OverloadBody::Script(Rc::clone(body)),
                                                      closure: Rc::clone(&self.scope),
                                                      unit:    self.current_unit().cloned(), }))
    }
}
