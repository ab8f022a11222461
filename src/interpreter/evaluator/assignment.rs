use crate::{
    ast::{AssignOperator, Expr, Location},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates an assignment and yields the stored value.
    ///
    /// The right-hand side is evaluated first, then the target is resolved.
    /// `=` stores a deep copy of the right-hand value, replacing whatever kind
    /// the target held. Compound operators combine the current value with the
    /// right-hand value through the binary operator table and store the
    /// result in place.
    ///
    /// # Errors
    /// - `ConstModification` if the target is constant.
    /// - Any error of the underlying binary operation.
    pub fn eval_assign(&mut self,
                       target: &Expr,
                       op: AssignOperator,
                       value: &Expr,
                       location: Location)
                       -> EvalResult<Value> {
        let value = self.eval(value)?;
        let place = self.eval_place(target)?;

        if place.is_const {
            return Err(RuntimeError::ConstModification { name: target.to_string(),
                                                         location });
        }

        let result = match op.binary() {
            None => value.deep_clone(),
            Some(binary) => {
                let current = place.read();
                Self::eval_binary(binary, &current, &value, location)?
            },
        };

        *place.handle.borrow_mut() = result.clone();
        Ok(result)
    }
}
