use std::{mem, rc::Rc};

use tracing::trace;

use crate::{
    ast::{Expr, Location, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        scope::{Scope, ScopeKind, Symbol, SymbolKind},
        value::{
            core::{Handle, Value, deep_clone_handle},
            function::{FunctionValue, Overload, OverloadBody},
        },
    },
};

/// An evaluated call argument.
#[derive(Debug, Clone)]
pub struct Argument {
    /// The argument's storage; a temporary unless the argument expression
    /// was addressable.
    pub handle:      Handle,
    /// The storage is constant.
    pub is_const:    bool,
    /// The argument expression denotes storage and may bind to a `ref`
    /// parameter.
    pub addressable: bool,
}

impl Context {
    /// Evaluates a call expression.
    ///
    /// The callee must evaluate to a function. Arguments are evaluated left
    /// to right before the overload is selected.
    ///
    /// # Parameters
    /// - `callee`: The called expression.
    /// - `arguments`: Argument expressions.
    /// - `location`: Source location for error reporting.
    ///
    /// # Returns
    /// The value returned by the function, `null` if it returned nothing.
    pub fn eval_call(&mut self, callee: &Expr, arguments: &[Expr], location: Location) -> EvalResult<Value> {
        let function = match self.eval(callee)? {
            Value::Function(function) => function,
            other => {
                return Err(RuntimeError::NotCallable { found: other.type_name().to_string(),
                                                       location });
            },
        };

        let arguments = self.eval_arguments(arguments)?;
        self.call_function(&function, &arguments, location)
    }

    /// Evaluates call arguments, keeping the storage of addressable ones.
    pub fn eval_arguments(&mut self, arguments: &[Expr]) -> EvalResult<Vec<Argument>> {
        arguments.iter()
                 .map(|expr| {
                     let place = self.eval_place(expr)?;
                     Ok(Argument { handle:      place.handle,
                                   is_const:    place.is_const,
                                   addressable: expr.is_addressable(), })
                 })
                 .collect()
    }

    /// Selects the overload of `function` matching the argument kinds and
    /// calls it.
    pub fn call_function(&mut self,
                         function: &FunctionValue,
                         arguments: &[Argument],
                         location: Location)
                         -> EvalResult<Value> {
        let kinds = arguments.iter()
                             .map(|argument| argument.handle.borrow().type_kind())
                             .collect::<Vec<_>>();
        let overload = function.resolve(&kinds, location)?;

        trace!(function = %function.name, signature = %overload.signature(), "selected overload");
        self.call_overload(&function.name, &overload, arguments, location)
    }

    /// Calls one overload with already evaluated arguments.
    ///
    /// # Errors
    /// - `InvalidArgument` if a `ref` parameter receives a temporary.
    /// - `ConstModification` if a `ref` parameter receives constant storage.
    /// - `UndefinedOverload` for a forward declaration.
    /// - Any error raised by the body.
    pub fn call_overload(&mut self,
                         name: &str,
                         overload: &Overload,
                         arguments: &[Argument],
                         location: Location)
                         -> EvalResult<Value> {
        let handles = Self::bind_arguments(name, overload, arguments, location)?;

        match &overload.body {
            OverloadBody::Native(native) => native(&handles, location),
            OverloadBody::Script(body) => self.run_script(overload, body, handles, location),
            OverloadBody::Forward => {
                Err(RuntimeError::UndefinedOverload { name: name.to_string(),
                                                      signature: overload.signature(),
                                                      location })
            },
        }
    }

    /// Produces the storage each parameter is bound to: the caller's storage
    /// for `ref` parameters, a private deep copy otherwise.
    fn bind_arguments(name: &str,
                      overload: &Overload,
                      arguments: &[Argument],
                      location: Location)
                      -> EvalResult<Vec<Handle>> {
        overload.params
                .iter()
                .zip(arguments)
                .enumerate()
                .map(|(position, (param, argument))| {
                    if !param.by_ref {
                        return Ok(deep_clone_handle(&argument.handle));
                    }
                    if !argument.addressable {
                        return Err(RuntimeError::InvalidArgument { details: format!("argument {} of '{name}' binds to ref parameter '{}' and must be a variable, element or member",
                                                                                    position + 1,
                                                                                    param.name),
                                                                   location });
                    }
                    if argument.is_const {
                        return Err(RuntimeError::ConstModification { name: param.name.clone(),
                                                                     location });
                    }
                    Ok(Rc::clone(&argument.handle))
                })
                .collect()
    }

    /// Runs a script body.
    ///
    /// Parameters live in a function scope whose parent is the closure; the
    /// statements run in a function-body scope below it. Loops of the caller
    /// do not extend into the callee.
    fn run_script(&mut self,
                  overload: &Overload,
                  body: &[Statement],
                  handles: Vec<Handle>,
                  location: Location)
                  -> EvalResult<Value> {
        let params = Scope::new(ScopeKind::Function, Some(Rc::clone(&overload.closure)));
        {
            let mut scope = params.borrow_mut();
            for (param, handle) in overload.params.iter().zip(handles) {
                let mut symbol = Symbol::new(&param.name, SymbolKind::Variable(param.kind));
                symbol.is_ref = param.by_ref;
                symbol.value = Some(handle);
                scope.insert(symbol, param.location)?;
            }
        }

        let saved_loops = mem::take(&mut self.loop_depth);
        self.function_depth += 1;
        self.unit_stack.push(overload.unit.clone());

        let flow = self.within(Rc::clone(&params), |ctx| {
                           ctx.with_scope(ScopeKind::FunctionBody, |ctx| ctx.exec_statements(body))
                       });

        self.unit_stack.pop();
        self.function_depth -= 1;
        self.loop_depth = saved_loops;

        let value = match flow? {
            Flow::Return(value) => value,
            Flow::Normal => Value::Null,
            Flow::Break => {
                return Err(RuntimeError::LoopControlOutsideLoop { keyword: "break",
                                                                  location });
            },
            Flow::Continue => {
                return Err(RuntimeError::LoopControlOutsideLoop { keyword: "continue",
                                                                  location });
            },
        };

        self.destroy_scope(&params)?;
        Ok(value)
    }
}
