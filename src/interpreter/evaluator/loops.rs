use std::rc::Rc;

use crate::{
    ast::{BindingKind, Expr, Location, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        scope::{Scope, ScopeKind, Symbol, SymbolKind},
        value::core::{Handle, Value, deep_clone_handle},
    },
    util::num::usize_to_i64_checked,
};

/// What a loop does after one iteration.
enum Step {
    Next,
    Exit(Flow),
}

impl Step {
    /// Interprets the signal an iteration finished with.
    fn after(flow: Flow) -> Self {
        match flow {
            Flow::Normal | Flow::Continue => Self::Next,
            Flow::Break => Self::Exit(Flow::Normal),
            Flow::Return(value) => Self::Exit(Flow::Return(value)),
        }
    }
}

impl Context {
    /// Evaluates a `while` statement.
    ///
    /// The condition must evaluate to a boolean before every iteration. Each
    /// iteration runs in a fresh block scope.
    pub fn exec_while(&mut self, condition: &Expr, body: &Statement) -> EvalResult<Flow> {
        self.in_loop(|ctx| {
                while ctx.eval(condition)?.as_bool(condition.location())? {
                    if let Step::Exit(flow) = Step::after(ctx.iteration(body, |_| Ok(()))?) {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            })
    }

    /// Evaluates a `for` statement.
    ///
    /// The initializer runs once in a scope enclosing the whole loop, so a
    /// variable declared there is visible to the condition, the step and the
    /// body. A missing condition counts as `true`.
    pub fn exec_for(&mut self,
                    init: Option<&Statement>,
                    condition: Option<&Expr>,
                    step: Option<&Expr>,
                    body: &Statement)
                    -> EvalResult<Flow> {
        self.with_scope(ScopeKind::Local, |ctx| {
                if let Some(init) = init {
                    ctx.exec(init)?;
                }

                ctx.in_loop(|ctx| {
                       loop {
                           if let Some(condition) = condition
                              && !ctx.eval(condition)?.as_bool(condition.location())?
                           {
                               return Ok(Flow::Normal);
                           }

                           if let Step::Exit(flow) = Step::after(ctx.iteration(body, |_| Ok(()))?) {
                               return Ok(flow);
                           }

                           if let Some(step) = step {
                               ctx.eval(step)?;
                           }
                       }
                   })
            })
    }

    /// Evaluates a `foreach` statement.
    ///
    /// Arrays yield their elements with the index as key, dictionaries their
    /// values with the key string as key, strings their characters. The
    /// collection is snapshotted before the first iteration.
    ///
    /// The item variable holds a private copy unless the loop was written
    /// with `ref`, in which case it aliases the element.
    pub fn exec_foreach(&mut self,
                        key: Option<&str>,
                        item: &str,
                        by_ref: bool,
                        iterable: &Expr,
                        body: &Statement,
                        location: Location)
                        -> EvalResult<Flow> {
        let collection = self.eval_place(iterable)?;
        let entries = Self::snapshot(&collection.handle, by_ref, location)?;

        self.in_loop(|ctx| {
                for (index, element) in entries {
                    let bind = |scope: &mut Scope| -> EvalResult<()> {
                        if let Some(key) = key {
                            let mut symbol = Symbol::new(key, SymbolKind::Variable(BindingKind::Var));
                            symbol.value = Some(index.into_handle());
                            scope.insert(symbol, location)?;
                        }

                        let mut symbol = Symbol::new(item, SymbolKind::Variable(BindingKind::Omni));
                        symbol.is_ref = by_ref;
                        symbol.is_const = by_ref && collection.is_const;
                        symbol.value = Some(if by_ref { element } else { deep_clone_handle(&element) });
                        scope.insert(symbol, location)
                    };

                    if let Step::Exit(flow) = Step::after(ctx.iteration(body, bind)?) {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            })
    }

    /// Pairs every element of a collection with its key.
    fn snapshot(collection: &Handle, by_ref: bool, location: Location) -> EvalResult<Vec<(Value, Handle)>> {
        match &*collection.borrow() {
            Value::Array(elements) => {
                elements.iter()
                        .enumerate()
                        .map(|(index, element)| {
                            Ok((Value::Integer(usize_to_i64_checked(index, location)?), Rc::clone(element)))
                        })
                        .collect()
            },
            Value::Dict(entries) => {
                Ok(entries.iter()
                          .map(|(key, value)| (Value::from(key.as_str()), Rc::clone(value)))
                          .collect())
            },
            Value::String(_) if by_ref => {
                Err(RuntimeError::InvalidArgument { details: "characters of a string cannot be iterated by reference".to_string(),
                                                    location })
            },
            Value::String(text) => {
                text.chars()
                    .enumerate()
                    .map(|(index, character)| {
                        Ok((Value::Integer(usize_to_i64_checked(index, location)?),
                            Value::Char(character).into_handle()))
                    })
                    .collect()
            },
            other => {
                Err(RuntimeError::TypeMismatch { details: format!("cannot iterate over a value of type {}",
                                                                  other.type_name()),
                                                 location })
            },
        }
    }

    /// Runs one iteration in a fresh block scope prepared by `bind`.
    ///
    /// A block body shares the iteration scope instead of opening another.
    fn iteration(&mut self,
                 body: &Statement,
                 bind: impl FnOnce(&mut Scope) -> EvalResult<()>)
                 -> EvalResult<Flow> {
        self.with_scope(ScopeKind::Block, |ctx| {
                bind(&mut ctx.scope.borrow_mut())?;
                match body {
                    Statement::Block { statements, .. } => ctx.exec_statements(statements),
                    other => ctx.exec(other),
                }
            })
    }

    /// Runs `body` with the loop depth raised by one.
    fn in_loop(&mut self, body: impl FnOnce(&mut Self) -> EvalResult<Flow>) -> EvalResult<Flow> {
        self.loop_depth += 1;
        let result = body(self);
        self.loop_depth -= 1;
        result
    }
}
