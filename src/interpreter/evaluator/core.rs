use std::{mem, rc::Rc};

use tracing::trace;

use crate::{
    ast::{BindingKind, Expr, Location, Program, Statement},
    error::RuntimeError,
    interpreter::{
        modules,
        scope::{Scope, ScopeKind, ScopeRef, Symbol, SymbolKind, lookup},
        session::Session,
        value::{
            composite::{Instance, UnitIdentity},
            core::{Handle, Value},
        },
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
///
/// Every statement executor returns one of these, and loops and calls consume
/// the signals addressed to them.
#[derive(Debug)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// Leave the innermost loop.
    Break,
    /// Start the next iteration of the innermost loop.
    Continue,
    /// Leave the running function with a value.
    Return(Value),
}

/// Storage denoted by an addressable expression.
#[derive(Debug, Clone)]
pub struct Place {
    /// The storage cell.
    pub handle:   Handle,
    /// Writes through this place are rejected.
    pub is_const: bool,
}

impl Place {
    /// A place holding a temporary that nothing else refers to.
    #[must_use]
    pub fn temporary(value: Value) -> Self {
        Self { handle:   value.into_handle(),
               is_const: false, }
    }

    /// Copies the stored value out.
    #[must_use]
    pub fn read(&self) -> Value {
        self.handle.borrow().clone()
    }
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state for one run: the scope chain, the
/// nesting counters used to validate control flow, the stack of units whose
/// code is executing, and the session with options and the import registry.
///
/// ## Usage
///
/// A `Context` is created once per run. [`Context::run`] executes a parsed
/// program in the global scope; imports evaluate further programs into the
/// same global scope.
pub struct Context {
    /// The innermost scope.
    pub scope:          ScopeRef,
    /// Top-level scope of the program and of imported files.
    pub global:         ScopeRef,
    /// Root scope holding the builtin modules.
    pub builtin:        ScopeRef,
    /// Number of loops enclosing the running statement within the current
    /// function.
    pub loop_depth:     usize,
    /// Number of script function calls in progress.
    pub function_depth: usize,
    /// For every running call, the unit its code belongs to. The top entry is
    /// the identity used for member access checks.
    pub unit_stack:     Vec<Option<Rc<UnitIdentity>>>,
    /// Options and per-run bookkeeping.
    pub session:        Session,
}

impl Context {
    /// Creates a context with fresh builtin and global scopes.
    ///
    /// Unless disabled in the session options, every builtin module is
    /// preloaded. The program arguments are bound to the global array `argv`.
    ///
    /// # Example
    /// ```
    /// use wio::interpreter::{
    ///     evaluator::core::Context,
    ///     session::{RunOptions, Session},
    /// };
    ///
    /// let context = Context::new(Session::new(RunOptions::default())).unwrap();
    /// assert!(context.lookup("println").is_some());
    /// assert!(context.lookup("argv").is_some());
    /// ```
    pub fn new(session: Session) -> EvalResult<Self> {
        let builtin = Scope::new(ScopeKind::Builtin, None);
        let global = Scope::new(ScopeKind::Global, Some(Rc::clone(&builtin)));

        let mut context = Self { scope: Rc::clone(&global),
                                 global,
                                 builtin,
                                 loop_depth: 0,
                                 function_depth: 0,
                                 unit_stack: Vec::new(),
                                 session };

        if !context.session.options.no_builtin {
            for (name, _) in modules::MODULES {
                context.load_module(name, Location::default())?;
            }
        }

        let argv = context.session
                          .options
                          .arguments
                          .iter()
                          .map(|argument| Value::from(argument.as_str()))
                          .collect::<Vec<_>>();
        let mut symbol = Symbol::new("argv", SymbolKind::Variable(BindingKind::Array));
        symbol.value = Some(Value::from(argv).into_handle());
        context.global
               .borrow_mut()
               .insert(symbol, Location::default())?;

        Ok(context)
    }

    /// Executes a program in the global scope.
    ///
    /// # Errors
    /// The first runtime error raised by any statement.
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        let global = Rc::clone(&self.global);
        match self.within(global, |ctx| ctx.exec_statements(&program.statements))? {
            Flow::Normal => Ok(()),
            Flow::Break => {
                Err(RuntimeError::LoopControlOutsideLoop { keyword:  "break",
                                                           location: Location::default(), })
            },
            Flow::Continue => {
                Err(RuntimeError::LoopControlOutsideLoop { keyword:  "continue",
                                                           location: Location::default(), })
            },
            Flow::Return(_) => Err(RuntimeError::ReturnOutsideFunction { location: Location::default() }),
        }
    }

    /// Looks up a name from the innermost scope outwards.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        lookup(&self.scope, name)
    }

    /// The unit whose code is currently executing, if any.
    #[must_use]
    pub fn current_unit(&self) -> Option<&Rc<UnitIdentity>> {
        self.unit_stack.last().and_then(Option::as_ref)
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The returned
    /// value may still share element storage with a binding; callers that
    /// store it take a [`Value::deep_clone`].
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The value of the expression.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Identifier { .. } | Expr::Index { .. } | Expr::Member { .. } => {
                Ok(self.eval_place(expr)?.read())
            },
            Expr::Array { elements, .. } => self.eval_array_literal(elements),
            Expr::Dictionary { entries, .. } => self.eval_dictionary_literal(entries),
            Expr::Binary { left,
                           op,
                           right,
                           location, } => self.eval_binary_expr(left, *op, right, *location),
            Expr::Unary { op, expr, location } => self.eval_unary_expr(*op, expr, *location),
            Expr::Postfix { op, expr, location } => self.eval_postfix(*op, expr, *location),
            Expr::Assign { target,
                           op,
                           value,
                           location, } => self.eval_assign(target, *op, value, *location),
            Expr::TypeOf { expr, .. } => Ok(Value::from(self.eval(expr)?.type_name())),
            Expr::Call { callee,
                         arguments,
                         location, } => self.eval_call(callee, arguments, *location),
            Expr::Lambda { params, body, .. } => Ok(self.make_lambda(params, body)),
            Expr::Instantiate { unit,
                                arguments,
                                location, } => self.eval_instantiate(unit, arguments, *location),
        }
    }

    /// Executes a single statement.
    ///
    /// # Returns
    /// The control-flow signal the statement finished with.
    pub fn exec(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Block { statements, .. } => {
                self.with_scope(ScopeKind::Block, |ctx| ctx.exec_statements(statements))
            },
            Statement::Expression { expr, .. } => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval(condition)?.as_bool(condition.location())? {
                    self.exec(then_branch)
                } else if let Some(branch) = else_branch {
                    self.exec(branch)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Statement::For { init,
                             condition,
                             step,
                             body,
                             .. } => self.exec_for(init.as_deref(), condition.as_ref(), step.as_ref(), body),
            Statement::Foreach { key,
                                 item,
                                 by_ref,
                                 iterable,
                                 body,
                                 location, } => {
                self.exec_foreach(key.as_deref(), item, *by_ref, iterable, body, *location)
            },
            Statement::While { condition, body, .. } => self.exec_while(condition, body),
            Statement::Break { location } => self.loop_signal(Flow::Break, "break", *location),
            Statement::Continue { location } => self.loop_signal(Flow::Continue, "continue", *location),
            Statement::Return { value, location } => {
                if self.function_depth == 0 {
                    return Err(RuntimeError::ReturnOutsideFunction { location: *location });
                }
                let value = match value {
                    Some(expr) => self.eval(expr)?.deep_clone(),
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            },
            Statement::Import { target, location } => {
                self.exec_import(target, *location)?;
                Ok(Flow::Normal)
            },
            Statement::Binding(decl) => self.declare_binding(decl).map(|()| Flow::Normal),
            Statement::Function(decl) => self.declare_function(decl).map(|()| Flow::Normal),
            Statement::Enum(decl) => self.declare_enum(decl).map(|()| Flow::Normal),
            Statement::Realm(decl) => self.declare_realm(decl).map(|()| Flow::Normal),
            Statement::Unit(decl) => self.declare_unit(decl).map(|()| Flow::Normal),
        }
    }

    /// Executes statements in order until one of them signals anything other
    /// than [`Flow::Normal`].
    pub fn exec_statements(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        for statement in statements {
            match self.exec(statement)? {
                Flow::Normal => {},
                signal => return Ok(signal),
            }
        }
        Ok(Flow::Normal)
    }

    fn loop_signal(&self, signal: Flow, keyword: &'static str, location: Location) -> EvalResult<Flow> {
        if self.loop_depth == 0 {
            return Err(RuntimeError::LoopControlOutsideLoop { keyword, location });
        }
        Ok(signal)
    }

    /// Runs `body` with `scope` as the innermost scope, then restores the
    /// previous one. The scope itself is left intact.
    pub fn within<T>(&mut self,
                     scope: ScopeRef,
                     body: impl FnOnce(&mut Self) -> EvalResult<T>)
                     -> EvalResult<T> {
        let previous = mem::replace(&mut self.scope, scope);
        let result = body(self);
        self.scope = previous;
        result
    }

    /// Runs `body` in a new child scope of the current one and destroys the
    /// scope afterwards.
    pub fn with_scope<T>(&mut self,
                         kind: ScopeKind,
                         body: impl FnOnce(&mut Self) -> EvalResult<T>)
                         -> EvalResult<T> {
        let scope = Scope::new(kind, Some(Rc::clone(&self.scope)));
        let result = self.within(Rc::clone(&scope), body)?;
        self.destroy_scope(&scope)?;
        Ok(result)
    }

    /// Runs destructors for the instances owned by a scope that is being
    /// left, in reverse declaration order.
    ///
    /// Bindings declared `ref` do not own their instance and are skipped.
    pub fn destroy_scope(&mut self, scope: &ScopeRef) -> EvalResult<()> {
        let doomed = scope.borrow()
                          .symbols
                          .values()
                          .rev()
                          .filter(|symbol| !symbol.is_ref)
                          .filter_map(|symbol| symbol.value.as_ref())
                          .filter_map(|handle| match &*handle.borrow() {
                              Value::Instance(instance) if instance.unit.has_destructor() => {
                                  Some(instance.clone())
                              },
                              _ => None,
                          })
                          .collect::<Vec<Instance>>();

        if !doomed.is_empty() {
            trace!(kind = %scope.borrow().kind, count = doomed.len(), "running destructors");
        }
        doomed.iter()
              .try_for_each(|instance| self.run_destructor(instance))
    }
}
