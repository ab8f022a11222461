use std::{collections::HashSet, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::{Access, Expr, Location, UnitDecl},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::{Membership, Scope, ScopeKind, Symbol, SymbolKind},
        value::{
            composite::{CONSTRUCTOR, DESTRUCTOR, Instance, UnitIdentity, UnitValue, copy_member},
            core::Value,
            function::format_kinds,
        },
    },
};

impl Context {
    /// Declares a unit.
    ///
    /// Parents are resolved first. Member declarations then run in the unit's
    /// member scope with the new unit as the executing unit, so member
    /// functions carry its identity. Each member symbol is tagged with its
    /// access level, its `outer` flag and its owner.
    ///
    /// # Errors
    /// - `InvalidComposition` if a parent is unknown, not a unit, final,
    ///   listed twice, or if two parents pass on different `outer` members
    ///   of the same name that the unit does not redeclare.
    /// - Any error raised by a member declaration.
    pub fn declare_unit(&mut self, decl: &UnitDecl) -> EvalResult<()> {
        let scope = self.target_scope(decl.qualifiers.storage);
        let parents = decl.parents
                          .iter()
                          .map(|name| self.resolve_parent(decl, name))
                          .collect::<EvalResult<Vec<_>>>()?;
        Self::check_composition(decl, &parents)?;

        let identity = Rc::new(UnitIdentity { name:    decl.name.clone(),
                                              parents: parents.iter()
                                                              .map(|parent| Rc::clone(&parent.identity))
                                                              .collect(),
                                              trusted: decl.trusted.clone(), });

        let mut symbol = Symbol::new(&decl.name, SymbolKind::Unit);
        symbol.is_const = true;
        scope.borrow_mut().insert(symbol, decl.location)?;

        let members = Scope::new(ScopeKind::Member, Some(Rc::clone(&scope)));
        let default_access = decl.default_access.unwrap_or(Access::Hidden);

        self.unit_stack.push(Some(Rc::clone(&identity)));
        let declared = self.within(Rc::clone(&members), |ctx| {
                               for member in &decl.members {
                                   ctx.exec(&member.declaration)?;

                                   let Some(name) = member.declaration.declared_name() else {
                                       continue;
                                   };
                                   if let Some(symbol) = ctx.scope.borrow_mut().symbols.get_mut(name) {
                                       symbol.membership =
                                           Some(Membership { access:   member.access.unwrap_or(default_access),
                                                             is_outer: member.is_outer,
                                                             owner:    Rc::clone(&identity), });
                                   }
                               }
                               Ok(())
                           });
        self.unit_stack.pop();
        declared?;

        debug!(name = %decl.name,
               parents = ?decl.parents,
               members = members.borrow().symbols.len(),
               "declared unit");

        let unit = UnitValue { identity,
                               is_final: decl.is_final,
                               members,
                               parents };
        scope.borrow_mut()
             .bind(&decl.name, Value::Unit(Rc::new(unit)).into_handle());
        Ok(())
    }

    fn resolve_parent(&self, decl: &UnitDecl, name: &str) -> EvalResult<Rc<UnitValue>> {
        let invalid = |details: String| RuntimeError::InvalidComposition { unit: decl.name.clone(),
                                                                          details,
                                                                          location: decl.location };

        let symbol = self.lookup(name)
                         .ok_or_else(|| invalid(format!("unknown unit '{name}'")))?;
        let handle = symbol.handle(decl.location)?;
        let value = handle.borrow();

        match &*value {
            Value::Unit(unit) if unit.is_final => Err(invalid(format!("unit '{name}' is final"))),
            Value::Unit(unit) => Ok(Rc::clone(unit)),
            other => Err(invalid(format!("'{name}' is a {}, not a unit", other.type_name()))),
        }
    }

    /// Rejects a parent listed twice and `outer` members of the same name
    /// arriving from different parents, unless the unit redeclares the name.
    fn check_composition(decl: &UnitDecl, parents: &[Rc<UnitValue>]) -> EvalResult<()> {
        let invalid = |details: String| RuntimeError::InvalidComposition { unit: decl.name.clone(),
                                                                          details,
                                                                          location: decl.location };

        for (index, parent) in parents.iter().enumerate() {
            if parents[..index].iter().any(|earlier| Rc::ptr_eq(earlier, parent)) {
                return Err(invalid(format!("unit '{}' is listed more than once", parent.identity.name)));
            }
        }

        let own = decl.members
                      .iter()
                      .filter_map(|member| member.declaration.declared_name())
                      .collect::<HashSet<_>>();

        let mut inherited: Vec<(Symbol, &str)> = Vec::new();
        for parent in parents {
            for (symbol, _) in parent.outer_members() {
                if own.contains(symbol.name.as_str()) {
                    continue;
                }

                let conflict = inherited.iter().find(|(known, _)| {
                                                   known.name == symbol.name
                                                   && !same_owner(known, &symbol)
                                               });
                if let Some((_, first)) = conflict {
                    return Err(invalid(format!("member '{}' is inherited from both '{first}' and '{}'",
                                               symbol.name, parent.identity.name)));
                }
                inherited.push((symbol, &parent.identity.name));
            }
        }
        Ok(())
    }

    /// Evaluates `Unit{args}`.
    ///
    /// The new instance receives copies of the unit's members except the
    /// constructor, the destructor and `outer` members, followed by the
    /// `outer` members of every parent that are not already present. The
    /// constructor overload matching the arguments then runs against the
    /// instance.
    ///
    /// # Errors
    /// - `TypeMismatch` if the expression does not name a unit.
    /// - `NoMatchingOverload` if no constructor accepts the arguments; a unit
    ///   without constructors accepts only an empty argument list.
    pub fn eval_instantiate(&mut self, unit: &Expr, arguments: &[Expr], location: Location) -> EvalResult<Value> {
        let unit = match self.eval(unit)? {
            Value::Unit(unit) => unit,
            other => {
                return Err(RuntimeError::TypeMismatch { details: format!("cannot instantiate a value of type {}",
                                                                         other.type_name()),
                                                        location });
            },
        };

        let instance = Self::build_instance(&unit);
        debug!(unit = %unit.identity.name, "instantiated unit");

        let arguments = self.eval_arguments(arguments)?;
        match unit.special(CONSTRUCTOR) {
            Some(constructor) => {
                let constructor = constructor.rebind(&instance.scope);
                self.call_function(&constructor, &arguments, location)?;
            },
            None if arguments.is_empty() => {},
            None => {
                let kinds = arguments.iter()
                                     .map(|argument| argument.handle.borrow().type_kind())
                                     .collect::<Vec<_>>();
                return Err(RuntimeError::NoMatchingOverload { name: format!("{}.{CONSTRUCTOR}",
                                                                            unit.identity.name),
                                                              signature: format_kinds(&kinds),
                                                              location });
            },
        }

        Ok(Value::Instance(instance))
    }

    fn build_instance(unit: &Rc<UnitValue>) -> Instance {
        let members = unit.members.borrow();
        let scope = Scope::new(ScopeKind::Member, members.parent.clone());

        {
            let mut target = scope.borrow_mut();
            let own = members.symbols.values().filter(|symbol| {
                                                  symbol.name != CONSTRUCTOR
                                                  && symbol.name != DESTRUCTOR
                                                  && !symbol.membership.as_ref().is_some_and(|membership| membership.is_outer)
                                              });
            for symbol in own {
                target.symbols
                      .insert(symbol.name.clone(), copy_member(symbol, &unit.members, &scope));
            }

            for parent in &unit.parents {
                for (symbol, declared_in) in parent.outer_members() {
                    if !target.symbols.contains_key(&symbol.name) {
                        target.symbols
                              .insert(symbol.name.clone(), copy_member(&symbol, &declared_in, &scope));
                    }
                }
            }
        }

        Instance { unit: Rc::clone(unit),
                   scope }
    }

    /// Runs the destructor of an instance whose owning binding goes out of
    /// scope.
    pub fn run_destructor(&mut self, instance: &Instance) -> EvalResult<()> {
        let Some(destructor) = instance.unit.special(DESTRUCTOR) else {
            return Ok(());
        };

        trace!(unit = %instance.unit.identity.name, "running destructor");
        let destructor = destructor.rebind(&instance.scope);
        self.call_function(&destructor, &[], Location::default())?;
        Ok(())
    }
}

fn same_owner(left: &Symbol, right: &Symbol) -> bool {
    match (&left.membership, &right.membership) {
        (Some(left), Some(right)) => Rc::ptr_eq(&left.owner, &right.owner),
        _ => false,
    }
}
