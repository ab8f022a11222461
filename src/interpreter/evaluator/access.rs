use std::rc::Rc;

use crate::{
    ast::{Access, Expr, Location},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Place},
        scope::Membership,
        value::core::Value,
    },
    util::num::normalize_index,
};

impl Context {
    /// Resolves an expression to the storage it denotes.
    ///
    /// Identifiers resolve through the scope chain, index expressions to an
    /// array element or dictionary entry, member expressions to a member of
    /// an instance, unit, enum or realm. Constness propagates from the
    /// binding to everything reached through it. Any other expression is
    /// evaluated into a temporary place.
    ///
    /// An index expression that is written to may create a missing
    /// dictionary entry; everywhere else a missing key is an error.
    pub fn eval_place(&mut self, expr: &Expr) -> EvalResult<Place> {
        match expr {
            Expr::Identifier { name, location, .. } => {
                let symbol = self.lookup(name)
                                 .ok_or_else(|| RuntimeError::UnknownVariable { name:     name.clone(),
                                                                                location: *location, })?;
                Ok(Place { handle:   symbol.handle(*location)?,
                           is_const: symbol.is_const, })
            },
            Expr::Index { target,
                          index,
                          is_lvalue,
                          location,
                          .. } => {
                let container = self.eval_place(target)?;
                let key = self.eval(index)?;
                Self::index_place(&container, &key, *is_lvalue, expr, *location)
            },
            Expr::Member { target,
                           name,
                           location,
                           .. } => {
                let container = self.eval_place(target)?;
                self.member_place(&container, name, *location)
            },
            other => Ok(Place::temporary(self.eval(other)?)),
        }
    }

    /// Resolves `container[key]`.
    ///
    /// Arrays take integer indices, negative ones counting from the end.
    /// Dictionaries take any valid key. Strings can be read by index but not
    /// written.
    fn index_place(container: &Place,
                   key: &Value,
                   create: bool,
                   expr: &Expr,
                   location: Location)
                   -> EvalResult<Place> {
        let mut value = container.handle.borrow_mut();

        match &mut *value {
            Value::Array(elements) => {
                let index = normalize_index(key.as_integer(location)?, elements.len(), location)?;
                Ok(Place { handle:   Rc::clone(&elements[index]),
                           is_const: container.is_const, })
            },
            Value::Dict(entries) => {
                let key = key.dict_key(location)?;
                if let Some(handle) = entries.get(&key) {
                    return Ok(Place { handle:   Rc::clone(handle),
                                      is_const: container.is_const, });
                }
                if !create {
                    return Err(RuntimeError::MissingKey { key, location });
                }
                if container.is_const {
                    return Err(RuntimeError::ConstModification { name: expr.to_string(),
                                                                 location });
                }

                let handle = Value::Null.into_handle();
                entries.insert(key, Rc::clone(&handle));
                Ok(Place { handle,
                           is_const: false })
            },
            Value::String(text) => {
                if create {
                    return Err(RuntimeError::TypeMismatch { details: format!("cannot assign to a character of the string '{text}'"),
                                                            location });
                }
                let size = text.chars().count();
                let index = normalize_index(key.as_integer(location)?, size, location)?;
                let character = text.chars()
                                    .nth(index)
                                    .ok_or(RuntimeError::IndexOutOfBounds { index: key.as_integer(location)?,
                                                                            size,
                                                                            location })?;
                Ok(Place::temporary(Value::Char(character)))
            },
            other => {
                Err(RuntimeError::TypeMismatch { details: format!("cannot index a value of type {}", other.type_name()),
                                                 location })
            },
        }
    }

    /// Resolves `container.name` and checks that the executing unit may
    /// reach the member.
    fn member_place(&self, container: &Place, name: &str, location: Location) -> EvalResult<Place> {
        let (scope, target) = match &*container.handle.borrow() {
            Value::Instance(instance) => (Rc::clone(&instance.scope), instance.unit.identity.name.clone()),
            Value::Unit(unit) => (Rc::clone(&unit.members), unit.identity.name.clone()),
            Value::Enum(value) => (Rc::clone(&value.scope), value.name.clone()),
            Value::Realm(realm) => (Rc::clone(&realm.members), realm.name.clone()),
            other => {
                return Err(RuntimeError::TypeMismatch { details: format!("a value of type {} has no members",
                                                                         other.type_name()),
                                                        location });
            },
        };

        let symbol = scope.borrow()
                          .get_local(name)
                          .cloned()
                          .ok_or_else(|| RuntimeError::UnknownMember { target,
                                                                       name: name.to_string(),
                                                                       location })?;

        if let Some(membership) = &symbol.membership {
            self.check_access(membership, name, location)?;
        }

        Ok(Place { handle:   symbol.handle(location)?,
                   is_const: symbol.is_const || container.is_const, })
    }

    /// Decides whether the executing unit may reach a member.
    ///
    /// - exposed members are reachable from everywhere;
    /// - hidden members only from code of the owning unit;
    /// - shared members also from units composed from the owner and from
    ///   units on the owner's trust list.
    pub fn check_access(&self, membership: &Membership, name: &str, location: Location) -> EvalResult<()> {
        let caller = self.current_unit();
        let owner = &membership.owner;

        let allowed = match membership.access {
            Access::Exposed => true,
            Access::Hidden => caller.is_some_and(|caller| Rc::ptr_eq(caller, owner)),
            Access::Shared => {
                caller.is_some_and(|caller| caller.descends_from(owner) || owner.trusts(&caller.name))
            },
        };

        if allowed {
            Ok(())
        } else {
            Err(RuntimeError::AccessDenied { name: name.to_string(),
                                             owner: owner.name.clone(),
                                             access: membership.access.to_string(),
                                             location })
        }
    }
}
