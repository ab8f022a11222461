use std::{fmt, rc::Rc};

use crate::{
    ast::Location,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        scope::{Scope, ScopeKind, ScopeRef, Symbol},
        value::{core::Value, function::FunctionValue},
    },
};

/// Name of the constructor member of a unit.
pub const CONSTRUCTOR: &str = "ctor";
/// Name of the destructor member of a unit.
pub const DESTRUCTOR: &str = "dtor";

/// The identity of a unit, used for access checks.
///
/// Identities are compared by pointer: two units with the same name declared
/// in different scopes are different units.
#[derive(Debug)]
pub struct UnitIdentity {
    /// The unit name.
    pub name:    String,
    /// Identities of the units composed into this one.
    pub parents: Vec<Rc<UnitIdentity>>,
    /// Names listed after `-trust unit`.
    pub trusted: Vec<String>,
}

impl UnitIdentity {
    /// Returns `true` if `self` is `ancestor` or is composed from it,
    /// directly or transitively.
    #[must_use]
    pub fn descends_from(self: &Rc<Self>, ancestor: &Rc<Self>) -> bool {
        Rc::ptr_eq(self, ancestor)
        || self.parents
               .iter()
               .any(|parent| parent.descends_from(ancestor))
    }

    /// Returns `true` if the unit named `name` is on the trust list.
    #[must_use]
    pub fn trusts(&self, name: &str) -> bool {
        self.trusted.iter().any(|trusted| trusted == name)
    }
}

/// A declared unit.
pub struct UnitValue {
    /// Identity shared by the unit, its instances and its member functions.
    pub identity: Rc<UnitIdentity>,
    /// `-final` was given.
    pub is_final: bool,
    /// Members as declared, including constructors and destructors.
    pub members:  ScopeRef,
    /// The composed units, left to right.
    pub parents:  Vec<Rc<UnitValue>>,
}

impl fmt::Debug for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitValue")
         .field("name", &self.identity.name)
         .field("is_final", &self.is_final)
         .finish_non_exhaustive()
    }
}

impl UnitValue {
    /// Returns the special member function `name`, if declared.
    #[must_use]
    pub fn special(&self, name: &str) -> Option<FunctionValue> {
        let members = self.members.borrow();
        let handle = members.get_local(name)?.value.as_ref()?;
        let value = handle.borrow();
        match &*value {
            Value::Function(function) => Some(function.clone()),
            _ => None,
        }
    }

    /// The `outer` members this unit passes on to units composed from it:
    /// its own, then those inherited from its parents. Each symbol comes
    /// paired with the member table of the unit that declared it.
    #[must_use]
    pub fn outer_members(&self) -> Vec<(Symbol, ScopeRef)> {
        let mut found = self.members
                            .borrow()
                            .symbols
                            .values()
                            .filter(|symbol| symbol.membership.as_ref().is_some_and(|membership| membership.is_outer))
                            .map(|symbol| (symbol.clone(), Rc::clone(&self.members)))
                            .collect::<Vec<_>>();

        for parent in &self.parents {
            for (symbol, declared_in) in parent.outer_members() {
                if found.iter().all(|(known, _)| known.name != symbol.name) {
                    found.push((symbol, declared_in));
                }
            }
        }
        found
    }

    /// Returns `true` if instances need their destructor run.
    #[must_use]
    pub fn has_destructor(&self) -> bool {
        self.members.borrow().get_local(DESTRUCTOR).is_some()
    }
}

/// An instance of a unit.
#[derive(Clone)]
pub struct Instance {
    /// The unit the instance was built from.
    pub unit:  Rc<UnitValue>,
    /// The instance's own members.
    pub scope: ScopeRef,
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.unit.identity.name)
    }
}

impl Instance {
    /// Copies the instance into a fresh member scope.
    ///
    /// Member values are deep-copied except `ref` members, which keep their
    /// alias. Member functions bound to this instance are rebound so that
    /// they operate on the copy.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        let source = self.scope.borrow();
        let scope = Scope::new(ScopeKind::Member, source.parent.clone());

        {
            let mut target = scope.borrow_mut();
            for symbol in source.symbols.values() {
                target.symbols
                      .insert(symbol.name.clone(), copy_member(symbol, &self.scope, &scope));
            }
        }

        Self { unit: Rc::clone(&self.unit),
               scope }
    }
}

/// Copies a member from the member table `source` into the member table
/// `target` of another instance.
///
/// `ref` members keep their alias. Function overloads closing over `source`
/// are rebound to `target`, other overloads such as stored lambdas keep their
/// captured scope. Everything else is deep-copied.
#[must_use]
pub fn copy_member(symbol: &Symbol, source: &ScopeRef, target: &ScopeRef) -> Symbol {
    let mut copy = symbol.clone();
    copy.value = symbol.value.as_ref().map(|handle| {
                                          if symbol.is_ref {
                                              return Rc::clone(handle);
                                          }
                                          match &*handle.borrow() {
                                              Value::Function(function) => {
                                                  Value::Function(function.rebind_from(source, target)).into_handle()
                                              },
                                              other => other.deep_clone().into_handle(),
                                          }
                                      });
    copy
}

/// A declared enum.
#[derive(Debug)]
pub struct EnumValue {
    /// The enum name.
    pub name:    String,
    /// Member names with their values, in declaration order.
    pub members: Vec<(String, i64)>,
    /// Constant member bindings for `Name.Member` access.
    pub scope:   ScopeRef,
}

impl EnumValue {
    /// Value of the member `name`.
    pub fn value_of(&self, name: &str, location: Location) -> EvalResult<i64> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| self.unknown_member(name, location))
    }

    /// Name of the first member with value `value`.
    pub fn name_of(&self, value: i64, location: Location) -> EvalResult<&str> {
        self.members
            .iter()
            .find(|(_, member)| *member == value)
            .map(|(name, _)| name.as_str())
            .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("enum {} has no member with value {value}",
                                                                             self.name),
                                                           location })
    }

    /// Zero-based declaration position of the member `name`.
    pub fn index_of(&self, name: &str, location: Location) -> EvalResult<usize> {
        self.members
            .iter()
            .position(|(member, _)| member == name)
            .ok_or_else(|| self.unknown_member(name, location))
    }

    fn unknown_member(&self, name: &str, location: Location) -> RuntimeError {
        RuntimeError::UnknownMember { target: self.name.clone(),
                                      name: name.to_string(),
                                      location }
    }
}

/// A namespace.
#[derive(Debug)]
pub struct RealmValue {
    /// The realm name.
    pub name:    String,
    /// The declarations made inside the realm body.
    pub members: ScopeRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str, parents: Vec<Rc<UnitIdentity>>) -> Rc<UnitIdentity> {
        Rc::new(UnitIdentity { name: name.to_string(),
                               parents,
                               trusted: vec!["Friend".to_string()] })
    }

    #[test]
    fn descent_is_transitive_and_by_identity() {
        let base = identity("Base", Vec::new());
        let middle = identity("Middle", vec![Rc::clone(&base)]);
        let leaf = identity("Leaf", vec![Rc::clone(&middle)]);
        let impostor = identity("Base", Vec::new());

        assert!(leaf.descends_from(&base));
        assert!(base.descends_from(&base));
        assert!(!base.descends_from(&leaf));
        assert!(!leaf.descends_from(&impostor));
        assert!(base.trusts("Friend"));
    }

    #[test]
    fn enum_lookups() {
        let colors = EnumValue { name:    "Color".to_string(),
                                 members: vec![("Red".to_string(), 0), ("Blue".to_string(), 5)],
                                 scope:   Scope::new(ScopeKind::Member, None), };

        assert_eq!(colors.value_of("Blue", Location::default()).unwrap(), 5);
        assert_eq!(colors.name_of(0, Location::default()).unwrap(), "Red");
        assert_eq!(colors.index_of("Blue", Location::default()).unwrap(), 1);
        assert!(colors.value_of("Green", Location::default()).is_err());
    }
}
