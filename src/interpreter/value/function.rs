use std::{fmt, rc::Rc};

use crate::{
    ast::{Location, Param, Statement, TypeKind, format_params},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        scope::ScopeRef,
        value::{composite::UnitIdentity, core::Handle, core::Value},
    },
};

/// Type alias for native function handlers.
///
/// A native receives the argument handles and the location of the call.
/// Arguments bound to `ref` parameters are the caller's storage, all others
/// are private copies.
pub type NativeFn = fn(&[Handle], Location) -> EvalResult<Value>;

/// What runs when an overload is selected.
#[derive(Clone)]
pub enum OverloadBody {
    /// Statements of a script function or lambda.
    Script(Rc<[Statement]>),
    /// A function provided by a builtin module.
    Native(NativeFn),
    /// A forward declaration still waiting for its definition.
    Forward,
}

/// One signature of a function together with its body.
#[derive(Clone)]
pub struct Overload {
    /// The parameters, which also form the signature.
    pub params:  Rc<[Param]>,
    /// The body.
    pub body:    OverloadBody,
    /// Scope the body resolves free names in.
    pub closure: ScopeRef,
    /// The unit whose member this overload is. Calls run with this unit as
    /// the accessing identity.
    pub unit:    Option<Rc<UnitIdentity>>,
}

impl fmt::Debug for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match self.body {
            OverloadBody::Script(_) => "script",
            OverloadBody::Native(_) => "native",
            OverloadBody::Forward => "forward",
        };
        f.debug_struct("Overload")
         .field("params", &format_params(&self.params))
         .field("body", &body)
         .finish_non_exhaustive()
    }
}

impl Overload {
    /// The parameter list as written, e.g. `(var a, ref array b)`.
    #[must_use]
    pub fn signature(&self) -> String {
        format_params(&self.params)
    }

    /// Two overloads collide when their parameter kinds are pairwise equal.
    #[must_use]
    pub fn same_signature(&self, other: &Self) -> bool {
        self.params.len() == other.params.len()
        && self.params
               .iter()
               .zip(other.params.iter())
               .all(|(a, b)| a.kind == b.kind)
    }

    /// Whether arguments of the given kinds can be bound to the parameters.
    #[must_use]
    pub fn accepts(&self, arguments: &[TypeKind]) -> bool {
        self.params.len() == arguments.len()
        && self.params
               .iter()
               .zip(arguments)
               .all(|(param, kind)| param.kind.accepts(*kind))
    }

    /// Whether every parameter names a concrete kind rather than `omni`.
    fn is_specific(&self) -> bool {
        self.params
            .iter()
            .all(|param| param.kind != crate::ast::BindingKind::Omni)
    }

    /// Returns a copy resolving free names in `closure` instead.
    #[must_use]
    pub fn rebind(&self, closure: ScopeRef) -> Rc<Self> {
        Rc::new(Self { closure,
                       ..self.clone() })
    }

    /// Returns `true` for a forward declaration without a body.
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        matches!(self.body, OverloadBody::Forward)
    }
}

/// A function value: a name and every overload declared under it.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    /// The declared name, or `lambda` for anonymous functions.
    pub name:      String,
    /// Overloads in declaration order.
    pub overloads: Vec<Rc<Overload>>,
}

impl FunctionValue {
    /// Creates a function with a single overload.
    #[must_use]
    pub fn new(name: &str, overload: Overload) -> Self {
        Self { name:      name.to_string(),
               overloads: vec![Rc::new(overload)], }
    }

    /// Adds an overload.
    ///
    /// A definition replaces a forward declaration with the same signature,
    /// and a repeated forward declaration is ignored.
    ///
    /// # Errors
    /// `DuplicateOverload` if an overload with the same signature already has
    /// a body.
    pub fn add_overload(&mut self, overload: Overload, location: Location) -> EvalResult<()> {
        let existing = self.overloads
                           .iter()
                           .position(|candidate| candidate.same_signature(&overload));

        match existing {
            None => self.overloads.push(Rc::new(overload)),
            Some(_) if overload.is_forward() => {},
            Some(index) if self.overloads[index].is_forward() => self.overloads[index] = Rc::new(overload),
            Some(_) => {
                return Err(RuntimeError::DuplicateOverload { name: self.name.clone(),
                                                             signature: overload.signature(),
                                                             location });
            },
        }
        Ok(())
    }

    /// Selects the overload for a call with arguments of the given kinds.
    ///
    /// When several overloads accept the arguments, the only one without
    /// `omni` parameters wins.
    ///
    /// # Errors
    /// - `NoMatchingOverload` if no overload accepts the arguments.
    /// - `AmbiguousCall` if no single overload can be preferred.
    /// - `UndefinedOverload` if the selected overload was never defined.
    pub fn resolve(&self, arguments: &[TypeKind], location: Location) -> EvalResult<Rc<Overload>> {
        let matches = self.overloads
                          .iter()
                          .filter(|overload| overload.accepts(arguments))
                          .collect::<Vec<_>>();

        let selected = match matches.as_slice() {
            [] => {
                return Err(RuntimeError::NoMatchingOverload { name: self.name.clone(),
                                                              signature: format_kinds(arguments),
                                                              location });
            },
            [single] => *single,
            several => {
                let mut specific = several.iter().filter(|overload| overload.is_specific());
                match (specific.next(), specific.next()) {
                    (Some(only), None) => *only,
                    _ => {
                        return Err(RuntimeError::AmbiguousCall { name: self.name.clone(),
                                                                 signature: format_kinds(arguments),
                                                                 location });
                    },
                }
            },
        };

        if selected.is_forward() {
            return Err(RuntimeError::UndefinedOverload { name: self.name.clone(),
                                                         signature: selected.signature(),
                                                         location });
        }
        Ok(Rc::clone(selected))
    }

    /// Returns a copy whose overloads resolve free names in `closure`.
    #[must_use]
    pub fn rebind(&self, closure: &ScopeRef) -> Self {
        Self { name:      self.name.clone(),
               overloads: self.overloads
                              .iter()
                              .map(|overload| overload.rebind(Rc::clone(closure)))
                              .collect(), }
    }

    /// Returns a copy in which only the overloads closing over `source` are
    /// moved to `target`. Other overloads keep their captured scope.
    #[must_use]
    pub fn rebind_from(&self, source: &ScopeRef, target: &ScopeRef) -> Self {
        Self { name:      self.name.clone(),
               overloads: self.overloads
                              .iter()
                              .map(|overload| {
                                  if Rc::ptr_eq(&overload.closure, source) {
                                      overload.rebind(Rc::clone(target))
                                  } else {
                                      Rc::clone(overload)
                                  }
                              })
                              .collect(), }
    }
}

/// Renders argument kinds as `(int, string)`.
#[must_use]
pub fn format_kinds(kinds: &[TypeKind]) -> String {
    let list = kinds.iter().map(|kind| kind.name()).collect::<Vec<_>>();
    format!("({})", list.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::BindingKind,
        interpreter::scope::{Scope, ScopeKind},
    };

    fn param(kind: BindingKind) -> Param {
        Param { name: "p".to_string(),
                kind,
                by_ref: false,
                location: Location::default() }
    }

    fn overload(kinds: &[BindingKind], body: OverloadBody) -> Overload {
        Overload { params: kinds.iter().copied().map(param).collect(),
                   body,
                   closure: Scope::new(ScopeKind::Global, None),
                   unit: None }
    }

    fn script() -> OverloadBody {
        OverloadBody::Script(Rc::from(Vec::new()))
    }

    #[test]
    fn definition_replaces_forward_declaration() {
        let mut function = FunctionValue::new("f", overload(&[BindingKind::Var], OverloadBody::Forward));
        function.add_overload(overload(&[BindingKind::Var], script()), Location::default())
                .unwrap();

        assert_eq!(function.overloads.len(), 1);
        assert!(!function.overloads[0].is_forward());
    }

    #[test]
    fn second_definition_is_rejected() {
        let mut function = FunctionValue::new("f", overload(&[BindingKind::Array], script()));
        let error = function.add_overload(overload(&[BindingKind::Array], script()), Location::default())
                            .unwrap_err();
        assert!(matches!(error, RuntimeError::DuplicateOverload { .. }));
    }

    #[test]
    fn specific_overload_beats_omni() {
        let mut function = FunctionValue::new("f", overload(&[BindingKind::Omni], script()));
        function.add_overload(overload(&[BindingKind::Array], script()), Location::default())
                .unwrap();

        let chosen = function.resolve(&[TypeKind::Array], Location::default()).unwrap();
        assert_eq!(chosen.params[0].kind, BindingKind::Array);

        let chosen = function.resolve(&[TypeKind::Integer], Location::default()).unwrap();
        assert_eq!(chosen.params[0].kind, BindingKind::Omni);
    }

    #[test]
    fn calling_a_forward_declaration_fails() {
        let function = FunctionValue::new("f", overload(&[], OverloadBody::Forward));
        let error = function.resolve(&[], Location::default()).unwrap_err();
        assert!(matches!(error, RuntimeError::UndefinedOverload { .. }));
    }

    #[test]
    fn rebind_from_moves_only_member_overloads() {
        let members = Scope::new(ScopeKind::Member, None);
        let copy = Scope::new(ScopeKind::Member, None);

        let mut function = FunctionValue::new("f", overload(&[], script()));
        function.add_overload(Overload { closure: Rc::clone(&members),
                                         ..overload(&[BindingKind::Var], script()) },
                              Location::default())
                .unwrap();

        let rebound = function.rebind_from(&members, &copy);
        assert!(Rc::ptr_eq(&rebound.overloads[0], &function.overloads[0]));
        assert!(Rc::ptr_eq(&rebound.overloads[1].closure, &copy));
    }

    #[test]
    fn wrong_count_has_no_match() {
        let function = FunctionValue::new("f", overload(&[BindingKind::Var], script()));
        let error = function.resolve(&[], Location::default()).unwrap_err();
        assert_eq!(error.to_string(),
                   "Error on line 0, column 0: No overload of 'f' accepts arguments ().");
    }
}
