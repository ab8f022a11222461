use std::rc::Rc;

use crate::{
    ast::{Location, TypeKind},
    interpreter::{
        evaluator::core::EvalResult,
        modules::constant,
        scope::{Scope, ScopeKind, ScopeRef, Symbol, SymbolKind},
        value::{composite::RealmValue, core::Value},
    },
};

/// Name of the realm holding the type constants.
pub const REALM_NAME: &str = "types";

/// Registers the realm `types`, whose constants hold the names `typeof`
/// reports, such as `types.INTEGER == "int"`.
pub fn load(scope: &ScopeRef) -> EvalResult<()> {
    let members = Scope::new(ScopeKind::Member, Some(Rc::clone(scope)));
    for kind in TypeKind::ALL {
        constant(&members, kind.constant_name(), Value::from(kind.name()))?;
    }

    let realm = Value::Realm(Rc::new(RealmValue { name: REALM_NAME.to_string(),
                                                  members }));
    scope.borrow_mut()
         .insert(Symbol::constant(REALM_NAME, SymbolKind::Realm, realm), Location::default())
}
