use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    ast::{BindingKind, Location, Param},
    interpreter::{
        evaluator::core::EvalResult,
        scope::{ScopeRef, Symbol, SymbolKind},
        value::{
            core::Value,
            function::{FunctionValue, NativeFn, Overload, OverloadBody},
        },
    },
};

/// Declares the native overloads of a builtin module.
///
/// Each entry provides:
/// - the function name (repeated for further overloads),
/// - the parameter list as [`ParamSpec`]s,
/// - a function pointer implementing the overload.
///
/// The macro produces a static `NATIVES` table for [`register`].
macro_rules! native_functions {
    (
        $(
            $name:literal => {
                params: $params:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static NATIVES: &[$crate::interpreter::modules::NativeDef] = &[
            $(
                $crate::interpreter::modules::NativeDef { name: $name, params: $params, func: $func },
            )*
        ];
    };
}

/// `wio.io`: console output and input.
pub mod io;
/// `wio.math`: numeric functions and constants.
pub mod math;
/// `wio.types`: names of the declared-type vocabulary.
pub mod types;
/// `wio.util`: collection helpers, conversions, assertions and enum
/// reflection.
pub mod util;

/// Loads a module's declarations into a scope.
pub type Loader = fn(&ScopeRef) -> EvalResult<()>;

/// Every builtin module, in preload order.
pub const MODULES: &[(&str, Loader)] = &[("wio.io", io::load),
                                         ("wio.math", math::load),
                                         ("wio.util", util::load),
                                         ("wio.types", types::load)];

/// Finds the loader of the builtin module `name`.
///
/// ```
/// use wio::interpreter::modules::find;
///
/// assert!(find("wio.math").is_some());
/// assert!(find("wio.net").is_none());
/// ```
#[must_use]
pub fn find(name: &str) -> Option<Loader> {
    MODULES.iter()
           .find(|(module, _)| *module == name)
           .map(|(_, loader)| *loader)
}

/// One parameter of a native overload.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// The accepted kind.
    pub kind:   BindingKind,
    /// The argument is passed by reference.
    pub by_ref: bool,
}

/// A `var` parameter.
pub const VAR: ParamSpec = ParamSpec { kind:   BindingKind::Var,
                                       by_ref: false, };
/// An `array` parameter.
pub const ARRAY: ParamSpec = ParamSpec { kind:   BindingKind::Array,
                                         by_ref: false, };
/// A `dict` parameter.
pub const DICT: ParamSpec = ParamSpec { kind:   BindingKind::Dict,
                                        by_ref: false, };
/// An `omni` parameter.
pub const OMNI: ParamSpec = ParamSpec { kind:   BindingKind::Omni,
                                        by_ref: false, };
/// A `ref array` parameter.
pub const REF_ARRAY: ParamSpec = ParamSpec { kind:   BindingKind::Array,
                                             by_ref: true, };

/// One entry of a module's native table.
pub struct NativeDef {
    /// The function name.
    pub name:   &'static str,
    /// The parameter list.
    pub params: &'static [ParamSpec],
    /// The implementation.
    pub func:   NativeFn,
}

/// Binds every function of `table` in `scope`.
///
/// Entries sharing a name become overloads of one constant function symbol.
///
/// # Errors
/// `DuplicateSymbol` if a name is already bound in `scope`.
pub fn register(scope: &ScopeRef, table: &[NativeDef]) -> EvalResult<()> {
    let mut functions: IndexMap<&str, FunctionValue> = IndexMap::new();

    for def in table {
        let params = def.params
                        .iter()
                        .enumerate()
                        .map(|(index, shape)| Param { name:     format!("arg{index}"),
                                                      kind:     shape.kind,
                                                      by_ref:   shape.by_ref,
                                                      location: Location::default(), })
                        .collect();
        let overload = Overload { params,
                                  body: OverloadBody::Native(def.func),
                                  closure: Rc::clone(scope),
                                  unit: None };

        match functions.get_mut(def.name) {
            Some(function) => function.add_overload(overload, Location::default())?,
            None => {
                functions.insert(def.name, FunctionValue::new(def.name, overload));
            },
        }
    }

    trace!(count = functions.len(), "registering natives");

    let mut scope = scope.borrow_mut();
    for (name, function) in functions {
        scope.insert(Symbol::constant(name, SymbolKind::Function, Value::Function(function)),
                     Location::default())?;
    }
    Ok(())
}

/// Binds a named constant in `scope`.
pub fn constant(scope: &ScopeRef, name: &str, value: Value) -> EvalResult<()> {
    scope.borrow_mut()
         .insert(Symbol::constant(name, SymbolKind::Variable(BindingKind::Var), value),
                 Location::default())
}
