use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{
    ast::{Access, BindingKind, Location},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            composite::UnitIdentity,
            core::{Handle, Value},
        },
    },
};

/// Shared, mutable handle to a scope.
///
/// Scopes are shared between the evaluator's scope chain, closures of the
/// functions declared in them, and the member tables of enums, realms, units
/// and unit instances.
pub type ScopeRef = Rc<RefCell<Scope>>;

/// The role of a scope in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Holds the preloaded builtin modules. Root of every chain.
    Builtin,
    /// The top level of the program and of imported files.
    Global,
    /// The header scope of a `for` loop, holding its initializer.
    Local,
    /// The parameters of a running function.
    Function,
    /// The statements of a running function.
    FunctionBody,
    /// A block or one loop iteration.
    Block,
    /// The member table of an enum, realm, unit or unit instance.
    Member,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Builtin => "builtin",
                        Self::Global => "global",
                        Self::Local => "local",
                        Self::Function => "function",
                        Self::FunctionBody => "function body",
                        Self::Block => "block",
                        Self::Member => "member",
                    })
    }
}

/// What kind of declaration introduced a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// `var`, `array`, `dict`, `omni` or a parameter.
    Variable(BindingKind),
    /// `func`
    Function,
    /// `enum`
    Enum,
    /// `realm`
    Realm,
    /// `unit`
    Unit,
}

/// Unit-member information attached to symbols in unit member scopes.
#[derive(Debug, Clone)]
pub struct Membership {
    /// Effective access level.
    pub access:   Access,
    /// Whether the member is folded into composed units instead of own
    /// instances.
    pub is_outer: bool,
    /// The unit that declared the member.
    pub owner:    Rc<UnitIdentity>,
}

/// A named entry of a scope.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// The declared name.
    pub name:       String,
    /// The declaring construct.
    pub kind:       SymbolKind,
    /// Storage of the bound value; `None` until the declaration binds it.
    pub value:      Option<Handle>,
    /// The binding cannot be modified.
    pub is_const:   bool,
    /// The binding aliases storage owned elsewhere.
    pub is_ref:     bool,
    /// Present for unit members.
    pub membership: Option<Membership>,
}

impl Symbol {
    /// Creates an unbound, mutable, owning symbol.
    #[must_use]
    pub fn new(name: &str, kind: SymbolKind) -> Self {
        Self { name: name.to_string(),
               kind,
               value: None,
               is_const: false,
               is_ref: false,
               membership: None }
    }

    /// Creates a constant symbol bound to `value`, as used for builtin
    /// constants and enum members.
    #[must_use]
    pub fn constant(name: &str, kind: SymbolKind, value: Value) -> Self {
        Self { value: Some(value.into_handle()),
               is_const: true,
               ..Self::new(name, kind) }
    }

    /// Returns the bound value, or `UnboundSymbol` for a symbol that is
    /// declared but not yet initialized.
    pub fn handle(&self, location: Location) -> EvalResult<Handle> {
        self.value
            .clone()
            .ok_or_else(|| RuntimeError::UnboundSymbol { name: self.name.clone(),
                                                         location })
    }
}

/// A mapping from names to symbols with a link to the enclosing scope.
#[derive(Debug)]
pub struct Scope {
    /// The role of the scope.
    pub kind:    ScopeKind,
    /// Symbols in declaration order.
    pub symbols: IndexMap<String, Symbol>,
    /// The enclosing scope; `None` only for the builtin scope.
    pub parent:  Option<ScopeRef>,
}

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new(kind: ScopeKind, parent: Option<ScopeRef>) -> ScopeRef {
        Rc::new(RefCell::new(Self { kind,
                                    symbols: IndexMap::new(),
                                    parent }))
    }

    /// Adds a symbol to this scope.
    ///
    /// Shadowing a symbol of an enclosing scope is allowed.
    ///
    /// # Errors
    /// `DuplicateSymbol` if the name already exists in this scope.
    pub fn insert(&mut self, symbol: Symbol, location: Location) -> EvalResult<()> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(RuntimeError::DuplicateSymbol { name: symbol.name,
                                                       location });
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Binds storage to a symbol of this scope.
    pub fn bind(&mut self, name: &str, handle: Handle) {
        if let Some(symbol) = self.symbols.get_mut(name) {
            symbol.value = Some(handle);
        }
    }

    /// Returns the symbol declared in exactly this scope.
    #[must_use]
    pub fn get_local(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Removes a symbol again, used when a declaration fails after inserting.
    pub fn remove(&mut self, name: &str) {
        self.symbols.shift_remove(name);
    }
}

/// Looks up `name` from `scope` outwards.
///
/// # Returns
/// A copy of the innermost symbol with this name, or `None` if no scope in the
/// chain declares it.
///
/// # Example
/// ```
/// use wio::{
///     ast::{BindingKind, Location},
///     interpreter::scope::{Scope, ScopeKind, Symbol, SymbolKind, lookup},
/// };
///
/// let global = Scope::new(ScopeKind::Global, None);
/// let block = Scope::new(ScopeKind::Block, Some(global.clone()));
///
/// global.borrow_mut()
///       .insert(Symbol::new("x", SymbolKind::Variable(BindingKind::Var)), Location::default())
///       .unwrap();
///
/// assert_eq!(lookup(&block, "x").unwrap().name, "x");
/// assert!(lookup(&block, "y").is_none());
/// ```
#[must_use]
pub fn lookup(scope: &ScopeRef, name: &str) -> Option<Symbol> {
    let mut current = Some(scope.clone());
    while let Some(scope) = current {
        let scope = scope.borrow();
        if let Some(symbol) = scope.symbols.get(name) {
            return Some(symbol.clone());
        }
        current = scope.parent.clone();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BindingKind;

    fn var(name: &str) -> Symbol {
        Symbol::new(name, SymbolKind::Variable(BindingKind::Var))
    }

    #[test]
    fn duplicate_in_same_scope_fails() {
        let scope = Scope::new(ScopeKind::Global, None);
        scope.borrow_mut().insert(var("a"), Location::default()).unwrap();

        let result = scope.borrow_mut().insert(var("a"), Location::new(2, 1));
        assert!(matches!(result, Err(RuntimeError::DuplicateSymbol { .. })));
    }

    #[test]
    fn shadowing_an_outer_scope_is_allowed() {
        let global = Scope::new(ScopeKind::Global, None);
        let block = Scope::new(ScopeKind::Block, Some(global.clone()));
        global.borrow_mut().insert(var("a"), Location::default()).unwrap();
        block.borrow_mut()
             .insert(Symbol::constant("a", SymbolKind::Variable(BindingKind::Var), Value::Integer(2)),
                     Location::default())
             .unwrap();

        assert!(lookup(&block, "a").unwrap().is_const);
        assert!(!lookup(&global, "a").unwrap().is_const);
    }

    #[test]
    fn unbound_symbol_reports_its_name() {
        let symbol = var("late");
        let error = symbol.handle(Location::new(3, 4)).unwrap_err();
        assert_eq!(error.to_string(),
                   "Error on line 3, column 4: 'late' is declared but has no value.");
    }
}
