use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    ast::{BindingDecl, BindingKind, EnumDecl, FunctionDecl, FunctionShape, Location, RealmDecl, Storage, TypeKind},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::{Scope, ScopeKind, ScopeRef, Symbol, SymbolKind},
        value::{
            composite::{EnumValue, RealmValue},
            core::Value,
            function::{FunctionValue, Overload, OverloadBody},
        },
    },
};

impl Context {
    /// Returns the scope a declaration with the given storage qualifier
    /// inserts into.
    #[must_use]
    pub fn target_scope(&self, storage: Storage) -> ScopeRef {
        match storage {
            Storage::Global => Rc::clone(&self.global),
            Storage::Default | Storage::Local => Rc::clone(&self.scope),
        }
    }

    /// Declares a `var`, `array`, `dict` or `omni` binding.
    ///
    /// The symbol exists before its initializer runs, so an initializer that
    /// reads the declared name fails with `UnboundSymbol` instead of reaching
    /// an outer binding. A `ref` binding aliases the storage its initializer
    /// denotes; any other binding holds a private copy.
    ///
    /// Without an initializer the binding starts out as `null`, or empty for
    /// `array` and `dict`.
    ///
    /// # Errors
    /// - `DuplicateSymbol` if the name exists in the target scope.
    /// - `DeclaredTypeMismatch` if the value does not fit the declaration.
    pub fn declare_binding(&mut self, decl: &BindingDecl) -> EvalResult<()> {
        let scope = self.target_scope(decl.qualifiers.storage);

        let mut symbol = Symbol::new(&decl.name, SymbolKind::Variable(decl.kind));
        symbol.is_const = decl.qualifiers.is_const;
        symbol.is_ref = decl.qualifiers.is_ref;
        scope.borrow_mut().insert(symbol, decl.location)?;

        let (handle, aliases_const) = match &decl.initializer {
            None => (Self::default_value(decl.kind).into_handle(), false),
            Some(init) if decl.qualifiers.is_ref => {
                let place = self.eval_place(init)?;
                (place.handle, place.is_const)
            },
            Some(init) => (self.eval(init)?.deep_clone().into_handle(), false),
        };

        if decl.initializer.is_some() {
            let found = handle.borrow().type_kind();
            let fits = match decl.annotation {
                Some(annotation) if annotation != TypeKind::Omni => annotation == found,
                _ => decl.kind.accepts(found),
            };
            if !fits {
                scope.borrow_mut().remove(&decl.name);
                let declared = decl.annotation
                                   .map_or_else(|| decl.kind.keyword().to_string(), |kind| kind.name().to_string());
                return Err(RuntimeError::DeclaredTypeMismatch { name: decl.name.clone(),
                                                                declared,
                                                                found: found.name().to_string(),
                                                                location: decl.location });
            }
        }

        let mut scope = scope.borrow_mut();
        if let Some(symbol) = scope.symbols.get_mut(&decl.name) {
            symbol.is_const |= aliases_const;
            symbol.value = Some(handle);
        }
        Ok(())
    }

    fn default_value(kind: BindingKind) -> Value {
        match kind {
            BindingKind::Array => Value::Array(Vec::new()),
            BindingKind::Dict => Value::Dict(IndexMap::new()),
            BindingKind::Var | BindingKind::Func | BindingKind::Omni => Value::Null,
        }
    }

    /// Declares or defines a function.
    ///
    /// A signature adds an overload to the function of the same name in the
    /// target scope, creating it on first use. A body-less signature is a
    /// forward declaration which a later definition with the same parameter
    /// kinds replaces. The alias and lambda forms bind a function value (or
    /// `null`) directly.
    ///
    /// # Errors
    /// - `DuplicateOverload` if an overload with the same parameter kinds is
    ///   already defined.
    /// - `DuplicateSymbol` if the name is taken by something other than a
    ///   function.
    /// - `DeclaredTypeMismatch` if an alias names something other than a
    ///   function.
    pub fn declare_function(&mut self, decl: &FunctionDecl) -> EvalResult<()> {
        let scope = self.target_scope(decl.qualifiers.storage);

        let value = match &decl.shape {
            FunctionShape::Signature { params, body } => {
                let body = body.as_ref()
                               .map_or(OverloadBody::Forward, |body| OverloadBody::Script(Rc::clone(body)));
                let overload = Overload { params: Rc::clone(params),
                                          body,
                                          closure: Rc::clone(&scope),
                                          unit: self.current_unit().cloned() };
                return Self::add_overload(&scope, decl, overload);
            },
            FunctionShape::Alias(None) => Value::Null,
            FunctionShape::Alias(Some(expr)) => match self.eval(expr)? {
                value @ (Value::Function(_) | Value::Null) => value,
                other => {
                    return Err(RuntimeError::DeclaredTypeMismatch { name:     decl.name.clone(),
                                                                    declared: TypeKind::Function.name().to_string(),
                                                                    found:    other.type_name().to_string(),
                                                                    location: decl.location, });
                },
            },
            FunctionShape::Lambda(expr) => match self.eval(expr)? {
                Value::Function(mut function) => {
                    function.name.clone_from(&decl.name);
                    Value::Function(function)
                },
                other => other,
            },
        };

        let mut symbol = Symbol::new(&decl.name, SymbolKind::Function);
        symbol.is_const = decl.qualifiers.is_const;
        symbol.value = Some(value.into_handle());
        scope.borrow_mut().insert(symbol, decl.location)
    }

    fn add_overload(scope: &ScopeRef, decl: &FunctionDecl, overload: Overload) -> EvalResult<()> {
        let existing = scope.borrow().get_local(&decl.name).cloned();

        let Some(existing) = existing else {
            let mut symbol = Symbol::new(&decl.name, SymbolKind::Function);
            symbol.is_const = decl.qualifiers.is_const;
            symbol.value = Some(Value::Function(FunctionValue::new(&decl.name, overload)).into_handle());
            return scope.borrow_mut().insert(symbol, decl.location);
        };

        let handle = match (existing.kind, existing.value) {
            (SymbolKind::Function, Some(handle)) => handle,
            _ => {
                return Err(RuntimeError::DuplicateSymbol { name:     decl.name.clone(),
                                                           location: decl.location, });
            },
        };

        let mut value = handle.borrow_mut();
        match &mut *value {
            Value::Function(function) => function.add_overload(overload, decl.location),
            Value::Null => {
                *value = Value::Function(FunctionValue::new(&decl.name, overload));
                Ok(())
            },
            _ => {
                Err(RuntimeError::DuplicateSymbol { name:     decl.name.clone(),
                                                    location: decl.location, })
            },
        }
    }

    /// Declares an enum.
    ///
    /// A member without an explicit value takes the previous member's value
    /// plus one; the first member defaults to zero.
    ///
    /// # Errors
    /// - `DuplicateSymbol` for a repeated member name or a taken enum name.
    /// - `Overflow` if an implicit value exceeds the integer range.
    pub fn declare_enum(&mut self, decl: &EnumDecl) -> EvalResult<()> {
        let scope = self.target_scope(decl.qualifiers.storage);
        let members_scope = Scope::new(ScopeKind::Member, Some(Rc::clone(&scope)));

        let mut members = Vec::with_capacity(decl.members.len());
        let mut previous: Option<i64> = None;
        for member in &decl.members {
            let value = match (member.value, previous) {
                (Some(value), _) => value,
                (None, None) => 0,
                (None, Some(previous)) => {
                    previous.checked_add(1)
                            .ok_or(RuntimeError::Overflow { location: member.location })?
                },
            };
            previous = Some(value);

            members_scope.borrow_mut()
                         .insert(Symbol::constant(&member.name,
                                                  SymbolKind::Variable(BindingKind::Var),
                                                  Value::Integer(value)),
                                 member.location)?;
            members.push((member.name.clone(), value));
        }

        debug!(name = %decl.name, members = members.len(), "declared enum");

        let value = Value::Enum(Rc::new(EnumValue { name: decl.name.clone(),
                                                    members,
                                                    scope: members_scope }));
        Self::insert_declaration(&scope, &decl.name, SymbolKind::Enum, value, decl.location)
    }

    /// Declares a realm.
    ///
    /// The body runs in the realm's own member scope, whose parent is the
    /// declaring scope, so realm members may refer to each other and to
    /// anything visible at the declaration.
    pub fn declare_realm(&mut self, decl: &RealmDecl) -> EvalResult<()> {
        let scope = self.target_scope(decl.qualifiers.storage);

        let mut symbol = Symbol::new(&decl.name, SymbolKind::Realm);
        symbol.is_const = true;
        scope.borrow_mut().insert(symbol, decl.location)?;

        let members = Scope::new(ScopeKind::Member, Some(Rc::clone(&scope)));
        self.within(Rc::clone(&members), |ctx| ctx.exec_statements(&decl.body))?;

        debug!(name = %decl.name, members = members.borrow().symbols.len(), "declared realm");

        let realm = Value::Realm(Rc::new(RealmValue { name: decl.name.clone(),
                                                      members }));
        scope.borrow_mut().bind(&decl.name, realm.into_handle());
        Ok(())
    }

    /// Inserts a constant symbol for an enum, realm or unit declaration.
    pub fn insert_declaration(scope: &ScopeRef,
                              name: &str,
                              kind: SymbolKind,
                              value: Value,
                              location: Location)
                              -> EvalResult<()> {
        scope.borrow_mut()
             .insert(Symbol::constant(name, kind, value), location)
    }
}
