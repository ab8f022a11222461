use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{
    ast::{LiteralValue, Location, TypeKind},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            composite::{EnumValue, Instance, RealmValue, UnitValue},
            function::FunctionValue,
        },
    },
};

/// Shared, mutable storage for one value.
///
/// Every binding, array element, dictionary entry and member owns a handle.
/// Handles are only shared between bindings when a `ref` declaration or
/// parameter asks for it; everything else receives a [`Value::deep_clone`].
pub type Handle = Rc<RefCell<Value>>;

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible kinds of values that can appear in
/// expressions, bindings, function arguments and returns.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absence of a value.
    Null,
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double precision floating-point number.
    Float(f64),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison and logical operators and required by
    /// conditions.
    Bool(bool),
    /// A single character.
    Char(char),
    /// A string.
    String(String),
    /// An ordered sequence of elements.
    Array(Vec<Handle>),
    /// A mapping from canonical key strings to values, in insertion order.
    Dict(IndexMap<String, Handle>),
    /// A named set of overloads.
    Function(FunctionValue),
    /// An enum with its member table.
    Enum(Rc<EnumValue>),
    /// A unit declaration.
    Unit(Rc<UnitValue>),
    /// An instance of a unit with its own member table.
    Instance(Instance),
    /// A namespace.
    Realm(Rc<RealmValue>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(v.into_iter().map(Self::into_handle).collect())
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Integer(n) => Self::Integer(*n),
            LiteralValue::Float(r) => Self::Float(*r),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Char(c) => Self::Char(*c),
            LiteralValue::String(s) => Self::String(s.clone()),
            LiteralValue::Null => Self::Null,
        }
    }
}

impl Value {
    /// Wraps the value into fresh storage.
    #[must_use]
    pub fn into_handle(self) -> Handle {
        Rc::new(RefCell::new(self))
    }

    /// Copies the value so that the copy shares no storage with `self`.
    ///
    /// Arrays, dictionaries and unit instances are copied recursively.
    /// Members of an instance that were declared `ref` keep aliasing their
    /// target. Functions, enums, units and realms are immutable declarations
    /// and are shared.
    ///
    /// # Example
    /// ```
    /// use wio::interpreter::value::core::Value;
    ///
    /// let original = Value::from(vec![Value::Integer(1)]);
    /// let copy = original.deep_clone();
    ///
    /// if let (Value::Array(a), Value::Array(b)) = (&original, &copy) {
    ///     *b[0].borrow_mut() = Value::Integer(2);
    ///     assert!(matches!(*a[0].borrow(), Value::Integer(1)));
    /// }
    /// ```
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        match self {
            Self::Array(elements) => Self::Array(elements.iter().map(deep_clone_handle).collect()),
            Self::Dict(entries) => {
                Self::Dict(entries.iter()
                                  .map(|(key, value)| (key.clone(), deep_clone_handle(value)))
                                  .collect())
            },
            Self::Instance(instance) => Self::Instance(instance.deep_clone()),
            other => other.clone(),
        }
    }

    /// The type reported by `typeof`.
    #[must_use]
    pub const fn type_kind(&self) -> TypeKind {
        match self {
            Self::Null => TypeKind::Null,
            Self::Integer(_) => TypeKind::Integer,
            Self::Float(_) => TypeKind::Float,
            Self::Bool(_) => TypeKind::Bool,
            Self::Char(_) => TypeKind::Character,
            Self::String(_) => TypeKind::String,
            Self::Array(_) => TypeKind::Array,
            Self::Dict(_) => TypeKind::Dictionary,
            Self::Function(_) => TypeKind::Function,
            Self::Enum(_) => TypeKind::Enum,
            Self::Unit(_) => TypeKind::Unit,
            Self::Instance(_) => TypeKind::UnitInstance,
            Self::Realm(_) => TypeKind::Realm,
        }
    }

    /// Name of the value's type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_kind().name()
    }

    /// Converts the value to `bool`, or returns an error if not boolean.
    ///
    /// Used for conditions and logical operators.
    ///
    /// # Parameters
    /// - `location`: Source location for error reporting.
    pub fn as_bool(&self, location: Location) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(RuntimeError::ExpectedBoolean { found: other.type_name().to_string(),
                                                         location }),
        }
    }

    /// Converts the value to `i64`, or returns an error if not an integer.
    pub fn as_integer(&self, location: Location) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            other => Err(RuntimeError::TypeMismatch { details: format!("expected int, found {}", other.type_name()),
                                                      location }),
        }
    }

    /// Converts a numeric value to `f64`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self, location: Location) -> EvalResult<f64> {
        match self {
            Self::Integer(n) => Ok(*n as f64),
            Self::Float(r) => Ok(*r),
            other => Err(RuntimeError::TypeMismatch { details: format!("expected a number, found {}", other.type_name()),
                                                      location }),
        }
    }

    /// Canonical dictionary key of a scalar.
    ///
    /// Integers and floats use their printed form, strings are used as-is and
    /// characters become one-character strings. Other kinds cannot be keys.
    ///
    /// # Example
    /// ```
    /// use wio::{ast::Location, interpreter::value::core::Value};
    ///
    /// assert_eq!(Value::Integer(7).dict_key(Location::default()).unwrap(), "7");
    /// assert_eq!(Value::Char('k').dict_key(Location::default()).unwrap(), "k");
    /// assert!(Value::Bool(true).dict_key(Location::default()).is_err());
    /// ```
    pub fn dict_key(&self, location: Location) -> EvalResult<String> {
        match self {
            Self::Integer(_) | Self::Float(_) | Self::String(_) | Self::Char(_) => Ok(self.to_string()),
            other => Err(RuntimeError::InvalidKey { found: other.type_name().to_string(),
                                                    location }),
        }
    }

    /// Returns `true` if the value is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders the value as it appears inside a collection: strings and
    /// characters are quoted.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Char(c) => write!(f, "{c:?}"),
            other => write!(f, "{other}"),
        }
    }
}

/// Deep-copies the value behind a handle into fresh storage.
#[must_use]
pub fn deep_clone_handle(handle: &Handle) -> Handle {
    handle.borrow().deep_clone().into_handle()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(r) => write!(f, "{r:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(elements) => {
                write!(f, "[")?;

                for (index, value) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    value.borrow().fmt_nested(f)?;
                }

                write!(f, "]")
            },
            Self::Dict(entries) => {
                write!(f, "{{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: ")?;
                    value.borrow().fmt_nested(f)?;
                }
                write!(f, "}}")
            },
            Self::Function(function) => write!(f, "<func {}>", function.name),
            Self::Enum(value) => write!(f, "<enum {}>", value.name),
            Self::Unit(unit) => write!(f, "<unit {}>", unit.identity.name),
            Self::Instance(instance) => write!(f, "<{}>", instance.unit.identity.name),
            Self::Realm(realm) => write!(f, "<realm {}>", realm.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nested_collections() {
        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), Value::from("x").into_handle());
        entries.insert("1".to_string(), Value::Float(2.0).into_handle());
        let dict = Value::Dict(entries);

        let array = Value::from(vec![Value::Integer(1), Value::Char('c'), dict]);
        assert_eq!(array.to_string(), r#"[1, 'c', {a: "x", 1: 2.0}]"#);
    }

    #[test]
    fn deep_clone_detaches_dictionaries() {
        let mut entries = IndexMap::new();
        entries.insert("k".to_string(), Value::Integer(1).into_handle());
        let original = Value::Dict(entries);
        let copy = original.deep_clone();

        if let Value::Dict(copied) = &copy {
            *copied["k"].borrow_mut() = Value::Integer(5);
        }
        let Value::Dict(entries) = &original else {
            panic!("expected a dictionary");
        };
        assert!(matches!(*entries["k"].borrow(), Value::Integer(1)));
    }

    #[test]
    fn float_keys_use_printed_form() {
        assert_eq!(Value::Float(1.5).dict_key(Location::default()).unwrap(), "1.5");
        assert_eq!(Value::Float(2.0).dict_key(Location::default()).unwrap(), "2.0");
    }
}
