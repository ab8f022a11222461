use crate::{
    ast::Location,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        modules::{ARRAY, DICT, OMNI, REF_ARRAY, VAR, register},
        scope::ScopeRef,
        value::{
            composite::EnumValue,
            core::{Handle, Value},
        },
    },
    util::num::{f64_to_i64_checked, usize_to_i64_checked},
};

native_functions! {
    "size"       => { params: &[ARRAY],           func: size },
    "size"       => { params: &[DICT],            func: size },
    "size"       => { params: &[VAR],             func: size },
    "push"       => { params: &[REF_ARRAY, OMNI], func: push },
    "pop"        => { params: &[REF_ARRAY],       func: pop },
    "keys"       => { params: &[DICT],            func: keys },
    "contains"   => { params: &[DICT, VAR],       func: contains },
    "to_string"  => { params: &[OMNI],            func: to_string },
    "to_int"     => { params: &[VAR],             func: to_int },
    "to_float"   => { params: &[VAR],             func: to_float },
    "assert"     => { params: &[VAR],             func: assert },
    "enum_name"  => { params: &[VAR, VAR],        func: enum_name },
    "enum_value" => { params: &[VAR, VAR],        func: enum_value },
    "enum_index" => { params: &[VAR, VAR],        func: enum_index },
}

/// Registers the utility functions.
pub fn load(scope: &ScopeRef) -> EvalResult<()> {
    register(scope, NATIVES)
}

/// Number of elements of an array or dictionary, or characters of a string.
fn size(args: &[Handle], location: Location) -> EvalResult<Value> {
    let count = match &*args[0].borrow() {
        Value::Array(elements) => elements.len(),
        Value::Dict(entries) => entries.len(),
        Value::String(text) => text.chars().count(),
        other => {
            return Err(RuntimeError::TypeMismatch { details: format!("a value of type {} has no size",
                                                                     other.type_name()),
                                                    location });
        },
    };
    Ok(Value::Integer(usize_to_i64_checked(count, location)?))
}

/// Appends a copy of the second argument to the array passed by reference.
fn push(args: &[Handle], _: Location) -> EvalResult<Value> {
    let element = args[1].borrow().deep_clone().into_handle();
    if let Value::Array(elements) = &mut *args[0].borrow_mut() {
        elements.push(element);
    }
    Ok(Value::Null)
}

/// Removes and returns the last element of the array passed by reference.
fn pop(args: &[Handle], location: Location) -> EvalResult<Value> {
    let popped = match &mut *args[0].borrow_mut() {
        Value::Array(elements) => elements.pop(),
        _ => None,
    };
    popped.map(|handle| handle.borrow().clone())
          .ok_or_else(|| RuntimeError::InvalidArgument { details: "cannot pop from an empty array".to_string(),
                                                         location })
}

fn keys(args: &[Handle], _: Location) -> EvalResult<Value> {
    let keys = match &*args[0].borrow() {
        Value::Dict(entries) => entries.keys().map(|key| Value::from(key.as_str())).collect(),
        _ => Vec::new(),
    };
    Ok(Value::from(keys))
}

fn contains(args: &[Handle], location: Location) -> EvalResult<Value> {
    let key = args[1].borrow().dict_key(location)?;
    let found = matches!(&*args[0].borrow(), Value::Dict(entries) if entries.contains_key(&key));
    Ok(Value::Bool(found))
}

fn to_string(args: &[Handle], _: Location) -> EvalResult<Value> {
    Ok(Value::String(args[0].borrow().to_string()))
}

/// Converts to an integer.
///
/// Floats are truncated toward zero, strings are parsed, characters yield
/// their code point and booleans `0` or `1`.
fn to_int(args: &[Handle], location: Location) -> EvalResult<Value> {
    let value = match &*args[0].borrow() {
        Value::Integer(n) => *n,
        Value::Float(f) => f64_to_i64_checked(*f, location)?,
        Value::String(text) => text.trim().parse().map_err(|_| {
                                                      RuntimeError::InvalidArgument { details: format!("'{text}' is not an integer"),
                                                                                      location }
                                                  })?,
        Value::Char(c) => i64::from(u32::from(*c)),
        Value::Bool(b) => i64::from(*b),
        other => {
            return Err(RuntimeError::TypeMismatch { details: format!("cannot convert {} to int", other.type_name()),
                                                    location });
        },
    };
    Ok(Value::Integer(value))
}

/// Converts to a float. Strings are parsed; other kinds must be numeric.
fn to_float(args: &[Handle], location: Location) -> EvalResult<Value> {
    let value = match &*args[0].borrow() {
        Value::String(text) => text.trim().parse().map_err(|_| {
                                                      RuntimeError::InvalidArgument { details: format!("'{text}' is not a number"),
                                                                                      location }
                                                  })?,
        other => other.as_float(location)?,
    };
    Ok(Value::Float(value))
}

/// Fails the run unless the argument is `true`.
fn assert(args: &[Handle], location: Location) -> EvalResult<Value> {
    if args[0].borrow().as_bool(location)? {
        Ok(Value::Null)
    } else {
        Err(RuntimeError::AssertionFailed { location })
    }
}

/// Name of the member of an enum with the given value.
fn enum_name(args: &[Handle], location: Location) -> EvalResult<Value> {
    with_enum(args, location, |declared, selector| {
        let value = selector.as_integer(location)?;
        Ok(Value::from(declared.name_of(value, location)?))
    })
}

/// Value of the member of an enum with the given name.
fn enum_value(args: &[Handle], location: Location) -> EvalResult<Value> {
    with_enum(args, location, |declared, selector| {
        Ok(Value::Integer(declared.value_of(&member_name(selector, location)?, location)?))
    })
}

/// Declaration position of the member of an enum with the given name.
fn enum_index(args: &[Handle], location: Location) -> EvalResult<Value> {
    with_enum(args, location, |declared, selector| {
        let index = declared.index_of(&member_name(selector, location)?, location)?;
        Ok(Value::Integer(usize_to_i64_checked(index, location)?))
    })
}

fn with_enum(args: &[Handle],
             location: Location,
             body: impl FnOnce(&EnumValue, &Value) -> EvalResult<Value>)
             -> EvalResult<Value> {
    match &*args[0].borrow() {
        Value::Enum(declared) => body(declared, &args[1].borrow()),
        other => {
            Err(RuntimeError::TypeMismatch { details: format!("expected enum, found {}", other.type_name()),
                                             location })
        },
    }
}

fn member_name(value: &Value, location: Location) -> EvalResult<String> {
    match value {
        Value::String(name) => Ok(name.clone()),
        other => {
            Err(RuntimeError::TypeMismatch { details: format!("expected a member name, found {}", other.type_name()),
                                             location })
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(values: Vec<Value>) -> Vec<Handle> {
        values.into_iter().map(Value::into_handle).collect()
    }

    #[test]
    fn to_int_truncates_and_parses() {
        let location = Location::default();
        assert!(matches!(to_int(&handles(vec![Value::Float(-2.7)]), location).unwrap(), Value::Integer(-2)));
        assert!(matches!(to_int(&handles(vec![Value::from(" 42 ")]), location).unwrap(), Value::Integer(42)));
        assert!(matches!(to_int(&handles(vec![Value::Char('A')]), location).unwrap(), Value::Integer(65)));
        assert!(to_int(&handles(vec![Value::from("4x")]), location).is_err());
    }

    #[test]
    fn push_and_pop_modify_the_array() {
        let array = Value::from(vec![Value::Integer(1)]).into_handle();
        let args = vec![array.clone(), Value::Integer(2).into_handle()];
        push(&args, Location::default()).unwrap();

        let popped = pop(&[array.clone()], Location::default()).unwrap();
        assert!(matches!(popped, Value::Integer(2)));
        assert_eq!(array.borrow().to_string(), "[1]");
    }

    #[test]
    fn pop_from_empty_array_fails() {
        let array = Value::Array(Vec::new()).into_handle();
        assert!(matches!(pop(&[array], Location::default()),
                         Err(RuntimeError::InvalidArgument { .. })));
    }

    #[test]
    fn assert_requires_a_boolean() {
        let location = Location::default();
        assert!(assert(&handles(vec![Value::Bool(true)]), location).is_ok());
        assert!(matches!(assert(&handles(vec![Value::Bool(false)]), location),
                         Err(RuntimeError::AssertionFailed { .. })));
        assert!(matches!(assert(&handles(vec![Value::Integer(1)]), location),
                         Err(RuntimeError::ExpectedBoolean { .. })));
    }
}
