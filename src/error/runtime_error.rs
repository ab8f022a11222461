use std::path::PathBuf;

use thiserror::Error;

use crate::ast::Location;

/// Represents all errors that can occur during evaluation and runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Tried to use an identifier that is not declared in any visible scope.
    #[error("Error on {location}: Unknown identifier '{name}'.")]
    UnknownVariable {
        /// The name of the identifier.
        name:     String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// The identifier is declared, but no value is bound to it yet.
    #[error("Error on {location}: '{name}' is declared but has no value.")]
    UnboundSymbol {
        /// The name of the symbol.
        name:     String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// A name was declared twice in the same scope.
    #[error("Error on {location}: '{name}' is already declared in this scope.")]
    DuplicateSymbol {
        /// The name of the symbol.
        name:     String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// A function overload with the same signature already has a body.
    #[error("Error on {location}: Function '{name}{signature}' is already defined.")]
    DuplicateOverload {
        /// The name of the function.
        name:      String,
        /// The conflicting parameter signature.
        signature: String,
        /// The source location where the error occurred.
        location:  Location,
    },
    /// The operand kinds are not accepted by the operator.
    #[error("Error on {location}: Type error: {details}.")]
    TypeMismatch {
        /// Details about the type mismatch.
        details:  String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// A value of the wrong kind was bound to a declaration.
    #[error("Error on {location}: Cannot bind a value of type {found} to '{name}' of type {declared}.")]
    DeclaredTypeMismatch {
        /// The declared name.
        name:     String,
        /// The declared type.
        declared: String,
        /// The actual type of the value.
        found:    String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// A boolean value was expected, but not found.
    #[error("Error on {location}: Expected boolean, found {found}.")]
    ExpectedBoolean {
        /// The type that was found instead.
        found:    String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// Attempted division or modulo by zero.
    #[error("Error on {location}: Division by zero.")]
    DivisionByZero {
        /// The source location where the error occurred.
        location: Location,
    },
    /// Arithmetic operation overflowed.
    #[error("Error on {location}: Integer overflow while trying to compute result.")]
    Overflow {
        /// The source location where the error occurred.
        location: Location,
    },
    /// Tried to access an array element outside the allowed bounds.
    #[error("Error on {location}: Index {index} is out of bounds for an array of size {size}.")]
    IndexOutOfBounds {
        /// The index that was actually requested.
        index:    i64,
        /// The size of the array.
        size:     usize,
        /// The source location where the error occurred.
        location: Location,
    },
    /// The dictionary has no entry for the key.
    #[error("Error on {location}: Key '{key}' does not exist.")]
    MissingKey {
        /// The canonical key.
        key:      String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// A dictionary literal or insertion repeated a key.
    #[error("Error on {location}: Key '{key}' already exists.")]
    DuplicateKey {
        /// The canonical key.
        key:      String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// The value cannot act as a dictionary key.
    #[error("Error on {location}: A value of type {found} cannot be used as a dictionary key.")]
    InvalidKey {
        /// The type of the rejected key.
        found:    String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// The target has no member with this name.
    #[error("Error on {location}: '{target}' has no member '{name}'.")]
    UnknownMember {
        /// Textual form of the accessed value.
        target:   String,
        /// The requested member.
        name:     String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// The member exists, but the caller may not reach it.
    #[error("Error on {location}: Member '{name}' of '{owner}' is {access}.")]
    AccessDenied {
        /// The requested member.
        name:     String,
        /// The unit owning the member.
        owner:    String,
        /// The access level of the member.
        access:   String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// Attempted to modify a constant value.
    #[error("Error on {location}: Cannot modify constant '{name}'.")]
    ConstModification {
        /// Textual form of the modified expression.
        name:     String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// Attempted to call something that is not a function.
    #[error("Error on {location}: A value of type {found} is not callable.")]
    NotCallable {
        /// The type of the callee.
        found:    String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// No overload accepts the supplied argument kinds.
    #[error("Error on {location}: No overload of '{name}' accepts arguments {signature}.")]
    NoMatchingOverload {
        /// The name of the function.
        name:      String,
        /// The argument kinds that were supplied.
        signature: String,
        /// The source location where the error occurred.
        location:  Location,
    },
    /// More than one overload accepts the supplied argument kinds.
    #[error("Error on {location}: Call to '{name}' with arguments {signature} is ambiguous.")]
    AmbiguousCall {
        /// The name of the function.
        name:      String,
        /// The argument kinds that were supplied.
        signature: String,
        /// The source location where the error occurred.
        location:  Location,
    },
    /// The selected overload was declared but never defined.
    #[error("Error on {location}: Function '{name}{signature}' is declared but never defined.")]
    UndefinedOverload {
        /// The name of the function.
        name:      String,
        /// The parameter signature of the forward declaration.
        signature: String,
        /// The source location where the error occurred.
        location:  Location,
    },
    /// An argument was invalid or out of range.
    #[error("Error on {location}: Invalid argument: {details}.")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details:  String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// `break` or `continue` executed outside of a loop.
    #[error("Error on {location}: '{keyword}' outside of a loop.")]
    LoopControlOutsideLoop {
        /// `break` or `continue`.
        keyword:  &'static str,
        /// The source location where the error occurred.
        location: Location,
    },
    /// `return` executed outside of a function body.
    #[error("Error on {location}: 'return' outside of a function.")]
    ReturnOutsideFunction {
        /// The source location where the error occurred.
        location: Location,
    },
    /// A unit cannot be composed as requested.
    #[error("Error on {location}: Invalid composition of unit '{unit}': {details}.")]
    InvalidComposition {
        /// The unit being declared.
        unit:     String,
        /// Why the composition was rejected.
        details:  String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// An import named a `wio.` module that does not exist.
    #[error("Error on {location}: Unknown builtin module '{name}'.")]
    UnknownModule {
        /// The requested module.
        name:     String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// An imported file could not be read.
    #[error("Error on {location}: Cannot import '{}': {reason}.", path.display())]
    ImportFailed {
        /// The resolved path.
        path:     PathBuf,
        /// The underlying I/O failure.
        reason:   String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// An imported file failed while being parsed or evaluated.
    #[error("In module '{}': {source}", path.display())]
    InModule {
        /// The imported file.
        path:   PathBuf,
        /// The failure inside that file.
        source: Box<crate::error::Error>,
    },
    /// An assertion failed during execution.
    #[error("Error on {location}: Assertion failed.")]
    AssertionFailed {
        /// The source location where the error occurred.
        location: Location,
    },
    /// Reading from standard input failed.
    #[error("Error on {location}: Input error: {details}.")]
    Input {
        /// The underlying failure.
        details:  String,
        /// The source location where the error occurred.
        location: Location,
    },
}
