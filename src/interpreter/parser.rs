/// Core parser entry points.
///
/// Contains the program driver, the expression entry point and the shared
/// result type.
pub mod core;

/// Unary, postfix and primary expressions.
///
/// Handles prefix operators, calls, indexing, member access, instantiation,
/// literals, lambdas and `typeof`.
pub mod unary;

/// Binary operators and assignment.
///
/// Implements precedence climbing over the binary operator table and
/// right-associative assignment on top of it.
pub mod binary;

/// Declarations.
///
/// Parses qualifiers and every declaration form: bindings, functions, enums,
/// realms and units with their member bodies.
pub mod declaration;

/// Statement parsing.
///
/// Implements blocks, control flow, imports and expression statements, and
/// dispatches declarations.
pub mod statement;

/// Utility functions for the parser.
///
/// Provides token expectations, list parsing and identifier helpers.
pub mod utils;

/// Static checks run on a complete program.
pub mod validate;
