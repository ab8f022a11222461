/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions: arithmetic
/// with integer/float promotion, string concatenation, bitwise operators,
/// comparisons and logical operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, logical and bitwise not, and prefix/postfix increment
/// and decrement on addressable storage.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the runtime context, the expression and statement dispatchers,
/// control-flow signals and scope entry and exit.
pub mod core;

/// Evaluation of loops.
///
/// Implements `while`, `for` and `foreach`, opening a fresh scope for every
/// iteration and consuming `break` and `continue` signals.
pub mod loops;

/// Storage resolution.
///
/// Resolves identifiers, array and dictionary elements and members to the
/// storage they denote, and enforces unit member access levels.
pub mod access;

/// Assignment.
///
/// Plain and compound assignment to resolved storage.
pub mod assignment;

/// Declarations.
///
/// Bindings, functions and their overloads, enums and realms.
pub mod declaration;

/// Units.
///
/// Unit declaration with composition checks, instantiation, constructors and
/// destructors.
pub mod unit;

/// Function evaluation.
///
/// Handles script and native function calls, overload selection and argument
/// binding.
pub mod function;

/// Imports of builtin modules and source files.
pub mod import;

/// Utility functions for evaluation.
///
/// Provides helpers shared by evaluation logic.
pub mod utils;
