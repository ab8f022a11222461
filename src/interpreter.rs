/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// manages bindings and scopes, selects function overloads and builds unit
/// instances. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles declarations, calls, imports and control flow.
/// - Reports runtime errors such as division by zero or access violations.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// identifiers, operators, delimiters, and keywords. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source locations.
/// - Handles numeric, character and string literals, identifiers, keywords
///   and operators.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// Builtin modules.
///
/// Native function tables and constants for `wio.io`, `wio.math`,
/// `wio.util` and `wio.types`, registered into the builtin scope when
/// preloaded or imported.
pub mod modules;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of statements, declarations
/// and expressions.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates grammar, qualifier placement and control-flow placement,
///   reporting errors with location info.
pub mod parser;
/// Lexical scopes and symbols.
///
/// Scopes form a chain from the innermost block to the builtin scope and are
/// shared with closures and member tables.
pub mod scope;
/// Options and per-run state such as the import registry.
pub mod session;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the dynamic values programs compute with: scalars,
/// collections, functions with their overloads, enums, realms, units and unit
/// instances.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Implements deep copying, display and kind reporting.
/// - Models overload sets and unit composition.
pub mod value;
