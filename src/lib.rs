//! # wio
//!
//! wio is a dynamically-typed scripting language written in Rust.
//! It tokenizes, parses, validates and evaluates programs with support for
//! variables, overloaded functions, lambdas, enums, realms, units with access
//! control and composition, file imports, and builtin modules.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::{fs, path::Path};

use crate::{
    ast::Program,
    error::{Error, ParseError},
    interpreter::{
        evaluator::core::Context,
        lexer::tokenize,
        parser::core::parse_program,
        session::{RunOptions, Session},
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and the declaration
/// types that represent the syntactic structure of a program as a tree. The
/// AST is built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression, statement and declaration types for all language
///   constructs.
/// - Attaches source locations to AST nodes for error reporting.
/// - Defines the declared-type vocabulary shared by parser and evaluator.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing, or
/// evaluating code. Every error carries the line and column it refers to.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Wraps errors of imported files with the file they occurred in.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, scopes, values and
/// builtin modules to provide a complete runtime for wio programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides the builtin modules available to programs.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// This module provides conversion routines that are used throughout the
/// evaluator and the builtin modules.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Normalize array indices.
pub mod util;

/// Tokenizes and parses a complete source text.
///
/// # Example
/// ```
/// let program = wio::parse_source("var x = 1; if (x == 1) { x++; }").unwrap();
/// assert_eq!(program.statements.len(), 2);
///
/// assert!(wio::parse_source("var = 1;").is_err());
/// ```
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    parse_program(&tokens)
}

/// Parses and runs a program given as source text.
///
/// Relative file imports resolve against the working directory.
///
/// # Errors
/// Returns an error if parsing or evaluation fails.
///
/// # Examples
/// ```
/// use wio::{interpreter::session::RunOptions, run_source};
///
/// let source = "var x = 2 + 2; assert(x == 4);";
/// assert!(run_source(source, RunOptions::default()).is_ok());
///
/// // 'y' is not defined.
/// let source = "var x = y + 1;";
/// assert!(run_source(source, RunOptions::default()).is_err());
/// ```
pub fn run_source(source: &str, options: RunOptions) -> Result<(), Error> {
    run(source, Session::new(options))
}

/// Reads, parses and runs the program stored in `path`.
///
/// Relative imports resolve against the directory of `path`.
///
/// # Errors
/// Returns an error if the file cannot be read, or if parsing or evaluation
/// fails.
pub fn run_file(path: &Path, options: RunOptions) -> Result<(), Error> {
    let io_error = |source| Error::Io { path: path.to_path_buf(),
                                        source };

    let path = fs::canonicalize(path).map_err(io_error)?;
    let source = fs::read_to_string(&path).map_err(io_error)?;
    run(&source, Session::with_entry_file(options, &path))
}

fn run(source: &str, session: Session) -> Result<(), Error> {
    let tokens = tokenize(source)?;
    if session.options.show_tokens {
        for (token, location) in &tokens {
            println!("{location}: {token:?}");
        }
    }

    let program = parse_program(&tokens)?;
    if session.options.show_ast {
        println!("{program:#?}");
    }

    if session.options.no_run {
        return Ok(());
    }

    let mut context = Context::new(session)?;
    context.run(&program)?;
    Ok(())
}
