use std::path::PathBuf;

use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include malformed literals, unexpected tokens, misplaced
/// qualifiers and declarations whose initializer cannot match the declared
/// type.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution.
/// Runtime errors include type mismatches, unknown identifiers, out of bounds
/// accesses, overload failures and access violations.
pub mod runtime_error;

pub use parse_error::{LexError, ParseError};
pub use runtime_error::RuntimeError;

/// Any failure of a complete run, from reading the file to the last
/// statement.
#[derive(Debug, Error)]
pub enum Error {
    /// The source file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// The file that was requested.
        path:   PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The source could not be tokenized or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
