use thiserror::Error;

use crate::ast::Location;

/// Failures raised by the lexer's token callbacks.
///
/// Logos reports these without position information; the tokenizer attaches
/// the location of the offending lexeme when converting them into a
/// [`ParseError::Lexical`].
#[derive(Debug, Clone, PartialEq, Default, Error)]
pub enum LexError {
    /// A character that starts no token.
    #[default]
    #[error("unrecognized character")]
    UnexpectedCharacter,
    /// A numeric literal with a malformed body or trailing letters.
    #[error("malformed numeric literal '{0}'")]
    InvalidNumber(String),
    /// An integer literal that does not fit into 64 bits.
    #[error("numeric literal '{0}' is too large")]
    NumberTooLarge(String),
    /// An escape sequence outside of `\n \t \r \" \\`.
    #[error("unknown escape sequence '\\{0}'")]
    InvalidEscape(char),
    /// A string literal without its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A character literal that is empty, too long or unterminated.
    #[error("malformed character literal")]
    InvalidCharacter,
    /// A `#*` block comment without a closing `*#`.
    #[error("unterminated block comment")]
    UnterminatedComment,
}

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The lexer could not produce a token.
    #[error("Error on {location}: Lexical error: {error} near '{lexeme}'.")]
    Lexical {
        /// What went wrong.
        error:    LexError,
        /// The text that could not be tokenized.
        lexeme:   String,
        /// Where the lexeme starts.
        location: Location,
    },
    /// Found an unexpected token while parsing.
    #[error("Error on {location}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// A description of the token encountered and what was expected.
        token:    String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on {location}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// The source location where the error occurred.
        location: Location,
    },
    /// A declaration qualifier appeared where it is not allowed.
    #[error("Error on {location}: Qualifier '{qualifier}' is not allowed here.")]
    InvalidQualifier {
        /// The offending qualifier.
        qualifier: String,
        /// The source location where the error occurred.
        location:  Location,
    },
    /// A declaration is syntactically valid but malformed.
    #[error("Error on {location}: Invalid declaration: {details}.")]
    InvalidDeclaration {
        /// Details about the malformed declaration.
        details:  String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// The initializer of a declaration cannot produce the declared kind.
    #[error("Error on {location}: Cannot initialize '{name}' of type {declared} with a value of type {found}.")]
    DeclaredTypeMismatch {
        /// The declared name.
        name:     String,
        /// The declared type.
        declared: String,
        /// The statically inferred type of the initializer.
        found:    String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// The left side of an assignment or increment is not addressable.
    #[error("Error on {location}: Expression '{expr}' cannot be assigned to.")]
    InvalidAssignmentTarget {
        /// Textual form of the target.
        expr:     String,
        /// The source location where the error occurred.
        location: Location,
    },
    /// `break` or `continue` outside of a loop body.
    #[error("Error on {location}: '{keyword}' outside of a loop.")]
    LoopControlOutsideLoop {
        /// `break` or `continue`.
        keyword:  &'static str,
        /// The source location where the error occurred.
        location: Location,
    },
    /// `return` outside of a function body.
    #[error("Error on {location}: 'return' outside of a function.")]
    ReturnOutsideFunction {
        /// The source location where the error occurred.
        location: Location,
    },
}

impl ParseError {
    /// Returns where the error was detected.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Lexical { location, .. }
            | Self::UnexpectedToken { location, .. }
            | Self::UnexpectedEndOfInput { location }
            | Self::InvalidQualifier { location, .. }
            | Self::InvalidDeclaration { location, .. }
            | Self::DeclaredTypeMismatch { location, .. }
            | Self::InvalidAssignmentTarget { location, .. }
            | Self::LoopControlOutsideLoop { location, .. }
            | Self::ReturnOutsideFunction { location } => *location,
        }
    }
}
