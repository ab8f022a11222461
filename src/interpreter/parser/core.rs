use std::iter::Peekable;

use crate::{
    ast::{Expr, Location, Program},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{binary::parse_assignment, statement::parse_statement, validate::validate_control_flow},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token stream into a [`Program`].
///
/// Statements are parsed until [`Token::Eof`]. Afterwards the whole program is
/// checked for `break`, `continue` and `return` statements that appear outside
/// of the construct they belong to, so these mistakes are reported before any
/// code runs.
///
/// # Parameters
/// - `tokens`: The output of [`tokenize`](crate::interpreter::lexer::tokenize).
///
/// # Errors
/// The first syntax error encountered.
///
/// # Example
/// ```
/// use wio::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("var x = 1; x += 2;").unwrap();
/// let program = parse_program(&tokens).unwrap();
/// assert_eq!(program.statements.len(), 2);
///
/// let tokens = tokenize("break;").unwrap();
/// assert!(parse_program(&tokens).is_err());
/// ```
pub fn parse_program(tokens: &[(Token, Location)]) -> ParseResult<Program> {
    let mut iter = tokens.iter().peekable();
    let mut statements = Vec::new();

    while let Some((token, _)) = iter.peek() {
        if *token == Token::Eof {
            break;
        }
        statements.push(parse_statement(&mut iter)?);
    }

    let program = Program { statements };
    validate_control_flow(&program)?;

    Ok(program)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, assignment, and climbs through the binary
/// precedence table from there.
///
/// Grammar: `expression := assignment`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Location)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_assignment(tokens)
}
