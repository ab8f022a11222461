use std::iter::Peekable;

use crate::{
    ast::Location,
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Builds the error for a token that does not fit the grammar at this point.
///
/// Running into [`Token::Eof`] is reported as
/// [`ParseError::UnexpectedEndOfInput`].
pub(in crate::interpreter::parser) fn unexpected(token: &Token,
                                                 location: Location,
                                                 expected: &str)
                                                 -> ParseError {
    match token {
        Token::Eof => ParseError::UnexpectedEndOfInput { location },
        other => ParseError::UnexpectedToken { token: format!("expected {expected}, found {other:?}"),
                                               location },
    }
}

/// Returns the location of the next token without consuming it.
pub(in crate::interpreter::parser) fn peek_location<'a, I>(tokens: &mut Peekable<I>) -> Location
    where I: Iterator<Item = &'a (Token, Location)>
{
    tokens.peek().map_or_else(Location::default, |(_, location)| *location)
}

/// Consumes the next token if it equals `token`.
///
/// # Returns
/// `true` when the token was present and consumed.
pub(in crate::interpreter::parser) fn consume_if<'a, I>(tokens: &mut Peekable<I>, token: &Token) -> bool
    where I: Iterator<Item = &'a (Token, Location)>
{
    tokens.next_if(|(next, _)| next == token).is_some()
}

/// Consumes a token that must be present.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `expected`: The required token.
/// - `what`: Human-readable description used in the error message.
///
/// # Returns
/// The location of the consumed token.
///
/// # Errors
/// `UnexpectedToken` or `UnexpectedEndOfInput` if the next token differs.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    what: &str)
                                                    -> ParseResult<Location>
    where I: Iterator<Item = &'a (Token, Location)>
{
    match tokens.next() {
        Some((token, location)) if token == expected => Ok(*location),
        Some((token, location)) => Err(unexpected(token, *location, what)),
        None => Err(ParseError::UnexpectedEndOfInput { location: Location::default() }),
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by array literals, argument lists, parameter lists
/// and the name lists of unit modifiers. It repeatedly calls `parse_item` to
/// parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut items = Vec::new();
    if consume_if(tokens, closing) {
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((tok, location)) => {
                return Err(unexpected(tok, *location, &format!("',' or {closing:?}")));
            },
            None => return Err(ParseError::UnexpectedEndOfInput { location: Location::default() }),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// The next token must be `Token::Identifier`.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at an identifier.
///
/// # Returns
/// The identifier and its location.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the next token is not an identifier,
/// - the input ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<(String, Location)>
    where I: Iterator<Item = &'a (Token, Location)>
{
    match tokens.next() {
        Some((Token::Identifier(s), location)) => Ok((s.clone(), *location)),
        Some((tok, location)) => Err(unexpected(tok, *location, "identifier")),
        None => Err(ParseError::UnexpectedEndOfInput { location: Location::default() }),
    }
}

/// The source text of a token that can name a type in an annotation.
///
/// Several type names double as keywords (`array`, `func`, `null`, ...), so
/// annotations accept those tokens as well as plain identifiers.
pub(in crate::interpreter::parser) fn type_name(token: &Token) -> Option<&str> {
    match token {
        Token::Identifier(name) => Some(name),
        Token::Array => Some("array"),
        Token::Dict => Some("dict"),
        Token::Func => Some("func"),
        Token::Omni => Some("omni"),
        Token::Enum => Some("enum"),
        Token::Unit => Some("unit"),
        Token::Realm => Some("realm"),
        Token::Null => Some("null"),
        _ => None,
    }
}
