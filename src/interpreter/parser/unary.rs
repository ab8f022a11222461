use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, Location, PostfixOperator, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{NumberLiteral, Token},
        parser::{
            core::{ParseResult, parse_expression},
            declaration::parse_param,
            statement::parse_block_body,
            utils::{expect, parse_comma_separated, parse_identifier, unexpected},
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`, `+` (numeric negation and identity)
/// - `!`      (logical not)
/// - `~`      (bitwise complement)
/// - `++`, `--` (prefix increment and decrement of addressable operands)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`] and then applies any postfix operators via
/// [`parse_postfix`].
///
/// Grammar:
/// ```text
///     unary := ("-" | "+" | "!" | "~" | "++" | "--") unary
///            | primary postfix*
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::Unary`] or a primary expression possibly followed by postfixes.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, _)) => UnaryOperator::Negate,
        Some((Token::Plus, _)) => UnaryOperator::Plus,
        Some((Token::Bang, _)) => UnaryOperator::Not,
        Some((Token::Tilde, _)) => UnaryOperator::BitNot,
        Some((Token::PlusPlus, _)) => UnaryOperator::Increment,
        Some((Token::MinusMinus, _)) => UnaryOperator::Decrement,
        _ => {
            let primary = parse_primary(tokens)?;
            return parse_postfix(tokens, primary);
        },
    };
    let Some((_, location)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { location: Location::default() });
    };

    let mut expr = parse_unary(tokens)?;
    if matches!(op, UnaryOperator::Increment | UnaryOperator::Decrement) {
        if !expr.is_addressable() {
            return Err(ParseError::InvalidAssignmentTarget { expr:     expr.to_string(),
                                                             location: *location, });
        }
        expr = expr.into_lvalue();
    }

    Ok(Expr::Unary { op,
                     expr: Box::new(expr),
                     location: *location })
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - numeric, string, character, boolean and `null` literals
/// - identifiers
/// - parenthesized expressions
/// - array literals (`[ ... ]`)
/// - dictionary literals (`{ key: value, ... }`)
/// - lambdas (`@(params) { ... }`)
/// - `typeof(expr)`
///
/// This function does not handle unary operators or postfix operators.
/// It dispatches to specialized parsing functions depending on the leading
/// token.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let Some((token, location)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { location: Location::default() });
    };
    let location = *location;

    let literal = |value| Ok(Expr::Literal { value, location });

    match token {
        Token::Number(NumberLiteral::Integer(n)) => literal(LiteralValue::Integer(*n)),
        Token::Number(NumberLiteral::Float(r)) => literal(LiteralValue::Float(*r)),
        Token::String(s) => literal(LiteralValue::String(s.clone())),
        Token::Char(c) => literal(LiteralValue::Char(*c)),
        Token::Bool(b) => literal(LiteralValue::Bool(*b)),
        Token::Null => literal(LiteralValue::Null),
        Token::Identifier(name) => Ok(Expr::Identifier { name: name.clone(),
                                                         is_ref: false,
                                                         is_lvalue: false,
                                                         location }),
        Token::LParen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, "')' to close the group")?;
            Ok(expr)
        },
        Token::LBracket => {
            let elements = parse_comma_separated(tokens, parse_expression, &Token::RBracket)?;
            Ok(Expr::Array { elements, location })
        },
        Token::LBrace => parse_dictionary_literal(tokens, location),
        Token::At => parse_lambda(tokens, location),
        Token::TypeOf => {
            expect(tokens, &Token::LParen, "'(' after 'typeof'")?;
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, "')' after the inspected expression")?;
            Ok(Expr::TypeOf { expr: Box::new(expr),
                              location })
        },
        other => Err(unexpected(other, location, "an expression")),
    }
}

/// Parses postfix operators applied to an expression.
///
/// This function is called after parsing a primary expression and handles:
///
/// 1. **Calls** `f(a, b)`
/// 2. **Indexing** `a[0][1]`
/// 3. **Member access** `p.x`
/// 4. **Instantiation** `Point{1, 2}`, only directly after a name or member
///    access
/// 5. **Increment and decrement** `i++`, `i--`, which end the chain
///
/// Grammar:
/// ```text
///     postfix := primary
///              | postfix "(" arguments ")"
///              | postfix "[" expression "]"
///              | postfix "." identifier
///              | postfix "{" arguments "}"
///              | postfix ("++" | "--")
/// ```
/// # Parameters
/// - `tokens`: Token iterator after a primary expression.
/// - `node`: The expression to which postfix operators will be applied.
///
/// # Returns
/// An updated [`Expr`] with all postfix operators folded in.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    while let Some((token, location)) = tokens.peek() {
        let location = *location;
        match token {
            Token::LParen => {
                tokens.next();
                let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
                node = Expr::Call { callee: Box::new(node),
                                    arguments,
                                    location };
            },
            Token::LBracket => {
                tokens.next();
                let index = parse_expression(tokens)?;
                expect(tokens, &Token::RBracket, "']' after index")?;
                node = Expr::Index { target: Box::new(node),
                                     index: Box::new(index),
                                     is_ref: false,
                                     is_lvalue: false,
                                     location };
            },
            Token::Dot => {
                tokens.next();
                let (name, _) = parse_identifier(tokens)?;
                node = Expr::Member { target: Box::new(node),
                                      name,
                                      is_ref: false,
                                      is_lvalue: false,
                                      location };
            },
            Token::LBrace if matches!(node, Expr::Identifier { .. } | Expr::Member { .. }) => {
                tokens.next();
                let arguments = parse_comma_separated(tokens, parse_expression, &Token::RBrace)?;
                node = Expr::Instantiate { unit: Box::new(node),
                                           arguments,
                                           location };
            },
            Token::PlusPlus | Token::MinusMinus => {
                let op = if *token == Token::PlusPlus {
                    PostfixOperator::Increment
                } else {
                    PostfixOperator::Decrement
                };
                tokens.next();
                if !node.is_addressable() {
                    return Err(ParseError::InvalidAssignmentTarget { expr: node.to_string(),
                                                                     location });
                }
                return Ok(Expr::Postfix { op,
                                          expr: Box::new(node.into_lvalue()),
                                          location });
            },
            _ => break,
        }
    }

    Ok(node)
}

/// Parses a dictionary literal after its opening brace.
///
/// Grammar: `dict := "{" (expression ":" expression ("," expression ":"
/// expression)*)? "}"`
fn parse_dictionary_literal<'a, I>(tokens: &mut Peekable<I>, location: Location) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let entries = parse_comma_separated(tokens,
                                        |tokens| {
                                            let key = parse_expression(tokens)?;
                                            expect(tokens, &Token::Colon, "':' after dictionary key")?;
                                            let value = parse_expression(tokens)?;
                                            Ok((key, value))
                                        },
                                        &Token::RBrace)?;

    Ok(Expr::Dictionary { entries, location })
}

/// Parses a lambda after its `@`.
///
/// Grammar: `lambda := "@" "(" params ")" "{" statement* "}"`
fn parse_lambda<'a, I>(tokens: &mut Peekable<I>, location: Location) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    expect(tokens, &Token::LParen, "'(' after '@'")?;
    let params = parse_comma_separated(tokens, parse_param, &Token::RParen)?;

    expect(tokens, &Token::LBrace, "'{' to open the lambda body")?;
    let body = parse_block_body(tokens)?;

    Ok(Expr::Lambda { params: params.into(),
                      body: body.into(),
                      location })
}
