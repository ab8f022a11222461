use std::iter::Peekable;

use crate::{
    ast::{AssignOperator, BinaryOperator, Expr, Location},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// The lowest precedence level of the binary table.
const LOWEST_PRECEDENCE: u8 = 1;

/// Parses an assignment or anything of higher precedence.
///
/// Assignment is right-associative: `a = b = c` parses as `a = (b = c)`.
/// The target must be addressable (an identifier, index or member access)
/// and is flagged as an l-value.
///
/// Grammar: `assignment := binary (("=" | "+=" | "-=" | "*=" | "/=" | "%=")
/// assignment)?`
///
/// # Parameters
/// - `tokens`: Token stream with location information.
///
/// # Returns
/// An `Expr::Assign` node, or the binary expression if no assignment
/// operator follows.
///
/// # Errors
/// `InvalidAssignmentTarget` if the left side cannot be written to.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let target = parse_binary(tokens, LOWEST_PRECEDENCE)?;

    let Some((op, location)) = tokens.peek()
                                     .and_then(|(token, location)| {
                                         token_to_assign_operator(token).map(|op| (op, *location))
                                     })
    else {
        return Ok(target);
    };
    tokens.next();

    if !target.is_addressable() {
        return Err(ParseError::InvalidAssignmentTarget { expr: target.to_string(),
                                                         location });
    }

    let value = parse_assignment(tokens)?;

    Ok(Expr::Assign { target: Box::new(target.into_lvalue()),
                      op,
                      value: Box::new(value),
                      location })
}

/// Parses binary operators by precedence climbing.
///
/// Operands are unary expressions. An operator is folded in as long as its
/// precedence is at least `min_precedence`; its right operand is parsed with
/// a strictly higher minimum, which makes every level left-associative.
///
/// # Parameters
/// - `tokens`: Token stream with location information.
/// - `min_precedence`: The weakest operator accepted at this level.
///
/// # Returns
/// An `Expr::Binary` tree.
pub fn parse_binary<'a, I>(tokens: &mut Peekable<I>, min_precedence: u8) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut left = parse_unary(tokens)?;

    while let Some((token, location)) = tokens.peek() {
        let Some(op) = token_to_binary_operator(token) else {
            break;
        };
        let precedence = binary_precedence(op);
        if precedence < min_precedence {
            break;
        }

        let location = *location;
        tokens.next();

        let right = parse_binary(tokens, precedence + 1)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              location };
    }

    Ok(left)
}

/// Returns the binding strength of a binary operator; higher binds tighter.
///
/// | level | operators            |
/// |-------|----------------------|
/// | 1     | `\|\|`               |
/// | 2     | `^^`                 |
/// | 3     | `&&`                 |
/// | 4     | `\|`                 |
/// | 5     | `^`                  |
/// | 6     | `&`                  |
/// | 7     | `==` `!=`            |
/// | 8     | `<` `<=` `>` `>=`    |
/// | 9     | `<<` `>>`            |
/// | 10    | `+` `-`              |
/// | 11    | `*` `/` `%`          |
///
/// # Example
/// ```
/// use wio::{ast::BinaryOperator, interpreter::parser::binary::binary_precedence};
///
/// assert!(binary_precedence(BinaryOperator::Mul) > binary_precedence(BinaryOperator::Add));
/// assert!(binary_precedence(BinaryOperator::And) > binary_precedence(BinaryOperator::Xor));
/// ```
#[must_use]
pub const fn binary_precedence(op: BinaryOperator) -> u8 {
    match op {
        BinaryOperator::Or => 1,
        BinaryOperator::Xor => 2,
        BinaryOperator::And => 3,
        BinaryOperator::BitOr => 4,
        BinaryOperator::BitXor => 5,
        BinaryOperator::BitAnd => 6,
        BinaryOperator::Equal | BinaryOperator::NotEqual => 7,
        BinaryOperator::Less
        | BinaryOperator::LessEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEqual => 8,
        BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => 9,
        BinaryOperator::Add | BinaryOperator::Sub => 10,
        BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 11,
    }
}

/// Maps a token to its corresponding binary operator.
///
/// Returns `Some(BinaryOperator)` when the token represents a binary operator
/// and `None` for all other tokens.
///
/// # Example
/// ```
/// use wio::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::Plus),
///            Some(BinaryOperator::Add));
/// assert_eq!(token_to_binary_operator(&Token::Equals), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::ShiftLeft => Some(BinaryOperator::ShiftLeft),
        Token::ShiftRight => Some(BinaryOperator::ShiftRight),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        Token::Ampersand => Some(BinaryOperator::BitAnd),
        Token::Pipe => Some(BinaryOperator::BitOr),
        Token::Caret => Some(BinaryOperator::BitXor),
        Token::AndAnd => Some(BinaryOperator::And),
        Token::OrOr => Some(BinaryOperator::Or),
        Token::CaretCaret => Some(BinaryOperator::Xor),
        _ => None,
    }
}

/// Maps a token to an assignment operator.
#[must_use]
pub const fn token_to_assign_operator(token: &Token) -> Option<AssignOperator> {
    match token {
        Token::Equals => Some(AssignOperator::Assign),
        Token::PlusAssign => Some(AssignOperator::Add),
        Token::MinusAssign => Some(AssignOperator::Sub),
        Token::MulAssign => Some(AssignOperator::Mul),
        Token::DivAssign => Some(AssignOperator::Div),
        Token::ModAssign => Some(AssignOperator::Mod),
        _ => None,
    }
}
