use std::iter::Peekable;

use crate::{
    ast::{Expr, ImportTarget, Location, Statement},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            declaration::{DeclarationContext, parse_declaration, starts_declaration},
            utils::{consume_if, expect, parse_identifier, peek_location, unexpected},
        },
    },
};

/// Prefix of every builtin module name.
pub const BUILTIN_MODULE_PREFIX: &str = "wio.";

/// Parses a single statement.
///
/// A statement may be one of:
/// - a block `{ ... }`
/// - a control-flow statement (`if`, `for`, `foreach`, `while`, `break`,
///   `continue`, `return`)
/// - an `import`
/// - a declaration, possibly preceded by qualifiers
/// - an expression terminated by `;`
///
/// A lone `;` is accepted as an empty statement.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, Location)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = peek_location(tokens);
    let Some((token, _)) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput { location });
    };

    match token {
        Token::LBrace => {
            tokens.next();
            let statements = parse_block_body(tokens)?;
            Ok(Statement::Block { statements, location })
        },
        Token::Semicolon => {
            tokens.next();
            Ok(Statement::Block { statements: Vec::new(),
                                  location })
        },
        Token::If => parse_if(tokens),
        Token::For => parse_for(tokens),
        Token::Foreach => parse_foreach(tokens),
        Token::While => parse_while(tokens),
        Token::Break => {
            tokens.next();
            expect(tokens, &Token::Semicolon, "';' after 'break'")?;
            Ok(Statement::Break { location })
        },
        Token::Continue => {
            tokens.next();
            expect(tokens, &Token::Semicolon, "';' after 'continue'")?;
            Ok(Statement::Continue { location })
        },
        Token::Return => {
            tokens.next();
            let value = if consume_if(tokens, &Token::Semicolon) {
                None
            } else {
                let value = parse_expression(tokens)?;
                expect(tokens, &Token::Semicolon, "';' after return value")?;
                Some(value)
            };
            Ok(Statement::Return { value, location })
        },
        Token::Import => parse_import(tokens),
        Token::Hidden | Token::Exposed | Token::Shared | Token::Outer => {
            Err(ParseError::InvalidQualifier { qualifier: format!("{token:?}").to_lowercase(),
                                               location })
        },
        token if starts_declaration(token) => parse_declaration(tokens, DeclarationContext::Block),
        _ => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::Semicolon, "';' after expression")?;
            Ok(Statement::Expression { expr, location })
        },
    }
}

/// Parses statements up to and including the closing `}` of a block whose
/// opening brace has already been consumed.
pub fn parse_block_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut statements = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                return Ok(statements);
            },
            Some((Token::Eof, location)) => {
                return Err(ParseError::UnexpectedEndOfInput { location: *location });
            },
            Some(_) => statements.push(parse_statement(tokens)?),
            None => return Err(ParseError::UnexpectedEndOfInput { location: Location::default() }),
        }
    }
}

/// Parses a parenthesized condition: `"(" expression ")"`.
fn parse_condition<'a, I>(tokens: &mut Peekable<I>, keyword: &str) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    expect(tokens, &Token::LParen, &format!("'(' after '{keyword}'"))?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "')' after the condition")?;
    Ok(condition)
}

/// Parses an `if` statement with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if (<condition>) <statement>
///     else if (<condition>) <statement>
///     else <statement>
/// ```
fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = expect(tokens, &Token::If, "'if'")?;
    let condition = parse_condition(tokens, "if")?;
    let then_branch = Box::new(parse_statement(tokens)?);

    let else_branch = if consume_if(tokens, &Token::Else) {
        Some(Box::new(parse_statement(tokens)?))
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       location })
}

/// Parses `while (<condition>) <statement>`.
fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = expect(tokens, &Token::While, "'while'")?;
    let condition = parse_condition(tokens, "while")?;
    let body = Box::new(parse_statement(tokens)?);

    Ok(Statement::While { condition,
                          body,
                          location })
}

/// Parses a C-style `for` loop.
///
/// Syntax:
/// ```text
///     for (<init>; <condition>; <step>) <statement>
/// ```
/// Each of the three clauses may be empty. The initializer is either a
/// declaration or an expression.
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = expect(tokens, &Token::For, "'for'")?;
    expect(tokens, &Token::LParen, "'(' after 'for'")?;

    let init = match tokens.peek() {
        Some((Token::Semicolon, _)) => {
            tokens.next();
            None
        },
        Some((token, _)) if starts_declaration(token) => {
            Some(Box::new(parse_declaration(tokens, DeclarationContext::Block)?))
        },
        _ => {
            let init_location = peek_location(tokens);
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::Semicolon, "';' after the loop initializer")?;
            Some(Box::new(Statement::Expression { expr,
                                                  location: init_location }))
        },
    };

    let condition = if consume_if(tokens, &Token::Semicolon) {
        None
    } else {
        let condition = parse_expression(tokens)?;
        expect(tokens, &Token::Semicolon, "';' after the loop condition")?;
        Some(condition)
    };

    let step = if consume_if(tokens, &Token::RParen) {
        None
    } else {
        let step = parse_expression(tokens)?;
        expect(tokens, &Token::RParen, "')' after the loop step")?;
        Some(step)
    };

    let body = Box::new(parse_statement(tokens)?);

    Ok(Statement::For { init,
                        condition,
                        step,
                        body,
                        location })
}

/// Parses a `foreach` loop.
///
/// Syntax:
/// ```text
///     foreach ([ref] <item> in <expression>) <statement>
///     foreach (<key>, [ref] <item> in <expression>) <statement>
/// ```
/// For arrays the key is the index, for dictionaries it is the key.
fn parse_foreach<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = expect(tokens, &Token::Foreach, "'foreach'")?;
    expect(tokens, &Token::LParen, "'(' after 'foreach'")?;

    let mut by_ref = consume_if(tokens, &Token::Ref);
    let (first, first_location) = parse_identifier(tokens)?;

    let (key, item) = if consume_if(tokens, &Token::Comma) {
        if by_ref {
            return Err(ParseError::InvalidQualifier { qualifier: "ref".to_string(),
                                                      location:  first_location, });
        }
        by_ref = consume_if(tokens, &Token::Ref);
        let (item, _) = parse_identifier(tokens)?;
        (Some(first), item)
    } else {
        (None, first)
    };

    expect(tokens, &Token::In, "'in' after the loop variable")?;
    let iterable = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "')' after the iterated expression")?;

    let body = Box::new(parse_statement(tokens)?);

    Ok(Statement::Foreach { key,
                            item,
                            by_ref,
                            iterable,
                            body,
                            location })
}

/// Parses `import "<target>";`.
///
/// Targets starting with `wio.` name builtin modules, everything else is a
/// file path.
fn parse_import<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = expect(tokens, &Token::Import, "'import'")?;

    let target = match tokens.next() {
        Some((Token::String(name), _)) if name.starts_with(BUILTIN_MODULE_PREFIX) => {
            ImportTarget::Builtin(name.clone())
        },
        Some((Token::String(path), _)) => ImportTarget::File(path.clone()),
        Some((token, location)) => return Err(unexpected(token, *location, "a module name string")),
        None => return Err(ParseError::UnexpectedEndOfInput { location }),
    };
    expect(tokens, &Token::Semicolon, "';' after import")?;

    Ok(Statement::Import { target, location })
}
