use std::iter::Peekable;

use crate::{
    ast::{
        Access, BindingDecl, BindingKind, EnumDecl, EnumMember, Expr, FunctionDecl, FunctionShape, Location,
        Param, Qualifiers, RealmDecl, Statement, Storage, TypeKind, UnitDecl, UnitMemberDecl,
    },
    error::ParseError,
    interpreter::{
        lexer::{NumberLiteral, Token},
        parser::{
            core::{ParseResult, parse_expression},
            statement::parse_block_body,
            unary::{parse_primary, parse_unary},
            utils::{consume_if, expect, parse_comma_separated, parse_identifier, peek_location, type_name,
                    unexpected},
        },
    },
};

/// Where a declaration appears; decides which prefixes are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationContext {
    /// A block or the top level of a file.
    Block,
    /// The body of a realm.
    Realm,
    /// The body of a unit, after the member access prefix.
    Unit,
}

/// Returns `true` if `token` can begin a declaration, qualifiers included.
#[must_use]
pub const fn starts_declaration(token: &Token) -> bool {
    matches!(token,
             Token::Var
             | Token::Array
             | Token::Dict
             | Token::Func
             | Token::Omni
             | Token::Enum
             | Token::Realm
             | Token::Unit
             | Token::Ref
             | Token::Const
             | Token::Local
             | Token::Global)
}

/// Parses one declaration including its qualifier prefix.
///
/// Grammar:
/// ```text
///     declaration := [local | global] [const] [ref] (binding | function | enum | realm | unit)
/// ```
///
/// # Errors
/// - `InvalidQualifier` if a qualifier is repeated, out of order, illegal in
///   `context`, or does not apply to the declared kind.
/// - Any error of the specific declaration parser.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>, context: DeclarationContext) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let qualifiers = parse_qualifiers(tokens, context)?;

    let Some((token, location)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { location: Location::default() });
    };
    let location = *location;

    match token {
        Token::Var => parse_binding(tokens, BindingKind::Var, qualifiers, location),
        Token::Array => parse_binding(tokens, BindingKind::Array, qualifiers, location),
        Token::Dict => parse_binding(tokens, BindingKind::Dict, qualifiers, location),
        Token::Omni => parse_binding(tokens, BindingKind::Omni, qualifiers, location),
        Token::Func => {
            reject_ref(qualifiers, location)?;
            parse_function(tokens, qualifiers, location)
        },
        Token::Enum => {
            reject_ref(qualifiers, location)?;
            parse_enum(tokens, qualifiers, location)
        },
        Token::Realm => {
            reject_ref(qualifiers, location)?;
            parse_realm(tokens, qualifiers, location)
        },
        Token::Unit => {
            reject_ref(qualifiers, location)?;
            parse_unit(tokens, qualifiers, location)
        },
        other => Err(unexpected(other, location, "a declaration")),
    }
}

fn reject_ref(qualifiers: Qualifiers, location: Location) -> ParseResult<()> {
    if qualifiers.is_ref {
        return Err(ParseError::InvalidQualifier { qualifier: "ref".to_string(),
                                                  location });
    }
    Ok(())
}

/// Parses the `[local | global] [const] [ref]` prefix.
///
/// Storage qualifiers only exist in plain blocks; realm and unit members
/// always live in the member scope of their owner.
fn parse_qualifiers<'a, I>(tokens: &mut Peekable<I>, context: DeclarationContext) -> ParseResult<Qualifiers>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut qualifiers = Qualifiers::default();

    while let Some((token, location)) = tokens.peek() {
        let location = *location;
        let invalid = |qualifier: &str| {
            Err(ParseError::InvalidQualifier { qualifier: qualifier.to_string(),
                                               location })
        };

        match token {
            Token::Local | Token::Global => {
                let qualifier = if *token == Token::Local { "local" } else { "global" };
                if context != DeclarationContext::Block
                   || qualifiers.storage != Storage::Default
                   || qualifiers.is_const
                   || qualifiers.is_ref
                {
                    return invalid(qualifier);
                }
                qualifiers.storage = if *token == Token::Local {
                    Storage::Local
                } else {
                    Storage::Global
                };
            },
            Token::Const => {
                if qualifiers.is_const || qualifiers.is_ref {
                    return invalid("const");
                }
                qualifiers.is_const = true;
            },
            Token::Ref => {
                if qualifiers.is_ref {
                    return invalid("ref");
                }
                qualifiers.is_ref = true;
            },
            _ => break,
        }
        tokens.next();
    }

    Ok(qualifiers)
}

/// Parses the rest of a `var`, `array`, `dict` or `omni` declaration.
///
/// Grammar: `binding := identifier [":" type] ["=" expression] ";"`
///
/// The annotation is only accepted on `var`. When the initializer's kind is
/// known statically it must fit the annotation, or, without one, the
/// declaration keyword.
///
/// # Errors
/// - `InvalidDeclaration` for a `ref` declaration without an addressable
///   initializer, a `const` declaration without initializer, or an unknown
///   annotation.
/// - `DeclaredTypeMismatch` for an initializer of the wrong kind.
fn parse_binding<'a, I>(tokens: &mut Peekable<I>,
                        kind: BindingKind,
                        qualifiers: Qualifiers,
                        location: Location)
                        -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (name, _) = parse_identifier(tokens)?;

    let annotation = if kind == BindingKind::Var && consume_if(tokens, &Token::Colon) {
        Some(parse_annotation(tokens)?)
    } else {
        None
    };

    let mut initializer = if consume_if(tokens, &Token::Equals) {
        Some(parse_expression(tokens)?)
    } else {
        None
    };
    expect(tokens, &Token::Semicolon, "';' after declaration")?;

    if qualifiers.is_ref {
        initializer = match initializer {
            Some(expr) if expr.is_addressable() => Some(expr.into_ref()),
            _ => {
                return Err(ParseError::InvalidDeclaration { details: format!("reference '{name}' must be initialized with a variable, element or member"),
                                                            location });
            },
        };
    }
    if qualifiers.is_const && initializer.is_none() {
        return Err(ParseError::InvalidDeclaration { details: format!("constant '{name}' needs an initializer"),
                                                    location });
    }

    if let Some(init) = &initializer {
        let found = init.static_kind();
        let accepted = match annotation {
            Some(declared) => declared == TypeKind::Omni || found == TypeKind::Omni || found == declared,
            None => kind.accepts(found),
        };
        if !accepted {
            return Err(ParseError::DeclaredTypeMismatch { name,
                                                          declared: annotation.map_or(kind.keyword(), TypeKind::name)
                                                                              .to_string(),
                                                          found: found.name().to_string(),
                                                          location: init.location() });
        }
    }

    Ok(Statement::Binding(BindingDecl { kind,
                                        name,
                                        annotation,
                                        initializer,
                                        qualifiers,
                                        location }))
}

fn parse_annotation<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<TypeKind>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    match tokens.next() {
        Some((token, location)) => {
            let Some(name) = type_name(token) else {
                return Err(unexpected(token, *location, "a type name"));
            };
            TypeKind::from_name(name).ok_or_else(|| ParseError::InvalidDeclaration { details: format!("unknown type '{name}'"),
                                                                                     location: *location, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { location: Location::default() }),
    }
}

/// Parses one parameter: `[ref] (var | array | dict | func | omni) name`.
///
/// A bare name is a `var` parameter.
pub(in crate::interpreter::parser) fn parse_param<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Param>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = peek_location(tokens);
    let by_ref = consume_if(tokens, &Token::Ref);

    let kind = match tokens.peek() {
        Some((Token::Var, _)) => Some(BindingKind::Var),
        Some((Token::Array, _)) => Some(BindingKind::Array),
        Some((Token::Dict, _)) => Some(BindingKind::Dict),
        Some((Token::Func, _)) => Some(BindingKind::Func),
        Some((Token::Omni, _)) => Some(BindingKind::Omni),
        _ => None,
    };
    if kind.is_some() {
        tokens.next();
    }
    let (name, _) = parse_identifier(tokens)?;

    Ok(Param { name,
               kind: kind.unwrap_or(BindingKind::Var),
               by_ref,
               location })
}

/// Parses the rest of a `func` declaration.
///
/// Syntax:
/// ```text
///     func name = other;               alias
///     func name = null;                empty alias
///     func name = @(params) { ... };   lambda-valued
///     func name(params);               forward declaration
///     func name(params) { ... }        definition
/// ```
fn parse_function<'a, I>(tokens: &mut Peekable<I>,
                         qualifiers: Qualifiers,
                         location: Location)
                         -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (name, _) = parse_identifier(tokens)?;

    let shape = match tokens.next() {
        Some((Token::Equals, _)) => {
            let shape = match tokens.peek() {
                Some((Token::Null, _)) => {
                    tokens.next();
                    FunctionShape::Alias(None)
                },
                Some((Token::At, _)) => FunctionShape::Lambda(parse_primary(tokens)?),
                _ => {
                    let target = parse_unary(tokens)?;
                    if !matches!(target, Expr::Identifier { .. } | Expr::Member { .. }) {
                        return Err(ParseError::InvalidDeclaration { details: format!("function '{name}' can only alias a name, a member or null"),
                                                                    location: target.location() });
                    }
                    FunctionShape::Alias(Some(target))
                },
            };
            expect(tokens, &Token::Semicolon, "';' after function alias")?;
            shape
        },
        Some((Token::LParen, _)) => {
            let params = parse_comma_separated(tokens, parse_param, &Token::RParen)?;
            let body = if consume_if(tokens, &Token::Semicolon) {
                None
            } else {
                expect(tokens, &Token::LBrace, "'{' or ';' after parameter list")?;
                Some(parse_block_body(tokens)?.into())
            };
            FunctionShape::Signature { params: params.into(),
                                       body }
        },
        Some((token, location)) => return Err(unexpected(token, *location, "'=' or '(' after function name")),
        None => return Err(ParseError::UnexpectedEndOfInput { location }),
    };

    Ok(Statement::Function(FunctionDecl { name,
                                          shape,
                                          qualifiers,
                                          location }))
}

/// Parses the rest of an `enum` declaration.
///
/// Grammar: `enum := identifier "{" member ("," member)* "}"` where
/// `member := identifier ["=" ["-"] integer]`.
fn parse_enum<'a, I>(tokens: &mut Peekable<I>, qualifiers: Qualifiers, location: Location) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (name, _) = parse_identifier(tokens)?;
    expect(tokens, &Token::LBrace, "'{' after enum name")?;

    let members = parse_comma_separated(tokens, parse_enum_member, &Token::RBrace)?;
    if members.is_empty() {
        return Err(ParseError::InvalidDeclaration { details: format!("enum '{name}' has no members"),
                                                    location });
    }
    consume_if(tokens, &Token::Semicolon);

    Ok(Statement::Enum(EnumDecl { name,
                                  members,
                                  qualifiers,
                                  location }))
}

fn parse_enum_member<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<EnumMember>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (name, location) = parse_identifier(tokens)?;
    if !consume_if(tokens, &Token::Equals) {
        return Ok(EnumMember { name,
                               value: None,
                               location });
    }

    let negative = consume_if(tokens, &Token::Minus);
    let value = match tokens.next() {
        Some((Token::Number(NumberLiteral::Integer(n)), _)) => if negative { -n } else { *n },
        Some((token, location)) => return Err(unexpected(token, *location, "an integer enum value")),
        None => return Err(ParseError::UnexpectedEndOfInput { location }),
    };

    Ok(EnumMember { name,
                    value: Some(value),
                    location })
}

/// Parses the rest of a `realm` declaration. The body holds declarations
/// only.
fn parse_realm<'a, I>(tokens: &mut Peekable<I>, qualifiers: Qualifiers, location: Location) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (name, _) = parse_identifier(tokens)?;
    expect(tokens, &Token::LBrace, "'{' after realm name")?;

    let mut body = Vec::new();
    while !consume_if(tokens, &Token::RBrace) {
        match tokens.peek() {
            Some((token, _)) if starts_declaration(token) => {
                body.push(parse_declaration(tokens, DeclarationContext::Realm)?);
            },
            Some((token, location)) => return Err(unexpected(token, *location, "a declaration in realm body")),
            None => return Err(ParseError::UnexpectedEndOfInput { location }),
        }
    }
    consume_if(tokens, &Token::Semicolon);

    Ok(Statement::Realm(RealmDecl { name,
                                    body,
                                    qualifiers,
                                    location }))
}

/// Parses the rest of a `unit` declaration: the header modifiers and the
/// member body.
///
/// Syntax:
/// ```text
///     unit Name [-final] [-access <level>] [-from A, B] [-trust unit X, Y] {
///         [hidden | exposed | shared] [outer] <declaration>
///         ...
///     }
/// ```
/// Modifiers may appear in any order but each at most once.
fn parse_unit<'a, I>(tokens: &mut Peekable<I>, qualifiers: Qualifiers, location: Location) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (name, _) = parse_identifier(tokens)?;

    let mut is_final = false;
    let mut default_access = None;
    let mut parents = Vec::new();
    let mut trusted = Vec::new();
    let mut seen = Vec::new();

    while consume_if(tokens, &Token::Minus) {
        let (modifier, modifier_location) = parse_identifier(tokens)?;
        if seen.contains(&modifier) {
            return Err(ParseError::InvalidDeclaration { details: format!("modifier '-{modifier}' given twice"),
                                                        location: modifier_location, });
        }
        match modifier.as_str() {
            "final" => is_final = true,
            "access" => default_access = Some(parse_access(tokens)?),
            "from" => parents = parse_name_list(tokens)?,
            "trust" => {
                expect(tokens, &Token::Unit, "'unit' after '-trust'")?;
                trusted = parse_name_list(tokens)?;
            },
            _ => {
                return Err(ParseError::InvalidDeclaration { details: format!("unknown unit modifier '-{modifier}'"),
                                                            location: modifier_location, });
            },
        }
        seen.push(modifier);
    }

    expect(tokens, &Token::LBrace, "'{' to open the unit body")?;
    let mut members = Vec::new();
    while !consume_if(tokens, &Token::RBrace) {
        members.push(parse_unit_member(tokens)?);
    }
    consume_if(tokens, &Token::Semicolon);

    Ok(Statement::Unit(UnitDecl { name,
                                  is_final,
                                  default_access,
                                  parents,
                                  trusted,
                                  members,
                                  qualifiers,
                                  location }))
}

fn parse_access<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Access>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    match tokens.next() {
        Some((Token::Hidden, _)) => Ok(Access::Hidden),
        Some((Token::Exposed, _)) => Ok(Access::Exposed),
        Some((Token::Shared, _)) => Ok(Access::Shared),
        Some((token, location)) => Err(unexpected(token, *location, "'hidden', 'exposed' or 'shared'")),
        None => Err(ParseError::UnexpectedEndOfInput { location: Location::default() }),
    }
}

/// Parses `A, B, C`, stopping before the first token that is not a comma.
fn parse_name_list<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<String>>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut names = vec![parse_identifier(tokens)?.0];
    while consume_if(tokens, &Token::Comma) {
        names.push(parse_identifier(tokens)?.0);
    }
    Ok(names)
}

fn parse_unit_member<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<UnitMemberDecl>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = peek_location(tokens);

    let access = match tokens.peek() {
        Some((Token::Hidden, _)) => Some(Access::Hidden),
        Some((Token::Exposed, _)) => Some(Access::Exposed),
        Some((Token::Shared, _)) => Some(Access::Shared),
        _ => None,
    };
    if access.is_some() {
        tokens.next();
    }
    let is_outer = consume_if(tokens, &Token::Outer);

    match tokens.peek() {
        Some((token, _)) if starts_declaration(token) => {},
        Some((token, location)) => return Err(unexpected(token, *location, "a member declaration")),
        None => return Err(ParseError::UnexpectedEndOfInput { location }),
    }
    let declaration = parse_declaration(tokens, DeclarationContext::Unit)?;

    Ok(UnitMemberDecl { access,
                        is_outer,
                        declaration: Box::new(declaration),
                        location })
}
