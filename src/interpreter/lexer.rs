use logos::{FilterResult, Lexer, Logos};

use crate::{
    ast::Location,
    error::{LexError, ParseError},
};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras, error = LexError)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    /// Numeric literal tokens, such as `42`, `3.14`, `2e-3`, `0xff` or
    /// `0b101.1`.
    #[regex(r"[0-9]", lex_number)]
    Number(NumberLiteral),
    /// String literal tokens with escapes resolved, such as `"a\tb"`.
    #[token("\"", lex_string)]
    String(String),
    /// Character literal tokens, such as `'x'` or `'\n'`.
    #[token("'", lex_char)]
    Char(char),
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `## Comments.`
    #[regex(r"##[^\n]*", logos::skip, allow_greedy = true)]
    LineComment,
    /// ```text
    /// #* Multi line
    ///    comments. *#
    /// ```
    #[token("#*", lex_block_comment)]
    BlockComment,
    /// Line breaks only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line      += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,

    /// `var`
    #[token("var")]
    Var,
    /// `array`
    #[token("array")]
    Array,
    /// `dict`
    #[token("dict")]
    Dict,
    /// `func`
    #[token("func")]
    Func,
    /// `omni`
    #[token("omni")]
    Omni,
    /// `enum`
    #[token("enum")]
    Enum,
    /// `realm`
    #[token("realm")]
    Realm,
    /// `unit`
    #[token("unit")]
    Unit,
    /// `ref`
    #[token("ref")]
    Ref,
    /// `const`
    #[token("const")]
    Const,
    /// `local`
    #[token("local")]
    Local,
    /// `global`
    #[token("global")]
    Global,
    /// `hidden`
    #[token("hidden")]
    Hidden,
    /// `exposed`
    #[token("exposed")]
    Exposed,
    /// `shared`
    #[token("shared")]
    Shared,
    /// `outer`
    #[token("outer")]
    Outer,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `for`
    #[token("for")]
    For,
    /// `foreach`
    #[token("foreach")]
    Foreach,
    /// `in`
    #[token("in")]
    In,
    /// `while`
    #[token("while")]
    While,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `return`
    #[token("return")]
    Return,
    /// `import`
    #[token("import")]
    Import,
    /// `typeof`
    #[token("typeof")]
    TypeOf,
    /// Boolean literal tokens, such as `true`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// `null`
    #[token("null")]
    Null,

    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    MulAssign,
    /// `/=`
    #[token("/=")]
    DivAssign,
    /// `%=`
    #[token("%=")]
    ModAssign,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<<`
    #[token("<<")]
    ShiftLeft,
    /// `>>`
    #[token(">>")]
    ShiftRight,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `^^`
    #[token("^^")]
    CaretCaret,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `~`
    #[token("~")]
    Tilde,
    /// `!`
    #[token("!")]
    Bang,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// `@`
    #[token("@")]
    At,

    /// End of input, appended by [`tokenize`].
    Eof,
}

/// The value of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    /// A literal without fraction or exponent.
    Integer(i64),
    /// A literal with a fraction or an exponent.
    Float(f64),
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and the byte offset at which it starts, so that
/// every token can be given a line and a column.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

/// Tokenizes a complete source text.
///
/// Every token is paired with the location of its first character. The
/// returned stream always ends with [`Token::Eof`], which carries the location
/// just past the last character.
///
/// # Errors
/// Returns [`ParseError::Lexical`] for the first lexeme that cannot be turned
/// into a token.
///
/// # Example
/// ```
/// use wio::interpreter::lexer::{NumberLiteral, Token, tokenize};
///
/// let tokens = tokenize("var x = 0x1f;").unwrap();
/// assert_eq!(tokens[3].0, Token::Number(NumberLiteral::Integer(31)));
/// assert_eq!(tokens[3].1.column, 9);
/// assert_eq!(tokens.last().unwrap().0, Token::Eof);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, Location)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source,
                                             LexerExtras { line:       1,
                                                           line_start: 0, });

    while let Some(token) = lexer.next() {
        let location = location_of(&lexer, lexer.span().start);
        match token {
            Ok(token) => tokens.push((token, location)),
            Err(error) => {
                return Err(ParseError::Lexical { error,
                                                 lexeme: lexer.slice().to_string(),
                                                 location });
            },
        }
    }

    let end = location_of(&lexer, source.len());
    tokens.push((Token::Eof, end));

    Ok(tokens)
}

fn location_of(lexer: &Lexer<'_, Token>, offset: usize) -> Location {
    let line_start = lexer.extras.line_start.min(offset);
    let column = lexer.source()[line_start..offset].chars().count() + 1;

    Location::new(lexer.extras.line, column)
}

/// Scans the remainder of a numeric literal whose first digit has already
/// been matched.
///
/// Supports decimal literals with optional fraction and exponent, and the
/// radix prefixes `0b`, `0o` and `0x`, which may also carry a fraction.
/// A literal directly followed by a letter, digit or underscore is rejected.
fn lex_number(lex: &mut Lexer<'_, Token>) -> Result<NumberLiteral, LexError> {
    let first = lex.slice().as_bytes()[0];
    let rest = lex.remainder().as_bytes();

    let radix = match (first, rest.first()) {
        (b'0', Some(b'b' | b'B')) => Some(2),
        (b'0', Some(b'o' | b'O')) => Some(8),
        (b'0', Some(b'x' | b'X')) => Some(16),
        _ => None,
    };

    let result = match radix {
        Some(radix) => scan_radix(rest, radix),
        None => scan_decimal(first, rest),
    };
    let (consumed, value) = match result {
        Ok(scanned) => scanned,
        Err(consumed) => {
            lex.bump(consumed);
            return Err(LexError::InvalidNumber(lex.slice().to_string()));
        },
    };
    lex.bump(consumed);

    value.map_err(|error| match error {
             LexError::InvalidNumber(_) => LexError::InvalidNumber(lex.slice().to_string()),
             _ => LexError::NumberTooLarge(lex.slice().to_string()),
         })
}

/// Bytes consumed after the first digit, with the parsed value. A malformed
/// literal only reports how far it extends.
type Scanned = Result<(usize, Result<NumberLiteral, LexError>), usize>;

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn count_while(bytes: &[u8], start: usize, predicate: impl Fn(u8) -> bool) -> usize {
    bytes[start..].iter().take_while(|&&b| predicate(b)).count()
}

fn scan_decimal(first: u8, rest: &[u8]) -> Scanned {
    let mut end = count_while(rest, 0, |b| b.is_ascii_digit());
    let mut is_float = false;

    if rest.get(end) == Some(&b'.') && rest.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end += 1 + count_while(rest, end + 1, |b| b.is_ascii_digit());
        is_float = true;
    }

    if matches!(rest.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(rest.get(end + 1), Some(b'+' | b'-')));
        if rest.get(end + 1 + sign).is_some_and(u8::is_ascii_digit) {
            end += 1 + sign + count_while(rest, end + 1 + sign, |b| b.is_ascii_digit());
            is_float = true;
        }
    }

    if rest.get(end).copied().is_some_and(is_word_byte) {
        let trailing = count_while(rest, end, is_word_byte);
        return Err(end + trailing);
    }

    let mut text = String::with_capacity(end + 1);
    text.push(char::from(first));
    text.push_str(&String::from_utf8_lossy(&rest[..end]));

    let value = if is_float {
        text.parse()
            .map(NumberLiteral::Float)
            .map_err(|_| LexError::InvalidNumber(String::new()))
    } else {
        text.parse()
            .map(NumberLiteral::Integer)
            .map_err(|_| LexError::NumberTooLarge(String::new()))
    };

    Ok((end, value))
}

fn scan_radix(rest: &[u8], radix: u32) -> Scanned {
    // `rest` starts at the radix letter.
    let digits_start = 1;
    let int_len = count_while(rest, digits_start, is_word_byte);
    let mut end = digits_start + int_len;

    let mut fraction = None;
    if rest.get(end) == Some(&b'.') && rest.get(end + 1).copied().is_some_and(is_word_byte) {
        let fraction_len = count_while(rest, end + 1, is_word_byte);
        fraction = Some(&rest[end + 1..end + 1 + fraction_len]);
        end += 1 + fraction_len;
    }

    let integer = &rest[digits_start..digits_start + int_len];
    let valid = |digits: &[u8]| digits.iter().all(|&b| char::from(b).is_digit(radix));
    if integer.is_empty() || !valid(integer) || fraction.is_some_and(|f| !valid(f)) {
        return Err(end);
    }

    let integer_text = String::from_utf8_lossy(integer);
    let Some(fraction) = fraction else {
        let value = i64::from_str_radix(&integer_text, radix).map(NumberLiteral::Integer)
                                                             .map_err(|_| LexError::NumberTooLarge(String::new()));
        return Ok((end, value));
    };

    let base = f64::from(radix);
    let mut value = integer.iter()
                           .filter_map(|&b| char::from(b).to_digit(radix))
                           .fold(0.0_f64, |acc, digit| acc.mul_add(base, f64::from(digit)));
    let mut scale = 1.0 / base;
    for digit in fraction.iter().filter_map(|&b| char::from(b).to_digit(radix)) {
        value += f64::from(digit) * scale;
        scale /= base;
    }

    Ok((end, Ok(NumberLiteral::Float(value))))
}

fn unescape(escaped: char) -> Result<char, LexError> {
    match escaped {
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        other => Err(LexError::InvalidEscape(other)),
    }
}

/// Reads a string literal after its opening quote.
fn lex_string(lex: &mut Lexer<'_, Token>) -> Result<String, LexError> {
    let mut value = String::new();
    let mut chars = lex.remainder().char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(offset + 1);
                return Ok(value);
            },
            '\\' => match chars.next() {
                Some((escape_offset, escaped)) => match unescape(escaped) {
                    Ok(c) => value.push(c),
                    Err(error) => {
                        lex.bump(escape_offset + escaped.len_utf8());
                        return Err(error);
                    },
                },
                None => break,
            },
            '\n' => {
                lex.bump(offset);
                return Err(LexError::UnterminatedString);
            },
            c => value.push(c),
        }
    }

    lex.bump(lex.remainder().len());
    Err(LexError::UnterminatedString)
}

/// Reads a character literal after its opening quote.
fn lex_char(lex: &mut Lexer<'_, Token>) -> Result<char, LexError> {
    let mut chars = lex.remainder().char_indices();

    let value = match chars.next() {
        Some((_, '\\')) => match chars.next() {
            Some((_, escaped)) => unescape(escaped)?,
            None => return Err(LexError::InvalidCharacter),
        },
        Some((_, '\'' | '\n')) | None => return Err(LexError::InvalidCharacter),
        Some((_, c)) => c,
    };

    match chars.next() {
        Some((offset, '\'')) => {
            lex.bump(offset + 1);
            Ok(value)
        },
        _ => Err(LexError::InvalidCharacter),
    }
}

/// Skips a block comment, keeping the line counter in sync.
fn lex_block_comment(lex: &mut Lexer<'_, Token>) -> FilterResult<(), LexError> {
    let Some(end) = lex.remainder().find("*#") else {
        lex.bump(lex.remainder().len());
        return FilterResult::Error(LexError::UnterminatedComment);
    };

    let body_start = lex.span().end;
    let body = &lex.remainder()[..end];
    if let Some(last_newline) = body.rfind('\n') {
        lex.extras.line += body.matches('\n').count();
        lex.extras.line_start = body_start + last_newline + 1;
    }

    lex.bump(end + 2);
    FilterResult::Skip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(token, _)| token).collect()
    }

    #[test]
    fn radix_literals() {
        assert_eq!(kinds("0b101 0o17 0xFF"),
                   vec![Token::Number(NumberLiteral::Integer(5)),
                        Token::Number(NumberLiteral::Integer(15)),
                        Token::Number(NumberLiteral::Integer(255)),
                        Token::Eof]);
        assert_eq!(kinds("0b1.1"), vec![Token::Number(NumberLiteral::Float(1.5)), Token::Eof]);
    }

    #[test]
    fn integer_followed_by_member_access() {
        assert_eq!(kinds("1.x"),
                   vec![Token::Number(NumberLiteral::Integer(1)),
                        Token::Dot,
                        Token::Identifier("x".to_string()),
                        Token::Eof]);
    }

    #[test]
    fn block_comment_tracks_lines() {
        let tokens = tokenize("#* one\n two *# x\ny").unwrap();
        assert_eq!(tokens[0].1, Location::new(2, 9));
        assert_eq!(tokens[1].1, Location::new(3, 1));
    }

    #[test]
    fn radix_without_digits_is_rejected() {
        assert!(matches!(tokenize("0x;"),
                         Err(ParseError::Lexical { error: LexError::InvalidNumber(_), .. })));
    }
}
