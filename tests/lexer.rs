use pretty_assertions::assert_eq;
use wio::{
    ast::Location,
    error::{LexError, ParseError},
    interpreter::lexer::{NumberLiteral, Token, tokenize},
};

fn kinds(source: &str) -> Vec<Token> {
    tokenize(source).unwrap().into_iter().map(|(token, _)| token).collect()
}

fn lex_error(source: &str) -> (LexError, Location) {
    match tokenize(source) {
        Err(ParseError::Lexical { error, location, .. }) => (error, location),
        other => panic!("Expected a lexical error for {source:?}, got {other:?}"),
    }
}

fn ident(name: &str) -> Token {
    Token::Identifier(name.to_string())
}

#[test]
fn equivalent_spellings_produce_the_same_number() {
    for source in ["10", "0xA", "0b1010", "0o12"] {
        assert_eq!(kinds(source), vec![Token::Number(NumberLiteral::Integer(10)), Token::Eof], "{source}");
    }
    for source in ["2.5", "25e-1", "0.25E1", "0b10.1"] {
        assert_eq!(kinds(source), vec![Token::Number(NumberLiteral::Float(2.5)), Token::Eof], "{source}");
    }
}

#[test]
fn exponent_makes_a_float() {
    assert_eq!(kinds("1e3"), vec![Token::Number(NumberLiteral::Float(1000.0)), Token::Eof]);
}

#[test]
fn numbers_must_not_run_into_letters() {
    let (error, location) = lex_error("var x = 12abc;");
    assert_eq!(error, LexError::InvalidNumber("12abc".to_string()));
    assert_eq!(location, Location::new(1, 9));

    assert!(matches!(lex_error("0b102").0, LexError::InvalidNumber(_)));
}

#[test]
fn oversized_integers_are_rejected() {
    assert!(matches!(lex_error("99999999999999999999").0, LexError::NumberTooLarge(_)));
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(kinds("var variable unit units_ _x"),
               vec![Token::Var, ident("variable"), Token::Unit, ident("units_"), ident("_x"), Token::Eof]);
}

#[test]
fn longest_operator_wins() {
    assert_eq!(kinds("a <<= b"), vec![ident("a"), Token::ShiftLeft, Token::Equals, ident("b"), Token::Eof]);
    assert_eq!(kinds("++ + += ^^ ^ && &"),
               vec![Token::PlusPlus,
                    Token::Plus,
                    Token::PlusAssign,
                    Token::CaretCaret,
                    Token::Caret,
                    Token::AndAnd,
                    Token::Ampersand,
                    Token::Eof]);
}

#[test]
fn string_and_character_escapes() {
    assert_eq!(kinds(r#""a\tb\n\"q\"\\" '\n' 'x'"#),
               vec![Token::String("a\tb\n\"q\"\\".to_string()), Token::Char('\n'), Token::Char('x'), Token::Eof]);
}

#[test]
fn unknown_escapes_are_errors() {
    assert_eq!(lex_error(r#""bad \q""#).0, LexError::InvalidEscape('q'));
}

#[test]
fn unterminated_literals() {
    assert_eq!(lex_error("\"open").0, LexError::UnterminatedString);
    assert_eq!(lex_error("\"line\nbreak\"").0, LexError::UnterminatedString);
    assert_eq!(lex_error("'ab'").0, LexError::InvalidCharacter);
    assert_eq!(lex_error("''").0, LexError::InvalidCharacter);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(kinds("x ## trailing comment\n#* block\ncomment *# y"), vec![ident("x"), ident("y"), Token::Eof]);
}

#[test]
fn unterminated_block_comment() {
    assert_eq!(lex_error("x #* never closed").0, LexError::UnterminatedComment);
}

#[test]
fn unrecognized_characters_are_located() {
    let (error, location) = lex_error("var x = 1;\n  $");
    assert_eq!(error, LexError::UnexpectedCharacter);
    assert_eq!(location, Location::new(2, 3));
}

#[test]
fn locations_count_columns_in_characters() {
    let tokens = tokenize("\"äö\" x").unwrap();
    assert_eq!(tokens[1].1, Location::new(1, 6));
}

#[test]
fn eof_marks_the_end_of_input() {
    let tokens = tokenize("a\nbc").unwrap();
    assert_eq!(tokens.last().unwrap(), &(Token::Eof, Location::new(2, 3)));
}
