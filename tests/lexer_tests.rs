use kvql::ast::{Keyword, Token};
use kvql::{Error, Lexer};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let (token, _) = lexer.next_token().unwrap();
        if token == Token::Eof {
            return tokens;
        }
        tokens.push(token);
    }
}

#[test]
fn test_operators_and_punctuation() {
    assert_eq!(
        tokens("= != <> < <= > >= + - * / || . , : ; ( ) [ ] { }"),
        vec![
            Token::Eq,
            Token::NotEq,
            Token::NotEq,
            Token::Lt,
            Token::LtEq,
            Token::Gt,
            Token::GtEq,
            Token::Plus,
            Token::Minus,
            Token::Star,
            Token::Slash,
            Token::Concat,
            Token::Dot,
            Token::Comma,
            Token::Colon,
            Token::Semicolon,
            Token::LParen,
            Token::RParen,
            Token::LBracket,
            Token::RBracket,
            Token::LBrace,
            Token::RBrace,
        ]
    );
}

#[test]
fn test_quoted_strings_and_identifiers() {
    // single quotes make strings, double quotes make identifiers,
    // doubling escapes the quote itself
    assert_eq!(
        tokens(r#"'it''s' "select" "odd name""#),
        vec![
            Token::String("it's".to_string()),
            Token::Ident("select".to_string()),
            Token::Ident("odd name".to_string()),
        ]
    );
}

#[test]
fn test_double_quoted_never_a_keyword() {
    assert_eq!(tokens(r#""FROM""#), vec![Token::Ident("FROM".to_string())]);
    assert_eq!(tokens("FROM"), vec![Token::Keyword(Keyword::From)]);
}

#[test]
fn test_variables() {
    assert_eq!(
        tokens("$v $long_name"),
        vec![
            Token::Variable("v".to_string()),
            Token::Variable("long_name".to_string()),
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        tokens("a -- rest of line\n /* block\n comment */ b"),
        vec![Token::Ident("a".to_string()), Token::Ident("b".to_string())]
    );
}

#[test]
fn test_underscore_keywords() {
    assert_eq!(
        tokens("MR_COUNTER seq_transform"),
        vec![
            Token::Keyword(Keyword::MrCounter),
            Token::Keyword(Keyword::SeqTransform),
        ]
    );
}

#[test]
fn test_integer_overflow_falls_back_to_number() {
    let parsed = tokens("99999999999999999999");
    assert!(matches!(parsed[0], Token::Number(_)));
}

#[test]
fn test_lexical_errors() {
    let mut lexer = Lexer::new("'unterminated");
    assert!(matches!(
        lexer.next_token().unwrap_err(),
        Error::Lexical { .. }
    ));

    let mut lexer = Lexer::new("a | b");
    lexer.next_token().unwrap();
    assert!(matches!(
        lexer.next_token().unwrap_err(),
        Error::Lexical { .. }
    ));

    let mut lexer = Lexer::new("#");
    assert!(matches!(
        lexer.next_token().unwrap_err(),
        Error::Lexical { .. }
    ));
}

#[test]
fn test_error_position_is_1_based() {
    let mut lexer = Lexer::new("ok\n   @");
    lexer.next_token().unwrap();
    match lexer.next_token().unwrap_err() {
        Error::Lexical { position, .. } => {
            assert_eq!((position.line, position.column), (2, 4));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
