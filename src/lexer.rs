use crate::ast::{Keyword, Token};
use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Line/column location of a token in the source text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn start() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Turns statement text into a stream of classified tokens.
///
/// Keyword recognition is case-insensitive and happens here, so the parser
/// only ever sees already-classified token kinds. Each token is paired with
/// the position of its first character.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn lexical_error(&self, message: impl Into<String>) -> Error {
        Error::Lexical {
            message: message.into(),
            position: self.here(),
        }
    }

    /// Skips whitespace, `--` line comments and `/* */` block comments.
    /// Stops in front of `/*+` so hints survive as tokens.
    fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            match self.current_char() {
                Some(ch) if ch.is_whitespace() => self.advance(),
                Some('-') if self.peek_char(1) == Some('-') => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_char(1) == Some('*') => {
                    if self.peek_char(2) == Some('+') {
                        return Ok(());
                    }
                    self.advance();
                    self.advance();
                    loop {
                        match self.current_char() {
                            Some('*') if self.peek_char(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => self.advance(),
                            None => return Err(self.lexical_error("unterminated block comment")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a quoted run. Single quotes delimit string literals, double
    /// quotes delimit identifiers; both use doubled-quote escaping.
    fn read_quoted(&mut self, quote: char) -> Result<String> {
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            if ch == quote {
                if self.peek_char(1) == Some(quote) {
                    result.push(quote);
                    self.advance();
                    self.advance();
                } else {
                    self.advance();
                    return Ok(result);
                }
            } else {
                result.push(ch);
                self.advance();
            }
        }

        Err(self.lexical_error("unterminated quoted literal"))
    }

    /// Reads a `/*+ ... */` hint, returning its trimmed body.
    fn read_hint(&mut self) -> Result<Token> {
        self.advance(); // /
        self.advance(); // *
        self.advance(); // +
        let mut body = String::new();
        loop {
            match self.current_char() {
                Some('*') if self.peek_char(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return Ok(Token::Hint(body.trim().to_string()));
                }
                Some(ch) => {
                    body.push(ch);
                    self.advance();
                }
                None => return Err(self.lexical_error("unterminated hint")),
            }
        }
    }

    /// Reads a numeric literal. Plain digit runs become `Integer` (falling
    /// back to `Number` past the i64 range), decimal-point forms become
    /// exact `Number` literals, exponent forms become `Float`.
    fn read_number(&mut self) -> Result<Token> {
        let mut text = String::new();
        let mut has_point = false;
        let mut has_exponent = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.'
                && !has_point
                && !has_exponent
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                has_point = true;
                text.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E')
                && !has_exponent
                && self
                    .peek_char(1)
                    .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
            {
                has_exponent = true;
                text.push(ch);
                self.advance();
                if let Some(sign) = self.current_char()
                    && (sign == '+' || sign == '-')
                {
                    text.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        if has_exponent {
            let value = text
                .parse::<f64>()
                .map_err(|_| self.lexical_error(format!("invalid numeric literal '{}'", text)))?;
            Ok(Token::Float(value))
        } else if has_point {
            match Decimal::from_str(&text) {
                Ok(value) => Ok(Token::Number(value)),
                Err(_) => {
                    let value = text.parse::<f64>().map_err(|_| {
                        self.lexical_error(format!("invalid numeric literal '{}'", text))
                    })?;
                    Ok(Token::Float(value))
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => Ok(Token::Integer(value)),
                Err(_) => Decimal::from_str(&text)
                    .map(Token::Number)
                    .map_err(|_| self.lexical_error(format!("invalid numeric literal '{}'", text))),
            }
        }
    }

    /// Produces the next token and its source position.
    pub fn next_token(&mut self) -> Result<(Token, Position)> {
        self.skip_whitespace()?;
        let position = self.here();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('/') if self.peek_char(1) == Some('*') && self.peek_char(2) == Some('+') => {
                self.read_hint()?
            }
            Some('$') => {
                if self
                    .peek_char(1)
                    .is_some_and(|c| c.is_alphabetic() || c == '_')
                {
                    self.advance();
                    Token::Variable(self.read_identifier())
                } else {
                    return Err(self.lexical_error("'$' must be followed by a variable name"));
                }
            }
            Some('\'') => Token::String(self.read_quoted('\'')?),
            Some('"') => Token::Ident(self.read_quoted('"')?),
            Some('=') => {
                self.advance();
                Token::Eq
            }
            Some('!') if self.peek_char(1) == Some('=') => {
                self.advance();
                self.advance();
                Token::NotEq
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::LtEq
                } else if self.peek_char(1) == Some('>') {
                    self.advance();
                    self.advance();
                    Token::NotEq
                } else {
                    self.advance();
                    Token::Lt
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::GtEq
                } else {
                    self.advance();
                    Token::Gt
                }
            }
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.advance();
                    self.advance();
                    Token::Concat
                } else {
                    return Err(self.lexical_error("unexpected '|' (did you mean '||'?)"));
                }
            }
            Some('+') => {
                self.advance();
                Token::Plus
            }
            Some('-') => {
                self.advance();
                Token::Minus
            }
            Some('*') => {
                self.advance();
                Token::Star
            }
            Some('/') => {
                self.advance();
                Token::Slash
            }
            Some('.') => {
                self.advance();
                Token::Dot
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some(':') => {
                self.advance();
                Token::Colon
            }
            Some(';') => {
                self.advance();
                Token::Semicolon
            }
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some('[') => {
                self.advance();
                Token::LBracket
            }
            Some(']') => {
                self.advance();
                Token::RBracket
            }
            Some('{') => {
                self.advance();
                Token::LBrace
            }
            Some('}') => {
                self.advance();
                Token::RBrace
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                match Keyword::from_ident(&ident) {
                    Some(keyword) => Token::Keyword(keyword),
                    None => Token::Ident(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) => return Err(self.lexical_error(format!("unexpected character '{}'", ch))),
        };

        Ok((token, position))
    }
}

#[test]
fn test_keywords_case_insensitive() {
    let mut lexer = Lexer::new("select SELECT SeLeCt");
    for _ in 0..3 {
        assert_eq!(
            lexer.next_token().unwrap().0,
            Token::Keyword(Keyword::Select)
        );
    }
    assert_eq!(lexer.next_token().unwrap().0, Token::Eof);
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new("a\n  b");
    let (_, pos) = lexer.next_token().unwrap();
    assert_eq!((pos.line, pos.column), (1, 1));
    let (_, pos) = lexer.next_token().unwrap();
    assert_eq!((pos.line, pos.column), (2, 3));
}

#[test]
fn test_numbers() {
    let mut lexer = Lexer::new("42 3.5 1e3");
    assert_eq!(lexer.next_token().unwrap().0, Token::Integer(42));
    assert_eq!(
        lexer.next_token().unwrap().0,
        Token::Number(Decimal::from_str("3.5").unwrap())
    );
    assert_eq!(lexer.next_token().unwrap().0, Token::Float(1000.0));
}

#[test]
fn test_hint_survives_comment_skipping() {
    let mut lexer = Lexer::new("/* gone */ /*+ FORCE_PRIMARY_INDEX */");
    assert_eq!(
        lexer.next_token().unwrap().0,
        Token::Hint("FORCE_PRIMARY_INDEX".to_string())
    );
}
