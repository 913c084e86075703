use crate::ast::{Expr, Keyword, QualifiedName, Sign, Statement, Token, Value};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Position};
use std::collections::VecDeque;
use std::mem;

mod ddl;
mod expr;
mod stmt;
mod types;

/// The parser takes tokens from the lexer and builds the statement AST.
///
/// Each grammar production is a method returning a fully built node or an
/// error; there is no traversal callback machinery and no shared mutable
/// state beyond the token cursor and a small lookahead buffer. Parsing is
/// fail-fast: the first unexpected token aborts the statement with its
/// position and the set of token kinds that would have been accepted.
///
/// The parser only ensures the syntax is well-formed plus the local
/// structural invariants (duplicate record fields, empty shard keys and the
/// like). Whether a referenced table or column exists is the semantic
/// analyzer's job.
pub struct Parser {
    lexer: Lexer,
    current: (Token, Position),
    lookahead: VecDeque<(Token, Position)>,
}

impl Parser {
    /// Creates a parser over the given statement text.
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            lookahead: VecDeque::new(),
        })
    }

    /// Parses the input as a single statement, ending with an optional
    /// semicolon.
    pub fn parse(input: &str) -> Result<Statement> {
        let mut parser = Self::new(input)?;
        let statement = parser.parse_statement()?;
        parser.next_is(&Token::Semicolon)?;
        parser.expect(Token::Eof)?;
        Ok(statement)
    }

    /// Parses a `;`-separated batch, fail-fast on the first error.
    pub fn parse_batch(input: &str) -> Result<Vec<Statement>> {
        let mut parser = Self::new(input)?;
        let mut statements = Vec::new();
        loop {
            while parser.next_is(&Token::Semicolon)? {}
            if parser.at(&Token::Eof) {
                return Ok(statements);
            }
            statements.push(parser.parse_statement()?);
            if !parser.at(&Token::Eof) {
                parser.expect(Token::Semicolon)?;
            }
        }
    }

    /// Parses one statement, dispatching on the leading keyword. Anything
    /// that is not keyword-led falls through to the query path.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        match self.token() {
            Token::Keyword(Keyword::Select) | Token::Keyword(Keyword::Declare) => {
                self.parse_query()
            }
            Token::Keyword(Keyword::Insert) | Token::Keyword(Keyword::Put) => self.parse_insert(),
            Token::Keyword(Keyword::Update) => self.parse_update(),
            Token::Keyword(Keyword::Delete) => self.parse_delete(),
            Token::Keyword(Keyword::Create) => self.parse_create(),
            Token::Keyword(Keyword::Alter) => self.parse_alter(),
            Token::Keyword(Keyword::Drop) => self.parse_drop(),
            Token::Keyword(Keyword::Grant) => self.parse_grant(),
            Token::Keyword(Keyword::Revoke) => self.parse_revoke(),
            Token::Keyword(Keyword::Describe) | Token::Keyword(Keyword::Desc) => {
                self.parse_describe()
            }
            Token::Keyword(Keyword::Show) => self.parse_show(),
            Token::Keyword(Keyword::Set) => self.parse_set_local_region(),
            _ => self.parse_query(),
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    pub(crate) fn token(&self) -> &Token {
        &self.current.0
    }

    pub(crate) fn pos(&self) -> Position {
        self.current.1
    }

    fn pull(&mut self) -> Result<(Token, Position)> {
        match self.lookahead.pop_front() {
            Some(entry) => Ok(entry),
            None => self.lexer.next_token(),
        }
    }

    /// Moves the cursor one token forward.
    pub(crate) fn advance(&mut self) -> Result<()> {
        self.current = self.pull()?;
        Ok(())
    }

    /// Consumes and returns the current token.
    pub(crate) fn take(&mut self) -> Result<Token> {
        let next = self.pull()?;
        Ok(mem::replace(&mut self.current, next).0)
    }

    /// Peeks `n` tokens past the current one (n >= 1) without consuming.
    pub(crate) fn peek(&mut self, n: usize) -> Result<&Token> {
        while self.lookahead.len() < n {
            let entry = self.lexer.next_token()?;
            self.lookahead.push_back(entry);
        }
        Ok(&self.lookahead[n - 1].0)
    }

    pub(crate) fn at(&self, token: &Token) -> bool {
        self.current.0 == *token
    }

    pub(crate) fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current.0 == Token::Keyword(keyword)
    }

    /// Consumes the current token if it matches, returning whether it did.
    pub(crate) fn next_is(&mut self, token: &Token) -> Result<bool> {
        if self.at(token) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn next_is_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        self.next_is(&Token::Keyword(keyword))
    }

    /// Consumes the current token if it is the expected one, or fails.
    pub(crate) fn expect(&mut self, token: Token) -> Result<()> {
        if self.at(&token) {
            self.advance()
        } else {
            Err(self.syntax_error(&[&token.to_string()]))
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        self.expect(Token::Keyword(keyword))
    }

    /// Consumes the current token as an identifier. Non-reserved keywords
    /// are accepted here too, so tables named `users` or columns named
    /// `comment` need no quoting.
    pub(crate) fn ident(&mut self) -> Result<String> {
        match self.token() {
            Token::Ident(_) => match self.take()? {
                Token::Ident(name) => Ok(name),
                _ => unreachable!(),
            },
            Token::Keyword(keyword) if !keyword.is_reserved() => {
                let name = keyword.as_str().to_lowercase();
                self.advance()?;
                Ok(name)
            }
            _ => Err(self.syntax_error(&["identifier"])),
        }
    }

    /// Consumes an identifier, also accepting reserved keywords; used in
    /// positions that no keyword can follow, like field names after a dot.
    pub(crate) fn ident_or_keyword(&mut self) -> Result<String> {
        match self.token() {
            Token::Ident(_) => self.ident(),
            Token::Keyword(keyword) => {
                let name = keyword.as_str().to_lowercase();
                self.advance()?;
                Ok(name)
            }
            _ => Err(self.syntax_error(&["identifier"])),
        }
    }

    /// Consumes the current token as a string literal.
    pub(crate) fn string_literal(&mut self) -> Result<String> {
        match self.token() {
            Token::String(_) => match self.take()? {
                Token::String(s) => Ok(s),
                _ => unreachable!(),
            },
            _ => Err(self.syntax_error(&["string literal"])),
        }
    }

    /// Consumes an optionally signed integer literal.
    pub(crate) fn integer_literal(&mut self) -> Result<i64> {
        let negative = self.next_is(&Token::Minus)?;
        match self.token() {
            Token::Integer(n) => {
                let n = *n;
                self.advance()?;
                Ok(if negative { -n } else { n })
            }
            _ => Err(self.syntax_error(&["integer literal"])),
        }
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    pub(crate) fn syntax_error(&self, expected: &[&str]) -> Error {
        Error::Syntax {
            found: self.token().to_string(),
            position: self.pos(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub(crate) fn structural_error(&self, message: impl Into<String>) -> Error {
        Error::Structural {
            message: message.into(),
            position: self.pos(),
        }
    }

    // ------------------------------------------------------------------
    // Shared small productions
    // ------------------------------------------------------------------

    /// Parses `[namespace:] name [. name]*`.
    pub(crate) fn parse_qualified_name(&mut self) -> Result<QualifiedName> {
        let first = self.ident()?;
        let (namespace, mut parts) = if self.next_is(&Token::Colon)? {
            (Some(first), vec![self.ident()?])
        } else {
            (None, vec![first])
        };
        while self.next_is(&Token::Dot)? {
            parts.push(self.ident()?);
        }
        Ok(QualifiedName { namespace, parts })
    }

    /// Checks that a literal LIMIT/OFFSET value is a non-negative integer.
    /// Nested unary signs are folded first, so `- - -1` is negative and
    /// `+1` is not. Non-literal expressions (e.g. `$limit`) pass through
    /// untouched.
    pub(crate) fn check_nonneg_int(&self, expr: &Expr, clause: &str) -> Result<()> {
        let mut value = expr;
        let mut negative = false;
        while let Expr::Unary { sign, expr: inner } = value {
            negative ^= *sign == Sign::Minus;
            value = inner;
        }
        match value {
            Expr::Literal(Value::Int(_)) if !negative => Ok(()),
            Expr::Literal(Value::Int(_) | Value::Float(_) | Value::Number(_)) => Err(
                self.structural_error(format!("{clause} must be a non-negative integer"))
            ),
            _ => Ok(()),
        }
    }

    /// Parses a constant JSON value from the token stream.
    pub(crate) fn parse_json_value(&mut self) -> Result<Value> {
        match self.token() {
            Token::String(_) => Ok(Value::String(self.string_literal()?)),
            Token::Integer(n) => {
                let n = *n;
                self.advance()?;
                Ok(Value::Int(n))
            }
            Token::Float(f) => {
                let f = *f;
                self.advance()?;
                Ok(Value::Float(f))
            }
            Token::Number(d) => {
                let d = *d;
                self.advance()?;
                Ok(Value::Number(d))
            }
            Token::Minus => {
                self.advance()?;
                match self.parse_json_value()? {
                    Value::Int(n) => Ok(Value::Int(-n)),
                    Value::Float(f) => Ok(Value::Float(-f)),
                    Value::Number(d) => Ok(Value::Number(-d)),
                    _ => Err(self.syntax_error(&["numeric literal"])),
                }
            }
            Token::Keyword(Keyword::True) => {
                self.advance()?;
                Ok(Value::Bool(true))
            }
            Token::Keyword(Keyword::False) => {
                self.advance()?;
                Ok(Value::Bool(false))
            }
            Token::Keyword(Keyword::Null) => {
                self.advance()?;
                Ok(Value::Null)
            }
            Token::LBracket => {
                self.advance()?;
                let mut elements = Vec::new();
                if !self.at(&Token::RBracket) {
                    loop {
                        elements.push(self.parse_json_value()?);
                        if !self.next_is(&Token::Comma)? {
                            break;
                        }
                    }
                }
                self.expect(Token::RBracket)?;
                Ok(Value::Array(elements))
            }
            Token::LBrace => {
                self.advance()?;
                let mut pairs = Vec::new();
                if !self.at(&Token::RBrace) {
                    loop {
                        let key = match self.token() {
                            Token::String(_) => self.string_literal()?,
                            Token::Ident(_) | Token::Keyword(_) => self.ident_or_keyword()?,
                            _ => return Err(self.syntax_error(&["field name"])),
                        };
                        self.expect(Token::Colon)?;
                        pairs.push((key, self.parse_json_value()?));
                        if !self.next_is(&Token::Comma)? {
                            break;
                        }
                    }
                }
                self.expect(Token::RBrace)?;
                Ok(Value::Map(pairs))
            }
            _ => Err(self.syntax_error(&["JSON value"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AdminStatement, DdlStatement};

    #[test]
    fn test_dispatch_by_leading_keyword() {
        assert!(matches!(
            Parser::parse("SELECT * FROM users").unwrap(),
            Statement::Query(_)
        ));
        assert!(matches!(
            Parser::parse("DELETE FROM users WHERE id = 1").unwrap(),
            Statement::Delete(_)
        ));
        assert!(matches!(
            Parser::parse("DROP TABLE users").unwrap(),
            Statement::Ddl(DdlStatement::DropTable { .. })
        ));
        assert!(matches!(
            Parser::parse("SHOW TABLES").unwrap(),
            Statement::Admin(AdminStatement::Show { .. })
        ));
    }

    #[test]
    fn test_unexpected_statement_start() {
        let err = Parser::parse("FROM users").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn test_batch_splits_on_semicolons() {
        let statements = Parser::parse_batch("SELECT * FROM a; DROP TABLE b;").unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = Parser::parse("SELECT * FROM t LIMIT 1 WHERE x > 0").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }
}
