//! # kvql
//!
//! Parser front end for a declarative, SQL-like query language over
//! semi-structured, table-oriented key-value data. Statement text goes in,
//! a typed abstract syntax tree comes out; execution, planning and catalog
//! lookups all live downstream.
//!
//! The surface covers queries with path navigation into nested data, DML
//! (INSERT/PUT, UPDATE, DELETE), table and index DDL including multi-region
//! tables and counter columns, and administrative statements for users,
//! roles and privileges.
//!
//! ## Quick start
//!
//! ```
//! use kvql::{parse, Statement};
//!
//! let stmt = parse("SELECT name, age FROM users WHERE age >= 21").unwrap();
//! assert!(matches!(stmt, Statement::Query(_)));
//! ```
//!
//! Path expressions navigate freely through records, maps and arrays:
//!
//! ```
//! kvql::parse("SELECT u.address.phones[0].number FROM users u").unwrap();
//! ```
//!
//! Errors carry the offending position and, for syntax errors, the set of
//! token kinds that would have been accepted:
//!
//! ```
//! let err = kvql::parse("SELECT FROM users").unwrap_err();
//! println!("{err}");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::Statement;
pub use error::{Error, Result};
pub use lexer::{Lexer, Position};
pub use parser::Parser;

/// Parses a single statement, with an optional trailing semicolon.
pub fn parse(input: &str) -> Result<Statement> {
    Parser::parse(input)
}

/// Parses a semicolon-separated batch of statements, stopping at the first
/// error.
pub fn parse_batch(input: &str) -> Result<Vec<Statement>> {
    Parser::parse_batch(input)
}
