use crate::lexer::Position;
use thiserror::Error;

/// Errors produced while turning statement text into an AST.
///
/// The three variants mirror the three ways a parse can go wrong:
///
/// - [`Error::Lexical`] - the input contains a character sequence that is not
///   a token of the language at all.
/// - [`Error::Syntax`] - every token is valid, but the current token does not
///   match any production alternative at the current position. Carries the
///   offending token text and the set of token kinds that would have been
///   accepted.
/// - [`Error::Structural`] - the input is grammatically well-formed but
///   violates a local invariant that needs no catalog lookup (duplicate
///   record field names, an empty shard key list, a negative literal LIMIT).
///
/// Parsing is fail-fast: the first error aborts the current statement and no
/// partial AST is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("lexical error at {position}: {message}")]
    Lexical { message: String, position: Position },

    #[error("syntax error at {position}: found {found}, expected {}", expected.join(" or "))]
    Syntax {
        found: String,
        position: Position,
        expected: Vec<String>,
    },

    #[error("invalid statement at {position}: {message}")]
    Structural { message: String, position: Position },
}

pub type Result<T> = std::result::Result<T, Error>;
