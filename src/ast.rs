//! # Abstract Syntax Tree
//!
//! This module defines the typed AST for the query language: a declarative,
//! SQL-like query and data-definition language over semi-structured,
//! table-oriented key-value data.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Operator enums (comparison, arithmetic, quantifiers)
//! - **[expressions]** - Expression nodes, path steps and literal values
//! - **[statements]** - Query and DML statement structures
//! - **[ddl]** - DDL and administrative statement structures
//! - **[types]** - Declared type shapes and column augmentations
//!
//! ## Core Concepts
//!
//! ### One statement, one tree
//!
//! Each parsed statement yields exactly one [`Statement`] root. Every node
//! owns its children; nothing is shared or cyclic, and nothing is mutated
//! after construction. Ownership of the tree passes entirely to the caller.
//!
//! ### Path expressions
//!
//! Navigation into nested records, maps and arrays is a base expression plus
//! a chain of [`PathStep`]s:
//!
//! ```text
//! t.address.phones[0].number
//! ```
//!
//! parses to `Path(ColumnRef(t), [MapField(address), MapField(phones),
//! ArrayIndex(0), MapField(number)])`.
//!
//! ### Collapsed literal hierarchy
//!
//! JSON-shaped constants are one recursive [`Value`] sum type rather than a
//! node kind per grammar rule, so `{"a": [1, null]}` is a single `Literal`
//! leaf when it contains no sub-expressions.

pub mod tokens;
pub mod operators;
pub mod expressions;
pub mod statements;
pub mod ddl;
pub mod types;

pub use tokens::{Keyword, Token};
pub use operators::{ArithOp, CompareOp, Direction, MulOp, NullsOrder, Quantifier, Sign};
pub use expressions::{Expr, ExtractUnit, MapFilterKind, PathStep, TypeSpec, Value};
pub use statements::{
    DeleteStatement, FromClause, InsertMode, InsertSource, InsertStatement, OrderBy, QualifiedName,
    SelectItem, SelectStatement, Statement, TableRef, TtlClause, TtlUnit, UnnestItem, UpdateClause,
    UpdateStatement, VarDecl,
};
pub use ddl::{
    AccountAction, AdminStatement, AlterAction, DdlStatement, DescribeTarget, FieldDef,
    GrantTarget, IndexField, Principal, PrincipalKind, PrimaryKeyDef, ShowTarget,
};
pub use types::{
    GeneratedKind, IdentityDef, JsonMrCounterPath, MrCounterKind, RecordField, SequenceOptions,
    TypeDef, UuidDef,
};
