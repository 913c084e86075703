use crate::ast::ddl::{AdminStatement, DdlStatement};
use crate::ast::expressions::{Expr, Value};
use crate::ast::operators::{Direction, NullsOrder};
use crate::ast::types::TypeDef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root AST node: one per parsed statement.
///
/// Built from statement text by the parser and handed to the semantic
/// analyzer. Only syntactic and local structural well-formedness is
/// guaranteed; whether a referenced table or column exists is the analyzer's
/// job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Select-from-where query
    Query(Box<SelectStatement>),

    /// INSERT / PUT row upsert
    Insert(InsertStatement),

    /// UPDATE with one or more update clauses
    Update(UpdateStatement),

    /// DELETE with optional WHERE
    Delete(DeleteStatement),

    /// DDL: tables, indexes, namespaces, regions
    Ddl(DdlStatement),

    /// Administrative: users, roles, privileges, describe/show
    Admin(AdminStatement),
}

/// A possibly namespace-qualified table name, e.g. `ns:parent.child`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: Option<String>,
    /// Table path, parent first for child tables
    pub parts: Vec<String>,
}

impl QualifiedName {
    pub fn simple(name: impl Into<String>) -> Self {
        QualifiedName {
            namespace: None,
            parts: vec![name.into()],
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.namespace {
            write!(f, "{}:", ns)?;
        }
        f.write_str(&self.parts.join("."))
    }
}

/// A declared external variable from the query prolog
/// (`DECLARE $v INTEGER;`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub type_def: TypeDef,
}

/// One projected item of a select list or RETURNING clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// A table in a FROM clause, with an optional row alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: QualifiedName,
    pub alias: Option<String>,
}

/// One UNNEST item: an array-valued path flattened into the row stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnnestItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// FROM clause: the tables scanned plus any UNNEST items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromClause {
    pub tables: Vec<TableRef>,
    pub unnest: Vec<UnnestItem>,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub expr: Expr,
    pub direction: Direction,
    pub nulls: Option<NullsOrder>,
}

/// A full select-from-where query.
///
/// Clauses appear in the grammar's fixed order; optional clauses are `None`
/// or empty when absent. Literal LIMIT/OFFSET values are checked to be
/// non-negative integers at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub prolog: Vec<VarDecl>,
    pub hints: Vec<String>,
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub from: FromClause,
    pub r#where: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

/// Whether a row write is a plain INSERT or an overwriting PUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertMode {
    Insert,
    Put,
}

/// Source of the inserted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    /// `VALUES (e1, e2, ...)`
    Values(Vec<Expr>),
    /// `JSON {...}` - a constant JSON document
    Json(Value),
}

/// Row expiration attached by an INSERT or UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TtlClause {
    Duration { value: Expr, unit: TtlUnit },
    TableDefault,
}

/// TTL duration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TtlUnit {
    Hours,
    Days,
}

/// INSERT / PUT statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub mode: InsertMode,
    pub table: TableRef,
    pub columns: Option<Vec<String>>,
    pub source: InsertSource,
    pub ttl: Option<TtlClause>,
    pub returning: Option<Vec<SelectItem>>,
}

/// One clause of an UPDATE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UpdateClause {
    /// `SET target = value`
    Set { target: Expr, value: Expr },
    /// `ADD target value` - append to an array
    Add { target: Expr, value: Expr },
    /// `PUT target value` - insert or overwrite map entries
    Put { target: Expr, value: Expr },
    /// `REMOVE target`
    Remove { target: Expr },
    /// `SET TTL ...` - change the row's expiration
    SetTtl(TtlClause),
    /// `JSON MERGE target WITH PATCH patch`
    JsonMergePatch { target: Expr, patch: Value },
}

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub table: TableRef,
    pub updates: Vec<UpdateClause>,
    pub r#where: Option<Expr>,
    pub returning: Option<Vec<SelectItem>>,
}

/// DELETE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub table: TableRef,
    pub r#where: Option<Expr>,
    pub returning: Option<Vec<SelectItem>>,
}
