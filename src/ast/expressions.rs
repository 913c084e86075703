use crate::ast::operators::{ArithOp, CompareOp, MulOp, Quantifier, Sign};
use crate::ast::statements::SelectStatement;
use crate::ast::types::TypeDef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A constant JSON-shaped value.
///
/// One recursive sum type covers the whole literal hierarchy: null, boolean,
/// the three numeric literal kinds, string, array and map. Integers keep
/// their own variant so downstream typing can tell `1` from `1.0`, and exact
/// decimal literals are preserved as [`Decimal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Number(Decimal),
    String(String),
    Array(Vec<Value>),
    Map(Vec<(String, Value)>),
}

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Binary variants mirror the precedence chain: the lowest-precedence
/// operator ends up outermost, and same-precedence operators group strictly
/// left to right. Parentheses reset precedence during parsing but are not
/// materialized as nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Constant value, possibly a whole JSON tree
    Literal(Value),

    /// Reference to a column or table alias by name
    ///
    /// `t.a.b` parses to `Path(ColumnRef(t), [MapField(a), MapField(b)])`;
    /// qualification is a path concern, not a naming one.
    ColumnRef(String),

    /// External variable reference (`$name`)
    VarRef(String),

    /// `*`, valid only as a select-list item or aggregate argument
    Star,

    /// Logical OR
    Or(Box<Expr>, Box<Expr>),

    /// Logical AND
    And(Box<Expr>, Box<Expr>),

    /// Logical NOT
    Not(Box<Expr>),

    /// `expr IS [NOT] NULL`
    IsNull { expr: Box<Expr>, negated: bool },

    /// `expr BETWEEN low AND high` - always exactly three children
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },

    /// Comparison, optionally quantified (`a >= ANY b`)
    Comparison {
        op: CompareOp,
        quantifier: Quantifier,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `targets IN (row, row, ...)`
    ///
    /// One target is the single-key form, several targets the multi-key
    /// form; every row has the same arity as the target list.
    InList {
        targets: Vec<Expr>,
        rows: Vec<Vec<Expr>>,
    },

    /// `targets IN (SELECT ...)`
    InSubquery {
        targets: Vec<Expr>,
        subquery: Box<SelectStatement>,
    },

    /// `EXISTS expr`
    Exists(Box<Expr>),

    /// `expr IS [NOT] OF TYPE (t, ...)`
    IsOfType {
        expr: Box<Expr>,
        negated: bool,
        types: Vec<TypeSpec>,
    },

    /// String concatenation (`||`)
    Concat(Box<Expr>, Box<Expr>),

    /// Additive operation (`+`, `-`)
    Arithmetic {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Multiplicative operation (`*`, `/`)
    Multiplicative {
        op: MulOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary sign (`+x`, `-x`)
    Unary { sign: Sign, expr: Box<Expr> },

    /// Path expression: a base value plus a chain of navigation steps
    ///
    /// A path with zero steps degenerates to the bare base and is never
    /// wrapped in this variant.
    Path { base: Box<Expr>, steps: Vec<PathStep> },

    /// Array constructor (`[e1, e2, ...]`)
    ArrayConstructor(Vec<Expr>),

    /// Map constructor (`{k1: v1, k2: v2}`) with computed keys
    MapConstructor(Vec<(Expr, Expr)>),

    /// Function call (`name(args)`)
    FunctionCall { name: String, args: Vec<Expr> },

    /// Searched CASE expression, WHEN arms in source order
    Case {
        when_then: Vec<(Expr, Expr)>,
        else_expr: Option<Box<Expr>>,
    },

    /// `CAST (expr AS type)`
    Cast { expr: Box<Expr>, target: TypeDef },

    /// `EXTRACT (unit FROM expr)`
    Extract { unit: ExtractUnit, expr: Box<Expr> },

    /// `SEQ_TRANSFORM (input, mapper)`
    Transform { input: Box<Expr>, mapper: Box<Expr> },

    /// Parenthesized subquery used as an expression
    Subquery(Box<SelectStatement>),

    /// Parenthesized expression list, only legal immediately before `IN`
    Tuple(Vec<Expr>),
}

impl Expr {
    /// Whether the node's top constructor is boolean-shaped. Used to tell a
    /// bracketed filter step from an index step.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Expr::Or(_, _)
                | Expr::And(_, _)
                | Expr::Not(_)
                | Expr::IsNull { .. }
                | Expr::Between { .. }
                | Expr::Comparison { .. }
                | Expr::InList { .. }
                | Expr::InSubquery { .. }
                | Expr::Exists(_)
                | Expr::IsOfType { .. }
                | Expr::Literal(Value::Bool(_))
        )
    }
}

/// One navigation step of a path expression.
///
/// Steps chain left to right without bound; each step's produced type is
/// opaque to the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathStep {
    /// `.name` - select one field of a record or map
    MapField(String),

    /// `.keys(p?)` / `.values(p?)` - select entries matching a predicate
    MapFilter {
        kind: MapFilterKind,
        predicate: Option<Box<Expr>>,
    },

    /// `[i]` - select one array element
    ArrayIndex(Box<Expr>),

    /// `[low:high]` - select a range of array elements; either bound may be
    /// omitted, meaning "from the start" / "to the end"
    ArraySlice {
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
    },

    /// `[]` / `[pred]` - select array elements matching a predicate
    ArrayFilter(Option<Box<Expr>>),
}

/// Which side of a map entry a map filter step selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapFilterKind {
    Keys,
    Values,
}

/// One type alternative of an `IS OF TYPE` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    /// ONLY: match the exact type, not its subtypes
    pub only: bool,
    pub type_def: TypeDef,
}

/// Datetime component selected by `EXTRACT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
    Week,
}
