use crate::ast::expressions::Expr;
use serde::{Deserialize, Serialize};

/// A declared type shape.
///
/// Recursive for the structured kinds; the "any" family carries no payload.
/// Record field names are unique within a record, enforced at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDef {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    Float,
    Double,
    /// Arbitrary-precision decimal
    Number,
    String,
    Boolean,
    /// BINARY or BINARY(n) for the fixed-size form
    Binary { fixed_size: Option<u64> },
    /// TIMESTAMP(p), fractional-second precision 0..=9
    Timestamp { precision: Option<u32> },
    /// ENUM(a, b, c)
    Enum { values: Vec<String> },
    /// RECORD(name type, ...)
    Record { fields: Vec<RecordField> },
    /// ARRAY(element)
    Array(Box<TypeDef>),
    /// MAP(value)
    Map(Box<TypeDef>),
    /// Schemaless JSON data
    Json,
    Any,
    AnyAtomic,
    AnyJsonAtomic,
    AnyRecord,
}

/// One field of a RECORD type, with its per-field constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    pub type_def: TypeDef,
    pub default: Option<Expr>,
    pub not_null: bool,
}

/// How an identity column generates its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratedKind {
    Always,
    ByDefault,
    ByDefaultOnNull,
}

/// Sequence options of an identity column. Absent options keep the
/// engine defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequenceOptions {
    pub start: Option<i64>,
    pub increment: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub cache: Option<i64>,
    pub cycle: Option<bool>,
}

/// GENERATED ... AS IDENTITY column augmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityDef {
    pub generated: GeneratedKind,
    pub options: SequenceOptions,
}

/// STRING AS UUID column augmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidDef {
    /// GENERATED BY DEFAULT: the store assigns a value when none is given
    pub generated: bool,
}

/// Base type of an MR counter declared inside a JSON column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MrCounterKind {
    Integer,
    Long,
    Number,
}

/// One counter path of a JSON column
/// (`info JSON (count AS INTEGER MR_COUNTER)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonMrCounterPath {
    /// Dotted path inside the JSON document
    pub path: Vec<String>,
    pub kind: MrCounterKind,
}
