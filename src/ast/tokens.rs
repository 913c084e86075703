use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lexical token, already classified by the lexer.
///
/// Keywords are matched case-insensitively upstream, so the parser never
/// compares raw text. Double-quoted runs arrive as `Ident` (never as
/// keywords), single-quoted runs as `String`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// Bare or double-quoted identifier
    Ident(String),

    /// Reserved word of the language
    Keyword(Keyword),

    /// Single-quoted string literal
    String(String),

    /// Integer literal within the i64 range
    Integer(i64),

    /// Floating-point literal (exponent form)
    Float(f64),

    /// Exact decimal literal
    Number(Decimal),

    /// External variable reference (`$name`)
    Variable(String),

    /// Query hint (`/*+ ... */`), body only
    Hint(String),

    // Operators
    /// `=`
    Eq,
    /// `!=` or `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `||`
    Concat,

    // Punctuation
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "{}", name),
            Token::Keyword(keyword) => write!(f, "{}", keyword),
            Token::String(s) => write!(f, "'{}'", s),
            Token::Integer(n) => write!(f, "{}", n),
            Token::Float(n) => write!(f, "{}", n),
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(name) => write!(f, "${}", name),
            Token::Hint(body) => write!(f, "/*+ {} */", body),
            Token::Eq => f.write_str("="),
            Token::NotEq => f.write_str("!="),
            Token::Lt => f.write_str("<"),
            Token::LtEq => f.write_str("<="),
            Token::Gt => f.write_str(">"),
            Token::GtEq => f.write_str(">="),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Concat => f.write_str("||"),
            Token::Dot => f.write_str("."),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
            Token::Semicolon => f.write_str(";"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// Reserved words, classified case-insensitively by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyword {
    Account,
    Add,
    Admin,
    All,
    Alter,
    Always,
    And,
    Any,
    AnyAtomic,
    AnyJsonAtomic,
    AnyRecord,
    Array,
    As,
    Asc,
    Between,
    Binary,
    Boolean,
    By,
    Cache,
    Cascade,
    Case,
    Cast,
    Comment,
    Create,
    Cycle,
    Day,
    Days,
    Declare,
    Default,
    Delete,
    Desc,
    Describe,
    Distinct,
    Double,
    Drop,
    Else,
    End,
    Enum,
    Every,
    Exists,
    Extract,
    First,
    Float,
    Freeze,
    From,
    Fulltext,
    Generated,
    Grant,
    Group,
    Hour,
    Hours,
    Identified,
    Identity,
    If,
    In,
    Increment,
    Index,
    Indexes,
    Insert,
    Integer,
    Into,
    Is,
    Json,
    Key,
    Keys,
    Last,
    Limit,
    Local,
    Lock,
    Long,
    Map,
    Maxvalue,
    Merge,
    Microsecond,
    Millisecond,
    Minvalue,
    Minute,
    Modify,
    Month,
    MrCounter,
    Namespace,
    Namespaces,
    Nanosecond,
    No,
    Not,
    Null,
    Nulls,
    Number,
    Of,
    Offset,
    On,
    Only,
    Or,
    Order,
    Patch,
    Primary,
    Put,
    Record,
    Region,
    Regions,
    Remove,
    Returning,
    Revoke,
    Role,
    Roles,
    Second,
    Select,
    SeqTransform,
    Set,
    Shard,
    Show,
    Start,
    String,
    Table,
    Tables,
    Then,
    Timestamp,
    To,
    True,
    False,
    Ttl,
    Type,
    Unfreeze,
    Unlock,
    Unnest,
    Update,
    User,
    Users,
    Using,
    Uuid,
    Values,
    Week,
    When,
    Where,
    With,
    Year,
}

impl Keyword {
    /// Classifies an identifier as a keyword, case-insensitively.
    pub fn from_ident(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_str() {
            "ACCOUNT" => Keyword::Account,
            "ADD" => Keyword::Add,
            "ADMIN" => Keyword::Admin,
            "ALL" => Keyword::All,
            "ALTER" => Keyword::Alter,
            "ALWAYS" => Keyword::Always,
            "AND" => Keyword::And,
            "ANY" => Keyword::Any,
            "ANYATOMIC" => Keyword::AnyAtomic,
            "ANYJSONATOMIC" => Keyword::AnyJsonAtomic,
            "ANYRECORD" => Keyword::AnyRecord,
            "ARRAY" => Keyword::Array,
            "AS" => Keyword::As,
            "ASC" => Keyword::Asc,
            "BETWEEN" => Keyword::Between,
            "BINARY" => Keyword::Binary,
            "BOOLEAN" => Keyword::Boolean,
            "BY" => Keyword::By,
            "CACHE" => Keyword::Cache,
            "CASCADE" => Keyword::Cascade,
            "CASE" => Keyword::Case,
            "CAST" => Keyword::Cast,
            "COMMENT" => Keyword::Comment,
            "CREATE" => Keyword::Create,
            "CYCLE" => Keyword::Cycle,
            "DAY" => Keyword::Day,
            "DAYS" => Keyword::Days,
            "DECLARE" => Keyword::Declare,
            "DEFAULT" => Keyword::Default,
            "DELETE" => Keyword::Delete,
            "DESC" => Keyword::Desc,
            "DESCRIBE" => Keyword::Describe,
            "DISTINCT" => Keyword::Distinct,
            "DOUBLE" => Keyword::Double,
            "DROP" => Keyword::Drop,
            "ELSE" => Keyword::Else,
            "END" => Keyword::End,
            "ENUM" => Keyword::Enum,
            "EVERY" => Keyword::Every,
            "EXISTS" => Keyword::Exists,
            "EXTRACT" => Keyword::Extract,
            "FIRST" => Keyword::First,
            "FLOAT" => Keyword::Float,
            "FREEZE" => Keyword::Freeze,
            "FROM" => Keyword::From,
            "FULLTEXT" => Keyword::Fulltext,
            "GENERATED" => Keyword::Generated,
            "GRANT" => Keyword::Grant,
            "GROUP" => Keyword::Group,
            "HOUR" => Keyword::Hour,
            "HOURS" => Keyword::Hours,
            "IDENTIFIED" => Keyword::Identified,
            "IDENTITY" => Keyword::Identity,
            "IF" => Keyword::If,
            "IN" => Keyword::In,
            "INCREMENT" => Keyword::Increment,
            "INDEX" => Keyword::Index,
            "INDEXES" => Keyword::Indexes,
            "INSERT" => Keyword::Insert,
            "INTEGER" => Keyword::Integer,
            "INTO" => Keyword::Into,
            "IS" => Keyword::Is,
            "JSON" => Keyword::Json,
            "KEY" => Keyword::Key,
            "KEYS" => Keyword::Keys,
            "LAST" => Keyword::Last,
            "LIMIT" => Keyword::Limit,
            "LOCAL" => Keyword::Local,
            "LOCK" => Keyword::Lock,
            "LONG" => Keyword::Long,
            "MAP" => Keyword::Map,
            "MAXVALUE" => Keyword::Maxvalue,
            "MERGE" => Keyword::Merge,
            "MICROSECOND" => Keyword::Microsecond,
            "MILLISECOND" => Keyword::Millisecond,
            "MINVALUE" => Keyword::Minvalue,
            "MINUTE" => Keyword::Minute,
            "MODIFY" => Keyword::Modify,
            "MONTH" => Keyword::Month,
            "MR_COUNTER" => Keyword::MrCounter,
            "NAMESPACE" => Keyword::Namespace,
            "NAMESPACES" => Keyword::Namespaces,
            "NANOSECOND" => Keyword::Nanosecond,
            "NO" => Keyword::No,
            "NOT" => Keyword::Not,
            "NULL" => Keyword::Null,
            "NULLS" => Keyword::Nulls,
            "NUMBER" => Keyword::Number,
            "OF" => Keyword::Of,
            "OFFSET" => Keyword::Offset,
            "ON" => Keyword::On,
            "ONLY" => Keyword::Only,
            "OR" => Keyword::Or,
            "ORDER" => Keyword::Order,
            "PATCH" => Keyword::Patch,
            "PRIMARY" => Keyword::Primary,
            "PUT" => Keyword::Put,
            "RECORD" => Keyword::Record,
            "REGION" => Keyword::Region,
            "REGIONS" => Keyword::Regions,
            "REMOVE" => Keyword::Remove,
            "RETURNING" => Keyword::Returning,
            "REVOKE" => Keyword::Revoke,
            "ROLE" => Keyword::Role,
            "ROLES" => Keyword::Roles,
            "SECOND" => Keyword::Second,
            "SELECT" => Keyword::Select,
            "SEQ_TRANSFORM" => Keyword::SeqTransform,
            "SET" => Keyword::Set,
            "SHARD" => Keyword::Shard,
            "SHOW" => Keyword::Show,
            "START" => Keyword::Start,
            "STRING" => Keyword::String,
            "TABLE" => Keyword::Table,
            "TABLES" => Keyword::Tables,
            "THEN" => Keyword::Then,
            "TIMESTAMP" => Keyword::Timestamp,
            "TO" => Keyword::To,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            "TTL" => Keyword::Ttl,
            "TYPE" => Keyword::Type,
            "UNFREEZE" => Keyword::Unfreeze,
            "UNLOCK" => Keyword::Unlock,
            "UNNEST" => Keyword::Unnest,
            "UPDATE" => Keyword::Update,
            "USER" => Keyword::User,
            "USERS" => Keyword::Users,
            "USING" => Keyword::Using,
            "UUID" => Keyword::Uuid,
            "VALUES" => Keyword::Values,
            "WEEK" => Keyword::Week,
            "WHEN" => Keyword::When,
            "WHERE" => Keyword::Where,
            "WITH" => Keyword::With,
            "YEAR" => Keyword::Year,
            _ => return None,
        })
    }

    /// Whether the word is reserved, i.e. may never be used as a bare
    /// identifier (table, column, role names and the like).
    ///
    /// Most of the catalogue is contextual: words like USERS, REGIONS or
    /// COMMENT only carry meaning right after a specific keyword, and the
    /// parser always checks for them there before reading a name. Those
    /// stay usable as names; double-quoting covers the rest.
    pub fn is_reserved(&self) -> bool {
        !matches!(
            self,
            Keyword::Account
                | Keyword::Admin
                | Keyword::Always
                | Keyword::Cache
                | Keyword::Cascade
                | Keyword::Comment
                | Keyword::Cycle
                | Keyword::Day
                | Keyword::Days
                | Keyword::First
                | Keyword::Freeze
                | Keyword::Hour
                | Keyword::Hours
                | Keyword::Identified
                | Keyword::Identity
                | Keyword::Increment
                | Keyword::Indexes
                | Keyword::Key
                | Keyword::Keys
                | Keyword::Last
                | Keyword::Local
                | Keyword::Lock
                | Keyword::Maxvalue
                | Keyword::Merge
                | Keyword::Microsecond
                | Keyword::Millisecond
                | Keyword::Minute
                | Keyword::Minvalue
                | Keyword::Modify
                | Keyword::Month
                | Keyword::Namespace
                | Keyword::Namespaces
                | Keyword::Nanosecond
                | Keyword::No
                | Keyword::Nulls
                | Keyword::Patch
                | Keyword::Region
                | Keyword::Regions
                | Keyword::Role
                | Keyword::Roles
                | Keyword::Second
                | Keyword::Shard
                | Keyword::Start
                | Keyword::Tables
                | Keyword::Type
                | Keyword::Unfreeze
                | Keyword::Unlock
                | Keyword::User
                | Keyword::Users
                | Keyword::Uuid
                | Keyword::Values
                | Keyword::Week
                | Keyword::Year
        )
    }

    /// Canonical (uppercase) spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Account => "ACCOUNT",
            Keyword::Add => "ADD",
            Keyword::Admin => "ADMIN",
            Keyword::All => "ALL",
            Keyword::Alter => "ALTER",
            Keyword::Always => "ALWAYS",
            Keyword::And => "AND",
            Keyword::Any => "ANY",
            Keyword::AnyAtomic => "ANYATOMIC",
            Keyword::AnyJsonAtomic => "ANYJSONATOMIC",
            Keyword::AnyRecord => "ANYRECORD",
            Keyword::Array => "ARRAY",
            Keyword::As => "AS",
            Keyword::Asc => "ASC",
            Keyword::Between => "BETWEEN",
            Keyword::Binary => "BINARY",
            Keyword::Boolean => "BOOLEAN",
            Keyword::By => "BY",
            Keyword::Cache => "CACHE",
            Keyword::Cascade => "CASCADE",
            Keyword::Case => "CASE",
            Keyword::Cast => "CAST",
            Keyword::Comment => "COMMENT",
            Keyword::Create => "CREATE",
            Keyword::Cycle => "CYCLE",
            Keyword::Day => "DAY",
            Keyword::Days => "DAYS",
            Keyword::Declare => "DECLARE",
            Keyword::Default => "DEFAULT",
            Keyword::Delete => "DELETE",
            Keyword::Desc => "DESC",
            Keyword::Describe => "DESCRIBE",
            Keyword::Distinct => "DISTINCT",
            Keyword::Double => "DOUBLE",
            Keyword::Drop => "DROP",
            Keyword::Else => "ELSE",
            Keyword::End => "END",
            Keyword::Enum => "ENUM",
            Keyword::Every => "EVERY",
            Keyword::Exists => "EXISTS",
            Keyword::Extract => "EXTRACT",
            Keyword::First => "FIRST",
            Keyword::Float => "FLOAT",
            Keyword::Freeze => "FREEZE",
            Keyword::From => "FROM",
            Keyword::Fulltext => "FULLTEXT",
            Keyword::Generated => "GENERATED",
            Keyword::Grant => "GRANT",
            Keyword::Group => "GROUP",
            Keyword::Hour => "HOUR",
            Keyword::Hours => "HOURS",
            Keyword::Identified => "IDENTIFIED",
            Keyword::Identity => "IDENTITY",
            Keyword::If => "IF",
            Keyword::In => "IN",
            Keyword::Increment => "INCREMENT",
            Keyword::Index => "INDEX",
            Keyword::Indexes => "INDEXES",
            Keyword::Insert => "INSERT",
            Keyword::Integer => "INTEGER",
            Keyword::Into => "INTO",
            Keyword::Is => "IS",
            Keyword::Json => "JSON",
            Keyword::Key => "KEY",
            Keyword::Keys => "KEYS",
            Keyword::Last => "LAST",
            Keyword::Limit => "LIMIT",
            Keyword::Local => "LOCAL",
            Keyword::Lock => "LOCK",
            Keyword::Long => "LONG",
            Keyword::Map => "MAP",
            Keyword::Maxvalue => "MAXVALUE",
            Keyword::Merge => "MERGE",
            Keyword::Microsecond => "MICROSECOND",
            Keyword::Millisecond => "MILLISECOND",
            Keyword::Minvalue => "MINVALUE",
            Keyword::Minute => "MINUTE",
            Keyword::Modify => "MODIFY",
            Keyword::Month => "MONTH",
            Keyword::MrCounter => "MR_COUNTER",
            Keyword::Namespace => "NAMESPACE",
            Keyword::Namespaces => "NAMESPACES",
            Keyword::Nanosecond => "NANOSECOND",
            Keyword::No => "NO",
            Keyword::Not => "NOT",
            Keyword::Null => "NULL",
            Keyword::Nulls => "NULLS",
            Keyword::Number => "NUMBER",
            Keyword::Of => "OF",
            Keyword::Offset => "OFFSET",
            Keyword::On => "ON",
            Keyword::Only => "ONLY",
            Keyword::Or => "OR",
            Keyword::Order => "ORDER",
            Keyword::Patch => "PATCH",
            Keyword::Primary => "PRIMARY",
            Keyword::Put => "PUT",
            Keyword::Record => "RECORD",
            Keyword::Region => "REGION",
            Keyword::Regions => "REGIONS",
            Keyword::Remove => "REMOVE",
            Keyword::Returning => "RETURNING",
            Keyword::Revoke => "REVOKE",
            Keyword::Role => "ROLE",
            Keyword::Roles => "ROLES",
            Keyword::Second => "SECOND",
            Keyword::Select => "SELECT",
            Keyword::SeqTransform => "SEQ_TRANSFORM",
            Keyword::Set => "SET",
            Keyword::Shard => "SHARD",
            Keyword::Show => "SHOW",
            Keyword::Start => "START",
            Keyword::String => "STRING",
            Keyword::Table => "TABLE",
            Keyword::Tables => "TABLES",
            Keyword::Then => "THEN",
            Keyword::Timestamp => "TIMESTAMP",
            Keyword::To => "TO",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Ttl => "TTL",
            Keyword::Type => "TYPE",
            Keyword::Unfreeze => "UNFREEZE",
            Keyword::Unlock => "UNLOCK",
            Keyword::Unnest => "UNNEST",
            Keyword::Update => "UPDATE",
            Keyword::User => "USER",
            Keyword::Users => "USERS",
            Keyword::Using => "USING",
            Keyword::Uuid => "UUID",
            Keyword::Values => "VALUES",
            Keyword::Week => "WEEK",
            Keyword::When => "WHEN",
            Keyword::Where => "WHERE",
            Keyword::With => "WITH",
            Keyword::Year => "YEAR",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
