use crate::ast::expressions::{Expr, Value};
use crate::ast::statements::{QualifiedName, TtlClause};
use crate::ast::types::{IdentityDef, JsonMrCounterPath, TypeDef, UuidDef};
use serde::{Deserialize, Serialize};

/// One field (column) of a table definition.
///
/// Special column kinds - identity, UUID, MR counter - augment the field's
/// base type rather than replacing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub type_def: TypeDef,
    pub default: Option<Expr>,
    pub not_null: bool,
    pub identity: Option<IdentityDef>,
    pub uuid: Option<UuidDef>,
    /// AS MR_COUNTER: multi-region conflict-free counter column
    pub mr_counter: bool,
    /// Counter paths declared inside a JSON column
    pub json_mr_counters: Vec<JsonMrCounterPath>,
    pub comment: Option<String>,
}

impl FieldDef {
    pub fn plain(name: impl Into<String>, type_def: TypeDef) -> Self {
        FieldDef {
            name: name.into(),
            type_def,
            default: None,
            not_null: false,
            identity: None,
            uuid: None,
            mr_counter: false,
            json_mr_counters: Vec::new(),
            comment: None,
        }
    }
}

/// PRIMARY KEY definition; the shard key is a prefix of the key fields
/// used for data placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyDef {
    /// SHARD(...): non-empty when present
    pub shard_key: Option<Vec<String>>,
    /// Remaining key fields, in declaration order
    pub fields: Vec<String>,
}

/// One action of an ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlterAction {
    AddField(FieldDef),
    DropField(String),
    ModifyField(FieldDef),
    Freeze,
    Unfreeze,
    AddRegions(Vec<String>),
    DropRegions(Vec<String>),
}

/// One indexed path, with an optional declared type for JSON paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexField {
    pub path: Expr,
    pub type_def: Option<TypeDef>,
}

/// DDL statements: tables, indexes, namespaces, regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DdlStatement {
    CreateTable {
        name: QualifiedName,
        if_not_exists: bool,
        /// At least one field, enforced at construction
        fields: Vec<FieldDef>,
        primary_key: Option<PrimaryKeyDef>,
        ttl: Option<TtlClause>,
        /// IN REGIONS: multi-region table placement
        regions: Vec<String>,
    },
    AlterTable {
        table: QualifiedName,
        /// At least one action, enforced at construction
        actions: Vec<AlterAction>,
    },
    DropTable {
        name: QualifiedName,
        if_exists: bool,
    },
    CreateIndex {
        name: String,
        table: QualifiedName,
        if_not_exists: bool,
        fields: Vec<IndexField>,
        /// CREATE FULLTEXT INDEX
        fulltext: bool,
        /// Engine-specific property bag of a full-text index
        properties: Vec<(String, Value)>,
    },
    DropIndex {
        name: String,
        table: QualifiedName,
        if_exists: bool,
    },
    CreateNamespace {
        name: String,
        if_not_exists: bool,
    },
    DropNamespace {
        name: String,
        if_exists: bool,
        cascade: bool,
    },
    CreateRegion {
        name: String,
    },
    DropRegion {
        name: String,
    },
    SetLocalRegion {
        name: String,
    },
}

/// Whether a grantee was written as USER or ROLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipalKind {
    User,
    Role,
}

/// The receiving side of a role grant.
///
/// The kind comes from the leading USER/ROLE keyword when one was written;
/// a bare grantee name leaves it unstated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub kind: Option<PrincipalKind>,
    pub name: String,
}

/// What a GRANT or REVOKE statement transfers.
///
/// The three forms are distinct variants and never conflated: role grants,
/// system-wide privilege grants, and privileges scoped to one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GrantTarget {
    Roles {
        roles: Vec<String>,
        grantee: Principal,
    },
    SystemPrivileges {
        privileges: Vec<String>,
        role: String,
    },
    ObjectPrivileges {
        privileges: Vec<String>,
        object: QualifiedName,
        role: String,
    },
}

/// ALTER USER account state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountAction {
    Lock,
    Unlock,
}

/// Target of a DESCRIBE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DescribeTarget {
    Table {
        name: QualifiedName,
        /// Restrict the description to these field paths
        fields: Vec<String>,
    },
    Index {
        name: String,
        table: QualifiedName,
    },
}

/// Target of a SHOW statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShowTarget {
    Tables,
    Table(QualifiedName),
    Indexes { table: QualifiedName },
    Users,
    User(String),
    Roles,
    Role(String),
    Namespaces,
    Regions,
}

/// Administrative statements: users, roles, privileges, inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdminStatement {
    CreateUser {
        name: String,
        password: Option<String>,
        admin: bool,
    },
    AlterUser {
        name: String,
        password: Option<String>,
        account: Option<AccountAction>,
    },
    DropUser {
        name: String,
    },
    CreateRole {
        name: String,
    },
    DropRole {
        name: String,
    },
    Grant(GrantTarget),
    Revoke(GrantTarget),
    Describe {
        as_json: bool,
        target: DescribeTarget,
    },
    Show {
        as_json: bool,
        target: ShowTarget,
    },
}
