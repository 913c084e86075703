//! Table, index, namespace and region DDL coverage.

use kvql::ast::{
    AlterAction, DdlStatement, GeneratedKind, Statement, TtlClause, TtlUnit, TypeDef,
};
use kvql::{parse, Error};

fn ddl(input: &str) -> DdlStatement {
    match parse(input).unwrap() {
        Statement::Ddl(ddl) => ddl,
        other => panic!("expected ddl, got {other:?}"),
    }
}

#[test]
fn test_create_table_all_scalar_types() {
    let DdlStatement::CreateTable { fields, .. } = ddl(
        "CREATE TABLE kitchen_sink ( \
           a INTEGER, b LONG, c FLOAT, d DOUBLE, e NUMBER, f STRING, \
           g BOOLEAN, h BINARY, i BINARY(8), j TIMESTAMP(3), \
           k ENUM(red, green), l JSON, m ANY, \
           PRIMARY KEY (a))",
    ) else {
        panic!("expected create table");
    };
    assert_eq!(fields.len(), 13);
    assert_eq!(fields[8].type_def, TypeDef::Binary { fixed_size: Some(8) });
    assert_eq!(fields[9].type_def, TypeDef::Timestamp { precision: Some(3) });
}

#[test]
fn test_create_table_nested_types_and_default() {
    let DdlStatement::CreateTable { fields, .. } = ddl(
        "CREATE TABLE users ( \
           id INTEGER, \
           address RECORD(street STRING, zip INTEGER NOT NULL), \
           phones ARRAY(STRING), \
           props MAP(ANY), \
           active BOOLEAN DEFAULT true NOT NULL, \
           PRIMARY KEY (id))",
    ) else {
        panic!("expected create table");
    };
    assert!(matches!(fields[1].type_def, TypeDef::Record { .. }));
    assert!(fields[4].default.is_some());
    assert!(fields[4].not_null);
}

#[test]
fn test_create_table_with_table_ttl() {
    let DdlStatement::CreateTable { ttl, .. } = ddl(
        "CREATE TABLE sessions (id LONG, PRIMARY KEY (id)) USING TTL 30 DAYS",
    ) else {
        panic!("expected create table");
    };
    assert!(matches!(
        ttl,
        Some(TtlClause::Duration {
            unit: TtlUnit::Days,
            ..
        })
    ));
}

#[test]
fn test_uuid_and_mr_counter_columns() {
    let DdlStatement::CreateTable { fields, .. } = ddl(
        "CREATE TABLE events ( \
           id STRING AS UUID GENERATED BY DEFAULT, \
           hits LONG AS MR_COUNTER, \
           PRIMARY KEY (id))",
    ) else {
        panic!("expected create table");
    };
    assert!(fields[0].uuid.is_some_and(|u| u.generated));
    assert!(fields[1].mr_counter);
}

#[test]
fn test_identity_by_default_on_null() {
    let DdlStatement::CreateTable { fields, .. } = ddl(
        "CREATE TABLE t ( \
           id LONG GENERATED BY DEFAULT ON NULL AS IDENTITY (CACHE 100 CYCLE), \
           PRIMARY KEY (id))",
    ) else {
        panic!("expected create table");
    };
    let identity = fields[0].identity.as_ref().unwrap();
    assert_eq!(identity.generated, GeneratedKind::ByDefaultOnNull);
    assert_eq!(identity.options.cache, Some(100));
    assert_eq!(identity.options.cycle, Some(true));
}

#[test]
fn test_structural_invariants() {
    // zero columns
    assert!(matches!(
        parse("CREATE TABLE t ()").unwrap_err(),
        Error::Structural { .. }
    ));
    assert!(matches!(
        parse("CREATE TABLE t (PRIMARY KEY (id))").unwrap_err(),
        Error::Structural { .. }
    ));
    // empty shard key
    assert!(matches!(
        parse("CREATE TABLE t (id INTEGER, PRIMARY KEY (SHARD(), id))").unwrap_err(),
        Error::Structural { .. }
    ));
    // duplicate record field
    assert!(matches!(
        parse("CREATE TABLE t (r RECORD(a INTEGER, a STRING), PRIMARY KEY (r))").unwrap_err(),
        Error::Structural { .. }
    ));
    // timestamp precision out of range
    assert!(matches!(
        parse("CREATE TABLE t (ts TIMESTAMP(12), PRIMARY KEY (ts))").unwrap_err(),
        Error::Structural { .. }
    ));
}

#[test]
fn test_alter_table_modify_and_regions() {
    let DdlStatement::AlterTable { actions, .. } =
        ddl("ALTER TABLE users (MODIFY age LONG NOT NULL)")
    else {
        panic!("expected alter table");
    };
    assert!(matches!(actions[0], AlterAction::ModifyField(_)));

    let DdlStatement::AlterTable { actions, .. } = ddl("ALTER TABLE users ADD REGIONS fra, lon")
    else {
        panic!("expected alter table");
    };
    assert_eq!(
        actions,
        vec![AlterAction::AddRegions(vec![
            "fra".to_string(),
            "lon".to_string()
        ])]
    );

    assert!(matches!(
        ddl("ALTER TABLE users UNFREEZE"),
        DdlStatement::AlterTable { .. }
    ));
}

#[test]
fn test_drop_table_if_exists() {
    assert!(matches!(
        ddl("DROP TABLE IF EXISTS ns1:users"),
        DdlStatement::DropTable {
            if_exists: true,
            ..
        }
    ));
}

#[test]
fn test_create_and_drop_index() {
    let DdlStatement::CreateIndex {
        name,
        if_not_exists,
        fields,
        ..
    } = ddl("CREATE INDEX IF NOT EXISTS idx_age ON users (info.age AS LONG)")
    else {
        panic!("expected create index");
    };
    assert_eq!(name, "idx_age");
    assert!(if_not_exists);
    assert_eq!(fields[0].type_def, Some(TypeDef::Long));

    assert!(matches!(
        ddl("DROP INDEX idx_age ON users"),
        DdlStatement::DropIndex { .. }
    ));
}

#[test]
fn test_fulltext_index_with_properties() {
    let DdlStatement::CreateIndex {
        fulltext,
        properties,
        ..
    } = ddl(r#"CREATE FULLTEXT INDEX ft ON posts (body) WITH {"analyzer": "english"}"#)
    else {
        panic!("expected create index");
    };
    assert!(fulltext);
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].0, "analyzer");
}

#[test]
fn test_region_lifecycle() {
    assert!(matches!(
        ddl("CREATE REGION fra"),
        DdlStatement::CreateRegion { .. }
    ));
    assert!(matches!(
        ddl("SET LOCAL REGION fra"),
        DdlStatement::SetLocalRegion { .. }
    ));
    assert!(matches!(
        ddl("DROP REGION fra"),
        DdlStatement::DropRegion { .. }
    ));
}

#[test]
fn test_contextual_keywords_as_names() {
    let DdlStatement::CreateTable { name, fields, .. } = ddl(
        "CREATE TABLE regions (key INTEGER, comment STRING, PRIMARY KEY (key))",
    ) else {
        panic!("expected create table");
    };
    assert_eq!(name.parts, vec!["regions"]);
    assert_eq!(fields[0].name, "key");
    assert_eq!(fields[1].name, "comment");
}

#[test]
fn test_child_table_name() {
    let DdlStatement::CreateTable { name, .. } = ddl(
        "CREATE TABLE users.addresses (seq INTEGER, PRIMARY KEY (seq))",
    ) else {
        panic!("expected create table");
    };
    assert_eq!(name.parts, vec!["users", "addresses"]);
}
