//! Expression-level coverage through the public parse entry point.

use kvql::ast::{
    ArithOp, CompareOp, Expr, ExtractUnit, MapFilterKind, PathStep, Quantifier, Statement, Value,
};
use kvql::{parse, Error};

/// Parses `SELECT <input> FROM t` and unwraps the single projected
/// expression.
fn expr(input: &str) -> Expr {
    let stmt = parse(&format!("SELECT {input} FROM t")).unwrap();
    match stmt {
        Statement::Query(select) => select.items.into_iter().next().unwrap().expr,
        other => panic!("expected query, got {other:?}"),
    }
}

fn where_expr(input: &str) -> Expr {
    let stmt = parse(&format!("SELECT * FROM t WHERE {input}")).unwrap();
    match stmt {
        Statement::Query(select) => select.r#where.unwrap(),
        other => panic!("expected query, got {other:?}"),
    }
}

#[test]
fn test_or_is_outermost() {
    // a = 1 OR b = 2 AND c = 3  =>  or(cmp, and(cmp, cmp))
    match where_expr("a = 1 OR b = 2 AND c = 3") {
        Expr::Or(left, right) => {
            assert!(matches!(*left, Expr::Comparison { .. }));
            assert!(matches!(*right, Expr::And(_, _)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_concat_binds_looser_than_arithmetic() {
    match expr("a || b + c") {
        Expr::Concat(_, right) => {
            assert!(matches!(
                *right,
                Expr::Arithmetic {
                    op: ArithOp::Add,
                    ..
                }
            ));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_parentheses_reset_precedence_without_a_node() {
    match expr("(1 + 2) * 3") {
        Expr::Multiplicative { left, .. } => {
            assert!(matches!(*left, Expr::Arithmetic { .. }));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_path_steps() {
    match expr("t.address.phones[2].number") {
        Expr::Path { base, steps } => {
            assert_eq!(*base, Expr::ColumnRef("t".into()));
            assert_eq!(steps.len(), 4);
            assert_eq!(steps[0], PathStep::MapField("address".into()));
            assert!(matches!(steps[2], PathStep::ArrayIndex(_)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_array_slice_bounds_optional() {
    match expr("t.a[2:]") {
        Expr::Path { steps, .. } => {
            assert!(matches!(
                steps[1],
                PathStep::ArraySlice {
                    low: Some(_),
                    high: None
                }
            ));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
    match expr("t.a[:5]") {
        Expr::Path { steps, .. } => {
            assert!(matches!(
                steps[1],
                PathStep::ArraySlice {
                    low: None,
                    high: Some(_)
                }
            ));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_map_values_filter() {
    match expr("t.info.values($value > 10)") {
        Expr::Path { steps, .. } => {
            assert!(matches!(
                steps[1],
                PathStep::MapFilter {
                    kind: MapFilterKind::Values,
                    predicate: Some(_)
                }
            ));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_between_requires_both_bounds() {
    assert!(matches!(
        where_expr("age BETWEEN 18 AND 65"),
        Expr::Between { .. }
    ));
    assert!(matches!(
        parse("SELECT * FROM t WHERE age BETWEEN 18").unwrap_err(),
        Error::Syntax { .. }
    ));
}

#[test]
fn test_quantified_comparison_over_path() {
    match where_expr("42 = ANY t.scores[]") {
        Expr::Comparison {
            op, quantifier, ..
        } => {
            assert_eq!(op, CompareOp::Eq);
            assert_eq!(quantifier, Quantifier::Any);
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_in_subquery() {
    match where_expr("id IN (SELECT id FROM banned)") {
        Expr::InSubquery { targets, .. } => assert_eq!(targets.len(), 1),
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_exists_over_path() {
    assert!(matches!(
        where_expr("EXISTS t.info.middle_name"),
        Expr::Exists(_)
    ));
}

#[test]
fn test_case_cast_extract() {
    match expr("CASE WHEN a > 0 THEN 'pos' WHEN a < 0 THEN 'neg' ELSE 'zero' END") {
        Expr::Case {
            when_then,
            else_expr,
        } => {
            assert_eq!(when_then.len(), 2);
            assert!(else_expr.is_some());
        }
        other => panic!("unexpected shape: {other:?}"),
    }
    assert!(matches!(expr("CAST(ts AS STRING)"), Expr::Cast { .. }));
    match expr("EXTRACT(YEAR FROM t.created)") {
        Expr::Extract { unit, .. } => assert_eq!(unit, ExtractUnit::Year),
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_seq_transform() {
    assert!(matches!(
        expr("SEQ_TRANSFORM(t.scores[], $sq1 * 2)"),
        Expr::Transform { .. }
    ));
}

#[test]
fn test_constructors() {
    match expr("[1, 'two', [3]]") {
        Expr::ArrayConstructor(elements) => assert_eq!(elements.len(), 3),
        other => panic!("unexpected shape: {other:?}"),
    }
    match expr("{'k': 1, name: age}") {
        Expr::MapConstructor(entries) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[1].0, Expr::Literal(Value::String("name".into())));
            assert_eq!(entries[1].1, Expr::ColumnRef("age".into()));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
    // keywords in bare key position read as string constants too
    match expr("{default: 1}") {
        Expr::MapConstructor(entries) => {
            assert_eq!(entries[0].0, Expr::Literal(Value::String("default".into())));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_nonreserved_keywords_are_ordinary_names() {
    let stmt = parse("SELECT type, year, comment FROM users").unwrap();
    let Statement::Query(select) = stmt else {
        panic!("expected query");
    };
    assert_eq!(select.items[0].expr, Expr::ColumnRef("type".into()));
    assert_eq!(select.items[1].expr, Expr::ColumnRef("year".into()));
    assert_eq!(select.items[2].expr, Expr::ColumnRef("comment".into()));
}

#[test]
fn test_reserved_keywords_stay_reserved() {
    assert!(matches!(
        parse("SELECT * FROM select").unwrap_err(),
        Error::Syntax { .. }
    ));
}

#[test]
fn test_expression_list_only_legal_before_in() {
    for input in [
        "SELECT * FROM t WHERE (a, b) = 1",
        "SELECT * FROM t WHERE x BETWEEN (1, 2) AND 3",
        "SELECT * FROM t WHERE EXISTS (a, b)",
        "SELECT (a, b).c FROM t",
        "SELECT -(a, b) FROM t",
        "SELECT (a, b) || 'x' FROM t",
    ] {
        assert!(
            matches!(parse(input).unwrap_err(), Error::Structural { .. }),
            "{input:?} should be rejected"
        );
    }
    parse("SELECT * FROM t WHERE (a, b) IN ((1, 2))").unwrap();
}

#[test]
fn test_function_call_and_count_star() {
    match expr("count(*)") {
        Expr::FunctionCall { name, args } => {
            assert_eq!(name, "count");
            assert_eq!(args, vec![Expr::Star]);
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_scalar_subquery() {
    assert!(matches!(
        expr("(SELECT max(age) FROM users)"),
        Expr::Subquery(_)
    ));
}

#[test]
fn test_number_literal_kinds() {
    assert_eq!(expr("7"), Expr::Literal(Value::Int(7)));
    assert!(matches!(expr("1.25"), Expr::Literal(Value::Number(_))));
    assert!(matches!(expr("1e2"), Expr::Literal(Value::Float(_))));
}

#[test]
fn test_syntax_error_reports_found_token() {
    match parse("SELECT * FROM t WHERE age >").unwrap_err() {
        Error::Syntax {
            found, expected, ..
        } => {
            assert_eq!(found, "end of input");
            assert!(!expected.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_no_partial_result_after_error() {
    // the whole batch fails even though the first statement is fine
    assert!(kvql::parse_batch("SELECT * FROM t; SELECT FROM u").is_err());
}
