//! Property-based tests for filter rendering.

use proptest::prelude::*;
use qorm::dialect::{CommonDialect, MysqlDialect, PostgresDialect};
use qorm::filter::{self, Filter};
use qorm::{Dialect, Value};

fn column() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
        "[ -~]{0,20}".prop_map(Value::Text),
    ]
}

fn scalar_op() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("="),
        Just("<>"),
        Just(">"),
        Just(">="),
        Just("<"),
        Just("<="),
        Just("like"),
        Just("not like"),
        Just("ilike"),
    ]
}

/// A column filter together with the arguments it must render.
fn column_filter() -> impl Strategy<Value = (Filter, Vec<Value>)> {
    prop_oneof![
        (column(), scalar_op(), value()).prop_map(|(c, op, v)| {
            (filter::col(c, op, v.clone()).unwrap(), vec![v])
        }),
        (column(), prop::collection::vec(value(), 1..8)).prop_map(|(c, vs)| {
            (filter::col(c, "in", vs.clone()).unwrap(), vs)
        }),
        (column(), value(), value()).prop_map(|(c, a, b)| {
            (filter::between(c, a.clone(), b.clone()), vec![a, b])
        }),
        column().prop_map(|c| (filter::is_not_null(c), vec![])),
    ]
}

fn dialects() -> Vec<Box<dyn Dialect>> {
    vec![
        Box::new(CommonDialect),
        Box::new(PostgresDialect),
        Box::new(MysqlDialect),
    ]
}

proptest! {
    /// Arguments come back in the order they were supplied.
    #[test]
    fn args_round_trip(filters in prop::collection::vec(column_filter(), 1..6)) {
        let expected: Vec<Value> = filters.iter().flat_map(|(_, args)| args.clone()).collect();
        let tree = filter::and(filters.into_iter().map(|(f, _)| f));

        for dialect in dialects() {
            let seg = tree.render(dialect.as_ref()).unwrap();
            prop_assert_eq!(seg.args(), expected.as_slice());
            prop_assert_eq!(seg.sql().matches('?').count(), expected.len());
        }
    }

    /// Rendering is a pure function of the tree.
    #[test]
    fn render_is_idempotent(filters in prop::collection::vec(column_filter(), 1..6)) {
        let tree = filter::or(filters.into_iter().map(|(f, _)| f));
        for dialect in dialects() {
            let a = tree.render(dialect.as_ref()).unwrap();
            let b = tree.render(dialect.as_ref()).unwrap();
            prop_assert_eq!(a, b);
        }
    }

    /// Equality against NULL never binds a placeholder.
    #[test]
    fn null_equality_has_no_args(c in column(), negate in any::<bool>()) {
        let op = if negate { "!=" } else { "=" };
        let seg = filter::col(c, op, Value::Null).unwrap().render(&CommonDialect).unwrap();
        prop_assert!(seg.args().is_empty());
        prop_assert!(seg.sql().ends_with("NULL"));
    }

    /// Column names always appear quoted.
    #[test]
    fn columns_are_quoted(c in column(), v in value()) {
        let seg = filter::col(c.clone(), "=", v).unwrap().render(&CommonDialect).unwrap();
        let quoted = format!("\"{c}\" = ?");
        prop_assert_eq!(seg.sql(), quoted.as_str());
    }
}
