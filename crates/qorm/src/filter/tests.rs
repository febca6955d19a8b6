use super::*;

#[test]
fn and_with_extends_existing_conjunction() {
    let base = and([eq("a", 1), eq("b", 2)]);
    let extended = base.and_with(eq("c", 3));

    let Filter::Composite(c) = &extended else {
        panic!("expected composite, got {extended:?}");
    };
    assert_eq!(c.junction(), Junction::And);
    assert_eq!(c.len(), 3);

    // The original tree is untouched.
    let Filter::Composite(orig) = &base else {
        panic!("expected composite");
    };
    assert_eq!(orig.len(), 2);
}

#[test]
fn and_with_shares_child_nodes() {
    let shared = eq("a", 1);
    let base = and([shared.clone()]);
    let extended = base.and_with(eq("b", 2));

    let (Filter::Composite(c), Filter::Column(a)) = (&extended, &shared) else {
        panic!("unexpected shapes");
    };
    let Filter::Column(first) = &c.children()[0] else {
        panic!("expected column filter");
    };
    assert!(Arc::ptr_eq(first, a));
}

#[test]
fn and_with_wraps_non_conjunctions() {
    let f = or([eq("a", 1), eq("b", 2)]).and_with(eq("c", 3));
    let Filter::Composite(c) = &f else {
        panic!("expected composite");
    };
    assert_eq!(c.junction(), Junction::And);
    assert_eq!(c.len(), 2);
    assert!(matches!(&c.children()[0], Filter::Composite(inner) if inner.junction() == Junction::Or));
}

#[test]
fn and_with_keeps_an_empty_conjunction() {
    let f = and([]).and_with(eq("a", 1));
    let Filter::Composite(c) = &f else {
        panic!("expected composite");
    };
    assert_eq!(c.len(), 2);
    assert!(matches!(&c.children()[0], Filter::Composite(inner) if inner.is_empty()));
    assert!(f.render(&crate::dialect::CommonDialect).is_err());
}

#[test]
fn columns_walks_the_tree() {
    let f = and([
        eq("a", 1),
        or([is_null("b"), raw("c > ?", vec![Value::Int(1)])]),
        between("d", 1, 2),
    ]);
    assert_eq!(f.columns(), vec!["a", "b", "d"]);
}

#[test]
fn and_macro_accepts_tuples_and_filters() {
    let f = crate::and!(("age", ">=", 18), ("email", "not null"), eq("active", true)).unwrap();
    assert_eq!(f.columns(), vec!["age", "email", "active"]);
}

#[test]
fn or_macro_propagates_construction_errors() {
    let err = crate::or!(("age", "between", [1]), eq("a", 1)).unwrap_err();
    assert!(err.is_invalid_filter());
}

#[test]
fn empty_macro_builds_empty_composite() {
    let f = crate::and!().unwrap();
    assert!(matches!(f, Filter::Composite(c) if c.is_empty()));
}

#[test]
fn in_list_rejects_empty() {
    assert!(in_list("id", Vec::<i64>::new()).unwrap_err().is_invalid_filter());
    assert!(in_list("id", [1, 2, 3]).is_ok());
}

#[test]
fn dispatcher_passes_filters_through() {
    let f = eq("a", 1);
    assert_eq!(crate::filter!(f.clone()).unwrap(), f);
}

#[test]
fn dispatcher_single_string_is_raw() {
    let f = crate::filter!("a IS DISTINCT FROM b").unwrap();
    assert_eq!(f, raw_sql("a IS DISTINCT FROM b"));
}

#[test]
fn dispatcher_single_list_is_column_filter() {
    let f = crate::filter!(vec![Value::from("age"), Value::from(">"), Value::Int(18)]).unwrap();
    assert_eq!(f, col("age", ">", 18).unwrap());

    let g = crate::filter!(vec!["email", "not null"]).unwrap();
    assert_eq!(g, is_not_null("email"));
}

#[test]
fn dispatcher_two_strings_is_unary_column_filter() {
    assert_eq!(crate::filter!("email", "is null").unwrap(), is_null("email"));
}

#[test]
fn dispatcher_string_and_list_is_raw_with_args() {
    let f = crate::filter!("score > ? AND score < ?", vec![1, 9]).unwrap();
    assert_eq!(f, raw("score > ? AND score < ?", vec![Value::Int(1), Value::Int(9)]));
}

#[test]
fn dispatcher_three_values_is_column_filter() {
    assert_eq!(crate::filter!("name", "like", "a%").unwrap(), col("name", "LIKE", "a%").unwrap());
    assert_eq!(crate::filter!("id", "in", vec![1, 2]).unwrap(), in_list("id", [1, 2]).unwrap());
    assert_eq!(crate::filter!("n", "=", 5).unwrap(), eq("n", 5));
}

#[test]
fn dispatcher_rejects_other_shapes() {
    assert!(crate::filter!(5).unwrap_err().is_invalid_filter());
    assert!(crate::filter!(eq("a", 1), "x").unwrap_err().is_invalid_filter());
    assert!(crate::filter!("a", "=", 1, 2).unwrap_err().is_invalid_filter());
    assert!(crate::filter!("a", "=", eq("b", 1)).unwrap_err().is_invalid_filter());
    assert!(crate::filter!(vec![1, 2]).unwrap_err().is_invalid_filter());
}
