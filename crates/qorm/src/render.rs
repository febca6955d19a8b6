//! Filter rendering.
//!
//! [`render`] walks a [`Filter`] tree and produces a [`QuerySegment`]. Column
//! names go through [`Dialect::quote_identifier`]; values become `?`
//! placeholders with their arguments in left-to-right order.
//!
//! | filter                         | SQL                               | args |
//! |--------------------------------|-----------------------------------|------|
//! | `col op v`                     | `"col" op ?`                      | 1    |
//! | `col = NULL` / `col <> NULL`   | `"col" IS NULL` / `IS NOT NULL`   | 0    |
//! | `col IN [a, b]`                | `"col" IN (?, ?)`                 | N    |
//! | `col BETWEEN [a, b]`           | `"col" BETWEEN ? AND ?`           | 2    |
//! | `col ILIKE p`                  | dialect-specific                  | 1    |
//! | `and(x)`                       | `x`                               |      |
//! | `and(x, y)`                    | `(x AND y)`                       |      |
//! | raw                            | verbatim                          |      |

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::filter::{ColumnFilter, CompositeFilter, Filter, Operand, Operator};
use crate::segment::QuerySegment;
use crate::value::Value;

/// Render `filter` against `dialect`.
pub fn render(filter: &Filter, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
    match filter {
        Filter::Column(c) => render_column(c, dialect),
        Filter::Composite(c) => render_composite(c, dialect),
        Filter::Raw(r) => Ok(QuerySegment::new(r.sql(), r.args().to_vec())),
    }
}

fn render_column(filter: &ColumnFilter, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
    let column = dialect.quote_identifier(filter.column())?;
    let op = filter.op();

    match (op, filter.operand()) {
        (Operator::IsNull, _) | (Operator::Eq, Operand::Scalar(Value::Null)) => {
            Ok(QuerySegment::raw(format!("{column} IS NULL")))
        }
        (Operator::IsNotNull, _) | (Operator::Ne, Operand::Scalar(Value::Null)) => {
            Ok(QuerySegment::raw(format!("{column} IS NOT NULL")))
        }
        (Operator::ILike, Operand::Scalar(pattern)) => {
            Ok(dialect.case_insensitive_like(&column, pattern.clone()))
        }
        (Operator::In | Operator::NotIn, Operand::List(values)) if !values.is_empty() => {
            let placeholders = vec!["?"; values.len()].join(", ");
            Ok(QuerySegment::new(
                format!("{column} {op} ({placeholders})"),
                values.clone(),
            ))
        }
        (Operator::Between, Operand::List(values)) if values.len() == 2 => Ok(QuerySegment::new(
            format!("{column} BETWEEN ? AND ?"),
            values.clone(),
        )),
        (
            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte
            | Operator::Like
            | Operator::NotLike,
            Operand::Scalar(value),
        ) => Ok(QuerySegment::new(
            format!("{column} {op} ?"),
            vec![value.clone()],
        )),
        (op, operand) => Err(OrmError::invalid_filter(format!(
            "cannot render '{}' {op} with {}",
            filter.column(),
            operand.describe()
        ))),
    }
}

fn render_composite(filter: &CompositeFilter, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
    match filter.children() {
        [] => Err(OrmError::invalid_filter(format!(
            "cannot render an empty {} filter",
            filter.junction()
        ))),
        [only] => render(only, dialect),
        children => {
            let parts = children
                .iter()
                .map(|child| render(child, dialect))
                .collect::<OrmResult<Vec<_>>>()?;
            let separator = QuerySegment::raw(filter.junction().as_str());
            Ok(QuerySegment::implode(&separator, parts).embrace())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{CommonDialect, MysqlDialect, PostgresDialect};
    use crate::filter::{and, between, col, eq, in_list, or, raw, unary};

    fn sql(f: &Filter) -> (String, Vec<Value>) {
        render(f, &CommonDialect).unwrap().into_parts()
    }

    #[test]
    fn scalar_comparison() {
        let (s, args) = sql(&col("age", ">=", 18).unwrap());
        assert_eq!(s, r#""age" >= ?"#);
        assert_eq!(args, vec![Value::Int(18)]);
    }

    #[test]
    fn not_equal_renders_standard_token() {
        let (s, _) = sql(&col("a", "!=", 1).unwrap());
        assert_eq!(s, r#""a" <> ?"#);
    }

    #[test]
    fn equality_with_null_is_rewritten() {
        let (s, args) = sql(&col("test", "=", Value::Null).unwrap());
        assert_eq!(s, r#""test" IS NULL"#);
        assert!(args.is_empty());

        let (s, args) = sql(&col("test", "!=", None::<i32>).unwrap());
        assert_eq!(s, r#""test" IS NOT NULL"#);
        assert!(args.is_empty());
    }

    #[test]
    fn null_checks() {
        assert_eq!(sql(&unary("a", "null").unwrap()).0, r#""a" IS NULL"#);
        assert_eq!(sql(&unary("a", "not null").unwrap()).0, r#""a" IS NOT NULL"#);
    }

    #[test]
    fn in_and_not_in() {
        let (s, args) = sql(&in_list("id", [1, 2, 3]).unwrap());
        assert_eq!(s, r#""id" IN (?, ?, ?)"#);
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let (s, _) = sql(&col("id", "not in", vec!["x"]).unwrap());
        assert_eq!(s, r#""id" NOT IN (?)"#);
    }

    #[test]
    fn between_keeps_order() {
        let (s, args) = sql(&between("zz", 1, 2));
        assert_eq!(s, r#""zz" BETWEEN ? AND ?"#);
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn ilike_follows_dialect() {
        let f = col("name", "ilike", "jo%").unwrap();
        assert_eq!(
            render(&f, &CommonDialect).unwrap().sql(),
            r#"lower("name") LIKE lower(?)"#
        );
        assert_eq!(render(&f, &PostgresDialect).unwrap().sql(), r#""name" ILIKE ?"#);
        assert_eq!(
            render(&f, &MysqlDialect).unwrap().sql(),
            "lower(`name`) LIKE lower(?)"
        );
    }

    #[test]
    fn composite_parenthesizes_multiple_children() {
        let f = and([eq("a", 1), eq("b", 2), eq("c", 3)]);
        let (s, args) = sql(&f);
        assert_eq!(s, r#"("a" = ? AND "b" = ? AND "c" = ?)"#);
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn single_child_composite_renders_bare() {
        assert_eq!(sql(&or([eq("a", 1)])).0, r#""a" = ?"#);
        assert_eq!(sql(&and([or([eq("a", 1)])])).0, r#""a" = ?"#);
    }

    #[test]
    fn nested_composites() {
        let f = or([and([eq("a", 1), eq("b", 2)]), eq("c", 3)]);
        assert_eq!(sql(&f).0, r#"(("a" = ? AND "b" = ?) OR "c" = ?)"#);
    }

    #[test]
    fn empty_composite_fails() {
        let err = render(&and(Vec::<Filter>::new()), &CommonDialect).unwrap_err();
        assert!(err.is_invalid_filter());
        assert!(render(&or([eq("a", 1), and(Vec::<Filter>::new())]), &CommonDialect).is_err());
    }

    #[test]
    fn raw_passes_through() {
        let (s, args) = sql(&raw("max(?) > 0", vec![Value::Int(100)]));
        assert_eq!(s, "max(?) > 0");
        assert_eq!(args, vec![Value::Int(100)]);
    }

    #[test]
    fn column_names_are_quoted_per_dialect() {
        let f = eq("users.name", "x");
        assert_eq!(render(&f, &MysqlDialect).unwrap().sql(), "`users`.`name` = ?");
        assert_eq!(sql(&f).0, r#""users"."name" = ?"#);
    }

    #[test]
    fn bad_column_name_fails_to_render() {
        assert!(render(&eq("", 1), &CommonDialect).is_err());
    }

    #[test]
    fn rendering_is_repeatable() {
        let f = and([eq("a", 1), or([between("b", 1, 2), raw("c", vec![])])]);
        assert_eq!(
            render(&f, &CommonDialect).unwrap(),
            render(&f, &CommonDialect).unwrap()
        );
    }
}
