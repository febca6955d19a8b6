//! SQL dialects.
//!
//! Everything that differs between databases sits behind [`Dialect`]:
//! identifier quoting, LIMIT/OFFSET syntax, RETURNING support, and
//! case-insensitive LIKE. The renderer and statement builders only ever talk to
//! the trait; [`dialect_for`] is the one place a driver name is inspected.

mod common;
mod mysql;
mod postgres;

pub use common::CommonDialect;
pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;

use crate::clause::LimitOffset;
use crate::error::OrmResult;
use crate::ident;
use crate::segment::QuerySegment;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Database-specific SQL syntax.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Short dialect name, for logs and cache keys.
    fn name(&self) -> &'static str;

    /// Character wrapped around each identifier part.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quote a (possibly dotted) identifier. `*` parts are left bare.
    fn quote_identifier(&self, name: &str) -> OrmResult<String> {
        ident::quote_with(name, self.quote_char())
    }

    /// Render a LIMIT/OFFSET clause. The default binds both as parameters.
    fn limit_offset(&self, lo: &LimitOffset) -> OrmResult<QuerySegment> {
        let mut seg = QuerySegment::raw("LIMIT").append(QuerySegment::bind(lo.get_limit()));
        if let Some(offset) = lo.get_offset() {
            seg = seg
                .append_raw("OFFSET")
                .append(QuerySegment::bind(offset));
        }
        Ok(seg)
    }

    /// Whether `INSERT ... RETURNING col` is understood.
    fn supports_returning(&self) -> bool {
        false
    }

    /// Case-insensitive LIKE against an already-quoted column.
    fn case_insensitive_like(&self, quoted_column: &str, pattern: Value) -> QuerySegment {
        QuerySegment::new(
            format!("lower({quoted_column}) LIKE lower(?)"),
            vec![pattern],
        )
    }
}

/// Normalize a driver name for lookup (`" PgSQL "` -> `"pgsql"`).
pub fn normalize_driver(driver: &str) -> String {
    driver.trim().to_ascii_lowercase()
}

/// Resolve a driver name to its dialect. Unknown drivers get [`CommonDialect`].
pub fn dialect_for(driver: &str) -> Arc<dyn Dialect> {
    match normalize_driver(driver).as_str() {
        "pgsql" | "postgres" | "postgresql" | "pg" => Arc::new(PostgresDialect),
        "mysql" | "mariadb" => Arc::new(MysqlDialect),
        _ => Arc::new(CommonDialect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_names_resolve() {
        assert_eq!(dialect_for("pgsql").name(), "postgres");
        assert_eq!(dialect_for(" PostgreSQL ").name(), "postgres");
        assert_eq!(dialect_for("MySQL").name(), "mysql");
        assert_eq!(dialect_for("sqlite").name(), "common");
        assert_eq!(dialect_for("oracle").name(), "common");
    }

    #[test]
    fn common_limit_offset_binds_parameters() {
        let lo = LimitOffset::new(123, Some(321)).unwrap();
        let seg = CommonDialect.limit_offset(&lo).unwrap();
        assert_eq!(seg.sql(), "LIMIT ? OFFSET ?");
        assert_eq!(seg.args(), &[Value::Int(123), Value::Int(321)]);

        let seg = CommonDialect.limit_offset(&LimitOffset::limit(5).unwrap()).unwrap();
        assert_eq!(seg.sql(), "LIMIT ?");
        assert_eq!(seg.args(), &[Value::Int(5)]);
    }

    #[test]
    fn mysql_limit_offset_inlines_literals() {
        let lo = LimitOffset::new(123, Some(321)).unwrap();
        let seg = MysqlDialect.limit_offset(&lo).unwrap();
        assert_eq!(seg.sql(), "LIMIT 123 OFFSET 321");
        assert!(seg.args().is_empty());
    }

    #[test]
    fn quoting_per_dialect() {
        assert_eq!(CommonDialect.quote_identifier("a.b").unwrap(), r#""a"."b""#);
        assert_eq!(MysqlDialect.quote_identifier("a.b").unwrap(), "`a`.`b`");
        assert_eq!(PostgresDialect.quote_identifier("*").unwrap(), "*");
    }

    #[test]
    fn case_insensitive_like_per_dialect() {
        let seg = CommonDialect.case_insensitive_like(r#""name""#, Value::from("a%"));
        assert_eq!(seg.sql(), r#"lower("name") LIKE lower(?)"#);
        let seg = PostgresDialect.case_insensitive_like(r#""name""#, Value::from("a%"));
        assert_eq!(seg.sql(), r#""name" ILIKE ?"#);
        assert_eq!(seg.args(), &[Value::from("a%")]);
    }

    #[test]
    fn only_postgres_supports_returning() {
        assert!(PostgresDialect.supports_returning());
        assert!(!CommonDialect.supports_returning());
        assert!(!MysqlDialect.supports_returning());
    }
}
