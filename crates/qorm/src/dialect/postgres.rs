use super::Dialect;
use crate::segment::QuerySegment;
use crate::value::Value;

/// PostgreSQL: common syntax plus `RETURNING` and native `ILIKE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn case_insensitive_like(&self, quoted_column: &str, pattern: Value) -> QuerySegment {
        QuerySegment::new(format!("{quoted_column} ILIKE ?"), vec![pattern])
    }
}
