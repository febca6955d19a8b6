use super::Dialect;
use crate::clause::LimitOffset;
use crate::error::{OrmError, OrmResult};
use crate::segment::QuerySegment;

/// MySQL / MariaDB: backtick identifiers and literal LIMIT/OFFSET.
///
/// Prepared statements on these servers do not reliably accept placeholders in
/// LIMIT, so the integers are written into the SQL text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn limit_offset(&self, lo: &LimitOffset) -> OrmResult<QuerySegment> {
        let limit = non_negative("LIMIT", lo.get_limit())?;
        let sql = match lo.get_offset() {
            Some(offset) => format!("LIMIT {limit} OFFSET {}", non_negative("OFFSET", offset)?),
            None => format!("LIMIT {limit}"),
        };
        Ok(QuerySegment::raw(sql))
    }
}

fn non_negative(what: &str, n: i64) -> OrmResult<u64> {
    u64::try_from(n)
        .map_err(|_| OrmError::invalid_query(format!("{what} must be non-negative, got {n}")))
}
