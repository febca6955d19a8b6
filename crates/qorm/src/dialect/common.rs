use super::Dialect;

/// ANSI-style SQL: double-quoted identifiers, bound LIMIT/OFFSET, no RETURNING.
///
/// Used for SQLite and any driver without a dedicated dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonDialect;

impl Dialect for CommonDialect {
    fn name(&self) -> &'static str {
        "common"
    }
}
