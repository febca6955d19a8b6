//! Trait definitions for statement builders.

use crate::dialect::{CommonDialect, Dialect};
use crate::error::OrmResult;
use crate::segment::QuerySegment;

/// Base trait for all statement builders.
pub trait SqlQb {
    /// Render the statement for `dialect`.
    fn build(&self, dialect: &dyn Dialect) -> OrmResult<QuerySegment>;

    /// Debug helper: the SQL text under the common dialect.
    fn to_sql(&self) -> OrmResult<String> {
        Ok(self.build(&CommonDialect)?.into_parts().0)
    }
}
