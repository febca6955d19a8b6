//! The execution boundary.
//!
//! Statements are handed over as SQL text with `?` placeholders plus their
//! arguments in placeholder order. Implementations bind the arguments
//! positionally and return driver errors unchanged; nothing here retries.

use crate::error::OrmResult;
use crate::row::Row;
use crate::segment::QuerySegment;
use crate::value::Value;
use std::future::Future;

/// Something that can run SQL.
///
/// Implemented for `tokio_postgres::Client` and `tokio_postgres::Transaction`
/// (see [`crate::pg`]); wrap any executor in
/// [`TracingExecutor`](crate::TracingExecutor) to log statements.
pub trait Executor: Send + Sync {
    /// Run a statement and return all rows.
    fn query(&self, sql: &str, args: &[Value])
    -> impl Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Run a statement and return the affected row count.
    fn execute(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<u64>> + Send;

    /// Run an INSERT and return the generated key, if any.
    ///
    /// When `returning` names a column the statement is expected to carry a
    /// `RETURNING` clause and is run as a query; the named column (or the
    /// first column) of the first row is returned. Otherwise the statement is
    /// executed and `None` is returned.
    fn insert(
        &self,
        sql: &str,
        args: &[Value],
        returning: Option<&str>,
    ) -> impl Future<Output = OrmResult<Option<Value>>> + Send {
        async move {
            match returning {
                Some(column) => {
                    let rows = self.query(sql, args).await?;
                    Ok(rows
                        .first()
                        .and_then(|row| row.get(column).or_else(|| row.get_index(0)))
                        .cloned())
                }
                None => {
                    self.execute(sql, args).await?;
                    Ok(None)
                }
            }
        }
    }
}

/// Convenience methods taking a [`QuerySegment`] directly.
pub trait ExecutorExt: Executor {
    fn query_segment(
        &self,
        segment: &QuerySegment,
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send {
        self.query(segment.sql(), segment.args())
    }

    fn execute_segment(&self, segment: &QuerySegment) -> impl Future<Output = OrmResult<u64>> + Send {
        self.execute(segment.sql(), segment.args())
    }
}

impl<E: Executor + ?Sized> ExecutorExt for E {}
