//! Statement logging via `tracing`.
//!
//! [`TracingExecutor`] wraps any [`Executor`] and emits one event per
//! statement on target `qorm.sql`. Failures are logged at WARN and returned
//! unchanged.
//!
//! ```ignore
//! use qorm::TracingExecutor;
//! use tracing::Level;
//!
//! let client = TracingExecutor::new(client).level(Level::INFO).max_sql_length(500);
//! let users = orm.query::<User>()?.fetch(&client).await?;
//! ```

use crate::error::{OrmError, OrmResult};
use crate::executor::Executor;
use crate::row::Row;
use crate::value::Value;
use std::time::{Duration, Instant};
use tracing::Level;

/// Truncate to at most `max_bytes`, backing off to a char boundary.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// The kind of statement, from its first keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default();
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" => StatementKind::Select,
            "INSERT" => StatementKind::Insert,
            "UPDATE" => StatementKind::Update,
            "DELETE" => StatementKind::Delete,
            _ => StatementKind::Other,
        }
    }
}

/// An [`Executor`] that logs every statement it runs.
#[derive(Debug, Clone)]
pub struct TracingExecutor<E> {
    inner: E,
    level: Level,
    max_sql_length: Option<usize>,
}

impl<E> TracingExecutor<E> {
    /// Wrap `inner`, logging at DEBUG with SQL truncated to 200 bytes.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// `rows` is left out of the event when the outcome carries no count.
    fn emit(
        &self,
        sql: &str,
        arg_count: usize,
        elapsed: Duration,
        outcome: Result<Option<u64>, &OrmError>,
    ) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let kind = StatementKind::from_sql(sql);
        let sql = self.truncate_sql(sql);
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        match outcome {
            Ok(rows) => emit_at_level!(
                self.level,
                target: "qorm.sql",
                kind = ?kind,
                arg_count,
                rows,
                elapsed_ms,
                sql = %sql,
            ),
            Err(error) => tracing::warn!(
                target: "qorm.sql",
                kind = ?kind,
                arg_count,
                elapsed_ms,
                sql = %sql,
                error = %error,
                "statement failed"
            ),
        }
    }
}

impl<E: Executor> Executor for TracingExecutor<E> {
    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        let start = Instant::now();
        let result = self.inner.query(sql, args).await;
        self.emit(
            sql,
            args.len(),
            start.elapsed(),
            result.as_ref().map(|rows| Some(rows.len() as u64)),
        );
        result
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        let start = Instant::now();
        let result = self.inner.execute(sql, args).await;
        self.emit(sql, args.len(), start.elapsed(), result.as_ref().map(|n| Some(*n)));
        result
    }

    async fn insert(
        &self,
        sql: &str,
        args: &[Value],
        returning: Option<&str>,
    ) -> OrmResult<Option<Value>> {
        let start = Instant::now();
        let result = self.inner.insert(sql, args, returning).await;
        // inserts report the generated key, not an affected-row count
        self.emit(sql, args.len(), start.elapsed(), result.as_ref().map(|_| None));
        result
    }
}
