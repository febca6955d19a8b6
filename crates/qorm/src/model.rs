//! Mapped record types and by-key operations.
//!
//! A [`Record`] declares its table, database, primary key, and columns through
//! a [`RecordDescriptor`], and converts to and from column values. The usual
//! way to implement it is `#[derive(FromRow, Record)]`:
//!
//! ```ignore
//! use qorm::{FromRow, Record};
//!
//! #[derive(Debug, FromRow, Record)]
//! #[orm(table = "users", database = "main")]
//! struct User {
//!     #[orm(id)]
//!     id: Option<i64>,
//!     name: String,
//!     #[orm(column = "email_address")]
//!     email: Option<String>,
//! }
//!
//! let users = orm.model::<User>()?;
//! let id = users.insert(&client, &User { id: None, name: "ada".into(), email: None }).await?;
//! let ada = users.get_by_pk(&client, [id.unwrap_or(qorm::Value::Null)]).await?;
//! ```

use crate::error::{OrmError, OrmResult};
use crate::executor::Executor;
use crate::filter::{self, Filter};
use crate::metadata::{Metadata, RecordDescriptor};
use crate::qb::QueryBuilder;
use crate::query_set::QuerySet;
use crate::row::FromRow;
use crate::value::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A type mapped to one table.
pub trait Record: FromRow + Send + Sync + 'static {
    /// The declaration [`Metadata`] is built from.
    fn descriptor() -> RecordDescriptor;

    /// Column values, parallel to `descriptor().fields`.
    fn to_values(&self) -> Vec<Value>;
}

/// AND of `pk_i = value_i` in key order.
pub(crate) fn primary_key_filter(meta: &Metadata, values: Vec<Value>) -> OrmResult<Filter> {
    let pk = meta.require_primary_key()?;
    if pk.len() != values.len() {
        return Err(OrmError::invalid_query(format!(
            "'{}' has {} primary key column(s), got {} value(s)",
            meta.type_name(),
            pk.len(),
            values.len()
        )));
    }
    Ok(filter::and(
        pk.iter().zip(values).map(|(column, value)| filter::eq(column.as_str(), value)),
    ))
}

/// Table-level operations for one record type: by-key reads and writes, and
/// the entry point for [`QuerySet`]s.
pub struct Model<T> {
    meta: Arc<Metadata>,
    builder: QueryBuilder,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Model<T> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            builder: self.builder.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("table", &self.meta.table())
            .field("dialect", &self.builder.dialect().name())
            .finish()
    }
}

impl<T: Record> Model<T> {
    pub fn new(meta: Arc<Metadata>, builder: QueryBuilder) -> Self {
        Self {
            meta,
            builder,
            _marker: PhantomData,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// An unfiltered query set over this model.
    pub fn query(&self) -> QuerySet<T> {
        QuerySet::new(self.meta.clone(), self.builder.clone())
    }

    fn values_of(&self, record: &T) -> OrmResult<Vec<Value>> {
        let values = record.to_values();
        if values.len() != self.meta.columns().len() {
            return Err(OrmError::invalid_query(format!(
                "'{}' produced {} value(s) for {} column(s)",
                self.meta.type_name(),
                values.len(),
                self.meta.columns().len()
            )));
        }
        Ok(values)
    }

    fn key_of(&self, values: &[Value]) -> OrmResult<Vec<Value>> {
        self.meta
            .require_primary_key()?
            .iter()
            .map(|pk| {
                self.meta
                    .column_index(pk)
                    .and_then(|i| values.get(i).cloned())
                    .ok_or_else(|| OrmError::unknown_column(self.meta.type_name(), pk))
            })
            .collect()
    }

    /// Insert `record` and return the generated key where the dialect can
    /// report it.
    ///
    /// Primary-key columns holding NULL are left out of the column list so the
    /// database can fill them. On dialects with RETURNING and a single-column
    /// key, the key is returned; otherwise `None`.
    pub async fn insert(&self, ex: &impl Executor, record: &T) -> OrmResult<Option<Value>> {
        let pk = self.meta.require_primary_key()?;
        let values = self.values_of(record)?;

        let (columns, values): (Vec<&str>, Vec<Value>) = self
            .meta
            .columns()
            .iter()
            .zip(values)
            .filter(|(column, value)| !(value.is_null() && pk.contains(*column)))
            .map(|(column, value)| (column.as_str(), value))
            .unzip();

        let returning = match pk {
            [single] if self.builder.dialect().supports_returning() => Some(single.as_str()),
            _ => None,
        };
        let seg = self
            .builder
            .build_insert(self.meta.table(), columns, values, returning)?;
        ex.insert(seg.sql(), seg.args(), returning).await
    }

    /// UPDATE every non-key column of the row identified by `record`'s key.
    pub async fn update_record(&self, ex: &impl Executor, record: &T) -> OrmResult<u64> {
        let values = self.values_of(record)?;
        let key = self.key_of(&values)?;
        let filter = primary_key_filter(&self.meta, key)?;

        let updates: Vec<Value> = self
            .meta
            .non_primary_key()
            .iter()
            .filter_map(|c| self.meta.column_index(c).and_then(|i| values.get(i).cloned()))
            .collect();
        let seg = self.builder.build_update(
            self.meta.table(),
            self.meta.non_primary_key(),
            updates,
            Some(&filter),
        )?;
        ex.execute(seg.sql(), seg.args()).await
    }

    /// DELETE the row identified by `record`'s key.
    pub async fn delete_record(&self, ex: &impl Executor, record: &T) -> OrmResult<u64> {
        let values = self.values_of(record)?;
        let key = self.key_of(&values)?;
        let filter = primary_key_filter(&self.meta, key)?;
        let seg = self.builder.build_delete(self.meta.table(), Some(&filter))?;
        ex.execute(seg.sql(), seg.args()).await
    }

    /// Fetch the row with primary key `key` (values in key order).
    pub async fn get_by_pk<V: Into<Value>>(
        &self,
        ex: &impl Executor,
        key: impl IntoIterator<Item = V>,
    ) -> OrmResult<Option<T>> {
        self.query().filter_pk(key)?.single(ex, true).await
    }
}
