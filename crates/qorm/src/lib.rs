//! # qorm
//!
//! A query-set ORM that renders parameterized, dialect-correct SQL.
//!
//! ## Features
//!
//! - **Composable filters**: column, raw, and AND/OR nodes, shape-checked when built
//! - **Dialects**: quoting, LIMIT/OFFSET, RETURNING, and ILIKE behind one trait
//! - **Query sets**: immutable, chainable, validated against the model's columns
//! - **Record mapping**: `#[derive(FromRow, Record)]` for table-mapped structs
//! - **Pluggable execution**: anything implementing [`Executor`]; `tokio-postgres` built in
//! - **Statement logging**: wrap an executor in [`TracingExecutor`]
//!
//! ## Query sets
//!
//! ```ignore
//! use qorm::prelude::*;
//!
//! let orm = Orm::new(OrmConfig::load("qorm.toml")?);
//!
//! let recent = orm
//!     .query::<User>()?
//!     .filter(qorm::and!(("status", "=", "active"), ("email", "not null"))?)?
//!     .order_by_desc("created_at")?
//!     .limit(10, None)?;
//!
//! let users: Vec<User> = recent.fetch(&client).await?;
//! ```
//!
//! ## Statement builders
//!
//! ```ignore
//! use qorm::qb::QueryBuilder;
//! use qorm::filter::{and, col, is_not_null};
//!
//! let seg = QueryBuilder::for_driver("mysql").build_select(
//!     "users",
//!     ["id", "name"],
//!     Some(&and([col("age", ">", 18)?, is_not_null("email")])),
//!     None,
//!     None,
//!     false,
//! )?;
//! assert_eq!(
//!     seg.sql(),
//!     "SELECT `id`, `name` FROM `users` WHERE (`age` > ? AND `email` IS NOT NULL)"
//! );
//! ```

pub mod clause;
pub mod config;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod filter;
pub mod ident;
pub mod metadata;
pub mod model;
pub mod monitor;
pub mod orm;
pub mod pg;
pub mod prelude;
pub mod qb;
pub mod query_set;
pub mod render;
pub mod row;
pub mod segment;
pub mod value;

pub use clause::{Aggregate, AggregateFunc, Direction, LimitOffset, OrderBy, OrderTerm, asc, desc};
pub use config::{DatabaseConfig, OrmConfig};
pub use dialect::{CommonDialect, Dialect, MysqlDialect, PostgresDialect, dialect_for};
pub use error::{OrmError, OrmResult};
pub use executor::{Executor, ExecutorExt};
pub use filter::{Filter, IntoFilter};
pub use metadata::{Metadata, MetadataCache, PrimaryKeyDecl, RecordDescriptor};
pub use model::{Model, Record};
pub use monitor::TracingExecutor;
pub use orm::{DialectRegistry, Orm};
pub use qb::{QueryBuilder, SqlQb};
pub use query_set::QuerySet;
pub use row::{FromRow, FromValue, Row};
pub use segment::QuerySegment;
pub use value::Value;

#[cfg(feature = "derive")]
pub use qorm_derive::{FromRow, Record};
