//! Common imports.
//!
//! ```ignore
//! use qorm::prelude::*;
//! ```

pub use crate::clause::{Direction, asc, desc};
pub use crate::filter::{Filter, IntoFilter, and, col, eq, or, raw};
pub use crate::{
    Executor, FromRow, Model, Orm, OrmConfig, OrmError, OrmResult, QuerySet, Record, Row,
    TracingExecutor, Value,
};
