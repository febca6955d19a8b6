//! Error types for qorm

use thiserror::Error;

/// Result type alias for qorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for query construction and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// Malformed record declaration (missing table/database, no columns, bad primary key)
    #[error("Model definition error: {0}")]
    ModelDefinition(String),

    /// Malformed filter (unknown operation, wrong value shape, empty composite)
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Malformed statement input (limit/offset, aggregate, empty SET list)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A query-set operation referenced a column the model does not have
    #[error("Unknown column '{column}' on model '{model}'")]
    UnknownColumn { model: String, column: String },

    /// More rows matched than the caller allowed
    #[error("Too many rows: expected at most {expected}, got {got}")]
    TooManyRows { expected: usize, got: usize },

    /// No row matched where one was required
    #[error("No rows: {0}")]
    NoRows(String),

    /// Write-by-key attempted on a model without a primary key
    #[error("Model '{0}' is read-only (no primary key)")]
    ReadOnlyModel(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// PostgreSQL driver error, propagated unchanged
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Error raised by a non-PostgreSQL executor
    #[error("Driver error: {0}")]
    Driver(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a model definition error
    pub fn model_definition(message: impl Into<String>) -> Self {
        Self::ModelDefinition(message.into())
    }

    /// Create an invalid filter error
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter(message.into())
    }

    /// Create an invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Create an unknown column error
    pub fn unknown_column(model: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            model: model.into(),
            column: column.into(),
        }
    }

    /// Create a too-many-rows error
    pub fn too_many_rows(expected: usize, got: usize) -> Self {
        Self::TooManyRows { expected, got }
    }

    /// Create a no-rows error
    pub fn no_rows(message: impl Into<String>) -> Self {
        Self::NoRows(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a model definition error
    pub fn is_model_definition(&self) -> bool {
        matches!(self, Self::ModelDefinition(_))
    }

    /// Check if this is an invalid filter error
    pub fn is_invalid_filter(&self) -> bool {
        matches!(self, Self::InvalidFilter(_))
    }

    /// Check if this is an unknown column error
    pub fn is_unknown_column(&self) -> bool {
        matches!(self, Self::UnknownColumn { .. })
    }

    /// Check if this is a too-many-rows error
    pub fn is_too_many_rows(&self) -> bool {
        matches!(self, Self::TooManyRows { .. })
    }

    /// Check if this is a no-rows error
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_column_message_names_model_and_column() {
        let err = OrmError::unknown_column("User", "nickname");
        assert_eq!(err.to_string(), "Unknown column 'nickname' on model 'User'");
        assert!(err.is_unknown_column());
    }

    #[test]
    fn too_many_rows_message() {
        let err = OrmError::too_many_rows(1, 3);
        assert_eq!(
            err.to_string(),
            "Too many rows: expected at most 1, got 3"
        );
    }
}
