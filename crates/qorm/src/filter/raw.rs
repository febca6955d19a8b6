use crate::value::Value;

/// An opaque SQL condition with positional arguments.
///
/// The text is emitted verbatim: nothing inside it is quoted or validated.
/// Identifiers in a raw filter are the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFilter {
    sql: String,
    args: Vec<Value>,
}

impl RawFilter {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}
