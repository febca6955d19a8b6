use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};

/// Primary-key declaration as written on a record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKeyDecl {
    /// No primary key: the model is read-only.
    #[default]
    None,
    Single(String),
    Composite(Vec<String>),
}

impl PrimaryKeyDecl {
    /// The declared key columns, in order.
    pub fn columns(&self) -> Vec<String> {
        match self {
            PrimaryKeyDecl::None => Vec::new(),
            PrimaryKeyDecl::Single(c) => vec![c.clone()],
            PrimaryKeyDecl::Composite(cs) => cs.clone(),
        }
    }

    /// Interpret a JSON declaration: `null`, a string, or an array of strings.
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        use serde_json::Value as J;
        match value {
            J::Null => Ok(PrimaryKeyDecl::None),
            J::String(s) => Ok(PrimaryKeyDecl::Single(s.clone())),
            J::Array(items) => items
                .iter()
                .map(|item| match item {
                    J::String(s) => Ok(s.clone()),
                    other => Err(OrmError::model_definition(format!(
                        "primary key entries must be strings, got {other}"
                    ))),
                })
                .collect::<OrmResult<Vec<_>>>()
                .map(PrimaryKeyDecl::Composite),
            other => Err(OrmError::model_definition(format!(
                "primary key must be absent, a string, or a list of strings, got {other}"
            ))),
        }
    }
}

impl From<&str> for PrimaryKeyDecl {
    fn from(s: &str) -> Self {
        PrimaryKeyDecl::Single(s.to_string())
    }
}

impl From<Vec<&str>> for PrimaryKeyDecl {
    fn from(cs: Vec<&str>) -> Self {
        PrimaryKeyDecl::Composite(cs.into_iter().map(str::to_string).collect())
    }
}

/// What a record type declares about itself: the input to
/// [`Metadata::build`](super::Metadata::build).
///
/// `#[derive(Record)]` produces one of these; it can also be built by hand or
/// read from JSON with [`RecordDescriptor::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub type_name: String,
    pub table: Option<String>,
    pub database: Option<String>,
    pub primary_key: PrimaryKeyDecl,
    pub fields: Vec<String>,
}

impl RecordDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn primary_key(mut self, pk: impl Into<PrimaryKeyDecl>) -> Self {
        self.primary_key = pk.into();
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Read a descriptor from a JSON object with optional `table`,
    /// `database`, `primary_key`, and `fields` keys.
    ///
    /// ```ignore
    /// let d = RecordDescriptor::from_json("User", &serde_json::json!({
    ///     "table": "users",
    ///     "database": "main",
    ///     "primary_key": "id",
    ///     "fields": ["id", "name", "email"],
    /// }))?;
    /// ```
    pub fn from_json(type_name: impl Into<String>, value: &serde_json::Value) -> OrmResult<Self> {
        let type_name = type_name.into();
        let obj = value.as_object().ok_or_else(|| {
            OrmError::model_definition(format!("descriptor for '{type_name}' must be an object"))
        })?;

        let string_field = |key: &str| -> OrmResult<Option<String>> {
            match obj.get(key) {
                None | Some(serde_json::Value::Null) => Ok(None),
                Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(OrmError::model_definition(format!(
                    "'{type_name}': {key} must be a string, got {other}"
                ))),
            }
        };

        let table = string_field("table")?;
        let database = string_field("database")?;
        let primary_key = match obj.get("primary_key") {
            Some(v) => PrimaryKeyDecl::from_json(v)?,
            None => PrimaryKeyDecl::None,
        };
        let fields = match obj.get("fields") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        OrmError::model_definition(format!(
                            "'{type_name}': field names must be strings, got {item}"
                        ))
                    })
                })
                .collect::<OrmResult<Vec<_>>>()?,
            Some(other) => {
                return Err(OrmError::model_definition(format!(
                    "'{type_name}': fields must be a list, got {other}"
                )));
            }
        };

        Ok(Self {
            type_name,
            table,
            database,
            primary_key,
            fields,
        })
    }
}
