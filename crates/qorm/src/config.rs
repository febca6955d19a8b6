//! Connection configuration.
//!
//! Logical database names map to a driver plus connection details, read from
//! TOML:
//!
//! ```toml
//! [databases.main]
//! driver = "pgsql"
//! dsn = "host=localhost dbname=app"
//! username = "${DB_USER}"
//! password = "${DB_PASSWORD}"
//!
//! [databases.main.attributes]
//! application_name = "api"
//!
//! [databases.reports]
//! driver = "mysql"
//! dsn = "mysql://reports.internal/reports"
//! ```
//!
//! `${VAR}` references in `dsn`, `username`, and `password` are expanded from
//! the environment at load time.

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// All configured databases, keyed by logical name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrmConfig {
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseConfig>,
}

/// One logical database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Driver name; selects the SQL dialect (`pgsql`, `mysql`, `sqlite`, ...).
    pub driver: String,
    pub dsn: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl OrmConfig {
    /// Parse, expand `${VAR}` references from the process environment, and
    /// validate.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        Self::from_toml_str_with(raw, |key| std::env::var(key).ok())
    }

    /// Like [`OrmConfig::from_toml_str`] with a custom variable lookup.
    pub fn from_toml_str_with(
        raw: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> OrmResult<Self> {
        let mut config: OrmConfig = toml::from_str(raw)
            .map_err(|e| OrmError::config(format!("failed to parse config: {e}")))?;
        config.expand_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrmError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            OrmError::Config(msg) => OrmError::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Check that every entry has a driver and a dsn.
    pub fn validate(&self) -> OrmResult<()> {
        for (name, db) in &self.databases {
            if name.trim().is_empty() {
                return Err(OrmError::config("database names must not be empty"));
            }
            if db.driver.trim().is_empty() {
                return Err(OrmError::config(format!(
                    "databases.{name}.driver must not be empty"
                )));
            }
            if db.dsn.trim().is_empty() {
                return Err(OrmError::config(format!(
                    "databases.{name}.dsn must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Look up a database by logical name.
    pub fn database(&self, name: &str) -> OrmResult<&DatabaseConfig> {
        self.databases
            .get(name)
            .ok_or_else(|| OrmError::config(format!("unknown database '{name}'")))
    }

    /// Add or replace an entry.
    pub fn with_database(mut self, name: impl Into<String>, db: DatabaseConfig) -> Self {
        self.databases.insert(name.into(), db);
        self
    }

    fn expand_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> OrmResult<()> {
        for db in self.databases.values_mut() {
            db.dsn = expand_env_vars(&db.dsn, lookup)?;
            if let Some(user) = db.username.as_mut() {
                *user = expand_env_vars(user, lookup)?;
            }
            if let Some(password) = db.password.as_mut() {
                *password = expand_env_vars(password, lookup)?;
            }
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn new(driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            dsn: dsn.into(),
            username: None,
            password: None,
            attributes: BTreeMap::new(),
        }
    }

    /// A `tokio_postgres::Config` from the dsn, with `username` / `password`
    /// applied over it and `application_name` taken from the attributes.
    pub fn pg_config(&self) -> OrmResult<tokio_postgres::Config> {
        let mut config: tokio_postgres::Config = self
            .dsn
            .parse()
            .map_err(|e| OrmError::config(format!("invalid postgres dsn: {e}")))?;
        if let Some(user) = &self.username {
            config.user(user);
        }
        if let Some(password) = &self.password {
            config.password(password);
        }
        if let Some(app) = self.attributes.get("application_name") {
            config.application_name(app);
        }
        Ok(config)
    }
}

fn expand_env_vars(input: &str, lookup: &impl Fn(&str) -> Option<String>) -> OrmResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(OrmError::config(format!(
                    "unterminated env var reference: ${{{key}"
                )));
            }
            if key.is_empty() {
                return Err(OrmError::config("invalid env var reference: ${}"));
            }

            let v = lookup(&key).ok_or_else(|| {
                OrmError::config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(key: &str) -> Option<String> {
        match key {
            "DB_USER" => Some("app".to_string()),
            "DB_PASSWORD" => Some("s3cret".to_string()),
            _ => None,
        }
    }

    const SAMPLE: &str = r#"
[databases.main]
driver = "pgsql"
dsn = "host=localhost dbname=app"
username = "${DB_USER}"
password = "${DB_PASSWORD}"

[databases.main.attributes]
application_name = "api"

[databases.reports]
driver = "mysql"
dsn = "mysql://reports.internal/reports"
"#;

    #[test]
    fn parses_and_expands() {
        let config = OrmConfig::from_toml_str_with(SAMPLE, env).unwrap();
        let main = config.database("main").unwrap();
        assert_eq!(main.driver, "pgsql");
        assert_eq!(main.username.as_deref(), Some("app"));
        assert_eq!(main.password.as_deref(), Some("s3cret"));
        assert_eq!(main.attributes["application_name"], "api");
        assert_eq!(config.database("reports").unwrap().driver, "mysql");
    }

    #[test]
    fn unknown_database_is_config_error() {
        let config = OrmConfig::from_toml_str_with(SAMPLE, env).unwrap();
        assert!(matches!(config.database("nope"), Err(OrmError::Config(_))));
    }

    #[test]
    fn missing_env_var_fails() {
        let raw = "[databases.a]\ndriver = \"pgsql\"\ndsn = \"${NOPE}\"\n";
        let err = OrmConfig::from_toml_str_with(raw, env).unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn unterminated_reference_fails() {
        assert!(expand_env_vars("${DB_USER", &env).is_err());
        assert!(expand_env_vars("${}", &env).is_err());
        assert_eq!(expand_env_vars("plain $x", &env).unwrap(), "plain $x");
    }

    #[test]
    fn empty_driver_fails_validation() {
        let raw = "[databases.a]\ndriver = \"\"\ndsn = \"x\"\n";
        assert!(OrmConfig::from_toml_str_with(raw, env).is_err());
    }

    #[test]
    fn pg_config_applies_credentials() {
        let config = OrmConfig::from_toml_str_with(SAMPLE, env).unwrap();
        let pg = config.database("main").unwrap().pg_config().unwrap();
        assert_eq!(pg.get_user(), Some("app"));
        assert_eq!(pg.get_password(), Some(&b"s3cret"[..]));
        assert_eq!(pg.get_dbname(), Some("app"));
        assert_eq!(pg.get_application_name(), Some("api"));
    }
}
