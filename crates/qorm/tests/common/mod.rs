#![allow(dead_code)]

use qorm::{Executor, FromRow, OrmConfig, OrmResult, Record, Row, Value};
use qorm::config::DatabaseConfig;
use std::collections::VecDeque;
use std::sync::Mutex;

/// In-memory executor: records every statement and replays queued result sets.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    statements: Mutex<Vec<(String, Vec<Value>)>>,
    responses: Mutex<VecDeque<Vec<Row>>>,
    affected: u64,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next `query`.
    pub fn respond(self, rows: Vec<Row>) -> Self {
        self.responses.lock().unwrap().push_back(rows);
        self
    }

    pub fn affected(mut self, n: u64) -> Self {
        self.affected = n;
        self
    }

    pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.statements.lock().unwrap().clone()
    }

    pub fn last(&self) -> (String, Vec<Value>) {
        self.statements
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no statement was run")
    }

    fn record(&self, sql: &str, args: &[Value]) {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), args.to_vec()));
    }
}

impl Executor for RecordingExecutor {
    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        self.record(sql, args);
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        self.record(sql, args);
        Ok(self.affected)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Record)]
#[orm(table = "users", database = "main")]
pub struct User {
    #[orm(id)]
    pub id: Option<i64>,
    pub name: String,
    #[orm(column = "email_address")]
    pub email: Option<String>,
    pub age: i64,
}

/// No `#[orm(id)]`: read-only.
#[derive(Debug, Clone, FromRow, Record)]
#[orm(table = "user_stats", database = "reports")]
pub struct UserStat {
    pub user_id: i64,
    pub logins: i64,
}

pub fn user_row(id: i64, name: &str, email: Option<&str>, age: i64) -> Row {
    Row::from_pairs([
        ("id", Value::Int(id)),
        ("name", Value::from(name)),
        ("email_address", Value::from(email)),
        ("age", Value::Int(age)),
    ])
}

pub fn config() -> OrmConfig {
    OrmConfig::default()
        .with_database("main", DatabaseConfig::new("pgsql", "host=localhost dbname=app"))
        .with_database("reports", DatabaseConfig::new("mysql", "mysql://localhost/reports"))
}
