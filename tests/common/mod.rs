// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory session factory shared by the integration tests.
//!
//! Statements run inside a session are staged; `commit` moves them to the
//! persisted log, `rollback` drops them. Row responses are scripted by SQL
//! substring.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use query_derive::{
    Bind, DriverError, Entity, Error, Row, Session, SessionFactory, Value, async_trait, repository
};
use uuid::Uuid;

#[derive(Debug, Clone, Entity)]
#[entity(table = "users")]
pub struct User {
    pub id:         Uuid,
    pub email:      String,
    pub age:        i32,
    pub status:     String,
    pub nickname:   Option<String>,
    pub created_at: DateTime<Utc>
}

impl User {
    pub fn row(email: &str, age: i64, status: &str) -> Row {
        Row::new()
            .with("id", Value::Uuid(Uuid::now_v7()))
            .with("email", Value::Text(email.to_string()))
            .with("age", Value::Int(age))
            .with("status", Value::Text(status.to_string()))
            .with("nickname", Value::Null)
            .with("created_at", Value::Timestamp(Utc::now()))
    }
}

/// Error type of a consumer crate.
#[derive(Debug)]
pub enum AppError {
    Query(Error)
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self::Query(err)
    }
}

#[repository(entity = User)]
pub trait UserRepository {
    async fn find_by_email(&self, email: String) -> Result<Option<User>, Error>;

    async fn find_by_email_and_age(&self, email: String, age: i32) -> Result<Option<User>, Error>;

    async fn find_all_by_email_or_age_and_status(
        &self,
        email: String,
        age: i32,
        status: String
    ) -> Result<Vec<User>, Error>;

    async fn get_all_by_status(&self, status: String) -> Result<Vec<User>, AppError>;

    async fn find_all_by_nickname(&self, nickname: Option<String>) -> Result<Vec<User>, Error>;

    async fn count_by_status(&self, status: String) -> Result<i64, Error>;

    #[query(sql = "SELECT email FROM users WHERE status = {status} ORDER BY email")]
    async fn emails_with_status(&self, status: String) -> Result<Vec<String>, Error>;

    #[query(sql = "SELECT * FROM users WHERE email = '{email}'")]
    async fn lookup(&self, email: String) -> Result<Option<User>, Error>;

    #[query(sql = "UPDATE users SET status = {status} WHERE id = {id}", modifying)]
    async fn set_status(&self, id: Uuid, status: String) -> Result<u64, Error>;

    #[query(sql = "UPDATE users SET status = {status} WHERE id = {id}")]
    async fn try_set_status(&self, id: Uuid, status: String) -> Result<u64, Error>;

    #[skip]
    async fn ping(&self) -> Result<&'static str, Error> {
        Ok("pong")
    }
}

/// Statement seen by the fake database.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql:   String,
    pub binds: Vec<Value>
}

#[derive(Debug, Default)]
pub struct State {
    pub opened:    usize,
    pub commits:   usize,
    pub rollbacks: usize,
    pub executed:  Vec<Executed>,
    pub persisted: Vec<Executed>,
    pub responses: Vec<(String, Vec<Row>)>,
    pub affected:  u64,
    pub fail_on:   Option<String>
}

/// Cloneable handle to the fake database.
#[derive(Debug, Clone, Default)]
pub struct MemoryFactory {
    state: Arc<Mutex<State>>
}

impl MemoryFactory {
    pub fn new() -> Self {
        let factory = Self::default();
        factory.state().affected = 1;
        factory
    }

    /// Answer every statement containing `needle` with `rows`.
    pub fn respond(self, needle: &str, rows: Vec<Row>) -> Self {
        self.state().responses.push((needle.to_string(), rows));
        self
    }

    /// Fail every statement containing `needle`.
    pub fn fail_on(self, needle: &str) -> Self {
        self.state().fail_on = Some(needle.to_string());
        self
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

pub struct MemorySession {
    state:  Arc<Mutex<State>>,
    staged: Vec<Executed>
}

impl MemorySession {
    fn record(&mut self, sql: &str, binds: &[Bind]) -> Result<(), DriverError> {
        let state = self.state.lock().unwrap();
        if let Some(needle) = &state.fail_on
            && sql.contains(needle.as_str())
        {
            return Err(format!("statement failed: {sql}").into());
        }
        drop(state);

        let executed = Executed {
            sql:   sql.to_string(),
            binds: binds.iter().map(|b| b.value.clone()).collect()
        };
        self.state.lock().unwrap().executed.push(executed.clone());
        self.staged.push(executed);
        Ok(())
    }
}

#[async_trait]
impl SessionFactory for MemoryFactory {
    type Session = MemorySession;

    async fn open(&self) -> Result<MemorySession, DriverError> {
        self.state().opened += 1;
        Ok(MemorySession {
            state:  Arc::clone(&self.state),
            staged: Vec::new()
        })
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn fetch(&mut self, sql: &str, binds: &[Bind]) -> Result<Vec<Row>, DriverError> {
        self.record(sql, binds)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .responses
            .iter()
            .find(|(needle, _)| sql.contains(needle.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    async fn execute(&mut self, sql: &str, binds: &[Bind]) -> Result<u64, DriverError> {
        self.record(sql, binds)?;
        Ok(self.state.lock().unwrap().affected)
    }

    async fn commit(self) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.commits += 1;
        state.persisted.extend(self.staged);
        Ok(())
    }

    async fn rollback(self) -> Result<(), DriverError> {
        self.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}

/// Route engine logs to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
