// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Session abstraction over the database driver.
//!
//! Every generated method runs inside one scoped session opened from a
//! [`SessionFactory`]. The session is committed or rolled back exactly once
//! before the method returns.
//!
//! # Overview
//!
//! - [`SessionFactory`] - Opens sessions (a connection pool)
//! - [`Session`] - Runs statements, then commits or rolls back
//! - [`SessionError`] - Driver error tagged with the lifecycle stage
//! - [`Bind`] - Typed bind value
//!
//! # Cancellation
//!
//! A session dropped before it was committed or rolled back must be rolled
//! back by the driver. sqlx transactions already behave this way.

use std::{error::Error as StdError, fmt};

use async_trait::async_trait;

use crate::{
    entity::Row,
    error::DriverError,
    value::{Value, ValueType}
};

/// Value bound to one marker slot, with the declared parameter type.
///
/// The type is kept so that `NULL` can be bound with the right SQL type.
#[derive(Debug, Clone, PartialEq)]
pub struct Bind {
    /// Declared parameter type.
    pub ty:    ValueType,
    /// Argument value (already coerced to `ty` or `NULL`).
    pub value: Value
}

/// Source of scoped sessions.
///
/// Implemented for `sqlx::PgPool` with the `postgres` feature.
#[async_trait]
pub trait SessionFactory: Send + Sync + 'static {
    /// Session type.
    type Session: Session;

    /// Open a new session.
    async fn open(&self) -> Result<Self::Session, DriverError>;
}

/// One unit of work on the database.
#[async_trait]
pub trait Session: Send + Sized {
    /// Run a row-producing statement.
    async fn fetch(&mut self, sql: &str, binds: &[Bind]) -> Result<Vec<Row>, DriverError>;

    /// Run a statement that produces no rows, returning the affected count.
    async fn execute(&mut self, sql: &str, binds: &[Bind]) -> Result<u64, DriverError>;

    /// Persist the work and release the session.
    async fn commit(self) -> Result<(), DriverError>;

    /// Discard the work and release the session.
    async fn rollback(self) -> Result<(), DriverError>;
}

/// Lifecycle stage a driver error happened in.
#[derive(Debug)]
pub enum SessionError {
    /// Failed to open the session.
    Open(DriverError),

    /// Statement failed.
    Run(DriverError),

    /// Failed to commit.
    Commit(DriverError),

    /// Failed to roll back.
    Rollback(DriverError)
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(e) => write!(f, "failed to open session: {e}"),
            Self::Run(e) => write!(f, "statement failed: {e}"),
            Self::Commit(e) => write!(f, "failed to commit session: {e}"),
            Self::Rollback(e) => write!(f, "failed to roll back session: {e}")
        }
    }
}

impl StdError for SessionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Open(e) | Self::Run(e) | Self::Commit(e) | Self::Rollback(e) => Some(&**e)
        }
    }
}

impl SessionError {
    /// Check if opening the session failed.
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Check if the statement itself failed.
    pub const fn is_run(&self) -> bool {
        matches!(self, Self::Run(_))
    }

    /// Check if the commit failed.
    pub const fn is_commit(&self) -> bool {
        matches!(self, Self::Commit(_))
    }

    /// Check if the rollback failed.
    pub const fn is_rollback(&self) -> bool {
        matches!(self, Self::Rollback(_))
    }

    /// Get the driver error.
    pub fn into_inner(self) -> DriverError {
        match self {
            Self::Open(e) | Self::Run(e) | Self::Commit(e) | Self::Rollback(e) => e
        }
    }
}
