// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Execution policy and scoped sessions.
//!
//! A [`BoundStatement`] is the cached, immutable product of registration:
//! the SQL text, the parameter index behind every bind marker, the result
//! shape and the [`CommitPolicy`]. Executing it opens one session, runs the
//! statement and releases the session on every exit path.
//!
//! # Commit Policy
//!
//! | Method | Policy | Session end |
//! |--------|--------|-------------|
//! | Naming-convention | `Discard` | rollback |
//! | Template | `Discard` | rollback |
//! | Template, `modifying` | `Commit` | commit |
//!
//! # Result Shaping
//!
//! | Shape | Row-producing statement | Other statement |
//! |-------|-------------------------|-----------------|
//! | `OptionalSingle` | first row or `None` | rejected at registration |
//! | `List` | all rows, possibly none | rejected at registration |
//! | `Scalar` | first column of first row, `NULL` if none | affected rows |

use tracing::{Instrument, debug, debug_span, warn};

use crate::{
    condition::Condition,
    entity::{Entity, EntityDescriptor, Row},
    error::{DriverError, Error, Result},
    session::{Bind, Session, SessionError, SessionFactory},
    signature::ResultShape,
    template::BoundTemplate,
    value::{FromValue, Value}
};

/// What happens to the session after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitPolicy {
    /// Commit (modifying templates).
    Commit,

    /// Roll back; effects are never persisted.
    Discard
}

impl CommitPolicy {
    /// Policy for a method with the given modification flag.
    pub const fn for_modifying(modifying: bool) -> Self {
        if modifying { Self::Commit } else { Self::Discard }
    }
}

/// Where the SQL of a bound statement came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementSource {
    /// Derived from the method name.
    Derived(Condition),

    /// Raw-SQL template.
    Template(BoundTemplate)
}

/// Executable query cached per method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundStatement {
    /// Target entity.
    pub entity:       &'static EntityDescriptor,
    /// Condition tree or parsed template.
    pub source:       StatementSource,
    /// SQL with bind markers.
    pub sql:          String,
    /// Parameter index behind every marker slot.
    pub binds:        Vec<usize>,
    /// Declared result shape.
    pub shape:        ResultShape,
    /// Whether the statement produces rows.
    pub returns_rows: bool,
    /// Session end on success.
    pub policy:       CommitPolicy
}

/// Shaped result of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// First row, if any.
    Optional(Option<Row>),

    /// Every row.
    List(Vec<Row>),

    /// Aggregate, first column or affected-row count.
    Scalar(Value)
}

impl QueryOutput {
    /// Decode an optional result with `decode`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the output is not optional or a row does
    /// not decode.
    pub fn into_optional<T>(self, decode: impl Fn(&Row) -> Result<T>) -> Result<Option<T>> {
        match self {
            Self::Optional(row) => row.as_ref().map(decode).transpose(),
            other => Err(other.unexpected(ResultShape::OptionalSingle))
        }
    }

    /// Decode a list result with `decode`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the output is not a list or a row does
    /// not decode.
    pub fn into_list<T>(self, decode: impl Fn(&Row) -> Result<T>) -> Result<Vec<T>> {
        match self {
            Self::List(rows) => rows.iter().map(decode).collect(),
            other => Err(other.unexpected(ResultShape::List))
        }
    }

    /// Decode an optional entity.
    ///
    /// # Errors
    ///
    /// See [`QueryOutput::into_optional`].
    pub fn into_entity<E: Entity>(self) -> Result<Option<E>> {
        self.into_optional(E::from_row)
    }

    /// Decode a list of entities.
    ///
    /// # Errors
    ///
    /// See [`QueryOutput::into_list`].
    pub fn into_entities<E: Entity>(self) -> Result<Vec<E>> {
        self.into_list(E::from_row)
    }

    /// Decode a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the output is not a scalar or the value
    /// does not convert into `T`.
    pub fn into_scalar<T: FromValue>(self) -> Result<T> {
        match self {
            Self::Scalar(value) => T::from_value(value, "#0"),
            other => Err(other.unexpected(ResultShape::Scalar))
        }
    }

    /// Shape of this output.
    pub const fn shape(&self) -> ResultShape {
        match self {
            Self::Optional(_) => ResultShape::OptionalSingle,
            Self::List(_) => ResultShape::List,
            Self::Scalar(_) => ResultShape::Scalar
        }
    }

    fn unexpected(&self, expected: ResultShape) -> Error {
        Error::decode("#0", format!("expected {expected} output, found {}", self.shape()))
    }
}

/// Session that must be released exactly once.
///
/// Dropping the guard while the session is still held (the invocation future
/// was cancelled) leaves the rollback to the driver.
struct ScopedSession<'a, S: Session> {
    session:    Option<S>,
    repository: &'a str,
    method:     &'a str
}

impl<'a, S: Session> ScopedSession<'a, S> {
    const fn new(session: S, repository: &'a str, method: &'a str) -> Self {
        Self {
            session: Some(session),
            repository,
            method
        }
    }

    async fn run(&mut self, statement: &BoundStatement, binds: &[Bind]) -> Result<QueryOutput, DriverError> {
        let Some(session) = self.session.as_mut() else {
            return Err("session already released".into());
        };

        if !statement.returns_rows {
            let affected = session.execute(&statement.sql, binds).await?;
            return match statement.shape {
                ResultShape::Scalar => Ok(QueryOutput::Scalar(Value::Int(
                    i64::try_from(affected).unwrap_or(i64::MAX)
                ))),
                shape => Err(format!("statement produces no rows for a {shape} result").into())
            };
        }

        let rows = session.fetch(&statement.sql, binds).await?;
        Ok(match statement.shape {
            ResultShape::OptionalSingle => QueryOutput::Optional(rows.into_iter().next()),
            ResultShape::List => QueryOutput::List(rows),
            ResultShape::Scalar => {
                QueryOutput::Scalar(rows.into_iter().next().map_or(Value::Null, Row::into_first))
            }
        })
    }

    async fn release(mut self, policy: CommitPolicy) -> Result<(), SessionError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        match policy {
            CommitPolicy::Commit => session.commit().await.map_err(SessionError::Commit),
            CommitPolicy::Discard => session.rollback().await.map_err(SessionError::Rollback)
        }
    }
}

impl<S: Session> Drop for ScopedSession<'_, S> {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!(
                repository = self.repository,
                method = self.method,
                "session dropped before release, leaving rollback to the driver"
            );
        }
    }
}

/// Run `statement` in a new session from `factory`.
///
/// The session is committed or rolled back before this returns. A failing
/// statement is rolled back and its error returned; a failing rollback on
/// that path is only logged.
///
/// # Errors
///
/// Returns [`Error::QueryExecution`] wrapping a [`SessionError`].
pub async fn execute<F: SessionFactory>(
    factory: &F,
    repository: &str,
    method: &str,
    statement: &BoundStatement,
    binds: Vec<Bind>
) -> Result<QueryOutput> {
    let span = debug_span!("query", repository, method);
    async move {
        let fail = |source: SessionError| Error::QueryExecution {
            repository: repository.to_string(),
            method:     method.to_string(),
            source:     Box::new(source)
        };

        debug!(
            shape = %statement.shape,
            policy = ?statement.policy,
            sql = %statement.sql,
            "executing"
        );

        let session = factory.open().await.map_err(|e| fail(SessionError::Open(e)))?;
        let mut scoped = ScopedSession::new(session, repository, method);

        match scoped.run(statement, &binds).await {
            Ok(output) => match scoped.release(statement.policy).await {
                Ok(()) => Ok(output),
                Err(e) if statement.policy == CommitPolicy::Discard => {
                    warn!(error = %e, "failed to release read-only session");
                    Ok(output)
                }
                Err(e) => Err(fail(e))
            },
            Err(e) => {
                if let Err(rollback) = scoped.release(CommitPolicy::Discard).await {
                    warn!(error = %rollback, "rollback failed after statement error");
                }
                Err(fail(SessionError::Run(e)))
            }
        }
    }
    .instrument(span)
    .await
}
