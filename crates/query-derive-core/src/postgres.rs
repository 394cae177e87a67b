// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! PostgreSQL backend via sqlx.
//!
//! [`PgPool`] is a [`SessionFactory`]: every invocation begins its own
//! [`sqlx::Transaction`], which sqlx rolls back when dropped uncommitted.
//!
//! ```rust,ignore
//! let pool = PgPool::connect(&url).await?;
//! let registry = RegistryBuilder::new(RegistryConfig::default())
//!     .register::<UserRepositoryDescriptor>()?
//!     .build(pool);
//! ```
//!
//! # Row Decoding
//!
//! | Column type | [`Value`] |
//! |-------------|-----------|
//! | `BOOL` | `Bool` |
//! | `INT2`, `INT4`, `INT8` | `Int` |
//! | `FLOAT4`, `FLOAT8` | `Float` |
//! | `UUID` | `Uuid` |
//! | `TIMESTAMPTZ`, `TIMESTAMP` | `Timestamp` |
//! | anything else | `Text` |

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{
    Column, PgPool, Postgres, Row as _, Transaction, TypeInfo,
    postgres::{PgArguments, PgRow},
    query::Query
};
use uuid::Uuid;

use crate::{
    entity::Row,
    error::DriverError,
    session::{Bind, Session, SessionFactory},
    value::{Value, ValueType}
};

/// One PostgreSQL transaction.
pub struct PgSession {
    tx: Transaction<'static, Postgres>
}

#[async_trait]
impl SessionFactory for PgPool {
    type Session = PgSession;

    async fn open(&self) -> Result<PgSession, DriverError> {
        let tx = self.begin().await?;
        Ok(PgSession {
            tx
        })
    }
}

#[async_trait]
impl Session for PgSession {
    async fn fetch(&mut self, sql: &str, binds: &[Bind]) -> Result<Vec<Row>, DriverError> {
        let rows = bind_all(sqlx::query(sql), binds)
            .fetch_all(&mut *self.tx)
            .await?;
        rows.iter().map(decode_row).collect()
    }

    async fn execute(&mut self, sql: &str, binds: &[Bind]) -> Result<u64, DriverError> {
        let done = bind_all(sqlx::query(sql), binds)
            .execute(&mut *self.tx)
            .await?;
        Ok(done.rows_affected())
    }

    async fn commit(self) -> Result<(), DriverError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), DriverError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// Bind every value, typing `NULL` after the declared parameter.
fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    binds: &'q [Bind]
) -> Query<'q, Postgres, PgArguments> {
    for bind in binds {
        query = match (&bind.value, bind.ty) {
            (Value::Null, ValueType::Bool) => query.bind(None::<bool>),
            (Value::Null, ValueType::Int) => query.bind(None::<i64>),
            (Value::Null, ValueType::Float) => query.bind(None::<f64>),
            (Value::Null, ValueType::Text) => query.bind(None::<String>),
            (Value::Null, ValueType::Uuid) => query.bind(None::<Uuid>),
            (Value::Null, ValueType::Timestamp) => query.bind(None::<DateTime<Utc>>),
            (Value::Bool(v), _) => query.bind(*v),
            (Value::Int(v), _) => query.bind(*v),
            (Value::Float(v), _) => query.bind(*v),
            (Value::Text(v), _) => query.bind(v.as_str()),
            (Value::Uuid(v), _) => query.bind(*v),
            (Value::Timestamp(v), _) => query.bind(*v)
        };
    }
    query
}

fn decode_row(row: &PgRow) -> Result<Row, DriverError> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(Value::Bool),
            "INT2" => row
                .try_get::<Option<i16>, _>(idx)?
                .map(|v| Value::Int(v.into())),
            "INT4" => row
                .try_get::<Option<i32>, _>(idx)?
                .map(|v| Value::Int(v.into())),
            "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Value::Int),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(idx)?
                .map(|v| Value::Float(v.into())),
            "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(Value::Float),
            "UUID" => row.try_get::<Option<Uuid>, _>(idx)?.map(Value::Uuid),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(idx)?
                .map(Value::Timestamp),
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(idx)?
                .map(|v| Value::Timestamp(v.and_utc())),
            _ => row.try_get::<Option<String>, _>(idx)?.map(Value::Text)
        };
        out.push(column.name(), value.unwrap_or(Value::Null));
    }
    Ok(out)
}
