// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime engine for query-derive.
//!
//! Turns repository method declarations into cached, parameterized SQL
//! statements and executes them in scoped sessions. The `#[repository]` and
//! `#[derive(Entity)]` macros generate the inputs; this crate does the rest
//! and can also be driven by hand-built descriptors.
//!
//! # Overview
//!
//! - [`naming`] - Method-name grammar (`find_by_email_and_age`)
//! - [`condition`] - Left-folded AND/OR condition trees
//! - [`template`] - Raw-SQL templates with `{name}` placeholders
//! - [`execution`] - Commit policy, result shaping, scoped sessions
//! - [`registry`] - Startup resolution and the per-method statement cache
//! - [`session`] - Driver contracts ([`SessionFactory`], [`Session`])
//! - [`prelude`] - Convenient re-exports
//!
//! # Usage
//!
//! ```rust
//! use query_derive_core::{
//!     EntityDescriptor, FieldDescriptor, MethodDescriptor, RegistryBuilder, RegistryConfig,
//!     ResultShape, ValueType
//! };
//!
//! static FIELDS: &[FieldDescriptor] = &[
//!     FieldDescriptor::new("id", ValueType::Int, false),
//!     FieldDescriptor::new("email", ValueType::Text, false)
//! ];
//! static USERS: EntityDescriptor = EntityDescriptor::new("User", "users", None, FIELDS);
//!
//! let builder = RegistryBuilder::new(RegistryConfig::default())
//!     .register_methods(
//!         "users",
//!         &USERS,
//!         vec![
//!             MethodDescriptor::new("find_by_email")
//!                 .param("email", ValueType::Text)
//!                 .returns(ResultShape::OptionalSingle),
//!         ]
//!     )
//!     .unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod condition;
pub mod config;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod execution;
pub mod naming;
#[cfg(feature = "postgres")]
#[cfg_attr(docsrs, doc(cfg(feature = "postgres")))]
pub mod postgres;
pub mod prelude;
pub mod registry;
pub mod session;
pub mod signature;
pub mod template;
pub mod value;

/// Re-export async_trait for generated code.
pub use async_trait::async_trait;
pub use config::{RegistryConfig, UnusedParameterPolicy};
pub use dialect::Dialect;
pub use entity::{Entity, EntityDescriptor, FieldDescriptor, Row};
pub use error::{DriverError, Error, Result};
pub use execution::{BoundStatement, CommitPolicy, QueryOutput, StatementSource};
pub use registry::{Registry, RegistryBuilder, Repository, RepositoryHandle};
pub use session::{Bind, Session, SessionError, SessionFactory};
pub use signature::{MethodDescriptor, MethodKind, Param, QueryTemplate, ResultShape};
pub use value::{FromValue, SqlType, ToValue, Value, ValueType};
