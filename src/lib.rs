// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # query-derive
//!
//! Declare a repository trait; get the SQL. Re-exports:
//! - [`Entity`] derive and [`repository`] attribute from `query-derive-impl`
//! - All runtime types from `query-derive-core` ([`RegistryBuilder`],
//!   [`Registry`], [`RepositoryHandle`], [`SessionFactory`], ...)
//!
//! A method gets its query one of two ways:
//!
//! | Declared as | Query |
//! |-------------|-------|
//! | `find_by_email_and_age(email, age)` | `SELECT .. WHERE email = $1 AND age = $2 LIMIT 1` |
//! | `find_all_by_status(status)` | `SELECT .. WHERE status = $1` |
//! | `count_by_status(status)` | `SELECT COUNT(*) .. WHERE status = $1` |
//! | `#[query(sql = "...")]` | the template, `{name}` placeholders bound |
//!
//! Everything is validated once, when the registry is built. A failed build
//! names the repository and method; a successful one never re-parses.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use query_derive::{Entity, Error, RegistryBuilder, RegistryConfig, repository};
//! use uuid::Uuid;
//!
//! #[derive(Entity)]
//! #[entity(table = "users")]
//! pub struct User {
//!     pub id: Uuid,
//!     pub email: String,
//!     pub status: String
//! }
//!
//! #[repository(entity = User)]
//! pub trait UserRepository {
//!     async fn find_by_email(&self, email: String) -> Result<Option<User>, Error>;
//!
//!     #[query(sql = "UPDATE users SET status = {status} WHERE id = {id}", modifying)]
//!     async fn set_status(&self, id: Uuid, status: String) -> Result<u64, Error>;
//! }
//!
//! let registry = RegistryBuilder::new(RegistryConfig::default())
//!     .register::<UserRepositoryDescriptor>()?
//!     .build(pool);
//! let users = registry.repository::<UserRepositoryDescriptor>()?;
//! let user = users.find_by_email("john@example.com".into()).await?;
//! ```

pub use query_derive_core::*;
pub use query_derive_impl::{Entity, repository};
