// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Procedural macros for query-derive.
//!
//! Use the `query-derive` crate instead; generated code refers to
//! `::query_derive` paths.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod entity;
mod repository;
mod utils;

use proc_macro::TokenStream;

/// Derive the table mapping of a record type.
///
/// Implements `query_derive::Entity`: a static `EntityDescriptor` listing
/// every named field as a column, and `from_row` decoding.
///
/// # Attributes
///
/// | Attribute | Required | Default | Description |
/// |-----------|----------|---------|-------------|
/// | `table` | No | snake_case name + `s` | Table name |
/// | `schema` | No | registry default | Schema name |
///
/// Field types must implement `SqlType` and `FromValue` (`bool`, integers,
/// floats, `String`, `Uuid`, `DateTime<Utc>`, and `Option` of those).
///
/// # Example
///
/// ```rust,ignore
/// use query_derive::Entity;
///
/// #[derive(Entity)]
/// #[entity(table = "users", schema = "core")]
/// pub struct User {
///     pub id: Uuid,
///     pub email: String,
///     pub age: i32,
///     pub nickname: Option<String>
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}

/// Generate the implementation of a repository trait.
///
/// Every method must be `async`, take `&self` and return `Result<T, E>` with
/// `E: From<query_derive::Error>`. The return type fixes the result shape:
///
/// | Return | Shape | Decoding |
/// |--------|-------|----------|
/// | `Option<T>` | optional single | entity row or first column |
/// | `Vec<T>` | list | entity rows or first column |
/// | anything else | scalar | first column or affected rows |
///
/// # Method Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[query(sql = "...")]` | Raw-SQL template with `{param}` placeholders |
/// | `#[query(sql = "...", modifying)]` | Same, committed on success |
/// | `#[skip]` | Not generated; the method keeps its default body |
///
/// Methods without attributes must follow the naming grammar
/// (`find_by_`, `get_by_`, `find_all_by_`, `get_all_by_`, `count_by_`
/// followed by `_and_`/`_or_`-joined parameter names). This is checked at
/// compile time.
///
/// # Generated Items
///
/// For `trait UserRepository`:
///
/// - the trait itself, made object-safe with `async_trait`
/// - `UserRepositoryDescriptor`, implementing `query_derive::Repository`
/// - `impl UserRepository for RepositoryHandle<UserRepositoryDescriptor, F>`
///
/// # Example
///
/// ```rust,ignore
/// use query_derive::{Error, repository};
///
/// #[repository(entity = User)]
/// pub trait UserRepository {
///     async fn find_by_email(&self, email: String) -> Result<Option<User>, Error>;
///
///     async fn find_all_by_status(&self, status: String) -> Result<Vec<User>, Error>;
///
///     #[query(sql = "UPDATE users SET status = {status} WHERE id = {id}", modifying)]
///     async fn set_status(&self, id: Uuid, status: String) -> Result<u64, Error>;
///
///     #[skip]
///     async fn ping(&self) -> Result<bool, Error> {
///         Ok(true)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn repository(args: TokenStream, item: TokenStream) -> TokenStream {
    repository::expand(args, item)
}
