// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity derive macro implementation.
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── parse.rs    → #[entity(...)] attributes, columns
//! └── mapping.rs  → impl query_derive::Entity
//! ```
//!
//! # Generated Code
//!
//! ```rust,ignore
//! impl ::query_derive::Entity for User {
//!     fn descriptor() -> &'static ::query_derive::EntityDescriptor { ... }
//!     fn from_row(row: &::query_derive::Row) -> ::query_derive::Result<Self> { ... }
//! }
//! ```

mod mapping;
pub mod parse;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use self::parse::EntityDef;

/// Main entry point for the Entity derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EntityDef::from_derive_input(&input) {
        Ok(entity) => mapping::generate(&entity).into(),
        Err(err) => err.write_errors().into()
    }
}
