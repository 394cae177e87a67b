// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use query_derive_core::prelude::*;
//! ```

pub use crate::{
    Dialect, Entity, Error, QueryOutput, Registry, RegistryBuilder, RegistryConfig, Repository,
    RepositoryHandle, Result, Row, Session, SessionFactory, UnusedParameterPolicy, Value,
    async_trait
};
