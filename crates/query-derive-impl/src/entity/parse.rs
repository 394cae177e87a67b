// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity attribute parsing with darling.
//!
//! # Supported Attributes
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `table` | No | snake_case struct name + `s` | Table name |
//! | `schema` | No | none (registry default) | Schema name |

use convert_case::{Case, Casing};
use darling::{
    FromDeriveInput, FromField,
    ast::{Data, Style},
    util::Ignored
};
use syn::{DeriveInput, Ident, Type, ext::IdentExt};

/// Raw `#[entity(...)]` attributes plus the named fields.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity))]
struct EntityAttrs {
    ident:    Ident,
    generics: syn::Generics,
    data:     Data<Ignored, EntityField>,

    #[darling(default)]
    table: Option<String>,

    #[darling(default)]
    schema: Option<String>
}

#[derive(Debug, FromField)]
struct EntityField {
    ident: Option<Ident>,
    ty:    Type
}

/// Column parsed from a struct field.
#[derive(Debug)]
pub struct ColumnDef {
    /// Field identifier.
    pub ident: Ident,
    /// Column name (identifier without `r#`).
    pub name:  String,
    /// Field type.
    pub ty:    Type
}

/// Parsed entity definition.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier (e.g., `User`).
    pub ident:   Ident,
    /// Table name.
    pub table:   String,
    /// Explicit schema.
    pub schema:  Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDef>
}

impl EntityDef {
    /// Parse from a derive input.
    ///
    /// # Errors
    ///
    /// - applied to an enum, union, tuple or unit struct
    /// - generic struct
    /// - malformed `#[entity(...)]`
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;

        if !attrs.generics.params.is_empty() {
            return Err(
                darling::Error::custom("Entity cannot be derived for generic structs")
                    .with_span(&attrs.generics)
            );
        }

        let fields = attrs
            .data
            .take_struct()
            .filter(|fields| fields.style == Style::Struct)
            .ok_or_else(|| darling::Error::custom("Entity requires named fields").with_span(&attrs.ident))?;

        let columns = fields
            .fields
            .into_iter()
            .filter_map(|field| {
                let ident = field.ident?;
                Some(ColumnDef {
                    name: ident.unraw().to_string(),
                    ident,
                    ty: field.ty
                })
            })
            .collect();

        let table = attrs
            .table
            .unwrap_or_else(|| default_table(&attrs.ident));

        Ok(Self {
            ident: attrs.ident,
            table,
            schema: attrs.schema,
            columns
        })
    }
}

/// `UserAccount` → `user_accounts`.
pub fn default_table(ident: &Ident) -> String {
    format!("{}s", ident.unraw().to_string().to_case(Case::Snake))
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn explicit_table_and_schema() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "people", schema = "core")]
            pub struct User {
                pub id: i64,
                pub email: String
            }
        };
        let entity = EntityDef::from_derive_input(&input).unwrap();
        assert_eq!(entity.table, "people");
        assert_eq!(entity.schema.as_deref(), Some("core"));
        assert_eq!(entity.columns.len(), 2);
        assert_eq!(entity.columns[1].name, "email");
    }

    #[test]
    fn default_table_is_plural_snake_case() {
        let input: DeriveInput = parse_quote! {
            pub struct UserAccount {
                pub id: i64
            }
        };
        let entity = EntityDef::from_derive_input(&input).unwrap();
        assert_eq!(entity.table, "user_accounts");
        assert!(entity.schema.is_none());
    }

    #[test]
    fn raw_identifiers_are_unescaped() {
        let input: DeriveInput = parse_quote! {
            pub struct Item {
                pub r#type: String
            }
        };
        let entity = EntityDef::from_derive_input(&input).unwrap();
        assert_eq!(entity.columns[0].name, "type");
    }

    #[test]
    fn tuple_struct_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Pair(i64, i64);
        };
        let err = EntityDef::from_derive_input(&input).unwrap_err();
        assert_eq!(err.to_string(), "Entity requires named fields");

        let input: DeriveInput = parse_quote! {
            pub struct Marker;
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn enum_rejected() {
        let input: DeriveInput = parse_quote! {
            pub enum Status { Active, Blocked }
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn generics_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Wrapper<T> {
                pub value: T
            }
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }
}
