// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl Entity` generation.
//!
//! The descriptor lives in a function-local `static`, so every call returns
//! the same `&'static EntityDescriptor` and the registry can key on it.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::EntityDef;

/// Generates the `Entity` implementation.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let name = ident.to_string();
    let table = &entity.table;
    let schema = match &entity.schema {
        Some(schema) => quote! { ::core::option::Option::Some(#schema) },
        None => quote! { ::core::option::Option::None }
    };

    let fields = entity.columns.iter().map(|column| {
        let col = &column.name;
        let ty = &column.ty;
        quote! {
            ::query_derive::FieldDescriptor::new(
                #col,
                <#ty as ::query_derive::SqlType>::TYPE,
                <#ty as ::query_derive::SqlType>::NULLABLE
            )
        }
    });

    let decoders = entity.columns.iter().map(|column| {
        let field = &column.ident;
        let col = &column.name;
        let ty = &column.ty;
        quote! { #field: row.get::<#ty>(#col)? }
    });

    quote! {
        impl ::query_derive::Entity for #ident {
            fn descriptor() -> &'static ::query_derive::EntityDescriptor {
                static FIELDS: &[::query_derive::FieldDescriptor] = &[#(#fields),*];
                static DESCRIPTOR: ::query_derive::EntityDescriptor =
                    ::query_derive::EntityDescriptor::new(#name, #table, #schema, FIELDS);
                &DESCRIPTOR
            }

            fn from_row(row: &::query_derive::Row) -> ::query_derive::Result<Self> {
                ::core::result::Result::Ok(Self {
                    #(#decoders),*
                })
            }
        }
    }
}
