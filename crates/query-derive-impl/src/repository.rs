// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository attribute macro implementation.
//!
//! ```text
//! repository.rs (orchestrator)
//! │
//! ├── parse.rs       → macro arguments, methods, compile-time name checks
//! ├── descriptor.rs  → <Trait>Descriptor + impl Repository
//! └── handle.rs      → impl <Trait> for RepositoryHandle<..>
//! ```
//!
//! # Generated Code
//!
//! For `trait UserRepository`:
//!
//! | Item | Purpose |
//! |------|---------|
//! | `trait UserRepository` | The trait, `Send + Sync`, via `async_trait` |
//! | `UserRepositoryDescriptor` | Method descriptors for registration |
//! | `impl UserRepository for RepositoryHandle<..>` | Routes calls to the registry |

mod descriptor;
mod handle;
mod parse;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{ItemTrait, TraitItem, parse_macro_input, parse_quote};

use self::parse::{RepositoryArgs, RepositoryDef, is_method_attr};

/// Main entry point for the repository attribute macro.
pub fn expand(args: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemTrait);

    let def = match RepositoryArgs::parse(args.into()).and_then(|args| RepositoryDef::new(args, item)) {
        Ok(def) => def,
        Err(err) => return err.write_errors().into()
    };

    generate(&def).into()
}

fn generate(def: &RepositoryDef) -> proc_macro2::TokenStream {
    let descriptor_ident = format_ident!("{}Descriptor", def.ident());
    let item = rewrite_trait(&def.item);
    let descriptor = descriptor::generate(def, &descriptor_ident);
    let handle = handle::generate(def, &descriptor_ident);

    quote! {
        #item
        #descriptor
        #handle
    }
}

/// Strip method attributes and make the trait usable behind `Arc<dyn _>`.
fn rewrite_trait(item: &ItemTrait) -> ItemTrait {
    let mut item = item.clone();

    for trait_item in &mut item.items {
        if let TraitItem::Fn(method) = trait_item {
            method.attrs.retain(|attr| !is_method_attr(attr));
        }
    }

    if item.colon_token.is_none() {
        item.colon_token = Some(Default::default());
    }
    item.supertraits.push(parse_quote!(::core::marker::Send));
    item.supertraits.push(parse_quote!(::core::marker::Sync));
    item.attrs.push(parse_quote!(#[::query_derive::async_trait]));

    item
}
