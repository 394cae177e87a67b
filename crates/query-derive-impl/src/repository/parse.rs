// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository trait parsing.
//!
//! # Macro Arguments
//!
//! | Argument | Required | Description |
//! |----------|----------|-------------|
//! | `entity` | Yes | Entity type the repository queries |
//!
//! # Method Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `#[query(sql = "...")]` | Raw-SQL template |
//! | `#[query(sql = "...", modifying)]` | Template committed on success |
//! | `#[skip]` | Keep the default body, never routed |
//!
//! Method names without `#[query]` or `#[skip]` are run through the same
//! naming parser the registry uses, so a bad name fails the build instead of
//! the startup.

use darling::{FromMeta, ast::NestedMeta};
use proc_macro2::TokenStream;
use query_derive_core::{ResultShape, naming};
use syn::{
    Attribute, FnArg, Ident, ItemTrait, Pat, ReturnType, TraitItem, TraitItemFn, Type,
    ext::IdentExt
};

use crate::utils::types::{option_inner, result_ok, vec_inner};

/// `#[repository(...)]` arguments.
#[derive(Debug, FromMeta)]
pub struct RepositoryArgs {
    /// Entity type path.
    pub entity: syn::Path
}

impl RepositoryArgs {
    /// Parse from the attribute argument tokens.
    ///
    /// # Errors
    ///
    /// Malformed list or missing `entity`.
    pub fn parse(args: TokenStream) -> darling::Result<Self> {
        let list = NestedMeta::parse_meta_list(args)?;
        Self::from_list(&list)
    }
}

/// `#[query(...)]` on a method.
#[derive(Debug, Clone, FromMeta)]
pub struct QueryAttr {
    /// SQL template.
    pub sql: String,

    /// Commit after a successful run.
    #[darling(default)]
    pub modifying: bool
}

/// Return value of a method, classified by shape.
#[derive(Debug)]
pub enum Returns {
    /// `Option<T>`
    Optional(Type),
    /// `Vec<T>`
    List(Type),
    /// Anything else.
    Scalar(Type)
}

impl Returns {
    fn classify(ok: &Type) -> Self {
        if let Some(inner) = option_inner(ok) {
            Self::Optional(inner.clone())
        } else if let Some(inner) = vec_inner(ok) {
            Self::List(inner.clone())
        } else {
            Self::Scalar(ok.clone())
        }
    }

    /// Result shape of the return value.
    pub const fn shape(&self) -> ResultShape {
        match self {
            Self::Optional(_) => ResultShape::OptionalSingle,
            Self::List(_) => ResultShape::List,
            Self::Scalar(_) => ResultShape::Scalar
        }
    }
}

/// Declared method parameter.
#[derive(Debug)]
pub struct ParamDef {
    /// Binding identifier.
    pub ident: Ident,
    /// Name used in templates and the naming grammar.
    pub name:  String,
    /// Declared type.
    pub ty:    Type
}

/// Parsed repository method.
#[derive(Debug)]
pub struct MethodDef {
    /// Method identifier.
    pub ident:   Ident,
    /// Parameters after `&self`.
    pub params:  Vec<ParamDef>,
    /// Full return type (`Result<T, E>`).
    pub output:  Type,
    /// Success type classified by shape.
    pub returns: Returns,
    /// Raw-SQL template.
    pub query:   Option<QueryAttr>,
    /// `#[skip]`
    pub skip:    bool
}

impl MethodDef {
    /// Method name as registered.
    pub fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// Parse a trait method.
    ///
    /// # Errors
    ///
    /// Every problem found, accumulated.
    pub fn from_trait_fn(method: &TraitItemFn) -> darling::Result<Self> {
        let mut errors = darling::Error::accumulator();
        let sig = &method.sig;

        if sig.asyncness.is_none() {
            errors.push(darling::Error::custom("repository methods must be `async`").with_span(&sig.fn_token));
        }
        if !sig.generics.params.is_empty() {
            errors.push(
                darling::Error::custom("repository methods cannot be generic").with_span(&sig.generics)
            );
        }

        let receiver = match sig.inputs.first() {
            Some(FnArg::Receiver(receiver)) => Some(receiver),
            _ => None
        };
        if !receiver.is_some_and(|r| r.reference.is_some() && r.mutability.is_none()) {
            errors.push(
                darling::Error::custom("repository methods must take `&self`").with_span(&sig.ident)
            );
        }

        let mut params = Vec::new();
        for input in sig.inputs.iter().skip(usize::from(receiver.is_some())) {
            let FnArg::Typed(typed) = input else {
                continue;
            };
            match typed.pat.as_ref() {
                Pat::Ident(pat) if pat.subpat.is_none() => params.push(ParamDef {
                    ident: pat.ident.clone(),
                    name:  pat.ident.unraw().to_string(),
                    ty:    typed.ty.as_ref().clone()
                }),
                other => errors.push(
                    darling::Error::custom("parameters must be plain identifiers").with_span(other)
                )
            }
        }

        let output = match &sig.output {
            ReturnType::Type(_, ty) => Some(ty.as_ref().clone()),
            ReturnType::Default => None
        };
        let ok = output.as_ref().and_then(result_ok).cloned();
        if ok.is_none() {
            errors.push(
                darling::Error::custom("repository methods must return `Result<T, E>`").with_span(&sig.ident)
            );
        }

        let query = errors.handle(parse_query(&method.attrs)).flatten();
        let skip = has_skip(&method.attrs);

        if skip && query.is_some() {
            errors.push(
                darling::Error::custom("`#[skip]` and `#[query]` cannot be combined").with_span(&sig.ident)
            );
        }
        if skip && method.default.is_none() {
            errors.push(darling::Error::custom("`#[skip]` methods need a default body").with_span(&sig.ident));
        }
        if !skip && method.default.is_some() {
            errors.push(
                darling::Error::custom("generated methods cannot have a body; add `#[skip]` to keep it")
                    .with_span(&sig.ident)
            );
        }

        let (Some(output), Some(ok)) = (output, ok) else {
            return Err(errors.finish().err().unwrap_or_else(|| {
                darling::Error::custom("invalid repository method").with_span(&sig.ident)
            }));
        };

        let def = Self {
            ident: sig.ident.clone(),
            params,
            output,
            returns: Returns::classify(&ok),
            query,
            skip
        };

        if !def.skip && def.query.is_none() {
            errors.handle(def.check_name());
        }

        errors.finish_with(def)
    }

    /// Run the naming grammar against the signature.
    fn check_name(&self) -> darling::Result<()> {
        let name = self.name();
        let parsed = naming::parse(&name)
            .map_err(|err| darling::Error::custom(format!("`{name}`: {err}")).with_span(&self.ident))?
            .ok_or_else(|| {
                darling::Error::custom(format!(
                    "`{name}` has no query prefix (find_by_, get_by_, find_all_by_, get_all_by_, \
                     count_by_); add `#[query(sql = \"...\")]` or `#[skip]`"
                ))
                .with_span(&self.ident)
            })?;

        let names: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        parsed
            .align_names(&names, self.returns.shape())
            .map_err(|err| darling::Error::custom(format!("`{name}`: {err}")).with_span(&self.ident))
    }
}

fn parse_query(attrs: &[Attribute]) -> darling::Result<Option<QueryAttr>> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident("query"))
        .map(|attr| QueryAttr::from_meta(&attr.meta))
        .transpose()
}

fn has_skip(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("skip"))
}

/// Check if `attr` is consumed by `#[repository]`.
pub fn is_method_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("query") || attr.path().is_ident("skip")
}

/// Parsed repository trait.
#[derive(Debug)]
pub struct RepositoryDef {
    /// Trait definition, attributes intact.
    pub item:    ItemTrait,
    /// Entity type path.
    pub entity:  syn::Path,
    /// Methods in declaration order.
    pub methods: Vec<MethodDef>
}

impl RepositoryDef {
    /// Parse the trait.
    ///
    /// # Errors
    ///
    /// Generic traits, non-method items, and every method error.
    pub fn new(args: RepositoryArgs, item: ItemTrait) -> darling::Result<Self> {
        let mut errors = darling::Error::accumulator();

        if !item.generics.params.is_empty() {
            errors.push(
                darling::Error::custom("repository traits cannot be generic").with_span(&item.generics)
            );
        }

        let mut methods = Vec::new();
        for trait_item in &item.items {
            match trait_item {
                TraitItem::Fn(method) => {
                    if let Some(def) = errors.handle(MethodDef::from_trait_fn(method)) {
                        methods.push(def);
                    }
                }
                other => errors.push(
                    darling::Error::custom("repository traits may only contain methods")
                        .with_span(other)
                )
            }
        }

        errors.finish_with(Self {
            item,
            entity: args.entity,
            methods
        })
    }

    /// Trait identifier.
    pub const fn ident(&self) -> &Ident {
        &self.item.ident
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::parse_quote;

    use super::*;

    fn method(item: TraitItemFn) -> darling::Result<MethodDef> {
        MethodDef::from_trait_fn(&item)
    }

    #[test]
    fn args_require_entity() {
        let args = RepositoryArgs::parse(quote!(entity = User)).unwrap();
        assert!(args.entity.is_ident("User"));
        assert!(RepositoryArgs::parse(quote!()).is_err());
    }

    #[test]
    fn derived_method() {
        let def = method(parse_quote! {
            async fn find_by_email_and_age(&self, email: String, age: i32) -> Result<Option<User>, Error>;
        })
        .unwrap();
        assert_eq!(def.name(), "find_by_email_and_age");
        assert_eq!(def.params.len(), 2);
        assert_eq!(def.returns.shape(), ResultShape::OptionalSingle);
        assert!(def.query.is_none());
        assert!(!def.skip);
    }

    #[test]
    fn list_and_count_shapes() {
        let def = method(parse_quote! {
            async fn find_all_by_status(&self, status: String) -> Result<Vec<User>, Error>;
        })
        .unwrap();
        assert_eq!(def.returns.shape(), ResultShape::List);

        let def = method(parse_quote! {
            async fn count_by_status(&self, status: String) -> Result<i64, Error>;
        })
        .unwrap();
        assert_eq!(def.returns.shape(), ResultShape::Scalar);
    }

    #[test]
    fn template_method() {
        let def = method(parse_quote! {
            #[query(sql = "UPDATE users SET status = {status} WHERE id = {id}", modifying)]
            async fn set_status(&self, id: i64, status: String) -> Result<u64, Error>;
        })
        .unwrap();
        let query = def.query.unwrap();
        assert!(query.modifying);
        assert!(query.sql.starts_with("UPDATE"));
    }

    #[test]
    fn template_defaults_to_read_only() {
        let def = method(parse_quote! {
            #[query(sql = "SELECT * FROM users WHERE email = {email}")]
            async fn lookup(&self, email: String) -> Result<Option<User>, Error>;
        })
        .unwrap();
        assert!(!def.query.unwrap().modifying);
    }

    #[test]
    fn skipped_method_keeps_body() {
        let def = method(parse_quote! {
            #[skip]
            async fn ping(&self) -> Result<bool, Error> {
                Ok(true)
            }
        })
        .unwrap();
        assert!(def.skip);
    }

    #[test]
    fn skip_without_body_rejected() {
        assert!(
            method(parse_quote! {
                #[skip]
                async fn ping(&self) -> Result<bool, Error>;
            })
            .is_err()
        );
    }

    #[test]
    fn body_without_skip_rejected() {
        assert!(
            method(parse_quote! {
                async fn find_by_id(&self, id: i64) -> Result<Option<User>, Error> {
                    Ok(None)
                }
            })
            .is_err()
        );
    }

    #[test]
    fn unknown_prefix_rejected() {
        let err = method(parse_quote! {
            async fn lookup_by_email(&self, email: String) -> Result<Option<User>, Error>;
        })
        .unwrap_err();
        assert!(err.to_string().contains("no query prefix"));
    }

    #[test]
    fn misaligned_name_rejected() {
        assert!(
            method(parse_quote! {
                async fn find_by_email(&self, mail: String) -> Result<Option<User>, Error>;
            })
            .is_err()
        );
        assert!(
            method(parse_quote! {
                async fn find_by_email_and_age(&self, email: String) -> Result<Option<User>, Error>;
            })
            .is_err()
        );
        assert!(
            method(parse_quote! {
                async fn find_by_email(&self, email: String) -> Result<Vec<User>, Error>;
            })
            .is_err()
        );
    }

    #[test]
    fn sync_method_rejected() {
        assert!(
            method(parse_quote! {
                fn find_by_id(&self, id: i64) -> Result<Option<User>, Error>;
            })
            .is_err()
        );
    }

    #[test]
    fn missing_receiver_reports_one_error() {
        let err = method(parse_quote! {
            async fn find_by_id(id: i64) -> Result<Option<User>, Error>;
        })
        .unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err.to_string().contains("`&self`"));
    }

    #[test]
    fn missing_result_rejected() {
        assert!(
            method(parse_quote! {
                async fn find_by_id(&self, id: i64) -> Option<User>;
            })
            .is_err()
        );
    }

    #[test]
    fn repository_rejects_associated_items() {
        let args = RepositoryArgs::parse(quote!(entity = User)).unwrap();
        let item: ItemTrait = parse_quote! {
            pub trait UserRepository {
                const LIMIT: usize;
            }
        };
        assert!(RepositoryDef::new(args, item).is_err());
    }

    #[test]
    fn repository_collects_methods() {
        let args = RepositoryArgs::parse(quote!(entity = User)).unwrap();
        let item: ItemTrait = parse_quote! {
            pub trait UserRepository {
                async fn find_by_id(&self, id: i64) -> Result<Option<User>, Error>;

                #[skip]
                async fn ping(&self) -> Result<bool, Error> {
                    Ok(true)
                }
            }
        };
        let def = RepositoryDef::new(args, item).unwrap();
        assert_eq!(def.ident(), "UserRepository");
        assert_eq!(def.methods.len(), 2);
    }
}
