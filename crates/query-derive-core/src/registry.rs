// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Implementation registry.
//!
//! Resolves every repository method once at startup into a cached
//! [`BoundStatement`] and dispatches invocations to it.
//!
//! # Resolution
//!
//! ```text
//! MethodDescriptor
//!   ├─ skip                → stored without a statement (hand-written body)
//!   ├─ query = "..."       → template binder
//!   ├─ find_by_ / get_by_  → naming parser → condition tree → SELECT
//!   └─ anything else       → UnresolvableMethod
//! ```
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let registry = RegistryBuilder::new(RegistryConfig::default())
//!     .register::<UserRepositoryDescriptor>()?
//!     .build(pool);
//!
//! let users = registry.repository::<UserRepositoryDescriptor>()?;
//! let user = users.find_by_email("a@x.com".into()).await?;
//! ```
//!
//! Every error is returned by [`RegistryBuilder::register`] before a
//! [`Registry`] exists, so a broken repository is never partially served.
//! Once built, the cache is read-only and shared through an [`Arc`].

use std::{borrow::Cow, collections::HashMap, marker::PhantomData, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    condition::Condition,
    config::{RegistryConfig, UnusedParameterPolicy},
    dialect::Dialect,
    entity::{Entity, EntityDescriptor},
    error::{Error, Result},
    execution::{self, BoundStatement, CommitPolicy, QueryOutput, StatementSource},
    naming::{self, Prefix},
    session::{Bind, SessionFactory},
    signature::{MethodDescriptor, MethodKind, QueryTemplate, ResultShape},
    template,
    value::Value
};

/// A repository whose methods can be registered.
///
/// Implemented by the `<Trait>Descriptor` marker type that `#[repository]`
/// generates next to the trait.
pub trait Repository: Send + Sync + 'static {
    /// Unique repository name (module path plus trait name).
    const NAME: &'static str;

    /// Entity the repository queries.
    type Entity: crate::entity::Entity;

    /// Descriptors of every trait method.
    fn methods() -> Vec<MethodDescriptor>;
}

/// Cache entry for one method.
#[derive(Debug)]
struct Entry {
    descriptor: MethodDescriptor,
    /// `None` for skipped methods.
    statement:  Option<BoundStatement>
}

/// Methods of one repository, resolved against its entity.
#[derive(Debug)]
struct Registered {
    entity:  &'static EntityDescriptor,
    methods: HashMap<&'static str, Entry>
}

type Entries = HashMap<&'static str, Registered>;

/// Collects repositories and resolves their methods.
#[derive(Debug)]
pub struct RegistryBuilder {
    config:  RegistryConfig,
    entries: Entries
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            entries: HashMap::new()
        }
    }

    /// Register every method of `R`.
    ///
    /// # Errors
    ///
    /// Returns the first startup error: [`Error::UnresolvableMethod`],
    /// [`Error::SignatureMismatch`], [`Error::TemplateBinding`] or
    /// [`Error::DuplicateRegistration`].
    pub fn register<R: Repository>(self) -> Result<Self> {
        self.register_methods(R::NAME, <R::Entity as Entity>::descriptor(), R::methods())
    }

    /// Register hand-built descriptors under `repository`.
    ///
    /// # Errors
    ///
    /// See [`RegistryBuilder::register`].
    pub fn register_methods(
        mut self,
        repository: &'static str,
        entity: &'static EntityDescriptor,
        methods: impl IntoIterator<Item = MethodDescriptor>
    ) -> Result<Self> {
        let registered = self.entries.entry(repository).or_insert_with(|| Registered {
            entity,
            methods: HashMap::new()
        });
        if registered.entity != entity {
            warn!(
                repository,
                registered = registered.entity.name,
                requested = entity.name,
                "repository already registered for another entity"
            );
            return Err(Error::DuplicateRegistration {
                repository: repository.to_string(),
                method:     "*".to_string()
            });
        }

        for descriptor in methods {
            let name = descriptor.name();
            let cache = &mut registered.methods;

            if let Some(existing) = cache.get(name) {
                if existing.descriptor.is_compatible_with(&descriptor) {
                    debug!(repository, method = name, "identical re-registration ignored");
                    continue;
                }
                return Err(Error::DuplicateRegistration {
                    repository: repository.to_string(),
                    method:     name.to_string()
                });
            }

            let statement = resolve(&self.config, repository, entity, &descriptor)?;
            cache.insert(
                name,
                Entry {
                    descriptor,
                    statement
                }
            );
        }
        Ok(self)
    }

    /// Freeze the cache and attach the session factory.
    pub fn build<F: SessionFactory>(self, factory: F) -> Registry<F> {
        let methods: usize = self.entries.values().map(|r| r.methods.len()).sum();
        info!(repositories = self.entries.len(), methods, "query registry built");
        Registry {
            inner: Arc::new(Inner {
                config: self.config,
                entries: self.entries,
                factory
            })
        }
    }
}

/// Resolve one method into its bound statement.
fn resolve(
    config: &RegistryConfig,
    repository: &'static str,
    entity: &'static EntityDescriptor,
    descriptor: &MethodDescriptor
) -> Result<Option<BoundStatement>> {
    let method = descriptor.name();
    let statement = match descriptor.kind() {
        MethodKind::Skipped => {
            debug!(repository, method, "skipped, hand-written body");
            return Ok(None);
        }
        MethodKind::Template => match descriptor.template() {
            Some(query) => bind_template(config, repository, entity, descriptor, query)?,
            None => return Err(unresolvable(repository, method))
        },
        MethodKind::Derived => derive(config, repository, entity, descriptor)?,
        MethodKind::Unresolvable => return Err(unresolvable(repository, method))
    };

    debug!(
        repository,
        method,
        shape = %statement.shape,
        policy = ?statement.policy,
        sql = %statement.sql,
        "method registered"
    );
    Ok(Some(statement))
}

fn unresolvable(repository: &str, method: &str) -> Error {
    Error::UnresolvableMethod {
        repository: repository.to_string(),
        method:     method.to_string()
    }
}

/// Build the SELECT of a naming-convention method.
fn derive(
    config: &RegistryConfig,
    repository: &'static str,
    entity: &'static EntityDescriptor,
    descriptor: &MethodDescriptor
) -> Result<BoundStatement> {
    let method = descriptor.name();
    let mismatch = |reason: String| Error::SignatureMismatch {
        repository: repository.to_string(),
        method: method.to_string(),
        reason
    };

    let parsed = naming::parse(method)
        .map_err(|e| mismatch(e.to_string()))?
        .ok_or_else(|| unresolvable(repository, method))?;
    parsed
        .align(descriptor.params(), descriptor.shape())
        .map_err(|e| mismatch(e.to_string()))?;

    let mut columns = Vec::with_capacity(parsed.fields.len());
    for (token, param) in parsed.fields.iter().zip(descriptor.params()) {
        let field = entity
            .field(token)
            .ok_or_else(|| mismatch(format!("`{token}` is not a field of {}", entity.name)))?;
        if !param.ty.is_compatible_with(field.ty) {
            return Err(mismatch(format!(
                "parameter `{}` of type {} cannot be compared with field `{}` of type {}",
                param.name, param.ty, field.name, field.ty
            )));
        }
        columns.push(field.name.to_string());
    }

    let condition = Condition::build(&columns, &parsed.connectors)
        .ok_or_else(|| mismatch("method name has no field tokens".to_string()))?;
    let (predicate, binds) = condition.to_sql(config.dialect);
    let table = entity.qualified_table(config.default_schema.as_deref());

    let sql = match parsed.prefix {
        Prefix::CountBy => format!("SELECT COUNT(*) FROM {table} WHERE {predicate}"),
        Prefix::FindBy | Prefix::GetBy => {
            format!("SELECT {} FROM {table} WHERE {predicate} LIMIT 1", entity.columns())
        }
        Prefix::FindAllBy | Prefix::GetAllBy => {
            format!("SELECT {} FROM {table} WHERE {predicate}", entity.columns())
        }
    };

    Ok(BoundStatement {
        entity,
        source: StatementSource::Derived(condition),
        sql,
        binds,
        shape: descriptor.shape(),
        returns_rows: true,
        policy: CommitPolicy::Discard
    })
}

/// Bind the raw-SQL template of a method.
fn bind_template(
    config: &RegistryConfig,
    repository: &'static str,
    entity: &'static EntityDescriptor,
    descriptor: &MethodDescriptor,
    query: QueryTemplate
) -> Result<BoundStatement> {
    let method = descriptor.name();
    let binding = |reason: String| Error::TemplateBinding {
        repository: repository.to_string(),
        method: method.to_string(),
        reason
    };

    let bound = template::bind(query.sql, descriptor.params(), entity, config.dialect)
        .map_err(|e| binding(e.to_string()))?;

    if !bound.unused.is_empty() {
        let unused = bound.unused.join(", ");
        match config.unused_parameters {
            UnusedParameterPolicy::Deny => {
                return Err(binding(format!("parameter(s) not used by the template: {unused}")));
            }
            UnusedParameterPolicy::Warn => {
                warn!(repository, method, unused = %unused, "template ignores declared parameters");
            }
        }
    }

    let shape = descriptor.shape();
    if !bound.returns_rows && shape != ResultShape::Scalar {
        return Err(binding(format!(
            "statement produces no rows but the method returns a {shape} result"
        )));
    }

    Ok(BoundStatement {
        entity,
        sql: bound.sql.clone(),
        binds: bound.binds.clone(),
        shape,
        returns_rows: bound.returns_rows,
        policy: CommitPolicy::for_modifying(query.modifying),
        source: StatementSource::Template(bound)
    })
}

struct Inner<F> {
    config:  RegistryConfig,
    entries: Entries,
    factory: F
}

/// Read-only method cache plus the session factory.
///
/// Cheap to clone; clones share the cache.
pub struct Registry<F> {
    inner: Arc<Inner<F>>
}

impl<F> Clone for Registry<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner)
        }
    }
}

impl<F: SessionFactory> Registry<F> {
    /// Configuration the registry was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Session factory.
    pub fn factory(&self) -> &F {
        &self.inner.factory
    }

    /// Cached statement of a method, `None` if unknown or skipped.
    pub fn statement(&self, repository: &str, method: &str) -> Option<&BoundStatement> {
        self.entry(repository, method)?.statement.as_ref()
    }

    /// Registered descriptor of a method.
    pub fn descriptor(&self, repository: &str, method: &str) -> Option<&MethodDescriptor> {
        self.entry(repository, method).map(|e| &e.descriptor)
    }

    fn entry(&self, repository: &str, method: &str) -> Option<&Entry> {
        self.inner.entries.get(repository)?.methods.get(method)
    }

    /// Injectable implementation of repository `R`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMethod`] if `R` was never registered.
    pub fn repository<R: Repository>(&self) -> Result<RepositoryHandle<R, F>> {
        if !self.inner.entries.contains_key(R::NAME) {
            return Err(Error::UnknownMethod {
                repository: R::NAME.to_string(),
                method:     "*".to_string()
            });
        }
        Ok(RepositoryHandle {
            registry:    self.clone(),
            _repository: PhantomData
        })
    }

    /// Invoke a method with positional arguments.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownMethod`] for unknown or skipped methods
    /// - [`Error::TemplateBinding`] if the arguments do not fit the declared
    ///   parameters
    /// - [`Error::QueryExecution`] if the driver fails
    pub async fn invoke(&self, repository: &str, method: &str, args: Vec<Value>) -> Result<QueryOutput> {
        let unknown = || Error::UnknownMethod {
            repository: repository.to_string(),
            method:     method.to_string()
        };
        let entry = self.entry(repository, method).ok_or_else(unknown)?;
        let statement = entry.statement.as_ref().ok_or_else(unknown)?;
        let values = check_arguments(repository, &entry.descriptor, args)?;
        let statement = null_aware(statement, self.inner.config.dialect, &values);
        let binds = bind_arguments(repository, &entry.descriptor, &statement, &values)?;

        execution::execute(&self.inner.factory, repository, method, &statement, binds).await
    }
}

/// Re-render a derived predicate for `NULL` arguments.
///
/// The cached SQL compares every field with `=`; a `NULL` argument needs
/// `IS NULL` instead.
fn null_aware<'a>(statement: &'a BoundStatement, dialect: Dialect, values: &[Value]) -> Cow<'a, BoundStatement> {
    let StatementSource::Derived(condition) = &statement.source else {
        return Cow::Borrowed(statement);
    };
    if !values.iter().any(Value::is_null) {
        return Cow::Borrowed(statement);
    }

    let (cached, _) = condition.to_sql(dialect);
    let (predicate, binds) = condition.to_sql_with(dialect, values);
    let mut rewritten = statement.clone();
    rewritten.sql = statement
        .sql
        .replacen(&format!("WHERE {cached}"), &format!("WHERE {predicate}"), 1);
    rewritten.binds = binds;
    Cow::Owned(rewritten)
}

fn binding_error(repository: &str, descriptor: &MethodDescriptor, reason: String) -> Error {
    Error::TemplateBinding {
        repository: repository.to_string(),
        method: descriptor.name().to_string(),
        reason
    }
}

/// Check arguments against the declared parameters.
///
/// Returns the values coerced to the parameter types, in parameter order.
fn check_arguments(repository: &str, descriptor: &MethodDescriptor, args: Vec<Value>) -> Result<Vec<Value>> {
    let binding = |reason: String| binding_error(repository, descriptor, reason);

    let params = descriptor.params();
    if args.len() != params.len() {
        return Err(binding(format!(
            "expected {} argument(s), found {}",
            params.len(),
            args.len()
        )));
    }

    let mut values = Vec::with_capacity(args.len());
    for (arg, param) in args.into_iter().zip(params) {
        let found = arg.value_type();
        let value = arg
            .coerce(param.ty)
            .filter(|value| param.nullable || !value.is_null())
            .ok_or_else(|| {
                binding(format!(
                    "argument `{}` expects {}, found {}",
                    param.name,
                    param.ty,
                    found.map_or_else(|| "NULL".to_string(), |ty| ty.to_string())
                ))
            })?;
        values.push(value);
    }

    Ok(values)
}

/// Order checked argument values by marker slot.
fn bind_arguments(
    repository: &str,
    descriptor: &MethodDescriptor,
    statement: &BoundStatement,
    values: &[Value]
) -> Result<Vec<Bind>> {
    let params = descriptor.params();

    statement
        .binds
        .iter()
        .map(|&idx| {
            let (param, value) = params.get(idx).zip(values.get(idx)).ok_or_else(|| {
                binding_error(
                    repository,
                    descriptor,
                    format!("bind slot refers to missing parameter {idx}")
                )
            })?;
            Ok(Bind {
                ty:    param.ty,
                value: value.clone()
            })
        })
        .collect()
}

/// Injectable implementation of repository `R`.
///
/// `#[repository]` implements the repository trait for this type, so it can
/// be handed to consumers as `Arc<dyn UserRepository>` or by value.
pub struct RepositoryHandle<R, F> {
    registry:    Registry<F>,
    _repository: PhantomData<fn() -> R>
}

impl<R, F> Clone for RepositoryHandle<R, F> {
    fn clone(&self) -> Self {
        Self {
            registry:    self.registry.clone(),
            _repository: PhantomData
        }
    }
}

impl<R: Repository, F: SessionFactory> RepositoryHandle<R, F> {
    /// Invoke a method of `R`.
    ///
    /// # Errors
    ///
    /// See [`Registry::invoke`].
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<QueryOutput> {
        self.registry.invoke(R::NAME, method, args).await
    }

    /// Registry behind the handle.
    pub const fn registry(&self) -> &Registry<F> {
        &self.registry
    }
}
