//! Service lifetime definitions.

use std::fmt;

/// Service lifetimes controlling instance caching behavior
///
/// Defines how service instances are created, cached, and shared within
/// the dependency injection container. Parameterised factories only accept
/// [`Lifetime::Transient`] targets: a fresh argument must always produce a
/// fresh instance.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let mut services = ServiceCollection::new();
///
/// // Singleton: One instance for entire application
/// services.add_singleton(Database {
///     url: "postgres://localhost".to_string()
/// });
///
/// // Transient: New instance every time
/// services.add_transient_factory::<RequestModel, _>(|_| RequestModel { id: 7 });
///
/// let provider = services.build();
///
/// let db1 = provider.get_required::<Database>();
/// let scope = provider.create_scope();
/// let db2 = scope.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// let model1 = scope.get_required::<RequestModel>();
/// let model2 = scope.get_required::<RequestModel>();
/// assert!(!Arc::ptr_eq(&model1, &model2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per root provider, cached forever
    ///
    /// Singleton services are created once when first requested and then
    /// cached in the root provider. The same instance is shared across
    /// all scopes and threads.
    Singleton,
    /// Single instance per scope, cached for scope lifetime
    ///
    /// Multiple requests within the same scope return the same instance,
    /// but different scopes get different instances. Resolving a scoped
    /// service from the root provider is an error.
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Singleton => "Singleton",
            Lifetime::Scoped => "Scoped",
            Lifetime::Transient => "Transient",
        };
        f.write_str(name)
    }
}
