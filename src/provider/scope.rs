//! Scoped service resolution.
//!
//! This module contains the Scope type for request-scoped services.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::ResolverContext;
use super::ServiceProvider;
use crate::factory::{FactoryRequest, ResolvedFactory};
use crate::internal::with_circular_catch;
use crate::registration::{AnyArc, Registration};
use crate::traits::ResolverCore;
use crate::{DiError, DiResult, Key, Lifetime};

/// Scoped service container for request-scoped dependency resolution.
///
/// A `Scope` provides isolated dependency resolution for scoped services while
/// still accessing singleton services from the root provider.
///
/// # Lifetime Behavior
///
/// - **Singleton**: Resolved and cached in the root provider (shared across all scopes)
/// - **Scoped**: Resolved and cached within this specific scope
/// - **Transient**: Created fresh on every resolution (no caching)
///
/// Cloning a scope yields another handle to the same scope. Factory handles
/// obtained from a scope keep it alive and resolve scoped leading
/// dependencies in it.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct DatabaseConnection(String);
///
/// struct UserService {
///     db: Arc<DatabaseConnection>,
/// }
///
/// let mut collection = ServiceCollection::new();
///
/// // Scoped database connection per request
/// collection.add_scoped_factory::<DatabaseConnection, _>(|_| {
///     DatabaseConnection("connection-123".to_string())
/// });
///
/// // Transient user service that uses scoped DB connection
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService {
///         db: resolver.get_required::<DatabaseConnection>(),
///     }
/// });
///
/// let provider = collection.build();
/// let scope = provider.create_scope();
///
/// // Multiple services in the same scope share the same DB connection
/// let user1 = scope.get_required::<UserService>();
/// let user2 = scope.get_required::<UserService>();
/// assert!(Arc::ptr_eq(&user1.db, &user2.db));
/// ```
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    root: ServiceProvider,
    // Slot-based scoped storage for O(1) access
    scoped_cells: Box<[OnceCell<AnyArc>]>,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        let scoped_cells: Box<[OnceCell<AnyArc>]> = (0..root.inner().registry.scoped_count)
            .map(|_| OnceCell::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            inner: Arc::new(ScopeInner { root, scoped_cells }),
        }
    }

    /// The provider this scope was created from.
    pub fn root(&self) -> &ServiceProvider {
        &self.inner.root
    }

    fn resolve_scoped(&self, reg: &Registration) -> DiResult<AnyArc> {
        let Some(slot) = reg.scoped_slot else {
            return Err(DiError::WrongLifetime("Scoped registration has no slot"));
        };
        let cell = &self.inner.scoped_cells[slot];

        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }

        // Build outside the cell so the factory can resolve other scoped services.
        let ctx = ResolverContext::new(self);
        let value = (reg.ctor)(&ctx)?;
        Ok(cell.get_or_init(|| value).clone())
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        let root = &self.inner.root;
        let reg = root
            .inner()
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;

        root.observed(key, || match reg.lifetime {
            // Delegate to root provider's singleton resolution
            Lifetime::Singleton => root.resolve_singleton(reg),
            Lifetime::Scoped => self.resolve_scoped(reg),
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        })
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let max_depth = self.inner.root.options().max_resolution_depth;
        with_circular_catch(key.display_name(), max_depth, || self.resolve_any_impl(key))
    }

    fn contains(&self, key: &Key) -> bool {
        self.inner.root.contains(key)
    }

    fn handle(&self) -> Arc<dyn ResolverCore> {
        Arc::new(self.clone())
    }

    fn resolve_factory(&self, request: &FactoryRequest) -> DiResult<Arc<ResolvedFactory>> {
        self.inner.root.resolve_factory(request)
    }

    fn factory_enabled(&self, shape: &Key) -> bool {
        self.inner.root.factory_enabled(shape)
    }

    fn resolve_explicit(&self, shape: &Key) -> Option<DiResult<AnyArc>> {
        let explicit = self.inner.root.inner().factories.explicit(shape)?;
        // Resolved through the scope so scoped implementations bind to it.
        Some(
            self.resolve_any(&explicit.implementation)
                .and_then(|value| (explicit.cast)(value)),
        )
    }
}
