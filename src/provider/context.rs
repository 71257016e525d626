//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which provides
//! the interface for factory functions to resolve dependencies.

use std::sync::Arc;

use crate::factory::{FactoryRequest, ResolvedFactory};
use crate::registration::AnyArc;
use crate::traits::ResolverCore;
use crate::{DiResult, Key};

/// Context passed to factory functions for resolving dependencies.
///
/// ResolverContext wraps a resolver (ServiceProvider or Scope) and provides
/// the interface that factory closures and declared constructors use to
/// access other services.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database {
///     url: "postgres://localhost".to_string()
/// });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     // resolver is a ResolverContext that provides access to other services
///     UserService {
///         db: resolver.get_required::<Database>(),
///     }
/// });
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    /// Creates a new ResolverContext wrapping the given resolver.
    pub(crate) fn new(resolver: &'a dyn ResolverCore) -> Self {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn contains(&self, key: &Key) -> bool {
        self.resolver.contains(key)
    }

    fn handle(&self) -> Arc<dyn ResolverCore> {
        self.resolver.handle()
    }

    fn resolve_factory(&self, request: &FactoryRequest) -> DiResult<Arc<ResolvedFactory>> {
        self.resolver.resolve_factory(request)
    }

    fn factory_enabled(&self, shape: &Key) -> bool {
        self.resolver.factory_enabled(shape)
    }

    fn resolve_explicit(&self, shape: &Key) -> Option<DiResult<AnyArc>> {
        self.resolver.resolve_explicit(shape)
    }
}
