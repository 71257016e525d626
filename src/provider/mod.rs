//! Service provider module for dependency injection.
//!
//! This module contains the ServiceProvider type and related functionality
//! for resolving registered services from the DI container.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ContainerOptions;
use crate::descriptors::ServiceDescriptor;
use crate::factory::{FactoryRequest, FactorySupport, ResolvedFactory};
use crate::internal::with_circular_catch;
use crate::observer::Observers;
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::ResolverCore;
use crate::{DiError, DiResult, Key, Lifetime};

pub mod context;
pub mod scope;
pub use context::ResolverContext;
pub use scope::Scope;

/// Service provider for resolving dependencies from the DI container.
///
/// The `ServiceProvider` resolves services according to their registered
/// lifetimes (Singleton, Scoped, Transient) and serves parameterised factory
/// requests.
///
/// # Thread Safety
///
/// ServiceProvider is fully thread-safe and can be shared across multiple threads.
/// Singleton services are cached with proper synchronization, and the provider
/// can be cloned cheaply (it uses `Arc` internally).
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
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>() }
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registry: Registry,
    pub(crate) observers: Observers,
    pub(crate) factories: FactorySupport,
    pub(crate) options: ContainerOptions,
}

impl ServiceProvider {
    pub(crate) fn new(
        registry: Registry,
        observers: Observers,
        factories: FactorySupport,
        options: ContainerOptions,
    ) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                observers,
                factories,
                options,
            }),
        }
    }

    /// Convenience accessor for the inner provider
    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_factory::{ServiceCollection, Resolver};
    /// use std::sync::{Arc, Mutex};
    ///
    /// struct RequestId(String);
    ///
    /// let mut collection = ServiceCollection::new();
    /// let counter = Arc::new(Mutex::new(0));
    /// let counter_clone = counter.clone();
    ///
    /// collection.add_scoped_factory::<RequestId, _>(move |_| {
    ///     let mut c = counter_clone.lock().unwrap();
    ///     *c += 1;
    ///     RequestId(format!("req-{}", *c))
    /// });
    ///
    /// let provider = collection.build();
    ///
    /// let scope1 = provider.create_scope();
    /// let scope2 = provider.create_scope();
    ///
    /// let req1a = scope1.get_required::<RequestId>();
    /// let req1b = scope1.get_required::<RequestId>(); // Same instance
    /// let req2 = scope2.get_required::<RequestId>(); // Different instance
    ///
    /// assert!(Arc::ptr_eq(&req1a, &req1b));
    /// assert!(!Arc::ptr_eq(&req1a, &req2));
    /// ```
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone())
    }

    /// Options the provider was built with.
    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// The single registration of `service`, as seen by parameterised factories.
    ///
    /// Fails with `DiError::NotRegistered` when there is no registration or
    /// more than one.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_factory::{DiError, Key, Lifetime, ServiceCollection};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(1u8);
    /// services.add_singleton(2u16);
    /// services.add_singleton(3u16);
    ///
    /// let provider = services.build();
    /// let descriptor = provider.lookup_registration(&Key::of::<u8>()).unwrap();
    /// assert_eq!(descriptor.lifetime, Lifetime::Singleton);
    ///
    /// assert!(matches!(
    ///     provider.lookup_registration(&Key::of::<u16>()),
    ///     Err(DiError::NotRegistered { registrations: 2, .. })
    /// ));
    /// ```
    pub fn lookup_registration(&self, service: &Key) -> DiResult<ServiceDescriptor> {
        self.inner.factories.index().descriptor(service)
    }

    /// Number of registrations recorded for `service`.
    pub fn registration_count(&self, service: &Key) -> usize {
        self.inner.factories.index().registrations(service)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Service Provider Debug ===\n");
        for entry in self.inner.registry.log() {
            let descriptor = &entry.descriptor;
            s.push_str(&format!(
                "  {}: {} (implementation: {}, constructors: {})\n",
                descriptor.type_name(),
                descriptor.lifetime,
                descriptor.implementation_name().unwrap_or("-"),
                descriptor.constructors
            ));
        }
        s
    }

    /// Runs `resolve` between observer notifications.
    #[inline]
    pub(crate) fn observed<F>(&self, key: &Key, resolve: F) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return resolve();
        }

        let start = Instant::now();
        observers.resolving(key);
        let result = resolve();
        observers.resolved(key, start.elapsed());
        result
    }

    /// Singleton resolution using the registration's embedded OnceCell
    pub(crate) fn resolve_singleton(&self, reg: &Registration) -> DiResult<AnyArc> {
        let Some(cell) = &reg.single_runtime else {
            return Err(DiError::WrongLifetime("Singleton registration has no cache cell"));
        };

        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }

        // Singletons always build against the root, never a scope.
        let ctx = ResolverContext::new(self);
        let value = (reg.ctor)(&ctx)?;
        Ok(cell.get_or_init(|| value).clone())
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        let reg = self
            .inner
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;

        self.observed(key, || match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg),
            Lifetime::Scoped => Err(DiError::WrongLifetime(
                "Cannot resolve scoped service from root provider",
            )),
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        })
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let max_depth = self.inner.options.max_resolution_depth;
        with_circular_catch(key.display_name(), max_depth, || self.resolve_any_impl(key))
    }

    fn contains(&self, key: &Key) -> bool {
        self.inner.registry.contains_key(key)
    }

    fn handle(&self) -> Arc<dyn ResolverCore> {
        Arc::new(self.clone())
    }

    fn resolve_factory(&self, request: &FactoryRequest) -> DiResult<Arc<ResolvedFactory>> {
        self.inner.factories.resolve(request, &self.inner.observers)
    }

    fn factory_enabled(&self, shape: &Key) -> bool {
        self.inner.factories.enabled(shape)
    }

    fn resolve_explicit(&self, shape: &Key) -> Option<DiResult<AnyArc>> {
        let explicit = self.inner.factories.explicit(shape)?;
        Some(
            self.resolve_any(&explicit.implementation)
                .and_then(|value| (explicit.cast)(value)),
        )
    }
}
