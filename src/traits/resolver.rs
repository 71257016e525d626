//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::factory::{Factory0, Factory1, Factory2, Factory3, FactoryRequest, ResolvedFactory, ServiceFactory};
use crate::key::Key;
use crate::registration::AnyArc;

/// Core resolver trait for object-safe service resolution.
///
/// This trait provides the fundamental service resolution capabilities that are
/// object-safe (can be used as trait objects). `ServiceProvider`, `Scope` and
/// `ResolverContext` implement it; factory handles hold an
/// `Arc<dyn ResolverCore>` so that every invocation resolves through the
/// resolver they were obtained from.
///
/// Most users should use the [`Resolver`] trait instead, which provides more
/// ergonomic generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service using thread-local stack for circular dependency detection.
    ///
    /// Returns the erased `Arc<T>` for the service, honouring its lifetime.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved service
    /// * `Err(DiError)` - Resolution error (not found, wrong lifetime, circular, etc.)
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;

    /// Whether the container has a registration for `key`.
    fn contains(&self, key: &Key) -> bool;

    /// An owned handle to this resolver.
    ///
    /// Handles to a scope share that scope's cached instances.
    fn handle(&self) -> Arc<dyn ResolverCore>;

    /// Resolves a parameterised factory for `request`.
    ///
    /// The result is independent of the resolver it is later invoked with.
    fn resolve_factory(&self, request: &FactoryRequest) -> DiResult<Arc<ResolvedFactory>>;

    /// Whether factories of the given shape (`Factory1<A, R>` etc.) can be requested.
    ///
    /// True when the factory facility is installed or the shape was registered
    /// explicitly.
    fn factory_enabled(&self, shape: &Key) -> bool;

    /// Resolves the implementation registered for `shape` with
    /// `ServiceCollection::add_factory`, cast to the shape's service type.
    ///
    /// The implementation keeps its own lifetime. `None` when the shape has no
    /// explicit registration.
    fn resolve_explicit(&self, shape: &Key) -> Option<DiResult<AnyArc>>;
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// Implemented for every [`ResolverCore`], including `dyn ResolverCore`.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String {
///         format!("LOG: {}", msg)
///     }
/// }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(42usize);
/// collection.add_singleton_trait(Arc::new(ConsoleLogger) as Arc<dyn Logger>);
///
/// let provider = collection.build();
///
/// // Resolve concrete types
/// let number = provider.get_required::<usize>();
/// assert_eq!(*number, 42);
///
/// // Resolve trait objects the same way
/// let logger = provider.get_required::<dyn Logger>();
/// assert_eq!(logger.log("ready"), "LOG: ready");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a service type, sized or `dyn Trait`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_factory::{ServiceCollection, Resolver};
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_singleton("configuration".to_string());
    ///
    /// let provider = collection.build();
    /// let config = provider.get::<String>().unwrap();
    /// assert_eq!(&*config, "configuration");
    /// ```
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&Key::of::<T>())?;
        any.downcast::<Arc<T>>()
            .map(|stored| (*stored).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a service, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if the service cannot be resolved (not found, wrong lifetime,
    /// circular dependency, etc.).
    fn get_required<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {:?}", std::any::type_name::<T>(), e))
    }

    /// Requests a factory handle of shape `F`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_factory::{Factory1, ServiceCollection, Resolver, TypeDescriptor};
    ///
    /// struct Greeting { text: String }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_transient_type(
    ///     TypeDescriptor::<Greeting>::new().constructor(|text: String| Greeting { text }),
    /// );
    /// services.add_factory_facility();
    ///
    /// let provider = services.build();
    /// let factory = provider.get_factory::<Factory1<String, Greeting>>().unwrap();
    /// assert_eq!(factory.create("hi".to_string()).unwrap().text, "hi");
    /// ```
    fn get_factory<F: ServiceFactory>(&self) -> DiResult<F> {
        F::resolve(self)
    }

    /// Shorthand for `get_factory::<Factory0<R>>()`.
    fn factory0<R>(&self) -> DiResult<Factory0<R>>
    where
        R: ?Sized + Send + Sync + 'static,
    {
        self.get_factory()
    }

    /// Shorthand for `get_factory::<Factory1<A, R>>()`.
    fn factory1<A, R>(&self) -> DiResult<Factory1<A, R>>
    where
        A: Send + 'static,
        R: ?Sized + Send + Sync + 'static,
    {
        self.get_factory()
    }

    /// Shorthand for `get_factory::<Factory2<A1, A2, R>>()`.
    fn factory2<A1, A2, R>(&self) -> DiResult<Factory2<A1, A2, R>>
    where
        A1: Send + 'static,
        A2: Send + 'static,
        R: ?Sized + Send + Sync + 'static,
    {
        self.get_factory()
    }

    /// Shorthand for `get_factory::<Factory3<A1, A2, A3, R>>()`.
    fn factory3<A1, A2, A3, R>(&self) -> DiResult<Factory3<A1, A2, A3, R>>
    where
        A1: Send + 'static,
        A2: Send + 'static,
        A3: Send + 'static,
        R: ?Sized + Send + Sync + 'static,
    {
        self.get_factory()
    }
}

impl<T: ResolverCore + ?Sized> Resolver for T {}
