//! Service collection module for dependency injection.
//!
//! This module contains the ServiceCollection type and related functionality
//! for registering services, declaring constructors and installing factory
//! support before building a service provider.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ContainerOptions;
use crate::constructor::TypeDescriptor;
use crate::factory::{Assignability, ExplicitFactory, FactorySupport, RegistrationIndex, ServiceFactory};
use crate::observer::Observers;
use crate::provider::ResolverContext;
use crate::registration::{identity_caster, service_caster, Activator, AnyArc, IndexEntry, Registration, Registry};
use crate::{DiObserver, DiResult, Key, Lifetime, ServiceDescriptor, ServiceProvider};

pub struct ServiceCollection {
    registry: Registry,
    observers: Observers,
    assignability: Assignability,
    explicit_factories: HashMap<Key, ExplicitFactory>,
    factory_facility: bool,
    options: ContainerOptions,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            observers: Observers::new(),
            assignability: Assignability::new(),
            explicit_factories: HashMap::new(),
            factory_facility: false,
            options: ContainerOptions::default(),
        }
    }

    fn insert(&mut self, descriptor: ServiceDescriptor, activator: Option<Arc<Activator>>, registration: Registration) {
        self.registry.insert(IndexEntry { descriptor, activator }, registration);
    }

    // ----- Concrete Type Registrations -----

    /// Registers a singleton instance that will be shared across the entire application.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_factory::ServiceCollection;
    /// struct Config {
    ///     database_url: String
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Config {
    ///     database_url: "postgres://localhost".to_string()
    /// });
    /// ```
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let key = Key::of::<T>();
        let stored: AnyArc = Arc::new(Arc::new(value));
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(stored.clone()) };
        self.insert(
            ServiceDescriptor::new(key, Lifetime::Singleton, Some(key)),
            None,
            Registration::new(Lifetime::Singleton, Arc::new(ctor)),
        );
        self
    }

    /// Registers a singleton factory that creates the instance on first request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_factory::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// struct Database { url: String }
    /// struct UserService { db: Arc<Database> }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Database { url: "postgres://localhost".to_string() });
    /// services.add_singleton_factory::<UserService, _>(|resolver| {
    ///     UserService {
    ///         db: resolver.get_required::<Database>()
    ///     }
    /// });
    /// ```
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_closure(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory that creates one instance per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_closure(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory that creates a new instance on every request.
    ///
    /// Closure registrations declare no constructors, so parameterised
    /// factories cannot target them; use [`add_transient_type`](Self::add_transient_type)
    /// for that.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_closure(Lifetime::Transient, factory)
    }

    fn add_closure<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::of::<T>();
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            // Circular dependencies unwind through here as CircularPanic
            Ok(Arc::new(Arc::new(factory(r))))
        };
        self.insert(
            ServiceDescriptor::new(key, lifetime, Some(key)),
            None,
            Registration::new(lifetime, Arc::new(ctor)),
        );
        self
    }

    // ----- Trait Registrations -----

    /// Registers a singleton trait implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_factory::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Logger: Send + Sync {
    ///     fn log(&self, message: &str);
    /// }
    ///
    /// struct FileLogger { path: String }
    /// impl Logger for FileLogger {
    ///     fn log(&self, _message: &str) {}
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// let logger = Arc::new(FileLogger { path: "/var/log/app.log".to_string() });
    /// services.add_singleton_trait::<dyn Logger>(logger);
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let key = Key::of::<T>();
        let stored: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(stored.clone()) };
        self.insert(
            ServiceDescriptor::new(key, Lifetime::Singleton, None),
            None,
            Registration::new(Lifetime::Singleton, Arc::new(ctor)),
        );
        self
    }

    /// Registers a singleton trait factory.
    pub fn add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_closure(Lifetime::Singleton, factory)
    }

    /// Registers a scoped trait factory.
    pub fn add_scoped_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_closure(Lifetime::Scoped, factory)
    }

    /// Registers a transient trait factory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_factory::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait TimeProvider: Send + Sync {
    ///     fn now(&self) -> std::time::SystemTime;
    /// }
    ///
    /// struct SystemTimeProvider;
    /// impl TimeProvider for SystemTimeProvider {
    ///     fn now(&self) -> std::time::SystemTime {
    ///         std::time::SystemTime::now()
    ///     }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_transient_trait_factory::<dyn TimeProvider, _>(|_| {
    ///     Arc::new(SystemTimeProvider)
    /// });
    /// ```
    pub fn add_transient_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_closure(Lifetime::Transient, factory)
    }

    fn add_trait_closure<Trait, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        let key = Key::of::<Trait>();
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.insert(
            ServiceDescriptor::new(key, lifetime, None),
            None,
            Registration::new(lifetime, Arc::new(ctor)),
        );
        self
    }

    // ----- Typed Registrations (declared constructors) -----

    /// Registers `T` under its own type with declared constructors.
    ///
    /// Ordinary resolution uses the constructor with the most parameters the
    /// container can satisfy. Parameterised factories match against all of them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_factory::{Lifetime, ServiceCollection, Resolver, TypeDescriptor};
    /// use std::sync::Arc;
    ///
    /// struct Settings { retries: u32 }
    /// struct Client { retries: u32 }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Settings { retries: 3 });
    /// services.add_type(
    ///     Lifetime::Scoped,
    ///     TypeDescriptor::<Client>::new()
    ///         .constructor(|| Client { retries: 0 })
    ///         .constructor(|settings: Arc<Settings>| Client { retries: settings.retries }),
    /// );
    ///
    /// let provider = services.build();
    /// let scope = provider.create_scope();
    /// assert_eq!(scope.get_required::<Client>().retries, 3);
    /// ```
    pub fn add_type<T>(&mut self, lifetime: Lifetime, descriptor: TypeDescriptor<T>) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        let activator = Activator {
            implementation: Key::of::<T>(),
            constructors: descriptor.into_constructors(),
            cast: identity_caster(),
        };
        self.add_activator(Key::of::<T>(), lifetime, activator)
    }

    pub fn add_transient_type<T: Send + Sync + 'static>(&mut self, descriptor: TypeDescriptor<T>) -> &mut Self {
        self.add_type(Lifetime::Transient, descriptor)
    }

    pub fn add_scoped_type<T: Send + Sync + 'static>(&mut self, descriptor: TypeDescriptor<T>) -> &mut Self {
        self.add_type(Lifetime::Scoped, descriptor)
    }

    pub fn add_singleton_type<T: Send + Sync + 'static>(&mut self, descriptor: TypeDescriptor<T>) -> &mut Self {
        self.add_type(Lifetime::Singleton, descriptor)
    }

    /// Registers implementation `I` under service type `S`, usually a `dyn Trait`.
    ///
    /// `cast` turns the implementation into the service. It also makes
    /// `Arc<I>` assignable to `Arc<S>` when matching factory arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_factory::{Lifetime, ServiceCollection, Resolver, TypeDescriptor};
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English { name: String }
    /// impl Greeter for English {
    ///     fn greet(&self) -> String { format!("Hello, {}", self.name) }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_type_as::<dyn Greeter, _, _>(
    ///     Lifetime::Transient,
    ///     TypeDescriptor::<English>::new().constructor(|name: String| English { name }),
    ///     |english| english as Arc<dyn Greeter>,
    /// );
    /// services.add_factory_facility();
    ///
    /// let provider = services.build();
    /// let factory = provider.factory1::<String, dyn Greeter>().unwrap();
    /// assert_eq!(factory.create("Ada".to_string()).unwrap().greet(), "Hello, Ada");
    /// ```
    pub fn add_type_as<S, I, F>(&mut self, lifetime: Lifetime, descriptor: TypeDescriptor<I>, cast: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Send + Sync + 'static,
        F: Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
    {
        let cast = Arc::new(cast);
        let conversion = cast.clone();
        self.assignability
            .add::<Arc<I>, Arc<S>, _>(move |implementation| conversion(implementation));

        let activator = Activator {
            implementation: Key::of::<I>(),
            constructors: descriptor.into_constructors(),
            cast: service_caster::<S, I, _>(move |implementation| cast(implementation)),
        };
        self.add_activator(Key::of::<S>(), lifetime, activator)
    }

    fn add_activator(&mut self, key: Key, lifetime: Lifetime, activator: Activator) -> &mut Self {
        let activator = Arc::new(activator);
        let descriptor = ServiceDescriptor::new(key, lifetime, Some(activator.implementation))
            .with_constructors(activator.constructors.len());
        let ctor_activator = activator.clone();
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { ctor_activator.activate(r) };
        self.insert(
            descriptor,
            Some(activator),
            Registration::new(lifetime, Arc::new(ctor)),
        );
        self
    }

    // ----- Parameterised Factories -----

    /// Declares `From` assignable to `To` for factory argument matching.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_factory::{ServiceCollection, Resolver, TypeDescriptor};
    ///
    /// struct Label { text: String }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_transient_type(
    ///     TypeDescriptor::<Label>::new().constructor(|text: String| Label { text }),
    /// );
    /// services.add_conversion::<&'static str, String, _>(|s| s.to_string());
    /// services.add_factory_facility();
    ///
    /// let provider = services.build();
    /// let factory = provider.factory1::<&'static str, Label>().unwrap();
    /// assert_eq!(factory.create("ok").unwrap().text, "ok");
    /// ```
    pub fn add_conversion<From, To, F>(&mut self, convert: F) -> &mut Self
    where
        From: Send + 'static,
        To: Send + 'static,
        F: Fn(From) -> To + Send + Sync + 'static,
    {
        self.assignability.add::<From, To, F>(convert);
        self
    }

    /// Installs factory support for every registered service and all arities.
    ///
    /// Requests for `FactoryN<.., S>` are redirected to the single
    /// registration of `S` and its implementation type's constructors.
    pub fn add_factory_facility(&mut self) -> &mut Self {
        self.factory_facility = true;
        self
    }

    /// Registers factory shape `F` to build implementation `I`.
    ///
    /// `I` is looked up under its own registration, which must be transient
    /// for shapes with arguments. A `Factory0` shape resolves `I` with its
    /// registered lifetime on every `create`. Works with or without the facility, and takes precedence over it for
    /// this shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_factory::{Factory1, ServiceCollection, Resolver, TypeDescriptor};
    /// use std::sync::Arc;
    ///
    /// trait Shape: Send + Sync {
    ///     fn area(&self) -> f64;
    /// }
    ///
    /// struct Square { side: f64 }
    /// impl Shape for Square {
    ///     fn area(&self) -> f64 { self.side * self.side }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_transient_type(
    ///     TypeDescriptor::<Square>::new().constructor(|side: f64| Square { side }),
    /// );
    /// services.add_factory::<Factory1<f64, dyn Shape>, Square, _>(|square| square as Arc<dyn Shape>);
    ///
    /// let provider = services.build();
    /// let factory = provider.factory1::<f64, dyn Shape>().unwrap();
    /// assert_eq!(factory.create(3.0).unwrap().area(), 9.0);
    /// ```
    pub fn add_factory<F, I, C>(&mut self, cast: C) -> &mut Self
    where
        F: ServiceFactory,
        I: Send + Sync + 'static,
        C: Fn(Arc<I>) -> Arc<F::Service> + Send + Sync + 'static,
    {
        self.explicit_factories.insert(
            Key::of::<F>(),
            ExplicitFactory {
                implementation: Key::of::<I>(),
                cast: service_caster::<F::Service, I, C>(cast),
            },
        );
        self
    }

    // ----- Observers and Options -----

    /// Adds a diagnostic observer for resolution events.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_factory::{ServiceCollection, LoggingObserver};
    /// use std::sync::Arc;
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_observer(Arc::new(LoggingObserver::new()));
    /// let provider = services.build();
    /// ```
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Replaces the options applied by [`build`](Self::build).
    pub fn with_options(&mut self, options: ContainerOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    // ----- Service Descriptors and Introspection -----

    /// Get all service descriptors for introspection and diagnostics.
    ///
    /// One descriptor per registration call, in registration order,
    /// duplicates included.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_factory::{ServiceCollection, Lifetime};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(42usize);
    /// services.add_scoped_factory::<String, _>(|_| "hello".to_string());
    /// services.add_singleton(7usize);
    ///
    /// let descriptors = services.get_service_descriptors();
    /// assert_eq!(descriptors.len(), 3);
    /// assert_eq!(descriptors[1].lifetime, Lifetime::Scoped);
    /// assert_eq!(descriptors[0].key, descriptors[2].key);
    /// ```
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .log()
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Builds the service provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_factory::{ServiceCollection, Resolver};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(42usize);
    /// services.add_singleton("Hello".to_string());
    ///
    /// let provider = services.build();
    /// let number = provider.get_required::<usize>();
    /// let text = provider.get_required::<String>();
    ///
    /// assert_eq!(*number, 42);
    /// assert_eq!(&*text, "Hello");
    /// ```
    pub fn build(mut self) -> ServiceProvider {
        // Finalize registry by assigning scoped slot indices
        self.registry.finalize();

        let mut assignability = if self.options.numeric_widening {
            Assignability::with_numeric_widening()
        } else {
            Assignability::new()
        };
        assignability.extend(&self.assignability);

        let factories = FactorySupport::new(
            self.factory_facility,
            self.explicit_factories,
            RegistrationIndex::build(self.registry.log()),
            assignability,
            self.options.cache_resolved_factories,
        );

        ServiceProvider::new(self.registry, self.observers, factories, self.options)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
