//! Typed factory handles for zero to three explicit arguments.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::constructor::{BoxedArg, Parameter};
use crate::error::{DiError, DiResult};
use crate::factory::resolution::{FactoryRequest, ResolvedFactory};
use crate::key::Key;
use crate::provider::ResolverContext;
use crate::traits::{Resolver, ResolverCore};

/// A factory handle type that a resolver can produce.
pub trait ServiceFactory: Sized + Send + Sync + 'static {
    /// The type each invocation produces.
    type Service: ?Sized + Send + Sync + 'static;

    /// Explicit argument types in call order.
    fn argument_types() -> Vec<Key>;

    /// The request this shape resolves through.
    fn request() -> FactoryRequest {
        FactoryRequest::new(
            Key::of::<Self>(),
            Key::of::<Self::Service>(),
            Self::argument_types(),
        )
    }

    /// Builds the handle against `resolver`.
    fn resolve<Q: ResolverCore + ?Sized>(resolver: &Q) -> DiResult<Self>;
}

/// Factory with no explicit arguments.
///
/// Each [`create`](Self::create) is an ordinary container resolution of `R`,
/// so `R` keeps its own lifetime: a singleton yields the same instance every
/// time, a transient a fresh one. When the shape was registered with
/// `ServiceCollection::add_factory`, the registered implementation is
/// resolved instead and cast to `R`.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Clock);
/// services.add_factory_facility();
///
/// let provider = services.build();
/// let factory = provider.factory0::<Clock>().unwrap();
/// assert!(Arc::ptr_eq(&factory.create().unwrap(), &factory.create().unwrap()));
/// ```
pub struct Factory0<R: ?Sized> {
    resolver: Arc<dyn ResolverCore>,
    _marker: PhantomData<fn() -> Arc<R>>,
}

impl<R: ?Sized + Send + Sync + 'static> Factory0<R> {
    pub fn create(&self) -> DiResult<Arc<R>> {
        match self.resolver.resolve_explicit(&Key::of::<Self>()) {
            Some(value) => value?
                .downcast::<Arc<R>>()
                .map(|service| (*service).clone())
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<R>())),
            None => (*self.resolver).get::<R>(),
        }
    }
}

impl<R: ?Sized> Clone for Factory0<R> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: ?Sized> fmt::Debug for Factory0<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory0")
            .field("service", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: ?Sized + Send + Sync + 'static> ServiceFactory for Factory0<R> {
    type Service = R;

    fn argument_types() -> Vec<Key> {
        Vec::new()
    }

    fn resolve<Q: ResolverCore + ?Sized>(resolver: &Q) -> DiResult<Self> {
        if !resolver.factory_enabled(&Key::of::<Self>()) {
            return Err(DiError::NotFound(std::any::type_name::<Self>()));
        }
        Ok(Self {
            resolver: resolver.handle(),
            _marker: PhantomData,
        })
    }
}

impl<R: ?Sized + Send + Sync + 'static> Parameter for Factory0<R> {
    fn service_type() -> Key {
        Key::of::<Self>()
    }

    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
        <Self as ServiceFactory>::resolve(ctx)
    }

    fn can_resolve(resolver: &dyn ResolverCore) -> bool {
        resolver.factory_enabled(&Key::of::<Self>())
    }
}

macro_rules! define_factory {
    ($(#[$meta:meta])* $name:ident; $($A:ident $a:ident),+) => {
        $(#[$meta])*
        pub struct $name<$($A,)+ R: ?Sized> {
            factory: Arc<ResolvedFactory>,
            resolver: Arc<dyn ResolverCore>,
            _marker: PhantomData<fn($($A),+) -> Arc<R>>,
        }

        impl<$($A,)+ R> $name<$($A,)+ R>
        where
            $($A: Send + 'static,)+
            R: ?Sized + Send + Sync + 'static,
        {
            /// Constructs a new instance from the explicit arguments.
            ///
            /// Leading dependencies are resolved now, through the resolver this
            /// handle was obtained from.
            pub fn create(&self, $($a: $A),+) -> DiResult<Arc<R>> {
                let arguments = vec![$(Box::new($a) as BoxedArg),+];
                let value = self.factory.invoke(&*self.resolver, arguments)?;
                value
                    .downcast::<Arc<R>>()
                    .map(|service| (*service).clone())
                    .map_err(|_| DiError::TypeMismatch(std::any::type_name::<R>()))
            }

            /// The resolution this handle invokes.
            pub fn resolved(&self) -> &ResolvedFactory {
                &self.factory
            }
        }

        impl<$($A,)+ R: ?Sized> Clone for $name<$($A,)+ R> {
            fn clone(&self) -> Self {
                Self {
                    factory: self.factory.clone(),
                    resolver: self.resolver.clone(),
                    _marker: PhantomData,
                }
            }
        }

        impl<$($A,)+ R: ?Sized> fmt::Debug for $name<$($A,)+ R> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("factory", &self.factory)
                    .finish()
            }
        }

        impl<$($A,)+ R> ServiceFactory for $name<$($A,)+ R>
        where
            $($A: Send + 'static,)+
            R: ?Sized + Send + Sync + 'static,
        {
            type Service = R;

            fn argument_types() -> Vec<Key> {
                vec![$(Key::of::<$A>()),+]
            }

            fn resolve<Q: ResolverCore + ?Sized>(resolver: &Q) -> DiResult<Self> {
                let factory = resolver.resolve_factory(&Self::request())?;
                Ok(Self {
                    factory,
                    resolver: resolver.handle(),
                    _marker: PhantomData,
                })
            }
        }

        impl<$($A,)+ R> Parameter for $name<$($A,)+ R>
        where
            $($A: Send + 'static,)+
            R: ?Sized + Send + Sync + 'static,
        {
            fn service_type() -> Key {
                Key::of::<Self>()
            }

            fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
                <Self as ServiceFactory>::resolve(ctx)
            }

            fn can_resolve(resolver: &dyn ResolverCore) -> bool {
                resolver.factory_enabled(&Key::of::<Self>())
            }
        }
    };
}

define_factory!(
    /// Factory taking one explicit argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_factory::{Factory1, ServiceCollection, Resolver, TypeDescriptor};
    /// use std::sync::Arc;
    ///
    /// struct Logger;
    /// struct Widget { logger: Arc<Logger>, name: String }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Logger);
    /// services.add_transient_type(
    ///     TypeDescriptor::<Widget>::new()
    ///         .constructor(|logger: Arc<Logger>, name: String| Widget { logger, name }),
    /// );
    /// services.add_factory_facility();
    ///
    /// let provider = services.build();
    /// let factory: Factory1<String, Widget> = provider.get_factory().unwrap();
    ///
    /// let a = factory.create("a".to_string()).unwrap();
    /// let b = factory.create("b".to_string()).unwrap();
    /// assert_eq!((a.name.as_str(), b.name.as_str()), ("a", "b"));
    /// assert!(Arc::ptr_eq(&a.logger, &b.logger));
    /// ```
    Factory1; A a
);

define_factory!(
    /// Factory taking two explicit arguments.
    Factory2; A1 a1, A2 a2
);

define_factory!(
    /// Factory taking three explicit arguments.
    Factory3; A1 a1, A2 a2, A3 a3
);
