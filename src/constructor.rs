//! Declared constructors.
//!
//! Rust has no runtime reflection, so an implementation type states its
//! constructors when it is registered. A constructor is any
//! `Fn(P1, .., Pn) -> T` whose parameters implement [`Parameter`]; its
//! parameter list is recorded as [`ParameterInfo`] so parameterised
//! factories can match trailing parameters against argument types before
//! anything is activated.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::provider::ResolverContext;
use crate::registration::AnyArc;
use crate::traits::{Resolver, ResolverCore};

/// A caller-supplied constructor argument, boxed for erased invocation.
pub type BoxedArg = Box<dyn Any + Send>;

/// A type that can appear as a constructor parameter.
///
/// In leading position the value is resolved from the container; in trailing
/// position it is supplied by the caller of a factory.
///
/// # Examples
///
/// A newtype that resolves through the container:
///
/// ```
/// use ferrous_factory::{DiResult, Key, Parameter, Resolver, ResolverContext};
/// use std::sync::Arc;
///
/// struct Port(u16);
///
/// impl Parameter for Port {
///     fn service_type() -> Key {
///         Key::of::<u16>()
///     }
///
///     fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
///         ctx.get::<u16>().map(|port| Port(*port))
///     }
/// }
/// ```
pub trait Parameter: Sized + Send + 'static {
    /// The service type resolved for this parameter in leading position.
    fn service_type() -> Key;

    /// Resolves the parameter from the container.
    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self>;

    /// Whether `resolver` can currently satisfy this parameter.
    fn can_resolve(resolver: &dyn ResolverCore) -> bool {
        resolver.contains(&Self::service_type())
    }
}

impl<T: ?Sized + Send + Sync + 'static> Parameter for Arc<T> {
    fn service_type() -> Key {
        Key::of::<T>()
    }

    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
        ctx.get::<T>()
    }
}

macro_rules! value_parameter {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Parameter for $ty {
                fn service_type() -> Key {
                    Key::of::<$ty>()
                }

                fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
                    ctx.get::<$ty>().map(|value| (*value).clone())
                }
            }
        )*
    };
}

value_parameter!(
    String, bool, char,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
);

/// Static description of one constructor parameter.
#[derive(Clone, Copy)]
pub struct ParameterInfo {
    parameter_type: Key,
    service_type: Key,
    can_resolve: fn(&dyn ResolverCore) -> bool,
}

impl ParameterInfo {
    pub fn of<P: Parameter>() -> Self {
        Self {
            parameter_type: Key::of::<P>(),
            service_type: P::service_type(),
            can_resolve: P::can_resolve,
        }
    }

    /// The declared parameter type, matched against factory argument types.
    pub fn parameter_type(&self) -> Key {
        self.parameter_type
    }

    /// The service type resolved when the parameter is in leading position.
    pub fn service_type(&self) -> Key {
        self.service_type
    }

    pub(crate) fn can_resolve(&self, resolver: &dyn ResolverCore) -> bool {
        (self.can_resolve)(resolver)
    }
}

impl fmt::Debug for ParameterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterInfo")
            .field("parameter_type", &self.parameter_type)
            .field("service_type", &self.service_type)
            .finish()
    }
}

pub(crate) struct Activation {
    /// Positions below `split` are resolved from the container.
    pub(crate) split: usize,
    pub(crate) implementation: Key,
    pub(crate) supplied: Vec<BoxedArg>,
}

type Activate = Arc<dyn for<'a> Fn(&ResolverContext<'a>, Activation) -> DiResult<AnyArc> + Send + Sync>;

fn activate_fn<F>(f: F) -> Activate
where
    F: for<'a> Fn(&ResolverContext<'a>, Activation) -> DiResult<AnyArc> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A declared constructor: its parameter list and the erased call.
#[derive(Clone)]
pub struct Constructor {
    parameters: Arc<[ParameterInfo]>,
    invoke: Activate,
}

impl Constructor {
    /// Declared parameters in order.
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Calls the constructor. The first `split` parameters are resolved from
    /// `ctx`; the rest are taken from `supplied` in order.
    pub(crate) fn activate(
        &self,
        ctx: &ResolverContext<'_>,
        implementation: Key,
        split: usize,
        supplied: Vec<BoxedArg>,
    ) -> DiResult<AnyArc> {
        (self.invoke)(
            ctx,
            Activation {
                split,
                implementation,
                supplied,
            },
        )
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.parameters.iter().map(|p| p.parameter_type()))
            .finish()
    }
}

// A missing leading dependency is reported against the type being activated.
fn resolve_leading<P: Parameter>(ctx: &ResolverContext<'_>, implementation: Key) -> DiResult<P> {
    let dependency = P::service_type();
    P::resolve(ctx).map_err(|err| match err {
        DiError::NotFound(name) if name == dependency.display_name() => DiError::UnresolvedDependency {
            dependency: dependency.display_name(),
            implementation: implementation.display_name(),
        },
        other => other,
    })
}

fn take_supplied<P: Parameter>(arg: Option<BoxedArg>) -> DiResult<P> {
    let mismatch = || DiError::TypeMismatch(std::any::type_name::<P>());
    arg.ok_or_else(mismatch)?
        .downcast::<P>()
        .map(|value| *value)
        .map_err(|_| mismatch())
}

/// Conversion of a closure or function into a [`Constructor`] for `T`.
///
/// Implemented for `Fn(P1, .., Pn) -> T` with up to eight parameters.
pub trait IntoConstructor<T, Params>: Send + Sync + 'static {
    fn into_constructor(self) -> Constructor;
}

macro_rules! impl_into_constructor {
    ($($P:ident),*) => {
        impl<T, F, $($P,)*> IntoConstructor<T, ($($P,)*)> for F
        where
            T: Send + Sync + 'static,
            F: Fn($($P),*) -> T + Send + Sync + 'static,
            $($P: Parameter,)*
        {
            #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
            fn into_constructor(self) -> Constructor {
                let parameters: Arc<[ParameterInfo]> = Arc::from(vec![$(ParameterInfo::of::<$P>()),*]);
                let invoke = activate_fn(move |ctx, activation| {
                    let Activation { split, implementation, supplied } = activation;
                    let mut supplied = supplied.into_iter();
                    let mut position = 0usize;
                    $(
                        let $P: $P = if position < split {
                            resolve_leading::<$P>(ctx, implementation)?
                        } else {
                            take_supplied::<$P>(supplied.next())?
                        };
                        position += 1;
                    )*
                    let value: T = (self)($($P),*);
                    Ok(Arc::new(Arc::new(value)) as AnyArc)
                });
                Constructor { parameters, invoke }
            }
        }
    };
}

impl_into_constructor!();
impl_into_constructor!(P1);
impl_into_constructor!(P1, P2);
impl_into_constructor!(P1, P2, P3);
impl_into_constructor!(P1, P2, P3, P4);
impl_into_constructor!(P1, P2, P3, P4, P5);
impl_into_constructor!(P1, P2, P3, P4, P5, P6);
impl_into_constructor!(P1, P2, P3, P4, P5, P6, P7);
impl_into_constructor!(P1, P2, P3, P4, P5, P6, P7, P8);

/// The constructors an implementation type exposes to the container.
///
/// # Examples
///
/// ```
/// use ferrous_factory::TypeDescriptor;
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Widget { clock: Option<Arc<Clock>>, name: String }
///
/// let descriptor = TypeDescriptor::<Widget>::new()
///     .constructor(|name: String| Widget { clock: None, name })
///     .constructor(|clock: Arc<Clock>, name: String| Widget { clock: Some(clock), name });
///
/// assert_eq!(descriptor.constructors().len(), 2);
/// assert_eq!(descriptor.constructors()[1].arity(), 2);
/// ```
pub struct TypeDescriptor<T> {
    constructors: Vec<Constructor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> TypeDescriptor<T> {
    pub fn new() -> Self {
        Self {
            constructors: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declares another constructor.
    pub fn constructor<F, Params>(mut self, f: F) -> Self
    where
        F: IntoConstructor<T, Params>,
    {
        self.constructors.push(f.into_constructor());
        self
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// The implementation type described.
    pub fn implementation(&self) -> Key {
        Key::of::<T>()
    }

    pub(crate) fn into_constructors(self) -> Arc<[Constructor]> {
        Arc::from(self.constructors)
    }
}

impl<T: Send + Sync + 'static> Default for TypeDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}
