//! Factory resolution and the invocable factory it produces.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::constructor::{BoxedArg, Constructor, ParameterInfo};
use crate::error::{DiError, DiResult};
use crate::factory::assignability::{Assignability, Converter};
use crate::factory::index::RegistrationIndex;
use crate::factory::matcher::is_match;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Caster, IndexEntry};
use crate::traits::ResolverCore;

/// A request for a parameterised factory.
///
/// `shape` is the factory handle type (`Factory2<String, u32, dyn Widget>`),
/// `service` the type it produces and `arguments` the explicit argument types
/// in call order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactoryRequest {
    shape: Key,
    service: Key,
    arguments: Vec<Key>,
}

impl FactoryRequest {
    pub fn new(shape: Key, service: Key, arguments: Vec<Key>) -> Self {
        Self {
            shape,
            service,
            arguments,
        }
    }

    pub fn shape(&self) -> Key {
        self.shape
    }

    pub fn service(&self) -> Key {
        self.service
    }

    pub fn arguments(&self) -> &[Key] {
        &self.arguments
    }

    pub fn argument_names(&self) -> Vec<&'static str> {
        names(&self.arguments)
    }
}

fn names(keys: &[Key]) -> Vec<&'static str> {
    keys.iter().map(Key::display_name).collect()
}

/// A factory bound to one constructor of one implementation type.
///
/// Resolved once per (service type, argument signature); the chosen
/// constructor never changes afterwards. Leading dependencies are resolved on
/// every [`invoke`](Self::invoke), never at resolution time.
pub struct ResolvedFactory {
    service: Key,
    implementation: Key,
    constructor: Constructor,
    split: usize,
    arguments: Vec<Key>,
    converters: Vec<Option<Converter>>,
    cast: Caster,
}

impl ResolvedFactory {
    pub fn service(&self) -> Key {
        self.service
    }

    pub fn implementation(&self) -> Key {
        self.implementation
    }

    /// Number of explicit arguments.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn argument_types(&self) -> &[Key] {
        &self.arguments
    }

    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    /// Parameters resolved from the container on each invocation.
    pub fn leading_parameters(&self) -> &[ParameterInfo] {
        &self.constructor.parameters()[..self.split]
    }

    /// Parameters bound to the explicit arguments.
    pub fn trailing_parameters(&self) -> &[ParameterInfo] {
        &self.constructor.parameters()[self.split..]
    }

    /// Constructs a new service instance.
    ///
    /// Leading parameters are resolved through `resolver`, each under its own
    /// lifetime; `arguments` fill the trailing parameters in order. Returns
    /// the erased `Arc` of the service type.
    pub fn invoke(&self, resolver: &dyn ResolverCore, arguments: Vec<BoxedArg>) -> DiResult<AnyArc> {
        if arguments.len() != self.arguments.len() {
            return Err(DiError::ArityMismatch {
                service: self.service.display_name(),
                expected: self.arguments.len(),
                actual: arguments.len(),
            });
        }

        let supplied = arguments
            .into_iter()
            .zip(&self.converters)
            .map(|(argument, converter)| match converter {
                Some(convert) => convert(argument),
                None => Ok(argument),
            })
            .collect::<DiResult<Vec<_>>>()?;

        let ctx = ResolverContext::new(resolver);
        let value = self
            .constructor
            .activate(&ctx, self.implementation, self.split, supplied)?;
        (self.cast)(value)
    }

    // Appends a cast applied after the registration's own.
    pub(crate) fn then_cast(mut self, next: Caster) -> Self {
        let first = self.cast;
        self.cast = Arc::new(move |value: AnyArc| -> DiResult<AnyArc> { next(first(value)?) });
        self
    }
}

impl fmt::Debug for ResolvedFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFactory")
            .field("service", &self.service)
            .field("implementation", &self.implementation)
            .field("constructor", &self.constructor)
            .field("split", &self.split)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// The factory resolution algorithm over an index and an assignability table.
pub(crate) struct FactoryResolver<'a> {
    index: &'a RegistrationIndex,
    assignability: &'a Assignability,
}

impl<'a> FactoryResolver<'a> {
    pub(crate) fn new(index: &'a RegistrationIndex, assignability: &'a Assignability) -> Self {
        Self {
            index,
            assignability,
        }
    }

    pub(crate) fn resolve(&self, service: Key, arguments: &[Key]) -> DiResult<ResolvedFactory> {
        let entry = self.lookup(&service, arguments)?;
        self.resolve_entry(service, entry, arguments)
    }

    /// The single registration of `service`, with the requested argument
    /// types attached to a lookup failure.
    pub(crate) fn lookup(&self, service: &Key, arguments: &[Key]) -> DiResult<&'a IndexEntry> {
        self.index.lookup(service).map_err(|err| match err {
            DiError::NotRegistered {
                service,
                registrations,
                ..
            } => DiError::NotRegistered {
                service,
                arguments: names(arguments),
                registrations,
            },
            other => other,
        })
    }

    /// Resolves against a specific registration.
    ///
    /// `service` names the requested type in diagnostics; it may differ from
    /// the registration's own key for explicitly registered shapes.
    pub(crate) fn resolve_entry(
        &self,
        service: Key,
        entry: &IndexEntry,
        arguments: &[Key],
    ) -> DiResult<ResolvedFactory> {
        let descriptor = &entry.descriptor;
        debug!(
            service = %service,
            registration = %descriptor.key,
            lifetime = %descriptor.lifetime,
            "resolving parameterised factory"
        );

        let implementation = descriptor.implementation.unwrap_or(descriptor.key);

        if descriptor.lifetime != Lifetime::Transient {
            return Err(DiError::InvalidLifetime {
                service: service.display_name(),
                implementation: implementation.display_name(),
                arguments: names(arguments),
                lifetime: descriptor.lifetime,
            });
        }
        let no_match = || DiError::NoMatchingConstructor {
            service: service.display_name(),
            implementation: implementation.display_name(),
            arguments: names(arguments),
        };

        // Value and closure registrations declare no constructors.
        let activator = entry.activator.as_ref().ok_or_else(no_match)?;

        let mut candidates = activator
            .constructors
            .iter()
            .filter(|constructor| is_match(constructor.parameters(), arguments, self.assignability));

        let constructor = match (candidates.next(), candidates.count()) {
            (None, _) => return Err(no_match()),
            (Some(constructor), 0) => constructor.clone(),
            (Some(_), more) => {
                return Err(DiError::AmbiguousConstructor {
                    service: service.display_name(),
                    implementation: implementation.display_name(),
                    arguments: names(arguments),
                    candidates: more + 1,
                })
            }
        };

        let split = constructor.arity() - arguments.len();
        let converters = arguments
            .iter()
            .zip(&constructor.parameters()[split..])
            .map(|(argument, parameter)| {
                let target = parameter.parameter_type();
                if *argument == target {
                    None
                } else {
                    self.assignability.converter(*argument, target)
                }
            })
            .collect();

        debug!(
            service = %service,
            implementation = %implementation,
            split,
            "constructor selected"
        );

        Ok(ResolvedFactory {
            service,
            implementation,
            constructor,
            split,
            arguments: arguments.to_vec(),
            converters,
            cast: activator.cast.clone(),
        })
    }
}
