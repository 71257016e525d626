//! Service registration types.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::constructor::Constructor;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::traits::ResolverCore;

// ResolverContext is defined in provider module
pub(crate) use crate::provider::ResolverContext;

/// Type-erased service instance.
///
/// Every service is stored as an `Arc<T>` boxed inside this `Arc`, so the same
/// downcast works for concrete types and for `dyn Trait` services.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Converts an erased implementation instance into an erased service instance.
pub(crate) type Caster = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

pub(crate) fn identity_caster() -> Caster {
    Arc::new(|value: AnyArc| -> DiResult<AnyArc> { Ok(value) })
}

/// Builds a caster from `Arc<I>` to `Arc<S>`.
pub(crate) fn service_caster<S, I, F>(cast: F) -> Caster
where
    S: ?Sized + Send + Sync + 'static,
    I: Send + Sync + 'static,
    F: Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
{
    Arc::new(move |any: AnyArc| {
        let implementation = any
            .downcast::<Arc<I>>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<I>()))?;
        let service: Arc<S> = cast((*implementation).clone());
        Ok(Arc::new(service) as AnyArc)
    })
}

/// Declared constructors of an implementation type plus the cast to its service type.
pub(crate) struct Activator {
    pub(crate) implementation: Key,
    pub(crate) constructors: Arc<[Constructor]>,
    pub(crate) cast: Caster,
}

impl Activator {
    /// Ordinary (non-factory) activation: every parameter comes from the container.
    pub(crate) fn activate(&self, ctx: &ResolverContext<'_>) -> DiResult<AnyArc> {
        let constructor = self.select(ctx)?;
        let value = constructor.activate(ctx, self.implementation, constructor.arity(), Vec::new())?;
        (self.cast)(value)
    }

    // Greediest constructor whose parameters are all resolvable; ties go to the
    // first declared. Falls back to the first constructor so that activation
    // names the missing dependency.
    fn select(&self, resolver: &dyn ResolverCore) -> DiResult<&Constructor> {
        let mut best: Option<&Constructor> = None;
        for constructor in self.constructors.iter() {
            let resolvable = constructor
                .parameters()
                .iter()
                .all(|parameter| parameter.can_resolve(resolver));
            if resolvable && best.map_or(true, |b| constructor.arity() > b.arity()) {
                best = Some(constructor);
            }
        }

        best.or_else(|| self.constructors.first()).ok_or(DiError::NoMatchingConstructor {
            service: self.implementation.display_name(),
            implementation: self.implementation.display_name(),
            arguments: Vec::new(),
        })
    }
}

/// Service registration with lifetime and constructor
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Singleton cache - OnceCell for lock-free access after initialization
    pub(crate) single_runtime: Option<OnceCell<AnyArc>>,
    /// Scoped slot index for O(1) scoped service resolution
    pub(crate) scoped_slot: Option<usize>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor) -> Self {
        let single_runtime = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };

        Self {
            lifetime,
            ctor,
            single_runtime,
            scoped_slot: None,
        }
    }
}

/// One entry of the append-only registration log.
#[derive(Clone)]
pub(crate) struct IndexEntry {
    pub(crate) descriptor: ServiceDescriptor,
    pub(crate) activator: Option<Arc<Activator>>,
}

/// Service registry holding all registrations
///
/// `entries` answers ordinary resolution with last-wins semantics. `log`
/// keeps every registration call for descriptors and the factory index.
pub(crate) struct Registry {
    entries: HashMap<Key, Registration>,
    log: Vec<IndexEntry>,
    /// Total count of scoped registrations for slot allocation
    pub(crate) scoped_count: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            log: Vec::new(),
            scoped_count: 0,
        }
    }

    pub(crate) fn insert(&mut self, entry: IndexEntry, registration: Registration) {
        self.entries.insert(entry.descriptor.key, registration);
        self.log.push(entry);
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.entries.get(key)
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Every registration in insertion order, duplicates included.
    pub(crate) fn log(&self) -> &[IndexEntry] {
        &self.log
    }

    /// Finalizes registry by assigning scoped slot indices
    pub(crate) fn finalize(&mut self) {
        let mut next_scoped_slot = 0;
        for reg in self.entries.values_mut() {
            if reg.lifetime == Lifetime::Scoped {
                reg.scoped_slot = Some(next_scoped_slot);
                next_scoped_slot += 1;
            }
        }
        self.scoped_count = next_scoped_slot;
    }
}
