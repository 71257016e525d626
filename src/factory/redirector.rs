//! Routing of factory requests to the registration that builds them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{DiError, DiResult};
use crate::factory::assignability::Assignability;
use crate::factory::index::RegistrationIndex;
use crate::factory::resolution::{FactoryRequest, FactoryResolver, ResolvedFactory};
use crate::key::Key;
use crate::observer::Observers;
use crate::registration::Caster;

/// A factory shape registered for one implementation type.
#[derive(Clone)]
pub(crate) struct ExplicitFactory {
    pub(crate) implementation: Key,
    pub(crate) cast: Caster,
}

/// Factory support installed in a provider.
///
/// A request for `Factory<Args.., S>` is served by the explicit registration
/// of that shape if there is one. Otherwise, with the facility installed, it
/// is redirected to the single registration of `S`, whose implementation type
/// supplies the constructors. Without either, the shape is simply an
/// unregistered service.
pub(crate) struct FactorySupport {
    facility: bool,
    explicit: HashMap<Key, ExplicitFactory>,
    index: RegistrationIndex,
    assignability: Assignability,
    cache: Option<Mutex<HashMap<FactoryRequest, Arc<ResolvedFactory>>>>,
}

impl FactorySupport {
    pub(crate) fn new(
        facility: bool,
        explicit: HashMap<Key, ExplicitFactory>,
        index: RegistrationIndex,
        assignability: Assignability,
        cache: bool,
    ) -> Self {
        Self {
            facility,
            explicit,
            index,
            assignability,
            cache: cache.then(|| Mutex::new(HashMap::new())),
        }
    }

    #[inline]
    pub(crate) fn enabled(&self, shape: &Key) -> bool {
        self.facility || self.explicit.contains_key(shape)
    }

    pub(crate) fn explicit(&self, shape: &Key) -> Option<&ExplicitFactory> {
        self.explicit.get(shape)
    }

    pub(crate) fn index(&self) -> &RegistrationIndex {
        &self.index
    }

    pub(crate) fn resolve(&self, request: &FactoryRequest, observers: &Observers) -> DiResult<Arc<ResolvedFactory>> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.lock().get(request) {
                debug!(service = %request.service(), "factory cache hit");
                return Ok(hit.clone());
            }
        }

        match self.redirect(request) {
            Ok(factory) => {
                let factory = Arc::new(factory);
                observers.factory_resolved(request, &factory.implementation());
                if let Some(cache) = &self.cache {
                    // A concurrent resolution of the same request may have won.
                    let stored = cache
                        .lock()
                        .entry(request.clone())
                        .or_insert(factory)
                        .clone();
                    return Ok(stored);
                }
                Ok(factory)
            }
            Err(err) => {
                warn!(
                    service = %request.service(),
                    arguments = ?request.argument_names(),
                    error = %err,
                    "parameterised factory resolution failed"
                );
                observers.factory_failed(request, &err);
                Err(err)
            }
        }
    }

    fn redirect(&self, request: &FactoryRequest) -> DiResult<ResolvedFactory> {
        let resolver = FactoryResolver::new(&self.index, &self.assignability);

        if let Some(explicit) = self.explicit.get(&request.shape()) {
            debug!(
                service = %request.service(),
                implementation = %explicit.implementation,
                "explicit factory registration"
            );
            let entry = resolver.lookup(&explicit.implementation, request.arguments())?;
            return resolver
                .resolve_entry(request.service(), entry, request.arguments())
                .map(|factory| factory.then_cast(explicit.cast.clone()));
        }

        if !self.facility {
            return Err(DiError::NotFound(request.shape().display_name()));
        }

        resolver.resolve(request.service(), request.arguments())
    }
}
