//! Diagnostic observers for dependency injection traceability.
//!
//! Observers receive resolution events from the provider: ordinary service
//! resolutions and parameterised factory resolutions. The built-in
//! [`LoggingObserver`] forwards them to `tracing`.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::factory::FactoryRequest;
use crate::Key;

/// Observer trait for dependency injection resolution events.
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{DiObserver, ServiceCollection, Key, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     resolved: AtomicUsize,
/// }
///
/// impl DiObserver for CountingObserver {
///     fn resolving(&self, _key: &Key) {}
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.resolved.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let mut services = ServiceCollection::new();
/// services.add_singleton(7u32);
/// services.add_observer(observer.clone());
///
/// let provider = services.build();
/// provider.get_required::<u32>();
/// assert_eq!(observer.resolved.load(Ordering::Relaxed), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called when starting to resolve a service.
    fn resolving(&self, key: &Key);

    /// Called when a service resolution finishes, successfully or not.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when a parameterised factory has been resolved.
    ///
    /// `implementation` is the concrete type whose constructor was chosen.
    fn factory_resolved(&self, _request: &FactoryRequest, _implementation: &Key) {}

    /// Called when a parameterised factory request fails.
    fn factory_failed(&self, _request: &FactoryRequest, _error: &DiError) {}
}

/// Collection of observers registered with the container.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    /// Returns true if any observers are registered.
    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn factory_resolved(&self, request: &FactoryRequest, implementation: &Key) {
        for observer in &self.observers {
            observer.factory_resolved(request, implementation);
        }
    }

    pub(crate) fn factory_failed(&self, request: &FactoryRequest, error: &DiError) {
        for observer in &self.observers {
            observer.factory_failed(request, error);
        }
    }
}

/// Built-in observer that emits events through `tracing`.
///
/// Resolutions are logged at `TRACE`, factory resolutions at `DEBUG` and
/// factory failures at `WARN`, all under the `ferrous_factory` target.
/// Install any `tracing` subscriber to see them.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{ServiceCollection, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(LoggingObserver::new()));
///
/// let provider = services.build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-factory]".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(target: "ferrous_factory", prefix = %self.prefix, service = %key, "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::trace!(
            target: "ferrous_factory",
            prefix = %self.prefix,
            service = %key,
            elapsed = ?duration,
            "resolved"
        );
    }

    fn factory_resolved(&self, request: &FactoryRequest, implementation: &Key) {
        tracing::debug!(
            target: "ferrous_factory",
            prefix = %self.prefix,
            service = %request.service(),
            implementation = %implementation,
            arguments = ?request.argument_names(),
            "factory resolved"
        );
    }

    fn factory_failed(&self, request: &FactoryRequest, error: &DiError) {
        tracing::warn!(
            target: "ferrous_factory",
            prefix = %self.prefix,
            service = %request.service(),
            arguments = ?request.argument_names(),
            error = %error,
            "factory resolution failed"
        );
    }
}
