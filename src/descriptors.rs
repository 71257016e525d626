//! Service descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::lifetime::Lifetime;

/// Service descriptor for introspection and diagnostics
///
/// One descriptor exists per registration call, in registration order.
/// Registering the same service type twice yields two descriptors: the
/// container itself resolves the last one, while parameterised factories
/// treat the pair as ambiguous.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{ServiceCollection, Lifetime, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Widget { db: Arc<Database>, name: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_type(
///     TypeDescriptor::<Widget>::new()
///         .constructor(|db: Arc<Database>, name: String| Widget { db, name }),
/// );
///
/// let descriptors = services.get_service_descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let widget = descriptors.iter()
///     .find(|d| d.type_name().contains("Widget"))
///     .unwrap();
/// assert_eq!(widget.lifetime, Lifetime::Transient);
/// assert_eq!(widget.constructors, 1);
/// assert!(widget.implementation_name().unwrap().contains("Widget"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// The service key
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Implementation type, when it is known at registration time
    pub implementation: Option<Key>,
    /// Number of declared constructors (zero for value and closure registrations)
    pub constructors: usize,
}

impl ServiceDescriptor {
    pub(crate) fn new(key: Key, lifetime: Lifetime, implementation: Option<Key>) -> Self {
        Self {
            key,
            lifetime,
            implementation,
            constructors: 0,
        }
    }

    pub(crate) fn with_constructors(mut self, count: usize) -> Self {
        self.constructors = count;
        self
    }

    /// Get the type/trait name
    ///
    /// Returns the human-readable type or trait name for this service.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Get the implementation type name, if known.
    pub fn implementation_name(&self) -> Option<&'static str> {
        self.implementation.map(|key| key.display_name())
    }

    /// Whether parameterised factories can be resolved against this registration.
    ///
    /// Only transient registrations with declared constructors qualify.
    pub fn supports_factories(&self) -> bool {
        self.lifetime == Lifetime::Transient && self.constructors > 0
    }
}
