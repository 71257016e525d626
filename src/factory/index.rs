//! Registration index consulted by factory resolution.

use std::collections::HashMap;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::IndexEntry;

/// Every registration grouped by service type.
///
/// Built once when the provider is built and read-only afterwards. Duplicate
/// registrations are kept; asking for a service with more than one is
/// reported on lookup, not at build time.
pub(crate) struct RegistrationIndex {
    entries: HashMap<Key, Vec<IndexEntry>>,
}

impl RegistrationIndex {
    pub(crate) fn build(log: &[IndexEntry]) -> Self {
        let mut entries: HashMap<Key, Vec<IndexEntry>> = HashMap::new();
        for entry in log {
            entries
                .entry(entry.descriptor.key)
                .or_default()
                .push(entry.clone());
        }
        Self { entries }
    }

    /// The single registration for `service`.
    pub(crate) fn lookup(&self, service: &Key) -> DiResult<&IndexEntry> {
        match self.entries.get(service).map(Vec::as_slice) {
            Some([entry]) => Ok(entry),
            other => Err(DiError::NotRegistered {
                service: service.display_name(),
                arguments: Vec::new(),
                registrations: other.map_or(0, <[IndexEntry]>::len),
            }),
        }
    }

    pub(crate) fn descriptor(&self, service: &Key) -> DiResult<ServiceDescriptor> {
        self.lookup(service).map(|entry| entry.descriptor.clone())
    }

    pub(crate) fn registrations(&self, service: &Key) -> usize {
        self.entries.get(service).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::Lifetime;

    fn entry<T: 'static>(lifetime: Lifetime) -> IndexEntry {
        IndexEntry {
            descriptor: ServiceDescriptor::new(Key::of::<T>(), lifetime, Some(Key::of::<T>())),
            activator: None,
        }
    }

    #[test]
    fn test_lookup_single_registration() {
        let index = RegistrationIndex::build(&[entry::<String>(Lifetime::Transient)]);
        let found = index.lookup(&Key::of::<String>()).unwrap();
        assert_eq!(found.descriptor.lifetime, Lifetime::Transient);
        assert_eq!(index.registrations(&Key::of::<String>()), 1);
    }

    #[test]
    fn test_lookup_missing() {
        let index = RegistrationIndex::build(&[]);
        match index.lookup(&Key::of::<u32>()) {
            Err(DiError::NotRegistered { service, arguments, registrations }) => {
                assert_eq!(service, "u32");
                assert!(arguments.is_empty());
                assert_eq!(registrations, 0);
            }
            _ => panic!("expected NotRegistered"),
        }
    }

    #[test]
    fn test_duplicates_fail_on_lookup_only() {
        let index = RegistrationIndex::build(&[
            entry::<String>(Lifetime::Transient),
            entry::<u32>(Lifetime::Singleton),
            entry::<String>(Lifetime::Singleton),
        ]);
        assert_eq!(index.registrations(&Key::of::<String>()), 2);
        assert!(index.descriptor(&Key::of::<u32>()).is_ok());
        match index.lookup(&Key::of::<String>()) {
            Err(DiError::NotRegistered { registrations, .. }) => assert_eq!(registrations, 2),
            _ => panic!("expected NotRegistered"),
        }
    }
}
