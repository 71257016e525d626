/// Unit tests for Key type methods

use ferrous_factory::{key_of_type, Key};
use std::any::TypeId;
use std::collections::HashSet;

trait Plugin: Send + Sync {}

#[test]
fn test_key_display_name() {
    let key = Key::of::<String>();
    assert_eq!(key.display_name(), "alloc::string::String");
    assert_eq!(key.to_string(), "alloc::string::String");
    assert_eq!(format!("{:?}", key), "Key(alloc::string::String)");
}

#[test]
fn test_key_for_trait_object() {
    let key = Key::of::<dyn Plugin>();
    assert!(key.display_name().starts_with("dyn "));
    assert!(key.display_name().ends_with("Plugin"));
    assert_eq!(key.type_id(), TypeId::of::<dyn Plugin>());
}

#[test]
fn test_key_equality_and_hash() {
    let mut keys = HashSet::new();
    keys.insert(Key::of::<u32>());
    keys.insert(key_of_type::<u32>());
    keys.insert(Key::of::<u64>());
    keys.insert(Key::of::<dyn Plugin>());

    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&Key::of::<u64>()));
    assert_ne!(Key::of::<u32>(), Key::of::<std::sync::Arc<u32>>());
}
