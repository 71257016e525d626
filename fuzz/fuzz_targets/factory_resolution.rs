#![no_main]

use ferrous_factory::{DiError, Lifetime, ServiceCollection, Resolver, TypeDescriptor};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Logger;

struct Target {
    _logger: Option<Arc<Logger>>,
    text: String,
    number: i64,
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let lifetime = match data[0] % 3 {
        0 => Lifetime::Singleton,
        1 => Lifetime::Scoped,
        _ => Lifetime::Transient,
    };
    let constructors = data[1];
    let duplicate = data[2] & 1 == 1;
    let request = data[3] % 4;

    let descriptor = || {
        let mut d = TypeDescriptor::<Target>::new();
        if constructors & 1 != 0 {
            d = d.constructor(|text: String| Target { _logger: None, text, number: 0 });
        }
        if constructors & 2 != 0 {
            d = d.constructor(|logger: Arc<Logger>, text: String| Target {
                _logger: Some(logger),
                text,
                number: 0,
            });
        }
        if constructors & 4 != 0 {
            d = d.constructor(|text: String, number: i64| Target { _logger: None, text, number });
        }
        d
    };

    let mut services = ServiceCollection::new();
    services.add_singleton(Logger);
    services.add_type(lifetime, descriptor());
    if duplicate {
        services.add_type(lifetime, descriptor());
    }
    services.add_factory_facility();
    let provider = services.build();

    // Resolution never panics; it either yields a factory or a typed error
    let outcome = match request {
        0 => provider.factory1::<String, Target>().map(|_| ()),
        1 => provider.factory2::<String, i64, Target>().map(|_| ()),
        2 => provider.factory2::<String, i32, Target>().map(|_| ()),
        _ => provider.factory1::<bool, Target>().map(|_| ()),
    };

    match outcome {
        Ok(()) => {
            assert!(!duplicate);
            assert_eq!(lifetime, Lifetime::Transient);
        }
        Err(DiError::NotRegistered { registrations, .. }) => assert!(duplicate && registrations == 2),
        Err(DiError::InvalidLifetime { .. }) => assert_ne!(lifetime, Lifetime::Transient),
        Err(DiError::NoMatchingConstructor { .. }) | Err(DiError::AmbiguousConstructor { .. }) => {}
        Err(other) => panic!("unexpected error: {}", other),
    }
});
