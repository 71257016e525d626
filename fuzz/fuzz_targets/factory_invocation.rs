#![no_main]

use ferrous_factory::{ServiceCollection, Resolver, TypeDescriptor};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Clock;

struct Reading {
    clock: Arc<Clock>,
    label: String,
    value: f64,
    flag: bool,
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }

    let value = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let flag = data[4] & 1 == 1;
    let label = String::from_utf8_lossy(&data[5..]).into_owned();

    let mut services = ServiceCollection::new();
    services.add_singleton(Clock);
    services.add_transient_type(TypeDescriptor::<Reading>::new().constructor(
        |clock: Arc<Clock>, label: String, value: f64, flag: bool| Reading { clock, label, value, flag },
    ));
    services.add_factory_facility();
    let provider = services.build();

    let factory = provider.factory3::<String, i32, bool, Reading>().unwrap();
    let first = factory.create(label.clone(), value, flag).unwrap();
    let second = factory.create(label.clone(), value, flag).unwrap();

    assert_eq!(first.label, label);
    assert_eq!(first.value, f64::from(value));
    assert_eq!(first.flag, flag);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.clock, &second.clock));
});
