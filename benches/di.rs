use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_factory::*;
use std::sync::Arc;

struct Logger;

struct Widget {
    logger: Arc<Logger>,
    name: String,
    size: u32,
}

fn widget_services() -> ServiceCollection {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(Logger);
    sc.add_transient_type(
        TypeDescriptor::<Widget>::new()
            .constructor(|logger: Arc<Logger>, name: String| Widget { logger, name, size: 0 })
            .constructor(|logger: Arc<Logger>, name: String, size: u32| Widget { logger, name, size }),
    );
    sc.add_factory_facility();
    sc
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(42u64);
    let sp = sc.build();

    // Prime the singleton
    let _ = sp.get::<u64>().unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = sp.get::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_typed_vs_closure(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_vs_closure");

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Logger);
    sc.add_singleton("bench".to_string());
    sc.add_transient_type(
        TypeDescriptor::<Widget>::new()
            .constructor(|logger: Arc<Logger>, name: String| Widget { logger, name, size: 0 }),
    );
    let sp_typed = sc.build();
    group.bench_function("typed_transient", |b| {
        b.iter(|| {
            let v = sp_typed.get::<Widget>().unwrap();
            black_box(v.size);
        })
    });

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Logger);
    sc.add_transient_factory::<Widget, _>(|r| Widget {
        logger: r.get_required::<Logger>(),
        name: "bench".to_string(),
        size: 0,
    });
    let sp_closure = sc.build();
    group.bench_function("closure_transient", |b| {
        b.iter(|| {
            let v = sp_closure.get::<Widget>().unwrap();
            black_box(v.size);
        })
    });

    group.finish();
}

fn bench_factory_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory_resolution");

    let sp = widget_services().build();
    let _ = sp.factory1::<String, Widget>().unwrap();

    group.bench_function("cached", |b| {
        b.iter(|| {
            let f = sp.factory1::<String, Widget>().unwrap();
            black_box(f);
        })
    });

    let mut sc = widget_services();
    sc.with_options(ContainerOptions::new().with_factory_cache(false));
    let sp_uncached = sc.build();

    group.bench_function("uncached", |b| {
        b.iter(|| {
            let f = sp_uncached.factory1::<String, Widget>().unwrap();
            black_box(f);
        })
    });

    group.finish();
}

fn bench_factory_invocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory_invocation");

    let sp = widget_services().build();
    let one = sp.factory1::<String, Widget>().unwrap();
    let two = sp.factory2::<String, u32, Widget>().unwrap();
    let widened = sp.factory2::<String, u16, Widget>().unwrap();

    group.bench_function("one_argument", |b| {
        b.iter(|| {
            let w = one.create("bench".to_string()).unwrap();
            black_box(w.size);
        })
    });

    group.bench_function("two_arguments", |b| {
        b.iter(|| {
            let w = two.create("bench".to_string(), 7).unwrap();
            black_box(w.size);
        })
    });

    group.bench_function("two_arguments_widened", |b| {
        b.iter(|| {
            let w = widened.create("bench".to_string(), 7).unwrap();
            black_box(w.size);
        })
    });

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let sp = widget_services().build();
    let factory = sp.factory1::<String, Widget>().unwrap();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("factory_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let factory = factory.clone();
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let w = factory.create(String::new()).unwrap();
                                    black_box(w);
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_mixed_workload(c: &mut Criterion) {
    // 70% singleton hits, 30% factory invocations
    let sp = widget_services().build();
    let factory = sp.factory1::<String, Widget>().unwrap();
    let _ = sp.get::<Logger>().unwrap();

    c.bench_function("mixed_workload_realistic", |b| {
        b.iter(|| {
            for _ in 0..7 {
                let v = sp.get::<Logger>().unwrap();
                black_box(v);
            }
            for _ in 0..3 {
                let w = factory.create("mixed".to_string()).unwrap();
                black_box(w.logger.clone());
            }
        })
    });
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_typed_vs_closure,
    bench_factory_resolution,
    bench_factory_invocation,
    bench_contention
);

criterion_group!(macro_benches, bench_mixed_workload);

criterion_main!(micro_benches, macro_benches);
