use ferrous_factory::{DiError, Lifetime, ServiceCollection, Resolver, TypeDescriptor};
use std::sync::{Arc, Mutex};

#[test]
fn test_concrete_singleton() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(42usize);
    sc.add_singleton("hello".to_string());

    let sp = sc.build();

    let num1 = sp.get_required::<usize>();
    let num2 = sp.get_required::<usize>();
    let str1 = sp.get_required::<String>();
    let str2 = sp.get_required::<String>();

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2)); // Same instance
    assert!(Arc::ptr_eq(&str1, &str2)); // Same instance
}

#[test]
fn test_factory_with_dependencies() {
    struct Config {
        port: u16,
    }

    struct Server {
        config: Arc<Config>,
        name: String,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { port: 8080 });
    sc.add_singleton_factory::<Server, _>(|r| Server {
        config: r.get_required::<Config>(),
        name: "MyServer".to_string(),
    });

    let sp = sc.build();
    let server = sp.get_required::<Server>();

    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<String, _>(move |_| {
        let mut c = counter_clone.lock().unwrap();
        *c += 1;
        format!("instance-{}", *c)
    });

    let sp = sc.build();
    let s1 = sp.get_required::<String>();
    let s2 = sp.get_required::<String>();

    assert_eq!(*s1, "instance-1");
    assert_eq!(*s2, "instance-2");
    assert!(!Arc::ptr_eq(&s1, &s2));
    assert_eq!(*counter.lock().unwrap(), 2);
}

#[test]
fn test_not_found() {
    let sp = ServiceCollection::new().build();

    match sp.get::<String>() {
        Err(DiError::NotFound(name)) => assert_eq!(name, "alloc::string::String"),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_last_registration_wins() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(1u32);
    sc.add_singleton(2u32);

    let sp = sc.build();
    assert_eq!(*sp.get_required::<u32>(), 2);
}

#[test]
fn test_dependency_graph() {
    struct Database {
        url: String,
    }
    struct Repository {
        db: Arc<Database>,
    }
    struct Service {
        repo: Arc<Repository>,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Database {
        url: "sqlite::memory:".to_string(),
    });
    sc.add_singleton_factory::<Repository, _>(|r| Repository {
        db: r.get_required::<Database>(),
    });
    sc.add_transient_factory::<Service, _>(|r| Service {
        repo: r.get_required::<Repository>(),
    });

    let sp = sc.build();
    let s1 = sp.get_required::<Service>();
    let s2 = sp.get_required::<Service>();

    assert_eq!(s1.repo.db.url, "sqlite::memory:");
    assert!(Arc::ptr_eq(&s1.repo, &s2.repo));
}

#[test]
fn test_trait_object_resolution() {
    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }
    struct Hello;
    impl Greeter for Hello {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton_trait::<dyn Greeter>(Arc::new(Hello));

    let sp = sc.build();
    let a = sp.get_required::<dyn Greeter>();
    let b = sp.get_required::<dyn Greeter>();
    assert_eq!(a.greet(), "hello");
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_typed_registration_prefers_greediest_resolvable_constructor() {
    struct Settings {
        retries: u32,
    }
    struct Tracer;

    struct Client {
        retries: u32,
        traced: bool,
    }

    let descriptor = || {
        TypeDescriptor::<Client>::new()
            .constructor(|| Client { retries: 0, traced: false })
            .constructor(|settings: Arc<Settings>| Client {
                retries: settings.retries,
                traced: false,
            })
            .constructor(|settings: Arc<Settings>, _tracer: Arc<Tracer>| Client {
                retries: settings.retries,
                traced: true,
            })
    };

    // Tracer missing: the two-parameter constructor is skipped
    let mut sc = ServiceCollection::new();
    sc.add_singleton(Settings { retries: 3 });
    sc.add_transient_type(descriptor());
    let client = sc.build().get_required::<Client>();
    assert_eq!(client.retries, 3);
    assert!(!client.traced);

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Settings { retries: 5 });
    sc.add_singleton(Tracer);
    sc.add_transient_type(descriptor());
    let client = sc.build().get_required::<Client>();
    assert_eq!(client.retries, 5);
    assert!(client.traced);
}

#[test]
fn test_typed_singleton_is_cached() {
    struct Counter;

    let created = Arc::new(Mutex::new(0));
    let created_clone = created.clone();

    let mut sc = ServiceCollection::new();
    sc.add_type(
        Lifetime::Singleton,
        TypeDescriptor::<Counter>::new().constructor(move || {
            *created_clone.lock().unwrap() += 1;
            Counter
        }),
    );

    let sp = sc.build();
    let a = sp.get_required::<Counter>();
    let b = sp.get_required::<Counter>();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(*created.lock().unwrap(), 1);
}

#[test]
fn test_missing_dependency_is_named() {
    struct Missing;
    struct Needy {
        _missing: Arc<Missing>,
    }

    let mut sc = ServiceCollection::new();
    sc.add_transient_type(TypeDescriptor::<Needy>::new().constructor(|missing: Arc<Missing>| Needy {
        _missing: missing,
    }));

    let sp = sc.build();
    match sp.get::<Needy>() {
        Err(DiError::UnresolvedDependency {
            dependency,
            implementation,
        }) => {
            assert!(dependency.ends_with("Missing"));
            assert!(implementation.ends_with("Needy"));
        }
        other => panic!("expected UnresolvedDependency, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_typed_registration_without_constructors() {
    struct Empty;

    let mut sc = ServiceCollection::new();
    sc.add_transient_type(TypeDescriptor::<Empty>::new());

    let sp = sc.build();
    assert!(matches!(
        sp.get::<Empty>(),
        Err(DiError::NoMatchingConstructor { .. })
    ));
}

#[test]
fn test_value_parameters_resolve_from_container() {
    struct Endpoint {
        host: String,
        port: u16,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton("localhost".to_string());
    sc.add_singleton(8080u16);
    sc.add_transient_type(
        TypeDescriptor::<Endpoint>::new().constructor(|host: String, port: u16| Endpoint { host, port }),
    );

    let sp = sc.build();
    let endpoint = sp.get_required::<Endpoint>();
    assert_eq!(endpoint.host, "localhost");
    assert_eq!(endpoint.port, 8080);
}
