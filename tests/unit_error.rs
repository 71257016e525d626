/// Unit tests for DiError and DiResult types

use ferrous_factory::{DiError, DiResult, Lifetime};
use std::error::Error;

#[test]
fn test_error_display_not_found() {
    let error = DiError::NotFound("TestService");
    assert_eq!(error.to_string(), "Service not found: TestService");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("alloc::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: alloc::string::String");
}

#[test]
fn test_error_display_wrong_lifetime_and_depth() {
    let error = DiError::WrongLifetime("Cannot resolve scoped service from root provider");
    assert_eq!(
        error.to_string(),
        "Lifetime error: Cannot resolve scoped service from root provider"
    );
    assert_eq!(DiError::DepthExceeded(3).to_string(), "Max depth 3 exceeded");
}

#[test]
fn test_error_display_not_registered() {
    let missing = DiError::NotRegistered {
        service: "app::Widget",
        arguments: vec![],
        registrations: 0,
    };
    assert_eq!(
        missing.to_string(),
        "No service for type 'app::Widget' has been registered."
    );

    let duplicated = DiError::NotRegistered {
        service: "app::Widget",
        arguments: vec![],
        registrations: 2,
    };
    assert_eq!(
        duplicated.to_string(),
        "2 services for type 'app::Widget' have been registered; a parameterised factory requires exactly one."
    );

    let requested = DiError::NotRegistered {
        service: "app::Widget",
        arguments: vec!["alloc::string::String", "u32"],
        registrations: 0,
    };
    assert_eq!(
        requested.to_string(),
        "No service for type 'app::Widget' has been registered. Requested with arguments 'alloc::string::String', 'u32'."
    );
}

#[test]
fn test_error_display_invalid_lifetime() {
    let error = DiError::InvalidLifetime {
        service: "dyn app::Shape",
        implementation: "app::Square",
        arguments: vec!["f64"],
        lifetime: Lifetime::Scoped,
    };
    assert_eq!(
        error.to_string(),
        "In order to resolve a parameterised factory for type 'dyn app::Shape' (implemented by 'app::Square'), it must be registered as Transient lifetime (registered as Scoped). Requested with arguments 'f64'."
    );
}

#[test]
fn test_error_display_no_matching_constructor() {
    let error = DiError::NoMatchingConstructor {
        service: "dyn app::Shape",
        implementation: "app::Square",
        arguments: vec!["bool"],
    };
    assert_eq!(
        error.to_string(),
        "No constructor of 'app::Square' (registered for 'dyn app::Shape') accepts a trailing parameter assignable from 'bool'."
    );

    let none = DiError::NoMatchingConstructor {
        service: "app::Square",
        implementation: "app::Square",
        arguments: vec![],
    };
    assert!(none.to_string().ends_with("accepts zero explicit arguments."));
}

#[test]
fn test_error_display_ambiguous_constructor() {
    let error = DiError::AmbiguousConstructor {
        service: "app::Widget",
        implementation: "app::Widget",
        arguments: vec!["alloc::string::String", "u32"],
        candidates: 2,
    };
    assert_eq!(
        error.to_string(),
        "2 constructors of 'app::Widget' (registered for 'app::Widget') accept 2 trailing parameters assignable from 'alloc::string::String', 'u32'; exactly one is required."
    );
}

#[test]
fn test_error_display_unresolved_dependency() {
    let error = DiError::UnresolvedDependency {
        dependency: "app::Logger",
        implementation: "app::Widget",
    };
    assert_eq!(
        error.to_string(),
        "Unable to resolve dependency 'app::Logger' while activating 'app::Widget'."
    );
}

#[test]
fn test_error_display_arity_mismatch() {
    let one = DiError::ArityMismatch {
        service: "app::Widget",
        expected: 1,
        actual: 2,
    };
    assert_eq!(
        one.to_string(),
        "Factory for 'app::Widget' takes 1 argument but was invoked with 2."
    );

    let three = DiError::ArityMismatch {
        service: "app::Widget",
        expected: 3,
        actual: 0,
    };
    assert!(three.to_string().contains("takes 3 arguments"));
}

#[test]
fn test_error_is_std_error_without_source() {
    let error = DiError::NotFound("TestService");
    assert!(error.source().is_none());

    let boxed: Box<dyn Error + Send + Sync> = Box::new(error.clone());
    assert_eq!(boxed.to_string(), error.to_string());
}

#[test]
fn test_di_result_propagates() {
    fn inner() -> DiResult<u32> {
        Err(DiError::DepthExceeded(1))
    }

    fn outer() -> DiResult<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(matches!(outer(), Err(DiError::DepthExceeded(1))));
}
