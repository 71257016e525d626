//! Error types for the dependency injection container and its factories.

use thiserror::Error;

use crate::lifetime::Lifetime;

/// Dependency injection errors
///
/// Represents the various error conditions that can occur during service
/// resolution, parameterised factory resolution, or factory invocation.
/// Every factory diagnostic names the concrete service type, implementation
/// type and argument types involved.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_factory::{DiError, Lifetime};
///
/// let err = DiError::InvalidLifetime {
///     service: "app::Widget",
///     implementation: "app::Widget",
///     arguments: vec!["alloc::string::String"],
///     lifetime: Lifetime::Singleton,
/// };
/// assert!(err.to_string().contains("must be registered as Transient"));
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Service not registered with the container
    #[error("Service not found: {0}")]
    NotFound(&'static str),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Invalid lifetime resolution (e.g., scoped from root)
    #[error("Lifetime error: {0}")]
    WrongLifetime(&'static str),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// The factory target has no registration, or more than one
    ///
    /// `arguments` is empty for plain registration lookups.
    #[error("{}{}", not_registered(.service, .registrations), requested_with(.arguments))]
    NotRegistered {
        service: &'static str,
        arguments: Vec<&'static str>,
        registrations: usize,
    },
    /// The factory target is not registered as transient
    #[error("In order to resolve a parameterised factory for type '{service}' (implemented by '{implementation}'), it must be registered as Transient lifetime (registered as {lifetime}).{}", requested_with(.arguments))]
    InvalidLifetime {
        service: &'static str,
        implementation: &'static str,
        arguments: Vec<&'static str>,
        lifetime: Lifetime,
    },
    /// No constructor's trailing parameters accept the argument types
    #[error("No constructor of '{implementation}' (registered for '{service}') accepts {}.", describe_arguments(.arguments))]
    NoMatchingConstructor {
        service: &'static str,
        implementation: &'static str,
        arguments: Vec<&'static str>,
    },
    /// More than one constructor accepts the argument types
    #[error("{candidates} constructors of '{implementation}' (registered for '{service}') accept {}; exactly one is required.", describe_arguments(.arguments))]
    AmbiguousConstructor {
        service: &'static str,
        implementation: &'static str,
        arguments: Vec<&'static str>,
        candidates: usize,
    },
    /// A container-resolved constructor parameter could not be satisfied
    #[error("Unable to resolve dependency '{dependency}' while activating '{implementation}'.")]
    UnresolvedDependency {
        dependency: &'static str,
        implementation: &'static str,
    },
    /// A factory was invoked with the wrong number of explicit arguments.
    ///
    /// This is a programming defect; the typed factory handles cannot produce it.
    #[error("Factory for '{service}' takes {} but was invoked with {actual}.", count_arguments(.expected))]
    ArityMismatch {
        service: &'static str,
        expected: usize,
        actual: usize,
    },
}

fn not_registered(service: &str, registrations: &usize) -> String {
    match *registrations {
        0 => format!("No service for type '{}' has been registered.", service),
        n => format!(
            "{} services for type '{}' have been registered; a parameterised factory requires exactly one.",
            n, service
        ),
    }
}

fn requested_with(arguments: &[&'static str]) -> String {
    if arguments.is_empty() {
        String::new()
    } else {
        format!(" Requested with arguments {}.", quoted(arguments))
    }
}

fn quoted(arguments: &[&'static str]) -> String {
    arguments
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_arguments(arguments: &[&'static str]) -> String {
    match arguments.len() {
        0 => "zero explicit arguments".to_string(),
        1 => format!("a trailing parameter assignable from {}", quoted(arguments)),
        n => format!("{} trailing parameters assignable from {}", n, quoted(arguments)),
    }
}

fn count_arguments(count: &usize) -> String {
    match *count {
        1 => "1 argument".to_string(),
        n => format!("{} arguments", n),
    }
}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;
