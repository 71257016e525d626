//! # ferrous-factory
//!
//! Dependency injection with parameterised factories, in the style of
//! Microsoft.Extensions.DependencyInjection.
//!
//! A parameterised factory builds a service whose last constructor
//! parameters come from the caller at call time while the leading ones are
//! still resolved from the container, each under its own lifetime.
//!
//! ## Features
//!
//! - **Type-safe lifetimes**: Singleton, Scoped, and Transient services
//! - **Declared constructors**: implementation types list their constructors at registration
//! - **Factories for up to three arguments**: `Factory0` through `Factory3`
//! - **Trait services**: `dyn Trait` services resolve like concrete ones
//! - **Circular dependency detection**: cycles surface as errors with the full path
//! - **Precise diagnostics**: every factory failure names the service, implementation and argument types
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_factory::{Factory1, ServiceCollection, Resolver, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Logger;
//!
//! struct Widget {
//!     logger: Arc<Logger>,
//!     name: String,
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton(Logger);
//! services.add_transient_type(
//!     TypeDescriptor::<Widget>::new()
//!         .constructor(|logger: Arc<Logger>, name: String| Widget { logger, name }),
//! );
//! services.add_factory_facility();
//!
//! let provider = services.build();
//! let widgets = provider.get_factory::<Factory1<String, Widget>>().unwrap();
//!
//! let a = widgets.create("a".to_string()).unwrap();
//! let b = widgets.create("b".to_string()).unwrap();
//! assert_eq!(a.name, "a");
//! assert!(!Arc::ptr_eq(&a, &b));
//! assert!(Arc::ptr_eq(&a.logger, &b.logger));
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: Created once and shared across the entire application
//! - **Scoped**: Created once per scope (ideal for web request contexts)
//! - **Transient**: Created fresh on every resolution
//!
//! Parameterised factories require a transient target: a fresh argument has
//! to produce a fresh instance.
//!
//! ## Interfaces
//!
//! ```rust
//! use ferrous_factory::{DiError, Lifetime, ServiceCollection, Resolver, TypeDescriptor};
//! use std::sync::Arc;
//!
//! trait Label: Send + Sync {
//!     fn text(&self) -> String;
//! }
//!
//! struct Plain { text: String, width: u32 }
//! impl Label for Plain {
//!     fn text(&self) -> String { format!("{:>1$}", self.text, self.width as usize) }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_type_as::<dyn Label, _, _>(
//!     Lifetime::Transient,
//!     TypeDescriptor::<Plain>::new()
//!         .constructor(|text: String, width: u32| Plain { text, width }),
//!     |plain| plain as Arc<dyn Label>,
//! );
//! services.add_factory_facility();
//!
//! let provider = services.build();
//!
//! // u16 widens to u32
//! let labels = provider.factory2::<String, u16, dyn Label>().unwrap();
//! assert_eq!(labels.create("ok".to_string(), 4).unwrap().text(), "  ok");
//!
//! // No constructor ends in a bool
//! assert!(matches!(
//!     provider.factory1::<bool, dyn Label>(),
//!     Err(DiError::NoMatchingConstructor { .. })
//! ));
//! ```

// Module declarations
pub mod collection;
pub mod config;
pub mod constructor;
pub mod descriptors;
pub mod error;
pub mod factory;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod traits;

// Internal modules
mod internal;
mod registration;

pub use collection::ServiceCollection;
pub use config::ContainerOptions;
pub use constructor::{BoxedArg, Constructor, IntoConstructor, Parameter, ParameterInfo, TypeDescriptor};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use factory::{
    is_match, Assignability, Converter, Factory0, Factory1, Factory2, Factory3, FactoryRequest, ResolvedFactory,
    ServiceFactory,
};
pub use internal::CircularPanic;
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver};
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use registration::AnyArc;
pub use traits::{Resolver, ResolverCore};
