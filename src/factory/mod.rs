//! Parameterised factories.
//!
//! A parameterised factory builds a service whose last constructor parameters
//! are supplied by the caller while the leading ones still come from the
//! container. Requesting `Factory2<String, u32, dyn Widget>` runs these steps:
//!
//! 1. the registration index yields the single registration of `dyn Widget`,
//! 2. the registration must be transient,
//! 3. exactly one declared constructor of the implementation type must take
//!    trailing parameters assignable from `(String, u32)`,
//! 4. the result is a [`ResolvedFactory`] closed over that constructor, which
//!    resolves leading dependencies afresh on every call.

mod assignability;
mod handles;
pub(crate) mod index;
mod matcher;
pub(crate) mod redirector;
mod resolution;

pub use assignability::{Assignability, Converter};
pub use handles::{Factory0, Factory1, Factory2, Factory3, ServiceFactory};
pub use matcher::is_match;
pub use resolution::{FactoryRequest, ResolvedFactory};

pub(crate) use index::RegistrationIndex;
pub(crate) use redirector::{ExplicitFactory, FactorySupport};
