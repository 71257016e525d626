//! Container options.
//!
//! Options are fixed when the provider is built. They can be set in code,
//! read from environment variables, or (with the `config` feature)
//! deserialized from any serde format.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::{DiError, DiResult};

/// Default prefix for the environment variables read by [`ContainerOptions::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "FERROUS_FACTORY";

/// Default bound on nested resolutions before `DiError::DepthExceeded`.
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 1024;

/// Tunables applied when a [`ServiceCollection`](crate::ServiceCollection) is built.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{ContainerOptions, ServiceCollection};
///
/// let options = ContainerOptions::new()
///     .with_max_resolution_depth(64)
///     .with_numeric_widening(false);
///
/// let mut services = ServiceCollection::new();
/// services.with_options(options.clone());
/// assert_eq!(services.options(), &options);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Maximum nesting of resolutions on one thread.
    pub max_resolution_depth: usize,
    /// Whether the built-in numeric widening table takes part in argument matching.
    pub numeric_widening: bool,
    /// Whether the provider caches resolved factories per (service, signature).
    pub cache_resolved_factories: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            numeric_widening: true,
            cache_resolved_factories: true,
        }
    }
}

impl ContainerOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    pub fn with_numeric_widening(mut self, enabled: bool) -> Self {
        self.numeric_widening = enabled;
        self
    }

    pub fn with_factory_cache(mut self, enabled: bool) -> Self {
        self.cache_resolved_factories = enabled;
        self
    }

    /// Reads options from `FERROUS_FACTORY_*` environment variables.
    ///
    /// Recognised variables are `MAX_DEPTH`, `NUMERIC_WIDENING` and
    /// `CACHE_FACTORIES`. Unset variables keep their default.
    pub fn from_env() -> DiResult<Self> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Reads options from environment variables named `{PREFIX}_{NAME}`.
    pub fn from_env_with_prefix(prefix: &str) -> DiResult<Self> {
        let mut options = Self::default();
        let prefix = prefix.to_uppercase();

        if let Some(raw) = read_var(&prefix, "MAX_DEPTH") {
            options.max_resolution_depth = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| DiError::TypeMismatch("MAX_DEPTH must be a non-negative integer"))?;
        }
        if let Some(raw) = read_var(&prefix, "NUMERIC_WIDENING") {
            options.numeric_widening = parse_flag(&raw)
                .ok_or(DiError::TypeMismatch("NUMERIC_WIDENING must be a boolean"))?;
        }
        if let Some(raw) = read_var(&prefix, "CACHE_FACTORIES") {
            options.cache_resolved_factories = parse_flag(&raw)
                .ok_or(DiError::TypeMismatch("CACHE_FACTORIES must be a boolean"))?;
        }

        Ok(options)
    }
}

fn read_var(prefix: &str, name: &str) -> Option<String> {
    env::var(format!("{}_{}", prefix, name)).ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear(prefix: &str) {
        for name in ["MAX_DEPTH", "NUMERIC_WIDENING", "CACHE_FACTORIES"] {
            env::remove_var(format!("{}_{}", prefix, name));
        }
    }

    #[test]
    fn test_defaults() {
        let options = ContainerOptions::default();
        assert_eq!(options.max_resolution_depth, DEFAULT_MAX_RESOLUTION_DEPTH);
        assert!(options.numeric_widening);
        assert!(options.cache_resolved_factories);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_all_variables() {
        clear("FFTEST");
        env::set_var("FFTEST_MAX_DEPTH", "32");
        env::set_var("FFTEST_NUMERIC_WIDENING", "false");
        env::set_var("FFTEST_CACHE_FACTORIES", "0");

        let options = ContainerOptions::from_env_with_prefix("fftest").unwrap();
        assert_eq!(options.max_resolution_depth, 32);
        assert!(!options.numeric_widening);
        assert!(!options.cache_resolved_factories);

        clear("FFTEST");
    }

    #[test]
    #[serial]
    fn test_from_env_keeps_defaults_when_unset() {
        clear(DEFAULT_ENV_PREFIX);
        let options = ContainerOptions::from_env().unwrap();
        assert_eq!(options, ContainerOptions::default());
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_garbage() {
        clear("FFBAD");
        env::set_var("FFBAD_MAX_DEPTH", "deep");
        let err = ContainerOptions::from_env_with_prefix("FFBAD").unwrap_err();
        assert!(matches!(err, DiError::TypeMismatch(msg) if msg.contains("MAX_DEPTH")));
        clear("FFBAD");

        env::set_var("FFBAD_NUMERIC_WIDENING", "maybe");
        assert!(ContainerOptions::from_env_with_prefix("FFBAD").is_err());
        clear("FFBAD");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ContainerOptions =
            serde_json::from_str(r#"{ "numeric_widening": false }"#).unwrap();
        assert!(!options.numeric_widening);
        assert_eq!(options.max_resolution_depth, DEFAULT_MAX_RESOLUTION_DEPTH);
        assert!(options.cache_resolved_factories);
    }
}
