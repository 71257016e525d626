//! Service key types for the dependency injection container.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key for service storage, lookup and factory signatures.
///
/// A key identifies a type by its `TypeId` and carries the `type_name` for
/// diagnostics. Unlike `TypeId` alone it works uniformly for concrete types
/// and trait objects (`dyn Trait`), so the same key type names service types,
/// implementation types, constructor parameter types and explicit factory
/// argument types.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::Key;
///
/// trait Logger: Send + Sync {}
///
/// let string_key = Key::of::<String>();
/// assert_eq!(string_key.display_name(), "alloc::string::String");
///
/// let logger_key = Key::of::<dyn Logger>();
/// assert!(logger_key.display_name().contains("Logger"));
/// assert_ne!(string_key, logger_key);
/// ```
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Creates the key for `T`, which may be unsized.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` this key compares by.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Get the type name for display
    ///
    /// Returns the human-readable type name for debugging and error
    /// messages. This is the `std::any::type_name` result.
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

// Equality and hashing ignore the name: two keys for the same type are equal
// even if `type_name` were to render differently.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
