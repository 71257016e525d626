//! Argument-to-parameter assignability.
//!
//! An argument type is assignable to a parameter type when the two are the
//! same type or when the table holds a conversion between them. The table
//! starts with the implicit numeric widenings and grows with interface
//! registrations and user conversions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::constructor::BoxedArg;
use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Erased conversion of a boxed argument to a boxed parameter value.
pub type Converter = Arc<dyn Fn(BoxedArg) -> DiResult<BoxedArg> + Send + Sync>;

/// Table of conversions between argument and parameter types.
///
/// # Examples
///
/// ```
/// use ferrous_factory::{Assignability, Key};
///
/// let table = Assignability::with_numeric_widening();
/// assert!(table.is_assignable(Key::of::<i32>(), Key::of::<f64>()));
/// assert!(table.is_assignable(Key::of::<String>(), Key::of::<String>()));
/// assert!(!table.is_assignable(Key::of::<f64>(), Key::of::<i32>()));
/// assert!(!table.is_assignable(Key::of::<i32>(), Key::of::<String>()));
/// ```
#[derive(Clone, Default)]
pub struct Assignability {
    conversions: HashMap<(Key, Key), Converter>,
}

macro_rules! widen {
    ($table:ident; $($from:ty => [$($to:ty),+]);+ $(;)?) => {
        $($(
            $table.add::<$from, $to, _>(|value: $from| value as $to);
        )+)+
    };
}

impl Assignability {
    /// An empty table: only exact type matches are assignable.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding the implicit numeric widenings.
    ///
    /// Widening never narrows or changes signedness in a lossy direction:
    /// signed sources never widen to unsigned targets, and `char` takes no
    /// part.
    pub fn with_numeric_widening() -> Self {
        let mut table = Self::new();
        widen!(table;
            i8 => [i16, i32, i64, f32, f64];
            u8 => [i16, u16, i32, u32, i64, u64, f32, f64];
            i16 => [i32, i64, f32, f64];
            u16 => [i32, u32, i64, u64, f32, f64];
            i32 => [i64, f32, f64];
            u32 => [i64, u64, f32, f64];
            i64 => [f32, f64];
            u64 => [f32, f64];
            f32 => [f64];
        );
        table
    }

    /// Declares `From` assignable to `To` through `convert`.
    ///
    /// A later declaration for the same pair replaces the earlier one.
    pub fn add<From, To, F>(&mut self, convert: F) -> &mut Self
    where
        From: Send + 'static,
        To: Send + 'static,
        F: Fn(From) -> To + Send + Sync + 'static,
    {
        let converter: Converter = Arc::new(move |arg: BoxedArg| {
            let value = arg
                .downcast::<From>()
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<From>()))?;
            Ok(Box::new(convert(*value)) as BoxedArg)
        });
        self.conversions.insert((Key::of::<From>(), Key::of::<To>()), converter);
        self
    }

    /// Adds every conversion of `other`, replacing clashing pairs.
    pub fn extend(&mut self, other: &Assignability) {
        for (pair, converter) in &other.conversions {
            self.conversions.insert(*pair, converter.clone());
        }
    }

    pub fn is_assignable(&self, from: Key, to: Key) -> bool {
        from == to || self.conversions.contains_key(&(from, to))
    }

    /// The conversion for a non-identical pair, if one is declared.
    pub fn converter(&self, from: Key, to: Key) -> Option<Converter> {
        self.conversions.get(&(from, to)).cloned()
    }

    /// Number of declared conversions.
    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }
}

impl fmt::Debug for Assignability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self
            .conversions
            .keys()
            .map(|(from, to)| format!("{} -> {}", from, to))
            .collect();
        pairs.sort();
        f.debug_struct("Assignability").field("conversions", &pairs).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert<From: Send + 'static, To: 'static>(table: &Assignability, value: From) -> To {
        let converter = table
            .converter(Key::of::<From>(), Key::of::<To>())
            .expect("conversion declared");
        *converter(Box::new(value)).unwrap().downcast::<To>().unwrap()
    }

    #[test]
    fn test_widening_table_shape() {
        let table = Assignability::with_numeric_widening();
        // 5 + 8 + 4 + 6 + 3 + 4 + 2 + 2 + 1
        assert_eq!(table.len(), 35);

        assert!(table.is_assignable(Key::of::<u8>(), Key::of::<u64>()));
        assert!(table.is_assignable(Key::of::<u32>(), Key::of::<i64>()));
        assert!(!table.is_assignable(Key::of::<i8>(), Key::of::<u8>()));
        assert!(!table.is_assignable(Key::of::<i32>(), Key::of::<u64>()));
        assert!(!table.is_assignable(Key::of::<u64>(), Key::of::<i64>()));
        assert!(!table.is_assignable(Key::of::<char>(), Key::of::<u32>()));
        assert!(!table.is_assignable(Key::of::<i128>(), Key::of::<f64>()));
    }

    #[test]
    fn test_widening_converts_values() {
        let table = Assignability::with_numeric_widening();
        assert_eq!(convert::<i32, f64>(&table, -7), -7.0);
        assert_eq!(convert::<u8, i16>(&table, 200), 200i16);
        assert_eq!(convert::<f32, f64>(&table, 1.5), 1.5f64);
    }

    #[test]
    fn test_exact_match_needs_no_converter() {
        let table = Assignability::new();
        assert!(table.is_empty());
        assert!(table.is_assignable(Key::of::<String>(), Key::of::<String>()));
        assert!(table.converter(Key::of::<String>(), Key::of::<String>()).is_none());
    }

    #[test]
    fn test_user_conversion_and_extend() {
        let mut custom = Assignability::new();
        custom.add::<&'static str, String, _>(|s| s.to_uppercase());

        let mut table = Assignability::with_numeric_widening();
        table.extend(&custom);
        assert!(table.is_assignable(Key::of::<&'static str>(), Key::of::<String>()));
        assert_eq!(convert::<&'static str, String>(&table, "abc"), "ABC");
    }

    #[test]
    fn test_converter_rejects_wrong_payload() {
        let table = Assignability::with_numeric_widening();
        let converter = table.converter(Key::of::<i32>(), Key::of::<i64>()).unwrap();
        let err = converter(Box::new("not a number")).unwrap_err();
        assert!(matches!(err, DiError::TypeMismatch(name) if name == "i32"));
    }
}
