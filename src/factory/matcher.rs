//! Constructor matching by trailing-parameter assignability.

use crate::constructor::ParameterInfo;
use crate::factory::assignability::Assignability;
use crate::key::Key;

/// Whether the trailing parameters of a constructor accept `arguments`.
///
/// With `P` parameters and `A` arguments the match fails when `A > P`;
/// otherwise argument `i` must be assignable to parameter `P - A + i`.
/// Leading parameters are never compared: they belong to the container.
pub fn is_match(parameters: &[ParameterInfo], arguments: &[Key], assignability: &Assignability) -> bool {
    if parameters.len() < arguments.len() {
        return false;
    }
    let offset = parameters.len() - arguments.len();
    arguments
        .iter()
        .zip(&parameters[offset..])
        .all(|(argument, parameter)| assignability.is_assignable(*argument, parameter.parameter_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Logger;

    fn widget_params() -> Vec<ParameterInfo> {
        vec![ParameterInfo::of::<Arc<Logger>>(), ParameterInfo::of::<String>()]
    }

    #[test]
    fn test_trailing_parameter_matches() {
        let table = Assignability::new();
        assert!(is_match(&widget_params(), &[Key::of::<String>()], &table));
    }

    #[test]
    fn test_leading_parameters_are_not_compared() {
        let table = Assignability::new();
        // Logger sits in leading position when one argument is supplied.
        assert!(!is_match(&widget_params(), &[Key::of::<Arc<Logger>>()], &table));
        assert!(is_match(
            &widget_params(),
            &[Key::of::<Arc<Logger>>(), Key::of::<String>()],
            &table
        ));
    }

    #[test]
    fn test_too_many_arguments() {
        let table = Assignability::new();
        let args = [Key::of::<u8>(), Key::of::<Arc<Logger>>(), Key::of::<String>()];
        assert!(!is_match(&widget_params(), &args, &table));
    }

    #[test]
    fn test_order_matters() {
        let table = Assignability::new();
        let parameters = vec![ParameterInfo::of::<String>(), ParameterInfo::of::<u32>()];
        assert!(is_match(&parameters, &[Key::of::<String>(), Key::of::<u32>()], &table));
        assert!(!is_match(&parameters, &[Key::of::<u32>(), Key::of::<String>()], &table));
    }

    #[test]
    fn test_widening_participates() {
        let parameters = vec![ParameterInfo::of::<f64>()];
        assert!(!is_match(&parameters, &[Key::of::<i32>()], &Assignability::new()));
        assert!(is_match(
            &parameters,
            &[Key::of::<i32>()],
            &Assignability::with_numeric_widening()
        ));
    }

    #[test]
    fn test_empty_arguments_match_any_constructor() {
        let table = Assignability::new();
        assert!(is_match(&[], &[], &table));
        assert!(is_match(&widget_params(), &[], &table));
    }
}
