//! Request-time resolution.
//!
//! - `coercion`: raw request values to native values ([`InputCoercer`])
//! - `generic`: the field fetcher behind every generated field
//!   ([`ResolverBinding`], [`GenericResolver`])

mod coercion;
mod generic;

pub use coercion::InputCoercer;
pub use generic::{BindingTarget, GenericResolver, ResolverBinding};

use async_graphql::dynamic::FieldValue;
use async_graphql::{Name, Value};

use crate::error::ResolveError;
use crate::native::NativeValue;
use crate::schema::TypeRef;

/// Converts a native field result into an engine value.
///
/// Scalars are serialized by their scalar, enum constants become enum
/// values, objects are handed to the engine as owned parent values for
/// their child fields.
pub(crate) fn into_field_value<'a>(
    value: NativeValue,
    type_ref: &TypeRef,
) -> Result<Option<FieldValue<'a>>, ResolveError> {
    if value.is_null() {
        return Ok(None);
    }
    match (type_ref, value) {
        (TypeRef::Scalar(scalar), value) => scalar
            .serialize(&value)
            .map(|v| Some(FieldValue::value(v))),
        (TypeRef::List(element), NativeValue::List(items)) => {
            let items = items
                .into_iter()
                .map(|item| {
                    into_field_value(item, element).map(|v| v.unwrap_or(FieldValue::NULL))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(FieldValue::list(items)))
        }
        (TypeRef::Defined(_) | TypeRef::Reference(_), NativeValue::Enum(label)) => {
            Ok(Some(FieldValue::value(Value::Enum(Name::new(label)))))
        }
        (_, NativeValue::Unlabeled(enum_type)) => Err(ResolveError::coercion(format!(
            "Enum constant of '{enum_type}' is missing from its description"
        ))),
        (TypeRef::Defined(_) | TypeRef::Reference(_), NativeValue::Object(object)) => {
            Ok(Some(FieldValue::owned_any(object)))
        }
        (type_ref, other) => Err(ResolveError::coercion(format!(
            "Expected type '{type_ref}' but was '{}'.",
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;

    #[test]
    fn test_null_is_none() {
        let value =
            into_field_value(NativeValue::Null, &TypeRef::Defined("Person".into())).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_scalar_list() {
        let value = into_field_value(
            NativeValue::List(vec![NativeValue::Int(1), NativeValue::Null]),
            &TypeRef::list(TypeRef::Scalar(ScalarKind::Int)),
        )
        .unwrap();
        assert!(value.is_some());
    }

    #[test]
    fn test_unlabeled_enum_constant_is_coercion_error() {
        let err = into_field_value(
            NativeValue::Unlabeled("app::Mood"),
            &TypeRef::Defined("Mood".into()),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ResolveError::Coercion(_)));
        assert!(err.to_string().contains("'app::Mood'"));
    }

    #[test]
    fn test_shape_mismatch() {
        let err = into_field_value(
            NativeValue::Int(1),
            &TypeRef::list(TypeRef::Scalar(ScalarKind::Int)),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ResolveError::Coercion(_)));
    }
}
