//! Input value coercion.
//!
//! Walks a declared input type against a raw request value and produces the
//! native value: scalars through their coercion, lists element by element,
//! enums by label and input objects by constructing a fresh instance and
//! calling one setter per provided field.

use async_graphql::Value;
use tracing::trace;

use crate::error::ResolveError;
use crate::native::NativeValue;
use crate::schema::fields::capitalize;
use crate::schema::{InputObjectType, SchemaGraph, TypeDescriptor, TypeRef};
use crate::types::value_kind;

/// Coerces raw request values into native values.
pub struct InputCoercer<'g> {
    graph: &'g SchemaGraph,
}

impl<'g> InputCoercer<'g> {
    pub fn new(graph: &'g SchemaGraph) -> Self {
        Self { graph }
    }

    /// Coerces `raw` against the declared input type.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Coercion`] when the raw value has the wrong shape
    /// - [`ResolveError::Construction`] when an input object cannot be created
    /// - [`ResolveError::Binding`] when a field has no setter or the setter fails
    pub fn coerce(&self, raw: &Value, type_ref: &TypeRef) -> Result<NativeValue, ResolveError> {
        match type_ref {
            TypeRef::Scalar(scalar) => scalar.parse_value(raw),
            TypeRef::List(element) => self.coerce_list(raw, element),
            TypeRef::Defined(name) | TypeRef::Reference(name) => match self.graph.get(name) {
                Some(TypeDescriptor::Enum(_)) => coerce_enum(raw),
                Some(TypeDescriptor::InputObject(input)) => self.coerce_object(raw, input),
                Some(TypeDescriptor::Object(_)) => Err(ResolveError::binding(format!(
                    "Type '{name}' is not an input type"
                ))),
                None => Err(ResolveError::binding(format!("Unknown input type '{name}'"))),
            },
        }
    }

    fn coerce_list(&self, raw: &Value, element: &TypeRef) -> Result<NativeValue, ResolveError> {
        match raw {
            Value::Null => Ok(NativeValue::Null),
            Value::List(items) => items
                .iter()
                .map(|item| self.coerce(item, element))
                .collect::<Result<Vec<_>, _>>()
                .map(NativeValue::List),
            other => Err(ResolveError::coercion(format!(
                "Expected type 'List' but was '{}'.",
                value_kind(other)
            ))),
        }
    }

    fn coerce_object(
        &self,
        raw: &Value,
        input: &InputObjectType,
    ) -> Result<NativeValue, ResolveError> {
        let fields = match raw {
            Value::Null => return Ok(NativeValue::Null),
            Value::Object(fields) => fields,
            other => {
                return Err(ResolveError::coercion(format!(
                    "Expected type '{}' but was '{}'.",
                    input.name,
                    value_kind(other)
                )));
            }
        };

        let mut object = input.class.construct()?;
        trace!(type_name = %input.name, fields = fields.len(), "Constructed input object");

        for (key, value) in fields {
            let field = input.field(key.as_str()).ok_or_else(|| {
                ResolveError::binding(format!(
                    "Unknown field '{key}' on input type '{}'",
                    input.name
                ))
            })?;
            let native = self.coerce(value, &field.type_ref)?;

            let setter_name = format!("set{}", capitalize(key.as_str()));
            let setter = input
                .class
                .member(&setter_name)
                .ok_or_else(|| ResolveError::binding(format!("No setter: {setter_name}")))?;
            setter
                .invoke_mut(object.as_any_mut(), vec![native])
                .map_err(|err| {
                    ResolveError::binding(format!("Setter failed: {setter_name}: {err}"))
                })?;
        }

        Ok(NativeValue::Object(object))
    }
}

fn coerce_enum(raw: &Value) -> Result<NativeValue, ResolveError> {
    match raw {
        Value::Null => Ok(NativeValue::Null),
        Value::Enum(label) => Ok(NativeValue::Enum(label.to_string())),
        Value::String(label) => Ok(NativeValue::Enum(label.clone())),
        other => Err(ResolveError::coercion(format!(
            "Expected an enum value but was '{}'.",
            value_kind(other)
        ))),
    }
}
