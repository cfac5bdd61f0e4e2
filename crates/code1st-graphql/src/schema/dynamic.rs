//! Lowering of the schema graph into an executable dynamic schema.

use std::sync::Arc;

use async_graphql::dynamic::{
    self, Enum, EnumItem, Field, InputObject, InputValue, Object, Scalar, Schema, SchemaBuilder,
    Subscription, SubscriptionField,
};
use async_graphql::Value;
use tracing::debug;

use super::graph::{
    ArgumentDescriptor, EnumType, InputObjectType, ObjectType, SchemaGraph, TypeDescriptor,
    TypeRef,
};
use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::native::OperationKind;
use crate::resolvers::GenericResolver;
use crate::types::ScalarKind;

impl From<&TypeRef> for dynamic::TypeRef {
    fn from(type_ref: &TypeRef) -> Self {
        match type_ref {
            TypeRef::List(inner) => {
                dynamic::TypeRef::List(Box::new(dynamic::TypeRef::from(&**inner)))
            }
            other => dynamic::TypeRef::named(other.type_name().to_string()),
        }
    }
}

impl SchemaGraph {
    /// Lowers the graph into an executable schema.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidConfig`] if the configuration is invalid
    /// - [`SchemaError::BuildFailed`] if no query operation was registered or
    ///   the engine rejects the schema
    /// - [`SchemaError::Internal`] if a field has no way to be resolved
    pub fn into_schema(self, config: &SchemaConfig) -> Result<Schema, SchemaError> {
        config.validate()?;
        debug!("Starting GraphQL schema build");

        if self.query.is_none() {
            return Err(SchemaError::BuildFailed(
                "no query operation was registered".into(),
            ));
        }
        let graph = Arc::new(self);

        let mut builder = Schema::build(
            OperationKind::Query.root_name(),
            graph
                .mutation
                .as_ref()
                .map(|_| OperationKind::Mutation.root_name()),
            graph
                .subscription
                .as_ref()
                .map(|_| OperationKind::Subscription.root_name()),
        );

        builder = register_scalars(builder);

        for descriptor in graph.types.values() {
            builder = match descriptor {
                TypeDescriptor::Enum(enumeration) => builder.register(lower_enum(enumeration)),
                TypeDescriptor::InputObject(input) => builder.register(lower_input_object(input)),
                TypeDescriptor::Object(object) => builder.register(lower_object(&graph, object)?),
            };
        }

        if let Some(query) = &graph.query {
            builder = builder.register(lower_object(&graph, query)?);
        }
        if let Some(mutation) = &graph.mutation {
            builder = builder.register(lower_object(&graph, mutation)?);
        }
        if let Some(subscription) = &graph.subscription {
            builder = builder.register(lower_subscription(&graph, subscription)?);
        }

        let mut builder = builder.limit_depth(config.max_depth);
        builder = builder.limit_complexity(config.max_complexity);
        if !config.introspection {
            builder = builder.disable_introspection();
        }

        let schema = builder
            .finish()
            .map_err(|e| SchemaError::BuildFailed(e.to_string()))?;

        debug!(types = graph.types.len(), "GraphQL schema build complete");
        Ok(schema)
    }
}

/// Registers the custom scalars. Literals are checked against the scalar's
/// input coercion before execution.
fn register_scalars(mut builder: SchemaBuilder) -> SchemaBuilder {
    for kind in ScalarKind::CUSTOM {
        let mut scalar = Scalar::new(kind.name())
            .validator(move |value: &Value| kind.parse_literal(value).is_ok());
        if let Some(description) = kind.description() {
            scalar = scalar.description(description);
        }
        builder = builder.register(scalar);
    }
    builder
}

fn lower_enum(enumeration: &EnumType) -> Enum {
    enumeration.values.iter().fold(
        Enum::new(&enumeration.name).description(&enumeration.description),
        |e, value| e.item(EnumItem::new(&value.label)),
    )
}

fn lower_input_object(input: &InputObjectType) -> InputObject {
    input.fields.iter().fold(
        InputObject::new(&input.name).description(&input.description),
        |object, field| {
            object.field(
                InputValue::new(&field.name, dynamic::TypeRef::from(&field.type_ref))
                    .description(&field.description),
            )
        },
    )
}

fn lower_arguments(arguments: &[ArgumentDescriptor]) -> impl Iterator<Item = InputValue> + '_ {
    arguments.iter().map(|arg| {
        InputValue::new(&arg.name, dynamic::TypeRef::from(&arg.type_ref))
            .description(&arg.description)
    })
}

fn lower_object(graph: &Arc<SchemaGraph>, object: &ObjectType) -> Result<Object, SchemaError> {
    let mut lowered = Object::new(&object.name);
    if !object.description.is_empty() {
        lowered = lowered.description(&object.description);
    }

    for field in &object.fields {
        let ty = dynamic::TypeRef::from(&field.type_ref);
        let mut lowered_field = match &field.accessor {
            Some(getter) => Field::new(
                &field.name,
                ty,
                GenericResolver::property(Arc::clone(getter), field.type_ref.clone()),
            ),
            None => {
                let binding = graph.resolver(&object.name, &field.name).ok_or_else(|| {
                    SchemaError::Internal(format!(
                        "No resolver bound for {}.{}",
                        object.name, field.name
                    ))
                })?;
                Field::new(
                    &field.name,
                    ty,
                    GenericResolver::resolve(
                        Arc::clone(graph),
                        Arc::clone(binding),
                        field.type_ref.clone(),
                    ),
                )
            }
        };
        lowered_field = lowered_field.description(&field.description);
        for argument in lower_arguments(&field.arguments) {
            lowered_field = lowered_field.argument(argument);
        }
        lowered = lowered.field(lowered_field);
    }
    Ok(lowered)
}

fn lower_subscription(
    graph: &Arc<SchemaGraph>,
    root: &ObjectType,
) -> Result<Subscription, SchemaError> {
    let mut subscription = Subscription::new(&root.name);
    for field in &root.fields {
        let binding = graph.resolver(&root.name, &field.name).ok_or_else(|| {
            SchemaError::Internal(format!(
                "No resolver bound for {}.{}",
                root.name, field.name
            ))
        })?;
        let mut lowered = SubscriptionField::new(
            &field.name,
            dynamic::TypeRef::from(&field.type_ref),
            GenericResolver::subscribe(
                Arc::clone(graph),
                Arc::clone(binding),
                field.type_ref.clone(),
            ),
        )
        .description(&field.description);
        for argument in lower_arguments(&field.arguments) {
            lowered = lowered.argument(argument);
        }
        subscription = subscription.field(lowered);
    }
    Ok(subscription)
}
