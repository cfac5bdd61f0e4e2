//! Schema assembly.
//!
//! [`SchemaGenerator`] scans registered controllers for members marked as
//! query, mutation or subscription operations and assembles the root
//! operation types. Roots are created on their first field; every field's
//! resolver binding is kept by name until [`SchemaGenerator::generate`]
//! wires it to the finished root.
//!
//! A controller that fails to register leaves no fields behind, and the
//! generator refuses to produce a graph afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::Schema;
use tracing::{debug, trace, warn};

use super::graph::{FieldCoordinates, FieldDescriptor, ObjectType, SchemaGraph};
use super::type_generator::TypeGenerator;
use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::native::{AnyObject, GraphQLObject, MemberInfo, Meta, OperationKind};
use crate::resolvers::ResolverBinding;

/// A root operation type under construction.
#[derive(Clone)]
struct RootBuilder {
    object: ObjectType,
    bindings: HashMap<String, Arc<ResolverBinding>>,
}

impl RootBuilder {
    fn new(kind: OperationKind) -> Self {
        Self {
            object: ObjectType::new(kind.root_name(), ""),
            bindings: HashMap::new(),
        }
    }
}

/// Builds a [`SchemaGraph`] from controllers.
///
/// # Example
///
/// ```ignore
/// let mut generator = SchemaGenerator::new();
/// generator.add_controller("hello", HelloController)?;
/// let schema = generator.build(&SchemaConfig::default())?;
/// ```
#[derive(Default)]
pub struct SchemaGenerator {
    types: TypeGenerator,
    query: Option<RootBuilder>,
    mutation: Option<RootBuilder>,
    subscription: Option<RootBuilder>,
    /// First controller registration failure.
    failure: Option<String>,
}

impl SchemaGenerator {
    /// Creates a generator with no controllers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller and generates one root field per operation
    /// marker on its members.
    ///
    /// # Errors
    ///
    /// Any type generation error for the operation's result or parameters,
    /// and [`SchemaError::DuplicateField`] when an operation name is taken.
    /// Roots are left as they were, and [`SchemaGenerator::generate`] fails
    /// from then on.
    pub fn add_controller<C: GraphQLObject>(
        &mut self,
        name: &str,
        controller: impl Into<Arc<C>>,
    ) -> Result<(), SchemaError> {
        let controller: Arc<C> = controller.into();
        let instance: Arc<AnyObject> = controller;
        let class = C::describe().into_info();

        debug!(
            controller = %name,
            class = class.type_name(),
            members = class.members().len(),
            "Registering controller"
        );

        let roots = (
            self.query.clone(),
            self.mutation.clone(),
            self.subscription.clone(),
        );
        let result = self.add_operations(name, &instance, class.members());

        if let Err(err) = &result {
            warn!(controller = %name, error = %err, "Controller registration failed");
            (self.query, self.mutation, self.subscription) = roots;
            self.failure
                .get_or_insert_with(|| format!("controller '{name}' failed to register: {err}"));
        }
        result
    }

    fn add_operations(
        &mut self,
        controller: &str,
        instance: &Arc<AnyObject>,
        members: &[Arc<MemberInfo>],
    ) -> Result<(), SchemaError> {
        for member in members {
            for (kind, meta) in member.operations() {
                self.add_operation(controller, instance, member, *kind, meta)?;
            }
        }
        Ok(())
    }

    fn add_operation(
        &mut self,
        controller: &str,
        instance: &Arc<AnyObject>,
        member: &Arc<MemberInfo>,
        kind: OperationKind,
        meta: &Meta,
    ) -> Result<(), SchemaError> {
        let field_name = meta.name_override().unwrap_or(member.name()).to_string();
        let type_ref = match kind {
            OperationKind::Subscription => self
                .types
                .generate_subscription_type(&member.return_type())?,
            OperationKind::Query | OperationKind::Mutation => {
                self.types.generate_output_type(&member.return_type())?
            }
        };
        let description = meta
            .description_override()
            .map_or_else(|| format!("{field_name}: enter {type_ref} value"), str::to_string);
        let arguments = self
            .types
            .generate_arguments(kind.root_name(), member.params())?;

        let root = self.root_mut(kind);
        if root.object.field(&field_name).is_some() {
            return Err(SchemaError::DuplicateField {
                type_name: root.object.name.clone(),
                field: field_name,
            });
        }

        trace!(
            root = %kind,
            field = %field_name,
            controller = %controller,
            member = %member.name(),
            "Adding operation field"
        );
        root.object.fields.push(FieldDescriptor {
            name: field_name.clone(),
            description,
            type_ref,
            arguments: arguments.clone(),
            accessor: None,
        });
        root.bindings.insert(
            field_name,
            Arc::new(ResolverBinding::controller(
                controller,
                Arc::clone(instance),
                Arc::clone(member),
                arguments,
            )),
        );
        Ok(())
    }

    fn root_mut(&mut self, kind: OperationKind) -> &mut RootBuilder {
        let slot = match kind {
            OperationKind::Query => &mut self.query,
            OperationKind::Mutation => &mut self.mutation,
            OperationKind::Subscription => &mut self.subscription,
        };
        slot.get_or_insert_with(|| RootBuilder::new(kind))
    }

    /// Finalizes the schema graph.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::BuildFailed`] if a controller failed to register
    /// - [`SchemaError::Internal`] if a root field has no resolver binding
    pub fn generate(self) -> Result<SchemaGraph, SchemaError> {
        let Self {
            types,
            query,
            mutation,
            subscription,
            failure,
        } = self;
        if let Some(failure) = failure {
            return Err(SchemaError::BuildFailed(failure));
        }
        let (types, mut resolvers) = types.into_parts();

        let query = finish_root(query, &mut resolvers)?;
        let mutation = finish_root(mutation, &mut resolvers)?;
        let subscription = finish_root(subscription, &mut resolvers)?;

        debug!(
            types = types.len(),
            resolvers = resolvers.len(),
            "Schema graph generated"
        );
        Ok(SchemaGraph {
            types,
            query,
            mutation,
            subscription,
            resolvers,
        })
    }

    /// Finalizes the graph and lowers it into an executable schema.
    ///
    /// # Errors
    ///
    /// Errors of [`SchemaGenerator::generate`] and
    /// [`SchemaGraph::into_schema`].
    pub fn build(self, config: &SchemaConfig) -> Result<Schema, SchemaError> {
        self.generate()?.into_schema(config)
    }
}

fn finish_root(
    root: Option<RootBuilder>,
    resolvers: &mut HashMap<FieldCoordinates, Arc<ResolverBinding>>,
) -> Result<Option<ObjectType>, SchemaError> {
    let Some(RootBuilder {
        object,
        mut bindings,
    }) = root
    else {
        return Ok(None);
    };

    for field in &object.fields {
        let binding = bindings.remove(&field.name).ok_or_else(|| {
            SchemaError::Internal(format!(
                "No resolver bound for {}.{}",
                object.name, field.name
            ))
        })?;
        resolvers.insert(FieldCoordinates::new(&object.name, &field.name), binding);
    }
    Ok(Some(object))
}
