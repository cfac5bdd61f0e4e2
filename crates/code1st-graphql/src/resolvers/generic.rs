//! Generic field resolver.
//!
//! A [`ResolverBinding`] is created once per field at schema build time and
//! invoked for every request that selects the field: it coerces the raw
//! arguments in declaration order, picks the receiver (the bound controller
//! or the parent object) and calls the bound member.
//!
//! [`GenericResolver`] adapts bindings to the execution engine's resolver
//! closures.

use std::fmt;
use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext, SubscriptionFieldFuture};
use futures_util::StreamExt;
use tracing::{debug, warn};

use super::coercion::InputCoercer;
use super::into_field_value;
use crate::error::ResolveError;
use crate::native::{AnyObject, MemberInfo, NativeObject, NativeValue};
use crate::schema::{ArgumentDescriptor, SchemaGraph, TypeRef};

/// Receiver a binding invokes its member on.
#[derive(Clone)]
pub enum BindingTarget {
    /// A controller instance fixed at registration.
    Controller {
        /// Name the controller was registered under.
        name: String,
        instance: Arc<AnyObject>,
    },
    /// The parent object propagated by the execution engine.
    Parent,
}

impl fmt::Debug for BindingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controller { name, .. } => f.debug_tuple("Controller").field(name).finish(),
            Self::Parent => f.write_str("Parent"),
        }
    }
}

/// The fixed (receiver, member, arguments) tuple behind one field.
#[derive(Debug)]
pub struct ResolverBinding {
    target: BindingTarget,
    member: Arc<MemberInfo>,
    arguments: Vec<ArgumentDescriptor>,
}

impl ResolverBinding {
    /// Binds a member of a registered controller.
    pub fn controller(
        name: impl Into<String>,
        instance: Arc<AnyObject>,
        member: Arc<MemberInfo>,
        arguments: Vec<ArgumentDescriptor>,
    ) -> Self {
        Self {
            target: BindingTarget::Controller {
                name: name.into(),
                instance,
            },
            member,
            arguments,
        }
    }

    /// Binds a member invoked on the parent object.
    pub fn parent(member: Arc<MemberInfo>, arguments: Vec<ArgumentDescriptor>) -> Self {
        Self {
            target: BindingTarget::Parent,
            member,
            arguments,
        }
    }

    pub fn target(&self) -> &BindingTarget {
        &self.target
    }

    pub fn member(&self) -> &Arc<MemberInfo> {
        &self.member
    }

    /// Declared arguments, in member parameter order.
    pub fn arguments(&self) -> &[ArgumentDescriptor] {
        &self.arguments
    }

    /// Resolves the field once.
    ///
    /// `raw` yields the request's raw value for an argument name; absent
    /// arguments are coerced from null.
    ///
    /// # Errors
    ///
    /// Coercion, construction and binding errors from argument coercion,
    /// a binding error when a parent-bound field has no parent object, and
    /// the member's own failure as [`ResolveError::Target`].
    pub fn invoke(
        &self,
        graph: &SchemaGraph,
        parent: Option<&NativeObject>,
        mut raw: impl FnMut(&str) -> Option<Value>,
    ) -> Result<NativeValue, ResolveError> {
        let coercer = InputCoercer::new(graph);
        let args = self
            .arguments
            .iter()
            .map(|arg| {
                let value = raw(&arg.name).unwrap_or(Value::Null);
                coercer.coerce(&value, &arg.type_ref)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let receiver: &AnyObject = match &self.target {
            BindingTarget::Controller { instance, .. } => instance.as_ref(),
            BindingTarget::Parent => parent
                .ok_or_else(|| {
                    ResolveError::binding(format!(
                        "No parent object for member '{}'",
                        self.member.name()
                    ))
                })?
                .as_any(),
        };

        let result = self.member.invoke(receiver, args);
        if let Err(ResolveError::Target(err)) = &result {
            warn!(member = %self.member.name(), error = %err, "Bound member failed");
        }
        result
    }
}

/// Engine resolver closures for generated fields.
pub struct GenericResolver;

impl GenericResolver {
    /// Creates the resolver for a field served by a binding.
    pub fn resolve(
        graph: Arc<SchemaGraph>,
        binding: Arc<ResolverBinding>,
        type_ref: TypeRef,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + 'static {
        move |ctx| {
            let graph = Arc::clone(&graph);
            let binding = Arc::clone(&binding);
            let type_ref = type_ref.clone();
            FieldFuture::new(async move {
                if matches!(binding.target(), BindingTarget::Parent) && is_null_parent(&ctx) {
                    return Ok(None);
                }
                let parent = ctx.parent_value.downcast_ref::<NativeObject>();
                let value = binding
                    .invoke(&graph, parent, |name| {
                        ctx.args.get(name).map(|v| v.as_value().clone())
                    })
                    .and_then(|value| into_field_value(value, &type_ref))
                    .map_err(ResolveError::into_graphql_error)?;
                Ok(value)
            })
        }
    }

    /// Creates the implicit property-read resolver for a getter field.
    pub fn property(
        getter: Arc<MemberInfo>,
        type_ref: TypeRef,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + 'static {
        move |ctx| {
            let getter = Arc::clone(&getter);
            let type_ref = type_ref.clone();
            FieldFuture::new(async move {
                if is_null_parent(&ctx) {
                    return Ok(None);
                }
                let parent = ctx
                    .parent_value
                    .downcast_ref::<NativeObject>()
                    .ok_or_else(|| {
                        ResolveError::binding(format!(
                            "No parent object for property '{}'",
                            getter.name()
                        ))
                        .into_graphql_error()
                    })?;
                let value = getter
                    .invoke(parent.as_any(), Vec::new())
                    .and_then(|value| into_field_value(value, &type_ref))
                    .map_err(ResolveError::into_graphql_error)?;
                Ok(value)
            })
        }
    }

    /// Creates the resolver for a subscription field. The bound member must
    /// return a stream; each item is converted against the element type.
    pub fn subscribe(
        graph: Arc<SchemaGraph>,
        binding: Arc<ResolverBinding>,
        type_ref: TypeRef,
    ) -> impl Fn(ResolverContext<'_>) -> SubscriptionFieldFuture<'_> + Send + Sync + 'static {
        move |ctx| {
            let graph = Arc::clone(&graph);
            let binding = Arc::clone(&binding);
            let type_ref = type_ref.clone();
            SubscriptionFieldFuture::new(async move {
                let value = binding
                    .invoke(&graph, None, |name| {
                        ctx.args.get(name).map(|v| v.as_value().clone())
                    })
                    .map_err(ResolveError::into_graphql_error)?;
                let stream = match value {
                    NativeValue::Stream(stream) => stream,
                    other => {
                        return Err(ResolveError::binding(format!(
                            "Subscription member '{}' returned '{}' instead of a stream",
                            binding.member().name(),
                            other.kind()
                        ))
                        .into_graphql_error());
                    }
                };

                debug!(member = %binding.member().name(), "Subscription stream started");
                Ok(stream.map(move |item| {
                    into_field_value(item, &type_ref)
                        .map(|value| value.unwrap_or(FieldValue::NULL))
                        .map_err(ResolveError::into_graphql_error)
                }))
            })
        }
    }
}

/// The engine still resolves child selections of a null list item; they
/// resolve to null as well.
fn is_null_parent(ctx: &ResolverContext<'_>) -> bool {
    matches!(ctx.parent_value.as_value(), Some(Value::Null))
}
