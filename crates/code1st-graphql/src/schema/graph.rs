//! Schema type graph.
//!
//! Types live in an arena keyed by schema name. Fields, arguments and list
//! elements refer to named types by name only, so self-referential and
//! mutually referential classes are plain edges, never nested descriptors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::native::{ClassInfo, EnumValueInfo, MemberInfo, OperationKind};
use crate::resolvers::ResolverBinding;
use crate::types::ScalarKind;

/// Reference from a field, argument or list to a schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A scalar.
    Scalar(ScalarKind),
    /// A named type defined by this resolution.
    Defined(String),
    /// A named type defined elsewhere; emitted instead of re-expanding it.
    Reference(String),
    /// A list of the inner type.
    List(Box<TypeRef>),
}

impl TypeRef {
    /// Wraps the type in a list.
    #[must_use]
    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    /// Name of the innermost named type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(scalar) => scalar.name(),
            Self::Defined(name) | Self::Reference(name) => name,
            Self::List(inner) => inner.type_name(),
        }
    }

    /// True for a forward reference.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(inner) => write!(f, "[{inner}]"),
            other => f.write_str(other.type_name()),
        }
    }
}

/// An argument of a field.
#[derive(Debug, Clone)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub description: String,
    pub type_ref: TypeRef,
}

/// A field of an output object or operation root.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub description: String,
    pub type_ref: TypeRef,
    pub arguments: Vec<ArgumentDescriptor>,
    /// Getter read on the parent object. `None` when the field is served by
    /// an explicit resolver binding.
    pub accessor: Option<Arc<MemberInfo>>,
}

/// A field of an input object.
#[derive(Debug, Clone)]
pub struct InputFieldDescriptor {
    pub name: String,
    pub description: String,
    pub type_ref: TypeRef,
}

/// An output object type.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: String,
    pub description: String,
    pub fields: Vec<FieldDescriptor>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An input object type.
#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub name: String,
    pub description: String,
    pub fields: Vec<InputFieldDescriptor>,
    /// Native class instantiated for values of this type.
    pub class: Arc<ClassInfo>,
}

impl InputObjectType {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&InputFieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An enum type.
#[derive(Debug, Clone)]
pub struct EnumType {
    pub name: String,
    pub description: String,
    pub values: Vec<EnumValueInfo>,
}

/// A named, non-scalar schema type.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Enum(EnumType),
    InputObject(InputObjectType),
    Object(ObjectType),
}

impl TypeDescriptor {
    pub fn name(&self) -> &str {
        match self {
            Self::Enum(t) => &t.name,
            Self::InputObject(t) => &t.name,
            Self::Object(t) => &t.name,
        }
    }
}

/// Identifies a field: owning type name plus field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldCoordinates {
    pub type_name: String,
    pub field_name: String,
}

impl FieldCoordinates {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl fmt::Display for FieldCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// The finished schema: named types, operation roots and resolver bindings.
///
/// Immutable once generated; share it behind an `Arc` between executions.
#[derive(Default)]
pub struct SchemaGraph {
    pub(crate) types: IndexMap<String, TypeDescriptor>,
    pub(crate) query: Option<ObjectType>,
    pub(crate) mutation: Option<ObjectType>,
    pub(crate) subscription: Option<ObjectType>,
    pub(crate) resolvers: HashMap<FieldCoordinates, Arc<ResolverBinding>>,
}

impl SchemaGraph {
    /// Named types in the order they were first defined.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Looks up a named type.
    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Looks up an input object type.
    pub fn input_object(&self, name: &str) -> Option<&InputObjectType> {
        match self.types.get(name) {
            Some(TypeDescriptor::InputObject(t)) => Some(t),
            _ => None,
        }
    }

    /// Looks up an output object type.
    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        match self.types.get(name) {
            Some(TypeDescriptor::Object(t)) => Some(t),
            _ => None,
        }
    }

    /// Root type of an operation kind, if any field was registered for it.
    pub fn root(&self, kind: OperationKind) -> Option<&ObjectType> {
        match kind {
            OperationKind::Query => self.query.as_ref(),
            OperationKind::Mutation => self.mutation.as_ref(),
            OperationKind::Subscription => self.subscription.as_ref(),
        }
    }

    /// Resolver binding serving a field.
    pub fn resolver(&self, type_name: &str, field_name: &str) -> Option<&Arc<ResolverBinding>> {
        self.resolvers
            .get(&FieldCoordinates::new(type_name, field_name))
    }

    /// All resolver bindings.
    pub fn resolvers(&self) -> impl Iterator<Item = (&FieldCoordinates, &Arc<ResolverBinding>)> {
        self.resolvers.iter()
    }
}

impl fmt::Debug for SchemaGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaGraph")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("query", &self.query.as_ref().map(|q| q.fields.len()))
            .field("mutation", &self.mutation.as_ref().map(|m| m.fields.len()))
            .field(
                "subscription",
                &self.subscription.as_ref().map(|s| s.fields.len()),
            )
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}
