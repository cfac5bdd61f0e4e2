//! Schema generation.
//!
//! Described native types are walked into a [`SchemaGraph`], an arena of
//! named types plus one resolver binding per non-property field, and the
//! graph is then lowered into an executable `async-graphql` dynamic schema.
//!
//! ## Components
//!
//! - [`TypeRegistry`] - Schema name to native origin map; detects conflicts
//! - [`fields`] - Getter/setter classification of class members
//! - [`TypeGenerator`] - Resolves native types to input and output types
//! - [`SchemaGenerator`] - Registers controllers and assembles operation roots
//!
//! ## Architecture
//!
//! 1. Controllers are registered with [`SchemaGenerator::add_controller`]
//! 2. Every operation's result and parameter types are resolved, recursively
//!    defining the object, input object and enum types they reach
//! 3. [`SchemaGenerator::generate`] produces the immutable [`SchemaGraph`]
//! 4. [`SchemaGraph::into_schema`] lowers it for execution

mod builder;
mod dynamic;
pub mod fields;
mod graph;
mod registry;
mod type_generator;

pub use builder::SchemaGenerator;
pub use fields::{FieldInfo, FieldRole, INPUT_SUFFIX, ObjectInfo};
pub use graph::{
    ArgumentDescriptor, EnumType, FieldCoordinates, FieldDescriptor, InputFieldDescriptor,
    InputObjectType, ObjectType, SchemaGraph, TypeDescriptor, TypeRef,
};
pub use registry::TypeRegistry;
pub use type_generator::{Direction, TypeGenerator};
