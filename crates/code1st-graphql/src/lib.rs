//! # code1st-graphql
//!
//! Code-first GraphQL schema generation.
//!
//! Plain Rust types describe themselves once (members, getters, setters,
//! constructors and operation markers) and this crate derives a complete
//! GraphQL schema from those descriptions:
//!
//! - Output object types from getters, with resolver-backed fields for every
//!   other public member
//! - Input object types (suffixed `_IN`) from setters
//! - Enum types from described constants
//! - `Long` and `Instant` scalars next to the built-in ones
//! - Query, mutation and subscription roots from controller members
//!
//! ## Overview
//!
//! ```ignore
//! use code1st_graphql::native::{ClassDescriptor, GraphQLObject, Member};
//! use code1st_graphql::{SchemaConfig, SchemaGenerator};
//!
//! struct HelloController;
//!
//! impl GraphQLObject for HelloController {
//!     fn describe() -> ClassDescriptor<Self> {
//!         ClassDescriptor::new().member(
//!             Member::method1("hello", "greet", |_: &Self, greet: String| {
//!                 format!("Hello {greet}!")
//!             })
//!             .query(),
//!         )
//!     }
//! }
//!
//! let mut generator = SchemaGenerator::new();
//! generator.add_controller("hello", HelloController)?;
//! let schema = generator.build(&SchemaConfig::default())?;
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`native`] - Self-description of native types
//! - [`types`] - Scalar mapping and coercion
//! - [`schema`] - Type generation and schema assembly
//! - [`resolvers`] - Argument coercion and the generic field resolver
//! - [`config`] - Configuration options
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod native;
pub mod resolvers;
pub mod schema;
pub mod types;

// Re-export main types
pub use config::SchemaConfig;
pub use error::{ResolveError, SchemaError};
pub use native::{EventStream, GraphQLEnum, GraphQLObject, NativeValue, Reflect};
pub use schema::{SchemaGenerator, SchemaGraph, TypeGenerator, TypeRegistry};
pub use types::ScalarKind;

/// Result type for schema generation.
pub type Result<T> = std::result::Result<T, SchemaError>;
