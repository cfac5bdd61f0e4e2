//! Error types for schema generation and field resolution.
//!
//! Build-time failures ([`SchemaError`]) abort schema construction entirely.
//! Request-time failures ([`ResolveError`]) are scoped to the single field or
//! argument being resolved; turning them into a partial response is up to the
//! execution engine.

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Boxed error returned by a bound member when the member itself fails.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while generating the schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The same schema type name was bound to two different native types.
    #[error("Conflicting names for GraphQL type {name}: {existing} and {conflicting}")]
    NamingConflict {
        /// Schema type name.
        name: String,
        /// Native type that registered the name first.
        existing: &'static str,
        /// Native type that tried to reuse it.
        conflicting: &'static str,
    },

    /// A native type matched none of the type generators.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Two members produced the same field on one type.
    #[error("Duplicate field {field} on GraphQL type {type_name}")]
    DuplicateField {
        /// Owning schema type.
        type_name: String,
        /// Field name that was produced twice.
        field: String,
    },

    /// A structural invariant of the generator was violated.
    #[error("Internal schema error: {0}")]
    Internal(String),

    /// The execution engine rejected the generated schema.
    #[error("Failed to build GraphQL schema: {0}")]
    BuildFailed(String),

    /// Schema configuration is invalid.
    #[error("Invalid schema configuration: {0}")]
    InvalidConfig(String),
}

impl SchemaError {
    /// Returns the error code used in diagnostics.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NamingConflict { .. } => "NAMING_CONFLICT",
            Self::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            Self::DuplicateField { .. } => "DUPLICATE_FIELD",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::BuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Errors raised while resolving a single field at request time.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A value had the wrong shape for its declared type.
    #[error("Coercion failed: {0}")]
    Coercion(String),

    /// An input object could not be instantiated.
    #[error("Construction failed: {type_name}: {message}")]
    Construction {
        /// Native type that was being constructed.
        type_name: String,
        /// Reason reported by the constructor.
        message: String,
    },

    /// A value could not be bound to its member or receiver.
    #[error("{0}")]
    Binding(String),

    /// The bound member itself failed. Message and source are the member's own.
    #[error(transparent)]
    Target(BoxError),
}

impl ResolveError {
    /// Creates a coercion error.
    pub fn coercion(message: impl Into<String>) -> Self {
        Self::Coercion(message.into())
    }

    /// Creates a binding error.
    pub fn binding(message: impl Into<String>) -> Self {
        Self::Binding(message.into())
    }

    /// Creates a construction error for the given native type.
    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Returns the original failure raised by the bound member, if any.
    #[must_use]
    pub fn target(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Target(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Coercion(_) => "COERCION_ERROR",
            Self::Construction { .. } => "CONSTRUCTION_ERROR",
            Self::Binding(_) => "BINDING_ERROR",
            Self::Target(_) => "RESOLVER_ERROR",
        }
    }

    /// Converts into an engine error, keeping the message and adding a `code` extension.
    #[must_use]
    pub fn into_graphql_error(self) -> async_graphql::Error {
        let code = self.error_code();
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, ext| ext.set("code", code.to_string()))
    }
}
