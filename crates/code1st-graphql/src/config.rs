//! Schema configuration.
//!
//! Limits applied when the generated schema is handed to the execution
//! engine. Typically loaded from the host application's TOML configuration.
//!
//! # Example Configuration
//!
//! ```toml
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Execution limits for the generated schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl SchemaConfig {
    /// Parses a configuration from TOML and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidConfig`] on parse or validation failure.
    pub fn from_toml_str(input: &str) -> Result<Self, SchemaError> {
        let config: Self =
            toml::from_str(input).map_err(|e| SchemaError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidConfig`] if a limit is zero.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.max_depth == 0 {
            return Err(SchemaError::InvalidConfig("max_depth must be > 0".into()));
        }
        if self.max_complexity == 0 {
            return Err(SchemaError::InvalidConfig(
                "max_complexity must be > 0".into(),
            ));
        }
        Ok(())
    }
}
