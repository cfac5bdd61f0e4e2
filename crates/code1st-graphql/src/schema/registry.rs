//! Type registry.
//!
//! Tracks which schema type names have been emitted during one build and the
//! native type each name belongs to. It is the cycle-breaking primitive of
//! the generator: a name that is already defined is referenced, never
//! expanded again.

use std::collections::HashMap;

use tracing::trace;

use crate::error::SchemaError;
use crate::native::NativeOrigin;

/// Registry of emitted schema type names.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Schema type name to the native type that owns it.
    types: HashMap<String, NativeOrigin>,
}

impl TypeRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` for `origin` and reports whether it was already defined.
    ///
    /// Returns `false` on the first registration of a name and `true` when
    /// the same native type registers it again.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NamingConflict`] when the name already belongs to a
    /// different native type.
    pub fn is_defined_type(&mut self, name: &str, origin: NativeOrigin) -> Result<bool, SchemaError> {
        match self.types.get(name) {
            None => {
                trace!(type_name = %name, native = origin.type_name, "Registering type name");
                self.types.insert(name.to_string(), origin);
                Ok(false)
            }
            Some(existing) if *existing == origin => Ok(true),
            Some(existing) => Err(SchemaError::NamingConflict {
                name: name.to_string(),
                existing: existing.type_name,
                conflicting: origin.type_name,
            }),
        }
    }

    /// Native type that owns `name`, if registered.
    pub fn origin(&self, name: &str) -> Option<NativeOrigin> {
        self.types.get(name).copied()
    }

    /// Returns the number of registered names.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no name has been registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
