//! Error types for schema validation.

use thiserror::Error;

/// Error type for schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields of one struct or argument list share an id.
    #[error("duplicate field id {id} in '{owner}'")]
    DuplicateFieldId {
        /// Owning struct or function.
        owner: String,
        /// Repeated id.
        id: i16,
    },

    /// Two fields of one struct or argument list share a name.
    #[error("duplicate field name '{name}' in '{owner}'")]
    DuplicateFieldName {
        /// Owning struct or function.
        owner: String,
        /// Repeated name.
        name: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition (type, constant, function, etc.).
        kind: String,
        /// Name of the duplicate.
        name: String,
    },

    /// A field was declared with the void type.
    #[error("field '{field}' in '{owner}' has type void")]
    VoidField {
        /// Owning struct or function.
        owner: String,
        /// Field name.
        field: String,
    },

    /// Validation error.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl SchemaError {
    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates a generic validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
