//! Error types for code generation.
//!
//! Every variant is fatal for the program being generated: nothing is
//! written once one of them is returned.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema validation error.
    #[error("schema error: {0}")]
    Schema(#[from] idlgen_schema::SchemaError),

    /// IO error while writing artifacts.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A constant of a kind that has no initializer form (list, set, map).
    #[error("cannot render {kind} constant '{name}'")]
    UnsupportedConstant {
        /// Constant or field being initialized.
        name: String,
        /// Offending type.
        kind: String,
    },

    /// A field whose type has no encode or decode routine.
    #[error("cannot {operation} field '{field}' of type {kind}")]
    UnsupportedWireType {
        /// Field name.
        field: String,
        /// Offending type.
        kind: String,
        /// `encode` or `decode`.
        operation: &'static str,
    },

    /// A struct literal names a field the struct does not have.
    #[error("type error: struct '{struct_name}' has no field '{field}'")]
    UnknownConstField {
        /// Struct the literal initializes.
        struct_name: String,
        /// Field named by the literal.
        field: String,
    },

    /// A constant kind that requires a value was rendered without one.
    #[error("missing value for {kind} constant '{name}'")]
    MissingConstValue {
        /// Constant or field being initialized.
        name: String,
        /// Type of the constant.
        kind: String,
    },

    /// A `void` type reached a field encoder.
    #[error("cannot serialize void field '{field}'")]
    VoidField {
        /// Field name.
        field: String,
    },

    /// Malformed generator option.
    #[error("invalid generator option '{option}': {message}")]
    InvalidOption {
        /// Option as given.
        option: String,
        /// What is wrong with it.
        message: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported_wire(
        field: &str,
        ty: &idlgen_schema::TypeRef,
        operation: &'static str,
    ) -> Self {
        Self::UnsupportedWireType {
            field: field.to_string(),
            kind: ty.to_string(),
            operation,
        }
    }
}

/// Result type for code generation.
pub type Result<T> = std::result::Result<T, CodegenError>;
