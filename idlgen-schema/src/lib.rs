//! # idlgen Schema
//!
//! The resolved IDL model consumed by the code generators.
//!
//! This crate provides:
//! - Programs, typedefs, enums, structs, exceptions, services and constants
//! - The type resolver that strips typedefs and classifies types
//! - Schema validation
//! - Identifier conversion helpers

pub mod constants;
pub mod error;
pub mod naming;
pub mod program;
pub mod resolve;
pub mod services;
pub mod structs;
pub mod types;
pub mod validation;

pub use constants::{ConstDef, ConstValue};
pub use error::SchemaError;
pub use naming::{field_ident, rust_ident, to_pascal_case, to_snake_case, to_upper_snake_case};
pub use program::Program;
pub use resolve::{TypeClass, classify, resolve, wire_type};
pub use services::{FunctionDef, ServiceDef};
pub use structs::{Field, Requiredness, StructDef};
pub use types::{BaseType, EnumDef, EnumValue, Scope, TypeRef, TypedefDef};
pub use validation::validate_program;
