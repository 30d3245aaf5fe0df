//! Rust code generation modules.

pub mod constants;
pub mod context;
pub mod enums;
pub mod namespace;
pub mod serialize;
pub mod services;
pub mod structs;
pub mod types;

pub use constants::{ConstRenderer, ConstantsGenerator};
pub use context::CodegenContext;
pub use enums::EnumGenerator;
pub use namespace::{namespace_close, namespace_open, namespace_path};
pub use serialize::SerializeGenerator;
pub use services::ServiceGenerator;
pub use structs::StructGenerator;
pub use types::TypeGenerator;
