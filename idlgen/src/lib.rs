//! # idlgen
//!
//! Backend of an IDL compiler targeting Rust.
//!
//! idlgen takes a resolved IDL program (typedefs, enums, structs,
//! exceptions, constants and services) and emits Rust source that represents
//! every type natively, encodes and decodes it in a tagged binary format, and
//! scaffolds request/response dispatch for every service.
//!
//! ## Features
//!
//! - **Plain Rust types** - Structs with presence flags and `Default` constructors
//! - **Tagged wire codecs** - Field-by-field readers that skip unknown fields
//! - **Service scaffolding** - Handler traits, server actions and callback clients
//! - **Build script friendly** - Artifacts are mounted with `include!`
//!
//! ## Quick Start
//!
//! ```ignore
//! use idlgen::prelude::*;
//!
//! // build.rs
//! let program = my_front_end::parse("tutorial.idl")?;
//! let config = GeneratorConfig::default().with_module_prefix("crate::generated");
//! write_program(&program, &config, Path::new(&std::env::var("OUT_DIR")?))?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Wire reader/writer, `WireStruct`, message envelope
//! - [`schema`] - Resolved program model, type resolver, validation
//! - [`codegen`] - Rust code generation
//! - [`rpc`] - Dispatcher contracts, action registry, loopback transport

pub mod prelude;

/// Wire primitives used by generated code.
pub mod core {
    pub use idlgen_core::*;
}

/// Resolved program model.
pub mod schema {
    pub use idlgen_schema::*;
}

/// Code generation from resolved programs.
pub mod codegen {
    pub use idlgen_codegen::*;
}

/// RPC contracts and transports.
pub mod rpc {
    pub use idlgen_rpc::*;
}

// Re-export commonly used items at the crate root
pub use idlgen_codegen::{Generator, GeneratorConfig, generate_program, write_program};
pub use idlgen_core::{Reader, WireStruct, Writer};
pub use idlgen_schema::Program;
