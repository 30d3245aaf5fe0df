//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use idlgen::prelude::*;
//! ```

// Wire types
pub use idlgen_core::{
    MessageHeader, MessageKind, Reader, WireError, WireStruct, Writer, decode_from_slice,
    encode_to_bytes,
};

// Schema types
pub use idlgen_schema::{
    BaseType, ConstDef, ConstValue, EnumDef, Field, FunctionDef, Program, Scope, ServiceDef,
    StructDef, TypeRef, TypedefDef,
};

// Code generation
pub use idlgen_codegen::{
    CodegenError, GeneratedFile, Generator, GeneratorConfig, generate_program, write_program,
};

// RPC types
pub use idlgen_rpc::{
    Action, ActionParameters, ActionRegistry, ApplicationException, ClientAction, Dispatcher,
    DispatcherConfig, LoopbackDispatcher,
};
