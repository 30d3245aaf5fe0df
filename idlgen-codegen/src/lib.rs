//! # idlgen Codegen
//!
//! Rust code generation from resolved IDL programs.
//!
//! This crate provides:
//! - Struct layouts with presence flags and default constructors
//! - Constant rendering and the per-program constants holder
//! - Tagged reader and writer generation for every struct
//! - Namespace mangling into nested modules
//! - Service scaffolding: handler traits, server actions and client calls
//! - Build script integration through [`write_program`]

pub mod artifact;
pub mod config;
pub mod error;
pub mod generator;
pub mod rust;

pub use artifact::{ArtifactKind, GeneratedFile};
pub use config::GeneratorConfig;
pub use error::CodegenError;
pub use generator::Generator;

use std::path::{Path, PathBuf};

use idlgen_schema::Program;

/// Generates every artifact of a program in memory.
///
/// # Arguments
/// * `program` - Resolved program
/// * `config` - Generator options
///
/// # Returns
/// The generated files in emission order.
///
/// # Errors
/// Returns `CodegenError` if the program is invalid or uses a construct that
/// has no generated form.
pub fn generate_program(
    program: &Program,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    Generator::new(program).with_config(config.clone()).generate()
}

/// Generates a program and writes its artifacts into `out_dir`.
///
/// Intended for build scripts writing into `OUT_DIR`. No file is written
/// unless the whole program generated successfully.
///
/// # Arguments
/// * `program` - Resolved program
/// * `config` - Generator options
/// * `out_dir` - Destination directory, created if missing
///
/// # Returns
/// Paths of the written files.
///
/// # Errors
/// Returns `CodegenError` if generation fails or a file cannot be written.
pub fn write_program(
    program: &Program,
    config: &GeneratorConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, CodegenError> {
    Generator::new(program).with_config(config.clone()).write(out_dir)
}
