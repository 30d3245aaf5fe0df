//! Generates the fixture programs into `OUT_DIR`.

#[path = "fixtures.rs"]
mod fixtures;

use std::path::PathBuf;

use idlgen::codegen::write_program;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=fixtures.rs");
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    let config = fixtures::config();
    let shared = fixtures::shared();
    write_program(&shared, &config, &out_dir)?;
    write_program(&fixtures::tutorial(&shared), &config, &out_dir)?;
    write_program(
        &fixtures::geometry(),
        &fixtures::embedded_config(),
        &out_dir.join("embedded"),
    )?;
    Ok(())
}
