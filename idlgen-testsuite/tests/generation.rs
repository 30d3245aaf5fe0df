//! The compiled artifacts match what the generator produces now.

#[path = "../fixtures.rs"]
mod fixtures;

use std::path::Path;

use idlgen::codegen::{ArtifactKind, CodegenError, GeneratedFile, generate_program};
use idlgen::schema::{BaseType, Field, Program, StructDef};

fn assert_matches_out_dir(files: &[GeneratedFile], dir: &Path) {
    for file in files {
        let path = dir.join(file.file_name());
        let on_disk = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        assert_eq!(on_disk, file.contents, "{} differs", path.display());
    }
}

#[test]
fn test_out_dir_is_current() {
    let out_dir = Path::new(env!("OUT_DIR"));
    let config = fixtures::config();
    let shared = fixtures::shared();

    let shared_files = generate_program(&shared, &config).unwrap();
    assert_eq!(shared_files.len(), 7);
    assert_matches_out_dir(&shared_files, out_dir);

    let tutorial_files = generate_program(&fixtures::tutorial(&shared), &config).unwrap();
    assert_eq!(tutorial_files.len(), 7);
    assert_matches_out_dir(&tutorial_files, out_dir);

    let geometry_files =
        generate_program(&fixtures::geometry(), &fixtures::embedded_config()).unwrap();
    assert!(
        geometry_files
            .iter()
            .all(|f| f.kind != ArtifactKind::ServerSkeleton)
    );
    assert_matches_out_dir(&geometry_files, &out_dir.join("embedded"));
}

#[test]
fn test_generation_is_repeatable() {
    let shared = fixtures::shared();
    let program = fixtures::tutorial(&shared);
    let config = fixtures::config();
    let first = generate_program(&program, &config).unwrap();
    let second = generate_program(&program, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_artifact_layout() {
    let shared = fixtures::shared();
    let files = generate_program(&fixtures::tutorial(&shared), &fixtures::config()).unwrap();
    let types = &files[0];
    assert_eq!(types.file_name(), "tutorial_types.rs");
    assert!(types.contents.starts_with("// Autogenerated by idlgen "));
    assert!(types.contents.contains("pub mod tutorial {"));
    assert!(types.contents.contains("use crate::generated::shared_types;"));
    assert!(types.contents.trim_end().ends_with("} // namespace"));

    let embedded = generate_program(&fixtures::geometry(), &fixtures::embedded_config()).unwrap();
    assert!(
        embedded[0]
            .contents
            .contains("pub mod geo {\npub mod shapes {\npub mod embedded {\n")
    );
}

#[test]
fn test_unsupported_field_fails_generation() {
    let mut program = Program::new("broken", "broken");
    let scope = program.scope.clone();
    program.add_struct(
        StructDef::new(&scope, "Sample").with_field(Field::new(1, "ratio", BaseType::Double)),
    );
    let result = generate_program(&program, &fixtures::config());
    assert!(matches!(
        result,
        Err(CodegenError::UnsupportedWireType { .. })
    ));
}
