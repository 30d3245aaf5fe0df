//! Main code generator.

use std::path::{Path, PathBuf};

use idlgen_schema::{Program, ServiceDef, validate_program};

use crate::artifact::{ArtifactKind, GeneratedFile};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::rust::context::push_import;
use crate::rust::{
    CodegenContext, ConstantsGenerator, EnumGenerator, SerializeGenerator, ServiceGenerator,
    StructGenerator, TypeGenerator,
};

/// Runtime items used by the struct readers and writers.
const CODEC_IMPORTS: &str = "core::{FieldType, Reader, WireStruct, Writer}";

/// Runtime items used by the service implementation.
const SERVICE_CODEC_IMPORTS: &str = "core::{FieldType, MessageKind, Reader, WireStruct, Writer}";

/// RPC contracts used by the service implementation.
const SERVICE_RPC_IMPORTS: &str =
    "rpc::{Action, ActionParameters, ActionRegistry, ApplicationException, ClientAction, Dispatcher}";

/// Main code generator that produces every artifact of one program.
pub struct Generator<'a> {
    program: &'a Program,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a generator with the default configuration.
    ///
    /// # Arguments
    /// * `program` - Resolved program to generate code for
    #[must_use]
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            config: GeneratorConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates every artifact of the program in memory.
    ///
    /// Each call is an independent session: temporary names restart from
    /// zero, so repeated calls return identical output.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` for an invalid program, or the first
    /// generator-fatal error met while emitting any artifact.
    pub fn generate(&self) -> Result<Vec<GeneratedFile>> {
        validate_program(self.program)?;
        let ctx = CodegenContext::new(self.program, &self.config);
        let name = self.program.name();
        tracing::debug!(program = %name, "generating program");

        let mut files = vec![
            self.types(&ctx)?,
            self.types_impl(&ctx)?,
            self.constants(&ctx),
            self.constants_impl(&ctx)?,
        ];
        for service in &self.program.services {
            tracing::debug!(program = %name, service = %service.name, "generating service");
            let generator = ServiceGenerator::new(&ctx);
            files.push(self.service_interface(&ctx, &generator, service)?);
            files.push(self.service_impl(&ctx, &generator, service)?);
            if self.config.generate_skeleton {
                files.push(self.server_skeleton(&ctx, &generator, service));
            }
        }
        Ok(files)
    }

    /// Generates the program and writes every artifact into `out_dir`.
    ///
    /// Nothing is written if any artifact fails to generate.
    ///
    /// # Errors
    /// Returns generation errors, or `CodegenError::Io` if the directory or a
    /// file cannot be written.
    pub fn write(&self, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let files = self.generate()?;
        std::fs::create_dir_all(out_dir)?;
        files.iter().map(|file| file.write_to(out_dir)).collect()
    }

    /// Wraps `body` with the banner, the namespace and the imports.
    fn assemble(
        ctx: &CodegenContext<'_>,
        what: &str,
        imports: impl FnOnce(&mut String),
        body: &str,
    ) -> String {
        let mut output = String::new();
        ctx.push_file_header(&mut output, what);
        output.push_str(&ctx.namespace_open());
        imports(&mut output);
        ctx.push_include_imports(&mut output);
        output.push('\n');
        output.push_str(body);
        output.push_str(&ctx.namespace_close());
        output
    }

    fn types(&self, ctx: &CodegenContext<'_>) -> Result<GeneratedFile> {
        let mut body = TypeGenerator::new(ctx).generate();
        body.push_str(&EnumGenerator::new(ctx).generate());
        body.push_str(&StructGenerator::new(ctx).generate()?);
        let contents = Self::assemble(ctx, "Type declarations", |_| {}, &body);
        Ok(GeneratedFile::new(
            ArtifactKind::Types,
            self.program.name(),
            contents,
        ))
    }

    fn types_impl(&self, ctx: &CodegenContext<'_>) -> Result<GeneratedFile> {
        let body = SerializeGenerator::new(ctx).generate()?;
        let name = self.program.name();
        let contents = Self::assemble(
            ctx,
            "Type definitions",
            |output| {
                ctx.push_runtime_import(output, CODEC_IMPORTS);
                ctx.push_local_import(output, ArtifactKind::Types, name);
            },
            &body,
        );
        Ok(GeneratedFile::new(ArtifactKind::TypesImpl, name, contents))
    }

    fn constants(&self, ctx: &CodegenContext<'_>) -> GeneratedFile {
        let body = ConstantsGenerator::new(ctx).generate_declaration();
        let name = self.program.name();
        let contents = Self::assemble(
            ctx,
            "Constants holder",
            |output| ctx.push_local_import(output, ArtifactKind::Types, name),
            &body,
        );
        GeneratedFile::new(ArtifactKind::Constants, name, contents)
    }

    fn constants_impl(&self, ctx: &CodegenContext<'_>) -> Result<GeneratedFile> {
        let body = ConstantsGenerator::new(ctx).generate_definition()?;
        let name = self.program.name();
        let contents = Self::assemble(
            ctx,
            "Constants initialization",
            |output| {
                ctx.push_local_import(output, ArtifactKind::Types, name);
                ctx.push_local_import(output, ArtifactKind::Constants, name);
            },
            &body,
        );
        Ok(GeneratedFile::new(ArtifactKind::ConstantsImpl, name, contents))
    }

    fn service_interface(
        &self,
        ctx: &CodegenContext<'_>,
        generator: &ServiceGenerator<'_>,
        service: &ServiceDef,
    ) -> Result<GeneratedFile> {
        let body = generator.generate_interface(service)?;
        let contents = Self::assemble(
            ctx,
            &format!("Interface of service '{}'", service.name),
            |output| {
                push_import(output, "std::sync::Arc");
                ctx.push_runtime_import(output, "rpc::ApplicationException");
                ctx.push_local_import(output, ArtifactKind::Types, self.program.name());
            },
            &body,
        );
        Ok(GeneratedFile::new(ArtifactKind::Service, &service.name, contents))
    }

    fn service_impl(
        &self,
        ctx: &CodegenContext<'_>,
        generator: &ServiceGenerator<'_>,
        service: &ServiceDef,
    ) -> Result<GeneratedFile> {
        let body = generator.generate_implementation(service)?;
        let contents = Self::assemble(
            ctx,
            &format!("Implementation of service '{}'", service.name),
            |output| {
                push_import(output, "std::sync::Arc");
                ctx.push_runtime_import(output, SERVICE_CODEC_IMPORTS);
                ctx.push_runtime_import(output, SERVICE_RPC_IMPORTS);
                ctx.push_local_import(output, ArtifactKind::Types, self.program.name());
                ctx.push_local_import(output, ArtifactKind::Service, &service.name);
            },
            &body,
        );
        Ok(GeneratedFile::new(
            ArtifactKind::ServiceImpl,
            &service.name,
            contents,
        ))
    }

    fn server_skeleton(
        &self,
        ctx: &CodegenContext<'_>,
        generator: &ServiceGenerator<'_>,
        service: &ServiceDef,
    ) -> GeneratedFile {
        let body = generator.generate_skeleton(service);
        let contents = Self::assemble(
            ctx,
            &format!("Server skeleton of service '{}'", service.name),
            |output| {
                push_import(output, "std::sync::Arc");
                ctx.push_runtime_import(output, "rpc::ActionRegistry");
                ctx.push_local_import(output, ArtifactKind::Types, self.program.name());
            },
            &body,
        );
        GeneratedFile::new(ArtifactKind::ServerSkeleton, &service.name, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodegenError;
    use idlgen_schema::{
        BaseType, ConstDef, ConstValue, EnumDef, Field, FunctionDef, StructDef,
    };
    use std::sync::Arc;

    fn shared() -> Arc<Program> {
        let mut program = Program::new("shared", "shared");
        let scope = program.scope.clone();
        let shared_struct = program.add_struct(
            StructDef::new(&scope, "SharedStruct")
                .with_field(Field::new(1, "key", BaseType::I32))
                .with_field(Field::new(2, "value", BaseType::String)),
        );
        program.add_service(
            ServiceDef::new(&scope, "SharedService").with_function(
                FunctionDef::new(&scope, "getStruct", shared_struct)
                    .with_arg(Field::new(1, "key", BaseType::I32)),
            ),
        );
        Arc::new(program)
    }

    fn tutorial(shared: &Arc<Program>) -> Program {
        let mut program = Program::new("tutorial", "tutorial");
        program.add_include(shared);
        let scope = program.scope.clone();
        let op = program.add_enum(EnumDef::new(
            &scope,
            "Operation",
            [("ADD", 1), ("SUBTRACT", 2)],
        ));
        let work = program.add_struct(
            StructDef::new(&scope, "Work")
                .with_field(Field::new(1, "num1", BaseType::I32).with_default(ConstValue::Integer(0)))
                .with_field(Field::new(2, "num2", BaseType::I32))
                .with_field(Field::new(3, "op", op))
                .with_field(Field::new(4, "comment", BaseType::String).optional()),
        );
        program.add_const(ConstDef::new("INT32CONSTANT", BaseType::I32, ConstValue::Integer(9853)));
        program.add_const(ConstDef::new(
            "DEFAULT_WORK",
            Arc::clone(&work),
            ConstValue::struct_literal([("num1", ConstValue::Integer(1))]),
        ));
        let job = program.add_struct(
            StructDef::new(&scope, "Job").with_field(Field::new(1, "work", Arc::clone(&work))),
        );
        program.add_const(ConstDef::new(
            "DEFAULT_JOB",
            job,
            ConstValue::struct_literal([(
                "work",
                ConstValue::struct_literal([("num2", ConstValue::Integer(2))]),
            )]),
        ));
        program.add_service(
            ServiceDef::new(&scope, "Calculator")
                .extending(&shared.services[0])
                .with_function(FunctionDef::new(&scope, "ping", BaseType::Void))
                .with_function(
                    FunctionDef::new(&scope, "calculate", BaseType::I32)
                        .with_arg(Field::new(1, "logid", BaseType::I32))
                        .with_arg(Field::new(2, "w", work)),
                )
                .with_function(FunctionDef::oneway(&scope, "zip")),
        );
        program
    }

    #[test]
    fn test_artifact_set() {
        let shared = shared();
        let program = tutorial(&shared);
        let files = Generator::new(&program).generate().unwrap();
        let names: Vec<String> = files.iter().map(GeneratedFile::file_name).collect();
        assert_eq!(
            names,
            [
                "tutorial_types.rs",
                "tutorial_types_impl.rs",
                "tutorial_constants.rs",
                "tutorial_constants_impl.rs",
                "calculator_service.rs",
                "calculator_service_impl.rs",
                "calculator_server_skeleton.rs",
            ]
        );
    }

    #[test]
    fn test_every_artifact_parses() {
        let shared = shared();
        let program = tutorial(&shared);
        let config = GeneratorConfig::default()
            .with_module_prefix("crate::generated")
            .with_embedded_namespace(true);
        for file in Generator::new(&program).with_config(config).generate().unwrap() {
            assert!(
                syn::parse_file(&file.contents).is_ok(),
                "{} does not parse",
                file.file_name()
            );
            assert!(file.contents.starts_with("// Autogenerated by idlgen"));
            assert!(!file.contents.contains("#!["));
            assert!(!file.contents.contains("//!"));
        }
        for file in Generator::new(&shared).generate().unwrap() {
            syn::parse_file(&file.contents).unwrap();
        }
    }

    #[test]
    fn test_imports_and_namespace() {
        let shared = shared();
        let program = tutorial(&shared);
        let config = GeneratorConfig::default().with_module_prefix("crate::generated");
        let files = Generator::new(&program).with_config(config).generate().unwrap();

        let types = &files[0].contents;
        assert!(types.contains("pub mod tutorial {\n"));
        assert!(types.contains("use crate::generated::shared_types;\n"));
        assert!(types.ends_with("} // namespace\n"));

        let types_impl = &files[1].contents;
        assert!(types_impl.contains("use ::idlgen::core::{FieldType, Reader, WireStruct, Writer};\n"));
        assert!(types_impl.contains("use crate::generated::tutorial_types::tutorial::*;\n"));

        let service_impl = &files[5].contents;
        assert!(service_impl.contains("use crate::generated::calculator_service::tutorial::*;\n"));
    }

    #[test]
    fn test_skeleton_toggle() {
        let shared = shared();
        let program = tutorial(&shared);
        let config = GeneratorConfig::default().with_skeleton(false);
        let files = Generator::new(&program).with_config(config).generate().unwrap();
        assert!(files.iter().all(|f| f.kind != ArtifactKind::ServerSkeleton));
        assert_eq!(files.len(), 6);
    }

    #[test]
    fn test_generation_is_repeatable() {
        let shared = shared();
        let program = tutorial(&shared);
        let generator = Generator::new(&program);
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_eq!(first, second);
        assert!(first[3].contents.contains("let mut tmp0 = Work::default();"));
    }

    #[test]
    fn test_invalid_program_is_rejected() {
        let mut program = Program::new("bad", "");
        let scope = program.scope.clone();
        program.add_struct(
            StructDef::new(&scope, "Dup")
                .with_field(Field::new(1, "a", BaseType::I32))
                .with_field(Field::new(1, "b", BaseType::I32)),
        );
        assert!(matches!(
            Generator::new(&program).generate(),
            Err(CodegenError::Schema(_))
        ));
    }

    #[test]
    fn test_failure_writes_nothing() {
        let mut program = Program::new("bad", "");
        let scope = program.scope.clone();
        program.add_struct(
            StructDef::new(&scope, "Holder")
                .with_field(Field::new(1, "ratio", BaseType::Double)),
        );
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gen");
        let result = Generator::new(&program).write(&out);
        assert!(matches!(
            result,
            Err(CodegenError::UnsupportedWireType { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_write() {
        let shared = shared();
        let dir = tempfile::tempdir().unwrap();
        let paths = Generator::new(&shared).write(dir.path()).unwrap();
        assert_eq!(paths.len(), 7);
        for path in paths {
            assert!(path.exists());
        }
    }
}
