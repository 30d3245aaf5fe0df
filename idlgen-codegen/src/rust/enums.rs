//! Enum code generation.
//!
//! IDL enums are open: any `i32` may arrive on the wire. They are emitted as
//! transparent newtypes with one associated constant per declared value.

use std::collections::HashSet;

use idlgen_schema::{EnumDef, to_pascal_case, to_upper_snake_case};

use super::context::{CodegenContext, push_doc};

/// Generator for enum definitions.
pub struct EnumGenerator<'a> {
    ctx: &'a CodegenContext<'a>,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(ctx: &'a CodegenContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates all enum definitions of the program.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for def in &self.ctx.program().enums {
            tracing::debug!(name = %def.name, "generating enum");
            output.push_str(&self.generate_enum(def));
        }
        output
    }

    /// Generates one enum definition.
    fn generate_enum(&self, def: &EnumDef) -> String {
        let mut output = String::new();
        let rust_name = to_pascal_case(&def.name);

        match def.doc.as_deref() {
            Some(doc) => push_doc(&mut output, 0, Some(doc)),
            None => output.push_str(&format!("/// {rust_name} enum.\n")),
        }
        output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]\n");
        output.push_str("#[repr(transparent)]\n");
        output.push_str(&format!("pub struct {rust_name}(pub i32);\n\n"));

        output.push_str(&format!("impl {rust_name} {{\n"));
        for value in &def.values {
            output.push_str(&format!(
                "    pub const {}: Self = Self({});\n",
                to_upper_snake_case(&value.name),
                value.value
            ));
        }
        if !def.values.is_empty() {
            output.push('\n');
        }

        output.push_str("    /// Returns the declared name of this value.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn name(self) -> Option<&'static str> {\n");
        if def.values.is_empty() {
            output.push_str("        None\n");
        } else {
            output.push_str("        match self.0 {\n");
            let mut seen = HashSet::new();
            for value in def.values.iter().filter(|v| seen.insert(v.value)) {
                output.push_str(&format!(
                    "            {} => Some({:?}),\n",
                    value.value, value.name
                ));
            }
            output.push_str("            _ => None,\n");
            output.push_str("        }\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl From<i32> for {rust_name} {{\n"));
        output.push_str("    fn from(value: i32) -> Self {\n");
        output.push_str("        Self(value)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl From<{rust_name}> for i32 {{\n"));
        output.push_str(&format!("    fn from(value: {rust_name}) -> Self {{\n"));
        output.push_str("        value.0\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use idlgen_schema::Program;

    fn program_with_enum() -> Program {
        let mut program = Program::new("tutorial", "tutorial");
        let scope = program.scope.clone();
        program.add_enum(
            EnumDef::new(
                &scope,
                "Operation",
                [("ADD", 1), ("SUBTRACT", 2), ("Plus", 1)],
            )
            .with_doc("Arithmetic operations."),
        );
        program
    }

    #[test]
    fn test_generate_enum() {
        let program = program_with_enum();
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let output = EnumGenerator::new(&ctx).generate();

        assert!(output.contains("/// Arithmetic operations.\n"));
        assert!(output.contains("pub struct Operation(pub i32);"));
        assert!(output.contains("pub const ADD: Self = Self(1);"));
        assert!(output.contains("pub const PLUS: Self = Self(1);"));
        assert!(output.contains("1 => Some(\"ADD\"),"));
        assert!(!output.contains("Some(\"Plus\")"));
        assert!(output.contains("impl From<Operation> for i32 {"));
        syn::parse_file(&output).unwrap();
    }

    #[test]
    fn test_generate_empty_enum() {
        let mut program = Program::new("p", "");
        let scope = program.scope.clone();
        program.add_enum(EnumDef::new(&scope, "Nothing", Vec::<(&str, i32)>::new()));
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let output = EnumGenerator::new(&ctx).generate();
        assert!(output.contains("/// Nothing enum.\n"));
        assert!(output.contains("        None\n"));
        syn::parse_file(&output).unwrap();
    }

    #[test]
    fn test_generate_no_enums() {
        let program = Program::new("p", "");
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        assert!(EnumGenerator::new(&ctx).generate().is_empty());
    }
}
