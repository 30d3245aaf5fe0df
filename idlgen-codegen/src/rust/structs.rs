//! Struct layout generation.
//!
//! Emits the data declaration of a struct, its presence flags and the
//! `Default` impl acting as the default constructor.

use idlgen_schema::{Field, StructDef, TypeClass, field_ident, to_pascal_case};

use super::constants::ConstRenderer;
use super::context::{CodegenContext, pad, push_doc};
use crate::error::Result;

/// Name of the presence flag companion of a struct.
#[must_use]
pub fn isset_name(rust_name: &str) -> String {
    format!("{rust_name}IsSet")
}

/// Generator for struct and exception layouts.
pub struct StructGenerator<'a> {
    ctx: &'a CodegenContext<'a>,
}

impl<'a> StructGenerator<'a> {
    /// Creates a new struct generator.
    #[must_use]
    pub fn new(ctx: &'a CodegenContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates the layouts of every struct and exception of the program.
    ///
    /// # Errors
    /// Propagates failures rendering field defaults.
    pub fn generate(&self) -> Result<String> {
        let mut output = String::new();
        for def in &self.ctx.program().structs {
            tracing::debug!(name = %def.name, exception = def.is_exception, "generating struct");
            let rust_name = to_pascal_case(&def.name);
            let summary = if def.is_exception {
                format!("{rust_name} exception.")
            } else {
                format!("{rust_name} struct.")
            };
            output.push_str(&self.generate_struct(def, &rust_name, &summary)?);
        }
        Ok(output)
    }

    /// Generates one layout under the name `rust_name`.
    ///
    /// `summary` documents the struct when the schema carries no doc.
    ///
    /// # Errors
    /// Propagates failures rendering field defaults.
    pub fn generate_struct(
        &self,
        def: &StructDef,
        rust_name: &str,
        summary: &str,
    ) -> Result<String> {
        let mut output = String::new();
        let flagged: Vec<&Field> = def.fields.iter().filter(|f| f.has_presence_flag()).collect();

        if !flagged.is_empty() {
            output.push_str(&format!("/// Presence flags of [`{rust_name}`].\n"));
            output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]\n");
            output.push_str(&format!("pub struct {} {{\n", isset_name(rust_name)));
            for field in &flagged {
                output.push_str(&format!("    pub {}: bool,\n", field_ident(&field.name)));
            }
            output.push_str("}\n\n");
        }

        match def.doc.as_deref() {
            Some(doc) => push_doc(&mut output, 0, Some(doc)),
            None => output.push_str(&format!("/// {summary}\n")),
        }
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub struct {rust_name} {{\n"));
        for field in &def.fields {
            push_doc(&mut output, 1, field.doc.as_deref());
            output.push_str(&format!(
                "    pub {}: {},\n",
                field_ident(&field.name),
                self.ctx.type_name(&field.ty)
            ));
        }
        if !flagged.is_empty() {
            output.push_str(&format!("    pub isset: {},\n", isset_name(rust_name)));
        }
        output.push_str("}\n\n");

        output.push_str(&self.generate_default(def, rust_name, !flagged.is_empty())?);

        if def.is_exception {
            output.push_str(&format!("impl std::fmt::Display for {rust_name} {{\n"));
            output.push_str(
                "    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {\n",
            );
            output.push_str("        write!(f, \"{:?}\", self)\n");
            output.push_str("    }\n");
            output.push_str("}\n\n");
            output.push_str(&format!("impl std::error::Error for {rust_name} {{}}\n\n"));
        }

        Ok(output)
    }

    /// Emits `impl Default`, initializing scalars inline and aggregates
    /// through assignments after construction.
    fn generate_default(&self, def: &StructDef, rust_name: &str, has_isset: bool) -> Result<String> {
        let renderer = ConstRenderer::new(self.ctx);
        let mut literal = String::new();
        let mut statements = String::new();

        for field in &def.fields {
            let ident = field_ident(&field.name);
            let init = match (field.ty.class(), field.default.as_ref()) {
                (TypeClass::Base | TypeClass::Enum, Some(value)) => {
                    renderer.render_value(&mut statements, 2, &field.name, &field.ty, Some(value))?
                }
                (_, Some(value)) => {
                    let target = format!("value.{ident}");
                    renderer.print_value(&mut statements, 2, &target, &field.ty, value)?;
                    self.ctx.zero_value(&field.ty)
                }
                (_, None) => self.ctx.zero_value(&field.ty),
            };
            literal.push_str(&format!("{}{ident}: {init},\n", pad(3)));
        }
        if has_isset {
            literal.push_str(&format!(
                "{}isset: {}::default(),\n",
                pad(3),
                isset_name(rust_name)
            ));
        }

        let mut output = String::new();
        output.push_str(&format!("impl Default for {rust_name} {{\n"));
        output.push_str("    fn default() -> Self {\n");
        if statements.is_empty() {
            output.push_str("        Self {\n");
            output.push_str(&literal);
            output.push_str("        }\n");
        } else {
            output.push_str("        let mut value = Self {\n");
            output.push_str(&literal);
            output.push_str("        };\n");
            output.push_str(&statements);
            output.push_str("        value\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        Ok(output)
    }
}
