//! Typedef code generation.

use idlgen_schema::to_pascal_case;

use super::context::{CodegenContext, push_doc};

/// Generator for typedefs, emitted as type aliases.
pub struct TypeGenerator<'a> {
    ctx: &'a CodegenContext<'a>,
}

impl<'a> TypeGenerator<'a> {
    /// Creates a new type generator.
    #[must_use]
    pub fn new(ctx: &'a CodegenContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates all typedefs of the program.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for def in &self.ctx.program().typedefs {
            tracing::debug!(name = %def.name, target = %def.target, "generating typedef");
            push_doc(&mut output, 0, def.doc.as_deref());
            output.push_str(&format!(
                "pub type {} = {};\n\n",
                to_pascal_case(&def.name),
                self.ctx.type_name(&def.target)
            ));
        }
        output
    }
}
