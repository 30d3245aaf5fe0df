//! Reader and writer code generation.
//!
//! Readers dispatch on the field id and check the wire type tag before
//! decoding, so fields may arrive in any order and unknown fields are
//! skipped. Writers emit fields in ascending id order and omit absent
//! non-required fields.

use idlgen_schema::{BaseType, StructDef, TypeRef, field_ident, resolve, to_pascal_case, to_snake_case};

use super::context::{CodegenContext, pad};
use super::structs::isset_name;
use crate::error::{CodegenError, Result};

/// One field a generated read loop decodes.
#[derive(Debug, Clone)]
pub struct ReadTarget<'t> {
    /// Field id on the wire.
    pub id: i16,
    /// IDL field name, for diagnostics.
    pub name: &'t str,
    /// Declared type.
    pub ty: &'t TypeRef,
    /// Place expression receiving the value.
    pub place: String,
    /// Statement recording that the field was seen.
    pub mark: String,
    /// Name of the local flag checked after the loop, for required fields.
    pub required_flag: Option<String>,
}

/// Generator for `WireStruct` implementations.
pub struct SerializeGenerator<'a> {
    ctx: &'a CodegenContext<'a>,
}

impl<'a> SerializeGenerator<'a> {
    /// Creates a new serialization generator.
    #[must_use]
    pub fn new(ctx: &'a CodegenContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates reader and writer of every struct of the program.
    ///
    /// # Errors
    /// Fails if a field has a type without wire support.
    pub fn generate(&self) -> Result<String> {
        let mut output = String::new();
        for def in &self.ctx.program().structs {
            tracing::debug!(name = %def.name, "generating reader and writer");
            output.push_str(&self.generate_impl(def, &to_pascal_case(&def.name))?);
        }
        Ok(output)
    }

    /// Generates `impl WireStruct` for the struct emitted as `rust_name`.
    ///
    /// # Errors
    /// Fails if a field has a type without wire support.
    pub fn generate_impl(&self, def: &StructDef, rust_name: &str) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!("impl WireStruct for {rust_name} {{\n"));
        output.push_str(&self.generate_reader(def, rust_name)?);
        output.push('\n');
        output.push_str(&self.generate_writer(def)?);
        output.push_str("}\n\n");
        Ok(output)
    }

    fn generate_reader(&self, def: &StructDef, rust_name: &str) -> Result<String> {
        let mut output = String::new();
        output.push_str("    fn read(&mut self, reader: &mut Reader<'_>) -> bool {\n");
        output.push_str("        let mut read_result = true;\n");

        let mut targets = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let ident = field_ident(&field.name);
            let place = format!("self.{ident}");
            if field.has_presence_flag() {
                targets.push(ReadTarget {
                    id: field.id,
                    name: &field.name,
                    ty: &field.ty,
                    place,
                    mark: format!("self.isset.{ident} = true;"),
                    required_flag: None,
                });
            } else {
                let flag = format!("{}_present", to_snake_case(&field.name));
                output.push_str(&format!("        let mut {flag} = false;\n"));
                targets.push(ReadTarget {
                    id: field.id,
                    name: &field.name,
                    ty: &field.ty,
                    place,
                    mark: format!("{flag} = true;"),
                    required_flag: Some(flag),
                });
            }
        }
        if def.has_presence_flags() {
            output.push_str(&format!(
                "        self.isset = {}::default();\n",
                isset_name(rust_name)
            ));
        }

        self.emit_read_loop(&mut output, 2, &targets)?;
        output.push_str("        read_result\n");
        output.push_str("    }\n");
        Ok(output)
    }

    fn generate_writer(&self, def: &StructDef) -> Result<String> {
        let mut output = String::new();
        output.push_str("    fn write(&self, writer: &mut Writer) -> bool {\n");
        for field in def.sorted_fields() {
            let ident = field_ident(&field.name);
            let place = format!("self.{ident}");
            if field.has_presence_flag() {
                output.push_str(&format!("        if self.isset.{ident} {{\n"));
                self.emit_field_write(&mut output, 3, field.id, &field.name, &field.ty, &place)?;
                output.push_str("        }\n");
            } else {
                self.emit_field_write(&mut output, 2, field.id, &field.name, &field.ty, &place)?;
            }
        }
        output.push_str("        writer.add_stop();\n");
        output.push_str("        !writer.has_errors()\n");
        output.push_str("    }\n");
        Ok(output)
    }

    /// Emits the field loop of a reader over the local `reader`.
    ///
    /// Expects a mutable local `read_result` in scope and leaves it false if
    /// the input was malformed, a field had the wrong wire type, or a required
    /// target was not seen.
    ///
    /// # Errors
    /// Fails if a target has a type without decode support.
    pub fn emit_read_loop(
        &self,
        output: &mut String,
        level: usize,
        targets: &[ReadTarget<'_>],
    ) -> Result<()> {
        let p = pad(level);
        output.push_str(&format!("{p}while read_result && reader.parse_next_field() {{\n"));
        output.push_str(&format!("{p}    let field = reader.parsed_field();\n"));
        output.push_str(&format!("{p}    if field.is_stop() {{\n"));
        output.push_str(&format!("{p}        break;\n"));
        output.push_str(&format!("{p}    }}\n"));

        if targets.is_empty() {
            output.push_str(&format!("{p}    if !reader.skip_field(field) {{\n"));
            output.push_str(&format!("{p}        read_result = false;\n"));
            output.push_str(&format!("{p}    }}\n"));
        } else {
            output.push_str(&format!("{p}    match field.id {{\n"));
            for target in targets {
                let tag = target
                    .ty
                    .wire_type()
                    .ok_or_else(|| CodegenError::VoidField {
                        field: target.name.to_string(),
                    })?;
                let decode = self.decode_statements(target, level + 4)?;
                output.push_str(&format!("{p}        {} => {{\n", target.id));
                output.push_str(&format!(
                    "{p}            if field.field_type == FieldType::{tag:?} {{\n"
                ));
                output.push_str(&decode);
                output.push_str(&format!("{p}            }} else {{\n"));
                output.push_str(&format!("{p}                reader.skip_field(field);\n"));
                output.push_str(&format!("{p}                read_result = false;\n"));
                output.push_str(&format!("{p}            }}\n"));
                output.push_str(&format!("{p}        }}\n"));
            }
            output.push_str(&format!("{p}        _ => {{\n"));
            output.push_str(&format!("{p}            if !reader.skip_field(field) {{\n"));
            output.push_str(&format!("{p}                read_result = false;\n"));
            output.push_str(&format!("{p}            }}\n"));
            output.push_str(&format!("{p}        }}\n"));
            output.push_str(&format!("{p}    }}\n"));
        }
        output.push_str(&format!("{p}}}\n"));

        output.push_str(&format!("{p}if reader.has_errors() {{\n"));
        output.push_str(&format!("{p}    read_result = false;\n"));
        output.push_str(&format!("{p}}}\n"));
        for flag in targets.iter().filter_map(|t| t.required_flag.as_deref()) {
            output.push_str(&format!("{p}if !{flag} {{\n"));
            output.push_str(&format!("{p}    read_result = false;\n"));
            output.push_str(&format!("{p}}}\n"));
        }
        Ok(())
    }

    /// Statements decoding the current `field` into the target.
    fn decode_statements(&self, target: &ReadTarget<'_>, level: usize) -> Result<String> {
        let p = pad(level);
        let place = &target.place;
        let mark = &target.mark;
        let unsupported = || CodegenError::unsupported_wire(target.name, target.ty, "decode");

        let scalar = |accessor: &str| format!("{p}{place} = field.value.{accessor}();\n{p}{mark}\n");
        let borrowed = |accessor: &str, convert: &str| {
            format!(
                "{p}match field.value.{accessor}() {{\n\
                 {p}    Some(value) => {{\n\
                 {p}        {place} = value.{convert}();\n\
                 {p}        {mark}\n\
                 {p}    }}\n\
                 {p}    None => read_result = false,\n\
                 {p}}}\n"
            )
        };

        let statements = match resolve(target.ty) {
            TypeRef::Base(base) => match base {
                BaseType::Bool => scalar("as_bool"),
                BaseType::I16 => scalar("as_i16"),
                BaseType::I32 => scalar("as_i32"),
                BaseType::I64 => scalar("as_i64"),
                BaseType::String => borrowed("as_str", "to_owned"),
                BaseType::Binary => borrowed("as_bytes", "to_vec"),
                BaseType::Byte | BaseType::Double => return Err(unsupported()),
                BaseType::Void => {
                    return Err(CodegenError::VoidField {
                        field: target.name.to_string(),
                    });
                }
            },
            TypeRef::Enum(_) => format!(
                "{p}{place} = {}(field.value.as_i32());\n{p}{mark}\n",
                self.ctx.resolved_name(target.ty)
            ),
            TypeRef::Struct(_) => format!(
                "{p}if reader.read_struct(&mut {place}) {{\n\
                 {p}    {mark}\n\
                 {p}}} else {{\n\
                 {p}    read_result = false;\n\
                 {p}}}\n"
            ),
            TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Map(_, _) | TypeRef::Typedef(_) => {
                return Err(unsupported());
            }
        };
        Ok(statements)
    }

    /// Emits the encode call for one field whose value is `place`, using the
    /// local `writer`.
    ///
    /// # Errors
    /// Fails for byte, double, binary, void and container types.
    pub fn emit_field_write(
        &self,
        output: &mut String,
        level: usize,
        id: i16,
        name: &str,
        ty: &TypeRef,
        place: &str,
    ) -> Result<()> {
        let p = pad(level);
        let unsupported = || CodegenError::unsupported_wire(name, ty, "encode");
        let statements = match resolve(ty) {
            TypeRef::Base(base) => match base {
                BaseType::Bool => format!("{p}writer.add_bool({id}, {place});\n"),
                BaseType::I16 => format!("{p}writer.add_i16({id}, {place});\n"),
                BaseType::I32 => format!("{p}writer.add_i32({id}, {place});\n"),
                BaseType::I64 => format!("{p}writer.add_i64({id}, {place});\n"),
                BaseType::String => format!("{p}writer.add_string({id}, &{place});\n"),
                BaseType::Binary | BaseType::Byte | BaseType::Double => {
                    return Err(unsupported());
                }
                BaseType::Void => {
                    return Err(CodegenError::VoidField {
                        field: name.to_string(),
                    });
                }
            },
            TypeRef::Enum(_) => format!("{p}writer.add_i32({id}, {place}.0);\n"),
            TypeRef::Struct(_) => format!(
                "{p}writer.open_struct({id});\n\
                 {p}{place}.write(writer);\n\
                 {p}writer.close_struct();\n"
            ),
            TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Map(_, _) | TypeRef::Typedef(_) => {
                return Err(unsupported());
            }
        };
        output.push_str(&statements);
        Ok(())
    }
}
