//! Constant value rendering and the constants holder.
//!
//! [`ConstRenderer::render_value`] turns a constant into an initializer
//! expression, emitting any statements it needs (temporaries for struct
//! literals) into the output first. [`ConstRenderer::print_value`] emits
//! assignments of a constant to an existing place.

use idlgen_schema::{
    BaseType, ConstValue, StructDef, TypeRef, field_ident, resolve, to_pascal_case,
    to_upper_snake_case,
};

use super::context::{CodegenContext, pad, push_doc};
use crate::artifact::ArtifactKind;
use crate::error::{CodegenError, Result};

/// Renders constant values into initialization code.
pub struct ConstRenderer<'a> {
    ctx: &'a CodegenContext<'a>,
}

impl<'a> ConstRenderer<'a> {
    /// Creates a renderer bound to a generation session.
    #[must_use]
    pub fn new(ctx: &'a CodegenContext<'a>) -> Self {
        Self { ctx }
    }

    /// Renders `value` as an expression of type `ty`.
    ///
    /// Statements the expression depends on are appended to `output` at
    /// indentation `level`. `name` identifies the constant in errors.
    ///
    /// # Errors
    /// Fails for list, set and map constants, for an absent `i64` value, and
    /// for struct literals naming unknown fields.
    pub fn render_value(
        &self,
        output: &mut String,
        level: usize,
        name: &str,
        ty: &TypeRef,
        value: Option<&ConstValue>,
    ) -> Result<String> {
        let rendered = match resolve(ty) {
            TypeRef::Base(base) => match base {
                BaseType::String => match value {
                    Some(v) => format!("String::from({:?})", expect_str(name, v)?),
                    None => "String::new()".to_string(),
                },
                BaseType::Binary => match value {
                    Some(v) => format!("{:?}.as_bytes().to_vec()", expect_str(name, v)?),
                    None => "Vec::new()".to_string(),
                },
                BaseType::Bool => match value {
                    Some(v) => (expect_integer(name, v)? > 0).to_string(),
                    None => "false".to_string(),
                },
                BaseType::Byte | BaseType::I16 | BaseType::I32 => match value {
                    Some(v) => expect_integer(name, v)?.to_string(),
                    None => "0".to_string(),
                },
                BaseType::I64 => match value {
                    Some(v) => format!("{}i64", expect_integer(name, v)?),
                    None => {
                        return Err(CodegenError::MissingConstValue {
                            name: name.to_string(),
                            kind: ty.to_string(),
                        });
                    }
                },
                BaseType::Double => match value {
                    Some(ConstValue::Double(d)) => render_double(*d),
                    Some(v) => format!("{}f64", expect_integer(name, v)?),
                    None => "0.0".to_string(),
                },
                BaseType::Void => {
                    return Err(CodegenError::generation(format!(
                        "constant '{name}' has type void"
                    )));
                }
            },
            TypeRef::Enum(_) => match value {
                Some(v) => format!(
                    "{}({})",
                    self.ctx.resolved_name(ty),
                    expect_integer(name, v)?
                ),
                None => String::new(),
            },
            TypeRef::Struct(def) => match value {
                Some(ConstValue::Map(pairs)) if !pairs.is_empty() => {
                    let tmp = self.ctx.tmp("tmp");
                    output.push_str(&format!(
                        "{}let mut {tmp} = {}::default();\n",
                        pad(level),
                        self.ctx.resolved_name(ty)
                    ));
                    self.print_struct(output, level, &tmp, def, pairs)?;
                    tmp
                }
                Some(ConstValue::Map(_)) | None => {
                    format!("{}::default()", self.ctx.resolved_name(ty))
                }
                Some(other) => {
                    return Err(CodegenError::generation(format!(
                        "constant '{name}' of struct type has {} value",
                        other.kind()
                    )));
                }
            },
            TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Map(_, _) => {
                return Err(CodegenError::UnsupportedConstant {
                    name: name.to_string(),
                    kind: ty.to_string(),
                });
            }
            TypeRef::Typedef(def) => {
                return self.render_value(output, level, name, &def.target, value);
            }
        };
        Ok(rendered)
    }

    /// Emits statements assigning `value` to the place `target`.
    ///
    /// Struct literals are assigned field by field, and fields with a
    /// presence flag get it set.
    ///
    /// # Errors
    /// Same conditions as [`ConstRenderer::render_value`].
    pub fn print_value(
        &self,
        output: &mut String,
        level: usize,
        target: &str,
        ty: &TypeRef,
        value: &ConstValue,
    ) -> Result<()> {
        match resolve(ty) {
            TypeRef::Struct(def) => {
                let ConstValue::Map(pairs) = value else {
                    return Err(CodegenError::generation(format!(
                        "'{target}' of struct type has {} value",
                        value.kind()
                    )));
                };
                self.print_struct(output, level, target, def, pairs)
            }
            TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Map(_, _) => {
                Err(CodegenError::UnsupportedConstant {
                    name: target.to_string(),
                    kind: ty.to_string(),
                })
            }
            _ => {
                let rendered = self.render_value(output, level, target, ty, Some(value))?;
                output.push_str(&format!("{}{target} = {rendered};\n", pad(level)));
                Ok(())
            }
        }
    }

    fn print_struct(
        &self,
        output: &mut String,
        level: usize,
        target: &str,
        def: &StructDef,
        pairs: &[(ConstValue, ConstValue)],
    ) -> Result<()> {
        for (key, value) in pairs {
            let field = key
                .as_str()
                .and_then(|name| def.field_by_name(name))
                .ok_or_else(|| CodegenError::UnknownConstField {
                    struct_name: def.name.clone(),
                    field: key.as_str().map_or_else(|| format!("{key:?}"), str::to_string),
                })?;
            let ident = field_ident(&field.name);
            let place = format!("{target}.{ident}");
            let rendered = self.render_value(output, level, &place, &field.ty, Some(value))?;
            output.push_str(&format!("{}{place} = {rendered};\n", pad(level)));
            if field.has_presence_flag() {
                output.push_str(&format!("{}{target}.isset.{ident} = true;\n", pad(level)));
            }
        }
        Ok(())
    }
}

fn expect_integer(name: &str, value: &ConstValue) -> Result<i64> {
    value.as_integer().ok_or_else(|| {
        CodegenError::generation(format!(
            "constant '{name}' expects an integer, found {}",
            value.kind()
        ))
    })
}

fn expect_str<'v>(name: &str, value: &'v ConstValue) -> Result<&'v str> {
    value.as_str().ok_or_else(|| {
        CodegenError::generation(format!(
            "constant '{name}' expects a string, found {}",
            value.kind()
        ))
    })
}

fn render_double(value: f64) -> String {
    if value.is_nan() {
        "f64::NAN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "f64::INFINITY".to_string()
        } else {
            "f64::NEG_INFINITY".to_string()
        }
    } else {
        format!("{value:?}")
    }
}

/// Name of the constants holder struct of a program.
#[must_use]
pub fn holder_name(program: &str) -> String {
    format!("{}Constants", to_pascal_case(program))
}

/// Name of the global constants instance of a program.
#[must_use]
pub fn global_name(program: &str) -> String {
    format!("{}_CONSTANTS", to_upper_snake_case(program))
}

/// Generator for the constants holder artifacts.
pub struct ConstantsGenerator<'a> {
    ctx: &'a CodegenContext<'a>,
}

impl<'a> ConstantsGenerator<'a> {
    /// Creates a new constants generator.
    #[must_use]
    pub fn new(ctx: &'a CodegenContext<'a>) -> Self {
        Self { ctx }
    }

    /// Generates the holder declaration.
    #[must_use]
    pub fn generate_declaration(&self) -> String {
        let program = self.ctx.program();
        let holder = holder_name(program.name());
        let mut output = String::new();

        output.push_str(&format!(
            "/// Named constants of program `{}`.\n",
            program.name()
        ));
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub struct {holder} {{\n"));
        for def in &program.consts {
            push_doc(&mut output, 1, def.doc.as_deref());
            output.push_str(&format!(
                "    pub {}: {},\n",
                field_ident(&def.name),
                self.ctx.type_name(&def.ty)
            ));
        }
        output.push_str("}\n\n");

        output.push_str(&format!(
            "/// Process-wide instance of [`{holder}`], built on first use.\n"
        ));
        output.push_str(&format!(
            "pub static {}: std::sync::LazyLock<{holder}> = std::sync::LazyLock::new({holder}::new);\n",
            global_name(program.name())
        ));
        output
    }

    /// Generates the holder constructor.
    ///
    /// # Errors
    /// Propagates rendering failures of any constant.
    pub fn generate_definition(&self) -> Result<String> {
        let program = self.ctx.program();
        let holder = holder_name(program.name());
        let renderer = ConstRenderer::new(self.ctx);
        let mut output = String::new();

        output.push_str(&format!("impl {holder} {{\n"));
        output.push_str("    /// Builds the holder with every constant initialized.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn new() -> Self {\n");
        if program.consts.is_empty() {
            output.push_str("        Self {}\n");
        } else {
            output.push_str("        let mut constants = Self {\n");
            for def in &program.consts {
                output.push_str(&format!(
                    "            {}: {},\n",
                    field_ident(&def.name),
                    self.ctx.zero_value(&def.ty)
                ));
            }
            output.push_str("        };\n");
            for def in &program.consts {
                tracing::debug!(constant = %def.name, "rendering constant");
                let target = format!("constants.{}", field_ident(&def.name));
                renderer.print_value(&mut output, 2, &target, &def.ty, &def.value)?;
            }
            output.push_str("        constants\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl Default for {holder} {{\n"));
        output.push_str("    fn default() -> Self {\n");
        output.push_str("        Self::new()\n");
        output.push_str("    }\n");
        output.push_str("}\n");
        Ok(output)
    }

    /// Module path of the holder declaration, imported by the definition.
    #[must_use]
    pub fn declaration_path(&self) -> String {
        let program = self.ctx.program();
        self.ctx
            .module_path(ArtifactKind::Constants, program.name(), program.namespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use idlgen_schema::{ConstDef, EnumDef, Field, Program, StructDef};
    use std::sync::Arc;

    fn render(ctx: &CodegenContext<'_>, ty: &TypeRef, value: Option<&ConstValue>) -> Result<String> {
        let mut out = String::new();
        ConstRenderer::new(ctx).render_value(&mut out, 0, "c", ty, value)
    }

    #[test]
    fn test_render_base_values() {
        let program = Program::new("p", "");
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let s = ConstValue::string("hi \"there\"");

        assert_eq!(
            render(&ctx, &BaseType::String.into(), Some(&s)).unwrap(),
            "String::from(\"hi \\\"there\\\"\")"
        );
        assert_eq!(render(&ctx, &BaseType::String.into(), None).unwrap(), "String::new()");
        assert_eq!(
            render(&ctx, &BaseType::Bool.into(), Some(&ConstValue::Integer(1))).unwrap(),
            "true"
        );
        assert_eq!(render(&ctx, &BaseType::Bool.into(), None).unwrap(), "false");
        assert_eq!(
            render(&ctx, &BaseType::I32.into(), Some(&ConstValue::Integer(-7))).unwrap(),
            "-7"
        );
        assert_eq!(render(&ctx, &BaseType::I16.into(), None).unwrap(), "0");
        assert_eq!(
            render(&ctx, &BaseType::I64.into(), Some(&ConstValue::Integer(1 << 40))).unwrap(),
            "1099511627776i64"
        );
        assert_eq!(
            render(&ctx, &BaseType::Binary.into(), Some(&ConstValue::string("ab"))).unwrap(),
            "\"ab\".as_bytes().to_vec()"
        );
    }

    #[test]
    fn test_render_doubles() {
        let program = Program::new("p", "");
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let double: TypeRef = BaseType::Double.into();

        assert_eq!(render(&ctx, &double, Some(&ConstValue::Double(2.5))).unwrap(), "2.5");
        assert_eq!(render(&ctx, &double, Some(&ConstValue::Integer(3))).unwrap(), "3f64");
        assert_eq!(render(&ctx, &double, None).unwrap(), "0.0");
        assert_eq!(
            render(&ctx, &double, Some(&ConstValue::Double(f64::NEG_INFINITY))).unwrap(),
            "f64::NEG_INFINITY"
        );
    }

    #[test]
    fn test_absent_value_asymmetry() {
        let program = Program::new("p", "");
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let op = Arc::new(EnumDef::new(&program.scope, "Op", [("ADD", 1)]));

        assert!(matches!(
            render(&ctx, &BaseType::I64.into(), None),
            Err(CodegenError::MissingConstValue { .. })
        ));
        assert_eq!(render(&ctx, &TypeRef::Enum(Arc::clone(&op)), None).unwrap(), "");
        assert_eq!(
            render(&ctx, &TypeRef::Enum(op), Some(&ConstValue::EnumRef {
                name: "ADD".to_string(),
                value: 1
            }))
            .unwrap(),
            "Op(1)"
        );
    }

    #[test]
    fn test_containers_are_fatal() {
        let program = Program::new("p", "");
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let cases = [
            (TypeRef::list(BaseType::I32), ConstValue::List(vec![ConstValue::Integer(1)])),
            (TypeRef::set(BaseType::I32), ConstValue::Set(vec![ConstValue::Integer(1)])),
            (
                TypeRef::map(BaseType::I32, BaseType::String),
                ConstValue::Map(vec![(ConstValue::Integer(1), ConstValue::string("a"))]),
            ),
        ];
        for (ty, value) in &cases {
            assert!(matches!(
                render(&ctx, ty, Some(value)),
                Err(CodegenError::UnsupportedConstant { .. })
            ));
            let mut out = String::new();
            assert!(matches!(
                ConstRenderer::new(&ctx).print_value(&mut out, 0, "x", ty, value),
                Err(CodegenError::UnsupportedConstant { .. })
            ));
        }
    }

    #[test]
    fn test_struct_literal_uses_temporaries() {
        let program = Program::new("p", "");
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let inner = Arc::new(
            StructDef::new(&program.scope, "Inner")
                .with_field(Field::new(1, "x", BaseType::I32).required()),
        );
        let outer = Arc::new(
            StructDef::new(&program.scope, "Outer")
                .with_field(Field::new(1, "name", BaseType::String))
                .with_field(Field::new(2, "inner", Arc::clone(&inner))),
        );
        let value = ConstValue::struct_literal([
            ("name", ConstValue::string("n")),
            (
                "inner",
                ConstValue::struct_literal([("x", ConstValue::Integer(5))]),
            ),
        ]);

        let mut out = String::new();
        let expr = ConstRenderer::new(&ctx)
            .render_value(&mut out, 1, "c", &TypeRef::Struct(outer), Some(&value))
            .unwrap();
        assert_eq!(expr, "tmp0");
        assert_eq!(
            out,
            "    let mut tmp0 = Outer::default();\n\
             \x20   tmp0.name = String::from(\"n\");\n\
             \x20   tmp0.isset.name = true;\n\
             \x20   let mut tmp1 = Inner::default();\n\
             \x20   tmp1.x = 5;\n\
             \x20   tmp0.inner = tmp1;\n\
             \x20   tmp0.isset.inner = true;\n"
        );
    }

    #[test]
    fn test_unknown_struct_field() {
        let program = Program::new("p", "");
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let def = Arc::new(StructDef::new(&program.scope, "S"));
        let value = ConstValue::struct_literal([("missing", ConstValue::Integer(1))]);
        let mut out = String::new();
        let err = ConstRenderer::new(&ctx)
            .print_value(&mut out, 0, "x", &TypeRef::Struct(def), &value)
            .unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnknownConstField { ref struct_name, ref field }
                if struct_name == "S" && field == "missing"
        ));
    }

    #[test]
    fn test_holder() {
        let mut program = Program::new("tutorial", "tutorial");
        program.add_const(ConstDef::new("INT32CONSTANT", BaseType::I32, ConstValue::Integer(9853)));
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let generator = ConstantsGenerator::new(&ctx);

        let decl = generator.generate_declaration();
        assert!(decl.contains("pub struct TutorialConstants {"));
        assert!(decl.contains("pub int32constant: i32,"));

        let def = generator.generate_definition().unwrap();
        assert!(def.contains("constants.int32constant = 9853;"));
    }

    #[test]
    fn test_global_sits_next_to_holder() {
        let program = Program::new("tutorial", "tutorial");
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let generator = ConstantsGenerator::new(&ctx);

        let decl = generator.generate_declaration();
        assert!(decl.contains(
            "pub static TUTORIAL_CONSTANTS: std::sync::LazyLock<TutorialConstants> = \
             std::sync::LazyLock::new(TutorialConstants::new);"
        ));
        assert!(decl.find("pub struct TutorialConstants").unwrap() < decl.find("pub static").unwrap());
        assert!(!generator.generate_definition().unwrap().contains("pub static"));
        assert_eq!(generator.declaration_path(), "crate::tutorial_constants::tutorial");
    }
}
