//! State shared by the generators during one generation session.

use std::cell::Cell;

use idlgen_schema::{BaseType, Program, Scope, TypeClass, TypeRef, resolve, to_pascal_case};

use super::namespace::{namespace_close, namespace_open, namespace_path};
use crate::artifact::ArtifactKind;
use crate::config::GeneratorConfig;

/// Generation session for one program.
///
/// Owns the temporary-name counter, so two sessions never influence each
/// other's output.
#[derive(Debug)]
pub struct CodegenContext<'a> {
    program: &'a Program,
    config: &'a GeneratorConfig,
    tmp_counter: Cell<usize>,
}

impl<'a> CodegenContext<'a> {
    /// Starts a session for `program`.
    #[must_use]
    pub fn new(program: &'a Program, config: &'a GeneratorConfig) -> Self {
        Self {
            program,
            config,
            tmp_counter: Cell::new(0),
        }
    }

    /// Program being generated.
    #[must_use]
    pub fn program(&self) -> &'a Program {
        self.program
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &'a GeneratorConfig {
        self.config
    }

    /// Returns a fresh local variable name, `<prefix><n>`.
    pub fn tmp(&self, prefix: &str) -> String {
        let n = self.tmp_counter.get();
        self.tmp_counter.set(n + 1);
        format!("{prefix}{n}")
    }

    /// Opens the program namespace.
    #[must_use]
    pub fn namespace_open(&self) -> String {
        namespace_open(self.program.namespace(), self.config.embedded_namespace)
    }

    /// Closes the program namespace.
    #[must_use]
    pub fn namespace_close(&self) -> String {
        namespace_close(self.program.namespace(), self.config.embedded_namespace)
    }

    /// Absolute path of the namespace module inside an artifact.
    #[must_use]
    pub fn module_path(&self, kind: ArtifactKind, owner: &str, namespace: &str) -> String {
        let module = format!("{}::{}", self.config.module_prefix, kind.module_name(owner));
        let path = namespace_path(namespace, self.config.embedded_namespace);
        if path.is_empty() {
            module
        } else {
            format!("{module}::{path}")
        }
    }

    /// Returns true if `scope` belongs to the program being generated.
    #[must_use]
    pub fn is_local(&self, scope: &Scope) -> bool {
        scope.program == self.program.name()
    }

    /// Name of a definition as seen from this program's artifacts.
    ///
    /// Foreign names go through the included program's types module, which
    /// every artifact imports.
    #[must_use]
    pub fn named_type(&self, scope: &Scope, name: &str) -> String {
        let ident = to_pascal_case(name);
        if self.is_local(scope) {
            return ident;
        }
        let module = ArtifactKind::Types.module_name(&scope.program);
        let path = namespace_path(&scope.namespace, self.config.embedded_namespace);
        if path.is_empty() {
            format!("{module}::{ident}")
        } else {
            format!("{module}::{path}::{ident}")
        }
    }

    /// Rust type of a type reference, keeping typedef names.
    #[must_use]
    pub fn type_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Base(base) => base_type_name(*base).to_string(),
            TypeRef::Enum(def) => self.named_type(&def.scope, &def.name),
            TypeRef::Struct(def) => self.named_type(&def.scope, &def.name),
            TypeRef::Typedef(def) => self.named_type(&def.scope, &def.name),
            TypeRef::List(elem) => format!("Vec<{}>", self.type_name(elem)),
            TypeRef::Set(elem) => {
                format!("std::collections::BTreeSet<{}>", self.type_name(elem))
            }
            TypeRef::Map(key, value) => format!(
                "std::collections::BTreeMap<{}, {}>",
                self.type_name(key),
                self.type_name(value)
            ),
        }
    }

    /// Rust type of the resolved type; usable as a constructor path.
    #[must_use]
    pub fn resolved_name(&self, ty: &TypeRef) -> String {
        self.type_name(resolve(ty))
    }

    /// Zero value of a type, used where no default is declared.
    #[must_use]
    pub fn zero_value(&self, ty: &TypeRef) -> String {
        match resolve(ty) {
            TypeRef::Base(base) => match base {
                BaseType::Void => "()",
                BaseType::String => "String::new()",
                BaseType::Binary => "Vec::new()",
                BaseType::Bool => "false",
                BaseType::Byte | BaseType::I16 | BaseType::I32 | BaseType::I64 => "0",
                BaseType::Double => "0.0",
            }
            .to_string(),
            TypeRef::Enum(_) => format!("{}(0)", self.resolved_name(ty)),
            _ => "Default::default()".to_string(),
        }
    }

    /// Parameter type used in handler and client signatures.
    ///
    /// Strings, binaries and aggregates are borrowed, everything else is
    /// passed by value.
    #[must_use]
    pub fn param_type(&self, ty: &TypeRef) -> String {
        match resolve(ty) {
            TypeRef::Base(BaseType::String) => "&str".to_string(),
            TypeRef::Base(BaseType::Binary) => "&[u8]".to_string(),
            _ if is_copy(ty) => self.type_name(ty),
            _ => format!("&{}", self.type_name(ty)),
        }
    }

    /// Appends the banner every artifact starts with.
    pub fn push_file_header(&self, output: &mut String, what: &str) {
        output.push_str(&format!(
            "// Autogenerated by idlgen {}\n",
            env!("CARGO_PKG_VERSION")
        ));
        output.push_str(&format!(
            "// {what} of program '{}'\n",
            self.program.name()
        ));
        output.push_str("//\n");
        output.push_str("// DO NOT EDIT UNLESS YOU ARE SURE THAT YOU KNOW WHAT YOU ARE DOING\n\n");
    }

    /// Imports the runtime items listed in `items`, e.g. `core::{Reader, Writer}`.
    pub fn push_runtime_import(&self, output: &mut String, items: &str) {
        push_import(output, &format!("{}::{items}", self.config.runtime_path));
    }

    /// Glob-imports the namespace module of one of this program's artifacts.
    pub fn push_local_import(&self, output: &mut String, kind: ArtifactKind, owner: &str) {
        let path = self.module_path(kind, owner, self.program.namespace());
        push_import(output, &format!("{path}::*"));
    }

    /// Imports the types module of every included program.
    pub fn push_include_imports(&self, output: &mut String) {
        for include in &self.program.includes {
            let module = ArtifactKind::Types.module_name(include.name());
            push_import(
                output,
                &format!("{}::{module}", self.config.module_prefix),
            );
        }
    }
}

fn base_type_name(base: BaseType) -> &'static str {
    match base {
        BaseType::Void => "()",
        BaseType::String => "String",
        BaseType::Binary => "Vec<u8>",
        BaseType::Bool => "bool",
        BaseType::Byte => "i8",
        BaseType::I16 => "i16",
        BaseType::I32 => "i32",
        BaseType::I64 => "i64",
        BaseType::Double => "f64",
    }
}

/// Returns true if values of this type are `Copy` in generated code.
#[must_use]
pub fn is_copy(ty: &TypeRef) -> bool {
    match resolve(ty) {
        TypeRef::Base(BaseType::String | BaseType::Binary) => false,
        TypeRef::Base(_) => true,
        _ => ty.class() == TypeClass::Enum,
    }
}

/// Appends a `use` item that may go unused in some artifacts.
pub fn push_import(output: &mut String, path: &str) {
    output.push_str("#[allow(unused_imports)]\n");
    output.push_str(&format!("use {path};\n"));
}

/// Indentation for `level` nested blocks.
#[must_use]
pub fn pad(level: usize) -> String {
    "    ".repeat(level)
}

/// Appends `doc` as `///` lines.
pub fn push_doc(output: &mut String, level: usize, doc: Option<&str>) {
    let Some(doc) = doc else {
        return;
    };
    let indent = pad(level);
    for line in doc.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            output.push_str(&format!("{indent}///\n"));
        } else {
            output.push_str(&format!("{indent}/// {line}\n"));
        }
    }
}
