//! The root of a resolved schema.

use std::sync::Arc;

use crate::constants::ConstDef;
use crate::services::ServiceDef;
use crate::structs::StructDef;
use crate::types::{EnumDef, Scope, TypedefDef};

/// One compiled IDL file with everything it defines.
///
/// Built once by the front end and only read afterwards.
#[derive(Debug, Clone)]
pub struct Program {
    /// Scope shared by every definition in this program.
    pub scope: Arc<Scope>,
    /// Typedefs in declaration order.
    pub typedefs: Vec<Arc<TypedefDef>>,
    /// Enums in declaration order.
    pub enums: Vec<Arc<EnumDef>>,
    /// Structs and exceptions in declaration order.
    pub structs: Vec<Arc<StructDef>>,
    /// Services in declaration order.
    pub services: Vec<Arc<ServiceDef>>,
    /// Named constants in declaration order.
    pub consts: Vec<ConstDef>,
    /// Programs this one includes.
    pub includes: Vec<Arc<Program>>,
}

impl Program {
    /// Creates an empty program.
    ///
    /// # Arguments
    /// * `name` - Program name, used for artifact file names
    /// * `namespace` - Dotted namespace, may be empty
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            scope: Scope::new(name, namespace),
            typedefs: Vec::new(),
            enums: Vec::new(),
            structs: Vec::new(),
            services: Vec::new(),
            consts: Vec::new(),
            includes: Vec::new(),
        }
    }

    /// Program name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.scope.program
    }

    /// Dotted namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.scope.namespace
    }

    /// Adds a typedef and returns a shared handle for use in type references.
    pub fn add_typedef(&mut self, def: TypedefDef) -> Arc<TypedefDef> {
        let def = Arc::new(def);
        self.typedefs.push(Arc::clone(&def));
        def
    }

    /// Adds an enum and returns a shared handle.
    pub fn add_enum(&mut self, def: EnumDef) -> Arc<EnumDef> {
        let def = Arc::new(def);
        self.enums.push(Arc::clone(&def));
        def
    }

    /// Adds a struct or exception and returns a shared handle.
    pub fn add_struct(&mut self, def: StructDef) -> Arc<StructDef> {
        let def = Arc::new(def);
        self.structs.push(Arc::clone(&def));
        def
    }

    /// Adds a service and returns a shared handle.
    pub fn add_service(&mut self, def: ServiceDef) -> Arc<ServiceDef> {
        let def = Arc::new(def);
        self.services.push(Arc::clone(&def));
        def
    }

    /// Adds a named constant.
    pub fn add_const(&mut self, def: ConstDef) {
        self.consts.push(def);
    }

    /// Records an included program.
    pub fn add_include(&mut self, program: &Arc<Program>) {
        self.includes.push(Arc::clone(program));
    }

    /// Looks up a struct by name.
    #[must_use]
    pub fn get_struct(&self, name: &str) -> Option<&Arc<StructDef>> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Looks up a service by name.
    #[must_use]
    pub fn get_service(&self, name: &str) -> Option<&Arc<ServiceDef>> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Returns true if the program defines no types, constants or services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.typedefs.is_empty()
            && self.enums.is_empty()
            && self.structs.is_empty()
            && self.services.is_empty()
            && self.consts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::Field;
    use crate::types::{BaseType, TypeRef};

    #[test]
    fn test_definitions_share_scope() {
        let mut program = Program::new("tutorial", "tutorial.calc");
        let scope = Arc::clone(&program.scope);
        let work = program.add_struct(
            StructDef::new(&scope, "Work").with_field(Field::new(1, "num1", BaseType::I32)),
        );
        assert_eq!(program.name(), "tutorial");
        assert_eq!(program.namespace(), "tutorial.calc");
        assert!(Arc::ptr_eq(&work.scope, &program.scope));
        assert_eq!(
            program.get_struct("Work").map(|s| TypeRef::Struct(Arc::clone(s))),
            Some(TypeRef::Struct(work))
        );
        assert!(!program.is_empty());
    }

    #[test]
    fn test_includes() {
        let shared = Arc::new(Program::new("shared", "shared"));
        let mut program = Program::new("tutorial", "");
        program.add_include(&shared);
        assert_eq!(program.includes[0].name(), "shared");
        assert!(program.is_empty());
    }
}
