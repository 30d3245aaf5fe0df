//! Schema validation utilities.
//!
//! The front end is expected to hand over a consistent model; these checks
//! catch the structural mistakes that would otherwise surface as generated
//! code that does not compile.

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::program::Program;
use crate::services::ServiceDef;
use crate::structs::StructDef;
use crate::types::EnumDef;

/// Validates a program for correctness.
///
/// # Arguments
/// * `program` - The program to validate
///
/// # Errors
/// Returns `SchemaError` describing the first problem found.
pub fn validate_program(program: &Program) -> Result<(), SchemaError> {
    validate_type_names(program)?;
    for enum_def in &program.enums {
        validate_enum(enum_def)?;
    }
    for struct_def in &program.structs {
        validate_struct(struct_def, &struct_def.name)?;
    }
    for service in &program.services {
        validate_service(service)?;
    }
    let mut seen = HashSet::new();
    for def in &program.consts {
        if !seen.insert(def.name.as_str()) {
            return Err(SchemaError::duplicate("constant", &def.name));
        }
    }
    Ok(())
}

/// Type names share one namespace per program.
fn validate_type_names(program: &Program) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    let names = program
        .typedefs
        .iter()
        .map(|t| t.name.as_str())
        .chain(program.enums.iter().map(|e| e.name.as_str()))
        .chain(program.structs.iter().map(|s| s.name.as_str()));
    for name in names {
        if !seen.insert(name) {
            return Err(SchemaError::duplicate("type", name));
        }
    }
    Ok(())
}

fn validate_enum(enum_def: &EnumDef) -> Result<(), SchemaError> {
    let mut seen_names = HashSet::new();
    for value in &enum_def.values {
        if !seen_names.insert(&value.name) {
            return Err(SchemaError::validation(format!(
                "duplicate enum value name '{}' in enum '{}'",
                value.name, enum_def.name
            )));
        }
    }
    Ok(())
}

/// Validates the fields of a struct, exception or argument list.
///
/// `owner` names the struct in error messages.
pub fn validate_struct(struct_def: &StructDef, owner: &str) -> Result<(), SchemaError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for field in &struct_def.fields {
        if !ids.insert(field.id) {
            return Err(SchemaError::DuplicateFieldId {
                owner: owner.to_string(),
                id: field.id,
            });
        }
        if !names.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateFieldName {
                owner: owner.to_string(),
                name: field.name.clone(),
            });
        }
        if field.ty.is_void() {
            return Err(SchemaError::VoidField {
                owner: owner.to_string(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_service(service: &ServiceDef) -> Result<(), SchemaError> {
    let mut names = HashSet::new();
    for function in &service.functions {
        if !names.insert(function.name.as_str()) {
            return Err(SchemaError::duplicate(
                "function",
                format!("{}.{}", service.name, function.name),
            ));
        }
        let owner = format!("{}.{}", service.name, function.name);
        validate_struct(&function.arguments, &owner)?;
        validate_struct(&function.exceptions, &owner)?;
        if function.oneway && (!function.is_void() || !function.exceptions.fields.is_empty()) {
            return Err(SchemaError::validation(format!(
                "oneway function '{owner}' must return void and declare no exceptions"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ConstDef, ConstValue};
    use crate::services::FunctionDef;
    use crate::structs::Field;
    use crate::types::{BaseType, TypedefDef};

    fn program() -> Program {
        Program::new("p", "p")
    }

    #[test]
    fn test_valid_program() {
        let mut p = program();
        let scope = p.scope.clone();
        p.add_struct(
            StructDef::new(&scope, "Work")
                .with_field(Field::new(1, "num1", BaseType::I32))
                .with_field(Field::new(2, "num2", BaseType::I32)),
        );
        p.add_service(
            ServiceDef::new(&scope, "Calc")
                .with_function(FunctionDef::new(&scope, "ping", BaseType::Void))
                .with_function(FunctionDef::oneway(&scope, "zip")),
        );
        p.add_const(ConstDef::new("MAX", BaseType::I32, ConstValue::Integer(9)));
        assert!(validate_program(&p).is_ok());
    }

    #[test]
    fn test_duplicate_field_id() {
        let mut p = program();
        let scope = p.scope.clone();
        p.add_struct(
            StructDef::new(&scope, "Bad")
                .with_field(Field::new(1, "a", BaseType::I32))
                .with_field(Field::new(1, "b", BaseType::I32)),
        );
        assert_eq!(
            validate_program(&p),
            Err(SchemaError::DuplicateFieldId {
                owner: "Bad".to_string(),
                id: 1
            })
        );
    }

    #[test]
    fn test_duplicate_field_name() {
        let mut p = program();
        let scope = p.scope.clone();
        p.add_struct(
            StructDef::new(&scope, "Bad")
                .with_field(Field::new(1, "a", BaseType::I32))
                .with_field(Field::new(2, "a", BaseType::I64)),
        );
        assert!(matches!(
            validate_program(&p),
            Err(SchemaError::DuplicateFieldName { .. })
        ));
    }

    #[test]
    fn test_void_field_through_typedef() {
        let mut p = program();
        let scope = p.scope.clone();
        let nothing = p.add_typedef(TypedefDef::new(&scope, "Nothing", BaseType::Void));
        p.add_struct(StructDef::new(&scope, "Bad").with_field(Field::new(1, "a", nothing)));
        assert!(matches!(
            validate_program(&p),
            Err(SchemaError::VoidField { .. })
        ));
    }

    #[test]
    fn test_duplicate_type_name() {
        let mut p = program();
        let scope = p.scope.clone();
        p.add_typedef(TypedefDef::new(&scope, "Thing", BaseType::I32));
        p.add_struct(StructDef::new(&scope, "Thing"));
        assert_eq!(
            validate_program(&p),
            Err(SchemaError::duplicate("type", "Thing"))
        );
    }

    #[test]
    fn test_duplicate_enum_value() {
        let mut p = program();
        let scope = p.scope.clone();
        p.add_enum(EnumDef::new(&scope, "Op", [("ADD", 1), ("ADD", 2)]));
        assert!(matches!(
            validate_program(&p),
            Err(SchemaError::Validation { .. })
        ));
    }

    #[test]
    fn test_oneway_must_be_void() {
        let mut p = program();
        let scope = p.scope.clone();
        let mut bad = FunctionDef::new(&scope, "fire", BaseType::I32);
        bad.oneway = true;
        p.add_service(ServiceDef::new(&scope, "S").with_function(bad));
        assert!(matches!(
            validate_program(&p),
            Err(SchemaError::Validation { .. })
        ));
    }

    #[test]
    fn test_duplicate_function_and_const() {
        let mut p = program();
        let scope = p.scope.clone();
        p.add_service(
            ServiceDef::new(&scope, "S")
                .with_function(FunctionDef::new(&scope, "f", BaseType::Void))
                .with_function(FunctionDef::new(&scope, "f", BaseType::I32)),
        );
        assert_eq!(
            validate_program(&p),
            Err(SchemaError::duplicate("function", "S.f"))
        );

        let mut q = program();
        q.add_const(ConstDef::new("A", BaseType::I32, ConstValue::Integer(1)));
        q.add_const(ConstDef::new("A", BaseType::I32, ConstValue::Integer(2)));
        assert_eq!(
            validate_program(&q),
            Err(SchemaError::duplicate("constant", "A"))
        );
    }
}
