//! Fixture programs compiled by the build script and rebuilt by the tests.

#![allow(dead_code)]

use std::sync::Arc;

use idlgen::codegen::GeneratorConfig;
use idlgen::schema::{
    BaseType, ConstDef, ConstValue, EnumDef, Field, FunctionDef, Program, ServiceDef, StructDef,
    TypedefDef,
};

/// Module under which the shared and tutorial artifacts are mounted.
pub const GENERATED_PREFIX: &str = "crate::generated";

/// Module under which the geometry artifacts are mounted.
pub const EMBEDDED_PREFIX: &str = "crate::embedded";

/// Configuration of the shared and tutorial programs.
pub fn config() -> GeneratorConfig {
    GeneratorConfig::default().with_module_prefix(GENERATED_PREFIX)
}

/// Configuration of the geometry program.
pub fn embedded_config() -> GeneratorConfig {
    GeneratorConfig::default()
        .with_module_prefix(EMBEDDED_PREFIX)
        .with_embedded_namespace(true)
        .with_skeleton(false)
}

pub fn shared() -> Arc<Program> {
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

pub fn tutorial(shared: &Arc<Program>) -> Program {
    let mut program = Program::new("tutorial", "tutorial");
    program.add_include(shared);
    let scope = program.scope.clone();

    let my_integer = program.add_typedef(TypedefDef::new(&scope, "MyInteger", BaseType::I32));
    let operation = program.add_enum(EnumDef::new(
        &scope,
        "Operation",
        [("ADD", 1), ("SUBTRACT", 2), ("MULTIPLY", 3), ("DIVIDE", 4)],
    ));
    let work = program.add_struct(
        StructDef::new(&scope, "Work")
            .with_field(Field::new(1, "num1", BaseType::I32).with_default(ConstValue::Integer(0)))
            .with_field(Field::new(2, "num2", BaseType::I32))
            .with_field(Field::new(3, "op", Arc::clone(&operation)))
            .with_field(Field::new(4, "comment", BaseType::String).optional()),
    );
    let record = program.add_struct(
        StructDef::new(&scope, "Record")
            .with_field(Field::new(1, "id", BaseType::I32).required())
            .with_field(Field::new(2, "note", BaseType::String).optional()),
    );
    program.add_struct(
        StructDef::new(&scope, "Shuffled")
            .with_field(Field::new(5, "last", BaseType::I32).required())
            .with_field(Field::new(1, "first", BaseType::I32).required())
            .with_field(Field::new(3, "middle", BaseType::String).required()),
    );
    let envelope = program.add_struct(
        StructDef::new(&scope, "Envelope")
            .with_field(Field::new(1, "record", Arc::clone(&record)).required())
            .with_field(Field::new(2, "shared", Arc::clone(&shared.structs[0]))),
    );
    program.add_struct(
        StructDef::new(&scope, "WithDefaults")
            .with_field(
                Field::new(1, "big", BaseType::I64)
                    .with_default(ConstValue::Integer(1_099_511_627_776)),
            )
            .with_field(Field::new(2, "flag", BaseType::Bool).with_default(ConstValue::Integer(1)))
            .with_field(
                Field::new(3, "name", BaseType::String).with_default(ConstValue::string("idl")),
            )
            .with_field(Field::new(4, "op", Arc::clone(&operation)).with_default(
                ConstValue::EnumRef {
                    name: "MULTIPLY".to_string(),
                    value: 3,
                },
            ))
            .with_field(Field::new(5, "work", Arc::clone(&work)).with_default(
                ConstValue::struct_literal([
                    ("num1", ConstValue::Integer(7)),
                    ("comment", ConstValue::string("seeded")),
                ]),
            )),
    );
    let invalid = program.add_struct(
        StructDef::exception(&scope, "InvalidOperation")
            .with_field(Field::new(1, "whatOp", BaseType::I32))
            .with_field(Field::new(2, "why", BaseType::String)),
    );

    program.add_const(ConstDef::new("INT32CONSTANT", BaseType::I32, ConstValue::Integer(9853)));
    program.add_const(ConstDef::new("GREETING", BaseType::String, ConstValue::string("hello")));
    program.add_const(ConstDef::new(
        "DEFAULT_OP",
        Arc::clone(&operation),
        ConstValue::EnumRef {
            name: "SUBTRACT".to_string(),
            value: 2,
        },
    ));
    program.add_const(ConstDef::new(
        "SEED_WORK",
        Arc::clone(&work),
        ConstValue::struct_literal([
            ("num1", ConstValue::Integer(10)),
            ("num2", ConstValue::Integer(20)),
            ("op", ConstValue::Integer(1)),
        ]),
    ));
    program.add_const(ConstDef::new(
        "DEFAULT_ENVELOPE",
        envelope,
        ConstValue::struct_literal([(
            "record",
            ConstValue::struct_literal([("id", ConstValue::Integer(5))]),
        )]),
    ));
    program.add_const(ConstDef::new("PI", BaseType::Double, ConstValue::Double(3.25)));

    program.add_service(
        ServiceDef::new(&scope, "Calculator")
            .extending(&shared.services[0])
            .with_doc("Arithmetic over the wire.")
            .with_function(FunctionDef::new(&scope, "ping", BaseType::Void))
            .with_function(
                FunctionDef::new(&scope, "add", BaseType::I32)
                    .with_arg(Field::new(1, "num1", my_integer.clone()).required())
                    .with_arg(Field::new(2, "num2", my_integer).required()),
            )
            .with_function(
                FunctionDef::new(&scope, "calculate", BaseType::I32)
                    .with_arg(Field::new(1, "logid", BaseType::I32).required())
                    .with_arg(Field::new(2, "w", work).required())
                    .with_throws(Field::new(1, "ouch", invalid)),
            )
            .with_function(
                FunctionDef::new(&scope, "describe", BaseType::String)
                    .with_arg(Field::new(1, "prefix", BaseType::String).optional()),
            )
            .with_function(FunctionDef::oneway(&scope, "zip")),
    );
    program
}

/// Program generated with the embedded namespace enabled.
pub fn geometry() -> Program {
    let mut program = Program::new("geometry", "geo.shapes");
    let scope = program.scope.clone();
    let point = program.add_struct(
        StructDef::new(&scope, "Point")
            .with_field(Field::new(1, "x", BaseType::I32).required())
            .with_field(Field::new(2, "y", BaseType::I32).required()),
    );
    let rect = program.add_struct(
        StructDef::new(&scope, "Rect")
            .with_field(Field::new(1, "origin", Arc::clone(&point)).required())
            .with_field(Field::new(2, "width", BaseType::I32).required())
            .with_field(Field::new(3, "height", BaseType::I32).required()),
    );
    program.add_const(ConstDef::new(
        "ORIGIN",
        point,
        ConstValue::struct_literal([("x", ConstValue::Integer(0)), ("y", ConstValue::Integer(0))]),
    ));
    program.add_service(
        ServiceDef::new(&scope, "Canvas").with_function(
            FunctionDef::new(&scope, "area", BaseType::I64)
                .with_arg(Field::new(1, "shape", rect).required()),
        ),
    );
    program
}
