//! Generates the tutorial program and writes its artifacts.
//!
//! Run with: `cargo run --example generate -- [out_dir] [options]`
//!
//! `options` is a generator option string such as
//! `include_prefix=crate::generated,embedded_namespace`. Set `RUST_LOG=debug`
//! to see every generated definition.

use std::path::PathBuf;
use std::sync::Arc;

use idlgen::prelude::*;
use tracing_subscriber::EnvFilter;

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
    let invalid = program.add_struct(
        StructDef::exception(&scope, "InvalidOperation")
            .with_field(Field::new(1, "whatOp", BaseType::I32))
            .with_field(Field::new(2, "why", BaseType::String)),
    );
    program.add_const(ConstDef::new("INT32CONSTANT", BaseType::I32, ConstValue::Integer(9853)));

    program.add_service(
        ServiceDef::new(&scope, "Calculator")
            .extending(&shared.services[0])
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
            .with_function(FunctionDef::oneway(&scope, "zip")),
    );
    program
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "generated".to_string()));
    let config = GeneratorConfig::from_options(&args.next().unwrap_or_default())?;

    let shared = shared();
    let tutorial = tutorial(&shared);
    for program in [shared.as_ref(), &tutorial] {
        let paths = write_program(program, &config, &out_dir)?;
        tracing::info!(program = program.name(), files = paths.len(), "generated");
        for path in paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}
