//! Service scaffolding generation.
//!
//! Each function gets an argument struct, a server action that decodes it
//! and calls the handler, and a client action that encodes it and delivers
//! the decoded reply to a callback.

use idlgen_schema::{
    BaseType, Field, FunctionDef, ServiceDef, TypeRef, field_ident, resolve, to_pascal_case,
    to_snake_case, to_upper_snake_case,
};

use super::context::{CodegenContext, is_copy, pad, push_doc};
use super::serialize::{ReadTarget, SerializeGenerator};
use super::structs::StructGenerator;
use crate::artifact::ArtifactKind;
use crate::error::Result;

/// Local names used by the generated client call; arguments are renamed
/// away from them.
const RESERVED_LOCALS: &[&str] = &["dispatcher", "callback", "request", "args"];

/// Names derived from one function.
struct FunctionNames {
    method: String,
    action_const: String,
    args: String,
    action: String,
    callback: String,
    client: String,
    result_method: String,
}

impl FunctionNames {
    fn new(function: &FunctionDef) -> Self {
        let pascal = to_pascal_case(&function.name);
        Self {
            method: field_ident(&function.name),
            action_const: format!("{}_ACTION", to_upper_snake_case(&function.name)),
            args: to_pascal_case(&function.arguments.name),
            action: format!("{pascal}Action"),
            callback: format!("{pascal}Callback"),
            client: format!("{pascal}ClientAction"),
            result_method: format!("{}_result", to_snake_case(&function.name)),
        }
    }
}

/// Parameter name of an argument in handler and client signatures.
fn param_name(field: &Field) -> String {
    let ident = field_ident(&field.name);
    if RESERVED_LOCALS.contains(&ident.as_str()) {
        format!("{ident}_arg")
    } else {
        ident
    }
}

/// Name of the handler trait of a service.
#[must_use]
pub fn handler_name(service: &str) -> String {
    format!("{}Handler", to_pascal_case(service))
}

/// Name of the skeleton server type of a service.
#[must_use]
pub fn server_name(service: &str) -> String {
    format!("{}Server", to_pascal_case(service))
}

/// Generator for the service artifacts.
pub struct ServiceGenerator<'a> {
    ctx: &'a CodegenContext<'a>,
}

impl<'a> ServiceGenerator<'a> {
    /// Creates a new service generator.
    #[must_use]
    pub fn new(ctx: &'a CodegenContext<'a>) -> Self {
        Self { ctx }
    }

    /// Absolute path of a service's handler trait.
    fn handler_path(&self, service: &ServiceDef) -> String {
        let module =
            self.ctx
                .module_path(ArtifactKind::Service, &service.name, &service.scope.namespace);
        format!("{module}::{}", handler_name(&service.name))
    }

    /// Generates the interface artifact body: action names, handler trait,
    /// argument structs, action and callback types.
    ///
    /// # Errors
    /// Propagates failures rendering argument defaults.
    pub fn generate_interface(&self, service: &ServiceDef) -> Result<String> {
        let mut output = String::new();
        let handler = handler_name(&service.name);

        for function in &service.functions {
            let names = FunctionNames::new(function);
            output.push_str(&format!(
                "/// Action name of [`{handler}::{}`].\n",
                names.method
            ));
            output.push_str(&format!(
                "pub const {}: &str = {:?};\n",
                names.action_const, function.name
            ));
        }
        if !service.functions.is_empty() {
            output.push('\n');
        }

        match service.doc.as_deref() {
            Some(doc) => push_doc(&mut output, 0, Some(doc)),
            None => output.push_str(&format!(
                "/// Business logic of the `{}` service.\n",
                service.name
            )),
        }
        let supertrait = match &service.extends {
            Some(parent) => self.handler_path(parent),
            None => "Send + Sync".to_string(),
        };
        output.push_str(&format!("pub trait {handler}: {supertrait} {{\n"));
        for (i, function) in service.functions.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            push_doc(&mut output, 1, function.doc.as_deref());
            output.push_str(&format!("    {};\n", self.signature(function, false)));
        }
        output.push_str("}\n\n");

        let structs = StructGenerator::new(self.ctx);
        for function in &service.functions {
            let names = FunctionNames::new(function);
            tracing::debug!(service = %service.name, function = %function.name, "generating function types");
            output.push_str(&structs.generate_struct(
                &function.arguments,
                &names.args,
                &format!("Arguments of `{}`.", function.name),
            )?);
            output.push_str(&self.action_types(function, &names));
        }
        Ok(output)
    }

    fn action_types(&self, function: &FunctionDef, names: &FunctionNames) -> String {
        let mut output = String::new();

        output.push_str(&format!("/// Server action for `{}`.\n", function.name));
        output.push_str(&format!("pub struct {}<H: ?Sized> {{\n", names.action));
        output.push_str("    pub handler: Arc<H>,\n");
        output.push_str(&format!("    pub args: {},\n", names.args));
        output.push_str("}\n\n");

        output.push_str(&format!("impl<H: ?Sized> {}<H> {{\n", names.action));
        output.push_str("    /// Creates an action dispatching to `handler`.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn new(handler: Arc<H>) -> Self {\n");
        output.push_str("        Self {\n");
        output.push_str("            handler,\n");
        output.push_str(&format!("            args: {}::default(),\n", names.args));
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!(
            "/// Completion callback of a `{}` call.\n",
            function.name
        ));
        output.push_str(&format!("pub trait {}: Send {{\n", names.callback));
        output.push_str("    /// Receives the decoded result.\n");
        if function.is_void() {
            output.push_str(&format!("    fn {}(&mut self);\n\n", names.result_method));
        } else {
            output.push_str(&format!(
                "    fn {}(&mut self, result: {});\n\n",
                names.result_method,
                self.ctx.type_name(&function.return_type)
            ));
        }
        output.push_str("    /// Receives a transport or decode failure.\n");
        output.push_str("    fn exception_result(&mut self, exception: ApplicationException);\n");
        output.push_str("}\n\n");

        output.push_str(&format!(
            "/// Client side of a `{}` call awaiting its reply.\n",
            function.name
        ));
        output.push_str(&format!("pub struct {} {{\n", names.client));
        output.push_str(&format!("    pub callback: Box<dyn {}>,\n", names.callback));
        output.push_str("}\n\n");
        output
    }

    /// Handler method signature; `skeleton` prefixes parameters with `_`.
    fn signature(&self, function: &FunctionDef, skeleton: bool) -> String {
        let names = FunctionNames::new(function);
        let mut signature = format!("fn {}(&self", names.method);
        for field in &function.arguments.fields {
            let name = if skeleton {
                format!("_{}", to_snake_case(&field.name))
            } else {
                param_name(field)
            };
            signature.push_str(&format!(", {name}: {}", self.param_type(field)));
        }
        signature.push(')');
        if !function.is_void() {
            signature.push_str(&format!(
                " -> {}",
                self.ctx.type_name(&function.return_type)
            ));
        }
        signature
    }

    fn param_type(&self, field: &Field) -> String {
        let ty = self.ctx.param_type(&field.ty);
        if field.has_presence_flag() {
            format!("Option<{ty}>")
        } else {
            ty
        }
    }

    /// Expression handing a decoded argument to the handler.
    fn handler_argument(field: &Field) -> String {
        let ident = field_ident(&field.name);
        let place = format!("args.{ident}");
        let borrowed = match resolve(&field.ty) {
            TypeRef::Base(BaseType::String) => format!("{place}.as_str()"),
            TypeRef::Base(BaseType::Binary) => format!("{place}.as_slice()"),
            _ if is_copy(&field.ty) => place.clone(),
            _ => format!("&{place}"),
        };
        if field.has_presence_flag() {
            format!("args.isset.{ident}.then_some({borrowed})")
        } else {
            borrowed
        }
    }

    /// Statements copying a client parameter into the local `args`.
    fn client_assignment(field: &Field) -> String {
        let ident = field_ident(&field.name);
        let param = param_name(field);
        let owned = |value: &str| match resolve(&field.ty) {
            TypeRef::Base(BaseType::String) => format!("{value}.to_owned()"),
            TypeRef::Base(BaseType::Binary) => format!("{value}.to_vec()"),
            _ if is_copy(&field.ty) => value.to_string(),
            _ => format!("{value}.clone()"),
        };
        if field.has_presence_flag() {
            format!(
                "        if let Some(value) = {param} {{\n\
                 \x20           args.{ident} = {};\n\
                 \x20           args.isset.{ident} = true;\n\
                 \x20       }}\n",
                owned("value")
            )
        } else {
            format!("        args.{ident} = {};\n", owned(&param))
        }
    }

    /// Generates the implementation artifact body: argument codecs, action
    /// impls, client calls and `register_actions`.
    ///
    /// # Errors
    /// Fails if an argument or result type has no wire support.
    pub fn generate_implementation(&self, service: &ServiceDef) -> Result<String> {
        let mut output = String::new();
        let serializer = SerializeGenerator::new(self.ctx);
        let handler = handler_name(&service.name);

        for function in &service.functions {
            let names = FunctionNames::new(function);
            output.push_str(&serializer.generate_impl(&function.arguments, &names.args)?);
            output.push_str(&self.server_action(function, &names, &handler, &serializer)?);
            output.push_str(&self.client_call(function, &names));
            output.push_str(&self.client_action(function, &names, &serializer)?);
        }

        output.push_str(&format!(
            "/// Registers the actions of `{}` and of every service it extends.\n",
            service.name
        ));
        output.push_str(&format!(
            "pub fn register_actions<H: {handler} + ?Sized + 'static>(\n"
        ));
        output.push_str("    registry: &mut ActionRegistry,\n");
        output.push_str("    handler: &Arc<H>,\n");
        output.push_str(") {\n");
        if let Some(parent) = &service.extends {
            let parent_impl = self.ctx.module_path(
                ArtifactKind::ServiceImpl,
                &parent.name,
                &parent.scope.namespace,
            );
            output.push_str(&format!(
                "    {parent_impl}::register_actions(registry, handler);\n"
            ));
        } else if service.functions.is_empty() {
            output.push_str("    let _ = (registry, handler);\n");
        }
        for function in &service.functions {
            let names = FunctionNames::new(function);
            output.push_str("    {\n");
            output.push_str("        let handler = Arc::clone(handler);\n");
            output.push_str(&format!(
                "        registry.register({}, move || -> Box<dyn Action> {{\n",
                names.action_const
            ));
            output.push_str(&format!(
                "            Box::new({}::new(Arc::clone(&handler)))\n",
                names.action
            ));
            output.push_str("        });\n");
            output.push_str("    }\n");
        }
        output.push_str("}\n");
        Ok(output)
    }

    fn server_action(
        &self,
        function: &FunctionDef,
        names: &FunctionNames,
        handler: &str,
        serializer: &SerializeGenerator<'_>,
    ) -> Result<String> {
        let mut output = String::new();
        let action_const = &names.action_const;

        output.push_str(&format!(
            "impl<H: {handler} + ?Sized + 'static> Action for {}<H> {{\n",
            names.action
        ));
        output.push_str("    fn name(&self) -> &'static str {\n");
        output.push_str(&format!("        {action_const}\n"));
        output.push_str("    }\n\n");
        output.push_str(
            "    fn execute(&mut self, parameters: &mut ActionParameters<'_>, dispatcher: &dyn Dispatcher) {\n",
        );
        output.push_str(&format!("        self.args = {}::default();\n", names.args));
        output.push_str("        if !self.args.read(&mut parameters.reader) {\n");
        output.push_str(&format!(
            "            dispatcher.send_exception({action_const}, \"invalid parameters\", parameters.sequence_number, parameters.correlation_id);\n"
        ));
        output.push_str("            return;\n");
        output.push_str("        }\n");

        let arguments: Vec<String> = function
            .arguments
            .fields
            .iter()
            .map(Self::handler_argument)
            .collect();
        if !arguments.is_empty() {
            output.push_str("        let args = &self.args;\n");
        }
        let call = format!("self.handler.{}({})", names.method, arguments.join(", "));
        if function.is_void() {
            output.push_str(&format!("        {call};\n"));
        } else {
            output.push_str(&format!("        let result = {call};\n"));
        }

        if !function.oneway {
            output.push_str(&format!(
                "        let Some(mut response) = dispatcher.begin_response({action_const}, MessageKind::Reply, parameters.sequence_number) else {{\n"
            ));
            output.push_str("            return;\n");
            output.push_str("        };\n");
            output.push_str("        let writer = &mut response;\n");
            if !function.is_void() {
                serializer.emit_field_write(
                    &mut output,
                    2,
                    0,
                    "result",
                    &function.return_type,
                    "result",
                )?;
            }
            output.push_str("        writer.add_stop();\n");
            output.push_str("        if writer.has_errors() {\n");
            output.push_str(&format!(
                "            dispatcher.send_exception({action_const}, \"cannot encode result\", parameters.sequence_number, parameters.correlation_id);\n"
            ));
            output.push_str("            return;\n");
            output.push_str("        }\n");
            output.push_str("        dispatcher.finish_response(response, parameters.correlation_id);\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        Ok(output)
    }

    fn client_call(&self, function: &FunctionDef, names: &FunctionNames) -> String {
        let mut output = String::new();
        let action_const = &names.action_const;
        let fields = &function.arguments.fields;

        output.push_str(&format!("impl {} {{\n", names.client));
        output.push_str(&format!(
            "    /// Issues a `{}` call; `callback` receives exactly one completion.\n",
            function.name
        ));
        output.push_str("    #[allow(clippy::field_reassign_with_default)]\n");
        output.push_str("    pub fn call(\n");
        output.push_str("        dispatcher: &dyn Dispatcher,\n");
        for field in fields {
            output.push_str(&format!(
                "        {}: {},\n",
                param_name(field),
                self.param_type(field)
            ));
        }
        output.push_str(&format!(
            "        mut callback: Box<dyn {}>,\n",
            names.callback
        ));
        output.push_str("    ) {\n");
        output.push_str(&format!(
            "        let Some(mut request) = dispatcher.begin_outgoing_message({action_const}) else {{\n"
        ));
        output.push_str(&format!(
            "            callback.exception_result(ApplicationException::unavailable({action_const}));\n"
        ));
        output.push_str("            return;\n");
        output.push_str("        };\n");
        if fields.is_empty() {
            output.push_str(&format!("        let args = {}::default();\n", names.args));
        } else {
            output.push_str(&format!(
                "        let mut args = {}::default();\n",
                names.args
            ));
            for field in fields {
                output.push_str(&Self::client_assignment(field));
            }
        }
        output.push_str("        if !args.write(&mut request) {\n");
        output.push_str(&format!(
            "            callback.exception_result(ApplicationException::protocol_error(format!(\"cannot encode arguments of {{}}\", {action_const})));\n"
        ));
        output.push_str("            return;\n");
        output.push_str("        }\n");
        if function.oneway {
            output.push_str(&format!(
                "        dispatcher.finish_outgoing_message({action_const}, request, None);\n"
            ));
            output.push_str(&format!("        callback.{}();\n", names.result_method));
        } else {
            output.push_str(&format!(
                "        dispatcher.finish_outgoing_message({action_const}, request, Some(Box::new(Self {{ callback }})));\n"
            ));
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn client_action(
        &self,
        function: &FunctionDef,
        names: &FunctionNames,
        serializer: &SerializeGenerator<'_>,
    ) -> Result<String> {
        let mut output = String::new();
        let action_const = &names.action_const;

        output.push_str(&format!("impl ClientAction for {} {{\n", names.client));
        output.push_str("    fn name(&self) -> &'static str {\n");
        output.push_str(&format!("        {action_const}\n"));
        output.push_str("    }\n\n");

        if function.oneway {
            output.push_str(
                "    fn call_answered(mut self: Box<Self>, _parameters: &mut ActionParameters<'_>) {\n",
            );
            output.push_str(&format!("        self.callback.{}();\n", names.result_method));
            output.push_str("    }\n\n");
        } else {
            output.push_str(
                "    fn call_answered(mut self: Box<Self>, parameters: &mut ActionParameters<'_>) {\n",
            );
            output.push_str("        let reader = &mut parameters.reader;\n");
            output.push_str("        let mut read_result = true;\n");
            let mut targets = Vec::new();
            if !function.is_void() {
                output.push_str(&format!(
                    "        let mut result: {} = {};\n",
                    self.ctx.type_name(&function.return_type),
                    self.ctx.zero_value(&function.return_type)
                ));
                output.push_str("        let mut result_present = false;\n");
                targets.push(ReadTarget {
                    id: 0,
                    name: "result",
                    ty: &function.return_type,
                    place: "result".to_string(),
                    mark: "result_present = true;".to_string(),
                    required_flag: Some("result_present".to_string()),
                });
            }
            serializer.emit_read_loop(&mut output, 2, &targets)?;
            output.push_str("        if read_result {\n");
            if function.is_void() {
                output.push_str(&format!(
                    "            self.callback.{}();\n",
                    names.result_method
                ));
            } else {
                output.push_str(&format!(
                    "            self.callback.{}(result);\n",
                    names.result_method
                ));
            }
            output.push_str("        } else {\n");
            output.push_str(&format!(
                "            self.callback.exception_result(ApplicationException::missing_result({action_const}));\n"
            ));
            output.push_str("        }\n");
            output.push_str("    }\n\n");
        }

        output.push_str(
            "    fn call_failed(mut self: Box<Self>, exception: ApplicationException) {\n",
        );
        output.push_str("        self.callback.exception_result(exception);\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        Ok(output)
    }

    /// Generates the skeleton artifact body: a server type implementing the
    /// handler trait of the service and of every ancestor.
    #[must_use]
    pub fn generate_skeleton(&self, service: &ServiceDef) -> String {
        let mut output = String::new();
        let server = server_name(&service.name);
        let impl_path = self.ctx.module_path(
            ArtifactKind::ServiceImpl,
            &service.name,
            &service.scope.namespace,
        );

        output.push_str(&format!(
            "/// Example implementation of the `{}` service.\n",
            service.name
        ));
        output.push_str("#[derive(Debug, Default)]\n");
        output.push_str(&format!("pub struct {server};\n\n"));

        output.push_str(&format!("impl {server} {{\n"));
        output.push_str("    /// Registers every action of the service, served by `server`.\n");
        output.push_str("    pub fn register(server: &Arc<Self>, registry: &mut ActionRegistry) {\n");
        output.push_str(&format!(
            "        {impl_path}::register_actions(registry, server);\n"
        ));
        output.push_str("    }\n");
        output.push_str("}\n");

        let chain = std::iter::once(service).chain(service.ancestors().map(|s| s.as_ref()));
        for svc in chain {
            output.push('\n');
            output.push_str(&format!(
                "impl {} for {server} {{\n",
                self.handler_path(svc)
            ));
            for (i, function) in svc.functions.iter().enumerate() {
                if i > 0 {
                    output.push('\n');
                }
                output.push_str(&format!("    {} {{\n", self.signature(function, true)));
                output.push_str(&format!("{}// your code here\n", pad(2)));
                if !function.is_void() {
                    output.push_str(&format!("{}todo!({:?})\n", pad(2), function.name));
                }
                output.push_str("    }\n");
            }
            output.push_str("}\n");
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::error::CodegenError;
    use idlgen_schema::{Program, StructDef};
    use std::sync::Arc;

    fn calculator() -> Program {
        let mut program = Program::new("tutorial", "tutorial");
        let scope = program.scope.clone();
        let work = program.add_struct(
            StructDef::new(&scope, "Work")
                .with_field(Field::new(1, "num1", BaseType::I32))
                .with_field(Field::new(2, "comment", BaseType::String).optional()),
        );
        program.add_service(
            ServiceDef::new(&scope, "Calculator")
                .with_function(FunctionDef::new(&scope, "ping", BaseType::Void))
                .with_function(
                    FunctionDef::new(&scope, "add", BaseType::I32)
                        .with_arg(Field::new(1, "num1", BaseType::I32))
                        .with_arg(Field::new(2, "num2", BaseType::I32)),
                )
                .with_function(
                    FunctionDef::new(&scope, "calculate", BaseType::I32)
                        .with_arg(Field::new(1, "logid", BaseType::I32))
                        .with_arg(Field::new(2, "w", work).required()),
                )
                .with_function(
                    FunctionDef::new(&scope, "echo", BaseType::String)
                        .with_arg(Field::new(1, "callback", BaseType::String).optional()),
                )
                .with_function(FunctionDef::oneway(&scope, "zip")),
        );
        program
    }

    #[test]
    fn test_interface() {
        let program = calculator();
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let service = Arc::clone(&program.services[0]);
        let output = ServiceGenerator::new(&ctx).generate_interface(&service).unwrap();

        assert!(output.contains("pub const ADD_ACTION: &str = \"add\";"));
        assert!(output.contains("pub trait CalculatorHandler: Send + Sync {"));
        assert!(output.contains("    fn ping(&self);"));
        assert!(output.contains("    fn add(&self, num1: Option<i32>, num2: Option<i32>) -> i32;"));
        assert!(output.contains("    fn calculate(&self, logid: Option<i32>, w: &Work) -> i32;"));
        assert!(output.contains("    fn echo(&self, callback_arg: Option<&str>) -> String;"));
        assert!(output.contains("pub struct AddArgs {"));
        assert!(output.contains("pub struct AddAction<H: ?Sized> {"));
        assert!(output.contains("    fn add_result(&mut self, result: i32);"));
        assert!(output.contains("    fn zip_result(&mut self);"));
        assert!(output.contains("pub struct ZipClientAction {"));
        syn::parse_file(&output).unwrap();
    }

    #[test]
    fn test_implementation() {
        let program = calculator();
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let service = Arc::clone(&program.services[0]);
        let output = ServiceGenerator::new(&ctx)
            .generate_implementation(&service)
            .unwrap();

        assert!(output.contains("impl WireStruct for CalculateArgs {"));
        assert!(output.contains(
            "impl<H: CalculatorHandler + ?Sized + 'static> Action for AddAction<H> {"
        ));
        assert!(output.contains("dispatcher.send_exception(ADD_ACTION, \"invalid parameters\""));
        assert!(output.contains(
            "let result = self.handler.calculate(args.isset.logid.then_some(args.logid), &args.w);"
        ));
        assert!(output.contains("        writer.add_i32(0, result);\n"));
        assert!(output.contains("let result = self.handler.echo(args.isset.callback.then_some(args.callback.as_str()));"));
        assert!(output.contains("            args.callback = value.to_owned();\n"));
        assert!(output.contains("        args.w = w.clone();\n"));
        assert!(output.contains("dispatcher.finish_outgoing_message(ZIP_ACTION, request, None);"));
        assert!(output.contains("        callback.zip_result();\n"));
        assert!(output.contains("self.callback.exception_result(ApplicationException::missing_result(ADD_ACTION));"));
        assert!(output.contains("registry.register(PING_ACTION, move || -> Box<dyn Action> {"));
        syn::parse_file(&output).unwrap();
    }

    #[test]
    fn test_unencodable_result_becomes_exception() {
        let program = calculator();
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let service = Arc::clone(&program.services[0]);
        let output = ServiceGenerator::new(&ctx)
            .generate_implementation(&service)
            .unwrap();
        let add = output
            .find("Action for AddAction<H>")
            .map(|start| &output[start..])
            .unwrap();
        let add = &add[..add.find("\n}\n").unwrap()];
        let check = add.find("if writer.has_errors() {").unwrap();
        assert!(add[check..].contains(
            "dispatcher.send_exception(ADD_ACTION, \"cannot encode result\", parameters.sequence_number, parameters.correlation_id);\n            return;"
        ));
        assert!(add.find("writer.add_stop();").unwrap() < check);
        assert!(check < add.find("dispatcher.finish_response(").unwrap());
    }

    #[test]
    fn test_oneway_sends_no_reply() {
        let program = calculator();
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        let service = Arc::clone(&program.services[0]);
        let output = ServiceGenerator::new(&ctx)
            .generate_implementation(&service)
            .unwrap();
        let zip = output
            .find("Action for ZipAction<H>")
            .map(|start| &output[start..])
            .unwrap();
        let end = zip.find("\n}\n").unwrap();
        assert!(!zip[..end].contains("begin_response"));
    }

    #[test]
    fn test_extension_and_skeleton() {
        let shared = {
            let mut p = Program::new("shared", "shared");
            let scope = p.scope.clone();
            p.add_service(
                ServiceDef::new(&scope, "SharedService").with_function(
                    FunctionDef::new(&scope, "getStruct", BaseType::String)
                        .with_arg(Field::new(1, "key", BaseType::I32).required()),
                ),
            );
            Arc::new(p)
        };
        let mut program = Program::new("tutorial", "tutorial");
        program.add_include(&shared);
        let scope = program.scope.clone();
        let service = program.add_service(
            ServiceDef::new(&scope, "Calculator")
                .extending(&shared.services[0])
                .with_function(FunctionDef::new(&scope, "ping", BaseType::Void)),
        );
        let config = GeneratorConfig::default().with_module_prefix("crate::generated");
        let ctx = CodegenContext::new(&program, &config);
        let generator = ServiceGenerator::new(&ctx);

        let interface = generator.generate_interface(&service).unwrap();
        assert!(interface.contains(
            "pub trait CalculatorHandler: crate::generated::shared_service_service::shared::SharedServiceHandler {"
        ));

        let implementation = generator.generate_implementation(&service).unwrap();
        assert!(implementation.contains(
            "    crate::generated::shared_service_service_impl::shared::register_actions(registry, handler);\n"
        ));

        let skeleton = generator.generate_skeleton(&service);
        assert!(skeleton.contains("pub struct CalculatorServer;"));
        assert!(skeleton.contains(
            "impl crate::generated::calculator_service::tutorial::CalculatorHandler for CalculatorServer {"
        ));
        assert!(skeleton.contains(
            "impl crate::generated::shared_service_service::shared::SharedServiceHandler for CalculatorServer {"
        ));
        assert!(skeleton.contains("    fn get_struct(&self, _key: i32) -> String {"));
        assert!(skeleton.contains("        todo!(\"getStruct\")\n"));
        syn::parse_file(&skeleton).unwrap();
    }

    #[test]
    fn test_container_argument_is_fatal() {
        let mut program = Program::new("p", "");
        let scope = program.scope.clone();
        let service = program.add_service(ServiceDef::new(&scope, "S").with_function(
            FunctionDef::new(&scope, "f", BaseType::Void)
                .with_arg(Field::new(1, "ids", TypeRef::list(BaseType::I32))),
        ));
        let config = GeneratorConfig::default();
        let ctx = CodegenContext::new(&program, &config);
        assert!(matches!(
            ServiceGenerator::new(&ctx).generate_implementation(&service),
            Err(CodegenError::UnsupportedWireType { .. })
        ));
    }
}
