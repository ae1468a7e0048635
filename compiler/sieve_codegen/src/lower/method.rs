//! Method-level lowering: signatures, directive bodies and dispatchers.

use sieve_collect::BodyOverride;
use sieve_ir::ast::StmtKind;
use sieve_ir::{MethodId, MethodKind, Program};

use super::{reject, LowerError, Lowerer};
use crate::ctypes::CTypeMapper;
use crate::mangle::type_ident;
use crate::Mangler;

/// Output for one method.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Lowered {
    /// A function definition and its documentation comment (possibly
    /// empty), kept apart so a `#line` marker can go between them.
    Function { doc: String, definition: String },
    /// A `#define`, emitted with the declarations.
    Macro(String),
}

/// `static <ret> <name>(<types>);`
pub(crate) fn prototype(
    program: &Program,
    types: CTypeMapper<'_>,
    mangler: &mut Mangler<'_>,
    method: MethodId,
) -> String {
    let symbol = program.method(method);
    let mut params = Vec::with_capacity(symbol.params.len() + 1);
    if !symbol.is_static() {
        params.push(types.class_type(symbol.owner).into_owned());
    }
    params.extend(program.param_types(method).map(|ty| types.c_type(ty).into_owned()));
    let params = if params.is_empty() {
        "void".to_owned()
    } else {
        params.join(", ")
    };
    let ret = types.c_type(symbol.return_type);
    let name = mangler.function_name(method);
    format!("static {ret} {name}({params});")
}

impl Lowerer<'_, '_> {
    /// Lower the whole method.
    #[tracing::instrument(level = "trace", skip_all, fields(method = %self.program.method_display(self.method.method)))]
    pub fn lower(mut self) -> Result<Lowered, LowerError> {
        let pm = self.method;
        let symbol = self.program.method(pm.method);
        let overridden = pm.directives.body_override();
        let dispatches = self.registry.dispatches(pm.method);
        let span = pm.decl.span;

        if overridden.is_none() && !dispatches {
            if symbol.kind != MethodKind::Method {
                return reject("constructor", span);
            }
            if pm.body().is_none() {
                return reject("method with no body", span);
            }
            if self.program.is_virtual(pm.method) {
                return reject("virtual method", span);
            }
        }

        let name = self.mangler.function_name(pm.method);
        if let Some(BodyOverride::Macro(text)) = overridden {
            let mut params = self.param_names();
            if !symbol.is_static() {
                params.insert(0, "this".to_owned());
            }
            let lines: Vec<&str> = text.lines().map(str::trim).collect();
            return Ok(Lowered::Macro(format!(
                "#define {name}({}) {}",
                params.join(", "),
                lines.join(" \\\n    ")
            )));
        }

        self.doc_comment();
        let doc = self.out.take_output();
        self.signature(&name);
        self.out.write(" ");
        if dispatches {
            self.dispatch();
        } else {
            match overridden {
                Some(BodyOverride::Proxy(target)) => self.proxy(target),
                Some(BodyOverride::Code(code)) => self.code(code)?,
                Some(BodyOverride::Macro(_)) | None => self.body()?,
            }
        }
        self.out.newline();
        Ok(Lowered::Function {
            doc,
            definition: self.out.take_output(),
        })
    }

    fn param_names(&self) -> Vec<String> {
        self.program
            .method(self.method.method)
            .params
            .iter()
            .map(|&p| self.local_name(p).to_owned())
            .collect()
    }

    /// `this` (for instance methods) followed by the parameter names.
    fn pass_through(&self) -> String {
        let mut args = self.param_names();
        if !self.program.method(self.method.method).is_static() {
            args.insert(0, "this".to_owned());
        }
        format!("({})", args.join(", "))
    }

    fn doc_comment(&mut self) {
        let Some(doc) = self.method.decl.doc.as_deref() else {
            return;
        };
        self.out.writeln("/**");
        for line in doc.lines() {
            let line = line.trim().replace("*/", "*\\/");
            if line.is_empty() {
                self.out.writeln(" *");
            } else {
                self.out.writeln(&format!(" * {line}"));
            }
        }
        self.out.writeln(" */");
    }

    fn signature(&mut self, name: &str) {
        let symbol = self.program.method(self.method.method);
        let mut params = Vec::with_capacity(symbol.params.len() + 1);
        if !symbol.is_static() {
            params.push(format!("{} this", self.types.class_type(symbol.owner)));
        }
        for &param in &symbol.params {
            let ty = self.types.c_type(self.program.local(param).ty);
            params.push(format!("{ty} {}", self.local_name(param)));
        }
        let params = if params.is_empty() {
            "void".to_owned()
        } else {
            params.join(", ")
        };
        let ret = self.types.c_type(symbol.return_type);
        self.out.write(&format!("static {ret} {name}({params})"));
    }

    fn body(&mut self) -> Result<(), LowerError> {
        let program = self.program;
        let Some(body) = self.method.body() else {
            return reject("method with no body", self.method.decl.span);
        };
        match &program.stmt(body).kind {
            StmtKind::Block(stmts) => self.block(body, stmts),
            _ => reject("method body that is not a block", program.stmt(body).span),
        }
    }

    fn proxy(&mut self, target: &str) {
        let symbol = self.program.method(self.method.method);
        let target = if target.is_empty() {
            symbol.name.as_str()
        } else {
            target
        };
        let ret = if symbol.returns_void() { "" } else { "return " };
        let call = format!("{ret}{target}{};", self.pass_through());
        self.out.write("{");
        self.out.newline();
        self.out.indent();
        self.out.writeln(&call);
        self.out.dedent();
        self.out.write("}");
    }

    /// Verbatim body. Non-void functions must visibly return.
    fn code(&mut self, code: &str) -> Result<(), LowerError> {
        let symbol = self.program.method(self.method.method);
        let has_return = code
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .any(|word| word == "return");
        if !symbol.returns_void() && !has_return {
            return Err(LowerError::MissingReturn {
                span: self.method.decl.span,
            });
        }
        self.out.write("{");
        self.out.newline();
        self.out.indent();
        for line in code.lines().map(str::trim).filter(|line| !line.is_empty()) {
            self.out.writeln(line);
        }
        self.out.dedent();
        self.out.write("}");
        Ok(())
    }

    /// Switch on the receiver's suite class id to the implementer of that
    /// class.
    fn dispatch(&mut self) {
        let (program, registry, pm) = (self.program, self.registry, self.method);
        let symbol = program.method(pm.method);
        let runtime = &self.profile.runtime;
        let invocation = self.pass_through();

        let mut cases = Vec::new();
        for &implementer in registry.implementers(pm.method) {
            let owner = program.method(implementer).owner;
            let label = type_ident(&program.class(owner).name);
            cases.push((self.mangler.function_name(implementer), label));
        }
        cases.sort();

        self.out.write("{");
        self.out.newline();
        self.out.indent();
        self.out
            .writeln(&format!("Address klass = {}(this);", runtime.class_of));
        self.out
            .writeln(&format!("int id = {}(klass);", runtime.class_id));
        self.out.writeln("int suiteID = id >= 0 ? id : -(id + 1);");
        self.out.writeln("switch (suiteID) {");
        self.out.indent();
        for (function, label) in cases {
            if symbol.returns_void() {
                self.out
                    .writeln(&format!("case {label}: {function}{invocation}; break;"));
            } else {
                self.out
                    .writeln(&format!("case {label}: return {function}{invocation};"));
            }
        }
        self.out
            .writeln("default: fatalVMError(\"bad abstract method dispatch\");");
        self.out.dedent();
        self.out.writeln("}");
        self.out.dedent();
        self.out.write("}");
    }
}
