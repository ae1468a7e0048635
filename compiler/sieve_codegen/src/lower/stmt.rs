//! Statement lowering.
//!
//! Every statement is written on its own line(s) at the current indent.
//! Blocks open with the declarations of the locals scoped to them, so local
//! declaration statements only assign their initializer.

use sieve_ir::ast::{StmtKind, SwitchCase, PREC_ASSIGN, PREC_STATEMENT, PREC_TOP};
use sieve_ir::{ExprId, StmtId};

use super::{ensure_sufficient_stack, reject, LowerError, Lowerer};

impl Lowerer<'_, '_> {
    pub(super) fn stmt(&mut self, id: StmtId) -> Result<(), LowerError> {
        ensure_sufficient_stack(|| self.stmt_inner(id))
    }

    fn stmt_inner(&mut self, id: StmtId) -> Result<(), LowerError> {
        let program = self.program;
        let stmt = program.stmt(id);
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::Block(stmts) => {
                self.out.write_indent();
                self.block(id, stmts)?;
                self.out.newline();
            }
            StmtKind::Local { local, init } => {
                if let Some(init) = init {
                    let name = self.local_name(*local);
                    self.out.write_indent();
                    self.out.write(name);
                    self.out.write(" = ");
                    self.expr(*init, PREC_ASSIGN)?;
                    self.out.write(";");
                    self.out.newline();
                }
            }
            StmtKind::Expr(expr) => {
                self.out.write_indent();
                self.expr(*expr, PREC_STATEMENT)?;
                self.out.write(";");
                self.out.newline();
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => match self.constant_condition(*cond) {
                // Statically dead branches are not emitted at all.
                Some(true) => self.stmt(*then_branch)?,
                Some(false) => {
                    if let Some(else_branch) = else_branch {
                        self.stmt(*else_branch)?;
                    }
                }
                None => {
                    self.out.write_indent();
                    self.out.write("if (");
                    self.expr(*cond, PREC_TOP)?;
                    self.out.write(") ");
                    self.braced(*then_branch)?;
                    if let Some(else_branch) = else_branch {
                        self.out.write(" else ");
                        self.braced(*else_branch)?;
                    }
                    self.out.newline();
                }
            },
            StmtKind::While { cond, body } => {
                self.out.write_indent();
                self.out.write("while (");
                self.expr(*cond, PREC_TOP)?;
                self.out.write(") ");
                self.braced(*body)?;
                self.out.newline();
            }
            StmtKind::DoWhile { body, cond } => {
                self.out.write_indent();
                self.out.write("do ");
                self.braced(*body)?;
                self.out.write(" while (");
                self.expr(*cond, PREC_TOP)?;
                self.out.write(");");
                self.out.newline();
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                let init = self.for_init(init)?;
                let cond = match cond {
                    Some(cond) => self.capture_expr(*cond, PREC_TOP)?,
                    None => String::new(),
                };
                let update = self.expr_list(update)?;
                // Loop variables live in a block of their own, so sibling
                // loops may reuse a name.
                let scoped = !self.method.locals.declared_in(id).is_empty();
                if scoped {
                    self.out.writeln("{");
                    self.out.indent();
                    self.declare_locals(id);
                }
                self.out.write_indent();
                self.out.write(&format!("for ({init}; {cond}; {update}) "));
                self.braced(*body)?;
                self.out.newline();
                if scoped {
                    self.out.dedent();
                    self.out.writeln("}");
                }
            }
            StmtKind::ForEach { .. } => return reject("enhanced for loop", span),
            StmtKind::Switch { selector, cases } => self.switch(*selector, cases)?,
            StmtKind::Break(label) => {
                if label.is_some() {
                    return reject("labelled break", span);
                }
                self.out.writeln("break;");
            }
            StmtKind::Continue(label) => {
                if label.is_some() {
                    return reject("labelled continue", span);
                }
                self.out.writeln("continue;");
            }
            StmtKind::Return(value) => match value {
                Some(value) => {
                    self.out.write_indent();
                    self.out.write("return ");
                    self.expr(*value, PREC_TOP)?;
                    self.out.write(";");
                    self.out.newline();
                }
                None => self.out.writeln("return;"),
            },
            StmtKind::Throw(expr) => {
                let thrown = program.type_name(program.expr(*expr).ty);
                self.out.writeln(&format!("fatalVMError(\"{thrown}\");"));
            }
            StmtKind::Empty => self.out.writeln(";"),
            StmtKind::Labeled { .. } => return reject("label", span),
            StmtKind::Try { .. } => return reject("try statement", span),
            StmtKind::Synchronized { .. } => return reject("synchronized statement", span),
            StmtKind::Assert { .. } => return reject("assertion", span),
            StmtKind::LocalClass(_) => return reject("local class", span),
        }
        Ok(())
    }

    /// Write `{ ... }` for block `id` without leading indent or trailing
    /// newline. Locals scoped to the block are declared first.
    pub(super) fn block(&mut self, id: StmtId, stmts: &[StmtId]) -> Result<(), LowerError> {
        self.out.write("{");
        self.out.newline();
        self.out.indent();
        self.declare_locals(id);
        for &stmt in stmts {
            self.stmt(stmt)?;
        }
        self.out.dedent();
        self.out.write_indent();
        self.out.write("}");
        Ok(())
    }

    /// One `type name;` line per local scoped to `scope`.
    fn declare_locals(&mut self, scope: StmtId) {
        let method = self.method;
        for &local in method.locals.declared_in(scope) {
            let ty = self.types.c_type(self.program.local(local).ty);
            let name = self.local_name(local);
            self.out.writeln(&format!("{ty} {name};"));
        }
    }

    /// Loop and branch bodies are always braced.
    fn braced(&mut self, id: StmtId) -> Result<(), LowerError> {
        let program = self.program;
        if let StmtKind::Block(stmts) = &program.stmt(id).kind {
            return self.block(id, stmts);
        }
        self.out.write("{");
        self.out.newline();
        self.out.indent();
        self.stmt(id)?;
        self.out.dedent();
        self.out.write_indent();
        self.out.write("}");
        Ok(())
    }

    fn for_init(&mut self, init: &[StmtId]) -> Result<String, LowerError> {
        let program = self.program;
        let mut parts = Vec::with_capacity(init.len());
        for &id in init {
            let stmt = program.stmt(id);
            match &stmt.kind {
                StmtKind::Local {
                    local,
                    init: Some(value),
                } => {
                    let name = self.local_name(*local);
                    let value = self.capture_expr(*value, PREC_ASSIGN)?;
                    parts.push(format!("{name} = {value}"));
                }
                StmtKind::Local { init: None, .. } => {}
                StmtKind::Expr(expr) => parts.push(self.capture_expr(*expr, PREC_STATEMENT)?),
                _ => return reject("statement in for-loop initializer", stmt.span),
            }
        }
        Ok(parts.join(", "))
    }

    fn expr_list(&mut self, exprs: &[ExprId]) -> Result<String, LowerError> {
        let mut parts = Vec::with_capacity(exprs.len());
        for &expr in exprs {
            parts.push(self.capture_expr(expr, PREC_STATEMENT)?);
        }
        Ok(parts.join(", "))
    }

    fn switch(&mut self, selector: ExprId, cases: &[SwitchCase]) -> Result<(), LowerError> {
        self.out.write_indent();
        self.out.write("switch (");
        self.expr(selector, PREC_TOP)?;
        self.out.write(") {");
        self.out.newline();
        self.out.indent();
        for case in cases {
            match case.label {
                Some(label) => {
                    self.out.write_indent();
                    self.out.write("case ");
                    self.expr(label, PREC_TOP)?;
                    self.out.write(":");
                    self.out.newline();
                }
                None => self.out.writeln("default:"),
            }
            self.out.indent();
            for &stmt in &case.body {
                self.stmt(stmt)?;
            }
            self.out.dedent();
        }
        self.out.dedent();
        self.out.writeln("}");
        Ok(())
    }
}
