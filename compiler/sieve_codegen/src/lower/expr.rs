//! Expression lowering.

use sieve_ir::ast::{
    BinaryOp, ExprKind, Literal, UnaryOp, PREC_ASSIGN, PREC_CONDITIONAL, PREC_PREFIX,
    PREC_STATEMENT, PREC_TOP,
};
use sieve_ir::{
    ClassId, Constant, ExprId, FieldId, FieldSymbol, LocalId, MethodId, Span, TypeId, TypeKind,
};

use super::{ensure_sufficient_stack, reject, LowerError, Lowerer};
use crate::literals::render_use;
use crate::mangle::type_ident;

/// Operand of a binary operation. Compound assignment supplies its target
/// local as the left operand.
#[derive(Copy, Clone)]
pub(super) enum Operand {
    Expr(ExprId),
    Local(LocalId),
}

/// Where an assigned value goes.
enum Store {
    /// A C variable: `name = value`.
    Variable(String),
    /// A mutator call completed by the value: `prefix value)`.
    Call(String),
}

impl Lowerer<'_, '_> {
    /// Render `id` in a position of precedence `prec`.
    pub(super) fn expr(&mut self, id: ExprId, prec: u8) -> Result<(), LowerError> {
        ensure_sufficient_stack(|| self.expr_inner(id, prec))
    }

    pub(super) fn capture_expr(&mut self, id: ExprId, prec: u8) -> Result<String, LowerError> {
        self.capture(|this| this.expr(id, prec))
    }

    fn expr_inner(&mut self, id: ExprId, prec: u8) -> Result<(), LowerError> {
        let program = self.program;
        let expr = program.expr(id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(literal) => {
                let text = self.literal(literal, span)?;
                self.out.write(&text);
            }
            ExprKind::Local(local) => {
                let name = self.local_name(*local);
                self.out.write(name);
            }
            ExprKind::This => self.out.write("this"),
            ExprKind::Field { receiver, field } => {
                let text = self.field_read(*receiver, *field, span)?;
                self.out.write(&text);
            }
            ExprKind::ArrayLength(array) => {
                let array = self.capture_expr(*array, PREC_TOP)?;
                self.out
                    .write(&format!("Array_length(nullPointerCheck({array}))"));
            }
            ExprKind::Index { array, index } => {
                let kind = self.types.array_accessor(expr.ty);
                let array = self.capture_expr(*array, PREC_TOP)?;
                let index = self.capture_expr(*index, PREC_TOP)?;
                self.out.write(&format!("aload_{kind}({array}, {index})"));
            }
            ExprKind::Call {
                receiver,
                method,
                args,
            } => self.call(*receiver, *method, args, span)?,
            ExprKind::Unary { op, operand } => self.unary(*op, *operand, span, prec)?,
            ExprKind::Binary { op, left, right } => {
                self.binary(*op, Operand::Expr(*left), Operand::Expr(*right), span, prec)?;
            }
            ExprKind::Assign { target, value } => self.assign(*target, *value, span, prec)?,
            ExprKind::CompoundAssign { op, target, value } => {
                let Some(local) = self.local_target(*target) else {
                    return reject("non-local compound assignment", span);
                };
                let name = self.local_name(local);
                self.open(prec, PREC_ASSIGN);
                self.out.write(name);
                self.out.write(" = ");
                self.binary(*op, Operand::Local(local), Operand::Expr(*value), span, PREC_ASSIGN)?;
                self.close(prec, PREC_ASSIGN);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.open(prec, PREC_CONDITIONAL);
                self.expr(*cond, PREC_CONDITIONAL - 1)?;
                self.out.write(" ? ");
                self.expr(*then_expr, PREC_TOP)?;
                self.out.write(" : ");
                self.expr(*else_expr, PREC_CONDITIONAL)?;
                self.close(prec, PREC_CONDITIONAL);
            }
            ExprKind::Cast { target, expr } => {
                let ty = self.types.c_type(*target);
                self.open(prec, PREC_PREFIX);
                self.out.write(&format!("({ty})"));
                self.expr(*expr, PREC_PREFIX)?;
                self.close(prec, PREC_PREFIX);
            }
            ExprKind::Paren(inner) => {
                self.out.write("(");
                self.expr(*inner, PREC_TOP)?;
                self.out.write(")");
            }
            ExprKind::InstanceOf { .. } => return reject("instanceof", span),
            ExprKind::NewObject { .. } => return reject("object allocation", span),
            ExprKind::NewArray { .. } => return reject("array allocation", span),
            ExprKind::AnonymousClass(_) => return reject("anonymous class", span),
            ExprKind::TypeApply(_) => return reject("generic type application", span),
        }
        Ok(())
    }

    /// The local an lvalue expression denotes, looking through parentheses.
    pub(super) fn local_target(&self, id: ExprId) -> Option<LocalId> {
        match self.program.expr(id).kind {
            ExprKind::Local(local) => Some(local),
            ExprKind::Paren(inner) => self.local_target(inner),
            _ => None,
        }
    }

    fn literal(&mut self, literal: &Literal, span: Span) -> Result<String, LowerError> {
        Ok(match literal {
            Literal::Int(value) => int_literal(*value),
            Literal::Long(value) => long_literal(*value),
            Literal::Float(value) => {
                if !value.is_finite() {
                    return reject("non-finite floating-point literal", span);
                }
                format!("{value:?}F")
            }
            Literal::Double(value) => {
                if !value.is_finite() {
                    return reject("non-finite floating-point literal", span);
                }
                format!("{value:?}")
            }
            Literal::Char(unit) => char_literal(*unit),
            Literal::Bool(value) => value.to_string(),
            Literal::Str(text) => self.string_literal(text, span)?,
            Literal::Null => "null".to_owned(),
        })
    }

    /// Strings are pooled under the type declaring the current method.
    fn string_literal(&mut self, text: &str, span: Span) -> Result<String, LowerError> {
        let owner = self.program.method(self.method.method).owner;
        let key = self
            .pool
            .pool(owner, text)
            .map_err(|err| LowerError::Inconvertible {
                desc: err.to_string(),
                span,
            })?;
        Ok(render_use(text, key))
    }

    fn is_global(&self, field: &FieldSymbol) -> bool {
        field.is_static()
            && field.ty != TypeId::NULL
            && self
                .program
                .inherits_named(field.owner, &self.profile.global_fields_marker)
    }

    fn field_read(
        &mut self,
        receiver: Option<ExprId>,
        id: FieldId,
        span: Span,
    ) -> Result<String, LowerError> {
        let field = self.program.field(id);
        let ident = format!("{}_{}", type_ident(&self.program.class(field.owner).name), field.name);
        if field.is_static() {
            if self.is_global(field) {
                return Ok(ident);
            }
            if let Some(value) = &field.constant {
                return self.constant(field.owner, field, value, span);
            }
            if field.ty == TypeId::NULL {
                return Ok("null".to_owned());
            }
            return reject("access to non-constant static field", span);
        }
        let receiver = self.field_receiver(receiver, field.ty)?;
        Ok(format!("{ident}({receiver})"))
    }

    /// Receiver text of an instance field access. Explicit receivers are
    /// null-checked when the field holds an object reference.
    fn field_receiver(
        &mut self,
        receiver: Option<ExprId>,
        field_ty: TypeId,
    ) -> Result<String, LowerError> {
        match receiver {
            None => Ok("this".to_owned()),
            Some(r) if matches!(self.program.expr(r).kind, ExprKind::This) => Ok("this".to_owned()),
            Some(r) => {
                let text = self.capture_expr(r, PREC_TOP)?;
                if self.types.is_checked_reference(field_ty) {
                    Ok(format!("nullPointerCheck({text})"))
                } else {
                    Ok(text)
                }
            }
        }
    }

    /// Inlined value of a static constant. Constants of the profile's
    /// namespace carry their symbolic name in a comment.
    fn constant(
        &mut self,
        owner: ClassId,
        field: &FieldSymbol,
        value: &Constant,
        span: Span,
    ) -> Result<String, LowerError> {
        let text = match value {
            Constant::Int(v) => int_literal(*v),
            Constant::Long(v) => format!("JLONG_CONSTANT({v})"),
            Constant::Float(v) => self.literal(&Literal::Float(*v), span)?,
            Constant::Double(v) => self.literal(&Literal::Double(*v), span)?,
            Constant::Char(unit) => char_literal(*unit),
            Constant::Bool(v) => v.to_string(),
            Constant::Str(s) => self.string_literal(s, span)?,
        };
        let class = &self.program.class(owner).name;
        let namespace = self.profile.constant_namespace.as_str();
        match class.strip_prefix(namespace) {
            Some(local) if !namespace.is_empty() => {
                Ok(format!("/*{}_{}*/{text}", type_ident(local), field.name))
            }
            _ => Ok(text),
        }
    }

    /// Constant truth value of a condition, if it has one.
    pub(super) fn constant_condition(&self, id: ExprId) -> Option<bool> {
        match &self.program.expr(id).kind {
            ExprKind::Literal(Literal::Bool(value)) => Some(*value),
            ExprKind::Paren(inner) => self.constant_condition(*inner),
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.constant_condition(*operand).map(|v| !v),
            ExprKind::Field { field, .. } => {
                let field = self.program.field(*field);
                match field.constant {
                    Some(Constant::Bool(value)) if !self.is_global(field) => Some(value),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn call(
        &mut self,
        receiver: Option<ExprId>,
        method: MethodId,
        args: &[ExprId],
        span: Span,
    ) -> Result<(), LowerError> {
        let callee = self.program.method(method);
        if callee.is_abstract() {
            if !self.registry.dispatches(method) {
                return reject("abstract method invocation without implementers", span);
            }
        } else if self.program.is_virtual(method) {
            return reject("virtual method invocation", span);
        }

        let name = self.mangler.function_name(method);
        let mut parts = Vec::with_capacity(args.len() + 1);
        if !callee.is_static() {
            let receiver = match receiver {
                None => "this".to_owned(),
                Some(r) if matches!(self.program.expr(r).kind, ExprKind::This) => "this".to_owned(),
                Some(r) => {
                    let text = self.capture_expr(r, PREC_TOP)?;
                    if self.types.raw_name(callee.owner).is_none() {
                        format!("nullPointerCheck({text})")
                    } else {
                        text
                    }
                }
            };
            parts.push(receiver);
        }
        for &arg in args {
            parts.push(self.capture_expr(arg, PREC_TOP)?);
        }
        self.out.write(&format!("{name}({})", parts.join(", ")));
        Ok(())
    }

    fn unary(&mut self, op: UnaryOp, operand: ExprId, span: Span, prec: u8) -> Result<(), LowerError> {
        if self.program.type_kind(self.program.expr(operand).ty).is_floating() {
            return reject("float or double operation", span);
        }
        if op.is_mutation() && self.local_target(operand).is_none() {
            return reject("non-local increment/decrement", span);
        }
        let own = op.precedence();
        let inner = self.capture_expr(operand, own)?;
        let symbol = op.as_symbol();
        self.open(prec, own);
        if op.is_postfix() {
            self.out.write(&inner);
            self.out.write(symbol);
        } else {
            self.out.write(symbol);
            // `- -x` must not become `--x`.
            if inner.starts_with(['-', '+']) && symbol.ends_with(['-', '+']) {
                self.out.write(" ");
            }
            self.out.write(&inner);
        }
        self.close(prec, own);
        Ok(())
    }

    fn operand_type(&self, operand: Operand) -> TypeId {
        match operand {
            Operand::Expr(id) => self.program.expr(id).ty,
            Operand::Local(local) => self.program.local(local).ty,
        }
    }

    fn operand(&mut self, operand: Operand, prec: u8) -> Result<(), LowerError> {
        match operand {
            Operand::Expr(id) => self.expr(id, prec),
            Operand::Local(local) => {
                let name = self.local_name(local);
                self.out.write(name);
                Ok(())
            }
        }
    }

    pub(super) fn binary(
        &mut self,
        op: BinaryOp,
        left: Operand,
        right: Operand,
        span: Span,
        prec: u8,
    ) -> Result<(), LowerError> {
        let (lt, rt) = (self.operand_type(left), self.operand_type(right));
        if op == BinaryOp::Add && (!lt.is_primitive() || !rt.is_primitive()) {
            return reject("string concatenation", span);
        }
        let (lk, rk) = (self.program.type_kind(lt), self.program.type_kind(rt));
        if lk.is_floating() || rk.is_floating() {
            return reject("float or double operation", span);
        }

        // Shifts take the type of their left operand; everything else
        // promotes.
        let long = lk == TypeKind::Long || (!op.is_shift() && rk == TypeKind::Long);
        if let Some(helper) = helper_name(op, long) {
            self.out.write(helper);
            self.out.write("(");
            self.operand(left, PREC_TOP)?;
            self.out.write(", ");
            self.operand(right, PREC_TOP)?;
            self.out.write(")");
            return Ok(());
        }

        let own = op.precedence();
        self.open(prec, own);
        self.operand(left, own)?;
        self.out.write(&format!(" {} ", op.as_symbol()));
        self.operand(right, own - 1)?;
        self.close(prec, own);
        Ok(())
    }

    fn assign(&mut self, target: ExprId, value: ExprId, span: Span, prec: u8) -> Result<(), LowerError> {
        let store = self.store_target(target, span)?;
        match store {
            Store::Variable(name) => {
                self.open(prec, PREC_ASSIGN);
                self.out.write(&name);
                self.out.write(" = ");
                self.expr(value, PREC_ASSIGN)?;
                self.close(prec, PREC_ASSIGN);
            }
            // A mutator call has no value, so it may only stand as a statement.
            Store::Call(prefix) => {
                if prec != PREC_STATEMENT {
                    return reject(
                        "assignment to non-local, non-global variable as an expression",
                        span,
                    );
                }
                self.out.write(&prefix);
                self.expr(value, PREC_TOP)?;
                self.out.write(")");
            }
        }
        Ok(())
    }

    fn store_target(&mut self, target: ExprId, span: Span) -> Result<Store, LowerError> {
        let program = self.program;
        let expr = program.expr(target);
        match &expr.kind {
            ExprKind::Paren(inner) => self.store_target(*inner, span),
            ExprKind::Local(local) => Ok(Store::Variable(self.local_name(*local).to_owned())),
            ExprKind::Field { receiver, field } => {
                let symbol = program.field(*field);
                let ident = format!("{}_{}", type_ident(&program.class(symbol.owner).name), symbol.name);
                if symbol.is_static() {
                    if self.is_global(symbol) {
                        return Ok(Store::Variable(ident));
                    }
                    if symbol.constant.is_some() {
                        return reject("assignment to constant field", span);
                    }
                    return reject("access to non-constant static field", span);
                }
                let receiver = self.field_receiver(*receiver, symbol.ty)?;
                Ok(Store::Call(format!("set_{ident}({receiver}, ")))
            }
            ExprKind::Index { array, index } => {
                let kind = self.types.array_accessor(expr.ty);
                if kind == 'o' {
                    return reject("object array store", span);
                }
                let array = self.capture_expr(*array, PREC_TOP)?;
                let index = self.capture_expr(*index, PREC_TOP)?;
                Ok(Store::Call(format!("astore_{kind}({array}, {index}, ")))
            }
            _ => reject("assignment to a non-variable", span),
        }
    }
}

/// Builtin or runtime helper implementing `op`, if it is not inlined.
fn helper_name(op: BinaryOp, long: bool) -> Option<&'static str> {
    let (int, wide) = match op {
        BinaryOp::Div => ("div_i", "div_l"),
        BinaryOp::Rem => ("rem_i", "rem_l"),
        BinaryOp::Shl => ("sll", "slll"),
        BinaryOp::Shr => ("sra", "sral"),
        BinaryOp::UShr => ("srl", "srll"),
        _ => return None,
    };
    Some(if long { wide } else { int })
}

fn int_literal(value: i32) -> String {
    if value == i32::MIN {
        "(-2147483647 - 1)".to_owned()
    } else {
        value.to_string()
    }
}

fn long_literal(value: i64) -> String {
    if value == i64::MIN {
        "(-9223372036854775807L - 1)".to_owned()
    } else {
        format!("{value}L")
    }
}

/// Printable ASCII as a quoted C character, anything else numerically.
fn char_literal(unit: u16) -> String {
    match u8::try_from(unit) {
        Ok(b'\'') => "'\\''".to_owned(),
        Ok(b'\\') => "'\\\\'".to_owned(),
        Ok(byte) if byte == b' ' || byte.is_ascii_graphic() => format!("'{}'", char::from(byte)),
        _ => unit.to_string(),
    }
}
