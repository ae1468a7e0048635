//! Programmatic construction of [`Program`]s.
//!
//! Front ends that link against this crate directly, and the test suites of
//! the downstream crates, build programs through this instead of JSON.
//! Spans are handed out from a running cursor, so nodes created earlier sort
//! earlier in "source order".

use crate::ast::{
    BinaryOp, ClassDecl, Expr, ExprKind, Literal, Member, MethodDecl, SourceUnit, Stmt, StmtKind,
};
use crate::{
    ClassId, ClassSymbol, Constant, ExprId, FieldId, FieldSymbol, LocalId, LocalSymbol, MethodId,
    MethodKind, MethodSymbol, Modifiers, Program, Span, StmtId, TypeId, TypeKind, UnitId,
};

/// Qualified name used for string literal types when none is declared.
const STRING_CLASS: &str = "java.lang.String";

#[derive(Default)]
pub struct ProgramBuilder {
    program: Program,
    cursor: u32,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_span(&mut self) -> Span {
        let start = self.cursor;
        self.cursor += 2;
        Span::new(start, start + 1)
    }

    pub fn class(&mut self, name: &str) -> ClassId {
        self.class_with(name, None, &[], Modifiers::empty())
    }

    pub fn class_with(
        &mut self,
        name: &str,
        superclass: Option<ClassId>,
        interfaces: &[ClassId],
        modifiers: Modifiers,
    ) -> ClassId {
        let id = ClassId::from_len(self.program.classes.len());
        self.program.classes.push(ClassSymbol {
            name: name.to_owned(),
            superclass,
            interfaces: interfaces.to_vec(),
            modifiers,
        });
        id
    }

    pub fn class_type(&mut self, class: ClassId) -> TypeId {
        self.program.types.intern(TypeKind::Class(class))
    }

    pub fn array_type(&mut self, element: TypeId) -> TypeId {
        self.program.types.intern(TypeKind::Array(element))
    }

    pub fn string_type(&mut self) -> TypeId {
        let class = match self.program.class_by_name(STRING_CLASS) {
            Some(class) => class,
            None => self.class_with(STRING_CLASS, None, &[], Modifiers::FINAL),
        };
        self.class_type(class)
    }

    pub fn local(&mut self, name: &str, ty: TypeId) -> LocalId {
        let id = LocalId::from_len(self.program.locals.len());
        self.program.locals.push(LocalSymbol {
            name: name.to_owned(),
            ty,
        });
        id
    }

    pub fn method(
        &mut self,
        owner: ClassId,
        name: &str,
        params: &[(&str, TypeId)],
        return_type: TypeId,
        modifiers: Modifiers,
    ) -> MethodId {
        self.method_of_kind(owner, name, params, return_type, modifiers, MethodKind::Method)
    }

    pub fn method_of_kind(
        &mut self,
        owner: ClassId,
        name: &str,
        params: &[(&str, TypeId)],
        return_type: TypeId,
        modifiers: Modifiers,
        kind: MethodKind,
    ) -> MethodId {
        let params = params.iter().map(|&(n, ty)| self.local(n, ty)).collect();
        let id = MethodId::from_len(self.program.methods.len());
        self.program.methods.push(MethodSymbol {
            owner,
            name: name.to_owned(),
            params,
            return_type,
            modifiers,
            kind,
        });
        id
    }

    /// The `index`th parameter local of `method`.
    pub fn param(&self, method: MethodId, index: usize) -> LocalId {
        self.program.method(method).params[index]
    }

    pub fn field(&mut self, owner: ClassId, name: &str, ty: TypeId, modifiers: Modifiers) -> FieldId {
        let id = FieldId::from_len(self.program.fields.len());
        self.program.fields.push(FieldSymbol {
            owner,
            name: name.to_owned(),
            ty,
            modifiers,
            constant: None,
        });
        id
    }

    /// A `static final` field with a constant value.
    pub fn constant(&mut self, owner: ClassId, name: &str, ty: TypeId, value: Constant) -> FieldId {
        let id = self.field(owner, name, ty, Modifiers::STATIC | Modifiers::FINAL);
        self.program.fields[id.index()].constant = Some(value);
        id
    }

    pub fn expr(&mut self, kind: ExprKind, ty: TypeId) -> ExprId {
        let span = self.next_span();
        let id = ExprId::from_len(self.program.exprs.len());
        self.program.exprs.push(Expr { kind, ty, span });
        id
    }

    pub fn stmt(&mut self, kind: StmtKind) -> StmtId {
        let span = self.next_span();
        let id = StmtId::from_len(self.program.stmts.len());
        self.program.stmts.push(Stmt { kind, span });
        id
    }

    pub fn int(&mut self, value: i32) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Int(value)), TypeId::INT)
    }

    pub fn long(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Long(value)), TypeId::LONG)
    }

    pub fn bool_lit(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Bool(value)), TypeId::BOOLEAN)
    }

    pub fn str_lit(&mut self, text: &str) -> ExprId {
        let ty = self.string_type();
        self.expr(ExprKind::Literal(Literal::Str(text.to_owned())), ty)
    }

    pub fn read(&mut self, local: LocalId) -> ExprId {
        let ty = self.program.local(local).ty;
        self.expr(ExprKind::Local(local), ty)
    }

    pub fn this(&mut self, class: ClassId) -> ExprId {
        let ty = self.class_type(class);
        self.expr(ExprKind::This, ty)
    }

    pub fn field_ref(&mut self, receiver: Option<ExprId>, field: FieldId) -> ExprId {
        let ty = self.program.field(field).ty;
        self.expr(ExprKind::Field { receiver, field }, ty)
    }

    pub fn call(&mut self, receiver: Option<ExprId>, method: MethodId, args: Vec<ExprId>) -> ExprId {
        let ty = self.program.method(method).return_type;
        self.expr(
            ExprKind::Call {
                receiver,
                method,
                args,
            },
            ty,
        )
    }

    /// Binary expression typed by the usual numeric promotion rules.
    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let (lt, rt) = (self.program.expr(left).ty, self.program.expr(right).ty);
        let ty = if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) {
            TypeId::BOOLEAN
        } else if op.is_shift() {
            promote(lt, lt)
        } else {
            promote(lt, rt)
        };
        self.expr(ExprKind::Binary { op, left, right }, ty)
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        let ty = self.program.expr(target).ty;
        self.expr(ExprKind::Assign { target, value }, ty)
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn ret(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return(value))
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        self.stmt(StmtKind::Block(stmts))
    }

    pub fn declare_local(&mut self, local: LocalId, init: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Local { local, init })
    }

    pub fn unit(&mut self, path: &str, text: &str) -> UnitId {
        let id = UnitId::from_len(self.program.units.len());
        self.program.units.push(SourceUnit {
            path: path.to_owned(),
            text: text.to_owned(),
            classes: Vec::new(),
        });
        id
    }

    /// Attach a method declaration to its owner's class declaration in
    /// `unit`, creating the class declaration on first use.
    pub fn declare(
        &mut self,
        unit: UnitId,
        method: MethodId,
        doc: Option<&str>,
        body: Option<StmtId>,
    ) {
        let span = self.next_span();
        let owner = self.program.method(method).owner;
        let decl = MethodDecl {
            method,
            doc: doc.map(str::to_owned),
            body,
            span,
        };
        let classes = &mut self.program.units[unit.index()].classes;
        if let Some(class) = classes.iter_mut().find(|c| c.class == owner) {
            class.members.push(Member::Method(decl));
        } else {
            classes.push(ClassDecl {
                class: owner,
                span,
                members: vec![Member::Method(decl)],
            });
        }
    }

    /// Read access to the program under construction.
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn finish(self) -> Program {
        self.program
    }
}

fn promote(left: TypeId, right: TypeId) -> TypeId {
    for wide in [TypeId::DOUBLE, TypeId::FLOAT, TypeId::LONG] {
        if left == wide || right == wide {
            return wide;
        }
    }
    if left == TypeId::BOOLEAN && right == TypeId::BOOLEAN {
        return TypeId::BOOLEAN;
    }
    TypeId::INT
}
