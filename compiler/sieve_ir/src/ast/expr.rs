//! Expression nodes.

use serde::{Deserialize, Serialize};

use super::{BinaryOp, UnaryOp};
use crate::{ClassId, ExprId, FieldId, LocalId, MethodId, Span, TypeId};

/// Literal values as written in source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// UTF-16 code unit.
    Char(u16),
    Bool(bool),
    Str(String),
    Null,
}

/// Expression node. `ty` is the resolved static type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: TypeId,
    #[serde(default)]
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    /// Reference to a parameter or block local.
    Local(LocalId),
    This,
    /// Field access. `receiver` is `None` for static fields and for instance
    /// fields reached through the implicit `this`.
    Field {
        receiver: Option<ExprId>,
        field: FieldId,
    },
    /// `array.length`
    ArrayLength(ExprId),
    Index {
        array: ExprId,
        index: ExprId,
    },
    /// Method invocation. `receiver` is `None` for static calls and calls on
    /// the implicit `this`.
    Call {
        receiver: Option<ExprId>,
        method: MethodId,
        args: Vec<ExprId>,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Assign {
        target: ExprId,
        value: ExprId,
    },
    /// `target op= value`
    CompoundAssign {
        op: BinaryOp,
        target: ExprId,
        value: ExprId,
    },
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Cast {
        target: TypeId,
        expr: ExprId,
    },
    Paren(ExprId),
    InstanceOf {
        expr: ExprId,
        target: TypeId,
    },
    NewObject {
        class: ClassId,
        args: Vec<ExprId>,
    },
    NewArray {
        element: TypeId,
        dims: Vec<ExprId>,
    },
    /// `new T() { ... }`
    AnonymousClass(ClassId),
    /// Explicit generic type application such as `List<T>` in expression
    /// position or `obj.<T>m()`.
    TypeApply(ExprId),
}
