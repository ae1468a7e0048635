//! Statement nodes.

use serde::{Deserialize, Serialize};

use crate::{ClassId, ExprId, LocalId, Span, StmtId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    #[serde(default)]
    pub span: Span,
}

/// One arm of a `switch`. `label` is `None` for `default`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub label: Option<ExprId>,
    pub body: Vec<StmtId>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Block(Vec<StmtId>),
    /// Local variable declaration.
    Local {
        local: LocalId,
        init: Option<ExprId>,
    },
    Expr(ExprId),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    For {
        init: Vec<StmtId>,
        cond: Option<ExprId>,
        update: Vec<ExprId>,
        body: StmtId,
    },
    /// Enhanced `for (T x : xs)` loop.
    ForEach {
        local: LocalId,
        iterable: ExprId,
        body: StmtId,
    },
    Switch {
        selector: ExprId,
        cases: Vec<SwitchCase>,
    },
    Break(Option<String>),
    Continue(Option<String>),
    Return(Option<ExprId>),
    Throw(ExprId),
    Empty,
    Labeled {
        label: String,
        body: StmtId,
    },
    Try {
        body: StmtId,
        catches: Vec<StmtId>,
        finally: Option<StmtId>,
    },
    Synchronized {
        lock: ExprId,
        body: StmtId,
    },
    Assert {
        cond: ExprId,
        message: Option<ExprId>,
    },
    /// Class declared inside a method body.
    LocalClass(ClassId),
}
