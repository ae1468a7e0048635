//! Resolved abstract syntax tree.
//!
//! Nodes live in flat arenas inside [`Program`](crate::Program) and refer to
//! children through [`ExprId`](crate::ExprId)/[`StmtId`](crate::StmtId).
//! Both node families are closed enums; every lowering phase matches them
//! exhaustively, including the constructs the translator rejects.

mod decl;
mod expr;
mod operators;
mod stmt;

pub use decl::{ClassDecl, Member, MethodDecl, SourceUnit};
pub use expr::{Expr, ExprKind, Literal};
pub use operators::{
    BinaryOp, UnaryOp, PREC_ASSIGN, PREC_CONDITIONAL, PREC_POSTFIX, PREC_PREFIX, PREC_STATEMENT,
    PREC_TOP,
};
pub use stmt::{Stmt, StmtKind, SwitchCase};
