//! Read-only AST traversal.
//!
//! Default `visit_*` methods call the matching `walk_*` function, which
//! visits children in source order. Override a `visit_*` method to observe a
//! node; call the `walk_*` function from the override to keep descending.
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl Visitor for CountCalls {
//!     fn visit_expr(&mut self, program: &Program, id: ExprId) {
//!         if matches!(program.expr(id).kind, ExprKind::Call { .. }) {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, program, id);
//!     }
//! }
//! ```

use crate::ast::{ExprKind, StmtKind};
use crate::{ExprId, Program, StmtId};

pub trait Visitor {
    fn visit_stmt(&mut self, program: &Program, id: StmtId) {
        walk_stmt(self, program, id);
    }

    fn visit_expr(&mut self, program: &Program, id: ExprId) {
        walk_expr(self, program, id);
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, program: &Program, id: StmtId) {
    match &program.stmt(id).kind {
        StmtKind::Block(stmts) => {
            for &stmt in stmts {
                visitor.visit_stmt(program, stmt);
            }
        }
        StmtKind::Local { init, .. } => {
            if let Some(init) = *init {
                visitor.visit_expr(program, init);
            }
        }
        StmtKind::Expr(expr) | StmtKind::Throw(expr) => visitor.visit_expr(program, *expr),
        StmtKind::Return(expr) => {
            if let Some(expr) = *expr {
                visitor.visit_expr(program, expr);
            }
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(program, *cond);
            visitor.visit_stmt(program, *then_branch);
            if let Some(else_branch) = *else_branch {
                visitor.visit_stmt(program, else_branch);
            }
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr(program, *cond);
            visitor.visit_stmt(program, *body);
        }
        StmtKind::DoWhile { body, cond } => {
            visitor.visit_stmt(program, *body);
            visitor.visit_expr(program, *cond);
        }
        StmtKind::For {
            init,
            cond,
            update,
            body,
        } => {
            for &stmt in init {
                visitor.visit_stmt(program, stmt);
            }
            if let Some(cond) = *cond {
                visitor.visit_expr(program, cond);
            }
            for &expr in update {
                visitor.visit_expr(program, expr);
            }
            visitor.visit_stmt(program, *body);
        }
        StmtKind::ForEach { iterable, body, .. } => {
            visitor.visit_expr(program, *iterable);
            visitor.visit_stmt(program, *body);
        }
        StmtKind::Switch { selector, cases } => {
            visitor.visit_expr(program, *selector);
            for case in cases {
                if let Some(label) = case.label {
                    visitor.visit_expr(program, label);
                }
                for &stmt in &case.body {
                    visitor.visit_stmt(program, stmt);
                }
            }
        }
        StmtKind::Labeled { body, .. } => visitor.visit_stmt(program, *body),
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            visitor.visit_stmt(program, *body);
            for &stmt in catches {
                visitor.visit_stmt(program, stmt);
            }
            if let Some(finally) = *finally {
                visitor.visit_stmt(program, finally);
            }
        }
        StmtKind::Synchronized { lock, body } => {
            visitor.visit_expr(program, *lock);
            visitor.visit_stmt(program, *body);
        }
        StmtKind::Assert { cond, message } => {
            visitor.visit_expr(program, *cond);
            if let Some(message) = *message {
                visitor.visit_expr(program, message);
            }
        }
        StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Empty | StmtKind::LocalClass(_) => {}
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, program: &Program, id: ExprId) {
    match &program.expr(id).kind {
        ExprKind::Literal(_)
        | ExprKind::Local(_)
        | ExprKind::This
        | ExprKind::AnonymousClass(_) => {}

        ExprKind::Field { receiver, .. } => {
            if let Some(receiver) = *receiver {
                visitor.visit_expr(program, receiver);
            }
        }
        ExprKind::ArrayLength(inner)
        | ExprKind::Paren(inner)
        | ExprKind::TypeApply(inner)
        | ExprKind::Unary { operand: inner, .. }
        | ExprKind::Cast { expr: inner, .. }
        | ExprKind::InstanceOf { expr: inner, .. } => visitor.visit_expr(program, *inner),
        ExprKind::Index { array, index } => {
            visitor.visit_expr(program, *array);
            visitor.visit_expr(program, *index);
        }
        ExprKind::Call { receiver, args, .. } => {
            if let Some(receiver) = *receiver {
                visitor.visit_expr(program, receiver);
            }
            for &arg in args {
                visitor.visit_expr(program, arg);
            }
        }
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(program, *left);
            visitor.visit_expr(program, *right);
        }
        ExprKind::Assign { target, value } | ExprKind::CompoundAssign { target, value, .. } => {
            visitor.visit_expr(program, *target);
            visitor.visit_expr(program, *value);
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            visitor.visit_expr(program, *cond);
            visitor.visit_expr(program, *then_expr);
            visitor.visit_expr(program, *else_expr);
        }
        ExprKind::NewObject { args, .. } => {
            for &arg in args {
                visitor.visit_expr(program, arg);
            }
        }
        ExprKind::NewArray { dims, .. } => {
            for &dim in dims {
                visitor.visit_expr(program, dim);
            }
        }
    }
}
