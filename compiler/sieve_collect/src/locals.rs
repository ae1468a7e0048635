//! Local-declaration scanner.
//!
//! C89-style output declares every local at the top of its block, so the
//! lowering engine needs to know, for each block, which locals are declared
//! directly inside it. Declarations in a `for` initializer are scoped to the
//! loop itself, which is lowered inside a block of its own. Declarations in
//! `switch` arms belong to the nearest enclosing block.

use rustc_hash::FxHashMap;
use sieve_ir::ast::StmtKind;
use sieve_ir::visitor::{walk_stmt, Visitor};
use sieve_ir::{ExprId, LocalId, Program, StmtId};

/// Locals declared directly in each block (or `for` loop) of one method
/// body, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockLocals {
    by_block: FxHashMap<StmtId, Vec<LocalId>>,
}

impl BlockLocals {
    /// Scan a method body.
    pub fn scan(program: &Program, body: StmtId) -> Self {
        let mut scanner = Scanner {
            open: Vec::new(),
            found: BlockLocals::default(),
        };
        scanner.visit_stmt(program, body);
        scanner.found
    }

    /// Locals to declare at the top of `block` (empty for unknown blocks).
    pub fn declared_in(&self, block: StmtId) -> &[LocalId] {
        self.by_block.get(&block).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_block.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Scanner {
    open: Vec<StmtId>,
    found: BlockLocals,
}

impl Visitor for Scanner {
    fn visit_stmt(&mut self, program: &Program, id: StmtId) {
        match &program.stmt(id).kind {
            StmtKind::Block(_) => {
                self.open.push(id);
                self.found.by_block.entry(id).or_default();
                walk_stmt(self, program, id);
                self.open.pop();
            }
            StmtKind::For { .. } => {
                self.open.push(id);
                walk_stmt(self, program, id);
                self.open.pop();
            }
            StmtKind::Local { local, .. } => {
                if let Some(&block) = self.open.last() {
                    self.found.by_block.entry(block).or_default().push(*local);
                }
                walk_stmt(self, program, id);
            }
            // The body of a local class belongs to another method.
            StmtKind::LocalClass(_) => {}
            _ => walk_stmt(self, program, id),
        }
    }

    // Expressions never contain statements in the accepted subset.
    fn visit_expr(&mut self, _program: &Program, _id: ExprId) {}
}
