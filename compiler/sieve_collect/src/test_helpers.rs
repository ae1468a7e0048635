//! Shared program fixtures for this crate's tests.

use sieve_diagnostic::{DiagnosticQueue, ErrorCode, SourceMap};
use sieve_ir::builder::ProgramBuilder;
use sieve_ir::{ClassId, MethodId, Modifiers, Program, StmtId, TypeId, UnitId};

use crate::directive::DEFAULT_MARKER;
use crate::registry::{Collector, Registry};

/// Builder wrapper that declares methods with bodies made of calls.
pub struct Fixture {
    pub b: ProgramBuilder,
    pub unit: UnitId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut b = ProgramBuilder::new();
        let unit = b.unit("vm/Test.java", "");
        Fixture { b, unit }
    }

    /// A static `void name()` in `owner`.
    pub fn static_method(&mut self, owner: ClassId, name: &str) -> MethodId {
        self.b.method(owner, name, &[], TypeId::VOID, Modifiers::STATIC)
    }

    /// Give `caller` a body calling each of `callees` (static, no args).
    pub fn body_calling(&mut self, _caller: MethodId, callees: &[MethodId]) -> StmtId {
        let stmts = callees
            .iter()
            .map(|&callee| {
                let call = self.b.call(None, callee, vec![]);
                self.b.expr_stmt(call)
            })
            .collect();
        self.b.block(stmts)
    }

    pub fn declare(&mut self, method: MethodId, doc: Option<&str>, body: Option<StmtId>) {
        self.b.declare(self.unit, method, doc, body);
    }

    pub fn finish(self) -> Program {
        self.b.finish()
    }
}

/// Run the collection pass with the default marker.
pub fn collect(program: &Program, filters: &[&str]) -> (Registry, DiagnosticQueue) {
    let sources = SourceMap::build(program);
    let filters: Vec<String> = filters.iter().map(|f| (*f).to_owned()).collect();
    let mut queue = DiagnosticQueue::new();
    let registry = Collector::new(program, &sources, DEFAULT_MARKER).collect(&filters, &mut queue);
    (registry, queue)
}

pub fn codes(queue: &DiagnosticQueue) -> Vec<ErrorCode> {
    queue.peek().map(|d| d.code).collect()
}
