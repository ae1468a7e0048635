//! Whole-pipeline fixtures for this crate's tests.

use sieve_collect::{Collector, Selection};
use sieve_diagnostic::{DiagnosticQueue, ErrorCode, ErrorGuaranteed, SourceMap};
use sieve_ir::builder::ProgramBuilder;
use sieve_ir::{ClassId, MethodId, Modifiers, Program, StmtId, TypeId, UnitId};

use crate::{generate, TargetProfile};

/// Program under construction plus the unit its methods are declared in.
pub struct Fixture {
    pub b: ProgramBuilder,
    pub unit: UnitId,
    pub class: ClassId,
}

impl Fixture {
    /// A fixture with one final class `vm.Heap` in `vm/Heap.java`.
    pub fn new() -> Self {
        let mut b = ProgramBuilder::new();
        let unit = b.unit("vm/Heap.java", "");
        let class = b.class_with("vm.Heap", None, &[], Modifiers::FINAL);
        Fixture { b, unit, class }
    }

    /// A static method of the fixture class.
    pub fn static_method(&mut self, name: &str, params: &[(&str, TypeId)], ret: TypeId) -> MethodId {
        self.b.method(self.class, name, params, ret, Modifiers::STATIC)
    }

    pub fn declare(&mut self, method: MethodId, doc: Option<&str>, body: Option<StmtId>) {
        self.b.declare(self.unit, method, doc, body);
    }

    /// Declare `method` as a root with a body of `stmts`.
    pub fn root(&mut self, method: MethodId, stmts: Vec<StmtId>) {
        let body = self.b.block(stmts);
        self.declare(method, Some("@tag root"), Some(body));
    }

    pub fn finish(self) -> Program {
        self.b.finish()
    }
}

/// Collect, select and generate with the `vm` root filter.
pub fn translate(
    program: &Program,
    profile: &TargetProfile,
) -> (Result<String, ErrorGuaranteed>, DiagnosticQueue) {
    let sources = SourceMap::build(program);
    let mut queue = DiagnosticQueue::new();
    let registry = Collector::new(program, &sources, &profile.marker)
        .collect(&["vm".to_owned()], &mut queue);
    let selection = Selection::compute(program, &registry, &sources, &mut queue);
    let result = generate(program, &registry, &selection, &sources, profile, &mut queue);
    (result, queue)
}

/// Generated text with the default profile; panics on failure.
pub fn translate_ok(program: &Program) -> String {
    let (result, queue) = translate(program, &TargetProfile::default());
    match result {
        Ok(text) => text,
        Err(_) => panic!("translation failed: {:?}", queue.peek().collect::<Vec<_>>()),
    }
}

/// Error codes and messages of a failed translation.
pub fn translate_err(program: &Program) -> Vec<(ErrorCode, String)> {
    let (result, queue) = translate(program, &TargetProfile::default());
    assert!(result.is_err(), "translation unexpectedly succeeded");
    queue
        .peek()
        .map(|d| (d.code, d.message.clone()))
        .collect()
}

/// The definition of function `name`, from its signature to the closing
/// brace at column zero.
pub fn function<'t>(text: &'t str, name: &str) -> &'t str {
    let needle = format!(" {name}(");
    let start = text
        .match_indices(&needle)
        .map(|(pos, _)| pos)
        .find(|&pos| {
            let line_end = text[pos..].find('\n').map_or(text.len(), |n| pos + n);
            text[pos..line_end].ends_with('{')
        })
        .unwrap_or_else(|| panic!("no definition of {name} in:\n{text}"));
    let line_start = text[..start].rfind('\n').map_or(0, |n| n + 1);
    let end = text[start..]
        .find("\n}\n")
        .map_or(text.len(), |n| start + n + 3);
    &text[line_start..end]
}
