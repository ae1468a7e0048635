//! Reachability selection.
//!
//! Breadth-first walk over the frozen call graph starting at the root set.
//! Besides ordinary call sites, every abstract method with resolved
//! implementers has a synthetic edge to each implementer, since its
//! generated dispatcher calls them. The visited set is the emission set;
//! discovery order is the order definitions are emitted in.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use sieve_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, SourceMap};
use sieve_ir::{MethodId, Program};
use tracing::debug;

use crate::registry::{CallSite, Registry};

/// How a method was first reached.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Edge {
    Root,
    Call(CallSite),
    /// Reached through the dispatcher of an abstract method.
    Dispatch { from: MethodId },
}

impl Edge {
    fn source(self) -> Option<MethodId> {
        match self {
            Edge::Root => None,
            Edge::Call(site) => Some(site.caller),
            Edge::Dispatch { from } => Some(from),
        }
    }
}

/// The emission set in discovery order.
#[derive(Debug, Default)]
pub struct Selection {
    order: Vec<MethodId>,
    reached_by: FxHashMap<MethodId, Edge>,
}

impl Selection {
    /// Walk the call graph from the registry's roots.
    ///
    /// Callees without a processed declaration are reported once each; native
    /// callees are bound by the runtime library and accepted silently.
    #[tracing::instrument(level = "debug", skip_all, fields(roots = registry.roots().len()))]
    pub fn compute(
        program: &Program,
        registry: &Registry,
        sources: &SourceMap<'_>,
        queue: &mut DiagnosticQueue,
    ) -> Self {
        let mut selection = Selection::default();
        let mut worklist = VecDeque::new();
        let mut reported = FxHashSet::default();

        for &root in registry.roots() {
            if selection.visit(root, Edge::Root) {
                worklist.push_back(root);
            }
        }

        while let Some(method) = worklist.pop_front() {
            let Some(pm) = registry.get(method) else {
                continue;
            };
            for site in &pm.calls {
                if registry.contains(site.callee) {
                    if selection.visit(site.callee, Edge::Call(*site)) {
                        worklist.push_back(site.callee);
                    }
                } else if !program.method(site.callee).is_native() && reported.insert(site.callee) {
                    let diag = selection.unresolved_callee(program, registry, sources, site);
                    queue.push(diag);
                }
            }
            for &implementer in registry.implementers(method) {
                if selection.visit(implementer, Edge::Dispatch { from: method }) {
                    worklist.push_back(implementer);
                }
            }
        }

        debug!(selected = selection.order.len(), "reachability complete");
        selection
    }

    /// Mark `method` visited; false if it already was.
    fn visit(&mut self, method: MethodId, edge: Edge) -> bool {
        if self.reached_by.contains_key(&method) {
            return false;
        }
        self.reached_by.insert(method, edge);
        self.order.push(method);
        true
    }

    fn unresolved_callee(
        &self,
        program: &Program,
        registry: &Registry,
        sources: &SourceMap<'_>,
        site: &CallSite,
    ) -> Diagnostic {
        let callee = program.method(site.callee);
        let mut diag = Diagnostic::error(ErrorCode::E1002).with_message(format!(
            "no definition found for `{}` in `{}`",
            callee.name,
            program.class(callee.owner).name
        ));
        if let Some(caller) = registry.get(site.caller) {
            diag = diag.with_label_at(
                sources.locate(caller.unit, site.span),
                site.span,
                "called here",
            );
        }
        let line = registry
            .get(site.caller)
            .map(|pm| sources.line(pm.unit, site.span.start));
        diag.with_notes(self.call_chain(program, registry, sources, site.caller, line))
    }

    pub fn contains(&self, method: MethodId) -> bool {
        self.reached_by.contains_key(&method)
    }

    /// Emission set in discovery order.
    pub fn order(&self) -> &[MethodId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn reached_by(&self, method: MethodId) -> Option<Edge> {
        self.reached_by.get(&method).copied()
    }

    /// Stack-trace style frames from `method` back to its root, innermost
    /// first, e.g. `at vm.GC.mark(vm/GC.java:40)`. `line` is the position
    /// inside `method` to report; its declaration line is used otherwise.
    pub fn call_chain(
        &self,
        program: &Program,
        registry: &Registry,
        sources: &SourceMap<'_>,
        method: MethodId,
        line: Option<u32>,
    ) -> Vec<String> {
        let mut frames = Vec::new();
        let mut current = Some(method);
        // Line inside `current` of the frame being rendered.
        let mut line_in_caller = line;
        let mut seen = FxHashSet::default();
        while let Some(m) = current {
            if !seen.insert(m) {
                break;
            }
            let edge = self.reached_by(m);
            let line = match (line_in_caller, registry.get(m)) {
                (Some(line), _) => Some(line),
                (None, Some(pm)) => Some(sources.line(pm.unit, pm.decl.span.start)),
                (None, None) => None,
            };
            let path = registry.get(m).map_or("?", |pm| sources.path(pm.unit));
            let display = program.method_display(m);
            let suffix = match edge {
                Some(Edge::Dispatch { .. }) => " [dispatch]",
                Some(Edge::Root) => " [root]",
                _ => "",
            };
            frames.push(match line {
                Some(line) => format!("at {display}({path}:{line}){suffix}"),
                None => format!("at {display}({path}){suffix}"),
            });
            line_in_caller = match edge {
                Some(Edge::Call(site)) => registry
                    .get(site.caller)
                    .map(|pm| sources.line(pm.unit, site.span.start)),
                _ => None,
            };
            current = edge.and_then(Edge::source);
        }
        frames
    }
}
