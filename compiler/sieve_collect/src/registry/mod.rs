//! Symbol and call-graph registry.
//!
//! One pass over every source unit records a [`ProcessedMethod`] per declared
//! method together with its outgoing [`CallSite`]s, then derives the root set
//! and the abstract-implementer map. The result is frozen into an immutable
//! [`Registry`] before reachability runs.

use rustc_hash::FxHashMap;
use sieve_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, SourceMap};
use sieve_ir::ast::{ClassDecl, ExprKind, Member, MethodDecl};
use sieve_ir::visitor::{walk_expr, Visitor};
use sieve_ir::{ExprId, MethodId, MethodKind, Program, Span, StmtId, UnitId};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::directive::{DirectiveError, DirectiveKey, DirectiveSet};
use crate::locals::BlockLocals;

/// One recorded invocation edge.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CallSite {
    pub caller: MethodId,
    pub callee: MethodId,
    /// The call expression.
    pub expr: ExprId,
    pub span: Span,
}

/// Registry record of one declared method.
#[derive(Clone, Debug)]
pub struct ProcessedMethod {
    pub method: MethodId,
    pub unit: UnitId,
    pub decl: MethodDecl,
    pub directives: DirectiveSet,
    /// Outgoing calls in source order. Empty when the body is overridden.
    pub calls: Vec<CallSite>,
    pub locals: BlockLocals,
}

impl ProcessedMethod {
    pub fn body(&self) -> Option<StmtId> {
        self.decl.body
    }
}

/// Frozen result of the collection pass.
#[derive(Debug, Default)]
pub struct Registry {
    methods: FxHashMap<MethodId, ProcessedMethod>,
    declared: Vec<MethodId>,
    roots: Vec<MethodId>,
    implementers: FxHashMap<MethodId, SmallVec<[MethodId; 4]>>,
}

impl Registry {
    pub fn get(&self, method: MethodId) -> Option<&ProcessedMethod> {
        self.methods.get(&method)
    }

    pub fn contains(&self, method: MethodId) -> bool {
        self.methods.contains_key(&method)
    }

    /// Root methods, sorted by qualified type name, method name, then id.
    pub fn roots(&self) -> &[MethodId] {
        &self.roots
    }

    /// Resolved implementers of an abstract method, in directive order.
    pub fn implementers(&self, method: MethodId) -> &[MethodId] {
        self.implementers
            .get(&method)
            .map(|list| list.as_slice())
            .unwrap_or_default()
    }

    /// Whether `method` carries an `implementers` directive.
    pub fn dispatches(&self, method: MethodId) -> bool {
        self.implementers.contains_key(&method)
    }

    /// Processed methods in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ProcessedMethod> {
        self.declared.iter().filter_map(|id| self.methods.get(id))
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

/// Runs the collection pass.
pub struct Collector<'a> {
    program: &'a Program,
    sources: &'a SourceMap<'a>,
    marker: &'a str,
}

impl<'a> Collector<'a> {
    pub fn new(program: &'a Program, sources: &'a SourceMap<'a>, marker: &'a str) -> Self {
        Collector {
            program,
            sources,
            marker,
        }
    }

    /// Collect every declared method, then derive roots and implementers.
    ///
    /// All problems are reported to `queue`; the returned registry is always
    /// usable for further reporting even when errors were recorded.
    #[tracing::instrument(level = "debug", skip_all, fields(units = self.program.units.len()))]
    pub fn collect(&self, root_filters: &[String], queue: &mut DiagnosticQueue) -> Registry {
        let mut registry = Registry::default();
        for unit in self.program.unit_ids() {
            for class in &self.program.unit(unit).classes {
                self.collect_class(unit, class, &mut registry, queue);
            }
        }
        debug!(methods = registry.len(), "collected methods");

        registry.roots = self.select_roots(&registry, root_filters);
        if registry.roots.is_empty() {
            queue.emit_error(
                Diagnostic::error(ErrorCode::E1003)
                    .with_message("no root methods found")
                    .with_note(format!("root filters: {}", root_filters.join(", ")))
                    .with_suggestion(
                        "mark entry points with a `root` directive in a type matching a filter",
                    ),
            );
        }
        self.resolve_implementers(&mut registry, queue);
        registry
    }

    fn collect_class(
        &self,
        unit: UnitId,
        class: &ClassDecl,
        registry: &mut Registry,
        queue: &mut DiagnosticQueue,
    ) {
        for member in &class.members {
            match member {
                Member::Method(decl) => self.collect_method(unit, decl, registry, queue),
                Member::Class(nested) => self.collect_class(unit, nested, registry, queue),
                Member::Field { .. } | Member::Initializer { .. } => {}
            }
        }
    }

    fn collect_method(
        &self,
        unit: UnitId,
        decl: &MethodDecl,
        registry: &mut Registry,
        queue: &mut DiagnosticQueue,
    ) {
        let method = decl.method;
        let symbol = self.program.method(method);
        if symbol.kind != MethodKind::Method {
            return;
        }

        let doc = decl.doc.as_deref().unwrap_or("");
        let mut directives = match DirectiveSet::parse(doc, self.marker) {
            Ok(directives) => directives,
            Err(err) => {
                queue.push(self.directive_diagnostic(unit, decl, &err));
                DirectiveSet::default()
            }
        };
        if directives.implementers().is_some() && !symbol.is_abstract() {
            let err = DirectiveError::Misapplied {
                key: DirectiveKey::Implementers,
                expected: "abstract methods",
            };
            queue.push(self.directive_diagnostic(unit, decl, &err));
            directives.remove(DirectiveKey::Implementers);
        }

        let calls = match decl.body {
            Some(body) if !directives.skips_body() => {
                let mut finder = CallFinder {
                    caller: method,
                    sites: Vec::new(),
                };
                finder.visit_stmt(self.program, body);
                finder.sites.sort_by_key(|site| site.span.start);
                finder.sites
            }
            _ => Vec::new(),
        };
        let locals = match decl.body {
            Some(body) if !directives.skips_body() => BlockLocals::scan(self.program, body),
            _ => BlockLocals::default(),
        };

        registry.declared.push(method);
        registry.methods.insert(
            method,
            ProcessedMethod {
                method,
                unit,
                decl: decl.clone(),
                directives,
                calls,
                locals,
            },
        );
    }

    fn directive_diagnostic(
        &self,
        unit: UnitId,
        decl: &MethodDecl,
        err: &DirectiveError,
    ) -> Diagnostic {
        Diagnostic::error(err.code())
            .with_message(format!(
                "{err} (on `{}`)",
                self.program.method_display(decl.method)
            ))
            .with_label_at(
                self.sources.locate(unit, decl.span),
                decl.span,
                "directive attached to this method",
            )
    }

    fn select_roots(&self, registry: &Registry, filters: &[String]) -> Vec<MethodId> {
        let mut roots: Vec<MethodId> = registry
            .iter()
            .filter(|pm| pm.directives.is_root())
            .filter(|pm| {
                let owner = &self.program.class(self.program.method(pm.method).owner).name;
                let matched = filters.iter().find(|f| owner.contains(f.as_str()));
                if let Some(filter) = matched {
                    debug!(
                        root = %self.program.method_display(pm.method),
                        filter = %filter,
                        "root selected"
                    );
                }
                matched.is_some()
            })
            .map(|pm| pm.method)
            .collect();
        roots.sort_by(|&a, &b| {
            let key = |m: MethodId| {
                let symbol = self.program.method(m);
                (&self.program.class(symbol.owner).name, &symbol.name, m)
            };
            key(a).cmp(&key(b))
        });
        roots.dedup();
        roots
    }

    fn resolve_implementers(&self, registry: &mut Registry, queue: &mut DiagnosticQueue) {
        let mut resolved = FxHashMap::default();
        for pm in registry.iter() {
            let Some(names) = pm.directives.implementers() else {
                continue;
            };
            let mut list = SmallVec::<[MethodId; 4]>::new();
            for name in names {
                let found = registry.iter().find(|candidate| {
                    let owner = self.program.method(candidate.method).owner;
                    self.program.class(owner).name == name
                        && self.program.overrides(candidate.method, pm.method)
                });
                if let Some(candidate) = found {
                    if !list.contains(&candidate.method) {
                        list.push(candidate.method);
                    }
                } else {
                    warn!(
                        method = %self.program.method_display(pm.method),
                        implementer = name,
                        "unresolved implementer"
                    );
                    queue.emit_error(
                        Diagnostic::error(ErrorCode::E1001)
                            .with_message(format!(
                                "cannot resolve implementer `{name}` of abstract method `{}`",
                                self.program.method_display(pm.method)
                            ))
                            .with_label_at(
                                self.sources.locate(pm.unit, pm.decl.span),
                                pm.decl.span,
                                "abstract method declared here",
                            )
                            .with_note(
                                "an implementer must be a subtype declaring a method with the same name and signature",
                            ),
                    );
                }
            }
            debug!(
                method = %self.program.method_display(pm.method),
                count = list.len(),
                "resolved implementers"
            );
            resolved.insert(pm.method, list);
        }
        registry.implementers = resolved;
    }
}

struct CallFinder {
    caller: MethodId,
    sites: Vec<CallSite>,
}

impl Visitor for CallFinder {
    fn visit_expr(&mut self, program: &Program, id: ExprId) {
        let expr = program.expr(id);
        if let ExprKind::Call { method, .. } = expr.kind {
            self.sites.push(CallSite {
                caller: self.caller,
                callee: method,
                expr: id,
                span: expr.span,
            });
        }
        walk_expr(self, program, id);
    }
}
