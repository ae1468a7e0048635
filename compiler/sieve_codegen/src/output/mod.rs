//! Assembly of the translation unit.
//!
//! Layout of the generated file:
//!
//! 1. banner
//! 2. forward declarations of every emitted function, in a sorted order
//! 3. macros from `macro` directives
//! 4. the builtin catalogue
//! 5. definitions, in reachability discovery order
//! 6. literal tables
//!
//! Lowering errors are reported per method and translation continues, so a
//! single run reports every inconvertible method. Output is only returned
//! when no error at all was reported.

use sieve_collect::{BodyOverride, Registry, Selection};
use sieve_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed, SourceMap};
use sieve_ir::{MethodId, Program};
use tracing::{debug, info};

use crate::buffer::RenderStack;
use crate::builtins::Builtins;
use crate::ctypes::CTypeMapper;
use crate::literals::{emit_tables, LiteralPool};
use crate::lower::{prototype, LowerError, Lowered, Lowerer};
use crate::{Mangler, TargetProfile};

const BANNER: &str = "/* **** GENERATED FILE -- DO NOT EDIT **** */";

/// Generate the C translation of the selected methods.
#[tracing::instrument(level = "debug", skip_all, fields(methods = selection.len()))]
pub fn generate(
    program: &Program,
    registry: &Registry,
    selection: &Selection,
    sources: &SourceMap<'_>,
    profile: &TargetProfile,
    queue: &mut DiagnosticQueue,
) -> Result<String, ErrorGuaranteed> {
    let types = CTypeMapper::new(program, profile);
    let mut mangler = Mangler::new(program, profile);
    for &root in registry.roots() {
        let Some(pm) = registry.get(root) else {
            continue;
        };
        let Some(name) = pm.directives.root_name() else {
            continue;
        };
        if !mangler.export(root, name) {
            let span = pm.decl.span;
            queue.push(
                Diagnostic::error(ErrorCode::E0004)
                    .with_message(format!(
                        "`{}` exports `{name}`, which another root already exports",
                        program.method_display(root)
                    ))
                    .with_label_at(sources.locate(pm.unit, span), span, "second export here"),
            );
        }
    }

    // Names are assigned in declaration order, independent of discovery.
    let declaration_order = declaration_order(program, selection);
    for &method in &declaration_order {
        mangler.function_name(method);
    }

    let mut pool = LiteralPool::new();
    let mut macros = Vec::new();
    let mut definitions = Vec::new();
    for &method in selection.order() {
        let Some(pm) = registry.get(method) else {
            continue;
        };
        let lowered =
            Lowerer::new(program, registry, profile, &mut mangler, &mut pool, pm).lower();
        match lowered {
            Ok(Lowered::Macro(text)) => macros.push(text),
            Ok(Lowered::Function { doc, definition }) => {
                definitions.push((method, doc, definition));
            }
            Err(err) => {
                let diag = lowering_error(program, registry, selection, sources, method, &err);
                queue.push(diag);
            }
        }
    }

    if let Some(guar) = queue.has_errors() {
        info!(errors = queue.error_count(), "translation failed");
        return Err(guar);
    }

    let mut out = RenderStack::new();
    out.writeln(BANNER);
    out.newline();
    out.writeln("/* Forward declarations. */");
    for &method in &declaration_order {
        if is_macro(registry, method) {
            continue;
        }
        out.writeln(&prototype(program, types, &mut mangler, method));
    }
    out.writeln("Address getObjectForCStringLiteral(int key);");
    if !macros.is_empty() {
        out.newline();
        for text in &macros {
            out.writeln(text);
        }
    }

    Builtins::emit(&mut out, profile);

    for (method, doc, definition) in &definitions {
        out.newline();
        out.write(doc);
        // The marker names the line of the signature that follows it.
        if profile.line_markers {
            if let Some(pm) = registry.get(*method) {
                let line = sources.line(pm.unit, pm.decl.span.start);
                out.writeln(&format!("#line {line} \"{}\"", sources.path(pm.unit)));
            }
        }
        out.write(definition);
    }

    emit_tables(&mut out, &pool, program, profile);
    debug!(
        definitions = definitions.len(),
        macros = macros.len(),
        literals = pool.len(),
        "translation unit assembled"
    );
    Ok(out.take_output())
}

/// Selected methods sorted by (type name, method name, parameter types).
fn declaration_order(program: &Program, selection: &Selection) -> Vec<MethodId> {
    let mut keyed: Vec<_> = selection
        .order()
        .iter()
        .map(|&method| {
            let symbol = program.method(method);
            let params: Vec<String> = program
                .param_types(method)
                .map(|ty| program.type_name(ty))
                .collect();
            let class = program.class(symbol.owner).name.as_str();
            ((class, symbol.name.as_str(), params, method), method)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, method)| method).collect()
}

fn is_macro(registry: &Registry, method: MethodId) -> bool {
    registry.get(method).is_some_and(|pm| {
        matches!(pm.directives.body_override(), Some(BodyOverride::Macro(_)))
    })
}

fn lowering_error(
    program: &Program,
    registry: &Registry,
    selection: &Selection,
    sources: &SourceMap<'_>,
    method: MethodId,
    err: &LowerError,
) -> Diagnostic {
    let mut diag = Diagnostic::error(err.code()).with_message(err.to_string());
    let mut line = None;
    if let Some(pm) = registry.get(method) {
        let span = err.span();
        diag = diag.with_label_at(sources.locate(pm.unit, span), span, "in this method");
        line = Some(sources.line(pm.unit, span.start));
    }
    diag.with_notes(selection.call_chain(program, registry, sources, method, line))
}
