//! Diagnostic accumulation and the run-wide error counter.
//!
//! Every phase pushes into one queue. The driver consults
//! [`DiagnosticQueue::has_errors`] after each phase; any recorded error means
//! the generated output is discarded.

use crate::{Diagnostic, ErrorGuaranteed, Severity};

#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic of any severity.
    pub fn push(&mut self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note => {}
        }
        self.diagnostics.push(diag);
    }

    /// Record an error and obtain proof of it.
    ///
    /// A diagnostic built as a warning is promoted to an error.
    pub fn emit_error(&mut self, mut diag: Diagnostic) -> ErrorGuaranteed {
        diag.severity = Severity::Error;
        self.push(diag);
        ErrorGuaranteed::new()
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.push(diag);
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Take all diagnostics in insertion order. Counters are kept.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
