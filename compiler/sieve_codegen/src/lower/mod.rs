//! Lowering of one method to C.
//!
//! Expressions and statements are matched exhaustively (`expr.rs`,
//! `stmt.rs`); method-level concerns such as signatures, body overrides and
//! dispatch synthesis live in `method.rs`. Rendering writes into a
//! [`RenderStack`]; text that has to be embedded elsewhere is rendered into
//! a pushed frame and captured.
//!
//! Unsupported constructs produce a [`LowerError`] that aborts the current
//! method only; the caller reports it and moves on to the next method.

mod expr;
mod method;
mod stmt;

use sieve_collect::{ProcessedMethod, Registry};
use sieve_diagnostic::ErrorCode;
use sieve_ir::{Program, Span};
use thiserror::Error;

use crate::buffer::RenderStack;
use crate::ctypes::CTypeMapper;
use crate::{LiteralPool, Mangler, TargetProfile};

pub(crate) use method::{prototype, Lowered};

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LowerError {
    /// A construct outside the accepted subset.
    #[error("converter cannot handle {desc}")]
    Inconvertible { desc: String, span: Span },
    #[error("code directive of a non-void function does not include a return statement")]
    MissingReturn { span: Span },
}

impl LowerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LowerError::Inconvertible { .. } => ErrorCode::E2001,
            LowerError::MissingReturn { .. } => ErrorCode::E2002,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LowerError::Inconvertible { span, .. } | LowerError::MissingReturn { span } => *span,
        }
    }
}

fn reject<T>(desc: impl Into<String>, span: Span) -> Result<T, LowerError> {
    Err(LowerError::Inconvertible {
        desc: desc.into(),
        span,
    })
}

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if little is left. Deeply nested
/// expressions recurse once per level.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Lowering state for one method.
pub(crate) struct Lowerer<'a, 'r> {
    program: &'a Program,
    registry: &'a Registry,
    profile: &'a TargetProfile,
    types: CTypeMapper<'a>,
    mangler: &'r mut Mangler<'a>,
    pool: &'r mut LiteralPool,
    method: &'a ProcessedMethod,
    out: RenderStack,
}

impl<'a, 'r> Lowerer<'a, 'r> {
    pub fn new(
        program: &'a Program,
        registry: &'a Registry,
        profile: &'a TargetProfile,
        mangler: &'r mut Mangler<'a>,
        pool: &'r mut LiteralPool,
        method: &'a ProcessedMethod,
    ) -> Self {
        Lowerer {
            program,
            registry,
            profile,
            types: CTypeMapper::new(program, profile),
            mangler,
            pool,
            method,
            out: RenderStack::new(),
        }
    }

    /// Render with `f` into a fresh frame and return the text.
    fn capture(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), LowerError>,
    ) -> Result<String, LowerError> {
        self.out.push_frame();
        let result = f(self);
        let text = self.out.pop_frame();
        result.map(|()| text)
    }

    /// Open a parenthesis if an operator of precedence `own` needs one in a
    /// `context` position.
    fn open(&mut self, context: u8, own: u8) {
        if own > context {
            self.out.write("(");
        }
    }

    fn close(&mut self, context: u8, own: u8) {
        if own > context {
            self.out.write(")");
        }
    }

    fn local_name(&self, local: sieve_ir::LocalId) -> &'a str {
        self.profile.local_name(&self.program.local(local).name)
    }
}

#[cfg(test)]
mod tests;
