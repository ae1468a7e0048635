//! Diagnostic system for the sieve translator.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span resolved to `path:line:column` (where it went wrong)
//! - Notes carrying caller chains (how the method became reachable)
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! recorded. The driver only suppresses output when it holds one.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn collect() -> Result<Registry, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;
mod source_map;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity, SourceLocation};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::DiagnosticQueue;
pub use source_map::SourceMap;
