//! Collection phase of the sieve translator.
//!
//! - [`directive`]: parses per-method documentation directives
//! - [`locals`]: finds the locals each block must declare up front
//! - [`registry`]: one pass over all units producing the frozen call graph,
//!   root set and abstract-implementer map
//! - [`reachability`]: selects the emission set from the roots

pub mod directive;
pub mod locals;
pub mod reachability;
pub mod registry;

#[cfg(test)]
mod test_helpers;

pub use directive::{BodyOverride, DirectiveError, DirectiveKey, DirectiveSet, DEFAULT_MARKER};
pub use locals::BlockLocals;
pub use reachability::{Edge, Selection};
pub use registry::{CallSite, Collector, ProcessedMethod, Registry};
