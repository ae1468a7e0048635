//! C code generation for the sieve translator.
//!
//! # Architecture
//!
//! ```text
//! Program + Registry + Selection
//!        ↓
//!     Mangler          (flat C names, forward-declaration order)
//!        ↓
//!     Lowerer          (one definition per selected method)
//!        ↓
//!   output::generate   (declarations, builtins, definitions, literal tables)
//! ```
//!
//! Every component receives the run's [`TargetProfile`] by reference; there
//! is no global state, so a driver can run several translations side by side.

mod buffer;
mod builtins;
pub mod config;
mod ctypes;
pub mod literals;
mod lower;
pub mod mangle;
pub mod output;

pub use config::{RuntimeNames, TargetProfile};
pub use literals::{LiteralKey, LiteralPool};
pub use lower::LowerError;
pub use mangle::{type_ident, Mangler};
pub use output::generate;

#[cfg(test)]
mod test_helpers;
