//! Driver for the sieve translator.
//!
//! ```text
//! sieve -root:vm.Boot -cp:src program.json
//!        ↓
//!   cli::parse_args       (TranslateOptions)
//!        ↓
//!   driver::load_*        (Program, source text, TargetProfile)
//!        ↓
//!   driver::translate     (collect → select → generate)
//! ```
//!
//! The binary only renders diagnostics, writes the output and picks the exit
//! status; everything else lives here so it can be driven from tests.

pub mod cli;
pub mod driver;
mod tracing_setup;

pub use cli::{parse_args, Command, UsageError, USAGE};
pub use driver::{
    attach_sources, load_profile, load_program, run, translate, LoadError, TranslateOptions,
    Translation,
};
pub use tracing_setup::init_tracing;
