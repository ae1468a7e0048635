//! Loading of the program model and profile, and the translation pipeline.
//!
//! Loading is the only place that touches the file system. [`translate`]
//! works on values, so tests and other front ends can run it directly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sieve_codegen::{generate, TargetProfile};
use sieve_collect::{Collector, Selection};
use sieve_diagnostic::{Diagnostic, DiagnosticQueue, ErrorGuaranteed, SourceMap};
use sieve_ir::Program;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Everything one `sieve` invocation needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// The program model (JSON).
    pub input: PathBuf,
    /// Source roots searched for units whose text the program leaves empty.
    pub class_path: Vec<PathBuf>,
    /// Root filters, matched as substrings of qualified type names.
    pub roots: Vec<String>,
    /// Output file; stdout when absent.
    pub output: Option<PathBuf>,
    /// JSON profile replacing the built-in one.
    pub profile: Option<PathBuf>,
    pub line_markers: bool,
    pub omit_runtime_checks: bool,
}

/// Failure to load an input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{}` is not a valid program model: {source}", path.display())]
    Program {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{}` is not a consistent program model: {reason}", path.display())]
    Inconsistent { path: PathBuf, reason: String },

    #[error("`{}` is not a valid target profile: {source}", path.display())]
    Profile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{}` sets an empty directive marker", path.display())]
    EmptyMarker { path: PathBuf },
}

/// Result of one translation.
#[derive(Debug)]
pub struct Translation {
    /// The C translation unit, or proof that an error was reported.
    pub output: Result<String, ErrorGuaranteed>,
    /// Every diagnostic of the run, in report order.
    pub diagnostics: Vec<Diagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })
}

/// Read, parse and validate a program model.
pub fn load_program(path: &Path) -> Result<Program, LoadError> {
    let text = read(path)?;
    let program: Program = serde_json::from_str(&text).map_err(|source| LoadError::Program {
        path: path.to_owned(),
        source,
    })?;
    program
        .validate()
        .map_err(|reason| LoadError::Inconsistent {
            path: path.to_owned(),
            reason,
        })?;
    debug!(
        units = program.units.len(),
        classes = program.classes.len(),
        methods = program.methods.len(),
        "program model loaded"
    );
    Ok(program)
}

/// Fill in the text of units the front end left empty.
///
/// Each unit path is resolved against the class-path roots in order; the
/// first existing file wins. A unit found nowhere keeps its empty text and
/// every position in it reports line 1.
pub fn attach_sources(program: &mut Program, class_path: &[PathBuf]) -> Result<(), LoadError> {
    for unit in &mut program.units {
        if !unit.text.is_empty() {
            continue;
        }
        let found = class_path
            .iter()
            .map(|root| root.join(&unit.path))
            .find(|candidate| candidate.is_file());
        match found {
            Some(path) => {
                unit.text = read(&path)?;
                debug!(unit = %unit.path, path = %path.display(), "source attached");
            }
            None if class_path.is_empty() => {}
            None => warn!(unit = %unit.path, "source not found on the class path"),
        }
    }
    Ok(())
}

/// The profile from `path`, or the built-in one.
pub fn load_profile(path: Option<&Path>) -> Result<TargetProfile, LoadError> {
    let Some(path) = path else {
        return Ok(TargetProfile::default());
    };
    let text = read(path)?;
    let profile: TargetProfile =
        serde_json::from_str(&text).map_err(|source| LoadError::Profile {
            path: path.to_owned(),
            source,
        })?;
    if profile.marker.trim().is_empty() {
        return Err(LoadError::EmptyMarker {
            path: path.to_owned(),
        });
    }
    Ok(profile)
}

/// Collect, select and generate.
///
/// Every phase runs even after errors, so one run reports everything it can;
/// the output is withheld as soon as any error was reported.
#[tracing::instrument(level = "info", skip_all, fields(roots = ?roots))]
pub fn translate(program: &Program, profile: &TargetProfile, roots: &[String]) -> Translation {
    let sources = SourceMap::build(program);
    let mut queue = DiagnosticQueue::new();

    let registry = Collector::new(program, &sources, &profile.marker).collect(roots, &mut queue);
    let selection = Selection::compute(program, &registry, &sources, &mut queue);
    let output = generate(program, &registry, &selection, &sources, profile, &mut queue);

    let error_count = queue.error_count();
    let warning_count = queue.warning_count();
    info!(
        selected = selection.len(),
        errors = error_count,
        warnings = warning_count,
        "translation finished"
    );
    Translation {
        output,
        diagnostics: queue.flush(),
        error_count,
        warning_count,
    }
}

/// Load everything `options` names and translate it.
pub fn run(options: &TranslateOptions) -> Result<Translation, LoadError> {
    let mut program = load_program(&options.input)?;
    attach_sources(&mut program, &options.class_path)?;
    let mut profile = load_profile(options.profile.as_deref())?;
    profile.line_markers |= options.line_markers;
    profile.omit_runtime_checks |= options.omit_runtime_checks;
    Ok(translate(&program, &profile, &options.roots))
}
