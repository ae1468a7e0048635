//! Command-line surface of `sieve`.
//!
//! Options use the `-name:value` form; everything that does not start with
//! `-` is the input program.

use std::path::PathBuf;

use thiserror::Error;

use crate::driver::TranslateOptions;

/// Usage text printed for `-help` and after usage errors.
pub const USAGE: &str = "\
Usage: sieve [options] <program.json>

Translates the methods reachable from the selected roots of a resolved
program into a single C translation unit.

Options:
  -cp:<paths>          Source roots used to load source text (path-separator separated)
  -root:<substring>    Select the root methods of types whose qualified name contains
                       <substring> (repeatable, at least one required)
  -o:<file>            Output file (default: stdout)
  -profile:<file>      JSON target profile overriding the built-in one
  -laf                 Emit #line markers before every definition
  -orc                 Omit runtime checks (null and bounds checks become no-ops)
  -h, -help            Print this help

Set SIEVE_LOG (e.g. SIEVE_LOG=sieve_collect=debug) to enable logging.
";

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Translate(TranslateOptions),
}

/// A command line that cannot be run.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("option `{0}` requires a value")]
    MissingValue(&'static str),

    #[error("no root methods selected (use -root:<substring>)")]
    NoRoots,

    #[error("no input program given")]
    NoInput,

    #[error("more than one input program given: `{first}` and `{second}`")]
    DuplicateInput { first: String, second: String },
}

/// Parse the arguments following the program name.
pub fn parse_args<I>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = TranslateOptions::default();
    let mut input: Option<String> = None;

    for arg in args {
        if !arg.starts_with('-') {
            if let Some(first) = input {
                return Err(UsageError::DuplicateInput { first, second: arg });
            }
            input = Some(arg);
            continue;
        }

        match arg.as_str() {
            "-h" | "-help" => return Ok(Command::Help),
            "-laf" => options.line_markers = true,
            "-orc" => options.omit_runtime_checks = true,
            _ => {
                if let Some(paths) = arg.strip_prefix("-cp:") {
                    options
                        .class_path
                        .extend(std::env::split_paths(value(paths, "-cp")?));
                } else if let Some(filter) = arg.strip_prefix("-root:") {
                    options.roots.push(value(filter, "-root")?.to_owned());
                } else if let Some(path) = arg.strip_prefix("-o:") {
                    options.output = Some(PathBuf::from(value(path, "-o")?));
                } else if let Some(path) = arg.strip_prefix("-profile:") {
                    options.profile = Some(PathBuf::from(value(path, "-profile")?));
                } else {
                    return Err(UsageError::UnknownOption(arg));
                }
            }
        }
    }

    let Some(input) = input else {
        return Err(UsageError::NoInput);
    };
    if options.roots.is_empty() {
        return Err(UsageError::NoRoots);
    }
    options.input = PathBuf::from(input);
    Ok(Command::Translate(options))
}

fn value<'a>(text: &'a str, option: &'static str) -> Result<&'a str, UsageError> {
    if text.is_empty() {
        Err(UsageError::MissingValue(option))
    } else {
        Ok(text)
    }
}
