//! Sieve translator CLI.
//!
//! Translates the reachable part of a restricted-subset program into one C
//! translation unit.

use std::io::{IsTerminal, Write};
use std::path::Path;

use sieve_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use sievec::{init_tracing, parse_args, run, Command, USAGE};

fn main() {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprint!("{USAGE}");
            std::process::exit(1);
        }
    };
    let options = match command {
        Command::Help => {
            print!("{USAGE}");
            return;
        }
        Command::Translate(options) => options,
    };

    init_tracing();

    let translation = match run(&options) {
        Ok(translation) => translation,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let stderr = std::io::stderr();
    let is_tty = stderr.is_terminal();
    let mut emitter = TerminalEmitter::with_color_mode(stderr, ColorMode::Auto, is_tty);
    emitter.emit_all(&translation.diagnostics);
    emitter.emit_summary(translation.error_count, translation.warning_count);
    emitter.flush();

    // Nothing is written once any error was reported.
    let Ok(text) = translation.output else {
        std::process::exit(1);
    };
    if let Err(err) = write_output(options.output.as_deref(), &text) {
        eprintln!("error: cannot write output: {err}");
        std::process::exit(1);
    }
}

fn write_output(path: Option<&Path>, text: &str) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, text),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()
        }
    }
}
