//! End-to-end tests: program model on disk through the driver and the
//! `sieve` binary.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use sieve_diagnostic::ErrorCode;
use sieve_ir::ast::StmtKind;
use sieve_ir::builder::ProgramBuilder;
use sieve_ir::{Modifiers, Program, TypeId};
use sievec::{run, TranslateOptions};

const UNIT: &str = "vm/Heap.java";

/// `vm.Heap.run` (root) calls `vm.Heap.answer`, which returns 42.
fn heap_program(unit_text: &str, inconvertible: bool) -> Program {
    let mut b = ProgramBuilder::new();
    let unit = b.unit(UNIT, unit_text);
    let class = b.class_with("vm.Heap", None, &[], Modifiers::FINAL);
    let run = b.method(class, "run", &[], TypeId::VOID, Modifiers::STATIC);
    let answer = b.method(class, "answer", &[], TypeId::INT, Modifiers::STATIC);

    let value = b.int(42);
    let ret = b.ret(Some(value));
    let answer_body = b.block(vec![ret]);
    b.declare(unit, answer, None, Some(answer_body));

    let call = b.call(None, answer, vec![]);
    let mut stmts = vec![b.expr_stmt(call)];
    if inconvertible {
        let lock = b.int(0);
        let body = b.block(vec![]);
        stmts.push(b.stmt(StmtKind::Synchronized { lock, body }));
    }
    let run_body = b.block(stmts);
    b.declare(unit, run, Some("Entry point.\n@tag root"), Some(run_body));
    b.finish()
}

fn write_program(dir: &Path, program: &Program) -> PathBuf {
    let path = dir.join("program.json");
    fs::write(&path, serde_json::to_string_pretty(program).unwrap()).unwrap();
    path
}

fn options(input: PathBuf) -> TranslateOptions {
    TranslateOptions {
        input,
        roots: vec!["vm.Heap".to_owned()],
        ..TranslateOptions::default()
    }
}

#[test]
fn test_translation() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_program(dir.path(), &heap_program("", false));
    let translation = run(&options(input)).unwrap();

    assert_eq!(translation.error_count, 0);
    assert!(translation.diagnostics.is_empty());
    let text = translation.output.unwrap();
    assert!(text.contains("static int Heap_answer(void);\nstatic void Heap_run(void);\n"));
    assert!(text.contains("/**\n * Entry point.\n * @tag root\n */\nstatic void Heap_run(void) {\n    Heap_answer();\n}\n"));
    assert!(text.contains("static int Heap_answer(void) {\n    return 42;\n}\n"));
    assert!(!text.contains("#line"));
}

#[test]
fn test_line_markers_use_class_path_sources() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("vm")).unwrap();
    fs::write(src.join(UNIT), "\n".repeat(256)).unwrap();

    let input = write_program(dir.path(), &heap_program("", false));
    let translation = run(&TranslateOptions {
        class_path: vec![src],
        line_markers: true,
        ..options(input)
    })
    .unwrap();
    let text = translation.output.unwrap();

    let markers: Vec<u32> = text
        .lines()
        .filter_map(|line| line.strip_prefix("#line "))
        .map(|rest| {
            let (line, path) = rest.split_once(' ').unwrap();
            assert_eq!(path, "\"vm/Heap.java\"");
            line.parse().unwrap()
        })
        .collect();
    assert_eq!(markers.len(), 2, "{text}");
    // Both declarations follow other nodes, so neither sits on the first line.
    assert!(markers.iter().all(|&line| line > 1), "{markers:?}");
}

#[test]
fn test_errors_withhold_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_program(dir.path(), &heap_program("", true));
    let translation = run(&options(input)).unwrap();

    assert!(translation.output.is_err());
    assert_eq!(translation.error_count, 1);
    let diag = &translation.diagnostics[0];
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(diag.message, "converter cannot handle synchronized statement");
}

#[test]
fn test_unmatched_root_filter() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_program(dir.path(), &heap_program("", false));
    let translation = run(&TranslateOptions {
        roots: vec!["vm.Boot".to_owned()],
        ..options(input)
    })
    .unwrap();

    assert!(translation.output.is_err());
    let codes: Vec<_> = translation.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E1003]);
}

#[test]
fn test_profile_file_changes_the_marker() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_program(dir.path(), &heap_program("", false));
    let profile = dir.path().join("profile.json");
    fs::write(&profile, r#"{ "marker": "@vm2c" }"#).unwrap();

    // `@tag root` is plain documentation under another marker.
    let translation = run(&TranslateOptions {
        profile: Some(profile),
        ..options(input)
    })
    .unwrap();
    let codes: Vec<_> = translation.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E1003]);
}

fn sieve() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sieve"))
}

#[test]
fn test_binary_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_program(dir.path(), &heap_program("", false));
    let output = dir.path().join("out.c");

    let status = sieve()
        .arg("-root:vm.Heap")
        .arg(format!("-o:{}", output.display()))
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("/* **** GENERATED FILE -- DO NOT EDIT **** */\n"));
}

#[test]
fn test_binary_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_program(dir.path(), &heap_program("", true));
    let output = dir.path().join("out.c");

    let result = sieve()
        .arg("-root:vm.Heap")
        .arg(format!("-o:{}", output.display()))
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("error [E2001]: converter cannot handle synchronized statement"), "{stderr}");
    assert!(stderr.contains("  --> vm/Heap.java:1:"), "{stderr}");
    assert!(stderr.contains("aborting due to previous error"), "{stderr}");
    assert!(!output.exists());
}

#[test]
fn test_binary_usage_errors() {
    let result = sieve().arg("program.json").output().unwrap();
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.starts_with("error: no root methods selected"), "{stderr}");
    assert!(stderr.contains("Usage: sieve [options] <program.json>"), "{stderr}");

    let result = sieve().arg("-help").output().unwrap();
    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.starts_with("Usage: sieve"));
}
