// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Integration tests for the d3dretrace-gen binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_d3dretrace-gen"))
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn default_run_emits_d3d9_retracer() {
    bin()
        .assert()
        .success()
        .stdout(predicate::str::contains("#include \"d3d9imports.hpp\""))
        .stdout(predicate::str::contains(
            "const retrace::Entry d3dretrace::d3d9_callbacks[] = {",
        ))
        .stdout(predicate::str::contains(
            "HWND hWnd = createWindow(pPresentationParameters->BackBufferWidth, pPresentationParameters->BackBufferHeight);",
        ))
        .stdout(predicate::str::contains("if (SizeToLock == 0) {"));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let first = bin().output().unwrap();
    let second = bin().output().unwrap();
    assert!(first.status.success());
    assert!(!first.stdout.is_empty());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn logs_stay_off_stdout() {
    let quiet = bin().output().unwrap();
    let verbose = bin().args(["-vv"]).env_remove("RUST_LOG").output().unwrap();
    assert!(verbose.status.success());
    assert_eq!(quiet.stdout, verbose.stdout);
    assert!(String::from_utf8_lossy(&verbose.stderr).contains("generated retracer"));
}

#[test]
fn rejects_unknown_spec_version() {
    bin()
        .args(["--spec", &fixture("bad_version.json")])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unsupported spec_version"));
}

#[test]
fn missing_spec_file_fails() {
    bin()
        .args(["--spec", &fixture("does_not_exist.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load API description"));
}

#[test]
fn external_spec_is_retraced() {
    bin()
        .args(["--spec", &fixture("factory.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("#include \"factoryimports.hpp\""))
        .stdout(predicate::str::contains("retrace_IFactory__CreateThing(trace::Call &call) {"))
        .stdout(predicate::str::contains("createWindow(p->").not());
}

#[test]
fn config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("retrace.json");
    std::fs::write(
        &config,
        r#"{ "table_name": "replay::d3d9", "window_class": "replay", "max_window_extent": 32768 }"#,
    )
    .unwrap();
    bin()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("const retrace::Entry replay::d3d9[] = {"))
        .stdout(predicate::str::contains("wc.lpszClassName = \"replay\";"))
        .stdout(predicate::str::contains("pMMI->ptMaxSize.x = 32768;"));
}

#[test]
fn malformed_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("retrace.json");
    std::fs::write(&config, "{ \"table_name\": 7 }").unwrap();
    bin()
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn config_that_would_break_the_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("retrace.json");
    for bad in [
        r#"{ "window_class": "a\"b" }"#,
        r#"{ "extra_headers": ["x\\y.hpp"] }"#,
        r#"{ "table_name": "not a name" }"#,
        r#"{ "max_window_extent": 0 }"#,
    ] {
        std::fs::write(&config, bad).unwrap();
        bin()
            .args(["--config", config.to_str().unwrap()])
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("failed to load config"))
            .stderr(predicate::str::contains("invalid "));
    }
}

#[test]
fn output_flag_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("d3dretrace_d3d9.cpp");
    bin()
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let written = std::fs::read(&out).unwrap();
    let piped = bin().output().unwrap().stdout;
    assert_eq!(written, piped);
}
