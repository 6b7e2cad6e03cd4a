use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn steps_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn stepdag() -> Command {
    let mut cmd = Command::cargo_bin("stepdag").unwrap();
    cmd.env_remove("STEPDAG_SORT_FALLBACK")
        .env_remove("STEPDAG_ID_PREFIX")
        .env_remove("STEPDAG_MAX_SLUG_LEN")
        .env_remove("STEPDAG_PRUNE_SELF_LOOPS");
    cmd
}

const DIAMOND: &str = r#"[
    {"sequence_number": 1, "action": "read", "description": "schema"},
    {"sequence_number": 2, "action": "write", "description": "models", "dependency_text": "Depends on: step_read_schema"},
    {"sequence_number": 3, "action": "write", "description": "migrations", "dependency_text": "Depends on: STEP_READ_SCHEMA"},
    {"sequence_number": 4, "action": "run", "description": "tests", "dependency_text": "Dependencies: step_write_models, step_write_migrations"}
]"#;

#[test]
fn plan_prints_levels_as_text() {
    let file = steps_file(DIAMOND);
    stepdag()
        .arg("plan")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("level 0 (1 parallel)"))
        .stdout(predicate::str::contains("level 1 (2 parallel)"))
        .stdout(predicate::str::contains("[4] step_run_tests (run) tests"));
}

#[test]
fn plan_prints_json() {
    let file = steps_file(DIAMOND);
    let output = stepdag()
        .args(["plan", "--format", "json"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let levels = plan["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 3);
    assert_eq!(
        levels[1]["step_ids"],
        serde_json::json!(["step_write_models", "step_write_migrations"])
    );
}

#[test]
fn plan_reads_stdin() {
    stepdag()
        .args(["plan", "-"])
        .write_stdin(DIAMOND)
        .assert()
        .success()
        .stdout(predicate::str::contains("critical path: step_read_schema"));
}

#[test]
fn cycle_fails_with_diagnostic() {
    let file = steps_file(
        r#"[
        {"sequence_number": 1, "action": "run", "description": "a", "dependency_text": "Depends on: step_run_b"},
        {"sequence_number": 2, "action": "run", "description": "b", "dependency_text": "Depends on: step_run_a"}
    ]"#,
    );
    stepdag()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular dependency"))
        .stderr(predicate::str::contains("step_run_a"));
}

#[test]
fn missing_reference_lists_valid_ids() {
    let file = steps_file(
        r#"[
        {"sequence_number": 1, "action": "read", "description": "a"},
        {"sequence_number": 2, "action": "write", "description": "b", "dependency_text": "Depends on: step_nonexistent"}
    ]"#,
    );
    stepdag()
        .arg("plan")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("step_nonexistent"))
        .stderr(predicate::str::contains("valid step ids: step_read_a, step_write_b"));
}

#[test]
fn empty_input_is_rejected() {
    let file = steps_file("[]");
    stepdag()
        .arg("plan")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no steps were extracted"));
}

#[test]
fn validate_reports_pruned_self_reference() {
    let file = steps_file(
        r#"[{"sequence_number": 1, "action": "delete", "description": "cache", "dependency_text": "Depends on: step_delete_cache"}]"#,
    );
    stepdag()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("valid: 1 steps"))
        .stdout(predicate::str::contains("depended on itself"));
}

#[test]
fn invalid_config_exits_with_code_two() {
    let steps = steps_file(DIAMOND);
    let config = steps_file(r#"{"max_slug_len": 0}"#);
    stepdag()
        .arg("--config")
        .arg(config.path())
        .arg("plan")
        .arg(steps.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_slug_len"));
}

#[test]
fn malformed_step_document_is_not_a_configuration_error() {
    let file = steps_file(r#"[{"sequence_number": 1, "action": "deploy", "description": "x"}]"#);
    stepdag()
        .arg("plan")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JSON error: could not parse steps from"))
        .stderr(predicate::str::contains("configuration error").not());
}
