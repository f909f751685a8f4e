use std::path::PathBuf;
use std::process::Command;

fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_java-find-usages"));
    assert!(path.exists(), "Binary not found at {:?}", path);
    path
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample-project")
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn run_in_fixture(args: &[&str]) -> (bool, String, String) {
    let fixture = fixture_path();
    let mut full = vec!["--project", fixture.to_str().unwrap()];
    full.extend_from_slice(args);
    let output = run_cli(&full);
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

// ── help ──────────────────────────────────────────────────────────────

#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Expected success, got: {}", stdout);
    assert!(stdout.contains("describe"), "Help should list describe subcommand");
    assert!(stdout.contains("tokens"), "Help should list tokens subcommand");
    assert!(stdout.contains("serve"), "Help should list serve subcommand");
    assert!(stdout.contains("--project"), "Help should list --project flag");
    assert!(stdout.contains("--messages"), "Help should list --messages flag");
}

#[test]
fn test_cli_describe_help() {
    let output = run_cli(&["describe", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--file"), "describe help should list --file");
    assert!(stdout.contains("--line"), "describe help should list --line");
    assert!(stdout.contains("--json"), "describe help should list --json");
}

// ── describe ──────────────────────────────────────────────────────────

#[test]
fn test_cli_describe_method_text() {
    let (ok, stdout, stderr) = run_in_fixture(&["describe", "Baz.bar"]);

    assert!(ok, "stderr: {}", stderr);
    assert!(stdout.contains("Found 1 element(s)"), "stdout: {}", stdout);
    assert!(stdout.contains("method `bar(int) of interface Baz`"), "stdout: {}", stdout);
    assert!(
        stdout.contains("full text: bar(int):ReturnType of interface com.example.api.Baz"),
        "stdout: {}",
        stdout
    );
    assert!(stdout.contains("reference.dialogs.findUsages.method"));
}

#[test]
fn test_cli_describe_json() {
    let (ok, stdout, stderr) = run_in_fixture(&["describe", "com.example.model.Status", "--json"]);
    assert!(ok, "stderr: {}", stderr);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let first = &parsed[0];
    assert_eq!(first["kind"], "enum");
    assert_eq!(first["can_find_usages"], true);
    assert_eq!(first["help_id"], "reference.dialogs.findUsages.class");
    assert_eq!(first["descriptive_name"], "com.example.model.Status");
    assert_eq!(first["node_text"], "Status");
    assert_eq!(
        first["location"],
        "src/main/java/com/example/model/Status.java:3:13"
    );
}

#[test]
fn test_cli_describe_position() {
    let (ok, stdout, stderr) = run_in_fixture(&[
        "describe",
        "--file",
        "src/main/java/com/example/model/Account.java",
        "--line",
        "17",
        "--json",
    ]);
    assert!(ok, "stderr: {}", stderr);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed[0]["kind"], "label");
    assert_eq!(parsed[0]["descriptive_name"], "outer");
}

#[test]
fn test_cli_describe_package_directory() {
    let (ok, stdout, stderr) = run_in_fixture(&["describe", "src/main/java/com/example", "--json"]);
    assert!(ok, "stderr: {}", stderr);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed[0]["kind"], "directory");
    assert_eq!(parsed[0]["descriptive_name"], "com.example");
    let package_location = parsed[0]["package_location"].as_str().unwrap();
    assert!(
        package_location.starts_with("com.example (in ")
            && package_location.ends_with("src/main/java)"),
        "got {}",
        package_location
    );
}

#[test]
fn test_cli_describe_custom_messages() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("messages.properties");
    std::fs::write(&catalog, "java.terms.interface=Schnittstelle\n").unwrap();

    let (ok, stdout, stderr) = run_in_fixture(&[
        "--messages",
        catalog.to_str().unwrap(),
        "describe",
        "com.example.api.Baz",
    ]);
    assert!(ok, "stderr: {}", stderr);
    assert!(stdout.contains("Schnittstelle `com.example.api.Baz`"), "stdout: {}", stdout);
}

#[test]
fn test_cli_describe_missing_messages_file_fails() {
    let (ok, _, stderr) = run_in_fixture(&[
        "--messages",
        "/nonexistent/messages.properties",
        "describe",
        "Baz",
    ]);
    assert!(!ok);
    assert!(stderr.contains("message catalog"), "stderr: {}", stderr);
}

#[test]
fn test_cli_describe_not_found() {
    let (ok, stdout, _) = run_in_fixture(&["describe", "NoSuchThing"]);
    assert!(ok);
    assert!(stdout.contains("No results found."));
}

#[test]
fn test_cli_describe_requires_target() {
    let (ok, _, stderr) = run_in_fixture(&["describe"]);
    assert!(!ok);
    assert!(stderr.contains("either a symbol or --file and --line"), "stderr: {}", stderr);
}

// ── tokens ────────────────────────────────────────────────────────────

#[test]
fn test_cli_tokens_strings() {
    let (ok, stdout, stderr) = run_in_fixture(&[
        "tokens",
        "src/main/java/Main.java",
        "--context",
        "strings",
        "--json",
    ]);
    assert!(ok, "stderr: {}", stderr);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let tokens = parsed.as_array().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["kind"], "string_literal");
    assert_eq!(tokens[0]["text"], "\"hello\"");
    assert_eq!(tokens[0]["line"], 3);
}

#[test]
fn test_cli_tokens_unknown_context() {
    let (ok, _, stderr) = run_in_fixture(&[
        "tokens",
        "src/main/java/Main.java",
        "--context",
        "everywhere",
    ]);
    assert!(!ok);
    assert!(stderr.contains("unknown search context"), "stderr: {}", stderr);
}
