//! CLI binary integration tests.
//!
//! These tests exercise the compiled `careline` binary to verify that
//! top-level command routing, help text, and error handling work as expected.

use careline_integration_tests::careline_cmd;
use tempfile::TempDir;

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = careline_cmd(dir.path())
        .arg("version")
        .output()
        .expect("failed to run careline");
    assert!(output.status.success(), "version command should succeed");
    assert!(
        stdout(&output).starts_with("careline "),
        "version output should start with 'careline', got: {}",
        stdout(&output)
    );
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = careline_cmd(dir.path())
        .arg("--help")
        .output()
        .expect("failed to run careline");
    assert!(output.status.success(), "--help should succeed");
    let text = stdout(&output);
    for command in ["chat", "match", "config", "version"] {
        assert!(text.contains(command), "help should mention '{}': {}", command, text);
    }
}

#[test]
fn test_cli_unknown_command() {
    let dir = TempDir::new().unwrap();
    let output = careline_cmd(dir.path())
        .arg("nonexistent-command")
        .output()
        .expect("failed to run careline");
    assert!(
        !output.status.success(),
        "unknown command should return non-zero exit code"
    );
}

#[test]
fn test_chat_requires_groq_key() {
    let dir = TempDir::new().unwrap();
    let output = careline_cmd(dir.path())
        .arg("chat")
        .output()
        .expect("failed to run careline chat");
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("GROQ_API_KEY"),
        "error should name the missing variable, got: {}",
        stderr(&output)
    );
}

#[test]
fn test_match_requires_hf_token() {
    let dir = TempDir::new().unwrap();
    let output = careline_cmd(dir.path())
        .env("GROQ_API_KEY", "gsk_unused")
        .arg("match")
        .output()
        .expect("failed to run careline match");
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("HF_TOKEN"),
        "error should name the missing variable, got: {}",
        stderr(&output)
    );
}

#[test]
fn test_blank_credential_counts_as_missing() {
    let dir = TempDir::new().unwrap();
    let output = careline_cmd(dir.path())
        .env("HF_TOKEN", "   ")
        .arg("match")
        .output()
        .expect("failed to run careline match");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("HF_TOKEN"));
}

#[test]
fn test_blank_dotenv_credential_is_missing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "HF_TOKEN=\"\"\n").unwrap();
    let output = careline_cmd(dir.path())
        .arg("match")
        .output()
        .expect("failed to run careline match");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("HF_TOKEN"));
}

#[test]
fn test_config_path_and_show() {
    let dir = TempDir::new().unwrap();

    let output = careline_cmd(dir.path())
        .args(["config", "path"])
        .output()
        .expect("failed to run careline config path");
    assert!(output.status.success());
    assert!(stdout(&output).trim().ends_with("careline.json5"));

    let output = careline_cmd(dir.path())
        .args(["config", "show"])
        .output()
        .expect("failed to run careline config show");
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["chat"]["model"], "llama3-8b-8192");
    assert_eq!(shown["embeddings"]["dimension"], 384);
}

#[test]
fn test_config_env_override() {
    let dir = TempDir::new().unwrap();
    let output = careline_cmd(dir.path())
        .env("CARELINE_CHAT_MODEL", "llama3-70b-8192")
        .args(["config", "get", "chat.model"])
        .output()
        .expect("failed to run careline config get");
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "\"llama3-70b-8192\"");
}

#[test]
fn test_blank_query_rejected_before_embedding() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("careline.json5"),
        r#"{ embeddings: { base_url: "http://127.0.0.1:1" } }"#,
    )
    .unwrap();

    let output = careline_cmd(dir.path())
        .env("HF_TOKEN", "hf_unused")
        .args(["match", "-q", "  "])
        .output()
        .expect("failed to run careline match");
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Invalid input"), "got: {}", err);
    assert!(!err.contains("retrying"), "no request should be attempted: {}", err);
}

#[test]
fn test_invalid_config_reported_by_using_commands() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("careline.json5"),
        "{ chat: { temperature: 5.0 } }",
    )
    .unwrap();

    // Commands that never read the bad value still run
    for args in [&["version"][..], &["config", "path"][..]] {
        let output = careline_cmd(dir.path())
            .args(args)
            .output()
            .expect("failed to run careline");
        assert!(output.status.success(), "{:?}: {}", args, stderr(&output));
    }

    let output = careline_cmd(dir.path())
        .args(["config", "validate"])
        .output()
        .expect("failed to run careline config validate");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("chat.temperature"));

    let output = careline_cmd(dir.path())
        .env("GROQ_API_KEY", "gsk_unused")
        .arg("chat")
        .output()
        .expect("failed to run careline chat");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("chat.temperature"));
}
