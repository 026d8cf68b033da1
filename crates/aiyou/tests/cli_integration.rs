//! CLI integration tests for the aiyou command-line interface.
//!
//! Every command runs in an empty temporary working directory with its own
//! config directory, so no `.env`, `aiyou.toml` or user settings leak in.
//! The end-to-end tests talk to a wiremock server instead of the real service.

use std::path::Path;
use std::process::Output;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for the aiyou binary, isolated from the user's environment.
fn aiyou(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("aiyou").unwrap();
    cmd.current_dir(dir)
        .env("AIYOU_CONFIG_DIR", dir.join("config"))
        .env_remove("AIYOU_EMAIL")
        .env_remove("AIYOU_PASSWORD")
        .env_remove("AIYOU_ASSISTANT_ID")
        .env_remove("AIYOU_BASE_URL");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands_and_flags() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("interactive"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("version"))
        .stdout(predicate::str::contains("--assistant"))
        .stdout(predicate::str::contains("--instruction-file"))
        .stdout(predicate::str::contains("--show-assistant-info"));
}

#[test]
fn test_version_subcommand() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("aiyou version "));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aiyou"));
}

#[test]
fn test_interactive_help_shows_thread_option() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path())
        .args(["interactive", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--thread"))
        .stdout(predicate::str::contains("--transcript-dir"));
}

#[test]
fn test_missing_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path()).assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Startup Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_chat_without_input_fails() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path())
        .args(["-a", "asst_1", "chat"])
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input provided"));
}

#[test]
fn test_chat_without_credentials_fails() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path())
        .args(["-a", "asst_1", "chat", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AIYOU_EMAIL"));
}

#[test]
fn test_chat_without_assistant_fails() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path())
        .env("AIYOU_EMAIL", "me@example.com")
        .env("AIYOU_PASSWORD", "hunter2")
        .args(["chat", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("assistant"));
}

#[test]
fn test_missing_instruction_file_fails() {
    let dir = TempDir::new().unwrap();
    aiyou(dir.path())
        .args(["-a", "asst_1", "-f", "missing.txt", "chat", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
}

// ─────────────────────────────────────────────────────────────────────────────
// End-to-end against a mock service
// ─────────────────────────────────────────────────────────────────────────────

async fn mount_service(server: &MockServer, expected_content: &str) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"email": "me@example.com", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok"})))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/threads"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "thread_1"})))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/threads/thread_1/messages"))
        .and(body_json(json!({"role": "user", "content": expected_content})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_1"})))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/threads/thread_1/runs"))
        .and(body_json(json!({"assistantId": "asst_dotenv"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "run_1"})))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/threads/thread_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1",
            "status": "completed",
            "response": "Bonjour!"
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn write_project_files(dir: &Path) {
    std::fs::write(
        dir.join(".env"),
        "AIYOU_EMAIL=me@example.com\nAIYOU_PASSWORD=\"hunter2\"\nAIYOU_ASSISTANT_ID=asst_dotenv\n",
    )
    .unwrap();
    std::fs::write(dir.join("aiyou.toml"), "[poll]\ndelay_secs = 0\n").unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_silent_chat_prints_only_the_response() {
    let server = MockServer::start().await;
    mount_service(&server, "Hello there\n\nAdditional instruction: Be brief").await;

    let dir = TempDir::new().unwrap();
    write_project_files(dir.path());

    let mut cmd = aiyou(dir.path());
    cmd.args(["--base-url", &format!("{}/api", server.uri())])
        .args(["-s", "-i", "Be brief", "chat", "Hello", "there"]);

    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Bonjour!\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_piped_chat_with_timestamped_output() {
    let server = MockServer::start().await;
    mount_service(&server, "from stdin").await;

    let dir = TempDir::new().unwrap();
    write_project_files(dir.path());

    let mut cmd = aiyou(dir.path());
    cmd.env("AIYOU_BASE_URL", format!("{}/api", server.uri()))
        .arg("chat")
        .write_stdin("  from stdin\n");

    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with('['), "stdout: {stdout}");
    assert!(stdout.trim_end().ends_with("] AI.YOU: Bonjour!"), "stdout: {stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_project_files(dir.path());

    let mut cmd = aiyou(dir.path());
    cmd.args(["--base-url", &format!("{}/api", server.uri())])
        .args(["chat", "hello"]);

    let output = run_blocking(cmd).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("401"), "stderr: {stderr}");
    assert_eq!(stderr.matches("Logging in to AI.YOU").count(), 1, "stderr: {stderr}");
}
