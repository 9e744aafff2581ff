use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// 임시 설정 파일을 사용하는 askshell 명령
fn askshell(config_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("askshell").unwrap();
    cmd.env("ASKSHELL_CONFIG", config_path)
        .env_remove("ASKSHELL_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("askshell").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI shell assistant"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("explain"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("askshell").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand() {
    let mut cmd = Command::cargo_bin("askshell").unwrap();
    cmd.assert().failure().stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_config_set_get_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    askshell(&path)
        .args(["config", "set", "serverUrl", "https://assist.example.com"])
        .assert()
        .success();

    askshell(&path)
        .args(["config", "get", "server_url"])
        .assert()
        .success()
        .stdout("https://assist.example.com\n");

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("server_url = \"https://assist.example.com\""));
}

#[test]
fn test_config_list_masks_secrets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    askshell(&path)
        .args(["config", "set", "apiKey", "sk-live-0123456789"])
        .assert()
        .success();

    askshell(&path)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiKey = ****6789"))
        .stdout(predicate::str::contains("sk-live").not())
        .stdout(predicate::str::contains("provider = server"));
}

#[test]
fn test_config_unknown_key() {
    let dir = TempDir::new().unwrap();
    askshell(&dir.path().join("config.toml"))
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key 'colour'"));
}

#[test]
fn test_config_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    askshell(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_providers_list() {
    let dir = TempDir::new().unwrap();
    askshell(&dir.path().join("config.toml"))
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("server"))
        .stdout(predicate::str::contains("ollama"))
        .stdout(predicate::str::contains("openrouter"))
        .stdout(predicate::str::contains("claude-3-5-haiku-latest"));
}

#[test]
fn test_missing_api_key_fails_before_network() {
    let dir = TempDir::new().unwrap();
    askshell(&dir.path().join("config.toml"))
        .env_remove("OPENAI_API_KEY")
        .args(["--provider", "openai", "--no-copy", "explain", "ls", "-la"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[openai"))
        .stderr(predicate::str::contains("MissingCredential"))
        .stderr(predicate::str::contains("apiKey"));
}

#[test]
fn test_ollama_without_model() {
    let dir = TempDir::new().unwrap();
    askshell(&dir.path().join("config.toml"))
        .args(["-p", "ollama", "--no-copy", "generate", "list", "large", "files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[ollama] MissingModel"));
}

#[test]
fn test_unknown_provider_falls_back_to_server() {
    let dir = TempDir::new().unwrap();
    askshell(&dir.path().join("config.toml"))
        .args(["-p", "skynet", "--no-copy", "explain", "ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[server] MissingCredential"))
        .stderr(predicate::str::contains("jwt"));
}
