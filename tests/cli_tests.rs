use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command running in an empty directory with no user config or cloud env
fn isolated(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agent-deploy"));
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("GOOGLE_CLOUD_PROJECT")
        .env_remove("GOOGLE_CLOUD_LOCATION")
        .env_remove("REGION")
        .env_remove("NUM_WORKERS")
        .env_remove("COMMIT_SHA")
        .env_remove("AGENT_DEPLOY_LOG")
        .env_remove("CLOUDSDK_CONFIG")
        .env_remove("CLOUDSDK_CORE_PROJECT");
    cmd
}

#[test]
fn test_help_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agent-deploy"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Deploy ADK agents to Vertex AI Agent Engine",
        ))
        .stdout(predicate::str::contains("check-permissions"))
        .stdout(predicate::str::contains("deploy-changed"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agent-deploy"));
    cmd.arg("version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("agent-deploy "));
}

#[test]
fn test_check_permissions_requires_project_id() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .arg("check-permissions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PROJECT_ID"));
}

#[test]
fn test_check_permissions_rejects_blank_project_id() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["check-permissions", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PROJECT_ID must not be empty"));
}

#[test]
fn test_affected_with_explicit_paths() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args([
            "affected",
            "app/chat_agent/agent.py",
            "app/alert_agent/tools.py",
            "README.md",
        ])
        .assert()
        .success()
        .stdout("alert_agent\nchat_agent\n");
}

#[test]
fn test_affected_global_change() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["affected", "app/utils/gcs.py"])
        .assert()
        .success()
        .stdout("alert_agent\nchat_agent\nsummarize_agent\n");
}

#[test]
fn test_affected_explain_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["affected", "--explain", "docs/index.md"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("docs/index.md (ignored)"));
}

#[test]
fn test_affected_uses_configured_agents() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".agent-deploy.toml"),
        r#"
[changes]
global_prefixes = ["shared/"]

[[agents]]
id = "triage"
display_name = "Triage Agent"
directory = "agents/triage/"
"#,
    )
    .unwrap();

    isolated(&dir)
        .args(["affected", "agents/triage/agent.py", "app/chat_agent/agent.py"])
        .assert()
        .success()
        .stdout("triage\n");
}

#[test]
fn test_agents_lists_builtin() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .arg("agents")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in"))
        .stdout(predicate::str::contains("summarize_agent"))
        .stdout(predicate::str::contains("app.chat_agent.agent:root_agent"));
}

#[test]
fn test_deploy_dry_run() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args([
            "deploy",
            "--project",
            "acme",
            "--agents",
            "chat_agent",
            "--set-env-vars",
            "LOG_LEVEL=debug",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("project acme (us-central1)"))
        .stdout(predicate::str::contains("chat_agent"))
        .stdout(predicate::str::contains("LOG_LEVEL=debug"))
        .stdout(predicate::str::contains("acme-agents-staging"))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!dir
        .path()
        .join("deployment_metadata_multiple_agents.json")
        .exists());
}

#[test]
fn test_deploy_unknown_agent() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["deploy", "--project", "acme", "--agents", "nope", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown agent: nope"));
}

#[test]
fn test_deploy_requires_project() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["deploy", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--project"));
}

#[test]
fn test_deploy_changed_without_git_deploys_all() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["deploy-changed", "--project", "acme", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summarize_agent"))
        .stdout(predicate::str::contains("chat_agent"))
        .stdout(predicate::str::contains("alert_agent"));
}

#[test]
fn test_config_validate_ok() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_validate_invalid_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".agent-deploy.toml"), "[gcp\n").unwrap();

    isolated(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn test_config_show_reads_env() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .env("GOOGLE_CLOUD_PROJECT", "env-project")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project: env-project"))
        .stdout(predicate::str::contains("env-project-agents"));
}
