use crate::error::{AgentDeployError, Result};
use crate::utils::shell;
use std::path::Path;
use std::process::{Command, Output};

/// Execute a command and capture its trimmed stdout, failing on non-zero exit
pub fn execute_with_output(command: &str, args: &[&str]) -> Result<String> {
    run(Command::new(command).args(args), command, args)
}

/// Same as [`execute_with_output`], running in `dir`
pub fn execute_in(dir: &Path, command: &str, args: &[&str]) -> Result<String> {
    run(Command::new(command).current_dir(dir).args(args), command, args)
}

/// Run in `dir` and return raw stdout bytes (for archives and other binary output)
pub fn execute_bytes_in(dir: &Path, command: &str, args: &[&str]) -> Result<Vec<u8>> {
    let output = spawn(Command::new(command).current_dir(dir).args(args), command, args)?;
    Ok(output.stdout)
}

fn run(cmd: &mut Command, command: &str, args: &[&str]) -> Result<String> {
    let output = spawn(cmd, command, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn spawn(cmd: &mut Command, command: &str, args: &[&str]) -> Result<Output> {
    tracing::debug!(command = %render(command, args), "running");

    let output = cmd.output().map_err(|e| {
        AgentDeployError::CommandFailed(format!("Failed to execute {}: {}", command, e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AgentDeployError::CommandFailed(format!(
            "{} failed: {}",
            render(command, args),
            stderr.trim()
        )));
    }

    Ok(output)
}

/// Check if a command exists in PATH
pub fn command_exists(command: &str) -> bool {
    which::which(command).is_ok()
}

/// Printable form of a command line
pub fn render(command: &str, args: &[&str]) -> String {
    let mut all = vec![command];
    all.extend_from_slice(args);
    shell::join_args(&all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_with_output_captures_stdout() {
        let out = execute_with_output("echo", &["hello"]).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn test_execute_with_output_failure() {
        let err = execute_with_output("false", &[]).unwrap_err();
        assert!(matches!(err, AgentDeployError::CommandFailed(_)));
    }

    #[test]
    fn test_execute_missing_binary() {
        let err = execute_with_output("definitely-not-a-real-binary-xyz", &[]).unwrap_err();
        assert!(err.to_string().contains("Failed to execute"));
    }

    #[test]
    fn test_execute_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = execute_in(dir.path(), "pwd", &[]).unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(Path::new(&out).canonicalize().unwrap(), expected);
    }

    #[test]
    fn test_execute_bytes_keeps_raw_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = execute_bytes_in(dir.path(), "printf", &["a\\nb\\n"]).unwrap();
        assert_eq!(out, b"a\nb\n");
    }

    #[test]
    fn test_render() {
        assert_eq!(
            render("gcloud", &["config", "get-value", "account"]),
            "gcloud config get-value account"
        );
    }
}
