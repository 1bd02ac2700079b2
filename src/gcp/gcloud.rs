use crate::error::{AgentDeployError, Result};
use crate::permissions::IamSource;
use crate::utils::process;
use std::collections::BTreeSet;
use std::process::Command;

pub struct Gcloud;

impl Gcloud {
    /// Check if gcloud is installed
    pub fn is_installed() -> bool {
        process::command_exists("gcloud")
    }

    /// Fail early with an install hint when gcloud is missing
    pub fn ensure_installed() -> Result<()> {
        if Self::is_installed() {
            Ok(())
        } else {
            Err(AgentDeployError::GcloudNotInstalled)
        }
    }

    /// Run gcloud and capture stdout
    fn run(args: &[&str]) -> Result<String> {
        let output = Command::new("gcloud").args(args).output().map_err(|e| {
            AgentDeployError::Gcloud(format!(
                "Failed to execute {}: {}",
                process::render("gcloud", args),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentDeployError::Gcloud(format!(
                "{}: {}",
                process::render("gcloud", args),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Account gcloud is currently authenticated as
    pub fn active_account() -> Result<String> {
        let account = Self::run(&["config", "get-value", "account"])?;
        if account.is_empty() || account == "(unset)" {
            return Err(AgentDeployError::Gcloud(
                "No active account. Run 'gcloud auth login' first".to_string(),
            ));
        }
        Ok(account)
    }

    /// Project configured as gcloud default, if any
    pub fn default_project() -> Option<String> {
        Self::run(&["config", "get-value", "project"])
            .ok()
            .filter(|p| !p.is_empty() && p != "(unset)")
    }

    /// OAuth access token for REST calls
    pub fn access_token() -> Result<String> {
        let token = Self::run(&["auth", "print-access-token"])?;
        if token.is_empty() {
            return Err(AgentDeployError::Gcloud(
                "gcloud returned an empty access token".to_string(),
            ));
        }
        Ok(token)
    }

    /// Names of the APIs enabled on a project
    pub fn enabled_services(project: &str) -> Result<BTreeSet<String>> {
        let project_arg = format!("--project={}", project);
        let output = Self::run(&[
            "services",
            "list",
            "--enabled",
            &project_arg,
            "--format=value(config.name)",
        ])?;
        Ok(parse_lines(&output))
    }

    /// Roles bound to `member` in the project IAM policy
    pub fn member_roles(project: &str, member: &str) -> Result<BTreeSet<String>> {
        let filter = format!("--filter=bindings.members:{}", member);
        let output = Self::run(&[
            "projects",
            "get-iam-policy",
            project,
            "--flatten=bindings[].members",
            &filter,
            "--format=value(bindings.role)",
        ])?;
        Ok(parse_lines(&output))
    }

    /// Check if a Cloud Storage bucket exists
    pub fn bucket_exists(bucket: &str, project: &str) -> Result<bool> {
        let url = format!("gs://{}", bucket);
        let project_arg = format!("--project={}", project);
        let status = Command::new("gcloud")
            .args([
                "storage",
                "buckets",
                "describe",
                &url,
                &project_arg,
                "--format=value(name)",
            ])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map_err(|e| AgentDeployError::Gcloud(format!("Failed to describe bucket: {}", e)))?;
        Ok(status.success())
    }

    /// Create a Cloud Storage bucket
    pub fn create_bucket(bucket: &str, project: &str, location: &str) -> Result<()> {
        let url = format!("gs://{}", bucket);
        let project_arg = format!("--project={}", project);
        let location_arg = format!("--location={}", location);
        Self::run(&[
            "storage",
            "buckets",
            "create",
            &url,
            &project_arg,
            &location_arg,
            "--uniform-bucket-level-access",
        ])?;
        Ok(())
    }
}

impl IamSource for Gcloud {
    fn enabled_apis(&self, project: &str) -> Result<BTreeSet<String>> {
        Gcloud::enabled_services(project)
    }

    fn granted_roles(&self, project: &str, account: &str) -> Result<BTreeSet<String>> {
        Gcloud::member_roles(project, &member_for_account(account))
    }
}

/// IAM member string for an account email
pub fn member_for_account(account: &str) -> String {
    if account.contains(':') {
        account.to_string()
    } else if account.ends_with(".gserviceaccount.com") {
        format!("serviceAccount:{}", account)
    } else {
        format!("user:{}", account)
    }
}

fn parse_lines(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
