use crate::error::{AgentDeployError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of asking git which files changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeDetection {
    /// Paths relative to the repository root
    Changed(Vec<String>),

    /// git is missing or the diff could not be computed
    Unavailable(String),
}

/// Get the root directory of the git repository
pub fn get_git_root() -> Result<Option<PathBuf>> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| AgentDeployError::Git(format!("Failed to run git: {}", e)))?;

    if !output.status.success() {
        return Ok(None);
    }

    let root_dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let root_path = PathBuf::from(root_dir);

    if root_path.is_dir() {
        Ok(Some(root_path.canonicalize()?))
    } else {
        Ok(None)
    }
}

/// Files changed between `base_ref` and HEAD (`git diff --name-only <base> HEAD`)
pub fn changed_files(repo_root: &Path, base_ref: &str) -> Result<Vec<String>> {
    let output = Command::new("git")
        .current_dir(repo_root)
        .args(["diff", "--name-only", base_ref, "HEAD"])
        .output()
        .map_err(|e| AgentDeployError::Git(format!("Failed to run git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AgentDeployError::Git(format!(
            "git diff against {} failed: {}",
            base_ref,
            stderr.trim()
        )));
    }

    Ok(parse_name_only(&String::from_utf8_lossy(&output.stdout)))
}

/// Like [`changed_files`], folding failures into [`ChangeDetection::Unavailable`]
pub fn detect_changes(repo_root: &Path, base_ref: &str) -> ChangeDetection {
    match changed_files(repo_root, base_ref) {
        Ok(files) => ChangeDetection::Changed(files),
        Err(e) => ChangeDetection::Unavailable(e.to_string()),
    }
}

/// Current HEAD commit, if any
pub fn head_commit(repo_root: &Path) -> Option<String> {
    let output = Command::new("git")
        .current_dir(repo_root)
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}

fn parse_name_only(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .current_dir(dir)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    fn init_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["config", "user.email", "test@example.com"]);
        git(dir.path(), &["config", "user.name", "Test"]);
        git(dir.path(), &["config", "commit.gpgsign", "false"]);
        dir
    }

    fn commit_file(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-q", "-m", rel]);
    }

    #[test]
    fn test_parse_name_only() {
        let files = parse_name_only("app/chat_agent/agent.py\n\nREADME.md\n");
        assert_eq!(files, vec!["app/chat_agent/agent.py", "README.md"]);
    }

    #[test]
    fn test_parse_name_only_empty() {
        assert!(parse_name_only("").is_empty());
        assert!(parse_name_only("\n").is_empty());
    }

    #[test]
    fn test_changed_files_between_commits() {
        let repo = init_repo();
        commit_file(repo.path(), "README.md", "one");
        commit_file(repo.path(), "app/chat_agent/agent.py", "two");

        let files = changed_files(repo.path(), "HEAD~1").unwrap();
        assert_eq!(files, vec!["app/chat_agent/agent.py"]);
    }

    #[test]
    fn test_detect_changes_bad_ref_is_unavailable() {
        let repo = init_repo();
        commit_file(repo.path(), "README.md", "one");

        // Only one commit: HEAD~1 does not exist
        match detect_changes(repo.path(), "HEAD~1") {
            ChangeDetection::Unavailable(reason) => assert!(reason.contains("HEAD~1")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_head_commit() {
        let repo = init_repo();
        commit_file(repo.path(), "README.md", "one");
        let sha = head_commit(repo.path()).unwrap();
        assert_eq!(sha.len(), 40);
    }
}
