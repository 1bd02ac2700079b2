use crate::error::{AgentDeployError, Result};
use crate::utils::git;
use std::path::{Path, PathBuf};

/// The repository holding the agents to deploy
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Detect the current project
    /// Priority: git repository root, then current directory
    pub fn detect() -> Result<Self> {
        if let Ok(Some(root)) = git::get_git_root() {
            return Ok(Self { root });
        }

        let root = std::env::current_dir().map_err(|e| {
            AgentDeployError::ProjectDetection(format!("Failed to get current directory: {}", e))
        })?;
        Ok(Self { root })
    }

    /// Project rooted at an explicit directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a project-relative path
    pub fn path(&self, relative: &str) -> PathBuf {
        let relative = relative.trim_start_matches("./");
        self.root.join(relative)
    }
}
