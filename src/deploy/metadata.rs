//! Deployment metadata file, rewritten after every run.

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Deployed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,

    pub display_name: String,

    pub status: AgentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentRecord {
    pub fn deployed(display_name: &str, resource_name: &str) -> Self {
        Self {
            resource_name: Some(resource_name.to_string()),
            display_name: display_name.to_string(),
            status: AgentStatus::Deployed,
            error: None,
        }
    }

    pub fn failed(display_name: &str, error: &str) -> Self {
        Self {
            resource_name: None,
            display_name: display_name.to_string(),
            status: AgentStatus::Failed,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentMetadata {
    pub deployment_timestamp: String,
    pub project: String,
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,

    pub agents: BTreeMap<String, AgentRecord>,
}

impl DeploymentMetadata {
    pub fn new(project: &str, location: &str, commit_sha: Option<String>) -> Self {
        Self::at(Utc::now(), project, location, commit_sha)
    }

    pub fn at(
        timestamp: DateTime<Utc>,
        project: &str,
        location: &str,
        commit_sha: Option<String>,
    ) -> Self {
        Self {
            deployment_timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            project: project.to_string(),
            location: location.to_string(),
            commit_sha,
            agents: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, agent_id: &str, record: AgentRecord) {
        self.agents.insert(agent_id.to_string(), record);
    }

    pub fn count(&self, status: AgentStatus) -> usize {
        self.agents.values().filter(|r| r.status == status).count()
    }

    /// Overwrite `path` with this record as pretty JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, format!("{}\n", json))?;
        tracing::info!(path = %path.display(), "wrote deployment metadata");
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
