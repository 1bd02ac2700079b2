use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentDeployError {
    #[error("gcloud not installed. Install from https://cloud.google.com/sdk/docs/install")]
    GcloudNotInstalled,

    #[error("gcloud command failed: {0}")]
    Gcloud(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Agent Engine error: {0}")]
    Engine(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to package agent sources: {0}")]
    Packaging(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Requirements file not readable: {0}")]
    RequirementsFile(PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Project detection failed: {0}")]
    ProjectDetection(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("{0} permission requirement(s) missing or unknown")]
    PermissionsIncomplete(usize),

    #[error("Deployment failed for all {0} agent(s)")]
    AllDeploymentsFailed(usize),
}

pub type Result<T> = std::result::Result<T, AgentDeployError>;
