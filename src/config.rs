use crate::agents::AgentDefinition;
use crate::cli::DeployFlags;
use crate::error::{AgentDeployError, Result};
use crate::utils::env::parse_env_list;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".agent-deploy.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gcp: GcpConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub changes: ChangesConfig,

    #[serde(default)]
    pub permissions: PermissionsConfig,

    #[serde(default)]
    pub agents: Vec<AgentDefinition>,

    /// Commit identifier injected by CI (not stored in config file)
    #[serde(skip)]
    pub commit_sha: Option<String>,

    /// Verbose mode (not stored in config file)
    #[serde(skip)]
    pub verbose: bool,

    /// Print the plan without calling the cloud (not stored in config file)
    #[serde(skip)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpConfig {
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default = "default_location")]
    pub location: String,

    /// Prefix for staging and artifact buckets (defaults to `<project>-agents`)
    #[serde(default)]
    pub staging_bucket_prefix: Option<String>,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            project: None,
            location: default_location(),
            staging_bucket_prefix: None,
        }
    }
}

fn default_location() -> String {
    "us-central1".to_string()
}

impl GcpConfig {
    /// Project id, or a descriptive error when none was configured
    pub fn require_project(&self) -> Result<&str> {
        self.project.as_deref().filter(|p| !p.is_empty()).ok_or_else(|| {
            AgentDeployError::MissingInput(
                "GCP project id. Pass --project, set GOOGLE_CLOUD_PROJECT, or add [gcp] project to .agent-deploy.toml"
                    .to_string(),
            )
        })
    }

    pub fn bucket_prefix(&self, project: &str) -> String {
        self.staging_bucket_prefix
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| format!("{}-agents", project))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_requirements_file")]
    pub requirements_file: String,

    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Pause between two consecutive agent deployments
    #[serde(default = "default_delay_between_secs")]
    pub delay_between_secs: u64,

    #[serde(default = "default_num_workers")]
    pub num_workers: u32,

    #[serde(default = "default_python_version")]
    pub python_version: String,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,

    /// Extra environment variables set on every deployed agent
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            requirements_file: default_requirements_file(),
            metadata_file: default_metadata_file(),
            delay_between_secs: default_delay_between_secs(),
            num_workers: default_num_workers(),
            python_version: default_python_version(),
            poll_interval_secs: default_poll_interval_secs(),
            operation_timeout_secs: default_operation_timeout_secs(),
            env: BTreeMap::new(),
        }
    }
}

fn default_requirements_file() -> String {
    ".requirements.txt".to_string()
}

fn default_metadata_file() -> String {
    "deployment_metadata_multiple_agents.json".to_string()
}

fn default_delay_between_secs() -> u64 {
    10
}

fn default_num_workers() -> u32 {
    1
}

fn default_python_version() -> String {
    "3.12".to_string()
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_operation_timeout_secs() -> u64 {
    1800
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangesConfig {
    #[serde(default = "default_base_ref")]
    pub base_ref: String,

    #[serde(default = "default_global_prefixes")]
    pub global_prefixes: Vec<String>,
}

impl Default for ChangesConfig {
    fn default() -> Self {
        Self {
            base_ref: default_base_ref(),
            global_prefixes: default_global_prefixes(),
        }
    }
}

fn default_base_ref() -> String {
    "HEAD~1".to_string()
}

fn default_global_prefixes() -> Vec<String> {
    vec![
        "app/utils/".to_string(),
        "deployment/".to_string(),
        "pyproject.toml".to_string(),
        ".requirements.txt".to_string(),
        CONFIG_FILE_NAME.to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsConfig {
    #[serde(default = "default_required_apis")]
    pub required_apis: Vec<String>,

    #[serde(default = "default_required_roles")]
    pub required_roles: Vec<String>,

    /// Role -> roles it implies; `"*"` means every role
    #[serde(default = "default_implications")]
    pub implications: BTreeMap<String, Vec<String>>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            required_apis: default_required_apis(),
            required_roles: default_required_roles(),
            implications: default_implications(),
        }
    }
}

fn default_required_apis() -> Vec<String> {
    [
        "aiplatform.googleapis.com",
        "storage.googleapis.com",
        "cloudbuild.googleapis.com",
        "logging.googleapis.com",
        "cloudtrace.googleapis.com",
        "cloudresourcemanager.googleapis.com",
        "iam.googleapis.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_required_roles() -> Vec<String> {
    [
        "roles/aiplatform.user",
        "roles/storage.admin",
        "roles/logging.logWriter",
        "roles/cloudtrace.agent",
        "roles/serviceusage.serviceUsageConsumer",
        "roles/iam.serviceAccountUser",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_implications() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([("roles/owner".to_string(), vec!["*".to_string()])])
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_deploy_overrides)
    /// 2. Environment variables
    /// 3. Project config (.agent-deploy.toml in project root)
    /// 4. Global config (~/.agent-deploy.toml)
    /// 5. Built-in defaults
    pub fn load(project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = home_dir() {
            let global_config = home.join(CONFIG_FILE_NAME);
            if global_config.exists() {
                config = config.merge(Self::from_file(&global_config)?);
            }
        }

        let project_config = project_root.join(CONFIG_FILE_NAME);
        if project_config.exists() {
            config = config.merge(Self::from_file(&project_config)?);
        }

        config = config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(mut self, other: Self) -> Self {
        // GCP
        if other.gcp.project.is_some() {
            self.gcp.project = other.gcp.project;
        }
        if other.gcp.location != default_location() {
            self.gcp.location = other.gcp.location;
        }
        if other.gcp.staging_bucket_prefix.is_some() {
            self.gcp.staging_bucket_prefix = other.gcp.staging_bucket_prefix;
        }

        // Deploy
        if other.deploy.requirements_file != default_requirements_file() {
            self.deploy.requirements_file = other.deploy.requirements_file;
        }
        if other.deploy.metadata_file != default_metadata_file() {
            self.deploy.metadata_file = other.deploy.metadata_file;
        }
        if other.deploy.delay_between_secs != default_delay_between_secs() {
            self.deploy.delay_between_secs = other.deploy.delay_between_secs;
        }
        if other.deploy.num_workers != default_num_workers() {
            self.deploy.num_workers = other.deploy.num_workers;
        }
        if other.deploy.python_version != default_python_version() {
            self.deploy.python_version = other.deploy.python_version;
        }
        if other.deploy.poll_interval_secs != default_poll_interval_secs() {
            self.deploy.poll_interval_secs = other.deploy.poll_interval_secs;
        }
        if other.deploy.operation_timeout_secs != default_operation_timeout_secs() {
            self.deploy.operation_timeout_secs = other.deploy.operation_timeout_secs;
        }
        self.deploy.env.extend(other.deploy.env);

        // Changes
        if other.changes.base_ref != default_base_ref() {
            self.changes.base_ref = other.changes.base_ref;
        }
        if other.changes.global_prefixes != default_global_prefixes() {
            self.changes.global_prefixes = other.changes.global_prefixes;
        }

        // Permissions (replace lists when customized, accumulate implications)
        if other.permissions.required_apis != default_required_apis() {
            self.permissions.required_apis = other.permissions.required_apis;
        }
        if other.permissions.required_roles != default_required_roles() {
            self.permissions.required_roles = other.permissions.required_roles;
        }
        self.permissions
            .implications
            .extend(other.permissions.implications);

        // Agents (replace as a whole)
        if !other.agents.is_empty() {
            self.agents = other.agents;
        }

        self
    }

    /// Apply environment variable overrides
    fn merge_env(mut self) -> Self {
        if let Some(project) = non_empty_env("GOOGLE_CLOUD_PROJECT") {
            self.gcp.project = Some(project);
        }

        if let Some(location) =
            non_empty_env("GOOGLE_CLOUD_LOCATION").or_else(|| non_empty_env("REGION"))
        {
            self.gcp.location = location;
        }

        if let Some(workers) = non_empty_env("NUM_WORKERS") {
            if let Ok(workers) = workers.parse::<u32>() {
                self.deploy.num_workers = workers;
            }
        }

        if let Some(flag) = non_empty_env("GOOGLE_GENAI_USE_VERTEXAI") {
            self.deploy
                .env
                .insert("GOOGLE_GENAI_USE_VERTEXAI".to_string(), flag);
        }

        if let Some(sha) = non_empty_env("COMMIT_SHA") {
            self.commit_sha = Some(sha);
        }

        self
    }

    /// Reject configurations that cannot drive a deployment
    pub fn validate(&self) -> Result<()> {
        crate::agents::AgentRegistry::from_definitions(&self.agents)?;

        if self.deploy.poll_interval_secs == 0 {
            return Err(AgentDeployError::InvalidConfig(
                "deploy.poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.gcp.location.trim().is_empty() {
            return Err(AgentDeployError::InvalidConfig(
                "gcp.location cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply deploy command flags (highest precedence)
    pub fn with_deploy_overrides(mut self, flags: &DeployFlags, verbose: bool) -> Result<Self> {
        self.verbose = verbose;
        self.dry_run = flags.dry_run;

        if let Some(project) = &flags.project {
            self.gcp.project = Some(project.clone());
        }
        if let Some(location) = &flags.location {
            self.gcp.location = location.clone();
        }
        if let Some(prefix) = &flags.staging_bucket_prefix {
            self.gcp.staging_bucket_prefix = Some(prefix.clone());
        }
        if let Some(requirements) = &flags.requirements_file {
            self.deploy.requirements_file = requirements.to_string_lossy().to_string();
        }
        if let Some(metadata) = &flags.metadata_file {
            self.deploy.metadata_file = metadata.to_string_lossy().to_string();
        }
        if let Some(env_list) = &flags.set_env_vars {
            self.deploy.env.extend(parse_env_list(env_list)?);
        }

        Ok(self)
    }

    /// Environment variables set on every deployed agent
    pub fn agent_env_vars(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("NUM_WORKERS".to_string(), self.deploy.num_workers.to_string());
        if let Some(sha) = &self.commit_sha {
            vars.insert("COMMIT_SHA".to_string(), sha.clone());
        }
        vars.extend(self.deploy.env.clone());
        vars
    }

    pub fn global_prefixes(&self) -> crate::classifier::GlobalPrefixSet {
        self.changes.global_prefixes.iter().cloned().collect()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get the home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
