//! Multi-agent deployment to Agent Engine.
//!
//! Each agent is packaged, turned into a reasoning engine request, and then
//! either updates the first existing engine with the same display name or
//! creates a new one. Agents are deployed one after the other; a failing
//! agent is recorded in the metadata and the run continues.

pub mod metadata;

pub use metadata::{AgentRecord, AgentStatus, DeploymentMetadata};

use crate::agents::{AgentDefinition, AgentRegistry};
use crate::config::Config;
use crate::engine::types::{
    DeploymentSpec, EnvVar, InlineSource, PythonSpec, ReasoningEngine, ReasoningEngineSpec,
    SourceCodeSpec,
};
use crate::engine::AgentEngine;
use crate::error::Result;
use crate::gcp::storage::DeploymentBuckets;
use crate::packaging::{Packager, SourcePackage};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

pub const AGENT_FRAMEWORK: &str = "google-adk";

/// Env var carrying the `gs://` staging bucket URI
pub const STAGING_BUCKET_ENV: &str = "STAGING_BUCKET";

/// Env var carrying the artifact service bucket name
pub const ARTIFACTS_BUCKET_ENV: &str = "ARTIFACTS_BUCKET";

/// Everything a deployment needs besides the agents themselves
#[derive(Debug, Clone)]
pub struct DeploySettings {
    pub project: String,
    pub location: String,
    pub python_version: String,
    pub env: BTreeMap<String, String>,
    pub delay_between: Duration,
    pub commit_sha: Option<String>,
    pub buckets: DeploymentBuckets,
}

impl DeploySettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let project = config.gcp.require_project()?.to_string();
        Ok(Self {
            buckets: DeploymentBuckets::from_prefix(&config.gcp.bucket_prefix(&project)),
            project,
            location: config.gcp.location.clone(),
            python_version: config.deploy.python_version.clone(),
            env: config.agent_env_vars(),
            delay_between: Duration::from_secs(config.deploy.delay_between_secs),
            commit_sha: config.commit_sha.clone(),
        })
    }

    /// Agent env vars plus the bucket locations.
    ///
    /// Explicitly configured values win over the derived bucket entries.
    pub fn agent_env(&self) -> BTreeMap<String, String> {
        let mut env = self.env.clone();
        env.entry(STAGING_BUCKET_ENV.to_string())
            .or_insert_with(|| self.buckets.staging_uri());
        env.entry(ARTIFACTS_BUCKET_ENV.to_string())
            .or_insert_with(|| self.buckets.artifacts.clone());
        env
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedAgent {
    pub agent_id: String,
    pub display_name: String,
    pub resource_name: String,
    pub action: DeployAction,
}

pub struct Deployer<'a> {
    registry: &'a AgentRegistry,
    engine: &'a dyn AgentEngine,
    packager: &'a dyn Packager,
    settings: DeploySettings,
}

impl<'a> Deployer<'a> {
    pub fn new(
        registry: &'a AgentRegistry,
        engine: &'a dyn AgentEngine,
        packager: &'a dyn Packager,
        settings: DeploySettings,
    ) -> Self {
        Self {
            registry,
            engine,
            packager,
            settings,
        }
    }

    /// Reasoning engine request for `agent` shipped as `package`
    pub fn build_request(&self, agent: &AgentDefinition, package: SourcePackage) -> ReasoningEngine {
        let env = self
            .settings
            .agent_env()
            .into_iter()
            .map(|(name, value)| EnvVar { name, value })
            .collect();

        ReasoningEngine {
            display_name: agent.display_name.clone(),
            description: agent.description.clone(),
            spec: Some(ReasoningEngineSpec {
                source_code_spec: Some(SourceCodeSpec {
                    inline_source: InlineSource {
                        source_archive: package.archive,
                    },
                    python_spec: PythonSpec {
                        version: self.settings.python_version.clone(),
                        entrypoint_module: agent.entrypoint_module(),
                        entrypoint_object: agent.entrypoint_object.clone(),
                        requirements_file: package.requirements_file,
                    },
                }),
                agent_framework: Some(AGENT_FRAMEWORK.to_string()),
                deployment_spec: Some(DeploymentSpec { env }),
            }),
            ..ReasoningEngine::default()
        }
    }

    /// Resource name of the first engine named `display_name`.
    ///
    /// A listing failure is logged and treated as "none found".
    fn find_existing(&self, display_name: &str) -> Option<String> {
        match self.engine.list() {
            Ok(engines) => engines
                .into_iter()
                .find(|e| e.display_name == display_name)
                .map(|e| e.name),
            Err(e) => {
                tracing::warn!(error = %e, "could not list existing agents, creating a new one");
                None
            }
        }
    }

    /// Package and deploy a single agent by id
    pub fn deploy_agent(&self, agent_id: &str) -> Result<DeployedAgent> {
        let agent = self.registry.resolve(&[agent_id.to_string()])?[0];
        self.deploy_definition(agent)
    }

    fn deploy_definition(&self, agent: &AgentDefinition) -> Result<DeployedAgent> {
        let package = self.packager.package(agent)?;
        tracing::debug!(agent = %agent.id, paths = ?package.paths, "sources packaged");
        let request = self.build_request(agent, package);

        let (deployed, action) = match self.find_existing(&agent.display_name) {
            Some(name) => {
                tracing::info!(agent = %agent.id, resource = %name, "updating existing agent");
                (self.engine.update(&name, &request)?, DeployAction::Updated)
            }
            None => {
                tracing::info!(agent = %agent.id, "creating new agent");
                (self.engine.create(&request)?, DeployAction::Created)
            }
        };

        Ok(DeployedAgent {
            agent_id: agent.id.clone(),
            display_name: agent.display_name.clone(),
            resource_name: deployed.name,
            action,
        })
    }

    /// Deploy `agent_ids` in order, recording each outcome.
    ///
    /// Unknown ids fail the whole call before anything is deployed.
    pub fn deploy_all(&self, agent_ids: &[String]) -> Result<DeploymentMetadata> {
        let agents = self.registry.resolve(agent_ids)?;
        let mut metadata = DeploymentMetadata::new(
            &self.settings.project,
            &self.settings.location,
            self.settings.commit_sha.clone(),
        );

        let total = agents.len();
        for (index, agent) in agents.into_iter().enumerate() {
            if index > 0 && !self.settings.delay_between.is_zero() {
                tracing::debug!(secs = self.settings.delay_between.as_secs(), "waiting before next agent");
                std::thread::sleep(self.settings.delay_between);
            }

            println!(
                "[{}/{}] Deploying {} ({})...",
                index + 1,
                total,
                agent.display_name,
                agent.id
            );

            match self.deploy_definition(agent) {
                Ok(deployed) => {
                    let verb = match deployed.action {
                        DeployAction::Created => "Created",
                        DeployAction::Updated => "Updated",
                    };
                    println!("  ✓ {} {}", verb, deployed.resource_name);
                    metadata.record(
                        &agent.id,
                        AgentRecord::deployed(&agent.display_name, &deployed.resource_name),
                    );
                }
                Err(e) => {
                    println!("  ✗ Failed: {}", e);
                    tracing::error!(agent = %agent.id, error = %e, "deployment failed");
                    metadata.record(
                        &agent.id,
                        AgentRecord::failed(&agent.display_name, &e.to_string()),
                    );
                }
            }
        }

        Ok(metadata)
    }
}

/// Human-readable dry-run plan; makes no cloud calls
pub fn describe_plan(agents: &[&AgentDefinition], settings: &DeploySettings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Deployment plan for project {} ({}):",
        settings.project, settings.location
    );
    for agent in agents {
        let _ = writeln!(
            out,
            "  - {} \"{}\" entrypoint {}:{} packages [{}]",
            agent.id,
            agent.display_name,
            agent.entrypoint_module(),
            agent.entrypoint_object,
            agent.extra_packages.join(", ")
        );
    }
    let _ = writeln!(out, "Buckets: {}", settings.buckets.all().join(", "));
    let env = settings.agent_env();
    if !env.is_empty() {
        let vars: Vec<String> = env
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let _ = writeln!(out, "Environment: {}", vars.join(", "));
    }
    out
}
