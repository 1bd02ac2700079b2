use crate::agents::AgentRegistry;
use crate::classifier::{classify, GlobalPrefixSet};
use crate::cli::DeployChangedCmd;
use crate::commands::deploy;
use crate::config::Config;
use crate::error::Result;
use crate::project::Project;
use crate::utils::git::{self, ChangeDetection};

pub fn execute(project: &Project, config: &Config, cmd: &DeployChangedCmd) -> Result<()> {
    let registry = AgentRegistry::from_definitions(&config.agents)?;

    if cmd.force_all {
        println!("Force deploying all agents");
        return deploy::run(project, config, &registry, &registry.ids());
    }

    let base_ref = cmd
        .base_ref
        .clone()
        .unwrap_or_else(|| config.changes.base_ref.clone());
    let detection = git::detect_changes(project.root(), &base_ref);
    let ids = select_agents(&registry, &config.global_prefixes(), &detection);

    if ids.is_empty() {
        println!("No agent changes detected since {}. Nothing to deploy.", base_ref);
        return Ok(());
    }

    println!("Agents to deploy: {}", ids.join(", "));
    deploy::run(project, config, &registry, &ids)
}

/// Agents to deploy for a change detection result, in registry order.
///
/// When changes cannot be determined every agent is selected.
pub fn select_agents(
    registry: &AgentRegistry,
    global_prefixes: &GlobalPrefixSet,
    detection: &ChangeDetection,
) -> Vec<String> {
    let paths = match detection {
        ChangeDetection::Changed(paths) => paths,
        ChangeDetection::Unavailable(reason) => {
            tracing::warn!(%reason, "could not determine changed files, deploying all agents");
            return registry.ids();
        }
    };

    let classification = classify(paths, &registry.directory_map(), global_prefixes);
    if let Some(trigger) = &classification.global_trigger {
        tracing::info!(path = %trigger, "shared code changed, deploying all agents");
    }
    for (path, agent) in &classification.matches {
        tracing::debug!(%path, %agent, "change matched");
    }

    registry
        .ids()
        .into_iter()
        .filter(|id| classification.agents.contains(id))
        .collect()
}
