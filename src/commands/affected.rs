use crate::agents::AgentRegistry;
use crate::classifier::classify;
use crate::cli::AffectedCmd;
use crate::config::Config;
use crate::error::Result;
use crate::project::Project;
use crate::utils::git::{self, ChangeDetection};

/// Print one affected agent id per line
pub fn execute(project: &Project, config: &Config, cmd: &AffectedCmd) -> Result<()> {
    let registry = AgentRegistry::from_definitions(&config.agents)?;

    let paths = if cmd.paths.is_empty() {
        let base_ref = cmd
            .base_ref
            .clone()
            .unwrap_or_else(|| config.changes.base_ref.clone());
        match git::detect_changes(project.root(), &base_ref) {
            ChangeDetection::Changed(paths) => paths,
            ChangeDetection::Unavailable(reason) => {
                tracing::warn!(%reason, "could not determine changed files, reporting all agents");
                for id in registry.ids() {
                    println!("{}", id);
                }
                return Ok(());
            }
        }
    } else {
        cmd.paths.clone()
    };

    let classification = classify(&paths, &registry.directory_map(), &config.global_prefixes());

    if cmd.explain {
        if let Some(trigger) = &classification.global_trigger {
            eprintln!("{} is shared by every agent", trigger);
        }
        for (path, agent) in &classification.matches {
            eprintln!("{} -> {}", path, agent);
        }
        for path in &classification.unmatched {
            eprintln!("{} (ignored)", path);
        }
    }

    for agent in &classification.agents {
        println!("{}", agent);
    }

    Ok(())
}
