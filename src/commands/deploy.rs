use crate::agents::AgentRegistry;
use crate::config::Config;
use crate::deploy::{describe_plan, AgentStatus, Deployer, DeploySettings};
use crate::engine::{TokenSource, VertexAgentEngine};
use crate::error::{AgentDeployError, Result};
use crate::gcp::storage::ensure_buckets;
use crate::gcp::Gcloud;
use crate::packaging::TarPackager;
use crate::project::Project;
use crate::utils::git;
use std::time::Duration;

pub fn execute(project: &Project, config: &Config, agent_ids: &[String]) -> Result<()> {
    let registry = AgentRegistry::from_definitions(&config.agents)?;
    let ids = if agent_ids.is_empty() {
        registry.ids()
    } else {
        agent_ids.to_vec()
    };
    run(project, config, &registry, &ids)
}

/// Deploy `ids` (already selected) and write the metadata file
pub fn run(project: &Project, config: &Config, registry: &AgentRegistry, ids: &[String]) -> Result<()> {
    let agents = registry.resolve(ids)?;

    let mut config = config.clone();
    if config.gcp.project.is_none() && Gcloud::is_installed() {
        config.gcp.project = Gcloud::default_project();
        if let Some(project_id) = &config.gcp.project {
            tracing::info!(project = %project_id, "using gcloud default project");
        }
    }
    let config = &config;

    let mut settings = DeploySettings::from_config(config)?;
    if settings.commit_sha.is_none() {
        settings.commit_sha = git::head_commit(project.root());
    }

    if config.dry_run {
        print!("{}", describe_plan(&agents, &settings));
        println!(
            "Metadata: {}",
            project.path(&config.deploy.metadata_file).display()
        );
        println!("\nDry run: nothing was deployed.");
        return Ok(());
    }

    Gcloud::ensure_installed()?;
    TarPackager::ensure_installed()?;

    println!(
        "Deploying {} agent(s) to {} ({})",
        agents.len(),
        settings.project,
        settings.location
    );
    ensure_buckets(&settings.buckets, &settings.project, &settings.location)?;

    let engine = VertexAgentEngine::new(&settings.project, &settings.location, TokenSource::Gcloud)?
        .with_polling(
            Duration::from_secs(config.deploy.poll_interval_secs),
            Duration::from_secs(config.deploy.operation_timeout_secs),
        );
    let packager = TarPackager::new(project.root(), &config.deploy.requirements_file);
    let deployer = Deployer::new(registry, &engine, &packager, settings);

    let metadata = deployer.deploy_all(ids)?;
    let metadata_path = project.path(&config.deploy.metadata_file);
    metadata.write(&metadata_path)?;

    let deployed = metadata.count(AgentStatus::Deployed);
    let failed = metadata.count(AgentStatus::Failed);
    println!(
        "\nDeployment summary: {} deployed, {} failed",
        deployed, failed
    );
    println!("Metadata written to {}", metadata_path.display());

    if deployed == 0 && failed > 0 {
        return Err(AgentDeployError::AllDeploymentsFailed(failed));
    }
    Ok(())
}
