use crate::agents::AgentRegistry;
use crate::cli::ConfigCommands;
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::Result;
use crate::project::Project;
use std::path::{Path, PathBuf};

pub fn execute(project: &Project, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Validate { file } => match file {
            Some(path) => validate_file(path),
            None => validate(project),
        },
        ConfigCommands::Show => show(project),
    }
}

fn validate_file(path: &Path) -> Result<()> {
    println!("Validating {}...", path.display());
    let result = Config::from_file(path).and_then(|config| config.validate());
    report(result)
}

fn validate(project: &Project) -> Result<()> {
    let project_config = project.root().join(CONFIG_FILE_NAME);
    let global_config = std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from("~").join(CONFIG_FILE_NAME));

    println!("Validating configuration files...\n");

    for (label, path) in [("Global", &global_config), ("Project", &project_config)] {
        if path.exists() {
            println!("  {} config: {}", label, path.display());
        } else {
            println!(
                "  {} config: {} - not found (optional)",
                label,
                path.display()
            );
        }
    }

    println!("\nLoading and validating configuration...");
    report(Config::load(project.root()).map(|_| ()))
}

fn report(result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(project: &Project) -> Result<()> {
    let config = Config::load(project.root())?;

    println!("Effective Configuration:");
    println!("(CLI > Environment > Project config > Global config > Defaults)\n");

    println!("GCP:");
    println!(
        "  project: {}",
        config.gcp.project.as_deref().unwrap_or("(not set)")
    );
    println!("  location: {}", config.gcp.location);
    if let Some(project_id) = config.gcp.project.as_deref() {
        println!("  bucket prefix: {}", config.gcp.bucket_prefix(project_id));
    }

    println!("\nDeploy:");
    println!("  requirements_file: {}", config.deploy.requirements_file);
    println!("  metadata_file: {}", config.deploy.metadata_file);
    println!("  python_version: {}", config.deploy.python_version);
    println!("  delay_between: {}s", config.deploy.delay_between_secs);
    println!(
        "  operation timeout: {}s (poll every {}s)",
        config.deploy.operation_timeout_secs, config.deploy.poll_interval_secs
    );

    let env = config.agent_env_vars();
    if !env.is_empty() {
        println!("\nAgent Environment:");
        for (key, value) in &env {
            println!("  {}={}", key, value);
        }
    }

    println!("\nChange Detection:");
    println!("  base_ref: {}", config.changes.base_ref);
    println!("  global prefixes:");
    for prefix in &config.changes.global_prefixes {
        println!("    - {}", prefix);
    }

    println!("\nRequired APIs:");
    for api in &config.permissions.required_apis {
        println!("  - {}", api);
    }
    println!("\nRequired Roles:");
    for role in &config.permissions.required_roles {
        println!("  - {}", role);
    }

    let registry = AgentRegistry::from_definitions(&config.agents)?;
    println!("\nAgents:");
    for agent in registry.iter() {
        println!("  - {} ({})", agent.id, agent.directory_prefix());
    }

    Ok(())
}
