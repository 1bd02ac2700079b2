#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use agent_deploy::cli::{Cli, Commands};
use agent_deploy::commands;
use agent_deploy::config::Config;
use agent_deploy::logging::init_logging;
use agent_deploy::project::Project;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Commands that need neither project nor config
    if let Commands::Version = &cli.command {
        commands::version::execute()?;
        return Ok(());
    }

    let project = Project::detect()?;

    // Config commands load (and report on) configuration themselves
    if let Commands::Config { command } = &cli.command {
        commands::config::execute(&project, command)?;
        return Ok(());
    }

    let mut config = Config::load(project.root())?;
    config.verbose = cli.verbose;

    match &cli.command {
        Commands::CheckPermissions(cmd) => {
            commands::check_permissions::execute(&config, cmd)?;
        }
        Commands::Deploy(cmd) => {
            let config = config.with_deploy_overrides(&cmd.deploy, cli.verbose)?;
            commands::deploy::execute(&project, &config, &cmd.agents)?;
        }
        Commands::DeployChanged(cmd) => {
            let config = config.with_deploy_overrides(&cmd.deploy, cli.verbose)?;
            commands::deploy_changed::execute(&project, &config, cmd)?;
        }
        Commands::Affected(cmd) => {
            commands::affected::execute(&project, &config, cmd)?;
        }
        Commands::Agents => {
            commands::agents::execute(&config)?;
        }
        Commands::Version | Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}
