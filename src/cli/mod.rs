use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod flags;
pub use flags::DeployFlags;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration files
    Validate {
        /// Optional path to a specific config file to validate
        file: Option<PathBuf>,
    },

    /// Show effective configuration after merging all sources
    Show,
}

#[derive(Parser, Debug)]
#[command(name = "agent-deploy")]
#[command(about = "Deploy ADK agents to Vertex AI Agent Engine", long_about = None)]
#[command(version = env!("AGENT_DEPLOY_VERSION"))]
#[command(after_help = "\
EXAMPLES:
  agent-deploy check-permissions my-project      Check APIs and IAM roles
  agent-deploy deploy                            Deploy every configured agent
  agent-deploy deploy --agents chat_agent        Deploy a single agent
  agent-deploy deploy-changed --base-ref main    Deploy agents changed since main
  agent-deploy affected app/chat_agent/agent.py  Show which agents a change touches

For details about a specific command, use:
  agent-deploy <command> --help")]
pub struct Cli {
    /// Show debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that a project has the APIs and IAM roles needed to deploy
    #[command(long_about = "Check that a project has the APIs and IAM roles needed to deploy.\n\n\
        Lists the enabled services and the roles granted to the account, then\n\
        marks each requirement as present, missing, or unknown when the query\n\
        itself failed. Holding roles/owner satisfies every role requirement.")]
    CheckPermissions(CheckPermissionsCmd),

    /// Deploy agents to Agent Engine (all configured agents by default)
    Deploy(DeployCmd),

    /// Deploy only the agents affected by changes since a git ref
    DeployChanged(DeployChangedCmd),

    /// Print the agents affected by a set of changed files
    Affected(AffectedCmd),

    /// List configured agents
    Agents,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print version information
    Version,
}

#[derive(Parser, Debug)]
pub struct CheckPermissionsCmd {
    /// GCP project id to check
    pub project_id: String,

    /// Account to check (defaults to the active gcloud account)
    #[arg(long)]
    pub account: Option<String>,

    /// Exit with an error when a requirement is missing or unknown
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct DeployCmd {
    #[command(flatten)]
    pub deploy: DeployFlags,

    /// Agents to deploy, comma separated or repeated (default: all)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub agents: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct DeployChangedCmd {
    #[command(flatten)]
    pub deploy: DeployFlags,

    /// Git ref to diff against (default: HEAD~1)
    #[arg(long = "base-ref")]
    pub base_ref: Option<String>,

    /// Deploy every agent regardless of changes
    #[arg(long = "force-all")]
    pub force_all: bool,
}

#[derive(Parser, Debug)]
pub struct AffectedCmd {
    /// Git ref to diff against when no paths are given (default: HEAD~1)
    #[arg(long = "base-ref")]
    pub base_ref: Option<String>,

    /// Print the reason for each selected agent
    #[arg(long)]
    pub explain: bool,

    /// Changed paths; read from git when omitted
    pub paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_permissions_requires_project() {
        let result = Cli::try_parse_from(["agent-deploy", "check-permissions"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_deploy_agents_comma_separated() {
        let cli = Cli::try_parse_from([
            "agent-deploy",
            "deploy",
            "--agents",
            "chat_agent,alert_agent",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Deploy(cmd) => {
                assert_eq!(cmd.agents, vec!["chat_agent", "alert_agent"]);
                assert!(cmd.deploy.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["agent-deploy", "agents", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_deploy_changed_flags() {
        let cli = Cli::try_parse_from([
            "agent-deploy",
            "deploy-changed",
            "--base-ref",
            "origin/main",
            "--force-all",
        ])
        .unwrap();
        match cli.command {
            Commands::DeployChanged(cmd) => {
                assert_eq!(cmd.base_ref.as_deref(), Some("origin/main"));
                assert!(cmd.force_all);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
