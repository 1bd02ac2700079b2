use clap::Parser;
use std::path::PathBuf;

/// Flags shared by the deploy commands.
/// These override configuration files and environment variables.
#[derive(Parser, Debug, Clone, Default)]
pub struct DeployFlags {
    /// GCP project id (defaults to GOOGLE_CLOUD_PROJECT or the config file)
    #[arg(long)]
    pub project: Option<String>,

    /// GCP region (defaults to GOOGLE_CLOUD_LOCATION, REGION, or us-central1)
    #[arg(long)]
    pub location: Option<String>,

    /// Requirements file shipped with every agent
    #[arg(long = "requirements-file")]
    pub requirements_file: Option<PathBuf>,

    /// Prefix for the staging and artifact buckets (default: <project>-agents)
    #[arg(long = "staging-bucket-prefix")]
    pub staging_bucket_prefix: Option<String>,

    /// Environment variables for the deployed agents (KEY=VALUE,KEY2=VALUE2)
    #[arg(long = "set-env-vars")]
    pub set_env_vars: Option<String>,

    /// Where to write deployment metadata
    #[arg(long = "metadata-file")]
    pub metadata_file: Option<PathBuf>,

    /// Print what would be deployed without calling Google Cloud
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        flags: DeployFlags,
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = Wrapper::parse_from([
            "test",
            "--project",
            "acme",
            "--location",
            "europe-west1",
            "--requirements-file",
            "reqs.txt",
            "--staging-bucket-prefix",
            "acme-shared",
            "--set-env-vars",
            "A=1,B=2",
            "--metadata-file",
            "out.json",
            "--dry-run",
        ]);
        let flags = parsed.flags;
        assert_eq!(flags.project.as_deref(), Some("acme"));
        assert_eq!(flags.location.as_deref(), Some("europe-west1"));
        assert_eq!(flags.requirements_file, Some(PathBuf::from("reqs.txt")));
        assert_eq!(flags.staging_bucket_prefix.as_deref(), Some("acme-shared"));
        assert_eq!(flags.set_env_vars.as_deref(), Some("A=1,B=2"));
        assert_eq!(flags.metadata_file, Some(PathBuf::from("out.json")));
        assert!(flags.dry_run);
    }

    #[test]
    fn test_defaults() {
        let flags = Wrapper::parse_from(["test"]).flags;
        assert!(flags.project.is_none());
        assert!(!flags.dry_run);
    }
}
