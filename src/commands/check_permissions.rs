use crate::cli::CheckPermissionsCmd;
use crate::config::Config;
use crate::error::{AgentDeployError, Result};
use crate::gcp::Gcloud;
use crate::permissions::{self, Requirements};

pub fn execute(config: &Config, cmd: &CheckPermissionsCmd) -> Result<()> {
    let project_id = cmd.project_id.trim();
    if project_id.is_empty() {
        return Err(AgentDeployError::MissingInput(
            "PROJECT_ID must not be empty. Usage: agent-deploy check-permissions <PROJECT_ID>"
                .to_string(),
        ));
    }

    Gcloud::ensure_installed()?;

    let account = match &cmd.account {
        Some(account) => account.clone(),
        None => Gcloud::active_account()?,
    };

    println!(
        "Checking permissions for {} on project {}...\n",
        account, project_id
    );

    let requirements = Requirements::from_config(&config.permissions);
    let report = permissions::check(&Gcloud, project_id, &account, &requirements);
    println!("{}", report);

    let summary = report.summary();
    if summary.absent > 0 {
        println!("\nGrant missing roles with:");
        println!(
            "  gcloud projects add-iam-policy-binding {} --member={} --role=<ROLE>",
            project_id,
            crate::gcp::gcloud::member_for_account(&account)
        );
        println!("Enable missing APIs with:");
        println!("  gcloud services enable <API> --project={}", project_id);
    }

    if cmd.strict && !report.is_complete() {
        return Err(AgentDeployError::PermissionsIncomplete(
            summary.absent + summary.unknown,
        ));
    }

    Ok(())
}
