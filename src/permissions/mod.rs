//! Permission reporting: are the APIs and IAM roles a deployment needs in place?
//!
//! The provider is queried once for the enabled APIs and once for the roles
//! bound to the account. Each required item is then marked present, implied
//! by a broader role, absent, or unknown when the query itself failed.
//! A failed query never reads as "not granted".

pub mod implications;
pub mod report;

pub use implications::RoleImplications;
pub use report::{CheckItem, ItemStatus, PermissionReport};

use crate::config::PermissionsConfig;
use crate::error::Result;
use std::collections::BTreeSet;

/// Source of the enabled APIs and granted roles for a project
pub trait IamSource {
    fn enabled_apis(&self, project: &str) -> Result<BTreeSet<String>>;

    /// Roles bound to `account` (an email, or an already prefixed IAM member)
    fn granted_roles(&self, project: &str, account: &str) -> Result<BTreeSet<String>>;
}

/// What a deployment requires from a project
#[derive(Debug, Clone)]
pub struct Requirements {
    pub apis: Vec<String>,
    pub roles: Vec<String>,
    pub implications: RoleImplications,
}

impl Requirements {
    pub fn from_config(config: &PermissionsConfig) -> Self {
        Self {
            apis: config.required_apis.clone(),
            roles: config.required_roles.clone(),
            implications: RoleImplications::from_table(&config.implications),
        }
    }
}

impl Default for Requirements {
    fn default() -> Self {
        Self::from_config(&PermissionsConfig::default())
    }
}

/// Query `source` and evaluate every requirement
pub fn check(
    source: &dyn IamSource,
    project: &str,
    account: &str,
    requirements: &Requirements,
) -> PermissionReport {
    let apis = match source.enabled_apis(project) {
        Ok(enabled) => requirements
            .apis
            .iter()
            .map(|api| {
                let status = if enabled.contains(api) {
                    ItemStatus::Present
                } else {
                    ItemStatus::Absent
                };
                CheckItem::new(api, status)
            })
            .collect(),
        Err(e) => {
            tracing::warn!(project, error = %e, "could not list enabled APIs");
            unknown_items(&requirements.apis, &e.to_string())
        }
    };

    let roles = match source.granted_roles(project, account) {
        Ok(granted) => evaluate_roles(&requirements.roles, &granted, &requirements.implications),
        Err(e) => {
            tracing::warn!(project, account, error = %e, "could not read IAM policy");
            unknown_items(&requirements.roles, &e.to_string())
        }
    };

    PermissionReport {
        project: project.to_string(),
        account: account.to_string(),
        apis,
        roles,
    }
}

/// Mark each required role against the granted set
///
/// A granted role that implies every role settles all requirements at once.
pub fn evaluate_roles(
    required: &[String],
    granted: &BTreeSet<String>,
    implications: &RoleImplications,
) -> Vec<CheckItem> {
    if let Some(superseding) = implications.superseding_role(granted) {
        return required
            .iter()
            .map(|role| CheckItem::new(role, ItemStatus::Implied { by: superseding.clone() }))
            .collect();
    }

    required
        .iter()
        .map(|role| {
            let status = if granted.contains(role) {
                ItemStatus::Present
            } else if let Some(by) = implications.implied_by(role, granted) {
                ItemStatus::Implied { by }
            } else {
                ItemStatus::Absent
            };
            CheckItem::new(role, status)
        })
        .collect()
}

fn unknown_items(names: &[String], reason: &str) -> Vec<CheckItem> {
    names
        .iter()
        .map(|name| {
            CheckItem::new(
                name,
                ItemStatus::Unknown {
                    reason: reason.to_string(),
                },
            )
        })
        .collect()
}
