//! Role implication table.
//!
//! Maps a role to the roles it implies. The wildcard `"*"` marks a role that
//! implies every other role (project owner). New superseding roles are added
//! through `[permissions.implications]` in configuration.

use std::collections::{BTreeMap, BTreeSet};

pub const ALL_ROLES: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Implied {
    All,
    Roles(BTreeSet<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleImplications {
    table: BTreeMap<String, Implied>,
}

impl RoleImplications {
    pub fn from_table(table: &BTreeMap<String, Vec<String>>) -> Self {
        let table = table
            .iter()
            .map(|(role, implied)| {
                let implied = if implied.iter().any(|r| r == ALL_ROLES) {
                    Implied::All
                } else {
                    Implied::Roles(implied.iter().cloned().collect())
                };
                (role.clone(), implied)
            })
            .collect();
        Self { table }
    }

    /// Only `roles/owner`, implying everything
    pub fn owner_only() -> Self {
        Self::from_table(&BTreeMap::from([(
            "roles/owner".to_string(),
            vec![ALL_ROLES.to_string()],
        )]))
    }

    /// First granted role (in sorted order) that implies every role
    pub fn superseding_role(&self, granted: &BTreeSet<String>) -> Option<String> {
        granted
            .iter()
            .find(|role| matches!(self.table.get(role.as_str()), Some(Implied::All)))
            .cloned()
    }

    /// Granted role implying `required`, if any
    pub fn implied_by(&self, required: &str, granted: &BTreeSet<String>) -> Option<String> {
        granted
            .iter()
            .find(|role| match self.table.get(role.as_str()) {
                Some(Implied::All) => true,
                Some(Implied::Roles(roles)) => roles.contains(required),
                None => false,
            })
            .cloned()
    }
}
