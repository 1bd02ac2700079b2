use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Outcome for one required API or role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Present,
    Implied { by: String },
    Absent,
    Unknown { reason: String },
}

impl ItemStatus {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, ItemStatus::Present | ItemStatus::Implied { .. })
    }

    fn marker(&self) -> &'static str {
        match self {
            ItemStatus::Present | ItemStatus::Implied { .. } => "✓",
            ItemStatus::Absent => "✗",
            ItemStatus::Unknown { .. } => "?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    pub name: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl CheckItem {
    pub fn new(name: &str, status: ItemStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }

    /// One report line, e.g. `✗ storage.googleapis.com - NOT enabled`
    pub fn line(&self, present: &str, absent: &str) -> String {
        let detail = match &self.status {
            ItemStatus::Present => present.to_string(),
            ItemStatus::Implied { by } => format!("{} (via {})", present, by),
            ItemStatus::Absent => absent.to_string(),
            ItemStatus::Unknown { .. } => "could not determine".to_string(),
        };
        format!("{} {} - {}", self.status.marker(), self.name, detail)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub satisfied: usize,
    pub absent: usize,
    pub unknown: usize,
}

/// Result of one permission check; printed, never persisted
#[derive(Debug, Clone, Serialize)]
pub struct PermissionReport {
    pub project: String,
    pub account: String,
    pub apis: Vec<CheckItem>,
    pub roles: Vec<CheckItem>,
}

impl PermissionReport {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for item in self.apis.iter().chain(self.roles.iter()) {
            match item.status {
                ItemStatus::Present | ItemStatus::Implied { .. } => summary.satisfied += 1,
                ItemStatus::Absent => summary.absent += 1,
                ItemStatus::Unknown { .. } => summary.unknown += 1,
            }
        }
        summary
    }

    /// True when every requirement is known to be satisfied
    pub fn is_complete(&self) -> bool {
        let summary = self.summary();
        summary.absent == 0 && summary.unknown == 0
    }

    /// Distinct query failure reasons
    pub fn failures(&self) -> Vec<&str> {
        let reasons: BTreeSet<&str> = self
            .apis
            .iter()
            .chain(self.roles.iter())
            .filter_map(|item| match &item.status {
                ItemStatus::Unknown { reason } => Some(reason.as_str()),
                _ => None,
            })
            .collect();
        reasons.into_iter().collect()
    }
}

impl fmt::Display for PermissionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Permission Check")?;
        writeln!(f, "═══════════════════════════════════════════════")?;
        writeln!(f, "  Project: {}", self.project)?;
        writeln!(f, "  Account: {}", self.account)?;
        writeln!(f)?;

        writeln!(f, "APIs:")?;
        for item in &self.apis {
            writeln!(f, "  {}", item.line("enabled", "NOT enabled"))?;
        }
        writeln!(f)?;

        writeln!(f, "IAM Roles:")?;
        for item in &self.roles {
            writeln!(f, "  {}", item.line("granted", "NOT granted"))?;
        }

        let failures = self.failures();
        if !failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Queries that failed:")?;
            for reason in failures {
                writeln!(f, "  - {}", reason)?;
            }
        }

        let summary = self.summary();
        writeln!(f)?;
        write!(
            f,
            "Summary: {} satisfied, {} missing, {} unknown",
            summary.satisfied, summary.absent, summary.unknown
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> PermissionReport {
        PermissionReport {
            project: "acme".to_string(),
            account: "dev@example.com".to_string(),
            apis: vec![
                CheckItem::new("aiplatform.googleapis.com", ItemStatus::Present),
                CheckItem::new("storage.googleapis.com", ItemStatus::Absent),
            ],
            roles: vec![CheckItem::new(
                "roles/storage.admin",
                ItemStatus::Unknown {
                    reason: "gcloud failed".to_string(),
                },
            )],
        }
    }

    #[test]
    fn test_line_rendering() {
        let item = CheckItem::new("storage.googleapis.com", ItemStatus::Absent);
        assert_eq!(
            item.line("enabled", "NOT enabled"),
            "✗ storage.googleapis.com - NOT enabled"
        );

        let item = CheckItem::new(
            "roles/storage.admin",
            ItemStatus::Implied {
                by: "roles/owner".to_string(),
            },
        );
        assert_eq!(
            item.line("granted", "NOT granted"),
            "✓ roles/storage.admin - granted (via roles/owner)"
        );
    }

    #[test]
    fn test_summary_counts() {
        let summary = report().summary();
        assert_eq!(
            summary,
            Summary {
                satisfied: 1,
                absent: 1,
                unknown: 1
            }
        );
        assert!(!report().is_complete());
    }

    #[test]
    fn test_display_includes_failures() {
        let text = report().to_string();
        assert!(text.contains("Project: acme"));
        assert!(text.contains("? roles/storage.admin - could not determine"));
        assert!(text.contains("  - gcloud failed"));
        assert!(text.ends_with("Summary: 1 satisfied, 1 missing, 1 unknown"));
    }

    #[test]
    fn test_failures_listed_once_across_sections() {
        let unknown = || ItemStatus::Unknown {
            reason: "gcloud failed".to_string(),
        };
        let report = PermissionReport {
            project: "acme".to_string(),
            account: "dev@example.com".to_string(),
            apis: vec![
                CheckItem::new("aiplatform.googleapis.com", unknown()),
                CheckItem::new(
                    "storage.googleapis.com",
                    ItemStatus::Unknown {
                        reason: "quota exceeded".to_string(),
                    },
                ),
            ],
            roles: vec![
                CheckItem::new("roles/aiplatform.user", ItemStatus::Present),
                CheckItem::new("roles/storage.admin", unknown()),
            ],
        };

        assert_eq!(report.failures(), vec!["gcloud failed", "quota exceeded"]);
        assert_eq!(report.to_string().matches("  - gcloud failed").count(), 1);
    }

    #[test]
    fn test_status_serializes_tagged() {
        let item = CheckItem::new(
            "roles/x",
            ItemStatus::Implied {
                by: "roles/owner".to_string(),
            },
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "roles/x");
        assert_eq!(json["status"], "implied");
        assert_eq!(json["by"], "roles/owner");
    }
}
