//! Staging and artifact bucket provisioning.

use super::Gcloud;
use crate::error::Result;

/// Buckets an agent deployment needs, derived from a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentBuckets {
    pub staging: String,
    pub artifacts: String,
}

impl DeploymentBuckets {
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            staging: format!("{}-staging", prefix),
            artifacts: format!("{}-artifacts", prefix),
        }
    }

    /// Staging bucket as a `gs://` URI
    pub fn staging_uri(&self) -> String {
        format!("gs://{}", self.staging)
    }

    pub fn all(&self) -> [&str; 2] {
        [&self.staging, &self.artifacts]
    }
}

/// Create each bucket that does not exist yet
pub fn ensure_buckets(buckets: &DeploymentBuckets, project: &str, location: &str) -> Result<()> {
    for bucket in buckets.all() {
        if Gcloud::bucket_exists(bucket, project)? {
            tracing::info!(bucket, "bucket ready");
            continue;
        }

        tracing::info!(bucket, location, "creating bucket");
        Gcloud::create_bucket(bucket, project, location).inspect_err(|e| {
            tracing::error!(bucket, error = %e, "bucket creation failed");
        })?;
        tracing::info!(bucket, "bucket ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_from_prefix() {
        let buckets = DeploymentBuckets::from_prefix("acme-agents");
        assert_eq!(buckets.staging, "acme-agents-staging");
        assert_eq!(buckets.artifacts, "acme-agents-artifacts");
        assert_eq!(buckets.all(), ["acme-agents-staging", "acme-agents-artifacts"]);
        assert_eq!(buckets.staging_uri(), "gs://acme-agents-staging");
    }
}
