//! ACL Migration Service Layer
//!
//! Holds the policy collaborator and the run configuration, and exposes the
//! IAM migration pass used by the CLI.

use crate::aws::{AwsIamPolicySource, PolicySource};
use crate::types::MigrationConfig;

/// Main service struct for translating IAM policies into Kafka ACLs
pub struct AclMigrationService {
    pub(crate) policy_source: Box<dyn PolicySource>,
    pub(crate) config: MigrationConfig,
}

impl AclMigrationService {
    pub fn new(policy_source: Box<dyn PolicySource>, config: MigrationConfig) -> Self {
        Self {
            policy_source,
            config,
        }
    }

    /// Create a service that reads policies from live IAM.
    ///
    /// Credentials come from the default AWS provider chain.
    pub async fn with_aws(config: MigrationConfig) -> Self {
        Self::new(Box::new(AwsIamPolicySource::from_env().await), config)
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    // IAM migration is implemented in iam.rs
}
