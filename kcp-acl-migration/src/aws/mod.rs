//! AWS integration: the principal policy collaborator and principal ARN parsing.

pub(crate) mod iam_client;
pub mod principal;

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{AclMigrationError, AclMigrationResult};
use crate::types::PrincipalPolicies;

pub use iam_client::AwsIamPolicySource;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("IAM client error: {0}")]
    IamError(String),
    #[error("Principal resolution error: {0}")]
    PrincipalError(String),
    #[error("Policy document error: {0}")]
    PolicyError(String),
}

pub type AwsResult<T> = Result<T, AwsError>;

/// Source of the policy documents attached to, or inlined on, a principal
#[async_trait]
pub trait PolicySource: Send + Sync {
    async fn get_policies(&self, principal_arn: &str) -> AwsResult<PrincipalPolicies>;
}

/// Policies held in memory, keyed by principal ARN.
///
/// Backs offline runs from a policy snapshot file. Unknown principals are an
/// error, the same as a failed IAM lookup.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicySource {
    policies: HashMap<String, PrincipalPolicies>,
}

impl StaticPolicySource {
    pub fn new(policies: HashMap<String, PrincipalPolicies>) -> Self {
        Self { policies }
    }

    /// Load a snapshot: a JSON object from principal ARN to its policies
    pub fn from_file(path: &Path) -> AclMigrationResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| AclMigrationError::InputRead {
                what: "policy snapshot",
                path: path.to_path_buf(),
                source,
            })?;
        let policies =
            serde_json::from_str(&content).map_err(|source| AclMigrationError::InputShape {
                what: "policy snapshot",
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(policies))
    }

    pub fn insert(&mut self, principal_arn: impl Into<String>, policies: PrincipalPolicies) {
        self.policies.insert(principal_arn.into(), policies);
    }
}

#[async_trait]
impl PolicySource for StaticPolicySource {
    async fn get_policies(&self, principal_arn: &str) -> AwsResult<PrincipalPolicies> {
        self.policies.get(principal_arn).cloned().ok_or_else(|| {
            AwsError::IamError(format!("no policies recorded for '{principal_arn}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_static_source_unknown_principal_is_error() {
        let source = StaticPolicySource::default();
        let result = source.get_policies("arn:aws:iam::1:role/missing").await;
        assert!(matches!(result, Err(AwsError::IamError(_))));
    }

    #[tokio::test]
    async fn test_static_source_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"arn:aws:iam::1:role/app": {{"inline_policies": [{{"name": "p", "document": {{"Statement": []}}}}]}}}}"#
        )
        .expect("write snapshot");

        let source = StaticPolicySource::from_file(file.path()).expect("snapshot should load");
        let policies = source
            .get_policies("arn:aws:iam::1:role/app")
            .await
            .expect("principal is present");
        assert!(policies.attached_policies.is_empty());
        assert_eq!(policies.inline_policies.len(), 1);
    }

    #[test]
    fn test_static_source_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "[1, 2, 3]").expect("write snapshot");
        let result = StaticPolicySource::from_file(file.path());
        assert!(matches!(result, Err(AclMigrationError::InputShape { .. })));
    }
}
