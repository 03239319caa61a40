//! AWS IAM client wrapper for reading principal policies
//!
// TODO: Fetch managed policy versions concurrently once principals with many
// attached policies show up in practice; calls are sequential today.

use async_trait::async_trait;
use aws_sdk_iam::Client as IamClient;
use log::debug;

use crate::aws::principal::{resolve_principal, PrincipalKind};
use crate::aws::{AwsError, AwsResult, PolicySource};
use crate::types::{NamedPolicy, PrincipalPolicies};

/// [`PolicySource`] backed by live IAM calls
pub struct AwsIamPolicySource {
    client: IamClient,
}

impl AwsIamPolicySource {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }

    /// Create a source using the standard AWS credential provider chain
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::new(IamClient::new(&config))
    }
}

#[async_trait]
impl PolicySource for AwsIamPolicySource {
    async fn get_policies(&self, principal_arn: &str) -> AwsResult<PrincipalPolicies> {
        let principal = resolve_principal(principal_arn).map_err(AwsError::PrincipalError)?;

        let mut attached_policies = Vec::new();
        let attached =
            list_attached_policies(&self.client, principal.kind, &principal.name).await?;
        for (name, arn) in attached {
            let document = get_managed_policy(&self.client, &arn).await?;
            attached_policies.push(NamedPolicy { name, document });
        }

        let mut inline_policies = Vec::new();
        for name in list_inline_policies(&self.client, principal.kind, &principal.name).await? {
            let document =
                get_inline_policy(&self.client, principal.kind, &principal.name, &name).await?;
            inline_policies.push(NamedPolicy { name, document });
        }

        debug!(
            "Fetched {} attached and {} inline policies for {}",
            attached_policies.len(),
            inline_policies.len(),
            principal_arn
        );

        Ok(PrincipalPolicies {
            attached_policies,
            inline_policies,
        })
    }
}

/// List (name, ARN) of every managed policy attached to a principal
async fn list_attached_policies(
    client: &IamClient,
    kind: PrincipalKind,
    principal_name: &str,
) -> AwsResult<Vec<(String, String)>> {
    let mut policies = Vec::new();
    let mut marker: Option<String> = None;

    loop {
        let (page, truncated, next) = match kind {
            PrincipalKind::Role => {
                let response = client
                    .list_attached_role_policies()
                    .role_name(principal_name)
                    .set_marker(marker.clone())
                    .send()
                    .await
                    .map_err(|e| {
                        AwsError::IamError(format!("Failed to list attached role policies: {e}"))
                    })?;
                let page: Vec<(String, String)> = response
                    .attached_policies()
                    .iter()
                    .filter_map(|p| {
                        Some((p.policy_name()?.to_string(), p.policy_arn()?.to_string()))
                    })
                    .collect();
                (page, response.is_truncated(), response.marker().map(str::to_string))
            }
            PrincipalKind::User => {
                let response = client
                    .list_attached_user_policies()
                    .user_name(principal_name)
                    .set_marker(marker.clone())
                    .send()
                    .await
                    .map_err(|e| {
                        AwsError::IamError(format!("Failed to list attached user policies: {e}"))
                    })?;
                let page: Vec<(String, String)> = response
                    .attached_policies()
                    .iter()
                    .filter_map(|p| {
                        Some((p.policy_name()?.to_string(), p.policy_arn()?.to_string()))
                    })
                    .collect();
                (page, response.is_truncated(), response.marker().map(str::to_string))
            }
        };

        policies.extend(page);
        if !truncated || next.is_none() {
            return Ok(policies);
        }
        marker = next;
    }
}

/// Fetch the default version document of a managed policy
async fn get_managed_policy(client: &IamClient, policy_arn: &str) -> AwsResult<serde_json::Value> {
    let policy = client
        .get_policy()
        .policy_arn(policy_arn)
        .send()
        .await
        .map_err(|e| AwsError::IamError(format!("Failed to get policy '{policy_arn}': {e}")))?;

    let version_id = policy
        .policy()
        .and_then(|p| p.default_version_id())
        .ok_or_else(|| {
            AwsError::PolicyError(format!("Policy '{policy_arn}' has no default version"))
        })?;

    let version = client
        .get_policy_version()
        .policy_arn(policy_arn)
        .version_id(version_id)
        .send()
        .await
        .map_err(|e| {
            AwsError::IamError(format!(
                "Failed to get version '{version_id}' of policy '{policy_arn}': {e}"
            ))
        })?;

    let encoded = version
        .policy_version()
        .and_then(|v| v.document())
        .ok_or_else(|| {
            AwsError::PolicyError(format!("Policy '{policy_arn}' version has no document"))
        })?;

    decode_policy_document(encoded)
}

/// List all inline policy names for a principal
async fn list_inline_policies(
    client: &IamClient,
    kind: PrincipalKind,
    principal_name: &str,
) -> AwsResult<Vec<String>> {
    let mut names = Vec::new();
    let mut marker: Option<String> = None;

    loop {
        let (page, truncated, next) = match kind {
            PrincipalKind::Role => {
                let response = client
                    .list_role_policies()
                    .role_name(principal_name)
                    .set_marker(marker.clone())
                    .send()
                    .await
                    .map_err(|e| AwsError::IamError(format!("Failed to list role policies: {e}")))?;
                let next = response.marker().map(str::to_string);
                (response.policy_names().to_vec(), response.is_truncated(), next)
            }
            PrincipalKind::User => {
                let response = client
                    .list_user_policies()
                    .user_name(principal_name)
                    .set_marker(marker.clone())
                    .send()
                    .await
                    .map_err(|e| AwsError::IamError(format!("Failed to list user policies: {e}")))?;
                let next = response.marker().map(str::to_string);
                (response.policy_names().to_vec(), response.is_truncated(), next)
            }
        };

        names.extend(page);
        if !truncated || next.is_none() {
            return Ok(names);
        }
        marker = next;
    }
}

/// Fetch and parse a specific inline policy document
async fn get_inline_policy(
    client: &IamClient,
    kind: PrincipalKind,
    principal_name: &str,
    policy_name: &str,
) -> AwsResult<serde_json::Value> {
    let policy_json = match kind {
        PrincipalKind::Role => {
            let response = client
                .get_role_policy()
                .role_name(principal_name)
                .policy_name(policy_name)
                .send()
                .await
                .map_err(|e| AwsError::IamError(format!("Failed to get role policy: {e}")))?;
            response.policy_document
        }
        PrincipalKind::User => {
            let response = client
                .get_user_policy()
                .user_name(principal_name)
                .policy_name(policy_name)
                .send()
                .await
                .map_err(|e| AwsError::IamError(format!("Failed to get user policy: {e}")))?;
            response.policy_document
        }
    };

    decode_policy_document(&policy_json)
}

/// IAM returns policy documents URL-encoded
fn decode_policy_document(encoded: &str) -> AwsResult<serde_json::Value> {
    let decoded = percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .map_err(|e| AwsError::PolicyError(format!("Failed to URL decode policy document: {e}")))?;

    serde_json::from_str(&decoded)
        .map_err(|e| AwsError::PolicyError(format!("Failed to parse policy document JSON: {e}")))
}
