//! IAM to Kafka ACL migration pass

use chrono::Utc;
use log::info;

use crate::emit::emit_assets;
use crate::error::{AclMigrationError, AclMigrationResult};
use crate::resolver::PrincipalSource;
use crate::synthesis::{group_by_principal, translate_statement};
use crate::types::{
    AclRecord, AclsByPrincipal, MigrationOutcome, PolicyDocument, PrincipalPolicies,
};

impl super::service::AclMigrationService {
    /// Resolve principals, fetch their policies, and translate every statement.
    ///
    /// Principals are processed one at a time in resolution order. A failed
    /// fetch or a malformed policy document aborts the whole pass.
    pub async fn collect_iam_acls(
        &self,
        principals: &PrincipalSource,
    ) -> AclMigrationResult<AclsByPrincipal> {
        self.collect_for(&principals.resolve()).await
    }

    async fn collect_for(&self, principals: &[String]) -> AclMigrationResult<AclsByPrincipal> {
        let mut records = Vec::new();

        for principal in principals {
            info!("Fetching policies for {principal}");
            let policies = self
                .policy_source
                .get_policies(principal)
                .await
                .map_err(|e| AclMigrationError::policy_fetch(principal, e))?;

            let translated = translate_policies(principal, &policies)?;
            info!(
                "Translated {} ACLs from {} policies for {}",
                translated.len(),
                policies.iter().count(),
                principal
            );
            records.extend(translated);
        }

        Ok(group_by_principal(records))
    }

    /// Run the full IAM migration and write Terraform plus the audit report
    pub async fn migrate_iam_acls(
        &self,
        principals: &PrincipalSource,
    ) -> AclMigrationResult<MigrationOutcome> {
        let principals = principals.resolve();
        if principals.is_empty() {
            info!("No IAM-authenticated principals found; nothing to migrate");
            return Ok(MigrationOutcome::NoPrincipals);
        }

        let acls = self.collect_for(&principals).await?;
        if acls.is_empty() {
            info!("No kafka-cluster permissions found; no files written");
            return Ok(MigrationOutcome::NoPermissions);
        }

        emit_assets(&acls, &self.config, Utc::now()).map(MigrationOutcome::Emitted)
    }
}

/// Translate every statement of every policy held by one principal
fn translate_policies(
    principal: &str,
    policies: &PrincipalPolicies,
) -> AclMigrationResult<Vec<AclRecord>> {
    let mut records = Vec::new();
    for policy in policies.iter() {
        let document: PolicyDocument = serde_json::from_value(policy.document.clone())
            .map_err(|e| AclMigrationError::policy_document(principal, &policy.name, e))?;
        for statement in document.into_statements() {
            records.extend(translate_statement(principal, &statement));
        }
    }
    Ok(records)
}
