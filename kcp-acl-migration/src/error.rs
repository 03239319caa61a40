//! Error types for the ACL migration run

use std::path::PathBuf;

use thiserror::Error;

use crate::aws::AwsError;

/// Errors that abort an ACL migration run.
///
/// Unrecognized-but-well-formed input (unknown actions, unexpected resource
/// shapes) is never reported through this type; it is skipped or defaulted.
#[derive(Debug, Error)]
pub enum AclMigrationError {
    #[error("failed to get principal policies for '{principal}': {source}")]
    PolicyFetch {
        principal: String,
        #[source]
        source: AwsError,
    },

    #[error("malformed policy document '{policy}' for principal '{principal}': {source}")]
    PolicyDocument {
        principal: String,
        policy: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {what} from '{}': {source}", path.display())]
    InputRead {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {what} in '{}': {source}", path.display())]
    InputShape {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render Terraform for '{principal}': {message}")]
    Render { principal: String, message: String },

    #[error("failed to write Terraform files to '{}': {source}", path.display())]
    TerraformWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write audit report to '{}': {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AclMigrationError {
    pub fn policy_fetch(principal: impl Into<String>, source: AwsError) -> Self {
        Self::PolicyFetch {
            principal: principal.into(),
            source,
        }
    }

    pub fn policy_document(
        principal: impl Into<String>,
        policy: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::PolicyDocument {
            principal: principal.into(),
            policy: policy.into(),
            source,
        }
    }

    pub fn render(principal: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Render {
            principal: principal.into(),
            message: message.to_string(),
        }
    }
}

pub type AclMigrationResult<T> = Result<T, AclMigrationError>;
