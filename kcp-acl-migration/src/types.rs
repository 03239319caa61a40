//! Core data types: Kafka ACL vocabulary, typed IAM policy documents, and
//! the records exchanged with collaborators.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalize a Kafka enum spelling (`TRANSACTIONAL_ID`, `TransactionalId`,
/// `transactional-id`) into one lowercase key.
fn enum_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Error returned when a Kafka enum spelling is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Kafka resource kinds that ACLs can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceType {
    Cluster,
    Topic,
    Group,
    TransactionalId,
}

impl ResourceType {
    /// Spelling used by the Confluent Terraform provider
    pub fn confluent_name(self) -> &'static str {
        match self {
            Self::Cluster => "CLUSTER",
            Self::Topic => "TOPIC",
            Self::Group => "GROUP",
            Self::TransactionalId => "TRANSACTIONAL_ID",
        }
    }

    /// Path separator naming this kind inside an MSK resource ARN.
    /// `Cluster` has no nameable sub-resource.
    pub(crate) fn arn_separator(self) -> Option<&'static str> {
        match self {
            Self::Cluster => None,
            Self::Topic => Some(":topic/"),
            Self::Group => Some(":group/"),
            Self::TransactionalId => Some(":transactional-id/"),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cluster => "Cluster",
            Self::Topic => "Topic",
            Self::Group => "Group",
            Self::TransactionalId => "TransactionalId",
        };
        f.write_str(name)
    }
}

impl FromStr for ResourceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match enum_key(s).as_str() {
            "cluster" => Ok(Self::Cluster),
            "topic" => Ok(Self::Topic),
            "group" => Ok(Self::Group),
            "transactionalid" => Ok(Self::TransactionalId),
            _ => Err(UnknownVariant {
                kind: "resource type",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ResourceType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.to_string()
    }
}

/// How an ACL's resource name is matched. There is no suffix or infix match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PatternType {
    Literal,
    Prefixed,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => f.write_str("LITERAL"),
            Self::Prefixed => f.write_str("PREFIXED"),
        }
    }
}

impl FromStr for PatternType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match enum_key(s).as_str() {
            "literal" => Ok(Self::Literal),
            "prefixed" => Ok(Self::Prefixed),
            _ => Err(UnknownVariant {
                kind: "pattern type",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PatternType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PatternType> for String {
    fn from(value: PatternType) -> Self {
        value.to_string()
    }
}

/// Kafka ACL operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operation {
    All,
    Read,
    Write,
    Create,
    Delete,
    Alter,
    Describe,
    ClusterAction,
    DescribeConfigs,
    AlterConfigs,
    IdempotentWrite,
}

impl Operation {
    /// Spelling used by the Confluent Terraform provider
    pub fn confluent_name(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Alter => "ALTER",
            Self::Describe => "DESCRIBE",
            Self::ClusterAction => "CLUSTER_ACTION",
            Self::DescribeConfigs => "DESCRIBE_CONFIGS",
            Self::AlterConfigs => "ALTER_CONFIGS",
            Self::IdempotentWrite => "IDEMPOTENT_WRITE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "All",
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Create => "Create",
            Self::Delete => "Delete",
            Self::Alter => "Alter",
            Self::Describe => "Describe",
            Self::ClusterAction => "ClusterAction",
            Self::DescribeConfigs => "DescribeConfigs",
            Self::AlterConfigs => "AlterConfigs",
            Self::IdempotentWrite => "IdempotentWrite",
        };
        f.write_str(name)
    }
}

impl FromStr for Operation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match enum_key(s).as_str() {
            "all" => Ok(Self::All),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "create" => Ok(Self::Create),
            "delete" => Ok(Self::Delete),
            "alter" => Ok(Self::Alter),
            "describe" => Ok(Self::Describe),
            "clusteraction" => Ok(Self::ClusterAction),
            "describeconfigs" => Ok(Self::DescribeConfigs),
            "alterconfigs" => Ok(Self::AlterConfigs),
            "idempotentwrite" => Ok(Self::IdempotentWrite),
            _ => Err(UnknownVariant {
                kind: "operation",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Operation {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operation> for String {
    fn from(value: Operation) -> Self {
        value.to_string()
    }
}

/// ACL permission, taken from a policy statement's effect.
///
/// Effects other than allow/deny are carried through upper-cased, unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Permission {
    Allow,
    Deny,
    Other(String),
}

impl Permission {
    pub fn from_effect(effect: &str) -> Self {
        let upper = effect.to_uppercase();
        match upper.as_str() {
            "ALLOW" => Self::Allow,
            "DENY" => Self::Deny,
            _ => Self::Other(upper),
        }
    }

    /// Take a permission already spelled by Kafka, keeping its exact text
    pub fn verbatim(value: &str) -> Self {
        match value {
            "ALLOW" => Self::Allow,
            "DENY" => Self::Deny,
            other => Self::Other(other.to_string()),
        }
    }
}

fn verbatim_permission<'de, D>(deserializer: D) -> Result<Permission, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(|value| Permission::verbatim(&value))
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("ALLOW"),
            Self::Deny => f.write_str("DENY"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::from_effect(&value)
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}

/// One Confluent Cloud compatible ACL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclRecord {
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub pattern_type: PatternType,
    /// Clean principal name
    pub principal: String,
    pub host: String,
    pub operation: Operation,
    pub permission: Permission,
}

/// ACL records keyed by clean principal name; ordered so output is key-stable
pub type AclsByPrincipal = BTreeMap<String, Vec<AclRecord>>;

/// A JSON field that IAM allows as either a bare value or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

/// IAM policy document as decoded at the collaborator boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "Statement")]
    pub statement: OneOrMany<RawStatement>,
}

impl PolicyDocument {
    pub fn into_statements(self) -> Vec<PolicyStatement> {
        self.statement
            .into_vec()
            .into_iter()
            .map(PolicyStatement::from)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatement {
    #[serde(rename = "Sid", default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<OneOrMany<String>>,
    #[serde(rename = "Resource", default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<OneOrMany<String>>,
}

/// Fully typed policy statement consumed by the translator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStatement {
    pub effect: String,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyStatement {
    pub fn new(
        effect: impl Into<String>,
        actions: Vec<String>,
        resources: Vec<String>,
    ) -> Self {
        Self {
            effect: effect.into(),
            actions,
            resources,
        }
    }
}

impl From<RawStatement> for PolicyStatement {
    fn from(raw: RawStatement) -> Self {
        Self {
            effect: raw.effect,
            actions: raw.action.map(OneOrMany::into_vec).unwrap_or_default(),
            resources: raw.resource.map(OneOrMany::into_vec).unwrap_or_default(),
        }
    }
}

/// A policy attached to, or inlined on, a principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPolicy {
    pub name: String,
    /// Policy JSON, not yet decoded into a [`PolicyDocument`]
    pub document: serde_json::Value,
}

/// Everything the policy collaborator returns for one principal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrincipalPolicies {
    #[serde(default)]
    pub attached_policies: Vec<NamedPolicy>,
    #[serde(default)]
    pub inline_policies: Vec<NamedPolicy>,
}

impl PrincipalPolicies {
    pub fn iter(&self) -> impl Iterator<Item = &NamedPolicy> {
        self.attached_policies
            .iter()
            .chain(self.inline_policies.iter())
    }
}

/// A client connection recorded by an earlier discovery scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredClient {
    pub client_id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub topic: String,
    pub auth_mechanism: String,
    pub principal: String,
    pub timestamp: DateTime<Utc>,
}

/// An ACL listed from the live source cluster, already in target shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedAcl {
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub pattern_type: PatternType,
    pub principal: String,
    pub host: String,
    pub operation: Operation,
    #[serde(deserialize_with = "verbatim_permission")]
    pub permission_type: Permission,
}

/// Run configuration, fixed before any per-principal work starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    pub output_dir: PathBuf,
    /// Terraform variable holding the destination cluster id
    pub cluster_id_variable: String,
    pub report_file_name: String,
}

impl MigrationConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("acls"),
            cluster_id_variable: "confluent_cloud_cluster_id".to_string(),
            report_file_name: "acl-migration-report.md".to_string(),
        }
    }
}

/// Files written by a successful emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionSummary {
    pub principal_count: usize,
    pub acl_count: usize,
    pub terraform_files: Vec<PathBuf>,
    pub report_path: PathBuf,
}

/// Result of a complete migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Emitted(EmissionSummary),
    /// No principal was resolved; no files were written
    NoPrincipals,
    /// Nothing was translated; no files were written
    NoPermissions,
}
