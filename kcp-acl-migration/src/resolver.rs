//! Principal resolution: which IAM principals a migration run covers

use std::path::Path;

use log::debug;

use crate::error::{AclMigrationError, AclMigrationResult};
use crate::parsing::normalize_discovered;
use crate::types::DiscoveredClient;

/// Authentication mechanism recorded for IAM-authenticated clients
pub const IAM_AUTH_MECHANISM: &str = "IAM";

/// Where a run's principals come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalSource {
    /// A single role or user ARN supplied by the caller
    Explicit(String),
    /// Client connections recorded by an earlier discovery scan
    Discovered(Vec<DiscoveredClient>),
}

impl PrincipalSource {
    /// Canonical principal ARNs, de-duplicated in first-seen order
    pub fn resolve(&self) -> Vec<String> {
        match self {
            Self::Explicit(identifier) => vec![identifier.clone()],
            Self::Discovered(clients) => principals_from_clients(clients),
        }
    }
}

/// Normalize the principals of IAM-authenticated clients.
///
/// Clients using any other mechanism (SASL/SCRAM, TLS, unauthenticated) have
/// no IAM policies to translate and are ignored.
pub fn principals_from_clients(clients: &[DiscoveredClient]) -> Vec<String> {
    let mut principals: Vec<String> = Vec::new();
    for client in clients
        .iter()
        .filter(|c| c.auth_mechanism == IAM_AUTH_MECHANISM)
    {
        let principal = normalize_discovered(&client.principal);
        if !principals.contains(&principal) {
            debug!(
                "Discovered principal {} from client {}",
                principal, client.client_id
            );
            principals.push(principal);
        }
    }
    principals
}

/// Load recorded client connections: a JSON array of [`DiscoveredClient`]
pub fn load_discovered_clients(path: &Path) -> AclMigrationResult<Vec<DiscoveredClient>> {
    let content = std::fs::read_to_string(path).map_err(|source| AclMigrationError::InputRead {
        what: "discovered clients",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| AclMigrationError::InputShape {
        what: "discovered clients",
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    fn client(id: &str, auth: &str, principal: &str) -> DiscoveredClient {
        DiscoveredClient {
            client_id: id.to_string(),
            role: "Consumer".to_string(),
            topic: "orders".to_string(),
            auth_mechanism: auth.to_string(),
            principal: principal.to_string(),
            timestamp: Utc
                .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn test_explicit_is_single_element() {
        let source = PrincipalSource::Explicit("arn:aws:iam::1:user/alice".to_string());
        assert_eq!(source.resolve(), vec!["arn:aws:iam::1:user/alice"]);
    }

    #[test]
    fn test_discovery_dedupes_in_first_seen_order() {
        let a = "arn:aws:iam::1:role/a";
        let b = "arn:aws:sts::1:assumed-role/b/session-1";
        let c = "arn:aws:iam::1:user/c";
        let clients = vec![
            client("1", "IAM", a),
            client("2", "IAM", b),
            client("3", "IAM", "arn:aws:sts::1:assumed-role/a/i-0123"),
            client("4", "IAM", c),
            client("5", "IAM", "arn:aws:sts::1:assumed-role/b/session-2"),
        ];
        assert_eq!(
            principals_from_clients(&clients),
            vec![a, "arn:aws:iam::1:role/b", c]
        );
    }

    #[test]
    fn test_non_iam_clients_are_ignored() {
        let clients = vec![
            client("1", "SASL/SCRAM", "User:alice"),
            client("2", "TLS", "CN=bob"),
            client("3", "UNAUTHENTICATED", ""),
        ];
        assert!(PrincipalSource::Discovered(clients).resolve().is_empty());
    }

    #[test]
    fn test_load_discovered_clients() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"client_id": "c1", "role": "Producer", "topic": "orders", "auth_mechanism": "IAM",
                 "principal": "arn:aws:iam::1:role/app", "timestamp": "2025-03-01T12:00:00Z"}}]"#
        )
        .expect("write clients");

        let clients = load_discovered_clients(file.path()).expect("clients should load");
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].auth_mechanism, "IAM");
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let result = load_discovered_clients(Path::new("/nonexistent/clients.json"));
        assert!(matches!(result, Err(AclMigrationError::InputRead { .. })));
    }
}
