//! IAM principal ARN resolution

/// IAM principal kinds whose policies can be listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    Role,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalInfo {
    pub kind: PrincipalKind,
    /// Role or user name, without any IAM path
    pub name: String,
}

/// Resolve an IAM role or user ARN into its kind and name.
///
/// Accepts `arn:<partition>:iam::<account>:role/[path/]name` and the `user/`
/// equivalent.
pub fn resolve_principal(arn: &str) -> Result<PrincipalInfo, String> {
    let parts: Vec<&str> = arn.splitn(6, ':').collect();
    if parts.len() != 6 || parts[0] != "arn" {
        return Err(format!("'{arn}' is not an ARN"));
    }
    if parts[2] != "iam" {
        return Err(format!(
            "'{arn}' is not an IAM principal (service '{}')",
            parts[2]
        ));
    }

    let resource = parts[5];
    let (kind, path) = if let Some(path) = resource.strip_prefix("role/") {
        (PrincipalKind::Role, path)
    } else if let Some(path) = resource.strip_prefix("user/") {
        (PrincipalKind::User, path)
    } else {
        return Err(format!("'{arn}' is neither a role nor a user"));
    };

    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(PrincipalInfo {
            kind,
            name: name.to_string(),
        }),
        _ => Err(format!("'{arn}' has no principal name")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_role_and_user() {
        let role = resolve_principal("arn:aws:iam::123456789012:role/app-role").expect("role");
        assert_eq!(role.kind, PrincipalKind::Role);
        assert_eq!(role.name, "app-role");

        let user = resolve_principal("arn:aws:iam::123456789012:user/alice").expect("user");
        assert_eq!(user.kind, PrincipalKind::User);
        assert_eq!(user.name, "alice");
    }

    #[test]
    fn test_resolve_role_with_path() {
        let role = resolve_principal("arn:aws:iam::123456789012:role/service/app-role")
            .expect("role with path");
        assert_eq!(role.name, "app-role");
    }

    #[test]
    fn test_resolve_rejects_non_iam() {
        assert!(resolve_principal("not-an-arn").is_err());
        assert!(resolve_principal("arn:aws:sts::123456789012:assumed-role/r/s").is_err());
        assert!(resolve_principal("arn:aws:iam::123456789012:group/devs").is_err());
        assert!(resolve_principal("arn:aws:iam::123456789012:role/").is_err());
    }
}
