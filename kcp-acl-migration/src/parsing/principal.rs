//! Principal identifier normalization
//!
//! Two renderings of a principal coexist: the canonical ARN, used for
//! grouping and policy lookup, and the clean name, safe for file names and
//! Terraform identifiers. The clean name is always derived, never stored.

const STS_PREFIX: &str = "arn:aws:sts::";
const IAM_PREFIX: &str = "arn:aws:iam::";
const KAFKA_USER_PREFIX: &str = "User:";

/// Characters replaced by `_` in clean names
const SEPARATORS: &[char] = &['.', '@', '-', ' ', '/', '\\'];

/// Normalize a principal recorded by client discovery to its IAM ARN.
///
/// An STS assumed-role ARN and the plain role ARN for the same role produce
/// the same string; the session name segment is discarded.
pub fn normalize_discovered(identifier: &str) -> String {
    let rewritten = match identifier.strip_prefix(STS_PREFIX) {
        Some(rest) => format!("{IAM_PREFIX}{rest}"),
        None => identifier.to_string(),
    };
    let rewritten = rewritten.replace(":assumed-role/", ":role/");

    let segments: Vec<&str> = rewritten.split('/').collect();
    if segments.len() > 2 {
        segments[..2].join("/")
    } else {
        rewritten
    }
}

/// Derive the clean name of a raw principal identifier.
///
/// The second `/` segment of an ARN is the role or user name. Identifiers
/// without one (Kafka principals such as `User:alice`) are used whole.
///
/// Only call this on raw identifiers: cleaning an already clean name is not
/// guaranteed to be a no-op.
pub fn clean_name(identifier: &str) -> String {
    let display = match identifier.split('/').nth(1) {
        Some(name) => format!("{KAFKA_USER_PREFIX}{name}"),
        None => identifier.to_string(),
    };
    let bare = display.strip_prefix(KAFKA_USER_PREFIX).unwrap_or(&display);
    bare.replace(SEPARATORS, "_").to_lowercase()
}
