//! Markdown audit report mapping each emitted ACL back to IAM actions

use chrono::{DateTime, Utc};

use crate::mapping;
use crate::types::{AclRecord, AclsByPrincipal};

pub const REPORT_TITLE: &str = "# Kafka ACL Migration Report";

const HEADERS: [&str; 6] = [
    "IAM Action(s)",
    "Resource Type",
    "Resource Name",
    "Pattern Type",
    "Operation",
    "Permission",
];

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Render a markdown table
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", headers.join(" | ")));
    out.push_str(&format!(
        "|{}\n",
        headers.iter().map(|_| " --- |").collect::<String>()
    ));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

/// IAM actions that could have produced the record, or `-` when none do
fn iam_actions(record: &AclRecord) -> String {
    let actions = mapping::actions_for(record.resource_type, record.operation);
    if actions.is_empty() {
        "-".to_string()
    } else {
        actions.join(", ")
    }
}

fn principal_rows(records: &[AclRecord]) -> Vec<Vec<String>> {
    let mut sorted: Vec<&AclRecord> = records.iter().collect();
    sorted.sort_by_cached_key(|r| {
        (
            r.resource_type.to_string(),
            r.resource_name.clone(),
            r.operation.to_string(),
        )
    });
    sorted
        .into_iter()
        .map(|r| {
            vec![
                iam_actions(r),
                r.resource_type.to_string(),
                r.resource_name.clone(),
                r.pattern_type.to_string(),
                r.operation.to_string(),
                r.permission.to_string(),
            ]
        })
        .collect()
}

/// Render the audit report for every principal
pub fn render_report(acls: &AclsByPrincipal, generated_at: DateTime<Utc>) -> String {
    let total: usize = acls.values().map(Vec::len).sum();

    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");
    out.push_str(&format!("Generated: {}\n\n", generated_at.to_rfc3339()));
    out.push_str("## Summary\n\n");
    out.push_str(&format!("- Total ACL entries: {total}\n"));
    out.push_str(&format!("- Distinct principals: {}\n", acls.len()));

    for (principal, records) in acls {
        out.push_str(&format!("\n## Principal: {principal}\n\n"));
        out.push_str(&render_table(&HEADERS, &principal_rows(records)));
    }
    out
}
