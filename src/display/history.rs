//! Audit history formatting

use crate::audit::AuditEntry;

/// Format audit entries, oldest first
pub fn format_history(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No history recorded yet.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!("{}\n", entry));
    }
    output
}
