//! Audit entry data structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::diff::generate_diff;

/// Kind of mutation recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ledger collection a mutated record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    CashFlowEntry,
    OperationalCost,
    Debt,
}

impl EntityType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CashFlowEntry => "CashFlowEntry",
            Self::OperationalCost => "OperationalCost",
            Self::Debt => "Debt",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One successful mutation of a ledger record
///
/// Creates carry only `after`, deletes only `before`, and updates both plus
/// a one-line summary of the changed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,

    /// Short display form of the record id
    pub entity_id: String,

    /// Description or creditor of the record
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<String>,
}

impl AuditEntry {
    /// Entry stamped with the current time and no record snapshots
    pub fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            label: String::new(),
            before: None,
            after: None,
            changes: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Snapshot of the record as it was before the mutation
    pub fn with_before<T: Serialize>(mut self, record: &T) -> Self {
        self.before = serde_json::to_value(record).ok();
        self
    }

    /// Snapshot of the record as stored after the mutation
    pub fn with_after<T: Serialize>(mut self, record: &T) -> Self {
        self.after = serde_json::to_value(record).ok();
        self
    }

    /// Summarize the fields that differ between the two snapshots
    pub fn with_changes(mut self) -> Self {
        self.changes = match (&self.before, &self.after) {
            (Some(before), Some(after)) => generate_diff(before, after),
            _ => None,
        };
        self
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        )?;
        if !self.label.is_empty() {
            write!(f, " ({})", self.label)?;
        }
        if let Some(changes) = &self.changes {
            write!(f, "\n  Changes: {}", changes)?;
        }
        Ok(())
    }
}
