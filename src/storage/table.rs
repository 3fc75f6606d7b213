//! Logical tables and the records stored in them
//!
//! Every gateway exposes the same three tables. A [`Record`] ties a model
//! type to its table, its draft (insert payload) and patch (partial update
//! payload) types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    CashFlowEntry, CashFlowEntryId, CashFlowEntryPatch, Debt, DebtId, DebtPatch, NewCashFlowEntry,
    NewDebt, NewOperationalCost, OperationalCost, OperationalCostId, OperationalCostPatch,
};

/// The three logical tables behind the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    CashFlowEntries,
    OperationalCosts,
    Debts,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::CashFlowEntries, Table::OperationalCosts, Table::Debts];

    /// Table name as seen by the remote store
    pub fn name(&self) -> &'static str {
        match self {
            Self::CashFlowEntries => "cash_flow_entries",
            Self::OperationalCosts => "operational_costs",
            Self::Debts => "debts",
        }
    }

    /// File name used by the JSON file gateway
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// Human-readable name of a single row
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::CashFlowEntries => "Cash-flow entry",
            Self::OperationalCosts => "Operational cost",
            Self::Debts => "Debt",
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::CashFlowEntries => EntityType::CashFlowEntry,
            Self::OperationalCosts => EntityType::OperationalCost,
            Self::Debts => EntityType::Debt,
        }
    }

    pub fn not_found(&self, identifier: impl Into<String>) -> LedgerError {
        LedgerError::NotFound {
            entity_type: self.entity_name(),
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A model type persisted in one of the ledger tables
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + fmt::Display + Serialize;
    type Draft: Serialize;
    type Patch: Serialize;

    const TABLE: Table;

    fn id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;

    /// The date the global date filter is compared against
    fn ledger_date(&self) -> NaiveDate;

    /// Short label used in logs and the audit trail
    fn label(&self) -> String;
}

/// The wire form of an id (its full UUID string)
pub fn id_key<I: Serialize>(id: &I) -> LedgerResult<String> {
    match serde_json::to_value(id)? {
        serde_json::Value::String(key) => Ok(key),
        other => Err(LedgerError::Json(format!("id is not a string: {}", other))),
    }
}

impl Record for CashFlowEntry {
    type Id = CashFlowEntryId;
    type Draft = NewCashFlowEntry;
    type Patch = CashFlowEntryPatch;

    const TABLE: Table = Table::CashFlowEntries;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn ledger_date(&self) -> NaiveDate {
        self.date
    }

    fn label(&self) -> String {
        self.description.clone()
    }
}

impl Record for OperationalCost {
    type Id = OperationalCostId;
    type Draft = NewOperationalCost;
    type Patch = OperationalCostPatch;

    const TABLE: Table = Table::OperationalCosts;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn ledger_date(&self) -> NaiveDate {
        self.date
    }

    fn label(&self) -> String {
        self.description.clone()
    }
}

impl Record for Debt {
    type Id = DebtId;
    type Draft = NewDebt;
    type Patch = DebtPatch;

    const TABLE: Table = Table::Debts;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn ledger_date(&self) -> NaiveDate {
        self.due_date
    }

    fn label(&self) -> String {
        self.creditor.clone()
    }
}
