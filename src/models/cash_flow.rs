//! Cash-flow entry model
//!
//! Money coming into (inflow) or leaving (outflow) the business, with an
//! optional settlement status and payment method.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CashFlowEntryId;
use super::money::Money;

/// Direction of a cash-flow entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Inflow,
    Outflow,
}

impl FlowType {
    /// Parse a flow type from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inflow" | "in" | "income" | "revenue" => Some(Self::Inflow),
            "outflow" | "out" | "expense" => Some(Self::Outflow),
            _ => None,
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inflow => write!(f, "Inflow"),
            Self::Outflow => write!(f, "Outflow"),
        }
    }
}

/// Settlement status of a cash-flow entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Confirmed,
    #[default]
    Pending,
    Paid,
}

impl EntryStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Some(Self::Confirmed),
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Pending => write!(f, "Pending"),
            Self::Paid => write!(f, "Paid"),
        }
    }
}

/// How an entry was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Debit,
    Pix,
    Transfer,
    #[default]
    Other,
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            "pix" => Some(Self::Pix),
            "transfer" => Some(Self::Transfer),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Credit => write!(f, "Credit card"),
            Self::Debit => write!(f, "Debit card"),
            Self::Pix => write!(f, "PIX"),
            Self::Transfer => write!(f, "Transfer"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A persisted cash-flow entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    /// Unique identifier, assigned by the gateway
    pub id: CashFlowEntryId,

    #[serde(default)]
    pub description: String,

    /// Inflow or outflow
    #[serde(rename = "type")]
    pub flow_type: FlowType,

    /// Non-negative amount; the direction comes from `flow_type`
    pub amount: Money,

    pub date: NaiveDate,

    /// Free-form category tag
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub status: Option<EntryStatus>,

    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,

    /// When the gateway stored the entry
    pub created_at: DateTime<Utc>,
}

impl CashFlowEntry {
    pub fn is_inflow(&self) -> bool {
        self.flow_type == FlowType::Inflow
    }

    pub fn is_outflow(&self) -> bool {
        self.flow_type == FlowType::Outflow
    }
}

impl fmt::Display for CashFlowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.flow_type,
            self.description,
            self.amount
        )
    }
}

/// Fields supplied when creating a cash-flow entry
///
/// No validation happens here: zero amounts and empty descriptions are
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCashFlowEntry {
    pub description: String,
    #[serde(rename = "type")]
    pub flow_type: FlowType,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: String,
    pub status: Option<EntryStatus>,
    pub payment_method: Option<PaymentMethod>,
}

impl NewCashFlowEntry {
    /// Create a draft with no status or payment method
    pub fn new(
        description: impl Into<String>,
        flow_type: FlowType,
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            flow_type,
            amount,
            date,
            category: category.into(),
            status: None,
            payment_method: None,
        }
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }
}

/// Partial update for a cash-flow entry; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub flow_type: Option<FlowType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntryStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl CashFlowEntryPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
