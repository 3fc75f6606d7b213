//! Operational cost model
//!
//! Running costs of the business. Most are entered by hand; installment
//! costs are derived from debts and point back at them through `debt_id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::debt::Debt;
use super::ids::{DebtId, OperationalCostId};
use super::money::Money;

/// Category given to installment costs derived from debts
pub const FINANCIAL_CATEGORY: &str = "financial";

/// Description prefix of installment costs derived from debts
pub const INSTALLMENT_PREFIX: &str = "Installment - ";

/// Whether a cost recurs at a fixed amount or varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostType {
    Fixed,
    Variable,
}

impl CostType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Some(Self::Fixed),
            "variable" => Some(Self::Variable),
            _ => None,
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "Fixed"),
            Self::Variable => write!(f, "Variable"),
        }
    }
}

/// A persisted operational cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalCost {
    pub id: OperationalCostId,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type")]
    pub cost_type: CostType,

    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default)]
    pub category: String,

    /// The debt this cost is the installment of, if any
    #[serde(default)]
    pub debt_id: Option<DebtId>,

    pub created_at: DateTime<Utc>,
}

impl OperationalCost {
    /// Check whether this cost looks like the installment of a debt owed to
    /// `creditor`, going by category, type and description only
    pub fn matches_installment_convention(&self, creditor: &str) -> bool {
        self.cost_type == CostType::Fixed
            && self.category == FINANCIAL_CATEGORY
            && self.description == installment_description(creditor)
    }

    pub fn is_installment(&self) -> bool {
        self.debt_id.is_some()
    }
}

impl fmt::Display for OperationalCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.cost_type,
            self.description,
            self.amount
        )
    }
}

/// Description used for the installment cost of a debt
pub fn installment_description(creditor: &str) -> String {
    format!("{}{}", INSTALLMENT_PREFIX, creditor)
}

/// Fields supplied when creating an operational cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOperationalCost {
    pub description: String,
    #[serde(rename = "type")]
    pub cost_type: CostType,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_id: Option<DebtId>,
}

impl NewOperationalCost {
    pub fn new(
        description: impl Into<String>,
        cost_type: CostType,
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            cost_type,
            amount,
            date,
            category: category.into(),
            debt_id: None,
        }
    }

    /// The fixed monthly installment cost derived from a stored debt
    pub fn installment_of(debt: &Debt) -> Self {
        Self {
            description: installment_description(&debt.creditor),
            cost_type: CostType::Fixed,
            amount: debt.installment_value,
            date: debt.due_date,
            category: FINANCIAL_CATEGORY.to_string(),
            debt_id: Some(debt.id),
        }
    }
}

/// Partial update for an operational cost
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationalCostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub cost_type: Option<CostType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl OperationalCostPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
