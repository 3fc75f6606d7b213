//! Core data models for bizledger
//!
//! The three ledger collections (cash-flow entries, operational costs and
//! debts), their ids, and the money type they share. Each record type comes
//! with a draft type used for creation and a patch type used for partial
//! updates.

pub mod cash_flow;
pub mod debt;
pub mod ids;
pub mod money;
pub mod operational_cost;

pub use cash_flow::{CashFlowEntry, CashFlowEntryPatch, EntryStatus, FlowType, NewCashFlowEntry, PaymentMethod};
pub use debt::{Debt, DebtPatch, DebtPlanError, DebtStatus, NewDebt};
pub use ids::{CashFlowEntryId, DebtId, OperationalCostId};
pub use money::Money;
pub use operational_cost::{
    installment_description, CostType, NewOperationalCost, OperationalCost, OperationalCostPatch,
    FINANCIAL_CATEGORY,
};
