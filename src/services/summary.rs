//! Ledger aggregates
//!
//! Pure functions over the store's current view. Every aggregate goes
//! through the store's listings, so an active date filter restricts them
//! all in the same way.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::models::{DebtStatus, Money};
use crate::storage::Gateway;

use super::ledger::LedgerStore;

/// Sum of inflow amounts
pub fn total_revenue<G: Gateway>(store: &LedgerStore<G>) -> Money {
    store.inflows().iter().map(|entry| entry.amount).sum()
}

/// Sum of outflow amounts
pub fn total_expenses<G: Gateway>(store: &LedgerStore<G>) -> Money {
    store.outflows().iter().map(|entry| entry.amount).sum()
}

/// Revenue minus expenses
pub fn net_cash_flow<G: Gateway>(store: &LedgerStore<G>) -> Money {
    total_revenue(store) - total_expenses(store)
}

/// Sum of debt principals
pub fn total_debts<G: Gateway>(store: &LedgerStore<G>) -> Money {
    store.debts().iter().map(|debt| debt.amount).sum()
}

pub fn total_operational_costs<G: Gateway>(store: &LedgerStore<G>) -> Money {
    store.operational_costs().iter().map(|cost| cost.amount).sum()
}

pub fn total_fixed_costs<G: Gateway>(store: &LedgerStore<G>) -> Money {
    store.fixed_costs().iter().map(|cost| cost.amount).sum()
}

pub fn total_variable_costs<G: Gateway>(store: &LedgerStore<G>) -> Money {
    store.variable_costs().iter().map(|cost| cost.amount).sum()
}

/// Operational cost totals per category, largest first
pub fn costs_by_category<G: Gateway>(store: &LedgerStore<G>) -> Vec<(String, Money)> {
    let mut totals: HashMap<&str, Money> = HashMap::new();
    for cost in store.operational_costs() {
        *totals.entry(cost.category.as_str()).or_default() += cost.amount;
    }

    let mut totals: Vec<(String, Money)> = totals
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
}

pub fn inflow_count<G: Gateway>(store: &LedgerStore<G>) -> usize {
    store.inflows().len()
}

pub fn outflow_count<G: Gateway>(store: &LedgerStore<G>) -> usize {
    store.outflows().len()
}

pub fn overdue_debt_count<G: Gateway>(store: &LedgerStore<G>) -> usize {
    store
        .debts()
        .iter()
        .filter(|debt| debt.status == DebtStatus::Overdue)
        .count()
}

/// Unresolved debts due between `today` and `today + days`, inclusive
pub fn debts_due_within<G: Gateway>(store: &LedgerStore<G>, today: NaiveDate, days: u32) -> usize {
    let horizon = today
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    store
        .debts()
        .iter()
        .filter(|debt| !debt.status.is_resolved())
        .filter(|debt| debt.due_date >= today && debt.due_date <= horizon)
        .count()
}

/// Share of debts already resolved, as a whole percentage
pub fn resolution_rate<G: Gateway>(store: &LedgerStore<G>) -> u32 {
    let debts = store.debts();
    if debts.is_empty() {
        return 0;
    }
    let resolved = debts.iter().filter(|debt| debt.status.is_resolved()).count();
    ((resolved as f64 / debts.len() as f64) * 100.0).round() as u32
}

/// Every aggregate at once, as shown by the summary command
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub date_filter: Option<NaiveDate>,
    pub total_revenue: Money,
    pub total_expenses: Money,
    pub net_cash_flow: Money,
    pub inflow_count: usize,
    pub outflow_count: usize,
    pub total_operational_costs: Money,
    pub total_fixed_costs: Money,
    pub total_variable_costs: Money,
    pub costs_by_category: Vec<(String, Money)>,
    pub total_debts: Money,
    pub debt_count: usize,
    pub overdue_debts: usize,
    pub debts_due_soon: usize,
    pub window_days: u32,
    pub resolution_rate: u32,
}

impl LedgerSummary {
    pub fn compute<G: Gateway>(store: &LedgerStore<G>, today: NaiveDate, window_days: u32) -> Self {
        Self {
            date_filter: store.date_filter(),
            total_revenue: total_revenue(store),
            total_expenses: total_expenses(store),
            net_cash_flow: net_cash_flow(store),
            inflow_count: inflow_count(store),
            outflow_count: outflow_count(store),
            total_operational_costs: total_operational_costs(store),
            total_fixed_costs: total_fixed_costs(store),
            total_variable_costs: total_variable_costs(store),
            costs_by_category: costs_by_category(store),
            total_debts: total_debts(store),
            debt_count: store.debts().len(),
            overdue_debts: overdue_debt_count(store),
            debts_due_soon: debts_due_within(store, today, window_days),
            window_days,
            resolution_rate: resolution_rate(store),
        }
    }
}
