//! Ledger store
//!
//! The single source of truth for the three ledger collections. Every
//! mutation goes through the gateway first and is applied to memory only
//! once the gateway has accepted it, using the row the gateway returned.
//! A gateway failure leaves memory exactly as it was.
//!
//! Debts own a derived installment cost: adding a debt with a positive
//! installment value also adds the cost, and deleting the debt deletes it.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, AuditLogger, Operation as AuditOperation};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    CashFlowEntry, CashFlowEntryId, CashFlowEntryPatch, CostType, Debt, DebtId, DebtPatch,
    FlowType, NewCashFlowEntry, NewDebt, NewOperationalCost, OperationalCost, OperationalCostId,
    OperationalCostPatch,
};
use crate::storage::{Gateway, Record};

/// Result of adding a debt
#[derive(Debug, Clone, PartialEq)]
pub struct DebtCreation {
    pub debt: Debt,
    /// The derived installment cost, absent when the installment value is zero
    pub installment_cost: Option<OperationalCost>,
}

/// Result of deleting a debt
#[derive(Debug, Clone, PartialEq)]
pub struct DebtDeletion {
    pub debt: Debt,
    /// The linked installment cost that was removed with it
    pub installment_cost: Option<OperationalCost>,
    /// A linked cost that could not be removed and is still stored
    pub orphaned_cost: Option<OperationalCost>,
}

#[derive(Debug, Default)]
struct Collections {
    cash_flow_entries: Vec<CashFlowEntry>,
    operational_costs: Vec<OperationalCost>,
    debts: Vec<Debt>,
}

/// Records the store keeps in memory
trait Collected: Record {
    fn rows(collections: &Collections) -> &Vec<Self>;
    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self>;
    fn matches(&self, identifier: &str) -> bool;
}

impl Collected for CashFlowEntry {
    fn rows(collections: &Collections) -> &Vec<Self> {
        &collections.cash_flow_entries
    }

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.cash_flow_entries
    }

    fn matches(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
}

impl Collected for OperationalCost {
    fn rows(collections: &Collections) -> &Vec<Self> {
        &collections.operational_costs
    }

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.operational_costs
    }

    fn matches(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
}

impl Collected for Debt {
    fn rows(collections: &Collections) -> &Vec<Self> {
        &collections.debts
    }

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.debts
    }

    fn matches(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
}

/// The ledger: three collections over an injected gateway
pub struct LedgerStore<G: Gateway> {
    gateway: G,
    collections: Collections,
    date_filter: Option<NaiveDate>,
    audit: Option<AuditLogger>,
}

impl<G: Gateway> LedgerStore<G> {
    /// Create a store and perform the initial load from the gateway
    pub fn open(gateway: G) -> LedgerResult<Self> {
        let mut store = Self {
            gateway,
            collections: Collections::default(),
            date_filter: None,
            audit: None,
        };
        store.reload()?;
        Ok(store)
    }

    /// Record every successful mutation in an audit log
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replace memory with a fresh load of all three tables
    ///
    /// Memory is only replaced once all three loads succeeded.
    pub fn reload(&mut self) -> LedgerResult<()> {
        let mut cash_flow_entries = self.gateway.select_all::<CashFlowEntry>()?;
        let mut operational_costs = self.gateway.select_all::<OperationalCost>()?;
        let mut debts = self.gateway.select_all::<Debt>()?;

        // Gateways list newest first; memory keeps insertion order
        cash_flow_entries.reverse();
        operational_costs.reverse();
        debts.reverse();

        debug!(
            cash_flow_entries = cash_flow_entries.len(),
            operational_costs = operational_costs.len(),
            debts = debts.len(),
            "loaded ledger"
        );

        self.collections = Collections {
            cash_flow_entries,
            operational_costs,
            debts,
        };
        Ok(())
    }

    // ----- date filter -----

    /// Restrict every listing and aggregate to one date, or clear with `None`
    pub fn set_date_filter(&mut self, date: Option<NaiveDate>) {
        self.date_filter = date;
    }

    pub fn date_filter(&self) -> Option<NaiveDate> {
        self.date_filter
    }

    fn visible<R: Collected>(&self) -> Vec<&R> {
        R::rows(&self.collections)
            .iter()
            .rev()
            .filter(|record| {
                self.date_filter
                    .map_or(true, |date| record.ledger_date() == date)
            })
            .collect()
    }

    // ----- listings (filtered, most recent first) -----

    pub fn cash_flow_entries(&self) -> Vec<&CashFlowEntry> {
        self.visible()
    }

    pub fn operational_costs(&self) -> Vec<&OperationalCost> {
        self.visible()
    }

    pub fn debts(&self) -> Vec<&Debt> {
        self.visible()
    }

    pub fn inflows(&self) -> Vec<&CashFlowEntry> {
        self.flows(FlowType::Inflow)
    }

    pub fn outflows(&self) -> Vec<&CashFlowEntry> {
        self.flows(FlowType::Outflow)
    }

    fn flows(&self, flow_type: FlowType) -> Vec<&CashFlowEntry> {
        self.cash_flow_entries()
            .into_iter()
            .filter(|entry| entry.flow_type == flow_type)
            .collect()
    }

    pub fn fixed_costs(&self) -> Vec<&OperationalCost> {
        self.costs(CostType::Fixed)
    }

    pub fn variable_costs(&self) -> Vec<&OperationalCost> {
        self.costs(CostType::Variable)
    }

    fn costs(&self, cost_type: CostType) -> Vec<&OperationalCost> {
        self.operational_costs()
            .into_iter()
            .filter(|cost| cost.cost_type == cost_type)
            .collect()
    }

    // ----- lookups (unfiltered) -----

    fn get<R: Collected>(&self, id: R::Id) -> Option<&R> {
        R::rows(&self.collections).iter().find(|r| r.id() == id)
    }

    fn position<R: Collected>(&self, id: R::Id) -> Option<usize> {
        R::rows(&self.collections).iter().position(|r| r.id() == id)
    }

    pub fn cash_flow_entry(&self, id: CashFlowEntryId) -> Option<&CashFlowEntry> {
        self.get(id)
    }

    pub fn operational_cost(&self, id: OperationalCostId) -> Option<&OperationalCost> {
        self.get(id)
    }

    pub fn debt(&self, id: DebtId) -> Option<&Debt> {
        self.get(id)
    }

    fn find<R: Collected>(&self, identifier: &str) -> LedgerResult<&R> {
        let matches: Vec<&R> = R::rows(&self.collections)
            .iter()
            .filter(|record| record.matches(identifier))
            .collect();

        match matches.as_slice() {
            [] => Err(R::TABLE.not_found(identifier)),
            [record] => Ok(*record),
            many => Err(LedgerError::Validation(format!(
                "'{}' matches {} records, use a longer id",
                identifier,
                many.len()
            ))),
        }
    }

    /// Find a cash-flow entry by full id, short id or id prefix
    pub fn find_cash_flow_entry(&self, identifier: &str) -> LedgerResult<&CashFlowEntry> {
        self.find(identifier)
    }

    /// Find an operational cost by full id, short id or id prefix
    pub fn find_operational_cost(&self, identifier: &str) -> LedgerResult<&OperationalCost> {
        self.find(identifier)
    }

    /// Find a debt by full id, short id or id prefix
    pub fn find_debt(&self, identifier: &str) -> LedgerResult<&Debt> {
        self.find(identifier)
    }

    /// The installment cost derived from a debt
    ///
    /// Costs carrying the debt's id win; costs without any back-reference
    /// are matched by the installment naming convention.
    pub fn linked_installment_cost(&self, debt: &Debt) -> Option<&OperationalCost> {
        let costs = &self.collections.operational_costs;
        costs
            .iter()
            .find(|cost| cost.debt_id == Some(debt.id))
            .or_else(|| {
                costs.iter().find(|cost| {
                    cost.debt_id.is_none() && cost.matches_installment_convention(&debt.creditor)
                })
            })
    }

    // ----- mutations -----

    pub fn add_cash_flow_entry(&mut self, draft: NewCashFlowEntry) -> LedgerResult<CashFlowEntry> {
        self.insert(&draft)
    }

    pub fn add_operational_cost(
        &mut self,
        draft: NewOperationalCost,
    ) -> LedgerResult<OperationalCost> {
        self.insert(&draft)
    }

    /// Add a debt together with its installment cost
    ///
    /// Neither record reaches memory unless both gateway inserts succeed. If
    /// the cost insert fails the debt row is deleted again before the error
    /// is returned.
    pub fn add_debt(&mut self, draft: NewDebt) -> LedgerResult<DebtCreation> {
        let draft = draft
            .normalized()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        let debt: Debt = self.gateway.insert(&draft).map_err(|e| {
            warn!(error = %e, creditor = %draft.creditor, "failed to insert debt");
            e
        })?;

        let installment_cost = if debt.has_installment() {
            let cost_draft = NewOperationalCost::installment_of(&debt);
            match self.gateway.insert::<OperationalCost>(&cost_draft) {
                Ok(cost) => Some(cost),
                Err(err) => {
                    warn!(
                        error = %err,
                        debt = %debt.id,
                        "failed to insert installment cost, removing debt"
                    );
                    if let Err(compensation) = self.gateway.delete::<Debt>(debt.id) {
                        warn!(
                            error = %compensation,
                            debt = %debt.id,
                            "failed to remove debt after installment cost failure"
                        );
                    }
                    return Err(err);
                }
            }
        } else {
            None
        };

        self.collections.debts.push(debt.clone());
        self.audit_create(&debt);
        if let Some(cost) = &installment_cost {
            self.collections.operational_costs.push(cost.clone());
            self.audit_create(cost);
        }

        info!(debt = %debt.id, creditor = %debt.creditor, "added debt");
        Ok(DebtCreation {
            debt,
            installment_cost,
        })
    }

    pub fn update_cash_flow_entry(
        &mut self,
        id: CashFlowEntryId,
        patch: CashFlowEntryPatch,
    ) -> LedgerResult<CashFlowEntry> {
        let empty = patch.is_empty();
        self.update(id, &patch, empty)
    }

    pub fn update_operational_cost(
        &mut self,
        id: OperationalCostId,
        patch: OperationalCostPatch,
    ) -> LedgerResult<OperationalCost> {
        let empty = patch.is_empty();
        self.update(id, &patch, empty)
    }

    /// Update a debt, keeping its total consistent with the installment plan
    pub fn update_debt(&mut self, id: DebtId, patch: DebtPatch) -> LedgerResult<Debt> {
        let current = self
            .debt(id)
            .ok_or_else(|| LedgerError::debt_not_found(id.to_string()))?;
        let patch = patch
            .with_recomputed_total(current)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        let empty = patch.is_empty();
        self.update(id, &patch, empty)
    }

    pub fn delete_cash_flow_entry(
        &mut self,
        id: CashFlowEntryId,
    ) -> LedgerResult<Option<CashFlowEntry>> {
        self.remove(id)
    }

    pub fn delete_operational_cost(
        &mut self,
        id: OperationalCostId,
    ) -> LedgerResult<Option<OperationalCost>> {
        self.remove(id)
    }

    /// Delete a debt and its linked installment cost
    ///
    /// A missing linked cost is not an error. A linked cost the gateway
    /// refuses to delete is reported as orphaned.
    pub fn delete_debt(&mut self, id: DebtId) -> LedgerResult<Option<DebtDeletion>> {
        let debt = match self.remove::<Debt>(id)? {
            Some(debt) => debt,
            None => return Ok(None),
        };

        let mut deletion = DebtDeletion {
            installment_cost: None,
            orphaned_cost: None,
            debt,
        };

        let linked = self
            .linked_installment_cost(&deletion.debt)
            .map(|cost| cost.id);

        match linked {
            Some(cost_id) => match self.remove::<OperationalCost>(cost_id) {
                Ok(removed) => deletion.installment_cost = removed,
                Err(err) => {
                    warn!(
                        error = %err,
                        debt = %deletion.debt.id,
                        cost = %cost_id,
                        "installment cost left behind after debt deletion"
                    );
                    deletion.orphaned_cost = self.operational_cost(cost_id).cloned();
                }
            },
            None => debug!(debt = %deletion.debt.id, "no installment cost linked to debt"),
        }

        Ok(Some(deletion))
    }

    // ----- generic plumbing -----

    fn insert<R: Collected>(&mut self, draft: &R::Draft) -> LedgerResult<R> {
        let record = self.gateway.insert::<R>(draft).map_err(|e| {
            warn!(error = %e, table = %R::TABLE, "insert failed");
            e
        })?;

        R::rows_mut(&mut self.collections).push(record.clone());
        self.audit_create(&record);
        Ok(record)
    }

    fn update<R: Collected>(&mut self, id: R::Id, patch: &R::Patch, empty: bool) -> LedgerResult<R> {
        let index = self
            .position::<R>(id)
            .ok_or_else(|| R::TABLE.not_found(id.to_string()))?;

        if empty {
            return Ok(R::rows(&self.collections)[index].clone());
        }

        let updated = self.gateway.update::<R>(id, patch).map_err(|e| {
            warn!(error = %e, table = %R::TABLE, id = %id, "update failed");
            e
        })?;

        let before = std::mem::replace(
            &mut R::rows_mut(&mut self.collections)[index],
            updated.clone(),
        );
        self.audit_update(&before, &updated);
        Ok(updated)
    }

    fn remove<R: Collected>(&mut self, id: R::Id) -> LedgerResult<Option<R>> {
        let index = match self.position::<R>(id) {
            Some(index) => index,
            None => return Ok(None),
        };

        let existed = self.gateway.delete::<R>(id).map_err(|e| {
            warn!(error = %e, table = %R::TABLE, id = %id, "delete failed");
            e
        })?;
        if !existed {
            debug!(table = %R::TABLE, id = %id, "row was already gone from the gateway");
        }

        let removed = R::rows_mut(&mut self.collections).remove(index);
        self.audit_delete(&removed);
        Ok(Some(removed))
    }

    // ----- audit -----

    fn audit(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.append(&entry) {
                warn!(error = %e, "failed to write audit entry");
            }
        }
    }

    fn audit_entry<R: Record>(operation: AuditOperation, record: &R) -> AuditEntry {
        AuditEntry::new(operation, R::TABLE.entity_type(), record.id().to_string())
            .with_label(record.label())
    }

    fn audit_create<R: Record>(&self, record: &R) {
        self.audit(Self::audit_entry(AuditOperation::Create, record).with_after(record));
    }

    fn audit_update<R: Record>(&self, before: &R, after: &R) {
        self.audit(
            Self::audit_entry(AuditOperation::Update, after)
                .with_before(before)
                .with_after(after)
                .with_changes(),
        );
    }

    fn audit_delete<R: Record>(&self, record: &R) {
        self.audit(Self::audit_entry(AuditOperation::Delete, record).with_before(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DebtStatus, EntryStatus, Money, FINANCIAL_CATEGORY};
    use crate::storage::{JsonGateway, MemoryGateway, Operation, Table};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(flow_type: FlowType, cents: i64, on: NaiveDate) -> NewCashFlowEntry {
        NewCashFlowEntry::new("Entry", flow_type, Money::from_cents(cents), on, "other")
    }

    fn bank_x() -> NewDebt {
        NewDebt::new(
            "BankX",
            Money::from_cents(1_000_000),
            10,
            Money::from_cents(100_000),
            date(2025, 3, 1),
        )
    }

    fn rent() -> NewOperationalCost {
        NewOperationalCost::new(
            "Rent",
            CostType::Fixed,
            Money::from_cents(200_000),
            date(2025, 3, 5),
            "facilities",
        )
    }

    #[test]
    fn test_add_cash_flow_entry_uses_canonical_row() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();

        let added = store
            .add_cash_flow_entry(entry(FlowType::Inflow, 0, date(2025, 1, 1)))
            .unwrap();

        assert_eq!(store.cash_flow_entries(), vec![&added]);
        assert_eq!(gateway.row_count(Table::CashFlowEntries), 1);
        assert!(added.amount.is_zero());
    }

    #[test]
    fn test_add_debt_creates_installment_cost() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();

        let created = store.add_debt(bank_x()).unwrap();
        let cost = created.installment_cost.unwrap();

        assert_eq!(cost.amount, Money::from_cents(100_000));
        assert_eq!(cost.cost_type, CostType::Fixed);
        assert_eq!(cost.category, FINANCIAL_CATEGORY);
        assert_eq!(cost.date, date(2025, 3, 1));
        assert_eq!(cost.debt_id, Some(created.debt.id));
        assert_eq!(created.debt.total_with_interest, Money::from_cents(1_000_000));

        let deleted = store.delete_debt(created.debt.id).unwrap().unwrap();
        assert_eq!(deleted.installment_cost.map(|c| c.id), Some(cost.id));
        assert!(store.operational_costs().is_empty());
        assert!(store.debts().is_empty());
        assert_eq!(gateway.row_count(Table::OperationalCosts), 0);
    }

    #[test]
    fn test_one_financial_cost_per_debt() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();

        for (creditor, installment) in [("BankX", 1000), ("BankY", 250), ("Supplier", 1)] {
            let draft = NewDebt::new(
                creditor,
                Money::from_cents(50_000),
                3,
                Money::from_cents(installment),
                date(2025, 4, 1),
            );
            store.add_debt(draft).unwrap();
        }
        store.add_operational_cost(rent()).unwrap();

        let financial = store
            .operational_costs()
            .into_iter()
            .filter(|cost| cost.category == FINANCIAL_CATEGORY)
            .count();
        assert_eq!(financial, 3);
    }

    #[test]
    fn test_debt_without_installment_value_has_no_cost() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();

        let draft = NewDebt::new(
            "BankX",
            Money::from_cents(1_000),
            1,
            Money::zero(),
            date(2025, 3, 1),
        );
        let created = store.add_debt(draft).unwrap();

        assert!(created.installment_cost.is_none());
        assert!(store.operational_costs().is_empty());
    }

    #[test]
    fn test_failed_installment_insert_rolls_back_debt() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        gateway.fail_on(Operation::Insert, Table::OperationalCosts);

        let err = store.add_debt(bank_x()).unwrap_err();

        assert!(err.is_gateway());
        assert!(store.debts().is_empty());
        assert!(store.operational_costs().is_empty());
        assert_eq!(gateway.row_count(Table::Debts), 0);
    }

    #[test]
    fn test_failed_compensation_still_reports_error() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        gateway.fail_on(Operation::Insert, Table::OperationalCosts);
        gateway.fail_on(Operation::Delete, Table::Debts);

        assert!(store.add_debt(bank_x()).is_err());
        assert!(store.debts().is_empty());
        // The debt row survives remotely and shows up on the next load
        assert_eq!(gateway.row_count(Table::Debts), 1);

        gateway.clear_failures();
        store.reload().unwrap();
        assert_eq!(store.debts().len(), 1);
    }

    #[test]
    fn test_gateway_failure_leaves_memory_unchanged() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let sale = store
            .add_cash_flow_entry(entry(FlowType::Inflow, 500, date(2025, 1, 1)))
            .unwrap();
        let cost = store.add_operational_cost(rent()).unwrap();

        gateway.set_failing(true);

        assert!(store
            .add_cash_flow_entry(entry(FlowType::Outflow, 100, date(2025, 1, 1)))
            .is_err());
        assert!(store.add_debt(bank_x()).is_err());

        let patch = CashFlowEntryPatch {
            amount: Some(Money::from_cents(999)),
            ..Default::default()
        };
        assert!(store.update_cash_flow_entry(sale.id, patch).is_err());
        assert!(store.delete_operational_cost(cost.id).is_err());

        assert_eq!(store.cash_flow_entries(), vec![&sale]);
        assert_eq!(store.operational_costs(), vec![&cost]);
        assert!(store.debts().is_empty());
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let sale = store
            .add_cash_flow_entry(entry(FlowType::Inflow, 500, date(2025, 1, 1)))
            .unwrap();

        let patch = CashFlowEntryPatch {
            status: Some(EntryStatus::Paid),
            ..Default::default()
        };
        let updated = store.update_cash_flow_entry(sale.id, patch).unwrap();

        assert_eq!(updated.status, Some(EntryStatus::Paid));
        assert_eq!(updated.amount, sale.amount);
        assert_eq!(updated.description, sale.description);
        assert_eq!(store.cash_flow_entry(sale.id), Some(&updated));
    }

    #[test]
    fn test_empty_patch_is_a_no_op() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let sale = store
            .add_cash_flow_entry(entry(FlowType::Inflow, 500, date(2025, 1, 1)))
            .unwrap();
        let cost = store.add_operational_cost(rent()).unwrap();
        let debt = store.add_debt(bank_x()).unwrap().debt;
        let calls = gateway.calls();

        let same_sale = store
            .update_cash_flow_entry(sale.id, CashFlowEntryPatch::default())
            .unwrap();
        let same_cost = store
            .update_operational_cost(cost.id, OperationalCostPatch::default())
            .unwrap();
        let same_debt = store.update_debt(debt.id, DebtPatch::default()).unwrap();

        assert_eq!(
            serde_json::to_string(&same_sale).unwrap(),
            serde_json::to_string(&sale).unwrap()
        );
        assert_eq!(same_cost, cost);
        assert_eq!(same_debt, debt);
        assert_eq!(gateway.calls(), calls);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let calls = gateway.calls();

        let err = store
            .update_cash_flow_entry(CashFlowEntryId::new(), CashFlowEntryPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store
            .update_operational_cost(OperationalCostId::new(), OperationalCostPatch::default())
            .unwrap_err()
            .is_not_found());
        assert!(store
            .update_debt(DebtId::new(), DebtPatch::default())
            .unwrap_err()
            .is_not_found());
        assert_eq!(gateway.calls(), calls);
    }

    #[test]
    fn test_delete_nonexistent_is_a_no_op() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        store.add_operational_cost(rent()).unwrap();
        let calls = gateway.calls();

        assert_eq!(store.delete_cash_flow_entry(CashFlowEntryId::new()).unwrap(), None);
        assert_eq!(store.delete_operational_cost(OperationalCostId::new()).unwrap(), None);
        assert_eq!(store.delete_debt(DebtId::new()).unwrap(), None);
        assert_eq!(store.operational_costs().len(), 1);
        assert_eq!(gateway.calls(), calls);
    }

    #[test]
    fn test_update_debt_recomputes_total() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let debt = store.add_debt(bank_x()).unwrap().debt;

        let patch = DebtPatch {
            installments: Some(12),
            status: Some(DebtStatus::Negotiating),
            ..Default::default()
        };
        let updated = store.update_debt(debt.id, patch).unwrap();

        assert_eq!(updated.installments, 12);
        assert_eq!(updated.total_with_interest, Money::from_cents(1_200_000));
        assert_eq!(updated.status, DebtStatus::Negotiating);
        assert_eq!(updated.creditor, "BankX");
    }

    #[test]
    fn test_renamed_installment_cost_is_still_deleted() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let created = store.add_debt(bank_x()).unwrap();
        let cost = created.installment_cost.unwrap();

        let patch = OperationalCostPatch {
            description: Some("Loan payment".into()),
            ..Default::default()
        };
        store.update_operational_cost(cost.id, patch).unwrap();

        let deleted = store.delete_debt(created.debt.id).unwrap().unwrap();
        assert_eq!(deleted.installment_cost.map(|c| c.id), Some(cost.id));
        assert!(store.operational_costs().is_empty());
    }

    #[test]
    fn test_cost_without_back_reference_matched_by_name() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();

        let debt = store
            .add_debt(NewDebt::new(
                "BankX",
                Money::from_cents(1_000),
                1,
                Money::zero(),
                date(2025, 3, 1),
            ))
            .unwrap()
            .debt;
        let legacy = store
            .add_operational_cost(NewOperationalCost::new(
                "Installment - BankX",
                CostType::Fixed,
                Money::from_cents(1_000),
                date(2025, 3, 1),
                FINANCIAL_CATEGORY,
            ))
            .unwrap();
        let other = store
            .add_operational_cost(NewOperationalCost::new(
                "Installment - BankXY",
                CostType::Fixed,
                Money::from_cents(1_000),
                date(2025, 3, 1),
                FINANCIAL_CATEGORY,
            ))
            .unwrap();

        let deleted = store.delete_debt(debt.id).unwrap().unwrap();
        assert_eq!(deleted.installment_cost.map(|c| c.id), Some(legacy.id));
        assert_eq!(store.operational_costs(), vec![&other]);
    }

    #[test]
    fn test_debt_deletion_without_linked_cost_succeeds() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let created = store.add_debt(bank_x()).unwrap();
        let cost = created.installment_cost.unwrap();
        store.delete_operational_cost(cost.id).unwrap();

        let deleted = store.delete_debt(created.debt.id).unwrap().unwrap();
        assert!(deleted.installment_cost.is_none());
        assert!(deleted.orphaned_cost.is_none());
        assert!(store.debts().is_empty());
    }

    #[test]
    fn test_orphaned_cost_is_reported() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let created = store.add_debt(bank_x()).unwrap();
        gateway.fail_on(Operation::Delete, Table::OperationalCosts);

        let deleted = store.delete_debt(created.debt.id).unwrap().unwrap();

        assert!(store.debts().is_empty());
        assert_eq!(deleted.orphaned_cost, created.installment_cost);
        assert_eq!(store.operational_costs().len(), 1);
    }

    #[test]
    fn test_date_filter_applies_to_all_collections() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let march = date(2025, 3, 1);

        store
            .add_cash_flow_entry(entry(FlowType::Inflow, 500, march))
            .unwrap();
        store
            .add_cash_flow_entry(entry(FlowType::Outflow, 200, date(2025, 3, 2)))
            .unwrap();
        store.add_operational_cost(rent()).unwrap();
        store.add_debt(bank_x()).unwrap();

        store.set_date_filter(Some(march));
        assert_eq!(store.date_filter(), Some(march));
        assert_eq!(store.cash_flow_entries().len(), 1);
        assert!(store.cash_flow_entries().iter().all(|e| e.date == march));
        // Only the installment cost is dated on the debt's due date
        assert_eq!(store.operational_costs().len(), 1);
        assert_eq!(store.debts().len(), 1);
        assert!(store.outflows().is_empty());

        store.set_date_filter(None);
        assert_eq!(store.cash_flow_entries().len(), 2);
        assert_eq!(store.operational_costs().len(), 2);
    }

    #[test]
    fn test_listings_are_most_recent_first() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let first = store
            .add_cash_flow_entry(entry(FlowType::Inflow, 100, date(2025, 1, 1)))
            .unwrap();
        let second = store
            .add_cash_flow_entry(entry(FlowType::Inflow, 200, date(2025, 1, 1)))
            .unwrap();

        assert_eq!(store.cash_flow_entries(), vec![&second, &first]);
        assert_eq!(store.inflows(), vec![&second, &first]);
    }

    #[test]
    fn test_reopen_restores_insertion_order() {
        let temp_dir = TempDir::new().unwrap();
        let (first, second) = {
            let mut store = LedgerStore::open(JsonGateway::open(temp_dir.path()).unwrap()).unwrap();
            let first = store.add_operational_cost(rent()).unwrap();
            let second = store.add_operational_cost(rent()).unwrap();
            (first, second)
        };

        let store = LedgerStore::open(JsonGateway::open(temp_dir.path()).unwrap()).unwrap();
        let ids: Vec<_> = store.operational_costs().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_overflowing_plan_never_reaches_gateway() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let calls = gateway.calls();

        let huge = Money::from_cents(i64::MAX / 2);
        let draft = NewDebt::new("BankX", huge, 3, huge, date(2025, 3, 1));
        let err = store.add_debt(draft).unwrap_err();

        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(gateway.calls(), calls);
        assert!(store.debts().is_empty());

        let debt = store.add_debt(bank_x()).unwrap().debt;
        let patch = DebtPatch {
            installment_value: Some(huge),
            ..Default::default()
        };
        assert!(matches!(
            store.update_debt(debt.id, patch),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(store.debt(debt.id).unwrap().installments, 10);
    }

    #[test]
    fn test_unavailable_cost_table_blocks_only_costs() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        gateway.fail_table(Table::OperationalCosts);

        assert!(store.add_operational_cost(rent()).unwrap_err().is_gateway());
        assert!(store.add_debt(bank_x()).unwrap_err().is_gateway());
        assert!(store.reload().unwrap_err().is_gateway());
        store
            .add_cash_flow_entry(entry(FlowType::Outflow, 500, date(2025, 3, 2)))
            .unwrap();

        assert!(store.debts().is_empty());
        assert_eq!(gateway.row_count(Table::Debts), 0);
        assert_eq!(store.cash_flow_entries().len(), 1);
    }

    #[test]
    fn test_failed_initial_load() {
        let gateway = MemoryGateway::new();
        gateway.set_failing(true);
        assert!(matches!(LedgerStore::open(&gateway), Err(e) if e.is_gateway()));
    }

    #[test]
    fn test_find_by_short_id() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let debt = store.add_debt(bank_x()).unwrap().debt;

        assert_eq!(store.find_debt(&debt.id.to_string()).unwrap().id, debt.id);
        assert!(store.find_debt("debt-zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_mutations_are_audited() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap().with_audit(logger.clone());

        let created = store.add_debt(bank_x()).unwrap();
        store
            .update_debt(
                created.debt.id,
                DebtPatch {
                    status: Some(DebtStatus::Resolved),
                    ..Default::default()
                },
            )
            .unwrap();
        store.delete_debt(created.debt.id).unwrap();

        let operations: Vec<_> = logger
            .entries()
            .unwrap()
            .into_iter()
            .map(|entry| entry.operation)
            .collect();
        assert_eq!(
            operations,
            vec![
                AuditOperation::Create,
                AuditOperation::Create,
                AuditOperation::Update,
                AuditOperation::Delete,
                AuditOperation::Delete,
            ]
        );
    }
}
