//! Smart entry: turn free text into a ledger record
//!
//! An [`EntryClassifier`] returns raw JSON for a description. Its output is
//! never trusted: [`normalize`] validates it field by field, and a failing
//! classifier degrades to [`ClassifiedEntry::fallback`] instead of an error.
//! The resulting guess can be edited before [`commit`] adds it to the store.

pub mod client;
pub mod guess;

pub use client::HttpClassifier;
pub use guess::{
    normalize, ClassifiedEntry, EntryGuess, EntryKind, LedgerDraft, NegotiationTerms,
};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CashFlowEntry, OperationalCost};
use crate::services::{DebtCreation, LedgerStore};
use crate::storage::Gateway;

/// Something that can guess a ledger entry from a free-text description
pub trait EntryClassifier {
    fn classify(&self, text: &str) -> LedgerResult<Value>;
}

impl<C: EntryClassifier + ?Sized> EntryClassifier for &C {
    fn classify(&self, text: &str) -> LedgerResult<Value> {
        (**self).classify(text)
    }
}

/// Stand-in used when no classification endpoint is configured
///
/// Every call fails, so smart entry starts from the default guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClassifier;

impl EntryClassifier for OfflineClassifier {
    fn classify(&self, _text: &str) -> LedgerResult<Value> {
        Err(LedgerError::Classifier(
            "no classification endpoint configured".into(),
        ))
    }
}

/// Classify `text`, falling back to a default guess on any failure
pub fn classify_or_default<C: EntryClassifier>(
    classifier: &C,
    text: &str,
    today: NaiveDate,
) -> ClassifiedEntry {
    match classifier.classify(text) {
        Ok(raw) => normalize(&raw, today),
        Err(e) => {
            warn!(error = %e, "classification failed, using default guess");
            ClassifiedEntry::fallback(text, today)
        }
    }
}

/// Record created from a committed guess
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    CashFlow(CashFlowEntry),
    Operational(OperationalCost),
    Debt(DebtCreation),
}

/// Add a guess to the collection its kind names
pub fn commit<G: Gateway>(
    store: &mut LedgerStore<G>,
    entry: ClassifiedEntry,
) -> LedgerResult<Committed> {
    match entry.into_draft() {
        LedgerDraft::CashFlow(draft) => store.add_cash_flow_entry(draft).map(Committed::CashFlow),
        LedgerDraft::Operational(draft) => {
            store.add_operational_cost(draft).map(Committed::Operational)
        }
        LedgerDraft::Debt(draft) => store.add_debt(draft).map(Committed::Debt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlowType, Money};
    use crate::storage::MemoryGateway;
    use serde_json::json;

    struct Canned(Value);

    impl EntryClassifier for Canned {
        fn classify(&self, _text: &str) -> LedgerResult<Value> {
            Ok(self.0.clone())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    #[test]
    fn test_failure_degrades_to_default_guess() {
        let entry = classify_or_default(&OfflineClassifier, "  Paid the plumber  ", today());

        assert_eq!(entry.kind(), EntryKind::CashFlow);
        let guess = entry.guess();
        assert_eq!(guess.description, "Paid the plumber");
        assert_eq!(guess.flow_type, FlowType::Outflow);
        assert_eq!(guess.amount, Money::zero());
        assert_eq!(guess.date, today());
    }

    #[test]
    fn test_cash_flow_guess_commits_entry() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let classifier = Canned(json!({"entryType": "cashflow", "type": "entrada", "amount": 250,
                                       "suggestedDescription": "Cake order"}));

        let entry = classify_or_default(&classifier, "cake order 250", today());
        let committed = commit(&mut store, entry).unwrap();

        match committed {
            Committed::CashFlow(entry) => {
                assert_eq!(entry.flow_type, FlowType::Inflow);
                assert_eq!(entry.amount, Money::from_cents(25_000));
            }
            other => panic!("expected cash-flow entry, got {:?}", other),
        }
        assert_eq!(store.inflows().len(), 1);
    }

    #[test]
    fn test_negotiation_guess_commits_debt_and_installment() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        let classifier = Canned(json!({"entryType": "negotiation", "amount": 900,
                                       "creditor": "BankX", "installments": 3,
                                       "installmentValue": 320}));

        let entry = classify_or_default(&classifier, "renegotiated with BankX", today());
        let committed = commit(&mut store, entry).unwrap();

        match committed {
            Committed::Debt(creation) => {
                assert_eq!(creation.debt.total_with_interest, Money::from_cents(96_000));
                let cost = creation.installment_cost.unwrap();
                assert_eq!(cost.amount, Money::from_cents(32_000));
                assert_eq!(cost.debt_id, Some(creation.debt.id));
            }
            other => panic!("expected debt, got {:?}", other),
        }
        assert_eq!(store.debts().len(), 1);
        assert_eq!(store.operational_costs().len(), 1);
    }

    #[test]
    fn test_edited_guess_commits_as_operational_cost() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();

        let mut entry = classify_or_default(&OfflineClassifier, "rent", today()).with_kind(EntryKind::Operational);
        entry.guess_mut().amount = Money::from_cents(180_000);
        entry.guess_mut().flow_type = FlowType::Inflow;

        let committed = commit(&mut store, entry).unwrap();
        assert!(matches!(committed, Committed::Operational(_)));
        assert_eq!(store.fixed_costs().len(), 1);
    }

    #[test]
    fn test_gateway_failure_on_commit_is_reported() {
        let gateway = MemoryGateway::new();
        let mut store = LedgerStore::open(&gateway).unwrap();
        gateway.set_failing(true);

        let entry = classify_or_default(&OfflineClassifier, "anything", today());
        let err = commit(&mut store, entry).unwrap_err();
        assert!(err.is_gateway());
        assert!(store.cash_flow_entries().is_empty());
    }
}
