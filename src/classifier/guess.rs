//! Structured guesses produced from classifier output
//!
//! Classifier output is untrusted. [`normalize`] never fails: each field is
//! validated on its own and replaced by its default when missing or
//! malformed, so a half-garbled response still yields a usable guess.

use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::models::debt;
use crate::models::{
    CostType, DebtStatus, EntryStatus, FlowType, Money, NewCashFlowEntry, NewDebt,
    NewOperationalCost, PaymentMethod,
};

pub const DEFAULT_CATEGORY: &str = "other";
pub const DEFAULT_DESCRIPTION: &str = "Processed entry";
pub const DEFAULT_CREDITOR: &str = "Not informed";

/// Which collection a guess belongs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    #[default]
    CashFlow,
    Operational,
    Negotiation,
}

impl EntryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cashflow" | "cash_flow" | "cash-flow" => Some(Self::CashFlow),
            "operational" | "cost" => Some(Self::Operational),
            "negotiation" | "debt" => Some(Self::Negotiation),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CashFlow => write!(f, "Cash flow"),
            Self::Operational => write!(f, "Operational cost"),
            Self::Negotiation => write!(f, "Negotiation"),
        }
    }
}

/// Fields shared by every kind of guess
#[derive(Debug, Clone, PartialEq)]
pub struct EntryGuess {
    pub flow_type: FlowType,
    pub amount: Money,
    pub category: String,
    pub payment_method: PaymentMethod,
    pub status: EntryStatus,
    pub description: String,
    pub date: NaiveDate,
}

impl EntryGuess {
    /// The guess used when nothing usable came back
    pub fn fallback(description: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            flow_type: FlowType::Outflow,
            amount: Money::zero(),
            category: DEFAULT_CATEGORY.to_string(),
            payment_method: PaymentMethod::Other,
            status: EntryStatus::Pending,
            description: description.into(),
            date: today,
        }
    }
}

/// Debt-specific fields of a negotiation guess
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NegotiationTerms {
    pub creditor: Option<String>,
    pub installments: Option<u32>,
    pub installment_value: Option<Money>,
    pub due_date: Option<NaiveDate>,
}

/// A validated classifier guess
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEntry {
    CashFlow(EntryGuess),
    Operational(EntryGuess),
    Negotiation(EntryGuess, NegotiationTerms),
}

/// A draft ready to be added to the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerDraft {
    CashFlow(NewCashFlowEntry),
    Operational(NewOperationalCost),
    Debt(NewDebt),
}

impl ClassifiedEntry {
    /// Default cash-flow guess describing the original text
    pub fn fallback(text: &str, today: NaiveDate) -> Self {
        Self::CashFlow(EntryGuess::fallback(text.trim(), today))
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::CashFlow(_) => EntryKind::CashFlow,
            Self::Operational(_) => EntryKind::Operational,
            Self::Negotiation(..) => EntryKind::Negotiation,
        }
    }

    pub fn guess(&self) -> &EntryGuess {
        match self {
            Self::CashFlow(guess) | Self::Operational(guess) | Self::Negotiation(guess, _) => guess,
        }
    }

    pub fn guess_mut(&mut self) -> &mut EntryGuess {
        match self {
            Self::CashFlow(guess) | Self::Operational(guess) | Self::Negotiation(guess, _) => guess,
        }
    }

    pub fn terms(&self) -> Option<&NegotiationTerms> {
        match self {
            Self::Negotiation(_, terms) => Some(terms),
            _ => None,
        }
    }

    /// Re-file the guess under another kind, keeping the shared fields
    pub fn with_kind(self, kind: EntryKind) -> Self {
        let terms = self.terms().cloned().unwrap_or_default();
        let guess = match self {
            Self::CashFlow(guess) | Self::Operational(guess) | Self::Negotiation(guess, _) => guess,
        };
        match kind {
            EntryKind::CashFlow => Self::CashFlow(guess),
            EntryKind::Operational => Self::Operational(guess),
            EntryKind::Negotiation => Self::Negotiation(guess, terms),
        }
    }

    /// Turn the guess into a draft for the matching collection
    pub fn into_draft(self) -> LedgerDraft {
        match self {
            Self::CashFlow(guess) => LedgerDraft::CashFlow(
                NewCashFlowEntry::new(
                    guess.description,
                    guess.flow_type,
                    guess.amount,
                    guess.date,
                    guess.category,
                )
                .with_status(guess.status)
                .with_payment_method(guess.payment_method),
            ),
            Self::Operational(guess) => {
                // Money going out varies; anything else is treated as recurring
                let cost_type = match guess.flow_type {
                    FlowType::Outflow => CostType::Variable,
                    FlowType::Inflow => CostType::Fixed,
                };
                LedgerDraft::Operational(NewOperationalCost::new(
                    guess.description,
                    cost_type,
                    guess.amount,
                    guess.date,
                    guess.category,
                ))
            }
            Self::Negotiation(guess, terms) => {
                let installment_value = terms
                    .installment_value
                    .filter(Money::is_positive)
                    .unwrap_or(guess.amount);
                // A plan whose total does not fit falls back to a single payment
                let installments = terms
                    .installments
                    .filter(|n| debt::total_with_interest(*n, installment_value).is_some())
                    .unwrap_or(1);
                let status = match guess.status {
                    EntryStatus::Confirmed => DebtStatus::Negotiating,
                    _ => DebtStatus::Pending,
                };

                let mut debt = NewDebt::new(
                    terms.creditor.unwrap_or_else(|| DEFAULT_CREDITOR.to_string()),
                    guess.amount,
                    installments,
                    installment_value,
                    terms.due_date.unwrap_or(guess.date),
                )
                .with_description(guess.description.clone())
                .with_status(status);
                debt.justification = guess.description;
                LedgerDraft::Debt(debt)
            }
        }
    }
}

/// Validate raw classifier output into a guess
///
/// An array is replaced by its first element, and a `{"fallback": {...}}`
/// failure body by the fallback object. Anything that is not an object then
/// counts as an empty object.
pub fn normalize(raw: &Value, today: NaiveDate) -> ClassifiedEntry {
    let empty = Map::new();
    let fields = unwrap_object(raw).unwrap_or(&empty);

    let guess = EntryGuess {
        flow_type: field(fields, &["type"])
            .and_then(Value::as_str)
            .and_then(parse_flow_type)
            .unwrap_or(FlowType::Outflow),
        amount: field(fields, &["amount"]).and_then(amount).unwrap_or_default(),
        category: field(fields, &["category"])
            .and_then(text)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        payment_method: field(fields, &["paymentMethod", "payment_method"])
            .and_then(Value::as_str)
            .and_then(PaymentMethod::parse)
            .unwrap_or_default(),
        status: field(fields, &["status"])
            .and_then(Value::as_str)
            .and_then(EntryStatus::parse)
            .unwrap_or_default(),
        description: field(fields, &["suggestedDescription", "description"])
            .and_then(text)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        date: field(fields, &["date"]).and_then(date).unwrap_or(today),
    };

    let kind = field(fields, &["entryType", "entry_type"])
        .and_then(Value::as_str)
        .and_then(EntryKind::parse)
        .unwrap_or_default();

    match kind {
        EntryKind::CashFlow => ClassifiedEntry::CashFlow(guess),
        EntryKind::Operational => ClassifiedEntry::Operational(guess),
        EntryKind::Negotiation => {
            let installments = field(fields, &["installments"]).and_then(count);
            let terms = NegotiationTerms {
                creditor: field(fields, &["creditor"]).and_then(text),
                installments,
                installment_value: field(fields, &["installmentValue", "installment_value"])
                    .and_then(amount)
                    .filter(|value| {
                        debt::total_with_interest(installments.unwrap_or(1), *value).is_some()
                    }),
                due_date: field(fields, &["dueDate", "due_date"]).and_then(date),
            };
            ClassifiedEntry::Negotiation(guess, terms)
        }
    }
}

fn unwrap_object(raw: &Value) -> Option<&Map<String, Value>> {
    match raw {
        Value::Array(items) => items.first().and_then(unwrap_object),
        Value::Object(object) => match object.get("fallback") {
            Some(fallback @ Value::Object(_)) => unwrap_object(fallback),
            _ => Some(object),
        },
        _ => None,
    }
}

fn field<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_flow_type(s: &str) -> Option<FlowType> {
    match s.trim().to_lowercase().as_str() {
        "entrada" => Some(FlowType::Inflow),
        "saida" | "saída" => Some(FlowType::Outflow),
        other => FlowType::parse(other),
    }
}

fn amount(value: &Value) -> Option<Money> {
    let money = match value {
        Value::Number(n) => n.as_f64().and_then(Money::from_decimal),
        Value::String(s) => Money::parse(s).ok(),
        _ => None,
    }?;
    (!money.is_negative()).then_some(money)
}

fn count(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(n).ok().filter(|n| *n >= 1)
}

fn date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    #[test]
    fn test_empty_object_gets_every_default() {
        let entry = normalize(&json!({}), today());

        assert_eq!(entry.kind(), EntryKind::CashFlow);
        assert_eq!(entry.guess(), &EntryGuess::fallback(DEFAULT_DESCRIPTION, today()));
    }

    #[test]
    fn test_array_is_unwrapped_to_first_element() {
        let raw = json!([
            {"type": "inflow", "amount": 500, "category": "salary", "suggestedDescription": "Salary"},
            {"type": "outflow", "amount": 1}
        ]);
        let entry = normalize(&raw, today());
        let guess = entry.guess();

        assert_eq!(guess.flow_type, FlowType::Inflow);
        assert_eq!(guess.amount, Money::from_cents(50_000));
        assert_eq!(guess.category, "salary");
        assert_eq!(guess.description, "Salary");
    }

    #[test]
    fn test_non_object_responses_become_defaults() {
        for raw in [json!(null), json!("oops"), json!([]), json!(42)] {
            let entry = normalize(&raw, today());
            assert_eq!(entry, ClassifiedEntry::CashFlow(EntryGuess::fallback(DEFAULT_DESCRIPTION, today())));
        }
    }

    #[test]
    fn test_fallback_wrapper_is_unwrapped() {
        let raw = json!({
            "error": "OPENAI_API_KEY missing",
            "fallback": {"type": "saida", "amount": 0, "category": "other",
                         "suggestedDescription": "Unprocessed entry", "date": "2025-05-19"}
        });
        let entry = normalize(&raw, today());

        assert_eq!(entry.guess().description, "Unprocessed entry");
        assert_eq!(entry.guess().date, NaiveDate::from_ymd_opt(2025, 5, 19).unwrap());
        assert_eq!(entry.guess().flow_type, FlowType::Outflow);
    }

    #[test]
    fn test_invalid_fields_are_defaulted_individually() {
        let raw = json!({
            "type": "sideways",
            "amount": -50,
            "category": "food",
            "paymentMethod": "barter",
            "status": "paid",
            "date": "yesterday"
        });
        let guess = normalize(&raw, today()).guess().clone();

        assert_eq!(guess.flow_type, FlowType::Outflow);
        assert_eq!(guess.amount, Money::zero());
        assert_eq!(guess.category, "food");
        assert_eq!(guess.payment_method, PaymentMethod::Other);
        assert_eq!(guess.status, EntryStatus::Paid);
        assert_eq!(guess.date, today());
    }

    #[test]
    fn test_amount_accepts_numeric_strings() {
        let guess = normalize(&json!({"amount": "R$ 15,90"}), today()).guess().clone();
        assert_eq!(guess.amount, Money::from_cents(1590));

        let guess = normalize(&json!({"amount": "lots"}), today()).guess().clone();
        assert_eq!(guess.amount, Money::zero());
    }

    #[test]
    fn test_oversized_amounts_are_defaulted() {
        for raw in [json!({"amount": "99999999999999999"}), json!({"amount": 1e300})] {
            let guess = normalize(&raw, today()).guess().clone();
            assert_eq!(guess.amount, Money::zero());
        }
    }

    #[test]
    fn test_oversized_installment_plan_is_defaulted() {
        let raw = json!({"entryType": "negotiation", "amount": 1, "installments": 6,
                         "installmentValue": 1e300});
        let entry = normalize(&raw, today());
        assert_eq!(entry.terms().unwrap().installment_value, None);
        match entry.into_draft() {
            LedgerDraft::Debt(debt) => {
                assert_eq!(debt.installments, 6);
                assert_eq!(debt.installment_value, Money::from_cents(100));
                assert_eq!(debt.total_with_interest, Money::from_cents(600));
            }
            other => panic!("expected debt draft, got {:?}", other),
        }

        // Fits on its own, but six of them do not
        let raw = json!({"entryType": "negotiation", "amount": 1, "installments": 6,
                         "installmentValue": "90000000000000000"});
        let entry = normalize(&raw, today());
        assert_eq!(entry.terms().unwrap().installment_value, None);
    }

    #[test]
    fn test_edited_amount_that_overflows_plan_becomes_single_payment() {
        let raw = json!({"entryType": "negotiation", "installments": 4});
        let mut entry = normalize(&raw, today());
        entry.guess_mut().amount = Money::from_cents(i64::MAX / 2);

        match entry.into_draft() {
            LedgerDraft::Debt(debt) => {
                assert_eq!(debt.installments, 1);
                assert_eq!(debt.total_with_interest, Money::from_cents(i64::MAX / 2));
                assert!(debt.normalized().is_ok());
            }
            other => panic!("expected debt draft, got {:?}", other),
        }
    }

    #[test]
    fn test_portuguese_flow_types() {
        let guess = normalize(&json!({"type": "entrada"}), today()).guess().clone();
        assert_eq!(guess.flow_type, FlowType::Inflow);
    }

    #[test]
    fn test_cash_flow_draft() {
        let raw = json!({"entryType": "cashflow", "type": "outflow", "amount": 15,
                         "category": "food", "paymentMethod": "pix", "status": "confirmed",
                         "suggestedDescription": "Lunch"});
        match normalize(&raw, today()).into_draft() {
            LedgerDraft::CashFlow(draft) => {
                assert_eq!(draft.description, "Lunch");
                assert_eq!(draft.amount, Money::from_cents(1500));
                assert_eq!(draft.payment_method, Some(PaymentMethod::Pix));
                assert_eq!(draft.status, Some(EntryStatus::Confirmed));
                assert_eq!(draft.date, today());
            }
            other => panic!("expected cash-flow draft, got {:?}", other),
        }
    }

    #[test]
    fn test_operational_cost_type_follows_direction() {
        let outflow = normalize(&json!({"entryType": "operational", "type": "outflow"}), today());
        let inflow = normalize(&json!({"entryType": "operational", "type": "inflow"}), today());

        assert!(matches!(
            outflow.into_draft(),
            LedgerDraft::Operational(NewOperationalCost { cost_type: CostType::Variable, .. })
        ));
        assert!(matches!(
            inflow.into_draft(),
            LedgerDraft::Operational(NewOperationalCost { cost_type: CostType::Fixed, .. })
        ));
    }

    #[test]
    fn test_negotiation_draft_keeps_total_invariant() {
        let raw = json!({
            "entryType": "negotiation",
            "amount": 1200,
            "status": "confirmed",
            "suggestedDescription": "Supplier agreement",
            "creditor": "Supplier Ltd",
            "installments": 6,
            "installmentValue": "210.50",
            "dueDate": "2025-06-10"
        });
        match normalize(&raw, today()).into_draft() {
            LedgerDraft::Debt(debt) => {
                assert_eq!(debt.creditor, "Supplier Ltd");
                assert_eq!(debt.installments, 6);
                assert_eq!(debt.installment_value, Money::from_cents(21_050));
                assert_eq!(debt.total_with_interest, Money::from_cents(126_300));
                assert_eq!(debt.due_date, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
                assert_eq!(debt.status, DebtStatus::Negotiating);
                assert_eq!(debt.justification, "Supplier agreement");
                assert!(debt.additional_terms.is_empty());
            }
            other => panic!("expected debt draft, got {:?}", other),
        }
    }

    #[test]
    fn test_negotiation_defaults() {
        let raw = json!({"entryType": "negotiation", "amount": 300, "installments": 0});
        match normalize(&raw, today()).into_draft() {
            LedgerDraft::Debt(debt) => {
                assert_eq!(debt.creditor, DEFAULT_CREDITOR);
                assert_eq!(debt.installments, 1);
                assert_eq!(debt.installment_value, Money::from_cents(30_000));
                assert_eq!(debt.total_with_interest, Money::from_cents(30_000));
                assert_eq!(debt.due_date, today());
                assert_eq!(debt.status, DebtStatus::Pending);
            }
            other => panic!("expected debt draft, got {:?}", other),
        }
    }

    #[test]
    fn test_with_kind_keeps_shared_fields() {
        let entry = normalize(&json!({"amount": 80, "suggestedDescription": "Fuel"}), today());
        let refiled = entry.clone().with_kind(EntryKind::Negotiation);

        assert_eq!(refiled.kind(), EntryKind::Negotiation);
        assert_eq!(refiled.guess(), entry.guess());
        assert_eq!(refiled.terms(), Some(&NegotiationTerms::default()));
    }
}
