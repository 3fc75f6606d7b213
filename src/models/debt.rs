//! Debt renegotiation model
//!
//! A debt is the principal owed to a creditor together with the installment
//! plan agreed (or being negotiated) to pay it off.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::DebtId;
use super::money::Money;

/// Where a debt stands in the renegotiation process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    #[default]
    Pending,
    Negotiating,
    Overdue,
    Resolved,
}

impl DebtStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "negotiating" => Some(Self::Negotiating),
            "overdue" => Some(Self::Overdue),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Negotiating => write!(f, "Negotiating"),
            Self::Overdue => write!(f, "Overdue"),
            Self::Resolved => write!(f, "Resolved"),
        }
    }
}

/// A persisted debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,

    pub creditor: String,

    #[serde(default)]
    pub description: String,

    /// Principal
    pub amount: Money,

    /// Number of installments, at least 1
    pub installments: u32,

    pub installment_value: Money,

    /// Always `installments * installment_value`
    pub total_with_interest: Money,

    /// Due date of the first installment
    pub due_date: NaiveDate,

    #[serde(default)]
    pub justification: String,

    #[serde(default)]
    pub additional_terms: String,

    #[serde(default)]
    pub status: DebtStatus,

    pub created_at: DateTime<Utc>,
}

impl Debt {
    /// Whether creating this debt should also create an installment cost
    pub fn has_installment(&self) -> bool {
        self.installment_value.is_positive()
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}x {}",
            self.creditor, self.amount, self.installments, self.installment_value
        )
    }
}

/// Total repaid over the plan, `None` when it does not fit in an amount
pub fn total_with_interest(installments: u32, installment_value: Money) -> Option<Money> {
    installment_value.checked_mul(installments.max(1))
}

fn checked_total(installments: u32, installment_value: Money) -> Result<Money, DebtPlanError> {
    total_with_interest(installments, installment_value).ok_or(DebtPlanError::TotalOverflow {
        installments,
        installment_value,
    })
}

/// Installment plan that cannot be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebtPlanError {
    TotalOverflow {
        installments: u32,
        installment_value: Money,
    },
}

impl fmt::Display for DebtPlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebtPlanError::TotalOverflow {
                installments,
                installment_value,
            } => write!(
                f,
                "Installment plan total is too large: {}x {}",
                installments, installment_value
            ),
        }
    }
}

impl std::error::Error for DebtPlanError {}

/// Fields supplied when creating a debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDebt {
    pub creditor: String,
    pub description: String,
    pub amount: Money,
    pub installments: u32,
    pub installment_value: Money,
    pub total_with_interest: Money,
    pub due_date: NaiveDate,
    pub justification: String,
    pub additional_terms: String,
    pub status: DebtStatus,
}

impl NewDebt {
    /// Create a pending debt; `total_with_interest` is derived from the plan
    ///
    /// A plan whose total overflows gets a zero total here and is refused by
    /// [`NewDebt::normalized`].
    pub fn new(
        creditor: impl Into<String>,
        amount: Money,
        installments: u32,
        installment_value: Money,
        due_date: NaiveDate,
    ) -> Self {
        let installments = installments.max(1);
        Self {
            creditor: creditor.into(),
            description: String::new(),
            amount,
            installments,
            installment_value,
            total_with_interest: total_with_interest(installments, installment_value)
                .unwrap_or_default(),
            due_date,
            justification: String::new(),
            additional_terms: String::new(),
            status: DebtStatus::Pending,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: DebtStatus) -> Self {
        self.status = status;
        self
    }

    /// Restore the plan invariants after fields were edited directly
    pub fn normalized(mut self) -> Result<Self, DebtPlanError> {
        self.installments = self.installments.max(1);
        self.total_with_interest = checked_total(self.installments, self.installment_value)?;
        Ok(self)
    }
}

/// Partial update for a debt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_value: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_with_interest: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DebtStatus>,
}

impl DebtPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Keep `total_with_interest` consistent with an edited plan
    ///
    /// When the patch touches the installment count, the installment value or
    /// the total itself, the total is recomputed from the patched plan, taking
    /// whichever half is not being changed from `current`. A patch that
    /// touches none of them is returned as-is.
    pub fn with_recomputed_total(mut self, current: &Debt) -> Result<Self, DebtPlanError> {
        if self.installments.is_none()
            && self.installment_value.is_none()
            && self.total_with_interest.is_none()
        {
            return Ok(self);
        }
        if let Some(count) = self.installments {
            self.installments = Some(count.max(1));
        }
        let installments = self.installments.unwrap_or(current.installments);
        let value = self.installment_value.unwrap_or(current.installment_value);
        self.total_with_interest = Some(checked_total(installments, value)?);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored(draft: NewDebt) -> Debt {
        Debt {
            id: DebtId::new(),
            creditor: draft.creditor,
            description: draft.description,
            amount: draft.amount,
            installments: draft.installments,
            installment_value: draft.installment_value,
            total_with_interest: draft.total_with_interest,
            due_date: draft.due_date,
            justification: draft.justification,
            additional_terms: draft.additional_terms,
            status: draft.status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_debt_derives_total() {
        let draft = NewDebt::new(
            "BankX",
            Money::from_cents(1_000_000),
            10,
            Money::from_cents(110_000),
            date(2025, 3, 1),
        );
        assert_eq!(draft.total_with_interest, Money::from_cents(1_100_000));
        assert_eq!(draft.status, DebtStatus::Pending);
    }

    #[test]
    fn test_zero_installments_clamped() {
        let draft = NewDebt::new("X", Money::zero(), 0, Money::from_cents(500), date(2025, 1, 1));
        assert_eq!(draft.installments, 1);
        assert_eq!(draft.total_with_interest, Money::from_cents(500));

        let mut edited = draft.clone();
        edited.installments = 0;
        edited.installment_value = Money::from_cents(700);
        let normalized = edited.normalized().unwrap();
        assert_eq!(normalized.installments, 1);
        assert_eq!(normalized.total_with_interest, Money::from_cents(700));
    }

    #[test]
    fn test_overflowing_plan_is_refused() {
        let huge = Money::from_cents(i64::MAX / 4);
        let draft = NewDebt::new("BankX", huge, 6, huge, date(2025, 3, 1));
        assert_eq!(draft.total_with_interest, Money::zero());
        assert_eq!(
            draft.normalized(),
            Err(DebtPlanError::TotalOverflow {
                installments: 6,
                installment_value: huge,
            })
        );

        let debt = stored(
            NewDebt::new("BankX", huge, 1, huge, date(2025, 3, 1))
                .normalized()
                .unwrap(),
        );
        let patch = DebtPatch {
            installments: Some(5),
            ..Default::default()
        };
        assert!(patch.with_recomputed_total(&debt).is_err());
    }

    #[test]
    fn test_patch_recomputes_total() {
        let debt = stored(NewDebt::new(
            "BankX",
            Money::from_cents(1_000_000),
            10,
            Money::from_cents(100_000),
            date(2025, 3, 1),
        ));

        let patch = DebtPatch {
            installments: Some(12),
            ..Default::default()
        }
        .with_recomputed_total(&debt)
        .unwrap();
        assert_eq!(patch.total_with_interest, Some(Money::from_cents(1_200_000)));

        let overridden = DebtPatch {
            total_with_interest: Some(Money::from_cents(1)),
            ..Default::default()
        }
        .with_recomputed_total(&debt)
        .unwrap();
        assert_eq!(overridden.total_with_interest, Some(Money::from_cents(1_000_000)));

        let untouched = DebtPatch {
            status: Some(DebtStatus::Resolved),
            ..Default::default()
        }
        .with_recomputed_total(&debt)
        .unwrap();
        assert_eq!(untouched.total_with_interest, None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(DebtStatus::parse("Overdue"), Some(DebtStatus::Overdue));
        assert_eq!(DebtStatus::parse("closed"), None);
        assert!(DebtStatus::Resolved.is_resolved());
    }
}
