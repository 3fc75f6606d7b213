//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the ledger store.

pub mod cash_flow;
pub mod cost;
pub mod debt;
pub mod history;
pub mod smart;
pub mod summary;

pub use cash_flow::{handle_cash_flow_command, CashFlowCommands};
pub use cost::{handle_cost_command, CostCommands};
pub use debt::{handle_debt_command, DebtCommands};
pub use history::handle_history_command;
pub use smart::{handle_smart_command, SmartArgs};
pub use summary::handle_summary_command;

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;

/// Today's date in local time
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a date in ISO form or in the configured date format
pub(crate) fn parse_date(input: &str, settings: &Settings) -> LedgerResult<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, &settings.date_format))
        .map_err(|_| {
            LedgerError::Validation(format!(
                "Invalid date: '{}'. Use YYYY-MM-DD or {}",
                input, settings.date_format
            ))
        })
}

pub(crate) fn parse_optional_date(
    input: Option<String>,
    settings: &Settings,
) -> LedgerResult<Option<NaiveDate>> {
    input.map(|s| parse_date(&s, settings)).transpose()
}

/// Parse a non-negative amount such as "50.00", "R$50" or "50,00"
pub(crate) fn parse_amount(input: &str) -> LedgerResult<Money> {
    let amount = Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '50.00'. Error: {}",
            input, e
        ))
    })?;
    if amount.is_negative() {
        return Err(LedgerError::Validation(format!(
            "Amount must not be negative: '{}'",
            input
        )));
    }
    Ok(amount)
}

pub(crate) fn parse_optional_amount(input: Option<String>) -> LedgerResult<Option<Money>> {
    input.map(|s| parse_amount(&s)).transpose()
}

/// Parse a named choice such as a status or payment method
pub(crate) fn parse_choice<T>(
    input: &str,
    parse: impl Fn(&str) -> Option<T>,
    what: &str,
    choices: &str,
) -> LedgerResult<T> {
    parse(input).ok_or_else(|| {
        LedgerError::Validation(format!("Invalid {}: '{}'. Use {}", what, input, choices))
    })
}

/// Format a date with the configured format
pub(crate) fn show_date(date: NaiveDate, settings: &Settings) -> String {
    date.format(&settings.date_format).to_string()
}
