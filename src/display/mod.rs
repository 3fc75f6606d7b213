//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for ledger records. Amounts are
//! rendered with the configured currency symbol.

pub mod cash_flow;
pub mod costs;
pub mod debts;
pub mod history;
pub mod smart;
pub mod summary;

pub use cash_flow::{format_cash_flow_details, format_cash_flow_register};
pub use costs::{format_cost_details, format_cost_list};
pub use debts::{format_debt_details, format_debt_list};
pub use history::format_history;
pub use smart::format_guess;
pub use summary::format_summary;

/// Pad or cut `s` to exactly `width` characters
pub(crate) fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{:width$}", s, width = width)
    } else {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
