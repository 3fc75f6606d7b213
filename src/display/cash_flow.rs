//! Cash-flow display formatting

use super::fit;
use crate::models::{CashFlowEntry, EntryStatus, FlowType};

fn status_icon(entry: &CashFlowEntry) -> &'static str {
    match entry.status {
        Some(EntryStatus::Paid) => "✓",
        Some(EntryStatus::Confirmed) => "•",
        Some(EntryStatus::Pending) | None => " ",
    }
}

/// Format cash-flow entries as a register with a running net total
pub fn format_cash_flow_register(entries: &[&CashFlowEntry], symbol: &str) -> String {
    if entries.is_empty() {
        return "No cash-flow entries found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:11} {:2} {:10} {:24} {:14} {:>14} {:>14}\n",
        "ID", "St", "Date", "Description", "Category", "Outflow", "Inflow"
    ));
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for entry in entries {
        let amount = entry.amount.format_with_symbol(symbol);
        let (outflow, inflow) = match entry.flow_type {
            FlowType::Outflow => (amount, String::new()),
            FlowType::Inflow => (String::new(), amount),
        };

        output.push_str(&format!(
            "{:11} {:2} {} {} {} {:>14} {:>14}\n",
            entry.id.to_string(),
            status_icon(entry),
            entry.date.format("%Y-%m-%d"),
            fit(&entry.description, 24),
            fit(&entry.category, 14),
            outflow,
            inflow
        ));
    }

    let net = entries
        .iter()
        .map(|entry| match entry.flow_type {
            FlowType::Inflow => entry.amount,
            FlowType::Outflow => -entry.amount,
        })
        .sum::<crate::models::Money>();

    output.push_str(&"-".repeat(96));
    output.push('\n');
    output.push_str(&format!("{:>81} {:>14}\n", "Net:", net.format_with_symbol(symbol)));

    output
}

/// Format one cash-flow entry in full
pub fn format_cash_flow_details(entry: &CashFlowEntry, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Entry:       {}\n", entry.id));
    output.push_str(&format!("Description: {}\n", entry.description));
    output.push_str(&format!("Type:        {}\n", entry.flow_type));
    output.push_str(&format!("Amount:      {}\n", entry.amount.format_with_symbol(symbol)));
    output.push_str(&format!("Date:        {}\n", entry.date.format("%Y-%m-%d")));
    output.push_str(&format!("Category:    {}\n", entry.category));

    if let Some(status) = entry.status {
        output.push_str(&format!("Status:      {}\n", status));
    }
    if let Some(method) = entry.payment_method {
        output.push_str(&format!("Payment:     {}\n", method));
    }

    output
}
