//! Operational cost display formatting

use super::fit;
use crate::models::{Money, OperationalCost};

/// Format operational costs as a table with fixed/variable subtotals
pub fn format_cost_list(costs: &[&OperationalCost], symbol: &str) -> String {
    if costs.is_empty() {
        return "No operational costs found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:13} {:10} {:9} {:28} {:14} {:>14}\n",
        "ID", "Date", "Type", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(93));
    output.push('\n');

    for cost in costs {
        let marker = if cost.is_installment() { "*" } else { "" };
        output.push_str(&format!(
            "{:13} {} {:9} {} {} {:>14}\n",
            cost.id.to_string(),
            cost.date.format("%Y-%m-%d"),
            cost.cost_type.to_string(),
            fit(&format!("{}{}", cost.description, marker), 28),
            fit(&cost.category, 14),
            cost.amount.format_with_symbol(symbol)
        ));
    }

    let total: Money = costs.iter().map(|cost| cost.amount).sum();
    output.push_str(&"-".repeat(93));
    output.push('\n');
    output.push_str(&format!("{:>78} {:>14}\n", "Total:", total.format_with_symbol(symbol)));

    if costs.iter().any(|cost| cost.is_installment()) {
        output.push_str("* installment of a debt\n");
    }

    output
}

/// Format one operational cost in full
pub fn format_cost_details(cost: &OperationalCost, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Cost:        {}\n", cost.id));
    output.push_str(&format!("Description: {}\n", cost.description));
    output.push_str(&format!("Type:        {}\n", cost.cost_type));
    output.push_str(&format!("Amount:      {}\n", cost.amount.format_with_symbol(symbol)));
    output.push_str(&format!("Date:        {}\n", cost.date.format("%Y-%m-%d")));
    output.push_str(&format!("Category:    {}\n", cost.category));
    if let Some(debt_id) = cost.debt_id {
        output.push_str(&format!("Debt:        {}\n", debt_id));
    }

    output
}
