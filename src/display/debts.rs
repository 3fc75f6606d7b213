//! Debt display formatting

use super::fit;
use crate::models::{Debt, DebtStatus, Money, OperationalCost};

fn status_icon(status: DebtStatus) -> &'static str {
    match status {
        DebtStatus::Pending => " ",
        DebtStatus::Negotiating => "~",
        DebtStatus::Overdue => "!",
        DebtStatus::Resolved => "✓",
    }
}

/// Format debts as a table
pub fn format_debt_list(debts: &[&Debt], symbol: &str) -> String {
    if debts.is_empty() {
        return "No debts found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:13} {:2} {:10} {:20} {:>14} {:>18} {:>14}\n",
        "ID", "St", "Due", "Creditor", "Amount", "Plan", "Total"
    ));
    output.push_str(&"-".repeat(97));
    output.push('\n');

    for debt in debts {
        let plan = format!(
            "{}x {}",
            debt.installments,
            debt.installment_value.format_with_symbol(symbol)
        );
        output.push_str(&format!(
            "{:13} {:2} {} {} {:>14} {:>18} {:>14}\n",
            debt.id.to_string(),
            status_icon(debt.status),
            debt.due_date.format("%Y-%m-%d"),
            fit(&debt.creditor, 20),
            debt.amount.format_with_symbol(symbol),
            plan,
            debt.total_with_interest.format_with_symbol(symbol)
        ));
    }

    let total: Money = debts.iter().map(|debt| debt.amount).sum();
    output.push_str(&"-".repeat(97));
    output.push('\n');
    output.push_str(&format!("{:>48} {:>14}\n", "Total owed:", total.format_with_symbol(symbol)));

    output
}

/// Format one debt in full, with its installment cost when there is one
pub fn format_debt_details(
    debt: &Debt,
    installment_cost: Option<&OperationalCost>,
    symbol: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Debt:         {}\n", debt.id));
    output.push_str(&format!("Creditor:     {}\n", debt.creditor));
    if !debt.description.is_empty() {
        output.push_str(&format!("Description:  {}\n", debt.description));
    }
    output.push_str(&format!("Amount:       {}\n", debt.amount.format_with_symbol(symbol)));
    output.push_str(&format!(
        "Plan:         {}x {}\n",
        debt.installments,
        debt.installment_value.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Total:        {}\n",
        debt.total_with_interest.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Due:          {}\n", debt.due_date.format("%Y-%m-%d")));
    output.push_str(&format!("Status:       {}\n", debt.status));

    if !debt.justification.is_empty() {
        output.push_str(&format!("Justification: {}\n", debt.justification));
    }
    if !debt.additional_terms.is_empty() {
        output.push_str(&format!("Terms:        {}\n", debt.additional_terms));
    }

    match installment_cost {
        Some(cost) => output.push_str(&format!(
            "Installment:  {} ({})\n",
            cost.id,
            cost.amount.format_with_symbol(symbol)
        )),
        None if debt.has_installment() => output.push_str("Installment:  (missing)\n"),
        None => {}
    }

    output
}
