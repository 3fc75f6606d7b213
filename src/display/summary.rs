//! Dashboard summary formatting

use crate::services::LedgerSummary;

/// Format the aggregate summary as shown by `bizledger summary`
pub fn format_summary(summary: &LedgerSummary, symbol: &str) -> String {
    let money = |amount: crate::models::Money| amount.format_with_symbol(symbol);
    let mut output = String::new();

    match summary.date_filter {
        Some(date) => output.push_str(&format!("Summary for {}\n", date.format("%Y-%m-%d"))),
        None => output.push_str("Summary (all dates)\n"),
    }
    output.push_str(&"=".repeat(40));
    output.push('\n');

    output.push_str("\nCash flow\n");
    output.push_str(&format!(
        "  Revenue:   {:>16}  ({} entries)\n",
        money(summary.total_revenue),
        summary.inflow_count
    ));
    output.push_str(&format!(
        "  Expenses:  {:>16}  ({} entries)\n",
        money(summary.total_expenses),
        summary.outflow_count
    ));
    output.push_str(&format!("  Net:       {:>16}\n", money(summary.net_cash_flow)));

    output.push_str("\nOperational costs\n");
    output.push_str(&format!("  Fixed:     {:>16}\n", money(summary.total_fixed_costs)));
    output.push_str(&format!("  Variable:  {:>16}\n", money(summary.total_variable_costs)));
    output.push_str(&format!("  Total:     {:>16}\n", money(summary.total_operational_costs)));
    for (category, total) in &summary.costs_by_category {
        output.push_str(&format!("    {:20} {:>14}\n", category, money(*total)));
    }

    output.push_str("\nDebts\n");
    output.push_str(&format!(
        "  Owed:      {:>16}  ({} debts)\n",
        money(summary.total_debts),
        summary.debt_count
    ));
    output.push_str(&format!("  Overdue:   {:>16}\n", summary.overdue_debts));
    output.push_str(&format!(
        "  Due in {} days: {:>11}\n",
        summary.window_days, summary.debts_due_soon
    ));
    output.push_str(&format!("  Resolved:  {:>15}%\n", summary.resolution_rate));

    output
}
