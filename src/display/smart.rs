//! Formatting of classifier guesses before they are committed

use crate::classifier::ClassifiedEntry;

/// Format a guess for review
pub fn format_guess(entry: &ClassifiedEntry, symbol: &str) -> String {
    let guess = entry.guess();
    let mut output = String::new();

    output.push_str(&format!("Kind:        {}\n", entry.kind()));
    output.push_str(&format!("Description: {}\n", guess.description));
    output.push_str(&format!("Type:        {}\n", guess.flow_type));
    output.push_str(&format!("Amount:      {}\n", guess.amount.format_with_symbol(symbol)));
    output.push_str(&format!("Date:        {}\n", guess.date.format("%Y-%m-%d")));
    output.push_str(&format!("Category:    {}\n", guess.category));
    output.push_str(&format!("Payment:     {}\n", guess.payment_method));
    output.push_str(&format!("Status:      {}\n", guess.status));

    if let Some(terms) = entry.terms() {
        if let Some(creditor) = &terms.creditor {
            output.push_str(&format!("Creditor:    {}\n", creditor));
        }
        if let Some(installments) = terms.installments {
            output.push_str(&format!("Installments: {}\n", installments));
        }
        if let Some(value) = terms.installment_value {
            output.push_str(&format!("Installment: {}\n", value.format_with_symbol(symbol)));
        }
        if let Some(due) = terms.due_date {
            output.push_str(&format!("Due:         {}\n", due.format("%Y-%m-%d")));
        }
    }

    output
}
