//! Debt CLI commands

use clap::Subcommand;

use super::{
    parse_amount, parse_choice, parse_date, parse_optional_amount, parse_optional_date, show_date,
};
use crate::config::settings::Settings;
use crate::display::debts::{format_debt_details, format_debt_list};
use crate::error::LedgerResult;
use crate::models::{DebtPatch, DebtStatus, NewDebt};
use crate::services::LedgerStore;
use crate::storage::Gateway;

const STATUSES: &str = "pending, negotiating, overdue or resolved";

/// Debt subcommands
#[derive(Subcommand)]
pub enum DebtCommands {
    /// Record a debt; a positive installment value also records its
    /// monthly installment as a fixed cost
    Add {
        /// Who the debt is owed to
        creditor: String,
        /// Principal amount
        amount: String,
        /// Number of installments
        #[arg(short = 'n', long, default_value = "1")]
        installments: u32,
        /// Value of each installment
        #[arg(short = 'v', long, default_value = "0")]
        installment_value: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: String,
        #[arg(long)]
        description: Option<String>,
        /// Why the debt was taken on or renegotiated
        #[arg(long)]
        justification: Option<String>,
        /// Any further conditions of the agreement
        #[arg(long)]
        terms: Option<String>,
        /// Status (pending, negotiating, overdue, resolved)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// List debts, most recent first
    List {
        /// Only show debts due on this date
        #[arg(short, long)]
        date: Option<String>,
        /// Only show debts with this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show a debt in full, with its installment cost
    Show {
        /// Debt ID
        id: String,
    },
    /// Edit a debt; the total is recomputed from the installment plan
    Edit {
        /// Debt ID
        id: String,
        #[arg(long)]
        creditor: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short = 'n', long)]
        installments: Option<u32>,
        #[arg(short = 'v', long)]
        installment_value: Option<String>,
        #[arg(long)]
        due_date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        justification: Option<String>,
        #[arg(long)]
        terms: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Delete a debt together with its installment cost
    Delete {
        /// Debt ID
        id: String,
    },
}

fn parse_status(input: &str) -> LedgerResult<DebtStatus> {
    parse_choice(input, DebtStatus::parse, "status", STATUSES)
}

/// Handle a debt command
pub fn handle_debt_command<G: Gateway>(
    store: &mut LedgerStore<G>,
    settings: &Settings,
    cmd: DebtCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        DebtCommands::Add {
            creditor,
            amount,
            installments,
            installment_value,
            due_date,
            description,
            justification,
            terms,
            status,
        } => {
            let mut draft = NewDebt::new(
                creditor,
                parse_amount(&amount)?,
                installments,
                parse_amount(&installment_value)?,
                parse_date(&due_date, settings)?,
            );
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if let Some(status) = status {
                draft = draft.with_status(parse_status(&status)?);
            }
            draft.justification = justification.unwrap_or_default();
            draft.additional_terms = terms.unwrap_or_default();

            let created = store.add_debt(draft)?;
            let debt = &created.debt;
            println!("Created debt:");
            println!("  ID:       {}", debt.id);
            println!("  Creditor: {}", debt.creditor);
            println!("  Amount:   {}", debt.amount.format_with_symbol(symbol));
            println!(
                "  Plan:     {}x {} = {}",
                debt.installments,
                debt.installment_value.format_with_symbol(symbol),
                debt.total_with_interest.format_with_symbol(symbol)
            );
            println!("  Due:      {}", show_date(debt.due_date, settings));
            if let Some(cost) = &created.installment_cost {
                println!(
                    "Created installment cost {} ({} per month)",
                    cost.id,
                    cost.amount.format_with_symbol(symbol)
                );
            }
        }

        DebtCommands::List { date, status } => {
            store.set_date_filter(parse_optional_date(date, settings)?);
            let status = status.map(|s| parse_status(&s)).transpose()?;

            let debts: Vec<_> = store
                .debts()
                .into_iter()
                .filter(|debt| status.map_or(true, |status| debt.status == status))
                .collect();

            print!("{}", format_debt_list(&debts, symbol));
            println!("\nShowing {} debts", debts.len());
        }

        DebtCommands::Show { id } => {
            let debt = store.find_debt(&id)?;
            let cost = store.linked_installment_cost(debt);
            print!("{}", format_debt_details(debt, cost, symbol));
        }

        DebtCommands::Edit {
            id,
            creditor,
            amount,
            installments,
            installment_value,
            due_date,
            description,
            justification,
            terms,
            status,
        } => {
            let debt_id = store.find_debt(&id)?.id;

            let patch = DebtPatch {
                creditor,
                description,
                amount: parse_optional_amount(amount)?,
                installments,
                installment_value: parse_optional_amount(installment_value)?,
                total_with_interest: None,
                due_date: parse_optional_date(due_date, settings)?,
                justification,
                additional_terms: terms,
                status: status.map(|s| parse_status(&s)).transpose()?,
            };

            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let updated = store.update_debt(debt_id, patch)?;
            println!("Updated debt: {}", updated.id);
            println!(
                "  Plan:   {}x {} = {}",
                updated.installments,
                updated.installment_value.format_with_symbol(symbol),
                updated.total_with_interest.format_with_symbol(symbol)
            );
            println!("  Status: {}", updated.status);
        }

        DebtCommands::Delete { id } => {
            let debt_id = store.find_debt(&id)?.id;
            if let Some(deletion) = store.delete_debt(debt_id)? {
                println!(
                    "Deleted debt: {} ({})",
                    deletion.debt.id, deletion.debt.creditor
                );
                if let Some(cost) = &deletion.installment_cost {
                    println!("Deleted installment cost: {}", cost.id);
                }
                if let Some(cost) = &deletion.orphaned_cost {
                    println!(
                        "WARNING: installment cost {} could not be deleted and is still stored.",
                        cost.id
                    );
                }
            }
        }
    }

    Ok(())
}
