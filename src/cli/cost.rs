//! Operational cost CLI commands

use clap::Subcommand;

use super::{
    parse_amount, parse_choice, parse_date, parse_optional_amount, parse_optional_date, show_date,
    today,
};
use crate::config::settings::Settings;
use crate::display::costs::{format_cost_details, format_cost_list};
use crate::error::LedgerResult;
use crate::models::{CostType, NewOperationalCost, OperationalCostPatch};
use crate::services::LedgerStore;
use crate::storage::Gateway;

const COST_TYPES: &str = "fixed or variable";

/// Operational cost subcommands
#[derive(Subcommand)]
pub enum CostCommands {
    /// Record an operational cost
    Add {
        /// What the cost is for
        description: String,
        /// Amount (e.g., "2000.00")
        amount: String,
        /// Cost type: fixed or variable
        #[arg(short = 't', long = "type")]
        cost_type: String,
        /// Cost date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Category
        #[arg(short, long, default_value = "other")]
        category: String,
    },
    /// List operational costs, most recent first
    List {
        /// Only show costs on this date
        #[arg(short, long)]
        date: Option<String>,
        /// Only show fixed or variable costs
        #[arg(short = 't', long = "type")]
        cost_type: Option<String>,
    },
    /// Show a cost in full
    Show {
        /// Cost ID
        id: String,
    },
    /// Edit a cost
    Edit {
        /// Cost ID
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short = 't', long = "type")]
        cost_type: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a cost
    Delete {
        /// Cost ID
        id: String,
    },
}

/// Handle an operational cost command
pub fn handle_cost_command<G: Gateway>(
    store: &mut LedgerStore<G>,
    settings: &Settings,
    cmd: CostCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        CostCommands::Add {
            description,
            amount,
            cost_type,
            date,
            category,
        } => {
            let cost_type = parse_choice(&cost_type, CostType::parse, "cost type", COST_TYPES)?;
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(date) => parse_date(&date, settings)?,
                None => today(),
            };

            let cost = store.add_operational_cost(NewOperationalCost::new(
                description,
                cost_type,
                amount,
                date,
                category,
            ))?;
            println!("Created operational cost:");
            println!("  ID:       {}", cost.id);
            println!("  Date:     {}", show_date(cost.date, settings));
            println!("  Type:     {}", cost.cost_type);
            println!("  Amount:   {}", cost.amount.format_with_symbol(symbol));
            println!("  Category: {}", cost.category);
        }

        CostCommands::List { date, cost_type } => {
            store.set_date_filter(parse_optional_date(date, settings)?);

            let costs = match cost_type {
                Some(cost_type) => {
                    match parse_choice(&cost_type, CostType::parse, "cost type", COST_TYPES)? {
                        CostType::Fixed => store.fixed_costs(),
                        CostType::Variable => store.variable_costs(),
                    }
                }
                None => store.operational_costs(),
            };

            print!("{}", format_cost_list(&costs, symbol));
            println!("\nShowing {} costs", costs.len());
        }

        CostCommands::Show { id } => {
            let cost = store.find_operational_cost(&id)?;
            print!("{}", format_cost_details(cost, symbol));
        }

        CostCommands::Edit {
            id,
            description,
            amount,
            cost_type,
            date,
            category,
        } => {
            let cost_id = store.find_operational_cost(&id)?.id;

            let patch = OperationalCostPatch {
                description,
                cost_type: cost_type
                    .map(|s| parse_choice(&s, CostType::parse, "cost type", COST_TYPES))
                    .transpose()?,
                amount: parse_optional_amount(amount)?,
                date: parse_optional_date(date, settings)?,
                category,
            };

            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let updated = store.update_operational_cost(cost_id, patch)?;
            println!("Updated operational cost: {}", updated.id);
            println!("  Date:   {}", show_date(updated.date, settings));
            println!("  Amount: {}", updated.amount.format_with_symbol(symbol));
        }

        CostCommands::Delete { id } => {
            let cost_id = store.find_operational_cost(&id)?.id;
            if let Some(deleted) = store.delete_operational_cost(cost_id)? {
                println!("Deleted operational cost: {} ({})", deleted.id, deleted.description);
                if let Some(debt_id) = deleted.debt_id {
                    println!("Note: this was the installment cost of debt {}", debt_id);
                }
            }
        }
    }

    Ok(())
}
