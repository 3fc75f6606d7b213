//! Cash-flow CLI commands

use clap::Subcommand;

use super::{
    parse_amount, parse_choice, parse_date, parse_optional_amount, parse_optional_date, show_date,
    today,
};
use crate::config::settings::Settings;
use crate::display::cash_flow::{format_cash_flow_details, format_cash_flow_register};
use crate::error::LedgerResult;
use crate::models::{
    CashFlowEntryPatch, EntryStatus, FlowType, NewCashFlowEntry, PaymentMethod,
};
use crate::services::LedgerStore;
use crate::storage::Gateway;

const FLOW_TYPES: &str = "inflow or outflow";
const STATUSES: &str = "confirmed, pending or paid";
const PAYMENT_METHODS: &str = "cash, credit, debit, pix, transfer or other";

/// Cash-flow subcommands
#[derive(Subcommand)]
pub enum CashFlowCommands {
    /// Record money coming in or going out
    Add {
        /// What the entry is for
        description: String,
        /// Amount (e.g., "150.00")
        amount: String,
        /// Direction: inflow or outflow
        #[arg(short = 't', long = "type")]
        flow_type: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Category
        #[arg(short, long, default_value = "other")]
        category: String,
        /// Status (confirmed, pending, paid)
        #[arg(short, long)]
        status: Option<String>,
        /// Payment method (cash, credit, debit, pix, transfer, other)
        #[arg(short = 'm', long)]
        payment_method: Option<String>,
    },
    /// List cash-flow entries, most recent first
    List {
        /// Only show entries on this date
        #[arg(short, long)]
        date: Option<String>,
        /// Only show inflow or outflow entries
        #[arg(short = 't', long = "type")]
        flow_type: Option<String>,
    },
    /// Show an entry in full
    Show {
        /// Entry ID
        id: String,
    },
    /// Edit an entry
    Edit {
        /// Entry ID
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short = 't', long = "type")]
        flow_type: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short = 'm', long)]
        payment_method: Option<String>,
    },
    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },
}

/// Handle a cash-flow command
pub fn handle_cash_flow_command<G: Gateway>(
    store: &mut LedgerStore<G>,
    settings: &Settings,
    cmd: CashFlowCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        CashFlowCommands::Add {
            description,
            amount,
            flow_type,
            date,
            category,
            status,
            payment_method,
        } => {
            let flow_type = parse_choice(&flow_type, FlowType::parse, "type", FLOW_TYPES)?;
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(date) => parse_date(&date, settings)?,
                None => today(),
            };

            let mut draft = NewCashFlowEntry::new(description, flow_type, amount, date, category);
            if let Some(status) = status {
                draft = draft.with_status(parse_choice(&status, EntryStatus::parse, "status", STATUSES)?);
            }
            if let Some(method) = payment_method {
                draft = draft.with_payment_method(parse_choice(
                    &method,
                    PaymentMethod::parse,
                    "payment method",
                    PAYMENT_METHODS,
                )?);
            }

            let entry = store.add_cash_flow_entry(draft)?;
            println!("Created cash-flow entry:");
            println!("  ID:       {}", entry.id);
            println!("  Date:     {}", show_date(entry.date, settings));
            println!("  Type:     {}", entry.flow_type);
            println!("  Amount:   {}", entry.amount.format_with_symbol(symbol));
            println!("  Category: {}", entry.category);
        }

        CashFlowCommands::List { date, flow_type } => {
            store.set_date_filter(parse_optional_date(date, settings)?);

            let entries = match flow_type {
                Some(flow_type) => {
                    match parse_choice(&flow_type, FlowType::parse, "type", FLOW_TYPES)? {
                        FlowType::Inflow => store.inflows(),
                        FlowType::Outflow => store.outflows(),
                    }
                }
                None => store.cash_flow_entries(),
            };

            print!("{}", format_cash_flow_register(&entries, symbol));
            println!("\nShowing {} entries", entries.len());
        }

        CashFlowCommands::Show { id } => {
            let entry = store.find_cash_flow_entry(&id)?;
            print!("{}", format_cash_flow_details(entry, symbol));
        }

        CashFlowCommands::Edit {
            id,
            description,
            amount,
            flow_type,
            date,
            category,
            status,
            payment_method,
        } => {
            let entry_id = store.find_cash_flow_entry(&id)?.id;

            let patch = CashFlowEntryPatch {
                description,
                flow_type: flow_type
                    .map(|s| parse_choice(&s, FlowType::parse, "type", FLOW_TYPES))
                    .transpose()?,
                amount: parse_optional_amount(amount)?,
                date: parse_optional_date(date, settings)?,
                category,
                status: status
                    .map(|s| parse_choice(&s, EntryStatus::parse, "status", STATUSES))
                    .transpose()?,
                payment_method: payment_method
                    .map(|s| parse_choice(&s, PaymentMethod::parse, "payment method", PAYMENT_METHODS))
                    .transpose()?,
            };

            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let updated = store.update_cash_flow_entry(entry_id, patch)?;
            println!("Updated cash-flow entry: {}", updated.id);
            println!("  Date:   {}", show_date(updated.date, settings));
            println!("  Amount: {}", updated.amount.format_with_symbol(symbol));
        }

        CashFlowCommands::Delete { id } => {
            let entry_id = store.find_cash_flow_entry(&id)?.id;
            if let Some(deleted) = store.delete_cash_flow_entry(entry_id)? {
                println!("Deleted cash-flow entry: {} ({})", deleted.id, deleted.description);
            }
        }
    }

    Ok(())
}
