//! Smart entry CLI command

use clap::Args;

use super::{parse_amount, parse_choice, parse_date, today};
use crate::classifier::{classify_or_default, commit, Committed, EntryClassifier, EntryKind};
use crate::config::settings::Settings;
use crate::display::smart::format_guess;
use crate::error::{LedgerError, LedgerResult};
use crate::services::LedgerStore;
use crate::storage::Gateway;

const KINDS: &str = "cashflow, operational or negotiation";

/// Arguments of `bizledger smart`
#[derive(Args)]
pub struct SmartArgs {
    /// Free-text description, e.g. "paid 150 for fuel with pix"
    pub text: String,
    /// Commit the guess instead of only showing it
    #[arg(short, long)]
    pub yes: bool,
    /// File the guess as cashflow, operational or negotiation
    #[arg(short, long)]
    pub kind: Option<String>,
    /// Override the guessed amount
    #[arg(short, long)]
    pub amount: Option<String>,
    /// Override the guessed description
    #[arg(long)]
    pub description: Option<String>,
    /// Override the guessed category
    #[arg(short, long)]
    pub category: Option<String>,
    /// Override the guessed date
    #[arg(short, long)]
    pub date: Option<String>,
}

/// Classify free text, show the guess and commit it when asked
pub fn handle_smart_command<G: Gateway, C: EntryClassifier>(
    store: &mut LedgerStore<G>,
    settings: &Settings,
    classifier: &C,
    args: SmartArgs,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();
    if args.text.trim().is_empty() {
        return Err(LedgerError::Validation("Description must not be empty".into()));
    }

    let mut entry = classify_or_default(classifier, &args.text, today());

    if let Some(kind) = args.kind {
        entry = entry.with_kind(parse_choice(&kind, EntryKind::parse, "kind", KINDS)?);
    }
    {
        let guess = entry.guess_mut();
        if let Some(amount) = args.amount {
            guess.amount = parse_amount(&amount)?;
        }
        if let Some(description) = args.description {
            guess.description = description;
        }
        if let Some(category) = args.category {
            guess.category = category;
        }
        if let Some(date) = args.date {
            guess.date = parse_date(&date, settings)?;
        }
    }

    print!("{}", format_guess(&entry, symbol));

    if !args.yes {
        println!();
        println!("Use --yes to save this entry");
        return Ok(());
    }

    match commit(store, entry)? {
        Committed::CashFlow(entry) => println!("\nSaved cash-flow entry {}", entry.id),
        Committed::Operational(cost) => println!("\nSaved operational cost {}", cost.id),
        Committed::Debt(created) => {
            println!("\nSaved debt {}", created.debt.id);
            if let Some(cost) = created.installment_cost {
                println!("Saved installment cost {}", cost.id);
            }
        }
    }
    Ok(())
}
