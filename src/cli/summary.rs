//! Summary CLI command

use super::{parse_optional_date, today};
use crate::config::settings::Settings;
use crate::display::summary::format_summary;
use crate::error::LedgerResult;
use crate::services::{LedgerStore, LedgerSummary};
use crate::storage::Gateway;

/// Print every aggregate, optionally restricted to one date
pub fn handle_summary_command<G: Gateway>(
    store: &mut LedgerStore<G>,
    settings: &Settings,
    date: Option<String>,
) -> LedgerResult<()> {
    store.set_date_filter(parse_optional_date(date, settings)?);

    let summary = LedgerSummary::compute(store, today(), settings.upcoming_window_days);
    print!("{}", format_summary(&summary, &settings.currency_symbol));
    Ok(())
}
