//! History CLI command

use crate::audit::AuditLogger;
use crate::display::history::format_history;
use crate::error::LedgerResult;

/// Print the most recent audit log entries
pub fn handle_history_command(logger: &AuditLogger, limit: usize) -> LedgerResult<()> {
    let entries = logger.recent(limit)?;
    print!("{}", format_history(&entries));
    Ok(())
}
