use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use bizledger::audit::AuditLogger;
use bizledger::classifier::{HttpClassifier, OfflineClassifier};
use bizledger::cli::{
    handle_cash_flow_command, handle_cost_command, handle_debt_command, handle_history_command,
    handle_smart_command, handle_summary_command, CashFlowCommands, CostCommands, DebtCommands,
    SmartArgs,
};
use bizledger::config::{paths::LedgerPaths, settings::Settings};
use bizledger::services::LedgerStore;
use bizledger::storage::{initialize_storage, ConfiguredGateway};

#[derive(Parser)]
#[command(
    name = "bizledger",
    version,
    about = "Cash flow, operational cost and debt ledger for small businesses",
    long_about = "bizledger records money coming in and going out, the costs of \
                  running the business and the debts being renegotiated, and \
                  summarizes them from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the ledger data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Cash-flow entry commands
    #[command(subcommand, alias = "cf")]
    Cashflow(CashFlowCommands),

    /// Operational cost commands
    #[command(subcommand)]
    Cost(CostCommands),

    /// Debt commands
    #[command(subcommand)]
    Debt(DebtCommands),

    /// Show revenue, expenses, costs and debt totals
    Summary {
        /// Only count records on this date
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Turn a free-text description into a ledger entry
    Smart(SmartArgs),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    bizledger::init_tracing();
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("bizledger - small-business ledger");
            println!();
            println!("Run 'bizledger --help' for usage information.");
            println!("Run 'bizledger init' to set up the data directory.");
            return Ok(());
        }
    };

    match command {
        Commands::Init => {
            println!("Initializing bizledger at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths)?;
            settings.save(&paths)?;
            for table in created {
                println!("  Created {}", paths.table_file(table).display());
            }
            println!("Initialization complete!");
        }
        Commands::Config => {
            println!("bizledger Configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Due-soon window:  {} days", settings.upcoming_window_days);
            println!("  Gateway backend:  {:?}", settings.gateway.backend);
            if let Some(url) = &settings.gateway.url {
                println!("  Gateway URL:      {}", url);
            }
            match &settings.classifier.endpoint {
                Some(endpoint) => println!("  Classifier:       {}", endpoint),
                None => println!("  Classifier:       (not configured)"),
            }
        }
        Commands::History { limit } => {
            handle_history_command(&AuditLogger::new(paths.audit_log()), limit)?;
        }
        command => {
            let gateway = ConfiguredGateway::open(&paths, &settings)?;
            let mut store =
                LedgerStore::open(gateway)?.with_audit(AuditLogger::new(paths.audit_log()));

            match command {
                Commands::Cashflow(cmd) => handle_cash_flow_command(&mut store, &settings, cmd)?,
                Commands::Cost(cmd) => handle_cost_command(&mut store, &settings, cmd)?,
                Commands::Debt(cmd) => handle_debt_command(&mut store, &settings, cmd)?,
                Commands::Summary { date } => handle_summary_command(&mut store, &settings, date)?,
                Commands::Smart(args) => {
                    if settings.classifier.endpoint.is_none() {
                        handle_smart_command(&mut store, &settings, &OfflineClassifier, args)?;
                    } else {
                        match HttpClassifier::from_settings(&settings.classifier) {
                            Ok(classifier) => {
                                handle_smart_command(&mut store, &settings, &classifier, args)?
                            }
                            Err(e) => {
                                warn!(error = %e, "classifier unavailable");
                                handle_smart_command(&mut store, &settings, &OfflineClassifier, args)?
                            }
                        }
                    }
                }
                Commands::Init | Commands::Config | Commands::History { .. } => {}
            }
        }
    }

    Ok(())
}
