mod tui;

use cashbook::TransactionStore;
use cashbook::operations::add::{TransactionInput, add_transaction_to_db};
use cashbook::operations::edit::edit_transaction_in_db;
use cashbook::operations::remove::remove_transaction_from_db;
use cashbook::operations::summary::DashboardSummary;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Record income and expenses and see where the money goes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long, default_value = "finance.db")]
    db_path: PathBuf,

    /// File the log is appended to. The terminal is reserved for the dashboard.
    #[arg(long, default_value = "cashbook.log")]
    log_file: PathBuf,

    /// Log filter, e.g. `info` or `cashbook=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive dashboard (the default).
    Dashboard,
    /// Add a transaction.
    Add {
        /// Income or Expense.
        kind: String,
        amount: String,
        /// DD-MM-YYYY.
        date: String,
        #[arg(default_value = "")]
        description: String,
    },
    /// Replace every field of an existing transaction.
    Edit {
        id: i64,
        kind: String,
        amount: String,
        date: String,
        #[arg(default_value = "")]
        description: String,
    },
    /// Delete a transaction by ID.
    Delete { id: String },
    /// Print every transaction.
    List,
    /// Print the balance and the income/expense totals.
    Summary,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = setup_logging(&args) {
        eprintln!("Could not set up logging: {e}");
        return ExitCode::FAILURE;
    }

    let store = match TransactionStore::open(&args.db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open database '{}': {}", args.db_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(&store, args.command.unwrap_or(Command::Dashboard)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(args: &Args) -> Result<(), String> {
    let filter = EnvFilter::try_new(&args.log_level)
        .map_err(|e| format!("invalid log level '{}': {}", args.log_level, e))?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)
        .map_err(|e| format!("cannot open '{}': {}", args.log_file.display(), e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .init();

    Ok(())
}

fn run(store: &TransactionStore, command: Command) -> Result<(), String> {
    match command {
        Command::Dashboard => {
            tracing::info!("starting dashboard");
            tui::run_dashboard(store).map_err(|e| format!("Terminal error: {e}"))
        }
        Command::Add { kind, amount, date, description } => {
            let input = TransactionInput::new(kind, amount, date, description);
            let id = add_transaction_to_db(store, &input).map_err(|e| format!("Error adding transaction: {e}"))?;
            println!("Transaction {id} added successfully!");
            Ok(())
        }
        Command::Edit { id, kind, amount, date, description } => {
            let input = TransactionInput::new(kind, amount, date, description);
            edit_transaction_in_db(store, id, &input).map_err(|e| format!("Error updating transaction: {e}"))?;
            println!("Transaction {id} updated successfully!");
            Ok(())
        }
        Command::Delete { id } => {
            let id = remove_transaction_from_db(store, &id).map_err(|e| format!("Error deleting transaction: {e}"))?;
            println!("Transaction {id} deleted successfully!");
            Ok(())
        }
        Command::List => {
            let transactions = store.list_all().map_err(|e| e.to_string())?;
            if transactions.is_empty() {
                println!("No transactions recorded.");
            }
            for tx in &transactions {
                println!(
                    "{:>5}  {:<8} {:>12.2}  {}  {}",
                    tx.id,
                    tx.transaction_type,
                    tx.amount,
                    tx.formatted_date(),
                    tx.description
                );
            }
            Ok(())
        }
        Command::Summary => {
            let transactions = store.list_all().map_err(|e| e.to_string())?;
            let summary = DashboardSummary::from_transactions(&transactions);
            println!("{}", summary.balance_label());
            if summary.split.is_empty() {
                println!("No Data Available");
            }
            for ((transaction_type, total), (_, share)) in summary.split.iter().zip(&summary.shares) {
                println!("{transaction_type:<8} {total:>12.2}  ({share:.1}%)");
            }
            Ok(())
        }
    }
}
