use std::{error::Error, path::Path, process::exit, str::FromStr};

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use spendmate_rs::{
    AccountDirectory, BudgetTracker,
    models::{MonthKey, Transaction, TransactionKind},
    stores::{TransactionStore, sqlite::create_app_state},
};

/// A utility for creating a test database for spendmate_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env()))
        .init();

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    let mut state = create_app_state(conn)?;

    println!("Creating test user...");
    let mut directory = AccountDirectory::new(state.user_store.clone());
    directory.register("test", "test123", "test@example.com")?;

    println!("Creating test transactions...");
    let seed_transactions = [
        Transaction::build(TransactionKind::Income, 2000)
            .date(date!(2024 - 03 - 01))
            .category("Salary")
            .memo(Some("March pay")),
        Transaction::build(TransactionKind::Expense, 50)
            .date(date!(2024 - 03 - 05))
            .category("Groceries"),
        Transaction::build(TransactionKind::Expense, 30)
            .date(date!(2024 - 03 - 12))
            .category("Transport")
            .memo(Some("Bus card top-up")),
    ];

    for builder in seed_transactions {
        state.transaction_store.create(builder)?;
    }

    println!("Creating test budget...");
    let mut tracker = BudgetTracker::new(state.budget_store, state.transaction_store);
    tracker.save_monthly_budget(MonthKey::from_str("2024-03")?, 500)?;

    println!("Success!");

    Ok(())
}
