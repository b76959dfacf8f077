use std::error::Error;

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;

use pocketbook_rs::{
    CategoryName, NewTransaction, TransactionKind, count_transactions, create_transaction,
    initialize_db, parse_amount, resolve_category,
};

/// A utility for seeding a pocketbook_rs database with the default categories
/// and a couple of demo transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "pocketbook.db")]
    db_path: String,
}

const DEFAULT_CATEGORIES: [&str; 5] =
    ["Salary", "Food", "Transport", "Utilities", "Entertainment"];

/// Create the default categories, and demo transactions if the database has
/// none yet. Safe to run repeatedly.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    println!("Seeding default categories...");
    for name in DEFAULT_CATEGORIES {
        resolve_category(CategoryName::new(name)?, &connection)?;
    }

    if count_transactions(&connection)? == 0 {
        println!("Creating demo transactions...");
        let today = OffsetDateTime::now_utc().date();
        let food = resolve_category(CategoryName::new("Food")?, &connection)?;

        let salary = parse_amount("2500.00").ok_or("invalid demo amount")?;
        create_transaction(
            NewTransaction::new(today, salary, TransactionKind::Income)
                .note(Some("Monthly salary".to_string())),
            &connection,
        )?;

        let lunch = parse_amount("25.50").ok_or("invalid demo amount")?;
        create_transaction(
            NewTransaction::new(today, lunch, TransactionKind::Expense)
                .note(Some("Lunch".to_string()))
                .category_id(Some(food.id)),
            &connection,
        )?;
    }

    println!("Success!");

    Ok(())
}
