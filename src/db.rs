//! Database initialization for the application's SQLite store.

use rusqlite::Connection;

use crate::{Error, category::create_category_table, transaction::create_transaction_table};

/// Create the application tables if they do not already exist.
///
/// Also enables foreign key enforcement for the connection, which SQLite
/// leaves off by default. The transaction table relies on it to null out
/// category references when a category is deleted.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    create_category_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
