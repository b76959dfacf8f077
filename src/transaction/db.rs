//! Database operations for transactions.

use std::str::FromStr;

use rusqlite::{Connection, Row, params_from_iter, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    transaction::{
        NewTransaction, Transaction, TransactionChanges, TransactionId, TransactionKind,
        filter::TransactionFilter,
    },
};

const SELECT_JOINED: &str = "SELECT t.id, t.date, t.amount, t.kind, t.note, category.id, category.name \
     FROM \"transaction\" t \
     LEFT JOIN category ON t.category_id = category.id";

/// Create a new transaction in the database and return it with its category
/// resolved.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidCategory] if the category ID does not refer to a real
///   category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let id = connection
        .prepare(
            "INSERT INTO \"transaction\" (date, amount, kind, note, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id",
        )?
        .query_row(
            (
                new_transaction.date,
                new_transaction.amount.to_string(),
                new_transaction.kind.as_str(),
                new_transaction.note.as_deref(),
                new_transaction.category_id,
            ),
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(new_transaction.category_id),
            error => error.into(),
        })?;

    get_transaction(id, connection)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return an:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_JOINED} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the transactions matching `filter`, most recent first.
///
/// All filters combine with AND; ties on the date are broken by insertion
/// order so repeated queries return the same ordering.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut clauses = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(kind) = filter.kind {
        params.push(kind.as_str().to_string());
        clauses.push(format!("t.kind = ?{}", params.len()));
    }

    if let Some(category_id) = filter.category_id {
        params.push(category_id.to_string());
        clauses.push(format!("t.category_id = ?{}", params.len()));
    }

    if let Some(start_date) = filter.start_date {
        params.push(start_date.to_string());
        clauses.push(format!("t.date >= ?{}", params.len()));
    }

    if let Some(end_date) = filter.end_date {
        params.push(end_date.to_string());
        clauses.push(format!("t.date <= ?{}", params.len()));
    }

    if let Some(search) = &filter.search {
        params.push(format!("%{}%", search.to_lowercase()));
        let index = params.len();
        clauses.push(format!(
            "(LOWER(COALESCE(t.note, '')) LIKE ?{index} \
             OR LOWER(COALESCE(category.name, '')) LIKE ?{index})"
        ));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let query =
        format!("{SELECT_JOINED}{where_clause} ORDER BY t.date DESC, t.id ASC");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Apply a partial update to a transaction and return the updated row.
///
/// An empty change set leaves the row untouched and returns it as-is.
///
/// # Errors
/// This function will return an:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - [Error::InvalidCategory] if a replacement category ID does not refer to
///   a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    changes: &TransactionChanges,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut assignments = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(date) = changes.date {
        params.push(date.to_string());
        assignments.push(format!("date = ?{}", params.len()));
    }

    if let Some(amount) = changes.amount {
        params.push(amount.to_string());
        assignments.push(format!("amount = ?{}", params.len()));
    }

    if let Some(kind) = changes.kind {
        params.push(kind.as_str().to_string());
        assignments.push(format!("kind = ?{}", params.len()));
    }

    if let Some(note) = &changes.note {
        params.push(note.clone());
        assignments.push(format!("note = ?{}", params.len()));
    }

    match changes.category_id {
        Some(Some(category_id)) => {
            params.push(category_id.to_string());
            assignments.push(format!("category_id = ?{}", params.len()));
        }
        Some(None) => assignments.push("category_id = NULL".to_string()),
        None => {}
    }

    if assignments.is_empty() {
        return get_transaction(id, connection).map_err(|error| match error {
            Error::NotFound => Error::UpdateMissingTransaction,
            error => error,
        });
    }

    params.push(id.to_string());
    let query = format!(
        "UPDATE \"transaction\" SET {} WHERE id = ?{}",
        assignments.join(", "),
        params.len()
    );

    let rows_affected = connection
        .execute(&query, params_from_iter(params))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(changes.category_id.flatten()),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    get_transaction(id, connection)
}

/// Delete a transaction by ID. Returns an error if the transaction doesn't
/// exist.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount TEXT NOT NULL,
                kind TEXT NOT NULL,
                note TEXT,
                category_id INTEGER,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Add composite index used by the list and stats queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category ON \"transaction\"(date, category_id);",
        (),
    )?;

    Ok(())
}

/// Read a decimal amount from a TEXT column.
pub(crate) fn column_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(index)?;

    Decimal::from_str(&raw)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// Read a transaction kind from a TEXT column.
pub(crate) fn column_kind(row: &Row, index: usize) -> Result<TransactionKind, rusqlite::Error> {
    let raw: String = row.get(index)?;

    TransactionKind::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("\"{raw}\" is not a transaction kind").into(),
        )
    })
}

/// Map a joined database row to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let category_id: Option<CategoryId> = row.get(5)?;
    let category = match category_id {
        Some(id) => {
            let raw_name: String = row.get(6)?;
            Some(Category {
                id,
                name: CategoryName::new_unchecked(&raw_name),
            })
        }
        None => None,
    };

    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: column_decimal(row, 2)?,
        kind: column_kind(row, 3)?,
        note: row.get(4)?,
        category,
    })
}
