//! Statistics HTTP handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    money::format_total,
    stats::aggregation::{AmountEntry, format_month, monthly_series, summarize},
    transaction::{column_decimal, column_kind},
};

/// The state needed for the statistics endpoints.
#[derive(Debug, Clone)]
pub struct StatsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON shape of the summary endpoint: overall totals as decimal strings
/// with exactly two fractional digits.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Sum of all income amounts.
    pub income: String,
    /// Sum of all expense amounts.
    pub expense: String,
    /// Income minus expense.
    pub balance: String,
}

/// The JSON shape of one entry of the monthly series.
#[derive(Debug, Serialize)]
pub struct MonthlyTotalsResponse {
    /// The calendar month as `YYYY-MM`.
    pub month: String,
    /// The month's income total.
    pub income: String,
    /// The month's expense total.
    pub expense: String,
}

/// Handle GET requests for the overall income, expense and balance totals.
///
/// An empty store reports "0.00" for all three.
pub async fn get_summary_endpoint(
    State(state): State<StatsState>,
) -> Result<Json<SummaryResponse>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_amount_entries(&connection)?;
    let summary = summarize(&entries);

    Ok(Json(SummaryResponse {
        income: format_total(summary.income),
        expense: format_total(summary.expense),
        balance: format_total(summary.balance),
    }))
}

/// Handle GET requests for the monthly income/expense series.
///
/// Returns at most the twelve most recent months that contain transactions,
/// oldest first. Months without transactions are omitted.
pub async fn get_monthly_stats_endpoint(
    State(state): State<StatsState>,
) -> Result<Json<Vec<MonthlyTotalsResponse>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_amount_entries(&connection)?;
    let series = monthly_series(&entries);

    Ok(Json(
        series
            .into_iter()
            .map(|totals| MonthlyTotalsResponse {
                month: format_month(totals.month),
                income: format_total(totals.income),
                expense: format_total(totals.expense),
            })
            .collect(),
    ))
}

/// Get the date, amount and kind of every transaction.
fn get_amount_entries(connection: &Connection) -> Result<Vec<AmountEntry>, Error> {
    connection
        .prepare("SELECT date, amount, kind FROM \"transaction\";")?
        .query_map([], |row| {
            Ok(AmountEntry {
                date: row.get(0)?,
                amount: column_decimal(row, 1)?,
                kind: column_kind(row, 2)?,
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}
