//! Defines the endpoint for listing transactions with filters.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{
        TransactionResponse,
        filter::{TransactionFilter, TransactionListQuery},
        get_transactions,
    },
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle GET requests for listing transactions, most recent first.
///
/// All query parameters are optional and combine with AND: `type`,
/// `categoryId`, `startDate`, `endDate` (both inclusive) and `search` (a
/// case-insensitive match against the note or category name). Responds with
/// 400 when a date parameter is malformed.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Response, Error> {
    let filter = TransactionFilter::from_query(query)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(&filter, &connection)?;
    let responses: Vec<TransactionResponse> = transactions
        .into_iter()
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(responses).into_response())
}
