//! Defines the endpoint for fetching a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{TransactionId, TransactionResponse, get_transaction},
};

/// The state needed to fetch a transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle GET requests for a single transaction by ID.
///
/// Responds with 200 and the transaction, or 404 when it does not exist.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection)?;

    Ok(Json(TransactionResponse::from(transaction)).into_response())
}
