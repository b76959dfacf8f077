//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{TransactionId, delete_transaction},
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle DELETE requests for removing a transaction.
///
/// Responds with 204 on success or 404 when the transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, &connection)?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            NewTransaction, TransactionKind, create_transaction,
            delete::DeleteTransactionState, delete_transaction_endpoint, get_transaction,
        },
    };

    fn get_transaction_state() -> DeleteTransactionState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize the database");

        DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_delete_a_transaction() {
        let state = get_transaction_state();
        let transaction = create_transaction(
            NewTransaction::new(date!(2024 - 01 - 20), dec!(25.50), TransactionKind::Expense),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test transaction");

        let response = delete_transaction_endpoint(State(state.clone()), Path(transaction.id))
            .await
            .expect("expected the transaction to be deleted");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            get_transaction(transaction.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_a_missing_transaction_returns_not_found() {
        let state = get_transaction_state();

        let result = delete_transaction_endpoint(State(state), Path(42)).await;

        assert_eq!(result.err(), Some(Error::DeleteMissingTransaction));
    }
}
