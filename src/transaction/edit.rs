//! Defines the endpoint for partially updating a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::Value;

use crate::{
    AppState, Error,
    category::{CategoryName, resolve_category},
    transaction::{
        TransactionChanges, TransactionId, TransactionResponse,
        payload::{
            amount_field, category_id_field, category_name_field, date_field, kind_field,
            optional_string,
        },
        update_transaction,
    },
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle PUT requests for updating a transaction.
///
/// Any subset of fields may be sent; absent fields are left untouched. An
/// explicit `categoryId` (including null, which uncategorizes) takes
/// precedence over a `categoryName`; a name alone is resolved, creating the
/// category on first use. Responds with 200 and the updated transaction, 400
/// with field details on validation failure, 404 when the transaction does
/// not exist, or 409 when `categoryId` does not refer to a real category.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Json(payload): Json<Value>,
) -> Result<Response, Error> {
    let (changes, category_name) = parse_update_payload(&payload)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let changes = match (changes.category_id, category_name) {
        (None, Some(name)) => TransactionChanges {
            category_id: Some(Some(resolve_category(name, &connection)?.id)),
            ..changes
        },
        _ => changes,
    };

    let transaction = update_transaction(transaction_id, &changes, &connection)?;

    Ok(Json(TransactionResponse::from(transaction)).into_response())
}

fn parse_update_payload(
    payload: &Value,
) -> Result<(TransactionChanges, Option<CategoryName>), Error> {
    let mut details = Vec::new();
    let mut changes = TransactionChanges::default();
    let mut category_name = None;

    match optional_string(payload, "date") {
        Ok(Some(raw)) => match date_field(raw, "date") {
            Ok(date) => changes.date = Some(date),
            Err(error) => details.push(error),
        },
        Ok(None) => {}
        Err(error) => details.push(error),
    }

    match optional_string(payload, "amount") {
        Ok(Some(raw)) => match amount_field(raw) {
            Ok(amount) => changes.amount = Some(amount),
            Err(error) => details.push(error),
        },
        Ok(None) => {}
        Err(error) => details.push(error),
    }

    match optional_string(payload, "type") {
        Ok(Some(raw)) => match kind_field(raw) {
            Ok(kind) => changes.kind = Some(kind),
            Err(error) => details.push(error),
        },
        Ok(None) => {}
        Err(error) => details.push(error),
    }

    match optional_string(payload, "note") {
        Ok(note) => changes.note = note.map(ToString::to_string),
        Err(error) => details.push(error),
    }

    match category_id_field(payload) {
        Ok(category_id) => changes.category_id = category_id,
        Err(error) => details.push(error),
    }

    match optional_string(payload, "categoryName") {
        Ok(Some(raw)) => match category_name_field(raw) {
            Ok(name) => category_name = Some(name),
            Err(error) => details.push(error),
        },
        Ok(None) => {}
        Err(error) => details.push(error),
    }

    if !details.is_empty() {
        return Err(Error::Validation(details));
    }

    Ok((changes, category_name))
}
