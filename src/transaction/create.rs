//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;
use time::Date;

use crate::{
    AppState, Error, FieldError,
    category::{CategoryId, CategoryName, resolve_category},
    transaction::{
        NewTransaction, TransactionKind, TransactionResponse, create_transaction,
        payload::{
            amount_field, category_id_field, category_name_field, date_field, kind_field,
            optional_string,
        },
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The validated field set of a create request.
#[derive(Debug)]
struct CreateTransactionData {
    date: Date,
    amount: Decimal,
    kind: TransactionKind,
    note: Option<String>,
    category_id: Option<CategoryId>,
    category_name: Option<CategoryName>,
}

/// Handle POST requests for creating a new transaction.
///
/// A `categoryName` in the body is resolved to a category, creating one on
/// first use, unless an explicit `categoryId` is given. Responds with 201 and
/// the created transaction, 400 with field details on validation failure, or
/// 409 when `categoryId` does not refer to a real category.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(payload): Json<Value>,
) -> Result<Response, Error> {
    let data = parse_create_payload(&payload)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category_id = match (data.category_id, data.category_name) {
        (Some(category_id), _) => Some(category_id),
        (None, Some(name)) => Some(resolve_category(name, &connection)?.id),
        (None, None) => None,
    };

    let transaction = create_transaction(
        NewTransaction::new(data.date, data.amount, data.kind)
            .note(data.note)
            .category_id(category_id),
        &connection,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::from(transaction)),
    )
        .into_response())
}

fn parse_create_payload(payload: &Value) -> Result<CreateTransactionData, Error> {
    let mut details = Vec::new();

    let date = parse_required(payload, "date", &mut details, date_field);
    let amount = parse_required(payload, "amount", &mut details, |raw, _| amount_field(raw));
    let kind = parse_required(payload, "type", &mut details, |raw, _| kind_field(raw));

    let note = match optional_string(payload, "note") {
        Ok(note) => note.map(ToString::to_string),
        Err(error) => {
            details.push(error);
            None
        }
    };

    // An explicit null is the same as leaving the category out on create.
    let category_id = match category_id_field(payload) {
        Ok(category_id) => category_id.flatten(),
        Err(error) => {
            details.push(error);
            None
        }
    };

    let category_name = match optional_string(payload, "categoryName") {
        Ok(Some(raw)) => match category_name_field(raw) {
            Ok(name) => Some(name),
            Err(error) => {
                details.push(error);
                None
            }
        },
        Ok(None) => None,
        Err(error) => {
            details.push(error);
            None
        }
    };

    match (date, amount, kind) {
        (Some(date), Some(amount), Some(kind)) if details.is_empty() => Ok(CreateTransactionData {
            date,
            amount,
            kind,
            note,
            category_id,
            category_name,
        }),
        _ => Err(Error::Validation(details)),
    }
}

fn parse_required<T>(
    payload: &Value,
    field: &'static str,
    details: &mut Vec<FieldError>,
    parse: impl FnOnce(&str, &'static str) -> Result<T, FieldError>,
) -> Option<T> {
    match optional_string(payload, field) {
        Ok(Some(raw)) => match parse(raw, field) {
            Ok(value) => Some(value),
            Err(error) => {
                details.push(error);
                None
            }
        },
        Ok(None) => {
            details.push(FieldError {
                field,
                message: format!("{field} is required"),
            });
            None
        }
        Err(error) => {
            details.push(error);
            None
        }
    }
}
