//! Pocketbook is a web service for tracking personal income and expenses.
//!
//! This library provides a REST API that serves JSON for a single page
//! application: transactions with optional categories, filtered listing, and
//! aggregate statistics. Amounts cross the API boundary as base-10 decimal
//! strings and are handled internally as fixed-point decimals, never binary
//! floats.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod category;
mod db;
mod endpoints;
mod logging;
mod money;
mod routing;
mod stats;
#[cfg(test)]
mod test_utils;
mod transaction;

pub use app_state::AppState;
pub use category::{Category, CategoryId, CategoryName, resolve_category};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::parse_amount;
pub use routing::build_router;
pub use transaction::{
    NewTransaction, Transaction, TransactionKind, count_transactions, create_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// A single field failure reported in the `details` of a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The name of the request field that failed validation.
    pub field: &'static str,
    /// What was wrong with the field.
    pub message: String,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body or query string failed validation.
    ///
    /// Each entry names the offending field so the client can report the
    /// failure next to the right input.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A category name longer than the maximum of 64 characters was used.
    #[error("category name cannot be longer than 64 characters")]
    CategoryNameTooLong,

    /// The category name already exists in the database.
    ///
    /// Category names are unique, so the client should pick a different name
    /// or reuse the existing category.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// The category ID used to create or update a transaction did not match
    /// a valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<CategoryId>),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body of an error response.
#[derive(Serialize)]
struct ErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(details) => validation_response(details),
            Error::EmptyCategoryName => validation_response(vec![FieldError {
                field: "name",
                message: Error::EmptyCategoryName.to_string(),
            }]),
            Error::CategoryNameTooLong => validation_response(vec![FieldError {
                field: "name",
                message: Error::CategoryNameTooLong.to_string(),
            }]),
            Error::DuplicateCategoryName(_) => {
                message_response(StatusCode::CONFLICT, "the category name is already in use")
            }
            Error::InvalidCategory(category_id) => {
                tracing::debug!("rejected dangling category reference {category_id:?}");
                message_response(
                    StatusCode::CONFLICT,
                    "the category ID does not refer to a valid category",
                )
            }
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory => message_response(StatusCode::NOT_FOUND, "Not found"),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                message_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

fn validation_response(details: Vec<FieldError>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            message: "Validation error",
            details: Some(details),
        }),
    )
        .into_response()
}

fn message_response(status: StatusCode, message: &'static str) -> Response {
    (
        status,
        Json(ErrorBody {
            message,
            details: None,
        }),
    )
        .into_response()
}
