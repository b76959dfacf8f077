//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{create_category, parse_category_payload},
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle POST requests for creating a category.
///
/// Responds with 201 and the created category, 400 when the name is missing
/// or invalid, or 409 when the name is already in use.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Response, Error> {
    let name = parse_category_payload(&payload)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(name, &connection)?;

    Ok((StatusCode::CREATED, Json(category)).into_response())
}
