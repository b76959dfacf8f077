//! Category rename endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{CategoryId, parse_category_payload, update_category},
};

/// The state needed for renaming a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle PUT requests for renaming a category.
///
/// Responds with 200 and the renamed category, 400 when the name is invalid,
/// 404 when the category does not exist, or 409 when the new name is already
/// in use.
pub async fn update_category_endpoint(
    State(state): State<UpdateCategoryState>,
    Path(category_id): Path<CategoryId>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Response, Error> {
    let name = parse_category_payload(&payload)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = update_category(category_id, name, &connection)?;

    Ok(Json(category).into_response())
}

#[cfg(test)]
mod update_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        Error,
        category::{
            CategoryName, create_category, create_category_table, edit::UpdateCategoryState,
            get_category, update_category_endpoint,
        },
    };

    fn get_category_state() -> UpdateCategoryState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_category_table(&connection).expect("Could not create category table");

        UpdateCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_rename_category() {
        let state = get_category_state();
        let category = create_category(
            CategoryName::new_unchecked("Original"),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category");
        let payload = json!({ "name": "Updated" });

        let response =
            update_category_endpoint(State(state.clone()), Path(category.id), Json(payload))
                .await
                .expect("expected the category to be renamed");

        assert_eq!(response.status(), StatusCode::OK);
        let renamed = get_category(category.id, &state.db_connection.lock().unwrap())
            .expect("expected the category to be in the database");
        assert_eq!(renamed.name, CategoryName::new_unchecked("Updated"));
    }

    #[tokio::test]
    async fn rename_missing_category_returns_not_found() {
        let state = get_category_state();
        let payload = json!({ "name": "Updated" });

        let result = update_category_endpoint(State(state), Path(42), Json(payload)).await;

        assert_eq!(result.err(), Some(Error::UpdateMissingCategory));
    }

    #[tokio::test]
    async fn rename_to_duplicate_name_returns_conflict() {
        let state = get_category_state();
        let (food, transport) = {
            let connection = state.db_connection.lock().unwrap();
            let food = create_category(CategoryName::new_unchecked("Food"), &connection)
                .expect("Could not create test category");
            let transport = create_category(CategoryName::new_unchecked("Transport"), &connection)
                .expect("Could not create test category");
            (food, transport)
        };
        let payload = json!({ "name": food.name.to_string() });

        let result = update_category_endpoint(State(state), Path(transport.id), Json(payload)).await;

        assert_eq!(
            result.err(),
            Some(Error::DuplicateCategoryName("Food".to_string()))
        );
    }
}
