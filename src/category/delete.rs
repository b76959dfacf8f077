//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{CategoryId, delete_category},
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle DELETE requests for removing a category.
///
/// Responds with 204 on success or 404 when the category does not exist.
/// Transactions referencing the category become uncategorized.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryState>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_category(category_id, &connection)?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            CategoryName, create_category, delete::DeleteCategoryState, delete_category_endpoint,
            get_category,
        },
        db::initialize,
        money::parse_amount,
        transaction::{NewTransaction, TransactionKind, create_transaction, get_transaction},
    };

    fn get_category_state() -> DeleteCategoryState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize the database");

        DeleteCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_delete_category() {
        let state = get_category_state();
        let category = create_category(
            CategoryName::new_unchecked("ToDelete"),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category");

        let response = delete_category_endpoint(State(state.clone()), Path(category.id))
            .await
            .expect("expected the category to be deleted");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            get_category(category.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_missing_category_returns_not_found() {
        let state = get_category_state();

        let result = delete_category_endpoint(State(state), Path(42)).await;

        assert_eq!(result.err(), Some(Error::DeleteMissingCategory));
    }

    #[tokio::test]
    async fn deleting_a_category_uncategorizes_its_transactions() {
        let state = get_category_state();
        let (category, transaction) = {
            let connection = state.db_connection.lock().unwrap();
            let category = create_category(CategoryName::new_unchecked("Food"), &connection)
                .expect("Could not create test category");
            let transaction = create_transaction(
                NewTransaction::new(
                    time::macros::date!(2024 - 01 - 20),
                    parse_amount("25.50").unwrap(),
                    TransactionKind::Expense,
                )
                .category_id(Some(category.id)),
                &connection,
            )
            .expect("Could not create test transaction");
            (category, transaction)
        };

        delete_category_endpoint(State(state.clone()), Path(category.id))
            .await
            .expect("expected the category to be deleted");

        let orphaned = get_transaction(transaction.id, &state.db_connection.lock().unwrap())
            .expect("expected the transaction to survive the category deletion");
        assert_eq!(orphaned.category, None);
    }
}
