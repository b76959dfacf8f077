//! Application router configuration wiring the JSON API routes.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::json;

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    stats::{get_monthly_stats_endpoint, get_summary_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::COFFEE, get(get_coffee))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::STATS_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::STATS_MONTHLY, get(get_monthly_stats_endpoint))
        .fallback(get_not_found)
        .with_state(state)
}

/// Report that the server is up.
async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({ "message": "I'm a teapot" })),
    )
        .into_response()
}

/// Respond to unknown paths with a JSON 404.
async fn get_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Not Found" })),
    )
        .into_response()
}
