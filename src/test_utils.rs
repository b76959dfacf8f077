//! Shared helper functions for endpoint tests.

use axum::{body::to_bytes, response::Response};

/// Read a response body and parse it as JSON.
///
/// # Panics
/// Panics if the body cannot be read or is not valid JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("could not read response body");

    serde_json::from_slice(&bytes).expect("response body was not valid JSON")
}
