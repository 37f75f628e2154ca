pub mod products;

use axum::http::StatusCode;

/// Liveness only: never touches the database.
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
