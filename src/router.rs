//! Route table. The product endpoints are mounted under both collection
//! names; they share one store and one set of handlers.

use std::path::Path;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{error, handlers, AppState};

pub const PRODUCTS_BASE: &str = "/products";
pub const FRUITS_BASE: &str = "/api/fruits";

pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    // ── Health ──────────────────────────────────────────────────────────────
    let mut router: Router<AppState> = Router::new().route("/health", get(handlers::health));

    // ── Products CRUD ───────────────────────────────────────────────────────
    for base in [PRODUCTS_BASE, FRUITS_BASE] {
        router = router
            .route(
                base,
                get(handlers::products::list_products).post(handlers::products::create_product),
            )
            .route(
                &format!("{}/:id", base),
                get(handlers::products::get_product)
                    .put(handlers::products::update_product)
                    .delete(handlers::products::delete_product),
            );
    }

    // ── Web interface ───────────────────────────────────────────────────────
    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    // ── Middleware ──────────────────────────────────────────────────────────
    router
        .layer(middleware::from_fn(error::attach_request_uri))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
