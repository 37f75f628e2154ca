use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{header, StatusCode},
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{NewProduct, Product, ProductRepresentation, ReadOptions},
    AppState,
};

/// Ids arrive as raw path segments so each route can choose its own failure status.
fn parse_id(raw: &str, on_invalid: impl FnOnce() -> AppError) -> AppResult<i64> {
    raw.parse::<i64>().map_err(|_| on_invalid())
}

/// Collection path the request came through, e.g. `/api/fruits` for `/api/fruits/3`.
fn collection_base(item_path: &str) -> &str {
    item_path
        .trim_end_matches('/')
        .rsplit_once('/')
        .map(|(base, _)| base)
        .unwrap_or("")
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let start = Instant::now();
    let products = state.store.read_all().await?;

    info!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );

    Ok(Json(products))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<Product>)> {
    let Json(payload) = payload?;

    let start = Instant::now();
    let product = state.store.create(&payload).await.map_err(AppError::from_write)?;

    info!(
        id = product.id,
        name = %product.name,
        elapsed_ms = start.elapsed().as_millis(),
        "Created product"
    );

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(raw_id): Path<String>,
    options: Result<Query<ReadOptions>, QueryRejection>,
) -> AppResult<Json<ProductRepresentation>> {
    let id = parse_id(&raw_id, || AppError::BadRequest("invalid id".to_string()))?;
    let Query(options) = options?;

    let start = Instant::now();
    let product = state.store.read(id).await?;

    info!(id, elapsed_ms = start.elapsed().as_millis(), "Fetched product");

    let representation = if options.links {
        ProductRepresentation::with_links(product, collection_base(uri.path()))
    } else {
        ProductRepresentation::plain(product)
    };
    Ok(Json(representation))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&raw_id, || AppError::NotFound("unknown product".to_string()))?;
    let Json(payload) = payload?;

    let start = Instant::now();
    let product = state
        .store
        .update(id, &payload)
        .await
        .map_err(AppError::from_write)?;

    info!(id, elapsed_ms = start.elapsed().as_millis(), "Updated product");

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&raw_id, || AppError::NotFound("unknown product".to_string()))?;

    let start = Instant::now();
    state.store.delete(id).await.map_err(AppError::from_write)?;

    info!(id, elapsed_ms = start.elapsed().as_millis(), "Deleted product");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("42", || AppError::BadRequest(String::new())).unwrap(), 42);
        assert!(parse_id("4x2", || AppError::BadRequest(String::new())).is_err());
        assert!(parse_id("", || AppError::BadRequest(String::new())).is_err());
    }

    #[test]
    fn invalid_id_uses_route_specific_error() {
        let err = parse_id("abc", || AppError::NotFound("unknown product".into())).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn collection_base_strips_last_segment() {
        assert_eq!(collection_base("/products/3"), "/products");
        assert_eq!(collection_base("/api/fruits/12/"), "/api/fruits");
        assert_eq!(collection_base("/3"), "");
    }
}
