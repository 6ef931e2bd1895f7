//! Handlers for the demo catalog. Single-writer friendliness only; this
//! subsystem shares nothing with the relational entities.

use crate::app::catalog::{CatalogItem, CreateCatalogItem};
use crate::domain::error::ApiError;
use crate::transport::http::error::ErrorBody;
use crate::transport::http::types::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

#[utoipa::path(
    get,
    path = "/catalog",
    params(
        ("id" = Option<Vec<String>>, Query, description = "Optional repeated id filter")
    ),
    responses(
        (status = 200, description = "Catalog items, optionally filtered by id", body = [CatalogItem])
    )
)]
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(raw): Query<Vec<(String, String)>>,
) -> Json<Vec<CatalogItem>> {
    // Repeated `id=` parameters; serde_urlencoded cannot collect them
    // into a Vec field, so the raw pairs are filtered here.
    let ids: Vec<String> = raw
        .into_iter()
        .filter(|(key, _)| key == "id")
        .map(|(_, value)| value)
        .collect();
    if ids.is_empty() {
        Json(state.catalog.list().await)
    } else {
        Json(state.catalog.list_by_ids(&ids).await)
    }
}

#[utoipa::path(
    get,
    path = "/catalog/{id}",
    params(("id" = String, Path, description = "Catalog item id")),
    responses(
        (status = 200, description = "Item found", body = CatalogItem),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
pub async fn get_catalog_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CatalogItem>, ApiError> {
    state
        .catalog
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Object with id '{id}' not found")))
}

#[utoipa::path(
    post,
    path = "/catalog",
    request_body = CreateCatalogItem,
    responses(
        (status = 201, description = "Item added with a generated id", body = CatalogItem)
    )
)]
pub async fn add_catalog_item(
    State(state): State<AppState>,
    Json(body): Json<CreateCatalogItem>,
) -> (StatusCode, Json<CatalogItem>) {
    let item = state.catalog.add(body).await;
    (StatusCode::CREATED, Json(item))
}

#[utoipa::path(
    delete,
    path = "/catalog/{id}",
    params(("id" = String, Path, description = "Catalog item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
pub async fn delete_catalog_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.catalog.remove(&id).await {
        return Err(ApiError::NotFound(format!("Object with id '{id}' not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
