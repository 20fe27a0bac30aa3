use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::error::ApiResult;
use super::AppState;
use crate::catalog::{CatalogError, CatalogItem, ItemFilters, ItemPatch, NewItem};

/// Query parameters accepted by `GET /items`.
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    /// Exact-title search. When present the other parameters are ignored.
    name: Option<String>,
    #[serde(rename = "type")]
    item_type: Option<String>,
    /// Availability flag; only `true` and `1` count as true, any other
    /// value means false.
    available: Option<String>,
}

impl ListItemsQuery {
    fn into_filters(self) -> ItemFilters {
        ItemFilters {
            exact_title: self.name,
            item_type: self.item_type,
            available: self.available.as_deref().map(parse_flag),
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw, "true" | "1")
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Json<Vec<CatalogItem>> {
    Json(state.repository.list(&query.into_filters()).await)
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<CatalogItem>> {
    let item = state.repository.get(id).await?;
    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<NewItem>,
) -> ApiResult<(StatusCode, Json<CatalogItem>)> {
    let item = state.repository.create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<ItemPatch>,
) -> ApiResult<Json<CatalogItem>> {
    let item = state.repository.update(id, &payload).await?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let removed = state.repository.delete(id).await?;
    if removed {
        return Ok(Json(json!({ "status": "deleted" })));
    }
    Err(CatalogError::NotFound(id).into())
}

/// Liveness probe. Touches the repository so a wedged state lock
/// shows up here and not only on real requests.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let count = state.repository.len().await;
    debug!("Health check, {} item(s) in catalog", count);
    Json(json!({ "status": "ok" }))
}
