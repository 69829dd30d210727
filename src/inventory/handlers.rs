use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{deleted, ApiError},
    extract::{ApiJson, ApiPath},
    inventory::{
        dto::{CreateItemRequest, StatusRequest, UpdateItemRequest},
        repo_types::InventoryItem,
        services::{new_item_from, transition, update_item},
    },
    state::AppState,
};

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_items).post(create_item))
        .route(
            "/inventory/:id",
            get(get_item).put(put_item).delete(delete_item),
        )
        .route("/inventory/:id/status", patch(patch_status))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    let items = state
        .items
        .list()
        .await
        .map_err(ApiError::internal("Failed to fetch inventory items"))?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<InventoryItem>, ApiError> {
    state
        .items
        .get(id)
        .await
        .map_err(ApiError::internal("Failed to fetch item"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Item not found"))
}

#[instrument(skip(state, body))]
pub async fn create_item(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    let new_item = new_item_from(body)?;
    let item = state
        .items
        .create(new_item)
        .await
        .map_err(ApiError::internal("Failed to create item"))?;
    info!(item_id = %item.id, name = %item.name, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, body))]
pub async fn put_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateItemRequest>,
) -> Result<Json<InventoryItem>, ApiError> {
    let item = update_item(state.items.as_ref(), id, body).await?;
    Ok(Json(item))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state
        .items
        .delete(id)
        .await
        .map_err(ApiError::internal("Failed to delete item"))?;
    if !removed {
        return Err(ApiError::not_found("Item not found"));
    }
    info!(item_id = %id, "item deleted");
    Ok(deleted("Item"))
}

/// Check out, return or send an item to repair.
#[instrument(skip(state, body))]
pub async fn patch_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<Json<InventoryItem>, ApiError> {
    let item = transition(state.items.as_ref(), id, &body.status).await?;
    Ok(Json(item))
}
