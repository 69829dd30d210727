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
    requests::{
        dto::{CreateRequestBody, RequestStatusBody},
        repo_types::ItemRequest,
        services::{decide, new_request_from},
    },
    state::AppState,
};

pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/:id", get(get_request).delete(delete_request))
        .route("/requests/:id/status", patch(patch_request_status))
}

#[instrument(skip(state))]
pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemRequest>>, ApiError> {
    let requests = state
        .requests
        .list()
        .await
        .map_err(ApiError::internal("Failed to fetch requests"))?;
    Ok(Json(requests))
}

#[instrument(skip(state))]
pub async fn get_request(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ItemRequest>, ApiError> {
    state
        .requests
        .get(id)
        .await
        .map_err(ApiError::internal("Failed to fetch request"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Request not found"))
}

#[instrument(skip(state, body))]
pub async fn create_request(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateRequestBody>,
) -> Result<(StatusCode, Json<ItemRequest>), ApiError> {
    let new_request = new_request_from(body)?;
    let request = state
        .requests
        .create(new_request)
        .await
        .map_err(ApiError::internal("Failed to create request"))?;
    info!(request_id = %request.id, item_id = %request.item_id, "request created");
    Ok((StatusCode::CREATED, Json(request)))
}

#[instrument(skip(state, body))]
pub async fn patch_request_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<RequestStatusBody>,
) -> Result<Json<ItemRequest>, ApiError> {
    let request = decide(state.requests.as_ref(), id, &body.status).await?;
    Ok(Json(request))
}

#[instrument(skip(state))]
pub async fn delete_request(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state
        .requests
        .delete(id)
        .await
        .map_err(ApiError::internal("Failed to delete request"))?;
    if !removed {
        return Err(ApiError::not_found("Request not found"));
    }
    info!(request_id = %id, "request deleted");
    Ok(deleted("Request"))
}
