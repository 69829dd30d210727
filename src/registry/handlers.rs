use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    error::{deleted, ApiError},
    extract::{ApiJson, ApiPath},
    registry::repo::NameRegistry,
    state::AppState,
};

/// Selects one of the name registries held in [`AppState`].
pub trait RegistryKind: Send + Sync + 'static {
    /// Singular label used in messages, e.g. "Category".
    const LABEL: &'static str;
    fn registry(state: &AppState) -> &Arc<dyn NameRegistry>;
}

pub struct Categories;
pub struct Locations;

impl RegistryKind for Categories {
    const LABEL: &'static str = "Category";
    fn registry(state: &AppState) -> &Arc<dyn NameRegistry> {
        &state.categories
    }
}

impl RegistryKind for Locations {
    const LABEL: &'static str = "Location";
    fn registry(state: &AppState) -> &Arc<dyn NameRegistry> {
        &state.locations
    }
}

#[derive(Debug, Deserialize)]
pub struct AddNameRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct NameResponse {
    pub name: String,
}

pub fn registry_routes<K: RegistryKind>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(list_names::<K>).post(add_name::<K>))
        .route(&format!("{}/:name", base), delete(delete_name::<K>))
}

#[instrument(skip(state), fields(registry = K::LABEL))]
pub async fn list_names<K: RegistryKind>(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = K::registry(&state)
        .list()
        .await
        .map_err(ApiError::internal("Failed to fetch names"))?;
    Ok(Json(names))
}

#[instrument(skip(state, body), fields(registry = K::LABEL))]
pub async fn add_name<K: RegistryKind>(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddNameRequest>,
) -> Result<(StatusCode, Json<NameResponse>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation(format!("{} name is required", K::LABEL)));
    }
    let added = K::registry(&state)
        .add(name)
        .await
        .map_err(ApiError::internal("Failed to add name"))?;
    if !added {
        warn!(%name, "duplicate name");
        return Err(ApiError::conflict(format!("{} already exists", K::LABEL)));
    }
    info!(%name, "name added");
    Ok((
        StatusCode::CREATED,
        Json(NameResponse {
            name: name.to_string(),
        }),
    ))
}

/// `name` arrives percent-decoded.
#[instrument(skip(state), fields(registry = K::LABEL))]
pub async fn delete_name<K: RegistryKind>(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = K::registry(&state)
        .remove(&name)
        .await
        .map_err(ApiError::internal("Failed to delete name"))?;
    if !removed {
        return Err(ApiError::not_found(format!("{} not found", K::LABEL)));
    }
    info!(%name, "name deleted");
    Ok(deleted(K::LABEL))
}
