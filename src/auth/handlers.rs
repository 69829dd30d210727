use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        repo_types::{Role, User},
        services::{
            hash_password, is_valid_email, normalize_email, verify_against_dummy, verify_password,
            AuthUser, JwtKeys, MIN_PASSWORD_LEN,
        },
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
}

fn issue(state: &AppState, user: User) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let token = keys
        .sign(&user)
        .map_err(ApiError::internal("Failed to issue token"))?;
    Ok(AuthResponse {
        user: user.into(),
        token,
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = normalize_email(&payload.email);
    let name = payload.name.trim();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::validation("Password too short"));
    }

    // Cheap pre-check so duplicates skip the argon2 cost
    let existing = state
        .users
        .find_by_email(&email)
        .await
        .map_err(ApiError::internal("Failed to register user"))?;
    if existing.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::conflict("User already exists"));
    }

    let hash =
        hash_password(&payload.password).map_err(ApiError::internal("Failed to register user"))?;

    let user = state
        .users
        .create(&email, name, &hash, Role::User)
        .await
        .map_err(ApiError::internal("Failed to register user"))?
        .ok_or_else(|| {
            warn!(email = %email, "email registered concurrently");
            ApiError::conflict("User already exists")
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(issue(&state, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = normalize_email(&payload.email);

    let user = match state
        .users
        .find_by_email(&email)
        .await
        .map_err(ApiError::internal("Failed to login"))?
    {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            verify_against_dummy(&payload.password);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(ApiError::internal("Failed to login"))?;
    if !ok {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(issue(&state, user)?))
}

#[instrument(skip(state, claims))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .users
        .find_by_id(claims.sub)
        .await
        .map_err(ApiError::internal("Failed to load user"))?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, "token for unknown user");
            ApiError::not_found("User not found")
        })?;

    Ok(Json(user.into()))
}
