use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::store::StoreError;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/register - create an account
pub async fn auth_register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (username, password) = credentials(payload)?;

    let password_hash = hash(&password, DEFAULT_COST).map_err(|e| {
        tracing::error!("bcrypt hash failed: {}", e);
        ApiError::internal_server_error("Server error")
    })?;

    let user = match state.users.create(&username, &password_hash).await {
        Ok(user) => user,
        Err(StoreError::Duplicate(_)) => {
            return Err(ApiError::conflict("Username already taken"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": user.id, "username": user.username })),
    ))
}

/// POST /auth/login - verify credentials and mint a bearer token.
/// Unknown user and wrong password get the same answer.
pub async fn auth_login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let (username, password) = credentials(payload)?;

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let password_ok = verify(&password, &user.password_hash).map_err(|e| {
        tracing::error!("bcrypt verify failed: {}", e);
        ApiError::internal_server_error("Server error")
    })?;
    if !password_ok {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let token = generate_jwt(Claims::new(user.id.to_string())).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal_server_error("Server error")
    })?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(Json(json!({ "token": token, "expiresIn": expires_in })))
}

fn credentials(
    payload: Result<Json<CredentialPayload>, JsonRejection>,
) -> Result<(String, String), ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    let username = body
        .username
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::validation("All fields are required"))?;
    let password = body
        .password
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::validation("All fields are required"))?;

    Ok((username, password))
}
