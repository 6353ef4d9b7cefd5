use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::{bearer_token, AuthUser};
use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/profile", get(profile))
}

#[derive(Debug, Deserialize, Validate)]
struct RegisterRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: User,
}

// POST /api/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let (user, token) = state.auth.register(&req.email, &req.password)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, token) = state.auth.login(&req.email, &req.password)?;
    Ok((StatusCode::OK, Json(AuthResponse { token, user })))
}

// POST /api/auth/logout
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthenticated)?;
    state.auth.invalidate(&token);
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/profile
async fn profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.user(user.user_id)?;
    Ok((StatusCode::OK, Json(user)))
}
