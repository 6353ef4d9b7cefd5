use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::catalog::VenueInput;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues", post(create_venue))
        .route("/venues/{id}", get(get_venue))
        .route("/venues/{id}", put(update_venue))
        .route("/venues/{id}", delete(delete_venue))
}

#[derive(Debug, Deserialize, Validate)]
struct VenueRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
    #[serde(default)]
    address: String,
}

// GET /api/venues
async fn list_venues(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "items": state.catalog.list_venues() }))
}

// GET /api/venues/{id}
async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.venue(id)?))
}

// POST /api/venues
async fn create_venue(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<VenueRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let venue = state.catalog.create_venue(VenueInput {
        name: req.name,
        address: req.address,
    })?;
    Ok((StatusCode::CREATED, Json(venue)))
}

// PUT /api/venues/{id}
async fn update_venue(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<VenueRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let venue = state.catalog.update_venue(
        id,
        VenueInput {
            name: req.name,
            address: req.address,
        },
    )?;
    Ok((StatusCode::OK, Json(venue)))
}

// DELETE /api/venues/{id}. Returns 409 while any event references the venue.
async fn delete_venue(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    state.catalog.delete_venue(id)?;
    Ok(StatusCode::NO_CONTENT)
}
