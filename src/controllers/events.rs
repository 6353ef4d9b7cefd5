use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::SeatId;
use crate::services::catalog::{seat_map_from_parts, EventInput};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events", post(create_event))
        .route("/events/{id}", get(get_event))
        .route("/events/{id}", put(update_event))
        .route("/events/{id}", delete(delete_event))
        .route("/events/{id}/occupied-seats", get(occupied_seats))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateEventRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    title: String,
    #[serde(default)]
    description: String,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    venue_id: Uuid,
    #[serde(default)]
    published: bool,
    seat_rows: Option<u32>,
    seats_per_row: Option<u32>,
    house_held_seats: Option<Vec<SeatId>>,
}

// Updates never touch the seat map: active bookings depend on it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateEventRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    title: String,
    #[serde(default)]
    description: String,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    venue_id: Uuid,
    #[serde(default)]
    published: bool,
}

// GET /api/events
async fn list_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "items": state.catalog.list_events() }))
}

// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.event(id)?))
}

// GET /api/events/{id}/occupied-seats
async fn occupied_seats(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let seats = state.bookings.occupied_seats(id)?;
    Ok(Json(json!({ "items": seats })))
}

// POST /api/events
async fn create_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let seat_map =
        seat_map_from_parts(req.seat_rows, req.seats_per_row, req.house_held_seats)?;
    let event = state.catalog.create_event(
        EventInput {
            title: req.title,
            description: req.description,
            start_at: req.start_at,
            end_at: req.end_at,
            venue_id: req.venue_id,
            published: req.published,
        },
        seat_map,
    )?;
    Ok((StatusCode::CREATED, Json(event)))
}

// PUT /api/events/{id}
async fn update_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let event = state.catalog.update_event(
        id,
        EventInput {
            title: req.title,
            description: req.description,
            start_at: req.start_at,
            end_at: req.end_at,
            venue_id: req.venue_id,
            published: req.published,
        },
    )?;
    Ok((StatusCode::OK, Json(event)))
}

// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    state.catalog.delete_event(id)?;
    state.engine.forget(id);
    Ok(StatusCode::NO_CONTENT)
}
