use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::SeatId;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(list_bookings))
        .route("/bookings", post(create_booking))
        .route("/bookings/{id}", delete(cancel_booking))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    event_id: Uuid,
    seats: Vec<String>,
}

// GET /api/bookings
async fn list_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> impl IntoResponse {
    let bookings = state.bookings.list_for_user(user.user_id);
    Json(json!({ "items": bookings }))
}

// POST /api/bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let seats: Vec<SeatId> = req
        .seats
        .iter()
        .map(|s| s.parse())
        .collect::<Result<_, _>>()?;
    let booking = state.bookings.create(user.user_id, req.event_id, seats)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// DELETE /api/bookings/{id}
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.bookings.cancel(id, user.user_id, user.is_admin())?;
    Ok(StatusCode::NO_CONTENT)
}
