use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::seat::SeatId;

/// Every failure the API can surface. Engine failures pass through the
/// booking layer unchanged: a seat conflict is a business outcome the
/// client resolves by reselecting, never something we retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("not allowed to act on this resource")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("seats not in the event's seat map: {}", join_seats(.0))]
    InvalidSeat(Vec<SeatId>),
    #[error("seats are house-held and can never be booked: {}", join_seats(.0))]
    HouseHeld(Vec<SeatId>),
    #[error("seats already taken: {}", join_seats(.0))]
    SeatConflict(Vec<SeatId>),
    #[error("booking is already cancelled")]
    AlreadyCancelled,
    #[error("{0}")]
    Conflict(String),
    #[error("internal error")]
    Internal(String),
}

fn join_seats(seats: &[SeatId]) -> String {
    seats
        .iter()
        .map(SeatId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidSeat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::HouseHeld(_)
            | ApiError::SeatConflict(_)
            | ApiError::AlreadyCancelled
            | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "validation",
            ApiError::InvalidSeat(_) => "invalid_seat",
            ApiError::HouseHeld(_) => "house_held",
            ApiError::SeatConflict(_) => "seat_conflict",
            ApiError::AlreadyCancelled => "already_cancelled",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal",
        }
    }

    /// Seats named by the failure, so the client can reselect.
    fn seats(&self) -> Option<&[SeatId]> {
        match self {
            ApiError::InvalidSeat(seats)
            | ApiError::HouseHeld(seats)
            | ApiError::SeatConflict(seats) => Some(seats),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("internal error: {detail}");
        }
        let mut body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        if let Some(seats) = self.seats() {
            body["seats"] = json!(seats);
        }
        (self.status(), Json(body)).into_response()
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Internal(format!("bcrypt: {err}"))
    }
}
