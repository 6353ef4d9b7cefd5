use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::seat::SeatId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

/// A booking only ever moves active -> cancelled, exactly once.
/// Seats held by a cancelled booking go back to the pool immediately.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: BookingStatus,
    pub total_price: u64,
    pub currency: String,
    pub seats: Vec<SeatId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
