use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Booking, BookingStatus, SeatId};

use super::catalog::CatalogStore;
use super::reservations::SeatReservationEngine;

/// Owns booking records and their single state transition
/// (active -> cancelled). Seat holds are delegated to the reservation
/// engine; engine failures pass through to the caller untouched.
pub struct BookingService {
    bookings: DashMap<Uuid, Booking>,
    engine: Arc<SeatReservationEngine>,
    catalog: Arc<CatalogStore>,
    seat_price: u64,
    currency: String,
}

impl BookingService {
    pub fn new(
        engine: Arc<SeatReservationEngine>,
        catalog: Arc<CatalogStore>,
        seat_price: u64,
        currency: String,
    ) -> Self {
        BookingService { bookings: DashMap::new(), engine, catalog, seat_price, currency }
    }

    /// Reserve the seats, then persist the booking. The booking record is
    /// written outside the engine's critical section, after the seats are
    /// already ours, so contention stays bounded to the check-and-mark.
    pub fn create(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        seats: Vec<SeatId>,
    ) -> Result<Booking, ApiError> {
        let event = self.catalog.event(event_id)?;
        self.engine.reserve(&event, &seats)?;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            status: BookingStatus::Active,
            total_price: seats.len() as u64 * self.seat_price,
            currency: self.currency.clone(),
            seats,
            created_at: now,
            updated_at: now,
        };
        self.bookings.insert(booking.id, booking.clone());
        info!(booking_id = %booking.id, event_id = %event_id, "booking created");
        Ok(booking)
    }

    /// Cancel a booking on behalf of `user_id`. Admins may cancel any
    /// booking; everyone else only their own. Cancelling twice is an
    /// error, not a silent success. The status flip is recorded before
    /// the seats are released: a failure in between over-holds seats,
    /// which is safe, rather than double-releasing them.
    pub fn cancel(&self, booking_id: Uuid, user_id: Uuid, admin: bool) -> Result<(), ApiError> {
        let (event_id, seats) = {
            let mut booking = self
                .bookings
                .get_mut(&booking_id)
                .ok_or(ApiError::NotFound("booking"))?;
            if booking.user_id != user_id && !admin {
                return Err(ApiError::Forbidden);
            }
            if booking.status == BookingStatus::Cancelled {
                return Err(ApiError::AlreadyCancelled);
            }
            booking.status = BookingStatus::Cancelled;
            booking.updated_at = Utc::now();
            (booking.event_id, booking.seats.clone())
        };

        self.engine.release(event_id, &seats);
        info!(booking_id = %booking_id, "booking cancelled");
        Ok(())
    }

    /// All bookings owned by the user, active and cancelled, newest first.
    pub fn list_for_user(&self, user_id: Uuid) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.clone())
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        bookings
    }

    /// Occupied-seat snapshot for an event, for rendering the seat map.
    pub fn occupied_seats(&self, event_id: Uuid) -> Result<Vec<SeatId>, ApiError> {
        let event = self.catalog.event(event_id)?;
        Ok(self.engine.occupied(&event))
    }
}
