use dashmap::DashMap;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Event, SeatId};

/// Authoritative per-event registry of seats held by active bookings.
///
/// `reserve` is the only place double-booking could slip in, so the
/// check-then-hold step runs under the per-event map entry, which is
/// exclusive for the duration of the call. State for different events
/// lives in separate entries and never shares a lock with the whole map.
#[derive(Debug, Default)]
pub struct SeatReservationEngine {
    held: DashMap<Uuid, HashSet<SeatId>>,
}

impl SeatReservationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically hold every requested seat for the event, or hold none.
    ///
    /// Fails with `Validation` for an empty or duplicated request,
    /// `InvalidSeat` for seats outside the event's map, `HouseHeld` for
    /// permanently blocked seats, and `SeatConflict` (naming the
    /// contended subset) when another active booking got there first.
    pub fn reserve(&self, event: &Event, seats: &[SeatId]) -> Result<(), ApiError> {
        if seats.is_empty() {
            return Err(ApiError::Validation("seat list must not be empty".to_string()));
        }
        let mut unique = HashSet::with_capacity(seats.len());
        if let Some(dup) = seats.iter().find(|s| !unique.insert(*s)) {
            return Err(ApiError::Validation(format!("duplicate seat in request: {dup}")));
        }

        // Seat-map checks run against immutable event data, outside the
        // critical section.
        let unknown = sorted_subset(seats, |s| !event.seat_map.contains(s));
        if !unknown.is_empty() {
            return Err(ApiError::InvalidSeat(unknown));
        }
        let blocked = sorted_subset(seats, |s| event.seat_map.is_house_held(s));
        if !blocked.is_empty() {
            return Err(ApiError::HouseHeld(blocked));
        }

        let mut held = self.held.entry(event.id).or_default();
        let conflicts = sorted_subset(seats, |s| held.contains(s));
        if !conflicts.is_empty() {
            return Err(ApiError::SeatConflict(conflicts));
        }
        for seat in seats {
            held.insert(seat.clone());
        }
        debug!(event_id = %event.id, count = seats.len(), "seats reserved");
        Ok(())
    }

    /// Drop the given seats from the event's held set. Releasing a seat
    /// that is already free is a no-op, so the call is idempotent.
    pub fn release(&self, event_id: Uuid, seats: &[SeatId]) {
        if let Some(mut held) = self.held.get_mut(&event_id) {
            for seat in seats {
                held.remove(seat);
            }
        }
    }

    /// Snapshot of every seat currently unavailable for the event:
    /// house-held seats plus seats held by active bookings, sorted.
    pub fn occupied(&self, event: &Event) -> Vec<SeatId> {
        let mut seats: BTreeSet<SeatId> = event.seat_map.house_held_seats.clone();
        if let Some(held) = self.held.get(&event.id) {
            seats.extend(held.iter().cloned());
        }
        seats.into_iter().collect()
    }

    /// Forget all held state for an event (used when the event itself is
    /// deleted from the catalog).
    pub fn forget(&self, event_id: Uuid) {
        self.held.remove(&event_id);
    }
}

fn sorted_subset(seats: &[SeatId], pred: impl Fn(&SeatId) -> bool) -> Vec<SeatId> {
    let mut subset: Vec<SeatId> = seats.iter().filter(|&s| pred(s)).cloned().collect();
    subset.sort();
    subset
}
