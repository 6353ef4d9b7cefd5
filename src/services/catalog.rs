use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Event, SeatId, SeatMap, Venue};

/// Fields a caller supplies when creating or updating an event. The seat
/// map is only honoured on create; it stays fixed for the event's
/// lifetime so held seats can never fall outside the grid.
#[derive(Debug, Clone)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub venue_id: Uuid,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct VenueInput {
    pub name: String,
    pub address: String,
}

/// In-memory event/venue catalog. Read-mostly reference data for the
/// reservation engine; writes are admin-only at the HTTP boundary.
#[derive(Debug, Default)]
pub struct CatalogStore {
    events: DashMap<Uuid, Event>,
    venues: DashMap<Uuid, Venue>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(&self, id: Uuid) -> Result<Event, ApiError> {
        self.events
            .get(&id)
            .map(|e| e.clone())
            .ok_or(ApiError::NotFound("event"))
    }

    pub fn list_events(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.iter().map(|e| e.clone()).collect();
        events.sort_by(|a, b| a.start_at.cmp(&b.start_at).then(a.id.cmp(&b.id)));
        events
    }

    pub fn create_event(
        &self,
        input: EventInput,
        seat_map: SeatMap,
    ) -> Result<Event, ApiError> {
        self.validate_event(&input)?;
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            start_at: input.start_at,
            end_at: input.end_at,
            venue_id: input.venue_id,
            published: input.published,
            seat_map,
            created_at: now,
            updated_at: now,
        };
        self.events.insert(event.id, event.clone());
        info!(event_id = %event.id, title = %event.title, "event created");
        Ok(event)
    }

    pub fn update_event(&self, id: Uuid, input: EventInput) -> Result<Event, ApiError> {
        self.validate_event(&input)?;
        let mut event = self.events.get_mut(&id).ok_or(ApiError::NotFound("event"))?;
        event.title = input.title;
        event.description = input.description;
        event.start_at = input.start_at;
        event.end_at = input.end_at;
        event.venue_id = input.venue_id;
        event.published = input.published;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    pub fn delete_event(&self, id: Uuid) -> Result<(), ApiError> {
        self.events
            .remove(&id)
            .map(|_| ())
            .ok_or(ApiError::NotFound("event"))
    }

    pub fn venue(&self, id: Uuid) -> Result<Venue, ApiError> {
        self.venues
            .get(&id)
            .map(|v| v.clone())
            .ok_or(ApiError::NotFound("venue"))
    }

    pub fn list_venues(&self) -> Vec<Venue> {
        let mut venues: Vec<Venue> = self.venues.iter().map(|v| v.clone()).collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        venues
    }

    pub fn create_venue(&self, input: VenueInput) -> Result<Venue, ApiError> {
        let now = Utc::now();
        let venue = Venue {
            id: Uuid::new_v4(),
            name: input.name,
            address: input.address,
            created_at: now,
            updated_at: now,
        };
        self.venues.insert(venue.id, venue.clone());
        Ok(venue)
    }

    pub fn update_venue(&self, id: Uuid, input: VenueInput) -> Result<Venue, ApiError> {
        let mut venue = self.venues.get_mut(&id).ok_or(ApiError::NotFound("venue"))?;
        venue.name = input.name;
        venue.address = input.address;
        venue.updated_at = Utc::now();
        Ok(venue.clone())
    }

    /// A venue still referenced by any event cannot be deleted.
    pub fn delete_venue(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.venues.contains_key(&id) {
            return Err(ApiError::NotFound("venue"));
        }
        if self.events.iter().any(|e| e.venue_id == id) {
            return Err(ApiError::Conflict(
                "venue is still referenced by an event".to_string(),
            ));
        }
        self.venues.remove(&id);
        Ok(())
    }

    fn validate_event(&self, input: &EventInput) -> Result<(), ApiError> {
        if input.start_at >= input.end_at {
            return Err(ApiError::Validation(
                "event must start before it ends".to_string(),
            ));
        }
        if !self.venues.contains_key(&input.venue_id) {
            return Err(ApiError::NotFound("venue"));
        }
        Ok(())
    }
}

/// Build a seat map from optional payload fields, falling back to the
/// default 6x10 grid with no house-held seats.
pub fn seat_map_from_parts(
    rows: Option<u32>,
    seats_per_row: Option<u32>,
    house_held: Option<Vec<SeatId>>,
) -> Result<SeatMap, ApiError> {
    let default = SeatMap::default();
    SeatMap::new(
        rows.unwrap_or(default.rows),
        seats_per_row.unwrap_or(default.seats_per_row),
        house_held.map(BTreeSet::from_iter).unwrap_or_default(),
    )
}
