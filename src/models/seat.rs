use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// A bookable seat inside one event's hall, e.g. "A-3" (row A, seat 3).
/// Identity is scoped to the event: "A-3" in two events are unrelated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId {
    pub row: char,
    pub number: u32,
}

impl SeatId {
    pub fn new(row: char, number: u32) -> Self {
        SeatId { row, number }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.number)
    }
}

impl FromStr for SeatId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiError::Validation(format!("malformed seat id: {s:?}"));

        let (row, number) = s.split_once('-').ok_or_else(invalid)?;
        let mut chars = row.chars();
        let row = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => c,
            _ => return Err(invalid()),
        };
        let number: u32 = number.parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }
        Ok(SeatId { row, number })
    }
}

impl Serialize for SeatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| de::Error::custom(format!("malformed seat id: {s:?}")))
    }
}

/// Row labels are always A..Z, so a map never has more than 26 rows.
pub const MAX_ROWS: u32 = 26;

pub const DEFAULT_ROWS: u32 = 6;
pub const DEFAULT_SEATS_PER_ROW: u32 = 10;

/// The seating grid of one event: `rows` labelled rows of `seats_per_row`
/// seats each, plus the house-held seats that can never be booked.
/// Fixed at event creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub rows: u32,
    pub seats_per_row: u32,
    pub house_held_seats: BTreeSet<SeatId>,
}

impl SeatMap {
    pub fn new(
        rows: u32,
        seats_per_row: u32,
        house_held_seats: BTreeSet<SeatId>,
    ) -> Result<Self, ApiError> {
        if rows == 0 || rows > MAX_ROWS {
            return Err(ApiError::Validation(format!(
                "seat rows must be between 1 and {MAX_ROWS}"
            )));
        }
        if seats_per_row == 0 {
            return Err(ApiError::Validation(
                "seats per row must be at least 1".to_string(),
            ));
        }
        let map = SeatMap { rows, seats_per_row, house_held_seats: BTreeSet::new() };
        if let Some(seat) = house_held_seats.iter().find(|s| !map.contains(s)) {
            return Err(ApiError::Validation(format!(
                "house-held seat {seat} is outside the seat map"
            )));
        }
        Ok(SeatMap { house_held_seats, ..map })
    }

    /// Whether the seat exists in this grid at all.
    pub fn contains(&self, seat: &SeatId) -> bool {
        if !seat.row.is_ascii_uppercase() {
            return false;
        }
        let row_index = seat.row as u32 - 'A' as u32;
        row_index < self.rows && seat.number >= 1 && seat.number <= self.seats_per_row
    }

    pub fn is_house_held(&self, seat: &SeatId) -> bool {
        self.house_held_seats.contains(seat)
    }
}

impl Default for SeatMap {
    fn default() -> Self {
        SeatMap {
            rows: DEFAULT_ROWS,
            seats_per_row: DEFAULT_SEATS_PER_ROW,
            house_held_seats: BTreeSet::new(),
        }
    }
}
