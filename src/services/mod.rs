pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod reservations;

pub use auth::AuthService;
pub use bookings::BookingService;
pub use catalog::CatalogStore;
pub use reservations::SeatReservationEngine;
