pub mod booking;
pub mod event;
pub mod seat;
pub mod user;

pub use booking::{Booking, BookingStatus};
pub use event::{Event, Venue};
pub use seat::{SeatId, SeatMap};
pub use user::{Role, User};
