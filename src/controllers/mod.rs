pub mod auth;
pub mod bookings;
pub mod events;
pub mod venues;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(auth::routes())
        .merge(events::routes())
        .merge(venues::routes())
        .merge(bookings::routes())
}
