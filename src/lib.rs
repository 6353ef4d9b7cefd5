pub mod config;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use services::{AuthService, BookingService, CatalogStore, SeatReservationEngine};

// Shared state for the whole application.
pub struct AppState {
    pub config: config::Config,
    pub catalog: Arc<CatalogStore>,
    pub engine: Arc<SeatReservationEngine>,
    pub auth: AuthService,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let catalog = Arc::new(CatalogStore::new());
        let engine = Arc::new(SeatReservationEngine::new());
        let auth = AuthService::new(
            config.auth.bcrypt_cost,
            config.auth.admin_email.clone(),
        );
        let bookings = BookingService::new(
            engine.clone(),
            catalog.clone(),
            config.booking.seat_price,
            config.booking.currency.clone(),
        );
        Arc::new(Self { config, catalog, engine, auth, bookings })
    }
}
