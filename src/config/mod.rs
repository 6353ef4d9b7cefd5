use std::env;

// Container for all runtime settings, filled from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub booking: BookingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub seat_price: u64,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
    pub admin_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "eventbook=debug,tower_http=debug".to_string()),
            },
            booking: BookingConfig {
                seat_price: env::var("SEAT_PRICE")
                    .unwrap_or_else(|_| "2500".to_string())
                    .parse()
                    .expect("SEAT_PRICE must be a valid number"),
                currency: env::var("CURRENCY").unwrap_or_else(|_| "KZT".to_string()),
            },
            auth: AuthConfig {
                bcrypt_cost: env::var("BCRYPT_COST")
                    .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                    .parse()
                    .expect("BCRYPT_COST must be a valid number"),
                admin_email: env::var("ADMIN_EMAIL").ok(),
            },
        }
    }
}
