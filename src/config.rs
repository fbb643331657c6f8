use chrono_tz::Tz;
use std::env;
use std::str::FromStr;

/// Where the slot grid takes existing reservations from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictSource {
    /// Reservations stored by this service block slots.
    Store,
    /// Reservations are tracked elsewhere; the slot grid ignores them.
    /// The write-time overlap check still runs.
    External,
}

impl FromStr for ConflictSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(ConflictSource::Store),
            "external" => Ok(ConflictSource::External),
            other => Err(format!("unknown booking conflict source '{}'", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub salon_timezone: Tz,
    pub booking_horizon_days: i64,
    pub conflict_source: ConflictSource,
    pub admin_username: String,
    pub admin_password_hash: String, // Argon2 PHC string
    pub session_secret: String,
    pub auth_issuer: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            salon_timezone: env::var("SALON_TIMEZONE").unwrap_or_else(|_| "Europe/Sofia".to_string()).parse().expect("SALON_TIMEZONE must be an IANA timezone"),
            booking_horizon_days: env::var("BOOKING_HORIZON_DAYS").unwrap_or_else(|_| "60".to_string()).parse().expect("BOOKING_HORIZON_DAYS must be a number"),
            conflict_source: env::var("BOOKING_CONFLICT_SOURCE").unwrap_or_else(|_| "store".to_string()).parse().expect("BOOKING_CONFLICT_SOURCE must be 'store' or 'external'"),
            admin_username: env::var("ADMIN_USERNAME").expect("ADMIN_USERNAME must be set"),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").expect("ADMIN_PASSWORD_HASH must be set (Argon2 hash)"),
            session_secret: env::var("SESSION_SECRET").expect("SESSION_SECRET must be set"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://salon-booking.local".to_string()),
        }
    }
}
