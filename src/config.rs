use chrono_tz::Tz;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// IANA name of the business timezone. Rule times and slot labels are
    /// wall-clock in this zone; bookings are stored in UTC.
    pub timezone: String,
}

impl Config {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            timezone: env::var("TIMEZONE").unwrap_or_else(|_| "Europe/Rome".to_string()),
        };
        config.timezone.parse::<Tz>().expect("TIMEZONE must be a valid IANA timezone name");
        config
    }
}
