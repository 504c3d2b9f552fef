use crate::config::Config;
use crate::domain::ports::{AvailabilityRepository, BookingRepository, EventRepository};
use chrono_tz::Tz;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Business timezone, parsed once at startup. Rule times and slot labels
    /// are wall-clock in this zone; bookings are stored in UTC.
    pub timezone: Tz,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
}
