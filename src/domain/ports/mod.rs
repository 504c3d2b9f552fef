use crate::domain::models::{availability::Availability, booking::Booking, event::Event};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create(&self, availability: &Availability) -> Result<Availability, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Availability>, AppError>;
    async fn list(&self) -> Result<Vec<Availability>, AppError>;
    async fn update(&self, availability: &Availability) -> Result<Availability, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count_events_using(&self, id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking after re-checking overlap inside the same
    /// transaction. Returns `Conflict` if the slot was taken in the
    /// meantime: the client-side slot computation is advisory only.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self) -> Result<Vec<Booking>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_range(&self, event_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    /// Same overlap guard as `create`, ignoring the booking's own row so a
    /// reschedule does not collide with itself.
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count_future_for_event(&self, event_id: &str, after: DateTime<Utc>) -> Result<i64, AppError>;
}
