use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// When an event accepts bookings.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ActivationMode {
    /// Bookable on any day matching the weekly rules.
    Recurring,
    /// Bookable from `start_date` onward, no upper bound.
    RecurringFromDate,
    /// Bookable only during the 7 days starting on `start_date`
    /// (not aligned to Monday).
    SingleWeek,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub duration_min: i32,
    pub event_type: ActivationMode,
    /// Activation date. Required for `recurring_from_date` and
    /// `single_week`, ignored for plain `recurring`.
    pub start_date: Option<NaiveDate>,
    pub availability_id: String,
    pub created_at: DateTime<Utc>,
}
