use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub event_id: String,
    pub customer_name: String,
    pub customer_surname: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub event_id: String,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let end_time = params.start + chrono::Duration::minutes(params.duration_min as i64);

        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            customer_name: params.name,
            customer_surname: params.surname,
            customer_phone: params.phone,
            customer_email: params.email,
            start_time: params.start,
            end_time,
            created_at: Utc::now(),
        }
    }
}
