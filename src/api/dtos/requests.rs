use crate::domain::models::availability::WeeklyRules;
use crate::domain::models::event::ActivationMode;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateAvailabilityRequest {
    pub title: String,
    pub rules: WeeklyRules,
}

#[derive(Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub title: Option<String>,
    pub rules: Option<WeeklyRules>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub duration_min: i32,
    pub event_type: Option<ActivationMode>,
    pub start_date: Option<NaiveDate>,
    pub availability_id: String,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub duration_min: Option<i32>,
    pub event_type: Option<ActivationMode>,
    pub start_date: Option<NaiveDate>,
    pub availability_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub date: String,
    pub time: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}
