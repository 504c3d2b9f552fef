use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use chrono::{Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::dtos::{
    requests::{CreateEventRequest, UpdateEventRequest},
    responses::SlotsResponse,
};
use crate::api::handlers::{busy_intervals, day_bounds_utc, now_local};
use crate::domain::models::event::{ActivationMode, Event};
use crate::domain::services::availability::{day_has_availability, slots_for_day};
use crate::error::AppError;
use crate::state::AppState;

fn validate_activation(event_type: ActivationMode, start_date: Option<NaiveDate>) -> Result<(), AppError> {
    match event_type {
        ActivationMode::Recurring => Ok(()),
        ActivationMode::RecurringFromDate | ActivationMode::SingleWeek => {
            if start_date.is_none() {
                return Err(AppError::Validation("start_date is required for this event_type".into()));
            }
            Ok(())
        }
    }
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating event: {}", payload.slug);

    if payload.duration_min <= 0 {
        return Err(AppError::Validation("duration_min must be positive".into()));
    }

    let event_type = payload.event_type.unwrap_or(ActivationMode::Recurring);
    validate_activation(event_type, payload.start_date)?;

    state.availability_repo.find_by_id(&payload.availability_id).await?
        .ok_or(AppError::Validation("Unknown availability_id".into()))?;

    let event = Event {
        id: Uuid::new_v4().to_string(),
        slug: payload.slug,
        title: payload.title,
        description: payload.description,
        location: payload.location,
        duration_min: payload.duration_min,
        event_type,
        start_date: payload.start_date,
        availability_id: payload.availability_id,
        created_at: Utc::now(),
    };

    let created = state.event_repo.create(&event).await?;
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if let Some(val) = payload.slug { event.slug = val; }
    if let Some(val) = payload.title { event.title = val; }
    if let Some(val) = payload.description { event.description = val; }
    if let Some(val) = payload.location { event.location = val; }
    if let Some(val) = payload.duration_min {
        if val <= 0 {
            return Err(AppError::Validation("duration_min must be positive".into()));
        }
        event.duration_min = val;
    }
    if let Some(val) = payload.event_type { event.event_type = val; }
    if payload.start_date.is_some() { event.start_date = payload.start_date; }
    if let Some(val) = payload.availability_id {
        state.availability_repo.find_by_id(&val).await?
            .ok_or(AppError::Validation("Unknown availability_id".into()))?;
        event.availability_id = val;
    }

    validate_activation(event.event_type, event.start_date)?;

    let updated = state.event_repo.update(&event).await?;
    info!("Event updated: {}", slug);
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let future = state.booking_repo.count_future_for_event(&event.id, Utc::now()).await?;
    if future > 0 {
        return Err(AppError::Conflict(format!("Event has {} upcoming booking(s)", future)));
    }

    state.event_repo.delete(&event.id).await?;
    info!("Event deleted: {}", slug);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn get_available_dates(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start_date = NaiveDate::parse_from_str(start_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid start".into()))?;
    let end_date = NaiveDate::parse_from_str(end_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid end".into()))?;
    if end_date < start_date {
        return Err(AppError::Validation("end must not precede start".into()));
    }

    let availability = state.availability_repo.find_by_id(&event.availability_id).await?
        .ok_or(AppError::Internal)?;
    let rules = availability.rules();

    let tz = state.timezone;
    let (range_start_utc, _) = day_bounds_utc(start_date, &tz)?;
    let (_, range_end_utc) = day_bounds_utc(end_date, &tz)?;

    let all_bookings = state.booking_repo.list_by_range(&event.id, range_start_utc, range_end_utc).await?;
    let all_busy = busy_intervals(&all_bookings, &tz);
    let now = now_local(&tz);

    let mut available_dates = Vec::new();
    let mut current_date = start_date;

    while current_date <= end_date {
        let day_start = current_date.and_hms_opt(0, 0, 0).unwrap();
        let day_end = day_start + Duration::days(1);

        let day_busy: Vec<_> = all_busy
            .iter()
            .filter(|&&(b_start, b_end)| b_start < day_end && b_end > day_start)
            .copied()
            .collect();

        if day_has_availability(&event, &rules, current_date, &day_busy, now) {
            available_dates.push(current_date.to_string());
        }
        current_date += Duration::days(1);
    }

    Ok(Json(available_dates))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let date_str = params.get("date").ok_or(AppError::Validation("Date required".into()))?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let availability = state.availability_repo.find_by_id(&event.availability_id).await?
        .ok_or(AppError::Internal)?;
    let rules = availability.rules();

    let tz = state.timezone;
    let (day_start_utc, day_end_utc) = day_bounds_utc(date, &tz)?;
    let bookings = state.booking_repo.list_by_range(&event.id, day_start_utc, day_end_utc).await?;
    let busy = busy_intervals(&bookings, &tz);

    let slots = slots_for_day(&event, &rules, date, &busy, now_local(&tz));

    Ok(Json(SlotsResponse {
        date: date_str.to_string(),
        slots,
    }))
}
