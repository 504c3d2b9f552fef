use axum::{extract::{Path, State}, http::header, response::IntoResponse, Json};
use chrono::{Duration, NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::{CreateBookingRequest, UpdateBookingRequest};
use crate::api::handlers::{busy_intervals, day_bounds_utc, local_to_utc, now_local};
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::domain::services::availability::slots_for_day;
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: Starting for slug {}", slug);

    let event = state.event_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.duration_min <= 0 {
        return Err(AppError::Validation("Event has no valid duration".into()));
    }

    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;
    let time = NaiveTime::parse_from_str(&payload.time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?;

    let tz = state.timezone;
    let naive_start = date.and_time(time);
    let now = now_local(&tz);

    if naive_start < now {
        return Err(AppError::Validation("Cannot book in the past".into()));
    }

    let availability = state.availability_repo.find_by_id(&event.availability_id).await?
        .ok_or(AppError::Internal)?;
    let rules = availability.rules();

    let (day_start_utc, day_end_utc) = day_bounds_utc(date, &tz)?;
    let existing_bookings = state.booking_repo.list_by_range(&event.id, day_start_utc, day_end_utc).await?;
    let busy = busy_intervals(&existing_bookings, &tz);

    // Advisory pre-check against the same engine the slot listing uses; the
    // repository repeats the overlap check inside its transaction.
    let valid_slots = slots_for_day(&event, &rules, date, &busy, now);
    let requested = time.format("%H:%M").to_string();

    if !valid_slots.contains(&requested) {
        warn!("Booking rejected: Slot {} on {} not available. Valid slots: {:?}", requested, date, valid_slots);
        return Err(AppError::Conflict("Selected time slot is not available or valid".into()));
    }

    let start_time = local_to_utc(naive_start, &tz)?;

    let booking = Booking::new(NewBookingParams {
        event_id: event.id.clone(),
        start: start_time,
        duration_min: event.duration_min,
        name: payload.name,
        surname: payload.surname,
        phone: payload.phone,
        email: payload.email,
    });

    let created = state.booking_repo.create(&booking).await?;
    info!("Booking confirmed: {} for event {}", created.id, slug);
    Ok(Json(created))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list().await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if let Some(name) = payload.name { booking.customer_name = name; }
    if let Some(surname) = payload.surname { booking.customer_surname = surname; }
    if let Some(phone) = payload.phone { booking.customer_phone = phone; }
    if let Some(email) = payload.email {
        booking.customer_email = if email.is_empty() { None } else { Some(email) };
    }

    if let (Some(date_str), Some(time_str)) = (payload.date, payload.time) {
        let event = state.event_repo.find_by_id(&booking.event_id).await?
            .ok_or(AppError::Internal)?;

        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date".into()))?;
        let time = NaiveTime::parse_from_str(&time_str, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid time".into()))?;

        let availability = state.availability_repo.find_by_id(&event.availability_id).await?
            .ok_or(AppError::Internal)?;
        let rules = availability.rules();

        let tz = state.timezone;
        let (day_start_utc, day_end_utc) = day_bounds_utc(date, &tz)?;
        let existing_bookings = state.booking_repo.list_by_range(&event.id, day_start_utc, day_end_utc).await?;

        // The booking being moved must not block its own target day.
        let others: Vec<_> = existing_bookings
            .into_iter()
            .filter(|b| b.id != booking.id)
            .collect();
        let busy = busy_intervals(&others, &tz);

        let valid_slots = slots_for_day(&event, &rules, date, &busy, now_local(&tz));
        let requested = time.format("%H:%M").to_string();

        if !valid_slots.contains(&requested) {
            return Err(AppError::Conflict("Target slot is unavailable or invalid".into()));
        }

        let new_start = local_to_utc(date.and_time(time), &tz)?;
        booking.start_time = new_start;
        booking.end_time = new_start + Duration::minutes(event.duration_min as i64);
    }

    let updated = state.booking_repo.update(&booking).await?;
    info!("Booking updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_repo.delete(&booking_id).await?;
    info!("Booking cancelled: {}", booking_id);
    Ok(Json(serde_json::json!({"status": "cancelled"})))
}

pub async fn get_booking_ics(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    let event = state.event_repo.find_by_id(&booking.event_id).await?
        .ok_or(AppError::Internal)?;

    let ics = generate_ics(&event, &booking);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}.ics\"", event.slug)),
        ],
        ics,
    ))
}
