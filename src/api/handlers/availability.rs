use axum::{extract::{Path, State}, response::IntoResponse, Json};
use chrono::{NaiveTime, Utc, Weekday};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::dtos::requests::{CreateAvailabilityRequest, UpdateAvailabilityRequest};
use crate::domain::models::availability::{Availability, WeeklyRules};
use crate::error::AppError;
use crate::state::AppState;

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Well-formedness belongs to this editing surface, not to the engine: the
/// engine only skips ranges it cannot parse.
fn validate_rules(rules: &WeeklyRules) -> Result<(), AppError> {
    for weekday in ALL_WEEKDAYS {
        for range in rules.for_weekday(weekday) {
            let start = NaiveTime::parse_from_str(&range.start, "%H:%M")
                .map_err(|_| AppError::Validation(format!("Invalid start time '{}' (expected HH:MM)", range.start)))?;
            let end = NaiveTime::parse_from_str(&range.end, "%H:%M")
                .map_err(|_| AppError::Validation(format!("Invalid end time '{}' (expected HH:MM)", range.end)))?;
            if start >= end {
                return Err(AppError::Validation(format!("Range {}-{} must start before it ends", range.start, range.end)));
            }
        }
    }
    Ok(())
}

pub async fn create_availability(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_rules(&payload.rules)?;

    let rules_json = serde_json::to_string(&payload.rules)
        .map_err(|_| AppError::Validation("Invalid rules".into()))?;

    let availability = Availability {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        rules_json,
        created_at: Utc::now(),
    };

    let created = state.availability_repo.create(&availability).await?;
    info!("Availability created: {}", created.id);
    Ok(Json(created))
}

pub async fn list_availabilities(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let availabilities = state.availability_repo.list().await?;
    Ok(Json(availabilities))
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let availability = state.availability_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Availability not found".into()))?;
    Ok(Json(availability))
}

pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut availability = state.availability_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Availability not found".into()))?;

    if let Some(title) = payload.title {
        availability.title = title;
    }
    if let Some(rules) = payload.rules {
        validate_rules(&rules)?;
        availability.rules_json = serde_json::to_string(&rules)
            .map_err(|_| AppError::Validation("Invalid rules".into()))?;
    }

    let updated = state.availability_repo.update(&availability).await?;
    info!("Availability updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let in_use = state.availability_repo.count_events_using(&id).await?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!("Availability is referenced by {} event(s)", in_use)));
    }

    state.availability_repo.delete(&id).await?;
    info!("Availability deleted: {}", id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
