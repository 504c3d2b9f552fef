pub mod availability;
pub mod booking;
pub mod event;
pub mod health;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::models::booking::Booking;
use crate::domain::services::availability::BusyInterval;
use crate::error::AppError;

/// Current wall-clock time in the business zone.
pub(crate) fn now_local(tz: &Tz) -> NaiveDateTime {
    Utc::now().with_timezone(tz).naive_local()
}

pub(crate) fn local_to_utc(naive: NaiveDateTime, tz: &Tz) -> Result<DateTime<Utc>, AppError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::Validation("Invalid local time (skipped by DST)".into()))
}

/// UTC bounds of one local calendar day, half-open.
pub(crate) fn day_bounds_utc(day: NaiveDate, tz: &Tz) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start = local_to_utc(day.and_hms_opt(0, 0, 0).unwrap(), tz)?;
    let end = local_to_utc((day + chrono::Duration::days(1)).and_hms_opt(0, 0, 0).unwrap(), tz)?;
    Ok((start, end))
}

/// Stored UTC booking intervals as business-zone wall-clock pairs, the only
/// form the availability engine accepts.
pub(crate) fn busy_intervals(bookings: &[Booking], tz: &Tz) -> Vec<BusyInterval> {
    bookings
        .iter()
        .map(|b| {
            (
                b.start_time.with_timezone(tz).naive_local(),
                b.end_time.with_timezone(tz).naive_local(),
            )
        })
        .collect()
}
