use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One open interval inside a day, wall-clock "HH:MM" strings as entered
/// by the admin. Ranges are stored as-is: not necessarily sorted, possibly
/// overlapping.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// Weekly opening rules. A missing or empty day means closed that day.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WeeklyRules {
    pub monday: Option<Vec<TimeRange>>,
    pub tuesday: Option<Vec<TimeRange>>,
    pub wednesday: Option<Vec<TimeRange>>,
    pub thursday: Option<Vec<TimeRange>>,
    pub friday: Option<Vec<TimeRange>>,
    pub saturday: Option<Vec<TimeRange>>,
    pub sunday: Option<Vec<TimeRange>>,
}

impl WeeklyRules {
    /// Lookup by weekday enum rather than by localized day-name strings,
    /// which the rules used to be keyed on.
    pub fn for_weekday(&self, weekday: Weekday) -> &[TimeRange] {
        let day = match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        };
        day.as_deref().unwrap_or(&[])
    }
}

/// A stored rules document. Shareable: several events may reference the
/// same document via `availability_id`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Availability {
    pub id: String,
    pub title: String,
    pub rules_json: String,
    pub created_at: DateTime<Utc>,
}

impl Availability {
    pub fn rules(&self) -> WeeklyRules {
        serde_json::from_str(&self.rules_json).unwrap_or_default()
    }
}
