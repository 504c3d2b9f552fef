use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::models::availability::WeeklyRules;
use crate::domain::models::event::{ActivationMode, Event};

/// Half-open busy interval `[start, end)`, wall-clock in the business zone.
/// Callers convert stored UTC bookings before handing them over; the engine
/// itself never touches timezones.
pub type BusyInterval = (NaiveDateTime, NaiveDateTime);

/// Whether `day` falls inside the event's activation window. Days before
/// `today` are never in-window, regardless of mode.
pub fn is_day_in_window(event: &Event, day: NaiveDate, today: NaiveDate) -> bool {
    if day < today {
        return false;
    }
    match event.event_type {
        ActivationMode::Recurring => true,
        ActivationMode::RecurringFromDate => event.start_date.is_some_and(|from| day >= from),
        ActivationMode::SingleWeek => event
            .start_date
            .is_some_and(|from| day >= from && day <= from + Duration::days(6)),
    }
}

/// Free slots for `day` as "HH:MM" labels.
///
/// Ranges are walked in stored order, each independently: the cursor starts
/// at `range.start` and advances by the event duration. A slot ending exactly
/// at `range.end` is kept. Overlapping or out-of-order ranges are tolerated
/// as entered; the same label may then appear more than once. Ranges with
/// unparsable times contribute nothing.
pub fn slots_for_day(
    event: &Event,
    rules: &WeeklyRules,
    day: NaiveDate,
    busy: &[BusyInterval],
    now: NaiveDateTime,
) -> Vec<String> {
    if !is_day_in_window(event, day, now.date()) || event.duration_min <= 0 {
        return Vec::new();
    }

    let duration = Duration::minutes(event.duration_min as i64);
    let mut slots = Vec::new();

    for range in rules.for_weekday(day.weekday()) {
        let (Ok(start), Ok(end)) = (
            NaiveTime::parse_from_str(&range.start, "%H:%M"),
            NaiveTime::parse_from_str(&range.end, "%H:%M"),
        ) else {
            continue;
        };

        let range_end = day.and_time(end);
        let mut cursor = day.and_time(start);

        while cursor + duration <= range_end {
            let slot_start = cursor;
            let slot_end = cursor + duration;
            cursor = slot_end;

            if slot_is_free(slot_start, slot_end, busy, now) {
                slots.push(slot_start.format("%H:%M").to_string());
            }
        }
    }

    slots
}

/// Short-circuiting form of `slots_for_day(..).is_empty()` used by the
/// available-dates scan.
pub fn day_has_availability(
    event: &Event,
    rules: &WeeklyRules,
    day: NaiveDate,
    busy: &[BusyInterval],
    now: NaiveDateTime,
) -> bool {
    if !is_day_in_window(event, day, now.date()) || event.duration_min <= 0 {
        return false;
    }

    let duration = Duration::minutes(event.duration_min as i64);

    for range in rules.for_weekday(day.weekday()) {
        let (Ok(start), Ok(end)) = (
            NaiveTime::parse_from_str(&range.start, "%H:%M"),
            NaiveTime::parse_from_str(&range.end, "%H:%M"),
        ) else {
            continue;
        };

        let range_end = day.and_time(end);
        let mut cursor = day.and_time(start);

        while cursor + duration <= range_end {
            let slot_start = cursor;
            let slot_end = cursor + duration;
            cursor = slot_end;

            if slot_is_free(slot_start, slot_end, busy, now) {
                return true;
            }
        }
    }

    false
}

fn slot_is_free(
    slot_start: NaiveDateTime,
    slot_end: NaiveDateTime,
    busy: &[BusyInterval],
    now: NaiveDateTime,
) -> bool {
    // Same-day cutoff: a slot starting before "now" is already gone.
    if slot_start.date() == now.date() && slot_start < now {
        return false;
    }
    !busy
        .iter()
        .any(|&(b_start, b_end)| slot_start < b_end && b_start < slot_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::availability::TimeRange;
    use chrono::Utc;

    fn event(duration_min: i32, event_type: ActivationMode, start_date: Option<&str>) -> Event {
        Event {
            id: "ev-1".to_string(),
            slug: "consulenza".to_string(),
            title: "Consulenza".to_string(),
            description: String::new(),
            location: String::new(),
            duration_min,
            event_type,
            start_date: start_date.map(|d| d.parse().unwrap()),
            availability_id: "av-1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn monday_rules(ranges: &[(&str, &str)]) -> WeeklyRules {
        WeeklyRules {
            monday: Some(
                ranges
                    .iter()
                    .map(|(start, end)| TimeRange {
                        start: start.to_string(),
                        end: end.to_string(),
                    })
                    .collect(),
            ),
            ..WeeklyRules::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn at(day: &str, time: &str) -> NaiveDateTime {
        date(day).and_time(NaiveTime::parse_from_str(time, "%H:%M").unwrap())
    }

    // 2026-03-02 is a Monday.
    const MONDAY: &str = "2026-03-02";
    const EARLIER: &str = "2026-02-02";

    #[test]
    fn morning_range_yields_three_slots_including_exact_end() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "12:00")]);

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &[], at(EARLIER, "08:00"));
        assert_eq!(slots, vec!["09:00", "10:00", "11:00"]);
    }

    #[test]
    fn booked_interval_removes_overlapping_slot() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "12:00")]);
        let busy = vec![(at(MONDAY, "10:00"), at(MONDAY, "11:00"))];

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &busy, at(EARLIER, "08:00"));
        assert_eq!(slots, vec!["09:00", "11:00"]);
    }

    #[test]
    fn booking_straddling_two_slots_removes_both() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "12:00")]);
        let busy = vec![(at(MONDAY, "09:30"), at(MONDAY, "10:30"))];

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &busy, at(EARLIER, "08:00"));
        assert_eq!(slots, vec!["11:00"]);
    }

    #[test]
    fn back_to_back_booking_does_not_block_adjacent_slot() {
        // Half-open intervals: a booking ending at 10:00 leaves 10:00 free.
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "12:00")]);
        let busy = vec![(at(MONDAY, "09:00"), at(MONDAY, "10:00"))];

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &busy, at(EARLIER, "08:00"));
        assert_eq!(slots, vec!["10:00", "11:00"]);
    }

    #[test]
    fn trailing_partial_slot_is_never_emitted() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "10:30")]);

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &[], at(EARLIER, "08:00"));
        assert_eq!(slots, vec!["09:00"]);
    }

    #[test]
    fn same_day_cutoff_excludes_started_slots() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "17:00")]);

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &[], at(MONDAY, "14:05"));
        assert_eq!(slots, vec!["15:00", "16:00"]);
    }

    #[test]
    fn same_day_slot_exactly_at_now_is_kept() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "17:00")]);

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &[], at(MONDAY, "14:00"));
        assert_eq!(slots, vec!["14:00", "15:00", "16:00"]);
    }

    #[test]
    fn past_day_yields_nothing() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "12:00")]);

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &[], at("2026-03-03", "08:00"));
        assert!(slots.is_empty());
    }

    #[test]
    fn closed_day_yields_nothing() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "12:00")]);

        // 2026-03-03 is a Tuesday; only Monday has rules.
        let slots = slots_for_day(&ev, &rules, date("2026-03-03"), &[], at(EARLIER, "08:00"));
        assert!(slots.is_empty());
    }

    #[test]
    fn malformed_range_contributes_nothing_but_valid_ones_survive() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("9am", "noon"), ("14:00", "16:00")]);

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &[], at(EARLIER, "08:00"));
        assert_eq!(slots, vec!["14:00", "15:00"]);
    }

    #[test]
    fn overlapping_ranges_are_walked_independently() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "11:00"), ("10:00", "12:00")]);

        let slots = slots_for_day(&ev, &rules, date(MONDAY), &[], at(EARLIER, "08:00"));
        // Range order first, chronological within each range; no de-dup.
        assert_eq!(slots, vec!["09:00", "10:00", "10:00", "11:00"]);
    }

    #[test]
    fn every_slot_is_contained_in_some_range() {
        let ev = event(45, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("08:15", "12:00"), ("13:30", "18:10")]);
        let duration = Duration::minutes(45);

        for label in slots_for_day(&ev, &rules, date(MONDAY), &[], at(EARLIER, "08:00")) {
            let start = NaiveTime::parse_from_str(&label, "%H:%M").unwrap();
            let contained = rules.for_weekday(chrono::Weekday::Mon).iter().any(|r| {
                let r_start = NaiveTime::parse_from_str(&r.start, "%H:%M").unwrap();
                let r_end = NaiveTime::parse_from_str(&r.end, "%H:%M").unwrap();
                start >= r_start && start + duration <= r_end
            });
            assert!(contained, "slot {} escapes its range", label);
        }
    }

    #[test]
    fn result_is_stable_across_calls() {
        let ev = event(30, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "12:00"), ("10:00", "11:00")]);
        let busy = vec![(at(MONDAY, "09:30"), at(MONDAY, "10:00"))];
        let now = at(EARLIER, "08:00");

        let first = slots_for_day(&ev, &rules, date(MONDAY), &busy, now);
        let second = slots_for_day(&ev, &rules, date(MONDAY), &busy, now);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_duration_yields_nothing() {
        let ev = event(0, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "12:00")]);

        assert!(slots_for_day(&ev, &rules, date(MONDAY), &[], at(EARLIER, "08:00")).is_empty());
    }

    #[test]
    fn single_week_window_is_seven_days_from_start_date() {
        // 2026-02-23 is a Monday.
        let ev = event(60, ActivationMode::SingleWeek, Some("2026-02-23"));
        let today = date("2026-02-01");

        assert!(!is_day_in_window(&ev, date("2026-02-22"), today));
        assert!(is_day_in_window(&ev, date("2026-02-23"), today));
        assert!(is_day_in_window(&ev, date("2026-03-01"), today));
        assert!(!is_day_in_window(&ev, date("2026-03-02"), today));
    }

    #[test]
    fn recurring_from_date_has_no_upper_bound() {
        let ev = event(60, ActivationMode::RecurringFromDate, Some("2026-02-23"));
        let today = date("2026-02-01");

        assert!(!is_day_in_window(&ev, date("2026-02-22"), today));
        assert!(is_day_in_window(&ev, date("2026-02-23"), today));
        assert!(is_day_in_window(&ev, date("2027-06-01"), today));
    }

    #[test]
    fn dated_mode_without_start_date_is_never_in_window() {
        let ev = event(60, ActivationMode::SingleWeek, None);
        assert!(!is_day_in_window(&ev, date(MONDAY), date("2026-02-01")));
    }

    #[test]
    fn out_of_window_day_yields_no_slots_despite_rules() {
        let ev = event(60, ActivationMode::RecurringFromDate, Some("2026-03-09"));
        let rules = monday_rules(&[("09:00", "12:00")]);

        // MONDAY matches the rules but precedes the activation date.
        let slots = slots_for_day(&ev, &rules, date(MONDAY), &[], at(EARLIER, "08:00"));
        assert!(slots.is_empty());
    }

    #[test]
    fn day_has_availability_agrees_with_slot_listing() {
        let ev = event(60, ActivationMode::Recurring, None);
        let rules = monday_rules(&[("09:00", "11:00")]);
        let now = at(EARLIER, "08:00");

        let fully_booked = vec![
            (at(MONDAY, "09:00"), at(MONDAY, "10:00")),
            (at(MONDAY, "10:00"), at(MONDAY, "11:00")),
        ];
        assert!(!day_has_availability(&ev, &rules, date(MONDAY), &fully_booked, now));
        assert!(slots_for_day(&ev, &rules, date(MONDAY), &fully_booked, now).is_empty());

        let one_free = &fully_booked[..1];
        assert!(day_has_availability(&ev, &rules, date(MONDAY), one_free, now));
        assert_eq!(slots_for_day(&ev, &rules, date(MONDAY), one_free, now), vec!["10:00"]);
    }
}
