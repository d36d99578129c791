//! Half-hour slot labels and date-key display labels

use chrono::NaiveDate;
use serde::Serialize;

use super::event::DateMode;

pub const SLOTS_PER_HOUR: usize = 2;

/// Number of half-hour slots between `start_hour` and `end_hour`.
/// An empty or inverted range has no slots.
pub fn slot_count(start_hour: u8, end_hour: u8) -> usize {
    usize::from(end_hour.saturating_sub(start_hour)) * SLOTS_PER_HOUR
}

fn twelve_hour(hour: u8) -> (u8, &'static str) {
    let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };
    let ampm = if hour < 12 { "AM" } else { "PM" };
    (display_hour, ampm)
}

/// Label for the top of an hour, e.g. `9:00 AM`. Used for the hour
/// pickers when creating an event.
pub fn hour_label(hour: u8) -> String {
    let (display_hour, ampm) = twelve_hour(hour);
    format!("{}:00 {}", display_hour, ampm)
}

/// Every hour that can start or end an event range, paired with its
/// label.
pub fn hour_options() -> Vec<(u8, String)> {
    (0..24).map(|hour| (hour, hour_label(hour))).collect()
}

/// Labels for every half-hour slot in `[start_hour, end_hour)` using
/// a 12-hour clock. Slot `i` starts at `start_hour + i * 30min`.
pub fn generate_time_slots(start_hour: u8, end_hour: u8) -> Vec<String> {
    let mut slots = Vec::with_capacity(slot_count(start_hour, end_hour));
    for hour in start_hour..end_hour {
        let (display_hour, ampm) = twelve_hour(hour);
        for minutes in ["00", "30"] {
            slots.push(format!("{}:{} {}", display_hour, minutes, ampm));
        }
    }
    slots
}

/// Column header for a date key
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateLabel {
    /// Three letter weekday, e.g. `Mon`
    pub primary: String,
    /// Short month and day, e.g. `Mar 2`. Only set for specific dates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

/// Display label for a date key.
///
/// Specific dates are parsed as naive calendar dates so there is no
/// timezone that could shift them onto a neighbouring day. A key that
/// doesn't parse is shown as-is.
pub fn format_date_key(key: &str, date_mode: DateMode) -> DateLabel {
    match date_mode {
        DateMode::DaysOfWeek => DateLabel {
            primary: key.chars().take(3).collect(),
            secondary: None,
        },
        DateMode::Specific => match NaiveDate::parse_from_str(key, "%Y-%m-%d") {
            Ok(date) => DateLabel {
                primary: date.format("%a").to_string(),
                secondary: Some(date.format("%b %-d").to_string()),
            },
            Err(_) => DateLabel {
                primary: key.to_string(),
                secondary: None,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_generates_two_slots_per_hour() {
        for start in 0..24u8 {
            for end in (start + 1)..=24u8 {
                assert_eq!(
                    generate_time_slots(start, end).len(),
                    2 * usize::from(end - start)
                );
                assert_eq!(slot_count(start, end), 2 * usize::from(end - start));
            }
        }
    }

    #[test]
    fn it_labels_slots_on_a_twelve_hour_clock() {
        assert_eq!(
            generate_time_slots(11, 13),
            vec!["11:00 AM", "11:30 AM", "12:00 PM", "12:30 PM"]
        );
        assert_eq!(generate_time_slots(0, 1), vec!["12:00 AM", "12:30 AM"]);
        assert_eq!(generate_time_slots(23, 24), vec!["11:00 PM", "11:30 PM"]);
    }

    #[test]
    fn it_has_no_slots_for_an_inverted_range() {
        assert!(generate_time_slots(10, 9).is_empty());
        assert_eq!(slot_count(10, 9), 0);
    }

    #[test]
    fn it_labels_hour_options() {
        let options = hour_options();
        assert_eq!(options.len(), 24);
        assert_eq!(options[0], (0, String::from("12:00 AM")));
        assert_eq!(options[9], (9, String::from("9:00 AM")));
        assert_eq!(options[17], (17, String::from("5:00 PM")));
    }

    #[test]
    fn it_formats_specific_dates() {
        let label = format_date_key("2026-03-02", DateMode::Specific);
        assert_eq!(label.primary, "Mon");
        assert_eq!(label.secondary.as_deref(), Some("Mar 2"));

        let label = format_date_key("2026-12-31", DateMode::Specific);
        assert_eq!(label.primary, "Thu");
        assert_eq!(label.secondary.as_deref(), Some("Dec 31"));
    }

    #[test]
    fn it_formats_days_of_week() {
        let label = format_date_key("Wednesday", DateMode::DaysOfWeek);
        assert_eq!(label.primary, "Wed");
        assert_eq!(label.secondary, None);
    }

    #[test]
    fn it_shows_unparseable_dates_verbatim() {
        let label = format_date_key("someday", DateMode::Specific);
        assert_eq!(label.primary, "someday");
        assert_eq!(label.secondary, None);
    }
}
