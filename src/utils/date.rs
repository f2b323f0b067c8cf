//! Timestamp parsing and calendar helpers for the two day columns.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};

const SECONDS_PER_DAY: i64 = 86_400;

/// Layouts tried, in order, when parsing `ScheduledDay` and `AppointmentDay`
#[derive(Debug, Clone)]
pub struct TimestampFormats {
    /// Format strings for date-time values; date-only formats are also accepted
    pub formats: Vec<String>,
}

impl Default for TimestampFormats {
    fn default() -> Self {
        Self {
            formats: vec![
                "%Y-%m-%dT%H:%M:%SZ".to_string(), // 2016-04-29T18:38:08Z
                "%Y-%m-%dT%H:%M:%S".to_string(),  // 2016-04-29T18:38:08
                "%Y-%m-%d %H:%M:%S".to_string(),  // 2016-04-29 18:38:08
                "%Y-%m-%d".to_string(),           // 2016-04-29
            ],
        }
    }
}

impl TimestampFormats {
    /// Use a custom list of formats
    #[must_use]
    pub const fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }
}

/// Parse a timestamp, trying RFC 3339 first and then each configured format
#[must_use]
pub fn parse_timestamp(s: &str, config: &TimestampFormats) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for format in &config.formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
        // Date-only layouts fail NaiveDateTime parsing; midnight is implied
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Whole days from `scheduled` to `appointment`, rounded towards negative infinity
///
/// Appointment days are recorded at midnight, so an appointment booked for
/// later the same day comes out as -1.
#[must_use]
pub fn waiting_days(scheduled: NaiveDateTime, appointment: NaiveDateTime) -> i64 {
    (appointment - scheduled)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// Full English weekday name
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Weekday of a timestamp
#[must_use]
pub fn weekday_of(dt: NaiveDateTime) -> Weekday {
    dt.date().weekday()
}
