//! Display helpers the presentation layer uses next to the session fields.

use chrono::{DateTime, Duration, Utc};

/// Hours the displayed clock runs ahead of UTC.
pub const DISPLAY_OFFSET_HOURS: i64 = 3;

/// Formats remaining seconds as `m:ss`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Formats `now` on the UTC+3 wall clock as `DD.MM.YYYY, HH:MM:SS`.
///
/// Callers pass the instant in, so rendering stays a pure function of it.
pub fn current_time_at(now: DateTime<Utc>) -> String {
    (now + Duration::hours(DISPLAY_OFFSET_HOURS))
        .format("%d.%m.%Y, %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(300), "5:00");
        assert_eq!(format_countdown(299), "4:59");
        assert_eq!(format_countdown(61), "1:01");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(0), "0:00");
    }

    #[test]
    fn test_current_time_is_shifted_three_hours() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 22, 5, 9).unwrap();
        assert_eq!(current_time_at(now), "15.03.2025, 01:05:09");
    }
}
