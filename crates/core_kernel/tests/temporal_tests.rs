//! Tests for date windows and clinic day boundaries

use core_kernel::{DateWindow, Timezone};
use core_kernel::temporal::{parse_instant, TemporalError};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

mod parsing {
    use super::*;

    #[test]
    fn test_zulu_instant() {
        let parsed = parse_instant("2024-05-10T09:15:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 10, 9, 15, 0).unwrap());
    }

    #[test]
    fn test_fractional_seconds_without_offset() {
        let parsed = parse_instant("2024-05-10T09:15:00.250").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2024, 5, 10, 9, 15, 0).unwrap() + Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(parse_instant(" 2024-05-10 ").is_ok());
    }

    #[test]
    fn test_empty_string_is_invalid() {
        assert_eq!(parse_instant(""), Err(TemporalError::InvalidDate(String::new())));
    }
}

mod windows {
    use super::*;

    #[test]
    fn test_single_instant_window() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let window = DateWindow::new(at, at).unwrap();
        assert!(window.contains(at));
    }

    #[test]
    fn test_plain_end_date_stops_at_midnight() {
        // A date-only end bound means midnight at the start of that day
        let window = DateWindow::parse("2024-01-01", "2024-01-31").unwrap();
        let late_on_last_day = Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap();
        assert!(!window.contains(late_on_last_day));
    }

    #[test]
    fn test_window_serializes_camel_case() {
        let window = DateWindow::parse("2024-01-01", "2024-01-31").unwrap();
        let json = serde_json::to_value(window).unwrap();
        assert!(json.get("startDate").is_some());
        assert!(json.get("endDate").is_some());
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_default_is_utc() {
        let tz = Timezone::default();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 15, 45, 0).unwrap();
        assert_eq!(tz.start_of_today(now), Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_day_west_of_utc() {
        let tz: Timezone = "America/New_York".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        // EST is UTC-5 in January
        assert_eq!(tz.start_of_day(date), Utc.with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_serde_uses_zone_name() {
        let tz: Timezone = serde_json::from_str("\"Europe/Paris\"").unwrap();
        assert_eq!(serde_json::to_string(&tz).unwrap(), "\"Europe/Paris\"");
    }
}
