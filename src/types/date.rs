//! Calendar conversions for Date and DateTime values.

use chrono::{Datelike, NaiveDate};

const SECONDS_PER_DAY: u32 = 86_400;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Calendar date for a day number.
pub fn date_from_days(days: u16) -> NaiveDate {
    epoch() + chrono::Duration::days(days as i64)
}

/// Day number for a calendar date, `None` outside the representable range.
pub fn days_from_date(date: NaiveDate) -> Option<u16> {
    let days = date.signed_duration_since(epoch()).num_days();
    u16::try_from(days).ok()
}

/// Day number a DateTime falls on.
pub fn days_from_datetime(seconds: u32) -> u16 {
    // u32::MAX seconds is well within u16 days
    (seconds / SECONDS_PER_DAY) as u16
}

pub fn to_yyyymm(date: NaiveDate) -> u32 {
    date.year() as u32 * 100 + date.month()
}

pub fn to_yyyymmdd(date: NaiveDate) -> u32 {
    to_yyyymm(date) * 100 + date.day()
}

/// Parses an eight-digit `YYYYMMDD` string.
pub fn parse_yyyymmdd(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_numbers() {
        assert_eq!(date_from_days(0), epoch());
        let date = NaiveDate::from_ymd_opt(2023, 9, 15).unwrap();
        let days = days_from_date(date).unwrap();
        assert_eq!(days, 19615);
        assert_eq!(date_from_days(days), date);
        assert_eq!(days_from_date(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()), None);
    }

    #[test]
    fn test_calendar_codes() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 15).unwrap();
        assert_eq!(to_yyyymm(date), 202309);
        assert_eq!(to_yyyymmdd(date), 20230915);
        assert_eq!(days_from_datetime(86_400 * 3 + 5), 3);
    }

    #[test]
    fn test_parse_yyyymmdd() {
        assert_eq!(
            parse_yyyymmdd("20230915"),
            NaiveDate::from_ymd_opt(2023, 9, 15)
        );
        assert_eq!(parse_yyyymmdd("20231345"), None);
        assert_eq!(parse_yyyymmdd("2023-9-1"), None);
        assert_eq!(parse_yyyymmdd("+2023091"), None);
    }
}
