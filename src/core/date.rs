use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::error::{LeukiError, LeukiResult};

/// `chrono` pattern equivalent to the persisted `dd.MM.yyyy` form.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub const SECONDS_PER_DAY: i64 = 86_400;
pub const SECONDS_PER_HALF_DAY: i64 = SECONDS_PER_DAY / 2;

/// Parses a strict `dd.MM.yyyy` date cell.
///
/// `chrono` alone accepts single-digit days and signed or short years, so the
/// fixed `dd.MM.yyyy` shape is checked before delegating to it.
pub fn parse_date(text: &str) -> LeukiResult<NaiveDate> {
    if !has_date_shape(text) {
        return Err(malformed(text));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| malformed(text))
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Seconds since the Unix epoch at UTC midnight of `date`.
#[must_use]
pub fn date_to_epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Parses a date cell straight to its epoch timestamp; malformed cells yield `None`.
#[must_use]
pub fn cell_to_epoch_seconds(text: &str) -> Option<i64> {
    parse_date(text).ok().map(date_to_epoch_seconds)
}

#[must_use]
pub fn epoch_seconds_to_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|time| time.date_naive())
}

fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            2 | 5 => *byte == b'.',
            _ => byte.is_ascii_digit(),
        })
}

fn malformed(text: &str) -> LeukiError {
    LeukiError::MalformedDate {
        value: text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::has_date_shape;

    #[test]
    fn shape_requires_zero_padded_fields() {
        assert!(has_date_shape("01.03.2024"));
        assert!(!has_date_shape("1.3.2024"));
        assert!(!has_date_shape("01.03.24"));
        assert!(!has_date_shape("2024-03-01"));
        assert!(!has_date_shape(" 01.03.2024"));
    }

    #[test]
    fn shape_rejects_non_ascii_digits() {
        assert!(!has_date_shape("０1.03.2024"));
        assert!(!has_date_shape("01/03/2024"));
    }
}
