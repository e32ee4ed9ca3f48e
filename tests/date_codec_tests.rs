use chrono::NaiveDate;
use leuki::LeukiError;
use leuki::core::{date_to_epoch_seconds, epoch_seconds_to_date, format_date, parse_date};

#[test]
fn parses_zero_padded_day_month_year() {
    let date = parse_date("01.03.2024").expect("valid date");
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"));
}

#[test]
fn rejects_iso_and_short_forms_as_malformed() {
    for text in ["2024-01-01", "1.3.2024", "01.03.24", "", "01.03.2024 ", "31.02.2024"] {
        let err = parse_date(text).expect_err("must be rejected");
        match err {
            LeukiError::MalformedDate { value } => assert_eq!(value, text),
            other => panic!("unexpected error for `{text}`: {other}"),
        }
    }
}

#[test]
fn epoch_seconds_are_utc_midnight() {
    let jan_first = parse_date("01.01.2024").expect("date");
    assert_eq!(date_to_epoch_seconds(jan_first), 1_704_067_200);

    let leap_day = parse_date("29.02.2024").expect("leap day");
    assert_eq!(date_to_epoch_seconds(leap_day), 1_709_164_800);
}

#[test]
fn epoch_seconds_map_back_to_the_same_calendar_day() {
    let date = NaiveDate::from_ymd_opt(2023, 12, 31).expect("date");
    let ts = date_to_epoch_seconds(date);
    assert_eq!(epoch_seconds_to_date(ts), Some(date));
    assert_eq!(epoch_seconds_to_date(ts + 43_200), Some(date));
}

#[test]
fn formatting_matches_persisted_pattern() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 5).expect("date");
    assert_eq!(format_date(date), "05.01.2024");
}
