use chrono::NaiveDate;
use labtrend_core::{parse_sample_date, SampleDate};
use proptest::prelude::*;

fn day(year: i32, month: u32, day: u32) -> SampleDate {
    SampleDate::Day(NaiveDate::from_ymd_opt(year, month, day).expect("valid test date"))
}

#[test]
fn iso_and_day_first_formats_agree() {
    assert_eq!(parse_sample_date("2025-03-17"), day(2025, 3, 17));
    assert_eq!(parse_sample_date("17/03/2025"), day(2025, 3, 17));
    assert_eq!(parse_sample_date("7/3/2025"), day(2025, 3, 7));
}

#[test]
fn iso_segments_are_read_as_integer_prefixes() {
    assert_eq!(parse_sample_date("2025-3-7"), day(2025, 3, 7));
    assert_eq!(parse_sample_date("2025-03-17T08:30:00"), day(2025, 3, 17));
}

#[test]
fn overflowing_parts_roll_forward() {
    assert_eq!(parse_sample_date("2025-02-30"), day(2025, 3, 2));
    assert_eq!(parse_sample_date("2024-02-30"), day(2024, 3, 1));
    assert_eq!(parse_sample_date("2025-13-01"), day(2026, 1, 1));
    assert_eq!(parse_sample_date("31/04/2025"), day(2025, 5, 1));
    assert_eq!(parse_sample_date("00/03/2025"), day(2025, 2, 28));
    assert_eq!(parse_sample_date("15/00/2025"), day(2024, 12, 15));
}

#[test]
fn two_digit_years_are_twentieth_century() {
    assert_eq!(parse_sample_date("17/03/25"), day(1925, 3, 17));
    assert_eq!(parse_sample_date("01/01/99"), day(1999, 1, 1));
    assert_eq!(parse_sample_date("01/01/100"), day(100, 1, 1));
}

#[test]
fn non_numeric_segments_are_unknown() {
    assert_eq!(parse_sample_date("aa/bb/cccc"), SampleDate::Unknown);
    assert_eq!(parse_sample_date("2025-xx-01"), SampleDate::Unknown);
}

#[test]
fn generic_timestamps_fall_back() {
    assert_eq!(
        parse_sample_date("2025-03-17T23:30:00-05:00"),
        day(2025, 3, 17),
        "the day as written, not shifted to UTC"
    );
    let rfc2822 = "Mon, 17 Mar 2025 10:00:00 +0000";
    assert_eq!(parse_sample_date(rfc2822), day(2025, 3, 17));
    assert_eq!(parse_sample_date("March 17, 2025"), day(2025, 3, 17));
    assert_eq!(parse_sample_date("17 Mar 2025"), day(2025, 3, 17));
}

#[test]
fn free_text_is_unknown() {
    assert_eq!(parse_sample_date("pendiente"), SampleDate::Unknown);
    assert_eq!(parse_sample_date(""), SampleDate::Unknown);
}

#[test]
fn unknown_sorts_after_known_days() {
    let mut dates = vec![SampleDate::Unknown, day(2025, 5, 1), day(2024, 12, 31)];
    dates.sort();
    assert_eq!(
        dates,
        vec![day(2024, 12, 31), day(2025, 5, 1), SampleDate::Unknown]
    );
}

#[test]
fn serializes_as_optional_iso_day() {
    let known = serde_json::to_value(day(2025, 3, 17)).expect("serialize");
    assert_eq!(known, serde_json::json!("2025-03-17"));
    let unknown = serde_json::to_value(SampleDate::Unknown).expect("serialize");
    assert_eq!(unknown, serde_json::Value::Null);
}

proptest! {
    #[test]
    fn both_formats_name_the_same_day(ordinal in 0i64..40_000) {
        let base = NaiveDate::from_ymd_opt(1950, 1, 1).expect("valid base date");
        let date = base + chrono::Duration::days(ordinal);

        let iso = parse_sample_date(&date.format("%Y-%m-%d").to_string());
        let day_first = parse_sample_date(&date.format("%d/%m/%Y").to_string());

        prop_assert_eq!(iso, SampleDate::Day(date));
        prop_assert_eq!(day_first, iso);
    }
}
