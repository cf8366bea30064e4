use chrono::NaiveDate;
use stats_probe::range::{first_of_month, parse_date};
use stats_probe::{ProbeError, StatsRange};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_default_range_is_month_to_date() {
    let range = StatsRange::resolve(None, None, date(2024, 3, 15));
    assert_eq!(range.start_param(), "2024-03-01");
    assert_eq!(range.end_param(), "2024-03-15");
    assert_eq!(range, StatsRange::current_month(date(2024, 3, 15)));
}

#[test]
fn test_partial_overrides() {
    let today = date(2024, 3, 15);
    let only_start = StatsRange::resolve(Some(date(2023, 11, 2)), None, today);
    assert_eq!(only_start, StatsRange::new(date(2023, 11, 2), today));

    let only_end = StatsRange::resolve(None, Some(date(2024, 3, 10)), today);
    assert_eq!(only_end, StatsRange::new(date(2024, 3, 1), date(2024, 3, 10)));
}

#[test]
fn test_first_day_of_month() {
    let range = StatsRange::current_month(date(2024, 2, 1));
    assert_eq!(range.start, range.end);
    assert_eq!(first_of_month(date(2024, 12, 31)), date(2024, 12, 1));
}

#[test]
fn test_last_year_is_365_days() {
    let range = StatsRange::last_year(date(2024, 3, 1));
    // 2024 is a leap year, so 365 days back lands on March 2nd
    assert_eq!(range.start, date(2023, 3, 2));
    assert_eq!(range.end, date(2024, 3, 1));
}

#[test]
fn test_query_and_display() {
    let range = StatsRange::new(date(2024, 1, 5), date(2024, 2, 9));
    let query = range.query();
    assert_eq!(query[0], ("start_date", "2024-01-05".to_string()));
    assert_eq!(query[1], ("end_date", "2024-02-09".to_string()));
    assert_eq!(range.to_string(), "2024-01-05 - 2024-02-09");
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date("2024-07-04").unwrap(), date(2024, 7, 4));
    assert!(matches!(parse_date("04.07.2024"), Err(ProbeError::InvalidDate(_))));
    assert!(matches!(parse_date("2024-02-30"), Err(ProbeError::InvalidDate(_))));
}
