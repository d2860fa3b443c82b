//! Tests for moveable feast and weekday-rule computation.

use chrono::{NaiveDate, Weekday};
use holiday_engine::error::EngineError;
use holiday_engine::feast::{self, Anchor, FeastCalendar};
use holiday_engine::{compute_moveable_feast, last_weekday, nth_weekday};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

// ---------------------------------------------------------------------------
// 2026 fixture oracle
// ---------------------------------------------------------------------------

#[test]
fn easter_sunday_2026() {
    assert_eq!(compute_moveable_feast(2026, "easter_sunday").unwrap(), date(2026, 4, 5));
}

#[test]
fn ash_wednesday_2026() {
    assert_eq!(compute_moveable_feast(2026, "ash_wednesday").unwrap(), date(2026, 2, 18));
}

#[test]
fn mothering_sunday_2026_is_fourth_sunday_of_lent() {
    assert_eq!(compute_moveable_feast(2026, "mothering_sunday").unwrap(), date(2026, 3, 15));
}

#[test]
fn easter_cycle_2026() {
    let cal = FeastCalendar::new(2026).unwrap();
    let cases = [
        ("shrove_tuesday", date(2026, 2, 17)),
        ("palm_sunday", date(2026, 3, 29)),
        ("good_friday", date(2026, 4, 3)),
        ("easter_monday", date(2026, 4, 6)),
        ("ascension_day", date(2026, 5, 14)),
        ("pentecost_sunday", date(2026, 5, 24)),
        ("whit_monday", date(2026, 5, 25)),
        ("corpus_christi", date(2026, 6, 4)),
    ];
    for (key, expected) in cases {
        assert_eq!(cal.resolve(key).unwrap(), expected, "rule {key}");
    }
}

#[test]
fn orthodox_cycle_2026() {
    let cal = FeastCalendar::new(2026).unwrap();
    assert_eq!(cal.resolve("orthodox_easter").unwrap(), date(2026, 4, 12));
    assert_eq!(cal.resolve("orthodox_good_friday").unwrap(), date(2026, 4, 10));
    // Florii is Orthodox Palm Sunday.
    assert_eq!(cal.resolve("florii").unwrap(), date(2026, 4, 5));
}

#[test]
fn advent_cycle_2026() {
    let cal = FeastCalendar::new(2026).unwrap();
    assert_eq!(cal.anchor(Anchor::FirstAdvent), date(2026, 11, 29));
    assert_eq!(cal.resolve("advent_4").unwrap(), date(2026, 12, 20));
    assert_eq!(cal.resolve("volkstrauertag").unwrap(), date(2026, 11, 15));
}

#[test]
fn weekday_rules_2026() {
    let cal = FeastCalendar::new(2026).unwrap();
    let cases = [
        ("third_monday_january", date(2026, 1, 19)),
        ("first_sunday_february", date(2026, 2, 1)),
        ("second_sunday_may", date(2026, 5, 10)),
        ("last_sunday_may", date(2026, 5, 31)),
        ("last_monday_may", date(2026, 5, 25)),
        ("third_sunday_june", date(2026, 6, 21)),
        ("first_sunday_september", date(2026, 9, 6)),
        ("remembrance_sunday", date(2026, 11, 8)),
        ("fourth_thursday_november", date(2026, 11, 26)),
        ("christmas_day", date(2026, 12, 25)),
    ];
    for (key, expected) in cases {
        assert_eq!(cal.resolve(key).unwrap(), expected, "rule {key}");
    }
}

// ---------------------------------------------------------------------------
// Known Easter dates across centuries
// ---------------------------------------------------------------------------

#[test]
fn western_easter_known_years() {
    let cases = [
        (1961, date(1961, 4, 2)),
        (2000, date(2000, 4, 23)),
        (2019, date(2019, 4, 21)),
        (2024, date(2024, 3, 31)),
        (2025, date(2025, 4, 20)),
        (2038, date(2038, 4, 25)),
        (2285, date(2285, 3, 22)),
    ];
    for (year, expected) in cases {
        assert_eq!(feast::western_easter(year).unwrap(), expected, "year {year}");
    }
}

#[test]
fn orthodox_easter_known_years() {
    let cases = [
        (2023, date(2023, 4, 16)),
        (2024, date(2024, 5, 5)),
        (2025, date(2025, 4, 20)),
        (2027, date(2027, 5, 2)),
    ];
    for (year, expected) in cases {
        assert_eq!(feast::orthodox_easter(year).unwrap(), expected, "year {year}");
    }
}

// ---------------------------------------------------------------------------
// nth / last weekday
// ---------------------------------------------------------------------------

#[test]
fn nth_weekday_missing_fifth_occurrence_is_none() {
    // February 2026 has only four Sundays.
    assert_eq!(nth_weekday(2026, 2, Weekday::Sun, 5), None);
    assert_eq!(nth_weekday(2026, 2, Weekday::Sun, 4), Some(date(2026, 2, 22)));
}

#[test]
fn last_weekday_handles_december_and_bad_months() {
    assert_eq!(last_weekday(2026, 12, Weekday::Sun), Some(date(2026, 12, 27)));
    assert_eq!(last_weekday(2026, 2, Weekday::Sat), Some(date(2026, 2, 28)));
    assert_eq!(last_weekday(2026, 13, Weekday::Sun), None);
    assert_eq!(last_weekday(2026, 0, Weekday::Sun), None);
}

// ---------------------------------------------------------------------------
// Unknown rules
// ---------------------------------------------------------------------------

#[test]
fn unknown_rule_is_reported() {
    let err = compute_moveable_feast(2026, "made_up_rule").unwrap_err();
    match err {
        EngineError::UnknownRule { rule, region } => {
            assert_eq!(rule, "made_up_rule");
            assert_eq!(region, None);
        }
        other => panic!("expected UnknownRule, got {other:?}"),
    }
}

#[test]
fn unknown_rule_message_names_region_once_attributed() {
    let err = compute_moveable_feast(2026, "made_up_rule").unwrap_err().in_region("ZZ");
    assert_eq!(err.to_string(), "Unknown rule `made_up_rule` referenced by region ZZ");
}

#[test]
fn every_registered_rule_resolves() {
    let cal = FeastCalendar::new(2026).unwrap();
    for rule in feast::registry() {
        let resolved = cal.date_of(rule).unwrap();
        assert_eq!(resolved, cal.resolve(rule.key).unwrap());
    }
    for key in feast::CHRISTIAN_FEASTS {
        assert!(feast::lookup(key).is_some(), "christian feast {key} must be registered");
    }
}

#[test]
fn calendar_is_a_pure_function_of_year() {
    assert_eq!(FeastCalendar::new(2031).unwrap(), FeastCalendar::new(2031).unwrap());
}
