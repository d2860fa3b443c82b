//! Property-based tests for canonicalization, colouring and feast computation.

use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;

use holiday_engine::feast::{self, FeastCalendar};
use holiday_engine::{
    assign, canonicalize, Category, MergePolicy, QualifierNormalizer, RawEvent, RegionCode,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_region() -> impl Strategy<Value = Option<RegionCode>> {
    prop_oneof![
        Just(None),
        Just(Some("GB")),
        Just(Some("DE")),
        Just(Some("RO")),
        Just(Some("AU-NSW")),
    ]
    .prop_map(|code| code.map(|c| RegionCode::parse(c).unwrap()))
}

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Christmas Day".to_string()),
        Just("Christmas Day (GB)".to_string()),
        Just("christmas day (DE)".to_string()),
        Just("Boxing Day".to_string()),
        Just("St George's Day".to_string()),
        Just("Star Wars Day".to_string()),
    ]
}

fn arb_category() -> impl Strategy<Value = Category> {
    proptest::sample::select(Category::ALL.to_vec())
}

fn arb_event() -> impl Strategy<Value = RawEvent> {
    (1u32..=3, arb_label(), arb_region(), arb_category()).prop_map(|(day, label, region, category)| {
        RawEvent::new(NaiveDate::from_ymd_opt(2026, 12, 23 + day).unwrap(), label, region, category)
    })
}

fn arb_events() -> impl Strategy<Value = Vec<RawEvent>> {
    prop::collection::vec(arb_event(), 0..30)
}

fn arb_year() -> impl Strategy<Value = i32> {
    1900i32..=2200
}

// ---------------------------------------------------------------------------
// Canonicalization
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn result_is_independent_of_input_order(
        (events, shuffled) in arb_events().prop_flat_map(|events| {
            let shuffled = Just(events.clone()).prop_shuffle();
            (Just(events), shuffled)
        }),
        merge in any::<bool>(),
    ) {
        let policy = MergePolicy::from_flag(merge);
        let normalizer = QualifierNormalizer::default();
        let a = assign(canonicalize(&events, policy, &normalizer));
        let b = assign(canonicalize(&shuffled, policy, &normalizer));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn merged_output_has_unique_date_key_pairs(events in arb_events()) {
        let out = canonicalize(&events, MergePolicy::MergeRegions, &QualifierNormalizer::default());
        let mut seen = std::collections::BTreeSet::new();
        for event in &out {
            prop_assert!(seen.insert((event.date, event.key.clone())), "duplicate {:?}", event);
        }
    }

    #[test]
    fn winning_category_is_highest_precedence_source(events in arb_events(), merge in any::<bool>()) {
        let out = canonicalize(&events, MergePolicy::from_flag(merge), &QualifierNormalizer::default());
        for event in &out {
            prop_assert_eq!(Some(&event.category), event.sources.iter().min());
            prop_assert!(event.sources.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(event.regions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn every_raw_event_is_represented(events in arb_events(), merge in any::<bool>()) {
        let out = canonicalize(&events, MergePolicy::from_flag(merge), &QualifierNormalizer::default());
        for raw in &events {
            let covered = out.iter().any(|e| {
                e.date == raw.date
                    && e.sources.contains(&raw.category)
                    && raw.region.as_ref().is_none_or(|r| e.regions.contains(r))
            });
            prop_assert!(covered, "raw event lost: {:?}", raw);
        }
    }

    #[test]
    fn every_event_gets_a_colour(events in arb_events()) {
        let out = assign(canonicalize(&events, MergePolicy::MergeRegions, &QualifierNormalizer::default()));
        prop_assert!(out.iter().all(|e| e.colour.is_some()));
    }
}

// ---------------------------------------------------------------------------
// Feasts
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn western_easter_is_a_sunday_in_range(year in arb_year()) {
        let easter = feast::western_easter(year).unwrap();
        prop_assert_eq!(easter.weekday(), Weekday::Sun);
        prop_assert!(easter >= NaiveDate::from_ymd_opt(year, 3, 22).unwrap());
        prop_assert!(easter <= NaiveDate::from_ymd_opt(year, 4, 25).unwrap());
    }

    #[test]
    fn orthodox_easter_is_a_sunday_not_before_western(year in arb_year()) {
        let orthodox = feast::orthodox_easter(year).unwrap();
        prop_assert_eq!(orthodox.weekday(), Weekday::Sun);
        prop_assert!(orthodox >= feast::western_easter(year).unwrap());
    }

    #[test]
    fn first_advent_is_the_fourth_sunday_before_christmas(year in arb_year()) {
        let advent = feast::first_advent(year).unwrap();
        prop_assert_eq!(advent.weekday(), Weekday::Sun);
        prop_assert!(advent >= NaiveDate::from_ymd_opt(year, 11, 27).unwrap());
        prop_assert!(advent <= NaiveDate::from_ymd_opt(year, 12, 3).unwrap());
    }

    #[test]
    fn weekday_rules_land_on_their_weekday(year in arb_year()) {
        let cal = FeastCalendar::new(year).unwrap();
        for key in ["mothering_sunday", "remembrance_sunday", "third_sunday_june", "last_sunday_may"] {
            let date = cal.resolve(key).unwrap();
            prop_assert_eq!(date.weekday(), Weekday::Sun, "{}", key);
            prop_assert_eq!(date.year(), year);
        }
        let thanksgiving = cal.resolve("fourth_thursday_november").unwrap();
        prop_assert_eq!(thanksgiving.weekday(), Weekday::Thu);
    }
}
