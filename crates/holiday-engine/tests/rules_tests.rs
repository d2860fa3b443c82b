//! Tests for rule set loading and validation.

use std::io::Write;

use holiday_engine::error::EngineError;
use holiday_engine::rules::{observance_label, FixedObservance, RuleRef};
use holiday_engine::{RegionCode, RuleSet};

const GB_RULES: &str = r#"{
    "GB": {
        "mothers_day": "mothering_sunday",
        "fathers_day": "third_sunday_june",
        "yorkshire_pudding_day": "first_sunday_february",
        "christian": true,
        "moveable_cultural": { "remembrance_sunday": true, "blue_monday": false },
        "notes": 42
    },
    "de": {
        "mothers_day": "second_sunday_may",
        "moveable_cultural": { "volkstrauertag": true }
    }
}"#;

fn code(raw: &str) -> RegionCode {
    RegionCode::parse(raw).unwrap()
}

#[test]
fn loads_named_observances_and_flags() {
    let rules = RuleSet::from_json(GB_RULES).unwrap();
    assert_eq!(rules.len(), 2);

    let gb = rules.get(&code("GB")).unwrap();
    assert!(gb.christian);
    assert_eq!(gb.mothers_day().unwrap().id(), "mothering_sunday");
    assert_eq!(gb.fathers_day().unwrap().id(), "third_sunday_june");

    let pudding = gb.observance("yorkshire_pudding_day").unwrap();
    assert_eq!(pudding.label, "Yorkshire Pudding Day");
    assert_eq!(pudding.rule.id(), "first_sunday_february");

    let enabled: Vec<String> = gb.enabled_cultural().map(|r| r.id().to_string()).collect();
    assert_eq!(enabled, vec!["remembrance_sunday".to_string()]);
}

#[test]
fn region_keys_are_case_insensitive() {
    let rules = RuleSet::from_json(GB_RULES).unwrap();
    let de = rules.get(&code("DE")).unwrap();
    assert!(!de.christian);
    assert_eq!(de.mothers_day().unwrap().id(), "second_sunday_may");
}

#[test]
fn non_string_extra_keys_are_ignored() {
    let rules = RuleSet::from_json(GB_RULES).unwrap();
    let gb = rules.get(&code("GB")).unwrap();
    assert!(gb.observance("notes").is_none());
    assert_eq!(gb.observances.len(), 3);
}

#[test]
fn free_text_metadata_is_not_a_rule() {
    let rules = RuleSet::from_json(
        r#"{"GB": {
            "christian": true,
            "mothers_day": "mothering_sunday",
            "display_name": "United Kingdom",
            "source": "https://example.org/rules",
            "pancake_day": "shrove_tuesday"
        }}"#,
    )
    .unwrap();
    let gb = rules.get(&code("GB")).unwrap();
    assert!(gb.observance("display_name").is_none());
    assert!(gb.observance("source").is_none());
    assert_eq!(gb.observance("pancake_day").unwrap().rule.id(), "shrove_tuesday");
    assert!(gb.observances.iter().all(|o| o.rule.resolve().is_ok()));
}

#[test]
fn known_observance_keys_always_name_a_rule() {
    let rules = RuleSet::from_json(r#"{"GB": {"yorkshire_pudding_day": "First Sunday"}}"#).unwrap();
    let gb = rules.get(&code("GB")).unwrap();
    let err = gb.observance("yorkshire_pudding_day").unwrap().rule.resolve().unwrap_err();
    assert!(err.is_unknown_rule());
}

#[test]
fn fixed_days_accept_labels_and_entries() {
    let rules = RuleSet::from_json(
        r#"{
            "RO": { "fixed": { "12-01": "Great Union Day", "02-24": { "label": "Dragobete", "colour": "pink" } } },
            "all": { "cultural_days": { "12-31": "New Year's Eve" } }
        }"#,
    )
    .unwrap();
    assert_eq!(rules.len(), 1);

    let ro = rules.get(&code("RO")).unwrap();
    let labels: Vec<&str> = ro.fixed.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["Dragobete", "Great Union Day"]);
    assert_eq!(
        rules.shared(),
        &[FixedObservance {
            month: 12,
            day: 31,
            label: "New Year's Eve".to_string()
        }]
    );
}

#[test]
fn observances_are_sorted_by_key() {
    let rules = RuleSet::from_json(GB_RULES).unwrap();
    let keys: Vec<&str> = rules
        .get(&code("GB"))
        .unwrap()
        .observances
        .iter()
        .map(|o| o.key.as_str())
        .collect();
    assert_eq!(keys, vec!["fathers_day", "mothers_day", "yorkshire_pudding_day"]);
}

#[test]
fn absent_region_is_not_an_error() {
    let rules = RuleSet::from_json(GB_RULES).unwrap();
    assert!(rules.get(&code("FR")).is_none());
}

#[test]
fn subdivision_does_not_fall_back_to_country() {
    let rules = RuleSet::from_json(GB_RULES).unwrap();
    assert!(rules.get(&code("GB-SCT")).is_none());
}

#[test]
fn unknown_rule_ids_load_and_fail_only_on_resolution() {
    let rules = RuleSet::from_json(r#"{"ZZ": {"mothers_day": "made_up_rule"}}"#).unwrap();
    let zz = rules.get(&code("ZZ")).unwrap();
    let err = zz.mothers_day().unwrap().resolve().unwrap_err();
    assert!(err.is_unknown_rule());
}

#[test]
fn rule_ref_resolves_registered_rule() {
    let rule = RuleRef::new("mothering_sunday").resolve().unwrap();
    assert_eq!(rule.key, "mothering_sunday");
}

// ---------------------------------------------------------------------------
// Malformed sources are fatal
// ---------------------------------------------------------------------------

fn assert_malformed(text: &str) {
    match RuleSet::from_json(text) {
        Err(EngineError::MalformedRuleSet(_)) => {}
        other => panic!("expected MalformedRuleSet for {text}, got {other:?}"),
    }
}

#[test]
fn top_level_array_is_malformed() {
    assert_malformed(r#"[{"GB": {}}]"#);
}

#[test]
fn invalid_json_is_malformed() {
    assert_malformed(r#"{"GB": {"christian": true"#);
}

#[test]
fn wrong_field_type_is_malformed() {
    assert_malformed(r#"{"GB": {"christian": "yes"}}"#);
    assert_malformed(r#"{"GB": {"moveable_cultural": ["remembrance_sunday"]}}"#);
}

#[test]
fn invalid_fixed_day_is_malformed() {
    assert_malformed(r#"{"GB": {"fixed": {"13-01": "Nowhere Day"}}}"#);
    assert_malformed(r#"{"ALL": {"fixed": {"2-3": "Short Day"}}}"#);
    assert_malformed(r#"{"GB": {"fixed": {"11-05": 5}}}"#);
}

#[test]
fn region_body_must_be_an_object() {
    assert_malformed(r#"{"GB": "mothering_sunday"}"#);
}

#[test]
fn invalid_region_code_is_malformed() {
    assert_malformed(r#"{"Great Britain": {}}"#);
}

#[test]
fn missing_file_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let err = RuleSet::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, EngineError::MalformedRuleSet(_)));
}

#[test]
fn load_reads_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(GB_RULES.as_bytes()).unwrap();
    let rules = RuleSet::load(file.path()).unwrap();
    let regions: Vec<&str> = rules.regions().map(RegionCode::as_str).collect();
    assert_eq!(regions, vec!["DE", "GB"]);
}

#[test]
fn observance_labels() {
    assert_eq!(observance_label("mothers_day"), "Mother's Day");
    assert_eq!(observance_label("fathers_day"), "Father's Day");
    assert_eq!(observance_label("grandparents_day"), "Grandparents' Day");
    assert_eq!(observance_label("pancake__day"), "Pancake Day");
}
