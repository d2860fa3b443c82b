//! Tests for the CSV audit export.

use chrono::NaiveDate;
use holiday_engine::audit::{self, audit_file_name, AuditRecord, HEADER};
use holiday_engine::error::EngineError;
use holiday_engine::{
    assign, canonicalize, CanonicalEvent, Category, MergePolicy, QualifierNormalizer, RawEvent,
    RegionCode,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn raw(on: NaiveDate, label: &str, region: Option<&str>, category: Category) -> RawEvent {
    RawEvent::new(on, label, region.map(|r| RegionCode::parse(r).unwrap()), category)
}

fn sample_events() -> Vec<CanonicalEvent> {
    let input = vec![
        raw(date(2026, 12, 25), "Christmas Day (GB)", Some("GB"), Category::National),
        raw(date(2026, 12, 25), "Christmas Day (DE)", Some("DE"), Category::CountryHoliday),
        raw(date(2026, 4, 23), "ZX Spectrum launched (1982)", None, Category::Retro),
        raw(date(2026, 1, 1), "New Year's Day", Some("GB"), Category::National),
        raw(date(2026, 3, 14), "Pi Day, with a comma", None, Category::International),
    ];
    assign(canonicalize(&input, MergePolicy::MergeRegions, &QualifierNormalizer::default()))
}

fn read_records(path: &std::path::Path) -> (Vec<String>, Vec<AuditRecord>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let header = rdr.headers().unwrap().iter().map(String::from).collect();
    let records = rdr.deserialize().collect::<Result<Vec<AuditRecord>, _>>().unwrap();
    (header, records)
}

#[test]
fn file_name_follows_fixed_pattern() {
    assert_eq!(audit_file_name(2026), "holiday_export_2026.csv");
}

#[test]
fn export_writes_one_row_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let events = sample_events();
    let path = audit::export(&events, 2026, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("holiday_export_2026.csv"));

    let (header, records) = read_records(&path);
    assert_eq!(header, HEADER.to_vec());
    assert_eq!(records.len(), events.len());

    // Rows and canonical events correspond one to one.
    for event in &events {
        let expected = AuditRecord::from(event);
        assert_eq!(records.iter().filter(|r| **r == expected).count(), 1);
    }
}

#[test]
fn rows_are_sorted_by_date_then_label() {
    let dir = tempfile::tempdir().unwrap();
    let path = audit::export(&sample_events(), 2026, dir.path()).unwrap();
    let (_, records) = read_records(&path);
    let keys: Vec<(NaiveDate, String)> = records.iter().map(|r| (r.date, r.label.clone())).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(records[0].label, "New Year's Day");
}

#[test]
fn merged_row_lists_regions_and_sources() {
    let dir = tempfile::tempdir().unwrap();
    let path = audit::export(&sample_events(), 2026, dir.path()).unwrap();
    let (_, records) = read_records(&path);
    let christmas = records.iter().find(|r| r.label == "Christmas Day").unwrap();
    assert_eq!(christmas.regions, "DE;GB");
    assert_eq!(christmas.category, Category::National);
    assert_eq!(christmas.colour, "red");
    assert_eq!(christmas.sources, "national;country-holiday");
}

#[test]
fn labels_with_commas_are_quoted() {
    let mut buf = Vec::new();
    audit::write_audit(&sample_events(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("\"Pi Day, with a comma\""));
    assert!(text.starts_with("date,label,regions,category,colour,sources\n"));
}

#[test]
fn export_is_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let first = std::fs::read(audit::export(&sample_events(), 2026, dir.path()).unwrap()).unwrap();
    let second = std::fs::read(audit::export(&sample_events(), 2026, dir.path()).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_event_set_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = audit::export(&[], 2030, dir.path()).unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    assert_eq!(text, "date,label,regions,category,colour,sources\n");
}

#[test]
fn unwritable_directory_reports_audit_write() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no").join("such").join("dir");
    let events = sample_events();
    let err = audit::export(&events, 2026, &missing).unwrap_err();
    match err {
        EngineError::AuditWrite { path, .. } => {
            assert_eq!(path, missing.join("holiday_export_2026.csv"));
        }
        other => panic!("expected AuditWrite, got {other:?}"),
    }
    // The caller still holds its events.
    assert_eq!(events.len(), 4);
}
