//! Audit export: one CSV row per canonical event.
//!
//! The file is rewritten in full on every run and ordered by date, then label,
//! so two runs over unchanged input produce identical files.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::colour::colour_for;
use crate::error::{EngineError, Result};
use crate::event::{CanonicalEvent, Category};

pub const HEADER: [&str; 6] = ["date", "label", "regions", "category", "colour", "sources"];

/// Projection of a [`CanonicalEvent`] onto one export row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuditRecord {
    pub date: NaiveDate,
    pub label: String,
    /// Region codes joined with `;`, in sorted order.
    pub regions: String,
    pub category: Category,
    pub colour: String,
    /// Every contributing category, joined with `;`.
    pub sources: String,
}

impl From<&CanonicalEvent> for AuditRecord {
    fn from(event: &CanonicalEvent) -> Self {
        AuditRecord {
            date: event.date,
            label: event.label.clone(),
            regions: event.joined_regions(),
            category: event.category,
            colour: event.colour.unwrap_or_else(|| colour_for(event)).to_string(),
            sources: event
                .sources
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// `holiday_export_<YEAR>.csv`; downstream tooling depends on this name.
pub fn audit_file_name(year: i32) -> String {
    format!("holiday_export_{year}.csv")
}

/// Rows for `events` in export order.
pub fn audit_records(events: &[CanonicalEvent]) -> Vec<AuditRecord> {
    let mut records: Vec<AuditRecord> = events.iter().map(AuditRecord::from).collect();
    records.sort();
    records
}

/// Write the header and one row per event to `writer`.
pub fn write_audit<W: io::Write>(events: &[CanonicalEvent], writer: W) -> std::result::Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    for record in audit_records(events) {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `holiday_export_<year>.csv` into `dir`, replacing any previous file.
///
/// # Errors
/// `EngineError::AuditWrite` if the file cannot be created or written. The
/// caller's events are untouched either way.
pub fn export(events: &[CanonicalEvent], year: i32, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(audit_file_name(year));
    let written = std::fs::File::create(&path)
        .map_err(csv::Error::from)
        .and_then(|file| write_audit(events, io::BufWriter::new(file)));

    match written {
        Ok(()) => {
            info!(path = %path.display(), rows = events.len(), "holiday export written");
            Ok(path)
        }
        Err(source) => Err(EngineError::AuditWrite { path, source }),
    }
}
