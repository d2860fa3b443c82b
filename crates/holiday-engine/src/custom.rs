//! User-supplied custom events (birthdays, anniversaries, club meetings).
//!
//! A custom events file maps `MM-DD` keys to events and may carry a `recurring`
//! list of RFC 5545 recurrence rules that are expanded over the target year:
//!
//! ```json
//! {
//!   "03-14": { "label": "Mum's Birthday" },
//!   "recurring": [ { "label": "Retro Club", "rrule": "FREQ=MONTHLY;BYDAY=1TH" } ]
//! }
//! ```
//!
//! A `colour` field on dated entries is accepted for compatibility and ignored;
//! colours are assigned per category.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Utc};
use rrule::RRuleSet;
use serde::Deserialize;

use crate::error::{EngineError, Result};

/// Upper bound on instances expanded per rule; a daily rule yields at most 366.
const MAX_INSTANCES: u16 = 400;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatedEvent {
    pub label: String,
    #[serde(default)]
    pub colour: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecurringEvent {
    pub label: String,
    pub rrule: String,
}

#[derive(Debug, Deserialize)]
struct CustomEventsDoc {
    #[serde(default)]
    recurring: Vec<RecurringEvent>,
    #[serde(flatten)]
    dated: BTreeMap<String, DatedEvent>,
}

/// A parsed custom events file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEvents {
    path: PathBuf,
    dated: Vec<(u32, u32, String)>,
    recurring: Vec<RecurringEvent>,
}

impl CustomEvents {
    /// # Errors
    /// `EngineError::CustomEvents` if the file is unreadable, is not valid JSON of
    /// the expected shape, or has a key that is not a calendar `MM-DD`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::CustomEvents {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(path, &text)
    }

    /// Parse file contents; `path` is only used to label errors.
    pub fn from_json(path: &Path, text: &str) -> Result<Self> {
        let fail = |reason: String| EngineError::CustomEvents {
            path: path.to_path_buf(),
            reason,
        };

        let doc: CustomEventsDoc = serde_json::from_str(text).map_err(|e| fail(e.to_string()))?;

        let mut dated = Vec::with_capacity(doc.dated.len());
        for (key, event) in doc.dated {
            let (month, day) =
                parse_month_day(&key).ok_or_else(|| fail(format!("`{key}` is not a valid MM-DD date")))?;
            dated.push((month, day, event.label));
        }

        Ok(CustomEvents {
            path: path.to_path_buf(),
            dated,
            recurring: doc.recurring,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All occurrences in `year`, sorted by date then label.
    ///
    /// `02-29` entries are skipped in common years.
    ///
    /// # Errors
    /// `EngineError::CustomEvents` wrapping the first recurrence rule that fails to parse.
    pub fn occurrences(&self, year: i32) -> Result<Vec<(NaiveDate, String)>> {
        let mut out = BTreeSet::new();

        for (month, day, label) in &self.dated {
            if let Some(date) = NaiveDate::from_ymd_opt(year, *month, *day) {
                out.insert((date, label.clone()));
            }
        }

        for event in &self.recurring {
            let dates = expand_in_year(&event.rrule, year).map_err(|e| EngineError::CustomEvents {
                path: self.path.clone(),
                reason: format!("{}: {}", event.label, e),
            })?;
            out.extend(dates.into_iter().map(|date| (date, event.label.clone())));
        }

        Ok(out.into_iter().collect())
    }
}

/// Parse `MM-DD`, accepting any day that exists in a leap year.
pub(crate) fn parse_month_day(key: &str) -> Option<(u32, u32)> {
    let (month, day) = key.split_once('-')?;
    if month.len() != 2 || day.len() != 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(2000, month, day).map(|_| (month, day))
}

/// Expand an RRULE (e.g. `FREQ=MONTHLY;BYDAY=1TH`) over the days of `year`.
///
/// The rule is anchored at 1 January 00:00 UTC. When it carries neither `COUNT`
/// nor `UNTIL`, expansion is bounded by the end of the year.
///
/// # Errors
/// `EngineError::InvalidRecurrence` if the rule is empty or unparseable.
pub fn expand_in_year(rule: &str, year: i32) -> Result<Vec<NaiveDate>> {
    let rule = rule.trim();
    if rule.is_empty() {
        return Err(EngineError::InvalidRecurrence("empty RRULE string".to_string()));
    }
    if !(0..=9999).contains(&year) {
        return Err(EngineError::InvalidYear(year));
    }

    let upper = rule.to_uppercase();
    let mut rrule_str = rule.to_string();
    // UNTIL must share DTSTART's timezone; for UTC that means a trailing `Z`.
    if !upper.contains("UNTIL=") && !upper.contains("COUNT=") {
        rrule_str = format!("{};UNTIL={:04}1231T235959Z", rrule_str, year);
    }

    let rrule_text = format!("DTSTART;TZID=UTC:{:04}0101T000000\nRRULE:{}", year, rrule_str);
    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| EngineError::InvalidRecurrence(format!("{}", e)))?;

    let dates: BTreeSet<NaiveDate> = rrule_set
        .all(MAX_INSTANCES)
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .filter(|date| date.year() == year)
        .collect();

    Ok(dates.into_iter().collect())
}
