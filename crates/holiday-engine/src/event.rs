//! Core event types shared by the collector, canonicalizer and exporters.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::error::{EngineError, Result};

/// ISO 3166-1 alpha-2 country code, optionally followed by a `-SUB` subdivision
/// suffix for federated countries (e.g. `GB`, `AU-NSW`, `GB-SCT`).
///
/// Codes are stored upper-cased so `gb` and `GB` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim().to_ascii_uppercase();
        let (country, subdivision) = match code.split_once('-') {
            Some((c, s)) => (c, Some(s)),
            None => (code.as_str(), None),
        };

        let country_ok = country.len() == 2 && country.bytes().all(|b| b.is_ascii_alphabetic());
        let subdivision_ok = subdivision.is_none_or(|s| {
            (1..=3).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric())
        });

        if country_ok && subdivision_ok {
            Ok(RegionCode(code))
        } else {
            Err(EngineError::InvalidRegion(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-letter country part, without any subdivision suffix.
    pub fn country(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    pub fn is_subdivision(&self) -> bool {
        self.0.contains('-')
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegionCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        RegionCode::parse(s)
    }
}

impl TryFrom<String> for RegionCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        RegionCode::parse(&value)
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.0
    }
}

/// Event category.
///
/// Variants are declared in precedence order: when one canonical event is built
/// from raw events of different categories, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    National,
    Religious,
    CountryHoliday,
    Retro,
    International,
    Custom,
}

impl Category {
    /// All categories, highest precedence first.
    pub const ALL: [Category; 6] = [
        Category::National,
        Category::Religious,
        Category::CountryHoliday,
        Category::Retro,
        Category::International,
        Category::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::National => "national",
            Category::Religious => "religious",
            Category::CountryHoliday => "country-holiday",
            Category::Retro => "retro",
            Category::International => "international",
            Category::Custom => "custom",
        }
    }

    /// True when `self` wins a category conflict against `other`.
    pub fn outranks(self, other: Category) -> bool {
        self < other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One collected (date, label, region, category) tuple, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawEvent {
    pub date: NaiveDate,
    pub label: String,
    /// `None` for events that do not belong to a region (international, retro, custom).
    pub region: Option<RegionCode>,
    pub category: Category,
}

impl RawEvent {
    pub fn new(
        date: NaiveDate,
        label: impl Into<String>,
        region: Option<RegionCode>,
        category: Category,
    ) -> Self {
        RawEvent {
            date,
            label: label.into(),
            region,
            category,
        }
    }
}

/// A resolved, de-duplicated event.
///
/// With merging enabled there is at most one `CanonicalEvent` per
/// (`date`, `key`) in a run. `regions` and `sources` are sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalEvent {
    pub date: NaiveDate,
    /// Display label with region qualifiers removed.
    pub label: String,
    /// Normalized label used as the merge key.
    pub key: String,
    pub regions: Vec<RegionCode>,
    /// Winning category after precedence resolution.
    pub category: Category,
    /// Every category that contributed a raw event.
    pub sources: Vec<Category>,
    /// Set once by [`crate::colour::assign`].
    pub colour: Option<Colour>,
}

impl CanonicalEvent {
    /// Region codes joined in their stable order, e.g. `DE;GB`.
    pub fn joined_regions(&self) -> String {
        self.regions
            .iter()
            .map(RegionCode::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }
}
