//! Settings document and the validated engine configuration derived from it.
//!
//! The settings file follows the calendar compiler's `settings.json` layout:
//!
//! ```json
//! {
//!   "year": 2026,
//!   "local_country": "GB",
//!   "include_days": {
//!     "international": { "official": true, "semi_official": false, "fun": true },
//!     "retro": true,
//!     "religious": true,
//!     "uk_holidays": true,
//!     "country_list": true,
//!     "custom_events": false
//!   },
//!   "include_country_list": { "countries": ["DE", "RO"] },
//!   "merge_identical_holidays": true
//! }
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::event::RegionCode;
use crate::normalize::NormalizationConfig;

/// Years for which Gregorian feast computations are meaningful.
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1583..=9999;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InternationalRepr")]
pub struct InternationalDays {
    pub official: bool,
    pub semi_official: bool,
    pub fun: bool,
}

impl InternationalDays {
    pub fn all() -> Self {
        InternationalDays {
            official: true,
            semi_official: true,
            fun: true,
        }
    }

    pub fn any(&self) -> bool {
        self.official || self.semi_official || self.fun
    }
}

/// `"international": true` switches every subset on.
#[derive(Deserialize)]
#[serde(untagged)]
enum InternationalRepr {
    Flag(bool),
    Detailed {
        #[serde(default)]
        official: bool,
        #[serde(default)]
        semi_official: bool,
        #[serde(default)]
        fun: bool,
    },
}

impl From<InternationalRepr> for InternationalDays {
    fn from(repr: InternationalRepr) -> Self {
        match repr {
            InternationalRepr::Flag(true) => InternationalDays::all(),
            InternationalRepr::Flag(false) => InternationalDays::default(),
            InternationalRepr::Detailed {
                official,
                semi_official,
                fun,
            } => InternationalDays {
                official,
                semi_official,
                fun,
            },
        }
    }
}

/// Which event categories are collected. Everything defaults to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeDays {
    pub international: InternationalDays,
    pub retro: bool,
    pub religious: bool,
    #[serde(alias = "uk_holidays")]
    pub national: bool,
    pub country_list: bool,
    pub custom_events: bool,
}

impl IncludeDays {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        IncludeDays {
            international: InternationalDays::all(),
            retro: true,
            religious: true,
            national: true,
            country_list: true,
            custom_events: true,
        }
    }

    pub fn any(&self) -> bool {
        self.international.any()
            || self.retro
            || self.religious
            || self.national
            || self.country_list
            || self.custom_events
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CountryListRepr")]
pub struct CountryList {
    pub countries: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountryListRepr {
    Flat(Vec<String>),
    Nested {
        #[serde(default)]
        countries: Vec<String>,
    },
}

impl From<CountryListRepr> for CountryList {
    fn from(repr: CountryListRepr) -> Self {
        match repr {
            CountryListRepr::Flat(countries) | CountryListRepr::Nested { countries } => {
                CountryList { countries }
            }
        }
    }
}

/// The loosely-typed settings document, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub year: Option<i32>,
    pub local_country: String,
    pub include_days: IncludeDays,
    pub include_country_list: CountryList,
    pub merge_identical_holidays: bool,
    pub custom_event_files: Vec<PathBuf>,
    pub normalization: NormalizationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            year: None,
            local_country: "GB".to_string(),
            include_days: IncludeDays::default(),
            include_country_list: CountryList::default(),
            merge_identical_holidays: false,
            custom_event_files: Vec::new(),
            normalization: NormalizationConfig::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Settings(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EngineError::Settings(e.to_string()))
    }

    /// Validate into an [`EngineConfig`] for one year.
    ///
    /// `year` overrides the document's year when given.
    pub fn to_config(&self, year: Option<i32>) -> Result<EngineConfig> {
        let year = year
            .or(self.year)
            .ok_or_else(|| EngineError::Settings("no target year given".to_string()))?;
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(EngineError::Settings(format!(
                "year {year} is outside {}..={}",
                SUPPORTED_YEARS.start(),
                SUPPORTED_YEARS.end()
            )));
        }

        let local_region = RegionCode::parse(&self.local_country)
            .map_err(|e| EngineError::Settings(e.to_string()))?;
        let regions = self
            .include_country_list
            .countries
            .iter()
            .map(|raw| RegionCode::parse(raw).map_err(|e| EngineError::Settings(e.to_string())))
            .collect::<Result<Vec<_>>>()?;

        Ok(EngineConfig {
            year,
            local_region,
            regions,
            include: self.include_days,
            merge_identical_holidays: self.merge_identical_holidays,
            custom_event_files: self.custom_event_files.clone(),
            normalization: self.normalization.clone(),
        })
    }
}

/// Validated input for one resolution run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub year: i32,
    pub local_region: RegionCode,
    /// Extra regions, used when `include.country_list` is on.
    pub regions: Vec<RegionCode>,
    pub include: IncludeDays,
    pub merge_identical_holidays: bool,
    pub custom_event_files: Vec<PathBuf>,
    pub normalization: NormalizationConfig,
}

impl EngineConfig {
    /// A config for `year` with every category switched off.
    pub fn new(year: i32, local_region: RegionCode) -> Self {
        EngineConfig {
            year,
            local_region,
            regions: Vec::new(),
            include: IncludeDays::none(),
            merge_identical_holidays: true,
            custom_event_files: Vec::new(),
            normalization: NormalizationConfig::default(),
        }
    }

    /// Listed regions other than the local one, sorted and deduplicated.
    /// Empty unless `country_list` is enabled.
    pub fn listed_regions(&self) -> Vec<RegionCode> {
        if !self.include.country_list {
            return Vec::new();
        }
        let set: BTreeSet<&RegionCode> = self
            .regions
            .iter()
            .filter(|code| **code != self.local_region)
            .collect();
        set.into_iter().cloned().collect()
    }

    /// The local region plus any listed regions, sorted.
    pub fn enabled_regions(&self) -> Vec<RegionCode> {
        let mut all: BTreeSet<RegionCode> = self.listed_regions().into_iter().collect();
        all.insert(self.local_region.clone());
        all.into_iter().collect()
    }
}
