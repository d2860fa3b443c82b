//! Seam to the external holiday-data provider.
//!
//! The engine only relies on [`HolidayProvider`] returning `(date, name)` pairs per
//! region, year and kind, with an empty result for regions it has no data for.
//! Two implementations ship with the crate: an in-memory [`StaticProvider`] and
//! [`JsonDirProvider`], which reads cached provider dumps from a directory.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::event::RegionCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HolidayKind {
    /// Public / bank holidays.
    Public,
    Religious,
}

impl HolidayKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HolidayKind::Public => "public",
            HolidayKind::Religious => "religious",
        }
    }
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProvidedHoliday {
    pub date: NaiveDate,
    pub name: String,
}

impl ProvidedHoliday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        ProvidedHoliday {
            date,
            name: name.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed data in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Unavailable(String),
}

pub trait HolidayProvider {
    /// Holidays of `kind` observed in `region` during `year`.
    ///
    /// Must return an empty list, not an error, for regions without data.
    fn holidays(
        &self,
        region: &RegionCode,
        year: i32,
        kind: HolidayKind,
    ) -> Result<Vec<ProvidedHoliday>, ProviderError>;
}

impl<P: HolidayProvider + ?Sized> HolidayProvider for &P {
    fn holidays(
        &self,
        region: &RegionCode,
        year: i32,
        kind: HolidayKind,
    ) -> Result<Vec<ProvidedHoliday>, ProviderError> {
        (**self).holidays(region, year, kind)
    }
}

/// Provider with no data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProvider;

impl HolidayProvider for NoProvider {
    fn holidays(
        &self,
        _region: &RegionCode,
        _year: i32,
        _kind: HolidayKind,
    ) -> Result<Vec<ProvidedHoliday>, ProviderError> {
        Ok(Vec::new())
    }
}

/// In-memory provider table.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    entries: BTreeMap<(RegionCode, HolidayKind), Vec<ProvidedHoliday>>,
    unavailable: BTreeSet<(RegionCode, HolidayKind)>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: RegionCode, kind: HolidayKind, holiday: ProvidedHoliday) {
        self.entries.entry((region, kind)).or_default().push(holiday);
    }

    /// Builder form of [`StaticProvider::insert`].
    pub fn with(mut self, region: RegionCode, kind: HolidayKind, date: NaiveDate, name: &str) -> Self {
        self.insert(region, kind, ProvidedHoliday::new(date, name));
        self
    }

    /// Make every lookup for `(region, kind)` fail, simulating an outage.
    pub fn with_outage(mut self, region: RegionCode, kind: HolidayKind) -> Self {
        self.unavailable.insert((region, kind));
        self
    }
}

impl HolidayProvider for StaticProvider {
    fn holidays(
        &self,
        region: &RegionCode,
        year: i32,
        kind: HolidayKind,
    ) -> Result<Vec<ProvidedHoliday>, ProviderError> {
        let key = (region.clone(), kind);
        if self.unavailable.contains(&key) {
            return Err(ProviderError::Unavailable(format!(
                "{kind} holidays for {region} are unavailable"
            )));
        }
        Ok(self
            .entries
            .get(&key)
            .map(|list| list.iter().filter(|h| h.date.year() == year).cloned().collect())
            .unwrap_or_default())
    }
}

/// Reads cached provider dumps named `<REGION>_<kind>_<YEAR>.json`, each a JSON
/// array of `{"date": "YYYY-MM-DD", "name": "..."}` objects.
#[derive(Debug, Clone)]
pub struct JsonDirProvider {
    dir: PathBuf,
}

impl JsonDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonDirProvider { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_for(&self, region: &RegionCode, year: i32, kind: HolidayKind) -> PathBuf {
        self.dir.join(format!("{}_{}_{}.json", region, kind, year))
    }
}

impl HolidayProvider for JsonDirProvider {
    fn holidays(
        &self,
        region: &RegionCode,
        year: i32,
        kind: HolidayKind,
    ) -> Result<Vec<ProvidedHoliday>, ProviderError> {
        let path = self.file_for(region, year, kind);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no cached provider data");
                return Ok(Vec::new());
            }
            Err(source) => return Err(ProviderError::Io { path, source }),
        };
        serde_json::from_str(&text).map_err(|source| ProviderError::Malformed { path, source })
    }
}
