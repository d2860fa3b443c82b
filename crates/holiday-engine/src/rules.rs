//! Country rule sets: per-region declarative data for culturally variable days.
//!
//! A rule source is a JSON object keyed by region code:
//!
//! ```json
//! {
//!   "GB": {
//!     "mothers_day": "mothering_sunday",
//!     "fathers_day": "third_sunday_june",
//!     "yorkshire_pudding_day": "first_sunday_february",
//!     "christian": true,
//!     "moveable_cultural": { "remembrance_sunday": true },
//!     "fixed": { "11-05": "Bonfire Night" }
//!   },
//!   "ALL": {
//!     "fixed": { "12-31": "New Year's Eve" }
//!   }
//! }
//! ```
//!
//! `fixed` (alias `cultural_days`) maps `MM-DD` to a label, either a plain string
//! or `{ "label": ..., "colour": ... }` with the colour ignored. Fixed days under
//! `ALL` apply to every region whose cultural observances are collected.
//!
//! Other keys with a snake_case string value name a rule; keys with any other
//! value are metadata and ignored.
//!
//! Loading validates structure only. Rule identifiers are kept as [`RuleRef`]s and
//! resolved against the feast registry at collection time, so one bad reference
//! surfaces as `UnknownRule` for its own region without blocking the others.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::custom::parse_month_day;
use crate::error::{EngineError, Result};
use crate::event::RegionCode;
use crate::feast::{self, FeastRule, RuleShape};

/// Rule-set key whose fixed days apply to every region.
pub const SHARED_KEY: &str = "ALL";

/// Observance keys that always name a rule, whatever the value looks like.
const OBSERVANCE_KEYS: &[&str] = &["mothers_day", "fathers_day", "yorkshire_pudding_day", "grandparents_day"];

/// Reference to a named date computation, resolved lazily.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RuleRef(String);

impl RuleRef {
    pub fn new(id: impl Into<String>) -> Self {
        RuleRef(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// # Errors
    /// `EngineError::UnknownRule` when the identifier is not registered.
    pub fn resolve(&self) -> Result<&'static FeastRule> {
        feast::lookup(&self.0).ok_or_else(|| EngineError::UnknownRule {
            rule: self.0.clone(),
            region: None,
        })
    }
}

/// A named civil observance whose date follows a region-specific rule,
/// e.g. `mothers_day` → `mothering_sunday`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observance {
    pub key: String,
    pub label: String,
    pub rule: RuleRef,
}

/// A cultural day on the same calendar date every year, e.g. `02-24` Dragobete.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FixedObservance {
    pub month: u32,
    pub day: u32,
    pub label: String,
}

impl FixedObservance {
    pub fn shape(&self) -> RuleShape {
        RuleShape::Fixed {
            month: self.month,
            day: self.day,
        }
    }
}

/// Rules for one region. Never mutated after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionRule {
    /// Named observances, sorted by key.
    pub observances: Vec<Observance>,
    /// Whether the Christian moveable feasts apply.
    pub christian: bool,
    /// Moveable cultural days keyed by rule identifier.
    pub moveable_cultural: BTreeMap<String, bool>,
    /// Fixed-date cultural days, sorted by date then label.
    pub fixed: Vec<FixedObservance>,
}

impl RegionRule {
    pub fn observance(&self, key: &str) -> Option<&Observance> {
        self.observances.iter().find(|o| o.key == key)
    }

    pub fn mothers_day(&self) -> Option<&RuleRef> {
        self.observance("mothers_day").map(|o| &o.rule)
    }

    pub fn fathers_day(&self) -> Option<&RuleRef> {
        self.observance("fathers_day").map(|o| &o.rule)
    }

    /// Moveable cultural days switched on for this region.
    pub fn enabled_cultural(&self) -> impl Iterator<Item = RuleRef> + '_ {
        self.moveable_cultural
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(key, _)| RuleRef::new(key.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct RegionRuleDoc {
    #[serde(default)]
    christian: bool,
    #[serde(default)]
    moveable_cultural: BTreeMap<String, bool>,
    #[serde(default)]
    mothers_day: Option<String>,
    #[serde(default)]
    fathers_day: Option<String>,
    #[serde(default, alias = "cultural_days")]
    fixed: BTreeMap<String, FixedDayDoc>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixedDayDoc {
    Label(String),
    Entry { label: String },
}

impl FixedDayDoc {
    fn into_label(self) -> String {
        match self {
            FixedDayDoc::Label(label) | FixedDayDoc::Entry { label } => label,
        }
    }
}

/// Immutable mapping from region code to [`RegionRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    regions: BTreeMap<RegionCode, RegionRule>,
    shared: Vec<FixedObservance>,
}

impl RuleSet {
    pub fn new(regions: BTreeMap<RegionCode, RegionRule>) -> Self {
        RuleSet {
            regions,
            shared: Vec::new(),
        }
    }

    /// Add fixed days that apply to every region.
    pub fn with_shared(mut self, mut shared: Vec<FixedObservance>) -> Self {
        shared.sort();
        self.shared = shared;
        self
    }

    /// Read and validate a rule source file.
    ///
    /// # Errors
    /// `EngineError::MalformedRuleSet` if the file cannot be read or has the wrong shape.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            EngineError::MalformedRuleSet(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| EngineError::MalformedRuleSet(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(EngineError::MalformedRuleSet(
                "top level must be an object keyed by region code".to_string(),
            ));
        };

        let mut regions = BTreeMap::new();
        let mut shared = Vec::new();
        for (key, body) in entries {
            if key.eq_ignore_ascii_case(SHARED_KEY) {
                let doc: RegionRuleDoc = serde_json::from_value(body)
                    .map_err(|e| EngineError::MalformedRuleSet(format!("{SHARED_KEY}: {e}")))?;
                shared = fixed_days(SHARED_KEY, doc.fixed)?;
                continue;
            }
            let code = RegionCode::parse(&key)
                .map_err(|_| EngineError::MalformedRuleSet(format!("invalid region code `{key}`")))?;
            let doc: RegionRuleDoc = serde_json::from_value(body)
                .map_err(|e| EngineError::MalformedRuleSet(format!("region {code}: {e}")))?;
            regions.insert(code.clone(), region_rule(&code, doc)?);
        }

        debug!(regions = regions.len(), shared = shared.len(), "loaded rule set");
        Ok(RuleSet { regions, shared })
    }

    /// Absent regions are not an error; they contribute no rule-derived events.
    pub fn get(&self, code: &RegionCode) -> Option<&RegionRule> {
        self.regions.get(code)
    }

    /// Fixed days declared under `ALL`.
    pub fn shared(&self) -> &[FixedObservance] {
        &self.shared
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionCode> {
        self.regions.keys()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn region_rule(code: &RegionCode, doc: RegionRuleDoc) -> Result<RegionRule> {
    let mut observances = Vec::new();
    let named = [("mothers_day", doc.mothers_day), ("fathers_day", doc.fathers_day)];
    for (key, rule) in named {
        if let Some(rule) = rule {
            observances.push(observance(key, rule));
        }
    }

    for (key, value) in doc.extra {
        match value {
            Value::String(rule) if OBSERVANCE_KEYS.contains(&key.as_str()) || is_rule_id(&rule) => {
                observances.push(observance(&key, rule));
            }
            other => debug!(region = %code, key = %key, value = %other, "ignoring unrecognized rule key"),
        }
    }
    observances.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(RegionRule {
        observances,
        christian: doc.christian,
        moveable_cultural: doc.moveable_cultural,
        fixed: fixed_days(code.as_str(), doc.fixed)?,
    })
}

/// `mothering_sunday`, `third_sunday_june`: lowercase ASCII, digits and underscores.
fn is_rule_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

fn fixed_days(owner: &str, doc: BTreeMap<String, FixedDayDoc>) -> Result<Vec<FixedObservance>> {
    let mut days = doc
        .into_iter()
        .map(|(key, entry)| {
            let (month, day) = parse_month_day(&key).ok_or_else(|| {
                EngineError::MalformedRuleSet(format!("{owner}: `{key}` is not a valid MM-DD date"))
            })?;
            Ok(FixedObservance {
                month,
                day,
                label: entry.into_label(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    days.sort();
    Ok(days)
}

fn observance(key: &str, rule: String) -> Observance {
    Observance {
        key: key.to_string(),
        label: observance_label(key),
        rule: RuleRef::new(rule),
    }
}

/// Display label for an observance key: `mothers_day` → `Mother's Day`,
/// otherwise the key title-cased.
pub fn observance_label(key: &str) -> String {
    match key {
        "mothers_day" => "Mother's Day".to_string(),
        "fathers_day" => "Father's Day".to_string(),
        "grandparents_day" => "Grandparents' Day".to_string(),
        _ => key
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" "),
    }
}
