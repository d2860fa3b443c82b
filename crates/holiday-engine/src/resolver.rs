//! End-to-end resolution for one year: collect, canonicalize, colour, export.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audit;
use crate::canonical::{canonicalize, MergePolicy};
use crate::collector::{Collector, Issue};
use crate::colour::{self, LegendEntry};
use crate::error::{EngineError, Result};
use crate::event::CanonicalEvent;
use crate::feast::FeastCalendar;
use crate::normalize::QualifierNormalizer;
use crate::provider::{HolidayProvider, NoProvider};
use crate::rules::RuleSet;
use crate::settings::EngineConfig;

/// The resolved event set for one year plus every locally recovered failure.
#[derive(Debug)]
pub struct Resolution {
    pub year: i32,
    /// Coloured canonical events, sorted by date then label.
    pub events: Vec<CanonicalEvent>,
    pub issues: Vec<Issue>,
}

impl Resolution {
    pub fn unknown_rules(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.error.is_unknown_rule())
    }

    /// Escalate the first unknown-rule issue, for callers that treat rule
    /// misconfiguration as fatal. Events stay available on `self` either way.
    pub fn ensure_rules_resolved(&self) -> Result<()> {
        match self.unknown_rules().next().map(|issue| &issue.error) {
            Some(EngineError::UnknownRule { rule, region }) => Err(EngineError::UnknownRule {
                rule: rule.clone(),
                region: region.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        colour::legend(&self.events)
    }

    /// Write `holiday_export_<year>.csv` into `dir`.
    pub fn export_audit(&self, dir: &Path) -> Result<PathBuf> {
        audit::export(&self.events, self.year, dir)
    }
}

/// Runs resolutions against a shared, read-only rule set and provider.
///
/// A resolver holds no per-run state, so one instance can serve many years.
pub struct Resolver<'a, P: ?Sized = NoProvider> {
    rules: &'a RuleSet,
    provider: &'a P,
}

impl<'a, P: HolidayProvider + ?Sized> Resolver<'a, P> {
    pub fn new(rules: &'a RuleSet, provider: &'a P) -> Self {
        Resolver { rules, provider }
    }

    /// Resolve `config.year`.
    ///
    /// # Errors
    /// `EngineError::InvalidYear` if feast anchors cannot be computed for the year.
    /// Per-region failures never fail the call; they are listed in `issues`.
    pub fn resolve(&self, config: &EngineConfig) -> Result<Resolution> {
        let feasts = FeastCalendar::new(config.year)?;
        Ok(self.resolve_with(config, &feasts))
    }

    /// Resolve using a caller-built feast calendar for `config.year`.
    pub fn resolve_with(&self, config: &EngineConfig, feasts: &FeastCalendar) -> Resolution {
        let collection = Collector::new(self.rules, self.provider).collect(config, feasts);
        let normalizer = QualifierNormalizer::new(config.normalization.clone());
        let policy = MergePolicy::from_flag(config.merge_identical_holidays);

        let events = colour::assign(canonicalize(&collection.events, policy, &normalizer));
        info!(
            year = config.year,
            raw = collection.events.len(),
            canonical = events.len(),
            issues = collection.issues.len(),
            "resolved calendar events"
        );

        Resolution {
            year: config.year,
            events,
            issues: collection.issues,
        }
    }

    /// Resolve and write the audit export. A failed export is recorded as an
    /// `AuditWrite` issue; the resolution is still returned.
    pub fn resolve_and_export(&self, config: &EngineConfig, audit_dir: &Path) -> Result<Resolution> {
        let mut resolution = self.resolve(config)?;
        if let Err(e) = resolution.export_audit(audit_dir) {
            warn!(error = %e, "audit export failed; continuing without it");
            resolution.issues.push(Issue::new(None, None, e));
        }
        Ok(resolution)
    }
}
