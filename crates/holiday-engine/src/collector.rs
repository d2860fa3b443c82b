//! Event collection: turns an [`EngineConfig`] into raw (date, label, region,
//! category) tuples for one year.
//!
//! Collection is exhaustive and isolates failures. A provider outage, an unknown
//! rule reference or a broken custom events file is recorded as an [`Issue`] for
//! its own (region, category) and logged; every other source still contributes.

use std::collections::BTreeSet;

use chrono::Datelike;
use tracing::{debug, warn};

use crate::custom::CustomEvents;
use crate::error::EngineError;
use crate::event::{Category, RawEvent, RegionCode};
use crate::feast::{self, FeastCalendar};
use crate::provider::{HolidayKind, HolidayProvider};
use crate::rules::{FixedObservance, RuleSet};
use crate::settings::EngineConfig;
use crate::tables;

/// A failure confined to one region and/or category.
#[derive(Debug)]
pub struct Issue {
    pub region: Option<RegionCode>,
    pub category: Option<Category>,
    pub error: EngineError,
}

impl Issue {
    pub fn new(region: Option<RegionCode>, category: Option<Category>, error: EngineError) -> Self {
        Issue {
            region,
            category,
            error,
        }
    }
}

/// Output of [`Collector::collect`].
#[derive(Debug, Default)]
pub struct Collection {
    pub events: Vec<RawEvent>,
    pub issues: Vec<Issue>,
}

impl Collection {
    fn push(&mut self, event: RawEvent) {
        self.events.push(event);
    }

    fn record(&mut self, region: Option<&RegionCode>, category: Category, error: EngineError) {
        match region {
            Some(code) => warn!(region = %code, category = %category, error = %error, "source contributed no events"),
            None => warn!(category = %category, error = %error, "source contributed no events"),
        }
        self.issues.push(Issue::new(region.cloned(), Some(category), error));
    }
}

/// Draws raw events from the built-in tables, the rule set, the holiday provider
/// and custom event files.
pub struct Collector<'a, P: ?Sized> {
    rules: &'a RuleSet,
    provider: &'a P,
}

impl<'a, P: HolidayProvider + ?Sized> Collector<'a, P> {
    pub fn new(rules: &'a RuleSet, provider: &'a P) -> Self {
        Collector { rules, provider }
    }

    /// Collect every enabled (category, region) source for `config.year`.
    ///
    /// `feasts` must be the feast calendar for `config.year`.
    pub fn collect(&self, config: &EngineConfig, feasts: &FeastCalendar) -> Collection {
        let mut out = Collection::default();
        if feasts.year() != config.year {
            out.issues.push(Issue::new(None, None, EngineError::InvalidYear(feasts.year())));
            return out;
        }

        let year = config.year;
        let include = &config.include;

        let international = [
            (include.international.official, tables::OFFICIAL_DAYS),
            (include.international.semi_official, tables::SEMI_OFFICIAL_DAYS),
            (include.international.fun, tables::FUN_DAYS),
        ];
        for (enabled, table) in international {
            if enabled {
                self.collect_table(&mut out, year, table, Category::International);
            }
        }

        if include.retro {
            self.collect_table(&mut out, year, tables::RETRO_DAYS, Category::Retro);
        }

        if include.religious {
            for region in config.enabled_regions() {
                self.collect_provided(&mut out, year, &region, HolidayKind::Religious, Category::Religious);
                self.collect_christian(&mut out, feasts, &region);
            }
        }

        if include.national {
            let local = &config.local_region;
            self.collect_provided(&mut out, year, local, HolidayKind::Public, Category::National);
            self.collect_cultural(&mut out, feasts, local, Category::National);
        }

        for region in config.listed_regions() {
            self.collect_provided(&mut out, year, &region, HolidayKind::Public, Category::CountryHoliday);
            self.collect_cultural(&mut out, feasts, &region, Category::CountryHoliday);
        }

        if include.custom_events {
            for path in &config.custom_event_files {
                let occurrences = CustomEvents::load(path).and_then(|events| events.occurrences(year));
                match occurrences {
                    Ok(list) => {
                        debug!(path = %path.display(), events = list.len(), "collected custom events");
                        for (date, label) in list {
                            out.push(RawEvent::new(date, label, None, Category::Custom));
                        }
                    }
                    Err(e) => out.record(None, Category::Custom, e),
                }
            }
        }

        debug!(year, events = out.events.len(), issues = out.issues.len(), "collection finished");
        out
    }

    fn collect_table(
        &self,
        out: &mut Collection,
        year: i32,
        table: &'static [tables::FixedDay],
        category: Category,
    ) {
        for (date, label) in tables::instantiate(year, table) {
            out.push(RawEvent::new(date, label, None, category));
        }
    }

    fn collect_provided(
        &self,
        out: &mut Collection,
        year: i32,
        region: &RegionCode,
        kind: HolidayKind,
        category: Category,
    ) {
        let holidays = match self.provider.holidays(region, year, kind) {
            Ok(list) => list,
            Err(e) => {
                let error = EngineError::ProviderUnavailable {
                    region: region.to_string(),
                    reason: e.to_string(),
                };
                out.record(Some(region), category, error);
                return;
            }
        };

        // The provider promises unique, in-year entries; enforce it anyway.
        let mut seen = BTreeSet::new();
        for holiday in holidays {
            if holiday.date.year() != year {
                warn!(region = %region, date = %holiday.date, name = %holiday.name, "provider returned a date outside the target year");
                continue;
            }
            if seen.insert((holiday.date, holiday.name.clone())) {
                out.push(RawEvent::new(holiday.date, holiday.name, Some(region.clone()), category));
            }
        }
        debug!(region = %region, kind = %kind, events = seen.len(), "collected provider holidays");
    }

    fn collect_christian(&self, out: &mut Collection, feasts: &FeastCalendar, region: &RegionCode) {
        let Some(rule) = self.rules.get(region) else {
            return;
        };
        if !rule.christian {
            return;
        }
        for key in feast::CHRISTIAN_FEASTS {
            self.push_rule(out, feasts, region, key, None, Category::Religious);
        }
    }

    fn collect_cultural(
        &self,
        out: &mut Collection,
        feasts: &FeastCalendar,
        region: &RegionCode,
        category: Category,
    ) {
        self.push_fixed(out, feasts, region, self.rules.shared(), category);
        let Some(rule) = self.rules.get(region) else {
            debug!(region = %region, "no rule set entry; no rule-derived events");
            return;
        };
        for observance in &rule.observances {
            self.push_rule(out, feasts, region, observance.rule.id(), Some(&observance.label), category);
        }
        for rule_ref in rule.enabled_cultural() {
            self.push_rule(out, feasts, region, rule_ref.id(), None, category);
        }
        self.push_fixed(out, feasts, region, &rule.fixed, category);
    }

    fn push_fixed(
        &self,
        out: &mut Collection,
        feasts: &FeastCalendar,
        region: &RegionCode,
        days: &[FixedObservance],
        category: Category,
    ) {
        for day in days {
            match feasts.try_date_of_shape(day.shape()) {
                Some(date) => out.push(RawEvent::new(date, day.label.clone(), Some(region.clone()), category)),
                None => debug!(region = %region, label = %day.label, "fixed day does not occur this year"),
            }
        }
    }

    /// Resolve one rule for `region`; `label` defaults to the registry label.
    fn push_rule(
        &self,
        out: &mut Collection,
        feasts: &FeastCalendar,
        region: &RegionCode,
        rule_id: &str,
        label: Option<&str>,
        category: Category,
    ) {
        let resolved = feast::lookup(rule_id)
            .ok_or_else(|| EngineError::UnknownRule {
                rule: rule_id.to_string(),
                region: None,
            })
            .and_then(|rule| feasts.date_of(rule).map(|date| (rule, date)));

        match resolved {
            Ok((rule, date)) => {
                let label = label.unwrap_or(rule.label);
                out.push(RawEvent::new(date, label, Some(region.clone()), category));
            }
            Err(e) => out.record(Some(region), category, e.in_region(region.as_str())),
        }
    }
}
