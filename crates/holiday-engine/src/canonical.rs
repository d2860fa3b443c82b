//! Canonicalization: merge raw events that describe the same observance.
//!
//! Raw events are grouped by `(date, canonical key)`, where the key comes from a
//! [`LabelNormalizer`]. A group becomes one [`CanonicalEvent`] carrying the union
//! of its regions and the highest-precedence category. With merging disabled the
//! grouping key also includes the region, so each region keeps its own record.
//!
//! Every choice made while folding a group (display label, category, region
//! order) is a min over a sorted set, so the result does not depend on the order
//! of the input.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::event::{CanonicalEvent, Category, RawEvent, RegionCode};
use crate::normalize::LabelNormalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// One record per (date, key), regions unioned.
    MergeRegions,
    /// One record per (date, key, region).
    PerRegion,
}

impl MergePolicy {
    pub fn from_flag(merge_identical_holidays: bool) -> Self {
        if merge_identical_holidays {
            MergePolicy::MergeRegions
        } else {
            MergePolicy::PerRegion
        }
    }
}

type GroupKey = (NaiveDate, String, Option<RegionCode>);

#[derive(Default)]
struct Group {
    labels: BTreeSet<String>,
    regions: BTreeSet<RegionCode>,
    categories: BTreeSet<Category>,
}

/// Merge `raw` into canonical events, sorted by date then label.
pub fn canonicalize<N: LabelNormalizer + ?Sized>(
    raw: &[RawEvent],
    policy: MergePolicy,
    normalizer: &N,
) -> Vec<CanonicalEvent> {
    let mut groups: BTreeMap<GroupKey, Group> = BTreeMap::new();

    for event in raw {
        let key = normalizer.canonical_key(&event.label);
        let split = match policy {
            MergePolicy::MergeRegions => None,
            MergePolicy::PerRegion => event.region.clone(),
        };

        let group = groups.entry((event.date, key, split)).or_default();
        group.labels.insert(normalizer.display_label(&event.label));
        group.categories.insert(event.category);
        if let Some(region) = &event.region {
            group.regions.insert(region.clone());
        }
    }

    let mut events: Vec<CanonicalEvent> = groups
        .into_iter()
        .filter_map(|((date, key, _), group)| {
            let label = group.labels.into_iter().next()?;
            // Category's Ord is precedence order, so the first entry wins.
            let category = *group.categories.iter().next()?;
            Some(CanonicalEvent {
                date,
                label,
                key,
                regions: group.regions.into_iter().collect(),
                category,
                sources: group.categories.into_iter().collect(),
                colour: None,
            })
        })
        .collect();

    events.sort_by(|a, b| {
        (a.date, &a.label, &a.key, &a.regions).cmp(&(b.date, &b.label, &b.key, &b.regions))
    });
    events
}
