//! Deterministic colour coding for canonical events and the legend.
//!
//! Colour depends only on the category and, for country holidays, on the
//! lexicographically first contributing region. Known regions use the calendar's
//! fixed palette; any other region gets a stable pick from a rotation palette.
//!
//! Category colours, the fixed palette and the rotation never share a colour.
//! Two unknown regions may share a rotation colour, so legend lines for country
//! holidays carry the region as well.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::event::{CanonicalEvent, Category, RegionCode};

/// An SVG colour name or hex code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Colour(&'static str);

impl Colour {
    /// Used whenever no better colour can be determined.
    pub const FALLBACK: Colour = Colour("grey");

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

static REGION_COLOURS: &[(&str, &str)] = &[
    ("AU", "#AD9200"),
    ("AU-ACT", "#D28800"),
    ("AU-NSW", "darkblue"),
    ("AU-NT", "deepskyblue"),
    ("AU-QLD", "darkturquoise"),
    ("AU-SA", "saddlebrown"),
    ("AU-TAS", "orchid"),
    ("AU-VIC", "crimson"),
    ("AU-WA", "darkgreen"),
    ("GB", "maroon"),
    ("GB-NIR", "green"),
    ("GB-SCT", "navy"),
    ("GB-WLS", "tomato"),
];

static ROTATION: &[&str] = &[
    "darkorange",
    "seagreen",
    "steelblue",
    "firebrick",
    "darkcyan",
    "olive",
    "indigo",
    "chocolate",
    "slategray",
    "mediumvioletred",
];

/// Colour for a whole category; `None` for categories coloured per region.
pub fn category_colour(category: Category) -> Option<Colour> {
    match category {
        Category::National => Some(Colour("red")),
        Category::Religious => Some(Colour("purple")),
        Category::Retro => Some(Colour("teal")),
        Category::International => Some(Colour("blue")),
        Category::Custom => Some(Colour("goldenrod")),
        Category::CountryHoliday => None,
    }
}

/// Regions with a fixed palette colour.
pub fn known_regions() -> impl Iterator<Item = &'static str> {
    REGION_COLOURS.iter().map(|(code, _)| *code)
}

pub fn region_colour(region: &RegionCode) -> Colour {
    if let Some((_, colour)) = REGION_COLOURS.iter().find(|(code, _)| *code == region.as_str()) {
        return Colour(*colour);
    }
    // FNV-1a: stable across runs and platforms.
    let hash = region
        .as_str()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
        });
    let index = (hash % ROTATION.len() as u64) as usize;
    ROTATION.get(index).map(|c| Colour(*c)).unwrap_or(Colour::FALLBACK)
}

/// Colour for one event. Never fails.
pub fn colour_for(event: &CanonicalEvent) -> Colour {
    category_colour(event.category)
        .or_else(|| event.regions.first().map(region_colour))
        .unwrap_or(Colour::FALLBACK)
}

/// Annotate each event with its colour.
pub fn assign(events: Vec<CanonicalEvent>) -> Vec<CanonicalEvent> {
    events
        .into_iter()
        .map(|mut event| {
            event.colour = Some(colour_for(&event));
            event
        })
        .collect()
}

/// One legend line: what a colour means.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LegendEntry {
    pub category: Category,
    /// Only set for country holidays, which are coloured per region.
    pub region: Option<RegionCode>,
    pub colour: Colour,
}

/// Distinct (category, region, colour) entries used by `events`, in category
/// precedence order then region.
pub fn legend(events: &[CanonicalEvent]) -> Vec<LegendEntry> {
    let entries: BTreeSet<LegendEntry> = events
        .iter()
        .map(|event| LegendEntry {
            category: event.category,
            region: match event.category {
                Category::CountryHoliday => event.regions.first().cloned(),
                _ => None,
            },
            colour: event.colour.unwrap_or_else(|| colour_for(event)),
        })
        .collect();
    entries.into_iter().collect()
}
