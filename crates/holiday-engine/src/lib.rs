//! # holiday-engine
//!
//! Holiday and event rule resolution for print calendars.
//!
//! Given a target year and a configuration naming the enabled event categories
//! and countries/regions, the engine produces a canonical, de-duplicated,
//! colour-coded set of dated events, plus a CSV audit export showing how each
//! record was derived. Rendering is left to downstream tools.
//!
//! ## Modules
//!
//! - [`feast`]: Easter, Orthodox Easter, Advent and weekday-of-month rules
//! - [`rules`]: Per-region rule sets loaded from JSON
//! - [`provider`]: Seam to the external public/religious holiday source
//! - [`collector`]: Raw event collection with per-region failure isolation
//! - [`normalize`]: Pluggable label normalization for merge keys
//! - [`canonical`]: Cross-region merge and category precedence
//! - [`colour`]: Deterministic colour assignment and legend
//! - [`audit`]: `holiday_export_<YEAR>.csv`
//! - [`resolver`]: The full pipeline for one year
//! - [`settings`]: Settings document and validated engine config
//! - [`error`]: Error types

pub mod audit;
pub mod canonical;
pub mod collector;
pub mod colour;
pub mod custom;
pub mod error;
pub mod event;
pub mod feast;
pub mod normalize;
pub mod provider;
pub mod resolver;
pub mod rules;
pub mod settings;
pub mod tables;

pub use canonical::{canonicalize, MergePolicy};
pub use collector::{Collection, Collector, Issue};
pub use colour::{assign, legend, Colour, LegendEntry};
pub use error::EngineError;
pub use event::{CanonicalEvent, Category, RawEvent, RegionCode};
pub use feast::{compute_moveable_feast, last_weekday, nth_weekday, FeastCalendar};
pub use normalize::{LabelNormalizer, NormalizationConfig, QualifierNormalizer};
pub use provider::{HolidayKind, HolidayProvider, JsonDirProvider, NoProvider, StaticProvider};
pub use resolver::{Resolution, Resolver};
pub use rules::{RegionRule, RuleSet};
pub use settings::{EngineConfig, IncludeDays, Settings};
