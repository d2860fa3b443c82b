//! Moveable feast and weekday-rule date arithmetic.
//!
//! Every tracked observance is registered under a symbolic rule identifier and
//! resolves through one of three shapes: a day offset from a computed anchor
//! (Western Easter, Orthodox Easter, first Sunday of Advent), an nth/last weekday
//! of a month, or a fixed calendar date. All computations are pure functions of
//! `(year, rule)`.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{EngineError, Result};

/// Computed date a [`RuleShape::Relative`] rule is offset from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    WesternEaster,
    OrthodoxEaster,
    FirstAdvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleShape {
    Relative { anchor: Anchor, days: i64 },
    NthWeekday { month: u32, weekday: Weekday, n: u8 },
    LastWeekday { month: u32, weekday: Weekday },
    Fixed { month: u32, day: u32 },
}

/// A registered date computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeastRule {
    pub key: &'static str,
    pub label: &'static str,
    pub shape: RuleShape,
}

const fn relative(key: &'static str, label: &'static str, anchor: Anchor, days: i64) -> FeastRule {
    FeastRule {
        key,
        label,
        shape: RuleShape::Relative { anchor, days },
    }
}

const fn nth(key: &'static str, label: &'static str, month: u32, weekday: Weekday, n: u8) -> FeastRule {
    FeastRule {
        key,
        label,
        shape: RuleShape::NthWeekday { month, weekday, n },
    }
}

const fn last(key: &'static str, label: &'static str, month: u32, weekday: Weekday) -> FeastRule {
    FeastRule {
        key,
        label,
        shape: RuleShape::LastWeekday { month, weekday },
    }
}

const fn fixed(key: &'static str, label: &'static str, month: u32, day: u32) -> FeastRule {
    FeastRule {
        key,
        label,
        shape: RuleShape::Fixed { month, day },
    }
}

use Anchor::{FirstAdvent, OrthodoxEaster, WesternEaster};

static REGISTRY: &[FeastRule] = &[
    // Western Easter cycle
    relative("shrove_tuesday", "Shrove Tuesday", WesternEaster, -47),
    relative("ash_wednesday", "Ash Wednesday", WesternEaster, -46),
    relative("mothering_sunday", "Mothering Sunday", WesternEaster, -21),
    relative("palm_sunday", "Palm Sunday", WesternEaster, -7),
    relative("good_friday", "Good Friday", WesternEaster, -2),
    relative("holy_saturday", "Holy Saturday", WesternEaster, -1),
    relative("easter_sunday", "Easter Sunday", WesternEaster, 0),
    relative("easter_monday", "Easter Monday", WesternEaster, 1),
    relative("ascension_day", "Ascension Day", WesternEaster, 39),
    relative("pentecost_sunday", "Pentecost Sunday", WesternEaster, 49),
    relative("whit_monday", "Whit Monday", WesternEaster, 50),
    relative("corpus_christi", "Corpus Christi", WesternEaster, 60),
    // Orthodox Easter cycle
    relative("florii", "Florii (Flowers Day)", OrthodoxEaster, -7),
    relative("orthodox_good_friday", "Orthodox Good Friday", OrthodoxEaster, -2),
    relative("orthodox_easter", "Orthodox Easter", OrthodoxEaster, 0),
    // Advent cycle
    relative("volkstrauertag", "Volkstrauertag", FirstAdvent, -14),
    relative("advent_1", "Advent 1", FirstAdvent, 0),
    relative("advent_2", "Advent 2", FirstAdvent, 7),
    relative("advent_3", "Advent 3", FirstAdvent, 14),
    relative("advent_4", "Advent 4", FirstAdvent, 21),
    // Weekday-of-month rules
    nth("third_monday_january", "Blue Monday", 1, Weekday::Mon, 3),
    nth("first_sunday_february", "First Sunday of February", 2, Weekday::Sun, 1),
    nth("second_sunday_may", "Second Sunday of May", 5, Weekday::Sun, 2),
    last("last_sunday_may", "Last Sunday of May", 5, Weekday::Sun),
    last("last_monday_may", "Last Monday of May", 5, Weekday::Mon),
    nth("third_sunday_june", "Third Sunday of June", 6, Weekday::Sun, 3),
    nth("first_sunday_september", "First Sunday of September", 9, Weekday::Sun, 1),
    nth("remembrance_sunday", "Remembrance Sunday", 11, Weekday::Sun, 2),
    nth("fourth_thursday_november", "Thanksgiving", 11, Weekday::Thu, 4),
    // Fixed dates
    fixed("new_years_day", "New Year's Day", 1, 1),
    fixed("christmas_eve", "Christmas Eve", 12, 24),
    fixed("christmas_day", "Christmas Day", 12, 25),
    fixed("new_years_eve", "New Year's Eve", 12, 31),
];

/// Rules enabled by a region's `christian: true` flag.
pub const CHRISTIAN_FEASTS: &[&str] = &[
    "ash_wednesday",
    "palm_sunday",
    "good_friday",
    "easter_sunday",
    "ascension_day",
    "pentecost_sunday",
    "advent_1",
    "advent_2",
    "advent_3",
    "advent_4",
];

/// Look up a registered rule by identifier.
pub fn lookup(key: &str) -> Option<&'static FeastRule> {
    REGISTRY.iter().find(|rule| rule.key == key)
}

/// All registered rules, in registry order.
pub fn registry() -> &'static [FeastRule] {
    REGISTRY
}

/// Western (Gregorian) Easter Sunday, Meeus/Jones/Butcher algorithm.
pub fn western_easter(year: i32) -> Result<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or(EngineError::InvalidYear(year))
}

/// Orthodox Easter Sunday expressed as a Gregorian date.
///
/// Computes the Julian-calendar date (Meeus Julian algorithm) and shifts it by
/// the Julian/Gregorian drift for that century.
pub fn orthodox_easter(year: i32) -> Result<NaiveDate> {
    let a = year.rem_euclid(4);
    let b = year.rem_euclid(7);
    let c = year.rem_euclid(19);
    let d = (19 * c + 15) % 30;
    let e = (2 * a + 4 * b - d + 34).rem_euclid(7);
    let month = (d + e + 114) / 31;
    let day = (d + e + 114) % 31 + 1;

    // Drift is constant from March of a century year onwards; Easter is always
    // in March-May so no February boundary applies.
    let drift = year.div_euclid(100) - year.div_euclid(400) - 2;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .and_then(|julian| julian.checked_add_signed(Duration::days(drift as i64)))
        .ok_or(EngineError::InvalidYear(year))
}

/// First Sunday of Advent: the fourth Sunday before Christmas Day.
pub fn first_advent(year: i32) -> Result<NaiveDate> {
    let christmas = NaiveDate::from_ymd_opt(year, 12, 25).ok_or(EngineError::InvalidYear(year))?;
    let back = christmas.weekday().num_days_from_monday() as i64 + 22;
    christmas
        .checked_sub_signed(Duration::days(back))
        .ok_or(EngineError::InvalidYear(year))
}

/// The `n`th (1-based) `weekday` of `month`, or `None` if the month has fewer.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// The last `weekday` of `month`.
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    let last_day = next_month.pred_opt()?;
    let back = (7 + last_day.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    last_day.checked_sub_signed(Duration::days(back as i64))
}

/// Resolve a rule identifier for a single year.
///
/// Convenience wrapper around [`FeastCalendar`]; callers resolving many rules for
/// the same year should build the calendar once.
pub fn compute_moveable_feast(year: i32, key: &str) -> Result<NaiveDate> {
    FeastCalendar::new(year)?.resolve(key)
}

/// Per-year memo of the anchor dates. Immutable once built, so one instance can be
/// shared by every region and category collected for that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeastCalendar {
    year: i32,
    western_easter: NaiveDate,
    orthodox_easter: NaiveDate,
    first_advent: NaiveDate,
}

impl FeastCalendar {
    pub fn new(year: i32) -> Result<Self> {
        Ok(FeastCalendar {
            year,
            western_easter: western_easter(year)?,
            orthodox_easter: orthodox_easter(year)?,
            first_advent: first_advent(year)?,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn anchor(&self, anchor: Anchor) -> NaiveDate {
        match anchor {
            Anchor::WesternEaster => self.western_easter,
            Anchor::OrthodoxEaster => self.orthodox_easter,
            Anchor::FirstAdvent => self.first_advent,
        }
    }

    /// Resolve a registered rule identifier to its date in this year.
    ///
    /// # Errors
    /// Returns `EngineError::UnknownRule` (without a region) if `key` is not registered.
    pub fn resolve(&self, key: &str) -> Result<NaiveDate> {
        let rule = lookup(key).ok_or_else(|| EngineError::UnknownRule {
            rule: key.to_string(),
            region: None,
        })?;
        self.date_of(rule)
    }

    /// Compute the date of an already looked-up rule.
    pub fn date_of(&self, rule: &FeastRule) -> Result<NaiveDate> {
        self.date_of_shape(rule.shape)
    }

    /// `None` when the shape names no date this year, e.g. `02-29` in a common year.
    pub fn try_date_of_shape(&self, shape: RuleShape) -> Option<NaiveDate> {
        match shape {
            RuleShape::Relative { anchor, days } => self
                .anchor(anchor)
                .checked_add_signed(Duration::days(days)),
            RuleShape::NthWeekday { month, weekday, n } => nth_weekday(self.year, month, weekday, n),
            RuleShape::LastWeekday { month, weekday } => last_weekday(self.year, month, weekday),
            RuleShape::Fixed { month, day } => NaiveDate::from_ymd_opt(self.year, month, day),
        }
    }

    pub fn date_of_shape(&self, shape: RuleShape) -> Result<NaiveDate> {
        self.try_date_of_shape(shape).ok_or(EngineError::InvalidYear(self.year))
    }
}
