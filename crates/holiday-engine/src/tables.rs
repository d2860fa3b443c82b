//! Built-in month/day tables for international and retro-computing days.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDay {
    pub month: u32,
    pub day: u32,
    pub label: &'static str,
}

const fn day(month: u32, day: u32, label: &'static str) -> FixedDay {
    FixedDay { month, day, label }
}

/// UN / WHO / UNESCO observances.
pub static OFFICIAL_DAYS: &[FixedDay] = &[
    day(1, 27, "International Holocaust Remembrance Day"),
    day(2, 11, "International Day of Women and Girls in Science"),
    day(3, 8, "International Women's Day"),
    day(3, 21, "International Day for the Elimination of Racial Discrimination"),
    day(3, 22, "World Water Day"),
    day(4, 7, "World Health Day"),
    day(4, 22, "International Mother Earth Day"),
    day(4, 23, "World Book and Copyright Day"),
    day(5, 3, "World Press Freedom Day"),
    day(6, 5, "World Environment Day"),
    day(6, 20, "World Refugee Day"),
    day(9, 21, "International Day of Peace"),
    day(10, 24, "United Nations Day"),
    day(12, 1, "World AIDS Day"),
    day(12, 10, "Human Rights Day"),
];

/// Widely observed but unofficial days.
pub static SEMI_OFFICIAL_DAYS: &[FixedDay] = &[
    day(1, 25, "Burns Night"),
    day(2, 4, "World Cancer Day"),
    day(2, 14, "Valentine's Day"),
    day(3, 17, "St Patrick's Day"),
    day(4, 1, "April Fools' Day"),
    day(10, 31, "Halloween"),
    day(11, 5, "Bonfire Night"),
];

/// Novelty and pop-culture days.
pub static FUN_DAYS: &[FixedDay] = &[
    day(2, 29, "Leap Day"),
    day(3, 14, "Pi Day"),
    day(5, 4, "Star Wars Day"),
    day(5, 25, "Towel Day"),
    day(7, 17, "World Emoji Day"),
    day(9, 19, "International Talk Like a Pirate Day"),
    day(11, 13, "World Kindness Day"),
];

/// Anniversaries from home-computing history.
pub static RETRO_DAYS: &[FixedDay] = &[
    day(1, 7, "Commodore 64 unveiled (1982)"),
    day(1, 24, "Apple Macintosh launched (1984)"),
    day(4, 23, "ZX Spectrum launched (1982)"),
    day(5, 22, "Pac-Man released (1980)"),
    day(6, 10, "Apple II goes on sale (1977)"),
    day(7, 30, "Sir Clive Sinclair born (1940)"),
    day(8, 11, "Steve Wozniak born (1950)"),
    day(8, 12, "IBM PC launched (1981)"),
    day(8, 25, "Linux announced (1991)"),
    day(9, 9, "Sega Dreamcast launched in North America (1999)"),
    day(11, 20, "Windows 1.0 released (1985)"),
    day(12, 9, "The Mother of All Demos (1968)"),
];

/// Place a table in `year`, skipping days that do not exist (29 February in
/// common years).
pub fn instantiate(year: i32, table: &'static [FixedDay]) -> impl Iterator<Item = (NaiveDate, &'static str)> {
    table.iter().filter_map(move |entry| {
        NaiveDate::from_ymd_opt(year, entry.month, entry.day).map(|date| (date, entry.label))
    })
}
