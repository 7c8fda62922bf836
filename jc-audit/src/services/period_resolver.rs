//! Week and year extraction
//!
//! Both values are found through tier cascades over the normalized file name
//! tokens. The year cascade ends with a look at the directory names, where
//! journals are often filed by year.
//!
//! Week tiers:
//! 1. token 4 is a number in 1..=53
//! 2. last two-character numeric token in 1..=53
//! 3. last one-character numeric token
//! 4. digits embedded in alphanumeric tokens
//!
//! Year tiers:
//! 1. token 3 is a positive four-character number
//! 2. last positive four-character numeric token
//! 3. first of at least two two-character numeric tokens, century guessed
//! 4. four-digit runs in the directory names

use super::normalizer::NormalizedName;
use super::ResolverContext;
use jc_common::period::MAX_WEEK;
use std::path::{Component, Path};
use tracing::debug;

pub const MSG_WEEK_MISPLACED: &str = "week at unexpected position in file name";
pub const MSG_WEEK_ONE_DIGIT: &str = "week must always be two digits";
pub const MSG_WEEK_MIXED: &str = "week is mixed with non-numeric characters";
pub const MSG_YEAR_MISPLACED: &str = "year at unexpected position in file name";
pub const MSG_YEAR_IN_PATH: &str = "year found in file path but not in file name";
pub const MSG_PERIOD_UNRESOLVED: &str = "week and/or year could not be determined";

/// Value found by a tier plus the warnings it implies
type TierHit<T> = Option<(T, Vec<String>)>;

struct YearInput<'a> {
    name: &'a NormalizedName,
    path: &'a Path,
    week: Option<u32>,
    context: &'a ResolverContext,
}

const WEEK_TIERS: [fn(&NormalizedName) -> TierHit<u32>; 4] = [
    week_in_slot,
    week_two_digit_token,
    week_one_digit_token,
    week_embedded,
];

const YEAR_TIERS: [fn(&YearInput<'_>) -> TierHit<i32>; 4] = [
    year_in_slot,
    year_four_digit_token,
    year_two_digit_tokens,
    year_from_directories,
];

/// Outcome of week/year extraction for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodResolution {
    pub week: Option<u32>,
    pub year: Option<i32>,
    /// Deciding week tier, 1-based
    pub week_tier: Option<usize>,
    /// Deciding year tier, 1-based
    pub year_tier: Option<usize>,
    /// Warnings from the deciding tiers, week first
    pub diagnostics: Vec<String>,
}

impl PeriodResolution {
    pub fn is_resolved(&self) -> bool {
        self.week.is_some() && self.year.is_some()
    }
}

/// Extracts the reporting period from file names and paths
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    context: ResolverContext,
}

impl PeriodResolver {
    pub fn new(context: ResolverContext) -> Self {
        Self { context }
    }

    pub fn resolve(&self, name: &NormalizedName, path: &Path) -> PeriodResolution {
        let mut resolution = PeriodResolution::default();

        if let Some((tier, (week, diagnostics))) = first_hit(WEEK_TIERS.iter().map(|t| t(name))) {
            resolution.week = Some(week);
            resolution.week_tier = Some(tier);
            resolution.diagnostics.extend(diagnostics);
        }

        let input = YearInput {
            name,
            path,
            week: resolution.week,
            context: &self.context,
        };
        if let Some((tier, (year, diagnostics))) = first_hit(YEAR_TIERS.iter().map(|t| t(&input))) {
            resolution.year = Some(year);
            resolution.year_tier = Some(tier);
            resolution.diagnostics.extend(diagnostics);
        }

        debug!(
            file = %name.scoring,
            week = ?resolution.week,
            year = ?resolution.year,
            week_tier = ?resolution.week_tier,
            year_tier = ?resolution.year_tier,
            "Period resolved"
        );
        resolution
    }
}

/// First tier with a hit, paired with its 1-based tier number
fn first_hit<T>(hits: impl Iterator<Item = TierHit<T>>) -> Option<(usize, (T, Vec<String>))> {
    hits.enumerate()
        .find_map(|(index, hit)| hit.map(|hit| (index + 1, hit)))
}

fn parse_number(token: &str) -> Option<i32> {
    token.parse::<i32>().ok()
}

fn valid_week(value: i32) -> Option<u32> {
    u32::try_from(value).ok().filter(|w| (1..=MAX_WEEK).contains(w))
}

fn char_len(token: &str) -> usize {
    token.chars().count()
}

fn week_in_slot(name: &NormalizedName) -> TierHit<u32> {
    let week = parse_number(name.week()).and_then(valid_week)?;
    Some((week, Vec::new()))
}

/// Later hits overwrite earlier ones; a second two-digit number is usually the week
fn week_two_digit_token(name: &NormalizedName) -> TierHit<u32> {
    let week = name
        .tokens
        .iter()
        .filter(|t| char_len(t) == 2)
        .filter_map(|t| parse_number(t).and_then(valid_week))
        .last()?;
    Some((week, vec![MSG_WEEK_MISPLACED.to_string()]))
}

fn week_one_digit_token(name: &NormalizedName) -> TierHit<u32> {
    let week = name
        .tokens
        .iter()
        .filter(|t| char_len(t) == 1)
        .filter_map(|t| parse_number(t).and_then(valid_week))
        .last()?;
    Some((week, vec![MSG_WEEK_ONE_DIGIT.to_string()]))
}

/// Scan tokens that are not numbers as a whole, e.g. `kw05`
///
/// A two-digit run below 53 ends the scan of its token. A lone digit is taken
/// provisionally and may be overwritten by anything found later.
fn week_embedded(name: &NormalizedName) -> TierHit<u32> {
    let mut found: Option<(u32, bool)> = None;

    for token in name.tokens.iter().filter(|t| parse_number(t).is_none()) {
        let chars: Vec<char> = token.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            let Some(digit) = c.to_digit(10) else {
                continue;
            };
            match chars.get(i + 1).and_then(|n| n.to_digit(10)) {
                Some(second) => {
                    let value = digit * 10 + second;
                    if value > 0 && value < MAX_WEEK {
                        found = Some((value, false));
                        break;
                    }
                }
                None if digit > 0 => found = Some((digit, true)),
                None => {}
            }
        }
    }

    let (week, single_digit) = found?;
    let mut diagnostics = vec![MSG_WEEK_MIXED.to_string()];
    if single_digit {
        diagnostics.push(MSG_WEEK_ONE_DIGIT.to_string());
    }
    Some((week, diagnostics))
}

fn year_in_slot(input: &YearInput<'_>) -> TierHit<i32> {
    let slot = input.name.year();
    if char_len(slot) != 4 {
        return None;
    }
    let year = parse_number(slot).filter(|y| *y > 0)?;
    Some((year, Vec::new()))
}

fn year_four_digit_token(input: &YearInput<'_>) -> TierHit<i32> {
    let year = input
        .name
        .tokens
        .iter()
        .filter(|t| char_len(t) == 4)
        .filter_map(|t| parse_number(t).filter(|y| *y > 0))
        .last()?;
    Some((year, vec![MSG_YEAR_MISPLACED.to_string()]))
}

/// Only applies when there are at least two two-digit numbers; the first is
/// taken as the year and the scan stops at the second
fn year_two_digit_tokens(input: &YearInput<'_>) -> TierHit<i32> {
    let mut numbers = input
        .name
        .tokens
        .iter()
        .filter(|t| char_len(t) == 2)
        .filter_map(|t| parse_number(t));
    let first = numbers.next()?;
    numbers.next()?;

    let year = expand_two_digit_year(first, input.context.today.year);
    let diagnostic = format!("year was only two digits, assumed {}##", year / 100);
    Some((year, vec![diagnostic]))
}

fn expand_two_digit_year(value: i32, current_year: i32) -> i32 {
    if value <= current_year - 2000 {
        value + 2000
    } else {
        value + 1900
    }
}

/// Every four-digit run in the directory names is a candidate
///
/// Two consecutive years are read as one work year: a week after the first
/// week of the work year belongs to the earlier one.
fn year_from_directories(input: &YearInput<'_>) -> TierHit<i32> {
    let candidates = directory_years(input.path);
    let year = match candidates.as_slice() {
        [] => return None,
        [only] => *only,
        [earlier, later] if later - earlier == 1 => {
            if input.week.unwrap_or(0) > input.context.first_week_of_work_year {
                *earlier
            } else {
                *later
            }
        }
        _ => candidates.iter().copied().max()?,
    };
    Some((year, vec![MSG_YEAR_IN_PATH.to_string()]))
}

fn directory_years(path: &Path) -> Vec<i32> {
    let Some(parent) = path.parent() else {
        return Vec::new();
    };

    let mut years = Vec::new();
    for component in parent.components() {
        let Component::Normal(segment) = component else {
            continue;
        };
        let chars: Vec<char> = segment.to_string_lossy().chars().collect();
        for window in chars.windows(4) {
            if !window.iter().all(char::is_ascii_digit) {
                continue;
            }
            let year = window.iter().collect::<String>().parse::<i32>().unwrap_or(0);
            if year > 0 {
                years.push(year);
            }
        }
    }
    years
}
