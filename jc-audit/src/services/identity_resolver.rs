//! Journal owner resolution
//!
//! Owners are matched against the roster through a cascade of tiers, from the
//! strict expected layout down to a last-name-only guess. The first tier that
//! produces any hit decides; later tiers are not consulted.
//!
//! | Tier | Rule                                                 | Policy        |
//! |------|------------------------------------------------------|---------------|
//! | 1    | token 1 = last name and token 2 = first name         | FirstMatch    |
//! | 2    | both names are substrings of the file name           | LastMatchWins |
//! | 3    | one name within the typo distance, other a substring | LastMatchWins |
//! | 4    | both names are substrings of the full path           | LastMatchWins |
//! | 5    | last name is a substring of the file name            | LastMatchWins |

use super::normalizer::{normalize_name, NormalizedName};
use super::MatchPolicy;
use crate::models::person::Roster;
use std::path::Path;
use tracing::debug;

pub const MSG_NAMES_MISPLACED: &str = "first and/or last name at unexpected position in file name";
pub const MSG_NAME_TYPO: &str = "first or last name has a typo";
pub const MSG_NAMES_IN_PATH: &str =
    "first and last name found in file path but not at the expected position";
pub const MSG_LAST_NAME_ONLY: &str = "owner determined by last name only";
pub const MSG_OWNER_UNRESOLVED: &str = "owner could not be identified";

/// Normalized roster names
#[derive(Debug, Clone)]
struct NameKey {
    last: String,
    first: String,
}

/// What the tiers look at for one file
struct IdentityInput<'a> {
    name: &'a NormalizedName,
    /// Folded, lower-cased full path
    path: String,
}

type TierFn = fn(&IdentityInput<'_>, &[NameKey], usize) -> Vec<usize>;

struct IdentityTier {
    policy: MatchPolicy,
    /// Warning attached to a hit; `None` for the expected layout
    diagnostic: Option<&'static str>,
    hits: TierFn,
}

const TIERS: [IdentityTier; 5] = [
    IdentityTier {
        policy: MatchPolicy::FirstMatch,
        diagnostic: None,
        hits: exact_slots,
    },
    IdentityTier {
        policy: MatchPolicy::LastMatchWins,
        diagnostic: Some(MSG_NAMES_MISPLACED),
        hits: names_in_file_name,
    },
    IdentityTier {
        policy: MatchPolicy::LastMatchWins,
        diagnostic: Some(MSG_NAME_TYPO),
        hits: name_with_typo,
    },
    IdentityTier {
        policy: MatchPolicy::LastMatchWins,
        diagnostic: Some(MSG_NAMES_IN_PATH),
        hits: names_in_path,
    },
    IdentityTier {
        policy: MatchPolicy::LastMatchWins,
        diagnostic: Some(MSG_LAST_NAME_ONLY),
        hits: last_name_only,
    },
];

/// Successful owner resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityMatch {
    /// Roster index of the owner
    pub owner: usize,
    /// Deciding tier, 1-based
    pub tier: usize,
    /// Warning to attach to the record, if any
    pub diagnostic: Option<&'static str>,
}

/// Resolves journal owners against a fixed roster
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    keys: Vec<NameKey>,
    max_distance: usize,
}

impl IdentityResolver {
    pub fn new(roster: &Roster, max_distance: usize) -> Self {
        let keys = roster
            .iter()
            .map(|person| NameKey {
                last: normalize_name(person.last_name()),
                first: normalize_name(person.first_name()),
            })
            .collect();
        Self { keys, max_distance }
    }

    /// Resolve the owner of `path`, whose file name normalizes to `name`
    ///
    /// Returns `None` if no tier finds a roster entry.
    pub fn resolve(&self, name: &NormalizedName, path: &Path) -> Option<IdentityMatch> {
        let input = IdentityInput {
            name,
            path: normalize_name(&path.to_string_lossy()),
        };

        for (index, tier) in TIERS.iter().enumerate() {
            let hits = (tier.hits)(&input, &self.keys, self.max_distance);
            if let Some(owner) = tier.policy.select(hits) {
                debug!(tier = index + 1, owner, file = %name.scoring, "Owner resolved");
                return Some(IdentityMatch {
                    owner,
                    tier: index + 1,
                    diagnostic: tier.diagnostic,
                });
            }
        }

        debug!(file = %name.scoring, "Owner not resolved");
        None
    }
}

fn exact_slots(input: &IdentityInput<'_>, keys: &[NameKey], _max_distance: usize) -> Vec<usize> {
    matching(keys, |key| {
        input.name.last_name() == key.last && input.name.first_name() == key.first
    })
}

fn names_in_file_name(
    input: &IdentityInput<'_>,
    keys: &[NameKey],
    _max_distance: usize,
) -> Vec<usize> {
    let scoring = &input.name.scoring;
    matching(keys, |key| scoring.contains(&key.last) && scoring.contains(&key.first))
}

/// Tokens are the outer loop, roster entries the inner one
fn name_with_typo(input: &IdentityInput<'_>, keys: &[NameKey], max_distance: usize) -> Vec<usize> {
    let scoring = &input.name.scoring;
    let mut hits = Vec::new();
    for token in &input.name.tokens {
        for (index, key) in keys.iter().enumerate() {
            let last_typo = strsim::levenshtein(token, &key.last) <= max_distance
                && scoring.contains(&key.first);
            let first_typo = strsim::levenshtein(token, &key.first) <= max_distance
                && scoring.contains(&key.last);
            if last_typo || first_typo {
                hits.push(index);
            }
        }
    }
    hits
}

fn names_in_path(input: &IdentityInput<'_>, keys: &[NameKey], _max_distance: usize) -> Vec<usize> {
    matching(keys, |key| input.path.contains(&key.last) && input.path.contains(&key.first))
}

fn last_name_only(input: &IdentityInput<'_>, keys: &[NameKey], _max_distance: usize) -> Vec<usize> {
    matching(keys, |key| input.name.scoring.contains(&key.last))
}

fn matching(keys: &[NameKey], predicate: impl Fn(&NameKey) -> bool) -> Vec<usize> {
    keys.iter()
        .enumerate()
        .filter(|(_, key)| predicate(key))
        .map(|(index, _)| index)
        .collect()
}
