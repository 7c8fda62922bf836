//! Audit services
//!
//! Resolution is split into small, pure steps that `RecordBuilder` chains for
//! each journal file. Everything a resolver needs from the outside world is
//! passed in through `ResolverContext`.

pub mod file_scanner;
pub mod fingerprinter;
pub mod identity_resolver;
pub mod normalizer;
pub mod period_resolver;
pub mod reconciler;
pub mod record_builder;

pub use file_scanner::{FileClass, FileScanner, ScanError, ScanResult};
pub use fingerprinter::fingerprint;
pub use identity_resolver::{IdentityMatch, IdentityResolver};
pub use normalizer::{fold_special_chars, normalize_name, NormalizedName};
pub use period_resolver::{PeriodResolution, PeriodResolver};
pub use reconciler::{reconcile, Reconciliation};
pub use record_builder::{BuildOutcome, RecordBuilder};

use jc_common::config::AuditConfig;
use jc_common::Period;

/// Run-wide parameters for the resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverContext {
    /// Maximum Levenshtein distance for typo-tolerant matching
    pub max_distance: usize,
    /// First calendar week of the work year, used to pick between two years
    pub first_week_of_work_year: u32,
    /// The current week; two-digit years and future weeks are judged against it
    pub today: Period,
}

impl ResolverContext {
    pub fn new(max_distance: usize, first_week_of_work_year: u32, today: Period) -> Self {
        Self {
            max_distance,
            first_week_of_work_year,
            today,
        }
    }

    pub fn from_config(config: &AuditConfig, today: Period) -> Self {
        Self::new(config.max_distance, config.first_week_of_work_year, today)
    }
}

/// How a tier chooses among several hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// The first hit in evaluation order decides
    FirstMatch,
    /// Every hit overwrites the previous one; the last in evaluation order decides
    LastMatchWins,
}

impl MatchPolicy {
    pub fn select<T>(self, hits: impl IntoIterator<Item = T>) -> Option<T> {
        let mut hits = hits.into_iter();
        match self {
            MatchPolicy::FirstMatch => hits.next(),
            MatchPolicy::LastMatchWins => hits.last(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_policy_select() {
        assert_eq!(MatchPolicy::FirstMatch.select(vec![3, 1, 2]), Some(3));
        assert_eq!(MatchPolicy::LastMatchWins.select(vec![3, 1, 2]), Some(2));
        assert_eq!(MatchPolicy::LastMatchWins.select(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_context_from_config() {
        let config = AuditConfig {
            directories: Vec::new(),
            roster: None,
            first_week_of_work_year: 40,
            max_distance: 1,
            log_level: "info".to_string(),
        };
        let today = Period::new(12, 2024);
        let context = ResolverContext::from_config(&config, today);
        assert_eq!(context, ResolverContext::new(1, 40, today));
    }
}
