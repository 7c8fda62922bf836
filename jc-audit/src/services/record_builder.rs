//! Journal record construction
//!
//! Chains normalizer, owner and period resolution and the content
//! fingerprint into one `JournalRecord` per journal file.

use super::fingerprinter::fingerprint;
use super::identity_resolver::{IdentityResolver, MSG_OWNER_UNRESOLVED};
use super::normalizer::NormalizedName;
use super::period_resolver::{PeriodResolver, MSG_PERIOD_UNRESOLVED};
use super::ResolverContext;
use crate::error::{AuditError, AuditResult};
use crate::models::journal::{JournalRecord, Status};
use crate::models::person::Roster;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Records built from a file list, plus the files that could not be read
#[derive(Debug, Default)]
pub struct BuildOutcome {
    /// Records in input order
    pub records: Vec<JournalRecord>,
    pub unreadable: Vec<PathBuf>,
}

/// Builds journal records against one roster
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    identity: IdentityResolver,
    period: PeriodResolver,
}

impl RecordBuilder {
    pub fn new(roster: &Roster, context: ResolverContext) -> Self {
        Self {
            identity: IdentityResolver::new(roster, context.max_distance),
            period: PeriodResolver::new(context),
        }
    }

    /// Resolve owner and period from the path alone
    ///
    /// The content hash is left empty.
    pub fn resolve(&self, path: &Path) -> JournalRecord {
        let mut record = JournalRecord::new(path);
        let name = NormalizedName::from_path(path);

        for warning in name.warnings() {
            record.flag(Status::Warning, warning);
        }

        match self.identity.resolve(&name, path) {
            Some(hit) => {
                record.owner = Some(hit.owner);
                if let Some(diagnostic) = hit.diagnostic {
                    record.flag(Status::Warning, diagnostic);
                }
            }
            None => record.flag(Status::Fatal, MSG_OWNER_UNRESOLVED),
        }

        let period = self.period.resolve(&name, path);
        record.week = period.week;
        record.year = period.year;
        for diagnostic in period.diagnostics {
            record.flag(Status::Warning, diagnostic);
        }
        if record.week.is_none() || record.year.is_none() {
            record.flag(Status::Fatal, MSG_PERIOD_UNRESOLVED);
        }

        record
    }

    /// Build the full record for one journal file
    pub fn build(&self, path: &Path) -> AuditResult<JournalRecord> {
        let mut record = self.resolve(path);
        record.content_hash = fingerprint(path).map_err(|source| AuditError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            owner = ?record.owner,
            period = ?record.period(),
            status = %record.status(),
            "Built journal record"
        );
        Ok(record)
    }

    /// Build records for all `paths` in parallel
    ///
    /// Output order matches input order. Unreadable files are logged and
    /// collected instead of aborting the run.
    pub fn build_all(&self, paths: &[PathBuf]) -> BuildOutcome {
        let results: Vec<AuditResult<JournalRecord>> =
            paths.par_iter().map(|path| self.build(path)).collect();

        let mut outcome = BuildOutcome::default();
        for result in results {
            match result {
                Ok(record) => outcome.records.push(record),
                Err(AuditError::UnreadableFile { path, source }) => {
                    warn!(path = %path.display(), error = %source, "Skipping unreadable journal");
                    outcome.unreadable.push(path);
                }
                Err(e) => warn!("Skipping journal: {}", e),
            }
        }

        info!(
            built = outcome.records.len(),
            unreadable = outcome.unreadable.len(),
            "Journal records built"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::person::Person;
    use crate::services::identity_resolver::MSG_NAMES_MISPLACED;
    use crate::services::normalizer::MSG_SEPARATORS;
    use jc_common::Period;
    use std::fs;
    use tempfile::TempDir;

    fn builder() -> RecordBuilder {
        let roster = Roster::new(vec![
            Person::new("Hans", "Müller"),
            Person::new("Anna", "Meier"),
        ]);
        RecordBuilder::new(&roster, ResolverContext::new(2, 33, Period::new(20, 2024)))
    }

    #[test]
    fn test_well_formed_journal() {
        let record = builder().resolve(Path::new("/j/arbeitsjournal-mueller-hans-2023-05.docx"));
        assert_eq!(record.owner, Some(0));
        assert_eq!(record.period(), Some(Period::new(5, 2023)));
        assert_eq!(record.status(), Status::Ok);
        assert!(record.diagnostics().is_empty());
    }

    #[test]
    fn test_underscores_give_warning() {
        let record = builder().resolve(Path::new("/j/ArbeitsJournal_mueller_hans_2023_05.docx"));
        assert_eq!(record.owner, Some(0));
        assert_eq!(record.period(), Some(Period::new(5, 2023)));
        assert_eq!(record.status(), Status::Warning);
        assert_eq!(record.diagnostics(), [MSG_SEPARATORS]);
    }

    #[test]
    fn test_dotted_suffix_is_ignored() {
        let record =
            builder().resolve(Path::new("/j/arbeitsjournal-mueller-hans-2023-05.final.docx"));
        assert_eq!(record.owner, Some(0));
        assert_eq!(record.period(), Some(Period::new(5, 2023)));
        assert_eq!(record.status(), Status::Ok);
        assert!(record.diagnostics().is_empty());
    }

    #[test]
    fn test_fallback_tier_gives_warning() {
        let record = builder().resolve(Path::new("/j/arbeitsjournal-anna-meier-2023-05.docx"));
        assert_eq!(record.owner, Some(1));
        assert_eq!(record.status(), Status::Warning);
        assert_eq!(record.diagnostics(), [MSG_NAMES_MISPLACED]);
    }

    #[test]
    fn test_nothing_extractable_is_fatal() {
        let record = builder().resolve(Path::new("/j/arbeitsjournal.docx"));
        assert_eq!(record.owner, None);
        assert_eq!(record.period(), None);
        assert_eq!(record.status(), Status::Fatal);
        assert_eq!(
            record.diagnostics(),
            [MSG_OWNER_UNRESOLVED, MSG_PERIOD_UNRESOLVED]
        );
    }

    #[test]
    fn test_build_hashes_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arbeitsjournal-meier-anna-2023-05.docx");
        fs::write(&path, b"abc").unwrap();

        let record = builder().build(&path).unwrap();
        assert_eq!(record.content_hash, "A9993E364706816ABA3E25717850C26C9CD0D89D");
    }

    #[test]
    fn test_build_reports_unreadable_file() {
        let err = builder()
            .build(Path::new("/nonexistent/arbeitsjournal-meier-anna-2023-05.docx"))
            .unwrap_err();
        assert!(matches!(err, AuditError::UnreadableFile { .. }));
    }

    #[test]
    fn test_build_all_keeps_order_and_skips_unreadable() {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for week in 1..=6 {
            let path = dir
                .path()
                .join(format!("arbeitsjournal-meier-anna-2023-{:02}.docx", week));
            fs::write(&path, format!("week {}", week)).unwrap();
            paths.push(path);
        }
        let missing = dir.path().join("arbeitsjournal-meier-anna-2023-07.docx");
        paths.insert(3, missing.clone());

        let outcome = builder().build_all(&paths);
        let weeks: Vec<Option<u32>> = outcome.records.iter().map(|r| r.week).collect();
        assert_eq!(
            weeks,
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]
        );
        assert_eq!(outcome.unreadable, vec![missing]);
    }
}
