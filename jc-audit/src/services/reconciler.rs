//! Cross-record reconciliation
//!
//! Records are processed strictly in discovery order. Each one is compared
//! only against the records accepted before it, and the first rule that
//! applies decides:
//!
//! | owner | content | period    | outcome                              |
//! |-------|---------|-----------|--------------------------------------|
//! | same  | same    | same      | new record dropped as redundant copy |
//! | same  | same    | different | both marked `Duplicate`              |
//! | same  | differs | same      | new record moved to candidates       |
//! | other | same    | any       | both marked `Duplicate`              |

use crate::models::journal::{JournalRecord, Status};
use jc_common::Period;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Result of reconciling a record set
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Surviving records, in discovery order
    pub accepted: Vec<JournalRecord>,
    /// Unresolvable or conflicting journals, in discovery order
    pub candidates: Vec<PathBuf>,
    /// Byte-identical copies of an accepted journal for the same slot
    pub redundant_copies: Vec<PathBuf>,
    /// Number of records outside the requested periods
    pub out_of_range: usize,
}

enum Collision {
    RedundantCopy,
    SlotConflict,
    Duplicate(&'static str),
}

/// Reconcile `records` against the requested `periods`
///
/// Running this again on the accepted records of a previous run yields the
/// same records unchanged.
pub fn reconcile(records: Vec<JournalRecord>, periods: &[Period]) -> Reconciliation {
    let requested: HashSet<Period> = periods.iter().copied().collect();
    let mut result = Reconciliation::default();

    'records: for mut record in records {
        if let Some(period) = record.period() {
            if !requested.contains(&period) {
                debug!(path = %record.file_path.display(), %period, "Outside requested periods");
                result.out_of_range += 1;
                continue;
            }
        }

        if record.status() == Status::Fatal {
            debug!(path = %record.file_path.display(), "Unresolved journal moved to candidates");
            result.candidates.push(record.file_path);
            continue;
        }

        for earlier in result.accepted.iter_mut() {
            let Some(collision) = classify(earlier, &record) else {
                continue;
            };
            match collision {
                Collision::RedundantCopy => {
                    debug!(
                        path = %record.file_path.display(),
                        kept = %earlier.file_path.display(),
                        "Redundant copy dropped"
                    );
                    result.redundant_copies.push(record.file_path);
                    continue 'records;
                }
                Collision::SlotConflict => {
                    debug!(
                        path = %record.file_path.display(),
                        kept = %earlier.file_path.display(),
                        "Second journal for the same week moved to candidates"
                    );
                    result.candidates.push(record.file_path);
                    continue 'records;
                }
                Collision::Duplicate(reason) => {
                    debug!(
                        path = %record.file_path.display(),
                        other = %earlier.file_path.display(),
                        "Duplicate content"
                    );
                    mark_duplicate(earlier, &record, reason);
                    mark_duplicate(&mut record, earlier, reason);
                    break;
                }
            }
        }

        result.accepted.push(record);
    }

    info!(
        accepted = result.accepted.len(),
        candidates = result.candidates.len(),
        redundant = result.redundant_copies.len(),
        out_of_range = result.out_of_range,
        "Reconciliation complete"
    );
    result
}

fn classify(earlier: &JournalRecord, record: &JournalRecord) -> Option<Collision> {
    let same_hash = earlier.content_hash == record.content_hash;
    let same_period = earlier.period() == record.period();

    if earlier.owner == record.owner {
        match (same_hash, same_period) {
            (true, true) => Some(Collision::RedundantCopy),
            (true, false) => Some(Collision::Duplicate("content identical to journal of another week")),
            (false, true) => Some(Collision::SlotConflict),
            (false, false) => None,
        }
    } else if same_hash {
        Some(Collision::Duplicate("content identical to journal of another person"))
    } else {
        None
    }
}

fn mark_duplicate(record: &mut JournalRecord, other: &JournalRecord, reason: &str) {
    record.escalate(Status::Duplicate);
    record.note_once(format!("{}: {}", reason, other.file_path.display()));
}
