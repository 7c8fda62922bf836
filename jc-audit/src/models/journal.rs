//! Journal records and their status

use crate::models::person::Roster;
use crate::services::normalizer::fold_special_chars;
use jc_common::Period;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Journal file keyword expected as the first name token
pub const JOURNAL_KEYWORD: &str = "arbeitsjournal";

/// Record status, ordered by severity
///
/// Normal processing only ever raises the status (`JournalRecord::escalate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No problems detected
    Ok = 0,
    /// Naming problems, but owner and period were recovered
    Warning = 1,
    /// Owner or period could not be determined
    Fatal = 2,
    /// Content is identical to another journal in a different slot
    Duplicate = 3,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Ok => "ok",
            Status::Warning => "warning",
            Status::Fatal => "fatal",
            Status::Duplicate => "duplicate",
        };
        f.write_str(label)
    }
}

/// One journal-like file and everything resolved about it
#[derive(Debug, Clone, Serialize)]
pub struct JournalRecord {
    pub file_path: PathBuf,
    pub directory: PathBuf,
    pub file_name: String,
    /// Resolved week, `None` if no tier produced one
    pub week: Option<u32>,
    /// Resolved year, `None` if no tier produced one
    pub year: Option<i32>,
    /// Index into the roster
    pub owner: Option<usize>,
    /// Uppercase hex SHA-1 of the file content
    pub content_hash: String,
    status: Status,
    diagnostics: Vec<String>,
}

impl JournalRecord {
    /// Create an unresolved record for `path` with status `Ok`
    pub fn new(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            file_path: path.to_path_buf(),
            directory,
            file_name,
            week: None,
            year: None,
            owner: None,
            content_hash: String::new(),
            status: Status::Ok,
            diagnostics: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Raise the status to `status` if it is more severe; returns `true` if it changed
    pub fn escalate(&mut self, status: Status) -> bool {
        if status > self.status {
            self.status = status;
            true
        } else {
            false
        }
    }

    /// Set the status unconditionally
    ///
    /// Override for corrective re-runs only. Everything else goes through `escalate`.
    pub fn force_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Append a diagnostic message
    pub fn note(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
    }

    /// Append a diagnostic unless the identical message is already present
    pub fn note_once(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.diagnostics.contains(&message) {
            self.diagnostics.push(message);
        }
    }

    /// Escalate and record why
    pub fn flag(&mut self, status: Status, message: impl Into<String>) {
        self.escalate(status);
        self.note(message);
    }

    /// Period if both week and year were resolved
    pub fn period(&self) -> Option<Period> {
        match (self.week, self.year) {
            (Some(week), Some(year)) => Some(Period::new(week, year)),
            _ => None,
        }
    }

    /// File name this journal should have had
    ///
    /// `None` until both owner and period are resolved.
    pub fn suggested_file_name(&self, roster: &Roster) -> Option<String> {
        let owner = roster.get(self.owner?)?;
        let period = self.period()?;
        Some(format!(
            "{}-{}-{}-{}-{:02}.docx",
            JOURNAL_KEYWORD,
            fold_special_chars(&owner.last_name().to_lowercase()),
            fold_special_chars(&owner.first_name().to_lowercase()),
            period.year,
            period.week
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::person::Person;

    fn record() -> JournalRecord {
        JournalRecord::new(Path::new("/journals/2023/arbeitsjournal-meier-anna-2023-05.docx"))
    }

    #[test]
    fn test_new_splits_path() {
        let record = record();
        assert_eq!(record.file_name, "arbeitsjournal-meier-anna-2023-05.docx");
        assert_eq!(record.directory, PathBuf::from("/journals/2023"));
        assert_eq!(record.status(), Status::Ok);
        assert!(record.diagnostics().is_empty());
        assert!(record.period().is_none());
    }

    #[test]
    fn test_status_order() {
        assert!(Status::Ok < Status::Warning);
        assert!(Status::Warning < Status::Fatal);
        assert!(Status::Fatal < Status::Duplicate);
    }

    #[test]
    fn test_escalate_never_lowers() {
        let mut record = record();
        assert!(record.escalate(Status::Fatal));
        assert!(!record.escalate(Status::Warning));
        assert!(!record.escalate(Status::Fatal));
        assert_eq!(record.status(), Status::Fatal);
        assert!(record.escalate(Status::Duplicate));
        assert_eq!(record.status(), Status::Duplicate);
    }

    #[test]
    fn test_force_status_can_lower() {
        let mut record = record();
        record.escalate(Status::Duplicate);
        record.force_status(Status::Ok);
        assert_eq!(record.status(), Status::Ok);
    }

    #[test]
    fn test_flag_appends_in_order() {
        let mut record = record();
        record.flag(Status::Warning, "first");
        record.flag(Status::Ok, "second");
        assert_eq!(record.status(), Status::Warning);
        assert_eq!(record.diagnostics(), ["first", "second"]);
    }

    #[test]
    fn test_note_once_skips_repeats() {
        let mut record = record();
        record.note_once("same");
        record.note_once("same");
        assert_eq!(record.diagnostics().len(), 1);
    }

    #[test]
    fn test_suggested_file_name() {
        let roster = Roster::new(vec![Person::new("Jürg", "Müller")]);
        let mut record = record();
        assert!(record.suggested_file_name(&roster).is_none());

        record.owner = Some(0);
        record.week = Some(5);
        record.year = Some(2023);
        assert_eq!(
            record.suggested_file_name(&roster).unwrap(),
            "arbeitsjournal-mueller-juerg-2023-05.docx"
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Duplicate.to_string(), "duplicate");
    }
}
