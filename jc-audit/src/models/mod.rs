//! Data models for the audit engine

pub mod journal;
pub mod matrix;
pub mod person;

pub use journal::{JournalRecord, Status, JOURNAL_KEYWORD};
pub use matrix::{ComplianceMatrix, MatrixCell};
pub use person::{Person, Roster};
