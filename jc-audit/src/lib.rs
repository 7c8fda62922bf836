//! jc-audit library interface
//!
//! Audit engine for weekly work journals: discovers journal files, works out
//! who wrote each one and for which week, and checks the result against the
//! roster and the requested weeks.

pub mod audit;
pub mod error;
pub mod models;
pub mod report;
pub mod services;

pub use crate::audit::AuditRun;
pub use crate::error::{AuditError, AuditResult};
pub use crate::models::{ComplianceMatrix, JournalRecord, MatrixCell, Person, Roster, Status};
pub use crate::report::AuditReport;
pub use crate::services::ResolverContext;
