//! Audit run orchestration
//!
//! scan → build records → reconcile → compliance matrix → report

use crate::error::AuditResult;
use crate::models::matrix::ComplianceMatrix;
use crate::models::person::Roster;
use crate::report::AuditReport;
use crate::services::file_scanner::FileScanner;
use crate::services::reconciler::reconcile;
use crate::services::record_builder::RecordBuilder;
use crate::services::ResolverContext;
use jc_common::config::AuditConfig;
use jc_common::{Error, Period, PeriodRange};
use std::path::PathBuf;
use tracing::info;

/// One configured audit over a set of directories
pub struct AuditRun {
    directories: Vec<PathBuf>,
    roster: Roster,
    periods: Vec<Period>,
    context: ResolverContext,
}

impl AuditRun {
    pub fn new(
        directories: Vec<PathBuf>,
        roster: Roster,
        periods: Vec<Period>,
        context: ResolverContext,
    ) -> Self {
        Self {
            directories,
            roster,
            periods,
            context,
        }
    }

    /// Set up a run from validated configuration; loads the roster
    pub fn from_config(config: &AuditConfig, range: &PeriodRange, today: Period) -> AuditResult<Self> {
        let roster_path = config
            .roster
            .as_deref()
            .ok_or_else(|| Error::Config("No roster file configured".to_string()))?;
        let roster = Roster::load(roster_path)?;

        Ok(Self::new(
            config.directories.clone(),
            roster,
            range.periods(),
            ResolverContext::from_config(config, today),
        ))
    }

    /// Run the audit
    pub fn run(&self) -> AuditReport {
        info!(
            directories = self.directories.len(),
            people = self.roster.len(),
            periods = self.periods.len(),
            "Starting journal audit"
        );

        let scan = FileScanner::new(self.context.max_distance).scan_all(&self.directories);

        let builder = RecordBuilder::new(&self.roster, self.context);
        let built = builder.build_all(&scan.journals);

        let reconciled = reconcile(built.records, &self.periods);

        let matrix = ComplianceMatrix::build(
            self.roster.len(),
            &self.periods,
            &reconciled.accepted,
            self.context.today,
        );

        let mut candidates = reconciled.candidates;
        candidates.extend(scan.candidates);

        let report = AuditReport {
            today: self.context.today,
            periods: matrix.periods().to_vec(),
            directories: self.directories.clone(),
            roster: self.roster.clone(),
            duplicate_groups: AuditReport::duplicate_groups(&reconciled.accepted),
            missing: AuditReport::missing_submissions(&self.roster, &matrix),
            naming_problems: AuditReport::naming_problems(&self.roster, &reconciled.accepted),
            records: reconciled.accepted,
            candidates,
            other_files: scan.other_files,
            unreadable: built.unreadable,
            redundant_copies: reconciled.redundant_copies,
            matrix,
        };

        info!(
            records = report.records.len(),
            missing = report.missing.len(),
            candidates = report.candidates.len(),
            duplicates = report.duplicate_groups.len(),
            "Journal audit complete"
        );
        report
    }
}
