//! Audit report
//!
//! Everything one audit run produces, in a form that can be printed as a
//! plain-text summary or serialized as JSON.

use crate::models::journal::{JournalRecord, Status};
use crate::models::matrix::{ComplianceMatrix, MatrixCell};
use crate::models::person::Roster;
use jc_common::Period;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::path::PathBuf;

/// A period for which a person submitted nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingSubmission {
    pub full_name: String,
    pub period: Period,
}

/// A journal that was accepted but named incorrectly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingProblem {
    pub full_name: String,
    pub period: Period,
    pub file_path: PathBuf,
    pub diagnostics: Vec<String>,
    /// Name the file should have had
    pub suggested_file_name: String,
}

/// Journals sharing identical content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub content_hash: String,
    pub files: Vec<PathBuf>,
}

/// Per-person cell counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersonTally {
    pub ok: usize,
    pub warning: usize,
    pub duplicate: usize,
    pub missing: usize,
    pub future: usize,
}

/// Result of one audit run
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub today: Period,
    /// Requested periods in chronological order
    pub periods: Vec<Period>,
    pub directories: Vec<PathBuf>,
    pub roster: Roster,
    /// Records surviving reconciliation, in discovery order
    pub records: Vec<JournalRecord>,
    /// Unresolved or conflicting journals, then documents that are not named as journals
    pub candidates: Vec<PathBuf>,
    pub other_files: Vec<PathBuf>,
    pub unreadable: Vec<PathBuf>,
    pub redundant_copies: Vec<PathBuf>,
    pub duplicate_groups: Vec<DuplicateGroup>,
    pub missing: Vec<MissingSubmission>,
    pub naming_problems: Vec<NamingProblem>,
    pub matrix: ComplianceMatrix,
}

impl AuditReport {
    /// Group `Duplicate` records by content hash, in order of first appearance
    pub fn duplicate_groups(records: &[JournalRecord]) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = Vec::new();
        for record in records.iter().filter(|r| r.status() == Status::Duplicate) {
            match groups
                .iter_mut()
                .find(|g| g.content_hash == record.content_hash)
            {
                Some(group) => group.files.push(record.file_path.clone()),
                None => groups.push(DuplicateGroup {
                    content_hash: record.content_hash.clone(),
                    files: vec![record.file_path.clone()],
                }),
            }
        }
        groups
    }

    /// Missing past submissions, sorted by (full name, year, week)
    pub fn missing_submissions(roster: &Roster, matrix: &ComplianceMatrix) -> Vec<MissingSubmission> {
        let mut missing = Vec::new();
        for (owner, person) in roster.iter().enumerate() {
            for (column, period) in matrix.periods().iter().enumerate() {
                if matrix.cell(owner, column) == Some(MatrixCell::Missing) {
                    missing.push(MissingSubmission {
                        full_name: person.full_name().to_string(),
                        period: *period,
                    });
                }
            }
        }
        missing.sort_by(|a, b| {
            a.full_name
                .cmp(&b.full_name)
                .then(a.period.year.cmp(&b.period.year))
                .then(a.period.week.cmp(&b.period.week))
        });
        missing
    }

    /// `Warning` records with their suggested file name, sorted by (full name, year, week)
    pub fn naming_problems(roster: &Roster, records: &[JournalRecord]) -> Vec<NamingProblem> {
        let mut problems: Vec<NamingProblem> = records
            .iter()
            .filter(|r| r.status() == Status::Warning)
            .filter_map(|record| {
                let person = roster.get(record.owner?)?;
                Some(NamingProblem {
                    full_name: person.full_name().to_string(),
                    period: record.period()?,
                    file_path: record.file_path.clone(),
                    diagnostics: record.diagnostics().to_vec(),
                    suggested_file_name: record.suggested_file_name(roster)?,
                })
            })
            .collect();
        problems.sort_by(|a, b| {
            a.full_name
                .cmp(&b.full_name)
                .then(a.period.year.cmp(&b.period.year))
                .then(a.period.week.cmp(&b.period.week))
        });
        problems
    }

    /// Cell counts for roster index `owner`
    pub fn tally(&self, owner: usize) -> PersonTally {
        let mut tally = PersonTally::default();
        for cell in self.matrix.row(owner).unwrap_or_default() {
            match cell {
                MatrixCell::Submitted(Status::Ok) => tally.ok += 1,
                MatrixCell::Submitted(Status::Warning) | MatrixCell::Submitted(Status::Fatal) => {
                    tally.warning += 1
                }
                MatrixCell::Submitted(Status::Duplicate) => tally.duplicate += 1,
                MatrixCell::Missing => tally.missing += 1,
                MatrixCell::FutureMissing => tally.future += 1,
            }
        }
        tally
    }

    fn write_paths(out: &mut String, title: &str, paths: &[PathBuf]) -> fmt::Result {
        if paths.is_empty() {
            return Ok(());
        }
        writeln!(out, "\n{} ({})", title, paths.len())?;
        for path in paths {
            writeln!(out, "  {}", path.display())?;
        }
        Ok(())
    }

    fn write_summary(&self, out: &mut String) -> fmt::Result {
        let range = match (self.periods.first(), self.periods.last()) {
            (Some(first), Some(last)) => format!("{} - {}", first, last),
            _ => "no periods".to_string(),
        };
        writeln!(
            out,
            "Journal audit {} ({} weeks, {} people, today {})",
            range,
            self.periods.len(),
            self.roster.len(),
            self.today
        )?;
        for dir in &self.directories {
            writeln!(out, "  searched {}", dir.display())?;
        }

        let width = self
            .roster
            .iter()
            .map(|p| p.full_name().chars().count())
            .max()
            .unwrap_or(0);
        writeln!(out, "\nCompliance")?;
        for (owner, person) in self.roster.iter().enumerate() {
            let tally = self.tally(owner);
            writeln!(
                out,
                "  {:<width$}  ok {:>3}  warning {:>3}  duplicate {:>3}  missing {:>3}  future {:>3}",
                person.full_name(),
                tally.ok,
                tally.warning,
                tally.duplicate,
                tally.missing,
                tally.future,
                width = width
            )?;
        }

        if !self.missing.is_empty() {
            writeln!(out, "\nMissing journals ({})", self.missing.len())?;
            for entry in &self.missing {
                writeln!(out, "  {:<width$}  {}", entry.full_name, entry.period, width = width)?;
            }
        }

        if !self.naming_problems.is_empty() {
            writeln!(out, "\nNaming problems ({})", self.naming_problems.len())?;
            for problem in &self.naming_problems {
                writeln!(out, "  {}", problem.file_path.display())?;
                for diagnostic in &problem.diagnostics {
                    writeln!(out, "    - {}", diagnostic)?;
                }
                writeln!(out, "    suggested: {}", problem.suggested_file_name)?;
            }
        }

        if !self.duplicate_groups.is_empty() {
            writeln!(out, "\nDuplicate content ({} groups)", self.duplicate_groups.len())?;
            for group in &self.duplicate_groups {
                writeln!(out, "  {}", group.content_hash)?;
                for file in &group.files {
                    writeln!(out, "    {}", file.display())?;
                }
            }
        }

        Self::write_paths(out, "Candidates", &self.candidates)?;
        Self::write_paths(out, "Redundant copies", &self.redundant_copies)?;
        Self::write_paths(out, "Unreadable files", &self.unreadable)?;
        Self::write_paths(out, "Other files", &self.other_files)
    }

    /// Plain-text summary for the terminal
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_summary(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::person::Person;
    use std::path::Path;

    fn record(path: &str, owner: usize, week: u32, hash: &str, status: Status) -> JournalRecord {
        let mut record = JournalRecord::new(Path::new(path));
        record.owner = Some(owner);
        record.week = Some(week);
        record.year = Some(2024);
        record.content_hash = hash.to_string();
        record.escalate(status);
        record
    }

    fn roster() -> Roster {
        Roster::new(vec![Person::new("Anna", "Meier"), Person::new("Hans", "Müller")])
    }

    #[test]
    fn test_duplicate_groups_by_first_appearance() {
        let records = vec![
            record("/a", 0, 1, "H2", Status::Duplicate),
            record("/b", 0, 2, "H1", Status::Duplicate),
            record("/c", 1, 1, "H2", Status::Duplicate),
            record("/d", 1, 2, "H3", Status::Ok),
        ];
        let groups = AuditReport::duplicate_groups(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].content_hash, "H2");
        assert_eq!(groups[0].files, vec![PathBuf::from("/a"), PathBuf::from("/c")]);
        assert_eq!(groups[1].files, vec![PathBuf::from("/b")]);
    }

    #[test]
    fn test_missing_submissions_sorted() {
        let periods = vec![Period::new(1, 2024), Period::new(2, 2024), Period::new(3, 2024)];
        let records = vec![record("/a", 1, 2, "H1", Status::Ok)];
        let matrix = ComplianceMatrix::build(2, &periods, &records, Period::new(2, 2024));

        let missing = AuditReport::missing_submissions(&roster(), &matrix);
        let listed: Vec<(String, String)> = missing
            .iter()
            .map(|m| (m.full_name.clone(), m.period.to_string()))
            .collect();
        // week 3 lies in the future and is not missing yet
        assert_eq!(
            listed,
            vec![
                ("Meier Anna".to_string(), "01/2024".to_string()),
                ("Meier Anna".to_string(), "02/2024".to_string()),
                ("Müller Hans".to_string(), "01/2024".to_string()),
            ]
        );
    }

    #[test]
    fn test_naming_problems_carry_suggestion() {
        let records = vec![
            record("/j/Arbeitsjournal_Mueller_Hans_2024_01.docx", 1, 1, "H1", Status::Warning),
            record("/j/arbeitsjournal-meier-anna-2024-01.docx", 0, 1, "H2", Status::Ok),
        ];
        let problems = AuditReport::naming_problems(&roster(), &records);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].full_name, "Müller Hans");
        assert_eq!(
            problems[0].suggested_file_name,
            "arbeitsjournal-mueller-hans-2024-01.docx"
        );
    }
}
