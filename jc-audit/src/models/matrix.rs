//! Owner × period compliance grid

use crate::models::journal::{JournalRecord, Status};
use jc_common::Period;
use serde::Serialize;
use std::collections::HashMap;

/// State of one (owner, period) slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixCell {
    /// A journal was submitted; carries the record status
    Submitted(Status),
    /// Nothing submitted for a period that has already passed
    #[default]
    Missing,
    /// Nothing submitted, but the period lies in the future
    FutureMissing,
}

/// Compliance matrix keyed by (roster index, period index)
///
/// Rows follow roster order, columns follow the chronological period list.
/// Read-only once built.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceMatrix {
    periods: Vec<Period>,
    rows: Vec<Vec<MatrixCell>>,
}

impl ComplianceMatrix {
    /// Build the grid from reconciled records
    ///
    /// Records without an owner or whose period is not a column leave no trace.
    pub fn build(
        owner_count: usize,
        periods: &[Period],
        records: &[JournalRecord],
        today: Period,
    ) -> Self {
        let mut periods = periods.to_vec();
        periods.sort();
        periods.dedup();

        let column_of: HashMap<Period, usize> =
            periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();
        let mut rows = vec![vec![MatrixCell::default(); periods.len()]; owner_count];

        for record in records {
            let (Some(owner), Some(period)) = (record.owner, record.period()) else {
                continue;
            };
            let Some(&column) = column_of.get(&period) else {
                continue;
            };
            if let Some(row) = rows.get_mut(owner) {
                row[column] = MatrixCell::Submitted(record.status());
            }
        }

        for row in rows.iter_mut() {
            for (cell, period) in row.iter_mut().zip(&periods) {
                if *cell == MatrixCell::Missing && period.is_after(&today) {
                    *cell = MatrixCell::FutureMissing;
                }
            }
        }

        Self { periods, rows }
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn owner_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell for roster index `owner` and column `period_index`
    pub fn cell(&self, owner: usize, period_index: usize) -> Option<MatrixCell> {
        self.rows.get(owner)?.get(period_index).copied()
    }

    /// Cell for roster index `owner` and `period`
    pub fn cell_for(&self, owner: usize, period: Period) -> Option<MatrixCell> {
        let column = self.periods.iter().position(|p| *p == period)?;
        self.cell(owner, column)
    }

    /// All cells of one roster row, in period order
    pub fn row(&self, owner: usize) -> Option<&[MatrixCell]> {
        self.rows.get(owner).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn record(owner: usize, week: u32, year: i32, status: Status) -> JournalRecord {
        let mut record = JournalRecord::new(Path::new("/j/arbeitsjournal.docx"));
        record.owner = Some(owner);
        record.week = Some(week);
        record.year = Some(year);
        record.escalate(status);
        record
    }

    #[test]
    fn test_default_cell_is_missing() {
        let periods = vec![Period::new(1, 2024), Period::new(2, 2024)];
        let matrix = ComplianceMatrix::build(2, &periods, &[], Period::new(10, 2024));
        assert_eq!(matrix.owner_count(), 2);
        assert_eq!(matrix.cell(1, 1), Some(MatrixCell::Missing));
        assert_eq!(MatrixCell::default(), MatrixCell::Missing);
    }

    #[test]
    fn test_record_sets_its_cell() {
        let periods = vec![Period::new(1, 2024), Period::new(2, 2024)];
        let records = vec![
            record(0, 2, 2024, Status::Ok),
            record(1, 1, 2024, Status::Warning),
        ];
        let matrix = ComplianceMatrix::build(2, &periods, &records, Period::new(10, 2024));
        assert_eq!(matrix.cell(0, 0), Some(MatrixCell::Missing));
        assert_eq!(matrix.cell(0, 1), Some(MatrixCell::Submitted(Status::Ok)));
        assert_eq!(
            matrix.cell_for(1, Period::new(1, 2024)),
            Some(MatrixCell::Submitted(Status::Warning))
        );
    }

    #[test]
    fn test_future_periods_marked() {
        let periods = vec![Period::new(9, 2024), Period::new(10, 2024), Period::new(11, 2024)];
        let records = vec![record(0, 11, 2024, Status::Ok)];
        let matrix = ComplianceMatrix::build(1, &periods, &records, Period::new(10, 2024));
        assert_eq!(
            matrix.row(0).unwrap(),
            [
                MatrixCell::Missing,
                MatrixCell::Missing,
                MatrixCell::Submitted(Status::Ok)
            ]
        );

        let matrix = ComplianceMatrix::build(1, &periods, &[], Period::new(10, 2024));
        assert_eq!(matrix.cell(0, 2), Some(MatrixCell::FutureMissing));
        assert_eq!(matrix.cell(0, 1), Some(MatrixCell::Missing));
    }

    #[test]
    fn test_columns_sorted_chronologically() {
        let periods = vec![Period::new(2, 2024), Period::new(52, 2023)];
        let matrix = ComplianceMatrix::build(1, &periods, &[], Period::new(10, 2024));
        assert_eq!(matrix.periods(), [Period::new(52, 2023), Period::new(2, 2024)]);
    }

    #[test]
    fn test_unowned_or_out_of_range_records_ignored() {
        let periods = vec![Period::new(1, 2024)];
        let mut unowned = record(0, 1, 2024, Status::Ok);
        unowned.owner = None;
        let records = vec![unowned, record(0, 5, 2024, Status::Ok), record(7, 1, 2024, Status::Ok)];
        let matrix = ComplianceMatrix::build(1, &periods, &records, Period::new(10, 2024));
        assert_eq!(matrix.cell(0, 0), Some(MatrixCell::Missing));
    }
}
