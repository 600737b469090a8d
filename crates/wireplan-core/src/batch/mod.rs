//! Row-by-row processing of a connection sheet.
//!
//! A sheet has three logical columns: the measured length (empty until
//! measured) and the origin and destination reference texts. Row 1 is a
//! header and is never touched.

mod scan;
mod standard;

pub use scan::{UnmappedReport, find_unmapped_references};
pub use standard::{StandardMeasurement, apply_standard_measurements};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::session::{Session, Unresolved};

pub const HEADER_ROW: usize = 1;
pub const FIRST_DATA_ROW: usize = 2;
/// Rows scanned when the sheet cannot report its extent.
pub const DEFAULT_LAST_ROW: usize = 100;

pub const RESULT_COLUMN: usize = 1;
pub const ORIGIN_COLUMN: usize = 2;
pub const DESTINATION_COLUMN: usize = 3;

/// Tabular source of connections. Rows and columns are 1-based.
pub trait Sheet {
    /// Last row holding data, or `None` if the sheet cannot tell.
    fn last_used_row(&self) -> Option<usize>;

    /// Text of a cell; empty for cells that hold nothing.
    fn cell(&self, row: usize, col: usize) -> Result<String>;

    /// Write a length into the result column of `row`.
    fn set_result(&mut self, row: usize, value: f64) -> Result<()>;

    /// Empty the result column of `row`.
    fn clear_result(&mut self, row: usize) -> Result<()>;
}

/// The three logical columns of one data row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowView {
    pub result: String,
    pub origin: String,
    pub destination: String,
}

impl RowView {
    pub fn read<S: Sheet + ?Sized>(sheet: &S, row: usize) -> Result<RowView> {
        Ok(RowView {
            result: sheet.cell(row, RESULT_COLUMN)?,
            origin: sheet.cell(row, ORIGIN_COLUMN)?,
            destination: sheet.cell(row, DESTINATION_COLUMN)?,
        })
    }

    pub fn is_measured(&self) -> bool {
        !self.result.trim().is_empty()
    }

    pub fn has_references(&self) -> bool {
        !self.origin.trim().is_empty() || !self.destination.trim().is_empty()
    }
}

/// Last data row to scan.
pub fn last_row<S: Sheet + ?Sized>(sheet: &S) -> usize {
    sheet.last_used_row().unwrap_or(DEFAULT_LAST_ROW)
}

/// Outcome counts of a pass over a sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Rows that received a value.
    pub processed: usize,
    /// Rows whose references could not be resolved.
    pub unresolved: usize,
    /// Rows that failed while being read or written.
    pub failed: usize,
}

enum RowOutcome {
    Skipped,
    Measured,
    Unresolved(Unresolved),
}

/// Measure every unmeasured row that names at least one reference.
pub fn process_all<S: Sheet + ?Sized>(session: &Session, sheet: &mut S) -> BatchReport {
    process_until(session, sheet, |_| true)
}

/// Like [`process_all`], but `keep_going` is asked before each row and the
/// pass stops at the first `false`.
pub fn process_until<S, F>(session: &Session, sheet: &mut S, mut keep_going: F) -> BatchReport
where
    S: Sheet + ?Sized,
    F: FnMut(usize) -> bool,
{
    let mut report = BatchReport::default();
    let last = last_row(sheet);

    for row in FIRST_DATA_ROW..=last {
        if !keep_going(row) {
            debug!(row, "batch stopped by caller");
            break;
        }
        match process_row(session, sheet, row) {
            Ok(RowOutcome::Skipped) => {}
            Ok(RowOutcome::Measured) => report.processed += 1,
            Ok(RowOutcome::Unresolved(reason)) => {
                debug!(row, %reason, "row skipped");
                report.unresolved += 1;
            }
            Err(err) => {
                warn!(row, error = %err, "row failed");
                report.failed += 1;
            }
        }
    }

    info!(
        processed = report.processed,
        unresolved = report.unresolved,
        failed = report.failed,
        "batch finished"
    );
    report
}

fn process_row<S: Sheet + ?Sized>(
    session: &Session,
    sheet: &mut S,
    row: usize,
) -> Result<RowOutcome> {
    let view = RowView::read(sheet, row)?;
    if view.is_measured() || !view.has_references() {
        return Ok(RowOutcome::Skipped);
    }

    match session.resolve_connection(&view.origin, &view.destination) {
        Ok(connection) => {
            sheet.set_result(row, f64::from(connection.distance))?;
            debug!(row, distance = connection.distance, "row measured");
            Ok(RowOutcome::Measured)
        }
        Err(reason) => Ok(RowOutcome::Unresolved(reason)),
    }
}
