//! Manual measurement cursor: the sheet row the next routed length goes to.

use tracing::debug;
use wireplan_engine::engine::Distance;

use super::Session;
use crate::batch::{FIRST_DATA_ROW, RowView, Sheet};
use crate::error::{Result, WireplanError};

/// Furthest row the cursor searches before giving up.
pub const MAX_SCAN_ROW: usize = 1000;

/// A row waiting for a manual measurement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRow {
    pub row: usize,
    pub origin: String,
    pub destination: String,
}

impl Session {
    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    /// Move the cursor to the next row with an empty result that names at
    /// least one reference, and return it.
    pub fn pending_connection<S: Sheet + ?Sized>(
        &mut self,
        sheet: &S,
    ) -> Result<Option<PendingRow>> {
        while self.cursor_row <= MAX_SCAN_ROW {
            let view = RowView::read(sheet, self.cursor_row)?;
            if !view.is_measured() && view.has_references() {
                return Ok(Some(PendingRow {
                    row: self.cursor_row,
                    origin: view.origin,
                    destination: view.destination,
                }));
            }
            self.cursor_row += 1;
        }
        Ok(None)
    }

    /// Advance the cursor to the first row at or after it whose result is
    /// empty. `None` when every row up to [`MAX_SCAN_ROW`] is measured.
    pub fn next_open_row<S: Sheet + ?Sized>(&mut self, sheet: &S) -> Result<Option<usize>> {
        while self.cursor_row <= MAX_SCAN_ROW {
            if !RowView::read(sheet, self.cursor_row)?.is_measured() {
                return Ok(Some(self.cursor_row));
            }
            self.cursor_row += 1;
        }
        Ok(None)
    }

    /// Write `distance` to the next open row and step past it. Returns the
    /// row written; measured rows are never overwritten.
    pub fn record_measurement<S: Sheet + ?Sized>(
        &mut self,
        sheet: &mut S,
        distance: Distance,
    ) -> Result<usize> {
        let row = self
            .next_open_row(sheet)?
            .ok_or(WireplanError::NoOpenRow(MAX_SCAN_ROW))?;
        sheet.set_result(row, f64::from(distance))?;
        self.cursor_row += 1;
        debug!(row, distance, "measurement recorded");
        Ok(row)
    }

    /// Clear the numeric result just above the cursor and move the cursor
    /// back to it. Returns the cleared row and its old text, or `None` (and
    /// resets the cursor to the first data row) when there is nothing to undo.
    pub fn undo_last_measurement<S: Sheet + ?Sized>(
        &mut self,
        sheet: &mut S,
    ) -> Result<Option<(usize, String)>> {
        let last = self.cursor_row.saturating_sub(1);
        if last >= FIRST_DATA_ROW {
            let view = RowView::read(sheet, last)?;
            if view.result.trim().parse::<f64>().is_ok() {
                sheet.clear_result(last)?;
                self.cursor_row = last;
                return Ok(Some((last, view.result)));
            }
        }
        self.cursor_row = FIRST_DATA_ROW;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::MAX_SCAN_ROW;
    use crate::batch::tests::{MemorySheet, session};
    use crate::error::WireplanError;

    #[test]
    fn test_pending_connection_skips_measured_and_blank_rows() {
        let mut session = session();
        let sheet = MemorySheet::with_rows(&[
            ("100", "F1", "K3"),
            ("", "", ""),
            ("", "F1", "X1:2"),
        ]);
        let pending = session.pending_connection(&sheet).unwrap().unwrap();
        assert_eq!(pending.row, 4);
        assert_eq!(pending.destination, "X1:2");
        assert_eq!(session.cursor_row(), 4);
    }

    #[test]
    fn test_record_then_undo() {
        let mut session = session();
        let mut sheet = MemorySheet::with_rows(&[("100", "F1", "K3"), ("", "K3", "F1")]);

        assert_eq!(session.record_measurement(&mut sheet, 540).unwrap(), 3);
        assert_eq!(sheet.result(3), Some("540"));
        assert_eq!(session.cursor_row(), 4);

        assert_eq!(
            session.undo_last_measurement(&mut sheet).unwrap(),
            Some((3, "540".to_string()))
        );
        assert_eq!(sheet.result(3), None);
        assert_eq!(session.cursor_row(), 3);
    }

    #[test]
    fn test_undo_with_nothing_recorded_resets_cursor() {
        let mut session = session();
        let mut sheet = MemorySheet::with_rows(&[("", "F1", "K3")]);
        assert_eq!(session.undo_last_measurement(&mut sheet).unwrap(), None);
        assert_eq!(session.cursor_row(), 2);
    }

    #[test]
    fn test_next_open_row_skips_measured_rows() {
        let mut session = session();
        let sheet = MemorySheet::with_rows(&[
            ("100", "F1", "K3"),
            ("n/a", "F1", "K3"),
            ("", "", ""),
        ]);
        assert_eq!(session.next_open_row(&sheet).unwrap(), Some(4));
        assert_eq!(session.next_open_row(&sheet).unwrap(), Some(4));
    }

    #[test]
    fn test_undo_leaves_text_results_alone() {
        let mut session = session();
        let mut sheet =
            MemorySheet::with_rows(&[("see note", "F1", "K3"), ("", "K3", "F1")]);
        session.next_open_row(&sheet).unwrap();
        assert_eq!(session.undo_last_measurement(&mut sheet).unwrap(), None);
        assert_eq!(sheet.result(2), Some("see note"));
        assert_eq!(session.cursor_row(), 2);
    }

    #[test]
    fn test_full_sheet_is_never_overwritten() {
        let mut session = session();
        let rows: Vec<(&str, &str, &str)> = vec![("7", "F1", "K3"); MAX_SCAN_ROW - 1];
        let mut sheet = MemorySheet::with_rows(&rows);
        assert_eq!(sheet.last_row, Some(MAX_SCAN_ROW));

        assert_eq!(session.next_open_row(&sheet).unwrap(), None);
        let err = session.record_measurement(&mut sheet, 540).unwrap_err();
        assert!(matches!(err, WireplanError::NoOpenRow(MAX_SCAN_ROW)));
        assert_eq!(sheet.result(MAX_SCAN_ROW), Some("7"));
    }
}
