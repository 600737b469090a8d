use std::collections::BTreeSet;

use tracing::warn;
use wireplan_engine::engine::extract_all_references;

use super::{FIRST_DATA_ROW, RowView, Sheet, last_row};
use crate::mapping::MappingTable;

/// References found in a sheet that have no mapping yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnmappedReport {
    /// Unmapped references, sorted.
    pub unmapped: Vec<String>,
    /// Distinct references found in the sheet.
    pub total: usize,
}

/// Collect every reference token from both reference columns of all data
/// rows and report the ones `mappings` cannot resolve.
pub fn find_unmapped_references<S: Sheet + ?Sized>(
    mappings: &MappingTable,
    sheet: &S,
) -> UnmappedReport {
    let mut found = BTreeSet::new();
    for row in FIRST_DATA_ROW..=last_row(sheet) {
        match RowView::read(sheet, row) {
            Ok(view) => {
                found.extend(extract_all_references(&view.origin));
                found.extend(extract_all_references(&view.destination));
            }
            Err(err) => warn!(row, error = %err, "row unreadable while scanning references"),
        }
    }

    UnmappedReport {
        total: found.len(),
        unmapped: found.into_iter().filter(|r| !mappings.has(r)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::tests::{MemorySheet, session};

    #[test]
    fn test_reports_sorted_unmapped_references() {
        let session = session();
        let sheet = MemorySheet::with_rows(&[
            ("", "F1* / Q2", "K3"),
            ("", "X1:7", "S5"),
            ("10", "B4", "Q2*"),
        ]);

        let report = find_unmapped_references(session.mappings(), &sheet);
        assert_eq!(report.total, 6);
        assert_eq!(report.unmapped, vec!["B4", "Q2", "S5"]);
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let session = session();
        let mut sheet = MemorySheet::with_rows(&[("", "Q1", ""), ("", "Q2", "")]);
        sheet.broken_rows.push(2);
        let report = find_unmapped_references(session.mappings(), &sheet);
        assert_eq!(report.unmapped, vec!["Q2"]);
    }
}
