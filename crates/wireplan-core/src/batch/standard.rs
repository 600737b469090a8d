//! Fixed lengths for connections recognised by their text alone, such as
//! every `PE` to `X1` jumper in a cabinet.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{BatchReport, FIRST_DATA_ROW, RowView, Sheet, last_row};
use crate::error::Result;

/// A text rule that fills in a known length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardMeasurement {
    /// Substring the origin text must contain; empty matches anything.
    #[serde(default)]
    pub origin_contains: String,
    /// Substring the destination text must contain; empty matches anything.
    #[serde(default)]
    pub destination_contains: String,
    pub distance: f64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl StandardMeasurement {
    pub fn new(origin_contains: &str, destination_contains: &str, distance: f64) -> Self {
        StandardMeasurement {
            origin_contains: origin_contains.to_string(),
            destination_contains: destination_contains.to_string(),
            distance,
            enabled: true,
        }
    }

    /// Case-insensitive substring match on both columns.
    pub fn matches(&self, origin: &str, destination: &str) -> bool {
        contains_ignore_case(origin, &self.origin_contains)
            && contains_ignore_case(destination, &self.destination_contains)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Fill unmeasured rows with the first enabled rule that matches them.
pub fn apply_standard_measurements<S: Sheet + ?Sized>(
    sheet: &mut S,
    rules: &[StandardMeasurement],
) -> BatchReport {
    let mut report = BatchReport::default();
    let enabled: Vec<&StandardMeasurement> = rules.iter().filter(|r| r.enabled).collect();
    if enabled.is_empty() {
        info!("no enabled standard measurements");
        return report;
    }

    for row in FIRST_DATA_ROW..=last_row(sheet) {
        match apply_row(sheet, row, &enabled) {
            Ok(true) => report.processed += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(row, error = %err, "row failed");
                report.failed += 1;
            }
        }
    }

    info!(applied = report.processed, "standard measurements applied");
    report
}

fn apply_row<S: Sheet + ?Sized>(
    sheet: &mut S,
    row: usize,
    rules: &[&StandardMeasurement],
) -> Result<bool> {
    let view = RowView::read(sheet, row)?;
    if view.is_measured() {
        return Ok(false);
    }
    let Some(rule) = rules
        .iter()
        .find(|rule| rule.matches(&view.origin, &view.destination))
    else {
        return Ok(false);
    };
    sheet.set_result(row, rule.distance)?;
    debug!(
        row,
        distance = rule.distance,
        origin = %view.origin,
        destination = %view.destination,
        "standard length applied"
    );
    Ok(true)
}
