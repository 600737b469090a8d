//! Storage backends for connection sheets.

mod csv;

pub use self::csv::{CsvSheet, format_number};
