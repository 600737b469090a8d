//! CSV-backed connection sheet.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::batch::{RESULT_COLUMN, Sheet};
use crate::error::{Result, WireplanError};

/// A sheet held in memory and read from / written to a CSV file.
/// Records may have differing lengths; missing cells read as empty.
#[derive(Clone, Debug, Default)]
pub struct CsvSheet {
    path: Option<PathBuf>,
    rows: Vec<Vec<String>>,
}

impl CsvSheet {
    /// Load `path`. The first record is kept as the header row.
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut sheet = Self::from_reader(file)?;
        sheet.path = Some(path.to_path_buf());
        Ok(sheet)
    }

    /// Parse CSV text. Blank lines are kept as empty rows so row numbers
    /// match the file.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_slice());
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut record = ::csv::StringRecord::new();
        let mut consumed = 0;
        while reader.read_record(&mut record)? {
            let end = usize::try_from(reader.position().byte())
                .map_or(data.len(), |byte| byte.min(data.len()));
            let after_cr = consumed > 0 && data[consumed - 1] == b'\r';
            let skipped = blank_lines(&data[consumed..end], after_cr);
            rows.extend(std::iter::repeat_with(Vec::new).take(skipped));
            rows.push(record.iter().map(str::to_string).collect());
            consumed = end;
        }
        Ok(CsvSheet { path: None, rows })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write back to the file the sheet was opened from.
    pub fn save(&self) -> Result<PathBuf> {
        let Some(path) = &self.path else {
            return Err(WireplanError::NoFilePath);
        };
        let file = std::fs::File::create(path)?;
        self.to_writer(file)?;
        Ok(path.clone())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = ::csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn slot(&mut self, row: usize, col: usize) -> Result<&mut String> {
        check_position(row, col)?;
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let record = &mut self.rows[row - 1];
        if record.len() < col {
            record.resize_with(col, String::new);
        }
        Ok(&mut record[col - 1])
    }
}

/// Line breaks ahead of the first byte of a record, i.e. blank lines the
/// reader skipped. `after_cr` means the previous record stopped on a `\r`,
/// so a leading `\n` still belongs to its terminator.
fn blank_lines(chunk: &[u8], after_cr: bool) -> usize {
    let lead_len = chunk
        .iter()
        .take_while(|&&b| b == b'\r' || b == b'\n')
        .count();
    let mut lead = &chunk[..lead_len];
    if after_cr && lead.first() == Some(&b'\n') {
        lead = &lead[1..];
    }

    let mut count = 0;
    let mut i = 0;
    while i < lead.len() {
        i += if lead[i] == b'\r' && lead.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
        count += 1;
    }
    count
}

fn check_position(row: usize, col: usize) -> Result<()> {
    if row == 0 || col == 0 {
        return Err(WireplanError::Sheet {
            row,
            message: format!("rows and columns start at 1 (got column {})", col),
        });
    }
    Ok(())
}

impl Sheet for CsvSheet {
    fn last_used_row(&self) -> Option<usize> {
        Some(self.rows.len())
    }

    fn cell(&self, row: usize, col: usize) -> Result<String> {
        check_position(row, col)?;
        Ok(self
            .rows
            .get(row - 1)
            .and_then(|record| record.get(col - 1))
            .cloned()
            .unwrap_or_default())
    }

    fn set_result(&mut self, row: usize, value: f64) -> Result<()> {
        *self.slot(row, RESULT_COLUMN)? = format_number(value);
        Ok(())
    }

    fn clear_result(&mut self, row: usize) -> Result<()> {
        self.slot(row, RESULT_COLUMN)?.clear();
        Ok(())
    }
}

/// Format a length for the result column.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}
