//! Spreadsheet (first sheet only) structural parser.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Sheets, Xls, Xlsx};

use crate::error::{InspectionError, InspectionResult};
use crate::types::{TableStructure, TextEncoding};

use super::{SAMPLE_ROWS, shape_rows};

/// Assumed average compressed size of one row, for the row-count estimate.
pub const SPREADSHEET_AVG_BYTES_PER_ROW: u64 = 100;

/// Container flavour of a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    /// Zip-based `.xlsx`.
    Modern,
    /// Compound-binary `.xls`.
    Legacy,
}

/// Parse the structure of the first sheet of a workbook held in `bytes`.
///
/// Reads at most [`SAMPLE_ROWS`] rows as raw strings. Compressed containers make byte ratios
/// meaningless, so the row count is estimated from [`SPREADSHEET_AVG_BYTES_PER_ROW`].
pub fn parse_spreadsheet(
    bytes: Vec<u8>,
    kind: WorkbookKind,
    file_size_bytes: u64,
) -> InspectionResult<TableStructure> {
    let range = first_sheet_range(bytes, kind)?;
    if range.is_empty() {
        return Err(InspectionError::EmptyFile);
    }

    let rows: Vec<Vec<String>> = range
        .rows()
        .take(SAMPLE_ROWS)
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    if rows.iter().all(|row| row.iter().all(|c| c.trim().is_empty())) {
        return Err(InspectionError::EmptyFile);
    }

    let shape = shape_rows(&rows);
    Ok(TableStructure {
        columns: shape.columns,
        sample_rows: shape.sample_rows,
        has_header: shape.has_header,
        encoding: TextEncoding::Utf8,
        row_count_estimate: estimate_spreadsheet_rows(file_size_bytes),
    })
}

/// `file_size_bytes / SPREADSHEET_AVG_BYTES_PER_ROW`, at least 1.
pub fn estimate_spreadsheet_rows(file_size_bytes: u64) -> u64 {
    (file_size_bytes / SPREADSHEET_AVG_BYTES_PER_ROW).max(1)
}

fn first_sheet_range(bytes: Vec<u8>, kind: WorkbookKind) -> InspectionResult<Range<Data>> {
    let cursor = Cursor::new(bytes);
    let mut workbook = match kind {
        WorkbookKind::Modern => {
            Sheets::Xlsx(Xlsx::new(cursor).map_err(calamine::Error::from)?)
        }
        WorkbookKind::Legacy => Sheets::Xls(Xls::new(cursor).map_err(calamine::Error::from)?),
    };

    match workbook.worksheet_range_at(0) {
        Some(range) => Ok(range?),
        None => Err(InspectionError::Parse {
            message: "workbook has no sheets".to_string(),
        }),
    }
}

/// Raw string form of a cell; whole floats print without a fractional part.
fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
