//! Bounded structural parsers.
//!
//! Both parsers read at most [`SAMPLE_ROWS`] raw rows (no type coercion), run the header
//! heuristic on them and turn them into columns plus up to [`MAX_SAMPLE_ROWS_RETURNED`]
//! sample rows.

pub mod delimited;
pub mod spreadsheet;

use crate::detection::has_header;
use crate::types::SampleRow;

/// Rows read from the top of the table.
pub const SAMPLE_ROWS: usize = 5;
/// Data rows returned as samples.
pub const MAX_SAMPLE_ROWS_RETURNED: usize = 3;

/// Columns and samples derived from the first rows of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableShape {
    pub columns: Vec<String>,
    pub sample_rows: Vec<SampleRow>,
    pub has_header: bool,
}

/// Split raw rows into columns and sample rows.
///
/// With a header, row 0 names the columns (verbatim) and the following rows are samples.
/// Without one, columns are named `col_0..col_N` after the width of row 0 and samples start
/// at row 0. Sample cells are trimmed; missing trailing cells become empty strings.
pub fn shape_rows(rows: &[Vec<String>]) -> TableShape {
    let Some(first) = rows.first() else {
        return TableShape {
            columns: Vec::new(),
            sample_rows: Vec::new(),
            has_header: false,
        };
    };

    let header = has_header(rows);
    let (columns, data) = if header {
        (first.clone(), &rows[1..])
    } else {
        let synthesized: Vec<String> = (0..first.len()).map(|i| format!("col_{i}")).collect();
        (synthesized, rows)
    };

    let sample_rows = data
        .iter()
        .take(MAX_SAMPLE_ROWS_RETURNED)
        .map(|row| {
            let cells = columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row.get(i).map(|v| v.trim().to_string()).unwrap_or_default();
                    (name.clone(), value)
                })
                .collect();
            SampleRow::new(cells)
        })
        .collect();

    TableShape {
        columns,
        sample_rows,
        has_header: header,
    }
}
