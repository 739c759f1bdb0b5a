//! Delimited-text (CSV/TSV) structural parser.

use crate::detection::encoding::strip_bom;
use crate::detection::{decode_sample, estimate_row_count};
use crate::error::{InspectionError, InspectionResult};
use crate::types::{Separator, TableStructure};

use super::{SAMPLE_ROWS, shape_rows};

/// Parse the structure of a delimited-text sample.
///
/// `sample` is a prefix of the object (or the whole object); `file_size_bytes` is the full
/// object size, used for the row-count extrapolation. At most [`SAMPLE_ROWS`] records are
/// read, and only their bytes decide the encoding (UTF-8, falling back to Latin-1).
pub fn parse_delimited(
    sample: &[u8],
    separator: Separator,
    file_size_bytes: u64,
) -> InspectionResult<TableStructure> {
    let body = strip_bom(sample);
    let end = leading_records_len(body, separator, SAMPLE_ROWS)?;
    let (text, encoding) = decode_sample(&body[..end]);
    let rows = read_rows(&text, separator, SAMPLE_ROWS)?;
    if rows.is_empty() {
        return Err(InspectionError::EmptyFile);
    }

    let shape = shape_rows(&rows);
    Ok(TableStructure {
        columns: shape.columns,
        sample_rows: shape.sample_rows,
        has_header: shape.has_header,
        encoding,
        row_count_estimate: estimate_row_count(file_size_bytes, sample),
    })
}

/// Byte length of the first `limit` records of `bytes`, terminators included.
fn leading_records_len(
    bytes: &[u8],
    separator: Separator,
    limit: usize,
) -> InspectionResult<usize> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator.as_byte())
        .from_reader(bytes);

    let mut record = csv::ByteRecord::new();
    let mut read = 0;
    while read < limit && rdr.read_byte_record(&mut record)? {
        read += 1;
    }
    let end = usize::try_from(rdr.position().byte()).unwrap_or(usize::MAX);
    Ok(end.min(bytes.len()))
}

/// Read up to `limit` raw records from decoded text.
///
/// Records may have differing widths; blank lines are skipped.
pub fn read_rows(
    text: &str,
    separator: Separator,
    limit: usize,
) -> InspectionResult<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator.as_byte())
        .from_reader(text.as_bytes());

    let mut rows = Vec::with_capacity(limit);
    for result in rdr.records().take(limit) {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
