//! File-format classification from leading bytes plus key/content-type hints.

use super::encoding::decode_sample;

/// Zip local file header (`.xlsx`).
pub const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
/// Compound binary file header (`.xls`).
pub const CFB_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

const TEXT_PROBE_CHARS: usize = 500;
const MAX_NON_PRINTABLE_RATIO: f64 = 0.10;

/// Coarse format classification; the delimiter is chosen separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    DelimitedText,
    SpreadsheetModern,
    SpreadsheetLegacy,
    Unsupported,
}

impl FileFormat {
    /// Parse a format from a key extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Some(Self::SpreadsheetModern),
            "xls" => Some(Self::SpreadsheetLegacy),
            "csv" | "txt" | "tsv" => Some(Self::DelimitedText),
            _ => None,
        }
    }

    /// Classify a `Content-Type` hint by substring.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let ct = content_type.to_ascii_lowercase();
        if ct.contains("spreadsheet") || ct.contains("excel") {
            if ct.contains("openxml") {
                Some(Self::SpreadsheetModern)
            } else {
                Some(Self::SpreadsheetLegacy)
            }
        } else if ct.contains("csv") || ct.contains("text") {
            Some(Self::DelimitedText)
        } else {
            None
        }
    }
}

/// Classify `sample` (the first bytes of the object).
///
/// First match wins: magic bytes, then the key extension, then the content-type hint, then
/// a plain-text heuristic over the decoded sample.
pub fn detect_format(sample: &[u8], key: &str, content_type: Option<&str>) -> FileFormat {
    if sample.starts_with(ZIP_MAGIC) {
        return FileFormat::SpreadsheetModern;
    }
    if sample.starts_with(CFB_MAGIC) {
        return FileFormat::SpreadsheetLegacy;
    }
    if let Some(fmt) = key_extension(key).and_then(FileFormat::from_extension) {
        return fmt;
    }
    if let Some(fmt) = content_type.and_then(FileFormat::from_content_type) {
        return fmt;
    }
    if looks_like_delimited_text(sample) {
        FileFormat::DelimitedText
    } else {
        FileFormat::Unsupported
    }
}

/// Extension of the last path segment of `key`, if any.
pub fn key_extension(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next().unwrap_or(key);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

fn looks_like_delimited_text(sample: &[u8]) -> bool {
    let (text, _) = decode_sample(sample);

    let mut total = 0usize;
    let mut non_printable = 0usize;
    for c in text.chars().take(TEXT_PROBE_CHARS) {
        total += 1;
        if c.is_control() && !matches!(c, '\n' | '\r' | '\t') {
            non_printable += 1;
        }
    }
    if total == 0 || (non_printable as f64 / total as f64) >= MAX_NON_PRINTABLE_RATIO {
        return false;
    }

    let has_line_break = text.contains(['\n', '\r']);
    let has_delimiter = text.contains([',', ';', '\t']);
    has_line_break && has_delimiter
}
