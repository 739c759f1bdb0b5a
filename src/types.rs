//! Value types exchanged with callers.
//!
//! [`StructureResult`] is the only output of an inspection. It is built once, fully populated,
//! and serializes to the JSON contract consumed by the import pipeline.

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ErrorKind, InspectionError};
use crate::store::normalize_key;

/// Bucket/container plus object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Same location with the key in Unicode composed form (NFC).
    pub fn normalized(&self) -> Self {
        Self {
            bucket: self.bucket.clone(),
            key: normalize_key(&self.key),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Result of a metadata-only probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Object length in bytes.
    pub size_bytes: u64,
    /// `Content-Type` as reported by the store, if any.
    pub content_type: Option<String>,
}

/// Caller-supplied inspection request (the inbound JSON contract).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRequest {
    pub bucket: String,
    pub key: String,
    /// Overrides [`crate::inspector::InspectorOptions::size_ceiling_bytes`] for this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_ceiling_bytes: Option<u64>,
}

impl InspectionRequest {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size_ceiling_bytes: None,
        }
    }

    /// Set a per-request size ceiling.
    pub fn with_size_ceiling(mut self, bytes: u64) -> Self {
        self.size_ceiling_bytes = Some(bytes);
        self
    }

    /// Execute the request with `inspector`.
    pub fn run(&self, inspector: &crate::inspector::Inspector) -> StructureResult {
        inspector.inspect_request(self)
    }
}

/// Field delimiter of a delimited-text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub enum Separator {
    Comma,
    Semicolon,
    Tab,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Tab => '\t',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }

    /// Sub-kind name used in format labels.
    pub fn name(self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
        }
    }
}

impl From<Separator> for char {
    fn from(value: Separator) -> Self {
        value.as_char()
    }
}

impl TryFrom<char> for Separator {
    type Error = String;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            ',' => Ok(Self::Comma),
            ';' => Ok(Self::Semicolon),
            '\t' => Ok(Self::Tab),
            other => Err(format!("unsupported separator {other:?}")),
        }
    }
}

/// Detected file format.
///
/// Serialized as its label, e.g. `"delimited-text/semicolon"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FormatTag {
    DelimitedText(Separator),
    /// Zip-based workbook (`.xlsx`).
    SpreadsheetModern,
    /// Compound-binary workbook (`.xls`).
    SpreadsheetLegacy,
    Unsupported,
}

impl FormatTag {
    pub fn label(&self) -> String {
        match self {
            Self::DelimitedText(sep) => format!("delimited-text/{}", sep.name()),
            Self::SpreadsheetModern => "spreadsheet/xlsx".to_string(),
            Self::SpreadsheetLegacy => "spreadsheet/xls".to_string(),
            Self::Unsupported => "unsupported".to_string(),
        }
    }

    /// The delimiter, for delimited-text formats only.
    pub fn separator(&self) -> Option<Separator> {
        match self {
            Self::DelimitedText(sep) => Some(*sep),
            _ => None,
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for FormatTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delimited-text/comma" => Ok(Self::DelimitedText(Separator::Comma)),
            "delimited-text/semicolon" => Ok(Self::DelimitedText(Separator::Semicolon)),
            "delimited-text/tab" => Ok(Self::DelimitedText(Separator::Tab)),
            "spreadsheet/xlsx" => Ok(Self::SpreadsheetModern),
            "spreadsheet/xls" => Ok(Self::SpreadsheetLegacy),
            "unsupported" => Ok(Self::Unsupported),
            other => Err(format!("unknown format label '{other}'")),
        }
    }
}

impl From<FormatTag> for String {
    fn from(value: FormatTag) -> Self {
        value.label()
    }
}

impl TryFrom<String> for FormatTag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Text encoding the sample was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
}

impl TextEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sample row: column name to cell value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleRow(Vec<(String, String)>);

impl SampleRow {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self(cells)
    }

    /// Value of the first cell named `column`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SampleRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SampleRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SampleRowVisitor;

        impl<'de> Visitor<'de> for SampleRowVisitor {
            type Value = SampleRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to cell value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SampleRow, A::Error> {
                let mut cells = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((column, value)) = map.next_entry::<String, String>()? {
                    cells.push((column, value));
                }
                Ok(SampleRow(cells))
            }
        }

        deserializer.deserialize_map(SampleRowVisitor)
    }
}

/// Structural facts about a parsed table, before the façade adds file-level fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStructure {
    pub columns: Vec<String>,
    pub sample_rows: Vec<SampleRow>,
    pub has_header: bool,
    pub encoding: TextEncoding,
    pub row_count_estimate: u64,
}

/// Outcome of one inspection.
///
/// Invariants:
///
/// - `success` implies `error`/`error_type` are `None`.
/// - `!success` implies `columns`/`sample_rows` are empty and `error_type` is set.
/// - `sample_rows.len() <= 3`.
/// - `separator.is_some()` exactly when `format` is delimited-text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureResult {
    pub success: bool,
    pub columns: Vec<String>,
    pub row_count_estimate: u64,
    pub sample_rows: Vec<SampleRow>,
    pub format: FormatTag,
    pub separator: Option<Separator>,
    pub file_size_bytes: u64,
    pub has_header: bool,
    pub encoding: TextEncoding,
    pub error: Option<String>,
    pub error_type: Option<ErrorKind>,
}

impl StructureResult {
    /// Successful result for a parsed table.
    pub fn success(format: FormatTag, file_size_bytes: u64, table: TableStructure) -> Self {
        Self {
            success: true,
            columns: table.columns,
            row_count_estimate: table.row_count_estimate,
            sample_rows: table.sample_rows,
            format,
            separator: format.separator(),
            file_size_bytes,
            has_header: table.has_header,
            encoding: table.encoding,
            error: None,
            error_type: None,
        }
    }

    /// Failed result; structural fields are left empty.
    pub fn failure(error: &InspectionError, file_size_bytes: u64) -> Self {
        Self {
            success: false,
            columns: Vec::new(),
            row_count_estimate: 0,
            sample_rows: Vec::new(),
            format: FormatTag::Unsupported,
            separator: None,
            file_size_bytes,
            has_header: false,
            encoding: TextEncoding::Utf8,
            error: Some(error.to_string()),
            error_type: Some(error.kind()),
        }
    }

    /// Serialize to the JSON contract.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
