use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Convenience result type for inspection internals.
pub type InspectionResult<T> = Result<T, InspectionError>;

/// Error type produced while inspecting an object.
///
/// These never cross the [`crate::inspector::Inspector`] boundary: the façade converts them
/// into a failed [`crate::types::StructureResult`] carrying [`InspectionError::kind`].
#[derive(Debug, Error)]
pub enum InspectionError {
    /// No bucket/container was supplied.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The request itself is malformed (e.g. empty key).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The metadata probe reported a size above the ceiling.
    #[error("file too large: {size} bytes exceeds the ceiling of {ceiling} bytes")]
    FileTooLarge { size: u64, ceiling: u64 },

    /// The object does not exist.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The metadata probe failed for a reason other than "not found".
    #[error("object store error: {0}")]
    Store(String),

    /// Neither magic bytes, extension, content-type nor content look tabular.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// A ranged or full read failed after a successful probe.
    #[error("download error: {0}")]
    Download(String),

    /// Delimited-text parse error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet container could not be opened or read.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Any other structural parse failure.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The object (or its first sheet) holds no rows.
    #[error("file is empty")]
    EmptyFile,

    /// Unexpected internal failure.
    #[error("inspection error: {0}")]
    Internal(String),
}

impl InspectionError {
    /// The serializable kind reported in [`crate::types::StructureResult::error_type`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::ConfigurationError,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::NotFound { .. } => ErrorKind::FileNotFound,
            Self::Store(_) => ErrorKind::S3Error,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Download(_) => ErrorKind::DownloadError,
            Self::Csv(_) | Self::Spreadsheet(_) | Self::Parse { .. } => ErrorKind::ParseError,
            Self::EmptyFile => ErrorKind::EmptyFile,
            Self::Internal(_) => ErrorKind::InspectionError,
        }
    }

    /// Map a failed metadata probe.
    pub(crate) fn from_probe(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { bucket, key } => Self::NotFound { bucket, key },
            other => Self::Store(other.to_string()),
        }
    }

    /// Map a failed ranged/full read.
    pub(crate) fn from_download(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { bucket, key } => Self::NotFound { bucket, key },
            other => Self::Download(other.to_string()),
        }
    }
}

/// Error classification carried by failed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "CONFIGURATION_ERROR")]
    ConfigurationError,
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,
    #[serde(rename = "FILE_TOO_LARGE")]
    FileTooLarge,
    #[serde(rename = "FILE_NOT_FOUND")]
    FileNotFound,
    #[serde(rename = "S3_ERROR")]
    S3Error,
    #[serde(rename = "UNSUPPORTED_FORMAT")]
    UnsupportedFormat,
    #[serde(rename = "DOWNLOAD_ERROR")]
    DownloadError,
    #[serde(rename = "PARSE_ERROR")]
    ParseError,
    #[serde(rename = "EMPTY_FILE")]
    EmptyFile,
    #[serde(rename = "INSPECTION_ERROR")]
    InspectionError,
}

impl ErrorKind {
    /// Wire name, e.g. `FILE_TOO_LARGE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::S3Error => "S3_ERROR",
            Self::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            Self::DownloadError => "DOWNLOAD_ERROR",
            Self::ParseError => "PARSE_ERROR",
            Self::EmptyFile => "EMPTY_FILE",
            Self::InspectionError => "INSPECTION_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
