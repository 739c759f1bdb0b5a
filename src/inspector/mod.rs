//! The inspection façade.
//!
//! [`Inspector::inspect`] is the public entry point. One call issues at most:
//!
//! 1. a metadata probe (size + content type),
//! 2. a ranged read of the first [`HEAD_BYTES`] for format/separator sniffing,
//! 3. for delimited text larger than the head window, one read capped at
//!    [`DELIMITED_DOWNLOAD_CAP`]; for spreadsheets larger than the head window, one full read.
//!
//! The size ceiling is checked against the probe before any content is read. Every failure is
//! reported inside the returned [`StructureResult`].

mod observability;

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use rayon::prelude::*;

use crate::detection::{FileFormat, detect_format, detect_separator};
use crate::error::{InspectionError, InspectionResult};
use crate::parsing::delimited::parse_delimited;
use crate::parsing::spreadsheet::{WorkbookKind, parse_spreadsheet};
use crate::store::ObjectStore;
use crate::types::{
    FormatTag, InspectionRequest, ObjectLocation, ObjectMetadata, StructureResult, TableStructure,
};

pub use observability::{
    CompositeObserver, FileObserver, InspectionContext, InspectionObserver, InspectionSeverity,
    InspectionStats, StdErrObserver,
};

/// Leading bytes read for format and separator sniffing.
pub const HEAD_BYTES: u64 = 8_192;
/// Default size ceiling (500 MiB).
pub const MAX_FILE_SIZE: u64 = 524_288_000;
/// Bytes downloaded for delimited-text parsing, regardless of file size.
pub const DELIMITED_DOWNLOAD_CAP: u64 = 1_048_576;

/// Options controlling inspection behavior.
///
/// Use [`Default`] for the standard limits.
#[derive(Clone)]
pub struct InspectorOptions {
    /// Objects larger than this fail with `FILE_TOO_LARGE` before any content is read.
    pub size_ceiling_bytes: u64,
    /// Size of the sniffing window.
    pub head_bytes: u64,
    /// Download cap for delimited-text parsing.
    pub delimited_download_cap_bytes: u64,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn InspectionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: InspectionSeverity,
}

impl fmt::Debug for InspectorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorOptions")
            .field("size_ceiling_bytes", &self.size_ceiling_bytes)
            .field("head_bytes", &self.head_bytes)
            .field("delimited_download_cap_bytes", &self.delimited_download_cap_bytes)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self {
            size_ceiling_bytes: MAX_FILE_SIZE,
            head_bytes: HEAD_BYTES,
            delimited_download_cap_bytes: DELIMITED_DOWNLOAD_CAP,
            observer: None,
            alert_at_or_above: InspectionSeverity::Critical,
        }
    }
}

/// Structural inspector bound to one blob store.
///
/// Holds no per-call state. Build one at startup and share it (`&Inspector` or
/// `Arc<Inspector>`) across threads.
pub struct Inspector {
    store: Arc<dyn ObjectStore>,
    opts: InspectorOptions,
}

impl fmt::Debug for Inspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspector")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

/// What the current call has learned so far, for failure results and observer context.
#[derive(Debug, Default)]
struct Progress {
    file_size_bytes: u64,
    format: Option<FormatTag>,
}

impl Inspector {
    /// Create an inspector with default options.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_options(store, InspectorOptions::default())
    }

    pub fn with_options(store: Arc<dyn ObjectStore>, opts: InspectorOptions) -> Self {
        Self { store, opts }
    }

    pub fn options(&self) -> &InspectorOptions {
        &self.opts
    }

    /// Inspect `bucket`/`key` with the configured size ceiling.
    pub fn inspect(&self, bucket: &str, key: &str) -> StructureResult {
        self.inspect_with_ceiling(bucket, key, self.opts.size_ceiling_bytes)
    }

    /// Inspect a request; its `size_ceiling_bytes`, when set, overrides the options.
    pub fn inspect_request(&self, request: &InspectionRequest) -> StructureResult {
        let ceiling = request
            .size_ceiling_bytes
            .unwrap_or(self.opts.size_ceiling_bytes);
        self.inspect_with_ceiling(&request.bucket, &request.key, ceiling)
    }

    /// Inspect many objects in parallel. Results are in request order.
    pub fn inspect_batch(&self, requests: &[InspectionRequest]) -> Vec<StructureResult> {
        requests
            .par_iter()
            .map(|request| self.inspect_request(request))
            .collect()
    }

    /// Inspect `bucket`/`key`, never reading more than `size_ceiling_bytes`.
    pub fn inspect_with_ceiling(
        &self,
        bucket: &str,
        key: &str,
        size_ceiling_bytes: u64,
    ) -> StructureResult {
        let location = ObjectLocation::new(bucket, key).normalized();
        let mut progress = Progress::default();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.run(&location, size_ceiling_bytes, &mut progress)
        }))
        .unwrap_or_else(|payload| Err(InspectionError::Internal(panic_message(payload))));

        let ctx = InspectionContext {
            location,
            format: progress.format,
        };
        match outcome {
            Ok(result) => {
                if let Some(obs) = self.opts.observer.as_ref() {
                    let stats = InspectionStats {
                        file_size_bytes: result.file_size_bytes,
                        columns: result.columns.len(),
                        row_count_estimate: result.row_count_estimate,
                    };
                    obs.on_success(&ctx, stats);
                }
                result
            }
            Err(e) => {
                if let Some(obs) = self.opts.observer.as_ref() {
                    let sev = InspectionSeverity::for_error(&e);
                    obs.on_failure(&ctx, sev, &e);
                    if sev >= self.opts.alert_at_or_above {
                        obs.on_alert(&ctx, sev, &e);
                    }
                }
                StructureResult::failure(&e, progress.file_size_bytes)
            }
        }
    }

    fn run(
        &self,
        location: &ObjectLocation,
        ceiling: u64,
        progress: &mut Progress,
    ) -> InspectionResult<StructureResult> {
        if location.bucket.trim().is_empty() {
            return Err(InspectionError::Configuration {
                message: "no bucket configured for inspection".to_string(),
            });
        }
        if location.key.trim().is_empty() {
            return Err(InspectionError::Validation {
                message: "object key is required".to_string(),
            });
        }

        let meta = self
            .store
            .head(location)
            .map_err(InspectionError::from_probe)?;
        progress.file_size_bytes = meta.size_bytes;
        if meta.size_bytes > ceiling {
            return Err(InspectionError::FileTooLarge {
                size: meta.size_bytes,
                ceiling,
            });
        }
        if meta.size_bytes == 0 {
            return Err(InspectionError::EmptyFile);
        }

        let head_len = self.opts.head_bytes.clamp(1, meta.size_bytes);
        let head = self.read_prefix(location, head_len)?;
        let head_is_whole = head.len() as u64 >= meta.size_bytes;

        let format = classify(&head, &location.key, &meta);
        progress.format = Some(format);

        let table = match format {
            FormatTag::DelimitedText(separator) => {
                let cap = self
                    .opts
                    .delimited_download_cap_bytes
                    .clamp(1, meta.size_bytes);
                let sample = if head_is_whole || cap <= head.len() as u64 {
                    let mut head = head;
                    head.truncate(usize::try_from(cap).unwrap_or(usize::MAX));
                    head
                } else {
                    self.read_prefix(location, cap)?
                };
                parse_delimited(&sample, separator, meta.size_bytes)?
            }
            FormatTag::SpreadsheetModern => self.parse_workbook(
                location,
                head,
                head_is_whole,
                &meta,
                ceiling,
                WorkbookKind::Modern,
            )?,
            FormatTag::SpreadsheetLegacy => self.parse_workbook(
                location,
                head,
                head_is_whole,
                &meta,
                ceiling,
                WorkbookKind::Legacy,
            )?,
            FormatTag::Unsupported => {
                return Err(InspectionError::UnsupportedFormat {
                    message: format!(
                        "'{}' is neither delimited text nor a spreadsheet (content-type: {})",
                        location.key,
                        meta.content_type.as_deref().unwrap_or("unknown")
                    ),
                });
            }
        };

        Ok(StructureResult::success(format, meta.size_bytes, table))
    }

    fn parse_workbook(
        &self,
        location: &ObjectLocation,
        head: Vec<u8>,
        head_is_whole: bool,
        meta: &ObjectMetadata,
        ceiling: u64,
        kind: WorkbookKind,
    ) -> InspectionResult<TableStructure> {
        let bytes = if head_is_whole {
            head
        } else {
            self.store
                .get(location)
                .map_err(InspectionError::from_download)?
        };
        // The object may have been replaced since the probe.
        if bytes.len() as u64 > ceiling {
            return Err(InspectionError::FileTooLarge {
                size: bytes.len() as u64,
                ceiling,
            });
        }
        parse_spreadsheet(bytes, kind, meta.size_bytes)
    }

    /// First `len` bytes of the object.
    fn read_prefix(&self, location: &ObjectLocation, len: u64) -> InspectionResult<Vec<u8>> {
        let Some(end_inclusive) = len.checked_sub(1) else {
            return Ok(Vec::new());
        };
        let mut bytes = self
            .store
            .get_range(location, 0, end_inclusive)
            .map_err(InspectionError::from_download)?;
        bytes.truncate(usize::try_from(len).unwrap_or(usize::MAX));
        Ok(bytes)
    }
}

fn classify(head: &[u8], key: &str, meta: &ObjectMetadata) -> FormatTag {
    match detect_format(head, key, meta.content_type.as_deref()) {
        FileFormat::DelimitedText => FormatTag::DelimitedText(detect_separator(head)),
        FileFormat::SpreadsheetModern => FormatTag::SpreadsheetModern,
        FileFormat::SpreadsheetLegacy => FormatTag::SpreadsheetLegacy,
        FileFormat::Unsupported => FormatTag::Unsupported,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("unexpected failure during inspection: {detail}")
}
