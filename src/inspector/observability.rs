use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::InspectionError;
use crate::types::{FormatTag, ObjectLocation};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InspectionSeverity {
    /// The object was reachable but is not inspectable (too large, empty, unsupported).
    Warning,
    /// Inspection failed on the request or the content.
    Error,
    /// Remote-store or internal failure.
    Critical,
}

impl InspectionSeverity {
    /// Severity of a failed inspection.
    pub fn for_error(e: &InspectionError) -> Self {
        match e {
            InspectionError::FileTooLarge { .. }
            | InspectionError::UnsupportedFormat { .. }
            | InspectionError::EmptyFile => Self::Warning,
            InspectionError::Configuration { .. }
            | InspectionError::Validation { .. }
            | InspectionError::NotFound { .. }
            | InspectionError::Csv(_)
            | InspectionError::Spreadsheet(_)
            | InspectionError::Parse { .. } => Self::Error,
            InspectionError::Store(_)
            | InspectionError::Download(_)
            | InspectionError::Internal(_) => Self::Critical,
        }
    }
}

/// Context about an inspection attempt.
#[derive(Debug, Clone)]
pub struct InspectionContext {
    /// Location with the normalized key.
    pub location: ObjectLocation,
    /// Detected format, if detection got that far.
    pub format: Option<FormatTag>,
}

impl InspectionContext {
    fn format_label(&self) -> String {
        self.format
            .map(|f| f.label())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Stats reported on a successful inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectionStats {
    pub file_size_bytes: u64,
    pub columns: usize,
    pub row_count_estimate: u64,
}

/// Observer interface for inspection outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait InspectionObserver: Send + Sync {
    /// Called when inspection succeeds.
    fn on_success(&self, _ctx: &InspectionContext, _stats: InspectionStats) {}

    /// Called when inspection fails.
    fn on_failure(
        &self,
        _ctx: &InspectionContext,
        _severity: InspectionSeverity,
        _error: &InspectionError,
    ) {
    }

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &InspectionContext, severity: InspectionSeverity, error: &InspectionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn InspectionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn InspectionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl InspectionObserver for CompositeObserver {
    fn on_success(&self, ctx: &InspectionContext, stats: InspectionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &InspectionContext, severity: InspectionSeverity, error: &InspectionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &InspectionContext, severity: InspectionSeverity, error: &InspectionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs inspection events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl InspectionObserver for StdErrObserver {
    fn on_success(&self, ctx: &InspectionContext, stats: InspectionStats) {
        eprintln!(
            "[inspect][ok] format={} object={} bytes={} columns={} rows~{}",
            ctx.format_label(),
            ctx.location,
            stats.file_size_bytes,
            stats.columns,
            stats.row_count_estimate
        );
    }

    fn on_failure(&self, ctx: &InspectionContext, severity: InspectionSeverity, error: &InspectionError) {
        eprintln!(
            "[inspect][{:?}] format={} object={} kind={} err={}",
            severity,
            ctx.format_label(),
            ctx.location,
            error.kind(),
            error
        );
    }

    fn on_alert(&self, ctx: &InspectionContext, severity: InspectionSeverity, error: &InspectionError) {
        eprintln!(
            "[ALERT][inspect][{:?}] format={} object={} kind={} err={}",
            severity,
            ctx.format_label(),
            ctx.location,
            error.kind(),
            error
        );
    }
}

/// Appends inspection events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl InspectionObserver for FileObserver {
    fn on_success(&self, ctx: &InspectionContext, stats: InspectionStats) {
        self.append_line(&format!(
            "{} ok format={} object={} bytes={} columns={} rows~{}",
            unix_ts(),
            ctx.format_label(),
            ctx.location,
            stats.file_size_bytes,
            stats.columns,
            stats.row_count_estimate
        ));
    }

    fn on_failure(&self, ctx: &InspectionContext, severity: InspectionSeverity, error: &InspectionError) {
        self.append_line(&format!(
            "{} fail severity={:?} kind={} object={} err={}",
            unix_ts(),
            severity,
            error.kind(),
            ctx.location,
            error
        ));
    }

    fn on_alert(&self, ctx: &InspectionContext, severity: InspectionSeverity, error: &InspectionError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} kind={} object={} err={}",
            unix_ts(),
            severity,
            error.kind(),
            ctx.location,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
