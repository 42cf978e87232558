use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConvertError;
use crate::export::ExportResult;
use crate::format::TableFormat;
use crate::processing::{NumericTable, StageReport};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionSeverity {
    /// The user supplied something unusable (wrong extension, unknown column).
    Warning,
    /// The file could not be decoded or encoded.
    Error,
    /// The session was driven incorrectly by its caller.
    Critical,
}

/// Severity assigned to a session failure.
pub fn severity_for_error(e: &ConvertError) -> SessionSeverity {
    match e {
        ConvertError::UnsupportedFormat { .. } | ConvertError::UnknownColumn { .. } => {
            SessionSeverity::Warning
        }
        ConvertError::ParseError { .. }
        | ConvertError::SerializationError { .. }
        | ConvertError::SchemaMismatch { .. } => SessionSeverity::Error,
        ConvertError::InvalidTransition { .. } => SessionSeverity::Critical,
    }
}

/// Which file an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Upload name.
    pub file_name: String,
    /// Format implied by the name, if recognized.
    pub format: Option<TableFormat>,
}

/// Shape of a freshly loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub columns: usize,
}

/// Observer interface for session progress.
///
/// Implementors can record metrics, logs, or trigger alerts. Every method defaults to a no-op.
pub trait SessionObserver: Send + Sync {
    /// Called when the upload decoded into a table.
    fn on_loaded(&self, _ctx: &SessionContext, _stats: LoadStats) {}

    /// Called once per pipeline stage, applied or skipped.
    fn on_stage(&self, _ctx: &SessionContext, _report: &StageReport) {}

    /// Called after the numeric projection; `None` means no numeric columns.
    fn on_summary(&self, _ctx: &SessionContext, _summary: Option<&NumericTable>) {}

    /// Called when an export buffer is ready.
    fn on_exported(&self, _ctx: &SessionContext, _result: &ExportResult) {}

    /// Called when the session fails.
    fn on_failure(&self, _ctx: &SessionContext, _severity: SessionSeverity, _error: &ConvertError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &SessionContext, severity: SessionSeverity, error: &ConvertError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn SessionObserver>>) -> Self {
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

impl SessionObserver for CompositeObserver {
    fn on_loaded(&self, ctx: &SessionContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_loaded(ctx, stats);
        }
    }

    fn on_stage(&self, ctx: &SessionContext, report: &StageReport) {
        for o in &self.observers {
            o.on_stage(ctx, report);
        }
    }

    fn on_summary(&self, ctx: &SessionContext, summary: Option<&NumericTable>) {
        for o in &self.observers {
            o.on_summary(ctx, summary);
        }
    }

    fn on_exported(&self, ctx: &SessionContext, result: &ExportResult) {
        for o in &self.observers {
            o.on_exported(ctx, result);
        }
    }

    fn on_failure(&self, ctx: &SessionContext, severity: SessionSeverity, error: &ConvertError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &SessionContext, severity: SessionSeverity, error: &ConvertError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs session events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl SessionObserver for StdErrObserver {
    fn on_loaded(&self, ctx: &SessionContext, stats: LoadStats) {
        eprintln!(
            "[session][loaded] file={} format={:?} rows={} columns={}",
            ctx.file_name, ctx.format, stats.rows, stats.columns
        );
    }

    fn on_stage(&self, ctx: &SessionContext, report: &StageReport) {
        if report.applied {
            eprintln!(
                "[session][stage] file={} stage={:?} rows={}->{} columns={}->{} affected={}",
                ctx.file_name,
                report.stage,
                report.rows_before,
                report.rows_after,
                report.columns_before,
                report.columns_after,
                report.affected
            );
        }
    }

    fn on_summary(&self, ctx: &SessionContext, summary: Option<&NumericTable>) {
        match summary {
            Some(n) => eprintln!(
                "[session][summary] file={} numeric_columns={}",
                ctx.file_name,
                n.table().column_count()
            ),
            None => eprintln!("[session][summary] file={} no numeric data", ctx.file_name),
        }
    }

    fn on_exported(&self, ctx: &SessionContext, result: &ExportResult) {
        eprintln!(
            "[session][exported] file={} output={} bytes={}",
            ctx.file_name,
            result.file_name,
            result.bytes.len()
        );
    }

    fn on_failure(&self, ctx: &SessionContext, severity: SessionSeverity, error: &ConvertError) {
        eprintln!(
            "[session][{:?}] file={} format={:?} err={}",
            severity, ctx.file_name, ctx.format, error
        );
    }

    fn on_alert(&self, ctx: &SessionContext, severity: SessionSeverity, error: &ConvertError) {
        eprintln!(
            "[ALERT][session][{:?}] file={} format={:?} err={}",
            severity, ctx.file_name, ctx.format, error
        );
    }
}

/// Appends session events to a local log file.
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

impl SessionObserver for FileObserver {
    fn on_loaded(&self, ctx: &SessionContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} loaded file={} rows={} columns={}",
            unix_ts(),
            ctx.file_name,
            stats.rows,
            stats.columns
        ));
    }

    fn on_stage(&self, ctx: &SessionContext, report: &StageReport) {
        if report.applied {
            self.append_line(&format!(
                "{} stage file={} stage={:?} rows={} columns={} affected={}",
                unix_ts(),
                ctx.file_name,
                report.stage,
                report.rows_after,
                report.columns_after,
                report.affected
            ));
        }
    }

    fn on_exported(&self, ctx: &SessionContext, result: &ExportResult) {
        self.append_line(&format!(
            "{} exported file={} output={} media_type={} bytes={}",
            unix_ts(),
            ctx.file_name,
            result.file_name,
            result.media_type,
            result.bytes.len()
        ));
    }

    fn on_failure(&self, ctx: &SessionContext, severity: SessionSeverity, error: &ConvertError) {
        self.append_line(&format!(
            "{} fail severity={:?} file={} err={}",
            unix_ts(),
            severity,
            ctx.file_name,
            error
        ));
    }

    fn on_alert(&self, ctx: &SessionContext, severity: SessionSeverity, error: &ConvertError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} file={} err={}",
            unix_ts(),
            severity,
            ctx.file_name,
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
