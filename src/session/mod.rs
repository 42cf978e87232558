//! Per-file orchestration.
//!
//! A [`FileSession`] owns one upload's table and walks it through
//! `Loaded → Cleaned → Done`, with the numeric summary and the export as independent optional
//! branches off `Cleaned`. Any error moves the session to `Failed` and is kept on the session;
//! it never reaches sibling sessions. [`process_uploads`] runs a batch, one file at a time.

mod observer;

use std::fmt;
use std::sync::Arc;

use crate::error::{ConvertError, ConvertResult};
use crate::export::{self, ExportResult};
use crate::ingestion::{load_format, UploadedFile};
use crate::preview::{Preview, DEFAULT_PREVIEW_ROWS};
use crate::processing::{run_pipeline_inspect, summary, CleaningOptions, NumericTable, StageReport};
use crate::types::Table;

pub use observer::{
    severity_for_error, CompositeObserver, FileObserver, LoadStats, SessionContext, SessionObserver,
    SessionSeverity, StdErrObserver,
};

/// Lifecycle state of a [`FileSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// The upload decoded into a table.
    Loaded,
    /// The cleaning pipeline ran; summary and export are available.
    Cleaned,
    /// All requested steps completed.
    Done,
    /// An error ended the session.
    Failed,
}

/// Options shared by every session in a batch.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct SessionOptions {
    /// Rows shown in each [`Preview`].
    pub preview_rows: usize,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn SessionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: SessionSeverity,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("preview_rows", &self.preview_rows)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            observer: None,
            alert_at_or_above: SessionSeverity::Critical,
        }
    }
}

/// One upload plus the choices made for it.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: UploadedFile,
    pub options: CleaningOptions,
}

impl UploadRequest {
    pub fn new(file: UploadedFile, options: CleaningOptions) -> Self {
        Self { file, options }
    }
}

/// Processing state for a single uploaded file.
#[derive(Debug)]
pub struct FileSession {
    ctx: SessionContext,
    options: CleaningOptions,
    settings: SessionOptions,
    state: SessionState,
    table: Option<Table>,
    previews: Vec<Preview>,
    stages: Vec<StageReport>,
    summary: Option<NumericTable>,
    summarized: bool,
    export: Option<ExportResult>,
    failure: Option<ConvertError>,
}

impl FileSession {
    /// Load `file` and start a session for it.
    ///
    /// The upload's bytes are read once, here. The returned session is `Loaded`, or `Failed`
    /// when the name has an unsupported extension or the content does not decode.
    pub fn open(file: UploadedFile, options: CleaningOptions, settings: SessionOptions) -> Self {
        let format = file.format().ok();
        let mut session = Self {
            ctx: SessionContext {
                file_name: file.name.clone(),
                format,
            },
            options,
            settings,
            state: SessionState::Loaded,
            table: None,
            previews: Vec::new(),
            stages: Vec::new(),
            summary: None,
            summarized: false,
            export: None,
            failure: None,
        };

        let loaded = file
            .format()
            .and_then(|format| load_format(&file.bytes, format).map(|table| (format, table)));
        match loaded {
            Ok((format, table)) => {
                let stats = LoadStats {
                    rows: table.row_count(),
                    columns: table.column_count(),
                };
                session.notify(|o, ctx| o.on_loaded(ctx, stats));
                session.previews.push(Preview::of(
                    &table,
                    format,
                    None,
                    session.settings.preview_rows,
                ));
                session.table = Some(table);
            }
            Err(e) => {
                session.fail(e);
            }
        }
        session
    }

    /// Run the cleaning pipeline over the loaded table.
    ///
    /// On success the session is `Cleaned` and a preview is recorded for every applied stage.
    /// On failure the session is `Failed` and keeps the loaded table untouched.
    pub fn clean(&mut self) -> ConvertResult<&Table> {
        let table = self.current("clean", SessionState::Loaded)?;
        let file_type = self.ctx.format.unwrap_or_default();
        let preview_rows = self.settings.preview_rows;

        let mut previews = Vec::new();
        let result = run_pipeline_inspect(table, &self.options, |report, t| {
            if report.applied {
                previews.push(Preview::of(t, file_type, Some(report.stage), preview_rows));
            }
        });

        match result {
            Ok(out) => {
                for report in &out.stages {
                    self.notify(|o, ctx| o.on_stage(ctx, report));
                }
                self.stages = out.stages;
                self.previews.extend(previews);
                self.state = SessionState::Cleaned;
                Ok(&*self.table.insert(out.table))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Derive the numeric-only view of the cleaned table.
    ///
    /// `Ok(None)` means there is nothing to summarize.
    pub fn summarize(&mut self) -> ConvertResult<Option<&NumericTable>> {
        let table = self.current("summarize", SessionState::Cleaned)?;
        let projected = summary::project(table);

        self.notify(|o, ctx| o.on_summary(ctx, projected.as_ref()));
        self.summarized = true;
        self.summary = projected;
        Ok(self.summary.as_ref())
    }

    /// Encode the cleaned table in the session's export format.
    pub fn export(&mut self) -> ConvertResult<&ExportResult> {
        let table = self.current("export", SessionState::Cleaned)?;
        match export::export(table, self.options.export_format, &self.ctx.file_name) {
            Ok(result) => {
                self.notify(|o, ctx| o.on_exported(ctx, &result));
                Ok(&*self.export.insert(result))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Mark the session `Done`.
    pub fn finish(&mut self) -> ConvertResult<()> {
        self.current("finish", SessionState::Cleaned)?;
        self.state = SessionState::Done;
        Ok(())
    }

    /// Clean, summarize (if `show_summary`), export and finish.
    ///
    /// Returns the error that failed the session, if any; it is also kept on the session.
    pub fn run(&mut self) -> ConvertResult<()> {
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        self.clean()?;
        if self.options.show_summary {
            self.summarize()?;
        }
        self.export()?;
        self.finish()
    }

    pub fn file_name(&self) -> &str {
        &self.ctx.file_name
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn options(&self) -> &CleaningOptions {
        &self.options
    }

    /// The current table: loaded, or cleaned once `clean` succeeded.
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Previews in the order they were taken (after load, then per applied stage).
    pub fn previews(&self) -> &[Preview] {
        &self.previews
    }

    /// Stage reports from the last successful `clean`.
    pub fn stages(&self) -> &[StageReport] {
        &self.stages
    }

    /// Whether `summarize` ran.
    pub fn summarized(&self) -> bool {
        self.summarized
    }

    pub fn summary(&self) -> Option<&NumericTable> {
        self.summary.as_ref()
    }

    pub fn export_result(&self) -> Option<&ExportResult> {
        self.export.as_ref()
    }

    pub fn failure(&self) -> Option<&ConvertError> {
        self.failure.as_ref()
    }

    /// User-facing message for a failed session.
    pub fn failure_message(&self) -> Option<String> {
        self.failure
            .as_ref()
            .map(|e| format!("Error processing {}: {e}", self.ctx.file_name))
    }

    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    fn current(&self, step: &'static str, expected: SessionState) -> ConvertResult<&Table> {
        match (&self.table, self.state == expected) {
            (Some(table), true) => Ok(table),
            _ => Err(ConvertError::InvalidTransition {
                step,
                state: self.state,
            }),
        }
    }

    fn fail(&mut self, err: ConvertError) -> ConvertError {
        self.state = SessionState::Failed;
        let severity = severity_for_error(&err);
        self.notify(|o, ctx| o.on_failure(ctx, severity, &err));
        if severity >= self.settings.alert_at_or_above {
            self.notify(|o, ctx| o.on_alert(ctx, severity, &err));
        }
        self.failure = Some(err.clone());
        err
    }

    fn notify<F>(&self, f: F)
    where
        F: FnOnce(&dyn SessionObserver, &SessionContext),
    {
        if let Some(obs) = self.settings.observer.as_ref() {
            f(obs.as_ref(), &self.ctx);
        }
    }
}

/// Run every request to completion, one file after another.
///
/// Each file gets its own session; a failure is recorded on that session only.
pub fn process_uploads<I>(requests: I, settings: &SessionOptions) -> Vec<FileSession>
where
    I: IntoIterator<Item = UploadRequest>,
{
    requests
        .into_iter()
        .map(|req| {
            let mut session = FileSession::open(req.file, req.options, settings.clone());
            // The error stays on the session.
            let _ = session.run();
            session
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{FileSession, SessionOptions, SessionState};
    use crate::error::ConvertError;
    use crate::ingestion::UploadedFile;
    use crate::processing::{CleaningOptions, Stage};

    fn csv_upload() -> UploadedFile {
        UploadedFile::new("people.csv", b"id,name,score\n1,Ada,\n2,Grace,87.5\n1,Ada,\n".to_vec())
    }

    #[test]
    fn open_loads_and_previews() {
        let s = FileSession::open(csv_upload(), CleaningOptions::default(), SessionOptions::default());
        assert_eq!(s.state(), SessionState::Loaded);
        assert_eq!(s.table().unwrap().row_count(), 3);
        assert_eq!(s.previews().len(), 1);
        assert_eq!(s.previews()[0].stage, None);
    }

    #[test]
    fn clean_records_a_preview_per_applied_stage() {
        let opts = CleaningOptions {
            remove_duplicates: true,
            fill_missing: Some("0".to_string()),
            ..Default::default()
        };
        let mut s = FileSession::open(csv_upload(), opts, SessionOptions::default());
        assert_eq!(s.clean().unwrap().row_count(), 2);
        assert_eq!(s.state(), SessionState::Cleaned);

        let stages: Vec<_> = s.previews().iter().map(|p| p.stage).collect();
        assert_eq!(stages, vec![None, Some(Stage::Deduplicate), Some(Stage::FillMissing)]);
    }

    #[test]
    fn failed_projection_keeps_loaded_table() {
        let opts = CleaningOptions {
            remove_duplicates: true,
            keep_columns: vec!["nonexistent".to_string()],
            ..Default::default()
        };
        let mut s = FileSession::open(csv_upload(), opts, SessionOptions::default());
        let before = s.table().cloned();

        let err = s.clean().unwrap_err();
        assert!(matches!(err, ConvertError::UnknownColumn { .. }));
        assert_eq!(s.state(), SessionState::Failed);
        assert_eq!(s.table().cloned(), before);
        assert_eq!(s.previews().len(), 1);
        assert!(s
            .failure_message()
            .unwrap()
            .starts_with("Error processing people.csv: unknown column 'nonexistent'"));
    }

    #[test]
    fn steps_out_of_order_are_rejected_without_failing() {
        let mut s = FileSession::open(csv_upload(), CleaningOptions::default(), SessionOptions::default());
        let err = s.export().unwrap_err();
        assert_eq!(
            err,
            ConvertError::InvalidTransition {
                step: "export",
                state: SessionState::Loaded
            }
        );
        assert_eq!(s.state(), SessionState::Loaded);
        assert!(s.failure().is_none());
    }

    #[test]
    fn summary_and_export_are_independent_branches() {
        let mut s = FileSession::open(csv_upload(), CleaningOptions::default(), SessionOptions::default());
        s.clean().unwrap();
        s.export().unwrap();
        let numeric = s.summarize().unwrap().unwrap();
        assert_eq!(numeric.table().column_names(), vec!["id", "score"]);
        s.finish().unwrap();
        assert_eq!(s.state(), SessionState::Done);
        assert!(s.summarized());
        assert_eq!(s.export_result().unwrap().file_name, "people.csv");
    }

    #[test]
    fn run_reports_open_failure() {
        let mut s = FileSession::open(
            UploadedFile::new("notes.txt", b"hello".to_vec()),
            CleaningOptions::default(),
            SessionOptions::default(),
        );
        assert_eq!(s.state(), SessionState::Failed);
        let err = s.run().unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
        assert!(s.table().is_none());
    }
}
