use crate::error::{ClipboardError, EngineError, IntakeError};
use crate::models::config::AppConfig;
use crate::models::recognition::{JobId, JobOutcome, ProgressEvent, RecognitionJob, RecognitionOutput};
use crate::models::selected_file::{FileInfo, SelectedFile};
use crate::models::ui_state::{Banner, BannerKind, ControllerPhase, Panel, UiState};
use crate::services::banner::{hide_after, BannerSlot, BannerTicket};
use crate::services::clipboard::ClipboardWriter;
use crate::services::data_uri;
use crate::services::ocr::{ProgressSink, RecognitionEngine};
use crate::services::presenter::UiPresenter;
use crate::services::validation::validate_file;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Mutable controller state; the single source of truth for the UI
struct ControllerState {
    ui: UiState,
    banners: BannerSlot,
    next_job_id: u64,
    /// Submission whose callbacks may still touch the UI
    current: Option<JobId>,
    job: Option<RecognitionJob>,
}

impl ControllerState {
    fn snapshot(&self) -> UiState {
        let mut ui = self.ui.clone();
        ui.banner = self.banners.current().cloned();
        ui
    }

    /// Snapshot of a change about to be rendered
    fn publish(&mut self) -> UiState {
        self.ui.revision += 1;
        self.snapshot()
    }

    fn is_current(&self, id: JobId) -> bool {
        self.current == Some(id)
    }
}

struct ControllerInner {
    state: Mutex<ControllerState>,
    config: AppConfig,
    engine: Arc<dyn RecognitionEngine>,
    presenter: Arc<dyn UiPresenter>,
    clipboard: Arc<dyn ClipboardWriter>,
    /// Revision of the last snapshot handed to the presenter
    rendered: Mutex<u64>,
}

/// Handle to a submission's background work (data URI read + recognition)
#[derive(Debug)]
pub struct RecognitionTask {
    id: JobId,
    handle: JoinHandle<()>,
}

impl RecognitionTask {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Wait for the job's callbacks to run to completion
    pub async fn finished(self) {
        if let Err(e) = self.handle.await {
            error!(job = %self.id, error = %e, "recognition task aborted");
        }
    }
}

/// Intake & recognition controller.
///
/// Accepts files, validates them, drives one recognition job at a time and
/// publishes every UI change to the presenter. Cloning shares the same state.
#[derive(Clone)]
pub struct IntakeController {
    inner: Arc<ControllerInner>,
}

impl IntakeController {
    pub fn new(
        config: AppConfig,
        engine: Arc<dyn RecognitionEngine>,
        presenter: Arc<dyn UiPresenter>,
        clipboard: Arc<dyn ClipboardWriter>,
    ) -> Self {
        let ui = UiState::new(config.recognition.default_language.clone());
        let state = ControllerState {
            ui,
            banners: BannerSlot::default(),
            next_job_id: 0,
            current: None,
            job: None,
        };

        let controller = Self {
            inner: Arc::new(ControllerInner {
                state: Mutex::new(state),
                config,
                engine,
                presenter,
                clipboard,
                rendered: Mutex::new(0),
            }),
        };
        controller.inner.render_now();
        controller
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Current UI snapshot
    pub fn state(&self) -> UiState {
        self.inner.state.lock().snapshot()
    }

    /// The most recent recognition job, if one has started
    pub fn current_job(&self) -> Option<RecognitionJob> {
        self.inner.state.lock().job.clone()
    }

    pub fn language(&self) -> String {
        self.inner.state.lock().ui.language.clone()
    }

    /// Select the language used by subsequent submissions
    pub fn set_language(&self, code: &str) -> Result<(), IntakeError> {
        if !self.inner.config.recognition.supports(code) {
            warn!(language = code, "rejected unsupported language");
            let e = IntakeError::UnsupportedLanguage(code.to_string());
            self.inner.show_banner(Banner::error(self.inner.intake_message(&e)));
            return Err(e);
        }

        self.inner.update(|state| {
            state.ui.language = code.to_string();
        });
        debug!(language = code, "language selected");
        Ok(())
    }

    pub fn drag_enter(&self) {
        self.inner.set_drag_active(true);
    }

    pub fn drag_over(&self) {
        self.inner.set_drag_active(true);
    }

    pub fn drag_leave(&self) {
        self.inner.set_drag_active(false);
    }

    /// Drop onto the intake zone. Always clears the drag highlight, then
    /// checks the first file like [`select_files`](Self::select_files).
    pub fn drop_files(&self, files: Vec<FileInfo>) -> Option<Result<FileInfo, IntakeError>> {
        self.inner.set_drag_active(false);
        self.select_files(files)
    }

    /// File chooser selection. Only the first file is checked; its content
    /// should be read and passed to [`handle_file`](Self::handle_file) only
    /// when this returns `Some(Ok(_))`.
    pub fn select_files(&self, files: Vec<FileInfo>) -> Option<Result<FileInfo, IntakeError>> {
        if files.len() > 1 {
            debug!(count = files.len(), "multiple files selected, using the first");
        }
        let file = files.into_iter().next()?;
        Some(self.check_file(&file).map(|()| file))
    }

    /// Validate file metadata; a rejection shows its error banner
    pub fn check_file(&self, file: &FileInfo) -> Result<(), IntakeError> {
        validate_file(file, &self.inner.config.intake).map_err(|e| {
            warn!(file = %file.name, mime = %file.mime_type, size = file.size, error = %e, "file rejected");
            self.inner.show_banner(Banner::error(self.inner.intake_message(&e)));
            e
        })
    }

    /// Read a file from disk and submit it
    pub async fn open_path(&self, path: &Path) -> Result<RecognitionTask, IntakeError> {
        match data_uri::load_file(path).await {
            Ok(file) => self.handle_file(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read file");
                self.inner
                    .show_banner(Banner::error(self.inner.config.messages.read_failed.clone()));
                Err(e)
            }
        }
    }

    /// Validate a read file and, if accepted, start its recognition job.
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle_file(&self, file: SelectedFile) -> Result<RecognitionTask, IntakeError> {
        self.check_file(&file.info())?;

        let (id, language) = self.inner.update(|state| {
            state.banners.clear();
            state.next_job_id += 1;
            let id = JobId(state.next_job_id);
            state.current = Some(id);
            (id, state.ui.language.clone())
        });

        match data_uri::image_dimensions(&file.bytes) {
            Some((w, h)) => info!(job = %id, file = %file.name, width = w, height = h, "file accepted"),
            None => info!(job = %id, file = %file.name, "file accepted"),
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            inner.run_job(id, language, file).await;
        });

        Ok(RecognitionTask { id, handle })
    }

    /// Copy the current result text to the clipboard.
    ///
    /// Returns `Ok(false)` when there is no result text to copy.
    pub fn copy_result(&self) -> Result<bool, ClipboardError> {
        let text = {
            let state = self.inner.state.lock();
            match &state.ui.panel {
                Panel::Result { text } if !text.is_empty() => text.clone(),
                _ => {
                    debug!("copy requested without result text");
                    return Ok(false);
                }
            }
        };

        match self.inner.clipboard.write_text(&text) {
            Ok(()) => {
                info!(chars = text.chars().count(), "result copied to clipboard");
                self.inner
                    .show_banner(Banner::success(self.inner.config.messages.copied.clone()));
                Ok(true)
            }
            Err(e) => {
                error!(error = %e, "clipboard write failed");
                self.inner
                    .show_banner(Banner::error(self.inner.config.messages.copy_failed.clone()));
                Err(e)
            }
        }
    }
}

impl ControllerInner {
    /// Hand a snapshot to the presenter unless a newer one already went out.
    ///
    /// Snapshots are taken under the state lock but rendered after it is
    /// released, so two threads may get here in reverse order.
    fn render(&self, snapshot: UiState) {
        let mut rendered = self.rendered.lock();
        if snapshot.revision <= *rendered {
            debug!(revision = snapshot.revision, latest = *rendered, "skipping outdated snapshot");
            return;
        }
        *rendered = snapshot.revision;
        self.presenter.render(&snapshot);
    }

    fn render_now(&self) {
        let snapshot = self.state.lock().publish();
        self.render(snapshot);
    }

    /// Mutate state and render the result
    fn update<R>(&self, f: impl FnOnce(&mut ControllerState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.state.lock();
            let result = f(&mut state);
            (result, state.publish())
        };
        self.render(snapshot);
        result
    }

    /// Mutate state only if `id` is still the current submission
    fn update_if_current(&self, id: JobId, f: impl FnOnce(&mut ControllerState)) -> bool {
        let snapshot = {
            let mut state = self.state.lock();
            if !state.is_current(id) {
                return false;
            }
            f(&mut state);
            state.publish()
        };
        self.render(snapshot);
        true
    }

    fn set_drag_active(&self, active: bool) {
        let snapshot = {
            let mut state = self.state.lock();
            if state.ui.drag_active == active {
                return;
            }
            state.ui.drag_active = active;
            state.publish()
        };
        self.render(snapshot);
    }

    fn intake_message(&self, error: &IntakeError) -> String {
        let messages = &self.config.messages;
        match error {
            IntakeError::InvalidType { .. } => messages.invalid_type.clone(),
            IntakeError::TooLarge { max, .. } => messages.too_large_label(*max),
            IntakeError::Read(_) => messages.read_failed.clone(),
            IntakeError::UnsupportedLanguage(_) => messages.unsupported_language.clone(),
        }
    }

    fn show_banner(self: &Arc<Self>, banner: Banner) {
        let kind = banner.kind;
        let ticket = self.update(|state| state.banners.show(banner));
        self.schedule_hide(kind, ticket);
    }

    fn schedule_hide(self: &Arc<Self>, kind: BannerKind, ticket: BannerTicket) {
        let delay = hide_after(kind, &self.config.banners);
        let reset_on_show = self.config.banners.reset_timer_on_show;
        let inner = Arc::clone(self);

        tokio::spawn(async move {
            sleep(delay).await;
            let snapshot = {
                let mut state = inner.state.lock();
                if !state.banners.expire(ticket, reset_on_show) {
                    return;
                }
                state.publish()
            };
            inner.render(snapshot);
        });
    }

    async fn run_job(self: Arc<Self>, id: JobId, language: String, file: SelectedFile) {
        let image = match data_uri::read_as_data_uri(&file).await {
            Ok(uri) => uri,
            Err(e) => {
                error!(job = %id, error = %e, "failed to read file into data URI");
                if self.state.lock().is_current(id) {
                    self.show_banner(Banner::error(self.config.messages.read_failed.clone()));
                }
                return;
            }
        };
        drop(file);

        let preview = image.clone();
        let shown = self.update_if_current(id, move |state| {
            state.ui.preview = Some(preview);
            state.ui.phase = ControllerPhase::PreviewShown;
        });
        if !shown {
            debug!(job = %id, "discarding stale submission before recognition");
            return;
        }

        let label = self.config.messages.progress_label(0);
        let job_language = language.clone();
        let started = self.update_if_current(id, move |state| {
            state.ui.panel = Panel::Progress { percent: 0, label };
            state.ui.phase = ControllerPhase::Recognizing;
            state.job = Some(RecognitionJob::new(id, job_language));
        });
        if !started {
            debug!(job = %id, "discarding stale submission before recognition");
            return;
        }

        info!(job = %id, engine = self.engine.name(), language = %language, "recognition started");

        let observer = Arc::clone(&self);
        let progress: ProgressSink =
            Arc::new(move |event: ProgressEvent| observer.on_progress(id, event));
        let result = self.engine.recognize(&image, &language, progress).await;

        self.finish(id, result);
    }

    fn on_progress(&self, id: JobId, event: ProgressEvent) {
        if !event.is_recognizing_text() {
            debug!(job = %id, status = %event.status, progress = event.progress, "engine phase");
            return;
        }

        let percent = event.percent();
        let label = self.config.messages.progress_label(percent);
        let snapshot = {
            let mut state = self.state.lock();
            if !state.is_current(id) || state.ui.phase != ControllerPhase::Recognizing {
                debug!(job = %id, percent, "discarding stale progress");
                return;
            }
            if let Some(job) = state.job.as_mut() {
                job.progress = event.progress;
            }
            state.ui.panel = Panel::Progress { percent, label };
            state.publish()
        };
        self.render(snapshot);
    }

    fn finish(self: &Arc<Self>, id: JobId, result: Result<RecognitionOutput, EngineError>) {
        let messages = &self.config.messages;
        let engine = self.engine.name();

        let applied = {
            let mut state = self.state.lock();
            if !state.is_current(id) {
                None
            } else {
                let (outcome, phase, panel, banner) = match &result {
                    Ok(output) => match output.usable_text() {
                        Some(text) => (
                            JobOutcome::SucceededWithText,
                            ControllerPhase::SucceededWithText,
                            Panel::Result {
                                text: text.to_string(),
                            },
                            Banner::success(messages.extracted.clone()),
                        ),
                        // The result container is still shown, with the error banner on top
                        None => (
                            JobOutcome::SucceededEmpty,
                            ControllerPhase::SucceededEmpty,
                            Panel::Result {
                                text: String::new(),
                            },
                            Banner::error(messages.no_text.clone()),
                        ),
                    },
                    Err(_) => (
                        JobOutcome::Failed,
                        ControllerPhase::Failed,
                        Panel::Hidden,
                        Banner::error(messages.engine_failed.clone()),
                    ),
                };

                if let Some(job) = state.job.as_mut() {
                    job.outcome = outcome;
                }
                state.ui.phase = phase;
                state.ui.panel = panel;
                let kind = banner.kind;
                let ticket = state.banners.show(banner);
                let elapsed_ms = state.job.as_ref().map(|j| j.elapsed_ms());
                Some((kind, ticket, state.publish(), elapsed_ms))
            }
        };

        let Some((kind, ticket, snapshot, elapsed_ms)) = applied else {
            debug!(job = %id, "discarding stale recognition result");
            return;
        };

        match &result {
            Ok(output) => info!(
                job = %id,
                engine,
                chars = output.text.trim().chars().count(),
                elapsed_ms = elapsed_ms.unwrap_or_default(),
                "recognition finished"
            ),
            Err(e) => error!(job = %id, engine, error = %e, "recognition failed"),
        }

        self.render(snapshot);
        self.schedule_hide(kind, ticket);
    }
}
