#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use image_to_text_lib::models::config::AppConfig;
use image_to_text_lib::models::recognition::{ProgressEvent, RecognitionOutput};
use image_to_text_lib::models::selected_file::SelectedFile;
use image_to_text_lib::models::ui_state::UiState;
use image_to_text_lib::services::clipboard::ClipboardWriter;
use image_to_text_lib::services::ocr::{ProgressSink, RecognitionEngine};
use image_to_text_lib::services::presenter::UiPresenter;
use image_to_text_lib::{ClipboardError, EngineError, IntakeController};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Scripted behaviour for one `recognize` call
#[derive(Default)]
pub struct Script {
    progress: Vec<ProgressEvent>,
    gate: Option<oneshot::Receiver<()>>,
    after_gate: Vec<ProgressEvent>,
    outcome: Option<Result<String, String>>,
}

impl Script {
    pub fn text(text: &str) -> Self {
        Self {
            outcome: Some(Ok(text.to_string())),
            ..Self::default()
        }
    }

    pub fn failure(detail: &str) -> Self {
        Self {
            outcome: Some(Err(detail.to_string())),
            ..Self::default()
        }
    }

    pub fn with_progress(mut self, events: Vec<ProgressEvent>) -> Self {
        self.progress = events;
        self
    }

    /// Block the call until the returned sender fires
    pub fn gated(mut self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        self.gate = Some(rx);
        (self, tx)
    }

    pub fn with_progress_after_gate(mut self, events: Vec<ProgressEvent>) -> Self {
        self.after_gate = events;
        self
    }
}

/// Fake engine replaying one script per call, recording (language, image)
#[derive(Default)]
pub struct ScriptedEngine {
    scripts: Mutex<VecDeque<Script>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedEngine {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub fn languages(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(lang, _)| lang.clone()).collect()
    }
}

#[async_trait]
impl RecognitionEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(
        &self,
        image: &str,
        language: &str,
        progress: ProgressSink,
    ) -> Result<RecognitionOutput, EngineError> {
        self.calls
            .lock()
            .push((language.to_string(), image.to_string()));
        let script = self.scripts.lock().pop_front().unwrap_or_default();

        for event in script.progress {
            progress(event);
        }
        if let Some(gate) = script.gate {
            let _ = gate.await;
        }
        for event in script.after_gate {
            progress(event);
        }

        match script.outcome {
            Some(Ok(text)) => Ok(RecognitionOutput::new(text)),
            Some(Err(detail)) => Err(EngineError::Request(detail)),
            None => Ok(RecognitionOutput::new("")),
        }
    }
}

/// Presenter keeping every rendered snapshot
#[derive(Default)]
pub struct RecordingPresenter {
    history: Mutex<Vec<UiState>>,
}

impl RecordingPresenter {
    pub fn history(&self) -> Vec<UiState> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> UiState {
        self.history.lock().last().cloned().unwrap_or_default()
    }
}

impl UiPresenter for RecordingPresenter {
    fn render(&self, state: &UiState) {
        self.history.lock().push(state.clone());
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn failing() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

impl ClipboardWriter for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Unavailable("no display".to_string()));
        }
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub controller: IntakeController,
    pub engine: Arc<ScriptedEngine>,
    pub presenter: Arc<RecordingPresenter>,
    pub clipboard: Arc<RecordingClipboard>,
}

pub fn harness(scripts: Vec<Script>) -> Harness {
    harness_with(AppConfig::default(), scripts, RecordingClipboard::default())
}

pub fn harness_with(config: AppConfig, scripts: Vec<Script>, clipboard: RecordingClipboard) -> Harness {
    let engine = Arc::new(ScriptedEngine::new(scripts));
    let presenter = Arc::new(RecordingPresenter::default());
    let clipboard = Arc::new(clipboard);

    let controller = IntakeController::new(
        config,
        engine.clone(),
        presenter.clone(),
        clipboard.clone(),
    );

    Harness {
        controller,
        engine,
        presenter,
        clipboard,
    }
}

pub fn png_bytes() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 255, 255])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn png_file(name: &str) -> SelectedFile {
    SelectedFile::new(name, "image/png", png_bytes())
}

/// Let spawned tasks run after a clock change
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
