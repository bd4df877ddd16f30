use crate::models::config::LanguageOption;
use crate::models::selected_file::{FileInfo, SelectedFile};
use crate::models::ui_state::UiState;
use crate::services::controller::IntakeController;
use crate::services::ocr::HttpRecognitionEngine;
use crate::services::presenter::UiPresenter;
use base64::Engine as _;
use serde::Deserialize;
use std::path::PathBuf;
use tauri::{AppHandle, Emitter, State};

/// Event carrying every UI state snapshot to the webview
pub const UI_STATE_EVENT: &str = "ui:state";

/// Shared controller instance
pub struct IntakeState(pub IntakeController);

/// OCR server client, kept for health checks
pub struct EngineState(pub HttpRecognitionEngine);

/// Presenter that forwards snapshots to the frontend as events
pub struct TauriPresenter {
    app: AppHandle,
}

impl TauriPresenter {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl UiPresenter for TauriPresenter {
    fn render(&self, state: &UiState) {
        if let Err(e) = self.app.emit(UI_STATE_EVENT, state) {
            tracing::warn!(error = %e, "failed to emit UI state");
        }
    }
}

/// Content of an accepted file as read by the frontend (File.name, File.type, base64)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub name: String,
    pub mime_type: String,
    pub data_base64: String,
}

impl FilePayload {
    fn into_selected_file(self) -> Result<SelectedFile, String> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&self.data_base64)
            .map_err(|e| format!("Failed to decode base64: {}", e))?;

        Ok(SelectedFile::new(self.name, self.mime_type, bytes))
    }
}

// ============================================================
// Tauri Commands
// ============================================================

#[tauri::command]
pub fn get_ui_state(state: State<'_, IntakeState>) -> UiState {
    state.0.state()
}

#[tauri::command]
pub fn get_languages(state: State<'_, IntakeState>) -> Vec<LanguageOption> {
    state.0.config().recognition.languages.clone()
}

// Async so a rejection banner can schedule its hide timer on the runtime
#[tauri::command]
pub async fn set_language(state: State<'_, IntakeState>, code: String) -> Result<(), String> {
    state.0.set_language(&code).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn drag_enter(state: State<'_, IntakeState>) {
    state.0.drag_enter();
}

#[tauri::command]
pub fn drag_over(state: State<'_, IntakeState>) {
    state.0.drag_over();
}

#[tauri::command]
pub fn drag_leave(state: State<'_, IntakeState>) {
    state.0.drag_leave();
}

/// File chooser selection: checks the first file's metadata.
/// Returns true when the frontend should read it and call `submit_file`.
#[tauri::command]
pub async fn select_files(state: State<'_, IntakeState>, files: Vec<FileInfo>) -> Result<bool, String> {
    Ok(matches!(state.0.select_files(files), Some(Ok(_))))
}

/// Drop onto the intake zone; clears the highlight even when nothing usable was dropped
#[tauri::command]
pub async fn drop_files(state: State<'_, IntakeState>, files: Vec<FileInfo>) -> Result<bool, String> {
    Ok(matches!(state.0.drop_files(files), Some(Ok(_))))
}

/// Content of a file accepted by `select_files` or `drop_files`.
/// Returns the job id, or None when the content was rejected (banner shown).
#[tauri::command]
pub async fn submit_file(
    state: State<'_, IntakeState>,
    file: FilePayload,
) -> Result<Option<u64>, String> {
    let file = file.into_selected_file()?;
    Ok(state.0.handle_file(file).ok().map(|task| task.id().0))
}

/// Submit a file by filesystem path
#[tauri::command]
pub async fn open_path(state: State<'_, IntakeState>, path: String) -> Result<Option<u64>, String> {
    let outcome = state.0.open_path(&PathBuf::from(path)).await;
    Ok(outcome.ok().map(|task| task.id().0))
}

/// Copy the result text; Ok(false) when there is nothing to copy
#[tauri::command]
pub async fn copy_result(state: State<'_, IntakeState>) -> Result<bool, String> {
    state.0.copy_result().map_err(|e| e.to_string())
}

/// Check OCR server health
#[tauri::command]
pub async fn check_engine_health(state: State<'_, EngineState>) -> Result<bool, String> {
    let engine = state.0.clone();

    match engine.health_check().await {
        Ok(_) => Ok(true),
        Err(e) => {
            tracing::warn!(url = engine.base_url(), error = %e, "OCR server health check failed");
            Ok(false)
        }
    }
}
