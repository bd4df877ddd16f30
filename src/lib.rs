#[cfg(feature = "desktop")]
mod commands;
pub mod error;
pub mod models;
pub mod services;

pub use error::{ClipboardError, ConfigError, EngineError, IntakeError};
pub use services::controller::{IntakeController, RecognitionTask};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::config::{get_config_path, init_config_manager, load_config, save_config};
    use commands::intake::{
        check_engine_health, copy_result, drag_enter, drag_leave, drag_over, drop_files,
        get_languages, get_ui_state, open_path, select_files, set_language, submit_file,
        EngineState, IntakeState, TauriPresenter,
    };
    use services::clipboard::SystemClipboard;
    use services::ocr::HttpRecognitionEngine;
    use std::sync::Arc;
    use tauri::Manager;

    // Initialize config manager
    let config_manager = init_config_manager().expect("Failed to initialize config manager");
    let config = config_manager
        .lock()
        .map(|manager| manager.load_or_default())
        .unwrap_or_default();

    services::logging::init(&config.logging);
    tracing::info!(engine_url = %config.recognition.engine_url, "starting image-to-text");

    let engine =
        HttpRecognitionEngine::new(&config.recognition).expect("Failed to create OCR client");

    tauri::Builder::default()
        .manage(config_manager)
        .setup(move |app| {
            let presenter = Arc::new(TauriPresenter::new(app.handle().clone()));
            let controller = IntakeController::new(
                config,
                Arc::new(engine.clone()),
                presenter,
                Arc::new(SystemClipboard::new()),
            );
            app.manage(IntakeState(controller));
            app.manage(EngineState(engine));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_ui_state,
            get_languages,
            set_language,
            drag_enter,
            drag_over,
            drag_leave,
            select_files,
            submit_file,
            drop_files,
            open_path,
            copy_result,
            check_engine_health,
            load_config,
            save_config,
            get_config_path
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
