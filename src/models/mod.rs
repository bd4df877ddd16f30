pub mod config;
pub mod recognition;
pub mod selected_file;
pub mod ui_state;
