pub mod banner;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod data_uri;
pub mod logging;
pub mod ocr;
pub mod presenter;
pub mod validation;
