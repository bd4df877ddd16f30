pub mod engine;
pub mod http_ocr;

// Re-export main types
pub use engine::{ProgressSink, RecognitionEngine};
pub use http_ocr::HttpRecognitionEngine;
