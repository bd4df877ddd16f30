use thiserror::Error;

/// Rejections raised before a recognition job is created
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("unsupported file type '{mime_type}'")]
    InvalidType { mime_type: String },

    #[error("file is {size} bytes, limit is {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("unsupported language '{0}'")]
    UnsupportedLanguage(String),

    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
}

/// Failures reported by a recognition engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("OCR server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Response(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Response(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write clipboard: {0}")]
    Write(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    NoConfigDir,

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
