use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One entry of the language selector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageOption {
    /// Engine language code (Tesseract-style, e.g. "eng")
    pub code: String,
    pub label: String,
}

impl LanguageOption {
    pub fn new(code: &str, label: &str) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
        }
    }
}

/// Recognition engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Base URL of the OCR server
    pub engine_url: String,
    pub request_timeout_secs: u64,
    pub default_language: String,
    pub languages: Vec<LanguageOption>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            engine_url: "http://127.0.0.1:39835".to_string(),
            request_timeout_secs: 60,
            default_language: "eng".to_string(),
            languages: vec![
                LanguageOption::new("eng", "English"),
                LanguageOption::new("tur", "Türkçe"),
                LanguageOption::new("deu", "Deutsch"),
                LanguageOption::new("fra", "Français"),
                LanguageOption::new("spa", "Español"),
                LanguageOption::new("ita", "Italiano"),
                LanguageOption::new("rus", "Русский"),
                LanguageOption::new("ara", "العربية"),
            ],
        }
    }
}

impl RecognitionConfig {
    pub fn supports(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l.code == code)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check that the default language is one of the offered languages
    pub fn validate(&self) -> Result<(), String> {
        if self.languages.is_empty() {
            return Err("At least one recognition language must be configured".to_string());
        }
        if !self.supports(&self.default_language) {
            return Err(format!(
                "Default language '{}' is not in the language list",
                self.default_language
            ));
        }
        Ok(())
    }
}

/// File intake limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntakeConfig {
    pub max_file_bytes: u64,
    pub accepted_mime_prefix: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024,
            accepted_mime_prefix: "image/".to_string(),
        }
    }
}

/// Auto-hide timing for transient banners
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BannerConfig {
    pub error_ms: u64,
    pub success_ms: u64,
    /// Showing a banner cancels the pending hide of the previous one
    pub reset_timer_on_show: bool,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            error_ms: 5000,
            success_ms: 3000,
            reset_timer_on_show: true,
        }
    }
}

impl BannerConfig {
    pub fn error_duration(&self) -> Duration {
        Duration::from_millis(self.error_ms)
    }

    pub fn success_duration(&self) -> Duration {
        Duration::from_millis(self.success_ms)
    }
}

/// User-facing texts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MessagesConfig {
    pub invalid_type: String,
    /// `{max}` is replaced with the configured size limit
    pub too_large: String,
    pub unsupported_language: String,
    pub read_failed: String,
    /// `{percent}` is replaced with the whole percent
    pub progress: String,
    pub extracted: String,
    pub no_text: String,
    pub engine_failed: String,
    pub copied: String,
    pub copy_failed: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            invalid_type: "Please choose a valid image file.".to_string(),
            too_large: "The file is too large. The maximum size is {max}.".to_string(),
            unsupported_language: "This language is not supported.".to_string(),
            read_failed: "The file could not be read.".to_string(),
            progress: "{percent}% recognized".to_string(),
            extracted: "Text extracted successfully!".to_string(),
            no_text: "No text was found in the image. Please try a clearer image.".to_string(),
            engine_failed: "An error occurred while extracting text. Please try again.".to_string(),
            copied: "Text copied to clipboard!".to_string(),
            copy_failed: "Could not copy the text to the clipboard.".to_string(),
        }
    }
}

impl MessagesConfig {
    pub fn progress_label(&self, percent: u8) -> String {
        self.progress.replace("{percent}", &percent.to_string())
    }

    pub fn too_large_label(&self, max_bytes: u64) -> String {
        self.too_large.replace("{max}", &format_size(max_bytes))
    }
}

/// Human-readable size limit, e.g. 10485760 -> "10MB"
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::Pretty
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub banners: BannerConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
