use crate::error::ConfigError;
use crate::models::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager for app settings
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager in the platform config directory
    ///
    /// This will create the config directory if it doesn't exist.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("image-to-text");

        Self::in_dir(config_dir)
    }

    /// Create a ConfigManager rooted at an explicit directory
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config_dir = config_dir.into();
        fs::create_dir_all(&config_dir)?;
        let config_path = config_dir.join("config.json");

        Ok(Self {
            config_dir,
            config_path,
        })
    }

    /// Save configuration to disk
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        config
            .recognition
            .validate()
            .map_err(ConfigError::Invalid)?;

        fs::create_dir_all(&self.config_dir)?;

        // Pretty print for human readability
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, json)?;

        tracing::debug!(path = %self.config_path.display(), "config saved");
        Ok(())
    }

    /// Load configuration from disk
    ///
    /// If config file doesn't exist, returns default configuration
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config
            .recognition
            .validate()
            .map_err(ConfigError::Invalid)?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is unusable
    pub fn load_or_default(&self) -> AppConfig {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %self.config_path.display(), error = %e, "using default config");
                AppConfig::default()
            }
        }
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a manager in a unique temporary directory
    fn create_test_manager() -> ConfigManager {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir().join(format!(
            "image-to-text-test-{}-{}",
            std::process::id(),
            id
        ));
        let _ = fs::remove_dir_all(&temp_dir);

        ConfigManager::in_dir(temp_dir).unwrap()
    }

    fn cleanup_test_files(manager: &ConfigManager) {
        let _ = fs::remove_dir_all(&manager.config_dir);
    }

    #[test]
    fn test_in_dir_creates_directory() {
        let manager = create_test_manager();

        assert!(manager.config_dir.exists());
        assert!(manager.config_file_path().ends_with("config.json"));

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_config_load_default_when_not_exists() {
        let manager = create_test_manager();
        assert!(!manager.config_exists());

        let config = manager.load().unwrap();
        assert_eq!(config, AppConfig::default());

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_config_save_and_load() {
        let manager = create_test_manager();

        let mut config = AppConfig::default();
        config.recognition.default_language = "tur".to_string();
        config.banners.reset_timer_on_show = false;
        config.intake.max_file_bytes = 2048;

        manager.save(&config).unwrap();
        assert!(manager.config_exists());

        let loaded = manager.load().unwrap();
        assert_eq!(loaded, config);

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_save_rejects_invalid_language_setup() {
        let manager = create_test_manager();

        let mut config = AppConfig::default();
        config.recognition.default_language = "klingon".to_string();

        let result = manager.save(&config);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        assert!(!manager.config_exists());

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_corrupt_file_is_parse_error_and_falls_back() {
        let manager = create_test_manager();
        fs::write(manager.config_file_path(), "{ not json").unwrap();

        assert!(matches!(manager.load(), Err(ConfigError::Parse(_))));
        assert_eq!(manager.load_or_default(), AppConfig::default());

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_config_overwrite() {
        let manager = create_test_manager();

        let mut first = AppConfig::default();
        first.banners.error_ms = 1000;
        manager.save(&first).unwrap();

        let mut second = AppConfig::default();
        second.banners.error_ms = 7000;
        manager.save(&second).unwrap();

        assert_eq!(manager.load().unwrap().banners.error_ms, 7000);

        cleanup_test_files(&manager);
    }
}
