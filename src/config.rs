use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable holding the Gemini API key unless overridden.
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub gemini: GeminiConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

/// Generation client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable the API key is read from.
    pub api_key_env: String,
    /// Request timeout. Unset means the HTTP client's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    /// Read the API key from the configured environment variable.
    /// Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/socialsync/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &std::path::Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Directory for logs and other runtime files.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("socialsync"))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("socialsync").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.tui.tick_rate_ms, 50);
        assert!(!config.tui.mouse_enabled);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.api_key_env, "API_KEY");
        assert!(config.gemini.timeout_secs.is_none());
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = AppConfig::load_from(std::path::Path::new("/nonexistent/socialsync.toml"));
        assert_eq!(config.tui.tick_rate_ms, 50);
    }

    #[test]
    fn test_config_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[gemini]\nmodel = \"gemini-2.5-pro\"\ntimeout_secs = 30\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.timeout_secs, Some(30));
        // Unspecified fields keep defaults
        assert_eq!(config.gemini.api_key_env, "API_KEY");
        assert_eq!(config.tui.tick_rate_ms, 50);
    }

    #[test]
    fn test_config_load_garbage_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_resolve_api_key_from_custom_env() {
        let config = GeminiConfig {
            api_key_env: "SOCIALSYNC_TEST_KEY_PRESENT".to_string(),
            ..Default::default()
        };
        std::env::set_var("SOCIALSYNC_TEST_KEY_PRESENT", "  AIzaTest  ");
        assert_eq!(config.resolve_api_key().as_deref(), Some("AIzaTest"));
        std::env::remove_var("SOCIALSYNC_TEST_KEY_PRESENT");
    }

    #[test]
    fn test_resolve_api_key_blank_or_missing() {
        let config = GeminiConfig {
            api_key_env: "SOCIALSYNC_TEST_KEY_BLANK".to_string(),
            ..Default::default()
        };
        std::env::set_var("SOCIALSYNC_TEST_KEY_BLANK", "   ");
        assert!(config.resolve_api_key().is_none());
        std::env::remove_var("SOCIALSYNC_TEST_KEY_BLANK");
        assert!(config.resolve_api_key().is_none());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.tui.tick_rate_ms, config.tui.tick_rate_ms);
        assert_eq!(deserialized.gemini.base_url, config.gemini.base_url);
    }
}
