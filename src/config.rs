//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILSEAL_CONFIG` (environment variable)
//! 2. `~/.config/mailseal/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailseal\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Codec tuning.
    pub codec: CodecConfig,
    /// Audio capture settings.
    pub audio: AudioConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// Codec tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Deflate compression level, 0 (store) to 9 (best).
    pub compression_level: u32,
    /// Column width for wrapping the payload block (0 = no wrapping).
    pub payload_wrap_width: usize,
}

/// Audio capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Hard ceiling on recording length, in seconds.
    pub max_duration_secs: u64,
    /// Container MIME type requested from the recorder.
    pub capture_mime_type: String,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compression_level: 6,
            payload_wrap_width: 76,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: 10,
            capture_mime_type: "audio/webm".to_string(),
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse
/// error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Path to the configuration file, honoring `$MAILSEAL_CONFIG`.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MAILSEAL_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("mailseal").join("config.toml"))
}

/// Directory for logs, honoring the config override.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .map(|d| d.join("mailseal"))
        .unwrap_or_else(|| PathBuf::from(".mailseal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.codec.compression_level, 6);
        assert_eq!(cfg.codec.payload_wrap_width, 76);
        assert_eq!(cfg.audio.max_duration_secs, 10);
        assert_eq!(cfg.audio.capture_mime_type, "audio/webm");
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("[codec]\ncompression_level = 9\n").unwrap();
        assert_eq!(cfg.codec.compression_level, 9);
        assert_eq!(cfg.codec.payload_wrap_width, 76);
        assert_eq!(cfg.audio.max_duration_secs, 10);
    }
}
