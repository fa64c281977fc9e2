//! TOML configuration file loading
//!
//! Supports `~/.config/hotel-concierge/config.toml` as a persistent config
//! source. All fields are optional: the file is a partial overlay on top of
//! defaults, and environment variables override it.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConciergeConfigFile {
    /// Directory for the bookings database, spreadsheet and receipt
    #[serde(default)]
    pub data_dir: Option<String>,

    #[serde(default)]
    pub voice: VoiceFileConfig,

    #[serde(default)]
    pub search: SearchFileConfig,

    #[serde(default)]
    pub assistant: AssistantFileConfig,

    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Voice input/output configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    pub tts_speed: Option<f64>,

    /// Recording window for spoken input, in seconds
    pub record_seconds: Option<u64>,
}

/// Hotel search configuration
#[derive(Debug, Default, Deserialize)]
pub struct SearchFileConfig {
    pub default_adults: Option<u32>,

    /// HTTP timeout applied to every external API call
    pub timeout_secs: Option<u64>,
}

/// Assistant configuration
#[derive(Debug, Default, Deserialize)]
pub struct AssistantFileConfig {
    /// Model identifier (e.g. "sonar")
    pub model: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub serpapi: Option<String>,
    pub perplexity: Option<String>,
    pub openai: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ConciergeConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConciergeConfigFile {
    config_file_path().map_or_else(ConciergeConfigFile::default, |path| load_from(&path))
}

/// Load a TOML config file from an explicit path, falling back to defaults
pub fn load_from(path: &Path) -> ConciergeConfigFile {
    if !path.exists() {
        return ConciergeConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConciergeConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConciergeConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/hotel-concierge/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("hotel-concierge").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [voice]
            tts_voice = "nova"
            record_seconds = 8

            [api_keys]
            serpapi = "serp-key"
            "#,
        )
        .unwrap();

        let fc = load_from(&path);
        assert_eq!(fc.voice.tts_voice.as_deref(), Some("nova"));
        assert_eq!(fc.voice.record_seconds, Some(8));
        assert_eq!(fc.api_keys.serpapi.as_deref(), Some("serp-key"));
        assert!(fc.search.timeout_secs.is_none());
    }

    #[test]
    fn test_missing_or_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from(&dir.path().join("absent.toml")).data_dir.is_none());

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "voice = [unclosed").unwrap();
        assert!(load_from(&path).voice.enabled.is_none());
    }
}
