//! Configuration management for the hotel concierge
//!
//! Precedence for every setting: environment variable, then the TOML
//! config file, then the built-in default.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::voice::DEFAULT_RECORD_SECONDS;
use crate::{Error, Result};

pub use file::ConciergeConfigFile;

/// Hotel concierge configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the bookings database, spreadsheet and receipt
    pub data_dir: PathBuf,

    pub voice: VoiceConfig,

    pub search: SearchConfig,

    pub assistant: AssistantConfig,

    pub api_keys: ApiKeys,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable voice input and spoken replies
    pub enabled: bool,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// Recording window for spoken input
    pub record_seconds: u64,
}

/// Hotel search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Party size used when none is given
    pub default_adults: u32,

    /// Timeout applied to every external HTTP call
    pub timeout_secs: u64,
}

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub model: String,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `SerpApi` key (hotel search)
    pub serpapi: Option<SecretString>,

    /// Perplexity key (assistant)
    pub perplexity: Option<SecretString>,

    /// `OpenAI` key (Whisper and TTS)
    pub openai: Option<SecretString>,
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if a setting is out of range
    pub fn load() -> Result<Self> {
        Self::load_with_options(false)
    }

    /// Load configuration with explicit voice disable option
    ///
    /// # Errors
    ///
    /// Returns error if a setting is out of range
    pub fn load_with_options(disable_voice: bool) -> Result<Self> {
        let fc = file::load_config_file();
        let config = Self::from_sources(fc, |key| std::env::var(key).ok(), disable_voice)?;

        if disable_voice {
            tracing::info!("voice explicitly disabled via --disable-voice");
        }

        if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
            tracing::warn!(
                path = %config.data_dir.display(),
                error = %e,
                "failed to create data directory"
            );
        }

        Ok(config)
    }

    /// Build configuration from a parsed config file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a setting is out of range
    pub fn from_sources(
        fc: ConciergeConfigFile,
        env: impl Fn(&str) -> Option<String>,
        disable_voice: bool,
    ) -> Result<Self> {
        let flag = |key: &str| env(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"));
        let number = |key: &str| env(key).and_then(|s| s.parse::<u64>().ok());

        // API keys (env > toml > None)
        let api_keys = ApiKeys {
            serpapi: env("SERPAPI_API_KEY")
                .or(fc.api_keys.serpapi)
                .map(SecretString::from),
            perplexity: env("PERPLEXITY_API_KEY")
                .or(fc.api_keys.perplexity)
                .map(SecretString::from),
            openai: env("OPENAI_API_KEY")
                .or(fc.api_keys.openai)
                .map(SecretString::from),
        };

        let voice_enabled = !disable_voice
            && !flag("CONCIERGE_DISABLE_VOICE").unwrap_or(false)
            && fc.voice.enabled.unwrap_or(true);

        let voice = VoiceConfig {
            enabled: voice_enabled,
            stt_model: env("CONCIERGE_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| "whisper-1".to_string()),
            tts_model: env("CONCIERGE_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| "tts-1".to_string()),
            tts_voice: env("CONCIERGE_TTS_VOICE")
                .or(fc.voice.tts_voice)
                .unwrap_or_else(|| "alloy".to_string()),
            tts_speed: fc.voice.tts_speed.unwrap_or(1.0),
            record_seconds: number("CONCIERGE_RECORD_SECONDS")
                .or(fc.voice.record_seconds)
                .unwrap_or(DEFAULT_RECORD_SECONDS),
        };

        if !(0.25..=4.0).contains(&voice.tts_speed) {
            return Err(Error::Config(format!(
                "tts_speed must be between 0.25 and 4.0, got {}",
                voice.tts_speed
            )));
        }
        if voice.record_seconds == 0 {
            return Err(Error::Config("record_seconds must be positive".to_string()));
        }

        let search = SearchConfig {
            default_adults: env("CONCIERGE_DEFAULT_ADULTS")
                .and_then(|s| s.parse().ok())
                .or(fc.search.default_adults)
                .unwrap_or(2),
            timeout_secs: number("CONCIERGE_HTTP_TIMEOUT")
                .or(fc.search.timeout_secs)
                .unwrap_or(30),
        };

        if !(1..=10).contains(&search.default_adults) {
            return Err(Error::Config(format!(
                "default_adults must be between 1 and 10, got {}",
                search.default_adults
            )));
        }
        if search.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }

        let assistant = AssistantConfig {
            model: env("CONCIERGE_ASSISTANT_MODEL")
                .or(fc.assistant.model)
                .unwrap_or_else(|| "sonar".to_string()),
        };

        // Data directory (~/.local/share/hotel-concierge on Linux)
        let data_dir = env("CONCIERGE_DATA_DIR")
            .or(fc.data_dir)
            .map_or_else(default_data_dir, PathBuf::from);

        Ok(Self {
            data_dir,
            voice,
            search,
            assistant,
            api_keys,
        })
    }

    /// `SQLite` database holding every booking
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("bookings.db")
    }

    /// Spreadsheet mirror of the bookings table
    #[must_use]
    pub fn spreadsheet_path(&self) -> PathBuf {
        self.data_dir.join("bookings.xlsx")
    }

    /// Directory the receipt is written to
    #[must_use]
    pub fn receipts_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_secs)
    }
}

fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".local/share/hotel-concierge"),
        |d| d.data_dir().join("hotel-concierge"),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(ConciergeConfigFile::default(), env_from(&[]), false).unwrap();

        assert!(config.voice.enabled);
        assert_eq!(config.voice.stt_model, "whisper-1");
        assert_eq!(config.voice.tts_model, "tts-1");
        assert_eq!(config.voice.tts_voice, "alloy");
        assert_eq!(config.voice.record_seconds, DEFAULT_RECORD_SECONDS);
        assert_eq!(config.search.default_adults, 2);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.assistant.model, "sonar");
        assert!(config.api_keys.serpapi.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut fc = ConciergeConfigFile::default();
        fc.api_keys.serpapi = Some("from-file".to_string());
        fc.voice.tts_voice = Some("nova".to_string());
        fc.data_dir = Some("/tmp/from-file".to_string());

        let config = Config::from_sources(
            fc,
            env_from(&[
                ("SERPAPI_API_KEY", "from-env"),
                ("CONCIERGE_DATA_DIR", "/tmp/from-env"),
            ]),
            false,
        )
        .unwrap();

        assert_eq!(
            config.api_keys.serpapi.as_ref().map(ExposeSecret::expose_secret),
            Some("from-env")
        );
        assert_eq!(config.voice.tts_voice, "nova");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/from-env"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/from-env/bookings.db"));
    }

    #[test]
    fn test_voice_can_be_disabled() {
        let by_flag = Config::from_sources(ConciergeConfigFile::default(), env_from(&[]), true).unwrap();
        assert!(!by_flag.voice.enabled);

        let by_env = Config::from_sources(
            ConciergeConfigFile::default(),
            env_from(&[("CONCIERGE_DISABLE_VOICE", "true")]),
            false,
        )
        .unwrap();
        assert!(!by_env.voice.enabled);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut fc = ConciergeConfigFile::default();
        fc.voice.tts_speed = Some(9.0);
        assert!(matches!(
            Config::from_sources(fc, env_from(&[]), false),
            Err(Error::Config(_))
        ));

        let result = Config::from_sources(
            ConciergeConfigFile::default(),
            env_from(&[("CONCIERGE_DEFAULT_ADULTS", "0")]),
            false,
        );
        assert!(matches!(result, Err(Error::Config(_))));

        let mut fc = ConciergeConfigFile::default();
        fc.search.timeout_secs = Some(0);
        assert!(matches!(
            Config::from_sources(fc, env_from(&[]), false),
            Err(Error::Config(_))
        ));

        let result = Config::from_sources(
            ConciergeConfigFile::default(),
            env_from(&[("CONCIERGE_HTTP_TIMEOUT", "0")]),
            false,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
