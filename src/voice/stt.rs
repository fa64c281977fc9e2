//! Speech-to-text via `OpenAI` Whisper

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::SpeechInput;
use super::capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
use crate::{Error, Result};

const WHISPER_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Response from the Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes WAV audio to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl SpeechToText {
    /// Create a new Whisper client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing or the HTTP client cannot be built
    pub fn new_whisper(api_key: SecretString, model: String, timeout: Duration) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config(
                "OpenAI API key required for Whisper".to_string(),
            ));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Transcribe WAV audio bytes
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects it
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post(WHISPER_ENDPOINT)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await?;
        Ok(result.text.trim().to_string())
    }
}

/// Records from the default microphone and transcribes with Whisper
pub struct MicrophoneTranscriber {
    stt: SpeechToText,
}

impl MicrophoneTranscriber {
    #[must_use]
    pub const fn new(stt: SpeechToText) -> Self {
        Self { stt }
    }

    async fn record_and_transcribe(&self, max_duration_seconds: u64) -> Result<String> {
        let duration = Duration::from_secs(max_duration_seconds);

        // cpal streams are not `Send`, so the whole capture stays on one thread
        let wav = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let mut capture = AudioCapture::new()?;
            let samples = capture.record_blocking(duration)?;
            samples_to_wav(&samples, SAMPLE_RATE)
        })
        .await
        .map_err(|e| Error::Audio(e.to_string()))??;

        self.stt.transcribe(&wav).await
    }
}

#[async_trait]
impl SpeechInput for MicrophoneTranscriber {
    async fn capture_and_transcribe(&self, max_duration_seconds: u64) -> String {
        match self.record_and_transcribe(max_duration_seconds).await {
            Ok(transcript) => {
                tracing::info!(transcript = %transcript, "transcription complete");
                transcript
            }
            Err(e) => {
                tracing::error!(error = %e, "voice capture failed");
                String::new()
            }
        }
    }
}
