//! Voice input and output
//!
//! Microphone capture and Whisper transcription on the way in, `OpenAI`
//! speech synthesis and speaker playback on the way out.

mod capture;
mod playback;
mod stt;
mod tts;

use async_trait::async_trait;

pub use capture::{AudioCapture, SAMPLE_RATE, SignalLevel, samples_to_wav, signal_levels};
pub use playback::{AudioPlayback, decode_mp3};
pub use stt::{MicrophoneTranscriber, SpeechToText};
pub use tts::TextToSpeech;

use crate::Result;

/// Default recording window for a spoken query
pub const DEFAULT_RECORD_SECONDS: u64 = 5;

/// Spoken input source
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Record up to `max_duration_seconds` and return a best-effort transcript
    ///
    /// Returns an empty string on failure.
    async fn capture_and_transcribe(&self, max_duration_seconds: u64) -> String;
}

/// Spoken output sink
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
