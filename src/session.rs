//! Concierge session
//!
//! Owns the booking flow of one user together with the collaborators it
//! drives, and does the side work around each flow step: asking the
//! assistant, speaking replies, writing the receipt.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use crate::assistant::{AssistantReply, AssistantService, PerplexityAssistant};
use crate::flow::{BookingDraft, BookingFlow, FlowSignal, SearchCriteria, Selection};
use crate::receipt::{FileReceiptWriter, ReceiptWriter};
use crate::search::{HotelSearch, SerpApiHotels};
use crate::store::{BookingLedger, BookingStore};
use crate::voice::{MicrophoneTranscriber, SpeechInput, SpeechOutput, SpeechToText, TextToSpeech};
use crate::{Config, Error, Result};

/// External services a session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub search: Arc<dyn HotelSearch>,
    pub assistant: Arc<dyn AssistantService>,
    /// `None` when voice input is disabled
    pub speech_in: Option<Arc<dyn SpeechInput>>,
    /// `None` when spoken replies are disabled
    pub speech_out: Option<Arc<dyn SpeechOutput>>,
    pub store: Arc<dyn BookingStore>,
    pub receipts: Arc<dyn ReceiptWriter>,
}

impl Collaborators {
    /// Build the production collaborators from configuration
    ///
    /// Voice is turned off with a warning when no `OpenAI` key is configured.
    ///
    /// # Errors
    ///
    /// Returns error if a required API key is missing, an HTTP client cannot
    /// be built, or the bookings database cannot be opened
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.http_timeout();

        let serpapi_key = require_key(config.api_keys.serpapi.as_ref(), "SERPAPI_API_KEY")?;
        let search = SerpApiHotels::new(serpapi_key, timeout)?;

        let perplexity_key = require_key(config.api_keys.perplexity.as_ref(), "PERPLEXITY_API_KEY")?;
        let assistant =
            PerplexityAssistant::new(perplexity_key, config.assistant.model.clone(), timeout)?;

        let (speech_in, speech_out) = match (&config.api_keys.openai, config.voice.enabled) {
            (Some(key), true) => {
                let stt = SpeechToText::new_whisper(key.clone(), config.voice.stt_model.clone(), timeout)?;
                let tts = TextToSpeech::new_openai(
                    key.clone(),
                    config.voice.tts_model.clone(),
                    config.voice.tts_voice.clone(),
                    config.voice.tts_speed,
                    timeout,
                )?;
                tracing::info!(
                    stt_model = %config.voice.stt_model,
                    tts_voice = %config.voice.tts_voice,
                    "voice enabled"
                );
                (
                    Some(Arc::new(MicrophoneTranscriber::new(stt)) as Arc<dyn SpeechInput>),
                    Some(Arc::new(tts) as Arc<dyn SpeechOutput>),
                )
            }
            (None, true) => {
                tracing::warn!("OPENAI_API_KEY not set, voice disabled");
                (None, None)
            }
            (_, false) => (None, None),
        };

        let ledger = BookingLedger::open(&config.database_path(), config.spreadsheet_path())?;
        let receipts = FileReceiptWriter::new(config.receipts_dir());

        Ok(Self {
            search: Arc::new(search),
            assistant: Arc::new(assistant),
            speech_in,
            speech_out,
            store: Arc::new(ledger),
            receipts: Arc::new(receipts),
        })
    }
}

fn require_key(key: Option<&SecretString>, var: &str) -> Result<SecretString> {
    key.cloned()
        .ok_or_else(|| Error::Config(format!("{var} is not set")))
}

/// Result of a search step
///
/// The assistant reply is produced even when the hotel search comes back
/// empty, so it is reported alongside the flow outcome.
#[derive(Debug)]
pub struct SearchOutcome {
    pub reply: AssistantReply,
    /// MP3 rendering of the reply, when spoken output is enabled and succeeded
    pub reply_audio: Option<Vec<u8>>,
    /// `Ok` once the flow moved to selection
    pub hotels: std::result::Result<(), FlowSignal>,
}

/// Everything shown once a booking is stored
#[derive(Debug)]
pub struct Confirmation {
    pub draft: BookingDraft,
    pub message: String,
    pub message_audio: Option<Vec<u8>>,
    /// Where the receipt landed, or why it could not be written
    pub receipt: Result<PathBuf>,
}

/// One user's booking session
pub struct Concierge {
    flow: BookingFlow,
    collaborators: Collaborators,
    record_seconds: u64,
}

impl Concierge {
    #[must_use]
    pub fn new(collaborators: Collaborators, record_seconds: u64) -> Self {
        Self {
            flow: BookingFlow::new(),
            collaborators,
            record_seconds,
        }
    }

    #[must_use]
    pub const fn flow(&self) -> &BookingFlow {
        &self.flow
    }

    /// Whether spoken input is available
    #[must_use]
    pub const fn voice_input(&self) -> bool {
        self.collaborators.speech_in.is_some()
    }

    /// Record and transcribe one utterance
    ///
    /// Returns `None` when voice input is disabled or nothing was recognized.
    pub async fn listen(&self) -> Option<String> {
        let speech_in = self.collaborators.speech_in.as_ref()?;
        let transcript = speech_in.capture_and_transcribe(self.record_seconds).await;
        let transcript = transcript.trim();
        (!transcript.is_empty()).then(|| transcript.to_string())
    }

    /// Record a spoken search query into the pending query
    ///
    /// # Errors
    ///
    /// Returns [`FlowSignal::WrongState`] outside the searching stage
    pub async fn listen_for_query(&mut self) -> std::result::Result<Option<String>, FlowSignal> {
        // Fail before recording when the query cannot be edited
        self.flow.query_mut()?;

        let transcript = self.listen().await;
        if let Some(text) = &transcript {
            self.flow.query_mut()?.set_voice(text.clone());
        }
        Ok(transcript)
    }

    /// Set the typed search query
    ///
    /// # Errors
    ///
    /// Returns [`FlowSignal::WrongState`] outside the searching stage
    pub fn type_query(&mut self, text: impl Into<String>) -> std::result::Result<(), FlowSignal> {
        self.flow.query_mut()?.set_typed(text);
        Ok(())
    }

    /// Ask the assistant about the pending search, then search for hotels
    ///
    /// # Errors
    ///
    /// Returns [`FlowSignal::WrongState`] or [`FlowSignal::MissingQuery`]
    /// without contacting any collaborator
    pub async fn search(
        &mut self,
        criteria: SearchCriteria,
    ) -> std::result::Result<SearchOutcome, FlowSignal> {
        let question = self.flow.pending_search(&criteria)?;

        let reply = AssistantReply::ask(self.collaborators.assistant.as_ref(), &question).await;
        let reply_audio = match &reply {
            AssistantReply::Answer(answer) => self.speak(answer).await,
            AssistantReply::Failed(message) => {
                tracing::warn!(error = %message, "assistant reply failed");
                None
            }
        };

        let hotels = self
            .flow
            .search(criteria, self.collaborators.search.as_ref())
            .await;

        Ok(SearchOutcome {
            reply,
            reply_audio,
            hotels,
        })
    }

    /// Book the selected hotel and produce the confirmation
    ///
    /// # Errors
    ///
    /// Returns the flow's signal when the selection is rejected or the
    /// booking cannot be stored; the session stays in selection
    pub async fn book(&mut self, selection: &Selection) -> std::result::Result<Confirmation, FlowSignal> {
        self.flow
            .confirm_selection(selection, self.collaborators.store.as_ref())?;
        self.confirmation().await
    }

    /// Confirmation message, spoken rendering and receipt for the stored booking
    ///
    /// # Errors
    ///
    /// Returns [`FlowSignal::WrongState`] outside the confirming stage
    pub async fn confirmation(&self) -> std::result::Result<Confirmation, FlowSignal> {
        let draft = self.flow.confirmation()?.clone();
        let message = draft.confirmation_message();
        let message_audio = self.speak(&message).await;

        let receipt = self.collaborators.receipts.write(&draft);
        if let Err(e) = &receipt {
            tracing::error!(error = %e, booking_id = %draft.id, "failed to write receipt");
        }

        Ok(Confirmation {
            draft,
            message,
            message_audio,
            receipt,
        })
    }

    /// Drop the current booking and start over
    ///
    /// # Errors
    ///
    /// Returns [`FlowSignal::WrongState`] outside the confirming stage
    pub fn start_new_search(&mut self) -> std::result::Result<(), FlowSignal> {
        self.flow.start_new_search()
    }

    async fn speak(&self, text: &str) -> Option<Vec<u8>> {
        let speech_out = self.collaborators.speech_out.as_ref()?;
        match speech_out.synthesize(text).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
                None
            }
        }
    }
}
