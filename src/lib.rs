//! Hotel Concierge - voice and text hotel search and booking assistant
//!
//! This library provides the core functionality for the concierge:
//! - Price normalization and ranking of hotel search results
//! - The search, select, confirm booking flow
//! - Booking persistence, spreadsheet mirror and receipts
//! - Voice processing (capture, STT, TTS, playback)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                        │
//! │        Terminal prompts  │  Microphone / speaker     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Concierge                           │
//! │   BookingFlow  │  Normalizer  │  Ranker             │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Collaborators                         │
//! │ SerpApi │ Perplexity │ Whisper/TTS │ SQLite │ Files │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod assistant;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod flow;
pub mod pricing;
pub mod receipt;
pub mod search;
pub mod session;
pub mod store;
pub mod voice;

pub use assistant::{AssistantReply, AssistantService};
pub use config::Config;
pub use db::{DbConn, DbPool};
pub use error::{Error, Result};
pub use flow::{
    BookingDraft, BookingFlow, FlowSignal, FlowStage, FlowState, SearchCriteria, Selection,
};
pub use pricing::{NormalizedHotel, Price, ProviderName, RawHotelRecord, Shortlist, normalize, rank};
pub use receipt::ReceiptWriter;
pub use search::HotelSearch;
pub use session::{Collaborators, Concierge, Confirmation, SearchOutcome};
pub use store::{BookingLedger, BookingStore};
pub use voice::{SpeechInput, SpeechOutput};
