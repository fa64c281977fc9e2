//! Shared test utilities

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use hotel_concierge::assistant::AssistantService;
use hotel_concierge::pricing::RatePerNight;
use hotel_concierge::receipt::ReceiptWriter;
use hotel_concierge::voice::{SpeechInput, SpeechOutput};
use hotel_concierge::{
    BookingDraft, BookingStore, DbPool, Error, HotelSearch, RawHotelRecord, Result,
    SearchCriteria, db,
};

/// Set up an in-memory test database
#[must_use]
pub fn setup_test_db() -> DbPool {
    db::init_memory().expect("failed to init test db")
}

/// Raw hotel entry as the search provider would return it
#[must_use]
pub fn hotel(name: &str, rate: f64, rating: f64) -> RawHotelRecord {
    RawHotelRecord {
        name: Some(name.to_string()),
        address: Some(format!("{name} Road")),
        overall_rating: Some(rating),
        rate_per_night: Some(RatePerNight {
            extracted_lowest: Some(serde_json::json!(rate)),
        }),
        category: Some("Hotel".to_string()),
    }
}

#[must_use]
pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).expect("valid date")
}

#[must_use]
pub fn criteria(city: &str) -> SearchCriteria {
    SearchCriteria::new(city, date(12, 20), date(12, 22), 2)
}

/// Search provider returning canned records
#[derive(Default)]
pub struct FakeSearch {
    records: Vec<RawHotelRecord>,
    calls: AtomicUsize,
    locations: Mutex<Vec<String>>,
}

impl FakeSearch {
    #[must_use]
    pub fn new(records: Vec<RawHotelRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn locations(&self) -> Vec<String> {
        self.locations.lock().unwrap().clone()
    }
}

#[async_trait]
impl HotelSearch for FakeSearch {
    async fn search(
        &self,
        location: &str,
        _check_in: NaiveDate,
        _check_out: NaiveDate,
        _adults: u32,
    ) -> Vec<RawHotelRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.locations.lock().unwrap().push(location.to_string());
        self.records.clone()
    }
}

/// Assistant returning a fixed reply
pub struct FakeAssistant {
    reply: String,
    questions: Mutex<Vec<String>>,
}

impl FakeAssistant {
    #[must_use]
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            questions: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantService for FakeAssistant {
    async fn ask(&self, question: &str) -> String {
        self.questions.lock().unwrap().push(question.to_string());
        self.reply.clone()
    }
}

/// In-memory booking store
#[derive(Default)]
pub struct FakeStore {
    bookings: Mutex<Vec<BookingDraft>>,
    fail: bool,
}

impl FakeStore {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bookings(&self) -> Vec<BookingDraft> {
        self.bookings.lock().unwrap().clone()
    }
}

impl BookingStore for FakeStore {
    fn append(&self, draft: &BookingDraft) -> Result<()> {
        if self.fail {
            return Err(Error::Database("disk full".to_string()));
        }
        self.bookings.lock().unwrap().push(draft.clone());
        Ok(())
    }
}

/// Microphone and speaker stand-in
///
/// Transcribes to a fixed string and "synthesizes" text as its UTF-8 bytes.
#[derive(Default)]
pub struct FakeSpeech {
    transcript: String,
    spoken: Mutex<Vec<String>>,
    fail_synthesis: bool,
}

impl FakeSpeech {
    #[must_use]
    pub fn hearing(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn broken_speaker() -> Self {
        Self {
            fail_synthesis: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechInput for FakeSpeech {
    async fn capture_and_transcribe(&self, _max_duration_seconds: u64) -> String {
        self.transcript.clone()
    }
}

#[async_trait]
impl SpeechOutput for FakeSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if self.fail_synthesis {
            return Err(Error::Tts("speaker unplugged".to_string()));
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(text.as_bytes().to_vec())
    }
}

/// Receipt writer that remembers what it was asked to write
#[derive(Default)]
pub struct FakeReceipts {
    written: Mutex<Vec<BookingDraft>>,
}

impl FakeReceipts {
    #[must_use]
    pub fn written(&self) -> Vec<BookingDraft> {
        self.written.lock().unwrap().clone()
    }
}

impl ReceiptWriter for FakeReceipts {
    fn write(&self, draft: &BookingDraft) -> Result<PathBuf> {
        self.written.lock().unwrap().push(draft.clone());
        Ok(PathBuf::from("receipt.txt"))
    }
}
