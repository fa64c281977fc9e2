//! Booking flow
//!
//! A strictly forward sequencer over three stages:
//!
//! ```text
//!  Searching ──search──▶ Selecting ──confirm_selection──▶ Confirming
//!      ▲                                                      │
//!      └──────────────────── start_new_search ────────────────┘
//! ```
//!
//! Every action either advances the flow or returns a [`FlowSignal`] and
//! leaves the state exactly as it was. There is no back or cancel path.

mod draft;

use std::fmt;

use chrono::Local;
use thiserror::Error;

pub use draft::{BookingDraft, SearchCriteria, Selection};

use crate::pricing::{Shortlist, rank};
use crate::search::HotelSearch;
use crate::store::BookingStore;

/// Name of a flow stage, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Searching,
    Selecting,
    Confirming,
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Searching => "searching",
            Self::Selecting => "selecting",
            Self::Confirming => "confirming",
        })
    }
}

/// Current stage together with the data it owns
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FlowState {
    /// Waiting for a search
    #[default]
    Searching,
    /// Shortlist shown, waiting for the user's pick
    Selecting {
        criteria: SearchCriteria,
        shortlist: Shortlist,
    },
    /// Booking stored, waiting for the user to start over
    Confirming { draft: BookingDraft },
}

impl FlowState {
    #[must_use]
    pub const fn stage(&self) -> FlowStage {
        match self {
            Self::Searching => FlowStage::Searching,
            Self::Selecting { .. } => FlowStage::Selecting,
            Self::Confirming { .. } => FlowStage::Confirming,
        }
    }
}

/// Non-fatal outcome that keeps the flow where it is
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowSignal {
    /// Neither a city nor a query was given
    #[error("enter a city or a search query")]
    MissingQuery,

    /// The search produced no bookable hotels
    #[error("no hotels found, please try different criteria")]
    NoResults,

    /// The chosen hotel is not on the shortlist
    #[error("please choose a valid hotel name from the list: {0}")]
    UnknownHotel(String),

    /// The user name is blank
    #[error("please provide your full name")]
    MissingUserName,

    /// The action does not apply to the current stage
    #[error("cannot {action} while {stage}")]
    WrongState {
        action: &'static str,
        stage: FlowStage,
    },

    /// The booking could not be stored
    #[error("booking could not be saved: {0}")]
    StoreUnavailable(String),
}

/// Pending free-form query, spoken or typed
///
/// A non-empty voice transcript takes precedence over typed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    voice: Option<String>,
    typed: String,
}

impl QueryInput {
    pub fn set_voice(&mut self, transcript: impl Into<String>) {
        self.voice = Some(transcript.into());
    }

    pub fn set_typed(&mut self, text: impl Into<String>) {
        self.typed = text.into();
    }

    /// The query that a search would use, trimmed
    #[must_use]
    pub fn effective(&self) -> &str {
        self.voice
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(&self.typed)
            .trim()
    }

    pub fn clear(&mut self) {
        self.voice = None;
        self.typed.clear();
    }
}

/// The single booking flow of a session
#[derive(Debug, Default)]
pub struct BookingFlow {
    state: FlowState,
    query: QueryInput,
}

impl BookingFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    #[must_use]
    pub const fn stage(&self) -> FlowStage {
        self.state.stage()
    }

    /// Pending query, editable only while searching
    ///
    /// # Errors
    ///
    /// Returns [`FlowSignal::WrongState`] outside the searching stage
    pub fn query_mut(&mut self) -> Result<&mut QueryInput, FlowSignal> {
        self.ensure_stage(FlowStage::Searching, "edit the query")?;
        Ok(&mut self.query)
    }

    #[must_use]
    pub const fn query(&self) -> &QueryInput {
        &self.query
    }

    /// Text describing the pending search: the query if one was given,
    /// otherwise a sentence built from the criteria
    #[must_use]
    pub fn search_text(&self, criteria: &SearchCriteria) -> String {
        let query = self.query.effective();
        if query.is_empty() {
            criteria.describe()
        } else {
            query.to_string()
        }
    }

    #[must_use]
    pub const fn shortlist(&self) -> Option<&Shortlist> {
        match &self.state {
            FlowState::Selecting { shortlist, .. } => Some(shortlist),
            _ => None,
        }
    }

    #[must_use]
    pub const fn criteria(&self) -> Option<&SearchCriteria> {
        match &self.state {
            FlowState::Selecting { criteria, .. } => Some(criteria),
            _ => None,
        }
    }

    /// Active booking draft, present only while confirming
    #[must_use]
    pub const fn draft(&self) -> Option<&BookingDraft> {
        match &self.state {
            FlowState::Confirming { draft } => Some(draft),
            _ => None,
        }
    }

    /// Check that a search with `criteria` would be accepted and return
    /// its search text
    ///
    /// # Errors
    ///
    /// - [`FlowSignal::WrongState`] outside the searching stage
    /// - [`FlowSignal::MissingQuery`] when neither city nor query is set
    pub fn pending_search(&self, criteria: &SearchCriteria) -> Result<String, FlowSignal> {
        self.ensure_stage(FlowStage::Searching, "search")?;

        if criteria.city.is_empty() && self.query.effective().is_empty() {
            return Err(FlowSignal::MissingQuery);
        }

        Ok(self.search_text(criteria))
    }

    /// Search for hotels and move to selection
    ///
    /// On success the ranked hotels are available from [`Self::shortlist`].
    ///
    /// # Errors
    ///
    /// - [`FlowSignal::WrongState`] outside the searching stage
    /// - [`FlowSignal::MissingQuery`] when neither city nor query is set
    /// - [`FlowSignal::NoResults`] when nothing survives ranking
    pub async fn search(
        &mut self,
        criteria: SearchCriteria,
        provider: &dyn HotelSearch,
    ) -> Result<(), FlowSignal> {
        self.pending_search(&criteria)?;

        let records = provider
            .search(
                &criteria.city,
                criteria.check_in,
                criteria.check_out,
                criteria.adults,
            )
            .await;
        let shortlist = rank(&records);

        if shortlist.is_empty() {
            tracing::info!(city = %criteria.city, raw = records.len(), "search returned no hotels");
            return Err(FlowSignal::NoResults);
        }

        tracing::info!(city = %criteria.city, hotels = shortlist.len(), "shortlist ready");

        self.query.clear();
        self.state = FlowState::Selecting {
            criteria,
            shortlist,
        };
        Ok(())
    }

    /// Validate the user's pick, store the booking and move to confirmation
    ///
    /// On success the stored booking is available from [`Self::draft`].
    ///
    /// # Errors
    ///
    /// - [`FlowSignal::WrongState`] outside the selecting stage
    /// - [`FlowSignal::UnknownHotel`] when the name is not on the shortlist
    /// - [`FlowSignal::MissingUserName`] when the user name is blank
    /// - [`FlowSignal::StoreUnavailable`] when the booking store fails
    pub fn confirm_selection(
        &mut self,
        selection: &Selection,
        store: &dyn BookingStore,
    ) -> Result<(), FlowSignal> {
        let FlowState::Selecting { shortlist, .. } = &self.state else {
            return Err(self.wrong_state("confirm a selection"));
        };

        let hotel = shortlist
            .find(&selection.hotel_name)
            .ok_or_else(|| FlowSignal::UnknownHotel(selection.hotel_name.clone()))?;

        if selection.user_name.trim().is_empty() {
            return Err(FlowSignal::MissingUserName);
        }

        let draft = BookingDraft::new(hotel, selection, Local::now().naive_local());

        if let Err(e) = store.append(&draft) {
            tracing::error!(error = %e, hotel = %draft.hotel_name, "failed to store booking");
            return Err(FlowSignal::StoreUnavailable(e.to_string()));
        }

        tracing::info!(
            booking_id = %draft.id,
            hotel = %draft.hotel_name,
            price = %draft.price,
            "booking stored"
        );

        self.state = FlowState::Confirming { draft };
        Ok(())
    }

    /// The stored booking awaiting confirmation messaging and receipt
    ///
    /// # Errors
    ///
    /// Returns [`FlowSignal::WrongState`] outside the confirming stage
    pub fn confirmation(&self) -> Result<&BookingDraft, FlowSignal> {
        self.draft()
            .ok_or_else(|| self.wrong_state("show a confirmation"))
    }

    /// Discard the shortlist, draft and pending inputs and search again
    ///
    /// # Errors
    ///
    /// Returns [`FlowSignal::WrongState`] outside the confirming stage
    pub fn start_new_search(&mut self) -> Result<(), FlowSignal> {
        self.ensure_stage(FlowStage::Confirming, "start a new search")?;

        self.state = FlowState::Searching;
        self.query.clear();

        tracing::debug!("flow reset to searching");
        Ok(())
    }

    fn ensure_stage(&self, stage: FlowStage, action: &'static str) -> Result<(), FlowSignal> {
        if self.stage() == stage {
            Ok(())
        } else {
            Err(self.wrong_state(action))
        }
    }

    const fn wrong_state(&self, action: &'static str) -> FlowSignal {
        FlowSignal::WrongState {
            action,
            stage: self.stage(),
        }
    }
}
