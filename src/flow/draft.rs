//! Booking drafts and the inputs they are built from

use chrono::{NaiveDate, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::{NormalizedHotel, Price};

/// Where and when the user wants to stay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// City or location searched for; may be empty when a free-form query is given
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
}

impl SearchCriteria {
    /// Default party size
    pub const DEFAULT_ADULTS: u32 = 2;

    /// Largest party size accepted by the search form
    pub const MAX_ADULTS: u32 = 10;

    /// Build criteria, clamping `adults` into `1..=MAX_ADULTS`
    #[must_use]
    pub fn new(city: impl Into<String>, check_in: NaiveDate, check_out: NaiveDate, adults: u32) -> Self {
        Self {
            city: city.into().trim().to_string(),
            check_in,
            check_out,
            adults: adults.clamp(1, Self::MAX_ADULTS),
        }
    }

    /// Sentence form of the criteria, used when no free-form query was given
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "Find hotels in {} from {} to {} for {} adults.",
            self.city, self.check_in, self.check_out, self.adults
        )
    }
}

/// The user's pick from the shortlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Must match a shortlist entry's name exactly
    pub hotel_name: String,
    pub user_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// User-confirmed booking pending persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub id: Uuid,
    pub user_name: String,
    pub hotel_name: String,
    pub hotel_address: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub price: Price,
    pub rating: f64,
    /// Local time the draft was created, whole seconds
    pub booking_timestamp: NaiveDateTime,
}

impl BookingDraft {
    /// Build a draft for `hotel` from a validated selection
    #[must_use]
    pub fn new(hotel: &NormalizedHotel, selection: &Selection, booked_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: selection.user_name.trim().to_string(),
            hotel_name: hotel.name.clone(),
            hotel_address: hotel.address.clone(),
            check_in: selection.check_in,
            check_out: selection.check_out,
            price: hotel.min_price,
            rating: hotel.rating,
            booking_timestamp: booked_at.trunc_subsecs(0),
        }
    }

    /// Spoken confirmation line
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        format!(
            "Booking confirmed for {}. Thank you, {}.",
            self.hotel_name, self.user_name
        )
    }
}
