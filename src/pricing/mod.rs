//! Price comparison
//!
//! Turns raw hotel search results into comparably priced records and ranks
//! them into a shortlist. Everything in here is pure: no I/O, no clocks.

mod normalizer;
mod provider;
mod ranker;

pub use normalizer::{
    DEFAULT_ADDRESS, DEFAULT_NAME, NormalizedHotel, RatePerNight, RawHotelRecord, normalize,
};
pub use provider::{Price, ProviderName};
pub use ranker::{SHORTLIST_LIMIT, Shortlist, rank};
