//! Raw search record normalization

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::provider::{Price, ProviderName};

/// Name used when the provider omits one
pub const DEFAULT_NAME: &str = "Unknown";

/// Address used when the provider omits one
pub const DEFAULT_ADDRESS: &str = "No address";

/// Hotel listing as returned by the search provider
///
/// Every field is optional; validation happens in [`normalize`], never at
/// deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHotelRecord {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    /// Guest rating, usually 1-5
    #[serde(default)]
    pub overall_rating: Option<f64>,

    #[serde(default)]
    pub rate_per_night: Option<RatePerNight>,

    /// Property category (e.g. "hotel", "vacation rental")
    #[serde(default, rename = "type")]
    pub category: Option<String>,
}

/// Nightly rate block of a raw record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatePerNight {
    /// Lowest nightly rate; providers send either a number or a numeric string
    #[serde(default)]
    pub extracted_lowest: Option<serde_json::Value>,
}

impl RawHotelRecord {
    /// Whether the category names a hotel (case-insensitive substring)
    #[must_use]
    pub fn is_hotel(&self) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains("hotel"))
    }

    /// Lowest nightly rate as a float, if present and numeric
    #[must_use]
    pub fn lowest_rate(&self) -> Option<f64> {
        let value = self.rate_per_night.as_ref()?.extracted_lowest.as_ref()?;
        let rate = match value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        rate.filter(|r| r.is_finite())
    }
}

/// A hotel with a synthesized price per booking provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedHotel {
    pub name: String,
    pub address: String,
    pub rating: f64,
    pub provider_prices: BTreeMap<ProviderName, Price>,
    /// Smallest of `provider_prices`, always strictly positive
    pub min_price: Price,
}

impl NormalizedHotel {
    /// Price quoted by a single provider
    #[must_use]
    pub fn price_for(&self, provider: ProviderName) -> Option<Price> {
        self.provider_prices.get(&provider).copied()
    }

    /// First provider (in column order) quoting the minimum price
    #[must_use]
    pub fn cheapest_provider(&self) -> Option<ProviderName> {
        ProviderName::ALL
            .into_iter()
            .find(|p| self.price_for(*p) == Some(self.min_price))
    }
}

/// Normalize a raw record into a comparable hotel
///
/// Returns `None` (the record is dropped, this is not an error) when the
/// category is not a hotel, when the lowest rate is absent, non-numeric or
/// not positive, when the rate rounds down to zero, or when a provider
/// markup overflows the decimal range.
///
/// Defaults are filled explicitly: a missing name becomes
/// [`DEFAULT_NAME`], a missing address [`DEFAULT_ADDRESS`], and a missing
/// or falsy rating `0`.
///
/// Provider prices are `round(round(rate, 2) * multiplier, 2)` and the
/// minimum is taken over those rounded figures.
#[must_use]
pub fn normalize(raw: &RawHotelRecord) -> Option<NormalizedHotel> {
    if !raw.is_hotel() {
        return None;
    }

    let rate = raw.lowest_rate().filter(|r| *r > 0.0)?;
    let base = Price::from_f64(rate)?;

    let provider_prices: BTreeMap<ProviderName, Price> = ProviderName::ALL
        .into_iter()
        .map(|p| p.quote(base).map(|price| (p, price)))
        .collect::<Option<_>>()?;

    let min_price = provider_prices.values().copied().min()?;
    if !min_price.is_positive() {
        return None;
    }

    let rating = raw
        .overall_rating
        .filter(|r| r.is_finite() && *r != 0.0)
        .unwrap_or(0.0);

    Some(NormalizedHotel {
        name: raw.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string()),
        address: raw
            .address
            .clone()
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
        rating,
        provider_prices,
        min_price,
    })
}
