//! Hotel search provider
//!
//! Queries SerpApi's Google Hotels engine. Failures never reach the caller:
//! any transport, status or parse problem is logged and degrades to an
//! empty result.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};

use crate::pricing::RawHotelRecord;
use crate::{Error, Result};

const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";

/// Source of raw hotel listings
#[async_trait]
pub trait HotelSearch: Send + Sync {
    /// Search for hotels around a location
    ///
    /// Returns an empty list on any failure.
    async fn search(
        &self,
        location: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: u32,
    ) -> Vec<RawHotelRecord>;
}

/// SerpApi Google Hotels client
pub struct SerpApiHotels {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
}

impl SerpApiHotels {
    /// Create a new SerpApi client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing or the HTTP client cannot be built
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("SerpApi API key required".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: SERPAPI_ENDPOINT.to_string(),
        })
    }

    /// Point the client at a different endpoint (e.g. a local mock)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch(
        &self,
        location: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: u32,
    ) -> Result<serde_json::Value> {
        let check_in = check_in.format("%Y-%m-%d").to_string();
        let check_out = check_out.format("%Y-%m-%d").to_string();
        let adults = adults.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google_hotels"),
                ("q", location),
                ("gl", "in"),
                ("hl", "en"),
                ("check_in_date", check_in.as_str()),
                ("check_out_date", check_out.as_str()),
                ("adults", adults.as_str()),
                ("currency", "INR"),
                ("api_key", self.api_key.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!("SerpApi error {status}: {body}")));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl HotelSearch for SerpApiHotels {
    async fn search(
        &self,
        location: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: u32,
    ) -> Vec<RawHotelRecord> {
        tracing::debug!(location, %check_in, %check_out, adults, "searching hotels");

        match self.fetch(location, check_in, check_out, adults).await {
            Ok(body) => {
                let records = parse_properties(&body);
                tracing::info!(location, count = records.len(), "hotel search complete");
                records
            }
            Err(e) => {
                tracing::error!(error = %e, location, "hotel search failed");
                Vec::new()
            }
        }
    }
}

/// Extract priced hotel listings from a SerpApi response body
///
/// Entries that are not hotels, carry no lowest rate, or fail to
/// deserialize are skipped individually.
#[must_use]
pub fn parse_properties(body: &serde_json::Value) -> Vec<RawHotelRecord> {
    let Some(properties) = body.get("properties").and_then(serde_json::Value::as_array) else {
        return Vec::new();
    };

    properties
        .iter()
        .filter_map(|p| match serde_json::from_value::<RawHotelRecord>(p.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed property");
                None
            }
        })
        .filter(|r| r.is_hotel() && has_lowest_rate(r))
        .collect()
}

fn has_lowest_rate(record: &RawHotelRecord) -> bool {
    record
        .rate_per_night
        .as_ref()
        .and_then(|r| r.extracted_lowest.as_ref())
        .is_some_and(|v| match v {
            serde_json::Value::Null | serde_json::Value::Bool(false) => false,
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            serde_json::Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_key() {
        let result = SerpApiHotels::new(SecretString::from(String::new()), Duration::from_secs(5));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_properties_filters_like_provider() {
        let body = serde_json::json!({
            "properties": [
                { "type": "hotel", "name": "A", "rate_per_night": { "extracted_lowest": 3000 } },
                { "type": "vacation rental", "name": "B", "rate_per_night": { "extracted_lowest": 2000 } },
                { "type": "Hotel", "name": "C" },
                { "type": "hotel", "name": "D", "rate_per_night": { "extracted_lowest": 0 } },
                { "type": "hotel", "name": "E", "overall_rating": "great",
                  "rate_per_night": { "extracted_lowest": 1500 } },
                { "type": "hotel", "name": "F", "rate_per_night": { "extracted_lowest": "1800" } }
            ]
        });

        let names: Vec<String> = parse_properties(&body)
            .into_iter()
            .filter_map(|r| r.name)
            .collect();

        assert_eq!(names, vec!["A", "F"]);
    }

    #[test]
    fn test_parse_properties_missing_key() {
        assert!(parse_properties(&serde_json::json!({ "error": "Invalid API key" })).is_empty());
    }
}
