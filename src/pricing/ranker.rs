//! Shortlist ranking

use serde::Serialize;

use super::normalizer::{NormalizedHotel, RawHotelRecord, normalize};

/// Maximum number of hotels offered to the user
pub const SHORTLIST_LIMIT: usize = 10;

/// Ranked, capped list of hotels shown to the user
///
/// Ordered by minimum price ascending, then rating descending. Exact ties
/// keep the order the search provider returned them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Shortlist {
    hotels: Vec<NormalizedHotel>,
}

impl Shortlist {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.hotels.len()
    }

    /// Ranked hotels, cheapest first
    #[must_use]
    pub fn hotels(&self) -> &[NormalizedHotel] {
        &self.hotels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedHotel> {
        self.hotels.iter()
    }

    /// Find a hotel by exact name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&NormalizedHotel> {
        self.hotels.iter().find(|h| h.name == name)
    }

    /// Names in ranked order, used for selection prompts
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.hotels.iter().map(|h| h.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Shortlist {
    type Item = &'a NormalizedHotel;
    type IntoIter = std::slice::Iter<'a, NormalizedHotel>;

    fn into_iter(self) -> Self::IntoIter {
        self.hotels.iter()
    }
}

/// Normalize and rank raw search results into a shortlist
///
/// Records that fail normalization are dropped. An empty result means
/// "no hotels found", not a failure.
#[must_use]
pub fn rank(records: &[RawHotelRecord]) -> Shortlist {
    let mut hotels: Vec<NormalizedHotel> = records.iter().filter_map(normalize).collect();

    let dropped = records.len() - hotels.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = hotels.len(), "excluded unpriced or non-hotel records");
    }

    // `sort_by` is stable, so exact ties keep provider order
    hotels.sort_by(|a, b| {
        a.min_price
            .cmp(&b.min_price)
            .then_with(|| b.rating.total_cmp(&a.rating))
    });
    hotels.truncate(SHORTLIST_LIMIT);

    Shortlist { hotels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::RatePerNight;

    fn raw(name: &str, rate: f64, rating: Option<f64>) -> RawHotelRecord {
        RawHotelRecord {
            name: Some(name.to_string()),
            address: Some(format!("{name} Street")),
            overall_rating: rating,
            rate_per_night: Some(RatePerNight {
                extracted_lowest: Some(serde_json::json!(rate)),
            }),
            category: Some("hotel".to_string()),
        }
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&[]).is_empty());
    }

    #[test]
    fn test_rank_all_excluded() {
        let mut villa = raw("Villa", 500.0, Some(4.0));
        villa.category = Some("vacation rental".to_string());
        let free = raw("Free", 0.0, Some(3.0));

        assert!(rank(&[villa, free]).is_empty());
    }

    #[test]
    fn test_rank_orders_by_price_then_rating() {
        let shortlist = rank(&[
            raw("Pricey", 5000.0, Some(5.0)),
            raw("Cheap Low", 1000.0, Some(3.1)),
            raw("Cheap High", 1000.0, Some(4.8)),
            raw("Mid", 2000.0, None),
        ]);

        assert_eq!(shortlist.names(), vec!["Cheap High", "Cheap Low", "Mid", "Pricey"]);
    }

    #[test]
    fn test_rank_is_stable_on_exact_ties() {
        let shortlist = rank(&[
            raw("First", 1500.0, Some(4.0)),
            raw("Second", 1500.0, Some(4.0)),
            raw("Third", 1500.0, Some(4.0)),
        ]);

        assert_eq!(shortlist.names(), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_rank_caps_at_limit() {
        let records: Vec<RawHotelRecord> = (0..25)
            .map(|i| raw(&format!("Hotel {i}"), 1000.0 + f64::from(i) * 10.0, Some(4.0)))
            .collect();

        let shortlist = rank(&records);
        assert_eq!(shortlist.len(), SHORTLIST_LIMIT);
        assert_eq!(shortlist.hotels()[0].name, "Hotel 0");
        assert_eq!(shortlist.hotels()[9].name, "Hotel 9");
    }

    #[test]
    fn test_find_is_exact() {
        let shortlist = rank(&[raw("Taj", 1000.0, Some(4.5))]);
        assert!(shortlist.find("Taj").is_some());
        assert!(shortlist.find("taj").is_none());
        assert!(shortlist.find("Taj ").is_none());
    }
}
