//! Search payload to shortlist, end to end

use hotel_concierge::pricing::{ProviderName, SHORTLIST_LIMIT};
use hotel_concierge::search::parse_properties;
use hotel_concierge::{normalize, rank};
use serde_json::json;

mod common;

use common::hotel;

#[test]
fn test_provider_payload_to_shortlist() {
    let body = json!({
        "search_metadata": { "status": "Success" },
        "properties": [
            {
                "type": "hotel",
                "name": "Taj Mahal Palace",
                "address": "Apollo Bandar, Colaba",
                "overall_rating": 4.7,
                "rate_per_night": { "lowest": "₹24,000", "extracted_lowest": 24000 }
            },
            {
                "type": "vacation rental",
                "name": "Sea View Flat",
                "rate_per_night": { "extracted_lowest": 3000 }
            },
            {
                "type": "Boutique Hotel",
                "name": "Abode",
                "overall_rating": 4.4,
                "rate_per_night": { "extracted_lowest": "7500" }
            },
            {
                "type": "hotel",
                "name": "Sold Out Inn",
                "rate_per_night": { "extracted_lowest": 0 }
            },
            {
                "type": "hotel",
                "name": "Budget Stay",
                "rate_per_night": { "extracted_lowest": 1499.99 }
            }
        ]
    });

    let records = parse_properties(&body);
    assert_eq!(records.len(), 3);

    let shortlist = rank(&records);
    assert_eq!(shortlist.names(), vec!["Budget Stay", "Abode", "Taj Mahal Palace"]);

    let budget = shortlist.find("Budget Stay").unwrap();
    assert_eq!(budget.address, "No address");
    assert!(budget.rating.abs() < f64::EPSILON);
    assert_eq!(budget.min_price.to_string(), "1469.99");
    assert_eq!(budget.cheapest_provider(), Some(ProviderName::MakeMyTrip));

    let abode = shortlist.find("Abode").unwrap();
    assert_eq!(abode.price_for(ProviderName::Agoda).unwrap().to_string(), "7875.00");
    assert_eq!(abode.price_for(ProviderName::Trivago).unwrap().to_string(), "7650.00");
}

#[test]
fn test_reference_hotel_quote() {
    let taj = normalize(&hotel("Taj", 1000.0, 4.5)).unwrap();

    assert_eq!(taj.min_price.to_string(), "980.00");
    let quotes: Vec<String> = ProviderName::ALL
        .into_iter()
        .map(|p| taj.price_for(p).unwrap().to_string())
        .collect();
    assert_eq!(quotes, vec!["1000.00", "1050.00", "980.00", "1020.00"]);
    assert!((taj.rating - 4.5).abs() < f64::EPSILON);
}

#[test]
fn test_large_result_set_is_capped_and_ordered() {
    let records: Vec<_> = (0..25u32)
        .map(|i| hotel(&format!("Hotel {i}"), f64::from(5000 - i * 100), 4.0))
        .collect();

    let shortlist = rank(&records);

    assert_eq!(shortlist.len(), SHORTLIST_LIMIT);
    let prices: Vec<_> = shortlist.iter().map(|h| h.min_price).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(shortlist.hotels()[0].name, "Hotel 24");
}

#[test]
fn test_equal_prices_prefer_higher_rating() {
    let records = vec![
        hotel("Plain", 2000.0, 3.9),
        hotel("Loved", 2000.0, 4.9),
        hotel("Also Plain", 2000.0, 3.9),
    ];

    let shortlist = rank(&records);
    assert_eq!(shortlist.names(), vec!["Loved", "Plain", "Also Plain"]);
}
