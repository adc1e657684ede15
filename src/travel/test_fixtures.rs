//! Price histories shared by the travel and search tests.

use chrono::NaiveDate;

use super::history::{PriceHistory, PriceRecord};
use super::trip::Trip;

pub(crate) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
}

const FLIGHTS: [(u32, &str, &str, f64); 16] = [
    (1, "Chicago", "Seattle", 1000.0),
    (2, "Chicago", "Seattle", 2000.0),
    (3, "Chicago", "Seattle", 550.0),
    (4, "Chicago", "Seattle", 660.0),
    (5, "Seattle", "Chicago", 200.0),
    (6, "Seattle", "Chicago", 400.0),
    (7, "Seattle", "Chicago", 800.0),
    (8, "Seattle", "Chicago", 1200.0),
    (1, "Chicago", "NYC", 800.0),
    (2, "Chicago", "NYC", 1500.0),
    (3, "Chicago", "NYC", 400.0),
    (4, "Chicago", "NYC", 800.0),
    (5, "NYC", "Chicago", 300.0),
    (6, "NYC", "Chicago", 150.0),
    (7, "NYC", "Chicago", 1200.0),
    (8, "NYC", "Chicago", 1000.0),
];

const HOTELS: [(&str, [f64; 8]); 2] = [
    ("Seattle", [150.0, 250.0, 55.0, 60.0, 200.0, 250.0, 70.0, 50.0]),
    ("NYC", [165.0, 220.0, 70.0, 40.0, 250.0, 220.0, 75.0, 60.0]),
];

fn hotel_rate(city: &str, d: u32) -> Option<f64> {
    HOTELS
        .iter()
        .find(|(c, _)| *c == city)
        .map(|(_, prices)| prices[(d - 1) as usize])
}

pub(crate) fn flight_history() -> PriceHistory {
    FLIGHTS
        .iter()
        .map(|(d, origin, city, price)| PriceRecord::new(day(*d), *city).with_flight(*origin, *price))
        .collect()
}

pub(crate) fn hotel_history() -> PriceHistory {
    HOTELS
        .iter()
        .flat_map(|(city, prices)| {
            prices
                .iter()
                .zip(1..)
                .map(move |(price, d)| PriceRecord::new(day(d), *city).with_hotel(4, *price))
        })
        .collect()
}

/// Flights joined with hotel rates on (date, city); flights into a city
/// without hotel data are dropped.
pub(crate) fn merged_history() -> PriceHistory {
    FLIGHTS
        .iter()
        .filter_map(|(d, origin, city, price)| {
            hotel_rate(city, *d).map(|night| {
                PriceRecord::new(day(*d), *city)
                    .with_flight(*origin, *price)
                    .with_hotel(4, night)
            })
        })
        .collect()
}

/// Chicago to Seattle over the night of April 3rd, one traveler.
pub(crate) fn seattle_trip() -> Vec<Trip> {
    vec![Trip::new("Chicago", "Seattle", day(3), day(4), 1)]
}

pub(crate) fn destinations() -> Vec<String> {
    vec!["Seattle".to_owned(), "NYC".to_owned()]
}
