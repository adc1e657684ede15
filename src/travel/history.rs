//! Historical flight and hotel prices.
//!
//! The history is a flat list of dated price observations for a city. A
//! record may carry a flight fare (with its origin), a hotel night rate
//! (with its star rating), or both, matching a merged flight/hotel table.

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PriceDataError, TableError};
use crate::table::{Dataset, Record, Value};

/// Column names read by [`PriceHistory::from_dataset`].
pub mod columns {
    /// Observation date.
    pub const DATE: &str = "Date";
    /// Flight origin.
    pub const ORIGIN: &str = "Origin";
    /// Flight destination and hotel city.
    pub const CITY: &str = "City";
    /// One-way fare per traveler.
    pub const FLIGHT_PRICE: &str = "Flight Price";
    /// Hotel star rating.
    pub const STARS: &str = "Stars";
    /// Hotel rate per night.
    pub const NIGHT_PRICE: &str = "Night Price($)";
}

/// One dated price observation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceRecord {
    /// Observation date.
    pub date: NaiveDate,
    /// Flight origin, when the record carries a fare.
    pub origin: Option<String>,
    /// Flight destination and hotel city.
    pub city: String,
    /// One-way fare per traveler.
    pub flight_price: Option<f64>,
    /// Hotel star rating.
    pub stars: Option<u8>,
    /// Hotel rate per night.
    pub night_price: Option<f64>,
}

impl PriceRecord {
    /// Creates an observation with no prices.
    pub fn new(date: NaiveDate, city: impl Into<String>) -> Self {
        Self {
            date,
            origin: None,
            city: city.into(),
            flight_price: None,
            stars: None,
            night_price: None,
        }
    }

    /// Adds a fare from `origin` to this record's city.
    pub fn with_flight(mut self, origin: impl Into<String>, price: f64) -> Self {
        self.origin = Some(origin.into());
        self.flight_price = Some(price);
        self
    }

    /// Adds a hotel night rate.
    pub fn with_hotel(mut self, stars: u8, price: f64) -> Self {
        self.stars = Some(stars);
        self.night_price = Some(price);
        self
    }
}

/// Cheapest hotel rate for one night.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NightRate {
    /// Night (check-in date).
    #[cfg_attr(feature = "serde", serde(rename = "Date"))]
    pub date: NaiveDate,
    /// Rate for that night.
    #[cfg_attr(feature = "serde", serde(rename = "Night Price($)"))]
    pub price: f64,
}

fn checked_price(field: &'static str, value: f64, date: NaiveDate) -> Result<f64, PriceDataError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PriceDataError::MalformedPrice { field, value, date })
    }
}

/// Queryable price history.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct PriceHistory {
    records: Vec<PriceRecord>,
}

impl PriceHistory {
    /// Wraps a list of observations.
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self { records }
    }

    /// Reads a merged flight/hotel table (see [`columns`]).
    ///
    /// `Date` and `City` are required on every row; the price columns may be
    /// absent or left empty.
    pub fn from_dataset(data: &Dataset) -> Result<Self, TableError> {
        data.rows().iter().map(record_from_row).collect::<Result<Vec<_>, _>>().map(Self::new)
    }

    /// Appends an observation.
    pub fn push(&mut self, record: PriceRecord) {
        self.records.push(record);
    }

    /// All observations.
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no observations.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lowest fare from `origin` to `destination` on `date`, `None` when no
    /// fare was observed.
    pub fn flight_rate(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, PriceDataError> {
        let mut best: Option<f64> = None;
        for record in &self.records {
            if record.date != date
                || record.city != destination
                || record.origin.as_deref() != Some(origin)
            {
                continue;
            }
            if let Some(price) = record.flight_price {
                let price = checked_price("flight price", price, record.date)?;
                best = Some(best.map_or(price, |b| b.min(price)));
            }
        }
        Ok(best)
    }

    /// Cheapest night rate per date in `city` from `first_night` to
    /// `last_night` inclusive, optionally restricted to a star rating.
    ///
    /// Nights without an observed rate are omitted; the result is sorted by
    /// date.
    pub fn cheapest_nights(
        &self,
        city: &str,
        first_night: NaiveDate,
        last_night: NaiveDate,
        stars: Option<u8>,
    ) -> Result<Vec<NightRate>, PriceDataError> {
        let mut nights: Vec<NightRate> = Vec::new();
        for record in &self.records {
            if record.city != city
                || record.date < first_night
                || record.date > last_night
                || stars.is_some_and(|s| record.stars != Some(s))
            {
                continue;
            }
            let Some(price) = record.night_price else {
                continue;
            };
            let price = checked_price("night price", price, record.date)?;
            match nights.iter_mut().find(|n| n.date == record.date) {
                Some(night) if price < night.price => night.price = price,
                Some(_) => {}
                None => nights.push(NightRate {
                    date: record.date,
                    price,
                }),
            }
        }
        nights.sort_by_key(|n| n.date);
        Ok(nights)
    }
}

impl FromIterator<PriceRecord> for PriceHistory {
    fn from_iter<I: IntoIterator<Item = PriceRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn unexpected(column: &str, expected: &'static str, value: &Value) -> TableError {
    TableError::UnexpectedType {
        column: column.to_owned(),
        expected,
        value: value.to_string(),
    }
}

fn required<'a>(row: &'a Record, column: &str) -> Result<&'a Value, TableError> {
    row.get(column).ok_or_else(|| TableError::UnknownColumn {
        column: column.to_owned(),
    })
}

fn optional_f64(row: &Record, column: &str) -> Result<Option<f64>, TableError> {
    row.get(column)
        .map(|v| v.as_f64().ok_or_else(|| unexpected(column, "a number", v)))
        .transpose()
}

fn record_from_row(row: &Record) -> Result<PriceRecord, TableError> {
    let date_cell = required(row, columns::DATE)?;
    let date = date_cell
        .as_date()
        .ok_or_else(|| unexpected(columns::DATE, "a date", date_cell))?;
    let city_cell = required(row, columns::CITY)?;
    let city = city_cell
        .as_str()
        .ok_or_else(|| unexpected(columns::CITY, "a city name", city_cell))?;
    let origin = row
        .get(columns::ORIGIN)
        .map(|v| v.as_str().map(str::to_owned).ok_or_else(|| unexpected(columns::ORIGIN, "a city name", v)))
        .transpose()?;
    let stars = optional_f64(row, columns::STARS)?
        .map(|s| {
            if (0.0..=f64::from(u8::MAX)).contains(&s) && s.fract() == 0.0 {
                Ok(s as u8)
            } else {
                Err(TableError::UnexpectedType {
                    column: columns::STARS.to_owned(),
                    expected: "a star rating",
                    value: s.to_string(),
                })
            }
        })
        .transpose()?;

    Ok(PriceRecord {
        date,
        origin,
        city: city.to_owned(),
        flight_price: optional_f64(row, columns::FLIGHT_PRICE)?,
        stars,
        night_price: optional_f64(row, columns::NIGHT_PRICE)?,
    })
}
