//! Composable trip cost model.
//!
//! A [`CostModel`] is an ordered list of [`CostTerm`]s. Each term returns
//! its contribution for one trip and writes its itemized fields into the
//! shared [`CostRecord`], so later terms and callers can read them without
//! recomputing. Missing price history never fails a term: fixed default
//! rates are substituted instead.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::history::{NightRate, PriceHistory};
use super::trip::Trip;
use crate::error::{EstimationError, PriceDataError, TripCalculationError};

/// One-way fare per traveler used when no fare was observed.
pub const DEFAULT_FLIGHT_RATE: f64 = 5000.0;

/// Hotel rate per traveler per night used when no rate was observed.
pub const DEFAULT_NIGHT_RATE: f64 = 15000.0;

/// Key of the total in [`CostRecord::get`].
pub const TRIP_COST_KEY: &str = "Trip Cost";

/// Itemized cost of one trip.
///
/// Fields left `None` were not written by any configured term.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CostRecord {
    /// The costed trip.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub trip: Trip,
    /// Outbound fare per traveler.
    #[cfg_attr(feature = "serde", serde(rename = "Flight Rate", skip_serializing_if = "Option::is_none"))]
    pub flight_rate: Option<f64>,
    /// Outbound fare for all travelers.
    #[cfg_attr(feature = "serde", serde(rename = "Flight Cost", skip_serializing_if = "Option::is_none"))]
    pub flight_cost: Option<f64>,
    /// Return fare per traveler.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Return Flight Rate", skip_serializing_if = "Option::is_none")
    )]
    pub return_flight_rate: Option<f64>,
    /// Return fare for all travelers.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Return Flight Cost", skip_serializing_if = "Option::is_none")
    )]
    pub return_flight_cost: Option<f64>,
    /// Hotel cost for all travelers.
    #[cfg_attr(feature = "serde", serde(rename = "Hotel Cost", skip_serializing_if = "Option::is_none"))]
    pub hotel_cost: Option<f64>,
    /// Sum of the observed night rates.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Hotel cost per person", skip_serializing_if = "Option::is_none")
    )]
    pub hotel_cost_per_person: Option<f64>,
    /// Cheapest observed rate per night.
    #[cfg_attr(feature = "serde", serde(rename = "Hotel Rates", default))]
    pub hotel_rates: Vec<NightRate>,
    /// Contributions of caller-defined terms, by term name.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub extras: BTreeMap<String, f64>,
    /// Sum of every term.
    #[cfg_attr(feature = "serde", serde(rename = "Trip Cost"))]
    pub trip_cost: f64,
}

impl CostRecord {
    /// Creates an empty record for `trip`.
    pub fn new(trip: Trip) -> Self {
        Self {
            trip,
            flight_rate: None,
            flight_cost: None,
            return_flight_rate: None,
            return_flight_cost: None,
            hotel_cost: None,
            hotel_cost_per_person: None,
            hotel_rates: Vec::new(),
            extras: BTreeMap::new(),
            trip_cost: 0.0,
        }
    }

    /// Looks up a numeric field by its display name ("Flight Rate",
    /// "Hotel Cost", [`TRIP_COST_KEY`], ...) or a caller term's name.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "Flight Rate" => self.flight_rate,
            "Flight Cost" => self.flight_cost,
            "Return Flight Rate" => self.return_flight_rate,
            "Return Flight Cost" => self.return_flight_cost,
            "Hotel Cost" => self.hotel_cost,
            "Hotel cost per person" => self.hotel_cost_per_person,
            TRIP_COST_KEY => Some(self.trip_cost),
            other => self.extras.get(other).copied(),
        }
    }
}

/// One additive component of a trip's cost.
pub trait CostTerm: Send + Sync + fmt::Debug {
    /// Name used in logs and in [`CostRecord::extras`].
    fn name(&self) -> &str;

    /// Returns the term's contribution for `trip`, recording itemized
    /// fields in `record`.
    ///
    /// `trip` always has a resolved destination when called through
    /// [`CostModel`].
    fn estimate(
        &self,
        trip: &Trip,
        history: &PriceHistory,
        record: &mut CostRecord,
    ) -> Result<f64, EstimationError>;
}

fn resolved_destination(trip: &Trip) -> Result<&str, PriceDataError> {
    trip.destination
        .as_single()
        .ok_or(PriceDataError::UnresolvedDestination)
}

/// Round-trip airfare for all travelers.
///
/// Outbound on the start date, return on the end date. Free when the trip
/// stays at its origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightCost;

impl FlightCost {
    fn estimate_fares(
        trip: &Trip,
        history: &PriceHistory,
        record: &mut CostRecord,
    ) -> Result<f64, PriceDataError> {
        let destination = resolved_destination(trip)?;
        if destination == trip.origin {
            record.flight_rate = Some(0.0);
            record.flight_cost = Some(0.0);
            record.return_flight_rate = Some(0.0);
            record.return_flight_cost = Some(0.0);
            return Ok(0.0);
        }

        let fare = |from: &str, to: &str, date| -> Result<f64, PriceDataError> {
            Ok(history.flight_rate(from, to, date)?.unwrap_or_else(|| {
                debug!(%from, %to, %date, "no fare observed, using default rate");
                DEFAULT_FLIGHT_RATE
            }))
        };
        let outbound = fare(&trip.origin, destination, trip.start_date)?;
        let inbound = fare(destination, &trip.origin, trip.end_date)?;
        let travelers = f64::from(trip.num_travelers);

        record.flight_rate = Some(outbound);
        record.flight_cost = Some(outbound * travelers);
        record.return_flight_rate = Some(inbound);
        record.return_flight_cost = Some(inbound * travelers);
        Ok((outbound + inbound) * travelers)
    }
}

impl CostTerm for FlightCost {
    fn name(&self) -> &str {
        "flight"
    }

    fn estimate(
        &self,
        trip: &Trip,
        history: &PriceHistory,
        record: &mut CostRecord,
    ) -> Result<f64, EstimationError> {
        Self::estimate_fares(trip, history, record).map_err(|source| EstimationError::Flight {
            origin: trip.origin.clone(),
            destination: trip.destination.to_string(),
            date: trip.start_date,
            source,
        })
    }
}

/// Hotel stay for all travelers.
///
/// Each night from the start date up to the day before the end date costs
/// its cheapest observed rate. With no observed rate at all, the stay costs
/// [`DEFAULT_NIGHT_RATE`] per traveler per night, counting `max_nights`
/// when the trip sets it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HotelCost {
    /// Star rating to restrict offers to; falls back to the trip's
    /// `hotel_stars`.
    pub stars: Option<u8>,
}

impl HotelCost {
    /// Hotel term restricted to a star rating.
    pub fn with_stars(stars: u8) -> Self {
        Self { stars: Some(stars) }
    }

    fn estimate_stay(
        &self,
        trip: &Trip,
        history: &PriceHistory,
        record: &mut CostRecord,
    ) -> Result<f64, PriceDataError> {
        let destination = resolved_destination(trip)?;
        if destination == trip.origin {
            record.hotel_cost = Some(0.0);
            record.hotel_cost_per_person = Some(0.0);
            record.hotel_rates.clear();
            return Ok(0.0);
        }
        let inverted = PriceDataError::InvertedStay {
            start: trip.start_date,
            end: trip.end_date,
        };
        if trip.end_date < trip.start_date {
            return Err(inverted);
        }
        let last_night = trip.end_date.pred_opt().ok_or(inverted)?;

        let stars = self.stars.or(trip.hotel_stars);
        let rates = history.cheapest_nights(destination, trip.start_date, last_night, stars)?;
        let per_person: f64 = rates.iter().map(|r| r.price).sum();
        let travelers = f64::from(trip.num_travelers);
        let cost = if rates.is_empty() {
            let nights = trip.max_nights.unwrap_or_else(|| trip.nights());
            debug!(city = destination, nights, "no hotel rate observed, using default rate");
            DEFAULT_NIGHT_RATE * travelers * f64::from(nights)
        } else {
            per_person * travelers
        };

        record.hotel_cost = Some(cost);
        record.hotel_cost_per_person = Some(per_person);
        record.hotel_rates = rates;
        Ok(cost)
    }
}

impl CostTerm for HotelCost {
    fn name(&self) -> &str {
        "hotel"
    }

    fn estimate(
        &self,
        trip: &Trip,
        history: &PriceHistory,
        record: &mut CostRecord,
    ) -> Result<f64, EstimationError> {
        self.estimate_stay(trip, history, record)
            .map_err(|source| EstimationError::Hotel {
                origin: trip.origin.clone(),
                destination: trip.destination.to_string(),
                date: trip.start_date,
                source,
            })
    }
}

/// Ordered list of cost terms summed into a trip's total.
///
/// Cloning is cheap: terms are shared.
#[derive(Debug, Clone)]
pub struct CostModel {
    terms: Vec<Arc<dyn CostTerm>>,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::standard()
    }
}

impl CostModel {
    /// A model with no terms (every trip costs zero).
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Flight plus hotel.
    pub fn standard() -> Self {
        Self::new().with_term(FlightCost).with_term(HotelCost::default())
    }

    /// Appends a term.
    pub fn with_term(mut self, term: impl CostTerm + 'static) -> Self {
        self.terms.push(Arc::new(term));
        self
    }

    /// Configured terms, in evaluation order.
    pub fn terms(&self) -> &[Arc<dyn CostTerm>] {
        &self.terms
    }

    /// Costs one trip: runs every term in order and stores their sum under
    /// [`TRIP_COST_KEY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use whatif_optim::travel::{CostModel, PriceHistory, PriceRecord, Trip};
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
    /// let history = PriceHistory::new(vec![
    ///     PriceRecord::new(day(3), "Seattle").with_flight("Chicago", 550.0),
    ///     PriceRecord::new(day(6), "Chicago").with_flight("Seattle", 400.0),
    /// ]);
    /// let trip = Trip::new("Chicago", "Seattle", day(3), day(6), 1).with_max_nights(0);
    ///
    /// let record = CostModel::standard().calculate_total_cost(&trip, &history).unwrap();
    /// assert_eq!(record.get("Trip Cost"), Some(950.0));
    /// ```
    pub fn calculate_total_cost(
        &self,
        trip: &Trip,
        history: &PriceHistory,
    ) -> Result<CostRecord, TripCalculationError> {
        let mut record = CostRecord::new(trip.clone());
        let mut total = 0.0;
        for term in &self.terms {
            total += term.estimate(trip, history, &mut record)?;
        }
        record.trip_cost = total;
        Ok(record)
    }

    /// Costs a set of trips, returning their combined total and one record
    /// per trip.
    pub fn evaluate(
        &self,
        trips: &[Trip],
        history: &PriceHistory,
    ) -> Result<(f64, Vec<CostRecord>), TripCalculationError> {
        let records = trips
            .iter()
            .map(|trip| self.calculate_total_cost(trip, history))
            .collect::<Result<Vec<_>, _>>()?;
        let total = records.iter().map(|r| r.trip_cost).sum();
        Ok((total, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimationError;
    use crate::travel::history::PriceRecord;
    use crate::travel::test_fixtures::{day, flight_history, hotel_history, merged_history};

    #[test]
    fn test_flight_estimate() {
        let trip = Trip::new("Chicago", "Seattle", day(3), day(6), 1);
        let mut record = CostRecord::new(trip.clone());
        let cost = FlightCost.estimate(&trip, &flight_history(), &mut record).unwrap();
        assert_eq!(cost, 950.0);
        assert_eq!(record.flight_rate, Some(550.0));
        assert_eq!(record.return_flight_rate, Some(400.0));
    }

    #[test]
    fn test_hotel_estimate() {
        let trip = Trip::new("Chicago", "Seattle", day(3), day(4), 1);
        let mut record = CostRecord::new(trip.clone());
        let cost = HotelCost::default()
            .estimate(&trip, &hotel_history(), &mut record)
            .unwrap();
        assert_eq!(cost, 55.0);
        assert_eq!(record.hotel_rates, vec![NightRate { date: day(3), price: 55.0 }]);
    }

    #[test]
    fn test_total_over_merged_history() {
        let trip = Trip::new("Chicago", "Seattle", day(3), day(5), 1);
        let record = CostModel::standard()
            .calculate_total_cost(&trip, &merged_history())
            .unwrap();
        assert_eq!(record.get(TRIP_COST_KEY), Some(5665.0));
        assert_eq!(record.return_flight_rate, Some(DEFAULT_FLIGHT_RATE));
        assert_eq!(record.hotel_cost, Some(115.0));
    }

    #[test]
    fn test_same_origin_and_destination_is_free() {
        let trip = Trip::new("Chicago", "Chicago", day(3), day(6), 4);
        let record = CostModel::standard()
            .calculate_total_cost(&trip, &PriceHistory::default())
            .unwrap();
        assert_eq!(record.trip_cost, 0.0);
        assert_eq!(record.flight_cost, Some(0.0));
        assert_eq!(record.hotel_cost, Some(0.0));
        assert!(record.hotel_rates.is_empty());
    }

    #[test]
    fn test_defaults_without_history() {
        let trip = Trip::new("Chicago", "Denver", day(3), day(6), 2);
        let record = CostModel::standard()
            .calculate_total_cost(&trip, &PriceHistory::default())
            .unwrap();
        assert_eq!(record.flight_cost, Some(2.0 * DEFAULT_FLIGHT_RATE));
        assert_eq!(record.return_flight_cost, Some(2.0 * DEFAULT_FLIGHT_RATE));
        assert_eq!(record.hotel_cost, Some(DEFAULT_NIGHT_RATE * 2.0 * 3.0));
        assert_eq!(record.hotel_cost_per_person, Some(0.0));

        let capped = trip.with_max_nights(1);
        let record = CostModel::standard()
            .calculate_total_cost(&capped, &PriceHistory::default())
            .unwrap();
        assert_eq!(record.hotel_cost, Some(DEFAULT_NIGHT_RATE * 2.0));
    }

    #[test]
    fn test_star_filter_from_trip() {
        let history = PriceHistory::new(vec![
            PriceRecord::new(day(3), "Seattle").with_hotel(3, 20.0),
            PriceRecord::new(day(3), "Seattle").with_hotel(5, 90.0),
        ]);
        let trip = Trip::new("Chicago", "Seattle", day(3), day(4), 1).with_hotel_stars(5);
        let mut record = CostRecord::new(trip.clone());
        assert_eq!(HotelCost::default().estimate(&trip, &history, &mut record).unwrap(), 90.0);
        assert_eq!(HotelCost::with_stars(3).estimate(&trip, &history, &mut record).unwrap(), 20.0);
    }

    #[test]
    fn test_malformed_price_wrapped_with_trip_context() {
        let history = PriceHistory::new(vec![
            PriceRecord::new(day(3), "Seattle").with_flight("Chicago", f64::NAN)
        ]);
        let trip = Trip::new("Chicago", "Seattle", day(3), day(4), 1);
        let err = CostModel::standard().calculate_total_cost(&trip, &history).unwrap_err();
        assert!(matches!(
            err.source,
            EstimationError::Flight { ref origin, date, source: PriceDataError::MalformedPrice { .. }, .. }
                if origin == "Chicago" && date == day(3)
        ));
    }

    #[test]
    fn test_unresolved_destination_fails() {
        let trip = Trip::new("Chicago", vec!["Seattle", "NYC"], day(3), day(4), 1);
        let err = CostModel::standard().calculate_total_cost(&trip, &PriceHistory::default());
        assert!(err.is_err());
    }

    #[derive(Debug)]
    struct PerDiem(f64);

    impl CostTerm for PerDiem {
        fn name(&self) -> &str {
            "Per Diem"
        }

        fn estimate(
            &self,
            trip: &Trip,
            _history: &PriceHistory,
            record: &mut CostRecord,
        ) -> Result<f64, EstimationError> {
            let cost = self.0 * f64::from(trip.num_travelers) * f64::from(trip.nights());
            record.extras.insert(self.name().to_owned(), cost);
            Ok(cost)
        }
    }

    #[test]
    fn test_custom_term_is_summed() {
        let trip = Trip::new("Chicago", "Chicago", day(3), day(5), 2);
        let model = CostModel::standard().with_term(PerDiem(50.0));
        let (total, records) = model.evaluate(&[trip.clone(), trip], &PriceHistory::default()).unwrap();
        assert_eq!(total, 400.0);
        assert_eq!(records[0].get("Per Diem"), Some(200.0));
        assert_eq!(model.terms().len(), 3);
    }
}
