//! Trip specification and its destination.

use std::fmt;

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::InputValidationError;

/// A trip destination: a resolved city or a list of acceptable cities.
///
/// Searches always resolve a trip to a single city before costing it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum Destination {
    /// One city.
    Single(String),
    /// Any of these cities.
    Choices(Vec<String>),
}

impl Destination {
    /// The resolved city, if there is exactly one.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(city) => Some(city),
            Self::Choices(cities) if cities.len() == 1 => Some(&cities[0]),
            Self::Choices(_) => None,
        }
    }

    /// Whether `city` is acceptable for this trip.
    pub fn admits(&self, city: &str) -> bool {
        match self {
            Self::Single(c) => c == city,
            Self::Choices(cities) => cities.iter().any(|c| c == city),
        }
    }

    /// Every acceptable city, in declaration order.
    pub fn choices(&self) -> &[String] {
        match self {
            Self::Single(city) => std::slice::from_ref(city),
            Self::Choices(cities) => cities,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(city) => f.write_str(city),
            Self::Choices(cities) => write!(f, "[{}]", cities.join(", ")),
        }
    }
}

impl From<&str> for Destination {
    fn from(city: &str) -> Self {
        Self::Single(city.to_owned())
    }
}

impl From<String> for Destination {
    fn from(city: String) -> Self {
        Self::Single(city)
    }
}

impl From<Vec<String>> for Destination {
    fn from(cities: Vec<String>) -> Self {
        Self::Choices(cities)
    }
}

impl From<Vec<&str>> for Destination {
    fn from(cities: Vec<&str>) -> Self {
        Self::Choices(cities.into_iter().map(str::to_owned).collect())
    }
}

/// One traveler group's trip.
///
/// Trips are plain values: search procedures derive new trips with
/// [`with_destination`](Self::with_destination) and
/// [`with_dates`](Self::with_dates) instead of editing shared ones.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use whatif_optim::travel::Trip;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
/// let trip = Trip::new("Chicago", "Seattle", day(3), day(6), 2).with_hotel_stars(4);
/// assert_eq!(trip.nights(), 3);
/// assert_eq!(trip.hotel_stars, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trip {
    /// Departure city.
    pub origin: String,
    /// Destination city or choices.
    pub destination: Destination,
    /// Outbound travel date.
    pub start_date: NaiveDate,
    /// Return travel date (hotel check-out).
    pub end_date: NaiveDate,
    /// Number of travelers.
    pub num_travelers: u32,
    /// Nights used for the default hotel estimate.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub max_nights: Option<u32>,
    /// Requested cabin class.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub flight_class: Option<String>,
    /// Preferred airline.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub airline: Option<String>,
    /// Preferred time of day.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub time_of_flight: Option<String>,
    /// Requested hotel star rating.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub hotel_stars: Option<u8>,
    /// Requested hotel amenities.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub amenities: Vec<String>,
}

impl Trip {
    /// Creates a trip with no optional attributes.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<Destination>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        num_travelers: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            start_date,
            end_date,
            num_travelers,
            max_nights: None,
            flight_class: None,
            airline: None,
            time_of_flight: None,
            hotel_stars: None,
            amenities: Vec::new(),
        }
    }

    /// Sets the nights used for the default hotel estimate.
    pub fn with_max_nights(mut self, nights: u32) -> Self {
        self.max_nights = Some(nights);
        self
    }

    /// Sets the cabin class.
    pub fn with_flight_class(mut self, class: impl Into<String>) -> Self {
        self.flight_class = Some(class.into());
        self
    }

    /// Sets the preferred airline.
    pub fn with_airline(mut self, airline: impl Into<String>) -> Self {
        self.airline = Some(airline.into());
        self
    }

    /// Sets the preferred time of day.
    pub fn with_time_of_flight(mut self, time: impl Into<String>) -> Self {
        self.time_of_flight = Some(time.into());
        self
    }

    /// Sets the requested hotel star rating.
    pub fn with_hotel_stars(mut self, stars: u8) -> Self {
        self.hotel_stars = Some(stars);
        self
    }

    /// Sets the requested amenities.
    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }

    /// Copy of this trip resolved to `city`.
    pub fn with_destination(&self, city: &str) -> Self {
        let mut trip = self.clone();
        trip.destination = Destination::Single(city.to_owned());
        trip
    }

    /// Copy of this trip with new travel dates.
    pub fn with_dates(&self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let mut trip = self.clone();
        trip.start_date = start_date;
        trip.end_date = end_date;
        trip
    }

    /// Nights between start and end date, zero for inverted dates.
    pub fn nights(&self) -> u32 {
        u32::try_from((self.end_date - self.start_date).num_days()).unwrap_or(0)
    }

    /// Whether the trip stays at its origin.
    pub fn is_stay_at_origin(&self) -> bool {
        self.destination.as_single() == Some(self.origin.as_str())
    }

    /// Checks the trip's dates and traveler count.
    pub fn validate(&self) -> Result<(), InputValidationError> {
        if self.end_date < self.start_date {
            return Err(InputValidationError::InvalidTripDates {
                origin: self.origin.clone(),
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }
        if self.num_travelers == 0 {
            return Err(InputValidationError::NoTravelers {
                origin: self.origin.clone(),
            });
        }
        Ok(())
    }
}
