//! Candidate generation around a set of trips.

use chrono::{NaiveDate, TimeDelta};
use rand::Rng;

use super::trip::Trip;

/// A date is never moved further than this from the date it was drawn
/// around; larger draws keep the date unchanged.
pub const MAX_DATE_DRIFT_DAYS: i64 = 10;

fn shift(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(offset).and_then(|delta| date.checked_add_signed(delta))
}

fn drift(date: NaiveDate, offset: i64) -> NaiveDate {
    if offset.abs() > MAX_DATE_DRIFT_DAYS {
        return date;
    }
    shift(date, offset).unwrap_or(date)
}

/// Perturbs trips within a flex-days budget.
///
/// Departures only move earlier and returns only move later, so a
/// perturbed trip always covers the original stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborGenerator {
    flex_days: u32,
}

impl NeighborGenerator {
    /// Creates a generator with the given flex-days budget.
    pub fn new(flex_days: u32) -> Self {
        Self { flex_days }
    }

    /// The flex-days budget.
    pub fn flex_days(&self) -> u32 {
        self.flex_days
    }

    /// Random local move: a copy of `trip` sent to `destination`, its start
    /// date drawn from `[-flex, 0]` days around the current start and its
    /// end date from `[0, +flex]` days around the current end.
    pub fn local_move<R: Rng>(&self, trip: &Trip, destination: &str, rng: &mut R) -> Trip {
        let mut next = trip.with_destination(destination);
        if self.flex_days > 0 {
            let flex = i64::from(self.flex_days);
            next.start_date = drift(trip.start_date, rng.random_range(-flex..=0));
            next.end_date = drift(trip.end_date, rng.random_range(0..=flex));
        }
        next
    }

    /// Applies [`local_move`](Self::local_move) to every trip independently.
    pub fn neighbor<R: Rng>(&self, trips: &[Trip], destination: &str, rng: &mut R) -> Vec<Trip> {
        trips
            .iter()
            .map(|trip| self.local_move(trip, destination, rng))
            .collect()
    }

    /// Every date variant of a group of trips sharing one event window.
    ///
    /// The window is taken from the first trip. Each variant sends all trips
    /// to `destination` on a common departure in `[start - flex, start]` and
    /// a common return in `[end, end + flex]`, departure strictly before
    /// return. With no flex, the single variant only changes destinations.
    pub fn population_variants(&self, trips: &[Trip], destination: &str) -> Vec<Vec<Trip>> {
        let Some(first) = trips.first() else {
            return Vec::new();
        };
        let resolved: Vec<Trip> = trips.iter().map(|t| t.with_destination(destination)).collect();
        if self.flex_days == 0 {
            return vec![resolved];
        }

        let flex = i64::from(self.flex_days);
        let departures: Vec<NaiveDate> = (-flex..=0)
            .filter_map(|offset| shift(first.start_date, offset))
            .collect();
        let returns: Vec<NaiveDate> = (0..=flex)
            .filter_map(|offset| shift(first.end_date, offset))
            .collect();

        let mut variants = Vec::with_capacity(departures.len() * returns.len());
        for &departure in &departures {
            for &ret in returns.iter().filter(|&&ret| departure < ret) {
                variants.push(
                    resolved
                        .iter()
                        .map(|trip| trip.with_dates(departure, ret))
                        .collect(),
                );
            }
        }
        variants
    }
}
