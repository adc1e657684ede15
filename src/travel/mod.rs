//! Multi-trip travel model shared by the metaheuristic searches.
//!
//! - [`Trip`]: a traveler group's itinerary, with a resolved or open
//!   destination.
//! - [`PriceHistory`]: observed flight fares and hotel night rates.
//! - [`CostModel`]: composable [`CostTerm`]s producing itemized
//!   [`CostRecord`]s, with default rates substituted for missing prices.
//! - [`NeighborGenerator`]: date/destination perturbations within a
//!   flex-days budget.
//! - [`TravelProblem`]: the input every search procedure shares.
//! - [`Recommendation`]: ranked per-algorithm output.

mod cost;
mod history;
mod neighbor;
mod problem;
mod recommendation;
#[cfg(test)]
pub(crate) mod test_fixtures;
mod trip;

pub use cost::{
    CostModel, CostRecord, CostTerm, FlightCost, HotelCost, DEFAULT_FLIGHT_RATE,
    DEFAULT_NIGHT_RATE, TRIP_COST_KEY,
};
pub use history::{columns, NightRate, PriceHistory, PriceRecord};
pub use neighbor::{NeighborGenerator, MAX_DATE_DRIFT_DAYS};
pub use problem::TravelProblem;
#[cfg(feature = "serde")]
pub use recommendation::recommendations_to_json;
pub use recommendation::{
    dedup_by_rank, detailed_rows, Algorithm, DetailRow, Recommendation, TOP_RECOMMENDATIONS,
};
pub(crate) use recommendation::DestinationBoard;
pub use trip::{Destination, Trip};
