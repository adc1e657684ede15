//! Date sequences used to build parameter domains and filters.

mod range;

pub use range::{create_date_range, date_range};
