//! Bounded top-N container keyed on cost.

use std::collections::HashSet;

use tracing::debug;

use crate::error::InvalidCapacity;

/// Growth factor before an intermediate sort-and-truncate.
pub const FLUSH_FACTOR: usize = 10_000;

/// Keeps the `n` lowest-cost `(result, cost)` pairs.
///
/// Deduplication is on cost alone: a pair whose cost equals one already held
/// is dropped, whatever its result. Infinite and NaN costs are never admitted.
///
/// # Examples
///
/// ```
/// use whatif_optim::topn::BoundedTopN;
///
/// let mut top = BoundedTopN::new(2).unwrap();
/// top.add("c", 30.0);
/// top.add("a", 10.0);
/// top.add("b", 20.0);
/// top.add("dup", 10.0);
/// top.add("never", f64::INFINITY);
/// assert_eq!(top.results(), vec![("a", 10.0), ("b", 20.0)]);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedTopN<T> {
    capacity: usize,
    items: Vec<(T, f64)>,
    costs: HashSet<u64>,
}

/// Hash key for a cost; `-0.0` and `0.0` share a key.
fn cost_key(cost: f64) -> u64 {
    (cost + 0.0).to_bits()
}

impl<T> BoundedTopN<T> {
    /// Creates a container retaining at most `capacity` results.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, InvalidCapacity> {
        if capacity == 0 {
            return Err(InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            items: Vec::new(),
            costs: HashSet::new(),
        })
    }

    /// Maximum number of results returned.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of pairs currently held, including ones pending truncation.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been admitted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offers a pair; returns whether it was admitted.
    pub fn add(&mut self, result: T, cost: f64) -> bool {
        if cost.is_nan() || cost == f64::INFINITY {
            return false;
        }
        if !self.costs.insert(cost_key(cost)) {
            return false;
        }
        self.items.push((result, cost));

        if self.items.len() > self.capacity.saturating_mul(FLUSH_FACTOR) {
            self.compact();
            debug!(
                kept = self.items.len(),
                best = self.items.first().map(|(_, c)| *c),
                "intermediate top-N cleanup"
            );
        }
        true
    }

    /// Sorts ascending by cost (stable) and drops all but the best `n`.
    fn compact(&mut self) {
        self.items.sort_by(|a, b| a.1.total_cmp(&b.1));
        self.items.truncate(self.capacity);
        self.costs = self.items.iter().map(|(_, c)| cost_key(*c)).collect();
    }

    /// Returns the retained pairs, ascending by cost.
    ///
    /// The container stays usable; later additions compete with the
    /// returned results.
    pub fn results(&mut self) -> Vec<(T, f64)>
    where
        T: Clone,
    {
        self.compact();
        self.items.clone()
    }

    /// Consumes the container, returning the retained pairs ascending by cost.
    pub fn into_results(mut self) -> Vec<(T, f64)> {
        self.compact();
        self.items
    }
}
