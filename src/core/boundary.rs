//! Sorted boundary index for directional nearest-neighbor queries
//!
//! Holds gene start (or end) coordinates in ascending order and answers
//! "closest boundary at or before x" and "closest boundary at or after x"
//! with a binary search.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Sorted `(boundary, payload)` pairs
///
/// Values and payloads live in parallel vectors so the search only touches
/// the value array. Equal boundaries keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundaryIndex<P> {
    values: Vec<u64>,
    payloads: Vec<P>,
}

// Decoded indexes must satisfy the same invariants as built ones:
// non-empty, one payload per value, values ascending.
impl<'de, P: Deserialize<'de>> Deserialize<'de> for BoundaryIndex<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Parts<P> {
            values: Vec<u64>,
            payloads: Vec<P>,
        }

        let Parts { values, payloads } = Parts::deserialize(deserializer)?;
        if values.is_empty() {
            return Err(D::Error::custom("boundary index is empty"));
        }
        if values.len() != payloads.len() {
            return Err(D::Error::custom(format!(
                "boundary index has {} values but {} payloads",
                values.len(),
                payloads.len()
            )));
        }
        if values.windows(2).any(|w| w[0] > w[1]) {
            return Err(D::Error::custom("boundary values are not sorted"));
        }
        Ok(Self { values, payloads })
    }
}

impl<P> BoundaryIndex<P> {
    /// Build from unsorted pairs
    ///
    /// Returns `None` for an empty input: a partition without genes has no
    /// boundary index.
    pub fn new(mut pairs: Vec<(u64, P)>) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }
        // stable, so ties stay in insertion order
        pairs.sort_by_key(|(value, _)| *value);
        let (values, payloads) = pairs.into_iter().unzip();
        Some(Self { values, payloads })
    }

    /// The pair with the greatest boundary `<= x`
    ///
    /// # Examples
    /// ```
    /// use gene_locator::core::BoundaryIndex;
    /// let index = BoundaryIndex::new(vec![(23, "foo"), (25, "bar")]).unwrap();
    /// assert_eq!(index.nearest_at_or_before(22), None);
    /// assert_eq!(index.nearest_at_or_before(24), Some((23, &"foo")));
    /// ```
    pub fn nearest_at_or_before(&self, x: u64) -> Option<(u64, &P)> {
        // rightmost insertion point, then one step back
        let idx = self.values.partition_point(|&v| v <= x).checked_sub(1)?;
        Some((self.values[idx], &self.payloads[idx]))
    }

    /// The pair with the smallest boundary `>= x`
    pub fn nearest_at_or_after(&self, x: u64) -> Option<(u64, &P)> {
        let idx = self.values.partition_point(|&v| v < x);
        if idx == self.values.len() {
            return None;
        }
        Some((self.values[idx], &self.payloads[idx]))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Payloads in boundary order
    pub fn payloads(&self) -> &[P] {
        &self.payloads
    }

    /// Always false for a constructed index
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Smallest boundary
    pub fn min(&self) -> u64 {
        self.values[0]
    }

    /// Largest boundary
    pub fn max(&self) -> u64 {
        self.values[self.values.len() - 1]
    }
}
