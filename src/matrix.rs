//! Symmetric pairwise cost matrix in condensed storage.

use crate::cost::DtwCost;

/// Pairwise DTW costs for a collection of `k` sequences, stored as the
/// condensed lower triangle: `k*(k-1)/2` entries, entry
/// `row*(row-1)/2 + col` holding the cost between sequences `row` and
/// `col` with `row > col`. Access is symmetric and the diagonal is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    k: usize,
    condensed: Vec<f64>,
}

impl PairwiseMatrix {
    pub(crate) fn from_condensed(k: usize, condensed: Vec<f64>) -> Self {
        debug_assert_eq!(condensed.len(), k.saturating_sub(1) * k / 2);
        Self { k, condensed }
    }

    /// Return the number of sequences the matrix covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.k
    }

    /// Return true if the matrix covers no sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.k == 0
    }

    /// Return the cost between sequences `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()` or `j >= len()`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> DtwCost {
        assert!(i < self.k, "row {i} out of bounds for {} sequences", self.k);
        assert!(j < self.k, "column {j} out of bounds for {} sequences", self.k);
        if i == j {
            return DtwCost::ZERO;
        }
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        DtwCost::new(self.condensed[row * (row - 1) / 2 + col])
    }

    /// Iterate over all unique pairs `(i, j, cost)` with `i > j`.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (usize, usize, DtwCost)> + '_ {
        (1..self.k).flat_map(move |i| {
            (0..i).map(move |j| (i, j, DtwCost::new(self.condensed[i * (i - 1) / 2 + j])))
        })
    }

    /// Return the raw condensed lower triangle, ordered
    /// `(1,0), (2,0), (2,1), (3,0), ...`
    #[must_use]
    pub fn condensed(&self) -> &[f64] {
        &self.condensed
    }
}
