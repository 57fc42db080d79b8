//! DTW engine facade.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::constraint::WindowPolicy;
use crate::cost::DtwCost;
use crate::error::{ConfigError, DtwError, InputError};
use crate::matrix::PairwiseMatrix;
use crate::metric::Metric;
use crate::path::WarpingPath;
use crate::series::{Series, SeriesView};
use crate::table::{self, CostTable};

/// Default cap on sequence length, guarding against unbounded table
/// allocation. Override with [`Dtw::with_max_length`].
pub const DEFAULT_MAX_LENGTH: usize = 100_000;

/// Immutable DTW engine configuration. Thread-safe and copyable; a single
/// instance may serve any number of concurrent alignments, since every
/// call allocates its own cost buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dtw {
    metric: Metric,
    window: WindowPolicy,
    max_length: usize,
}

impl Dtw {
    /// Create an unconstrained engine with the given metric and the
    /// default length cap.
    #[must_use]
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            window: WindowPolicy::Unconstrained,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Replace the window policy.
    #[must_use]
    pub fn with_window(mut self, window: WindowPolicy) -> Self {
        self.window = window;
        self
    }

    /// Restrict computation to a Sakoe-Chiba band of the given radius.
    #[must_use]
    pub fn with_band(mut self, radius: usize) -> Self {
        self.window = WindowPolicy::SakoeChiba { radius };
        self
    }

    /// Replace the maximum accepted sequence length.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Return the configured metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Return the configured window policy.
    #[must_use]
    pub fn window(&self) -> WindowPolicy {
        self.window
    }

    /// Return the maximum accepted sequence length.
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Compute the DTW cost between two sequences.
    ///
    /// Uses a rolling two-row buffer rather than the full cost table:
    /// O(n * bw) time and O(bw) memory, where `bw` is the band width
    /// (`m` unconstrained). Two empty sequences align at zero cost.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidInput`] | Dims differ, or exactly one sequence is empty |
    /// | [`DtwError::ResourceLimitExceeded`] | A length exceeds [`max_length`][Self::max_length] |
    /// | [`DtwError::InvalidConfiguration`] | Band radius below the length gap |
    #[instrument(skip(self, a, b), fields(n = a.len(), m = b.len()))]
    pub fn distance(&self, a: SeriesView<'_>, b: SeriesView<'_>) -> Result<DtwCost, DtwError> {
        if self.preflight(a, b)? {
            return Ok(DtwCost::ZERO);
        }
        let cost = table::accumulate(a, b, self.metric, self.window, None);
        Ok(DtwCost::new(cost))
    }

    /// Compute the DTW cost with exact early abandoning.
    ///
    /// Returns [`DtwCost::INFINITY`] as soon as the accumulation proves the
    /// cost exceeds `cutoff` (in the metric's cost units); any finite
    /// result equals [`distance`][Self::distance] for the same inputs.
    /// Useful for nearest-neighbour searches where most candidates lose to
    /// an incumbent.
    ///
    /// # Errors
    ///
    /// Same conditions as [`distance`][Self::distance].
    #[instrument(skip(self, a, b), fields(n = a.len(), m = b.len()))]
    pub fn distance_with_cutoff(
        &self,
        a: SeriesView<'_>,
        b: SeriesView<'_>,
        cutoff: f64,
    ) -> Result<DtwCost, DtwError> {
        if self.preflight(a, b)? {
            return Ok(DtwCost::ZERO);
        }
        let cost = table::accumulate(a, b, self.metric, self.window, Some(cutoff));
        Ok(DtwCost::new(cost))
    }

    /// Compute the DTW cost and the optimal warping path.
    ///
    /// Allocates the full banded cost table plus direction bytes for
    /// traceback, O(n * bw) time and memory; the table is released once
    /// backtracking completes. Use [`distance`][Self::distance] when only
    /// the cost is needed. Two empty sequences yield zero cost and an
    /// empty path.
    ///
    /// # Errors
    ///
    /// Same conditions as [`distance`][Self::distance].
    #[instrument(skip(self, a, b), fields(n = a.len(), m = b.len()))]
    pub fn align(
        &self,
        a: SeriesView<'_>,
        b: SeriesView<'_>,
    ) -> Result<(DtwCost, WarpingPath), DtwError> {
        if self.preflight(a, b)? {
            return Ok((DtwCost::ZERO, WarpingPath::empty()));
        }
        let table = CostTable::fill(a, b, self.metric, self.window);
        let cost = table.final_cost();
        let steps = table.traceback();
        Ok((DtwCost::new(cost), WarpingPath::new(steps)))
    }

    /// Compute DTW costs for all unique pairs of a collection.
    ///
    /// Pairs are computed in parallel with rayon over the condensed lower
    /// triangle. Any failing pair aborts the whole call with its error.
    ///
    /// # Errors
    ///
    /// Same conditions as [`distance`][Self::distance], applied per pair.
    #[instrument(skip(self, series), fields(count = series.len()))]
    pub fn pairwise(&self, series: &[Series]) -> Result<PairwiseMatrix, DtwError> {
        let k = series.len();
        let views: Vec<SeriesView<'_>> = series.iter().map(Series::as_view).collect();
        let total = k.saturating_sub(1) * k / 2;

        let condensed: Vec<f64> = (0..total)
            .into_par_iter()
            .map(|flat| {
                // Condensed index back to (row, col) with row > col:
                // flat = row*(row-1)/2 + col
                let row = ((1.0 + (1.0 + 8.0 * flat as f64).sqrt()) / 2.0).floor() as usize;
                let col = flat - row * (row - 1) / 2;
                self.distance(views[row], views[col]).map(DtwCost::value)
            })
            .collect::<Result<_, _>>()?;

        Ok(PairwiseMatrix::from_condensed(k, condensed))
    }

    /// Shared per-call validation. Returns `Ok(true)` for the trivial
    /// empty-empty alignment, `Ok(false)` when the DP should run.
    fn preflight(&self, a: SeriesView<'_>, b: SeriesView<'_>) -> Result<bool, DtwError> {
        if a.dims() != b.dims() {
            return Err(InputError::DimensionMismatch {
                left: a.dims(),
                right: b.dims(),
            }
            .into());
        }

        let n = a.len();
        let m = b.len();
        if n == 0 && m == 0 {
            return Ok(true);
        }
        if n == 0 || m == 0 {
            return Err(InputError::EmptyMismatch { left: n, right: m }.into());
        }
        if n > self.max_length {
            return Err(DtwError::ResourceLimitExceeded {
                len: n,
                max: self.max_length,
            });
        }
        if m > self.max_length {
            return Err(DtwError::ResourceLimitExceeded {
                len: m,
                max: self.max_length,
            });
        }
        self.window.validate(n, m)?;
        Ok(false)
    }
}

/// Identifier-based configuration surface for constructing a [`Dtw`]
/// engine, e.g. from a deserialized settings document.
///
/// # Defaults
///
/// | Field | Default |
/// |---|---|
/// | `window` | `"none"` |
/// | `band_radius` | 0 |
/// | `max_length` | [`DEFAULT_MAX_LENGTH`] |
///
/// `band_radius` is only consulted when `window` is `"band"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtwConfig {
    /// Metric identifier: `"absolute"`, `"squared"`, or `"sqeuclidean"`.
    pub metric: String,
    /// Window identifier: `"none"` or `"band"`.
    #[serde(default = "default_window")]
    pub window: String,
    /// Sakoe-Chiba band radius.
    #[serde(default)]
    pub band_radius: usize,
    /// Maximum accepted sequence length.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_window() -> String {
    "none".to_string()
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl DtwConfig {
    /// Create a configuration for the given metric identifier with all
    /// other fields at their defaults.
    #[must_use]
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            window: default_window(),
            band_radius: 0,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Resolve the identifiers and build an engine.
    ///
    /// Unknown identifiers fail here, at construction time, never
    /// mid-computation.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConfigError::UnknownMetric`] | `metric` names no supported metric |
    /// | [`ConfigError::UnknownWindow`] | `window` is neither `"none"` nor `"band"` |
    pub fn build(&self) -> Result<Dtw, DtwError> {
        let metric: Metric = self.metric.parse()?;
        let window = match self.window.as_str() {
            "none" => WindowPolicy::Unconstrained,
            "band" => WindowPolicy::SakoeChiba {
                radius: self.band_radius,
            },
            other => {
                return Err(ConfigError::UnknownWindow {
                    identifier: other.to_string(),
                }
                .into())
            }
        };
        Ok(Dtw {
            metric,
            window,
            max_length: self.max_length,
        })
    }
}
