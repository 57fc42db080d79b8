//! High-throughput Dynamic Time Warping alignment engine.
//!
//! Pure math library — zero I/O. Aligns two numeric sequences (scalar or
//! fixed-dimension vector samples) under a pluggable local cost metric,
//! with an optional slope-scaled Sakoe-Chiba band, and returns the
//! cumulative cost and, on request, the optimal warping path. Pairwise
//! cost matrices over sequence collections are computed in parallel.
//!
//! The engine is stateless across calls: a [`Dtw`] value is an immutable
//! configuration, every invocation allocates its own call-scoped cost
//! buffers, and any number of alignments may run concurrently on one
//! engine.
//!
//! ```
//! use timewarp::{Dtw, Metric, Series};
//!
//! let dtw = Dtw::new(Metric::Squared);
//! let a = Series::new(vec![1.0, 2.0, 3.0])?;
//! let b = Series::new(vec![2.0, 2.0, 2.0])?;
//!
//! let (cost, path) = dtw.align(a.as_view(), b.as_view())?;
//! assert_eq!(cost.value(), 2.0);
//! assert_eq!(path.len(), 3);
//! # Ok::<(), timewarp::DtwError>(())
//! ```

mod constraint;
mod cost;
mod dtw;
mod error;
mod matrix;
mod metric;
mod path;
mod preprocess;
mod series;
mod table;

pub use constraint::WindowPolicy;
pub use cost::DtwCost;
pub use dtw::{Dtw, DtwConfig, DEFAULT_MAX_LENGTH};
pub use error::{ConfigError, DtwError, InputError, PreprocessError};
pub use matrix::PairwiseMatrix;
pub use metric::Metric;
pub use path::{WarpingPath, WarpingStep};
pub use preprocess::{derivative, z_normalize, z_normalize_batch};
pub use series::{Series, SeriesView};
