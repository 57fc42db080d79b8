//! Local cost metrics applied elementwise to pairs of samples.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Local distance metric between two samples.
///
/// A closed set of variants resolved at engine construction time, so the
/// inner DP loop pays no dynamic dispatch. Every metric is deterministic,
/// pure, and returns a non-negative cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Sum of absolute differences over sample dimensions. On scalar
    /// samples this is the plain absolute difference `|a - b|`.
    Absolute,

    /// Sum of squared differences over sample dimensions. On scalar
    /// samples this is the squared difference `(a - b)^2`.
    Squared,

    /// Squared Euclidean distance between fixed-dimension points. Same
    /// arithmetic as [`Metric::Squared`]; kept as its own variant because
    /// the configuration surface names both spellings.
    SquaredEuclidean,
}

impl Metric {
    /// Return the canonical configuration identifier for this metric.
    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Squared => "squared",
            Self::SquaredEuclidean => "sqeuclidean",
        }
    }

    /// Local cost between two samples of equal dimensionality.
    #[inline]
    pub(crate) fn cost(self, x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), y.len());
        match self {
            Self::Absolute => x.iter().zip(y).map(|(p, q)| (p - q).abs()).sum(),
            Self::Squared | Self::SquaredEuclidean => {
                x.iter().zip(y).map(|(p, q)| (p - q).powi(2)).sum()
            }
        }
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(Self::Absolute),
            "squared" => Ok(Self::Squared),
            "sqeuclidean" => Ok(Self::SquaredEuclidean),
            other => Err(ConfigError::UnknownMetric {
                identifier: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
