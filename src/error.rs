//! Error types for DTW alignment and preprocessing.

/// Top-level error returned by [`Dtw`][crate::Dtw] operations.
///
/// Every failure is reported synchronously to the caller and leaves no
/// observable side effects; the engine never retries internally and never
/// returns partial results.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// The engine configuration cannot produce a valid alignment.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The input sequences violate the alignment contract.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// A sequence is longer than the configured maximum. Checked before any
    /// table allocation.
    #[error("sequence length {len} exceeds the configured maximum {max}")]
    ResourceLimitExceeded {
        /// Offending sequence length.
        len: usize,
        /// Configured maximum length.
        max: usize,
    },
}

/// Configuration errors, raised at engine construction or window validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Returned when a metric identifier does not name a supported metric.
    #[error("unknown metric identifier `{identifier}` (expected absolute, squared, or sqeuclidean)")]
    UnknownMetric {
        /// The identifier as supplied.
        identifier: String,
    },

    /// Returned when a window identifier does not name a supported policy.
    #[error("unknown window policy `{identifier}` (expected none or band)")]
    UnknownWindow {
        /// The identifier as supplied.
        identifier: String,
    },

    /// Returned when a Sakoe-Chiba band is too narrow to admit any monotone
    /// path between sequences of unequal length.
    #[error("band radius {radius} cannot bridge a length gap of {required}")]
    BandTooNarrow {
        /// The requested band radius.
        radius: usize,
        /// The minimum radius that keeps a feasible path, `|n - m|`.
        required: usize,
    },
}

/// Input errors, raised when a sequence buffer or a sequence pair violates
/// the alignment contract.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Returned when the two sequences carry samples of different
    /// dimensionality.
    #[error("sample dimensionality mismatch: left has {left}, right has {right}")]
    DimensionMismatch {
        /// Dimensionality of the left sequence.
        left: usize,
        /// Dimensionality of the right sequence.
        right: usize,
    },

    /// Returned when exactly one of the two sequences is empty. No
    /// meaningful alignment exists in that case.
    #[error("cannot align an empty sequence against a non-empty one ({left} vs {right} samples)")]
    EmptyMismatch {
        /// Sample count of the left sequence.
        left: usize,
        /// Sample count of the right sequence.
        right: usize,
    },

    /// Returned when a per-sample dimensionality of zero is requested.
    #[error("sample dimensionality must be at least 1")]
    ZeroDimension,

    /// Returned when the per-sample stride is smaller than the sample
    /// dimensionality.
    #[error("stride {stride} is smaller than the sample dimensionality {dims}")]
    StrideTooSmall {
        /// The requested stride, in buffer elements.
        stride: usize,
        /// The per-sample dimensionality.
        dims: usize,
    },

    /// Returned when a buffer length does not decompose into whole samples
    /// under the given dimensionality and stride.
    #[error("buffer of {len} elements does not decompose into samples of {dims} values at stride {stride}")]
    StrideMismatch {
        /// Total buffer length in elements.
        len: usize,
        /// The per-sample dimensionality.
        dims: usize,
        /// The per-sample stride.
        stride: usize,
    },

    /// Returned when a sequence contains NaN or an infinity.
    #[error("sequence contains a non-finite value at buffer index {index}")]
    NonFinite {
        /// Flat buffer position of the first non-finite value found.
        index: usize,
    },
}

/// Errors from sequence preprocessing.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// Returned when a transform is applied to an empty sequence.
    #[error("cannot preprocess an empty sequence")]
    Empty,

    /// Returned when a channel has zero variance and cannot be normalized.
    #[error("channel {channel} is constant at {value} (zero variance)")]
    ConstantChannel {
        /// Index of the constant sample dimension.
        channel: usize,
        /// The constant value.
        value: f64,
    },

    /// Returned when a sequence is too short for the derivative transform.
    #[error("derivative needs at least 3 samples, got {len}")]
    TooShort {
        /// Sample count of the input sequence.
        len: usize,
    },
}
