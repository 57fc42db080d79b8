//! Sequence preprocessing: z-normalization and derivative transform.
//!
//! Multi-dimensional sequences are treated as independent channels, one
//! per sample dimension.

use crate::error::PreprocessError;
use crate::series::Series;

/// Z-normalize a sequence to zero mean and unit variance per channel.
///
/// Uses population standard deviation (divides by n, not n-1).
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PreprocessError::Empty`] | The sequence has no samples |
/// | [`PreprocessError::ConstantChannel`] | A channel has zero variance |
#[must_use = "returns a new normalized sequence; the original is unchanged"]
pub fn z_normalize(series: &Series) -> Result<Series, PreprocessError> {
    let n = series.len();
    if n == 0 {
        return Err(PreprocessError::Empty);
    }
    let dims = series.dims();
    let view = series.as_view();
    let mut out = vec![0.0; n * dims];

    for d in 0..dims {
        let mean = (0..n).map(|t| view.sample(t)[d]).sum::<f64>() / n as f64;
        let variance =
            (0..n).map(|t| (view.sample(t)[d] - mean).powi(2)).sum::<f64>() / n as f64;
        let std = variance.sqrt();

        if std == 0.0 {
            return Err(PreprocessError::ConstantChannel { channel: d, value: mean });
        }

        for t in 0..n {
            out[t * dims + d] = (view.sample(t)[d] - mean) / std;
        }
    }

    // z-normalized values are always finite when input is finite and std > 0
    Ok(Series::multi(out, dims).expect("z-normalized values should be finite"))
}

/// Z-normalize a batch of sequences.
///
/// # Errors
///
/// Returns the first [`PreprocessError`] encountered.
#[must_use = "returns a new vector of normalized sequences"]
pub fn z_normalize_batch(series: &[Series]) -> Result<Vec<Series>, PreprocessError> {
    series.iter().map(z_normalize).collect()
}

/// Compute the Keogh-Pazzani first derivative of a sequence, per channel.
///
/// For interior samples (1..n-1):
/// `d[t] = ((x[t] - x[t-1]) + (x[t+1] - x[t-1]) / 2) / 2`.
/// Output length is `n - 2` (drops the first and last samples).
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PreprocessError::TooShort`] | Fewer than 3 samples |
#[must_use = "returns a new derivative sequence; the original is unchanged"]
pub fn derivative(series: &Series) -> Result<Series, PreprocessError> {
    let n = series.len();
    if n < 3 {
        return Err(PreprocessError::TooShort { len: n });
    }
    let dims = series.dims();
    let view = series.as_view();
    let mut out = vec![0.0; (n - 2) * dims];

    for t in 1..n - 1 {
        let prev = view.sample(t - 1);
        let here = view.sample(t);
        let next = view.sample(t + 1);
        for d in 0..dims {
            out[(t - 1) * dims + d] =
                ((here[d] - prev[d]) + (next[d] - prev[d]) / 2.0) / 2.0;
        }
    }

    // derivative of finite values is always finite
    Ok(Series::multi(out, dims).expect("derivative values should be finite"))
}
