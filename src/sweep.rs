//! Frequency grid builders and grid validation.

use crate::errors::{ModelError, Result};
use crate::math::Scalar;

/// Generates `n` linearly spaced samples in [start, stop].
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// Generates `n` logarithmically spaced samples between `start` and `stop` (Hz).
/// Requires start > 0 and stop > 0.
#[must_use]
pub fn logspace_hz(start_hz: Scalar, stop_hz: Scalar, n: usize) -> Vec<Scalar> {
    assert!(start_hz > 0.0 && stop_hz > 0.0);
    match n {
        0 => Vec::new(),
        1 => vec![start_hz],
        _ => {
            let log_start = start_hz.log10();
            let log_stop = stop_hz.log10();
            let step = (log_stop - log_start) / (n as Scalar - 1.0);
            (0..n)
                .map(|i| 10f64.powf(log_start + step * i as Scalar))
                .collect()
        }
    }
}

/// Checks that every grid point is finite and non-negative.
///
/// Zero is accepted; operations that cannot evaluate at DC check for it themselves.
pub fn validate_grid(freqs: &[Scalar]) -> Result<()> {
    for (i, &f) in freqs.iter().enumerate() {
        if !f.is_finite() || f < 0.0 {
            return Err(ModelError::InvalidValue(format!(
                "frequency[{i}] = {f} Hz must be finite and non-negative"
            )));
        }
    }
    Ok(())
}

/// Checks that a per-frequency array of `len` samples lines up with a grid of
/// `grid_len` points.
pub fn check_aligned(what: &str, len: usize, grid_len: usize) -> Result<()> {
    if len == grid_len {
        Ok(())
    } else {
        Err(ModelError::Configuration(format!(
            "{what} has {len} samples but the frequency grid has {grid_len}"
        )))
    }
}
