//! Conversions between propagation constant, effective permittivity and loss.
//!
//! The propagation constant `γ = α + jβ` is in natural units per meter. Effective
//! permittivity follows the same `e^{jωt}` convention as the material models, so a lossy
//! line has `Im(ereff) < 0`.

use std::f64::consts::{LOG10_E, PI};

use crate::constants::vacuum_light_speed;
use crate::errors::{ModelError, Result};
use crate::math::{forward_sqrt, CScalar, Scalar};
use crate::sweep::check_aligned;

/// Magnitude in dB, `20·log10|x|`.
#[inline]
#[must_use]
pub fn mag_to_db(x: CScalar) -> Scalar {
    20.0 * x.norm().log10()
}

/// Linear magnitude from dB, `10^(db/20)`.
#[inline]
#[must_use]
pub fn db_to_mag(db: Scalar) -> Scalar {
    10f64.powf(db / 20.0)
}

/// Effective relative permittivity `−(c0·γ/(2πf))²` from the propagation constant.
///
/// `freq_hz` must be positive.
#[must_use]
pub fn gamma_to_ereff(gamma: CScalar, freq_hz: Scalar) -> CScalar {
    let scaled = gamma * (vacuum_light_speed() / (2.0 * PI * freq_hz));
    -(scaled * scaled)
}

/// Propagation constant `(2πf/c0)·√(−ereff)` on the forward-wave branch.
///
/// The root is chosen with `Re γ ≥ 0` (non-negative attenuation) and, for a lossless
/// line where `Re γ = 0`, with `Im γ ≥ 0`. `freq_hz` must be positive.
#[must_use]
pub fn ereff_to_gamma(ereff: CScalar, freq_hz: Scalar) -> CScalar {
    forward_sqrt(-ereff) * (2.0 * PI * freq_hz / vacuum_light_speed())
}

/// Attenuation in dB per millimeter, `20·log10(exp(Re γ · 1e−3))`.
#[inline]
#[must_use]
pub fn gamma_to_db_per_mm(gamma: CScalar) -> Scalar {
    20.0 * gamma.re * 1.0e-3 * LOG10_E
}

/// Effective loss tangent `−Im(ereff)/Re(ereff)`.
#[inline]
#[must_use]
pub fn effective_loss_tangent(ereff: CScalar) -> Scalar {
    -ereff.im / ereff.re
}

fn check_positive(freqs: &[Scalar]) -> Result<()> {
    match freqs.iter().position(|&f| !(f.is_finite() && f > 0.0)) {
        Some(i) => Err(ModelError::InvalidValue(format!(
            "frequency[{i}] = {} Hz must be positive",
            freqs[i]
        ))),
        None => Ok(()),
    }
}

/// [`gamma_to_ereff`] over a frequency grid.
pub fn gamma_to_ereff_sweep(gamma: &[CScalar], freqs: &[Scalar]) -> Result<Vec<CScalar>> {
    check_aligned("gamma", gamma.len(), freqs.len())?;
    check_positive(freqs)?;
    Ok(gamma
        .iter()
        .zip(freqs)
        .map(|(&g, &f)| gamma_to_ereff(g, f))
        .collect())
}

/// [`ereff_to_gamma`] over a frequency grid.
pub fn ereff_to_gamma_sweep(ereff: &[CScalar], freqs: &[Scalar]) -> Result<Vec<CScalar>> {
    check_aligned("ereff", ereff.len(), freqs.len())?;
    check_positive(freqs)?;
    Ok(ereff
        .iter()
        .zip(freqs)
        .map(|(&e, &f)| ereff_to_gamma(e, f))
        .collect())
}

/// [`gamma_to_db_per_mm`] over a sequence.
#[must_use]
pub fn gamma_to_db_per_mm_sweep(gamma: &[CScalar]) -> Vec<Scalar> {
    gamma.iter().copied().map(gamma_to_db_per_mm).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn assert_close(a: CScalar, b: CScalar, rel: f64) {
        assert!((a - b).norm() <= rel * b.norm(), "{a} != {b}");
    }

    #[test]
    fn round_trip_reproduces_gamma() {
        let cases = [
            (CScalar::new(1.2, 300.0), 10.0e9),
            (CScalar::new(0.0, 209.6), 10.0e9),
            (CScalar::new(1.0e-6, 2.0e3), 100.0e9),
            (CScalar::new(35.0, 5.0e3), 150.0e9),
            (CScalar::new(0.3, -40.0), 1.0e9),
        ];
        for (gamma, f) in cases {
            let back = ereff_to_gamma(gamma_to_ereff(gamma, f), f);
            assert_close(back, gamma, 1.0e-9);
        }
    }

    #[test]
    fn lossless_line_propagates_forward() {
        let f = 5.0e9;
        let gamma = ereff_to_gamma(CScalar::new(2.4, 0.0), f);
        assert_eq!(gamma.re, 0.0);
        let beta = 2.0 * PI * f / vacuum_light_speed() * 2.4f64.sqrt();
        assert_relative_eq!(gamma.im, beta, max_relative = 1.0e-12);

        // negative-zero loss must not flip the branch
        let gamma = ereff_to_gamma(CScalar::new(2.4, -0.0), f);
        assert!(gamma.im > 0.0);
    }

    #[test]
    fn lossy_ereff_gives_positive_attenuation() {
        let gamma = ereff_to_gamma(CScalar::new(2.4, -0.01), 20.0e9);
        assert!(gamma.re > 0.0);
        assert!(gamma.im > 0.0);
        let ereff = gamma_to_ereff(gamma, 20.0e9);
        assert_relative_eq!(effective_loss_tangent(ereff), 0.01 / 2.4, max_relative = 1.0e-9);
    }

    #[test]
    fn db_per_mm_tracks_attenuation() {
        assert_eq!(gamma_to_db_per_mm(CScalar::new(0.0, 500.0)), 0.0);
        let mut previous = 0.0;
        for alpha in [0.1, 1.0, 5.0, 20.0] {
            let db = gamma_to_db_per_mm(CScalar::new(alpha, 500.0));
            assert!(db > previous);
            previous = db;
        }
        // 1 Np/m is 8.686 dB/m
        assert_relative_eq!(
            gamma_to_db_per_mm(CScalar::new(1.0, 0.0)),
            8.685_889_638e-3,
            max_relative = 1.0e-9
        );
        let direct = 20.0 * (1.5e-3f64).exp().log10();
        assert_relative_eq!(gamma_to_db_per_mm(CScalar::new(1.5, 0.0)), direct, max_relative = 1.0e-12);
    }

    #[test]
    fn magnitude_db_round_trip() {
        assert_relative_eq!(mag_to_db(CScalar::new(0.0, 10.0)), 20.0, epsilon = 1.0e-12);
        assert_relative_eq!(db_to_mag(-6.0), 0.501_187_233_6, max_relative = 1.0e-9);
        assert_relative_eq!(db_to_mag(mag_to_db(CScalar::new(3.0, 4.0))), 5.0, max_relative = 1.0e-12);
    }

    #[test]
    fn sweeps_validate_alignment_and_frequency() {
        let gamma = [CScalar::new(1.0, 200.0); 2];
        assert!(matches!(
            gamma_to_ereff_sweep(&gamma, &[1.0e9]),
            Err(ModelError::Configuration(_))
        ));
        assert!(matches!(
            gamma_to_ereff_sweep(&gamma, &[1.0e9, 0.0]),
            Err(ModelError::InvalidValue(_))
        ));
        let ereff = gamma_to_ereff_sweep(&gamma, &[1.0e9, 2.0e9]).unwrap();
        let back = ereff_to_gamma_sweep(&ereff, &[1.0e9, 2.0e9]).unwrap();
        assert_close(back[1], gamma[1], 1.0e-9);
        assert_eq!(gamma_to_db_per_mm_sweep(&gamma).len(), 2);
    }
}
