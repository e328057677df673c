//! Material property models and abstractions.
//!
//! Relative material values follow the `e^{jωt}` convention: loss appears as a negative
//! imaginary part, `εr = ε'(1 − j·tanδ)`.

use crate::constants::{VACUUM_PERMEABILITY, VACUUM_PERMITTIVITY};
use crate::errors::{ModelError, Result};
use crate::math::{forward_sqrt, is_finite, CScalar, Scalar};
use crate::sweep::{check_aligned, validate_grid};

/// A relative permeability or permittivity, either constant over frequency or sampled
/// on the frequency grid of the computation that consumes it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialProperty {
    /// Frequency-independent value.
    Constant(CScalar),
    /// One value per frequency-grid point.
    Sampled(Vec<CScalar>),
}

impl MaterialProperty {
    /// Lossless real constant.
    #[must_use]
    pub const fn real(value: Scalar) -> Self {
        Self::Constant(CScalar::new(value, 0.0))
    }

    /// Value at frequency-grid index `idx`.
    ///
    /// Sampled properties must already have been checked against the grid with
    /// [`MaterialProperty::check_grid`].
    #[must_use]
    pub fn at(&self, idx: usize) -> CScalar {
        match self {
            Self::Constant(v) => *v,
            Self::Sampled(values) => values[idx],
        }
    }

    /// Number of samples, or `None` for a constant.
    #[must_use]
    pub fn sample_len(&self) -> Option<usize> {
        match self {
            Self::Constant(_) => None,
            Self::Sampled(values) => Some(values.len()),
        }
    }

    /// Verifies that a sampled property lines up with a grid of `grid_len` points and
    /// that every value is finite.
    pub fn check_grid(&self, what: &str, grid_len: usize) -> Result<()> {
        if let Some(len) = self.sample_len() {
            check_aligned(what, len, grid_len)?;
        }
        let finite = match self {
            Self::Constant(v) => is_finite(*v),
            Self::Sampled(values) => values.iter().all(|v| is_finite(*v)),
        };
        if finite {
            Ok(())
        } else {
            Err(ModelError::InvalidValue(format!("{what} contains non-finite values")))
        }
    }

    /// Expands the property to `n` per-frequency values.
    #[must_use]
    pub fn to_vec(&self, n: usize) -> Vec<CScalar> {
        (0..n).map(|i| self.at(i)).collect()
    }
}

impl Default for MaterialProperty {
    fn default() -> Self {
        Self::real(1.0)
    }
}

impl From<Scalar> for MaterialProperty {
    fn from(value: Scalar) -> Self {
        Self::real(value)
    }
}

impl From<CScalar> for MaterialProperty {
    fn from(value: CScalar) -> Self {
        Self::Constant(value)
    }
}

impl From<Vec<CScalar>> for MaterialProperty {
    fn from(values: Vec<CScalar>) -> Self {
        Self::Sampled(values)
    }
}

/// Complex relative value `real·(1 − j·tangent)` from a real part and a loss tangent.
#[inline]
#[must_use]
pub fn lossy_value(real: Scalar, tangent: Scalar) -> CScalar {
    CScalar::new(real, -real * tangent)
}

/// The medium adjoining the exposed face of a conductor stack (substrate or air).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HalfSpace {
    /// Relative permeability μr(f).
    pub mur: MaterialProperty,
    /// Relative permittivity εr(f).
    pub er: MaterialProperty,
}

impl HalfSpace {
    /// Half-space with the given relative permeability and permittivity.
    #[must_use]
    pub fn new(mur: impl Into<MaterialProperty>, er: impl Into<MaterialProperty>) -> Self {
        Self {
            mur: mur.into(),
            er: er.into(),
        }
    }

    /// Free space.
    #[must_use]
    pub fn air() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Non-magnetic dielectric with constant `er` and loss tangent `etand`.
    #[must_use]
    pub fn dielectric(er: Scalar, etand: Scalar) -> Self {
        Self::new(1.0, lossy_value(er, etand))
    }

    /// Wave impedance √(μ/ε) in ohms at frequency-grid index `idx`.
    #[must_use]
    pub fn intrinsic_impedance(&self, idx: usize) -> CScalar {
        let mu = self.mur.at(idx) * VACUUM_PERMEABILITY;
        let eps = self.er.at(idx) * VACUUM_PERMITTIVITY;
        forward_sqrt(mu / eps)
    }

    pub(crate) fn check_grid(&self, grid_len: usize) -> Result<()> {
        self.mur.check_grid("half-space mur", grid_len)?;
        self.er.check_grid("half-space er", grid_len)
    }
}

/// Trait for frequency-dependent relative material models.
pub trait DispersiveMaterial {
    /// Returns the complex relative value at frequency `freq_hz`.
    fn relative_value(&self, freq_hz: Scalar) -> CScalar;

    /// Samples the model on a frequency grid.
    fn sample(&self, freqs: &[Scalar]) -> MaterialProperty {
        MaterialProperty::Sampled(freqs.iter().map(|&f| self.relative_value(f)).collect())
    }
}

/// Single-pole Landau–Lifshitz permeability of a ferromagnetic conductor.
///
/// ```text
/// μr(f) = μr∞ + (μr_static − μr∞)·(f0² + j·f·γ) / (f0² + 2j·f·γ − f²)
/// ```
///
/// Y. Shlepnev and S. McMorrow, "Nickel characterization for interconnect analysis",
/// IEEE EMC 2011, doi:10.1109/ISEMC.2011.6038368.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandauLifshitz {
    /// Low-frequency relative permeability.
    pub static_permeability: CScalar,
    /// Relative permeability far above resonance.
    pub high_frequency_permeability: CScalar,
    /// Ferromagnetic resonance frequency f0 (Hz).
    pub resonance_frequency: Scalar,
    /// Damping rate γ (Hz).
    pub damping: Scalar,
}

impl LandauLifshitz {
    /// Creates a validated model; `f0` and `damping` must be positive and finite.
    pub fn new(
        static_permeability: impl Into<CScalar>,
        high_frequency_permeability: impl Into<CScalar>,
        resonance_frequency: Scalar,
        damping: Scalar,
    ) -> Result<Self> {
        if !(resonance_frequency.is_finite() && resonance_frequency > 0.0) {
            return Err(ModelError::InvalidValue(format!(
                "resonance frequency must be positive, got {resonance_frequency}"
            )));
        }
        if !(damping.is_finite() && damping > 0.0) {
            return Err(ModelError::InvalidValue(format!(
                "damping rate must be positive, got {damping}"
            )));
        }
        let model = Self {
            static_permeability: static_permeability.into(),
            high_frequency_permeability: high_frequency_permeability.into(),
            resonance_frequency,
            damping,
        };
        if !(is_finite(model.static_permeability) && is_finite(model.high_frequency_permeability))
        {
            return Err(ModelError::InvalidValue(
                "permeability limits must be finite".into(),
            ));
        }
        Ok(model)
    }

    /// Electroless nickel fitted to microstrip measurements: μr 20 → 1,
    /// f0 = 120 GHz, γ = 0.2·f0.
    #[must_use]
    pub fn nickel() -> Self {
        Self {
            static_permeability: CScalar::new(20.0, 0.0),
            high_frequency_permeability: CScalar::new(1.0, 0.0),
            resonance_frequency: 120.0e9,
            damping: 0.2 * 120.0e9,
        }
    }
}

impl DispersiveMaterial for LandauLifshitz {
    fn relative_value(&self, freq_hz: Scalar) -> CScalar {
        let f = freq_hz;
        let f0_sq = self.resonance_frequency * self.resonance_frequency;
        let numerator = CScalar::new(f0_sq, f * self.damping);
        let denominator = CScalar::new(f0_sq - f * f, 2.0 * f * self.damping);
        self.high_frequency_permeability
            + (self.static_permeability - self.high_frequency_permeability) * numerator
                / denominator
    }
}

/// Landau–Lifshitz relative permeability sampled on `freqs`.
pub fn permeability(
    freqs: &[Scalar],
    mur_static: impl Into<CScalar>,
    mur_inf: impl Into<CScalar>,
    f0: Scalar,
    damping: Scalar,
) -> Result<Vec<CScalar>> {
    validate_grid(freqs)?;
    let model = LandauLifshitz::new(mur_static, mur_inf, f0, damping)?;
    Ok(freqs.iter().map(|&f| model.relative_value(f)).collect())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn vacuum_impedance_matches_reference() {
        let z0 = HalfSpace::air().intrinsic_impedance(0);
        assert_relative_eq!(z0.re, 376.730_313_668, epsilon = 1.0e-6);
        assert_relative_eq!(z0.im, 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn lossy_dielectric_has_negative_imaginary_part() {
        let er = lossy_value(2.91, 0.0017);
        assert_relative_eq!(er.re, 2.91);
        assert_relative_eq!(er.im, -2.91 * 0.0017);
    }

    #[test]
    fn permeability_reaches_both_limits() {
        let mu = permeability(&[0.0, 1.0e6, 1.0e16], 20.0, 1.0, 120.0e9, 24.0e9).unwrap();
        assert_relative_eq!(mu[0].re, 20.0, epsilon = 1.0e-12);
        assert_relative_eq!(mu[0].im, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(mu[1].re, 20.0, max_relative = 1.0e-6);
        assert_relative_eq!(mu[2].re, 1.0, epsilon = 1.0e-4);
        assert_relative_eq!(mu[2].im, 0.0, epsilon = 1.0e-4);
    }

    #[test]
    fn magnetic_loss_peaks_at_resonance() {
        let model = LandauLifshitz::nickel();
        let f0 = model.resonance_frequency;
        let loss = |f: f64| -model.relative_value(f).im;
        let peak = loss(f0);
        assert!(peak > 0.0);
        for ratio in [0.5, 0.9, 0.95, 0.99, 1.01, 1.05, 1.1, 2.0] {
            assert!(
                peak > loss(ratio * f0),
                "loss at {ratio}·f0 exceeds loss at f0"
            );
        }
        // at resonance the fraction reduces to 1/2 − j·f0/(2γ)
        let mu = model.relative_value(f0);
        assert_relative_eq!(mu.re, 1.0 + 19.0 * 0.5, epsilon = 1.0e-9);
        assert_relative_eq!(mu.im, -19.0 * f0 / (2.0 * model.damping), epsilon = 1.0e-9);
    }

    #[test]
    fn model_rejects_non_positive_resonance() {
        assert!(matches!(
            permeability(&[1.0e9], 20.0, 1.0, 0.0, 1.0e9),
            Err(ModelError::InvalidValue(_))
        ));
        assert!(matches!(
            LandauLifshitz::new(20.0, 1.0, 1.0e9, -1.0),
            Err(ModelError::InvalidValue(_))
        ));
    }

    #[test]
    fn sampled_property_checks_grid_length() {
        let mu = LandauLifshitz::nickel().sample(&[1.0e9, 2.0e9]);
        assert!(mu.check_grid("mur", 2).is_ok());
        assert!(matches!(
            mu.check_grid("mur", 3),
            Err(ModelError::Configuration(_))
        ));
        assert!(MaterialProperty::real(1.0).check_grid("mur", 7).is_ok());
    }
}
