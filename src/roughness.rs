//! Closed-form surface roughness correction models.
//!
//! A correction factor `K ≥ 1` scales the smooth-surface impedance of a conductor face.
//! Every model depends only on the RMS roughness `Rrms` and the skin depth `δ(f)`, equals
//! exactly 1 for a smooth face, grows monotonically as `δ` shrinks below `Rrms`, and
//! saturates at [`RoughnessDistribution::CEILING`].

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::errors::{ModelError, Result};
use crate::math::Scalar;

/// Statistical height profile of a rough interface, selecting the correction model.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoughnessDistribution {
    /// Gaussian heights (tag `norm`): Hammerstad–Jensen,
    /// `K = 1 + (2/π)·atan(1.4·(Rrms/δ)²)`.
    #[default]
    Normal,
    /// Exponentially correlated profile (tag `groiss`): Groiss,
    /// `K = 1 + exp(−(δ/(2·Rrms))^1.6)`.
    Groiss,
}

impl RoughnessDistribution {
    /// High-frequency limit shared by every model.
    pub const CEILING: Scalar = 2.0;

    /// Tag used in layer records.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Normal => "norm",
            Self::Groiss => "groiss",
        }
    }

    /// Correction factor for RMS roughness `rrms` (m) and skin depth `skin_depth` (m).
    ///
    /// An infinite skin depth (DC, or a non-conducting layer) yields exactly 1.
    #[must_use]
    pub fn correction(self, rrms: Scalar, skin_depth: Scalar) -> Scalar {
        if rrms == 0.0 || !skin_depth.is_finite() {
            return 1.0;
        }
        match self {
            Self::Normal => {
                let ratio = rrms / skin_depth;
                1.0 + 2.0 / PI * (1.4 * ratio * ratio).atan()
            }
            Self::Groiss => 1.0 + (-(skin_depth / (2.0 * rrms)).powf(1.6)).exp(),
        }
    }
}

impl fmt::Display for RoughnessDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for RoughnessDistribution {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "norm" | "normal" | "gaussian" => Ok(Self::Normal),
            "groiss" => Ok(Self::Groiss),
            other => Err(ModelError::UnsupportedOption(format!(
                "unknown roughness distribution '{other}' (expected 'norm' or 'groiss')"
            ))),
        }
    }
}

impl TryFrom<String> for RoughnessDistribution {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RoughnessDistribution> for String {
    fn from(value: RoughnessDistribution) -> Self {
        value.tag().to_owned()
    }
}

/// Per-interface roughness and placement of a conductor stack.
///
/// Entry `k` describes the outer boundary of conductor layer `k` (index 0 is the exposed
/// face). `boundary_loc[k]` is the depth of that boundary; layer `k` is
/// `boundary_loc[k + 1] − boundary_loc[k]` thick and the last layer is unbounded.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoughnessProfile {
    /// RMS roughness per interface (m).
    pub rrms: Vec<Scalar>,
    /// Boundary depth per interface (m).
    pub boundary_loc: Vec<Scalar>,
    /// Height distribution per interface.
    pub distribution: Vec<RoughnessDistribution>,
}

impl RoughnessProfile {
    /// Number of interfaces described by the `rrms` array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rrms.len()
    }

    /// True when no interface is described.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rrms.is_empty()
    }

    /// Thickness of every bounded layer; one entry fewer than interfaces.
    #[must_use]
    pub fn thicknesses(&self) -> Vec<Scalar> {
        self.boundary_loc.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Checks the profile against a stack of `layer_count` layers.
    pub fn validate(&self, layer_count: usize) -> Result<()> {
        let lengths = [
            ("Rrms", self.rrms.len()),
            ("boundary_loc", self.boundary_loc.len()),
            ("distribution", self.distribution.len()),
        ];
        for (name, len) in lengths {
            if len != layer_count {
                return Err(ModelError::Configuration(format!(
                    "{name} has {len} entries for a stack of {layer_count} layers"
                )));
            }
        }
        for (k, &r) in self.rrms.iter().enumerate() {
            if !r.is_finite() || r < 0.0 {
                return Err(ModelError::InvalidValue(format!(
                    "Rrms of layer {k} must be finite and non-negative, got {r}"
                )));
            }
        }
        for (k, &loc) in self.boundary_loc.iter().enumerate() {
            if !loc.is_finite() {
                return Err(ModelError::InvalidValue(format!(
                    "boundary_loc of layer {k} must be finite, got {loc}"
                )));
            }
        }
        if let Some(k) = self.thicknesses().iter().position(|&t| t < 0.0) {
            return Err(ModelError::Configuration(format!(
                "boundary_loc decreases between layers {k} and {}",
                k + 1
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const ALL: [RoughnessDistribution; 2] =
        [RoughnessDistribution::Normal, RoughnessDistribution::Groiss];

    #[test]
    fn smooth_face_has_unit_factor() {
        for dist in ALL {
            assert_eq!(dist.correction(0.0, 1.0e-6), 1.0);
            assert_eq!(dist.correction(1.0e-6, f64::INFINITY), 1.0);
        }
    }

    #[test]
    fn factor_is_monotone_bounded_and_saturates() {
        let rrms = 1.0e-6;
        for dist in ALL {
            // skin depth shrinking corresponds to rising frequency
            let mut previous = 1.0;
            for i in 0..200 {
                let delta = 1.0e-3 * 10f64.powf(-(i as f64) * 0.03);
                let k = dist.correction(rrms, delta);
                assert!(k >= 1.0);
                assert!(k <= RoughnessDistribution::CEILING);
                assert!(k >= previous, "{dist} not monotone at δ = {delta}");
                previous = k;
            }
            assert_relative_eq!(
                dist.correction(rrms, 1.0e-12),
                RoughnessDistribution::CEILING,
                epsilon = 1.0e-6
            );
        }
    }

    #[test]
    fn vanishing_roughness_converges_to_one() {
        for dist in ALL {
            assert_relative_eq!(dist.correction(1.0e-12, 0.66e-6), 1.0, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn hammerstad_matches_reference_point() {
        // Rrms = δ gives 1 + (2/π)·atan(1.4)
        let k = RoughnessDistribution::Normal.correction(1.0e-6, 1.0e-6);
        assert_relative_eq!(k, 1.0 + 2.0 / PI * 1.4f64.atan(), epsilon = 1.0e-12);
    }

    #[test]
    fn tags_parse_and_unknown_tags_are_rejected() {
        assert_eq!("norm".parse::<RoughnessDistribution>(), Ok(RoughnessDistribution::Normal));
        assert_eq!(" Groiss ".parse::<RoughnessDistribution>(), Ok(RoughnessDistribution::Groiss));
        assert!(matches!(
            "huray".parse::<RoughnessDistribution>(),
            Err(ModelError::UnsupportedOption(_))
        ));
        assert_eq!(RoughnessDistribution::Groiss.to_string(), "groiss");
    }

    #[test]
    fn profile_rejects_mismatched_lengths_and_bad_values() {
        let profile = RoughnessProfile {
            rrms: vec![0.0, 0.0],
            boundary_loc: vec![0.0],
            distribution: vec![RoughnessDistribution::Normal; 2],
        };
        assert!(matches!(
            profile.validate(2),
            Err(ModelError::Configuration(_))
        ));

        let profile = RoughnessProfile {
            rrms: vec![-1.0e-6],
            boundary_loc: vec![0.0],
            distribution: vec![RoughnessDistribution::Normal],
        };
        assert!(matches!(profile.validate(1), Err(ModelError::InvalidValue(_))));

        let profile = RoughnessProfile {
            rrms: vec![0.0, 0.0],
            boundary_loc: vec![1.0e-6, 0.5e-6],
            distribution: vec![RoughnessDistribution::Normal; 2],
        };
        assert!(matches!(
            profile.validate(2),
            Err(ModelError::Configuration(_))
        ));
    }
}
