//! JSON scenario files describing a microstrip run.
//!
//! ```json
//! {
//!   "frequencies": { "start_hz": 1e9, "stop_hz": 150e9, "points": 30 },
//!   "geometry": { "width": 0.284e-3, "height": 0.127e-3, "thickness": 0.02e-3, "ground_width": 5e-3 },
//!   "substrate": { "er": 2.91, "etand": 0.0017 },
//!   "conductors": {
//!     "ground_top": [ { "Rrms": 1e-6 } ],
//!     "signal_top": [
//!       { "sigma": 41e6, "Rrms": 50e-9 },
//!       { "sigma": 14.5e6, "boundary_loc": 0.05e-6,
//!         "mur": { "landau_lifshitz": { "static": 20, "high_frequency": 1,
//!                                       "resonance_hz": 120e9, "damping_hz": 24e9 } } },
//!       { "boundary_loc": 5.25e-6 }
//!     ]
//!   }
//! }
//! ```
//!
//! Material values are a real number, an array with one real value per grid point, a
//! complex `{ "re": .., "im": .. }` object or a Landau–Lifshitz model.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{MicrostripError, ModelError, Result};
use crate::materials::{DispersiveMaterial, LandauLifshitz, MaterialProperty};
use crate::math::{CScalar, Scalar};
use crate::simulation::{BoundaryFace, MicrostripGeometry, MicrostripModel, SolveSettings, Substrate};
use crate::stack::LayerSpec;
use crate::sweep::{linspace, logspace_hz, validate_grid};

/// Point spacing of a generated frequency sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    /// Logarithmic spacing.
    #[default]
    Log,
    /// Linear spacing.
    Linear,
}

/// Frequency grid, listed explicitly or generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridConfig {
    /// Explicit frequencies (Hz).
    List(Vec<Scalar>),
    /// `points` frequencies between `start_hz` and `stop_hz`.
    Sweep {
        /// First frequency (Hz).
        start_hz: Scalar,
        /// Last frequency (Hz).
        stop_hz: Scalar,
        /// Number of points.
        points: usize,
        /// Point spacing.
        #[serde(default)]
        spacing: Spacing,
    },
}

impl GridConfig {
    /// Expands the grid.
    pub fn frequencies(&self) -> Result<Vec<Scalar>> {
        let freqs = match *self {
            Self::List(ref freqs) => freqs.clone(),
            Self::Sweep {
                start_hz,
                stop_hz,
                points,
                spacing,
            } => {
                if points == 0 {
                    return Err(ModelError::Configuration(
                        "frequency sweep needs at least one point".into(),
                    ));
                }
                match spacing {
                    Spacing::Log => {
                        if !(start_hz > 0.0 && stop_hz > 0.0) {
                            return Err(ModelError::InvalidValue(format!(
                                "logarithmic sweep bounds must be positive, got {start_hz}..{stop_hz}"
                            )));
                        }
                        logspace_hz(start_hz, stop_hz, points)
                    }
                    Spacing::Linear => linspace(start_hz, stop_hz, points),
                }
            }
        };
        validate_grid(&freqs)?;
        Ok(freqs)
    }
}

/// Landau–Lifshitz parameters as written in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandauLifshitzConfig {
    /// Low-frequency relative permeability.
    #[serde(rename = "static")]
    pub static_permeability: Scalar,
    /// Relative permeability far above resonance.
    #[serde(rename = "high_frequency")]
    pub high_frequency_permeability: Scalar,
    /// Resonance frequency (Hz).
    pub resonance_hz: Scalar,
    /// Damping rate (Hz).
    pub damping_hz: Scalar,
}

/// A material value in a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyConfig {
    /// Real constant.
    Real(Scalar),
    /// Real value per grid point.
    Sampled(Vec<Scalar>),
    /// Complex constant.
    Complex {
        /// Real part.
        re: Scalar,
        /// Imaginary part.
        im: Scalar,
    },
    /// Dispersive permeability sampled on the grid.
    LandauLifshitz {
        /// Model parameters.
        landau_lifshitz: LandauLifshitzConfig,
    },
}

impl PropertyConfig {
    /// Resolves the value on `freqs`.
    pub fn resolve(&self, freqs: &[Scalar]) -> Result<MaterialProperty> {
        Ok(match self {
            Self::Real(v) => MaterialProperty::real(*v),
            Self::Sampled(values) => {
                MaterialProperty::Sampled(values.iter().map(|&v| CScalar::new(v, 0.0)).collect())
            }
            Self::Complex { re, im } => MaterialProperty::Constant(CScalar::new(*re, *im)),
            Self::LandauLifshitz { landau_lifshitz: p } => LandauLifshitz::new(
                p.static_permeability,
                p.high_frequency_permeability,
                p.resonance_hz,
                p.damping_hz,
            )?
            .sample(freqs),
        })
    }
}

impl From<Scalar> for PropertyConfig {
    fn from(value: Scalar) -> Self {
        Self::Real(value)
    }
}

/// Substrate as written in scenario files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstrateConfig {
    /// Relative permittivity.
    pub er: PropertyConfig,
    /// Dielectric loss tangent.
    #[serde(default = "zero")]
    pub etand: PropertyConfig,
    /// Relative permeability.
    #[serde(default = "one")]
    pub mur: PropertyConfig,
    /// Magnetic loss tangent.
    #[serde(default = "zero")]
    pub mutand: PropertyConfig,
}

fn zero() -> PropertyConfig {
    PropertyConfig::Real(0.0)
}

fn one() -> PropertyConfig {
    PropertyConfig::Real(1.0)
}

/// Conductor layer as written in scenario files; omitted keys take the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    /// Conductivity (S/m).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<Scalar>,
    /// Relative permeability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mur: Option<PropertyConfig>,
    /// Relative permittivity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub er: Option<PropertyConfig>,
    /// RMS roughness (m).
    #[serde(rename = "Rrms", default, skip_serializing_if = "Option::is_none")]
    pub rrms: Option<Scalar>,
    /// Boundary depth (m).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_loc: Option<Scalar>,
    /// Roughness distribution tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
}

impl LayerConfig {
    fn to_spec(&self, freqs: &[Scalar]) -> Result<LayerSpec> {
        Ok(LayerSpec {
            sigma: self.sigma,
            mur: self.mur.as_ref().map(|p| p.resolve(freqs)).transpose()?,
            er: self.er.as_ref().map(|p| p.resolve(freqs)).transpose()?,
            rrms: self.rrms,
            boundary_loc: self.boundary_loc,
            distribution: self.distribution.clone(),
        })
    }
}

/// A complete microstrip scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Frequency grid.
    pub frequencies: GridConfig,
    /// Cross-section dimensions (m).
    pub geometry: MicrostripGeometry,
    /// Substrate dielectric.
    pub substrate: SubstrateConfig,
    /// Layer stacks per face; absent faces are perfect conductors.
    #[serde(default)]
    pub conductors: BTreeMap<BoundaryFace, Vec<LayerConfig>>,
    /// Solver controls.
    #[serde(default)]
    pub settings: SolveSettings,
    /// Model every face as a perfect conductor.
    #[serde(default)]
    pub use_pec: bool,
}

impl ScenarioConfig {
    /// Parses a scenario from JSON text.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, MicrostripError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a scenario file.
    pub fn from_path(path: impl AsRef<Path>) -> std::result::Result<Self, MicrostripError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading scenario");
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Resolves grid-dependent values and builds the model.
    pub fn to_model(&self) -> Result<MicrostripModel> {
        let freqs = self.frequencies.frequencies()?;
        let s = &self.substrate;
        let substrate = Substrate::new(s.er.resolve(&freqs)?, s.etand.resolve(&freqs)?)
            .with_permeability(s.mur.resolve(&freqs)?, s.mutand.resolve(&freqs)?);
        let mut model = MicrostripModel::new(freqs, self.geometry, substrate)
            .with_settings(self.settings)
            .with_pec(self.use_pec);
        for (&face, layers) in &self.conductors {
            let specs = layers
                .iter()
                .map(|l| l.to_spec(&model.frequencies))
                .collect::<Result<Vec<_>>>()?;
            model = model.with_conductor(face, specs);
        }
        debug!(
            points = model.frequencies.len(),
            faces = model.conductors.len(),
            "scenario resolved"
        );
        Ok(model)
    }
}
