//! Conductor layer records, default filling and validated layer stacks.
//!
//! A stack is described outermost-first: layer 0 touches the adjoining half-space
//! (substrate or air) and the last layer is an unbounded bulk conductor. Callers usually
//! write partial [`LayerSpec`] records and let [`normalize`] fill the gaps from
//! [`LayerSpec::default_table`].

use tracing::{debug, trace};

use crate::constants::COPPER_CONDUCTIVITY;
use crate::errors::{ModelError, Result};
use crate::materials::{HalfSpace, MaterialProperty};
use crate::math::{CScalar, Scalar};
use crate::roughness::{RoughnessDistribution, RoughnessProfile};

/// Keys of a layer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKey {
    /// Bulk conductivity σ (S/m).
    Sigma,
    /// Relative permeability μr.
    Mur,
    /// Relative permittivity εr.
    Er,
    /// RMS roughness of the layer's outer boundary (m).
    Rrms,
    /// Depth of the layer's outer boundary (m).
    BoundaryLoc,
    /// Roughness distribution tag.
    Distribution,
}

impl LayerKey {
    /// Every key, in record order.
    pub const ALL: [Self; 6] = [
        Self::Sigma,
        Self::Mur,
        Self::Er,
        Self::Rrms,
        Self::BoundaryLoc,
        Self::Distribution,
    ];

    /// Key name as written in layer records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sigma => "sigma",
            Self::Mur => "mur",
            Self::Er => "er",
            Self::Rrms => "Rrms",
            Self::BoundaryLoc => "boundary_loc",
            Self::Distribution => "distribution",
        }
    }
}

/// Partial layer record. Absent keys are `None`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerSpec {
    /// Bulk conductivity σ (S/m).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sigma: Option<Scalar>,
    /// Relative permeability μr.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub mur: Option<MaterialProperty>,
    /// Relative permittivity εr; treated as 1 when absent after filling.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub er: Option<MaterialProperty>,
    /// RMS roughness of the outer boundary (m).
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Rrms", default, skip_serializing_if = "Option::is_none")
    )]
    pub rrms: Option<Scalar>,
    /// Depth of the outer boundary (m).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub boundary_loc: Option<Scalar>,
    /// Roughness distribution tag, e.g. `norm`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub distribution: Option<String>,
}

impl LayerSpec {
    /// Empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults used for omitted keys: copper conductivity, μr = 1, smooth, located at
    /// depth 0 with a `norm` distribution. `er` has no default.
    #[must_use]
    pub fn default_table() -> Self {
        Self {
            sigma: Some(COPPER_CONDUCTIVITY),
            mur: Some(MaterialProperty::real(1.0)),
            er: None,
            rrms: Some(0.0),
            boundary_loc: Some(0.0),
            distribution: Some(RoughnessDistribution::Normal.tag().to_owned()),
        }
    }

    /// Sets σ.
    #[must_use]
    pub fn sigma(mut self, sigma: Scalar) -> Self {
        self.sigma = Some(sigma);
        self
    }

    /// Sets μr.
    #[must_use]
    pub fn mur(mut self, mur: impl Into<MaterialProperty>) -> Self {
        self.mur = Some(mur.into());
        self
    }

    /// Sets εr.
    #[must_use]
    pub fn er(mut self, er: impl Into<MaterialProperty>) -> Self {
        self.er = Some(er.into());
        self
    }

    /// Sets the RMS roughness.
    #[must_use]
    pub fn rrms(mut self, rrms: Scalar) -> Self {
        self.rrms = Some(rrms);
        self
    }

    /// Sets the boundary depth.
    #[must_use]
    pub fn boundary_loc(mut self, boundary_loc: Scalar) -> Self {
        self.boundary_loc = Some(boundary_loc);
        self
    }

    /// Sets the roughness distribution tag.
    #[must_use]
    pub fn distribution(mut self, tag: impl Into<String>) -> Self {
        self.distribution = Some(tag.into());
        self
    }

    /// True when `key` is present.
    #[must_use]
    pub const fn has(&self, key: LayerKey) -> bool {
        match key {
            LayerKey::Sigma => self.sigma.is_some(),
            LayerKey::Mur => self.mur.is_some(),
            LayerKey::Er => self.er.is_some(),
            LayerKey::Rrms => self.rrms.is_some(),
            LayerKey::BoundaryLoc => self.boundary_loc.is_some(),
            LayerKey::Distribution => self.distribution.is_some(),
        }
    }

    fn take_from(&mut self, key: LayerKey, defaults: &Self) {
        match key {
            LayerKey::Sigma => self.sigma = defaults.sigma,
            LayerKey::Mur => self.mur = defaults.mur.clone(),
            LayerKey::Er => self.er = defaults.er.clone(),
            LayerKey::Rrms => self.rrms = defaults.rrms,
            LayerKey::BoundaryLoc => self.boundary_loc = defaults.boundary_loc,
            LayerKey::Distribution => self.distribution = defaults.distribution.clone(),
        }
    }
}

/// Fills every missing `required_keys` entry of each layer from `defaults`.
///
/// Present keys are never touched, so the operation is idempotent. The input is
/// borrowed and a new sequence is returned.
#[must_use]
pub fn normalize(
    required_keys: &[LayerKey],
    defaults: &LayerSpec,
    layers: &[LayerSpec],
) -> Vec<LayerSpec> {
    layers
        .iter()
        .enumerate()
        .map(|(idx, layer)| {
            let mut filled = layer.clone();
            for &key in required_keys {
                if !filled.has(key) {
                    trace!(layer = idx, key = key.name(), "filling layer key from defaults");
                    filled.take_from(key, defaults);
                }
            }
            filled
        })
        .collect()
}

/// Fully specified conductor layer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConductorLayer {
    /// Bulk conductivity σ (S/m); zero makes the layer a lossless dielectric.
    pub sigma: Scalar,
    /// Relative permeability μr(f).
    pub mur: MaterialProperty,
    /// Relative permittivity εr(f).
    pub er: MaterialProperty,
    /// RMS roughness of the outer boundary (m).
    pub rrms: Scalar,
    /// Depth of the outer boundary (m).
    pub boundary_loc: Scalar,
    /// Height distribution of the outer boundary.
    pub distribution: RoughnessDistribution,
}

impl ConductorLayer {
    /// Smooth, non-magnetic conductor at depth 0.
    #[must_use]
    pub fn new(sigma: Scalar) -> Self {
        Self {
            sigma,
            mur: MaterialProperty::real(1.0),
            er: MaterialProperty::real(1.0),
            rrms: 0.0,
            boundary_loc: 0.0,
            distribution: RoughnessDistribution::Normal,
        }
    }

    /// Smooth bulk copper.
    #[must_use]
    pub fn copper() -> Self {
        Self::new(COPPER_CONDUCTIVITY)
    }

    fn validate(&self, idx: usize) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(ModelError::InvalidValue(format!(
                "sigma of layer {idx} must be finite and non-negative, got {}",
                self.sigma
            )));
        }
        if !self.rrms.is_finite() || self.rrms < 0.0 {
            return Err(ModelError::InvalidValue(format!(
                "Rrms of layer {idx} must be finite and non-negative, got {}",
                self.rrms
            )));
        }
        if !self.boundary_loc.is_finite() {
            return Err(ModelError::InvalidValue(format!(
                "boundary_loc of layer {idx} must be finite, got {}",
                self.boundary_loc
            )));
        }
        Ok(())
    }
}

fn required<T: Clone>(value: &Option<T>, key: LayerKey) -> Result<T> {
    value.clone().ok_or_else(|| {
        ModelError::Configuration(format!("layer record is missing '{}'", key.name()))
    })
}

impl TryFrom<&LayerSpec> for ConductorLayer {
    type Error = ModelError;

    fn try_from(spec: &LayerSpec) -> Result<Self> {
        let distribution = required(&spec.distribution, LayerKey::Distribution)?.parse()?;
        Ok(Self {
            sigma: required(&spec.sigma, LayerKey::Sigma)?,
            mur: required(&spec.mur, LayerKey::Mur)?,
            er: spec.er.clone().unwrap_or_default(),
            rrms: required(&spec.rrms, LayerKey::Rrms)?,
            boundary_loc: required(&spec.boundary_loc, LayerKey::BoundaryLoc)?,
            distribution,
        })
    }
}

impl From<&ConductorLayer> for LayerSpec {
    fn from(layer: &ConductorLayer) -> Self {
        Self {
            sigma: Some(layer.sigma),
            mur: Some(layer.mur.clone()),
            er: Some(layer.er.clone()),
            rrms: Some(layer.rrms),
            boundary_loc: Some(layer.boundary_loc),
            distribution: Some(layer.distribution.tag().to_owned()),
        }
    }
}

/// Checks that the stack conducts: either the innermost layer conducts, or a bounded
/// layer of non-zero thickness in front of a non-conducting innermost layer does.
pub(crate) fn check_conducting(layers: &[ConductorLayer], thicknesses: &[Scalar]) -> Result<()> {
    let terminator_conducts = layers.last().is_some_and(|l| l.sigma > 0.0);
    let film_conducts = layers
        .iter()
        .zip(thicknesses)
        .any(|(layer, &t)| layer.sigma > 0.0 && t > 0.0);
    if terminator_conducts || film_conducts {
        Ok(())
    } else {
        Err(ModelError::Configuration(
            "stack has no conducting layer; a non-conducting innermost layer needs a \
             conducting layer of non-zero thickness in front of it"
                .into(),
        ))
    }
}

/// Validated conductor stack behind an adjoining half-space.
///
/// The half-space does not change the surface impedance of the stack; it is carried so
/// callers can report how the boundary looks from the adjoining medium
/// ([`HalfSpace::intrinsic_impedance`], [`crate::surface::reflection_coefficient`]).
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    half_space: HalfSpace,
    layers: Vec<ConductorLayer>,
}

impl LayerStack {
    /// Builds a stack; requires at least one layer, valid physical values and
    /// non-decreasing boundary depths.
    pub fn new(half_space: HalfSpace, layers: Vec<ConductorLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(ModelError::Configuration(
                "a layer stack needs at least one conductor layer".into(),
            ));
        }
        for (idx, layer) in layers.iter().enumerate() {
            layer.validate(idx)?;
        }
        let stack = Self { half_space, layers };
        let profile = stack.roughness_profile();
        profile.validate(stack.layers.len())?;
        check_conducting(&stack.layers, &profile.thicknesses())?;
        Ok(stack)
    }

    /// Single-layer stack.
    pub fn single(half_space: HalfSpace, layer: ConductorLayer) -> Result<Self> {
        Self::new(half_space, vec![layer])
    }

    /// Normalizes partial records against [`LayerSpec::default_table`] and resolves them.
    pub fn from_specs(half_space: HalfSpace, specs: &[LayerSpec]) -> Result<Self> {
        let filled = normalize(&LayerKey::ALL, &LayerSpec::default_table(), specs);
        let layers = filled
            .iter()
            .map(ConductorLayer::try_from)
            .collect::<Result<Vec<_>>>()?;
        debug!(layers = layers.len(), "resolved conductor stack");
        Self::new(half_space, layers)
    }

    /// Medium adjoining the exposed face.
    #[must_use]
    pub const fn half_space(&self) -> &HalfSpace {
        &self.half_space
    }

    /// Layers, exposed face first.
    #[must_use]
    pub fn layers(&self) -> &[ConductorLayer] {
        &self.layers
    }

    /// Number of conductor layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false; a stack holds at least one layer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Roughness and placement arrays taken from the layers.
    #[must_use]
    pub fn roughness_profile(&self) -> RoughnessProfile {
        RoughnessProfile {
            rrms: self.layers.iter().map(|l| l.rrms).collect(),
            boundary_loc: self.layers.iter().map(|l| l.boundary_loc).collect(),
            distribution: self.layers.iter().map(|l| l.distribution).collect(),
        }
    }

    /// Surface impedance of this stack using its own roughness profile.
    pub fn surface_impedance(&self, freqs: &[Scalar]) -> Result<Vec<CScalar>> {
        crate::surface::surface_impedance(freqs, self, &self.roughness_profile())
    }
}
