//! Stratified surface impedance of plated, rough conductors.
//!
//! Each layer is treated as a uniform transmission-line section with wave impedance
//! `η = √(jωμ/(σ + jωε))` and propagation constant `γ = √(jωμ(σ + jωε))`. Starting from
//! the unbounded innermost layer, the impedance is carried outward through every bounded
//! layer. Each rough interface scales the impedance passing it by its roughness
//! correction, evaluated with the skin depth of the layer behind it, so a thin plating
//! lets the roughness beneath it show through while a thick one hides it.
//!
//! A non-conducting innermost layer absorbs nothing: it terminates the stack as an open
//! circuit, and the loss comes only from the conducting layers in front of it.

use tracing::debug;

use crate::constants::{angular_frequency, VACUUM_PERMEABILITY, VACUUM_PERMITTIVITY};
use crate::errors::{ModelError, Result};
use crate::math::{exp_m1, forward_sqrt, is_finite, CScalar, Scalar, J};
use crate::roughness::RoughnessProfile;
use crate::stack::{check_conducting, ConductorLayer, LayerStack};
use crate::sweep::validate_grid;

/// Skin depth `δ = √(2/(ωμσ))` in meters for relative permeability magnitude `mur_abs`.
///
/// Infinite for a non-conducting layer or at DC.
#[must_use]
pub fn skin_depth(freq_hz: Scalar, sigma: Scalar, mur_abs: Scalar) -> Scalar {
    if sigma <= 0.0 || freq_hz <= 0.0 {
        return Scalar::INFINITY;
    }
    let omega = angular_frequency(freq_hz);
    (2.0 / (omega * VACUUM_PERMEABILITY * mur_abs * sigma)).sqrt()
}

/// Wave impedance and propagation constant of a homogeneous medium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediumWave {
    /// Intrinsic impedance η (Ω).
    pub impedance: CScalar,
    /// Propagation constant γ (1/m), `Re γ ≥ 0`.
    pub propagation: CScalar,
}

impl MediumWave {
    /// Evaluates η and γ at angular frequency `omega` for conductivity `sigma` and
    /// relative `mur`, `er`.
    #[must_use]
    pub fn new(omega: Scalar, sigma: Scalar, mur: CScalar, er: CScalar) -> Self {
        let series = J * omega * VACUUM_PERMEABILITY * mur;
        let shunt = sigma + J * omega * VACUUM_PERMITTIVITY * er;
        Self {
            impedance: forward_sqrt(series / shunt),
            propagation: forward_sqrt(series * shunt),
        }
    }

    /// Input impedance of a section of this medium, `thickness` meters long, terminated
    /// by `z_load`.
    ///
    /// Equivalent to `η(Z_L + η·tanh γd)/(η + Z_L·tanh γd)`, written with the decaying
    /// factor `exp(−2γd)` so that thick lossy sections converge to `η` instead of
    /// overflowing. A non-finite `z_load` is an open circuit and yields `η·coth γd`.
    #[must_use]
    pub fn input_impedance(&self, thickness: Scalar, z_load: CScalar) -> CScalar {
        if thickness == 0.0 {
            return z_load;
        }
        let eta = self.impedance;
        let decay = -2.0 * self.propagation * thickness;
        if !is_finite(z_load) {
            return eta * (1.0 + decay.exp()) / -exp_m1(decay);
        }
        let reflection = (z_load - eta) / (z_load + eta);
        let r_in = reflection * decay.exp();
        eta * (1.0 + r_in) / (1.0 - r_in)
    }
}

/// Reflection coefficient of a surface impedance seen from a medium of wave impedance
/// `eta`.
#[must_use]
pub fn reflection_coefficient(zs: CScalar, eta: CScalar) -> CScalar {
    (zs - eta) / (zs + eta)
}

/// Surface impedance `Zs(f)` of `stack`, one value per frequency in `freqs`.
///
/// The geometry and roughness of each interface come from `roughness`, which must hold
/// one entry per layer. A frequency of exactly zero returns the DC sheet value.
///
/// The stack's half-space does not enter `Zs`; it is only checked against the grid.
pub fn surface_impedance(
    freqs: &[Scalar],
    stack: &LayerStack,
    roughness: &RoughnessProfile,
) -> Result<Vec<CScalar>> {
    evaluate(freqs, stack, roughness, true)
}

/// Surface impedance of `stack` with every interface treated as smooth.
pub fn smooth_surface_impedance(
    freqs: &[Scalar],
    stack: &LayerStack,
    roughness: &RoughnessProfile,
) -> Result<Vec<CScalar>> {
    evaluate(freqs, stack, roughness, false)
}

fn evaluate(
    freqs: &[Scalar],
    stack: &LayerStack,
    roughness: &RoughnessProfile,
    rough: bool,
) -> Result<Vec<CScalar>> {
    validate_grid(freqs)?;
    roughness.validate(stack.len())?;
    let n = freqs.len();
    stack.half_space().check_grid(n)?;
    for (k, layer) in stack.layers().iter().enumerate() {
        layer.mur.check_grid(&format!("mur of layer {k}"), n)?;
        layer.er.check_grid(&format!("er of layer {k}"), n)?;
    }
    debug!(points = n, layers = stack.len(), rough, "computing surface impedance");

    let thicknesses = roughness.thicknesses();
    check_conducting(stack.layers(), &thicknesses)?;
    freqs
        .iter()
        .enumerate()
        .map(|(idx, &f)| {
            let zs = if f == 0.0 {
                dc_impedance(stack, &thicknesses)
            } else {
                let profile = rough.then_some(roughness);
                layered_impedance(stack, profile, &thicknesses, idx, f)?
            };
            if is_finite(zs) {
                Ok(zs)
            } else {
                Err(ModelError::NumericalDegeneracy(format!(
                    "surface impedance at {f} Hz evaluated to {zs}"
                )))
            }
        })
        .collect()
}

/// Folds the stack from the innermost layer outward. With a profile, the outer boundary
/// of layer `k` scales the impedance looking into it by its roughness correction.
fn layered_impedance(
    stack: &LayerStack,
    roughness: Option<&RoughnessProfile>,
    thicknesses: &[Scalar],
    idx: usize,
    f: Scalar,
) -> Result<CScalar> {
    let omega = angular_frequency(f);
    let wave = |layer: &ConductorLayer| {
        MediumWave::new(omega, layer.sigma, layer.mur.at(idx), layer.er.at(idx))
    };
    let correction = |k: usize, layer: &ConductorLayer| match roughness {
        Some(profile) => {
            let delta = skin_depth(f, layer.sigma, layer.mur.at(idx).norm());
            profile.distribution[k].correction(profile.rrms[k], delta)
        }
        None => 1.0,
    };
    let (terminator, bounded) = stack
        .layers()
        .split_last()
        .ok_or_else(|| ModelError::Configuration("empty layer stack".into()))?;
    let z_term = if terminator.sigma > 0.0 {
        wave(terminator).impedance * correction(bounded.len(), terminator)
    } else {
        CScalar::new(Scalar::INFINITY, 0.0)
    };
    Ok(bounded
        .iter()
        .zip(thicknesses)
        .enumerate()
        .rev()
        .fold(z_term, |z_load, (k, (layer, &d))| {
            wave(layer).input_impedance(d, z_load) * correction(k, layer)
        }))
}

/// Zero-frequency limit: the sheet resistance of the bounded layers. A conducting
/// terminator shorts the face; a non-conducting one is open.
fn dc_impedance(stack: &LayerStack, thicknesses: &[Scalar]) -> CScalar {
    let layers = stack.layers();
    if layers.last().is_some_and(|l| l.sigma > 0.0) {
        return CScalar::new(0.0, 0.0);
    }
    let sheet: Scalar = layers
        .iter()
        .zip(thicknesses)
        .map(|(layer, &d)| layer.sigma * d)
        .sum();
    CScalar::new(1.0 / sheet, 0.0)
}
