#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants used throughout the library.
pub mod constants;
/// Shared numerical primitives (scalar aliases, branch-selected roots).
pub mod math;
/// Frequency grid builders and magnitude helpers.
pub mod sweep;
/// Dispersive material models (permeability, lossy permittivity).
pub mod materials;
/// Conductor layer records, default filling and validated stacks.
pub mod stack;
/// Closed-form surface roughness correction models.
pub mod roughness;
/// Stratified surface impedance engine.
pub mod surface;
/// Propagation constant, effective permittivity and loss conversions.
pub mod convert;
/// Contract toward the external full-wave solver and finished runs.
pub mod simulation;
/// Scenario files describing a complete microstrip setup.
#[cfg(feature = "serde")]
pub mod config;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
