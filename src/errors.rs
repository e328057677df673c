//! Shared error types used across submodules.

use thiserror::Error;

use crate::simulation::SolveError;

/// Errors raised by the physics core (materials, stacks, surface impedance, conversions).
///
/// All variants are reported at the point of detection; the core never retries and never
/// returns partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Malformed or inconsistent layer stack (mismatched array lengths, empty stack,
    /// decreasing boundary locations, missing required keys).
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Physical input outside its domain (negative conductivity or roughness, negative
    /// or non-finite frequency, non-positive resonance frequency).
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Unknown option tag, such as a roughness distribution name.
    #[error("unsupported option: {0}")]
    UnsupportedOption(String),
    /// A non-finite result was produced from validated inputs. This is an internal
    /// invariant violation rather than a recoverable condition.
    #[error("numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
}

/// Result alias for the physics core.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum MicrostripError {
    /// Validation or numerical error from the physics core.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The external solver did not produce usable line parameters.
    #[error("solve failed: {0}")]
    SolveFailed(#[from] SolveError),
    /// A scenario file could not be parsed.
    #[cfg(feature = "serde")]
    #[error("scenario parse error: {0}")]
    Config(#[from] serde_json::Error),
    /// A scenario file could not be read.
    #[cfg(feature = "serde")]
    #[error("scenario read error: {0}")]
    Io(#[from] std::io::Error),
}
