//! Convenience re-exports for building surface-impedance and microstrip runs.

#[cfg(feature = "serde")]
pub use crate::config::ScenarioConfig;
pub use crate::constants::*;
pub use crate::convert::{
    db_to_mag, effective_loss_tangent, ereff_to_gamma, gamma_to_db_per_mm, gamma_to_ereff,
    mag_to_db,
};
pub use crate::errors::{MicrostripError, ModelError};
pub use crate::materials::{
    lossy_value, permeability, DispersiveMaterial, HalfSpace, LandauLifshitz, MaterialProperty,
};
pub use crate::math::{forward_sqrt, CScalar, Scalar, J};
pub use crate::roughness::{RoughnessDistribution, RoughnessProfile};
pub use crate::simulation::{
    BoundaryFace, BoundaryImpedance, LineParameters, MicrostripGeometry, MicrostripModel,
    PiecewiseLinearDataset, SimulationRun, SolveError, SolveRequest, SolveSettings,
    SolverHarness, Substrate,
};
pub use crate::stack::{normalize, ConductorLayer, LayerKey, LayerSpec, LayerStack};
pub use crate::surface::{reflection_coefficient, skin_depth, surface_impedance};
pub use crate::sweep::{linspace, logspace_hz};
