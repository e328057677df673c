//! Microstrip cross-section runs driven by an external full-wave solver.
//!
//! The physics core turns each conductor face's layer stack into a surface impedance
//! sweep. This module packages those sweeps, together with the substrate and geometry,
//! into a [`SolveRequest`] for a [`SolverHarness`], and post-processes the returned line
//! parameters `Z0(f)` and `γ(f)`.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::convert::{effective_loss_tangent, gamma_to_db_per_mm_sweep, gamma_to_ereff_sweep};
use crate::errors::{MicrostripError, ModelError, Result};
use crate::materials::{lossy_value, HalfSpace, MaterialProperty};
use crate::math::{CScalar, Scalar};
use crate::stack::{LayerSpec, LayerStack};
use crate::sweep::validate_grid;

/// Errors reported by a solver harness.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    /// The solver could not be reached or started.
    #[error("solver unavailable: {0}")]
    Unavailable(String),
    /// The solver ran but did not converge or aborted.
    #[error("solver failed: {0}")]
    Failed(String),
    /// The solver returned arrays that do not line up with the frequency grid.
    #[error("malformed result: {quantity} has {actual} samples, expected {expected}")]
    MalformedResult {
        /// Name of the offending output.
        quantity: &'static str,
        /// Frequency grid length.
        expected: usize,
        /// Returned length.
        actual: usize,
    },
}

/// Cross-section of a microstrip line over a finite ground plane (m).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicrostripGeometry {
    /// Signal trace width.
    pub width: Scalar,
    /// Substrate height.
    pub height: Scalar,
    /// Trace and ground metal thickness.
    pub thickness: Scalar,
    /// Width of the ground plane and substrate.
    pub ground_width: Scalar,
}

impl MicrostripGeometry {
    /// Creates a geometry from trace width, substrate height, metal thickness and
    /// ground width.
    #[must_use]
    pub const fn new(width: Scalar, height: Scalar, thickness: Scalar, ground_width: Scalar) -> Self {
        Self {
            width,
            height,
            thickness,
            ground_width,
        }
    }

    /// Checks that every dimension is positive and the trace fits on the ground plane.
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("width", self.width),
            ("height", self.height),
            ("thickness", self.thickness),
            ("ground_width", self.ground_width),
        ];
        for (name, value) in dims {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::InvalidValue(format!(
                    "geometry {name} must be positive, got {value}"
                )));
            }
        }
        if self.width > self.ground_width {
            return Err(ModelError::Configuration(format!(
                "trace width {} exceeds ground width {}",
                self.width, self.ground_width
            )));
        }
        Ok(())
    }
}

/// Substrate dielectric, possibly dispersive.
///
/// All four quantities are real; only the real part of each [`MaterialProperty`] is used.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Substrate {
    /// Relative permittivity.
    pub er: MaterialProperty,
    /// Dielectric loss tangent.
    pub etand: MaterialProperty,
    /// Relative permeability.
    pub mur: MaterialProperty,
    /// Magnetic loss tangent.
    pub mutand: MaterialProperty,
}

impl Substrate {
    /// Non-magnetic substrate with permittivity `er` and loss tangent `etand`.
    #[must_use]
    pub fn new(er: impl Into<MaterialProperty>, etand: impl Into<MaterialProperty>) -> Self {
        Self {
            er: er.into(),
            etand: etand.into(),
            mur: MaterialProperty::real(1.0),
            mutand: MaterialProperty::real(0.0),
        }
    }

    /// Sets the magnetic properties.
    #[must_use]
    pub fn with_permeability(
        mut self,
        mur: impl Into<MaterialProperty>,
        mutand: impl Into<MaterialProperty>,
    ) -> Self {
        self.mur = mur.into();
        self.mutand = mutand.into();
        self
    }

    /// Complex relative permittivity `er·(1 − j·etand)` at grid index `idx`.
    #[must_use]
    pub fn permittivity(&self, idx: usize) -> CScalar {
        lossy_value(self.er.at(idx).re, self.etand.at(idx).re)
    }

    /// Complex relative permeability `mur·(1 − j·mutand)` at grid index `idx`.
    #[must_use]
    pub fn permeability(&self, idx: usize) -> CScalar {
        lossy_value(self.mur.at(idx).re, self.mutand.at(idx).re)
    }

    /// The substrate as the half-space adjoining a conductor, on a grid of `n` points.
    #[must_use]
    pub fn half_space(&self, n: usize) -> HalfSpace {
        let constant = [&self.er, &self.etand, &self.mur, &self.mutand]
            .iter()
            .all(|p| p.sample_len().is_none());
        if constant {
            HalfSpace::new(self.permeability(0), self.permittivity(0))
        } else {
            HalfSpace::new(
                (0..n).map(|i| self.permeability(i)).collect::<Vec<_>>(),
                (0..n).map(|i| self.permittivity(i)).collect::<Vec<_>>(),
            )
        }
    }

    /// Checks every sampled property against a grid of `grid_len` points.
    pub fn check_grid(&self, grid_len: usize) -> Result<()> {
        self.er.check_grid("substrate er", grid_len)?;
        self.etand.check_grid("substrate etand", grid_len)?;
        self.mur.check_grid("substrate mur", grid_len)?;
        self.mutand.check_grid("substrate mutand", grid_len)
    }

    fn datasets(&self, freqs: &[Scalar]) -> Vec<PiecewiseLinearDataset> {
        [
            ("er", &self.er),
            ("etand", &self.etand),
            ("mur", &self.mur),
            ("mutand", &self.mutand),
        ]
        .into_iter()
        .map(|(name, prop)| {
            let y = (0..freqs.len()).map(|i| prop.at(i).re).collect();
            PiecewiseLinearDataset::new(name, freqs.to_vec(), y, "").project_scoped()
        })
        .collect()
    }
}

/// Conductor faces of the microstrip cross-section that carry an impedance boundary.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoundaryFace {
    /// Top of the ground plane, under the substrate.
    GroundTop,
    /// Top of the signal trace, in air.
    SignalTop,
    /// Bottom of the signal trace, on the substrate.
    SignalBottom,
    /// Side wall of the signal trace, in air.
    SignalSide,
}

impl BoundaryFace {
    /// Every face in solver order.
    pub const ALL: [Self; 4] = [
        Self::GroundTop,
        Self::SignalTop,
        Self::SignalBottom,
        Self::SignalSide,
    ];

    /// Name of the impedance sheet in the solver model.
    #[must_use]
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::GroundTop => "GND-TOP",
            Self::SignalTop => "SIG-TOP",
            Self::SignalBottom => "SIG-BOT",
            Self::SignalSide => "SIG-SID",
        }
    }

    /// Stem of the dataset names holding this face's surface impedance.
    #[must_use]
    pub const fn dataset_stem(self) -> &'static str {
        match self {
            Self::GroundTop => "Zs_gnd_top",
            Self::SignalTop => "Zs_sig_top",
            Self::SignalBottom => "Zs_sig_bottom",
            Self::SignalSide => "Zs_sig_side",
        }
    }

    /// True when the face touches the substrate rather than air.
    #[must_use]
    pub const fn adjoins_substrate(self) -> bool {
        matches!(self, Self::GroundTop | Self::SignalBottom)
    }
}

impl fmt::Display for BoundaryFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Frequency-indexed table interpolated piecewise-linearly by the solver.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinearDataset {
    /// Dataset name.
    pub name: String,
    /// Frequencies (Hz).
    pub x: Vec<Scalar>,
    /// Values, one per frequency.
    pub y: Vec<Scalar>,
    /// Unit of `x`.
    pub x_unit: String,
    /// Unit of `y`; empty for dimensionless values.
    pub y_unit: String,
    /// Project-wide datasets are referenced with a `$` prefix.
    pub project: bool,
}

impl PiecewiseLinearDataset {
    /// Design-scoped dataset over frequency.
    #[must_use]
    pub fn new(name: impl Into<String>, x: Vec<Scalar>, y: Vec<Scalar>, y_unit: &str) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            x_unit: "Hz".to_owned(),
            y_unit: y_unit.to_owned(),
            project: false,
        }
    }

    /// Marks the dataset as project-scoped.
    #[must_use]
    pub fn project_scoped(mut self) -> Self {
        self.project = true;
        self
    }

    /// Solver expression interpolating the dataset over frequency.
    #[must_use]
    pub fn expression(&self) -> String {
        let prefix = if self.project { "$" } else { "" };
        format!("pwl({prefix}{}, Freq)", self.name)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the dataset has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Surface impedance assigned to one face, with its resistance and reactance datasets.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryImpedance {
    /// Face receiving the boundary.
    pub face: BoundaryFace,
    /// Surface impedance per frequency (Ω).
    pub zs: Vec<CScalar>,
    /// `Re Zs` dataset.
    pub resistance: PiecewiseLinearDataset,
    /// `Im Zs` dataset.
    pub reactance: PiecewiseLinearDataset,
}

impl BoundaryImpedance {
    /// Splits `zs` into the face's resistance and reactance datasets.
    #[must_use]
    pub fn new(face: BoundaryFace, freqs: &[Scalar], zs: Vec<CScalar>) -> Self {
        let stem = face.dataset_stem();
        let resistance = PiecewiseLinearDataset::new(
            format!("{stem}_real"),
            freqs.to_vec(),
            zs.iter().map(|z| z.re).collect(),
            "ohm",
        );
        let reactance = PiecewiseLinearDataset::new(
            format!("{stem}_imag"),
            freqs.to_vec(),
            zs.iter().map(|z| z.im).collect(),
            "ohm",
        );
        Self {
            face,
            zs,
            resistance,
            reactance,
        }
    }
}

/// Solver controls.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveSettings {
    /// Mesh adaptation frequency (Hz); `None` uses 0.8 of the highest grid frequency.
    pub solution_frequency: Option<Scalar>,
    /// Port-solution accuracy target.
    pub port_accuracy: Scalar,
    /// Maximum adaptive passes.
    pub max_passes: u32,
    /// Run the solver without a user interface.
    pub headless: bool,
}

impl Default for SolveSettings {
    fn default() -> Self {
        Self {
            solution_frequency: None,
            port_accuracy: 0.01,
            max_passes: 20,
            headless: true,
        }
    }
}

impl SolveSettings {
    /// Fraction of the highest grid frequency used when no solution frequency is set.
    pub const DEFAULT_SOLUTION_FRACTION: Scalar = 0.8;

    /// Solution frequency for `freqs`.
    pub fn resolve_solution_frequency(&self, freqs: &[Scalar]) -> Result<Scalar> {
        let f = match self.solution_frequency {
            Some(f) => f,
            None => freqs.iter().copied().fold(0.0, Scalar::max) * Self::DEFAULT_SOLUTION_FRACTION,
        };
        if f.is_finite() && f > 0.0 {
            Ok(f)
        } else {
            Err(ModelError::InvalidValue(format!(
                "solution frequency must be positive, got {f}"
            )))
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.port_accuracy.is_finite() && self.port_accuracy > 0.0) {
            return Err(ModelError::InvalidValue(format!(
                "port accuracy must be positive, got {}",
                self.port_accuracy
            )));
        }
        if self.max_passes == 0 {
            return Err(ModelError::InvalidValue("max passes must be at least 1".into()));
        }
        Ok(())
    }
}

/// Everything a solver harness needs for one cross-section run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRequest {
    /// Frequency grid (Hz).
    pub frequencies: Vec<Scalar>,
    /// Cross-section dimensions.
    pub geometry: MicrostripGeometry,
    /// `er`, `etand`, `mur` and `mutand` datasets of the substrate.
    pub substrate: Vec<PiecewiseLinearDataset>,
    /// Impedance boundaries, in [`BoundaryFace::ALL`] order.
    pub boundaries: Vec<BoundaryImpedance>,
    /// Faces modeled as perfect conductors.
    pub pec_faces: Vec<BoundaryFace>,
    /// Resolved mesh adaptation frequency (Hz).
    pub solution_frequency: Scalar,
    /// Solver controls.
    pub settings: SolveSettings,
}

impl SolveRequest {
    /// Boundary assigned to `face`, if any.
    #[must_use]
    pub fn boundary(&self, face: BoundaryFace) -> Option<&BoundaryImpedance> {
        self.boundaries.iter().find(|b| b.face == face)
    }
}

/// Line parameters returned by a solver.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LineParameters {
    /// Characteristic impedance per frequency (Ω).
    pub z0: Vec<CScalar>,
    /// Propagation constant per frequency (1/m).
    pub gamma: Vec<CScalar>,
}

impl LineParameters {
    fn check_len(&self, expected: usize) -> std::result::Result<(), SolveError> {
        for (quantity, actual) in [("z0", self.z0.len()), ("gamma", self.gamma.len())] {
            if actual != expected {
                return Err(SolveError::MalformedResult {
                    quantity,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Trait for external 2-D full-wave solvers.
pub trait SolverHarness {
    /// Solves the cross-section described by `request`.
    fn solve(&mut self, request: &SolveRequest) -> std::result::Result<LineParameters, SolveError>;
}

/// Microstrip line whose conductor faces are described by layer stacks.
#[derive(Debug, Clone, PartialEq)]
pub struct MicrostripModel {
    /// Frequency grid (Hz).
    pub frequencies: Vec<Scalar>,
    /// Cross-section dimensions.
    pub geometry: MicrostripGeometry,
    /// Substrate dielectric.
    pub substrate: Substrate,
    /// Layer records per face, exposed layer first.
    pub conductors: BTreeMap<BoundaryFace, Vec<LayerSpec>>,
    /// Solver controls.
    pub settings: SolveSettings,
    /// Model every face as a perfect conductor.
    pub use_pec: bool,
}

impl MicrostripModel {
    /// Model with every face a perfect conductor until stacks are attached.
    #[must_use]
    pub fn new(frequencies: Vec<Scalar>, geometry: MicrostripGeometry, substrate: Substrate) -> Self {
        Self {
            frequencies,
            geometry,
            substrate,
            conductors: BTreeMap::new(),
            settings: SolveSettings::default(),
            use_pec: false,
        }
    }

    /// Attaches a layer stack to `face`.
    #[must_use]
    pub fn with_conductor(mut self, face: BoundaryFace, layers: Vec<LayerSpec>) -> Self {
        self.conductors.insert(face, layers);
        self
    }

    /// Attaches the same layer stack to the signal top and side walls.
    #[must_use]
    pub fn with_plating(self, layers: Vec<LayerSpec>) -> Self {
        self.with_conductor(BoundaryFace::SignalTop, layers.clone())
            .with_conductor(BoundaryFace::SignalSide, layers)
    }

    /// Replaces the solver controls.
    #[must_use]
    pub fn with_settings(mut self, settings: SolveSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Forces perfect conductors on every face.
    #[must_use]
    pub fn with_pec(mut self, use_pec: bool) -> Self {
        self.use_pec = use_pec;
        self
    }

    /// Resolved stack for `face`, or `None` when the face is a perfect conductor.
    pub fn stack(&self, face: BoundaryFace) -> Result<Option<LayerStack>> {
        if self.use_pec {
            return Ok(None);
        }
        let Some(specs) = self.conductors.get(&face) else {
            return Ok(None);
        };
        let half_space = if face.adjoins_substrate() {
            self.substrate.half_space(self.frequencies.len())
        } else {
            HalfSpace::air()
        };
        LayerStack::from_specs(half_space, specs).map(Some)
    }

    /// Validates the model and computes every boundary dataset.
    pub fn prepare(&self) -> Result<SolveRequest> {
        let freqs = &self.frequencies;
        if freqs.is_empty() {
            return Err(ModelError::Configuration("frequency grid is empty".into()));
        }
        validate_grid(freqs)?;
        self.geometry.validate()?;
        self.settings.validate()?;
        self.substrate.check_grid(freqs.len())?;
        let solution_frequency = self.settings.resolve_solution_frequency(freqs)?;

        let mut boundaries = Vec::new();
        let mut pec_faces = Vec::new();
        for face in BoundaryFace::ALL {
            match self.stack(face)? {
                Some(stack) => {
                    let zs = stack.surface_impedance(freqs)?;
                    debug!(%face, layers = stack.len(), "assigned impedance boundary");
                    boundaries.push(BoundaryImpedance::new(face, freqs, zs));
                }
                None => {
                    debug!(%face, "face modeled as perfect conductor");
                    pec_faces.push(face);
                }
            }
        }

        Ok(SolveRequest {
            frequencies: freqs.clone(),
            geometry: self.geometry,
            substrate: self.substrate.datasets(freqs),
            boundaries,
            pec_faces,
            solution_frequency,
            settings: self.settings,
        })
    }

    /// Prepares the request, runs `harness` and checks its output against the grid.
    pub fn run<H>(&self, harness: &mut H) -> std::result::Result<SimulationRun, MicrostripError>
    where
        H: SolverHarness + ?Sized,
    {
        let request = self.prepare()?;
        debug!(
            points = request.frequencies.len(),
            boundaries = request.boundaries.len(),
            solution_frequency = request.solution_frequency,
            "invoking solver harness"
        );
        let parameters = harness.solve(&request).map_err(|err| {
            warn!(error = %err, "solver harness failed");
            err
        })?;
        parameters.check_len(request.frequencies.len())?;
        Ok(SimulationRun {
            frequencies: request.frequencies,
            parameters,
            boundaries: request.boundaries,
        })
    }
}

/// Completed solver run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    /// Frequency grid (Hz).
    pub frequencies: Vec<Scalar>,
    /// Solver output.
    pub parameters: LineParameters,
    /// Boundaries the solver was given.
    pub boundaries: Vec<BoundaryImpedance>,
}

impl SimulationRun {
    /// Effective relative permittivity per frequency; every frequency must be positive.
    pub fn ereff(&self) -> Result<Vec<CScalar>> {
        gamma_to_ereff_sweep(&self.parameters.gamma, &self.frequencies)
    }

    /// Attenuation in dB/mm per frequency.
    #[must_use]
    pub fn loss_db_per_mm(&self) -> Vec<Scalar> {
        gamma_to_db_per_mm_sweep(&self.parameters.gamma)
    }

    /// Effective loss tangent of `ereff` per frequency.
    pub fn effective_loss_tangent(&self) -> Result<Vec<Scalar>> {
        Ok(self.ereff()?.into_iter().map(effective_loss_tangent).collect())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::convert::ereff_to_gamma;
    use crate::sweep::logspace_hz;

    /// Returns a fixed dispersionless line and records the last request.
    struct FixedLine {
        ereff: CScalar,
        last: Option<SolveRequest>,
    }

    impl SolverHarness for FixedLine {
        fn solve(&mut self, request: &SolveRequest) -> std::result::Result<LineParameters, SolveError> {
            let gamma = request
                .frequencies
                .iter()
                .map(|&f| ereff_to_gamma(self.ereff, f))
                .collect::<Vec<_>>();
            self.last = Some(request.clone());
            Ok(LineParameters {
                z0: vec![CScalar::new(50.0, 0.0); gamma.len()],
                gamma,
            })
        }
    }

    struct Truncating;

    impl SolverHarness for Truncating {
        fn solve(&mut self, request: &SolveRequest) -> std::result::Result<LineParameters, SolveError> {
            let n = request.frequencies.len();
            Ok(LineParameters {
                z0: vec![CScalar::new(50.0, 0.0); n],
                gamma: vec![CScalar::new(1.0, 100.0); n - 1],
            })
        }
    }

    fn model() -> MicrostripModel {
        let rough = LayerSpec::new().rrms(1.0e-6);
        MicrostripModel::new(
            logspace_hz(1.0e9, 150.0e9, 8),
            MicrostripGeometry::new(0.284e-3, 0.127e-3, 0.02e-3, 5.0e-3),
            Substrate::new(2.91, 0.0017),
        )
        .with_conductor(BoundaryFace::GroundTop, vec![rough.clone()])
        .with_conductor(BoundaryFace::SignalBottom, vec![rough])
        .with_plating(vec![LayerSpec::new().rrms(50.0e-9)])
    }

    #[test]
    fn faces_carry_names_and_media() {
        assert_eq!(BoundaryFace::SignalSide.sheet_name(), "SIG-SID");
        assert_eq!(BoundaryFace::SignalBottom.dataset_stem(), "Zs_sig_bottom");
        let substrate_faces = BoundaryFace::ALL
            .iter()
            .filter(|f| f.adjoins_substrate())
            .count();
        assert_eq!(substrate_faces, 2);
    }

    #[test]
    fn prepare_builds_datasets_for_every_face() {
        let request = model().prepare().unwrap();
        assert_eq!(request.boundaries.len(), 4);
        assert!(request.pec_faces.is_empty());
        let top = request.boundary(BoundaryFace::GroundTop).unwrap();
        assert_eq!(top.resistance.name, "Zs_gnd_top_real");
        assert_eq!(top.reactance.expression(), "pwl(Zs_gnd_top_imag, Freq)");
        assert_eq!(top.resistance.y_unit, "ohm");
        assert_eq!(top.resistance.len(), 8);
        assert!(top.resistance.y.iter().all(|&r| r > 0.0));

        let names: Vec<_> = request.substrate.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["er", "etand", "mur", "mutand"]);
        assert_eq!(request.substrate[0].expression(), "pwl($er, Freq)");
        assert_relative_eq!(request.substrate[1].y[3], 0.0017);
    }

    #[test]
    fn rough_faces_are_lossier_than_plated_faces() {
        let request = model().prepare().unwrap();
        let rough = request.boundary(BoundaryFace::SignalBottom).unwrap();
        let smooth = request.boundary(BoundaryFace::SignalTop).unwrap();
        let last = request.frequencies.len() - 1;
        assert!(rough.zs[last].re > smooth.zs[last].re);
    }

    #[test]
    fn pec_flag_and_missing_stacks_fall_back_to_perfect_conductors() {
        let request = model().with_pec(true).prepare().unwrap();
        assert!(request.boundaries.is_empty());
        assert_eq!(request.pec_faces, BoundaryFace::ALL);

        let mut partial = model();
        partial.conductors.remove(&BoundaryFace::SignalSide);
        let request = partial.prepare().unwrap();
        assert_eq!(request.pec_faces, [BoundaryFace::SignalSide]);
        assert!(request.boundary(BoundaryFace::SignalSide).is_none());
    }

    #[test]
    fn solution_frequency_defaults_to_fraction_of_top() {
        let request = model().prepare().unwrap();
        assert_relative_eq!(request.solution_frequency, 120.0e9, max_relative = 1.0e-12);

        let settings = SolveSettings {
            solution_frequency: Some(40.0e9),
            ..SolveSettings::default()
        };
        let request = model().with_settings(settings).prepare().unwrap();
        assert_eq!(request.solution_frequency, 40.0e9);
        assert_eq!(request.settings.max_passes, 20);
        assert!(request.settings.headless);
    }

    #[test]
    fn prepare_rejects_bad_inputs() {
        let mut bad = model();
        bad.geometry.height = 0.0;
        assert!(matches!(bad.prepare(), Err(ModelError::InvalidValue(_))));

        let mut bad = model();
        bad.frequencies.clear();
        assert!(matches!(bad.prepare(), Err(ModelError::Configuration(_))));

        let mut bad = model();
        bad.substrate.er = MaterialProperty::Sampled(vec![CScalar::new(3.0, 0.0); 3]);
        assert!(matches!(bad.prepare(), Err(ModelError::Configuration(_))));

        let bad = model().with_conductor(
            BoundaryFace::GroundTop,
            vec![LayerSpec::new().distribution("huray")],
        );
        assert!(matches!(bad.prepare(), Err(ModelError::UnsupportedOption(_))));
    }

    #[test]
    fn run_post_processes_solver_output() {
        let mut harness = FixedLine {
            ereff: CScalar::new(2.4, -0.004),
            last: None,
        };
        let run = model().run(&mut harness).unwrap();
        assert_eq!(harness.last.unwrap().boundaries.len(), 4);
        for ereff in run.ereff().unwrap() {
            assert_relative_eq!(ereff.re, 2.4, max_relative = 1.0e-9);
            assert_relative_eq!(ereff.im, -0.004, max_relative = 1.0e-6);
        }
        for tan in run.effective_loss_tangent().unwrap() {
            assert_relative_eq!(tan, 0.004 / 2.4, max_relative = 1.0e-6);
        }
        let loss = run.loss_db_per_mm();
        assert!(loss.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn malformed_output_is_a_solve_failure() {
        let err = model().run(&mut Truncating).unwrap_err();
        assert!(matches!(
            err,
            MicrostripError::SolveFailed(SolveError::MalformedResult {
                quantity: "gamma",
                expected: 8,
                actual: 7,
            })
        ));
    }

    #[test]
    fn model_errors_stop_before_the_harness_runs() {
        let mut harness = FixedLine {
            ereff: CScalar::new(2.4, 0.0),
            last: None,
        };
        let mut bad = model();
        bad.frequencies[0] = -1.0;
        let err = bad.run(&mut harness).unwrap_err();
        assert!(matches!(err, MicrostripError::Model(ModelError::InvalidValue(_))));
        assert!(harness.last.is_none());
    }
}
