//! Baseline physical constants and utility functions.
//!
//! ## Accuracy
//!
//! ε₀ and μ₀ are the CODATA 2018 values. The speed of light used by the propagation
//! conversions is derived from them (`1/√(μ₀ε₀)`) rather than taken as the exact SI
//! value, so that permittivity and propagation constant stay mutually consistent.
//!
//! ## References
//!
//! - NIST Reference on Constants, Units, and Uncertainty: <https://physics.nist.gov/cuu/Constants/>
//! - Mohr, P. J., Newell, D. B., Taylor, B. N., & Tiesinga, E. (2019). CODATA Recommended Values of the Fundamental Physical Constants: 2018.

use std::f64::consts::PI;

/// Vacuum permittivity ε₀ in farads per meter (F/m).
/// Approximate value: 8.8541878128 × 10⁻¹² F/m (11 significant figures).
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;
/// Vacuum permeability μ₀ in henries per meter (H/m).
/// Approximate value: 1.25663706212 × 10⁻⁶ H/m (12 significant figures).
pub const VACUUM_PERMEABILITY: f64 = 1.256_637_062_12e-6;
/// Speed of light in vacuum _c_ in meters per second (m/s).
/// Exact value by SI definition (2019): 299,792,458 m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Bulk conductivity of annealed copper in siemens per meter (S/m).
pub const COPPER_CONDUCTIVITY: f64 = 58.0e6;

/// Speed of light derived from the vacuum constants, `1/√(μ₀ε₀)`.
#[inline]
#[must_use]
pub fn vacuum_light_speed() -> f64 {
    1.0 / (VACUUM_PERMEABILITY * VACUUM_PERMITTIVITY).sqrt()
}

/// Returns the angular frequency corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn derived_light_speed_matches_si_value() {
        assert_relative_eq!(vacuum_light_speed(), SPEED_OF_LIGHT, max_relative = 1.0e-9);
    }

    #[test]
    fn angular_frequency_of_one_hertz() {
        assert_relative_eq!(angular_frequency(1.0), 2.0 * PI);
    }
}
