//! Shared numerical primitives.

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Primary complex scalar type used for phasors and impedances.
pub type CScalar = num_complex::Complex<Scalar>;

/// Imaginary unit `j`.
pub const J: CScalar = CScalar::new(0.0, 1.0);

/// Square root on the forward-wave branch.
///
/// Returns the root with a non-negative real part. When the real part is exactly zero
/// (the argument is a non-positive real), the root with a non-negative imaginary part is
/// returned, so `-x` maps to `+j√x`. A negative-zero imaginary part is treated as zero.
///
/// Both components are computed without cancellation, which keeps the small real part
/// accurate for nearly lossless arguments.
#[must_use]
pub fn forward_sqrt(z: CScalar) -> CScalar {
    let (a, b) = (z.re, z.im);
    if a == 0.0 && b == 0.0 {
        return CScalar::new(0.0, 0.0);
    }
    let modulus = z.norm();
    if a >= 0.0 {
        let re = ((modulus + a) / 2.0).sqrt();
        CScalar::new(re, b / (2.0 * re))
    } else {
        let im = ((modulus - a) / 2.0).sqrt();
        let im = if b < 0.0 { -im } else { im };
        CScalar::new(b.abs() / (2.0 * im.abs()), im)
    }
}

/// True when both components are finite.
#[inline]
#[must_use]
pub fn is_finite(z: CScalar) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

/// `exp(z) − 1`, accurate for small `|z|`.
#[must_use]
pub fn exp_m1(z: CScalar) -> CScalar {
    let half = (z.im / 2.0).sin();
    CScalar::new(
        z.re.exp_m1() * z.im.cos() - 2.0 * half * half,
        z.re.exp() * z.im.sin(),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn negative_real_maps_to_positive_imaginary() {
        let r = forward_sqrt(CScalar::new(-4.0, 0.0));
        assert_eq!(r.re, 0.0);
        assert_relative_eq!(r.im, 2.0, epsilon = 1.0e-15);

        let r = forward_sqrt(CScalar::new(-4.0, -0.0));
        assert_relative_eq!(r.im, 2.0, epsilon = 1.0e-15);
    }

    #[test]
    fn real_part_is_never_negative() {
        for z in [
            CScalar::new(3.0, 4.0),
            CScalar::new(3.0, -4.0),
            CScalar::new(-3.0, 4.0),
            CScalar::new(-3.0, -4.0),
        ] {
            let r = forward_sqrt(z);
            assert!(r.re >= 0.0);
            let sq = r * r;
            assert_relative_eq!(sq.re, z.re, epsilon = 1.0e-12);
            assert_relative_eq!(sq.im, z.im, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn small_real_part_survives_cancellation() {
        // (1e-9 + j)^2 = -1 + 2e-9 j (up to 1e-18)
        let r = forward_sqrt(CScalar::new(-1.0, 2.0e-9));
        assert_relative_eq!(r.re, 1.0e-9, max_relative = 1.0e-12);
        assert_relative_eq!(r.im, 1.0, max_relative = 1.0e-12);
    }

    #[test]
    fn exp_m1_keeps_small_arguments() {
        let r = exp_m1(CScalar::new(1.0e-12, -2.0e-12));
        assert_relative_eq!(r.re, 1.0e-12, max_relative = 1.0e-9);
        assert_relative_eq!(r.im, -2.0e-12, max_relative = 1.0e-9);

        let z = CScalar::new(0.7, 2.0);
        let direct = z.exp() - 1.0;
        assert_relative_eq!(exp_m1(z).re, direct.re, max_relative = 1.0e-12);
        assert_relative_eq!(exp_m1(z).im, direct.im, max_relative = 1.0e-12);
    }
}
