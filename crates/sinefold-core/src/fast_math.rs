//! Polynomial trigonometry for oscillators, shapers and filter coefficients.
//!
//! Every sine the engine produces and every filter coefficient it computes goes
//! through these functions instead of `libm::sinf`/`cosf`/`tanf`. Two reasons:
//! the results are bit-identical across targets (libm implementations differ
//! in the last ulp), and the polynomials are several times cheaper on targets
//! without hardware transcendental support.
//!
//! | Function | Input | Use case | Max error |
//! |----------|-------|----------|-----------|
//! | [`sine_approx`] | turns, any range | oscillators, shapers | < 0.001 |
//! | [`sine_approx_bounded`] | turns in \[-0.5, 0.5\] | oscillator output | < 0.001 |
//! | [`sin_poly`] | radians in \[-π, π\] | filter coefficients | < 6e-4 |
//! | [`cos_poly`] | radians in \[-π, π\] | filter coefficients | < 2e-4 |
//! | [`tan_poly`] | radians in \[0, 1.45\] | one-pole prewarp | < 0.2% |

use libm::floorf;

/// Sine of a phase given in turns, for phases already in \[-0.5, 0.5\].
///
/// `sin(2π·p) = cos(2π·(p − ¼))`, and on \[-½, ½\] the cosine folds onto the
/// odd quintic `t·(π − 5.13274·t² + 2.26548·t⁴)` with `t = ½ − |2y|`.
///
/// # Examples
///
/// ```
/// use sinefold_core::fast_math::sine_approx_bounded;
///
/// assert!(sine_approx_bounded(0.0).abs() < 1e-6);
/// assert!((sine_approx_bounded(0.25) - 1.0).abs() < 1e-4);
/// assert!((sine_approx_bounded(-0.25) + 1.0).abs() < 1e-4);
/// ```
#[inline]
pub fn sine_approx_bounded(turns: f32) -> f32 {
    let mut y = turns - 0.25;
    if y < -0.5 {
        y += 1.0;
    }
    let t = 0.5 - (y + y).abs();
    let t2 = t * t;
    t * ((2.26548 * t2 - 5.13274) * t2 + 3.14159)
}

/// Sine of a phase given in turns, wrapping any input into range first.
///
/// Shapers feed this with `sample · drive`, which can be many turns wide.
///
/// # Examples
///
/// ```
/// use sinefold_core::fast_math::sine_approx;
///
/// assert!((sine_approx(1.25) - 1.0).abs() < 1e-4);
/// assert!((sine_approx(-3.75) - 1.0).abs() < 1e-4);
/// ```
#[inline]
pub fn sine_approx(turns: f32) -> f32 {
    let wrapped = turns - floorf(turns + 0.5);
    sine_approx_bounded(wrapped)
}

/// Sine of an angle in radians, degree-11 odd polynomial.
///
/// Valid for `x ∈ [-π, π]`, which covers every warped cutoff the filters
/// accept (`ω ≤ 2π / 2.125`).
#[inline]
pub fn sin_poly(x: f32) -> f32 {
    let x2 = x * x;
    x * (1.0
        + x2 * (-1.666_666_7e-1
            + x2 * (8.333_333e-3
                + x2 * (-1.984_127e-4 + x2 * (2.755_732e-6 + x2 * -2.505_210_8e-8)))))
}

/// Cosine of an angle in radians, degree-12 even polynomial.
///
/// Valid for `x ∈ [-π, π]`.
#[inline]
pub fn cos_poly(x: f32) -> f32 {
    let x2 = x * x;
    1.0 + x2
        * (-0.5
            + x2 * (4.166_666_8e-2
                + x2 * (-1.388_888_9e-3
                    + x2 * (2.480_158_8e-5 + x2 * (-2.755_732e-7 + x2 * 2.087_676e-9)))))
}

/// Tangent of an angle in radians as `sin_poly / cos_poly`.
///
/// Used for bilinear prewarping (`tan(π·f/fs)`), where the one-pole cutoff
/// clamp keeps the argument below `π / 2.18 ≈ 1.441`.
#[inline]
pub fn tan_poly(x: f32) -> f32 {
    sin_poly(x) / cos_poly(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::{PI, TAU};

    #[test]
    fn test_sine_approx_matches_libm() {
        let mut max_err: f32 = 0.0;
        for i in 0..=1000 {
            let p = -0.5 + i as f32 / 1000.0;
            let err = (sine_approx_bounded(p) - libm::sinf(TAU * p)).abs();
            max_err = max_err.max(err);
        }
        assert!(max_err < 1e-3, "max error {max_err}");
    }

    #[test]
    fn test_sine_approx_wraps() {
        for i in 0..100 {
            let p = -0.5 + i as f32 / 100.0;
            let a = sine_approx_bounded(p);
            let b = sine_approx(p + 3.0);
            assert!((a - b).abs() < 1e-3, "p={p}: {a} vs {b}");
        }
    }

    #[test]
    fn test_sine_approx_is_odd() {
        for i in 0..50 {
            let p = i as f32 / 100.0;
            assert!((sine_approx(p) + sine_approx(-p)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sin_cos_accuracy_over_coefficient_range() {
        let mut sin_err: f32 = 0.0;
        let mut cos_err: f32 = 0.0;
        for i in 0..=1000 {
            let x = -PI + 2.0 * PI * i as f32 / 1000.0;
            sin_err = sin_err.max((sin_poly(x) - libm::sinf(x)).abs());
            cos_err = cos_err.max((cos_poly(x) - libm::cosf(x)).abs());
        }
        assert!(sin_err < 6e-4, "sin error {sin_err}");
        assert!(cos_err < 2e-4, "cos error {cos_err}");
    }

    #[test]
    fn test_tan_accuracy_up_to_one_pole_clamp() {
        let limit = PI / 2.18;
        for i in 1..=100 {
            let x = limit * i as f32 / 100.0;
            let exact = libm::tanf(x);
            let rel = (tan_poly(x) - exact).abs() / exact;
            assert!(rel < 2e-3, "x={x}: rel error {rel}");
        }
    }
}
