//! Sine waveshaping with three-region folding and parametric asymmetry.
//!
//! The transfer curve is built in three stages:
//!
//! 1. `ctrl = x · drive`, `y = sin(2π·ctrl)` via [`sine_approx`]. With the
//!    default drive of 0.25 a full-scale input maps onto a quarter turn,
//!    i.e. a soft saturator; more drive wraps into higher harmonics.
//! 2. [`three_ranges`]: beyond the first quarter turn (`|ctrl| > 0.25`) the
//!    shaped value is scaled towards ±1 by `fold`, so `fold = 1` keeps the
//!    full sine fold and `fold = 0` clamps to a hard ±1.
//! 3. [`parametric_asym`]: blends in the even-order term `2·(y² − 0.5)`.
//!
//! The mixer and cabinet run the same first two stages and replace the
//! constant `−0.5` offset of stage 3 with a high-pass filter on `y²`, which
//! tracks the true DC of the squared signal.

use crate::fast_math::sine_approx;
use crate::math::db_to_linear;

/// Drive at 0 dB: a full-scale input reaches a quarter turn of the sine.
pub const UNITY_DRIVE: f32 = 0.25;

/// Largest drive setting in dB, boost or cut.
pub const MAX_DRIVE_DB: f32 = 50.0;

/// Linear drive for a setting in dB, clamped to `±MAX_DRIVE_DB`.
///
/// ```rust
/// use sinefold_core::{UNITY_DRIVE, drive_from_db};
///
/// assert_eq!(drive_from_db(0.0), UNITY_DRIVE);
/// assert_eq!(drive_from_db(1e6), drive_from_db(50.0));
/// ```
#[inline]
pub fn drive_from_db(db: f32) -> f32 {
    UNITY_DRIVE * db_to_linear(db.clamp(-MAX_DRIVE_DB, MAX_DRIVE_DB))
}

/// Folds `y` depending on which region the pre-shaped `ctrl` sits in.
#[inline]
pub fn three_ranges(ctrl: f32, y: f32, fold: f32) -> f32 {
    if ctrl < -0.25 {
        (y + 1.0) * fold - 1.0
    } else if ctrl > 0.25 {
        (y - 1.0) * fold + 1.0
    } else {
        y
    }
}

/// `(1 − asym)·y + 2·asym·(y² − 0.5)`.
#[inline]
pub fn parametric_asym(y: f32, asym: f32) -> f32 {
    (1.0 - asym) * y + 2.0 * asym * (y * y - 0.5)
}

/// Sine shaping followed by three-region folding.
///
/// `drive` is the linear multiplier applied before the sine (not dB).
#[inline]
pub fn sine_fold(x: f32, drive: f32, fold: f32) -> f32 {
    let ctrl = x * drive;
    three_ranges(ctrl, sine_approx(ctrl), fold)
}

/// The full per-voice shaper: sine, fold, then asymmetry.
///
/// ```rust
/// use sinefold_core::shape;
///
/// // Quarter-turn drive turns a full-scale input into a full-scale output.
/// assert!((shape(1.0, 0.25, 1.0, 0.0) - 1.0).abs() < 1e-3);
/// // Zero in, zero out when there is no asymmetry.
/// assert!(shape(0.0, 0.25, 1.0, 0.0).abs() < 1e-6);
/// ```
#[inline]
pub fn shape(x: f32, drive: f32, fold: f32, asym: f32) -> f32 {
    parametric_asym(sine_fold(x, drive, fold), asym)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_is_bounded() {
        assert!(drive_from_db(f32::MAX).is_finite());
        assert_eq!(drive_from_db(-1e6), drive_from_db(-MAX_DRIVE_DB));
        assert!((drive_from_db(20.0) - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_full_drive_shape_is_finite() {
        let drive = drive_from_db(MAX_DRIVE_DB);
        for i in -100..=100 {
            let y = shape(i as f32 / 100.0, drive, 1.0, 1.0);
            assert!(y.is_finite() && y.abs() <= 4.0, "{y}");
        }
    }

    #[test]
    fn test_middle_region_is_untouched() {
        assert_eq!(three_ranges(0.1, 0.6, 0.0), 0.6);
        assert_eq!(three_ranges(-0.25, -1.0, 0.3), -1.0);
    }

    #[test]
    fn test_zero_fold_clamps_outer_regions() {
        assert_eq!(three_ranges(0.4, 0.3, 0.0), 1.0);
        assert_eq!(three_ranges(-0.4, -0.3, 0.0), -1.0);
    }

    #[test]
    fn test_full_fold_keeps_the_sine() {
        assert_eq!(three_ranges(0.4, 0.3, 1.0), 0.3);
        assert_eq!(three_ranges(-0.4, -0.3, 1.0), -0.3);
    }

    #[test]
    fn test_asymmetry_endpoints() {
        assert_eq!(parametric_asym(0.7, 0.0), 0.7);
        assert!((parametric_asym(1.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((parametric_asym(0.0, 1.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shaper_is_odd_without_asymmetry() {
        for i in 0..40 {
            let x = i as f32 / 20.0 - 1.0;
            let a = shape(x, 0.6, 0.5, 0.0);
            let b = shape(-x, 0.6, 0.5, 0.0);
            assert!((a + b).abs() < 1e-4, "x={x}");
        }
    }

    #[test]
    fn test_output_stays_bounded() {
        for i in 0..200 {
            let x = i as f32 / 50.0 - 2.0;
            let y = shape(x, 3.0, 0.7, 0.5);
            assert!(y.abs() <= 1.01, "x={x}: {y}");
        }
    }
}
