//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] - Convert decibels to linear gain
//! - [`midi_to_freq`] / [`semitones_to_ratio`] - Pitch conversions
//!
//! # Crossfades
//!
//! - [`bipolar_crossfade`] - `(1 − |m|)·a + m·b`, used for the self/cross/main mixes
//! - [`unipolar_crossfade`] - `(1 − m)·a + m·b`, used for ring modulation
//!
//! # Denormals
//!
//! - [`DNC`] - Bias added to recursive filter state
//! - [`flush_denormal`] - Flush tiny values to zero

use libm::{exp2f, expf};

/// Denormal-number-canceling bias.
///
/// Added to the state of recursive filters so that decaying tails never
/// reach the subnormal range, where many FPUs slow down by orders of
/// magnitude. Far below audibility (~-360 dBFS).
pub const DNC: f32 = 1e-18;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use sinefold_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert a (possibly fractional) MIDI pitch to frequency in Hz.
///
/// A4 (69) = 440 Hz.
#[inline]
pub fn midi_to_freq(pitch: f32) -> f32 {
    440.0 * exp2f((pitch - 69.0) / 12.0)
}

/// Frequency ratio of an interval in semitones.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    exp2f(semitones / 12.0)
}

/// Bipolar crossfade between `a` and `b`.
///
/// `mix` in \[-1, 1\]: 0 → `a`, 1 → `b`, -1 → `-b`. Negative amounts flip
/// the polarity of the second signal instead of fading back to `a`.
#[inline]
pub fn bipolar_crossfade(a: f32, b: f32, mix: f32) -> f32 {
    (1.0 - mix.abs()) * a + mix * b
}

/// Unipolar crossfade between `a` and `b`, `mix` in \[0, 1\].
#[inline]
pub fn unipolar_crossfade(a: f32, b: f32, mix: f32) -> f32 {
    (1.0 - mix) * a + mix * b
}

/// Flush denormal numbers to zero.
///
/// Used on values that leave a feedback loop (echo history, comb state).
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conversions() {
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-3);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_midi_to_freq() {
        assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-3);
        assert!((midi_to_freq(57.0) - 220.0).abs() < 1e-3);
        assert!((midi_to_freq(60.0) - 261.6256).abs() < 0.01);
    }

    #[test]
    fn test_semitones_to_ratio() {
        assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-5);
        assert!((semitones_to_ratio(-12.0) - 0.5).abs() < 1e-6);
        assert_eq!(semitones_to_ratio(0.0), 1.0);
    }

    #[test]
    fn test_bipolar_crossfade() {
        assert_eq!(bipolar_crossfade(0.3, 0.9, 0.0), 0.3);
        assert_eq!(bipolar_crossfade(0.3, 0.9, 1.0), 0.9);
        assert_eq!(bipolar_crossfade(0.3, 0.9, -1.0), -0.9);
        assert!((bipolar_crossfade(1.0, 0.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unipolar_crossfade() {
        assert_eq!(unipolar_crossfade(0.2, 0.8, 0.0), 0.2);
        assert_eq!(unipolar_crossfade(0.2, 0.8, 1.0), 0.8);
        assert!((unipolar_crossfade(0.0, 1.0, 0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }
}
