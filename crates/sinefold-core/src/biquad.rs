//! Second-order IIR filter with stereo state.
//!
//! Coefficients follow the RBJ Audio EQ Cookbook, computed with the
//! polynomial trigonometry in [`fast_math`](crate::fast_math) so that the
//! same settings give the same coefficients on every target.
//!
//! Resonance replaces Q: `alpha = sin(ω)·(1 − r)`, so `r = 0` is a critically
//! damped response (Q = 0.5), `r = 0.5` is Q = 1 and `r → 0.999` approaches
//! self-oscillation. Negative resonance broadens the response further.

use core::f32::consts::PI;
use libm::sqrtf;

use crate::fast_math::{cos_poly, sin_poly};
use crate::filter::{
    FilterType, RESONANCE_LIMIT, clamp_biquad_cutoff, clamp_shelf_db, sanitize_sample_rate,
};
use crate::math::{DNC, db_to_linear};

/// Normalized biquad coefficients `[b0, b1, b2, a1, a2]` (`a0 == 1`).
pub type Coefficients = [f32; 5];

/// Biquad filter with an independent history per stereo channel.
///
/// Implements the transposed direct form II structure:
/// ```text
/// y[n]  = b0*x[n] + z1
/// z1    = b1*x[n] - a1*y[n] + z2
/// z2    = b2*x[n] - a2*y[n]
/// ```
///
/// Every setter recomputes the coefficients immediately; there is no
/// deferred "dirty" state to flush.
///
/// # Example
///
/// ```rust
/// use sinefold_core::{Biquad, FilterType};
///
/// let mut filter = Biquad::with_type(48000.0, FilterType::Highpass, 200.0);
/// filter.set_resonance(0.3);
/// let (l, r) = filter.process_stereo(1.0, 1.0);
/// assert_eq!(l, r);
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    sample_rate: f32,
    filter_type: FilterType,
    cutoff: f32,
    resonance: f32,
    shelf_db: f32,

    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    /// Per-channel state (left, right).
    z1: [f32; 2],
    z2: [f32; 2],
}

impl Biquad {
    /// Creates a lowpass filter with its cutoff at the clamp ceiling.
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        Self::with_type(sample_rate, FilterType::Lowpass, sample_rate)
    }

    /// Creates a filter of the given type and cutoff, resonance 0, shelf 0 dB.
    pub fn with_type(sample_rate: f32, filter_type: FilterType, cutoff: f32) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        let mut filter = Self {
            sample_rate,
            filter_type,
            cutoff: clamp_biquad_cutoff(cutoff, sample_rate),
            resonance: 0.0,
            shelf_db: 0.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: [0.0; 2],
            z2: [0.0; 2],
        };
        filter.update_coefficients();
        filter
    }

    /// Sets the cutoff (or shelf corner) in Hz, clamped to `[fs/24576, fs/2.125]`.
    pub fn set_cutoff(&mut self, hz: f32) {
        self.cutoff = clamp_biquad_cutoff(hz, self.sample_rate);
        self.update_coefficients();
    }

    /// Sets the resonance, clamped to `[-0.999, 0.999]`.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(-RESONANCE_LIMIT, RESONANCE_LIMIT);
        self.update_coefficients();
    }

    /// Sets the shelf gain in dB, clamped to `±50`. Ignored by the lowpass
    /// and highpass responses.
    pub fn set_shelf_amount(&mut self, db: f32) {
        self.shelf_db = clamp_shelf_db(db);
        self.update_coefficients();
    }

    /// Changes the response type and clears the history.
    ///
    /// Setting the current type again leaves the state untouched.
    pub fn set_type(&mut self, filter_type: FilterType) {
        if filter_type != self.filter_type {
            self.filter_type = filter_type;
            self.reset();
            self.update_coefficients();
        }
    }

    /// Updates the sample rate, re-clamping the cutoff.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        self.cutoff = clamp_biquad_cutoff(self.cutoff, self.sample_rate);
        self.update_coefficients();
    }

    /// Loads externally computed coefficients.
    ///
    /// They stay in effect until the next call to a response setter.
    pub fn set_coefficients(&mut self, coefficients: Coefficients) {
        let [b0, b1, b2, a1, a2] = coefficients;
        self.b0 = b0;
        self.b1 = b1;
        self.b2 = b2;
        self.a1 = a1;
        self.a2 = a2;
    }

    /// Current coefficients as `[b0, b1, b2, a1, a2]`.
    pub fn coefficients(&self) -> Coefficients {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
    }

    /// Current response type.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Current (clamped) cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Current (clamped) resonance.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Current shelf gain in dB.
    pub fn shelf_amount(&self) -> f32 {
        self.shelf_db
    }

    /// Filters one sample on the left channel's history.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.process_channel(0, input)
    }

    /// Filters one stereo frame.
    #[inline]
    pub fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.process_channel(0, left), self.process_channel(1, right))
    }

    /// Filters one sample on channel `ch` (0 = left, 1 = right).
    #[inline]
    pub fn process_channel(&mut self, ch: usize, input: f32) -> f32 {
        let ch = ch & 1;
        let output = self.b0 * input + self.z1[ch];
        self.z1[ch] = self.b1 * input - self.a1 * output + self.z2[ch] + DNC;
        self.z2[ch] = self.b2 * input - self.a2 * output;
        output
    }

    /// Clears both channels' history.
    pub fn reset(&mut self) {
        self.z1 = [0.0; 2];
        self.z2 = [0.0; 2];
    }

    /// Magnitude response in dB at `freq` Hz for the current coefficients.
    ///
    /// Analysis helper; uses libm trigonometry and is not meant for the
    /// audio path.
    pub fn magnitude_db(&self, freq: f32) -> f32 {
        magnitude_db(self.coefficients(), freq, self.sample_rate)
    }

    fn update_coefficients(&mut self) {
        let omega = 2.0 * PI * self.cutoff / self.sample_rate;
        let sin_w = sin_poly(omega);
        let cos_w = cos_poly(omega);
        let alpha = sin_w * (1.0 - self.resonance);

        let (b0, b1, b2, a0, a1, a2) = match self.filter_type {
            FilterType::Lowpass => {
                let b = (1.0 - cos_w) * 0.5;
                (b, 1.0 - cos_w, b, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
            }
            FilterType::Highpass => {
                let b = (1.0 + cos_w) * 0.5;
                (b, -(1.0 + cos_w), b, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
            }
            FilterType::LowShelf => low_shelf(db_to_linear(self.shelf_db * 0.5), cos_w, alpha),
            FilterType::HighShelf => high_shelf(db_to_linear(self.shelf_db * 0.5), cos_w, alpha),
        };

        let inv = 1.0 / a0;
        self.b0 = b0 * inv;
        self.b1 = b1 * inv;
        self.b2 = b2 * inv;
        self.a1 = a1 * inv;
        self.a2 = a2 * inv;
    }
}

/// RBJ low shelf, unnormalized `(b0, b1, b2, a0, a1, a2)`.
///
/// `a` is the cookbook's `A = 10^(dB/40)`.
#[inline]
pub(crate) fn low_shelf(a: f32, cos_w: f32, alpha: f32) -> (f32, f32, f32, f32, f32, f32) {
    let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;
    (
        a * ((a + 1.0) - (a - 1.0) * cos_w + two_sqrt_a_alpha),
        2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w),
        a * ((a + 1.0) - (a - 1.0) * cos_w - two_sqrt_a_alpha),
        (a + 1.0) + (a - 1.0) * cos_w + two_sqrt_a_alpha,
        -2.0 * ((a - 1.0) + (a + 1.0) * cos_w),
        (a + 1.0) + (a - 1.0) * cos_w - two_sqrt_a_alpha,
    )
}

/// RBJ high shelf, unnormalized `(b0, b1, b2, a0, a1, a2)`.
#[inline]
pub(crate) fn high_shelf(a: f32, cos_w: f32, alpha: f32) -> (f32, f32, f32, f32, f32, f32) {
    let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;
    (
        a * ((a + 1.0) + (a - 1.0) * cos_w + two_sqrt_a_alpha),
        -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w),
        a * ((a + 1.0) + (a - 1.0) * cos_w - two_sqrt_a_alpha),
        (a + 1.0) - (a - 1.0) * cos_w + two_sqrt_a_alpha,
        2.0 * ((a - 1.0) - (a + 1.0) * cos_w),
        (a + 1.0) - (a - 1.0) * cos_w - two_sqrt_a_alpha,
    )
}

/// Second-order allpass coefficients centered on `freq`.
///
/// Resonance and cutoff are clamped the same way as [`Biquad`]. Load the
/// result with [`Biquad::set_coefficients`].
pub fn allpass_coefficients(freq: f32, resonance: f32, sample_rate: f32) -> Coefficients {
    let sample_rate = sanitize_sample_rate(sample_rate);
    let freq = clamp_biquad_cutoff(freq, sample_rate);
    let resonance = resonance.clamp(-RESONANCE_LIMIT, RESONANCE_LIMIT);
    let omega = 2.0 * PI * freq / sample_rate;
    let cos_w = cos_poly(omega);
    let alpha = sin_poly(omega) * (1.0 - resonance);

    let inv = 1.0 / (1.0 + alpha);
    [
        (1.0 - alpha) * inv,
        -2.0 * cos_w * inv,
        (1.0 + alpha) * inv,
        -2.0 * cos_w * inv,
        (1.0 - alpha) * inv,
    ]
}

/// Magnitude in dB of a normalized biquad at `freq`.
pub(crate) fn magnitude_db(coefficients: Coefficients, freq: f32, sample_rate: f32) -> f32 {
    let [b0, b1, b2, a1, a2] = coefficients;
    let w = 2.0 * PI * freq / sample_rate;
    let (c1, s1) = (libm::cosf(w), libm::sinf(w));
    let (c2, s2) = (libm::cosf(2.0 * w), libm::sinf(2.0 * w));
    let num_re = b0 + b1 * c1 + b2 * c2;
    let num_im = -(b1 * s1 + b2 * s2);
    let den_re = 1.0 + a1 * c1 + a2 * c2;
    let den_im = -(a1 * s1 + a2 * s2);
    let num = num_re * num_re + num_im * num_im;
    let den = den_re * den_re + den_im * den_im;
    10.0 * libm::log10f(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f32 = 48000.0;

    #[test]
    fn test_lowpass_passes_dc() {
        let mut f = Biquad::with_type(FS, FilterType::Lowpass, FS / 4.0);
        f.set_resonance(0.5);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = f.process(0.7);
        }
        assert!((out - 0.7).abs() < 1e-4, "got {out}");
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut f = Biquad::with_type(FS, FilterType::Highpass, 100.0);
        let mut out = 1.0;
        for _ in 0..48000 {
            out = f.process(1.0);
        }
        assert!(out.abs() < 1e-3, "got {out}");
    }

    #[test]
    fn test_lowpass_attenuates_above_cutoff() {
        let f = Biquad::with_type(FS, FilterType::Lowpass, 1000.0);
        assert!(f.magnitude_db(100.0).abs() < 0.5);
        assert!(f.magnitude_db(10000.0) < -30.0);
    }

    #[test]
    fn test_resonance_raises_peak() {
        let mut f = Biquad::with_type(FS, FilterType::Lowpass, 1000.0);
        let flat = f.magnitude_db(1000.0);
        f.set_resonance(0.9);
        assert!(f.magnitude_db(1000.0) > flat + 10.0);
    }

    #[test]
    fn test_shelves_reach_their_gain() {
        let mut low = Biquad::with_type(FS, FilterType::LowShelf, 500.0);
        low.set_shelf_amount(12.0);
        assert!((low.magnitude_db(20.0) - 12.0).abs() < 0.5);
        assert!(low.magnitude_db(15000.0).abs() < 0.5);

        let mut high = Biquad::with_type(FS, FilterType::HighShelf, 2000.0);
        high.set_shelf_amount(-9.0);
        assert!((high.magnitude_db(20000.0) + 9.0).abs() < 0.5);
        assert!(high.magnitude_db(30.0).abs() < 0.5);
    }

    #[test]
    fn test_cutoff_and_resonance_clamp() {
        let mut f = Biquad::new(FS);
        f.set_cutoff(1e9);
        assert_eq!(f.cutoff(), FS / 2.125);
        f.set_cutoff(-1.0);
        assert_eq!(f.cutoff(), FS / 24576.0);
        f.set_resonance(5.0);
        assert_eq!(f.resonance(), 0.999);
        f.set_resonance(-5.0);
        assert_eq!(f.resonance(), -0.999);
        f.set_shelf_amount(1e6);
        assert_eq!(f.shelf_amount(), 50.0);
        f.set_shelf_amount(-1e6);
        assert_eq!(f.shelf_amount(), -50.0);
    }

    #[test]
    fn test_extreme_shelf_stays_finite() {
        let mut f = Biquad::with_type(FS, FilterType::LowShelf, 200.0);
        f.set_shelf_amount(1000.0);
        for n in 0..4800 {
            let x = if n % 64 < 32 { 0.5 } else { -0.5 };
            assert!(f.process(x).is_finite());
        }
        f.set_shelf_amount(0.0);
        for _ in 0..4800 {
            assert!(f.process(0.1).is_finite());
        }
    }

    #[test]
    fn test_type_change_clears_history() {
        let mut f = Biquad::with_type(FS, FilterType::Lowpass, 500.0);
        for _ in 0..100 {
            f.process_stereo(1.0, -1.0);
        }
        f.set_type(FilterType::Highpass);
        assert_eq!(f.z1, [0.0; 2]);
        assert_eq!(f.z2, [0.0; 2]);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut f = Biquad::with_type(FS, FilterType::Lowpass, 500.0);
        for _ in 0..64 {
            let (_, r) = f.process_stereo(1.0, 0.0);
            assert!(r.abs() < 1e-12);
        }
    }

    #[test]
    fn test_allpass_is_flat() {
        let c = allpass_coefficients(1200.0, 0.3, FS);
        for freq in [50.0, 500.0, 1200.0, 5000.0, 18000.0] {
            let db = magnitude_db(c, freq, FS);
            assert!(db.abs() < 0.01, "{freq} Hz: {db} dB");
        }
    }
}
