//! Spectral tilt filter.
//!
//! A second-order shelf whose output is divided by the shelf's square-root
//! gain, so instead of `0 dB / +tilt dB` on either side of the pivot the
//! response sits at `+tilt/2` and `-tilt/2` and the pivot itself is left at
//! unity. A tilt and its negation cancel exactly, which is how the cabinet
//! brackets its shaper.

use core::f32::consts::PI;
use libm::sqrtf;

use crate::biquad::{Biquad, Coefficients, high_shelf, low_shelf};
use crate::fast_math::{cos_poly, sin_poly};
use crate::filter::{FilterType, clamp_biquad_cutoff, clamp_shelf_db, sanitize_sample_rate};
use crate::math::db_to_linear;

const MIN_SLOPE_WIDTH: f32 = 1.0;
const MAX_SLOPE_WIDTH: f32 = 8.0;

/// Pivot-normalized shelving filter with stereo state.
///
/// ```rust
/// use sinefold_core::Tilt;
///
/// let mut tilt = Tilt::new(48000.0, 800.0);
/// tilt.set_tilt(6.0);
/// assert!((tilt.magnitude_db(20.0) - 3.0).abs() < 0.2);
/// assert!((tilt.magnitude_db(20000.0) + 3.0).abs() < 0.2);
/// ```
#[derive(Debug, Clone)]
pub struct Tilt {
    sample_rate: f32,
    high: bool,
    pivot: f32,
    tilt_db: f32,
    slope_width: f32,
    filter: Biquad,
}

impl Tilt {
    /// Flat low-shelf tilt around `pivot` Hz with slope width 1.
    pub fn new(sample_rate: f32, pivot: f32) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        let mut tilt = Self {
            sample_rate,
            high: false,
            pivot: clamp_biquad_cutoff(pivot, sample_rate),
            tilt_db: 0.0,
            slope_width: MIN_SLOPE_WIDTH,
            filter: Biquad::new(sample_rate),
        };
        tilt.update_coefficients();
        tilt
    }

    /// Sets the pivot frequency, clamped like a biquad cutoff.
    pub fn set_cutoff(&mut self, hz: f32) {
        self.pivot = clamp_biquad_cutoff(hz, self.sample_rate);
        self.update_coefficients();
    }

    /// Sets the tilt in dB, clamped to `±50`: the low side moves by `+db/2`,
    /// the high side by `-db/2` (mirrored for the high-shelf variant).
    pub fn set_tilt(&mut self, db: f32) {
        self.tilt_db = clamp_shelf_db(db);
        self.update_coefficients();
    }

    /// Sets the shelf slope width, clamped to `[1, 8]`; wider is gentler.
    pub fn set_slope_width(&mut self, width: f32) {
        self.slope_width = width.clamp(MIN_SLOPE_WIDTH, MAX_SLOPE_WIDTH);
        self.update_coefficients();
    }

    /// Selects the shelf side: lowpass and low-shelf pick the low shelf,
    /// highpass and high-shelf the high shelf. A change clears the history.
    pub fn set_type(&mut self, filter_type: FilterType) {
        let high = matches!(filter_type, FilterType::Highpass | FilterType::HighShelf);
        if high != self.high {
            self.high = high;
            self.filter.reset();
            self.update_coefficients();
        }
    }

    /// Updates the sample rate, re-clamping the pivot.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        self.filter.set_sample_rate(self.sample_rate);
        self.pivot = clamp_biquad_cutoff(self.pivot, self.sample_rate);
        self.update_coefficients();
    }

    /// Current tilt in dB.
    pub fn tilt(&self) -> f32 {
        self.tilt_db
    }

    /// Current (clamped) slope width.
    pub fn slope_width(&self) -> f32 {
        self.slope_width
    }

    /// Filters one sample on the left channel's history.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.filter.process_channel(0, input)
    }

    /// Filters one stereo frame.
    #[inline]
    pub fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.filter.process_stereo(left, right)
    }

    /// Filters one sample on channel `ch`.
    #[inline]
    pub fn process_channel(&mut self, ch: usize, input: f32) -> f32 {
        self.filter.process_channel(ch, input)
    }

    /// Clears both channels' history.
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    /// Magnitude response in dB at `freq` Hz (analysis helper).
    pub fn magnitude_db(&self, freq: f32) -> f32 {
        self.filter.magnitude_db(freq)
    }

    fn update_coefficients(&mut self) {
        self.filter.set_coefficients(self.compute());
    }

    fn compute(&self) -> Coefficients {
        let a = db_to_linear(self.tilt_db * 0.5);
        let omega = 2.0 * PI * self.pivot / self.sample_rate;
        let cos_w = cos_poly(omega);
        // RBJ shelf slope with S = 1 / width.
        let alpha =
            sin_poly(omega) * 0.5 * sqrtf((a + 1.0 / a) * (self.slope_width - 1.0) + 2.0);

        let (b0, b1, b2, a0, a1, a2) = if self.high {
            high_shelf(a, cos_w, alpha)
        } else {
            low_shelf(a, cos_w, alpha)
        };
        // Divide by A: split the shelf gain symmetrically around the pivot.
        let inv = 1.0 / a0;
        let b_norm = inv / a;
        [b0 * b_norm, b1 * b_norm, b2 * b_norm, a1 * inv, a2 * inv]
    }
}
