//! First-order IIR filter with stereo state.
//!
//! Bilinear-transform design with prewarped `K = tan(π·fc/fs)`:
//!
//! | Type | b0 | b1 |
//! |------|----|----|
//! | Lowpass | `K/(1+K)` | `K/(1+K)` |
//! | Highpass | `1/(1+K)` | `-1/(1+K)` |
//! | LowShelf | `(1+G·K)/(1+K)` | `(G·K-1)/(1+K)` |
//! | HighShelf | `(G+K)/(1+K)` | `(K-G)/(1+K)` |
//!
//! with `a1 = (K-1)/(1+K)` for all types and `G` the linear shelf gain.
//! The one-pole is used where a gentle 6 dB/octave slope is wanted: the
//! mixer's DC blocker, the echo's feedback filters, the comb's damping and
//! the oscillator's chirp filter.

use core::f32::consts::PI;

use crate::biquad::magnitude_db;
use crate::fast_math::tan_poly;
use crate::filter::{FilterType, clamp_one_pole_cutoff, clamp_shelf_db, sanitize_sample_rate};
use crate::math::{DNC, db_to_linear};

/// First-order filter with an independent history per stereo channel.
///
/// ```rust
/// use sinefold_core::{FilterType, OnePole};
///
/// let mut dc_block = OnePole::with_type(48000.0, FilterType::Highpass, 8.0);
/// let mut y = 0.0;
/// for _ in 0..48000 {
///     y = dc_block.process(1.0);
/// }
/// assert!(y.abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct OnePole {
    sample_rate: f32,
    filter_type: FilterType,
    cutoff: f32,
    shelf_db: f32,
    b0: f32,
    b1: f32,
    a1: f32,
    z: [f32; 2],
}

impl OnePole {
    /// Lowpass with its cutoff at the clamp ceiling.
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        Self::with_type(sample_rate, FilterType::Lowpass, sample_rate)
    }

    /// Filter of the given type and cutoff, shelf 0 dB.
    pub fn with_type(sample_rate: f32, filter_type: FilterType, cutoff: f32) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        let mut filter = Self {
            sample_rate,
            filter_type,
            cutoff: clamp_one_pole_cutoff(cutoff, sample_rate),
            shelf_db: 0.0,
            b0: 1.0,
            b1: 0.0,
            a1: 0.0,
            z: [0.0; 2],
        };
        filter.update_coefficients();
        filter
    }

    /// Sets the cutoff in Hz, clamped to `[fs/24000, fs/2.18]`.
    pub fn set_cutoff(&mut self, hz: f32) {
        let hz = clamp_one_pole_cutoff(hz, self.sample_rate);
        if hz != self.cutoff {
            self.cutoff = hz;
            self.update_coefficients();
        }
    }

    /// Sets the shelf gain in dB, clamped to `±50` (shelving types only).
    pub fn set_shelf_amount(&mut self, db: f32) {
        self.shelf_db = clamp_shelf_db(db);
        self.update_coefficients();
    }

    /// Changes the response type and clears the history.
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
        self.cutoff = clamp_one_pole_cutoff(self.cutoff, self.sample_rate);
        self.update_coefficients();
    }

    /// Current (clamped) cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Current response type.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
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
        let output = self.b0 * input + self.z[ch];
        self.z[ch] = self.b1 * input - self.a1 * output + DNC;
        output
    }

    /// Clears both channels' history.
    pub fn reset(&mut self) {
        self.z = [0.0; 2];
    }

    /// Magnitude response in dB at `freq` Hz (analysis helper).
    pub fn magnitude_db(&self, freq: f32) -> f32 {
        magnitude_db([self.b0, self.b1, 0.0, self.a1, 0.0], freq, self.sample_rate)
    }

    fn update_coefficients(&mut self) {
        let k = tan_poly(PI * self.cutoff / self.sample_rate);
        let norm = 1.0 / (1.0 + k);
        self.a1 = (k - 1.0) * norm;
        match self.filter_type {
            FilterType::Lowpass => {
                self.b0 = k * norm;
                self.b1 = self.b0;
            }
            FilterType::Highpass => {
                self.b0 = norm;
                self.b1 = -norm;
            }
            FilterType::LowShelf => {
                let g = db_to_linear(self.shelf_db);
                self.b0 = (1.0 + g * k) * norm;
                self.b1 = (g * k - 1.0) * norm;
            }
            FilterType::HighShelf => {
                let g = db_to_linear(self.shelf_db);
                self.b0 = (g + k) * norm;
                self.b1 = (k - g) * norm;
            }
        }
    }
}
