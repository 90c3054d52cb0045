//! Click-free parameter changes.
//!
//! Control messages arrive at MIDI rate; the audio path reads parameters at
//! sample rate. Writing a new value straight into a gain or a coefficient
//! produces an audible step ("zipper noise"), so every control parameter
//! goes through one of two smoothers:
//!
//! - [`RampedParameter`] - linear ramp over a fixed ~6.4 ms window. Used for
//!   every control-mapped value (levels, mixes, drives, pitch ratios).
//! - [`SmoothedParam`] - exponential one-pole glide. Used where a value must
//!   keep moving continuously, such as echo delay time, where a linear ramp
//!   would produce an audible pitch kink at its end.
//!
//! ## Usage
//!
//! ```rust
//! use sinefold_core::RampedParameter;
//!
//! let mut level = RampedParameter::new(48000.0, 0.0);
//! level.init_ramp(1.0);
//!
//! // One advance per sample; converged after fs·0.032/5 samples.
//! for _ in 0..308 {
//!     level.advance();
//! }
//! assert_eq!(level.get(), 1.0);
//! assert!(!level.is_ramping());
//! ```

use libm::expf;

/// Nominal smoothing time constant in seconds.
///
/// The ramp covers the window in `fs · SMOOTHING_SECONDS / 5` samples.
pub const SMOOTHING_SECONDS: f32 = 0.032;

/// A linearly ramped control parameter.
///
/// [`init_ramp`](Self::init_ramp) captures the current value as the ramp
/// base and restarts the ramp position at 0; each
/// [`advance`](Self::advance) moves the position by a fixed increment and
/// interpolates. Once the position reaches 1 the value equals the target
/// exactly, and [`is_ramping`](Self::is_ramping) turns false so callers can
/// skip converged parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampedParameter {
    current: f32,
    base: f32,
    target: f32,
    diff: f32,
    /// Ramp position in \[0, 1\].
    ramp: f32,
    increment: f32,
}

impl RampedParameter {
    /// Create a converged parameter holding `initial`.
    pub fn new(sample_rate: f32, initial: f32) -> Self {
        Self {
            current: initial,
            base: initial,
            target: initial,
            diff: 0.0,
            ramp: 1.0,
            increment: increment_for(sample_rate),
        }
    }

    /// Start a ramp from the current value towards `target`.
    ///
    /// Calling this mid-ramp restarts from wherever the value is now, so
    /// rapid control changes never jump.
    #[inline]
    pub fn init_ramp(&mut self, target: f32) {
        self.base = self.current;
        self.target = target;
        self.diff = target - self.base;
        self.ramp = 0.0;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.ramp < 1.0 {
            self.ramp += self.increment;
            if self.ramp >= 1.0 {
                self.ramp = 1.0;
                self.current = self.target;
            } else {
                self.current = self.base + self.diff * self.ramp;
            }
        }
        self.current
    }

    /// Jump to `value` with no ramp.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.base = value;
        self.target = value;
        self.diff = 0.0;
        self.ramp = 1.0;
    }

    /// Recompute the per-sample increment for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.increment = increment_for(sample_rate);
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Value the ramp is heading to.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Ramp position in \[0, 1\].
    #[inline]
    pub fn position(&self) -> f32 {
        self.ramp
    }

    /// Whether the value has not yet reached its target.
    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.ramp < 1.0
    }
}

impl Default for RampedParameter {
    fn default() -> Self {
        Self::new(48000.0, 0.0)
    }
}

fn increment_for(sample_rate: f32) -> f32 {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        5.0 / (sample_rate * SMOOTHING_SECONDS)
    } else {
        1.0
    }
}

/// A parameter with exponential (one-pole lowpass) smoothing.
///
/// Never quite stops moving towards its target, which makes it the right
/// choice for delay times: a linear ramp would end with a sudden change in
/// read-head speed.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// Smoothing coefficient (1 = instant, ~0 = very slow)
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a smoothed parameter with instant response.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create a smoothed parameter with the given time constant.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Create a smoothed parameter whose glide is a one-pole lowpass at
    /// `corner_hz` (time constant `1 / (2π·corner_hz)`).
    pub fn with_corner(initial: f32, sample_rate: f32, corner_hz: f32) -> Self {
        let time_ms = 1000.0 / (core::f32::consts::TAU * corner_hz.max(1e-3));
        Self::with_config(initial, sample_rate, time_ms)
    }

    /// Set the value to glide towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and jump to it.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update sample rate and recalculate the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the value is within 1e-6 of its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// `coeff = 1 - exp(-1 / (tau · fs))`; reaches 63.2% of a step after one
    /// time constant and is effectively settled after five.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
