//! Selectable biquad on the stereo bus.

use sinefold_core::{Biquad, Effect, FilterType};

/// Stereo bus filter between the voice mixer and the cabinet.
///
/// Cutoff, resonance and shelf gain go straight to the coefficients; the
/// filter's own state carries the signal across the change. The response
/// type is normally stepped with [`cycle_type`](Self::cycle_type) from a
/// single button-style control.
///
/// | Control | Range | Default |
/// |---------|-------|---------|
/// | Cutoff | `fs/24576`–`fs/2.125` Hz | ceiling |
/// | Resonance | −0.999–0.999 | 0 |
/// | Shelf | dB | 0 |
/// | Type | LP → HP → LS → HS | LP |
///
/// # Example
///
/// ```rust
/// use sinefold_core::{Effect, FilterType};
/// use sinefold_effects::BusFilter;
///
/// let mut filter = BusFilter::new(48000.0);
/// filter.set_cutoff(800.0);
/// filter.cycle_type();
/// assert_eq!(filter.filter_type(), FilterType::Highpass);
/// let (_l, _r) = filter.process_stereo(0.5, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct BusFilter {
    biquad: Biquad,
}

impl BusFilter {
    /// Open lowpass: cutoff at the clamp ceiling, resonance 0.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            biquad: Biquad::new(sample_rate),
        }
    }

    /// Set cutoff (or shelf corner) in Hz.
    pub fn set_cutoff(&mut self, hz: f32) {
        self.biquad.set_cutoff(hz);
    }

    /// Set resonance.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.biquad.set_resonance(resonance);
    }

    /// Set shelf gain in dB.
    pub fn set_shelf_amount(&mut self, db: f32) {
        self.biquad.set_shelf_amount(db);
    }

    /// Select a response type directly.
    pub fn set_type(&mut self, filter_type: FilterType) {
        self.biquad.set_type(filter_type);
    }

    /// Advance to the next type in the LP → HP → LS → HS cycle.
    pub fn cycle_type(&mut self) -> FilterType {
        let next = self.biquad.filter_type().next();
        self.biquad.set_type(next);
        next
    }

    /// Current response type.
    pub fn filter_type(&self) -> FilterType {
        self.biquad.filter_type()
    }

    /// Current (clamped) cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.biquad.cutoff()
    }
}

impl Effect for BusFilter {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.biquad.process_stereo(left, right)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.biquad.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.biquad.reset();
    }
}
