//! Per-slot pitch and velocity shared by the voice stages.

use sinefold_core::RampedParameter;

/// Pitch and ramped velocity gain of every voice slot.
///
/// Owned by the voice manager and lent to the generator, the comb bank and
/// the mixer. Velocity changes ramp over the standard smoothing window, so
/// note-on and note-off never step the output. A released slot keeps its
/// pitch; only its gain goes to zero.
#[derive(Debug, Clone)]
pub struct VoiceTable<const N: usize> {
    pitch: [u8; N],
    velocity: [RampedParameter; N],
}

impl<const N: usize> VoiceTable<N> {
    /// All slots silent at middle C.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            pitch: [60; N],
            velocity: [RampedParameter::new(sample_rate, 0.0); N],
        }
    }

    /// Record a note-on: set the pitch and ramp the gain to `velocity / 127`.
    pub fn assign(&mut self, slot: usize, pitch: u8, velocity: u8) {
        self.pitch[slot] = pitch.min(127);
        self.velocity[slot].init_ramp(f32::from(velocity.min(127)) / 127.0);
    }

    /// Ramp the gain of `slot` to zero.
    pub fn release(&mut self, slot: usize) {
        self.velocity[slot].init_ramp(0.0);
    }

    /// Ramp every gain to zero.
    pub fn release_all(&mut self) {
        for v in &mut self.velocity {
            v.init_ramp(0.0);
        }
    }

    /// Advance every velocity ramp by one sample.
    #[inline]
    pub fn advance(&mut self) {
        for v in &mut self.velocity {
            v.advance();
        }
    }

    /// MIDI pitch of `slot`.
    #[inline]
    pub fn pitch(&self, slot: usize) -> u8 {
        self.pitch[slot]
    }

    /// Current velocity gain of `slot`.
    #[inline]
    pub fn gain(&self, slot: usize) -> f32 {
        self.velocity[slot].get()
    }

    /// Whether `slot` is audible or still ramping.
    pub fn is_sounding(&self, slot: usize) -> bool {
        self.velocity[slot].get() > 0.0 || self.velocity[slot].is_ramping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_ramps_in_and_out() {
        let mut table: VoiceTable<2> = VoiceTable::new(48000.0);
        table.assign(1, 69, 127);
        assert_eq!(table.gain(1), 0.0);
        assert!(table.is_sounding(1));
        table.advance();
        let first = table.gain(1);
        assert!(first > 0.0 && first < 0.01);
        for _ in 0..400 {
            table.advance();
        }
        assert_eq!(table.gain(1), 1.0);
        assert!(!table.is_sounding(0));

        table.release(1);
        for _ in 0..400 {
            table.advance();
        }
        assert_eq!(table.gain(1), 0.0);
        assert_eq!(table.pitch(1), 69);
        assert!(!table.is_sounding(1));
    }

    #[test]
    fn test_velocity_scales_linearly() {
        let mut table: VoiceTable<1> = VoiceTable::new(48000.0);
        table.assign(0, 60, 100);
        for _ in 0..400 {
            table.advance();
        }
        assert!((table.gain(0) - 100.0 / 127.0).abs() < 1e-6);
    }
}
