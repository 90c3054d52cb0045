//! Phase-modulated sine oscillator with random pitch fluctuation.
//!
//! Each voice runs two of these, one per module. The phase accumulator lives
//! in `[-0.5, 0.5)` turns. The phase-modulation input is smoothed by a
//! one-pole lowpass (the "chirp" filter) before it is added, which keeps
//! large modulation steps from producing clicks.
//!
//! Per-voice detuning comes from a linear congruential generator. A new
//! random value is drawn only when the accumulator wraps, so each period
//! has a constant frequency and the fluctuation sounds like slow analog
//! drift rather than noise.

use libm::floorf;
use sinefold_core::{FilterType, OnePole, sine_approx};

/// Default corner of the phase-modulation smoother in Hz.
pub const DEFAULT_CHIRP_HZ: f32 = 7200.0;

const LCG_MUL: u32 = 1_103_515_245;
const LCG_ADD: u32 = 12_345;

/// One oscillator of one voice.
///
/// Frequency ratio and fluctuation depth are shared by all voices of a
/// module and are passed into [`tick`](Self::tick) each sample.
///
/// # Example
///
/// ```rust
/// use sinefold_synth::Oscillator;
///
/// let mut osc = Oscillator::new(48000.0, 1);
/// osc.set_frequency(440.0);
/// osc.reset_phase(0.0);
/// let first = osc.tick(0.0, 1.0, 0.0);
/// assert!(first > 0.0 && first < 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    seed: u32,
    random: f32,
    chirp: OnePole,
}

impl Oscillator {
    /// Create an oscillator at 440 Hz with a deterministic random stream.
    pub fn new(sample_rate: f32, seed: u32) -> Self {
        let mut osc = Self {
            sample_rate,
            frequency: 440.0,
            phase: 0.0,
            seed,
            random: 0.0,
            chirp: OnePole::with_type(sample_rate, FilterType::Lowpass, DEFAULT_CHIRP_HZ),
        };
        osc.random = osc.next_random();
        osc
    }

    /// Set the base frequency in Hz.
    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz.max(0.0);
    }

    /// Base frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Restart the accumulator at `turns`, wrapped into `[-0.5, 0.5)`.
    pub fn reset_phase(&mut self, turns: f32) {
        self.phase = wrap(turns);
    }

    /// Current accumulator phase in turns.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Set the corner of the phase-modulation smoother.
    pub fn set_chirp_cutoff(&mut self, hz: f32) {
        self.chirp.set_cutoff(hz);
    }

    /// Corner of the phase-modulation smoother after clamping.
    pub fn chirp_cutoff(&self) -> f32 {
        self.chirp.cutoff()
    }

    /// Random detune factor of the current period, in `[-1, 1)`.
    pub fn random(&self) -> f32 {
        self.random
    }

    /// Advance one sample.
    ///
    /// `pm` is the phase-modulation input in turns, `ratio` multiplies the
    /// base frequency and `fluct` scales the random detune.
    #[inline]
    pub fn tick(&mut self, pm: f32, ratio: f32, fluct: f32) -> f32 {
        let inc = self.frequency * ratio * (1.0 + self.random * fluct) / self.sample_rate;
        let next = wrap(self.phase + inc);
        if (next - self.phase).abs() > 0.5 {
            self.random = self.next_random();
        }
        self.phase = next;
        sine_approx(self.phase + self.chirp.process(pm))
    }

    fn next_random(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(LCG_MUL).wrapping_add(LCG_ADD);
        (self.seed as i32) as f32 / 2_147_483_648.0
    }
}

#[inline]
fn wrap(turns: f32) -> f32 {
    turns - floorf(turns + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f32 = 48000.0;

    #[test]
    fn test_phase_stays_in_range() {
        let mut osc = Oscillator::new(FS, 7);
        osc.set_frequency(3000.0);
        for _ in 0..10000 {
            osc.tick(0.0, 1.3, 0.1);
            assert!((-0.5..0.5).contains(&osc.phase()), "{}", osc.phase());
        }
    }

    #[test]
    fn test_counts_periods_at_base_frequency() {
        let mut osc = Oscillator::new(FS, 3);
        osc.set_frequency(440.0);
        osc.reset_phase(0.0);
        let mut wraps = 0;
        let mut last = osc.phase();
        for _ in 0..FS as usize {
            osc.tick(0.0, 1.0, 0.0);
            if osc.phase() < last {
                wraps += 1;
            }
            last = osc.phase();
        }
        assert!((439..=441).contains(&wraps), "wraps {wraps}");
    }

    #[test]
    fn test_ratio_scales_frequency() {
        let mut osc = Oscillator::new(FS, 3);
        osc.set_frequency(100.0);
        osc.reset_phase(0.0);
        let mut wraps = 0;
        let mut last = osc.phase();
        for _ in 0..FS as usize {
            osc.tick(0.0, 2.0, 0.0);
            if osc.phase() < last {
                wraps += 1;
            }
            last = osc.phase();
        }
        assert!((199..=201).contains(&wraps), "wraps {wraps}");
    }

    #[test]
    fn test_random_changes_only_at_wrap() {
        let mut osc = Oscillator::new(FS, 11);
        osc.set_frequency(100.0);
        osc.reset_phase(0.0);
        let start = osc.random();
        // 100 Hz: the first wrap is 240 samples away
        for _ in 0..200 {
            osc.tick(0.0, 1.0, 0.1);
            assert_eq!(osc.random(), start);
        }
        for _ in 0..100 {
            osc.tick(0.0, 1.0, 0.1);
        }
        assert_ne!(osc.random(), start);
    }

    #[test]
    fn test_seeds_are_deterministic() {
        let run = |seed| {
            let mut osc = Oscillator::new(FS, seed);
            osc.set_frequency(220.0);
            (0..5000).map(|_| osc.tick(0.0, 1.0, 0.1)).sum::<f32>()
        };
        assert_eq!(run(5), run(5));
        assert_ne!(run(5), run(6));
    }

    #[test]
    fn test_random_range() {
        let mut osc = Oscillator::new(FS, 99);
        for _ in 0..1000 {
            let r = osc.next_random();
            assert!((-1.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_reset_phase_wraps() {
        let mut osc = Oscillator::new(FS, 1);
        osc.reset_phase(0.75);
        assert!((osc.phase() + 0.25).abs() < 1e-6);
        osc.reset_phase(-0.5);
        assert!((osc.phase() + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_phase_modulation_offsets_output() {
        let mut osc = Oscillator::new(FS, 1);
        osc.reset_phase(0.0);
        // frozen accumulator; a constant quarter-turn offset settles to the peak
        let mut out = 0.0;
        for _ in 0..2000 {
            out = osc.tick(0.25, 0.0, 0.0);
        }
        assert!((out - 1.0).abs() < 1e-3, "{out}");
    }

    #[test]
    fn test_chirp_smooths_modulation_steps() {
        let mut osc = Oscillator::new(FS, 1);
        osc.set_chirp_cutoff(100.0);
        osc.reset_phase(0.0);
        let first = osc.tick(0.25, 0.0, 0.0);
        assert!(first < 0.1, "step passed unfiltered: {first}");
    }
}
