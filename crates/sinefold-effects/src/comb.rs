//! Key-tracked feedback comb filter, one instance per voice.
//!
//! Each voice owns a [`CombFilter`]: a short delay line whose loop time is
//! tuned to the voice's pitch, with an allpass for dispersion and a one-pole
//! lowpass for damping inside the loop. Fed with the voice's oscillator
//! signal it adds a plucked-string resonance on top of the dry voice.
//!
//! ```text
//! in = (1 − ab)·A + ab·B
//! x  = in + g · lowpass(allpass(y_prev))  → delay line
//! y  = delay.read(fs/freq − 1)
//! ```
//!
//! The settings are shared by all voices and live in [`CombParams`]; each
//! voice recomputes its coefficients from them at note-on and while any of
//! them is still ramping.

use libm::{exp2f, powf};
use sinefold_core::{
    Biquad, DelayLine, FilterType, OnePole, RampedParameter, allpass_coefficients,
    flush_denormal, unipolar_crossfade,
};

/// Lowest loop frequency in Hz.
pub const MIN_FREQ: f32 = 20.0;
/// RT60 amplitude target reached after `decay` seconds.
const RT60_GAIN: f32 = 0.001;

/// Shared, ramped comb settings.
#[derive(Debug, Clone)]
pub struct CombParams {
    /// Input blend between module A (0) and module B (1).
    pub ab_mix: RampedParameter,
    /// How far the loop frequency follows the key (1 = fully, 0 = fixed at C4).
    pub key_track: RampedParameter,
    /// Loop tuning offset in semitones.
    pub pitch_offset: RampedParameter,
    /// Time for the loop to decay by 60 dB, in seconds. 0 disables feedback.
    pub decay: RampedParameter,
    /// Allpass center relative to the loop frequency, in semitones.
    pub allpass_tune: RampedParameter,
    /// Allpass resonance.
    pub allpass_resonance: RampedParameter,
    /// Damping lowpass corner in Hz.
    pub hicut: RampedParameter,
}

impl CombParams {
    /// Defaults: input from A, full key tracking, 1 s decay, 8 kHz damping.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            ab_mix: RampedParameter::new(sample_rate, 0.0),
            key_track: RampedParameter::new(sample_rate, 1.0),
            pitch_offset: RampedParameter::new(sample_rate, 0.0),
            decay: RampedParameter::new(sample_rate, 1.0),
            allpass_tune: RampedParameter::new(sample_rate, 0.0),
            allpass_resonance: RampedParameter::new(sample_rate, 0.0),
            hicut: RampedParameter::new(sample_rate, 8000.0),
        }
    }

    /// Advance every ramp by one sample; true while any of them moves.
    ///
    /// `ab_mix` is read per sample and does not count: it needs no
    /// coefficient update.
    pub fn advance(&mut self) -> bool {
        self.ab_mix.advance();
        let mut ramping = false;
        for p in [
            &mut self.key_track,
            &mut self.pitch_offset,
            &mut self.decay,
            &mut self.allpass_tune,
            &mut self.allpass_resonance,
            &mut self.hicut,
        ] {
            if p.is_ramping() {
                p.advance();
                ramping = true;
            }
        }
        ramping
    }

    /// Update every ramp's increment for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for p in [
            &mut self.ab_mix,
            &mut self.key_track,
            &mut self.pitch_offset,
            &mut self.decay,
            &mut self.allpass_tune,
            &mut self.allpass_resonance,
            &mut self.hicut,
        ] {
            p.set_sample_rate(sample_rate);
        }
    }
}

/// Per-voice comb state.
#[derive(Debug, Clone)]
pub struct CombFilter {
    sample_rate: f32,
    line: DelayLine,
    allpass: Biquad,
    damping: OnePole,
    freq: f32,
    delay: f32,
    gain: f32,
    last: f32,
}

impl CombFilter {
    /// Allocate a comb long enough for the lowest loop frequency.
    pub fn new(sample_rate: f32) -> Self {
        let mut allpass = Biquad::new(sample_rate);
        allpass.set_coefficients(allpass_coefficients(440.0, 0.0, sample_rate));
        let mut comb = Self {
            sample_rate,
            line: DelayLine::new((sample_rate / MIN_FREQ) as usize + 4),
            allpass,
            damping: OnePole::with_type(sample_rate, FilterType::Lowpass, 8000.0),
            freq: 440.0,
            delay: 0.0,
            gain: 0.0,
            last: 0.0,
        };
        comb.delay = comb.delay_for(comb.freq);
        comb
    }

    /// Loop frequency for `pitch` (MIDI note number) under `params`,
    /// clamped to `[20, fs/4]`.
    pub fn frequency_for(pitch: f32, params: &CombParams, sample_rate: f32) -> f32 {
        let note = 60.0 + (pitch - 60.0) * params.key_track.get() + params.pitch_offset.get();
        (440.0 * exp2f((note - 69.0) / 12.0)).clamp(MIN_FREQ, sample_rate * 0.25)
    }

    /// Recompute loop time, feedback gain, allpass and damping for `pitch`.
    pub fn retune(&mut self, pitch: f32, params: &CombParams) {
        let freq = Self::frequency_for(pitch, params, self.sample_rate);
        self.freq = freq;
        self.delay = self.delay_for(freq);

        let decay = params.decay.get().max(0.0);
        self.gain = if decay > 0.0 {
            powf(RT60_GAIN, 1.0 / (freq * decay))
        } else {
            0.0
        };

        let center = freq * exp2f(params.allpass_tune.get() / 12.0);
        self.allpass.set_coefficients(allpass_coefficients(
            center,
            params.allpass_resonance.get(),
            self.sample_rate,
        ));
        self.damping.set_cutoff(params.hicut.get());
    }

    /// Run one sample: blend `a` and `b` by `ab_mix`, return the comb output.
    #[inline]
    pub fn process(&mut self, a: f32, b: f32, ab_mix: f32) -> f32 {
        let input = unipolar_crossfade(a, b, ab_mix);
        let feedback = self.damping.process(self.allpass.process(self.last));
        self.line.write(flush_denormal(input + self.gain * feedback));
        let out = self.line.read_interpolated(self.delay);
        self.last = out;
        out
    }

    /// Current loop frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Current feedback gain.
    pub fn feedback_gain(&self) -> f32 {
        self.gain
    }

    /// Silence the loop.
    pub fn reset(&mut self) {
        self.line.clear();
        self.allpass.reset();
        self.damping.reset();
        self.last = 0.0;
    }

    fn delay_for(&self, freq: f32) -> f32 {
        (self.sample_rate / freq - 1.0).clamp(0.0, self.line.max_delay())
    }
}
