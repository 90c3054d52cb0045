//! Stereo feedback echo with cross-feed, spread and filtered repeats.

use sinefold_core::{
    DelayLine, Effect, FilterType, OnePole, RampedParameter, SmoothedParam, flush_denormal,
};

/// Longest base delay time in seconds.
pub const MAX_TIME_SECONDS: f32 = 2.0;
/// Largest stereo spread: one channel runs 33% longer than the base time and
/// the other 33% shorter.
pub const MAX_SPREAD: f32 = 0.33;
/// Corner of the delay-time glide.
const TIME_GLIDE_HZ: f32 = 2.0;
/// Fixed high-pass inside the feedback loop.
const LOOP_HIGHPASS_HZ: f32 = 50.0;

/// Stereo echo.
///
/// Per channel and sample:
///
/// ```text
/// x    = in + own_history·fb·(1 − cross) + other_history·fb·cross
/// tap  = delay(x, time_ch)            cubic read, 2 Hz glided time
/// hist = highpass_50Hz(lowpass_hicut(tap))
/// out  = dry·in + wet·hist
/// ```
///
/// `wet = 2m² − m⁴` and `dry = 1 − wet` for mix `m`, both ramped, which keeps
/// loudness roughly constant across the mix range. With `m = 0` the output is
/// exactly the input.
///
/// | Control | Range | Default |
/// |---------|-------|---------|
/// | Time | 0–2 s | 0.3 s |
/// | Feedback | 0–1 | 0.4 |
/// | Cross | 0–1 | 0 |
/// | Spread | −0.33–0.33 | 0 |
/// | Hi cut | one-pole range | 6 kHz |
/// | Mix | 0–1 | 0 |
///
/// # Example
///
/// ```rust
/// use sinefold_core::Effect;
/// use sinefold_effects::Echo;
///
/// let mut echo = Echo::new(48000.0);
/// echo.set_time(0.25);
/// echo.set_feedback(0.5);
/// echo.set_mix(0.4);
/// let (_l, _r) = echo.process_stereo(1.0, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Echo {
    sample_rate: f32,
    lines: [DelayLine; 2],
    history: [f32; 2],
    time: f32,
    spread: f32,
    delay_samples: [SmoothedParam; 2],
    feedback: RampedParameter,
    cross: RampedParameter,
    hicut: OnePole,
    locut: OnePole,
    mix: f32,
    wet: RampedParameter,
    dry: RampedParameter,
}

impl Echo {
    /// Create an echo with a two-second buffer per channel.
    pub fn new(sample_rate: f32) -> Self {
        let time = 0.3;
        let samples = time * sample_rate;
        Self {
            sample_rate,
            lines: [
                DelayLine::with_seconds(sample_rate, MAX_TIME_SECONDS),
                DelayLine::with_seconds(sample_rate, MAX_TIME_SECONDS),
            ],
            history: [0.0; 2],
            time,
            spread: 0.0,
            delay_samples: [
                SmoothedParam::with_corner(samples, sample_rate, TIME_GLIDE_HZ),
                SmoothedParam::with_corner(samples, sample_rate, TIME_GLIDE_HZ),
            ],
            feedback: RampedParameter::new(sample_rate, 0.4),
            cross: RampedParameter::new(sample_rate, 0.0),
            hicut: OnePole::with_type(sample_rate, FilterType::Lowpass, 6000.0),
            locut: OnePole::with_type(sample_rate, FilterType::Highpass, LOOP_HIGHPASS_HZ),
            mix: 0.0,
            wet: RampedParameter::new(sample_rate, 0.0),
            dry: RampedParameter::new(sample_rate, 1.0),
        }
    }

    /// Set the base delay time in seconds, clamped to `[0, 2]`.
    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds.clamp(0.0, MAX_TIME_SECONDS);
        self.update_delay_targets();
    }

    /// Set the stereo spread, clamped to `[-0.33, 0.33]`.
    ///
    /// Left runs at `time·(1 + spread)`, right at `time·(1 − spread)`.
    pub fn set_spread(&mut self, spread: f32) {
        self.spread = spread.clamp(-MAX_SPREAD, MAX_SPREAD);
        self.update_delay_targets();
    }

    /// Set the total feedback, clamped to `[0, 1]`.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.init_ramp(feedback.clamp(0.0, 1.0));
    }

    /// Set how much of the feedback crosses to the other channel, `[0, 1]`.
    pub fn set_cross(&mut self, cross: f32) {
        self.cross.init_ramp(cross.clamp(0.0, 1.0));
    }

    /// Set the lowpass cutoff applied to every repeat.
    pub fn set_hicut(&mut self, hz: f32) {
        self.hicut.set_cutoff(hz);
    }

    /// Set the dry/wet mix, clamped to `[0, 1]`.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
        let m2 = self.mix * self.mix;
        let wet = 2.0 * m2 - m2 * m2;
        self.wet.init_ramp(wet);
        self.dry.init_ramp(1.0 - wet);
    }

    /// Base delay time in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current mix setting.
    pub fn mix(&self) -> f32 {
        self.mix
    }

    fn update_delay_targets(&mut self) {
        let max = self.lines[0].max_delay();
        let base = self.time * self.sample_rate;
        let left = (base * (1.0 + self.spread)).clamp(1.0, max);
        let right = (base * (1.0 - self.spread)).clamp(1.0, max);
        self.delay_samples[0].set_target(left);
        self.delay_samples[1].set_target(right);
    }
}

impl Default for Echo {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for Echo {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let feedback = self.feedback.advance();
        let cross = self.cross.advance();
        let fb_local = feedback * (1.0 - cross);
        let fb_cross = feedback * cross;

        let [hist_l, hist_r] = self.history;
        self.lines[0].write(left + hist_l * fb_local + hist_r * fb_cross);
        self.lines[1].write(right + hist_r * fb_local + hist_l * fb_cross);

        let tap_l = self.lines[0].read_interpolated(self.delay_samples[0].advance());
        let tap_r = self.lines[1].read_interpolated(self.delay_samples[1].advance());

        let (lp_l, lp_r) = self.hicut.process_stereo(tap_l, tap_r);
        let (echo_l, echo_r) = self.locut.process_stereo(lp_l, lp_r);
        self.history = [flush_denormal(echo_l), flush_denormal(echo_r)];

        let wet = self.wet.advance();
        let dry = self.dry.advance();
        (left * dry + echo_l * wet, right * dry + echo_r * wet)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        // Buffers keep their size; the delay targets re-clamp to it.
        self.sample_rate = sample_rate;
        for p in &mut self.delay_samples {
            p.set_sample_rate(sample_rate);
        }
        for p in [&mut self.feedback, &mut self.cross, &mut self.wet, &mut self.dry] {
            p.set_sample_rate(sample_rate);
        }
        self.hicut.set_sample_rate(sample_rate);
        self.locut.set_sample_rate(sample_rate);
        self.update_delay_targets();
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.history = [0.0; 2];
        self.hicut.reset();
        self.locut.reset();
        for p in &mut self.delay_samples {
            p.set_immediate(p.target());
        }
    }
}
