//! Speaker cabinet simulation.
//!
//! A guitar-cabinet style coloration stage for the synth bus:
//!
//! ```text
//! in ─┬─ ·drive → HP(lo cut) → tilt(+t) → sine/fold/asym → tilt(−t)
//!     │         → LP(hi cut) → LP(1.333·hi cut) → ·level ──┐
//!     └──────────────────────────────────────── dry/wet ←──┘
//! ```
//!
//! The two tilt filters bracket the shaper with opposite amounts, so the
//! tilt changes which part of the spectrum saturates first without changing
//! the overall balance. The asymmetry term high-passes the squared signal at
//! 30 Hz instead of subtracting a fixed 0.5, so it adds even harmonics
//! without a DC step.

use sinefold_core::{
    Biquad, Effect, FilterType, OnePole, RampedParameter, Tilt, UNITY_DRIVE, db_to_linear,
    drive_from_db, sine_approx, three_ranges, unipolar_crossfade,
};

/// Pivot of the tilt bracket.
const TILT_PIVOT_HZ: f32 = 800.0;
/// Corner of the DC blocker on the squared term.
const SQUARE_HIGHPASS_HZ: f32 = 30.0;
/// Ratio of the second lowpass to the first.
const SECOND_LOWPASS_RATIO: f32 = 1.333;
/// Wet level range in dB.
const MIN_LEVEL_DB: f32 = -50.0;
const MAX_LEVEL_DB: f32 = 12.0;

/// Stereo cabinet stage.
///
/// Drive, fold, asymmetry, level and mix are ramped; cutoffs and tilt apply
/// immediately to the coefficients.
///
/// | Control | Range | Default |
/// |---------|-------|---------|
/// | Drive | ±50 dB | 0 dB |
/// | Lo cut | biquad range | 80 Hz |
/// | Hi cut | biquad range | 5 kHz |
/// | Tilt | ±50 dB | 0 dB |
/// | Fold | 0–1 | 1 |
/// | Asym | 0–1 | 0 |
/// | Level | −50–12 dB | 0 dB |
/// | Mix | 0–1 | 1 |
///
/// # Example
///
/// ```rust
/// use sinefold_core::Effect;
/// use sinefold_effects::Cabinet;
///
/// let mut cab = Cabinet::new(48000.0);
/// cab.set_drive_db(12.0);
/// cab.set_tilt_db(6.0);
/// let (_l, _r) = cab.process_stereo(0.3, 0.3);
/// ```
#[derive(Debug, Clone)]
pub struct Cabinet {
    drive: RampedParameter,
    level: RampedParameter,
    mix: RampedParameter,
    fold: RampedParameter,
    asym: RampedParameter,
    hicut: f32,
    lo_cut: Biquad,
    tilt_pre: Tilt,
    tilt_post: Tilt,
    square_hp: OnePole,
    lowpass_a: Biquad,
    lowpass_b: Biquad,
}

impl Cabinet {
    /// Create a fully wet cabinet with neutral drive and tilt.
    pub fn new(sample_rate: f32) -> Self {
        let hicut = 5000.0;
        Self {
            drive: RampedParameter::new(sample_rate, UNITY_DRIVE),
            level: RampedParameter::new(sample_rate, 1.0),
            mix: RampedParameter::new(sample_rate, 1.0),
            fold: RampedParameter::new(sample_rate, 1.0),
            asym: RampedParameter::new(sample_rate, 0.0),
            hicut,
            lo_cut: Biquad::with_type(sample_rate, FilterType::Highpass, 80.0),
            tilt_pre: Tilt::new(sample_rate, TILT_PIVOT_HZ),
            tilt_post: Tilt::new(sample_rate, TILT_PIVOT_HZ),
            square_hp: OnePole::with_type(sample_rate, FilterType::Highpass, SQUARE_HIGHPASS_HZ),
            lowpass_a: Biquad::with_type(sample_rate, FilterType::Lowpass, hicut),
            lowpass_b: Biquad::with_type(
                sample_rate,
                FilterType::Lowpass,
                hicut * SECOND_LOWPASS_RATIO,
            ),
        }
    }

    /// Set input drive in dB, clamped to `±50` (0 dB = quarter-turn gain of 0.25).
    pub fn set_drive_db(&mut self, db: f32) {
        self.drive.init_ramp(drive_from_db(db));
    }

    /// Set the high-pass corner in Hz.
    pub fn set_lo_cut(&mut self, hz: f32) {
        self.lo_cut.set_cutoff(hz);
    }

    /// Set the lowpass corner in Hz; the second lowpass follows at 1.333×.
    pub fn set_hi_cut(&mut self, hz: f32) {
        self.lowpass_a.set_cutoff(hz);
        self.hicut = self.lowpass_a.cutoff();
        self.lowpass_b.set_cutoff(self.hicut * SECOND_LOWPASS_RATIO);
    }

    /// Set the tilt bracket in dB, clamped to `±50`.
    pub fn set_tilt_db(&mut self, db: f32) {
        self.tilt_pre.set_tilt(db);
        self.tilt_post.set_tilt(-db);
    }

    /// Set the fold amount, clamped to `[0, 1]`.
    pub fn set_fold(&mut self, fold: f32) {
        self.fold.init_ramp(fold.clamp(0.0, 1.0));
    }

    /// Set the asymmetry amount, clamped to `[0, 1]`.
    pub fn set_asym(&mut self, asym: f32) {
        self.asym.init_ramp(asym.clamp(0.0, 1.0));
    }

    /// Set the output level of the wet path in dB, clamped to `[-50, 12]`.
    pub fn set_level_db(&mut self, db: f32) {
        self.level
            .init_ramp(db_to_linear(db.clamp(MIN_LEVEL_DB, MAX_LEVEL_DB)));
    }

    /// Set the dry/wet mix, clamped to `[0, 1]`.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.init_ramp(mix.clamp(0.0, 1.0));
    }

    /// Current hi-cut corner in Hz.
    pub fn hi_cut(&self) -> f32 {
        self.hicut
    }

    #[inline]
    fn shape(&mut self, ch: usize, ctrl: f32, fold: f32, asym: f32) -> f32 {
        let y = three_ranges(ctrl, sine_approx(ctrl), fold);
        let even = self.square_hp.process_channel(ch, y * y);
        (1.0 - asym) * y + 2.0 * asym * even
    }
}

impl Default for Cabinet {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for Cabinet {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let drive = self.drive.advance();
        let level = self.level.advance();
        let mix = self.mix.advance();
        let fold = self.fold.advance();
        let asym = self.asym.advance();

        let (l, r) = self.lo_cut.process_stereo(left * drive, right * drive);
        let (l, r) = self.tilt_pre.process_stereo(l, r);
        let l = self.shape(0, l, fold, asym);
        let r = self.shape(1, r, fold, asym);
        let (l, r) = self.tilt_post.process_stereo(l, r);
        let (l, r) = self.lowpass_a.process_stereo(l, r);
        let (l, r) = self.lowpass_b.process_stereo(l, r);

        (
            unipolar_crossfade(left, l * level, mix),
            unipolar_crossfade(right, r * level, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        for p in [
            &mut self.drive,
            &mut self.level,
            &mut self.mix,
            &mut self.fold,
            &mut self.asym,
        ] {
            p.set_sample_rate(sample_rate);
        }
        self.lo_cut.set_sample_rate(sample_rate);
        self.tilt_pre.set_sample_rate(sample_rate);
        self.tilt_post.set_sample_rate(sample_rate);
        self.square_hp.set_sample_rate(sample_rate);
        self.lowpass_a.set_sample_rate(sample_rate);
        self.lowpass_b.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.lo_cut.reset();
        self.tilt_pre.reset();
        self.tilt_post.reset();
        self.square_hp.reset();
        self.lowpass_a.reset();
        self.lowpass_b.reset();
    }
}
