//! Per-module waveshaper settings.

use sinefold_core::{RampedParameter, UNITY_DRIVE, drive_from_db, shape};

/// Ramped drive, fold and asymmetry for one module, shared by all voices.
///
/// Call [`advance`](Self::advance) once per sample, then
/// [`process`](Self::process) for every voice.
///
/// ```rust
/// use sinefold_synth::Shaper;
///
/// let shaper = Shaper::new(48000.0);
/// // The default curve maps full scale onto full scale.
/// assert!((shaper.process(1.0) - 1.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct Shaper {
    drive: RampedParameter,
    fold: RampedParameter,
    asym: RampedParameter,
}

impl Shaper {
    /// 0 dB drive, full fold, no asymmetry.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            drive: RampedParameter::new(sample_rate, UNITY_DRIVE),
            fold: RampedParameter::new(sample_rate, 1.0),
            asym: RampedParameter::new(sample_rate, 0.0),
        }
    }

    /// Set drive in dB, clamped to `±50`.
    pub fn set_drive_db(&mut self, db: f32) {
        self.drive.init_ramp(drive_from_db(db));
    }

    /// Set fold, clamped to `[0, 1]`.
    pub fn set_fold(&mut self, fold: f32) {
        self.fold.init_ramp(fold.clamp(0.0, 1.0));
    }

    /// Set asymmetry, clamped to `[0, 1]`.
    pub fn set_asym(&mut self, asym: f32) {
        self.asym.init_ramp(asym.clamp(0.0, 1.0));
    }

    /// Advance the ramps by one sample.
    #[inline]
    pub fn advance(&mut self) {
        self.drive.advance();
        self.fold.advance();
        self.asym.advance();
    }

    /// Shape one sample with the current settings.
    #[inline]
    pub fn process(&self, x: f32) -> f32 {
        shape(x, self.drive.get(), self.fold.get(), self.asym.get())
    }

    /// Current linear drive.
    pub fn drive(&self) -> f32 {
        self.drive.get()
    }
}
