//! Voice-to-stereo mixer with a saturating bus stage.
//!
//! Each voice contributes three sources (module A, module B, comb), each
//! with its own level and pan, scaled by the voice's velocity gain. The pan
//! of every source is offset by the voice's key position, so low notes can
//! lean left and high notes right.
//!
//! After the last voice the stereo sum goes through the same sine shaper as
//! the cabinet (the squared term high-passed at 30 Hz), an 8 Hz DC blocker,
//! and the master level `level² · 0.64`.

use crate::params::MixerParam;
use crate::soundgenerator::VoiceOutput;
use crate::voice_table::VoiceTable;
use sinefold_core::{
    FilterType, OnePole, RampedParameter, UNITY_DRIVE, drive_from_db, sine_approx, three_ranges,
};
/// Corner of the high-pass on the squared term.
const SQUARE_HIGHPASS_HZ: f32 = 30.0;
/// Corner of the output DC blocker.
const DC_BLOCK_HZ: f32 = 8.0;
/// Headroom factor on the squared master level.
const OUTPUT_HEADROOM: f32 = 0.64;

const SOURCE_A: usize = 0;
const SOURCE_B: usize = 1;
const SOURCE_COMB: usize = 2;

/// Stereo voice mixer.
///
/// | Control | Range | Default |
/// |---------|-------|---------|
/// | Level A / B / comb | 0–1 | 1 / 0 / 0 |
/// | Pan A / B / comb | −1–1 | 0 |
/// | Key pan | −1–1 | 0 |
/// | Drive | ±50 dB | 0 dB |
/// | Fold | 0–1 | 1 |
/// | Asym | 0–1 | 0 |
/// | Level | 0–1 | 1 |
#[derive(Debug, Clone)]
pub struct Outputmixer {
    levels: [RampedParameter; 3],
    pans: [RampedParameter; 3],
    key_pan: RampedParameter,
    drive: RampedParameter,
    fold: RampedParameter,
    asym: RampedParameter,
    level: RampedParameter,
    square_hp: OnePole,
    dc_block: OnePole,
}

impl Outputmixer {
    /// Module A centered at full level; B and comb muted.
    pub fn new(sample_rate: f32) -> Self {
        let ramp = |v| RampedParameter::new(sample_rate, v);
        Self {
            levels: [ramp(1.0), ramp(0.0), ramp(0.0)],
            pans: [ramp(0.0), ramp(0.0), ramp(0.0)],
            key_pan: ramp(0.0),
            drive: ramp(UNITY_DRIVE),
            fold: ramp(1.0),
            asym: ramp(0.0),
            level: ramp(1.0),
            square_hp: OnePole::with_type(sample_rate, FilterType::Highpass, SQUARE_HIGHPASS_HZ),
            dc_block: OnePole::with_type(sample_rate, FilterType::Highpass, DC_BLOCK_HZ),
        }
    }

    /// Apply a mixer parameter in natural units.
    pub fn set_param(&mut self, param: MixerParam, value: f32) {
        let unit = value.clamp(0.0, 1.0);
        let bipolar = value.clamp(-1.0, 1.0);
        match param {
            MixerParam::LevelA => self.levels[SOURCE_A].init_ramp(unit),
            MixerParam::LevelB => self.levels[SOURCE_B].init_ramp(unit),
            MixerParam::LevelComb => self.levels[SOURCE_COMB].init_ramp(unit),
            MixerParam::PanA => self.pans[SOURCE_A].init_ramp(bipolar),
            MixerParam::PanB => self.pans[SOURCE_B].init_ramp(bipolar),
            MixerParam::PanComb => self.pans[SOURCE_COMB].init_ramp(bipolar),
            MixerParam::KeyPan => self.key_pan.init_ramp(bipolar),
            MixerParam::Drive => self.drive.init_ramp(drive_from_db(value)),
            MixerParam::Fold => self.fold.init_ramp(unit),
            MixerParam::Asym => self.asym.init_ramp(unit),
            MixerParam::Level => self.level.init_ramp(unit),
        }
    }

    /// Mix one sample of every voice into a stereo frame.
    #[inline]
    pub fn mix<const N: usize>(
        &mut self,
        table: &VoiceTable<N>,
        voices: &[VoiceOutput; N],
    ) -> (f32, f32) {
        let levels = self.levels.each_mut().map(|p| p.advance());
        let pans = self.pans.each_mut().map(|p| p.advance());
        let key_pan = self.key_pan.advance();
        let drive = self.drive.advance();
        let fold = self.fold.advance();
        let asym = self.asym.advance();
        let level = self.level.advance();

        let mut left = 0.0;
        let mut right = 0.0;
        for (slot, voice) in voices.iter().enumerate() {
            let gain = table.gain(slot);
            if gain == 0.0 {
                continue;
            }
            let key = (f32::from(table.pitch(slot)) - 60.0) / 64.0 * key_pan;
            let sources = [voice.a, voice.b, voice.comb];
            for ((sample, source_level), pan) in sources.into_iter().zip(levels).zip(pans) {
                let pos = (key + pan).clamp(-1.0, 1.0);
                let s = sample * source_level * gain * 0.5;
                left += s * (1.0 - pos);
                right += s * (1.0 + pos);
            }
        }

        let l = self.shape(0, left * drive, fold, asym);
        let r = self.shape(1, right * drive, fold, asym);
        let (l, r) = self.dc_block.process_stereo(l, r);
        let gain = level * level * OUTPUT_HEADROOM;
        (l * gain, r * gain)
    }

    #[inline]
    fn shape(&mut self, ch: usize, ctrl: f32, fold: f32, asym: f32) -> f32 {
        let y = three_ranges(ctrl, sine_approx(ctrl), fold);
        let even = self.square_hp.process_channel(ch, y * y);
        (1.0 - asym) * y + 2.0 * asym * even
    }

    /// Clear the filter history.
    pub fn reset(&mut self) {
        self.square_hp.reset();
        self.dc_block.reset();
    }
}
