//! One comb filter per voice, tuned from the voice table.

use crate::params::CombParam;
use crate::soundgenerator::VoiceOutput;
use crate::voice_table::VoiceTable;
use sinefold_effects::{CombFilter, CombParams};

/// Longest comb decay in seconds.
pub const MAX_DECAY_SECONDS: f32 = 30.0;
/// Largest comb pitch or allpass offset in semitones.
pub const MAX_OFFSET_SEMITONES: f32 = 48.0;

/// Per-voice comb filters with shared settings.
///
/// A voice's comb is retuned when it is triggered and, for every voice,
/// on each sample where a comb setting is still ramping.
#[derive(Debug, Clone)]
pub struct CombBank<const N: usize> {
    params: CombParams,
    filters: [CombFilter; N],
}

impl<const N: usize> CombBank<N> {
    /// Allocate `N` combs.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            params: CombParams::new(sample_rate),
            filters: core::array::from_fn(|_| CombFilter::new(sample_rate)),
        }
    }

    /// Apply a comb parameter in natural units.
    pub fn set_param(&mut self, param: CombParam, value: f32) {
        let p = &mut self.params;
        match param {
            CombParam::AbMix => p.ab_mix.init_ramp(value.clamp(0.0, 1.0)),
            CombParam::KeyTrack => p.key_track.init_ramp(value.clamp(0.0, 1.0)),
            CombParam::Pitch => p
                .pitch_offset
                .init_ramp(value.clamp(-MAX_OFFSET_SEMITONES, MAX_OFFSET_SEMITONES)),
            CombParam::Decay => p.decay.init_ramp(value.clamp(0.0, MAX_DECAY_SECONDS)),
            CombParam::AllpassTune => p
                .allpass_tune
                .init_ramp(value.clamp(-MAX_OFFSET_SEMITONES, MAX_OFFSET_SEMITONES)),
            CombParam::AllpassResonance => {
                p.allpass_resonance.init_ramp(value.clamp(-1.0, 1.0));
            }
            CombParam::HiCut => p.hicut.init_ramp(value.max(0.0)),
        }
    }

    /// Retune the comb of `slot` to its pitch.
    pub fn note_on(&mut self, slot: usize, table: &VoiceTable<N>) {
        self.filters[slot].retune(f32::from(table.pitch(slot)), &self.params);
    }

    /// Run every comb on its voice's module outputs, writing `comb`.
    #[inline]
    pub fn process(&mut self, table: &VoiceTable<N>, voices: &mut [VoiceOutput; N]) {
        let ramping = self.params.advance();
        let ab_mix = self.params.ab_mix.get();
        for (slot, (filter, voice)) in self.filters.iter_mut().zip(voices.iter_mut()).enumerate() {
            if ramping {
                filter.retune(f32::from(table.pitch(slot)), &self.params);
            }
            voice.comb = filter.process(voice.a, voice.b, ab_mix);
        }
    }

    /// Comb of `slot`.
    pub fn filter(&self, slot: usize) -> &CombFilter {
        &self.filters[slot]
    }

    /// Silence every comb.
    pub fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}
