//! Two cross-modulating oscillator/shaper modules per voice.
//!
//! ```text
//!            ┌──────── self_mix_A·pm_self_A ────────┐
//!            │   ┌──── cross_mix_B·pm_cross_A ──────┤
//!            ▼   ▼                                  │
//!  A:  osc_A(pm_A) ─┬─ shaper_A ─┬─ xfade(mix_A) ───┼─→ ring ─→ out_A
//!                   └────────────┴─ self/cross mix ─┘
//!  B:  symmetric, with the roles of A and B swapped
//! ```
//!
//! The modulation signals are blends of the raw oscillator and its shaped
//! version, computed on this sample and used on the next, so the feedback
//! loop has exactly one sample of delay. All settings are shared by every
//! voice; only oscillator state and the modulation memory are per voice.

use crate::oscillator::{DEFAULT_CHIRP_HZ, Oscillator};
use crate::params::{ModuleId, ModuleParam};
use crate::shaper::Shaper;
use crate::voice_table::VoiceTable;
use sinefold_core::{
    RampedParameter, bipolar_crossfade, midi_to_freq, semitones_to_ratio, unipolar_crossfade,
};

/// Largest module pitch offset in semitones.
pub const MAX_PITCH_OFFSET: f32 = 48.0;

/// Audio produced by one voice on one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VoiceOutput {
    /// Module A after ring modulation.
    pub a: f32,
    /// Module B after ring modulation.
    pub b: f32,
    /// Comb filter output.
    pub comb: f32,
}

/// Settings of one module, shared by all voices.
#[derive(Debug, Clone)]
pub struct ModuleSettings {
    ratio: RampedParameter,
    fluct: RampedParameter,
    phase: f32,
    chirp: f32,
    shaper: Shaper,
    pm_self: RampedParameter,
    pm_cross: RampedParameter,
    pm_self_shaper: RampedParameter,
    pm_cross_shaper: RampedParameter,
    mix: RampedParameter,
}

impl ModuleSettings {
    fn new(sample_rate: f32) -> Self {
        let ramp = |v| RampedParameter::new(sample_rate, v);
        Self {
            ratio: ramp(1.0),
            fluct: ramp(0.0),
            phase: 0.0,
            chirp: DEFAULT_CHIRP_HZ,
            shaper: Shaper::new(sample_rate),
            pm_self: ramp(0.0),
            pm_cross: ramp(0.0),
            pm_self_shaper: ramp(0.0),
            pm_cross_shaper: ramp(0.0),
            mix: ramp(0.0),
        }
    }

    fn advance(&mut self) {
        self.ratio.advance();
        self.fluct.advance();
        self.shaper.advance();
        self.pm_self.advance();
        self.pm_cross.advance();
        self.pm_self_shaper.advance();
        self.pm_cross_shaper.advance();
        self.mix.advance();
    }

    /// Run one module of one voice: returns `(out, self_mix, cross_mix)`.
    #[inline]
    fn run(&self, osc: &mut Oscillator, pm: f32) -> (f32, f32, f32) {
        let x = osc.tick(pm, self.ratio.get(), self.fluct.get());
        let shaped = self.shaper.process(x);
        (
            bipolar_crossfade(x, shaped, self.mix.get()),
            bipolar_crossfade(x, shaped, self.pm_self_shaper.get()),
            bipolar_crossfade(x, shaped, self.pm_cross_shaper.get()),
        )
    }

    /// Frequency ratio the module is ramping to.
    pub fn ratio(&self) -> f32 {
        self.ratio.target()
    }

    /// Phase applied at note-on, in turns.
    pub fn start_phase(&self) -> f32 {
        self.phase
    }

    /// Phase-modulation smoother corner in Hz.
    pub fn chirp(&self) -> f32 {
        self.chirp
    }
}

#[derive(Debug, Clone)]
struct VoiceModules {
    osc: [Oscillator; 2],
    self_mix: [f32; 2],
    cross_mix: [f32; 2],
}

/// Tone generator for `N` voices.
///
/// # Example
///
/// ```rust
/// use sinefold_synth::{ModuleId, ModuleParam, Soundgenerator, VoiceOutput, VoiceTable};
///
/// let mut table: VoiceTable<4> = VoiceTable::new(48000.0);
/// let mut generator: Soundgenerator<4> = Soundgenerator::new(48000.0);
/// generator.set_param(ModuleId::B, ModuleParam::Pitch, 7.0);
/// generator.set_param(ModuleId::A, ModuleParam::PmCross, 0.3);
///
/// table.assign(0, 57, 100);
/// generator.note_on(0, &table);
///
/// let mut out = [VoiceOutput::default(); 4];
/// generator.tick(&mut out);
/// ```
#[derive(Debug, Clone)]
pub struct Soundgenerator<const N: usize> {
    modules: [ModuleSettings; 2],
    ring: RampedParameter,
    voices: [VoiceModules; N],
}

impl<const N: usize> Soundgenerator<N> {
    /// Create the generator; every oscillator gets its own random seed.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            modules: [
                ModuleSettings::new(sample_rate),
                ModuleSettings::new(sample_rate),
            ],
            ring: RampedParameter::new(sample_rate, 0.0),
            voices: core::array::from_fn(|slot| VoiceModules {
                osc: core::array::from_fn(|m| Oscillator::new(sample_rate, seed_for(slot, m))),
                self_mix: [0.0; 2],
                cross_mix: [0.0; 2],
            }),
        }
    }

    /// Apply a module parameter in natural units.
    pub fn set_param(&mut self, module: ModuleId, param: ModuleParam, value: f32) {
        let m = module.index();
        let settings = &mut self.modules[m];
        match param {
            ModuleParam::Pitch => settings.ratio.init_ramp(semitones_to_ratio(
                value.clamp(-MAX_PITCH_OFFSET, MAX_PITCH_OFFSET),
            )),
            ModuleParam::Phase => settings.phase = value.clamp(-0.5, 0.5),
            ModuleParam::Fluct => settings.fluct.init_ramp(value.clamp(0.0, 1.0)),
            ModuleParam::Chirp => {
                for voice in &mut self.voices {
                    voice.osc[m].set_chirp_cutoff(value);
                }
                if let Some(voice) = self.voices.first() {
                    settings.chirp = voice.osc[m].chirp_cutoff();
                }
            }
            ModuleParam::Drive => settings.shaper.set_drive_db(value),
            ModuleParam::Fold => settings.shaper.set_fold(value),
            ModuleParam::Asym => settings.shaper.set_asym(value),
            ModuleParam::PmSelf => settings.pm_self.init_ramp(value.clamp(-1.0, 1.0)),
            ModuleParam::PmCross => settings.pm_cross.init_ramp(value.clamp(-1.0, 1.0)),
            ModuleParam::PmSelfShaper => {
                settings.pm_self_shaper.init_ramp(value.clamp(-1.0, 1.0));
            }
            ModuleParam::PmCrossShaper => {
                settings.pm_cross_shaper.init_ramp(value.clamp(-1.0, 1.0));
            }
            ModuleParam::Mix => settings.mix.init_ramp(value.clamp(-1.0, 1.0)),
        }
    }

    /// Set ring modulation, clamped to `[0, 1]`.
    pub fn set_ring(&mut self, ring: f32) {
        self.ring.init_ramp(ring.clamp(0.0, 1.0));
    }

    /// Settings of one module.
    pub fn module(&self, module: ModuleId) -> &ModuleSettings {
        &self.modules[module.index()]
    }

    /// Retune `slot` to its pitch in `table` and restart both phases.
    pub fn note_on(&mut self, slot: usize, table: &VoiceTable<N>) {
        let freq = midi_to_freq(f32::from(table.pitch(slot)));
        let voice = &mut self.voices[slot];
        for (osc, settings) in voice.osc.iter_mut().zip(&self.modules) {
            osc.set_frequency(freq);
            osc.reset_phase(settings.phase);
        }
    }

    /// Produce one sample for every voice into `out[slot].a` / `.b`.
    #[inline]
    pub fn tick(&mut self, out: &mut [VoiceOutput; N]) {
        for settings in &mut self.modules {
            settings.advance();
        }
        let ring = self.ring.advance();
        let [a, b] = &self.modules;

        for (voice, out) in self.voices.iter_mut().zip(out.iter_mut()) {
            let pm_a = voice.self_mix[0] * a.pm_self.get() + voice.cross_mix[1] * a.pm_cross.get();
            let pm_b = voice.self_mix[1] * b.pm_self.get() + voice.cross_mix[0] * b.pm_cross.get();

            let (out_a, self_a, cross_a) = a.run(&mut voice.osc[0], pm_a);
            let (out_b, self_b, cross_b) = b.run(&mut voice.osc[1], pm_b);
            voice.self_mix = [self_a, self_b];
            voice.cross_mix = [cross_a, cross_b];

            let product = out_a * out_b;
            out.a = unipolar_crossfade(out_a, product, ring);
            out.b = unipolar_crossfade(out_b, product, ring);
        }
    }
}

fn seed_for(slot: usize, module: usize) -> u32 {
    (slot as u32)
        .wrapping_mul(2)
        .wrapping_add(module as u32)
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(1)
}
