//! Parameter identifiers and MIDI value scaling.
//!
//! Every controllable value in the engine has a [`ParamId`]. Ids are grouped
//! by the module that owns them and carry a dotted name (`osc_a.pitch`,
//! `cabinet.drive`, `echo.mix`) used by controller layouts and the CLI.
//!
//! [`ParamScale`] maps a raw 7-bit controller value onto the natural unit
//! of the parameter (Hz, dB, seconds, semitones, or a plain amount).
//!
//! ```rust
//! use sinefold_synth::{CabinetParam, ParamId};
//!
//! let id = ParamId::from_name("cabinet.drive").unwrap();
//! assert_eq!(id, ParamId::Cabinet(CabinetParam::Drive));
//! assert_eq!(id.to_string(), "cabinet.drive");
//! assert!((id.scale().apply(127) - 50.0).abs() < 1e-4);
//! ```

use core::fmt;
use libm::exp2f;

/// Mapping from a 7-bit controller value to a parameter's natural unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamScale {
    /// `20 · 2^(v/12.75)` Hz, 20 Hz to ~20 kHz.
    Cutoff,
    /// `(v − 64)/32`; the filters clamp to ±0.999.
    Resonance,
    /// `(v − 64) · 12/64` dB.
    Shelf,
    /// `v · 50/127` dB.
    Drive,
    /// `(v − 63.5) · 50/63.5` dB.
    Tilt,
    /// `v/127`.
    Unit,
    /// `(v − 64)/64`.
    Bipolar,
    /// `(v − 64) · 0.75` semitones.
    Semitones,
    /// `(v − 64)/128` turns.
    Phase,
    /// `(v/127)² · 0.1`.
    Fluctuation,
    /// `(v/127)² · 10` s.
    DecayTime,
    /// `(v/127)² · 2` s.
    DelayTime,
    /// `(v − 127) · 50/127` dB, 0 dB at full scale.
    Attenuation,
    /// `(v − 64)/64 · 0.33`.
    Spread,
    /// Button: any non-zero value steps the filter type.
    FilterCycle,
}

impl ParamScale {
    /// Scale a raw controller value.
    ///
    /// Values above 127 are treated as 127. For [`FilterCycle`](Self::FilterCycle)
    /// the raw value is returned unchanged.
    pub fn apply(self, value: u8) -> f32 {
        let v = f32::from(value.min(127));
        let unit = v / 127.0;
        match self {
            Self::Cutoff => 20.0 * exp2f(v / 12.75),
            Self::Resonance => (v - 64.0) / 32.0,
            Self::Shelf => (v - 64.0) * 12.0 / 64.0,
            Self::Drive => v * 50.0 / 127.0,
            Self::Tilt => (v - 63.5) * 50.0 / 63.5,
            Self::Unit => unit,
            Self::Bipolar => (v - 64.0) / 64.0,
            Self::Semitones => (v - 64.0) * 0.75,
            Self::Phase => (v - 64.0) / 128.0,
            Self::Fluctuation => unit * unit * 0.1,
            Self::DecayTime => unit * unit * 10.0,
            Self::DelayTime => unit * unit * 2.0,
            Self::Attenuation => (v - 127.0) * 50.0 / 127.0,
            Self::Spread => (v - 64.0) / 64.0 * 0.33,
            Self::FilterCycle => v,
        }
    }
}

/// Declares one group of parameters: the enum, its `ALL` table, and the
/// name and scale lookups.
macro_rules! param_group {
    (
        $(#[$meta:meta])*
        $group:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $name:literal : $scale:ident, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $group {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $group {
            /// Every parameter of the group, in display order.
            pub const ALL: &'static [$group] = &[ $( $group::$variant, )+ ];

            /// Name within the group (the part after the dot).
            pub fn name(self) -> &'static str {
                match self {
                    $( $group::$variant => $name, )+
                }
            }

            /// Controller scaling.
            pub fn scale(self) -> ParamScale {
                match self {
                    $( $group::$variant => ParamScale::$scale, )+
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|p| p.name() == name)
            }
        }
    };
}

/// One of the two oscillator/shaper modules of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleId {
    /// Module A.
    A,
    /// Module B.
    B,
}

impl ModuleId {
    /// Both modules.
    pub const ALL: [ModuleId; 2] = [ModuleId::A, ModuleId::B];

    /// Name prefix (`osc_a` / `osc_b`).
    pub fn prefix(self) -> &'static str {
        match self {
            ModuleId::A => "osc_a",
            ModuleId::B => "osc_b",
        }
    }

    /// Array index (A = 0, B = 1).
    pub fn index(self) -> usize {
        match self {
            ModuleId::A => 0,
            ModuleId::B => 1,
        }
    }
}

param_group! {
    /// Per-module oscillator and shaper settings, shared by all voices.
    ModuleParam {
        /// Pitch offset in semitones.
        Pitch => "pitch": Semitones,
        /// Phase the oscillator restarts from at note-on, in turns.
        Phase => "phase": Phase,
        /// Random frequency fluctuation depth.
        Fluct => "fluct": Fluctuation,
        /// Corner of the lowpass on the phase-modulation input.
        Chirp => "chirp": Cutoff,
        /// Shaper drive in dB.
        Drive => "drive": Drive,
        /// Shaper fold amount.
        Fold => "fold": Unit,
        /// Shaper asymmetry.
        Asym => "asym": Unit,
        /// Self phase-modulation amount.
        PmSelf => "pm_self": Bipolar,
        /// Cross phase-modulation amount (from the other module).
        PmCross => "pm_cross": Bipolar,
        /// Oscillator/shaper blend of the self-modulation signal.
        PmSelfShaper => "pm_self_shaper": Bipolar,
        /// Oscillator/shaper blend of the cross-modulation signal.
        PmCrossShaper => "pm_cross_shaper": Bipolar,
        /// Oscillator/shaper blend of the module output.
        Mix => "mix": Bipolar,
    }
}

param_group! {
    /// Settings that combine the two modules.
    GeneratorParam {
        /// Ring modulation amount.
        Ring => "ring": Unit,
    }
}

param_group! {
    /// Per-voice comb filter settings.
    CombParam {
        /// Input blend from module A (0) to module B (1).
        AbMix => "ab_mix": Unit,
        /// Key tracking amount.
        KeyTrack => "key_track": Unit,
        /// Tuning offset in semitones.
        Pitch => "pitch": Semitones,
        /// Decay time (RT60) in seconds.
        Decay => "decay": DecayTime,
        /// Allpass center offset in semitones.
        AllpassTune => "allpass_tune": Semitones,
        /// Allpass resonance.
        AllpassResonance => "allpass_resonance": Resonance,
        /// Damping lowpass corner in Hz.
        HiCut => "hicut": Cutoff,
    }
}

param_group! {
    /// Voice-to-bus mixer settings.
    MixerParam {
        /// Module A level.
        LevelA => "level_a": Unit,
        /// Module B level.
        LevelB => "level_b": Unit,
        /// Comb level.
        LevelComb => "level_comb": Unit,
        /// Module A pan.
        PanA => "pan_a": Bipolar,
        /// Module B pan.
        PanB => "pan_b": Bipolar,
        /// Comb pan.
        PanComb => "pan_comb": Bipolar,
        /// Pan spread across the keyboard around middle C.
        KeyPan => "key_pan": Bipolar,
        /// Bus shaper drive in dB.
        Drive => "drive": Drive,
        /// Bus shaper fold.
        Fold => "fold": Unit,
        /// Bus shaper asymmetry.
        Asym => "asym": Unit,
        /// Master level.
        Level => "level": Unit,
    }
}

param_group! {
    /// Bus filter settings.
    FilterParam {
        /// Cutoff or shelf corner in Hz.
        Cutoff => "cutoff": Cutoff,
        /// Resonance.
        Resonance => "resonance": Resonance,
        /// Shelf gain in dB.
        Shelf => "shelf": Shelf,
        /// Response type.
        Type => "type": FilterCycle,
    }
}

param_group! {
    /// Cabinet settings.
    CabinetParam {
        /// Drive in dB.
        Drive => "drive": Drive,
        /// High-pass corner in Hz.
        LoCut => "locut": Cutoff,
        /// Lowpass corner in Hz.
        HiCut => "hicut": Cutoff,
        /// Tilt bracket in dB.
        Tilt => "tilt": Tilt,
        /// Fold amount.
        Fold => "fold": Unit,
        /// Asymmetry.
        Asym => "asym": Unit,
        /// Wet level in dB.
        Level => "level": Attenuation,
        /// Dry/wet mix.
        Mix => "mix": Unit,
    }
}

param_group! {
    /// Echo settings.
    EchoParam {
        /// Base delay time in seconds.
        Time => "time": DelayTime,
        /// Feedback amount.
        Feedback => "feedback": Unit,
        /// Share of feedback crossing channels.
        Cross => "cross": Unit,
        /// Stereo time spread.
        Spread => "spread": Spread,
        /// Lowpass on the repeats in Hz.
        HiCut => "hicut": Cutoff,
        /// Dry/wet mix.
        Mix => "mix": Unit,
    }
}

/// Identifier of one engine parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Oscillator/shaper module parameter.
    Module(ModuleId, ModuleParam),
    /// Module combination parameter.
    Generator(GeneratorParam),
    /// Comb filter parameter.
    Comb(CombParam),
    /// Mixer parameter.
    Mixer(MixerParam),
    /// Bus filter parameter.
    Filter(FilterParam),
    /// Cabinet parameter.
    Cabinet(CabinetParam),
    /// Echo parameter.
    Echo(EchoParam),
}

impl ParamId {
    /// Group prefix, the part before the dot.
    pub fn prefix(self) -> &'static str {
        match self {
            ParamId::Module(m, _) => m.prefix(),
            ParamId::Generator(_) => "gen",
            ParamId::Comb(_) => "comb",
            ParamId::Mixer(_) => "mixer",
            ParamId::Filter(_) => "filter",
            ParamId::Cabinet(_) => "cabinet",
            ParamId::Echo(_) => "echo",
        }
    }

    /// Name within the group, the part after the dot.
    pub fn suffix(self) -> &'static str {
        match self {
            ParamId::Module(_, p) => p.name(),
            ParamId::Generator(p) => p.name(),
            ParamId::Comb(p) => p.name(),
            ParamId::Mixer(p) => p.name(),
            ParamId::Filter(p) => p.name(),
            ParamId::Cabinet(p) => p.name(),
            ParamId::Echo(p) => p.name(),
        }
    }

    /// Controller scaling for this parameter.
    pub fn scale(self) -> ParamScale {
        match self {
            ParamId::Module(_, p) => p.scale(),
            ParamId::Generator(p) => p.scale(),
            ParamId::Comb(p) => p.scale(),
            ParamId::Mixer(p) => p.scale(),
            ParamId::Filter(p) => p.scale(),
            ParamId::Cabinet(p) => p.scale(),
            ParamId::Echo(p) => p.scale(),
        }
    }

    /// Parse a dotted name such as `"echo.time"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let (prefix, suffix) = name.split_once('.')?;
        match prefix {
            "osc_a" => ModuleParam::from_name(suffix).map(|p| ParamId::Module(ModuleId::A, p)),
            "osc_b" => ModuleParam::from_name(suffix).map(|p| ParamId::Module(ModuleId::B, p)),
            "gen" => GeneratorParam::from_name(suffix).map(ParamId::Generator),
            "comb" => CombParam::from_name(suffix).map(ParamId::Comb),
            "mixer" => MixerParam::from_name(suffix).map(ParamId::Mixer),
            "filter" => FilterParam::from_name(suffix).map(ParamId::Filter),
            "cabinet" => CabinetParam::from_name(suffix).map(ParamId::Cabinet),
            "echo" => EchoParam::from_name(suffix).map(ParamId::Echo),
            _ => None,
        }
    }

    /// Every parameter, grouped in signal-flow order.
    pub fn all() -> impl Iterator<Item = ParamId> {
        ModuleId::ALL
            .into_iter()
            .flat_map(|m| ModuleParam::ALL.iter().map(move |&p| ParamId::Module(m, p)))
            .chain(GeneratorParam::ALL.iter().map(|&p| ParamId::Generator(p)))
            .chain(CombParam::ALL.iter().map(|&p| ParamId::Comb(p)))
            .chain(MixerParam::ALL.iter().map(|&p| ParamId::Mixer(p)))
            .chain(FilterParam::ALL.iter().map(|&p| ParamId::Filter(p)))
            .chain(CabinetParam::ALL.iter().map(|&p| ParamId::Cabinet(p)))
            .chain(EchoParam::ALL.iter().map(|&p| ParamId::Echo(p)))
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.prefix(), self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        let mut count = 0;
        for id in ParamId::all() {
            let name = id.to_string();
            assert_eq!(ParamId::from_name(&name), Some(id), "{name}");
            count += 1;
        }
        assert_eq!(count, 24 + 1 + 7 + 11 + 4 + 8 + 6);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(ParamId::from_name("osc_c.pitch"), None);
        assert_eq!(ParamId::from_name("echo.depth"), None);
        assert_eq!(ParamId::from_name("echo"), None);
        assert_eq!(ParamId::from_name(""), None);
    }

    #[test]
    fn test_cutoff_scale_spans_audio_range() {
        assert_eq!(ParamScale::Cutoff.apply(0), 20.0);
        let top = ParamScale::Cutoff.apply(127);
        assert!(top > 19000.0 && top < 20500.0, "{top}");
        // one octave per 12.75 steps
        let ratio = ParamScale::Cutoff.apply(51) / ParamScale::Cutoff.apply(0);
        assert!((ratio - 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_centered_scales_are_zero_at_64() {
        for scale in [
            ParamScale::Resonance,
            ParamScale::Shelf,
            ParamScale::Bipolar,
            ParamScale::Semitones,
            ParamScale::Phase,
            ParamScale::Spread,
        ] {
            assert_eq!(scale.apply(64), 0.0, "{scale:?}");
        }
        assert_eq!(ParamScale::Bipolar.apply(0), -1.0);
        assert_eq!(ParamScale::Semitones.apply(0), -48.0);
    }

    #[test]
    fn test_full_scale_values() {
        assert_eq!(ParamScale::Unit.apply(127), 1.0);
        assert!((ParamScale::Drive.apply(127) - 50.0).abs() < 1e-4);
        assert!((ParamScale::Tilt.apply(127) - 50.0).abs() < 1e-4);
        assert!((ParamScale::Tilt.apply(0) + 50.0).abs() < 1e-4);
        assert_eq!(ParamScale::Attenuation.apply(127), 0.0);
        assert!((ParamScale::Attenuation.apply(0) + 50.0).abs() < 1e-4);
        assert!((ParamScale::DecayTime.apply(127) - 10.0).abs() < 1e-4);
        assert!((ParamScale::DelayTime.apply(127) - 2.0).abs() < 1e-4);
        assert!((ParamScale::Fluctuation.apply(127) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_values_saturate() {
        assert_eq!(ParamScale::Unit.apply(200), 1.0);
        assert_eq!(ParamScale::FilterCycle.apply(255), 127.0);
    }
}
