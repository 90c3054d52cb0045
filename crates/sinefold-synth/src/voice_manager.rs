//! The complete engine: voice pool, per-voice stages and the stereo bus.
//!
//! ```text
//! note on/off ─→ VoiceAllocator ─→ VoiceTable (pitch, velocity ramp)
//!                                        │
//!  every sample, all N slots:            ▼
//!  Soundgenerator ─→ CombBank ─→ Outputmixer ─→ BusFilter ─→ Cabinet ─→ Echo ─→ (L, R)
//! ```
//!
//! Released voices keep running at zero velocity, so comb tails and the
//! velocity ramp finish naturally and a reused slot never starts from stale
//! filter state.

use crate::allocator::{DEFAULT_VOICES, VoiceAllocator};
use crate::comb_bank::CombBank;
use crate::control::{
    CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF, ControlKind, ControlMap, ControlMessage, SampleSpecs,
};
use crate::outputmixer::Outputmixer;
use crate::params::{
    CabinetParam, EchoParam, FilterParam, GeneratorParam, ParamId, ParamScale,
};
use crate::soundgenerator::{Soundgenerator, VoiceOutput};
use crate::voice_table::VoiceTable;
use sinefold_core::{Effect, FilterType, sanitize_sample_rate};
use sinefold_effects::{BusFilter, Cabinet, Echo};

/// Polyphonic engine with `N` fixed voices.
///
/// # Example
///
/// ```rust
/// use sinefold_synth::{ControlMap, ControlMessage, SampleSpecs, VoiceManager};
///
/// let mut synth: VoiceManager = VoiceManager::new(SampleSpecs::default(), ControlMap::new());
/// synth.handle_message(ControlMessage::note_on(0, 69, 100));
///
/// let mut buffer = vec![0.0; 512];
/// synth.process_interleaved(&mut buffer, 2);
/// assert!(buffer.iter().any(|s| *s != 0.0));
///
/// synth.note_off(69);
/// assert_eq!(synth.released_count(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct VoiceManager<const N: usize = DEFAULT_VOICES> {
    specs: SampleSpecs,
    allocator: VoiceAllocator<N>,
    table: VoiceTable<N>,
    generator: Soundgenerator<N>,
    combs: CombBank<N>,
    mixer: Outputmixer,
    filter: BusFilter,
    cabinet: Cabinet,
    echo: Echo,
    control_map: ControlMap,
    outputs: [VoiceOutput; N],
}

impl<const N: usize> VoiceManager<N> {
    /// Build the engine for a stream. All buffers are allocated here.
    ///
    /// A sample rate of zero falls back to 48 kHz for every stage, and
    /// [`specs`](Self::specs) reports the rate actually used.
    pub fn new(mut specs: SampleSpecs, control_map: ControlMap) -> Self {
        let sample_rate = sanitize_sample_rate(specs.sample_rate as f32);
        specs.sample_rate = sample_rate as u32;
        Self {
            specs,
            allocator: VoiceAllocator::new(),
            table: VoiceTable::new(sample_rate),
            generator: Soundgenerator::new(sample_rate),
            combs: CombBank::new(sample_rate),
            mixer: Outputmixer::new(sample_rate),
            filter: BusFilter::new(sample_rate),
            cabinet: Cabinet::new(sample_rate),
            echo: Echo::new(sample_rate),
            control_map,
            outputs: [VoiceOutput::default(); N],
        }
    }

    /// Stream properties the engine was built for.
    pub fn specs(&self) -> SampleSpecs {
        self.specs
    }

    /// Number of voice slots.
    pub fn voice_count(&self) -> usize {
        N
    }

    /// Slots currently holding a pressed key.
    pub fn assigned_count(&self) -> usize {
        self.allocator.assigned_count()
    }

    /// Slots available without stealing.
    pub fn released_count(&self) -> usize {
        self.allocator.released_count()
    }

    /// Allocation state.
    pub fn allocator(&self) -> &VoiceAllocator<N> {
        &self.allocator
    }

    /// Per-slot pitch and velocity.
    pub fn voice_table(&self) -> &VoiceTable<N> {
        &self.table
    }

    /// Active controller map.
    pub fn control_map(&self) -> &ControlMap {
        &self.control_map
    }

    /// Replace the controller map.
    pub fn set_control_map(&mut self, map: ControlMap) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            bindings = map.len(),
            channel = ?map.channel(),
            "control map installed"
        );
        self.control_map = map;
    }

    /// Start a note. Velocity 0 releases the note instead.
    pub fn note_on(&mut self, pitch: u8, velocity: u8) {
        if velocity == 0 {
            self.note_off(pitch);
            return;
        }
        let pitch = pitch.min(127);
        let allocation = self.allocator.note_on(pitch);
        let slot = allocation.slot;

        #[cfg(feature = "tracing")]
        if let Some(stolen) = allocation.stolen {
            tracing::debug!(slot, stolen, pitch, "voice stolen");
        }

        self.table.assign(slot, pitch, velocity);
        self.generator.note_on(slot, &self.table);
        self.combs.note_on(slot, &self.table);
    }

    /// Release the first slot playing `pitch`; no-op if none does.
    pub fn note_off(&mut self, pitch: u8) {
        if let Some(slot) = self.allocator.note_off(pitch) {
            self.table.release(slot);
        }
    }

    /// Release every sounding note.
    pub fn all_notes_off(&mut self) {
        self.allocator.release_all();
        self.table.release_all();
    }

    /// Set a parameter in its natural unit (Hz, dB, seconds, amount).
    pub fn set_param(&mut self, id: ParamId, value: f32) {
        match id {
            ParamId::Module(module, param) => self.generator.set_param(module, param, value),
            ParamId::Generator(GeneratorParam::Ring) => self.generator.set_ring(value),
            ParamId::Comb(param) => self.combs.set_param(param, value),
            ParamId::Mixer(param) => self.mixer.set_param(param, value),
            ParamId::Filter(param) => self.set_filter_param(param, value),
            ParamId::Cabinet(param) => self.set_cabinet_param(param, value),
            ParamId::Echo(param) => self.set_echo_param(param, value),
        }
    }

    /// Set a parameter from a raw 7-bit controller value.
    pub fn apply_midi_value(&mut self, id: ParamId, value: u8) {
        match id.scale() {
            ParamScale::FilterCycle => {
                if value > 0 {
                    self.filter.cycle_type();
                }
            }
            scale => self.set_param(id, scale.apply(value)),
        }
    }

    /// Dispatch one control message.
    ///
    /// Messages on channels the map filters out are dropped. CC 120 and
    /// CC 123 release all notes whatever the map says.
    pub fn handle_message(&mut self, message: ControlMessage) {
        if !self.control_map.accepts(message.channel()) {
            return;
        }
        match message.kind() {
            ControlKind::NoteOn { pitch, velocity } => self.note_on(pitch, velocity),
            ControlKind::NoteOff { pitch } => self.note_off(pitch),
            ControlKind::ControlChange {
                controller: CC_ALL_NOTES_OFF | CC_ALL_SOUND_OFF,
                ..
            } => self.all_notes_off(),
            ControlKind::ControlChange { controller, value } => {
                if let Some(id) = self.control_map.lookup(controller) {
                    self.apply_midi_value(id, value);
                }
            }
            ControlKind::Other => {}
        }
    }

    /// Compute one stereo frame.
    #[inline]
    pub fn tick(&mut self) -> (f32, f32) {
        self.table.advance();
        self.generator.tick(&mut self.outputs);
        self.combs.process(&self.table, &mut self.outputs);
        let (l, r) = self.mixer.mix(&self.table, &self.outputs);
        let (l, r) = self.filter.process_stereo(l, r);
        let (l, r) = self.cabinet.process_stereo(l, r);
        self.echo.process_stereo(l, r)
    }

    /// Fill an interleaved buffer of `channels` channels.
    ///
    /// Mono receives the average of left and right; channels beyond the
    /// second are silent. A trailing partial frame is left untouched.
    pub fn process_interleaved(&mut self, buffer: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in buffer.chunks_exact_mut(channels) {
            let (l, r) = self.tick();
            match frame {
                [mono] => *mono = 0.5 * (l + r),
                [left, right, rest @ ..] => {
                    *left = l;
                    *right = r;
                    rest.fill(0.0);
                }
                [] => {}
            }
        }
    }

    /// Release all notes and clear every delay line and filter history.
    pub fn reset(&mut self) {
        self.all_notes_off();
        self.combs.reset();
        self.mixer.reset();
        self.filter.reset();
        self.cabinet.reset();
        self.echo.reset();
    }

    /// Current bus filter response.
    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }

    fn set_filter_param(&mut self, param: FilterParam, value: f32) {
        match param {
            FilterParam::Cutoff => self.filter.set_cutoff(value),
            FilterParam::Resonance => self.filter.set_resonance(value),
            FilterParam::Shelf => self.filter.set_shelf_amount(value),
            FilterParam::Type => {
                let index = value.max(0.0) as usize % FilterType::ALL.len();
                self.filter.set_type(FilterType::ALL[index]);
            }
        }
    }

    fn set_cabinet_param(&mut self, param: CabinetParam, value: f32) {
        let cab = &mut self.cabinet;
        match param {
            CabinetParam::Drive => cab.set_drive_db(value),
            CabinetParam::LoCut => cab.set_lo_cut(value),
            CabinetParam::HiCut => cab.set_hi_cut(value),
            CabinetParam::Tilt => cab.set_tilt_db(value),
            CabinetParam::Fold => cab.set_fold(value),
            CabinetParam::Asym => cab.set_asym(value),
            CabinetParam::Level => cab.set_level_db(value),
            CabinetParam::Mix => cab.set_mix(value),
        }
    }

    fn set_echo_param(&mut self, param: EchoParam, value: f32) {
        let echo = &mut self.echo;
        match param {
            EchoParam::Time => echo.set_time(value),
            EchoParam::Feedback => echo.set_feedback(value),
            EchoParam::Cross => echo.set_cross(value),
            EchoParam::Spread => echo.set_spread(value),
            EchoParam::HiCut => echo.set_hicut(value),
            EchoParam::Mix => echo.set_mix(value),
        }
    }
}
