//! Sinefold Synth - fixed-voice phase-modulation synthesizer engine
//!
//! This crate turns control messages into stereo audio. It owns the voice
//! pool and every per-voice stage, and runs the bus effects from
//! `sinefold-effects` after the mixer.
//!
//! # Signal Flow
//!
//! ```text
//! ControlMessage ─→ VoiceManager ─→ VoiceAllocator / VoiceTable
//!
//! per sample, all N voices:
//!   Soundgenerator (osc A/B + shapers, self/cross PM, ring)
//!     → CombBank (key-tracked comb per voice)
//!     → Outputmixer (level/pan/key-pan, bus shaper)
//!     → BusFilter → Cabinet → Echo → (left, right)
//! ```
//!
//! # Core Components
//!
//! ## Voices
//!
//! - [`VoiceManager`] - The engine: note handling, parameter routing, tick
//! - [`VoiceAllocator`] - Oldest-first slot reuse with stealing
//! - [`VoiceTable`] - Per-slot pitch and ramped velocity
//!
//! ## Tone
//!
//! - [`Oscillator`] - Phase-modulated sine with random drift
//! - [`Shaper`] - Ramped sine shaper settings per module
//! - [`Soundgenerator`] - Two cross-modulating modules per voice
//! - [`Outputmixer`] - Voice-to-stereo mixer with bus saturation
//! - [`CombBank`] - One comb filter per voice
//!
//! ## Control
//!
//! - [`ControlMessage`] / [`ControlKind`] - Raw and decoded MIDI messages
//! - [`ControlMap`] - CC number to parameter table
//! - [`ParamId`] / [`ParamScale`] - Parameter names and MIDI scaling
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! sinefold-synth = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to log voice steals and control map changes.
//!
//! # Example
//!
//! ```rust
//! use sinefold_synth::{ControlMap, EchoParam, ParamId, SampleSpecs, VoiceManager};
//!
//! let mut synth: VoiceManager<8> =
//!     VoiceManager::new(SampleSpecs::stereo(48000, 256), ControlMap::new());
//! synth.set_param(ParamId::Echo(EchoParam::Mix), 0.3);
//!
//! synth.note_on(60, 100);
//! synth.note_on(64, 100);
//! synth.note_on(67, 100);
//!
//! let mut buffer = vec![0.0; 2 * 256];
//! synth.process_interleaved(&mut buffer, 2);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod allocator;
pub mod comb_bank;
pub mod control;
pub mod oscillator;
pub mod outputmixer;
pub mod params;
pub mod shaper;
pub mod soundgenerator;
pub mod voice_manager;
pub mod voice_table;

// Re-export main types at crate root
pub use allocator::{Allocation, DEFAULT_VOICES, SlotState, Slots, VoiceAllocator};
pub use comb_bank::CombBank;
pub use control::{
    CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF, ControlKind, ControlMap, ControlMessage, SampleSpecs,
};
pub use oscillator::Oscillator;
pub use outputmixer::Outputmixer;
pub use params::{
    CabinetParam, CombParam, EchoParam, FilterParam, GeneratorParam, MixerParam, ModuleId,
    ModuleParam, ParamId, ParamScale,
};
pub use shaper::Shaper;
pub use soundgenerator::{ModuleSettings, Soundgenerator, VoiceOutput};
pub use voice_manager::VoiceManager;
pub use voice_table::VoiceTable;

// Re-export commonly used types from sinefold-core
pub use sinefold_core::{Effect, FilterType};
