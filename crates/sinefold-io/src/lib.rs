//! Audio, MIDI and file I/O for the sinefold synthesizer.
//!
//! This crate provides:
//!
//! - **WAV output**: [`write_wav_stereo`] and [`render`] for offline rendering
//! - **Real-time output**: [`AudioOutput`] over cpal
//! - **MIDI input**: [`MidiInput`] over midir
//! - **Control queue**: [`ControlQueue`] and [`RealtimeSynth`], the lock-free
//!   path from the MIDI thread into the audio callback
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sinefold_io::{AudioOutput, ControlQueue, MidiInput, OutputConfig, RealtimeSynth};
//! use sinefold_synth::{ControlMap, SampleSpecs, VoiceManager};
//!
//! let (sender, queue) = ControlQueue::new(1024);
//! let _midi = MidiInput::connect(None, sender)?;
//!
//! let synth: VoiceManager = VoiceManager::new(SampleSpecs::default(), ControlMap::new());
//! let mut rt = RealtimeSynth::new(synth, queue);
//! let _out = AudioOutput::start(&OutputConfig::default(), move |buf, ch| rt.process(buf, ch))?;
//! ```

mod midi;
mod realtime;
mod render;
mod stream;
mod wav;

pub use midi::{MidiInput, MidiPortInfo, decode, list_midi_ports};
pub use realtime::{ControlQueue, ControlSender, DEFAULT_QUEUE_CAPACITY, RealtimeSynth};
pub use render::{TimedMessage, render};
pub use stream::{AudioDevice, AudioOutput, OutputConfig, list_devices};
pub use wav::{StereoSamples, WavSpec, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// MIDI driver error.
    #[error("MIDI error: {0}")]
    Midi(String),

    /// No MIDI input port matched.
    #[error("MIDI port not found: {0}")]
    MidiPortNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
