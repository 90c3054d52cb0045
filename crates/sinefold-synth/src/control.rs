//! Control input: decoded MIDI messages, controller maps and stream specs.
//!
//! The engine consumes `(status, data1, data2)` triples. Note messages drive
//! the voice allocator; control changes are looked up in a [`ControlMap`]
//! and scaled onto a parameter. Everything else is ignored.
//!
//! ```rust
//! use sinefold_synth::{ControlKind, ControlMessage};
//!
//! let msg = ControlMessage::from_bytes(&[0x90, 69, 100]).unwrap();
//! assert_eq!(msg.kind(), ControlKind::NoteOn { pitch: 69, velocity: 100 });
//!
//! // Note-on with velocity 0 is a note-off.
//! let msg = ControlMessage::from_bytes(&[0x90, 69, 0]).unwrap();
//! assert_eq!(msg.kind(), ControlKind::NoteOff { pitch: 69 });
//! ```

use crate::params::ParamId;

/// MIDI controller "All Sound Off".
pub const CC_ALL_SOUND_OFF: u8 = 120;
/// MIDI controller "All Notes Off".
pub const CC_ALL_NOTES_OFF: u8 = 123;

/// Audio stream properties, fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpecs {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved output channels.
    pub channels: u16,
    /// Frames per audio callback.
    pub frames_per_period: u32,
}

impl SampleSpecs {
    /// Stereo stream at `sample_rate` with the given period size.
    pub fn stereo(sample_rate: u32, frames_per_period: u32) -> Self {
        Self {
            sample_rate,
            channels: 2,
            frames_per_period,
        }
    }
}

impl Default for SampleSpecs {
    fn default() -> Self {
        Self::stereo(48000, 256)
    }
}

/// A raw 3-byte control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMessage {
    /// Status byte (message type in the high nibble, channel in the low).
    pub status: u8,
    /// First data byte.
    pub data1: u8,
    /// Second data byte.
    pub data2: u8,
}

/// Decoded meaning of a [`ControlMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Key pressed with a non-zero velocity.
    NoteOn {
        /// MIDI note number.
        pitch: u8,
        /// Velocity 1–127.
        velocity: u8,
    },
    /// Key released (also a note-on with velocity 0).
    NoteOff {
        /// MIDI note number.
        pitch: u8,
    },
    /// Continuous controller.
    ControlChange {
        /// Controller number 0–127.
        controller: u8,
        /// Value 0–127.
        value: u8,
    },
    /// Anything the engine does not handle.
    Other,
}

impl ControlMessage {
    /// Build from raw bytes, no validation.
    pub const fn new(status: u8, data1: u8, data2: u8) -> Self {
        Self {
            status,
            data1,
            data2,
        }
    }

    /// Note-on on `channel` (0–15).
    pub const fn note_on(channel: u8, pitch: u8, velocity: u8) -> Self {
        Self::new(0x90 | (channel & 0x0F), pitch & 0x7F, velocity & 0x7F)
    }

    /// Note-off on `channel` (0–15).
    pub const fn note_off(channel: u8, pitch: u8) -> Self {
        Self::new(0x80 | (channel & 0x0F), pitch & 0x7F, 0)
    }

    /// Control change on `channel` (0–15).
    pub const fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self::new(0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F)
    }

    /// Decode a raw MIDI packet.
    ///
    /// Returns `None` when the first byte is not a status byte. Missing data
    /// bytes read as 0, so one- and two-byte messages decode too.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, rest) = bytes.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }
        let data1 = rest.first().copied().unwrap_or(0) & 0x7F;
        let data2 = rest.get(1).copied().unwrap_or(0) & 0x7F;
        Some(Self::new(status, data1, data2))
    }

    /// MIDI channel 0–15.
    pub fn channel(&self) -> u8 {
        self.status & 0x0F
    }

    /// Decode the message type.
    pub fn kind(&self) -> ControlKind {
        match self.status & 0xF0 {
            0x90 if self.data2 > 0 => ControlKind::NoteOn {
                pitch: self.data1,
                velocity: self.data2,
            },
            0x90 | 0x80 => ControlKind::NoteOff { pitch: self.data1 },
            0xB0 => ControlKind::ControlChange {
                controller: self.data1,
                value: self.data2,
            },
            _ => ControlKind::Other,
        }
    }
}

/// Controller-number to parameter table.
///
/// Holds one slot per CC number and an optional channel filter. Built from a
/// layout file by `sinefold-config`, or by hand:
///
/// ```rust
/// use sinefold_synth::{ControlMap, EchoParam, ParamId};
///
/// let mut map = ControlMap::new();
/// map.bind(14, ParamId::Echo(EchoParam::Mix));
/// map.set_channel(Some(0));
/// assert_eq!(map.lookup(14), Some(ParamId::Echo(EchoParam::Mix)));
/// assert!(map.accepts(0));
/// assert!(!map.accepts(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMap {
    slots: [Option<ParamId>; 128],
    channel: Option<u8>,
}

impl ControlMap {
    /// Empty map listening on every channel.
    pub fn new() -> Self {
        Self {
            slots: [None; 128],
            channel: None,
        }
    }

    /// Route controller `cc` to `param`, replacing any previous binding.
    ///
    /// Numbers above 127 are ignored.
    pub fn bind(&mut self, cc: u8, param: ParamId) {
        if let Some(slot) = self.slots.get_mut(usize::from(cc)) {
            *slot = Some(param);
        }
    }

    /// Remove the binding of `cc`.
    pub fn unbind(&mut self, cc: u8) {
        if let Some(slot) = self.slots.get_mut(usize::from(cc)) {
            *slot = None;
        }
    }

    /// Parameter bound to `cc`.
    pub fn lookup(&self, cc: u8) -> Option<ParamId> {
        self.slots.get(usize::from(cc)).copied().flatten()
    }

    /// Restrict input to one channel (0–15), or `None` for all channels.
    pub fn set_channel(&mut self, channel: Option<u8>) {
        self.channel = channel.map(|c| c & 0x0F);
    }

    /// Channel filter.
    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    /// Whether messages on `channel` pass the filter.
    pub fn accepts(&self, channel: u8) -> bool {
        self.channel.is_none_or(|c| c == channel)
    }

    /// All bindings in CC order.
    pub fn bindings(&self) -> impl Iterator<Item = (u8, ParamId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(cc, p)| p.map(|p| (cc as u8, p)))
    }

    /// Number of bound controllers.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|p| p.is_some()).count()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ControlMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FilterParam, MixerParam};

    #[test]
    fn test_decode_note_messages() {
        let on = ControlMessage::from_bytes(&[0x93, 60, 90]).unwrap();
        assert_eq!(on.channel(), 3);
        assert_eq!(
            on.kind(),
            ControlKind::NoteOn {
                pitch: 60,
                velocity: 90
            }
        );
        let off = ControlMessage::from_bytes(&[0x83, 60, 64]).unwrap();
        assert_eq!(off.kind(), ControlKind::NoteOff { pitch: 60 });
    }

    #[test]
    fn test_decode_control_change() {
        let cc = ControlMessage::from_bytes(&[0xB0, 74, 127]).unwrap();
        assert_eq!(
            cc.kind(),
            ControlKind::ControlChange {
                controller: 74,
                value: 127
            }
        );
    }

    #[test]
    fn test_other_messages_are_ignored() {
        // pitch bend, program change, clock
        for bytes in [&[0xE0, 0, 64][..], &[0xC0, 5][..], &[0xF8][..]] {
            let msg = ControlMessage::from_bytes(bytes).unwrap();
            assert_eq!(msg.kind(), ControlKind::Other);
        }
    }

    #[test]
    fn test_data_bytes_are_not_status() {
        assert_eq!(ControlMessage::from_bytes(&[]), None);
        assert_eq!(ControlMessage::from_bytes(&[0x40, 1, 2]), None);
    }

    #[test]
    fn test_constructors_match_decoding() {
        assert_eq!(
            ControlMessage::note_on(2, 64, 10),
            ControlMessage::from_bytes(&[0x92, 64, 10]).unwrap()
        );
        assert_eq!(
            ControlMessage::control_change(15, 7, 100).status,
            0xBF
        );
        assert_eq!(
            ControlMessage::note_off(0, 64).kind(),
            ControlKind::NoteOff { pitch: 64 }
        );
    }

    #[test]
    fn test_map_binds_and_unbinds() {
        let mut map = ControlMap::new();
        assert!(map.is_empty());
        map.bind(7, ParamId::Mixer(MixerParam::Level));
        map.bind(74, ParamId::Filter(FilterParam::Cutoff));
        map.bind(7, ParamId::Mixer(MixerParam::LevelA));
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup(7), Some(ParamId::Mixer(MixerParam::LevelA)));
        map.unbind(7);
        assert_eq!(map.lookup(7), None);
        assert_eq!(map.lookup(200), None);
        let bound: Vec<u8> = map.bindings().map(|(cc, _)| cc).collect();
        assert_eq!(bound, [74]);
    }

    #[test]
    fn test_channel_filter() {
        let mut map = ControlMap::new();
        assert!((0..16).all(|c| map.accepts(c)));
        map.set_channel(Some(9));
        assert!(map.accepts(9));
        assert!(!map.accepts(0));
    }
}
