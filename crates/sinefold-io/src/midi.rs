//! MIDI input via midir.
//!
//! The driver callback decodes raw bytes into [`ControlMessage`]s and pushes
//! them into a [`ControlSender`]. System messages (0xF0 and above) are
//! skipped; everything else goes to the engine, which ignores what it does
//! not understand.

use crate::realtime::ControlSender;
use crate::{Error, Result};
use midir::{Ignore, MidiInputConnection};
use sinefold_synth::ControlMessage;

const CLIENT_NAME: &str = "sinefold";

/// Information about a MIDI input port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortInfo {
    /// Port name as reported by the driver.
    pub name: String,
    /// Position in the port list.
    pub index: usize,
}

/// List available MIDI input ports.
pub fn list_midi_ports() -> Result<Vec<MidiPortInfo>> {
    let midi_in =
        midir::MidiInput::new(CLIENT_NAME).map_err(|e| Error::Midi(e.to_string()))?;

    Ok(midi_in
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(index, port)| {
            midi_in
                .port_name(port)
                .ok()
                .map(|name| MidiPortInfo { name, index })
        })
        .collect())
}

/// Decode one driver packet.
///
/// Returns `None` for empty packets, running-status data and system
/// messages.
pub fn decode(bytes: &[u8]) -> Option<ControlMessage> {
    match bytes.first() {
        Some(&status) if status >= 0xF0 => None,
        _ => ControlMessage::from_bytes(bytes),
    }
}

/// An open MIDI input connection feeding a control queue.
///
/// The connection closes when this value is dropped.
pub struct MidiInput {
    port_name: String,
    _connection: MidiInputConnection<ControlSender>,
}

impl MidiInput {
    /// Open the first port whose name contains `port` (case-insensitive),
    /// or the first port when `port` is `None`.
    pub fn connect(port: Option<&str>, sender: ControlSender) -> Result<Self> {
        let mut midi_in =
            midir::MidiInput::new(CLIENT_NAME).map_err(|e| Error::Midi(e.to_string()))?;
        midi_in.ignore(Ignore::All);

        let ports = midi_in.ports();
        let search = port.map(str::to_lowercase);
        let (midi_port, port_name) = ports
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok().map(|name| (p, name)))
            .find(|(_, name)| {
                search
                    .as_deref()
                    .is_none_or(|s| name.to_lowercase().contains(s))
            })
            .ok_or_else(|| Error::MidiPortNotFound(port.unwrap_or("<any>").to_string()))?;
        let midi_port = midi_port.clone();

        let connection = midi_in
            .connect(
                &midi_port,
                "sinefold-input",
                |_timestamp_us, bytes, sender| {
                    if let Some(message) = decode(bytes) {
                        sender.send(message);
                    }
                },
                sender,
            )
            .map_err(|e| Error::Midi(e.to_string()))?;

        tracing::info!(port = %port_name, "MIDI input connected");

        Ok(Self {
            port_name,
            _connection: connection,
        })
    }

    /// Name of the connected port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl std::fmt::Debug for MidiInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiInput")
            .field("port_name", &self.port_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinefold_synth::ControlKind;

    #[test]
    fn test_decodes_channel_messages() {
        let msg = decode(&[0x93, 60, 100]).unwrap();
        assert_eq!(msg.channel(), 3);
        assert_eq!(
            msg.kind(),
            ControlKind::NoteOn {
                pitch: 60,
                velocity: 100
            }
        );
        let msg = decode(&[0xB0, 7, 127]).unwrap();
        assert_eq!(
            msg.kind(),
            ControlKind::ControlChange {
                controller: 7,
                value: 127
            }
        );
    }

    #[test]
    fn test_skips_system_and_empty_packets() {
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0xF8]), None);
        assert_eq!(decode(&[0xF0, 0x7E, 0x7F, 0xF7]), None);
        // running status data without a status byte
        assert_eq!(decode(&[60, 100]), None);
    }

    #[test]
    fn test_listing_ports_does_not_panic() {
        // Availability depends on the system; only the call is checked.
        let _ = list_midi_ports();
    }
}
