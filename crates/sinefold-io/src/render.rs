//! Offline rendering of timed control messages.

use sinefold_synth::{ControlMessage, VoiceManager};

use crate::wav::StereoSamples;

/// A control message due at a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedMessage {
    /// Frame index at which the message is applied.
    pub frame: usize,
    /// The message.
    pub message: ControlMessage,
}

impl TimedMessage {
    /// Create a timed message.
    pub fn new(frame: usize, message: ControlMessage) -> Self {
        Self { frame, message }
    }
}

/// Render `frames` stereo frames, applying each message before the frame it
/// is due on.
///
/// Messages are applied in frame order; messages sharing a frame keep their
/// order in `events`. Messages at or past `frames` are ignored.
pub fn render<const N: usize>(
    synth: &mut VoiceManager<N>,
    events: &[TimedMessage],
    frames: usize,
) -> StereoSamples {
    let mut order: Vec<&TimedMessage> = events.iter().filter(|e| e.frame < frames).collect();
    order.sort_by_key(|e| e.frame);
    let mut pending = order.into_iter().peekable();

    let mut out = StereoSamples::silence(frames);
    for (i, (left, right)) in out.left.iter_mut().zip(out.right.iter_mut()).enumerate() {
        while let Some(event) = pending.next_if(|e| e.frame == i) {
            synth.handle_message(event.message);
        }
        (*left, *right) = synth.tick();
    }

    tracing::debug!(frames, events = events.len(), "render finished");
    out
}
