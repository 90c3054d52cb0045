//! Lock-free control path into the audio callback.
//!
//! MIDI arrives on a driver thread; the engine runs in the audio callback.
//! A single-producer, single-consumer ring buffer carries messages across,
//! and the callback drains it completely before rendering each block, so
//! control messages take effect with at most one block of latency and the
//! audio thread never blocks or allocates.
//!
//! ```text
//! MIDI thread ─→ ControlSender ══rtrb══→ ControlQueue ─→ RealtimeSynth (audio thread)
//! ```

use rtrb::{Consumer, Producer, RingBuffer};
use sinefold_synth::{ControlMessage, VoiceManager};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default queue capacity in messages.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Producer half, owned by the MIDI thread.
#[derive(Debug)]
pub struct ControlSender {
    producer: Producer<ControlMessage>,
    dropped: Arc<AtomicUsize>,
}

impl ControlSender {
    /// Enqueue a message. Returns `false` and counts a drop when the queue
    /// is full.
    pub fn send(&mut self, message: ControlMessage) -> bool {
        if self.producer.push(message).is_ok() {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Messages dropped because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer half, owned by the audio thread.
#[derive(Debug)]
pub struct ControlQueue {
    consumer: Consumer<ControlMessage>,
    dropped: Arc<AtomicUsize>,
}

impl ControlQueue {
    /// Create a queue holding up to `capacity` messages.
    pub fn new(capacity: usize) -> (ControlSender, ControlQueue) {
        let (producer, consumer) = RingBuffer::new(capacity);
        let dropped = Arc::new(AtomicUsize::new(0));
        (
            ControlSender {
                producer,
                dropped: Arc::clone(&dropped),
            },
            ControlQueue { consumer, dropped },
        )
    }

    /// Pop every queued message in arrival order.
    pub fn drain(&mut self, mut f: impl FnMut(ControlMessage)) -> usize {
        let mut count = 0;
        while let Ok(message) = self.consumer.pop() {
            f(message);
            count += 1;
        }
        count
    }

    /// Messages waiting.
    pub fn len(&self) -> usize {
        self.consumer.slots()
    }

    /// True when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Messages the sender dropped because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// The engine as driven from an audio callback.
#[derive(Debug)]
pub struct RealtimeSynth<const N: usize> {
    synth: VoiceManager<N>,
    queue: ControlQueue,
}

impl<const N: usize> RealtimeSynth<N> {
    /// Wrap an engine and the consumer half of its control queue.
    pub fn new(synth: VoiceManager<N>, queue: ControlQueue) -> Self {
        Self { synth, queue }
    }

    /// Drain the control queue, then fill `buffer` (interleaved, `channels`
    /// channels).
    #[inline]
    pub fn process(&mut self, buffer: &mut [f32], channels: usize) {
        let synth = &mut self.synth;
        self.queue.drain(|message| synth.handle_message(message));
        synth.process_interleaved(buffer, channels);
    }

    /// Messages lost to a full queue so far.
    pub fn dropped_messages(&self) -> usize {
        self.queue.dropped()
    }

    /// The wrapped engine.
    pub fn synth(&self) -> &VoiceManager<N> {
        &self.synth
    }

    /// The wrapped engine, mutably.
    pub fn synth_mut(&mut self) -> &mut VoiceManager<N> {
        &mut self.synth
    }
}
