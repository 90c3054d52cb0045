//! Fixed-pool voice allocation with oldest-first reuse and stealing.
//!
//! Slots are kept in two doubly-linked lists threaded through parallel
//! `next`/`prev` index arrays:
//!
//! - **assigned**: slots holding a pressed key, oldest → youngest
//! - **released**: free slots, oldest → youngest
//!
//! Every slot is in exactly one list. A note-on takes the oldest released
//! slot, which gives a released voice the longest possible tail before it is
//! reused; when none is left it steals the oldest assigned slot. Either way
//! the slot becomes the youngest assigned one. All operations are O(1)
//! except note-off, which scans the `N` slots in index order.

/// Marks the end of a list.
const NIL: usize = usize::MAX;

/// Voice count of the default engine.
pub const DEFAULT_VOICES: usize = 12;

/// Assignment state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// In the released list.
    Free,
    /// Playing the given MIDI pitch.
    Assigned(u8),
}

/// Outcome of a note-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// Slot that now plays the note.
    pub slot: usize,
    /// Pitch the slot was playing if it had to be stolen.
    pub stolen: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Which {
    Assigned,
    Released,
}

#[derive(Debug, Clone, Copy)]
struct List {
    head: usize,
    tail: usize,
    len: usize,
}

impl List {
    const EMPTY: List = List {
        head: NIL,
        tail: NIL,
        len: 0,
    };
}

/// Voice allocator over `N` slots.
///
/// # Example
///
/// ```rust
/// use sinefold_synth::VoiceAllocator;
///
/// let mut alloc: VoiceAllocator<2> = VoiceAllocator::new();
/// let a = alloc.note_on(60);
/// let b = alloc.note_on(64);
/// // Pool exhausted: the oldest note is stolen.
/// let c = alloc.note_on(67);
/// assert_eq!(c.slot, a.slot);
/// assert_eq!(c.stolen, Some(60));
/// assert_eq!(alloc.note_off(64), Some(b.slot));
/// assert_eq!(alloc.released_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct VoiceAllocator<const N: usize> {
    next: [usize; N],
    prev: [usize; N],
    state: [SlotState; N],
    assigned: List,
    released: List,
}

impl<const N: usize> VoiceAllocator<N> {
    /// All slots released, in index order.
    pub fn new() -> Self {
        const { assert!(N > 0, "voice pool must have at least one slot") };
        let mut alloc = Self {
            next: [NIL; N],
            prev: [NIL; N],
            state: [SlotState::Free; N],
            assigned: List::EMPTY,
            released: List::EMPTY,
        };
        for slot in 0..N {
            alloc.push_back(Which::Released, slot);
        }
        alloc
    }

    /// Assign a slot to `pitch`. Never fails: steals when the pool is full.
    pub fn note_on(&mut self, pitch: u8) -> Allocation {
        let (slot, stolen) = if self.released.head == NIL {
            let slot = self.assigned.head;
            self.unlink(Which::Assigned, slot);
            let stolen = match self.state[slot] {
                SlotState::Assigned(p) => Some(p),
                SlotState::Free => None,
            };
            (slot, stolen)
        } else {
            let slot = self.released.head;
            self.unlink(Which::Released, slot);
            (slot, None)
        };
        self.state[slot] = SlotState::Assigned(pitch);
        self.push_back(Which::Assigned, slot);
        Allocation { slot, stolen }
    }

    /// Release the lowest-index slot playing `pitch`.
    ///
    /// Returns the released slot, or `None` when no slot plays `pitch`.
    pub fn note_off(&mut self, pitch: u8) -> Option<usize> {
        let slot = self
            .state
            .iter()
            .position(|s| *s == SlotState::Assigned(pitch))?;
        self.release(slot);
        Some(slot)
    }

    /// Release every assigned slot, oldest first. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let mut count = 0;
        while self.assigned.head != NIL {
            self.release(self.assigned.head);
            count += 1;
        }
        count
    }

    /// State of `slot`.
    pub fn state(&self, slot: usize) -> SlotState {
        self.state[slot]
    }

    /// Number of assigned slots.
    pub fn assigned_count(&self) -> usize {
        self.assigned.len
    }

    /// Number of released slots.
    pub fn released_count(&self) -> usize {
        self.released.len
    }

    /// Assigned slots, oldest first.
    pub fn assigned(&self) -> Slots<'_, N> {
        Slots {
            next: &self.next,
            cursor: self.assigned.head,
        }
    }

    /// Released slots, oldest first.
    pub fn released(&self) -> Slots<'_, N> {
        Slots {
            next: &self.next,
            cursor: self.released.head,
        }
    }

    fn release(&mut self, slot: usize) {
        self.unlink(Which::Assigned, slot);
        self.state[slot] = SlotState::Free;
        self.push_back(Which::Released, slot);
    }

    fn list_mut(&mut self, which: Which) -> &mut List {
        match which {
            Which::Assigned => &mut self.assigned,
            Which::Released => &mut self.released,
        }
    }

    fn unlink(&mut self, which: Which, slot: usize) {
        let (prev, next) = (self.prev[slot], self.next[slot]);
        if prev == NIL {
            self.list_mut(which).head = next;
        } else {
            self.next[prev] = next;
        }
        if next == NIL {
            self.list_mut(which).tail = prev;
        } else {
            self.prev[next] = prev;
        }
        self.prev[slot] = NIL;
        self.next[slot] = NIL;
        self.list_mut(which).len -= 1;
    }

    fn push_back(&mut self, which: Which, slot: usize) {
        let tail = self.list_mut(which).tail;
        self.prev[slot] = tail;
        self.next[slot] = NIL;
        if tail == NIL {
            self.list_mut(which).head = slot;
        } else {
            self.next[tail] = slot;
        }
        let list = self.list_mut(which);
        list.tail = slot;
        list.len += 1;
    }
}

impl<const N: usize> Default for VoiceAllocator<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over one allocation list, oldest first.
#[derive(Debug, Clone)]
pub struct Slots<'a, const N: usize> {
    next: &'a [usize; N],
    cursor: usize,
}

impl<const N: usize> Iterator for Slots<'_, N> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cursor == NIL {
            return None;
        }
        let slot = self.cursor;
        self.cursor = self.next[slot];
        Some(slot)
    }
}
