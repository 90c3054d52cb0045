//! Power-of-two ring buffer with cubic fractional reads.
//!
//! The echo and the per-voice comb filter both need a delay line that can be
//! read at a fractional, continuously moving position. Capacity is always a
//! power of two so wrap-around is a single mask with `capacity - 1`.
//!
//! # Addressing
//!
//! Reads are expressed as an offset back from the most recent write:
//! `read_tap(0)` is the sample just written, `read_tap(1)` the one before.
//! A process that writes and then reads at offset `d` delays by `d` samples.
//!
//! | User | Capacity | Typical offset |
//! |------|----------|----------------|
//! | Echo | next pow2 ≥ 2 s · fs | up to 2 s · fs |
//! | Comb | next pow2 ≥ fs/20 + 4 | `fs/freq - 1` |

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Four-point cubic interpolation between `s0` and `s1`.
///
/// `s_prev` precedes `s0` and `s2` follows `s1`; `frac` in \[0, 1) is the
/// position between `s0` (0) and `s1` (1).
///
/// ```rust
/// use sinefold_core::cubic_interpolate;
///
/// assert_eq!(cubic_interpolate(0.0, 1.0, 2.0, 3.0, 0.0), 1.0);
/// assert!((cubic_interpolate(0.0, 1.0, 2.0, 3.0, 0.5) - 1.5).abs() < 1e-6);
/// ```
#[inline]
pub fn cubic_interpolate(s_prev: f32, s0: f32, s1: f32, s2: f32, frac: f32) -> f32 {
    let a = 0.5 * (s1 - s_prev);
    let b = 0.5 * (s2 - s0);
    let c = s0 - s1;
    let f2 = frac * frac;
    let f3 = f2 * frac;
    s0 + frac * a + f3 * (a + b + 2.0 * c) - f2 * (2.0 * a + b + 3.0 * c)
}

/// Circular delay buffer.
///
/// Allocated once at construction; writing and reading never allocate.
///
/// ```rust
/// use sinefold_core::DelayLine;
///
/// let mut line = DelayLine::new(100);
/// assert_eq!(line.capacity(), 128);
///
/// line.write(1.0);
/// for _ in 0..10 {
///     line.write(0.0);
/// }
/// assert_eq!(line.read_tap(10), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    mask: usize,
    /// Index of the most recent write.
    write_pos: usize,
}

impl DelayLine {
    /// Creates a silent line holding at least `min_capacity` samples.
    pub fn new(min_capacity: usize) -> Self {
        let capacity = min_capacity.max(4).next_power_of_two();
        Self {
            buffer: vec![0.0; capacity],
            mask: capacity - 1,
            write_pos: 0,
        }
    }

    /// Creates a line long enough for `seconds` of audio at `sample_rate`.
    pub fn with_seconds(sample_rate: f32, seconds: f32) -> Self {
        Self::new((sample_rate * seconds).max(0.0) as usize)
    }

    /// Buffer length (a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Largest offset accepted by [`read_interpolated`](Self::read_interpolated).
    #[inline]
    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 3) as f32
    }

    /// Appends a sample; it becomes tap 0.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.write_pos = (self.write_pos + 1) & self.mask;
        self.buffer[self.write_pos] = sample;
    }

    /// Sample written `offset` writes ago (wraps modulo capacity).
    #[inline]
    pub fn read_tap(&self, offset: usize) -> f32 {
        self.buffer[self.write_pos.wrapping_sub(offset) & self.mask]
    }

    /// Cubic-interpolated read `delay` samples back from the most recent write.
    ///
    /// `delay` is clamped to `[0, capacity - 3]`. At integer delays the
    /// result equals [`read_tap`](Self::read_tap).
    #[inline]
    pub fn read_interpolated(&self, delay: f32) -> f32 {
        let delay = delay.clamp(0.0, self.max_delay());
        let tap = delay as usize;
        let frac = delay - tap as f32;
        let prev = if tap == 0 { self.read_tap(0) } else { self.read_tap(tap - 1) };
        cubic_interpolate(
            prev,
            self.read_tap(tap),
            self.read_tap(tap + 1),
            self.read_tap(tap + 2),
            frac,
        )
    }

    /// Zeroes the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}
