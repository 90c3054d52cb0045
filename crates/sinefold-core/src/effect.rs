//! Stereo bus effect trait.
//!
//! The bus stages after the voice mixer (bus filter, cabinet, echo) all
//! implement [`Effect`], so the engine can run them uniformly and tests can
//! drive them without knowing their parameters.
//!
//! ## Design Decisions
//!
//! - **Stereo frames**: the bus is always two channels; a stage receives and
//!   returns one `(left, right)` frame per call.
//! - **Object-safe**: `dyn Effect` works for runtime chains, but the engine
//!   holds concrete types.
//! - **No allocations**: every method is callable from the audio thread.

/// Core trait for stereo bus effects.
///
/// # Example
///
/// ```rust
/// use sinefold_core::Effect;
///
/// struct Swap;
///
/// impl Effect for Swap {
///     fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
///         (right, left)
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut swap = Swap;
/// assert_eq!(swap.process_stereo(1.0, 2.0), (2.0, 1.0));
/// ```
pub trait Effect {
    /// Process one stereo frame, advancing internal state by one sample.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Process two channel buffers in place.
    ///
    /// Default implementation calls [`process_stereo`](Self::process_stereo)
    /// per frame over the shorter of the two buffers.
    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(
            left.len(),
            right.len(),
            "Left and right buffers must have same length"
        );
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (out_l, out_r) = self.process_stereo(*l, *r);
            *l = out_l;
            *r = out_r;
        }
    }

    /// Update the sample rate and every coefficient derived from it.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear delay lines and filter history without touching parameters.
    fn reset(&mut self);
}
