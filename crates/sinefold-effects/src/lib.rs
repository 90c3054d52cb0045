//! Sinefold Effects - the per-voice comb filter and the stereo bus stages
//!
//! Built on sinefold-core:
//!
//! - [`CombFilter`] - Key-tracked feedback comb, one per voice
//! - [`BusFilter`] - Selectable biquad on the mixed bus
//! - [`Cabinet`] - Drive, tilt-bracketed sine shaper and speaker rolloff
//! - [`Echo`] - Stereo feedback delay with cross-feed and spread
//!
//! The bus stages implement [`Effect`](sinefold_core::Effect) and run in the
//! order filter → cabinet → echo.
//!
//! ## Example
//!
//! ```rust
//! use sinefold_core::Effect;
//! use sinefold_effects::{BusFilter, Cabinet, Echo};
//!
//! let mut filter = BusFilter::new(48000.0);
//! let mut cabinet = Cabinet::new(48000.0);
//! let mut echo = Echo::new(48000.0);
//! echo.set_mix(0.3);
//!
//! let (l, r) = filter.process_stereo(0.2, -0.2);
//! let (l, r) = cabinet.process_stereo(l, r);
//! let (l, r) = echo.process_stereo(l, r);
//! assert!(l.is_finite() && r.is_finite());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod cabinet;
pub mod comb;
pub mod echo;
pub mod filter;

// Re-export main types at crate root
pub use cabinet::Cabinet;
pub use comb::{CombFilter, CombParams};
pub use echo::Echo;
pub use filter::BusFilter;
