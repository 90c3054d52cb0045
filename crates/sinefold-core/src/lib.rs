//! Sinefold Core - DSP primitives for the sinefold synthesizer
//!
//! This crate provides the building blocks shared by the synthesis engine and
//! its effects, designed for real-time audio processing with zero allocation
//! in the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe stereo processing trait for bus effects
//!
//! ## Parameter Smoothing
//!
//! Click-free parameter changes:
//!
//! - [`RampedParameter`] - Linear ramp over a fixed window (every control parameter)
//! - [`SmoothedParam`] - Exponential glide (delay times)
//!
//! ## Filters
//!
//! All filters share [`FilterType`] and run transposed direct form II with
//! an independent history per stereo channel:
//!
//! - [`Biquad`] - Second-order lowpass / highpass / shelving filter
//! - [`OnePole`] - First-order lowpass / highpass / shelving filter
//! - [`Tilt`] - Pivot-normalized shelf for spectral tilt
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Power-of-two ring buffer with cubic fractional reads
//!
//! ## Utilities
//!
//! - Polynomial trigonometry: [`sine_approx`], [`sin_poly`], [`cos_poly`], [`tan_poly`]
//! - Waveshaping: [`shape`], [`sine_fold`], [`parametric_asym`]
//! - Crossfades and conversions: [`bipolar_crossfade`], [`db_to_linear`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sinefold-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use sinefold_core::{Biquad, FilterType, RampedParameter};
//!
//! let mut cutoff = RampedParameter::new(48000.0, 1000.0);
//! let mut lowpass = Biquad::with_type(48000.0, FilterType::Lowpass, 1000.0);
//!
//! cutoff.init_ramp(2000.0);
//! for _ in 0..64 {
//!     let (_l, _r) = lowpass.process_stereo(0.5, -0.5);
//!     cutoff.advance();
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **Reproducible**: Coefficients use polynomial trigonometry, not libm
//! - **Clamp, don't fail**: Out-of-range settings are clamped at the setter

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod effect;
pub mod fast_math;
pub mod filter;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod shaper;
pub mod tilt;

// Re-export main types at crate root
pub use biquad::{Biquad, allpass_coefficients};
pub use delay::{DelayLine, cubic_interpolate};
pub use effect::Effect;
pub use fast_math::{cos_poly, sin_poly, sine_approx, sine_approx_bounded, tan_poly};
pub use filter::{FilterType, MAX_SHELF_DB, sanitize_sample_rate};
pub use math::{
    DNC, bipolar_crossfade, db_to_linear, flush_denormal, midi_to_freq, semitones_to_ratio,
    unipolar_crossfade,
};
pub use one_pole::OnePole;
pub use param::{RampedParameter, SmoothedParam};
pub use shaper::{
    MAX_DRIVE_DB, UNITY_DRIVE, drive_from_db, parametric_asym, shape, sine_fold, three_ranges,
};
pub use tilt::Tilt;
