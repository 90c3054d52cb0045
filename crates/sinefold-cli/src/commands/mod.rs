//! CLI command implementations.

pub mod common;
pub mod devices;
pub mod layouts;
pub mod params;
pub mod play;
pub mod render;
