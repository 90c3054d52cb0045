//! Controller layouts and engine configuration for sinefold.
//!
//! A controller layout maps MIDI controller numbers to synth parameters and
//! is loaded at runtime, so the same build plays any control surface.
//! Layouts never store parameter values; there are no patches.
//!
//! # Features
//!
//! - **Layouts**: Load and save [`ControllerLayout`] TOML files and turn them into a [`ControlMap`]
//! - **Engine config**: Sample rate, buffer size, layout and device selection
//! - **Validation**: Unknown parameters, controller and channel ranges, duplicate controllers
//! - **Paths**: Platform-specific layout and config directories
//! - **Factory Layouts**: Built-in layouts for the nanoKONTROL and ReMOTE 61
//!
//! # Example
//!
//! ```rust,no_run
//! use sinefold_config::{ControllerLayout, EngineConfig, user_layouts_dir};
//!
//! let config = EngineConfig::load_user().unwrap();
//! let map = config.resolve_layout().unwrap().to_control_map().unwrap();
//!
//! let desk = ControllerLayout::new("Desk")
//!     .with_channel(0)
//!     .with_binding(1, "filter.cutoff")
//!     .with_binding(2, "echo.mix");
//! desk.save(user_layouts_dir().join("desk.toml")).unwrap();
//! ```

mod engine_config;
mod error;
mod layout;

/// Platform-specific paths for layouts and configuration.
pub mod paths;

/// Layout and engine configuration validation.
pub mod validation;

/// Factory layouts bundled with the library.
pub mod factory_layouts;

pub use engine_config::{EngineConfig, resolve_layout};
pub use error::ConfigError;
pub use factory_layouts::{
    FACTORY_LAYOUT_NAMES, factory_layout_names, factory_layouts, get_factory_layout,
    is_factory_layout,
};
pub use layout::{Binding, ControllerLayout};
pub use paths::{
    engine_config_path, ensure_user_layouts_dir, find_layout, list_user_layouts,
    user_config_dir, user_layouts_dir,
};
pub use validation::{
    ValidationError, ValidationResult, validate_engine_config, validate_layout,
};

/// Re-export the runtime table built from layouts.
pub use sinefold_synth::{ControlMap, ParamId};
