//! Layout and engine configuration validation.
//!
//! Every problem in a layout is collected, so a hand-edited file can be
//! fixed in one pass rather than one error at a time.
//!
//! # Example
//!
//! ```rust
//! use sinefold_config::{ControllerLayout, ValidationError, validate_layout};
//!
//! let layout = ControllerLayout::new("Desk")
//!     .with_binding(7, "mixer.level")
//!     .with_binding(7, "echo.mix");
//!
//! let err = validate_layout(&layout).unwrap_err();
//! assert!(matches!(err, ValidationError::DuplicateController { cc: 7, .. }));
//! ```

use sinefold_synth::ParamId;
use thiserror::Error;

use crate::engine_config::EngineConfig;
use crate::layout::ControllerLayout;

/// Highest MIDI controller number.
pub const MAX_CONTROLLER: u16 = 127;
/// Highest MIDI channel (zero-based).
pub const MAX_CHANNEL: u8 = 15;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Binding names a parameter the engine does not have.
    #[error("unknown parameter '{param}' on controller {cc}")]
    UnknownParameter {
        /// Controller number of the binding.
        cc: u16,
        /// The unrecognized name.
        param: String,
    },

    /// Controller number above 127.
    #[error("controller number {0} out of range [0, 127]")]
    ControllerOutOfRange(u16),

    /// The same controller is bound twice.
    #[error("controller {cc} bound to both '{first}' and '{second}'")]
    DuplicateController {
        /// Controller number.
        cc: u16,
        /// Parameter of the earlier binding.
        first: String,
        /// Parameter of the later binding.
        second: String,
    },

    /// Channel above 15.
    #[error("channel {0} out of range [0, 15]")]
    ChannelOutOfRange(u8),

    /// Engine setting outside its usable range.
    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting {
        /// Setting name.
        name: String,
        /// Description of the problem.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check a layout's channel and every binding.
pub fn validate_layout(layout: &ControllerLayout) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if let Some(channel) = layout.channel
        && channel > MAX_CHANNEL
    {
        errors.push(ValidationError::ChannelOutOfRange(channel));
    }

    for (i, binding) in layout.bindings.iter().enumerate() {
        if binding.cc > MAX_CONTROLLER {
            errors.push(ValidationError::ControllerOutOfRange(binding.cc));
        }
        if ParamId::from_name(&binding.param).is_none() {
            errors.push(ValidationError::UnknownParameter {
                cc: binding.cc,
                param: binding.param.clone(),
            });
        }
        if let Some(first) = layout.bindings[..i].iter().find(|b| b.cc == binding.cc) {
            errors.push(ValidationError::DuplicateController {
                cc: binding.cc,
                first: first.param.clone(),
                second: binding.param.clone(),
            });
        }
    }

    collect(errors)
}

/// Check engine settings.
pub fn validate_engine_config(config: &EngineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if !(8000..=192_000).contains(&config.sample_rate) {
        errors.push(ValidationError::InvalidSetting {
            name: "sample_rate".to_string(),
            reason: format!("{} Hz is outside 8000-192000", config.sample_rate),
        });
    }
    if config.buffer_size == 0 || config.buffer_size > 8192 {
        errors.push(ValidationError::InvalidSetting {
            name: "buffer_size".to_string(),
            reason: format!("{} frames is outside 1-8192", config.buffer_size),
        });
    }
    if config.layout.trim().is_empty() {
        errors.push(ValidationError::InvalidSetting {
            name: "layout".to_string(),
            reason: "must name a layout or a file".to_string(),
        });
    }

    collect(errors)
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
