//! Engine configuration file.

use serde::{Deserialize, Serialize};
use sinefold_synth::SampleSpecs;
use std::path::Path;

use crate::error::ConfigError;
use crate::factory_layouts::get_factory_layout;
use crate::layout::ControllerLayout;
use crate::paths;

/// Settings the audio front end needs before the engine starts.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 48000
/// buffer_size = 256
/// layout = "nanokontrol"
/// midi_port = "nanoKONTROL2"
/// output_device = "default"
/// ```
///
/// Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frames per audio callback.
    pub buffer_size: u32,
    /// Factory layout name, user layout name, or path to a layout file.
    pub layout: String,
    /// Substring of the MIDI input port to open; first port when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub midi_port: Option<String>,
    /// Substring of the output device name; host default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_device: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 256,
            layout: "nanokontrol".to_string(),
            midi_port: None,
            output_device: None,
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load the user's `engine.toml`, or defaults when it does not exist.
    pub fn load_user() -> Result<Self, ConfigError> {
        let path = paths::engine_config_path();
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Stereo stream description for the engine.
    pub fn specs(&self) -> SampleSpecs {
        SampleSpecs::stereo(self.sample_rate, self.buffer_size)
    }

    /// Resolve [`layout`](Self::layout) to a controller layout.
    ///
    /// Factory names win, then files found by [`paths::find_layout`].
    pub fn resolve_layout(&self) -> Result<ControllerLayout, ConfigError> {
        resolve_layout(&self.layout)
    }
}

/// Resolve a factory name, user layout name, or file path.
pub fn resolve_layout(name: &str) -> Result<ControllerLayout, ConfigError> {
    if let Some(layout) = get_factory_layout(name) {
        return Ok(layout);
    }
    match paths::find_layout(name) {
        Some(path) => ControllerLayout::load(path),
        None => Err(ConfigError::LayoutNotFound(name.to_string())),
    }
}
