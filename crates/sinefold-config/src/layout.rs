//! Controller layout file format and conversion to a [`ControlMap`].

use serde::{Deserialize, Serialize};
use sinefold_synth::{ControlMap, ParamId};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::validate_layout;

/// One controller-to-parameter binding.
///
/// `cc` is wider than a MIDI data byte so that out-of-range numbers in a
/// hand-edited file reach validation instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Binding {
    /// MIDI controller number (0–127).
    pub cc: u16,
    /// Dotted parameter name, e.g. `"cabinet.drive"`.
    pub param: String,
}

impl Binding {
    /// Create a binding.
    pub fn new(cc: u16, param: impl Into<String>) -> Self {
        Self {
            cc,
            param: param.into(),
        }
    }
}

/// A named table from MIDI controller numbers to synth parameters.
///
/// # TOML Format
///
/// ```toml
/// name = "My Desk"
/// description = "Eight faders, eight knobs"
/// channel = 0
///
/// [[bindings]]
/// cc = 0
/// param = "mixer.level_a"
///
/// [[bindings]]
/// cc = 16
/// param = "filter.cutoff"
/// ```
///
/// `channel` is optional; without it the layout listens on all channels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerLayout {
    /// Name of the layout.
    pub name: String,

    /// Optional description of the layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// MIDI channel filter (0–15).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u8>,

    /// Controller bindings.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

impl ControllerLayout {
    /// Create an empty layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            channel: None,
            bindings: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Listen on a single channel.
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Add a binding.
    pub fn with_binding(mut self, cc: u16, param: impl Into<String>) -> Self {
        self.bindings.push(Binding::new(cc, param));
        self
    }

    /// Capture a [`ControlMap`] as a layout.
    pub fn from_control_map(name: impl Into<String>, map: &ControlMap) -> Self {
        Self {
            name: name.into(),
            description: None,
            channel: map.channel(),
            bindings: map
                .bindings()
                .map(|(cc, id)| Binding::new(u16::from(cc), id.to_string()))
                .collect(),
        }
    }

    /// Load a layout from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a layout from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the layout to a TOML file, creating parent directories.
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

    /// Serialize the layout to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when the layout has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Parameter bound to `cc`, if any.
    pub fn param_for(&self, cc: u16) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.cc == cc)
            .map(|b| b.param.as_str())
    }

    /// Validate and build the runtime table.
    pub fn to_control_map(&self) -> Result<ControlMap, ConfigError> {
        validate_layout(self)?;

        let mut map = ControlMap::new();
        map.set_channel(self.channel);
        for binding in &self.bindings {
            // validated above
            let cc = u8::try_from(binding.cc).ok();
            if let (Some(cc), Some(id)) = (cc, ParamId::from_name(&binding.param)) {
                map.bind(cc, id);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinefold_synth::{EchoParam, FilterParam};

    const DESK: &str = r#"
name = "Desk"
channel = 2

[[bindings]]
cc = 16
param = "filter.cutoff"

[[bindings]]
cc = 17
param = "echo.mix"
"#;

    #[test]
    fn test_parses_minimal_layout() {
        let layout = ControllerLayout::from_toml("name = \"Empty\"").unwrap();
        assert_eq!(layout.name, "Empty");
        assert!(layout.is_empty());
        assert_eq!(layout.channel, None);
        assert_eq!(layout.description, None);
    }

    #[test]
    fn test_builds_control_map() {
        let layout = ControllerLayout::from_toml(DESK).unwrap();
        let map = layout.to_control_map().unwrap();
        assert_eq!(map.channel(), Some(2));
        assert_eq!(map.lookup(16), Some(ParamId::Filter(FilterParam::Cutoff)));
        assert_eq!(map.lookup(17), Some(ParamId::Echo(EchoParam::Mix)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_toml_round_trip() {
        let layout = ControllerLayout::new("Round")
            .with_description("two knobs")
            .with_channel(9)
            .with_binding(1, "osc_a.pm_self")
            .with_binding(2, "comb.decay");
        let text = layout.to_toml().unwrap();
        assert_eq!(ControllerLayout::from_toml(&text).unwrap(), layout);
    }

    #[test]
    fn test_captures_control_map() {
        let mut map = ControlMap::new();
        map.bind(40, ParamId::Echo(EchoParam::Time));
        map.set_channel(Some(1));
        let layout = ControllerLayout::from_control_map("captured", &map);
        assert_eq!(layout.channel, Some(1));
        assert_eq!(layout.param_for(40), Some("echo.time"));
        assert_eq!(layout.to_control_map().unwrap(), map);
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let layout = ControllerLayout::new("Bad").with_binding(3, "echo.wobble");
        assert!(matches!(
            layout.to_control_map(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_mistyped_cc_fails_to_parse() {
        let text = "name = \"x\"\n[[bindings]]\ncc = \"one\"\nparam = \"echo.mix\"\n";
        assert!(matches!(
            ControllerLayout::from_toml(text),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
