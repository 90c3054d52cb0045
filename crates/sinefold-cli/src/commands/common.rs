//! Argument parsing shared by several commands.

use anyhow::Context;
use sinefold_config::{EngineConfig, validate_engine_config};
use sinefold_synth::{ParamId, VoiceManager};
use std::path::Path;

/// A `name=value` parameter assignment in natural units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub param: ParamId,
    pub value: f32,
}

/// clap value parser for `--set osc_a.pm_self=0.4`.
pub fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let param = ParamId::from_name(name.trim())
        .ok_or_else(|| format!("unknown parameter '{}' (see `sinefold params`)", name.trim()))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid value for {param}: {e}"))?;
    if !value.is_finite() {
        return Err(format!("value for {param} must be finite"));
    }
    Ok(Assignment { param, value })
}

/// clap value parser for a note: a MIDI number or a name such as `C4`,
/// `F#3` or `Bb2` (C4 = 60).
pub fn parse_note(s: &str) -> Result<u8, String> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u8>() {
        return if n <= 127 {
            Ok(n)
        } else {
            Err(format!("note {n} above 127"))
        };
    }

    let mut chars = s.chars();
    let letter = chars.next().ok_or("empty note")?;
    let base: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(format!("invalid note '{s}'")),
    };
    let rest = chars.as_str();
    let (accidental, octave) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest),
    };
    let octave: i32 = octave
        .parse()
        .map_err(|_| format!("invalid octave in '{s}'"))?;
    let midi = (octave + 1) * 12 + base + accidental;
    u8::try_from(midi)
        .ok()
        .filter(|n| *n <= 127)
        .ok_or_else(|| format!("note '{s}' outside 0-127"))
}

/// Load the engine configuration from `path`, or the user's file, and
/// validate it.
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::load_user().context("loading user engine config")?,
    };
    validate_engine_config(&config)?;
    Ok(config)
}

/// Apply every assignment to the engine.
pub fn apply_assignments<const N: usize>(synth: &mut VoiceManager<N>, assignments: &[Assignment]) {
    for a in assignments {
        tracing::debug!(param = %a.param, value = a.value, "set");
        synth.set_param(a.param, a.value);
    }
}
