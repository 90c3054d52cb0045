//! Integration tests for sinefold-config.
//!
//! These tests go from files on disk to a running engine.

use sinefold_config::{
    ConfigError, ControllerLayout, EngineConfig, ValidationError, factory_layouts,
    paths::find_layout_in,
};
use sinefold_synth::{ControlMessage, MixerParam, ParamId, VoiceManager};
use tempfile::TempDir;

/// A saved layout loads back identically and drives the engine.
#[test]
fn test_layout_file_round_trip_into_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layouts").join("desk.toml");

    let layout = ControllerLayout::new("Desk")
        .with_description("one fader")
        .with_channel(3)
        .with_binding(10, "mixer.level");
    layout.save(&path).expect("save should create the layouts dir");

    let loaded = ControllerLayout::load(&path).unwrap();
    assert_eq!(loaded, layout);

    let map = loaded.to_control_map().unwrap();
    assert_eq!(map.lookup(10), Some(ParamId::Mixer(MixerParam::Level)));

    let config = EngineConfig::default();
    let mut synth: VoiceManager<4> = VoiceManager::new(config.specs(), map);
    synth.handle_message(ControlMessage::note_on(3, 60, 127));
    // wrong channel, ignored
    synth.handle_message(ControlMessage::note_on(4, 64, 127));
    assert_eq!(synth.assigned_count(), 1);

    synth.handle_message(ControlMessage::control_change(3, 10, 0));
    let mut peak = 0.0f32;
    for i in 0..12000 {
        let (l, r) = synth.tick();
        if i > 10000 {
            peak = peak.max(l.abs()).max(r.abs());
        }
    }
    assert!(peak < 1e-6);
}

/// Hand-written files with mistakes are rejected with every problem listed.
#[test]
fn test_bad_layout_file_reports_all_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        r#"
name = "Bad"
channel = 16

[[bindings]]
cc = 130
param = "echo.mix"

[[bindings]]
cc = 5
param = "echo.mix"

[[bindings]]
cc = 5
param = "echo.time"
"#,
    )
    .unwrap();

    let layout = ControllerLayout::load(&path).unwrap();
    let err = layout.to_control_map().unwrap_err();
    let ConfigError::Validation(ValidationError::Multiple(errors)) = err else {
        panic!("expected several validation errors, got {err}");
    };
    assert_eq!(errors.len(), 3);
    assert!(errors.contains(&ValidationError::ChannelOutOfRange(16)));
    assert!(errors.contains(&ValidationError::ControllerOutOfRange(130)));
}

/// Missing files surface as read errors naming the path.
#[test]
fn test_missing_layout_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = ControllerLayout::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

/// The engine config names a layout file by path.
#[test]
fn test_engine_config_resolves_layout_path() {
    let dir = TempDir::new().unwrap();
    let layout_path = dir.path().join("mine.toml");
    ControllerLayout::new("Mine")
        .with_binding(1, "osc_a.pitch")
        .save(&layout_path)
        .unwrap();

    let config = EngineConfig {
        layout: layout_path.to_string_lossy().into_owned(),
        ..EngineConfig::default()
    };
    let config_path = dir.path().join("engine.toml");
    config.save(&config_path).unwrap();

    let loaded = EngineConfig::load(&config_path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.resolve_layout().unwrap().name, "Mine");
    assert_eq!(find_layout_in("mine", dir.path()), Some(layout_path));
}

/// Every factory layout installs into an engine and survives full sweeps.
#[test]
fn test_factory_layouts_drive_engine() {
    for layout in factory_layouts() {
        let map = layout.to_control_map().unwrap();
        let channel = layout.channel.unwrap_or(0);
        let bound: Vec<u8> = map.bindings().map(|(cc, _)| cc).collect();

        let mut synth: VoiceManager<4> = VoiceManager::new(EngineConfig::default().specs(), map);
        synth.handle_message(ControlMessage::note_on(channel, 48, 100));
        for value in [0, 64, 127] {
            for &cc in &bound {
                synth.handle_message(ControlMessage::control_change(channel, cc, value));
            }
            for _ in 0..256 {
                let (l, r) = synth.tick();
                assert!(l.is_finite() && r.is_finite(), "{}", layout.name);
            }
        }
    }
}
