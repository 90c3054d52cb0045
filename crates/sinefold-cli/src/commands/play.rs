//! Live playing command.

use super::common::{Assignment, apply_assignments, load_engine_config, parse_assignment};
use anyhow::Context;
use clap::Args;
use sinefold_config::resolve_layout;
use sinefold_io::{
    AudioOutput, ControlQueue, DEFAULT_QUEUE_CAPACITY, MidiInput, OutputConfig, RealtimeSynth,
};
use sinefold_synth::VoiceManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Args)]
pub struct PlayArgs {
    /// Engine config file (defaults to the user's engine.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Controller layout: factory name, user layout name, or file path
    #[arg(short, long)]
    layout: Option<String>,

    /// MIDI input port (substring of its name)
    #[arg(short, long)]
    midi_port: Option<String>,

    /// Output device (substring of its name)
    #[arg(short, long)]
    device: Option<String>,

    /// Sample rate
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Buffer size in frames
    #[arg(long)]
    buffer_size: Option<u32>,

    /// Parameter assignment in natural units, e.g. `--set echo.mix=0.3` (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    assignments: Vec<Assignment>,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let mut config = load_engine_config(args.config.as_deref())?;
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(port) = args.midi_port {
        config.midi_port = Some(port);
    }
    if let Some(device) = args.device {
        config.output_device = Some(device);
    }
    if let Some(sample_rate) = args.sample_rate {
        config.sample_rate = sample_rate;
    }
    if let Some(buffer_size) = args.buffer_size {
        config.buffer_size = buffer_size;
    }
    sinefold_config::validate_engine_config(&config)?;

    let layout = resolve_layout(&config.layout)
        .with_context(|| format!("resolving layout '{}'", config.layout))?;
    let map = layout.to_control_map()?;
    tracing::info!(layout = %layout.name, bindings = map.len(), "layout loaded");

    let mut synth: VoiceManager = VoiceManager::new(config.specs(), map);
    apply_assignments(&mut synth, &args.assignments);

    let (sender, queue) = ControlQueue::new(DEFAULT_QUEUE_CAPACITY);
    let midi = MidiInput::connect(config.midi_port.as_deref(), sender)?;

    let mut rt = RealtimeSynth::new(synth, queue);
    let output_config = OutputConfig {
        sample_rate: config.sample_rate,
        buffer_size: config.buffer_size,
        device: config.output_device.clone(),
    };
    let output = AudioOutput::start(&output_config, move |buffer, channels| {
        rt.process(buffer, channels);
    })?;

    println!("Playing {} voices", sinefold_synth::DEFAULT_VOICES);
    println!("  MIDI:   {}", midi.port_name());
    println!("  Layout: {}", layout.name);
    println!("  Output: {} ({} ch)", output.device_name(), output.channels());
    println!("  Sample rate: {} Hz", output.sample_rate());
    println!("  Buffer size: {} frames", config.buffer_size);
    println!("\nPress Ctrl+C to stop...\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    println!("\nStopping...");
    drop(output);
    drop(midi);
    Ok(())
}
