//! Offline render command.

use super::common::{Assignment, apply_assignments, parse_assignment, parse_note};
use anyhow::{Context, bail};
use clap::Args;
use sinefold_io::{TimedMessage, WavSpec, render, write_wav_stereo};
use sinefold_synth::{ControlMap, ControlMessage, SampleSpecs, VoiceManager};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Notes to play, as MIDI numbers or names (C4 = 60)
    #[arg(short, long, value_delimiter = ',', value_parser = parse_note, default_value = "C4,E4,G4")]
    notes: Vec<u8>,

    /// Note-on velocity (1-127)
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u8).range(1..=127))]
    velocity: u8,

    /// Seconds each note is held
    #[arg(short, long, default_value = "2.0")]
    duration: f32,

    /// Seconds between successive note-ons (0 plays a chord)
    #[arg(long, default_value = "0.0")]
    stagger: f32,

    /// Seconds rendered after the last note-off
    #[arg(long, default_value = "1.0")]
    tail: f32,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Bit depth (16, 24 or 32 float)
    #[arg(long, default_value = "32", value_parser = ["16", "24", "32"])]
    bits: String,

    /// Parameter assignment in natural units, e.g. `--set echo.mix=0.3` (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    assignments: Vec<Assignment>,
}

/// Frame schedule for a note list: each note is held for `hold` frames,
/// successive note-ons `stagger` frames apart.
fn schedule(notes: &[u8], velocity: u8, hold: usize, stagger: usize) -> Vec<TimedMessage> {
    notes
        .iter()
        .enumerate()
        .flat_map(|(i, &note)| {
            let start = i * stagger;
            [
                TimedMessage::new(start, ControlMessage::note_on(0, note, velocity)),
                TimedMessage::new(start + hold, ControlMessage::note_off(0, note)),
            ]
        })
        .collect()
}

fn seconds_to_frames(seconds: f32, sample_rate: u32) -> usize {
    (seconds.max(0.0) * sample_rate as f32).round() as usize
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if args.notes.is_empty() {
        bail!("no notes to render");
    }
    if !(8000..=192_000).contains(&args.sample_rate) {
        bail!("sample rate {} outside 8000-192000", args.sample_rate);
    }
    let bits: u16 = args.bits.parse()?;

    let hold = seconds_to_frames(args.duration, args.sample_rate);
    let stagger = seconds_to_frames(args.stagger, args.sample_rate);
    let tail = seconds_to_frames(args.tail, args.sample_rate);
    let frames = (args.notes.len() - 1) * stagger + hold + tail;

    let specs = SampleSpecs::stereo(args.sample_rate, 256);
    let mut synth: VoiceManager = VoiceManager::new(specs, ControlMap::new());
    apply_assignments(&mut synth, &args.assignments);

    let events = schedule(&args.notes, args.velocity, hold, stagger);
    println!(
        "Rendering {} note(s), {:.2}s at {} Hz",
        args.notes.len(),
        frames as f32 / args.sample_rate as f32,
        args.sample_rate
    );
    let samples = render(&mut synth, &events, frames);

    let peak = samples.peak();
    if peak > 1.0 {
        tracing::warn!(peak, "output exceeds full scale");
    }

    let spec = WavSpec {
        channels: 2,
        sample_rate: args.sample_rate,
        bits_per_sample: bits,
    };
    write_wav_stereo(&args.output, &samples, spec)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Wrote {} ({} frames, peak {:.1} dBFS)",
        args.output.display(),
        samples.len(),
        20.0 * peak.max(1e-10).log10()
    );
    Ok(())
}
