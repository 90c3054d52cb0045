//! Audio and MIDI device listing command.

use clap::{Args, Subcommand};
use sinefold_io::{list_devices, list_midi_ports};

#[derive(Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    command: Option<DevicesCommand>,
}

#[derive(Subcommand)]
enum DevicesCommand {
    /// List audio output devices and MIDI input ports
    List,

    /// List audio output devices only
    Audio,

    /// List MIDI input ports only
    Midi,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(DevicesCommand::List) {
        DevicesCommand::List => {
            audio()?;
            println!();
            midi()?;
            println!();
            println!("Tip: Use a partial name with --device/--midi-port:");
            println!("  sinefold play --device usb --midi-port nano");
        }
        DevicesCommand::Audio => audio()?,
        DevicesCommand::Midi => midi()?,
    }
    Ok(())
}

fn audio() -> anyhow::Result<()> {
    let devices = list_devices()?;
    println!("Output Devices:");
    if devices.is_empty() {
        println!("  (none)");
    }
    for (idx, device) in devices.iter().enumerate() {
        let default = if device.is_default { " (default)" } else { "" };
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            idx, device.name, device.default_sample_rate, device.channels, default
        );
    }
    Ok(())
}

fn midi() -> anyhow::Result<()> {
    let ports = list_midi_ports()?;
    println!("MIDI Input Ports:");
    if ports.is_empty() {
        println!("  (none)");
    }
    for port in ports {
        println!("  [{}] {}", port.index, port.name);
    }
    Ok(())
}
