//! Sinefold CLI - command-line front end for the sinefold synthesizer.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sinefold")]
#[command(author, version, about = "Sinefold polyphonic PM synthesizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render notes to a WAV file
    Render(commands::render::RenderArgs),

    /// Play live from a MIDI controller
    Play(commands::play::PlayArgs),

    /// List, show, export and validate controller layouts
    Layouts(commands::layouts::LayoutsArgs),

    /// List synth parameters and their controller scaling
    Params(commands::params::ParamsArgs),

    /// List audio output devices and MIDI input ports
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Layouts(args) => commands::layouts::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
