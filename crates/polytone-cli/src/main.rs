//! Polytone CLI - play and render the polyphonic synthesizer.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polytone")]
#[command(author, version, about = "Polyphonic synthesizer", long_about = None)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play through the audio device, reading note commands from stdin
    Play(commands::play::PlayArgs),

    /// Render notes offline to a WAV file
    Render(commands::render::RenderArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),

    /// List the available generators
    Generators,

    /// Show or create the settings file
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(polytone_config::default_config_path);

    match cli.command {
        Commands::Play(args) => commands::play::run(args, &config_path),
        Commands::Render(args) => commands::render::run(args, &config_path),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Generators => commands::generators::run(),
        Commands::Config(args) => commands::config::run(args, &config_path),
    }
}
