//! Arguments and helpers shared by the `play` and `render` commands.

use clap::{Args, ValueEnum};
use polytone_config::{Settings, load_or_default};
use polytone_synth::Generator;
use std::path::Path;

/// Generator kinds for CLI
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliGenerator {
    Sine,
    Square,
    Triangle,
    #[value(alias = "saw")]
    Sawtooth,
    Organ,
    Torgan,
}

impl From<CliGenerator> for Generator {
    fn from(g: CliGenerator) -> Self {
        match g {
            CliGenerator::Sine => Generator::Sine,
            CliGenerator::Square => Generator::Square,
            CliGenerator::Triangle => Generator::Triangle,
            CliGenerator::Sawtooth => Generator::Sawtooth,
            CliGenerator::Organ => Generator::Organ,
            CliGenerator::Torgan => Generator::Torgan,
        }
    }
}

/// Engine overrides.
#[derive(Args, Debug, Default)]
pub struct SynthArgs {
    /// Waveform generator
    #[arg(short, long, value_enum)]
    pub generator: Option<CliGenerator>,

    /// Mixing gain applied at note-on
    #[arg(long)]
    pub gain: Option<f32>,

    /// Release window in samples
    #[arg(long)]
    pub release: Option<u32>,

    /// Sample rate
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Number of output channels
    #[arg(long)]
    pub channels: Option<u16>,

    /// Buffer size in frames
    #[arg(long)]
    pub buffer_size: Option<u32>,
}

impl SynthArgs {
    /// Overlay the flags that were given onto `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(generator) = self.generator {
            settings.generator = Generator::from(generator).name().to_string();
        }
        if let Some(gain) = self.gain {
            settings.global_gain = gain;
        }
        if let Some(release) = self.release {
            settings.release_samples = release;
        }
        if let Some(sample_rate) = self.sample_rate {
            settings.audio.sample_rate = sample_rate;
        }
        if let Some(channels) = self.channels {
            settings.audio.channels = channels;
        }
        if let Some(buffer_size) = self.buffer_size {
            settings.audio.buffer_size = buffer_size;
        }
    }
}

/// Load the settings file (or defaults), apply overrides and validate.
pub fn load_settings(path: &Path, overrides: &SynthArgs) -> anyhow::Result<Settings> {
    let mut settings = load_or_default(path)?;
    overrides.apply(&mut settings);
    settings.validate()?;
    tracing::debug!(path = %path.display(), generator = %settings.generator, "settings loaded");
    Ok(settings)
}

/// Convert a duration in seconds to a frame count.
pub fn seconds_to_frames(seconds: f32, sample_rate: u32) -> anyhow::Result<usize> {
    if !seconds.is_finite() || seconds < 0.0 {
        anyhow::bail!("duration must be a non-negative number of seconds, got {seconds}");
    }
    Ok((f64::from(seconds) * f64::from(sample_rate)).round() as usize)
}
