//! The settings file format.

use polytone_synth::{
    DEFAULT_GLOBAL_GAIN, DEFAULT_RELEASE_WINDOW, DEFAULT_SAMPLE_RATE, Generator, SynthConfig,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Synthesizer settings.
///
/// Every field has a default, so a partial (or empty) file is valid.
///
/// # TOML Format
///
/// ```toml
/// generator = "organ"
/// global_gain = 0.5
/// release_samples = 1000
/// velocity = 1.0
///
/// [audio]
/// sample_rate = 48000
/// buffer_size = 128
/// channels = 2
/// device = "pipewire"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Generator name (`sine`, `square`, `triangle`, `sawtooth`, `organ`, `torgan`).
    pub generator: String,

    /// Mixing gain applied at note-on.
    pub global_gain: f32,

    /// Release window in samples.
    pub release_samples: u32,

    /// Velocity used when a note command doesn't give one.
    pub velocity: f32,

    /// Output stream settings.
    pub audio: AudioSettings,
}

/// Output stream settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AudioSettings {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,

    /// Preferred buffer size in frames.
    pub buffer_size: u32,

    /// Number of interleaved output channels.
    pub channels: u16,

    /// Output device name filter; the system default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator: Generator::default().name().to_string(),
            global_gain: DEFAULT_GLOBAL_GAIN,
            release_samples: DEFAULT_RELEASE_WINDOW,
            velocity: 1.0,
            audio: AudioSettings::default(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: 128,
            channels: 2,
            device: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the settings to a TOML file, creating parent directories.
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

    /// Serialize the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The configured generator.
    pub fn generator(&self) -> Result<Generator, ConfigError> {
        Ok(self.generator.parse()?)
    }

    /// Check every field against what the engine and driver accept.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generator()?;

        if !self.global_gain.is_finite() || self.global_gain < 0.0 {
            return Err(ConfigError::invalid(
                "global_gain",
                format!("must be a non-negative number, got {}", self.global_gain),
            ));
        }
        if self.release_samples == 0 {
            return Err(ConfigError::invalid("release_samples", "must be at least 1"));
        }
        if !self.velocity.is_finite() {
            return Err(ConfigError::invalid(
                "velocity",
                format!("must be finite, got {}", self.velocity),
            ));
        }
        if self.audio.sample_rate == 0 {
            return Err(ConfigError::invalid("audio.sample_rate", "must be non-zero"));
        }
        if self.audio.buffer_size == 0 {
            return Err(ConfigError::invalid("audio.buffer_size", "must be at least 1"));
        }
        if self.audio.channels == 0 {
            return Err(ConfigError::invalid("audio.channels", "must be at least 1"));
        }
        Ok(())
    }

    /// Validate and convert into an engine configuration.
    pub fn synth_config(&self) -> Result<SynthConfig, ConfigError> {
        self.validate()?;
        Ok(SynthConfig::new(self.generator()?)
            .with_sample_rate(self.audio.sample_rate)
            .with_global_gain(self.global_gain)
            .with_release_window(self.release_samples))
    }
}
