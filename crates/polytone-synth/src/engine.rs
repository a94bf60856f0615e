//! The shared synthesis engine.
//!
//! [`SynthEngine`] owns one [`Voice`] per MIDI note, the generator chosen at
//! construction, the host's current sample rate and the render clock. It is
//! shared as `Arc<SynthEngine>` between the control surface (which calls
//! [`play`](SynthEngine::play) / [`pause`](SynthEngine::pause)) and the
//! host driver (which drives a [`Renderer`]). Nothing here blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::error::{Result, SynthError};
use crate::generator::Generator;
use crate::render::Renderer;
use crate::voice::{NOTE_COUNT, Voice, VoiceState, loudness_curve};

/// Default mixing gain applied to every note-on.
pub const DEFAULT_GLOBAL_GAIN: f32 = 0.5;

/// Default release window in samples.
pub const DEFAULT_RELEASE_WINDOW: u32 = 1000;

/// Default sample rate until the host reports its own.
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Engine construction parameters.
///
/// ## Fields
///
/// - `generator`: waveform for every voice (default: sine)
/// - `sample_rate`: initial sample rate in Hz, replaced by the host's (default: 48000)
/// - `global_gain`: mixing gain applied at note-on (default: 0.5)
/// - `release_window`: samples a released note counts down from (default: 1000)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    /// Waveform generator.
    pub generator: Generator,
    /// Initial sample rate in Hz.
    pub sample_rate: u32,
    /// Gain applied to every note-on volume.
    pub global_gain: f32,
    /// Release countdown length in samples.
    pub release_window: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            generator: Generator::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            global_gain: DEFAULT_GLOBAL_GAIN,
            release_window: DEFAULT_RELEASE_WINDOW,
        }
    }
}

impl SynthConfig {
    /// Default configuration with the given generator.
    pub fn new(generator: Generator) -> Self {
        Self {
            generator,
            ..Self::default()
        }
    }

    /// Set the initial sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the note-on mixing gain.
    pub fn with_global_gain(mut self, gain: f32) -> Self {
        self.global_gain = gain;
        self
    }

    /// Set the release window in samples.
    pub fn with_release_window(mut self, samples: u32) -> Self {
        self.release_window = samples;
        self
    }
}

/// Polyphonic engine with a fixed bank of 128 voices.
///
/// # Example
///
/// ```rust
/// use polytone_synth::{Generator, SynthConfig, SynthEngine};
///
/// let engine = SynthEngine::shared(SynthConfig::new(Generator::Organ)).unwrap();
/// let mut renderer = engine.renderer();
///
/// engine.play(60, 0.8).unwrap();
/// let mut buffer = vec![0.0; 128 * 2];
/// renderer.render(&mut buffer, 2);
/// engine.pause(60).unwrap();
/// ```
#[derive(Debug)]
pub struct SynthEngine {
    voices: [Voice; NOTE_COUNT],
    generator: Generator,
    global_gain: f32,
    release_window: u32,
    sample_rate: AtomicU32,
    /// Rendered seconds as `f64` bits. Written only by the renderer.
    time: AtomicU64,
}

impl SynthEngine {
    /// Build an engine from `config`.
    pub fn new(config: SynthConfig) -> Result<Self> {
        if config.sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate);
        }
        if !config.global_gain.is_finite() || config.global_gain < 0.0 {
            return Err(SynthError::InvalidGain(config.global_gain));
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            generator = config.generator.name(),
            sample_rate = config.sample_rate,
            global_gain = config.global_gain,
            release_window = config.release_window,
            "synth engine created"
        );

        Ok(Self {
            voices: core::array::from_fn(|note| Voice::new(note as u8)),
            generator: config.generator,
            global_gain: config.global_gain,
            release_window: config.release_window,
            sample_rate: AtomicU32::new(config.sample_rate),
            time: AtomicU64::new(0.0f64.to_bits()),
        })
    }

    /// Build an engine ready to share between control and render threads.
    pub fn shared(config: SynthConfig) -> Result<Arc<Self>> {
        Self::new(config).map(Arc::new)
    }

    /// Create the render side for this engine.
    ///
    /// Only one renderer should drive an engine at a time; two would both
    /// advance every voice and the clock.
    pub fn renderer(self: &Arc<Self>) -> Renderer {
        Renderer::new(Arc::clone(self))
    }

    /// Note-on: start (or retrigger) `note` at `velocity`.
    ///
    /// Volume is `velocity * loudness_curve(note) * global_gain`. Velocity
    /// is not clamped, but it and the resulting volume must be finite.
    pub fn play(&self, note: u8, velocity: f32) -> Result<()> {
        let voice = self.voice_for(note)?;
        let volume = velocity * loudness_curve(note) * self.global_gain;
        if !volume.is_finite() {
            #[cfg(feature = "tracing")]
            tracing::warn!(note, velocity, "rejected note-on with non-finite volume");
            return Err(SynthError::InvalidVelocity(velocity));
        }

        voice.trigger(volume);
        #[cfg(feature = "tracing")]
        tracing::trace!(note, velocity, "note on");
        Ok(())
    }

    /// Note-off: move `note` into its release phase.
    ///
    /// Valid on a voice that never played; it releases from silence.
    pub fn pause(&self, note: u8) -> Result<()> {
        let voice = self.voice_for(note)?;
        voice.release(self.release_window);
        #[cfg(feature = "tracing")]
        tracing::trace!(note, "note off");
        Ok(())
    }

    /// Release every voice that is still held.
    pub fn release_all(&self) {
        for voice in &self.voices {
            if voice.is_active() && !voice.is_released() {
                voice.release(self.release_window);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("all notes released");
    }

    /// Record the sample rate the host is running at.
    ///
    /// Takes effect from the next rendered buffer.
    pub fn set_sample_rate(&self, sample_rate: u32) -> Result<()> {
        if sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate);
        }
        let _previous = self.sample_rate.swap(sample_rate, Ordering::Release);
        #[cfg(feature = "tracing")]
        if _previous != sample_rate {
            tracing::info!(from = _previous, to = sample_rate, "sample rate changed");
        }
        Ok(())
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::Acquire)
    }

    /// Generator every voice renders with.
    pub fn generator(&self) -> Generator {
        self.generator
    }

    /// Gain applied at note-on.
    pub fn global_gain(&self) -> f32 {
        self.global_gain
    }

    /// Release countdown length in samples.
    pub fn release_window(&self) -> u32 {
        self.release_window
    }

    /// Seconds of audio rendered so far.
    pub fn time(&self) -> f64 {
        f64::from_bits(self.time.load(Ordering::Acquire))
    }

    /// Snapshot of the voice for `note`, or `None` if out of range.
    pub fn voice(&self, note: u8) -> Option<VoiceState> {
        self.voices.get(note as usize).map(Voice::state)
    }

    /// The whole voice bank, indexed by note number.
    pub fn voices(&self) -> &[Voice; NOTE_COUNT] {
        &self.voices
    }

    /// Number of voices currently contributing to the mix.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub(crate) fn store_time(&self, time: f64) {
        self.time.store(time.to_bits(), Ordering::Release);
    }

    fn voice_for(&self, note: u8) -> Result<&Voice> {
        match self.voices.get(note as usize) {
            Some(voice) => Ok(voice),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(note, "rejected out-of-range note");
                Err(SynthError::NoteOutOfRange(note))
            }
        }
    }
}
