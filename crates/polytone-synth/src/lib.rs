//! Polytone Synth - polyphonic synthesis engine
//!
//! This crate turns note-on/note-off events into a continuously rendered
//! signal mixed from up to 128 simultaneous voices, one per MIDI note.
//!
//! # Core Components
//!
//! ## Generators
//!
//! Pure waveform functions of `(frequency, time, amplitude)`:
//!
//! - [`Generator`] - Closed set: sine, square, triangle, sawtooth, organ, torgan
//!
//! ## Voices
//!
//! - [`Voice`] - Per-note state with a lock-free envelope counter
//! - [`VoiceState`] - Snapshot of a voice's fields
//!
//! ## Engine
//!
//! - [`SynthEngine`] - Voice bank, generator, sample rate and clock
//! - [`SynthConfig`] - Construction parameters
//!
//! ## Rendering
//!
//! - [`Renderer`] - The host driver's per-buffer callback
//! - [`BlockStats`] - Peak and normalization gain of a rendered buffer
//!
//! # Threading
//!
//! The engine is shared as `Arc<SynthEngine>`. A control thread calls
//! [`SynthEngine::play`] and [`SynthEngine::pause`] while the audio thread
//! calls [`Renderer::render`]. All shared voice state is atomic; neither
//! side ever blocks.
//!
//! # Example
//!
//! ```rust
//! use polytone_synth::{Generator, SynthConfig, SynthEngine};
//!
//! let engine = SynthEngine::shared(
//!     SynthConfig::new(Generator::Torgan).with_sample_rate(44100),
//! )
//! .unwrap();
//! let mut renderer = engine.renderer();
//!
//! // Play a chord
//! engine.play(60, 1.0).unwrap(); // C4
//! engine.play(64, 1.0).unwrap(); // E4
//! engine.play(67, 1.0).unwrap(); // G4
//!
//! // Render one stereo block, as the host driver would
//! let mut buffer = vec![0.0; 128 * 2];
//! let stats = renderer.render(&mut buffer, 2);
//! assert!(buffer.iter().all(|s| s.abs() <= 1.0 + 1e-6));
//! assert_eq!(stats.frames, 128);
//!
//! engine.pause(60).unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod generator;
pub mod render;
pub mod voice;

// Re-export main types at crate root
pub use engine::{
    DEFAULT_GLOBAL_GAIN, DEFAULT_RELEASE_WINDOW, DEFAULT_SAMPLE_RATE, SynthConfig, SynthEngine,
};
pub use error::{Result, SynthError};
pub use generator::Generator;
pub use render::{BlockStats, Renderer, apply_peak_gain, normalize_peak, peak};
pub use voice::{
    DECAY_RATE, NOTE_COUNT, Voice, VoiceState, damp, loudness_curve, midi_to_freq,
};
