//! Audio I/O layer for polytone.
//!
//! This crate is the host-driver side of the synth:
//!
//! - **Backends**: [`AudioBackend`] trait and the cpal-based [`CpalBackend`]
//! - **Live output**: [`SynthStream`] registers an engine's render callback
//!   with a backend at a preferred 128-frame buffer size
//! - **Devices**: [`list_devices`] and [`default_output_device`]
//! - **Offline**: [`render_offline`] plus [`write_wav`] for rendering to files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polytone_io::{BackendStreamConfig, CpalBackend, SynthStream};
//! use polytone_synth::{Generator, SynthConfig, SynthEngine};
//!
//! let engine = SynthEngine::shared(SynthConfig::new(Generator::Organ))?;
//! let stream = SynthStream::start(&CpalBackend::new(), engine.clone(), BackendStreamConfig::default())?;
//!
//! engine.play(60, 0.9)?;
//! std::thread::sleep(std::time::Duration::from_millis(500));
//! engine.pause(60)?;
//! ```

pub mod backend;
pub mod cpal_backend;
mod device;
mod offline;
mod stream;
mod wav;

pub use backend::{
    AudioBackend, BackendStreamConfig, DEFAULT_BUFFER_SIZE, ErrorCallback, OutputCallback,
    StreamHandle,
};
pub use cpal_backend::CpalBackend;
pub use device::{AudioDevice, default_output_device, list_devices};
pub use offline::{render_offline, render_offline_with};
pub use stream::SynthStream;
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The engine rejected a value reported by the backend.
    #[error("Synth error: {0}")]
    Synth(#[from] polytone_synth::SynthError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
