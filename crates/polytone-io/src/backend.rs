//! Pluggable audio backend abstraction.
//!
//! The [`AudioBackend`] trait is the host-driver boundary: it enumerates
//! output devices and builds pull-based output streams that call back into
//! the synth once per buffer. [`CpalBackend`](crate::CpalBackend) is the
//! default implementation; tests drive the same boundary with an in-process
//! backend that invokes the callback by hand.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  control surface (CLI, ...)  │──── play / pause ───┐
//! └──────────────┬───────────────┘                     ▼
//!                │ SynthStream::start         ┌────────────────┐
//!                ▼                            │  SynthEngine   │
//! ┌──────────────────────────────┐            └────────────────┘
//! │      AudioBackend trait      │                     ▲
//! │ build_output_stream(cb) ─────┼── Renderer::render ─┘
//! └──────────────┬───────────────┘
//!                ▼
//!          CpalBackend / test backend
//! ```
//!
//! The trait uses boxed closures for callbacks rather than generic
//! parameters, keeping it object-safe. Stream handles are type-erased and
//! stop playback on drop.

use crate::{AudioDevice, Result};

/// Preferred buffer size in frames requested from the driver.
pub const DEFAULT_BUFFER_SIZE: u32 = 128;

/// Configuration for building an output stream.
///
/// ## Fields
///
/// - `sample_rate`: Requested sample rate in Hz (default: 48000)
/// - `buffer_size`: Preferred buffer size in frames (default: 128)
/// - `channels`: Number of interleaved output channels (default: 2)
/// - `device_name`: Optional device name filter (uses default device if `None`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Number of audio channels.
    pub channels: u16,
    /// Optional device name (uses system default if `None`).
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: DEFAULT_BUFFER_SIZE,
            channels: 2,
            device_name: None,
        }
    }
}

/// Type-erased audio stream handle.
///
/// The stream is active while this handle exists; dropping it stops
/// playback.
pub struct StreamHandle {
    /// The backend-specific stream object, kept alive via RAII.
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Audio output callback signature.
///
/// Called on the real-time audio thread with a mutable buffer of
/// interleaved f32 samples (`frames * channels` long) that must be fully
/// written. Must not allocate, lock, or perform I/O.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Error callback signature.
///
/// Called when the backend encounters an error during streaming, with a
/// human-readable message.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable audio backend trait.
///
/// Abstracts over platform audio APIs to provide device enumeration and
/// output stream construction. Object-safe: use `&dyn AudioBackend` or
/// `Box<dyn AudioBackend>` for runtime selection.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g., "cpal").
    fn name(&self) -> &str;

    /// List all available output devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// Get the default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Build and start an output stream.
    ///
    /// The returned [`StreamHandle`] keeps the stream alive. Dropping it
    /// stops playback.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;

    /// The sample rate the backend will actually run `config` at.
    ///
    /// Default implementation returns the requested rate unchanged.
    fn actual_sample_rate(&self, config: &BackendStreamConfig) -> u32 {
        config.sample_rate
    }
}
