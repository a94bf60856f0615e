//! Error types for the synthesis engine.

use thiserror::Error;

/// Errors raised at the engine's control boundary.
///
/// The render path never fails; these only surface from note events,
/// configuration and sample-rate updates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// Note number outside the MIDI range 0–127.
    #[error("note {0} is outside the MIDI range 0-127")]
    NoteOutOfRange(u8),

    /// Velocity is NaN or infinite.
    #[error("velocity must be finite, got {0}")]
    InvalidVelocity(f32),

    /// Global gain is negative, NaN or infinite.
    #[error("global gain must be a non-negative finite number, got {0}")]
    InvalidGain(f32),

    /// Sample rate of zero reported or configured.
    #[error("sample rate must be non-zero")]
    InvalidSampleRate,

    /// Generator name not in the known set.
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),
}

/// Convenience result type for engine operations.
pub type Result<T> = core::result::Result<T, SynthError>;
