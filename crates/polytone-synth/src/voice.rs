//! Per-note voice state.
//!
//! A [`Voice`] exists for every MIDI note and lives as long as its engine.
//! Its pitch is fixed at construction; only the dynamic fields change:
//!
//! - `volume`: base amplitude chosen at note-on
//! - `elapsed`: sample counter, rising while held and falling while released
//! - `released`: held vs releasing phase
//!
//! ## Envelope
//!
//! ```text
//! amplitude = volume * exp(-elapsed * 2.5 / sample_rate)
//! ```
//!
//! While held, `elapsed` climbs and the note decays like a plucked string;
//! there is no sustain plateau. After release, `elapsed` counts down from
//! the release window, so the same curve swells back toward `volume` until
//! the counter hits zero and the voice cuts to silence.
//!
//! ## Threading
//!
//! Every dynamic field is an atomic. The control thread owns `volume`,
//! `released` and restarts of `elapsed`; the render thread advances
//! `elapsed` with compare-and-swap, so a restart landing mid-frame is never
//! overwritten by a stale increment. Cross-field reads may be torn for one
//! frame, which is inaudible.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::generator::Generator;

/// Number of voices in a bank, one per MIDI note.
pub const NOTE_COUNT: usize = 128;

/// Envelope decay constant, in units of "per second of counter travel".
pub const DECAY_RATE: f32 = 2.5;

/// A single note's synthesis state.
#[derive(Debug)]
pub struct Voice {
    note: u8,
    frequency: f32,
    /// `f32` bits.
    volume: AtomicU32,
    elapsed: AtomicU32,
    released: AtomicBool,
}

/// Point-in-time copy of a voice's fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceState {
    /// MIDI note number.
    pub note: u8,
    /// Pitch in Hz.
    pub frequency: f32,
    /// Base amplitude from the last note-on.
    pub volume: f32,
    /// Envelope counter in samples.
    pub elapsed: u32,
    /// Whether the voice is in its release phase.
    pub released: bool,
}

impl VoiceState {
    /// Whether the voice contributes to the mix.
    pub fn is_active(&self) -> bool {
        self.elapsed > 0
    }
}

impl Voice {
    /// Create a silent voice for `note`.
    pub fn new(note: u8) -> Self {
        Self {
            note,
            frequency: midi_to_freq(note),
            volume: AtomicU32::new(0.0f32.to_bits()),
            elapsed: AtomicU32::new(0),
            released: AtomicBool::new(false),
        }
    }

    /// MIDI note number.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Pitch in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Base amplitude from the last note-on.
    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }

    /// Envelope counter in samples.
    pub fn elapsed(&self) -> u32 {
        self.elapsed.load(Ordering::Acquire)
    }

    /// Whether the voice is releasing.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Whether the voice contributes to the mix.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.elapsed() > 0
    }

    /// Snapshot all fields.
    pub fn state(&self) -> VoiceState {
        VoiceState {
            note: self.note,
            frequency: self.frequency,
            volume: self.volume(),
            elapsed: self.elapsed(),
            released: self.is_released(),
        }
    }

    /// Enter the held phase with a fresh envelope.
    ///
    /// `elapsed` is published last so the render thread never restarts the
    /// counter before it can see the new volume and phase.
    pub(crate) fn trigger(&self, volume: f32) {
        self.volume.store(volume.to_bits(), Ordering::Relaxed);
        self.released.store(false, Ordering::Release);
        self.elapsed.store(1, Ordering::Release);
    }

    /// Enter the release phase, counting down from `window`.
    pub(crate) fn release(&self, window: u32) {
        self.released.store(true, Ordering::Release);
        self.elapsed.store(window, Ordering::Release);
    }

    /// Advance the envelope one frame and return the voice's sample.
    ///
    /// Returns `None` without touching anything when the voice is silent.
    #[inline]
    pub(crate) fn advance(&self, generator: Generator, time: f64, sample_rate: f32) -> Option<f32> {
        let elapsed = self.step()?;
        let amplitude = damp(self.volume(), elapsed, sample_rate);
        Some(generator.generate(self.frequency, time, amplitude))
    }

    /// Move `elapsed` one sample along its phase, returning the new value.
    #[inline]
    fn step(&self) -> Option<u32> {
        let mut current = self.elapsed.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return None;
            }
            let next = if self.released.load(Ordering::Acquire) {
                current - 1
            } else {
                current.saturating_add(1)
            };
            match self.elapsed.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(next),
                Err(actual) => current = actual,
            }
        }
    }
}

/// Convert MIDI note number to frequency in Hz.
///
/// Uses standard tuning: A4 (note 69) = 440 Hz.
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * libm::powf(2.0, (note as f32 - 69.0) / 12.0)
}

/// Perceptual loudness compensation for a note.
///
/// `-atan(note / 32 - 0.5) + 1.5`: roughly 1.96 at note 0, 1.0 near
/// note 52 and 0.29 at note 127. Non-increasing across the range.
#[inline]
pub fn loudness_curve(note: u8) -> f32 {
    -libm::atanf(note as f32 / 32.0 - 0.5) + 1.5
}

/// Envelope amplitude for a counter position.
#[inline]
pub fn damp(volume: f32, elapsed: u32, sample_rate: f32) -> f32 {
    volume * libm::expf(-(elapsed as f32) * DECAY_RATE / sample_rate)
}
