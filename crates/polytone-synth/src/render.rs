//! The render callback.
//!
//! A [`Renderer`] is what the host audio driver calls once per output
//! buffer. For each frame it advances every sounding voice exactly once,
//! sums their samples, writes the sum to every channel of the frame and
//! moves the clock forward by one sample period. When the whole buffer is
//! filled, a peak at or above full scale rescales the buffer so its loudest
//! sample lands on exactly 1.0; quieter buffers are left bit-for-bit alone.
//!
//! ## Buffer Layout
//!
//! Interleaved: `[c0 c1 .. cN, c0 c1 .. cN, ...]`, `frames * channels` long.
//! A trailing partial frame is zero-filled.
//!
//! ## Real-Time Safety
//!
//! No allocation, no locks, no I/O, no logging.

use std::sync::Arc;

use crate::engine::SynthEngine;

/// Summary of one rendered buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStats {
    /// Frames written.
    pub frames: usize,
    /// Largest absolute sample before normalization.
    pub peak: f32,
    /// Gain applied by normalization (1.0 when the buffer was left alone).
    pub gain: f32,
}

impl Default for BlockStats {
    fn default() -> Self {
        Self {
            frames: 0,
            peak: 0.0,
            gain: 1.0,
        }
    }
}

impl BlockStats {
    /// Whether the buffer was rescaled.
    pub fn was_normalized(&self) -> bool {
        self.gain != 1.0
    }
}

/// Render side of a [`SynthEngine`].
///
/// Not `Clone`: one renderer per engine keeps the clock and every voice
/// counter advancing once per frame.
#[derive(Debug)]
pub struct Renderer {
    engine: Arc<SynthEngine>,
    time: f64,
}

impl Renderer {
    /// Attach a renderer to `engine`, resuming from its current clock.
    pub fn new(engine: Arc<SynthEngine>) -> Self {
        let time = engine.time();
        Self { engine, time }
    }

    /// The engine this renderer drives.
    pub fn engine(&self) -> &Arc<SynthEngine> {
        &self.engine
    }

    /// Seconds rendered so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Fill `buffer` with `channels` interleaved channels of synthesized audio.
    ///
    /// Every slot is overwritten; prior contents are ignored.
    pub fn render(&mut self, buffer: &mut [f32], channels: usize) -> BlockStats {
        if channels == 0 {
            buffer.fill(0.0);
            return BlockStats::default();
        }

        let engine = &*self.engine;
        let generator = engine.generator();
        let sample_rate = engine.sample_rate();
        let rate = sample_rate as f32;
        let period = 1.0 / f64::from(sample_rate);

        let mut time = self.time;
        let mut peak = 0.0f32;
        let mut frames = 0;

        let mut chunks = buffer.chunks_exact_mut(channels);
        for frame in &mut chunks {
            let mut mixed = 0.0f32;
            for voice in engine.voices() {
                if let Some(sample) = voice.advance(generator, time, rate) {
                    mixed += sample;
                }
            }
            frame.fill(mixed);
            peak = louder(peak, mixed.abs());
            time += period;
            frames += 1;
        }
        chunks.into_remainder().fill(0.0);

        self.time = time;
        engine.store_time(time);

        let gain = apply_peak_gain(buffer, peak);
        BlockStats { frames, peak, gain }
    }
}

/// Running maximum that keeps NaN instead of skipping it.
#[inline]
fn louder(peak: f32, level: f32) -> f32 {
    if level > peak || level.is_nan() { level } else { peak }
}

/// Largest absolute sample in `buffer`, or NaN if any sample is NaN.
#[inline]
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &s| {
        if acc.is_nan() { acc } else { louder(acc, s.abs()) }
    })
}

/// Rescale `buffer` by `1 / peak` if `peak` is at or above full scale.
///
/// A non-finite peak has no usable scale, so the buffer is silenced and
/// the gain is 0.0. Returns the gain applied, 1.0 when the buffer was left
/// untouched.
#[inline]
pub fn apply_peak_gain(buffer: &mut [f32], peak: f32) -> f32 {
    if !peak.is_finite() {
        buffer.fill(0.0);
        return 0.0;
    }
    if peak < 1.0 {
        return 1.0;
    }
    let gain = 1.0 / peak;
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
    gain
}

/// Scan `buffer` for its peak and rescale it if the peak would clip.
///
/// Returns the gain applied.
pub fn normalize_peak(buffer: &mut [f32]) -> f32 {
    let p = peak(buffer);
    apply_peak_gain(buffer, p)
}
