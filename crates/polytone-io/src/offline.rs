//! Offline rendering: drive a [`Renderer`] without an audio device.
//!
//! Audio is produced in fixed-size blocks exactly as a host driver would
//! request it, so per-buffer normalization behaves the same as live output.

use polytone_synth::{BlockStats, Renderer};

/// Render `frames` frames of `channels`-channel audio in `block_size`-frame blocks.
///
/// Returns the interleaved samples.
pub fn render_offline(
    renderer: &mut Renderer,
    frames: usize,
    channels: usize,
    block_size: usize,
) -> Vec<f32> {
    render_offline_with(renderer, frames, channels, block_size, |_| {})
}

/// Like [`render_offline`], calling `on_block` after every rendered block.
///
/// A `block_size` of zero is treated as one frame.
pub fn render_offline_with<F>(
    renderer: &mut Renderer,
    frames: usize,
    channels: usize,
    block_size: usize,
    mut on_block: F,
) -> Vec<f32>
where
    F: FnMut(&BlockStats),
{
    let mut output = vec![0.0; frames * channels];
    if channels == 0 {
        return output;
    }

    let block_len = block_size.max(1) * channels;
    for block in output.chunks_mut(block_len) {
        let stats = renderer.render(block, channels);
        on_block(&stats);
    }
    output
}
