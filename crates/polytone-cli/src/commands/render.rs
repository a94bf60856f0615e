//! Offline render command.

use super::common::{SynthArgs, load_settings, seconds_to_frames};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use polytone_io::{WavSpec, read_wav_info, render_offline_with, write_wav};
use polytone_synth::{BlockStats, SynthEngine, peak};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// MIDI notes to hold (comma separated)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "60,64,67",
        value_parser = clap::value_parser!(u8).range(0..=127)
    )]
    notes: Vec<u8>,

    /// Note-on velocity (defaults to the configured velocity)
    #[arg(short, long)]
    velocity: Option<f32>,

    /// Seconds to hold the notes before releasing them
    #[arg(long, default_value = "1.0")]
    hold: f32,

    /// Seconds to keep rendering after the release
    #[arg(long, default_value = "0.5")]
    tail: f32,

    #[command(flatten)]
    synth: SynthArgs,
}

pub fn run(args: RenderArgs, config_path: &Path) -> anyhow::Result<()> {
    let settings = load_settings(config_path, &args.synth)?;
    let engine = SynthEngine::shared(settings.synth_config()?)?;
    let mut renderer = engine.renderer();

    let sample_rate = engine.sample_rate();
    let channels = usize::from(settings.audio.channels);
    let block_size = settings.audio.buffer_size as usize;
    let velocity = args.velocity.unwrap_or(settings.velocity);
    let hold_frames = seconds_to_frames(args.hold, sample_rate)?;
    let tail_frames = seconds_to_frames(args.tail, sample_rate)?;

    println!(
        "Rendering {} note(s) with {} at {} Hz, {} channel(s)",
        args.notes.len(),
        engine.generator(),
        sample_rate,
        channels
    );

    let pb = ProgressBar::new((hold_frames + tail_frames) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")?
            .progress_chars("##-"),
    );

    let mut normalized = 0usize;
    let mut on_block = |stats: &BlockStats| {
        pb.inc(stats.frames as u64);
        if stats.was_normalized() {
            normalized += 1;
        }
    };

    for &note in &args.notes {
        engine.play(note, velocity)?;
    }
    let mut samples =
        render_offline_with(&mut renderer, hold_frames, channels, block_size, &mut on_block);

    for &note in &args.notes {
        engine.pause(note)?;
    }
    samples.extend(render_offline_with(
        &mut renderer,
        tail_frames,
        channels,
        block_size,
        &mut on_block,
    ));
    pb.finish_with_message("done");

    let spec = WavSpec {
        channels: settings.audio.channels,
        sample_rate,
        bits_per_sample: 32,
    };
    write_wav(&args.output, &samples, spec)?;
    let info = read_wav_info(&args.output)?;

    println!("\nWrote {}", args.output.display());
    println!(
        "  Frames: {} ({:.2} s, {} ch)",
        info.num_frames, info.duration_secs, info.channels
    );
    println!("  Peak: {:.3}", peak(&samples));
    println!("  Normalized blocks: {}", normalized);

    Ok(())
}
