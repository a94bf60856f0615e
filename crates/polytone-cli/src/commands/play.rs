//! Live playback command.
//!
//! Opens the output device and turns stdin lines into note events:
//!
//! ```text
//! on <note> [velocity]   start a note
//! off <note>             release a note
//! panic                  release everything
//! quit                   release everything and exit
//! ```

use super::common::{SynthArgs, load_settings};
use clap::Args;
use polytone_io::{BackendStreamConfig, CpalBackend, SynthStream};
use polytone_synth::SynthEngine;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

/// How often the control loop checks for Ctrl+C.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Args)]
pub struct PlayArgs {
    /// Play these MIDI notes (comma separated) instead of reading stdin
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_parser = clap::value_parser!(u8).range(0..=127)
    )]
    notes: Vec<u8>,

    /// Seconds to hold `--notes` before releasing them
    #[arg(long, default_value = "1.0")]
    hold: f32,

    /// Note-on velocity (defaults to the configured velocity)
    #[arg(short, long)]
    velocity: Option<f32>,

    /// Output device name (partial match)
    #[arg(short, long)]
    device: Option<String>,

    #[command(flatten)]
    synth: SynthArgs,
}

/// One parsed line of stdin.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NoteCommand {
    On { note: u8, velocity: Option<f32> },
    Off { note: u8 },
    Panic,
    Quit,
}

/// Parse a control line. Blank lines and `#` comments yield `None`.
fn parse_command(line: &str) -> Result<Option<NoteCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    if verb.starts_with('#') {
        return Ok(None);
    }

    let parse_note = |word: Option<&str>| -> Result<u8, String> {
        let word = word.ok_or_else(|| format!("'{verb}' needs a note number"))?;
        word.parse()
            .map_err(|_| format!("invalid note '{word}' (expected 0-127)"))
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "on" => {
            let note = parse_note(words.next())?;
            let velocity = words
                .next()
                .map(|v| {
                    v.parse::<f32>()
                        .map_err(|_| format!("invalid velocity '{v}'"))
                })
                .transpose()?;
            NoteCommand::On { note, velocity }
        }
        "off" => NoteCommand::Off {
            note: parse_note(words.next())?,
        },
        "panic" => NoteCommand::Panic,
        "quit" | "exit" => NoteCommand::Quit,
        other => return Err(format!("unknown command '{other}'")),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument '{extra}'"));
    }
    Ok(Some(command))
}

pub fn run(args: PlayArgs, config_path: &Path) -> anyhow::Result<()> {
    let mut settings = load_settings(config_path, &args.synth)?;
    if let Some(device) = args.device.clone() {
        settings.audio.device = Some(device);
    }
    let velocity = args.velocity.unwrap_or(settings.velocity);

    let engine = SynthEngine::shared(settings.synth_config()?)?;
    let backend = CpalBackend::new();
    let config = BackendStreamConfig {
        sample_rate: settings.audio.sample_rate,
        buffer_size: settings.audio.buffer_size,
        channels: settings.audio.channels,
        device_name: settings.audio.device.clone(),
    };
    let stream = SynthStream::start(&backend, Arc::clone(&engine), config)?;

    println!("Playing {} synth", engine.generator());
    println!(
        "  Output: {}",
        settings.audio.device.as_deref().unwrap_or("default")
    );
    println!("  Sample rate: {} Hz", stream.sample_rate());
    println!("  Buffer size: {} frames", settings.audio.buffer_size);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    if args.notes.is_empty() {
        println!("\nCommands: on <note> [velocity], off <note>, panic, quit");
        println!("Press Ctrl+C to stop...\n");
        control_loop(&engine, velocity, &running);
    } else {
        for &note in &args.notes {
            engine.play(note, velocity)?;
        }
        let hold = Duration::try_from_secs_f32(args.hold)
            .map_err(|_| anyhow::anyhow!("invalid hold time: {}", args.hold))?;
        wait(hold, &running);
    }

    engine.release_all();
    wait(release_time(&engine), &running);
    stream.stop();
    Ok(())
}

/// Read commands from stdin until `quit`, end of input or Ctrl+C.
fn control_loop(engine: &SynthEngine, default_velocity: f32, running: &AtomicBool) {
    // stdin blocks, so it gets its own thread and the loop below stays
    // responsive to Ctrl+C.
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    while running.load(Ordering::SeqCst) {
        let line = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let result = match parse_command(&line) {
            Ok(Some(NoteCommand::On { note, velocity })) => engine
                .play(note, velocity.unwrap_or(default_velocity))
                .map_err(|e| e.to_string()),
            Ok(Some(NoteCommand::Off { note })) => engine.pause(note).map_err(|e| e.to_string()),
            Ok(Some(NoteCommand::Panic)) => {
                engine.release_all();
                Ok(())
            }
            Ok(Some(NoteCommand::Quit)) => break,
            Ok(None) => Ok(()),
            Err(message) => Err(message),
        };

        if let Err(message) = result {
            eprintln!("error: {message}");
        }
    }
}

/// Time for a released voice to count down to silence, plus one buffer.
fn release_time(engine: &SynthEngine) -> Duration {
    let samples = f64::from(engine.release_window()) + 128.0;
    Duration::from_secs_f64(samples / f64::from(engine.sample_rate()))
}

/// Sleep for `duration`, returning early on Ctrl+C.
fn wait(duration: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + duration;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
