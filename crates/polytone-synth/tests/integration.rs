//! Integration tests for polytone-synth.
//!
//! Tests cover the engine's control surface, voice lifecycles across
//! rendered buffers, normalization, and concurrent control/render access.

use std::sync::Arc;
use std::thread;

use polytone_synth::{
    Generator, NOTE_COUNT, SynthConfig, SynthEngine, SynthError, loudness_curve, midi_to_freq,
    peak,
};

const BLOCK: usize = 128;

fn engine(generator: Generator, sample_rate: u32) -> Arc<SynthEngine> {
    SynthEngine::shared(SynthConfig::new(generator).with_sample_rate(sample_rate)).unwrap()
}

// ---------------------------------------------------------------------------
// 1. Tuning and loudness
// ---------------------------------------------------------------------------

#[test]
fn every_note_follows_equal_temperament() {
    let engine = engine(Generator::Sine, 48000);
    for note in 0..NOTE_COUNT as u8 {
        let expected = 440.0 * 2f32.powf((note as f32 - 69.0) / 12.0);
        let actual = engine.voice(note).unwrap().frequency;
        assert!(
            (actual - expected).abs() / expected < 1e-5,
            "note {note}: {actual} vs {expected}"
        );
    }
    assert_eq!(midi_to_freq(69), 440.0);
}

#[test]
fn loudness_curve_never_increases() {
    for note in 1..NOTE_COUNT as u8 {
        assert!(loudness_curve(note) <= loudness_curve(note - 1));
    }
}

// ---------------------------------------------------------------------------
// 2. Voice lifecycle through rendering
// ---------------------------------------------------------------------------

#[test]
fn play_then_render_one_frame() {
    let engine = engine(Generator::Sine, 44100);
    let mut renderer = engine.renderer();

    engine.play(64, 0.7).unwrap();
    let state = engine.voice(64).unwrap();
    assert_eq!(state.elapsed, 1);
    assert!(!state.released);

    renderer.render(&mut [0.0; 2], 2);
    assert_eq!(engine.voice(64).unwrap().elapsed, 2);
}

#[test]
fn a4_block_is_finite_and_in_range() {
    let engine = engine(Generator::Sine, 44100);
    let mut renderer = engine.renderer();
    engine.play(69, 1.0).unwrap();

    let mut buffer = vec![0.0; BLOCK];
    renderer.render(&mut buffer, 1);

    assert!(buffer.iter().all(|s| s.is_finite()));
    assert!(peak(&buffer) <= 1.0 + 1e-6);
    assert!(peak(&buffer) > 0.0, "A4 should be audible");
}

#[test]
fn released_note_decays_to_silence_and_stays_silent() {
    let engine = engine(Generator::Triangle, 44100);
    let mut renderer = engine.renderer();

    engine.play(60, 1.0).unwrap();
    engine.pause(60).unwrap();
    assert_eq!(engine.voice(60).unwrap().elapsed, 1000);

    let mut buffer = vec![0.0; BLOCK * 2];
    let mut previous = engine.voice(60).unwrap().elapsed;
    let mut blocks = 0;
    while engine.voice(60).unwrap().elapsed > 0 {
        renderer.render(&mut buffer, 2);
        let elapsed = engine.voice(60).unwrap().elapsed;
        assert!(elapsed < previous, "elapsed must fall every block");
        previous = elapsed;
        blocks += 1;
        assert!(blocks < 100, "voice never went silent");
    }
    // 1000 samples at 128 frames per block
    assert_eq!(blocks, 8);

    for _ in 0..4 {
        renderer.render(&mut buffer, 2);
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert_eq!(engine.voice(60).unwrap().elapsed, 0);
    }
    assert_eq!(engine.active_voice_count(), 0);
}

#[test]
fn held_note_decays_without_sustain() {
    let engine = engine(Generator::Sine, 48000);
    let mut renderer = engine.renderer();
    engine.play(69, 1.0).unwrap();

    let mut buffer = vec![0.0; 4800];
    renderer.render(&mut buffer, 1);
    let early = peak(&buffer);

    // Skip ahead a second and a half of held time
    let mut skip = vec![0.0; 72000];
    renderer.render(&mut skip, 1);
    renderer.render(&mut buffer, 1);
    let late = peak(&buffer);

    assert!(late < early * 0.1, "held note should decay: {early} -> {late}");
    assert!(engine.voice(69).unwrap().is_active());
}

#[test]
fn release_swells_before_cutting_off() {
    // The release phase reuses the decay curve with a falling counter, so
    // amplitude rises toward the note-on volume before going silent.
    let engine = SynthEngine::shared(
        SynthConfig::new(Generator::Square)
            .with_sample_rate(1000)
            .with_release_window(1000),
    )
    .unwrap();
    let mut renderer = engine.renderer();
    engine.play(20, 1.0).unwrap();
    engine.pause(20).unwrap();

    let mut buffer = vec![0.0; 100];
    renderer.render(&mut buffer, 1);
    let start = peak(&buffer);
    for _ in 0..8 {
        renderer.render(&mut buffer, 1);
    }
    let end = peak(&buffer);
    assert!(end > start * 5.0, "release should swell: {start} -> {end}");
}

#[test]
fn retrigger_restarts_envelope() {
    let engine = engine(Generator::Organ, 48000);
    let mut renderer = engine.renderer();
    engine.play(48, 1.0).unwrap();
    renderer.render(&mut vec![0.0; 1000], 1);
    assert_eq!(engine.voice(48).unwrap().elapsed, 1001);

    engine.play(48, 0.5).unwrap();
    assert_eq!(engine.voice(48).unwrap().elapsed, 1);
}

// ---------------------------------------------------------------------------
// 3. Normalization
// ---------------------------------------------------------------------------

#[test]
fn full_keyboard_never_clips() {
    for generator in Generator::ALL {
        let engine = engine(generator, 44100);
        let mut renderer = engine.renderer();
        for note in 0..NOTE_COUNT as u8 {
            engine.play(note, 1.0).unwrap();
        }

        let mut buffer = vec![0.0; BLOCK * 2];
        for _ in 0..10 {
            let stats = renderer.render(&mut buffer, 2);
            assert!(
                peak(&buffer) <= 1.0 + 1e-5,
                "{generator} clipped: {}",
                peak(&buffer)
            );
            if stats.was_normalized() {
                assert!((peak(&buffer) - 1.0).abs() < 1e-5);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Control boundary
// ---------------------------------------------------------------------------

#[test]
fn out_of_range_notes_are_rejected() {
    let engine = engine(Generator::Sine, 48000);
    for note in [128u8, 200, 255] {
        assert_eq!(engine.play(note, 1.0), Err(SynthError::NoteOutOfRange(note)));
        assert_eq!(engine.pause(note), Err(SynthError::NoteOutOfRange(note)));
    }
    assert_eq!(engine.active_voice_count(), 0);
}

#[test]
fn independent_engines_do_not_share_state() {
    let a = engine(Generator::Sine, 48000);
    let b = engine(Generator::Sine, 48000);
    a.play(60, 1.0).unwrap();
    a.renderer().render(&mut [0.0; 64], 1);

    assert_eq!(b.voice(60).unwrap().elapsed, 0);
    assert_eq!(b.time(), 0.0);
}

// ---------------------------------------------------------------------------
// 5. Concurrency
// ---------------------------------------------------------------------------

#[test]
fn control_thread_and_render_thread_run_together() {
    let engine = engine(Generator::Torgan, 48000);
    let mut renderer = engine.renderer();

    let control = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for round in 0..200u32 {
                let note = 30 + (round % 60) as u8;
                engine.play(note, 0.9).unwrap();
                if round % 3 == 0 {
                    engine.pause(note).unwrap();
                }
            }
            engine.release_all();
        })
    };

    let mut buffer = vec![0.0; BLOCK * 2];
    for _ in 0..200 {
        renderer.render(&mut buffer, 2);
        assert!(buffer.iter().all(|s| s.is_finite()));
        assert!(peak(&buffer) <= 1.0 + 1e-5);
    }
    control.join().unwrap();

    // Everything was released; 1000-sample windows finish within 8 blocks.
    for _ in 0..8 {
        renderer.render(&mut buffer, 2);
    }
    assert_eq!(engine.active_voice_count(), 0);
}
