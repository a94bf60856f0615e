//! Criterion benchmarks for polytone-synth components
//!
//! Run with: cargo bench -p polytone-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use polytone_synth::{Generator, SynthConfig, SynthEngine};

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

// ============================================================================
// Generator benchmarks
// ============================================================================

fn bench_generators(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generator");
    let period = 1.0 / f64::from(SAMPLE_RATE);

    for generator in Generator::ALL {
        for &block_size in BLOCK_SIZES {
            group.bench_with_input(
                BenchmarkId::new(generator.name(), block_size),
                &block_size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for i in 0..size {
                            sum += generator.generate(440.0, i as f64 * period, 0.8);
                        }
                        black_box(sum)
                    })
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Render benchmarks
// ============================================================================

fn bench_render_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("Render");

    for &voices in &[0usize, 1, 8, 32, 128] {
        let engine = SynthEngine::shared(
            SynthConfig::new(Generator::Organ).with_sample_rate(SAMPLE_RATE),
        )
        .unwrap();
        let mut renderer = engine.renderer();
        let mut buffer = vec![0.0f32; 128 * 2];

        group.bench_with_input(BenchmarkId::new("voices", voices), &voices, |b, &n| {
            b.iter(|| {
                // Retrigger so voices never decay out of the measurement
                for note in 0..n {
                    engine.play(note as u8, 1.0).unwrap();
                }
                black_box(renderer.render(&mut buffer, 2))
            })
        });
    }

    group.finish();
}

fn bench_render_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Render_BlockSize");

    for &block_size in BLOCK_SIZES {
        let engine = SynthEngine::shared(
            SynthConfig::new(Generator::Torgan).with_sample_rate(SAMPLE_RATE),
        )
        .unwrap();
        let mut renderer = engine.renderer();
        let mut buffer = vec![0.0f32; block_size * 2];

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    for note in [48u8, 52, 55, 60, 64, 67] {
                        engine.play(note, 0.8).unwrap();
                    }
                    black_box(renderer.render(&mut buffer, 2))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generators,
    bench_render_polyphony,
    bench_render_block_sizes
);
criterion_main!(benches);
