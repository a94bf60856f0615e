//! Stateless waveform generators.
//!
//! Every generator is a pure function of `(frequency, time, amplitude)`.
//! Phase is derived from the absolute render time rather than an
//! accumulator, so a voice can be sampled at any instant without history.
//!
//! With `p = frac(time * frequency)`:
//!
//! ```text
//! square    +a/2 if p < 0.5 else -a/2
//! triangle  (2|2(p - 0.5)| - 1) * a
//! sawtooth  2(p - 0.5) * a/2
//! sine      sin(2π * time * frequency) * a
//! organ     sine(f) + sine(1.5f, a/5) + sine(2f, a/5)
//! torgan    triangle(f) + triangle(1.5f, a/8) + triangle(f/2, a/5)
//! ```

use core::f64::consts::TAU;
use core::fmt;
use core::str::FromStr;

use crate::error::SynthError;

/// Closed set of waveform generators an engine can be built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Generator {
    /// Pure sine, fundamental only.
    #[default]
    Sine,
    /// 50% duty square at half amplitude.
    Square,
    /// Symmetric triangle.
    Triangle,
    /// Rising sawtooth at half amplitude.
    Sawtooth,
    /// Sine fundamental with fifth and octave partials.
    Organ,
    /// Triangle fundamental with fifth and sub-octave partials.
    Torgan,
}

impl Generator {
    /// All generator kinds, in display order.
    pub const ALL: [Generator; 6] = [
        Generator::Sine,
        Generator::Square,
        Generator::Triangle,
        Generator::Sawtooth,
        Generator::Organ,
        Generator::Torgan,
    ];

    /// Stable lowercase name used by config files and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Generator::Sine => "sine",
            Generator::Square => "square",
            Generator::Triangle => "triangle",
            Generator::Sawtooth => "sawtooth",
            Generator::Organ => "organ",
            Generator::Torgan => "torgan",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Generator::Sine => "pure sine tone",
            Generator::Square => "hollow square wave (half amplitude)",
            Generator::Triangle => "soft triangle wave",
            Generator::Sawtooth => "bright sawtooth (half amplitude)",
            Generator::Organ => "sine with fifth and octave partials",
            Generator::Torgan => "triangle with fifth and sub-octave partials",
        }
    }

    /// Produce one sample.
    #[inline]
    pub fn generate(self, frequency: f32, time: f64, amplitude: f32) -> f32 {
        match self {
            Generator::Sine => sine(frequency, time, amplitude),
            Generator::Square => square(frequency, time, amplitude),
            Generator::Triangle => triangle(frequency, time, amplitude),
            Generator::Sawtooth => sawtooth(frequency, time, amplitude),
            Generator::Organ => organ(frequency, time, amplitude),
            Generator::Torgan => torgan(frequency, time, amplitude),
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Generator {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" => Ok(Generator::Sine),
            "square" => Ok(Generator::Square),
            "triangle" => Ok(Generator::Triangle),
            "sawtooth" | "saw" => Ok(Generator::Sawtooth),
            "organ" => Ok(Generator::Organ),
            "torgan" => Ok(Generator::Torgan),
            _ => Err(SynthError::UnknownGenerator(s.to_string())),
        }
    }
}

/// Fractional cycle position in `[0, 1)`.
///
/// Computed in f64: `time` grows without bound and f32 would lose the
/// phase within minutes.
#[inline]
fn phase(frequency: f32, time: f64) -> f32 {
    let cycles = time * f64::from(frequency);
    (cycles - libm::floor(cycles)) as f32
}

/// Square wave at half amplitude.
#[inline]
pub fn square(frequency: f32, time: f64, amplitude: f32) -> f32 {
    if phase(frequency, time) < 0.5 {
        amplitude * 0.5
    } else {
        -amplitude * 0.5
    }
}

/// Triangle wave peaking at `±amplitude`.
#[inline]
pub fn triangle(frequency: f32, time: f64, amplitude: f32) -> f32 {
    let p = phase(frequency, time);
    (2.0 * libm::fabsf(2.0 * (p - 0.5)) - 1.0) * amplitude
}

/// Sawtooth at half amplitude.
#[inline]
pub fn sawtooth(frequency: f32, time: f64, amplitude: f32) -> f32 {
    let p = phase(frequency, time);
    2.0 * (p - 0.5) * amplitude * 0.5
}

/// Sine wave.
#[inline]
pub fn sine(frequency: f32, time: f64, amplitude: f32) -> f32 {
    libm::sin(TAU * time * f64::from(frequency)) as f32 * amplitude
}

/// Sine fundamental plus fifth (1.5x) and octave (2x) at a fifth of the amplitude.
#[inline]
pub fn organ(frequency: f32, time: f64, amplitude: f32) -> f32 {
    sine(frequency, time, amplitude)
        + sine(frequency * 1.5, time, amplitude / 5.0)
        + sine(frequency * 2.0, time, amplitude / 5.0)
}

/// Triangle fundamental plus fifth at an eighth and sub-octave at a fifth of the amplitude.
#[inline]
pub fn torgan(frequency: f32, time: f64, amplitude: f32) -> f32 {
    triangle(frequency, time, amplitude)
        + triangle(frequency * 1.5, time, amplitude / 8.0)
        + triangle(frequency / 2.0, time, amplitude / 5.0)
}
