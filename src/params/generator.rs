//! Drawing the parameters of a piece
//!
//! Everything random happens here: the global constants, the per-partial
//! tuples, each partial's single modulator, and the shared noise bed. The
//! graph builder downstream consumes these values without drawing anything.

use super::RandomSource;
use crate::config::{Preset, SynthesisConfig};
use crate::synth::{SampleBuffer, Waveform};
use serde::Serialize;

/// Which snowflake parameter a modulator drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModTarget {
    Pan,
    Gain,
    Resonance,
}

/// A low-rate oscillator-with-gain driving one snowflake parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModulatorSpec {
    pub target: ModTarget,
    pub waveform: Waveform,
    /// Rate in Hz; a rhythm value raised to a random sign, scaled by tempo
    pub frequency: f64,
    /// Peak excursion added to the target parameter
    pub depth: f64,
}

/// One additive-synthesis component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partial {
    /// Amplitude weight, falling with harmonic index
    pub gain: f64,
    /// Stereo position in [0, 1]
    pub pan: f64,
    /// Center frequency in Hz, a harmonic multiple of the voice root
    pub frequency: f64,
    /// Filter resonance, log-uniform over the tonal range
    pub q: f64,
    /// The single modulator attached to this partial's snowflake
    pub modulator: ModulatorSpec,
}

/// One harmonic layer: partials over a shared root, plus an optional
/// output envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Voice {
    pub root_frequency: f64,
    pub partials: Vec<Partial>,
    /// Gain curve applied across the track duration, if any
    pub envelope: Option<Vec<f64>>,
}

const MOD_TARGETS: [ModTarget; 3] = [ModTarget::Pan, ModTarget::Gain, ModTarget::Resonance];
const MOD_WAVEFORMS: [Waveform; 4] = [
    Waveform::Sine,
    Waveform::Square,
    Waveform::Saw,
    Waveform::Triangle,
];
// Two downward draws for every upward one keeps most modulators sub-tempo
const MOD_SIGNS: [f64; 3] = [1.0, -1.0, -1.0];

/// Draw the global constants of a piece from a preset
pub fn generate_config<R: RandomSource>(preset: &Preset, rng: &mut R) -> SynthesisConfig {
    let root_frequency = *rng.choose(preset.root_frequencies);
    let chord_ratios = *rng.choose(preset.chords);
    let tempo = rng.range(preset.tempo_range.0, preset.tempo_range.1);

    SynthesisConfig {
        partial_count: preset.partial_count,
        root_frequency,
        bass_boost: preset.bass_boost,
        tempo,
        chord_ratios,
        tonal_floor: preset.tonal_floor,
        tonal_range: preset.tonal_range,
        tonal_boost: preset.tonal_boost,
        rhythm_frequencies: preset.rhythm_frequencies.to_vec(),
        track_duration: tempo * preset.duration_beats,
        voice_envelope: preset.voice_envelope.map(|e| e.to_vec()),
    }
}

/// Draw the partial set of one voice rooted at `root_frequency`
pub fn generate_partials<R: RandomSource>(
    root_frequency: f64,
    config: &SynthesisConfig,
    rng: &mut R,
) -> Vec<Partial> {
    (1..=config.partial_count)
        .map(|i| {
            let gain = rng.next_unit() / (i as f64).powf(1.0 + config.bass_boost);
            let pan = rng.next_unit();
            let frequency = root_frequency * i as f64;
            let q = (rng.next_unit() * config.tonal_range + config.tonal_floor).exp2();
            let modulator = generate_modulator(gain, q, config, rng);
            Partial {
                gain,
                pan,
                frequency,
                q,
                modulator,
            }
        })
        .collect()
}

/// Draw the one modulator attached to a snowflake
fn generate_modulator<R: RandomSource>(
    gain: f64,
    q: f64,
    config: &SynthesisConfig,
    rng: &mut R,
) -> ModulatorSpec {
    let target = *rng.choose(&MOD_TARGETS);
    let waveform = *rng.choose(&MOD_WAVEFORMS);
    let rate = *rng.choose(&config.rhythm_frequencies);
    let sign = *rng.choose(&MOD_SIGNS);
    let frequency = rate.powf(sign) * config.tempo;

    let depth = match target {
        ModTarget::Pan => rng.next_unit() * 2.0,
        ModTarget::Gain => gain * q / rng.next_unit().exp2(),
        ModTarget::Resonance => q / (rng.next_unit() * 0.5).exp2(),
    };

    ModulatorSpec {
        target,
        waveform,
        frequency,
        depth,
    }
}

/// Draw the three voices of a piece, one per chord ratio
pub fn generate_voices<R: RandomSource>(config: &SynthesisConfig, rng: &mut R) -> Vec<Voice> {
    config
        .chord_ratios
        .iter()
        .map(|ratio| {
            let root = config.root_frequency * ratio;
            Voice {
                root_frequency: root,
                partials: generate_partials(root, config, rng),
                envelope: config.voice_envelope.clone(),
            }
        })
        .collect()
}

/// Generate the white-noise excitation buffer shared by every voice
pub fn generate_noise<R: RandomSource>(
    duration: f64,
    sample_rate: u32,
    rng: &mut R,
) -> SampleBuffer {
    let frames = (duration * sample_rate as f64) as usize;
    let samples: Vec<f32> = (0..frames)
        .map(|_| (rng.next_unit() * 2.0 - 1.0) as f32)
        .collect();
    SampleBuffer::mono(samples, sample_rate)
}
