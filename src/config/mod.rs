//! Synthesis configuration and the per-run generation context

mod presets;

pub use presets::{Preset, AURORA, POWDER};

use crate::error::ConfigError;
use serde::Serialize;

/// Global constants for one generated piece.
///
/// Drawn once per run from a [`Preset`] and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisConfig {
    /// Number of additive partials per voice
    pub partial_count: usize,

    /// Fundamental of the piece in Hz
    pub root_frequency: f64,

    /// Spectral roll-off steepness; higher values favor low harmonics
    pub bass_boost: f64,

    /// Global rate scale for modulators, compressor release, and track length
    pub tempo: f64,

    /// Frequency multipliers for the three voices
    pub chord_ratios: [f64; 3],

    /// Log2 lower bound for filter resonance
    pub tonal_floor: f64,

    /// Log2 span for filter resonance above the floor
    pub tonal_range: f64,

    /// Exponent compensating narrow resonances with extra gain
    pub tonal_boost: f64,

    /// Candidate modulator rates, scaled by tempo
    pub rhythm_frequencies: Vec<f64>,

    /// Track length in seconds
    pub track_duration: f64,

    /// Output gain curve applied across each voice, if any
    pub voice_envelope: Option<Vec<f64>>,
}

impl SynthesisConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partial_count < 1 {
            return Err(ConfigError::PartialCount {
                count: self.partial_count,
            });
        }
        if !self.root_frequency.is_finite() || self.root_frequency <= 0.0 {
            return Err(ConfigError::RootFrequency {
                freq: self.root_frequency,
            });
        }
        for ratio in &self.chord_ratios {
            if !ratio.is_finite() || *ratio <= 0.0 {
                return Err(ConfigError::ChordRatio { ratio: *ratio });
            }
        }
        if !self.tempo.is_finite() || self.tempo <= 0.0 {
            return Err(ConfigError::Tempo { tempo: self.tempo });
        }
        if self.tonal_range < 0.0 {
            return Err(ConfigError::TonalRange {
                range: self.tonal_range,
            });
        }
        if !self.track_duration.is_finite() || self.track_duration <= 0.0 {
            return Err(ConfigError::TrackDuration {
                duration: self.track_duration,
            });
        }
        if self.rhythm_frequencies.is_empty() {
            return Err(ConfigError::EmptyRhythmSet);
        }
        Ok(())
    }
}

/// Per-run context threaded through generation, graph building, and rendering.
///
/// Built once per piece; nothing in the pipeline reaches for process-wide
/// state beyond what this value carries.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub config: SynthesisConfig,
    pub sample_rate: u32,
}

impl GenerationContext {
    /// Create a context, rejecting invalid configurations
    pub fn new(config: SynthesisConfig, sample_rate: u32) -> Result<Self, ConfigError> {
        if sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        config.validate()?;
        Ok(Self {
            config,
            sample_rate,
        })
    }

    /// Stereo frame count of the rendered track
    pub fn track_frames(&self) -> usize {
        (self.sample_rate as f64 * self.config.track_duration).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SynthesisConfig {
        SynthesisConfig {
            partial_count: 32,
            root_frequency: 100.0,
            bass_boost: 0.9,
            tempo: 0.3,
            chord_ratios: [1.0, 1.5, 2.5],
            tonal_floor: 4.0,
            tonal_range: 8.0,
            tonal_boost: 1.0,
            rhythm_frequencies: vec![1.0, 2.0, 4.0],
            track_duration: 7.2,
            voice_envelope: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_zero_partials_rejected() {
        let mut config = test_config();
        config.partial_count = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PartialCount { count: 0 })
        );
    }

    #[test]
    fn test_nonpositive_root_rejected() {
        let mut config = test_config();
        config.root_frequency = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RootFrequency { .. })
        ));

        config.root_frequency = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RootFrequency { .. })
        ));
    }

    #[test]
    fn test_empty_rhythm_set_rejected() {
        let mut config = test_config();
        config.rhythm_frequencies.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyRhythmSet));
    }

    #[test]
    fn test_context_rejects_zero_sample_rate() {
        assert_eq!(
            GenerationContext::new(test_config(), 0).unwrap_err(),
            ConfigError::SampleRate
        );
    }

    #[test]
    fn test_track_frames_rounds() {
        let mut config = test_config();
        config.track_duration = 1.00001;
        let context = GenerationContext::new(config, 44100).unwrap();
        assert_eq!(context.track_frames(), 44100);

        let mut config = test_config();
        config.track_duration = 7.2;
        let context = GenerationContext::new(config, 44100).unwrap();
        assert_eq!(context.track_frames(), 317_520);
    }
}
