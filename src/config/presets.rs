//! Built-in constant-tuning presets

/// Constant tuning from which a piece's configuration is drawn.
///
/// A preset fixes everything that is not randomized per run: the candidate
/// root notes and chords, the spectral roll-off, the resonance bounds, and
/// the rhythm set feeding the modulators. Fields that need no draw are
/// copied straight into the generated [`SynthesisConfig`](super::SynthesisConfig).
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Preset name as accepted on the command line
    pub name: &'static str,
    /// Number of additive partials per voice
    pub partial_count: usize,
    /// Candidate fundamentals in Hz
    pub root_frequencies: &'static [f64],
    /// Spectral roll-off steepness
    pub bass_boost: f64,
    /// Tempo is drawn uniformly from this range
    pub tempo_range: (f64, f64),
    /// Candidate three-tone ratio triples
    pub chords: &'static [[f64; 3]],
    /// Log2 lower bound for filter resonance
    pub tonal_floor: f64,
    /// Log2 span for filter resonance above the floor
    pub tonal_range: f64,
    /// Exponent compensating narrow resonances with extra gain
    pub tonal_boost: f64,
    /// Candidate modulator rates, scaled by tempo
    pub rhythm_frequencies: &'static [f64],
    /// Track length in beats; seconds = tempo * beats
    pub duration_beats: f64,
    /// Output gain curve applied across each voice, if any
    pub voice_envelope: Option<&'static [f64]>,
}

const CHORDS: &[[f64; 3]] = &[
    [1.0, 5.0 / 3.0, 15.0 / 6.0],
    [5.0 / 4.0, 3.0 / 2.0, 10.0 / 4.0],
    [1.0, 3.0 / 2.0, 10.0 / 4.0],
];

/// Dense, brisk texture; voices run at constant level.
pub const POWDER: Preset = Preset {
    name: "powder",
    partial_count: 32,
    root_frequencies: &[80.0, 100.0, 120.0],
    bass_boost: 0.9,
    tempo_range: (0.25, 0.40),
    chords: CHORDS,
    tonal_floor: 4.0,
    tonal_range: 8.0,
    tonal_boost: 1.0,
    rhythm_frequencies: &[
        1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 4.0, 4.0, 8.0, 3.0, 3.0, 6.0, 6.0,
    ],
    duration_beats: 24.0,
    voice_envelope: None,
};

/// Slower, longer variant; each voice swells in and out over the track.
pub const AURORA: Preset = Preset {
    name: "aurora",
    partial_count: 32,
    root_frequencies: &[80.0, 100.0, 120.0],
    bass_boost: 0.9,
    tempo_range: (0.15, 0.30),
    chords: CHORDS,
    tonal_floor: 4.0,
    tonal_range: 8.0,
    tonal_boost: 1.0,
    rhythm_frequencies: &[1.0, 1.0, 2.0, 2.0, 3.0, 4.0, 6.0, 8.0, 12.0],
    duration_beats: 48.0,
    voice_envelope: Some(&[0.0, 1.0, 0.4, 0.9, 0.0]),
};

static ALL: [Preset; 2] = [POWDER, AURORA];

impl Preset {
    /// All built-in presets
    pub fn all() -> &'static [Preset] {
        &ALL
    }

    /// Look up a preset by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<&'static Preset> {
        Self::all().iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        assert_eq!(Preset::by_name("powder").unwrap().name, "powder");
        assert_eq!(Preset::by_name("AURORA").unwrap().name, "aurora");
        assert!(Preset::by_name("blizzard").is_none());
    }

    #[test]
    fn test_preset_bounds_are_sane() {
        for preset in Preset::all() {
            assert!(preset.partial_count >= 1);
            assert!(!preset.root_frequencies.is_empty());
            assert!(!preset.chords.is_empty());
            assert!(!preset.rhythm_frequencies.is_empty());
            assert!(preset.tempo_range.0 > 0.0);
            assert!(preset.tempo_range.1 >= preset.tempo_range.0);
            assert!(preset.duration_beats > 0.0);
            for chord in preset.chords {
                for ratio in chord {
                    assert!(*ratio > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_envelope_presets_start_and_end_silent() {
        let envelope = AURORA.voice_envelope.unwrap();
        assert_eq!(envelope.first(), Some(&0.0));
        assert_eq!(envelope.last(), Some(&0.0));
    }
}
