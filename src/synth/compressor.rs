//! Dynamics compressor
//!
//! Feed-forward compressor with a soft knee and an attack/release-smoothed
//! gain-reduction envelope, plus makeup gain derived from the static curve.
//! The master bus runs one of these in a near-limiting configuration as a
//! safety net over the summed partial gains.

/// Stereo dynamics compressor
pub struct Compressor {
    threshold: f64, // dB
    knee: f64,      // dB
    ratio: f64,
    attack_coeff: f64,
    release_coeff: f64,
    makeup: f64,

    // Smoothed gain reduction in dB
    envelope_db: f64,
}

impl Compressor {
    /// Create a compressor
    ///
    /// `threshold` and `knee` are in dB, `attack` and `release` in seconds.
    pub fn new(
        sample_rate: f64,
        threshold: f64,
        knee: f64,
        ratio: f64,
        attack: f64,
        release: f64,
    ) -> Self {
        let ratio = ratio.clamp(1.0, 20.0);
        let mut compressor = Self {
            threshold,
            knee: knee.max(0.0),
            ratio,
            attack_coeff: smoothing_coeff(attack, sample_rate),
            release_coeff: smoothing_coeff(release, sample_rate),
            makeup: 1.0,
            envelope_db: 0.0,
        };
        // Makeup restores part of the level a full-scale signal would lose
        let full_range_reduction = compressor.reduction_db(0.0);
        compressor.makeup = 10.0_f64.powf(0.6 * full_range_reduction / 20.0);
        compressor
    }

    /// Static gain reduction in dB for an input at `level_db`
    fn reduction_db(&self, level_db: f64) -> f64 {
        let slope = 1.0 - 1.0 / self.ratio;
        let half_knee = self.knee / 2.0;
        let over = level_db - self.threshold;

        if self.knee > 0.0 && over.abs() <= half_knee {
            let x = over + half_knee;
            slope * x * x / (2.0 * self.knee)
        } else if over > 0.0 {
            slope * over
        } else {
            0.0
        }
    }

    /// Compress one stereo frame
    pub fn process(&mut self, frame: [f64; 2]) -> [f64; 2] {
        let peak = frame[0].abs().max(frame[1].abs()).max(1.0e-10);
        let level_db = 20.0 * peak.log10();
        let target = self.reduction_db(level_db);

        // Attack when reduction grows, release when it decays
        let coeff = if target > self.envelope_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope_db = coeff * self.envelope_db + (1.0 - coeff) * target;

        let gain = 10.0_f64.powf(-self.envelope_db / 20.0) * self.makeup;
        [frame[0] * gain, frame[1] * gain]
    }
}

/// One-pole smoothing coefficient; a non-positive time constant is instant
fn smoothing_coeff(seconds: f64, sample_rate: f64) -> f64 {
    if seconds <= 0.0 {
        0.0
    } else {
        (-1.0 / (seconds * sample_rate)).exp()
    }
}
