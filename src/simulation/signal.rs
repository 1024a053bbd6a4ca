use num_complex::Complex32;
use std::f32::consts::PI;

use super::GaussianNoise;

/// How often the oscillator phasor is renormalized to unit magnitude.
const RENORMALIZATION_INTERVAL: u32 = 1024;

/// Numerically controlled oscillator
///
/// Generates in-phase/quadrature sample pairs by rotating a unit phasor
/// each sample. Rotation accumulates rounding error in the phasor
/// magnitude, so it is renormalized periodically.
pub struct Oscillator {
    phasor: Complex32,
    rotation: Complex32,
    samples_since_renormalization: u32,
}

impl Oscillator {
    pub fn new(sample_rate: f32, frequency_hz: f32) -> Self {
        let phase_increment = 2.0 * PI * frequency_hz / sample_rate;
        Self {
            phasor: Complex32::new(1.0, 0.0),
            rotation: Complex32::from_polar(1.0, phase_increment),
            samples_since_renormalization: 0,
        }
    }

    /// Produce the next (in-phase, quadrature) pair. The in-phase
    /// component is a unit-amplitude cosine.
    pub fn next_iq(&mut self) -> (f32, f32) {
        let out = self.phasor;

        self.phasor *= self.rotation;
        self.samples_since_renormalization += 1;
        if self.samples_since_renormalization == RENORMALIZATION_INTERVAL {
            self.phasor /= self.phasor.norm();
            self.samples_since_renormalization = 0;
        }

        (out.re, out.im)
    }
}

/// Test-tone generation parameters.
///
/// Defaults match the canonical test case: a half-scale 200 Hz cosine at
/// 24 kHz for one second with noise variance 0.1.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Output amplitude in [0, 1], applied when scaling to 16-bit PCM
    pub amplitude: f32,
    /// Tone frequency in Hz
    pub frequency_hz: f32,
    /// Sample rate in samples/second
    pub sample_rate: f32,
    /// Signal duration in seconds
    pub duration_secs: f32,
    /// Variance of the additive Gaussian noise
    pub noise_variance: f32,
    /// Noise seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            frequency_hz: 200.0,
            sample_rate: 24000.0,
            duration_secs: 1.0,
            noise_variance: 0.1,
            seed: None,
        }
    }
}

impl ToneConfig {
    pub fn num_samples(&self) -> usize {
        (self.sample_rate * self.duration_secs) as usize
    }
}

/// Parallel streams of a generated test signal.
///
/// `clean` is the unit-amplitude cosine, `noise` the Gaussian samples,
/// and `noisy` their sum; all three have the same length.
pub struct TestSignal {
    pub clean: Vec<f32>,
    pub noise: Vec<f32>,
    pub noisy: Vec<f32>,
}

/// Generate a cosine tone buried in Gaussian noise.
pub fn generate_noisy_cosine(config: &ToneConfig) -> TestSignal {
    let num_samples = config.num_samples();
    let mut oscillator = Oscillator::new(config.sample_rate, config.frequency_hz);
    let mut noise_source = GaussianNoise::new(config.noise_variance, config.seed);

    let mut clean = Vec::with_capacity(num_samples);
    let mut noise = Vec::with_capacity(num_samples);
    let mut noisy = Vec::with_capacity(num_samples);

    for _ in 0..num_samples {
        let (i_value, _) = oscillator.next_iq();
        let noise_value = noise_source.next_sample();

        clean.push(i_value);
        noise.push(noise_value);
        noisy.push(i_value + noise_value);
    }

    TestSignal {
        clean,
        noise,
        noisy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oscillator_amplitude_stays_unit() {
        let mut osc = Oscillator::new(24000.0, 200.0);
        for _ in 0..48000 {
            let (i, q) = osc.next_iq();
            let magnitude = (i * i + q * q).sqrt();
            assert!(
                (magnitude - 1.0).abs() < 1e-3,
                "phasor magnitude drifted to {}",
                magnitude
            );
        }
    }

    #[test]
    fn test_oscillator_frequency() {
        let sample_rate = 24000.0;
        let frequency = 200.0;
        let mut osc = Oscillator::new(sample_rate, frequency);

        // Count positive-going zero crossings of the in-phase output over
        // one second; should match the frequency to within one cycle.
        let mut crossings = 0;
        let mut prev = osc.next_iq().0;
        for _ in 1..(sample_rate as usize) {
            let (i, _) = osc.next_iq();
            if prev < 0.0 && i >= 0.0 {
                crossings += 1;
            }
            prev = i;
        }

        assert!(
            (crossings as f32 - frequency).abs() <= 1.0,
            "expected ~{} cycles, counted {}",
            frequency,
            crossings
        );
    }

    #[test]
    fn test_oscillator_starts_at_cosine_peak() {
        let mut osc = Oscillator::new(24000.0, 200.0);
        let (i, q) = osc.next_iq();
        assert_eq!(i, 1.0);
        assert_eq!(q, 0.0);
    }

    #[test]
    fn test_generated_streams_are_consistent() {
        let config = ToneConfig {
            seed: Some(42),
            ..Default::default()
        };
        let signal = generate_noisy_cosine(&config);

        assert_eq!(signal.clean.len(), config.num_samples());
        assert_eq!(signal.noise.len(), signal.clean.len());
        assert_eq!(signal.noisy.len(), signal.clean.len());

        for i in 0..signal.clean.len() {
            assert_eq!(signal.noisy[i], signal.clean[i] + signal.noise[i]);
        }
    }

    #[test]
    fn test_toml_config_round_trip() {
        let config: ToneConfig = toml::from_str(
            r#"
            frequency_hz = 440.0
            noise_variance = 0.25
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.frequency_hz, 440.0);
        assert_eq!(config.noise_variance, 0.25);
        assert_eq!(config.seed, Some(7));
        // Unspecified fields fall back to defaults.
        assert_eq!(config.sample_rate, 24000.0);
        assert_eq!(config.amplitude, 0.5);
    }
}
