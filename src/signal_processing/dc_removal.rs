use super::Filter;

/// Stateful DC offset remover using a single-pole IIR high-pass filter.
///
/// A DC bias in recorded PCM otherwise leaks into the canceller's energy
/// estimate and biases the adaptation, so the CLI can run input through
/// this before the canceller.
pub struct DcRemover {
    dc_estimate: f32,
    alpha: f32,
}

impl DcRemover {
    /// Create a new DC remover with the given smoothing factor.
    /// Alpha should be small (e.g., 0.0001) for slow adaptation.
    pub fn new(alpha: f32) -> Self {
        Self {
            dc_estimate: 0.0,
            alpha,
        }
    }

    /// Create a DC remover with a specified cutoff frequency.
    /// Frequencies below cutoff_hz will be attenuated.
    pub fn with_cutoff(sample_rate: f32, cutoff_hz: f32) -> Self {
        let alpha = (2.0 * std::f32::consts::PI * cutoff_hz / sample_rate).min(1.0);
        Self::new(alpha)
    }
}

impl Filter for DcRemover {
    fn process(&mut self, sample: f32) -> f32 {
        self.dc_estimate += self.alpha * (sample - self.dc_estimate);
        sample - self.dc_estimate
    }
}
