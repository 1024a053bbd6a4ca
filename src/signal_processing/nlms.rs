use log::{debug, warn};

use crate::config::CancellerConfig;
use crate::constants::{NLMS_REGULARIZATION, NLMS_STABILITY_LIMIT};
use crate::error::{AncError, Result};

use super::{DelayLine, Filter};

/// Adaptive noise canceller using the normalized LMS algorithm
///
/// Predicts the current delayed-reference sample d(n) = x(n - D) from the
/// last N inputs and returns that prediction. Because the reference is a
/// delayed copy of the input, only the component of the signal that stays
/// correlated across D samples (the tone) is predictable; wideband noise
/// is not, so the prediction is the de-noised signal.
///
/// After each prediction the coefficients take a gradient step scaled by
/// the instantaneous input energy, which keeps the effective step size
/// constant across loud and quiet passages. There is no trained/untrained
/// mode: the estimate improves asymptotically as samples flow through.
///
/// The canceller's history uses linear-shift storage because the update
/// equation needs `state[i]` to pair directly with `taps[i]`; the internal
/// delay line uses the circular FIR engine.
pub struct NlmsCanceller {
    taps: Vec<f32>,
    state: Vec<f32>,
    step_size: f32,
    delay_line: DelayLine,
}

impl NlmsCanceller {
    /// Create a canceller with `filter_length` taps, a reference delay of
    /// `reference_delay` samples, and NLMS step size `step_size`.
    ///
    /// Coefficients and sample history start at zero. Fails fast on a
    /// zero filter length or a non-positive/non-finite step size; a step
    /// size above the classical stability bound of 2.0 is accepted with
    /// a warning.
    pub fn new(filter_length: usize, reference_delay: usize, step_size: f32) -> Result<Self> {
        if filter_length == 0 {
            return Err(AncError::InvalidFilterLength(filter_length));
        }
        if !step_size.is_finite() || step_size <= 0.0 {
            return Err(AncError::InvalidStepSize(step_size));
        }
        if step_size > NLMS_STABILITY_LIMIT {
            warn!(
                "NLMS step size {} exceeds the classical stability bound {}",
                step_size, NLMS_STABILITY_LIMIT
            );
        }

        debug!(
            "NLMS canceller: {} taps, reference delay {}, step size {}",
            filter_length, reference_delay, step_size
        );

        Ok(Self {
            taps: vec![0.0; filter_length],
            state: vec![0.0; filter_length],
            step_size,
            delay_line: DelayLine::new(reference_delay)?,
        })
    }

    /// Create a canceller from a validated configuration.
    pub fn from_config(config: &CancellerConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.filter_length,
            config.reference_delay,
            config.step_size,
        )
    }

    /// Number of adaptive taps.
    pub fn filter_length(&self) -> usize {
        self.taps.len()
    }

    /// Reference delay in samples.
    pub fn reference_delay(&self) -> usize {
        self.delay_line.delay()
    }

    /// Current coefficient vector (updated every sample).
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Process a block of 16-bit samples in place.
    ///
    /// Samples enter the real-valued domain by direct cast, no scaling;
    /// outputs are cast back with saturation at the i16 limits. Internal
    /// state transitions are identical to the f32 path for
    /// equivalent-magnitude inputs.
    pub fn process_buffer_i16(&mut self, buffer: &mut [i16]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample as f32) as i16;
        }
    }
}

impl Filter for NlmsCanceller {
    /// One NLMS step: predict the delayed reference, then adapt.
    fn process(&mut self, sample: f32) -> f32 {
        let n = self.taps.len();

        // Shift the new sample into the pipeline; state[i] = x(n - i).
        self.state.copy_within(0..n - 1, 1);
        self.state[0] = sample;

        let d = self.delay_line.process(sample);

        // Prediction uses the pre-update coefficients.
        let d_hat: f32 = self
            .taps
            .iter()
            .zip(self.state.iter())
            .map(|(&w, &x)| w * x)
            .sum();

        let e = d - d_hat;

        // Instantaneous input energy, regularized so silence cannot
        // produce a zero denominator.
        let energy: f32 = self.state.iter().map(|&x| x * x).sum();
        let gain = self.step_size * e / (energy + NLMS_REGULARIZATION);

        for (w, &x) in self.taps.iter_mut().zip(self.state.iter()) {
            *w += gain * x;
        }

        d_hat
    }
}
