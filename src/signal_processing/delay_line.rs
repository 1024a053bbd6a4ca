use crate::error::Result;

use super::{Filter, FirFilter};

/// Integer-sample delay line
///
/// A FIR filter of length D+1 whose only non-zero tap is a unit tap at
/// index D, so `process(x)` returns the sample presented D calls earlier.
/// The first D outputs are 0 (startup transient).
///
/// Used by the canceller to synthesize the decorrelated reference signal
/// d(n) = x(n - D): far enough removed to be useless for predicting the
/// wideband noise, yet still a copy of the same underlying tone.
pub struct DelayLine {
    filter: FirFilter,
}

impl DelayLine {
    /// Create a delay line of `delay` samples. `delay` of 0 passes the
    /// input through unchanged.
    pub fn new(delay: usize) -> Result<Self> {
        let mut taps = vec![0.0; delay + 1];
        taps[delay] = 1.0;
        Ok(Self {
            filter: FirFilter::new(&taps)?,
        })
    }

    /// The configured delay in samples.
    pub fn delay(&self) -> usize {
        self.filter.num_taps() - 1
    }
}

impl Filter for DelayLine {
    fn process(&mut self, sample: f32) -> f32 {
        self.filter.process(sample)
    }
}
