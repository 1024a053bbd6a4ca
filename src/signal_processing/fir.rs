use crate::error::{AncError, Result};

use super::Filter;

/// Physical realization of the FIR sample-history buffer
///
/// Both strategies hold the last N input samples and produce identical
/// convolution results; they differ only in how the history is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferStrategy {
    /// Rotating write index with wraparound reads; no data movement per sample.
    #[default]
    Circular,
    /// Samples physically shifted toward the tail each call, so
    /// `state[k]` is always x(n-k) at rest. O(N) data movement per sample.
    LinearShift,
}

/// Fixed-length FIR filter
///
/// Computes each output sample as the inner product of the tap coefficients
/// and the rolling history of past input samples:
/// y(n) = sum over k of taps[k] * x(n-k).
///
/// The tap vector is copied at construction and never resized. The history
/// starts zero-filled, so the first N outputs include a startup transient.
pub struct FirFilter {
    taps: Vec<f32>,
    state: Vec<f32>,
    pos: usize,
    strategy: BufferStrategy,
}

impl FirFilter {
    /// Create a FIR filter with the given tap coefficients and the
    /// production (circular) buffer strategy.
    ///
    /// Fails with `InvalidFilterLength` for an empty tap slice.
    pub fn new(taps: &[f32]) -> Result<Self> {
        Self::with_strategy(taps, BufferStrategy::Circular)
    }

    /// Create a FIR filter with an explicit buffer strategy.
    pub fn with_strategy(taps: &[f32], strategy: BufferStrategy) -> Result<Self> {
        if taps.is_empty() {
            return Err(AncError::InvalidFilterLength(0));
        }
        Ok(Self {
            state: vec![0.0; taps.len()],
            taps: taps.to_vec(),
            pos: 0,
            strategy,
        })
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Get access to the tap coefficients
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    fn process_circular(&mut self, sample: f32) -> f32 {
        self.state[self.pos] = sample;

        let n = self.taps.len();
        let mut output = 0.0f32;

        // Iterate the ring buffer in two contiguous reverse ranges to avoid
        // modulo arithmetic in the inner convolution loop.
        let mut tap_i = 0usize;
        for state_idx in (0..=self.pos).rev() {
            output += self.taps[tap_i] * self.state[state_idx];
            tap_i += 1;
        }
        for state_idx in ((self.pos + 1)..n).rev() {
            output += self.taps[tap_i] * self.state[state_idx];
            tap_i += 1;
        }
        debug_assert_eq!(tap_i, n);

        self.pos += 1;
        if self.pos == n {
            self.pos = 0;
        }
        output
    }

    fn process_linear_shift(&mut self, sample: f32) -> f32 {
        let n = self.taps.len();
        self.state.copy_within(0..n - 1, 1);
        self.state[0] = sample;

        self.taps
            .iter()
            .zip(self.state.iter())
            .map(|(&w, &x)| w * x)
            .sum()
    }
}

impl Filter for FirFilter {
    fn process(&mut self, sample: f32) -> f32 {
        match self.strategy {
            BufferStrategy::Circular => self.process_circular(sample),
            BufferStrategy::LinearShift => self.process_linear_shift(sample),
        }
    }
}
