//! Configuration for the quietline noise canceller.

use crate::constants::DEFAULT_BLOCK_SIZE;
use crate::error::{AncError, Result};

/// Adaptive canceller configuration
///
/// Contains the three parameters that define an NLMS canceller instance.
/// Use `CancellerConfig::default()` for the classical defaults (5-tap
/// filter, 5-sample reference delay, step size 0.1).
///
/// # Example
/// ```
/// use quietline::config::CancellerConfig;
///
/// let mut config = CancellerConfig::default();
/// config.step_size = 0.25;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CancellerConfig {
    /// Number of adaptive filter taps (N, must be >= 1)
    pub filter_length: usize,
    /// Samples of delay used to synthesize the decorrelated reference d(n) = x(n - D)
    pub reference_delay: usize,
    /// NLMS step size (beta); positive, classically <= 2.0 for stability
    pub step_size: f32,
}

impl Default for CancellerConfig {
    fn default() -> Self {
        Self {
            filter_length: 5,
            reference_delay: 5,
            step_size: 0.1,
        }
    }
}

impl CancellerConfig {
    /// Check that the parameters describe a constructible canceller.
    pub fn validate(&self) -> Result<()> {
        if self.filter_length == 0 {
            return Err(AncError::InvalidFilterLength(self.filter_length));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(AncError::InvalidStepSize(self.step_size));
        }
        Ok(())
    }
}

/// PCM stream configuration
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Samples per block read from the input stream
    pub block_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(AncError::InvalidBlockSize);
        }
        Ok(())
    }
}
