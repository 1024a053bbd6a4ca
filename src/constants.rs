//! Numeric constants for the adaptive filtering pipeline
//!
//! These constants define regularization and stability thresholds used by
//! the NLMS update equation and the stream I/O defaults.

/// Regularization constant added to the input-energy denominator of the
/// NLMS coefficient update. Keeps the normalized step size defined when
/// the recent sample history is silence (energy -> 0).
pub const NLMS_REGULARIZATION: f32 = 1e-4;

/// Classical NLMS stability bound for the step size. Values above this
/// are accepted but logged as suspicious; convergence is not guaranteed.
pub const NLMS_STABILITY_LIMIT: f32 = 2.0;

/// Default number of samples read per block from a PCM stream.
pub const DEFAULT_BLOCK_SIZE: usize = 4000;
