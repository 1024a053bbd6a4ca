pub mod config;
pub mod constants;
pub mod error;
pub mod pcm;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::{CancellerConfig, StreamConfig};
pub use error::{AncError, Result};
pub use signal_processing::{BufferStrategy, DelayLine, Filter, FirFilter, NlmsCanceller};
pub use wav::save_wav;
