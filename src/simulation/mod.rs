mod measure;
mod noise;
mod signal;

pub use measure::{run_filter, signal_power, snr_db, snr_improvement_db, CancellationReport};
pub use noise::GaussianNoise;
pub use signal::{generate_noisy_cosine, Oscillator, TestSignal, ToneConfig};
