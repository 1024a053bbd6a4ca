use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Zero-mean Gaussian noise source with a fixed variance.
///
/// Seeded generation uses ChaCha8 so test signals are reproducible
/// across runs and platforms.
pub struct GaussianNoise {
    rng: ChaCha8Rng,
    distribution: Normal<f64>,
}

impl GaussianNoise {
    /// Create a noise source with the given variance. A `None` seed draws
    /// a fresh random stream each run.
    pub fn new(variance: f32, seed: Option<u64>) -> Self {
        let sigma = (variance.max(0.0) as f64).sqrt();
        Self {
            rng: create_rng(seed),
            distribution: Normal::new(0.0, sigma).unwrap(),
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        self.distribution.sample(&mut self.rng) as f32
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}
