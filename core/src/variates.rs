use crate::traits::VariateSource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};

/// Deterministic variates backed by a seeded ChaCha8 stream.
pub struct SeededVariates {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededVariates {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl VariateSource for SeededVariates {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    // A non-positive rate means the event never happens.
    fn exponential(&mut self, rate: f64) -> f64 {
        Exp::new(rate).map_or(f64::INFINITY, |exp| exp.sample(&mut self.rng))
    }

    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        Normal::new(mean, std_dev).map_or(mean, |normal| normal.sample(&mut self.rng))
    }
}
