/// Source of random variates for a run.
///
/// Swapping the implementation (seeded, scripted) is what makes runs reproducible.
pub trait VariateSource {
    /// Uniform sample in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Exponential sample with the given rate (mean `1 / rate`).
    fn exponential(&mut self, rate: f64) -> f64;

    /// Unbounded Gaussian sample.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64;
}
