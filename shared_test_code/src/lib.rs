#![warn(missing_docs)]
//! a helper crate which carries common code used by the benchtests and the
//! integration tests.
use approx::abs_diff_eq;
use modelfit::array::Array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

/// the catalog models together with reference values and fit settings
pub mod example_models;

/// `len` samples drawn uniformly from `[-0.5,0.5)`, reproducible for the same seed
pub fn uniform_noise(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let distribution = Uniform::new(-0.5, 0.5);
    distribution.sample_iter(&mut rng).take(len).collect()
}

/// `len` samples from the standard normal distribution, reproducible for the same seed
pub fn gaussian_noise(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let distribution = Normal::new(0., 1.).expect("standard normal distribution must be valid");
    distribution.sample_iter(&mut rng).take(len).collect()
}

/// add the noise element-wise (in logical order) to a copy of the array
pub fn add_noise(data: &Array, noise: &[f64]) -> Array {
    assert_eq!(data.len(), noise.len(), "noise must have one sample per element");
    let mut noisy = data.clone();
    noisy.iter_mut().zip(noise).for_each(|(d, n)| *d += n);
    noisy
}

/// check that two arrays have the same shape and all elements agree within `atol`
pub fn all_close(actual: &Array, expected: &Array, atol: f64) -> bool {
    actual.shape() == expected.shape()
        && actual
            .iter()
            .zip(expected.iter())
            .all(|(a, e)| abs_diff_eq!(a, e, epsilon = atol))
}
