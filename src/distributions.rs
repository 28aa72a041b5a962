/*!
Models of distributions that samples can be drawn from.

# Drawing from a Gaussian with a seeded generator

```
use rand::{Rng, SeedableRng};
use rand::distr::StandardUniform;
use rand_chacha::ChaCha8Rng;
use nonlinear_fit::distributions::Gaussian;

// using a fixed seed random generator from the rand crate
let mut random_generator = ChaCha8Rng::seed_from_u64(10);
let mut random_numbers = (&mut random_generator).sample_iter::<f64, _>(StandardUniform);

let normal_distribution = Gaussian::new(0.0, 1.0);
// the iterator above is infinite, so there are always enough random numbers
let samples = normal_distribution.draw(&mut random_numbers, 1000).unwrap();
assert_eq!(samples.len(), 1000);
```
 */

use std::f64::consts::PI;

/**
 * A [normal distribution](https://en.wikipedia.org/wiki/Normal_distribution) with mean μ
 * and variance σ<sup>2</sup>, used as the noise model of the synthetic datasets.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Gaussian {
    pub mean: f64,
    /// The square of the standard deviation, not the standard deviation itself.
    pub variance: f64,
}

impl Gaussian {
    pub fn new(mean: f64, variance: f64) -> Gaussian {
        Gaussian { mean, variance }
    }

    /**
     * Given a source of random variables in the uniformly distributed
     * range [0, 1), draws `max_samples` of independent
     * random numbers according to this Gaussian distribution's mean and
     * variance using the Box-Muller transform:
     *
     * [https://en.wikipedia.org/wiki/Box%E2%80%93Muller_transform](https://en.wikipedia.org/wiki/Box%E2%80%93Muller_transform)
     *
     * Uniform values are consumed in pairs `(u, v)`, yielding
     * `sqrt(-2 ln(1 - u)) * cos(2πv)` then `sqrt(-2 ln(1 - u)) * sin(2πv)`. Taking `1 - u`
     * keeps the logarithm finite for a source that can produce exactly 0.
     *
     * The source of random variables must provide at least as many values
     * as `max_samples` if `max_samples` is even, and one more than `max_samples`
     * if `max_samples` is odd. If fewer are provided None is returned.
     *
     * As all randomness is provided to this method, this code is deterministic
     * and will always compute the same samples given the same random source
     * of numbers.
     */
    pub fn draw<I>(&self, source: &mut I, max_samples: usize) -> Option<Vec<f64>>
    where I: Iterator<Item = f64> {
        let mut samples = Vec::with_capacity(max_samples + 1);
        let standard_deviation = self.variance.sqrt();
        while samples.len() < max_samples {
            let (u, v) = (source.next()?, source.next()?);
            let radius = (-2.0 * (1.0 - u).ln()).sqrt();
            let angle = 2.0 * PI * v;
            let z1 = radius * angle.cos();
            let z2 = radius * angle.sin();
            samples.push((z1 * standard_deviation) + self.mean);
            samples.push((z2 * standard_deviation) + self.mean);
        }
        // adding samples in pairs can take us one over the max
        samples.truncate(max_samples);
        Some(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_pairs_and_truncates() {
        let gaussian = Gaussian::new(0.0, 1.0);
        let mut source = vec![0.5, 0.0, 0.5, 0.25].into_iter();
        let samples = gaussian.draw(&mut source, 3).unwrap();
        assert_eq!(samples.len(), 3);
        let radius = (-2.0 * 0.5_f64.ln()).sqrt();
        assert_eq!(samples[0], radius);
        assert!(samples[1].abs() < 1e-15);
        assert!(samples[2].abs() < 1e-15);
    }

    #[test]
    fn runs_out_of_randomness() {
        let gaussian = Gaussian::new(0.0, 1.0);
        let mut source = vec![0.5].into_iter();
        assert_eq!(gaussian.draw(&mut source, 1), None);
    }
}
