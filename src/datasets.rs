/*!
Synthetic datasets with a known non linear link between data and target.

The generated data follows a noisy cubic, `y = x^3 - 0.5 x^2 + noise`, for `x` drawn
uniformly from a range centred on zero. The generator seeds its own
[ChaCha8Rng](rand_chacha::ChaCha8Rng) from the provided seed, so the same arguments always
produce bit for bit the same dataset no matter what other random numbers the program
has drawn.

```
use nonlinear_fit::datasets::generate_dataset;

let dataset = generate_dataset(0, 100, -1.4, 1.4, 0.3).unwrap();
assert_eq!(dataset.len(), 100);
// the sort permutation visits the x values in ascending order, which is what
// drawing a fitted curve as a connected line needs
let sorted: Vec<f64> = dataset.sort_permutation().iter()
    .map(|&i| dataset.feature_values()[i])
    .collect();
assert!(sorted.windows(2).all(|pair| pair[0] <= pair[1]));
```
 */

use std::error::Error;
use std::fmt;

use log::debug;
use rand::distr::StandardUniform;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::distributions::Gaussian;
use crate::features::FeatureMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/**
 * The parameters of a synthetic cubic dataset.
 *
 * The defaults are 100 samples of `x` in `[-1.4, 1.4]` with noise of standard deviation 0.3
 * drawn from seed 0.
 */
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DatasetConfig {
    pub seed: u64,
    pub n_samples: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub noise_scale: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            seed: 0,
            n_samples: 100,
            x_min: -1.4,
            x_max: 1.4,
            noise_scale: 0.3,
        }
    }
}

/**
 * An argument to [generate_dataset] was outside its valid range.
 */
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum InvalidArgumentError {
    /// At least one sample must be requested.
    NoSamples,
    /// `x_max` must be strictly greater than `x_min`, and both must be finite.
    EmptyRange { x_min: f64, x_max: f64 },
    /// `x_max - x_min` is too large to represent as a finite `f64`.
    RangeOverflow { x_min: f64, x_max: f64 },
    /// The noise scale must be zero or positive.
    NegativeNoiseScale(f64),
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgumentError::NoSamples => write!(f, "n_samples must be at least 1"),
            InvalidArgumentError::EmptyRange { x_min, x_max } => write!(
                f,
                "x_max ({}) must be finite and greater than x_min ({})",
                x_max, x_min
            ),
            InvalidArgumentError::RangeOverflow { x_min, x_max } => write!(
                f,
                "the width of the range from {} to {} overflows",
                x_min, x_max
            ),
            InvalidArgumentError::NegativeNoiseScale(scale) => {
                write!(f, "noise_scale must not be negative, got {}", scale)
            }
        }
    }
}

impl Error for InvalidArgumentError {}

/**
 * A generated dataset: feature values, their noisy cubic targets, and the permutation
 * that sorts the feature values.
 *
 * The dataset cannot be modified after creation.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    feature_values: Vec<f64>,
    target_values: Vec<f64>,
    sort_permutation: Vec<usize>,
}

impl Dataset {
    /**
     * Generates a dataset from a config, see [generate_dataset].
     */
    pub fn generate(config: &DatasetConfig) -> Result<Dataset, InvalidArgumentError> {
        generate_dataset(
            config.seed,
            config.n_samples,
            config.x_min,
            config.x_max,
            config.noise_scale,
        )
    }

    pub fn feature_values(&self) -> &[f64] {
        &self.feature_values
    }

    pub fn target_values(&self) -> &[f64] {
        &self.target_values
    }

    /**
     * Indexes of the samples in ascending order of feature value. Equal feature values
     * keep their original relative order.
     */
    pub fn sort_permutation(&self) -> &[usize] {
        &self.sort_permutation
    }

    /**
     * The number of samples, which is never 0.
     */
    pub fn len(&self) -> usize {
        self.feature_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_values.is_empty()
    }

    /**
     * The feature values as a single feature `(n_samples, 1)` matrix, ready to pass to an
     * estimator.
     */
    pub fn feature_matrix(&self) -> FeatureMatrix {
        // a dataset always has at least one sample so this can't fail
        FeatureMatrix::from_column(self.feature_values.clone())
            .expect("dataset always has at least one sample")
    }

    /**
     * The feature values with their squares and cubes stacked as columns, ie each row is
     * `[x, x^2, x^3]`.
     */
    pub fn cubic_feature_matrix(&self) -> FeatureMatrix {
        let x = &self.feature_values;
        let squared = x.iter().map(|x| x * x).collect();
        let cubed = x.iter().map(|x| x * x * x).collect();
        FeatureMatrix::stack_columns(vec![x.clone(), squared, cubed])
            .expect("stacked columns have the same non zero length")
    }

    /**
     * Reorders any per sample values (such as predictions) into ascending order of
     * feature value.
     *
     * # Panics
     *
     * If `values` does not have one value per sample.
     */
    pub fn in_sorted_order(&self, values: &[f64]) -> Vec<f64> {
        assert_eq!(values.len(), self.len(), "Need exactly one value per sample");
        self.sort_permutation.iter().map(|&i| values[i]).collect()
    }
}

/**
 * Generates a reproducible dataset of `n_samples` noisy samples of
 * `y = x^3 - 0.5 x^2 + noise`.
 *
 * 1. A [ChaCha8Rng] is seeded from `seed`.
 * 2. `n_samples` uniform values `u` in `[0, 1)` are drawn and mapped to
 *    `u * (x_max - x_min) - (x_max - x_min) / 2`, which is symmetric around zero.
 * 3. `n_samples` standard normal values are drawn from the same generator with the
 *    Box-Muller transform (see [Gaussian::draw]) and scaled by `noise_scale`.
 * 4. Each target is `x^3 - 0.5 x^2` plus its noise.
 * 5. The sort permutation is a stable argsort of the feature values.
 *
 * Returns an [InvalidArgumentError] if `n_samples` is 0, `x_max <= x_min`, `x_max - x_min`
 * overflows or `noise_scale` is negative.
 */
pub fn generate_dataset(
    seed: u64,
    n_samples: usize,
    x_min: f64,
    x_max: f64,
    noise_scale: f64,
) -> Result<Dataset, InvalidArgumentError> {
    if n_samples == 0 {
        return Err(InvalidArgumentError::NoSamples);
    }
    // written so NaN bounds are rejected too
    if !(x_max > x_min) || !x_min.is_finite() || !x_max.is_finite() {
        return Err(InvalidArgumentError::EmptyRange { x_min, x_max });
    }
    let length = x_max - x_min;
    if !length.is_finite() {
        return Err(InvalidArgumentError::RangeOverflow { x_min, x_max });
    }
    if !(noise_scale >= 0.0) {
        return Err(InvalidArgumentError::NegativeNoiseScale(noise_scale));
    }

    let mut random_generator = ChaCha8Rng::seed_from_u64(seed);
    let feature_values: Vec<f64> = (0..n_samples)
        .map(|_| random_generator.random::<f64>() * length - length / 2.0)
        .collect();

    let mut random_numbers = (&mut random_generator).sample_iter::<f64, _>(StandardUniform);
    let noise = Gaussian::new(0.0, 1.0)
        .draw(&mut random_numbers, n_samples)
        .expect("rand iterators are infinite");

    let target_values = feature_values
        .iter()
        .zip(noise.iter())
        .map(|(&x, &noise)| x * x * x - 0.5 * (x * x) + noise * noise_scale)
        .collect();

    let sort_permutation = argsort(&feature_values);
    debug!(
        "generated {} samples with seed {} over [{}, {}]",
        n_samples, seed, -length / 2.0, length / 2.0
    );

    Ok(Dataset {
        feature_values,
        target_values,
        sort_permutation,
    })
}

/**
 * Returns the indexes that would sort the values in ascending order. The sort is stable, so
 * equal values keep their original order.
 */
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut indexes: Vec<usize> = (0..values.len()).collect();
    indexes.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    indexes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argsort_is_stable() {
        let values = [3.0, 1.0, 2.0, 1.0];
        assert_eq!(argsort(&values), vec![1, 3, 2, 0]);
    }

    #[test]
    fn features_stay_in_symmetric_range() {
        let dataset = generate_dataset(7, 500, 0.0, 4.0, 0.0).unwrap();
        assert!(dataset.feature_values().iter().all(|&x| (-2.0..2.0).contains(&x)));
    }

    #[test]
    fn zero_noise_is_exactly_cubic() {
        let dataset = generate_dataset(3, 20, -1.0, 1.0, 0.0).unwrap();
        for (&x, &y) in dataset.feature_values().iter().zip(dataset.target_values()) {
            assert_eq!(y, x * x * x - 0.5 * (x * x));
        }
    }

    #[test]
    fn nan_arguments_are_rejected() {
        assert!(generate_dataset(0, 10, f64::NAN, 1.0, 0.3).is_err());
        assert!(generate_dataset(0, 10, -1.0, 1.0, f64::NAN).is_err());
    }
}
