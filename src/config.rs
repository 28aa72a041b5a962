/*!
 * Every constant the [walkthrough](crate::walkthrough) depends on, gathered in one place.
 *
 * With the `serde` feature enabled the config can be read from any serde format, and any
 * field left out takes its default value.
 *
 * ```
 * use nonlinear_fit::config::ExperimentConfig;
 *
 * let config = ExperimentConfig {
 *     tree_max_depth: 5,
 *     ..ExperimentConfig::default()
 * };
 * assert_eq!(config.dataset.n_samples, 100);
 * ```
 */

use crate::datasets::DatasetConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/**
 * Settings for the dataset and for each model the walkthrough fits.
 */
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExperimentConfig {
    pub dataset: DatasetConfig,
    /// Maximum depth of the regression tree.
    pub tree_max_depth: usize,
    /// Degree of the polynomial feature expansion in the pipeline.
    pub polynomial_degree: usize,
    pub svr_c: f64,
    pub svr_epsilon: f64,
    /// Degree of the polynomial kernel SVR.
    pub svr_kernel_degree: u32,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            dataset: DatasetConfig::default(),
            tree_max_depth: 3,
            polynomial_degree: 3,
            svr_c: 1.0,
            svr_epsilon: 0.1,
            svr_kernel_degree: 3,
        }
    }
}
