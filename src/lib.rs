/*!
 * A small toolkit for fitting models to data with a non linear link between feature and
 * target. If this is your first time here you should start with the
 * [walkthrough](./walkthrough/index.html), which fits a line and then several non linear
 * models to a [synthetic cubic dataset](./datasets/index.html).
 *
 * # Models
 * - [Linear Regression](./linear_regression/index.html)
 * - [Regression Trees](./tree/index.html)
 * - [Polynomial Features](./preprocessing/index.html) in a [Pipeline](./pipeline/index.html)
 * - [Support Vector Regression](./svm/index.html)
 */

pub mod linear_algebra;
pub mod matrices;
pub mod distributions;
pub mod datasets;
pub mod features;
pub mod estimators;
pub mod metrics;
pub mod plotting;
pub mod config;

pub mod linear_regression;
pub mod tree;
pub mod preprocessing;
pub mod pipeline;
pub mod svm;

pub mod walkthrough;
