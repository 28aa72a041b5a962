/*!
 * Fitting a line, and then everything but a line, to non linear data.
 *
 * [run] generates the [cubic dataset](crate::datasets) described by the config and fits
 * six models to it in turn:
 *
 * 1. A linear regression on `x` alone, which can only draw a straight line through the
 *    curve.
 * 2. A regression tree, which follows the curve as a staircase of mean values.
 * 3. A linear regression on hand crafted `[x, x^2, x^3]` features, which fits the curve
 *    because the model is linear in these features even though it is not linear in `x`.
 * 4. The same idea automated by a [pipeline](crate::pipeline) of
 *    [polynomial features](crate::preprocessing::PolynomialFeatures) feeding a linear
 *    regression.
 * 5. A support vector regressor with a linear kernel, which is still a straight line.
 * 6. A support vector regressor with a polynomial kernel, which fits a curve without ever
 *    expanding the features.
 *
 * Each model is scored by its mean squared error on the training data, and the returned
 * reports carry the predictions for plotting.
 *
 * ```
 * use nonlinear_fit::config::ExperimentConfig;
 * use nonlinear_fit::walkthrough;
 *
 * let reports = walkthrough::run(&ExperimentConfig::default()).unwrap();
 * assert_eq!(reports.len(), 6);
 * let line = &reports[0];
 * let manual_cubic = &reports[2];
 * assert!(manual_cubic.mse < line.mse);
 * ```
 */

use std::error::Error;
use std::fmt;

use log::info;

use crate::config::ExperimentConfig;
use crate::datasets::{Dataset, InvalidArgumentError};
use crate::estimators::{FitError, Regressor};
use crate::features::FeatureMatrix;
use crate::linear_regression::LinearRegression;
use crate::metrics::{mean_squared_error, MetricError};
use crate::pipeline::make_pipeline;
use crate::preprocessing::PolynomialFeatures;
use crate::svm::{Kernel, SupportVectorRegressor};
use crate::tree::DecisionTreeRegressor;

/**
 * The outcome of fitting one model.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentReport {
    pub name: &'static str,
    /// Mean squared error of the predictions against the training targets.
    pub mse: f64,
    /// One prediction per sample, in the dataset's original order.
    pub predictions: Vec<f64>,
    /// The slope of the line, only reported by the plain linear regression.
    pub weight: Option<f64>,
    pub intercept: Option<f64>,
}

/**
 * The walkthrough stopped because a step failed.
 */
#[derive(Debug)]
#[non_exhaustive]
pub enum WalkthroughError {
    Dataset(InvalidArgumentError),
    Fit(FitError),
    Metric(MetricError),
}

impl fmt::Display for WalkthroughError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WalkthroughError::Dataset(error) => write!(f, "Could not generate dataset: {}", error),
            WalkthroughError::Fit(error) => write!(f, "Could not fit model: {}", error),
            WalkthroughError::Metric(error) => write!(f, "Could not score model: {}", error),
        }
    }
}

impl Error for WalkthroughError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WalkthroughError::Dataset(error) => Some(error),
            WalkthroughError::Fit(error) => Some(error),
            WalkthroughError::Metric(error) => Some(error),
        }
    }
}

impl From<InvalidArgumentError> for WalkthroughError {
    fn from(error: InvalidArgumentError) -> Self {
        WalkthroughError::Dataset(error)
    }
}

impl From<FitError> for WalkthroughError {
    fn from(error: FitError) -> Self {
        WalkthroughError::Fit(error)
    }
}

impl From<MetricError> for WalkthroughError {
    fn from(error: MetricError) -> Self {
        WalkthroughError::Metric(error)
    }
}

/**
 * Generates the dataset and runs every experiment, returning the dataset alongside one
 * report per experiment in the order listed in the [module docs](self).
 */
pub fn run_with_dataset(
    config: &ExperimentConfig,
) -> Result<(Dataset, Vec<ExperimentReport>), WalkthroughError> {
    let dataset = Dataset::generate(&config.dataset)?;
    let targets = dataset.target_values();
    let x = dataset.feature_matrix();
    let mut reports = Vec::with_capacity(6);

    let mut line = LinearRegression::new();
    let mut report = experiment("linear regression", &mut line, &x, targets)?;
    report.weight = line.coefficients().map(|coefficients| coefficients[0]);
    report.intercept = line.intercept();
    info!(
        "linear regression weight {:?}, intercept {:?}",
        report.weight, report.intercept
    );
    reports.push(report);

    let mut tree = DecisionTreeRegressor::new().with_max_depth(config.tree_max_depth);
    reports.push(experiment("decision tree", &mut tree, &x, targets)?);

    let mut cubic = LinearRegression::new();
    reports.push(experiment(
        "manual polynomial features",
        &mut cubic,
        &dataset.cubic_feature_matrix(),
        targets,
    )?);

    let mut pipeline = make_pipeline(
        PolynomialFeatures::new(config.polynomial_degree),
        LinearRegression::new(),
    );
    reports.push(experiment("polynomial pipeline", &mut pipeline, &x, targets)?);

    let mut linear_svr = SupportVectorRegressor::new(Kernel::Linear)
        .with_c(config.svr_c)
        .with_epsilon(config.svr_epsilon);
    reports.push(experiment("linear kernel SVR", &mut linear_svr, &x, targets)?);

    let mut polynomial_svr = SupportVectorRegressor::new(Kernel::polynomial(config.svr_kernel_degree))
        .with_c(config.svr_c)
        .with_epsilon(config.svr_epsilon);
    reports.push(experiment("polynomial kernel SVR", &mut polynomial_svr, &x, targets)?);

    Ok((dataset, reports))
}

/**
 * Runs every experiment, see [run_with_dataset].
 */
pub fn run(config: &ExperimentConfig) -> Result<Vec<ExperimentReport>, WalkthroughError> {
    run_with_dataset(config).map(|(_, reports)| reports)
}

fn experiment<R: Regressor>(
    name: &'static str,
    model: &mut R,
    features: &FeatureMatrix,
    targets: &[f64],
) -> Result<ExperimentReport, WalkthroughError> {
    model.fit(features, targets)?;
    let predictions = model.predict(features)?;
    let mse = mean_squared_error(targets, &predictions)?;
    info!("{}: mean squared error {:.4}", name, mse);
    Ok(ExperimentReport {
        name,
        mse,
        predictions,
        weight: None,
        intercept: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::DatasetConfig;

    #[test]
    fn invalid_dataset_is_reported_with_its_source() {
        let config = ExperimentConfig {
            dataset: DatasetConfig {
                n_samples: 0,
                ..DatasetConfig::default()
            },
            ..ExperimentConfig::default()
        };
        let error = run(&config).unwrap_err();
        assert!(matches!(error, WalkthroughError::Dataset(InvalidArgumentError::NoSamples)));
        assert!(error.source().is_some());
    }

    #[test]
    fn invalid_svr_parameter_stops_the_run() {
        let config = ExperimentConfig {
            svr_c: -1.0,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            run(&config),
            Err(WalkthroughError::Fit(FitError::InvalidParameter(_)))
        ));
    }
}
