/*!
 * The common interface of every model in this crate.
 *
 * A [Regressor] learns to predict a target value for each sample of a
 * [FeatureMatrix], a [Transformer] learns how to turn one feature matrix into another.
 * Both fit and predict/transform return a [FitError] rather than panicking when given
 * data of the wrong shape, so a caller that forgets to reshape its data gets an error
 * it can report.
 */

use std::error::Error;
use std::fmt;

use crate::features::FeatureMatrix;

/**
 * A model that can be fitted to samples and their targets, then predict targets for
 * new samples.
 */
pub trait Regressor {
    /**
     * Fits this model to the samples and their targets, replacing anything learned by
     * a previous fit.
     */
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), FitError>;

    /**
     * Predicts one target value per sample.
     */
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, FitError>;
}

/**
 * A stateful mapping from one feature matrix to another, such as a feature expansion.
 */
pub trait Transformer {
    fn fit(&mut self, features: &FeatureMatrix) -> Result<(), FitError>;

    fn transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, FitError>;

    fn fit_transform(&mut self, features: &FeatureMatrix) -> Result<FeatureMatrix, FitError> {
        self.fit(features)?;
        self.transform(features)
    }
}

impl <R: Regressor + ?Sized> Regressor for Box<R> {
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), FitError> {
        R::fit(self, features, targets)
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, FitError> {
        R::predict(self, features)
    }
}

/**
 * Errors from fitting or using a model.
 */
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum FitError {
    /// No targets were provided.
    EmptyInput,
    /// The feature matrix and the targets describe different numbers of samples.
    SampleCountMismatch { features: usize, targets: usize },
    /// The feature matrix has a different number of features to the data the model was
    /// fitted on.
    FeatureCountMismatch { expected: usize, actual: usize },
    /// The model must be fitted before it can be used.
    NotFitted,
    /// A hyperparameter of the model is outside its valid range.
    InvalidParameter(String),
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::EmptyInput => write!(f, "Cannot fit a model to zero samples"),
            FitError::SampleCountMismatch { features, targets } => write!(
                f,
                "Feature matrix has {} samples but {} targets were provided",
                features, targets
            ),
            FitError::FeatureCountMismatch { expected, actual } => write!(
                f,
                "Expected samples with {} features but got {}",
                expected, actual
            ),
            FitError::NotFitted => write!(f, "Model has not been fitted yet"),
            FitError::InvalidParameter(message) => write!(f, "Invalid parameter: {}", message),
        }
    }
}

impl Error for FitError {}

/**
 * Checks that there is one target per sample, and at least one sample.
 */
pub(crate) fn check_fit_input(features: &FeatureMatrix, targets: &[f64]) -> Result<(), FitError> {
    if targets.is_empty() {
        return Err(FitError::EmptyInput);
    }
    if features.samples() != targets.len() {
        return Err(FitError::SampleCountMismatch {
            features: features.samples(),
            targets: targets.len(),
        });
    }
    Ok(())
}

/**
 * Checks that samples to predict have as many features as the model was fitted on.
 */
pub(crate) fn check_feature_count(features: &FeatureMatrix, expected: usize) -> Result<(), FitError> {
    if features.features() != expected {
        return Err(FitError::FeatureCountMismatch {
            expected,
            actual: features.features(),
        });
    }
    Ok(())
}
