/*!
 * Chaining feature transformations with a final model.
 *
 * A [Pipeline] is itself a [Regressor]: fitting it fits each transformer in turn on the
 * output of the one before, then fits the model on the fully transformed features.
 * Predicting pushes new samples through the same fitted transformers first, so the model
 * always sees features in the shape it was trained on.
 *
 * ```
 * use nonlinear_fit::estimators::Regressor;
 * use nonlinear_fit::features::FeatureMatrix;
 * use nonlinear_fit::linear_regression::LinearRegression;
 * use nonlinear_fit::pipeline::make_pipeline;
 * use nonlinear_fit::preprocessing::PolynomialFeatures;
 *
 * let x: Vec<f64> = (0..10).map(|i| i as f64 / 2.0).collect();
 * let y: Vec<f64> = x.iter().map(|x| 2.0 * x * x - x + 3.0).collect();
 * let features = FeatureMatrix::from_column(x).unwrap();
 *
 * let mut model = make_pipeline(PolynomialFeatures::new(2), LinearRegression::new());
 * model.fit(&features, &y).unwrap();
 * let predictions = model.predict(&features).unwrap();
 * for (prediction, expected) in predictions.iter().zip(y.iter()) {
 *     assert!((prediction - expected).abs() < 1e-9);
 * }
 * ```
 */

use log::debug;

use crate::estimators::{FitError, Regressor, Transformer};
use crate::features::FeatureMatrix;

/**
 * A sequence of transformers followed by a regressor.
 */
pub struct Pipeline {
    steps: Vec<Box<dyn Transformer>>,
    regressor: Box<dyn Regressor>,
}

/**
 * Creates a pipeline of a single transformer feeding a regressor.
 */
pub fn make_pipeline<T, R>(transformer: T, regressor: R) -> Pipeline
where
    T: Transformer + 'static,
    R: Regressor + 'static,
{
    Pipeline::new(vec![Box::new(transformer)], Box::new(regressor))
}

impl Pipeline {
    pub fn new(steps: Vec<Box<dyn Transformer>>, regressor: Box<dyn Regressor>) -> Pipeline {
        Pipeline { steps, regressor }
    }

    /**
     * The number of transformers before the regressor.
     */
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn transform_all(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, FitError> {
        let mut transformed = features.clone();
        for step in &self.steps {
            transformed = step.transform(&transformed)?;
        }
        Ok(transformed)
    }
}

impl Regressor for Pipeline {
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), FitError> {
        let mut transformed = features.clone();
        for step in self.steps.iter_mut() {
            transformed = step.fit_transform(&transformed)?;
        }
        debug!(
            "pipeline expanded {} features to {}",
            features.features(),
            transformed.features()
        );
        self.regressor.fit(&transformed, targets)
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, FitError> {
        let transformed = self.transform_all(features)?;
        self.regressor.predict(&transformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_regression::LinearRegression;
    use crate::preprocessing::PolynomialFeatures;

    #[test]
    fn predicting_before_fitting_fails() {
        let model = make_pipeline(PolynomialFeatures::new(2), LinearRegression::new());
        let x = FeatureMatrix::from_column(vec![1.0]).unwrap();
        assert_eq!(model.predict(&x), Err(FitError::NotFitted));
    }

    #[test]
    fn empty_pipeline_is_just_the_regressor() {
        let mut model = Pipeline::new(Vec::new(), Box::new(LinearRegression::new()));
        assert!(model.is_empty());
        let x = FeatureMatrix::from_column(vec![0.0, 1.0, 2.0]).unwrap();
        model.fit(&x, &[1.0, 2.0, 3.0]).unwrap();
        let predictions = model.predict(&x).unwrap();
        assert!((predictions[2] - 3.0).abs() < 1e-12);
    }
}
