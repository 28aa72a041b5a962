/*!
Ordinary least squares linear regression.

[Overview](https://en.wikipedia.org/wiki/Linear_regression).

The model predicts `y = x · w + b` for a weight per feature `w` and an intercept `b`,
choosing the values that [minimise the sum of squares error](https://en.wikipedia.org/wiki/Least_squares).
Fitting centres the features and targets on their means, which removes the intercept from
the problem, then solves the normal equations `(Xᵀ X) w = Xᵀ y` on the centred data.
The intercept is whatever is left over: `b = mean(y) - mean(x) · w`.

Fitting never fails because features are linearly dependent, for example a feature
repeated twice or more features than samples. A feature that is a linear combination of
the features before it gets a weight of 0, and the rest are solved as usual, see
[solve_normal_equations](crate::linear_algebra::solve_normal_equations).

A linear model can only ever fit a straight line (or flat hyperplane) to its features, but
nothing stops the features from being non linear functions of the data.

# Fitting a curve by expanding the features

```
use nonlinear_fit::estimators::Regressor;
use nonlinear_fit::features::FeatureMatrix;
use nonlinear_fit::linear_regression::LinearRegression;

// first create some data to fit a curve to
let x = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
// we are going to fit a polynomial curve of x^2, but add the sin of x to each value for
// y to create some deterministic 'noise'.
let y: Vec<f64> = x.iter().map(|x: &f64| x.powi(2) + x.sin()).collect();

// a straight line does badly
let mut model = LinearRegression::new();
let line = FeatureMatrix::from_column(x.clone()).unwrap();
model.fit(&line, &y).unwrap();
let predictions = model.predict(&line).unwrap();
let line_error = nonlinear_fit::metrics::mean_squared_error(&y, &predictions).unwrap();

// giving the model x^2 as a second feature lets it fit the curve
let squared = x.iter().map(|x| x * x).collect();
let quadratic = FeatureMatrix::stack_columns(vec![x.clone(), squared]).unwrap();
model.fit(&quadratic, &y).unwrap();
let predictions = model.predict(&quadratic).unwrap();
let curve_error = nonlinear_fit::metrics::mean_squared_error(&y, &predictions).unwrap();

assert!(curve_error < 0.5);
assert!(curve_error < line_error);
```
*/

use log::debug;

use crate::estimators::{check_feature_count, check_fit_input, FitError, Regressor};
use crate::features::FeatureMatrix;
use crate::linear_algebra;
use crate::matrices::Matrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/**
 * A linear regression model fitted by ordinary least squares.
 */
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearRegression {
    fitted: Option<Weights>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Weights {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    pub fn new() -> LinearRegression {
        LinearRegression { fitted: None }
    }

    /**
     * The learned weight of each feature, or None if the model has not been fitted.
     */
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|weights| weights.coefficients.as_slice())
    }

    /**
     * The learned intercept, or None if the model has not been fitted.
     */
    pub fn intercept(&self) -> Option<f64> {
        self.fitted.as_ref().map(|weights| weights.intercept)
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), FitError> {
        check_fit_input(features, targets)?;
        let feature_means: Vec<f64> = (0..features.features())
            .map(|j| linear_algebra::mean(features.matrix().column_iter(j)))
            .collect::<Option<_>>()
            .ok_or(FitError::EmptyInput)?;
        let target_mean = linear_algebra::mean(targets.iter().cloned()).ok_or(FitError::EmptyInput)?;

        // A constant feature (such as a bias column of ones) is all zeros once centred and
        // carries nothing the intercept doesn't, so it gets a weight of 0 and is left out of
        // the normal equations entirely.
        let varying: Vec<usize> = (0..features.features())
            .filter(|&j| {
                let first = features.sample(0)[j];
                features.matrix().column_reference_iter(j).any(|&x| x != first)
            })
            .collect();

        let mut coefficients = vec![0.0; features.features()];
        if !varying.is_empty() {
            let mut data = Vec::with_capacity(features.samples() * varying.len());
            for sample in features.sample_iter() {
                data.extend(varying.iter().map(|&j| sample[j] - feature_means[j]));
            }
            let centred = Matrix::from_flat_row_major((features.samples(), varying.len()), data);
            let y = Matrix::column(targets.iter().map(|y| y - target_mean).collect());

            // solve (Xᵀ X) w = Xᵀ y, features that are combinations of earlier ones get 0
            let transposed = centred.transpose();
            let gram = &transposed * &centred;
            let rhs = (&transposed * &y).into_row_major_vec();
            let solved = linear_algebra::solve_normal_equations(&gram, &rhs);
            for (&j, weight) in varying.iter().zip(solved) {
                coefficients[j] = weight;
            }
        }
        let intercept = target_mean - linear_algebra::dot(&feature_means, &coefficients);
        debug!("least squares fit: coefficients {:?}, intercept {}", coefficients, intercept);

        self.fitted = Some(Weights {
            coefficients,
            intercept,
        });
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, FitError> {
        let weights = self.fitted.as_ref().ok_or(FitError::NotFitted)?;
        check_feature_count(features, weights.coefficients.len())?;
        Ok(features
            .sample_iter()
            .map(|sample| linear_algebra::dot(sample, &weights.coefficients) + weights.intercept)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_line() {
        let x = FeatureMatrix::from_column(vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = vec![1.0, 3.0, 5.0, 7.0, 9.0];
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        assert!((model.coefficients().unwrap()[0] - 2.0).abs() < 1e-12);
        assert!((model.intercept().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_gets_no_weight() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let features = FeatureMatrix::stack_columns(vec![vec![1.0; 4], x]).unwrap();
        let mut model = LinearRegression::new();
        model.fit(&features, &[2.0, 5.0, 8.0, 11.0]).unwrap();
        assert_eq!(model.coefficients().unwrap()[0], 0.0);
        assert!((model.coefficients().unwrap()[1] - 3.0).abs() < 1e-12);
        assert!((model.intercept().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn unfitted_model_cannot_predict() {
        let x = FeatureMatrix::from_column(vec![0.0]).unwrap();
        assert_eq!(LinearRegression::new().predict(&x), Err(FitError::NotFitted));
    }

    #[test]
    fn duplicated_feature_gets_no_weight() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let features = FeatureMatrix::stack_columns(vec![x.clone(), x]).unwrap();
        let mut model = LinearRegression::new();
        model.fit(&features, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(model.coefficients().unwrap(), &[1.0, 0.0]);
        assert_eq!(model.intercept(), Some(1.0));
    }

    #[test]
    fn more_features_than_samples() {
        // two samples can only pin down a line, x^2 and x^3 add nothing
        let x = vec![-0.5, 1.0];
        let features = FeatureMatrix::stack_columns(vec![
            x.clone(),
            x.iter().map(|x| x * x).collect(),
            x.iter().map(|x| x * x * x).collect(),
        ]).unwrap();
        let mut model = LinearRegression::new();
        model.fit(&features, &[0.0, 3.0]).unwrap();
        assert_eq!(&model.coefficients().unwrap()[1..], &[0.0, 0.0]);
        let predictions = model.predict(&features).unwrap();
        assert!((predictions[0] - 0.0).abs() < 1e-12);
        assert!((predictions[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn predicting_with_wrong_feature_count() {
        let mut model = LinearRegression::new();
        let x = FeatureMatrix::from_column(vec![0.0, 1.0, 2.0]).unwrap();
        model.fit(&x, &[0.0, 1.0, 2.0]).unwrap();
        let wide = FeatureMatrix::from_rows(vec![vec![0.0, 1.0]]).unwrap();
        assert_eq!(
            model.predict(&wide),
            Err(FitError::FeatureCountMismatch { expected: 1, actual: 2 })
        );
    }

    #[test]
    fn mismatched_targets() {
        let mut model = LinearRegression::new();
        let x = FeatureMatrix::from_column(vec![0.0, 1.0, 2.0]).unwrap();
        assert_eq!(
            model.fit(&x, &[0.0, 1.0]),
            Err(FitError::SampleCountMismatch { features: 3, targets: 2 })
        );
    }
}
