/*!
 * Measures of how well predictions match targets.
 */

use std::error::Error;
use std::fmt;

/**
 * An error for when predictions and targets cannot be compared.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetricError {
    Empty,
    LengthMismatch { targets: usize, predictions: usize },
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricError::Empty => write!(f, "No values to compare"),
            MetricError::LengthMismatch { targets, predictions } => write!(
                f,
                "{} targets cannot be compared to {} predictions",
                targets, predictions
            ),
        }
    }
}

impl Error for MetricError {}

/**
 * The mean of the squared differences between each target and its prediction.
 *
 * ```
 * use nonlinear_fit::metrics::mean_squared_error;
 * assert_eq!(mean_squared_error(&[ 1.0, 2.0 ], &[ 1.0, 4.0 ]), Ok(2.0));
 * ```
 */
pub fn mean_squared_error(targets: &[f64], predictions: &[f64]) -> Result<f64, MetricError> {
    if targets.len() != predictions.len() {
        return Err(MetricError::LengthMismatch {
            targets: targets.len(),
            predictions: predictions.len(),
        });
    }
    if targets.is_empty() {
        return Err(MetricError::Empty);
    }
    let sum: f64 = targets
        .iter()
        .zip(predictions.iter())
        .map(|(target, prediction)| (target - prediction) * (target - prediction))
        .sum();
    Ok(sum / targets.len() as f64)
}

#[test]
fn perfect_predictions_have_no_error() {
    let values = [0.5, -2.0, 3.25];
    assert_eq!(mean_squared_error(&values, &values), Ok(0.0));
}

#[test]
fn mismatched_lengths_are_rejected() {
    assert_eq!(
        mean_squared_error(&[1.0, 2.0], &[1.0]),
        Err(MetricError::LengthMismatch { targets: 2, predictions: 1 })
    );
    assert_eq!(mean_squared_error(&[], &[]), Err(MetricError::Empty));
}
