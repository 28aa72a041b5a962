/*!
 * Feature matrices, the 2 dimensional `(samples, features)` shape every estimator takes.
 *
 * A one dimensional list of values is ambiguous, it could be many samples of one feature
 * or one sample of many features. Estimators only accept a [FeatureMatrix] so the caller
 * has to say which by constructing one.
 *
 * ```
 * use nonlinear_fit::features::FeatureMatrix;
 *
 * let x = vec![ -1.0, 0.5, 2.0 ];
 * // many samples of a single feature, the equivalent of reshaping to (-1, 1)
 * let single = FeatureMatrix::from_column(x.clone()).unwrap();
 * assert_eq!(single.shape(), (3, 1));
 * assert_eq!(single.column(0), x);
 *
 * // engineered features stacked as columns, each row is [x, x^2, x^3]
 * let squared = x.iter().map(|x| x * x).collect();
 * let cubed = x.iter().map(|x| x * x * x).collect();
 * let cubic = FeatureMatrix::stack_columns(vec![ x.clone(), squared, cubed ]).unwrap();
 * assert_eq!(cubic.shape(), (3, 3));
 * assert_eq!(cubic.sample(2), &[ 2.0, 4.0, 8.0 ]);
 * ```
 */

use std::error::Error;
use std::fmt;

use crate::matrices::Matrix;

/**
 * The values could not be arranged into a feature matrix.
 */
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeError {
    /// There were no samples, or no features.
    Empty,
    /// Columns to stack had different numbers of samples.
    InconsistentColumns { expected: usize, actual: usize },
    /// Rows had different numbers of features.
    InconsistentRows { expected: usize, actual: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Empty => write!(f, "A feature matrix needs at least one sample and one feature"),
            ShapeError::InconsistentColumns { expected, actual } => write!(
                f,
                "All columns must have the same number of samples, expected {} but got {}",
                expected, actual
            ),
            ShapeError::InconsistentRows { expected, actual } => write!(
                f,
                "All rows must have the same number of features, expected {} but got {}",
                expected, actual
            ),
        }
    }
}

impl Error for ShapeError {}

/**
 * A matrix with one row per sample and one column per feature.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    matrix: Matrix<f64>,
}

impl FeatureMatrix {
    /**
     * Treats a list of values as many samples of a single feature, giving an
     * `(values.len(), 1)` matrix.
     */
    pub fn from_column(values: Vec<f64>) -> Result<FeatureMatrix, ShapeError> {
        if values.is_empty() {
            return Err(ShapeError::Empty);
        }
        Ok(FeatureMatrix {
            matrix: Matrix::column(values),
        })
    }

    /**
     * Stacks lists of values as the columns of a matrix, so the `j`th list becomes the
     * `j`th feature of every sample.
     */
    pub fn stack_columns(columns: Vec<Vec<f64>>) -> Result<FeatureMatrix, ShapeError> {
        let samples = columns.first().map(|column| column.len()).unwrap_or(0);
        if samples == 0 {
            return Err(ShapeError::Empty);
        }
        if let Some(column) = columns.iter().find(|column| column.len() != samples) {
            return Err(ShapeError::InconsistentColumns {
                expected: samples,
                actual: column.len(),
            });
        }
        let features = columns.len();
        let mut data = Vec::with_capacity(samples * features);
        for sample in 0..samples {
            data.extend(columns.iter().map(|column| column[sample]));
        }
        Ok(FeatureMatrix {
            matrix: Matrix::from_flat_row_major((samples, features), data),
        })
    }

    /**
     * Creates a feature matrix from a list of samples, each being a list of features.
     */
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<FeatureMatrix, ShapeError> {
        let features = rows.first().map(|row| row.len()).unwrap_or(0);
        if features == 0 {
            return Err(ShapeError::Empty);
        }
        if let Some(row) = rows.iter().find(|row| row.len() != features) {
            return Err(ShapeError::InconsistentRows {
                expected: features,
                actual: row.len(),
            });
        }
        Ok(FeatureMatrix {
            matrix: Matrix::from(rows),
        })
    }

    /**
     * Wraps a matrix, treating its rows as samples and its columns as features.
     */
    pub fn from_matrix(matrix: Matrix<f64>) -> FeatureMatrix {
        FeatureMatrix { matrix }
    }

    /**
     * Returns `(samples, features)`
     */
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.size()
    }

    pub fn samples(&self) -> usize {
        self.matrix.rows()
    }

    pub fn features(&self) -> usize {
        self.matrix.columns()
    }

    /**
     * The features of one sample.
     */
    pub fn sample(&self, index: usize) -> &[f64] {
        self.matrix.row_slice(index)
    }

    /**
     * Iterates through the samples in order.
     */
    pub fn sample_iter(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.samples()).map(move |index| self.sample(index))
    }

    /**
     * Copies out every sample's value for one feature.
     */
    pub fn column(&self, feature: usize) -> Vec<f64> {
        self.matrix.column_iter(feature).collect()
    }

    /**
     * Flattens the matrix back into a list of values in row major order. For a single
     * feature matrix this undoes [from_column](FeatureMatrix::from_column).
     */
    pub fn into_flat_vec(self) -> Vec<f64> {
        self.matrix.into_row_major_vec()
    }

    pub fn matrix(&self) -> &Matrix<f64> {
        &self.matrix
    }

    pub fn into_matrix(self) -> Matrix<f64> {
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_input() {
        assert_eq!(FeatureMatrix::from_column(vec![]), Err(ShapeError::Empty));
        assert_eq!(FeatureMatrix::stack_columns(vec![]), Err(ShapeError::Empty));
        assert_eq!(FeatureMatrix::from_rows(vec![vec![]]), Err(ShapeError::Empty));
    }

    #[test]
    fn rejects_ragged_columns() {
        let error = FeatureMatrix::stack_columns(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(error, ShapeError::InconsistentColumns { expected: 2, actual: 1 });
    }

    #[test]
    fn rows_and_columns_agree() {
        let by_rows = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let by_columns = FeatureMatrix::stack_columns(vec![vec![1.0, 3.0], vec![2.0, 4.0]]).unwrap();
        assert_eq!(by_rows, by_columns);
        assert_eq!(by_rows.sample_iter().count(), 2);
    }
}
