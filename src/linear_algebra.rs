/*!
 * Linear algebra algorithms on numbers and matrices
 *
 * Note that some of these functions are also exposed as corresponding methods on the Matrix
 * type, but in depth documentation is only presented here.
 */

use crate::matrices::Matrix;

/**
 * Computes the inverse of a matrix provided that it exists. To have an inverse
 * a matrix must be square (same number of rows and columns) and it must also
 * have a non zero determinant.
 *
 * The inverse of a matrix `A` is the matrix `A^-1` which when multiplied by `A`
 * in either order yields the identity matrix `I`.
 *
 * `A(A^-1) == (A^-1)A == I`.
 *
 * This performs [Gauss-Jordan elimination](https://en.wikipedia.org/wiki/Gaussian_elimination#Finding_the_inverse_of_a_matrix)
 * on the matrix augmented with the identity, choosing the largest remaining element
 * of each column as the pivot. If any pivot is zero, or vanishingly small relative to the
 * largest element of the input, the matrix is treated as singular and `None` is returned.
 *
 * ```
 * use nonlinear_fit::matrices::Matrix;
 * use nonlinear_fit::linear_algebra;
 * let matrix = Matrix::from(vec![
 *     vec![ 4.0, 7.0 ],
 *     vec![ 2.0, 6.0 ]]);
 * let inverse = linear_algebra::inverse(&matrix).unwrap();
 * let identity = &matrix * &inverse;
 * assert!((identity.get(0, 0) - 1.0).abs() < 1e-12);
 * assert!(identity.get(1, 0).abs() < 1e-12);
 * // matrices with linearly dependent rows have no inverse
 * let singular = Matrix::from(vec![
 *     vec![ 1.0, 2.0 ],
 *     vec![ 2.0, 4.0 ]]);
 * assert!(linear_algebra::inverse(&singular).is_none());
 * ```
 */
pub fn inverse(matrix: &Matrix<f64>) -> Option<Matrix<f64>> {
    if matrix.rows() != matrix.columns() {
        return None;
    }
    let length = matrix.rows();
    let scale = matrix.row_major_reference_iter().fold(0.0_f64, |max, x| max.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tolerance = scale * f64::EPSILON * length as f64;

    let mut working = matrix.clone();
    let mut inverse = Matrix::identity(length);
    for column in 0..length {
        // partial pivoting: swap up the row with the largest magnitude in this column
        let pivot_row = (column..length)
            .max_by(|&a, &b| {
                working.get(a, column).abs().total_cmp(&working.get(b, column).abs())
            })?;
        let pivot = working.get(pivot_row, column);
        if pivot.abs() <= tolerance {
            return None;
        }
        if pivot_row != column {
            swap_rows(&mut working, pivot_row, column);
            swap_rows(&mut inverse, pivot_row, column);
        }
        scale_row(&mut working, column, 1.0 / pivot);
        scale_row(&mut inverse, column, 1.0 / pivot);
        for row in 0..length {
            if row == column {
                continue;
            }
            let factor = working.get(row, column);
            if factor == 0.0 {
                continue;
            }
            subtract_scaled_row(&mut working, row, column, factor);
            subtract_scaled_row(&mut inverse, row, column, factor);
        }
    }
    Some(inverse)
}

/**
 * Solves the normal equations `G w = b` for a symmetric positive semi definite Gram
 * matrix `G = Xᵀ X`, giving a weight of 0 to every column that is a linear combination
 * of the columns before it.
 *
 * Columns are eliminated in order without row swaps, like a Cholesky factorisation. Once
 * the columns before it have been eliminated, a column's remaining diagonal entry is
 * the part of its sum of squares the earlier columns can't explain. If that is no more
 * than `1e-10` of its original diagonal entry the column is treated as dependent. The
 * independent columns are solved exactly, so the result is always a least squares
 * solution even when `G` has no inverse.
 *
 * ```
 * use nonlinear_fit::matrices::Matrix;
 * use nonlinear_fit::linear_algebra;
 * // the second column of X is twice the first, so only the first gets a weight
 * let gram = Matrix::from(vec![
 *     vec![ 2.0, 4.0 ],
 *     vec![ 4.0, 8.0 ]]);
 * assert_eq!(linear_algebra::solve_normal_equations(&gram, &[ 6.0, 12.0 ]), vec![ 3.0, 0.0 ]);
 * ```
 *
 * # Panics
 *
 * If the matrix is not square or `rhs` has a different length.
 */
pub fn solve_normal_equations(gram: &Matrix<f64>, rhs: &[f64]) -> Vec<f64> {
    assert!(gram.rows() == gram.columns(), "Gram matrix must be square");
    assert!(gram.rows() == rhs.len(), "Need one right hand side value per row");
    let length = gram.rows();
    let mut working = gram.clone();
    let mut solution = rhs.to_vec();
    let mut independent = vec![false; length];
    for column in 0..length {
        let pivot = working.get(column, column);
        if !(pivot > 1e-10 * gram.get(column, column)) {
            continue;
        }
        independent[column] = true;
        scale_row(&mut working, column, 1.0 / pivot);
        solution[column] /= pivot;
        for row in 0..length {
            if row == column {
                continue;
            }
            let factor = working.get(row, column);
            if factor == 0.0 {
                continue;
            }
            subtract_scaled_row(&mut working, row, column, factor);
            solution[row] -= factor * solution[column];
        }
    }
    solution
        .into_iter()
        .zip(independent)
        .map(|(weight, independent)| if independent { weight } else { 0.0 })
        .collect()
}

fn swap_rows(matrix: &mut Matrix<f64>, a: usize, b: usize) {
    for column in 0..matrix.columns() {
        let temp = matrix.get(a, column);
        matrix.set(a, column, matrix.get(b, column));
        matrix.set(b, column, temp);
    }
}

fn scale_row(matrix: &mut Matrix<f64>, row: usize, factor: f64) {
    for column in 0..matrix.columns() {
        matrix.set(row, column, matrix.get(row, column) * factor);
    }
}

// row <- row - factor * source
fn subtract_scaled_row(matrix: &mut Matrix<f64>, row: usize, source: usize, factor: f64) {
    for column in 0..matrix.columns() {
        let value = matrix.get(row, column) - factor * matrix.get(source, column);
        matrix.set(row, column, value);
    }
}

/**
 * Computes the dot product of two equal length slices.
 *
 * # Panics
 *
 * If the slices have different lengths.
 */
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert!(a.len() == b.len(), "Slices must be the same length");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/**
 * Computes the mean of the values in an iterator, consuming the iterator.
 *
 * Returns `None` if the iterator is empty.
 */
pub fn mean<I>(data: I) -> Option<f64>
where I: Iterator<Item = f64> {
    let mut count = 0_usize;
    let mut sum = 0.0;
    for x in data {
        count += 1;
        sum += x;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/**
 * Computes the variance of the values in an iterator, consuming the iterator.
 *
 * Variance is defined as expected value of of the squares of the zero mean data.
 * It captures how much data varies from its mean, ie the spread of the data.
 *
 * This function does not perform [Bessel's correction](https://en.wikipedia.org/wiki/Bessel%27s_correction)
 *
 * Variance may also be computed as the mean of each squared datapoint minus the
 * square of the mean of the data. Although this method would allow for a streaming
 * implementation the [wikipedia page](https://en.wikipedia.org/wiki/Variance#Definition)
 * cautions: "This equation should not be used for computations using floating point
 * arithmetic because it suffers from catastrophic cancellation if the two components
 * of the equation are similar in magnitude".
 *
 * Returns `None` if the iterator is empty.
 */
pub fn variance<I>(data: I) -> Option<f64>
where I: Iterator<Item = f64> {
    let list: Vec<f64> = data.collect();
    let m = mean(list.iter().cloned())?;
    mean(list.into_iter().map(|x| (x - m) * (x - m)))
}

#[test]
fn test_inverse_3x3() {
    let matrix = Matrix::from(vec![
        vec![2.0, -1.0, 0.0],
        vec![-1.0, 2.0, -1.0],
        vec![0.0, -1.0, 2.0]]);
    let inverse = inverse(&matrix).unwrap();
    let product = &matrix * &inverse;
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((product.get(i, j) - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn test_inverse_needs_pivoting() {
    // zero in the top left corner means the first row can't be the first pivot
    let matrix = Matrix::from(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    assert_eq!(inverse(&matrix), Some(Matrix::from(vec![vec![0.0, 1.0], vec![1.0, 0.0]])));
}

#[test]
fn test_inverse_rejects_non_square() {
    let matrix = Matrix::from(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    assert!(inverse(&matrix).is_none());
}

#[test]
fn test_normal_equations_full_rank() {
    // X = [[1, 0], [0, 2], [1, 1]], y = [1, 4, 3]
    let gram = Matrix::from(vec![vec![2.0, 1.0], vec![1.0, 5.0]]);
    let weights = solve_normal_equations(&gram, &[4.0, 11.0]);
    let expected = inverse(&gram).unwrap() * Matrix::column(vec![4.0, 11.0]);
    assert!((weights[0] - expected.get(0, 0)).abs() < 1e-12);
    assert!((weights[1] - expected.get(1, 0)).abs() < 1e-12);
}

#[test]
fn test_normal_equations_skip_dependent_middle_column() {
    // columns a, 2a, b for a = [1, 0], b = [0, 1] and targets [2, 3]
    let gram = Matrix::from(vec![
        vec![1.0, 2.0, 0.0],
        vec![2.0, 4.0, 0.0],
        vec![0.0, 0.0, 1.0]]);
    assert!(inverse(&gram).is_none());
    assert_eq!(solve_normal_equations(&gram, &[2.0, 4.0, 3.0]), vec![2.0, 0.0, 3.0]);
}

#[test]
fn test_mean_and_variance() {
    assert_eq!(mean(vec![1.0, 2.0, 3.0, 4.0].into_iter()), Some(2.5));
    assert_eq!(variance(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter()), Some(4.0));
    assert_eq!(mean(std::iter::empty()), None);
}
