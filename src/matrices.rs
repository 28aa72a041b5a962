/*!
 * Dense matrix type
 *
 * Matrices store their elements in a single row major `Vec`, so each row is a contiguous
 * slice. The storage and accessor methods work for any element type, multiplication and
 * inversion are defined for `f64` matrices, which is the only numeric type the estimators
 * in this crate work with.
 *
 * Multiplication is also defined on references to matrices, so you should favor
 * `&x * &y` style notation for matrices you intend to continue using.
 */

use std::ops::Mul;

use crate::linear_algebra;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/**
 * A general purpose matrix of some type.
 *
 * A matrix always has at least one row and one column.
 */
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: Row,
    columns: Column,
}

/// The maximum row and column lengths are usize, due to the internal storage being backed by
/// a Vec
pub type Row = usize;
pub type Column = usize;

/**
 * Methods for matrices of any type, including non numerical types such as bool.
 */
impl <T> Matrix<T> {
    /**
     * Creates a column vector (Nx1) from a list
     *
     * This will panic if the list is empty.
     */
    pub fn column(values: Vec<T>) -> Matrix<T> {
        assert!(!values.is_empty(), "No row defined");
        let rows = values.len();
        Matrix {
            data: values,
            rows,
            columns: 1,
        }
    }

    /**
     * Creates a matrix from a nested array of values, each inner vector
     * being a row, and hence the outer vector containing all rows in sequence, the
     * same way as when writing matrices in mathematics.
     *
     * Example of a 2 x 3 matrix in both notations:
     * ```ignore
     *   [
     *      1, 2, 4
     *      8, 9, 3
     *   ]
     * ```
     * ```
     * use nonlinear_fit::matrices::Matrix;
     * let matrix = Matrix::from(vec![
     *     vec![ 1, 2, 4 ],
     *     vec![ 8, 9, 3 ]]);
     * assert_eq!((2, 3), matrix.size());
     * ```
     */
    pub fn from(values: Vec<Vec<T>>) -> Matrix<T> {
        assert!(!values.is_empty(), "No rows defined");
        assert!(!values[0].is_empty(), "No column defined");
        assert!(values.iter().map(|x| x.len()).all(|x| x == values[0].len()), "Inconsistent size");
        let rows = values.len();
        let columns = values[0].len();
        Matrix {
            data: values.into_iter().flatten().collect(),
            rows,
            columns,
        }
    }

    /**
     * Creates a matrix of the provided size from a list of values in row major order,
     * ie the first `size.1` values are the first row.
     *
     * This will panic if the size has no rows or no columns, or if the number of values
     * is not exactly `size.0 * size.1`.
     */
    pub fn from_flat_row_major(size: (Row, Column), values: Vec<T>) -> Matrix<T> {
        assert!(size.0 > 0, "No rows defined");
        assert!(size.1 > 0, "No column defined");
        assert!(values.len() == size.0 * size.1, "Inconsistent size");
        Matrix {
            data: values,
            rows: size.0,
            columns: size.1,
        }
    }

    /**
     * Returns the dimensionality of this matrix in Row, Column format
     */
    pub fn size(&self) -> (Row, Column) {
        (self.rows, self.columns)
    }

    /**
     * Gets the number of rows in this matrix.
     */
    pub fn rows(&self) -> Row {
        self.rows
    }

    /**
     * Gets the number of columns in this matrix.
     */
    pub fn columns(&self) -> Column {
        self.columns
    }

    /**
     * Gets a reference to the value at this row and column. Rows and Columns are 0 indexed.
     */
    pub fn get_reference(&self, row: Row, column: Column) -> &T {
        assert!(row < self.rows, "Row out of index");
        assert!(column < self.columns, "Column out of index");
        &self.data[row * self.columns + column]
    }

    /**
     * Sets a new value to this row and column. Rows and Columns are 0 indexed.
     */
    pub fn set(&mut self, row: Row, column: Column, value: T) {
        assert!(row < self.rows, "Row out of index");
        assert!(column < self.columns, "Column out of index");
        self.data[row * self.columns + column] = value;
    }

    /**
     * Returns the values of a row as a slice. Rows are 0 indexed.
     */
    pub fn row_slice(&self, row: Row) -> &[T] {
        assert!(row < self.rows, "Row out of index");
        let start = row * self.columns;
        &self.data[start..start + self.columns]
    }

    /**
     * Returns an iterator over references to a column vector in this matrix.
     * Columns are 0 indexed.
     */
    pub fn column_reference_iter(&self, column: Column) -> impl Iterator<Item = &T> {
        assert!(column < self.columns, "Column out of index");
        self.data.iter().skip(column).step_by(self.columns)
    }

    /**
     * Returns an iterator over references to a row vector in this matrix.
     * Rows are 0 indexed.
     */
    pub fn row_reference_iter(&self, row: Row) -> impl Iterator<Item = &T> {
        self.row_slice(row).iter()
    }

    /**
     * Returns a row major iterator over references to all values in this matrix,
     * proceeding through each row in order.
     */
    pub fn row_major_reference_iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /**
     * Consumes the matrix, returning its values in row major order.
     */
    pub fn into_row_major_vec(self) -> Vec<T> {
        self.data
    }
}

/**
 * Methods for matrices with types that can be copied, but still not neccessarily numerical.
 */
impl <T: Clone> Matrix<T> {
    /**
     * Creates a matrix of the provided size with all elements initialised to the provided value
     */
    pub fn empty(value: T, size: (Row, Column)) -> Matrix<T> {
        assert!(size.0 > 0, "No rows defined");
        assert!(size.1 > 0, "No column defined");
        Matrix {
            data: vec![value; size.0 * size.1],
            rows: size.0,
            columns: size.1,
        }
    }

    /**
     * Gets a copy of the value at this row and column. Rows and Columns are 0 indexed.
     */
    pub fn get(&self, row: Row, column: Column) -> T {
        self.get_reference(row, column).clone()
    }

    /**
     * Computes and returns the transpose of this matrix
     *
     * ```
     * use nonlinear_fit::matrices::Matrix;
     * let x = Matrix::from(vec![
     *    vec![ 1, 2 ],
     *    vec![ 3, 4 ]]);
     * let y = Matrix::from(vec![
     *    vec![ 1, 3 ],
     *    vec![ 2, 4 ]]);
     * assert_eq!(x.transpose(), y);
     * ```
     */
    pub fn transpose(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.data.len());
        for column in 0..self.columns {
            data.extend(self.column_reference_iter(column).cloned());
        }
        Matrix {
            data,
            rows: self.columns,
            columns: self.rows,
        }
    }

    /**
     * Returns an iterator over a column vector in this matrix. Columns are 0 indexed.
     */
    pub fn column_iter(&self, column: Column) -> impl Iterator<Item = T> {
        self.column_reference_iter(column).cloned()
    }
}

/**
 * Methods for matrices of real numbers.
 */
impl Matrix<f64> {
    /**
     * Creates a square identity matrix of the provided size.
     */
    pub fn identity(size: usize) -> Matrix<f64> {
        let mut matrix = Matrix::empty(0.0, (size, size));
        for i in 0..size {
            matrix.set(i, i, 1.0);
        }
        matrix
    }

    /**
     * Returns the inverse of this matrix if it exists.
     *
     * See [linear_algebra::inverse](crate::linear_algebra::inverse)
     */
    pub fn inverse(&self) -> Option<Matrix<f64>> {
        linear_algebra::inverse(self)
    }
}

/**
 * Matrix multiplication for two referenced matrices.
 *
 * This will panic if the number of columns on the left is not the number of rows
 * on the right.
 */
impl Mul for &Matrix<f64> {
    type Output = Matrix<f64>;

    fn mul(self, rhs: Self) -> Self::Output {
        // LxM * MxN -> LxN
        assert!(self.columns() == rhs.rows(), "Mismatched Matrices");

        let mut data = Vec::with_capacity(self.rows() * rhs.columns());
        for i in 0..self.rows() {
            for j in 0..rhs.columns() {
                // dot product of the ith row and jth column
                data.push(self.row_reference_iter(i)
                    .zip(rhs.column_reference_iter(j))
                    .map(|(x, y)| x * y)
                    .sum());
            }
        }
        Matrix {
            data,
            rows: self.rows(),
            columns: rhs.columns(),
        }
    }
}

impl Mul for Matrix<f64> {
    type Output = Matrix<f64>;
    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_layout() {
        let matrix = Matrix::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(matrix.row_slice(1), &[4, 5, 6]);
        assert_eq!(matrix.column_iter(2).collect::<Vec<_>>(), vec![3, 6]);
        assert_eq!(matrix.transpose().size(), (3, 2));
        assert_eq!(matrix.into_row_major_vec(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn multiply_by_identity() {
        let matrix = Matrix::from(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(&matrix * &Matrix::identity(2), matrix);
        let gram = matrix.transpose() * matrix.clone();
        assert_eq!(gram, Matrix::from(vec![vec![35.0, 44.0], vec![44.0, 56.0]]));
    }

    #[test]
    #[should_panic]
    fn mismatched_multiplication() {
        let matrix = Matrix::from(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let _ = &matrix * &matrix;
    }
}
