//! Dense row-major matrix.

use crate::error::{MatmulError, Result};

/// Rows × columns of a matrix. Both are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Fails with [`MatmulError::InvalidDimension`] if either side is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatmulError::InvalidDimension {
                rows: to_signed(rows),
                cols: to_signed(cols),
            });
        }
        Ok(Self { rows, cols })
    }

    /// Same as [`Shape::new`] for sizes that arrive as signed integers,
    /// e.g. straight from the command line.
    pub fn from_signed(rows: i64, cols: i64) -> Result<Self> {
        match (usize::try_from(rows), usize::try_from(cols)) {
            (Ok(r), Ok(c)) if r > 0 && c > 0 => Ok(Self { rows: r, cols: c }),
            _ => Err(MatmulError::InvalidDimension { rows, cols }),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, or `None` if it does not fit in `usize`.
    pub fn len(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Shape of `self × rhs`, if the inner dimensions agree.
    pub fn product(&self, rhs: &Shape) -> Result<Shape> {
        if self.cols != rhs.rows {
            return Err(MatmulError::IncompatibleShapes {
                left_cols: self.cols,
                right_rows: rhs.rows,
            });
        }
        Ok(Shape {
            rows: self.rows,
            cols: rhs.cols,
        })
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} X {}", self.rows, self.cols)
    }
}

fn to_signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Initial contents for a freshly allocated matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fill {
    Zeros,
    Ones,
    /// `value[r][c] = r + c`, a reproducible demo fill.
    #[default]
    IndexSum,
    /// Ones on the main diagonal, zeros elsewhere. Works for non-square shapes.
    Identity,
}

impl Fill {
    pub fn value(self, row: usize, col: usize) -> f64 {
        match self {
            Fill::Zeros => 0.0,
            Fill::Ones => 1.0,
            Fill::IndexSum => (row + col) as f64,
            Fill::Identity => {
                if row == col {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Dense matrix of `f64`, stored row-major in one contiguous buffer.
///
/// Every constructor validates the shape and reports allocation failure
/// as [`MatmulError::OutOfMemory`] instead of aborting.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: Shape,
    data: Vec<f64>,
}

impl Matrix {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, Fill::Zeros)
    }

    pub fn filled(rows: usize, cols: usize, fill: Fill) -> Result<Self> {
        Self::from_fn(rows, cols, |r, c| fill.value(r, c))
    }

    /// Builds a matrix cell by cell, row-major.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let shape = Shape::new(rows, cols)?;
        let mut data = allocate(shape)?;
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Ok(Self { shape, data })
    }

    /// Wraps an existing row-major buffer.
    ///
    /// Fails with [`MatmulError::BufferLength`] if the buffer length
    /// disagrees with the shape.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let shape = Shape::new(rows, cols)?;
        if shape.len() != Some(data.len()) {
            return Err(MatmulError::BufferLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Result<Self> {
        Self::filled(n, n, Fill::Identity)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// # Panics
    ///
    /// Panics if `(row, col)` is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows() && col < self.cols(),
            "index ({}, {}) out of bounds for {}",
            row,
            col,
            self.shape
        );
        self.data[row * self.cols() + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.cols();
        &self.data[row * n..(row + 1) * n]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Reserves room for every cell of `shape` without initializing it.
fn allocate(shape: Shape) -> Result<Vec<f64>> {
    let oom = MatmulError::OutOfMemory {
        rows: shape.rows,
        cols: shape.cols,
    };
    let len = shape.len().ok_or_else(|| oom.clone())?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| oom)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Matrix::zeros(0, 3).unwrap_err(),
            MatmulError::InvalidDimension { rows: 0, cols: 3 }
        );
        assert_eq!(
            Matrix::zeros(3, 0).unwrap_err(),
            MatmulError::InvalidDimension { rows: 3, cols: 0 }
        );
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        assert_eq!(
            Shape::from_signed(-2, 4).unwrap_err(),
            MatmulError::InvalidDimension { rows: -2, cols: 4 }
        );
        assert!(Shape::from_signed(2, 4).is_ok());
    }

    #[test]
    fn test_huge_allocation_is_out_of_memory() {
        let err = Matrix::zeros(usize::MAX / 2, 4).unwrap_err();
        assert!(matches!(err, MatmulError::OutOfMemory { .. }), "{err:?}");
    }

    #[test]
    fn test_index_sum_fill() {
        let m = Matrix::filled(2, 3, Fill::IndexSum).unwrap();
        assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 1.0, 2.0, 3.0]);
        assert_eq!(m.row(1), &[1.0, 2.0, 3.0]);
        assert_eq!(m.get(1, 2), 3.0);
    }

    #[test]
    fn test_identity_fill_non_square() {
        let m = Matrix::filled(2, 3, Fill::Identity).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_from_vec_length_checked() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 4]).is_ok());
        let err = Matrix::from_vec(2, 2, vec![1.0; 5]).unwrap_err();
        assert_eq!(
            err,
            MatmulError::BufferLength {
                rows: 2,
                cols: 2,
                len: 5
            }
        );
        assert_eq!(
            err.to_string(),
            "buffer of 5 elements does not fill a 2x2 matrix"
        );
    }

    #[test]
    fn test_product_shape() {
        let a = Shape::new(2, 3).unwrap();
        let b = Shape::new(4, 2).unwrap();
        assert_eq!(
            a.product(&b).unwrap_err(),
            MatmulError::IncompatibleShapes {
                left_cols: 3,
                right_rows: 4
            }
        );
        let b = Shape::new(3, 5).unwrap();
        assert_eq!(a.product(&b).unwrap(), Shape::new(2, 5).unwrap());
    }
}
