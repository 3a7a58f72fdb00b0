//! Textbook i-j-k multiplication.
//!
//! The parallel kernels call [`row_ijk`] once per output row, so a row
//! comes out bit-for-bit the same no matter which worker computed it or
//! how the rows were partitioned.

use super::dense::Matrix;
use crate::error::Result;

/// Naive matrix multiplication using i-j-k loop order.
///
/// This is the sequential baseline every parallel result is checked
/// against. Plain accumulation, no compensated summation.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `c` - Matrix C (m × n), row-major, accumulated into (C += A * B)
/// * `m` - Rows of A and C
/// * `n` - Columns of B and C
/// * `k` - Columns of A, rows of B
pub fn matmul_naive_ijk(a: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) {
    for i in 0..m {
        for j in 0..n {
            for p in 0..k {
                c[i * n + j] += a[i * k + p] * b[p * n + j];
            }
        }
    }
}

/// One output row: `c_row[j] += Σ_p a_row[p] * b[p][j]`.
///
/// `b` is row-major with `c_row.len()` columns and `a_row.len()` rows.
#[inline]
pub fn row_ijk(a_row: &[f64], b: &[f64], c_row: &mut [f64]) {
    let n = c_row.len();
    debug_assert_eq!(b.len(), a_row.len() * n);
    for (j, out) in c_row.iter_mut().enumerate() {
        for (p, &a_ip) in a_row.iter().enumerate() {
            *out += a_ip * b[p * n + j];
        }
    }
}

/// Sequential product of two matrices, allocating the result.
pub fn multiply_reference(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let shape = a.shape().product(&b.shape())?;
    let mut c = Matrix::zeros(shape.rows(), shape.cols())?;
    matmul_naive_ijk(
        a.as_slice(),
        b.as_slice(),
        c.as_mut_slice(),
        a.rows(),
        b.cols(),
        a.cols(),
    );
    Ok(c)
}
