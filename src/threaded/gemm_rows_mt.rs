//! Multi-threaded row-partitioned GEMM.

use super::progress::Progress;
use super::schedule::Schedule;
use super::team::Team;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::matrix::naive_ijk::row_ijk;

/// Multi-threaded matrix multiplication, one output row per work item.
///
/// Rows of the result are split across `team` according to `schedule`
/// and each row is computed with the i-j-k reference kernel. A and B are
/// shared read-only; each row of C is written by exactly one worker.
///
/// The numeric result does not depend on the team size or the schedule:
/// every cell is accumulated in the same order as the sequential kernel,
/// so results are bit-identical to [`multiply_reference`].
///
/// All validation and the allocation of C happen before any thread is
/// spawned. On error nothing has been computed.
///
/// [`multiply_reference`]: crate::matrix::naive_ijk::multiply_reference
pub fn matmul_rows_mt(
    a: &Matrix,
    b: &Matrix,
    team: &Team,
    schedule: Schedule,
    progress: &dyn Progress,
) -> Result<Matrix> {
    let shape = a.shape().product(&b.shape())?;
    let mut c = Matrix::zeros(shape.rows(), shape.cols())?;

    let b_data = b.as_slice();
    team.for_each_row(c.as_mut_slice(), shape.cols(), schedule, |worker, i, c_row| {
        row_ijk(a.row(i), b_data, c_row);
        progress.completed(worker, i);
    });

    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatmulError;
    use crate::matrix::naive_ijk::multiply_reference;
    use crate::matrix::Fill;

    #[test]
    fn test_rows_mt_matches_reference() {
        let a = Matrix::from_fn(37, 19, |r, c| ((r * 19 + c) % 10) as f64 * 0.5).unwrap();
        let b = Matrix::from_fn(19, 23, |r, c| ((r * 23 + c) % 7) as f64 - 3.0).unwrap();
        let expected = multiply_reference(&a, &b).unwrap();

        for threads in [1, 2, 4, 8] {
            let team = Team::new(threads).unwrap();
            for schedule in [Schedule::Static, Schedule::dynamic(1), Schedule::dynamic(6)] {
                let c = matmul_rows_mt(&a, &b, &team, schedule, &()).unwrap();
                assert_eq!(c, expected, "threads={threads}, schedule={schedule}");
            }
        }
    }

    #[test]
    fn test_more_threads_than_rows() {
        let a = Matrix::filled(2, 3, Fill::IndexSum).unwrap();
        let b = Matrix::filled(3, 2, Fill::Ones).unwrap();
        let team = Team::new(16).unwrap();

        let c = matmul_rows_mt(&a, &b, &team, Schedule::Static, &()).unwrap();
        assert_eq!(c.as_slice(), &[3.0, 3.0, 6.0, 6.0]);
    }

    #[test]
    fn test_shape_mismatch_detected_before_work() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(4, 2).unwrap();
        let team = Team::new(4).unwrap();

        let err = matmul_rows_mt(&a, &b, &team, Schedule::Static, &()).unwrap_err();
        assert_eq!(
            err,
            MatmulError::IncompatibleShapes {
                left_cols: 3,
                right_rows: 4
            }
        );
    }
}
