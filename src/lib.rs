//! Fork-join parallel matrix multiplication, built from scratch.
//!
//! A team of scoped threads splits the rows of the result between them,
//! either as contiguous static blocks or as fixed-size chunks claimed
//! from an atomic cursor. Each row is owned by exactly one worker, so
//! there are no locks on the hot path and the result does not depend on
//! the thread count.
//!
//! ## Usage
//!
//! ```
//! use parmat::{Fill, Matrix, multiply};
//!
//! let a = Matrix::filled(3, 3, Fill::IndexSum).unwrap();
//! let b = Matrix::filled(3, 4, Fill::IndexSum).unwrap();
//!
//! let c = multiply(&a, &b, 4).unwrap();
//! assert_eq!(c.row(0), &[5.0, 8.0, 11.0, 14.0]);
//! ```
//!
//! With an explicit schedule and timing:
//!
//! ```
//! use parmat::{Fill, Matrix, MonotonicClock, Schedule, Team, multiply_timed};
//!
//! let a = Matrix::filled(64, 32, Fill::Ones).unwrap();
//! let b = Matrix::filled(32, 16, Fill::Ones).unwrap();
//! let team = Team::new(4).unwrap();
//!
//! let timed = multiply_timed(&a, &b, &team, Schedule::dynamic(6), &MonotonicClock::new(), &())
//!     .unwrap();
//! assert_eq!(timed.value.get(10, 10), 32.0);
//! assert!(timed.timing.seconds() >= 0.0);
//! ```
//!
//! ## What's inside
//!
//! - Dense row-major [`Matrix`] with fallible allocation
//! - Fork-join [`Team`] with static and dynamic [`Schedule`]s, sections
//!   and parallel regions
//! - Element-wise [`vector`] kernels
//! - Injected [`Clock`]s for timing

pub mod error;
pub mod matrix;
pub mod problem;
pub mod threaded;
pub mod timing;
pub mod vector;

pub use error::{MatmulError, Result};
pub use matrix::naive_ijk::{matmul_naive_ijk, multiply_reference};
pub use matrix::{Fill, Matrix, Shape};
pub use problem::Problem;
pub use threaded::gemm_rows_mt::matmul_rows_mt;
pub use threaded::{LogProgress, MAX_TEAM_SIZE, Progress, Schedule, Team, WorkerId};
pub use timing::{Clock, MonotonicClock, Timed, TimingSample, WallClock};

/// Matrix multiply: C = A * B on `threads` workers.
///
/// Rows of C are split into contiguous static blocks. Fails with
/// [`MatmulError::IncompatibleShapes`] if `A.cols != B.rows` and with
/// [`MatmulError::UnsupportedThreadCount`] unless
/// `1 <= threads <= MAX_TEAM_SIZE`.
pub fn multiply(a: &Matrix, b: &Matrix, threads: usize) -> Result<Matrix> {
    multiply_scheduled(a, b, threads, Schedule::Static)
}

/// Same as [`multiply`] with a choice of schedule.
pub fn multiply_scheduled(
    a: &Matrix,
    b: &Matrix,
    threads: usize,
    schedule: Schedule,
) -> Result<Matrix> {
    a.shape().product(&b.shape())?;
    let team = Team::new(threads)?;
    matmul_rows_mt(a, b, &team, schedule, &())
}

/// Multiplies and measures the wall-clock time of the multiplication
/// with `clock`.
///
/// Shapes are checked before the clock is read, so a rejected call never
/// produces a sample. Allocation failure of C is reported as an error;
/// no partial product is returned.
pub fn multiply_timed<C: Clock + ?Sized>(
    a: &Matrix,
    b: &Matrix,
    team: &Team,
    schedule: Schedule,
    clock: &C,
    progress: &dyn Progress,
) -> Result<Timed<Matrix>> {
    a.shape().product(&b.shape())?;
    let Timed { value, timing } =
        timing::measure(clock, || matmul_rows_mt(a, b, team, schedule, progress));
    log::debug!("multiplication took {:.6} s", timing.seconds());
    Ok(Timed {
        value: value?,
        timing,
    })
}
