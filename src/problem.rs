//! A multiplication problem described by sizes rather than matrices.

use crate::error::Result;
use crate::matrix::{Fill, Matrix, Shape};
use crate::threaded::{Progress, Schedule, Team};
use crate::timing::{Clock, Timed};

/// Validated sizes and thread count for one `A × B` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub team: Team,
    pub a: Shape,
    pub b: Shape,
    pub result: Shape,
}

impl Problem {
    /// Validates raw sizes in a fixed order: every dimension positive,
    /// then `cols_a == rows_b`, then the thread count.
    pub fn from_dims(
        threads: i64,
        rows_a: i64,
        cols_a: i64,
        rows_b: i64,
        cols_b: i64,
    ) -> Result<Self> {
        let a = Shape::from_signed(rows_a, cols_a)?;
        let b = Shape::from_signed(rows_b, cols_b)?;
        let result = a.product(&b)?;
        let team = Team::from_signed(threads)?;
        Ok(Self { team, a, b, result })
    }

    /// Allocates both inputs with `fill`, multiplies them and times the
    /// multiplication alone. Input set-up is not part of the sample.
    pub fn run<C: Clock + ?Sized>(
        &self,
        fill: Fill,
        schedule: Schedule,
        clock: &C,
        progress: &dyn Progress,
    ) -> Result<Timed<Matrix>> {
        let a = Matrix::filled(self.a.rows(), self.a.cols(), fill)?;
        let b = Matrix::filled(self.b.rows(), self.b.cols(), fill)?;
        log::info!(
            "multiplying {} by {} on {} threads, schedule {}",
            self.a,
            self.b,
            self.team.size(),
            schedule
        );
        crate::multiply_timed(&a, &b, &self.team, schedule, clock, progress)
    }
}
