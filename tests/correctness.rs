use approx::relative_eq;
use parmat::{
    Clock, Fill, MatmulError, Matrix, MonotonicClock, Schedule, Team, WallClock,
    matmul_naive_ijk, multiply, multiply_reference, multiply_scheduled, multiply_timed,
};
use std::time::Duration;

fn assert_matrices_equal(expected: &Matrix, actual: &Matrix, name: &str) {
    assert_eq!(expected.shape(), actual.shape(), "{}: shape mismatch", name);
    for (i, (e, a)) in expected.as_slice().iter().zip(actual.as_slice()).enumerate() {
        assert!(
            relative_eq!(*e, *a, epsilon = 1e-8),
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            e,
            a
        );
    }
}

fn pattern(rows: usize, cols: usize, modulo: usize) -> Matrix {
    Matrix::from_fn(rows, cols, |r, c| ((r * cols + c) % modulo) as f64).unwrap()
}

// ============================================================
// Known fixture
// ============================================================

#[test]
fn test_index_sum_3x3_times_3x4() {
    let a = Matrix::filled(3, 3, Fill::IndexSum).unwrap();
    let b = Matrix::filled(3, 4, Fill::IndexSum).unwrap();

    let c = multiply(&a, &b, 4).unwrap();

    let expected = Matrix::from_vec(
        3,
        4,
        vec![
            5.0, 8.0, 11.0, 14.0, //
            8.0, 14.0, 20.0, 26.0, //
            11.0, 20.0, 29.0, 38.0,
        ],
    )
    .unwrap();
    assert_eq!(c, expected);
}

#[test]
fn test_2x3_times_3x2() {
    let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let b = Matrix::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();

    let c = multiply(&a, &b, 2).unwrap();

    assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
}

// ============================================================
// Thread count and schedule never change the result
// ============================================================

#[test]
fn test_matches_triple_loop_for_every_thread_count() {
    let test_cases = [
        (1, 1, 1),
        (3, 5, 7),
        (7, 3, 5),
        (13, 17, 19),
        (32, 64, 48),
        (64, 32, 48),
        (100, 50, 75),
    ];

    for (m, n, k) in test_cases {
        let a = pattern(m, k, 10);
        let b = pattern(k, n, 7);

        let mut c_loop = vec![0.0; m * n];
        matmul_naive_ijk(a.as_slice(), b.as_slice(), &mut c_loop, m, n, k);
        let expected = Matrix::from_vec(m, n, c_loop).unwrap();

        for threads in [1, 2, 4, 8] {
            let c = multiply(&a, &b, threads).unwrap();
            assert_matrices_equal(&expected, &c, &format!("{}x{}x{} t={}", m, n, k, threads));
        }
    }
}

#[test]
fn test_schedule_invariance() {
    let a = Matrix::from_fn(45, 30, |r, c| (r as f64 * 0.37).sin() + c as f64 * 0.01).unwrap();
    let b = Matrix::from_fn(30, 29, |r, c| (c as f64 * 0.11).cos() - r as f64 * 0.02).unwrap();
    let expected = multiply_reference(&a, &b).unwrap();

    for threads in [1, 2, 4, 8] {
        for schedule in [
            Schedule::Static,
            Schedule::dynamic(1),
            Schedule::dynamic(6),
            Schedule::dynamic(64),
        ] {
            let c = multiply_scheduled(&a, &b, threads, schedule).unwrap();
            // Same accumulation order per cell, so bit-identical.
            assert_eq!(c, expected, "threads={}, schedule={}", threads, schedule);
        }
    }
}

#[test]
fn test_repeated_runs_bit_identical() {
    let a = pattern(96, 80, 17);
    let b = pattern(80, 72, 13);
    let first = multiply(&a, &b, 8).unwrap();

    for trial in 0..50 {
        let again = multiply_scheduled(&a, &b, 8, Schedule::dynamic(3)).unwrap();
        assert_eq!(first, again, "trial {}", trial);
    }
}

#[test]
fn test_identity_is_neutral() {
    let a = Matrix::from_fn(9, 6, |r, c| r as f64 * 1.25 - c as f64 * 0.5).unwrap();
    let eye = Matrix::identity(6).unwrap();

    for threads in [1, 3, 8] {
        let c = multiply(&a, &eye, threads).unwrap();
        assert_matrices_equal(&a, &c, &format!("identity t={}", threads));
    }
}

#[test]
fn test_more_threads_than_rows() {
    let a = pattern(3, 4, 5);
    let b = pattern(4, 6, 5);
    let expected = multiply_reference(&a, &b).unwrap();

    let c = multiply(&a, &b, 64).unwrap();
    assert_eq!(c, expected);
}

// ============================================================
// Error handling
// ============================================================

#[test]
fn test_incompatible_shapes() {
    let a = Matrix::zeros(2, 3).unwrap();
    let b = Matrix::zeros(4, 2).unwrap();

    assert_eq!(
        multiply(&a, &b, 4).unwrap_err(),
        MatmulError::IncompatibleShapes {
            left_cols: 3,
            right_rows: 4
        }
    );
}

#[test]
fn test_zero_dimension() {
    for (rows, cols) in [(0, 3), (3, 0), (0, 0)] {
        assert!(matches!(
            Matrix::zeros(rows, cols),
            Err(MatmulError::InvalidDimension { .. })
        ));
    }
}

#[test]
fn test_unsupported_thread_count() {
    let a = Matrix::zeros(2, 2).unwrap();
    let b = Matrix::zeros(2, 2).unwrap();

    assert!(matches!(
        multiply(&a, &b, 0),
        Err(MatmulError::UnsupportedThreadCount { requested: 0, .. })
    ));
    assert!(matches!(
        multiply(&a, &b, parmat::MAX_TEAM_SIZE + 1),
        Err(MatmulError::UnsupportedThreadCount { .. })
    ));
}

// ============================================================
// Timing
// ============================================================

struct StepClock {
    step: Duration,
    ticks: std::cell::Cell<u32>,
}

impl Clock for StepClock {
    fn now(&self) -> Duration {
        let t = self.ticks.get();
        self.ticks.set(t + 1);
        self.step * t
    }
}

#[test]
fn test_timing_uses_injected_clock() {
    let a = pattern(8, 8, 3);
    let b = pattern(8, 8, 3);
    let team = Team::new(2).unwrap();
    let clock = StepClock {
        step: Duration::from_micros(250),
        ticks: std::cell::Cell::new(0),
    };

    let timed = multiply_timed(&a, &b, &team, Schedule::Static, &clock, &()).unwrap();

    assert_eq!(timed.timing.elapsed(), Duration::from_micros(250));
    assert_eq!(timed.value, multiply_reference(&a, &b).unwrap());
}

#[test]
fn test_rejected_call_reads_no_clock() {
    let a = Matrix::zeros(2, 3).unwrap();
    let b = Matrix::zeros(2, 3).unwrap();
    let team = Team::new(2).unwrap();
    let clock = StepClock {
        step: Duration::from_micros(1),
        ticks: std::cell::Cell::new(0),
    };

    assert!(multiply_timed(&a, &b, &team, Schedule::Static, &clock, &()).is_err());
    assert_eq!(clock.ticks.get(), 0);
}

#[test]
fn test_elapsed_non_negative_and_finite() {
    let a = pattern(64, 64, 11);
    let b = pattern(64, 64, 11);
    let team = Team::new(4).unwrap();

    for _ in 0..10 {
        let mono = multiply_timed(&a, &b, &team, Schedule::Static, &MonotonicClock::new(), &())
            .unwrap();
        let wall =
            multiply_timed(&a, &b, &team, Schedule::dynamic(6), &WallClock, &()).unwrap();
        for seconds in [mono.timing.seconds(), wall.timing.seconds()] {
            assert!(seconds >= 0.0 && seconds.is_finite());
        }
    }
}
